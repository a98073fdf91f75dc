//! A fragment-by-sample matrix of counts.

use std::io;
use std::io::Write;

use crate::core::fragment::Id;
use crate::core::fragment::Set;
use crate::count::Counts;
use crate::count::Summary;

/// The delimiter used when writing a matrix.
pub const DELIMITER: char = '\t';

/// An error related to a [`Matrix`].
#[derive(Debug, Eq, PartialEq)]
pub enum Error {
    /// A column did not have one count per fragment.
    ///
    /// The values are the column label, the expected length, and the found
    /// length.
    MismatchedColumn(String, usize, usize),
}

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Error::MismatchedColumn(label, expected, found) => write!(
                f,
                "column `{label}` has {found} counts, but there are {expected} fragments"
            ),
        }
    }
}

impl std::error::Error for Error {}

/// A [`Result`](std::result::Result) with an [`Error`].
type Result<T> = std::result::Result<T, Error>;

/// A fragment-by-sample matrix of counts.
///
/// Rows are fragments in identifier order. Columns are samples in the order
/// they were provided.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Matrix {
    /// The fragments (row labels).
    fragments: Set,

    /// The sample labels (column labels).
    labels: Vec<String>,

    /// The columns.
    columns: Vec<Counts>,
}

impl Matrix {
    /// Attempts to stack per-sample counts into a [`Matrix`].
    ///
    /// # Examples
    ///
    /// ```
    /// use fragcount::core::fragment::Set;
    /// use fragcount::count::Counts;
    /// use fragcount::count::Matrix;
    ///
    /// let set = Set::try_from_records([("chr1", 100, 199), ("chr1", 300, 599)])?;
    /// let matrix = Matrix::try_from_columns(
    ///     set,
    ///     vec![
    ///         (String::from("a"), Counts::zeroed(2)),
    ///         (String::from("b"), Counts::zeroed(2)),
    ///     ],
    /// )?;
    ///
    /// assert_eq!(matrix.shape(), (2, 2));
    /// assert_eq!(matrix.labels(), &["a", "b"]);
    ///
    /// # Ok::<(), Box<dyn std::error::Error>>(())
    /// ```
    pub fn try_from_columns(fragments: Set, columns: Vec<(String, Counts)>) -> Result<Self> {
        let (labels, columns): (Vec<_>, Vec<_>) = columns.into_iter().unzip();

        for (label, column) in labels.iter().zip(columns.iter()) {
            if column.len() != fragments.len() {
                return Err(Error::MismatchedColumn(
                    label.clone(),
                    fragments.len(),
                    column.len(),
                ));
            }
        }

        Ok(Self {
            fragments,
            labels,
            columns,
        })
    }

    /// Gets the fragments (row labels).
    pub fn fragments(&self) -> &Set {
        &self.fragments
    }

    /// Gets the sample labels (column labels).
    pub fn labels(&self) -> &[String] {
        &self.labels
    }

    /// Gets the number of rows and columns.
    pub fn shape(&self) -> (usize, usize) {
        (self.fragments.len(), self.columns.len())
    }

    /// Gets the count for a fragment within a column.
    pub fn get(&self, id: Id, column: usize) -> Option<u64> {
        self.columns.get(column)?.get(id)
    }

    /// Gets all of the counts for a fragment across columns.
    pub fn row(&self, id: Id) -> Option<Vec<u64>> {
        self.columns.iter().map(|column| column.get(id)).collect()
    }

    /// Gets all of the counts for a column in fragment order.
    pub fn column(&self, column: usize) -> Option<&[u64]> {
        self.columns.get(column).map(|counts| counts.as_slice())
    }

    /// Gets the index of the column with a label.
    pub fn position(&self, label: &str) -> Option<usize> {
        self.labels.iter().position(|l| l == label)
    }

    /// Returns an iterator over the label and assignment summary of each
    /// column.
    pub fn summaries(&self) -> impl Iterator<Item = (&str, &Summary)> {
        self.labels
            .iter()
            .map(|label| label.as_str())
            .zip(self.columns.iter().map(|column| column.summary()))
    }

    /// Writes the matrix as delimited text.
    ///
    /// The first line is a header of `id`, `chrom`, `start`, `end`, and then
    /// one label per column. Each following line is one fragment.
    ///
    /// # Examples
    ///
    /// ```
    /// use fragcount::core::fragment::Set;
    /// use fragcount::count::Counts;
    /// use fragcount::count::Matrix;
    ///
    /// let set = Set::try_from_records([("chr1", 100, 199)])?;
    /// let matrix = Matrix::try_from_columns(set, vec![(String::from("a"), Counts::zeroed(1))])?;
    ///
    /// let mut buffer = Vec::new();
    /// matrix.write_tsv(&mut buffer)?;
    ///
    /// assert_eq!(
    ///     String::from_utf8(buffer)?,
    ///     "id\tchrom\tstart\tend\ta\n1\tchr1\t100\t199\t0\n"
    /// );
    ///
    /// # Ok::<(), Box<dyn std::error::Error>>(())
    /// ```
    pub fn write_tsv<W>(&self, mut writer: W) -> io::Result<()>
    where
        W: Write,
    {
        write!(writer, "id{DELIMITER}chrom{DELIMITER}start{DELIMITER}end")?;
        for label in &self.labels {
            write!(writer, "{DELIMITER}{label}")?;
        }
        writeln!(writer)?;

        for fragment in self.fragments.iter() {
            write!(
                writer,
                "{}{DELIMITER}{}{DELIMITER}{}{DELIMITER}{}",
                fragment.id(),
                fragment.contig().as_str(),
                fragment.start(),
                fragment.end()
            )?;

            for column in &self.columns {
                write!(writer, "{DELIMITER}{}", column.as_slice()[fragment.id().index()])?;
            }

            writeln!(writer)?;
        }

        writer.flush()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assign::Assignment;

    fn counts(n: usize, hits: &[usize]) -> Counts {
        let mut counts = Counts::zeroed(n);
        for hit in hits {
            counts.add(Assignment::Assigned(Id::from_index(*hit)));
        }
        counts
    }

    #[test]
    fn test_columns_keep_caller_order() -> std::result::Result<(), Box<dyn std::error::Error>> {
        let set = Set::try_from_records([("chr1", 1, 10), ("chr1", 11, 20), ("chr2", 1, 10)])?;
        let matrix = Matrix::try_from_columns(
            set,
            vec![
                (String::from("b"), counts(3, &[0, 0, 2])),
                (String::from("a"), counts(3, &[1])),
            ],
        )?;

        assert_eq!(matrix.labels(), &["b", "a"]);
        assert_eq!(matrix.column(0), Some(&[2, 0, 1][..]));
        assert_eq!(matrix.column(1), Some(&[0, 1, 0][..]));
        assert_eq!(matrix.row(Id::from_index(0)), Some(vec![2, 0]));
        assert_eq!(matrix.get(Id::from_index(2), 0), Some(1));
        assert_eq!(matrix.get(Id::from_index(3), 0), None);
        assert_eq!(matrix.position("a"), Some(1));

        let summaries = matrix.summaries().collect::<Vec<_>>();
        assert_eq!(summaries[0].0, "b");
        assert_eq!(summaries[0].1.assigned, 3);

        Ok(())
    }

    #[test]
    fn test_zero_rows_are_written() -> std::result::Result<(), Box<dyn std::error::Error>> {
        let set = Set::try_from_records([("chr1", 1, 10), ("chr1", 11, 20)])?;
        let matrix = Matrix::try_from_columns(
            set,
            vec![
                (String::from("a"), counts(2, &[1])),
                (String::from("b"), counts(2, &[])),
            ],
        )?;

        let mut buffer = Vec::new();
        matrix.write_tsv(&mut buffer)?;

        assert_eq!(
            String::from_utf8(buffer)?,
            "id\tchrom\tstart\tend\ta\tb\n1\tchr1\t1\t10\t0\t0\n2\tchr1\t11\t20\t1\t0\n"
        );

        Ok(())
    }

    #[test]
    fn test_mismatched_column() -> std::result::Result<(), Box<dyn std::error::Error>> {
        let set = Set::try_from_records([("chr1", 1, 10)])?;
        let err = Matrix::try_from_columns(set, vec![(String::from("a"), Counts::zeroed(2))])
            .unwrap_err();

        assert_eq!(err, Error::MismatchedColumn(String::from("a"), 1, 2));

        Ok(())
    }
}

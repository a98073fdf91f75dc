//! Per-sample tallies of reads over fragments.

use std::io;

use omics::coordinate::Contig;

use crate::assign::Assigner;
use crate::assign::Assignment;
use crate::assign::Strictness;
use crate::core::fragment::Id;
use crate::Alignment;

pub mod matrix;

pub use matrix::Matrix;

////////////////////////////////////////////////////////////////////////////////////////
// Errors
////////////////////////////////////////////////////////////////////////////////////////

/// An error related to counting a sample.
#[derive(Debug)]
pub enum Error {
    /// An alignment could not be read.
    ///
    /// The first value is the 1-based number of the record that failed.
    Read(usize, io::Error),

    /// An alignment was on a contig that no fragment is located on.
    ///
    /// The first value is the 1-based number of the offending record.
    UnknownContig(usize, Contig),
}

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Error::Read(number, err) => write!(f, "failed to read record #{number}: {err}"),
            Error::UnknownContig(number, contig) => write!(
                f,
                "record #{number} is on contig `{}`, which no fragment is located on",
                contig.as_str()
            ),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::Read(_, err) => Some(err),
            Error::UnknownContig(..) => None,
        }
    }
}

/// A [`Result`](std::result::Result) with an [`Error`].
type Result<T> = std::result::Result<T, Error>;

////////////////////////////////////////////////////////////////////////////////////////
// Summary
////////////////////////////////////////////////////////////////////////////////////////

/// A breakdown of how the reads within a sample were assigned.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct Summary {
    /// The number of reads seen.
    pub total: u64,

    /// The number of reads assigned to a fragment.
    pub assigned: u64,

    /// The number of reads skipped as duplicates.
    pub duplicate: u64,

    /// The number of reads that fell outside of every fragment.
    pub no_features: u64,

    /// The number of reads discarded for falling within multiple fragments.
    pub ambiguous: u64,

    /// The number of reads ignored for aligning to a contig without
    /// fragments.
    pub unknown_contig: u64,
}

impl Summary {
    /// Records the outcome of a single assignment.
    fn record(&mut self, assignment: &Assignment) {
        self.total += 1;

        match assignment {
            Assignment::Assigned(_) => self.assigned += 1,
            Assignment::Duplicate => self.duplicate += 1,
            Assignment::NoFeatures => self.no_features += 1,
            Assignment::Ambiguous => self.ambiguous += 1,
            Assignment::UnknownContig => self.unknown_contig += 1,
        }
    }
}

////////////////////////////////////////////////////////////////////////////////////////
// Counts
////////////////////////////////////////////////////////////////////////////////////////

/// The per-fragment counts for a single sample.
///
/// Every fragment has an entry from the outset, so fragments without any
/// reads are explicit zeros.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Counts {
    /// The counts, indexed by [`Id::index()`].
    values: Vec<u64>,

    /// The assignment summary.
    summary: Summary,
}

impl Counts {
    /// Creates zeroed counts for `n` fragments.
    ///
    /// # Examples
    ///
    /// ```
    /// use fragcount::count::Counts;
    ///
    /// let counts = Counts::zeroed(3);
    /// assert_eq!(counts.as_slice(), &[0, 0, 0]);
    /// ```
    pub fn zeroed(n: usize) -> Self {
        Self {
            values: vec![0; n],
            summary: Summary::default(),
        }
    }

    /// Adds the outcome of a single assignment.
    ///
    /// Assigned identifiers must come from an [`Assigner`] over as many
    /// fragments as these counts were created for.
    pub(crate) fn add(&mut self, assignment: Assignment) {
        self.summary.record(&assignment);

        if let Assignment::Assigned(id) = assignment {
            self.values[id.index()] += 1;
        }
    }

    /// Gets the count for a fragment.
    pub fn get(&self, id: Id) -> Option<u64> {
        self.values.get(id.index()).copied()
    }

    /// Gets the counts in fragment order.
    pub fn as_slice(&self) -> &[u64] {
        &self.values
    }

    /// Gets the assignment summary.
    pub fn summary(&self) -> &Summary {
        &self.summary
    }

    /// Gets the number of fragments.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Returns whether or not there are no fragments.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

/// Tallies every alignment in a sample against an assigner.
///
/// The counts have one entry for every fragment the assigner was built from.
/// Under [`Strictness::Strict`], the first read on a contig without fragments
/// ends the tally with [`Error::UnknownContig`].
///
/// # Examples
///
/// ```
/// use fragcount::assign::Assigner;
/// use fragcount::assign::Mode;
/// use fragcount::assign::Overlap;
/// use fragcount::assign::Strictness;
/// use fragcount::core::fragment::Set;
/// use fragcount::count;
/// use fragcount::Alignment;
/// use omics::coordinate::Strand;
///
/// let set = Set::try_from_records([("chr1", 100, 199), ("chr1", 300, 599)])?;
/// let assigner = Assigner::try_new(&set, Mode::Inner, Overlap::Lowest, Strictness::Strict)?;
///
/// let alignments = [110, 150, 450]
///     .into_iter()
///     .map(|position| Ok(Alignment::new("chr1", position, Strand::Positive, false)));
///
/// let counts = count::tally(&assigner, alignments)?;
/// assert_eq!(counts.as_slice(), &[2, 1]);
///
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
pub fn tally<I>(assigner: &Assigner, alignments: I) -> Result<Counts>
where
    I: IntoIterator<Item = io::Result<Alignment>>,
{
    let mut counts = Counts::zeroed(assigner.fragments());

    for (i, result) in alignments.into_iter().enumerate() {
        let alignment = result.map_err(|err| Error::Read(i + 1, err))?;
        let assignment = assigner.assign(&alignment);

        if assignment == Assignment::UnknownContig && assigner.strictness() == Strictness::Strict {
            return Err(Error::UnknownContig(i + 1, alignment.contig().clone()));
        }

        counts.add(assignment);
    }

    Ok(counts)
}

#[cfg(test)]
mod tests {
    use omics::coordinate::position::Number;
    use omics::coordinate::Strand;

    use super::*;
    use crate::assign::Mode;
    use crate::assign::Overlap;
    use crate::core::fragment::Set;
    use crate::flank;

    fn reads(positions: &[Number]) -> Vec<io::Result<Alignment>> {
        positions
            .iter()
            .map(|position| Ok(Alignment::new("chr1", *position, Strand::Positive, false)))
            .collect()
    }

    fn build(set: &Set, mode: Mode, strictness: Strictness) -> Assigner {
        Assigner::try_new(set, mode, Overlap::Lowest, strictness).unwrap()
    }

    #[test]
    fn test_inner_and_flank_counts() -> std::result::Result<(), Box<dyn std::error::Error>> {
        let set = Set::try_from_records([("chr1", 100, 199), ("chr1", 300, 599)])?;
        let positions = [110, 150, 190, 310, 520, 450];

        let inner = build(&set, Mode::Inner, Strictness::Strict);
        let counts = tally(&inner, reads(&positions))?;
        assert_eq!(counts.as_slice(), &[3, 3]);

        let flank = build(&set, Mode::Flank(flank::Size::default()), Strictness::Strict);
        let counts = tally(&flank, reads(&positions))?;
        assert_eq!(counts.as_slice(), &[3, 2]);
        assert_eq!(
            counts.summary(),
            &Summary {
                total: 6,
                assigned: 5,
                duplicate: 0,
                no_features: 1,
                ambiguous: 0,
                unknown_contig: 0,
            }
        );

        Ok(())
    }

    #[test]
    fn test_duplicates_and_misses_are_summarized(
    ) -> std::result::Result<(), Box<dyn std::error::Error>> {
        let set = Set::try_from_records([("chr1", 100, 199)])?;
        let assigner = build(&set, Mode::Inner, Strictness::Strict);

        let alignments = vec![
            Ok(Alignment::new("chr1", 150, Strand::Positive, true)),
            Ok(Alignment::new("chr1", 150, Strand::Positive, false)),
            Ok(Alignment::new("chr1", 250, Strand::Positive, false)),
        ];

        let counts = tally(&assigner, alignments)?;
        assert_eq!(counts.get(Id::from_index(0)), Some(1));
        assert_eq!(counts.summary().duplicate, 1);
        assert_eq!(counts.summary().no_features, 1);
        assert_eq!(counts.summary().total, 3);

        Ok(())
    }

    #[test]
    fn test_unknown_contigs_are_fatal_by_default(
    ) -> std::result::Result<(), Box<dyn std::error::Error>> {
        let set = Set::try_from_records([("chr1", 100, 199)])?;
        let assigner = build(&set, Mode::Inner, Strictness::Strict);

        let mut alignments = reads(&[110, 120]);
        alignments.push(Ok(Alignment::new("chrUnknown", 150, Strand::Positive, false)));
        alignments.extend(reads(&[130]));

        let err = tally(&assigner, alignments).unwrap_err();
        assert!(matches!(
            err,
            Error::UnknownContig(3, ref contig) if contig.as_str() == "chrUnknown"
        ));
        assert_eq!(
            err.to_string(),
            "record #3 is on contig `chrUnknown`, which no fragment is located on"
        );

        Ok(())
    }

    #[test]
    fn test_unknown_contigs_when_lenient() -> std::result::Result<(), Box<dyn std::error::Error>> {
        let set = Set::try_from_records([("chr1", 100, 199)])?;
        let assigner = build(&set, Mode::Inner, Strictness::Lenient);

        let mut alignments = reads(&[110]);
        alignments.push(Ok(Alignment::new("chrUnknown", 150, Strand::Positive, false)));

        let counts = tally(&assigner, alignments)?;
        assert_eq!(counts.as_slice(), &[1]);
        assert_eq!(counts.summary().unknown_contig, 1);
        assert_eq!(counts.summary().total, 2);

        Ok(())
    }

    #[test]
    fn test_counts_cover_every_fragment() -> std::result::Result<(), Box<dyn std::error::Error>> {
        let set =
            Set::try_from_records([("chr1", 100, 199), ("chr1", 300, 599), ("chr2", 1, 9)])?;
        let assigner = build(&set, Mode::Inner, Strictness::Strict);

        let counts = tally(&assigner, reads(&[]))?;
        assert_eq!(counts.len(), 3);
        assert_eq!(counts.as_slice(), &[0, 0, 0]);

        Ok(())
    }

    #[test]
    fn test_read_errors_name_the_record() -> std::result::Result<(), Box<dyn std::error::Error>> {
        let set = Set::try_from_records([("chr1", 100, 199)])?;
        let assigner = build(&set, Mode::Inner, Strictness::Strict);

        let mut alignments = reads(&[110, 120]);
        alignments.push(Err(io::Error::new(io::ErrorKind::InvalidData, "truncated")));

        let err = tally(&assigner, alignments).unwrap_err();
        assert_eq!(err.to_string(), "failed to read record #3: truncated");

        Ok(())
    }
}

//! An ordered, non-empty set of fragments.

use std::collections::HashSet;

use nonempty::NonEmpty;
use omics::coordinate::interbase::Coordinate;
use omics::coordinate::interval;
use omics::coordinate::interval::interbase::Interval;
use omics::coordinate::position::Number;
use omics::coordinate::Contig;
use omics::coordinate::Strand;

use crate::core::fragment::Fragment;
use crate::core::fragment::Id;

/// An error related to a single fragment record.
#[derive(Debug)]
pub enum RecordError {
    /// The start position was zero, which is not a 1-based position.
    ZeroStart,

    /// The start position was greater than the end position.
    StartAfterEnd(Number, Number),

    /// The interval could not be constructed.
    Interval(interval::Error),
}

impl std::fmt::Display for RecordError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RecordError::ZeroStart => write!(f, "start position cannot be zero"),
            RecordError::StartAfterEnd(start, end) => write!(
                f,
                "start position ({start}) is greater than end position ({end})"
            ),
            RecordError::Interval(err) => write!(f, "interval error: {err}"),
        }
    }
}

impl std::error::Error for RecordError {}

/// An error related to a [`Set`].
#[derive(Debug)]
pub enum Error {
    /// No fragments were provided.
    Empty,

    /// A fragment covered no bases.
    ///
    /// The first value is the 1-based number of the fragment in the input.
    EmptyInterval(usize, Interval),

    /// A fragment record was not a valid interval.
    ///
    /// The first value is the 1-based number of the record in the input.
    InvalidRecord(usize, String, RecordError),
}

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Error::Empty => write!(f, "the fragment set is empty"),
            Error::EmptyInterval(number, interval) => {
                write!(f, "fragment #{number} ({interval}) covers no bases")
            }
            Error::InvalidRecord(number, record, err) => {
                write!(f, "invalid fragment #{number} ({record}): {err}")
            }
        }
    }
}

impl std::error::Error for Error {}

/// A [`Result`](std::result::Result) with an [`Error`].
type Result<T> = std::result::Result<T, Error>;

/// An ordered, non-empty set of fragments.
///
/// The position of a fragment within the set determines its [`Id`]: the
/// first fragment is `1`, the second is `2`, and so on. Fragments may overlap
/// one another.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Set(NonEmpty<Fragment>);

impl Set {
    /// Attempts to create a [`Set`] from a sequence of interbase intervals.
    ///
    /// # Examples
    ///
    /// ```
    /// use fragcount::core::fragment::Set;
    /// use omics::coordinate::interval::interbase::Interval;
    ///
    /// let set = Set::try_from_intervals([
    ///     "chr1:+:99-199".parse::<Interval>()?,
    ///     "chr1:+:299-599".parse::<Interval>()?,
    /// ])?;
    ///
    /// assert_eq!(set.len(), 2);
    /// assert!(Set::try_from_intervals(Vec::<Interval>::new()).is_err());
    ///
    /// # Ok::<(), Box<dyn std::error::Error>>(())
    /// ```
    pub fn try_from_intervals<I>(intervals: I) -> Result<Self>
    where
        I: IntoIterator<Item = Interval>,
    {
        let fragments = intervals
            .into_iter()
            .enumerate()
            .map(|(index, interval)| {
                if interval.count_entities() == 0 {
                    return Err(Error::EmptyInterval(index + 1, interval));
                }

                Ok(Fragment::new(Id::from_index(index), interval))
            })
            .collect::<Result<Vec<_>>>()?;

        NonEmpty::from_vec(fragments).map(Self).ok_or(Error::Empty)
    }

    /// Attempts to create a [`Set`] from raw `(contig, start, end)` records
    /// with 1-based, fully-closed coordinates.
    ///
    /// The first malformed record is reported along with its 1-based number.
    ///
    /// # Examples
    ///
    /// ```
    /// use fragcount::core::fragment::Set;
    ///
    /// let set = Set::try_from_records([("chr1", 100, 199), ("chr2", 300, 599)])?;
    /// assert_eq!(set.len(), 2);
    ///
    /// let err = Set::try_from_records([("chr1", 100, 199), ("chr1", 599, 300)]).unwrap_err();
    /// assert_eq!(
    ///     err.to_string(),
    ///     "invalid fragment #2 (chr1:599-300): start position (599) is greater than end \
    ///      position (300)"
    /// );
    ///
    /// # Ok::<(), Box<dyn std::error::Error>>(())
    /// ```
    pub fn try_from_records<I, C>(records: I) -> Result<Self>
    where
        I: IntoIterator<Item = (C, Number, Number)>,
        C: Into<Contig>,
    {
        let intervals = records
            .into_iter()
            .enumerate()
            .map(|(index, (contig, start, end))| {
                let contig: Contig = contig.into();
                let record = format!("{}:{start}-{end}", contig.as_str());

                record_to_interval(contig, start, end)
                    .map_err(|err| Error::InvalidRecord(index + 1, record, err))
            })
            .collect::<Result<Vec<_>>>()?;

        Self::try_from_intervals(intervals)
    }

    /// Gets the number of fragments.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Always returns `false`, as a [`Set`] cannot be empty.
    pub fn is_empty(&self) -> bool {
        false
    }

    /// Gets a fragment by its identifier.
    pub fn get(&self, id: Id) -> Option<&Fragment> {
        self.0.get(id.index())
    }

    /// Returns an iterator over the fragments in identifier order.
    pub fn iter(&self) -> impl Iterator<Item = &Fragment> {
        self.0.iter()
    }

    /// Gets the distinct contigs that fragments are located on in the order
    /// that they first appear.
    ///
    /// # Examples
    ///
    /// ```
    /// use fragcount::core::fragment::Set;
    ///
    /// let set = Set::try_from_records([("chr2", 1, 10), ("chr1", 1, 10), ("chr2", 20, 30)])?;
    ///
    /// let contigs = set.contigs().into_iter().map(|c| c.as_str()).collect::<Vec<_>>();
    /// assert_eq!(contigs, vec!["chr2", "chr1"]);
    ///
    /// # Ok::<(), Box<dyn std::error::Error>>(())
    /// ```
    pub fn contigs(&self) -> Vec<&Contig> {
        let mut seen = HashSet::new();

        self.iter()
            .map(|fragment| fragment.contig())
            .filter(|contig| seen.insert(*contig))
            .collect()
    }
}

/// Converts a 1-based, fully-closed record into an interbase interval on the
/// positive strand.
fn record_to_interval(
    contig: Contig,
    start: Number,
    end: Number,
) -> std::result::Result<Interval, RecordError> {
    if start == 0 {
        return Err(RecordError::ZeroStart);
    }

    if start > end {
        return Err(RecordError::StartAfterEnd(start, end));
    }

    let from = Coordinate::new(contig.clone(), Strand::Positive, start - 1);
    let to = Coordinate::new(contig, Strand::Positive, end);

    Interval::try_new(from, to).map_err(RecordError::Interval)
}

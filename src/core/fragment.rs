//! Restriction fragments and their identifiers.

pub mod set;

pub use set::Set;

use omics::coordinate::interval::interbase::Interval;
use omics::coordinate::position::Number;
use omics::coordinate::Contig;
use omics::coordinate::Strand;

/// The identifier of a fragment.
///
/// Identifiers are 1-based and are handed out in the order that fragments
/// were provided. They double as an index into any array-backed store of
/// per-fragment values via [`Id::index()`].
#[derive(Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub struct Id(usize);

impl Id {
    /// Creates an identifier from a 0-based index.
    ///
    /// # Examples
    ///
    /// ```
    /// use fragcount::core::fragment::Id;
    ///
    /// let id = Id::from_index(0);
    /// assert_eq!(id.get(), 1);
    /// assert_eq!(id.index(), 0);
    /// ```
    pub fn from_index(index: usize) -> Self {
        Self(index + 1)
    }

    /// Gets the 1-based value of the identifier.
    pub fn get(&self) -> usize {
        self.0
    }

    /// Gets the 0-based index of the identifier.
    pub fn index(&self) -> usize {
        self.0 - 1
    }
}

impl std::fmt::Display for Id {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A restriction fragment.
///
/// The extent of a fragment is held as an interbase interval on the positive
/// strand, which lines up with BED records one-to-one. The [`start()`] and
/// [`end()`] accessors report the first and last bases of the fragment in
/// 1-based coordinates.
///
/// [`start()`]: Fragment::start
/// [`end()`]: Fragment::end
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Fragment {
    /// The identifier.
    id: Id,

    /// The genomic extent.
    interval: Interval,
}

impl Fragment {
    /// Creates a new [`Fragment`].
    ///
    /// Intervals on the negative strand are reverse complemented so that
    /// every fragment is stored on the positive strand.
    ///
    /// # Examples
    ///
    /// ```
    /// use fragcount::core::fragment::Fragment;
    /// use fragcount::core::fragment::Id;
    /// use omics::coordinate::interval::interbase::Interval;
    ///
    /// let fragment = Fragment::new(Id::from_index(0), "chr1:-:599-299".parse::<Interval>()?);
    /// assert_eq!(fragment.interval(), &"chr1:+:299-599".parse::<Interval>()?);
    ///
    /// # Ok::<(), Box<dyn std::error::Error>>(())
    /// ```
    pub fn new(id: Id, interval: Interval) -> Self {
        let interval = match interval.strand() {
            Strand::Positive => interval,
            Strand::Negative => interval.reverse_complement(),
        };

        Self { id, interval }
    }

    /// Gets the identifier.
    pub fn id(&self) -> Id {
        self.id
    }

    /// Gets the interval by reference.
    pub fn interval(&self) -> &Interval {
        &self.interval
    }

    /// Gets the contig.
    pub fn contig(&self) -> &Contig {
        self.interval.contig()
    }

    /// Gets the first base of the fragment (1-based, inclusive).
    pub fn start(&self) -> Number {
        self.interval.start().position().get() + 1
    }

    /// Gets the last base of the fragment (1-based, inclusive).
    pub fn end(&self) -> Number {
        self.interval.end().position().get()
    }

    /// Gets the length of the fragment in bases.
    ///
    /// # Examples
    ///
    /// ```
    /// use fragcount::core::fragment::Fragment;
    /// use fragcount::core::fragment::Id;
    ///
    /// let fragment = Fragment::new(Id::from_index(0), "chr1:+:299-599".parse()?);
    /// assert_eq!(fragment.start(), 300);
    /// assert_eq!(fragment.end(), 599);
    /// assert_eq!(fragment.width(), 300);
    ///
    /// # Ok::<(), Box<dyn std::error::Error>>(())
    /// ```
    pub fn width(&self) -> Number {
        self.interval.count_entities()
    }
}

impl std::fmt::Display for Fragment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{} ({})", self.id, self.interval)
    }
}

//! Flanking windows at either end of a fragment.
//!
//! In chromatin-conformation assays, ligation junctions sit at the ends of
//! restriction fragments, so reads close to a fragment end carry most of the
//! signal. A flanking window is the first (5') or last (3') `n` bases of a
//! fragment. Windows never extend past their parent fragment: when a fragment
//! is shorter than `n`, both of its windows cover the entire fragment.

use std::num::NonZeroU64;

use omics::coordinate::interbase::Coordinate;
use omics::coordinate::interval;
use omics::coordinate::interval::interbase::Interval;
use omics::coordinate::position::Number;
use omics::coordinate::Contig;
use omics::coordinate::Strand;

use crate::core::fragment::Id;
use crate::core::Fragment;

/// The default flanking window size.
pub const DEFAULT_SIZE: Number = 100;

/// An error related to flanking windows.
#[derive(Debug)]
pub enum Error {
    /// A size of zero was provided.
    ZeroSize,

    /// A window interval could not be constructed.
    Interval(Id, interval::Error),
}

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Error::ZeroSize => write!(f, "flank size must be greater than zero"),
            Error::Interval(id, err) => {
                write!(f, "invalid window for fragment #{id}: {err}")
            }
        }
    }
}

impl std::error::Error for Error {}

/// The nominal width of a flanking window.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub struct Size(NonZeroU64);

impl Size {
    /// Attempts to create a new [`Size`].
    ///
    /// # Examples
    ///
    /// ```
    /// use fragcount::flank::Size;
    ///
    /// assert_eq!(Size::try_new(50)?.get(), 50);
    /// assert!(Size::try_new(0).is_err());
    ///
    /// # Ok::<(), Box<dyn std::error::Error>>(())
    /// ```
    pub fn try_new(size: Number) -> Result<Self, Error> {
        NonZeroU64::new(size).map(Self).ok_or(Error::ZeroSize)
    }

    /// Gets the inner value.
    pub fn get(&self) -> Number {
        self.0.get()
    }
}

impl Default for Size {
    fn default() -> Self {
        // SAFETY: the default size is a non-zero constant.
        Self(NonZeroU64::new(DEFAULT_SIZE).unwrap())
    }
}

impl std::fmt::Display for Size {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// The end of a fragment that a window sits at.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum Side {
    /// The window starting at the fragment's start position.
    FivePrime,

    /// The window ending at the fragment's end position.
    ThreePrime,
}

impl std::fmt::Display for Side {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Side::FivePrime => write!(f, "5'"),
            Side::ThreePrime => write!(f, "3'"),
        }
    }
}

/// A flanking window belonging to a fragment.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Window {
    /// The identifier of the parent fragment.
    parent: Id,

    /// The end of the parent fragment.
    side: Side,

    /// The extent of the window on the positive strand.
    interval: Interval,
}

impl Window {
    /// Gets the identifier of the parent fragment.
    pub fn parent(&self) -> Id {
        self.parent
    }

    /// Gets the end of the parent fragment this window sits at.
    pub fn side(&self) -> Side {
        self.side
    }

    /// Gets the interval by reference.
    pub fn interval(&self) -> &Interval {
        &self.interval
    }

    /// Gets the contig.
    pub fn contig(&self) -> &Contig {
        self.interval.contig()
    }

    /// Gets the first base of the window (1-based, inclusive).
    pub fn start(&self) -> Number {
        self.interval.start().position().get() + 1
    }

    /// Gets the last base of the window (1-based, inclusive).
    pub fn end(&self) -> Number {
        self.interval.end().position().get()
    }

    /// Gets the width of the window.
    ///
    /// This is the smaller of the nominal window size and the length of the
    /// parent fragment.
    pub fn width(&self) -> Number {
        self.interval.count_entities()
    }
}

impl std::fmt::Display for Window {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} ({} window of #{})",
            self.interval, self.side, self.parent
        )
    }
}

/// Derives the 5' and 3' flanking windows for a fragment.
///
/// # Examples
///
/// ```
/// use fragcount::core::fragment::Set;
/// use fragcount::flank;
///
/// let set = Set::try_from_records([("chr1", 300, 599), ("chr1", 100, 199)])?;
/// let mut fragments = set.iter();
///
/// // A fragment longer than the window size.
/// let (five, three) = flank::windows(fragments.next().unwrap(), flank::Size::default())?;
/// assert_eq!((five.start(), five.end()), (300, 399));
/// assert_eq!((three.start(), three.end()), (500, 599));
///
/// // A fragment no longer than the window size: both windows cover it.
/// let (five, three) = flank::windows(fragments.next().unwrap(), flank::Size::try_new(150)?)?;
/// assert_eq!((five.start(), five.end()), (100, 199));
/// assert_eq!((three.start(), three.end()), (100, 199));
///
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
pub fn windows(fragment: &Fragment, size: Size) -> Result<(Window, Window), Error> {
    let width = size.get().min(fragment.width());

    let start = fragment.interval().start().position().get();
    let end = fragment.interval().end().position().get();

    let window = |side, from: Number, to: Number| {
        let from = Coordinate::new(fragment.contig().clone(), Strand::Positive, from);
        let to = Coordinate::new(fragment.contig().clone(), Strand::Positive, to);

        Interval::try_new(from, to)
            .map(|interval| Window {
                parent: fragment.id(),
                side,
                interval,
            })
            .map_err(|err| Error::Interval(fragment.id(), err))
    };

    let five_prime = window(Side::FivePrime, start, start + width)?;
    let three_prime = window(Side::ThreePrime, end - width, end)?;

    Ok((five_prime, three_prime))
}

//! Assignment of individual reads to fragments.
//!
//! Each read is reduced to its 5' position and looked up in an [`Index`]
//! built for the requested [`Mode`]. A read resolves to at most one fragment:
//! when its position falls within intervals belonging to more than one
//! fragment, the [`Overlap`] policy decides the outcome. Intervals belonging
//! to the _same_ fragment (the two collapsed flanking windows of a short
//! fragment) are never considered ambiguous and count once.
//!
//! A read on a contig that carries no fragments is reported as
//! [`Assignment::UnknownContig`]. Whether that aborts a count is decided by
//! the [`Strictness`] the assigner was built with.

use crate::core::fragment::Id;
use crate::core::fragment::Set;
use crate::flank;
use crate::index;
use crate::index::Index;
use crate::Alignment;

/// The counting mode.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Mode {
    /// Reads count towards the fragment that contains their 5' position.
    Inner,

    /// Reads count towards a fragment when their 5' position falls within
    /// one of its flanking windows of the given size.
    Flank(flank::Size),
}

impl std::fmt::Display for Mode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Mode::Inner => write!(f, "inner"),
            Mode::Flank(size) => write!(f, "flank ({size} bp)"),
        }
    }
}

/// The policy for a position that falls within more than one fragment.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub enum Overlap {
    /// The fragment with the lowest identifier wins.
    #[default]
    Lowest,

    /// The read is left unassigned.
    Discard,
}

/// The policy for reads and declared contigs that no fragment is located on.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub enum Strictness {
    /// Unknown contigs are an error.
    #[default]
    Strict,

    /// Reads on unknown contigs are counted in the summary and otherwise
    /// ignored.
    Lenient,
}

/// The outcome of assigning a single read.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Assignment {
    /// The read counts towards the fragment.
    Assigned(Id),

    /// The read aligned to a contig that no fragment is located on.
    UnknownContig,

    /// The read was marked as a duplicate.
    Duplicate,

    /// The read did not fall within any fragment.
    NoFeatures,

    /// The read fell within more than one fragment and was discarded.
    Ambiguous,
}

/// Assigns reads to fragments.
///
/// An [`Assigner`] holds no per-read state, so a single instance can be
/// shared across threads while samples are counted concurrently.
#[derive(Debug)]
pub struct Assigner {
    /// The index for the mode.
    index: Index,

    /// The counting mode.
    mode: Mode,

    /// The overlap policy.
    overlap: Overlap,

    /// The unknown contig policy.
    strictness: Strictness,

    /// The number of fragments in the indexed set.
    fragments: usize,
}

impl Assigner {
    /// Creates a new [`Assigner`] by indexing the fragment set for the mode.
    ///
    /// # Examples
    ///
    /// ```
    /// use fragcount::assign::Assigner;
    /// use fragcount::assign::Assignment;
    /// use fragcount::assign::Mode;
    /// use fragcount::assign::Overlap;
    /// use fragcount::assign::Strictness;
    /// use fragcount::core::fragment::Set;
    /// use fragcount::Alignment;
    /// use omics::coordinate::Strand;
    ///
    /// let set = Set::try_from_records([("chr1", 100, 199)])?;
    /// let assigner = Assigner::try_new(&set, Mode::Inner, Overlap::Lowest, Strictness::Strict)?;
    /// assert_eq!(assigner.fragments(), 1);
    ///
    /// let alignment = Alignment::new("chr1", 150, Strand::Positive, false);
    /// assert!(matches!(assigner.assign(&alignment), Assignment::Assigned(_)));
    ///
    /// let alignment = Alignment::new("chrM", 150, Strand::Positive, false);
    /// assert_eq!(assigner.assign(&alignment), Assignment::UnknownContig);
    ///
    /// # Ok::<(), Box<dyn std::error::Error>>(())
    /// ```
    pub fn try_new(
        fragments: &Set,
        mode: Mode,
        overlap: Overlap,
        strictness: Strictness,
    ) -> Result<Self, flank::Error> {
        let index = index::Builder.build_from(fragments, &mode)?;

        Ok(Self {
            index,
            mode,
            overlap,
            strictness,
            fragments: fragments.len(),
        })
    }

    /// Gets the counting mode.
    pub fn mode(&self) -> Mode {
        self.mode
    }

    /// Gets the overlap policy.
    pub fn overlap(&self) -> Overlap {
        self.overlap
    }

    /// Gets the unknown contig policy.
    pub fn strictness(&self) -> Strictness {
        self.strictness
    }

    /// Gets the number of fragments that reads are assigned to.
    pub fn fragments(&self) -> usize {
        self.fragments
    }

    /// Gets the underlying index by reference.
    pub fn index(&self) -> &Index {
        &self.index
    }

    /// Assigns a read.
    pub fn assign(&self, alignment: &Alignment) -> Assignment {
        if !self.index.contains_contig(alignment.contig()) {
            return Assignment::UnknownContig;
        }

        if alignment.is_duplicate() {
            return Assignment::Duplicate;
        }

        let mut lowest: Option<Id> = None;
        let mut ambiguous = false;

        for id in self.index.find(alignment.contig(), alignment.position()) {
            match lowest {
                None => lowest = Some(id),
                Some(current) if current == id => {}
                Some(current) => {
                    ambiguous = true;
                    lowest = Some(current.min(id));
                }
            }
        }

        match (lowest, ambiguous, self.overlap) {
            (None, _, _) => Assignment::NoFeatures,
            (Some(_), true, Overlap::Discard) => Assignment::Ambiguous,
            (Some(id), _, _) => Assignment::Assigned(id),
        }
    }
}

#[cfg(test)]
mod tests {
    use omics::coordinate::position::Number;
    use omics::coordinate::Strand;

    use super::*;

    fn read(position: Number) -> Alignment {
        Alignment::new("chr1", position, Strand::Positive, false)
    }

    fn build(set: &Set, mode: Mode, overlap: Overlap) -> Assigner {
        Assigner::try_new(set, mode, overlap, Strictness::Strict).unwrap()
    }

    fn assigned(id: usize) -> Assignment {
        Assignment::Assigned(Id::from_index(id - 1))
    }

    #[test]
    fn test_duplicates_are_never_assigned() -> Result<(), Box<dyn std::error::Error>> {
        let set = Set::try_from_records([("chr1", 100, 199)])?;

        for mode in [Mode::Inner, Mode::Flank(flank::Size::default())] {
            let assigner = build(&set, mode, Overlap::Lowest);
            let duplicate = Alignment::new("chr1", 150, Strand::Negative, true);
            assert_eq!(assigner.assign(&duplicate), Assignment::Duplicate);
        }

        Ok(())
    }

    #[test]
    fn test_inner_mode() -> Result<(), Box<dyn std::error::Error>> {
        let set = Set::try_from_records([("chr1", 100, 199), ("chr1", 300, 599)])?;
        let assigner = build(&set, Mode::Inner, Overlap::Lowest);

        assert_eq!(assigner.assign(&read(110)), assigned(1));
        assert_eq!(assigner.assign(&read(450)), assigned(2));
        assert_eq!(assigner.assign(&read(250)), Assignment::NoFeatures);

        Ok(())
    }

    #[test]
    fn test_reads_on_unknown_contigs() -> Result<(), Box<dyn std::error::Error>> {
        let set = Set::try_from_records([("chr1", 100, 199), ("chr2", 100, 199)])?;

        for mode in [Mode::Inner, Mode::Flank(flank::Size::default())] {
            let assigner = build(&set, mode, Overlap::Lowest);

            let elsewhere = Alignment::new("chrM", 150, Strand::Positive, false);
            assert_eq!(assigner.assign(&elsewhere), Assignment::UnknownContig);

            // The contig is checked before the duplicate flag.
            let duplicate = Alignment::new("chrM", 150, Strand::Positive, true);
            assert_eq!(assigner.assign(&duplicate), Assignment::UnknownContig);

            // A known contig with no fragment at the position is not unknown.
            let gap = Alignment::new("chr2", 250, Strand::Positive, false);
            assert_eq!(assigner.assign(&gap), Assignment::NoFeatures);
        }

        Ok(())
    }

    #[test]
    fn test_reverse_strand_uses_five_prime_end() -> Result<(), Box<dyn std::error::Error>> {
        let set = Set::try_from_records([("chr1", 100, 199), ("chr1", 200, 299)])?;
        let assigner = build(&set, Mode::Inner, Overlap::Lowest);

        // Spans both fragments; the 5' end decides.
        let forward = Alignment::from_span("chr1", 180, 229, Strand::Positive, false);
        let reverse = Alignment::from_span("chr1", 180, 229, Strand::Negative, false);

        assert_eq!(assigner.assign(&forward), assigned(1));
        assert_eq!(assigner.assign(&reverse), assigned(2));

        Ok(())
    }

    #[test]
    fn test_overlapping_fragments_lowest_wins() -> Result<(), Box<dyn std::error::Error>> {
        // Deliberately listed out of positional order: the identifier, not the
        // coordinate, breaks the tie.
        let set = Set::try_from_records([("chr1", 150, 299), ("chr1", 100, 199)])?;
        let assigner = build(&set, Mode::Inner, Overlap::Lowest);

        assert_eq!(assigner.assign(&read(160)), assigned(1));
        assert_eq!(assigner.assign(&read(120)), assigned(2));

        let assigner = build(&set, Mode::Inner, Overlap::Discard);
        assert_eq!(assigner.assign(&read(160)), Assignment::Ambiguous);
        assert_eq!(assigner.assign(&read(120)), assigned(2));

        Ok(())
    }

    #[test]
    fn test_collapsed_windows_are_not_ambiguous() -> Result<(), Box<dyn std::error::Error>> {
        let set = Set::try_from_records([("chr1", 100, 199)])?;
        let assigner = build(&set, Mode::Flank(flank::Size::default()), Overlap::Discard);

        for position in [100, 110, 150, 190, 199] {
            assert_eq!(assigner.assign(&read(position)), assigned(1));
        }

        Ok(())
    }

    #[test]
    fn test_flank_windows_of_different_fragments() -> Result<(), Box<dyn std::error::Error>> {
        // The 3' window of the first fragment ([151, 250]) overlaps the 5'
        // window of the second ([201, 300]) because the fragments overlap.
        let set = Set::try_from_records([("chr1", 1, 250), ("chr1", 201, 500)])?;
        let size = flank::Size::default();

        let assigner = build(&set, Mode::Flank(size), Overlap::Lowest);
        assert_eq!(assigner.assign(&read(220)), assigned(1));
        assert_eq!(assigner.assign(&read(260)), assigned(2));
        assert_eq!(assigner.assign(&read(350)), Assignment::NoFeatures);

        let assigner = build(&set, Mode::Flank(size), Overlap::Discard);
        assert_eq!(assigner.assign(&read(220)), Assignment::Ambiguous);

        Ok(())
    }
}

//! Aligned reads as seen by the counting engine.

use omics::coordinate::position::Number;
use omics::coordinate::Contig;
use omics::coordinate::Strand;

/// An aligned read reduced to what is needed to assign it to a fragment.
///
/// The position held is always the 5' end of the alignment: the leftmost
/// aligned base for reads on the positive strand and the rightmost aligned
/// base for reads on the negative strand.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Alignment {
    /// The contig the read aligned to.
    contig: Contig,

    /// The 1-based position of the 5' end of the alignment.
    position: Number,

    /// The strand the read aligned to.
    strand: Strand,

    /// Whether or not the read was marked as a duplicate.
    duplicate: bool,
}

impl Alignment {
    /// Creates a new [`Alignment`] from an already-resolved 5' position.
    ///
    /// # Examples
    ///
    /// ```
    /// use fragcount::Alignment;
    /// use omics::coordinate::Strand;
    ///
    /// let alignment = Alignment::new("chr1", 110, Strand::Positive, false);
    /// assert_eq!(alignment.contig().as_str(), "chr1");
    /// assert_eq!(alignment.position(), 110);
    /// assert!(!alignment.is_duplicate());
    /// ```
    pub fn new(
        contig: impl Into<Contig>,
        position: Number,
        strand: Strand,
        duplicate: bool,
    ) -> Self {
        Self {
            contig: contig.into(),
            position,
            strand,
            duplicate,
        }
    }

    /// Creates a new [`Alignment`] from the 1-based, fully-closed span of
    /// reference bases the read aligned to.
    ///
    /// # Examples
    ///
    /// ```
    /// use fragcount::Alignment;
    /// use omics::coordinate::Strand;
    ///
    /// let forward = Alignment::from_span("chr1", 100, 149, Strand::Positive, false);
    /// assert_eq!(forward.position(), 100);
    ///
    /// let reverse = Alignment::from_span("chr1", 100, 149, Strand::Negative, false);
    /// assert_eq!(reverse.position(), 149);
    /// ```
    pub fn from_span(
        contig: impl Into<Contig>,
        start: Number,
        end: Number,
        strand: Strand,
        duplicate: bool,
    ) -> Self {
        let position = match strand {
            Strand::Positive => start,
            Strand::Negative => end,
        };

        Self::new(contig, position, strand, duplicate)
    }

    /// Gets the contig.
    pub fn contig(&self) -> &Contig {
        &self.contig
    }

    /// Gets the 1-based position of the 5' end.
    pub fn position(&self) -> Number {
        self.position
    }

    /// Gets the strand.
    pub fn strand(&self) -> Strand {
        self.strand
    }

    /// Returns whether or not the read was marked as a duplicate.
    pub fn is_duplicate(&self) -> bool {
        self.duplicate
    }
}

impl std::fmt::Display for Alignment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}:{}:{}",
            self.contig.as_str(),
            self.strand,
            self.position
        )?;

        if self.duplicate {
            write!(f, " (duplicate)")?;
        }

        Ok(())
    }
}

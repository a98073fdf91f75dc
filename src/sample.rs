//! Samples: labelled, single-pass streams of alignments.

use std::io;

use omics::coordinate::Contig;

use crate::Alignment;

/// A labelled stream of alignments for one sample.
///
/// The stream is consumed exactly once. A sample may optionally declare the
/// contigs its reads can be aligned to (e.g., from a BAM header). When it
/// does, the declared contigs are checked against the contigs of the fragment
/// set before any counting begins.
#[derive(Debug)]
pub struct Sample<I> {
    /// The label of the sample.
    label: String,

    /// The contigs declared by the sample, if known.
    contigs: Option<Vec<Contig>>,

    /// The alignments.
    alignments: I,
}

impl<I> Sample<I>
where
    I: Iterator<Item = io::Result<Alignment>>,
{
    /// Creates a new [`Sample`].
    ///
    /// # Examples
    ///
    /// ```
    /// use fragcount::Alignment;
    /// use fragcount::Sample;
    /// use omics::coordinate::Strand;
    ///
    /// let alignments = vec![Ok(Alignment::new("chr1", 110, Strand::Positive, false))];
    /// let sample = Sample::new("wt", alignments.into_iter());
    ///
    /// assert_eq!(sample.label(), "wt");
    /// assert!(sample.contigs().is_none());
    /// ```
    pub fn new(label: impl Into<String>, alignments: I) -> Self {
        Self {
            label: label.into(),
            contigs: None,
            alignments,
        }
    }

    /// Sets the contigs declared by the sample.
    ///
    /// # Examples
    ///
    /// ```
    /// use std::io;
    ///
    /// use fragcount::Alignment;
    /// use fragcount::Sample;
    ///
    /// let sample = Sample::new("wt", std::iter::empty::<io::Result<Alignment>>())
    ///     .with_contigs(["chr1", "chr2"]);
    ///
    /// let contigs = sample.contigs().unwrap();
    /// assert_eq!(contigs.len(), 2);
    /// assert_eq!(contigs[0].as_str(), "chr1");
    /// ```
    pub fn with_contigs<C, T>(mut self, contigs: C) -> Self
    where
        C: IntoIterator<Item = T>,
        T: Into<Contig>,
    {
        self.contigs = Some(contigs.into_iter().map(Into::into).collect());
        self
    }

    /// Gets the label.
    pub fn label(&self) -> &str {
        &self.label
    }

    /// Gets the declared contigs, if known.
    pub fn contigs(&self) -> Option<&[Contig]> {
        self.contigs.as_deref()
    }

    /// Consumes `self` and returns the label and the alignments.
    pub fn into_parts(self) -> (String, I) {
        (self.label, self.alignments)
    }
}

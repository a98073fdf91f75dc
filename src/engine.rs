//! Counting reads for many samples over a shared fragment index.
//!
//! An [`Engine`] is built once per run from a fragment set and a counting
//! mode. Each sample is then counted independently against the same
//! read-only index (in parallel, one worker per sample) and the resulting
//! columns are stacked into a [`Matrix`] in the order the samples were
//! provided.

use std::collections::HashSet;
use std::io;

use omics::coordinate::Contig;
use rayon::prelude::*;
use tracing::info;

use crate::assign::Assigner;
use crate::assign::Mode;
use crate::assign::Overlap;
use crate::assign::Strictness;
use crate::core::fragment::Set;
use crate::count;
use crate::count::matrix;
use crate::count::Counts;
use crate::count::Matrix;
use crate::Alignment;
use crate::Sample;

pub mod builder;

pub use builder::Builder;

////////////////////////////////////////////////////////////////////////////////////////
// Errors
////////////////////////////////////////////////////////////////////////////////////////

/// An error related to an [`Engine`].
#[derive(Debug)]
pub enum Error {
    /// More than one sample shared a label.
    DuplicateLabel(String),

    /// A fragment is located on a contig the sample does not declare.
    ///
    /// The values are the sample label and the contig.
    UndeclaredContig(String, Contig),

    /// A sample declares a contig that no fragment is located on.
    ///
    /// The values are the sample label and the contig.
    UnknownContig(String, Contig),

    /// A sample could not be counted.
    Count(String, count::Error),

    /// The counts could not be assembled into a matrix.
    Matrix(matrix::Error),
}

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Error::DuplicateLabel(label) => write!(f, "duplicate sample label: `{label}`"),
            Error::UndeclaredContig(label, contig) => write!(
                f,
                "sample `{label}` does not declare contig `{}`, which fragments are located on",
                contig.as_str()
            ),
            Error::UnknownContig(label, contig) => write!(
                f,
                "sample `{label}` declares contig `{}`, which no fragment is located on",
                contig.as_str()
            ),
            Error::Count(label, err) => write!(f, "sample `{label}`: {err}"),
            Error::Matrix(err) => write!(f, "matrix error: {err}"),
        }
    }
}

impl std::error::Error for Error {}

/// A [`Result`](std::result::Result) with an [`Error`].
type Result<T> = std::result::Result<T, Error>;

////////////////////////////////////////////////////////////////////////////////////////
// Engine
////////////////////////////////////////////////////////////////////////////////////////

/// Counts reads over fragments for a set of samples.
///
/// Generally, you will want to use a [`builder::Builder`] to construct one of
/// these.
#[derive(Debug)]
pub struct Engine {
    /// The fragments.
    fragments: Set,

    /// The assigner for the counting mode.
    assigner: Assigner,
}

impl Engine {
    /// Gets the fragments by reference.
    pub fn fragments(&self) -> &Set {
        &self.fragments
    }

    /// Gets the counting mode.
    pub fn mode(&self) -> Mode {
        self.assigner.mode()
    }

    /// Gets the overlap policy.
    pub fn overlap(&self) -> Overlap {
        self.assigner.overlap()
    }

    /// Gets the unknown contig policy.
    pub fn strictness(&self) -> Strictness {
        self.assigner.strictness()
    }

    /// Counts a single sample.
    pub fn count_sample<I>(&self, sample: Sample<I>) -> Result<(String, Counts)>
    where
        I: Iterator<Item = io::Result<Alignment>>,
    {
        let (label, alignments) = sample.into_parts();
        info!("{label}: counting alignments ({} mode)", self.mode());

        let counts = count::tally(&self.assigner, alignments)
            .map_err(|err| Error::Count(label.clone(), err))?;

        let summary = counts.summary();
        info!(
            "{label}: assigned {} of {} alignments ({} duplicate, {} without a fragment, {} \
             ambiguous, {} on unknown contigs)",
            summary.assigned,
            summary.total,
            summary.duplicate,
            summary.no_features,
            summary.ambiguous,
            summary.unknown_contig
        );

        Ok((label, counts))
    }

    /// Counts every sample and stacks the results into a [`Matrix`].
    ///
    /// All samples are checked before counting begins. Labels must always be
    /// unique. Under [`Strictness::Strict`], a sample that declares its contigs
    /// must declare exactly the contigs that fragments are located on, and any
    /// read on another contig fails its sample. Samples are counted in
    /// parallel, and the first failure aborts the whole run.
    ///
    /// # Examples
    ///
    /// ```
    /// use fragcount::assign::Mode;
    /// use fragcount::core::fragment::Set;
    /// use fragcount::engine;
    /// use fragcount::flank;
    /// use fragcount::Alignment;
    /// use fragcount::Sample;
    /// use omics::coordinate::Strand;
    ///
    /// let set = Set::try_from_records([("chr1", 100, 199), ("chr1", 300, 599)])?;
    /// let engine = engine::Builder::default()
    ///     .mode(Mode::Flank(flank::Size::default()))?
    ///     .try_build_from(set)?;
    ///
    /// let reads = |positions: Vec<u64>| {
    ///     positions
    ///         .into_iter()
    ///         .map(|position| Ok(Alignment::new("chr1", position, Strand::Positive, false)))
    /// };
    ///
    /// let matrix = engine.count(vec![
    ///     Sample::new("a", reads(vec![110, 150, 190, 310, 450, 520])),
    ///     Sample::new("b", reads(vec![])),
    /// ])?;
    ///
    /// assert_eq!(matrix.column(0), Some(&[3, 2][..]));
    /// assert_eq!(matrix.column(1), Some(&[0, 0][..]));
    ///
    /// # Ok::<(), Box<dyn std::error::Error>>(())
    /// ```
    pub fn count<I>(&self, samples: Vec<Sample<I>>) -> Result<Matrix>
    where
        I: Iterator<Item = io::Result<Alignment>> + Send,
    {
        self.validate(&samples)?;

        let columns = samples
            .into_par_iter()
            .map(|sample| self.count_sample(sample))
            .collect::<Result<Vec<_>>>()?;

        Matrix::try_from_columns(self.fragments.clone(), columns).map_err(Error::Matrix)
    }

    /// Checks a set of samples before any counting begins.
    fn validate<I>(&self, samples: &[Sample<I>]) -> Result<()>
    where
        I: Iterator<Item = io::Result<Alignment>>,
    {
        let mut labels = HashSet::new();
        let fragment_contigs = self.fragments.contigs();
        let known = fragment_contigs.iter().copied().collect::<HashSet<_>>();

        for sample in samples {
            if !labels.insert(sample.label()) {
                return Err(Error::DuplicateLabel(sample.label().to_string()));
            }

            if self.strictness() == Strictness::Lenient {
                continue;
            }

            if let Some(contigs) = sample.contigs() {
                if let Some(unknown) = contigs.iter().find(|contig| !known.contains(contig)) {
                    return Err(Error::UnknownContig(
                        sample.label().to_string(),
                        unknown.clone(),
                    ));
                }

                let declared = contigs.iter().collect::<HashSet<_>>();

                if let Some(missing) = fragment_contigs
                    .iter()
                    .find(|contig| !declared.contains(*contig))
                {
                    return Err(Error::UndeclaredContig(
                        sample.label().to_string(),
                        (*missing).clone(),
                    ));
                }
            }
        }

        Ok(())
    }
}

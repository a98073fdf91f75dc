//! A builder for an [`Engine`].

use tracing::debug;

use crate::assign::Assigner;
use crate::assign::Mode;
use crate::assign::Overlap;
use crate::assign::Strictness;
use crate::core::fragment::Set;
use crate::engine::Engine;
use crate::flank;

/// An error that occurs when a required field was never provided to the
/// [`Builder`].
#[derive(Debug, Eq, PartialEq)]
pub enum MissingError {
    /// No counting mode was provided to the [`Builder`].
    Mode,
}

impl std::fmt::Display for MissingError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MissingError::Mode => write!(f, "mode"),
        }
    }
}

impl std::error::Error for MissingError {}

/// An error that occurs when a singular field was provided multiple times to
/// the [`Builder`].
#[derive(Debug, Eq, PartialEq)]
pub enum MultipleError {
    /// The mode field was provided multiple times to the [`Builder`].
    Mode,

    /// The overlap field was provided multiple times to the [`Builder`].
    Overlap,

    /// The strictness field was provided multiple times to the [`Builder`].
    Strictness,
}

impl std::fmt::Display for MultipleError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MultipleError::Mode => write!(f, "mode"),
            MultipleError::Overlap => write!(f, "overlap"),
            MultipleError::Strictness => write!(f, "strictness"),
        }
    }
}

impl std::error::Error for MultipleError {}

/// An error related to a [`Builder`].
#[derive(Debug)]
pub enum Error {
    /// An error where a required field was never provided to the [`Builder`].
    Missing(MissingError),

    /// An error where a singular field was provided to the [`Builder`] more
    /// than once.
    Multiple(MultipleError),

    /// The fragments could not be indexed for the mode.
    Index(flank::Error),
}

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Error::Missing(err) => write!(f, "missing required field: {err}"),
            Error::Multiple(err) => write!(f, "singular field set multiple times: {err}"),
            Error::Index(err) => write!(f, "index error: {err}"),
        }
    }
}

impl std::error::Error for Error {}

/// A [`Result`](std::result::Result) with an [`Error`].
type Result<T> = std::result::Result<T, Error>;

/// A builder for an [`Engine`].
///
/// The counting mode has no default and must always be provided. The overlap
/// policy defaults to [`Overlap::Lowest`] and the unknown contig policy
/// defaults to [`Strictness::Strict`].
#[derive(Debug, Default)]
pub struct Builder {
    /// The counting mode.
    mode: Option<Mode>,

    /// The overlap policy.
    overlap: Option<Overlap>,

    /// The unknown contig policy.
    strictness: Option<Strictness>,
}

impl Builder {
    /// Sets the counting mode for the [`Builder`].
    ///
    /// # Examples
    ///
    /// ```
    /// use fragcount::assign::Mode;
    /// use fragcount::engine::Builder;
    ///
    /// let builder = Builder::default().mode(Mode::Inner)?;
    ///
    /// # Ok::<(), Box<dyn std::error::Error>>(())
    /// ```
    pub fn mode(mut self, mode: Mode) -> Result<Self> {
        if self.mode.is_some() {
            return Err(Error::Multiple(MultipleError::Mode));
        }

        self.mode = Some(mode);
        Ok(self)
    }

    /// Sets the overlap policy for the [`Builder`].
    ///
    /// # Examples
    ///
    /// ```
    /// use fragcount::assign::Overlap;
    /// use fragcount::engine::Builder;
    ///
    /// let builder = Builder::default().overlap(Overlap::Discard)?;
    ///
    /// # Ok::<(), Box<dyn std::error::Error>>(())
    /// ```
    pub fn overlap(mut self, overlap: Overlap) -> Result<Self> {
        if self.overlap.is_some() {
            return Err(Error::Multiple(MultipleError::Overlap));
        }

        self.overlap = Some(overlap);
        Ok(self)
    }

    /// Sets the unknown contig policy for the [`Builder`].
    ///
    /// # Examples
    ///
    /// ```
    /// use fragcount::assign::Strictness;
    /// use fragcount::engine::Builder;
    ///
    /// let builder = Builder::default().strictness(Strictness::Lenient)?;
    ///
    /// # Ok::<(), Box<dyn std::error::Error>>(())
    /// ```
    pub fn strictness(mut self, strictness: Strictness) -> Result<Self> {
        if self.strictness.is_some() {
            return Err(Error::Multiple(MultipleError::Strictness));
        }

        self.strictness = Some(strictness);
        Ok(self)
    }

    /// Consumes `self` to attempt to build an [`Engine`] over a fragment set.
    ///
    /// # Examples
    ///
    /// ```
    /// use fragcount::assign::Mode;
    /// use fragcount::core::fragment::Set;
    /// use fragcount::engine::Builder;
    /// use fragcount::flank;
    ///
    /// let set = Set::try_from_records([("chr1", 100, 199)])?;
    ///
    /// let engine = Builder::default()
    ///     .mode(Mode::Flank(flank::Size::default()))?
    ///     .try_build_from(set.clone())?;
    /// assert_eq!(engine.fragments().len(), 1);
    ///
    /// assert!(Builder::default().try_build_from(set).is_err());
    ///
    /// # Ok::<(), Box<dyn std::error::Error>>(())
    /// ```
    pub fn try_build_from(self, fragments: Set) -> Result<Engine> {
        let mode = self.mode.ok_or(Error::Missing(MissingError::Mode))?;
        let overlap = self.overlap.unwrap_or_default();
        let strictness = self.strictness.unwrap_or_default();

        let assigner =
            Assigner::try_new(&fragments, mode, overlap, strictness).map_err(Error::Index)?;
        debug!(
            "engine: indexed {} fragments as {} intervals ({mode} mode)",
            fragments.len(),
            assigner.index().len()
        );

        Ok(Engine {
            fragments,
            assigner,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mode_is_required() -> std::result::Result<(), Box<dyn std::error::Error>> {
        let set = Set::try_from_records([("chr1", 100, 199)])?;
        let err = Builder::default().try_build_from(set).unwrap_err();

        assert!(matches!(err, Error::Missing(MissingError::Mode)));
        assert_eq!(err.to_string(), "missing required field: mode");

        Ok(())
    }

    #[test]
    fn test_fields_are_singular() -> std::result::Result<(), Box<dyn std::error::Error>> {
        let err = Builder::default()
            .mode(Mode::Inner)?
            .mode(Mode::Inner)
            .unwrap_err();
        assert!(matches!(err, Error::Multiple(MultipleError::Mode)));

        let err = Builder::default()
            .overlap(Overlap::Lowest)?
            .overlap(Overlap::Discard)
            .unwrap_err();
        assert!(matches!(err, Error::Multiple(MultipleError::Overlap)));

        let err = Builder::default()
            .strictness(Strictness::Strict)?
            .strictness(Strictness::Lenient)
            .unwrap_err();
        assert!(matches!(err, Error::Multiple(MultipleError::Strictness)));

        Ok(())
    }

    #[test]
    fn test_policy_defaults() -> std::result::Result<(), Box<dyn std::error::Error>> {
        let set = Set::try_from_records([("chr1", 100, 199)])?;
        let engine = Builder::default().mode(Mode::Inner)?.try_build_from(set)?;

        assert_eq!(engine.overlap(), Overlap::Lowest);
        assert_eq!(engine.strictness(), Strictness::Strict);
        assert_eq!(engine.mode(), Mode::Inner);

        Ok(())
    }
}

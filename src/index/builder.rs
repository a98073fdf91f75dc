//! A builder for an [`Index`].

use std::collections::HashMap;

use omics::coordinate::interval::interbase::Interval;
use omics::coordinate::position::Number;
use omics::coordinate::Contig;
use rust_lapper as lapper;
use tracing::debug;

use crate::assign::Mode;
use crate::core::fragment::Id;
use crate::core::fragment::Set;
use crate::flank;
use crate::index::Index;

/// The inner value of the lookup data structure.
type Iv = lapper::Interval<Number, Id>;

/// Converts an interbase interval into a lookup interval.
///
/// Both are half-open, so the positions carry over unchanged.
fn lookup(interval: &Interval, id: Id) -> Iv {
    lapper::Interval {
        start: interval.start().position().get(),
        stop: interval.end().position().get(),
        val: id,
    }
}

/// A builder for an [`Index`].
#[derive(Debug, Default)]
pub struct Builder;

impl Builder {
    /// Builds an [`Index`] over a fragment set for a counting mode.
    ///
    /// For [`Mode::Inner`], each fragment is indexed as-is. For
    /// [`Mode::Flank`], the 5' and 3' windows of each fragment are indexed
    /// instead, each tagged with the identifier of its parent fragment.
    ///
    /// # Examples
    ///
    /// ```
    /// use fragcount::assign::Mode;
    /// use fragcount::core::fragment::Set;
    /// use fragcount::flank;
    /// use fragcount::index;
    /// use omics::coordinate::Contig;
    ///
    /// let set = Set::try_from_records([("chr1", 300, 599)])?;
    /// let index = index::Builder.build_from(&set, &Mode::Flank(flank::Size::default()))?;
    ///
    /// let chr1 = Contig::from("chr1");
    /// assert_eq!(index.query(&chr1, 310).len(), 1);
    /// assert!(index.query(&chr1, 450).is_empty());
    ///
    /// # Ok::<(), Box<dyn std::error::Error>>(())
    /// ```
    pub fn build_from(&self, fragments: &Set, mode: &Mode) -> Result<Index, flank::Error> {
        let mut hm = HashMap::<Contig, Vec<Iv>>::default();

        for fragment in fragments.iter() {
            let entry = hm.entry(fragment.contig().clone()).or_default();

            match mode {
                Mode::Inner => entry.push(lookup(fragment.interval(), fragment.id())),
                Mode::Flank(size) => {
                    let (five_prime, three_prime) = flank::windows(fragment, *size)?;

                    for window in [five_prime, three_prime] {
                        entry.push(lookup(window.interval(), window.parent()));
                    }
                }
            }
        }

        let mut inner = HashMap::<Contig, lapper::Lapper<Number, Id>>::new();

        for (k, v) in hm.into_iter() {
            debug!("index: {} intervals on `{}`", v.len(), k.as_str());
            inner.insert(k, lapper::Lapper::new(v));
        }

        Ok(Index { inner })
    }
}

//! A per-contig interval index over fragments (or their flanking windows).

use std::collections::HashMap;

use omics::coordinate::position::Number;
use omics::coordinate::Contig;
use rust_lapper as lapper;

use crate::core::fragment::Id;

pub mod builder;

pub use builder::Builder;

/// A queryable index answering which targets contain a position.
///
/// Every indexed interval carries the identifier of the fragment it counts
/// towards. For flanking windows, that is the parent fragment, so both
/// windows of a fragment resolve to the same identifier.
///
/// Generally, you will want to use a [`builder::Builder`] to construct one of
/// these.
#[derive(Debug)]
pub struct Index {
    /// The inner lookup table of intervals for each contig.
    ///
    /// Intervals are stored in interbase coordinates, so the 1-based base `p`
    /// is the half-open range `[p - 1, p)`.
    inner: HashMap<Contig, lapper::Lapper<Number, Id>>,
}

impl Index {
    /// Returns an iterator over the identifiers of every indexed interval
    /// containing `position` on `contig`.
    ///
    /// The same identifier may be yielded more than once when multiple
    /// intervals that belong to it contain the position. No particular order
    /// is guaranteed. Position `0` is not a 1-based position and is never
    /// contained by anything.
    pub fn find<'a>(&'a self, contig: &Contig, position: Number) -> impl Iterator<Item = Id> + 'a {
        let entry = position
            .checked_sub(1)
            .and_then(|start| self.inner.get(contig).map(|intervals| (start, intervals)));

        entry.into_iter().flat_map(move |(start, intervals)| {
            intervals
                .find(start, position)
                .map(|interval| interval.val)
        })
    }

    /// Gets the distinct identifiers of every target containing `position`
    /// on `contig` in ascending order.
    ///
    /// # Examples
    ///
    /// ```
    /// use fragcount::assign::Mode;
    /// use fragcount::core::fragment::Set;
    /// use fragcount::index;
    /// use omics::coordinate::Contig;
    ///
    /// let set = Set::try_from_records([("chr1", 100, 199), ("chr1", 150, 299)])?;
    /// let index = index::Builder.build_from(&set, &Mode::Inner)?;
    ///
    /// let chr1 = Contig::from("chr1");
    /// let ids = |position| {
    ///     index
    ///         .query(&chr1, position)
    ///         .into_iter()
    ///         .map(|id| id.get())
    ///         .collect::<Vec<_>>()
    /// };
    ///
    /// assert_eq!(ids(120), vec![1]);
    /// assert_eq!(ids(160), vec![1, 2]);
    /// assert_eq!(ids(300), Vec::<usize>::new());
    /// assert!(index.query(&Contig::from("chr2"), 160).is_empty());
    ///
    /// # Ok::<(), Box<dyn std::error::Error>>(())
    /// ```
    pub fn query(&self, contig: &Contig, position: Number) -> Vec<Id> {
        let mut ids = self.find(contig, position).collect::<Vec<_>>();
        ids.sort_unstable();
        ids.dedup();
        ids
    }

    /// Returns whether or not any interval is indexed on `contig`.
    pub fn contains_contig(&self, contig: &Contig) -> bool {
        self.inner.contains_key(contig)
    }

    /// Gets the total number of indexed intervals.
    pub fn len(&self) -> usize {
        self.inner.values().map(|intervals| intervals.len()).sum()
    }

    /// Returns whether or not the index holds no intervals.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assign::Mode;
    use crate::core::fragment::Set;
    use crate::flank;

    fn ids(index: &Index, contig: &str, position: Number) -> Vec<usize> {
        index
            .query(&Contig::from(contig), position)
            .into_iter()
            .map(|id| id.get())
            .collect()
    }

    #[test]
    fn test_inner_bounds_are_inclusive() -> Result<(), Box<dyn std::error::Error>> {
        let set = Set::try_from_records([("chr1", 100, 199), ("chr1", 300, 599)])?;
        let index = Builder.build_from(&set, &Mode::Inner)?;

        assert_eq!(index.len(), 2);
        assert!(ids(&index, "chr1", 99).is_empty());
        assert_eq!(ids(&index, "chr1", 100), vec![1]);
        assert_eq!(ids(&index, "chr1", 199), vec![1]);
        assert!(ids(&index, "chr1", 200).is_empty());
        assert_eq!(ids(&index, "chr1", 450), vec![2]);
        assert_eq!(ids(&index, "chr1", 599), vec![2]);

        Ok(())
    }

    #[test]
    fn test_contigs_are_scoped() -> Result<(), Box<dyn std::error::Error>> {
        let set = Set::try_from_records([("chr1", 100, 199), ("chr2", 100, 199)])?;
        let index = Builder.build_from(&set, &Mode::Inner)?;

        assert_eq!(ids(&index, "chr1", 150), vec![1]);
        assert_eq!(ids(&index, "chr2", 150), vec![2]);
        assert!(ids(&index, "chr3", 150).is_empty());
        assert!(index.contains_contig(&Contig::from("chr2")));
        assert!(!index.contains_contig(&Contig::from("chr3")));

        Ok(())
    }

    #[test]
    fn test_flank_windows_resolve_to_parent() -> Result<(), Box<dyn std::error::Error>> {
        let set = Set::try_from_records([("chr1", 100, 199), ("chr1", 300, 599)])?;
        let index = Builder.build_from(&set, &Mode::Flank(flank::Size::default()))?;

        // Two windows per fragment, even when they collapse.
        assert_eq!(index.len(), 4);

        // Collapsed windows both contain the position but share a parent.
        assert_eq!(index.find(&Contig::from("chr1"), 150).count(), 2);
        assert_eq!(ids(&index, "chr1", 150), vec![1]);

        assert_eq!(ids(&index, "chr1", 310), vec![2]);
        assert_eq!(ids(&index, "chr1", 399), vec![2]);
        assert!(ids(&index, "chr1", 400).is_empty());
        assert!(ids(&index, "chr1", 450).is_empty());
        assert!(ids(&index, "chr1", 499).is_empty());
        assert_eq!(ids(&index, "chr1", 500), vec![2]);

        Ok(())
    }

    #[test]
    fn test_extreme_positions() -> Result<(), Box<dyn std::error::Error>> {
        let set =
            Set::try_from_records([("chr1", 1, 10), ("chr1", Number::MAX - 9, Number::MAX)])?;

        for mode in [Mode::Inner, Mode::Flank(flank::Size::try_new(5)?)] {
            let index = Builder.build_from(&set, &mode)?;

            assert!(ids(&index, "chr1", 0).is_empty());
            assert_eq!(ids(&index, "chr1", 1), vec![1]);
            assert_eq!(ids(&index, "chr1", Number::MAX), vec![2]);
            assert_eq!(ids(&index, "chr1", Number::MAX - 9), vec![2]);
        }

        Ok(())
    }
}

//! `fragcount` is a crate for counting aligned reads over restriction
//! fragments.
//!
//! Given a set of fragments (typically the product of an in-silico digest of
//! a reference genome) and one or more samples of aligned reads, the crate
//! produces a fragment-by-sample [count matrix](crate::count::Matrix) with one
//! row for every fragment, including fragments that received no reads.
//!
//! ## Counting modes
//!
//! Reads are reduced to their 5' position (the alignment start on the forward
//! strand and the alignment end on the reverse strand) and then assigned to
//! fragments in one of two [modes](crate::assign::Mode):
//!
//! - [`Inner`](crate::assign::Mode::Inner) counts a read towards the fragment
//!   that contains its 5' position.
//! - [`Flank`](crate::assign::Mode::Flank) only counts a read when its 5'
//!   position falls within a fixed-width window at either end of a fragment.
//!   Both windows belong to the fragment, so the two ends are merged into a
//!   single count. When a fragment is shorter than twice the window size, its
//!   windows overlap and a read within both is still counted once.
//!
//! Reads marked as duplicates never contribute to a count. A read whose 5'
//! position falls within more than one fragment counts towards the fragment
//! with the lowest identifier unless the [overlap
//! policy](crate::assign::Overlap) says otherwise. A read on a contig that no
//! fragment is located on is an error unless the engine is built with
//! [`Strictness::Lenient`](crate::assign::Strictness::Lenient).
//!
//! ## Reading fragments
//!
//! Fragments are read from BED files with the [`Reader`] facility. BED records
//! are 0-based and half-open, so each one is held as an
//! [`omics::coordinate::interval::interbase::Interval`] on the positive
//! strand. Read positions are 1-based, and the base at position `p` lies
//! within a fragment when the fragment's interval spans `[p - 1, p)`. Fragment
//! identifiers are assigned in file order starting at `1`.
//!
//! ```
//! let data = b"# fragments\nchr1\t99\t199\nchr1\t299\t599\n";
//! let mut reader = fragcount::Reader::new(&data[..]);
//!
//! for fragment in reader.fragments()?.iter() {
//!     println!("{fragment}");
//! }
//!
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```
//!
//! ## Counting
//!
//! An [`Engine`] cannot be instantiated directly. Instead, you should use
//! [`engine::Builder`] and the associated
//! [`engine::Builder::try_build_from()`] method to index a fragment set for a
//! counting mode. The engine then counts any number of [`Sample`]s, each in
//! parallel, against the same index. Samples are usually opened from BAM
//! files with [`bam::open()`], but any iterator of [`Alignment`]s will do.
//!
//! ```
//! use fragcount::assign::Mode;
//! use fragcount::Alignment;
//! use fragcount::Sample;
//! use omics::coordinate::Strand;
//!
//! let data = b"chr1\t99\t199\nchr1\t299\t599\n";
//! let fragments = fragcount::Reader::new(&data[..]).fragments()?;
//!
//! let engine = fragcount::engine::Builder::default()
//!     .mode(Mode::Inner)?
//!     .try_build_from(fragments)?;
//!
//! let alignments = [110, 150, 190, 310, 520, 450]
//!     .into_iter()
//!     .map(|position| Ok(Alignment::new("chr1", position, Strand::Positive, false)));
//!
//! let matrix = engine.count(vec![Sample::new("wt", alignments)])?;
//! assert_eq!(matrix.column(0), Some(&[3, 3][..]));
//!
//! matrix.write_tsv(std::io::stdout())?;
//!
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

#![warn(missing_docs)]
#![warn(rust_2018_idioms)]
#![warn(rust_2021_compatibility)]
#![warn(missing_debug_implementations)]
#![warn(clippy::missing_docs_in_private_items)]
#![warn(rustdoc::broken_intra_doc_links)]

pub mod alignment;
pub mod assign;
pub mod bam;
pub mod core;
pub mod count;
pub mod engine;
pub mod flank;
pub mod index;
pub mod line;
pub mod reader;
pub mod sample;

pub use alignment::Alignment;
pub use engine::Engine;
pub use line::Line;
pub use sample::Sample;

pub use self::reader::Reader;

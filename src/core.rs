//! Core functionality used across the crate.

pub mod fragment;

pub use fragment::Fragment;

//! `line-sort` is a rust external merge sort implementation for line-oriented text files.
//!
//! External sorting is required when the file being sorted does not fit into the main memory (RAM)
//! of a computer and instead must reside in slower external memory, usually a hard disk drive.
//! `line-sort` sorts the lines of a file ascending by line length while keeping peak memory
//! bounded by a configurable byte threshold: a file at or under the threshold is sorted directly
//! in memory, a larger one is split at its byte midpoint (realigned to a line boundary) into two
//! temporary half files which are sorted recursively and then merged back together in a single
//! streaming pass. For more information see
//! [External Sorting](https://en.wikipedia.org/wiki/External_sorting).
//!
//! # Overview
//!
//! `line-sort` supports the following features:
//!
//! * **Bounded memory:**
//!   the size threshold is the only control over recursion depth and peak memory; only files at
//!   or under it are ever materialized in memory.
//! * **Pluggable line decoding:**
//!   lines pass through a [`LineCodec`] while a file is being split. The default
//!   [`Utf8RepairCodec`] re-interprets raw bytes as UTF-8 replacing invalid sequences, and
//!   [`PassthroughCodec`] leaves bytes untouched.
//! * **Guaranteed cleanup:**
//!   every temporary half file lives in a private workspace directory and is deleted when
//!   consumed; on failure the workspace guards reclaim whatever was left behind.
//!
//! # Example
//!
//! ```no_run
//! use std::path::Path;
//!
//! use line_sort::FileSorterBuilder;
//!
//! fn main() {
//!     let sorter: line_sort::FileSorter = FileSorterBuilder::new()
//!         .with_threshold(1024 * 1024)
//!         .build()
//!         .unwrap();
//!
//!     sorter.sort(Path::new("input.txt"), Path::new("output.txt")).unwrap();
//! }
//! ```

pub mod chunk;
pub mod codec;
pub mod merge;
pub mod sort;
pub mod split;

pub use codec::{LineCodec, PassthroughCodec, Utf8RepairCodec};
pub use sort::{FileSorter, FileSorterBuilder, SortError, DEFAULT_THRESHOLD};

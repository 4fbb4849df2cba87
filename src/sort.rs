//! Recursive external sorter.

use std::error::Error;
use std::fmt;
use std::fmt::Display;
use std::fs;
use std::io;
use std::path::Path;

use log;
use tempfile::{NamedTempFile, TempPath};

use crate::codec::{LineCodec, Utf8RepairCodec};
use crate::{chunk, merge, split};

/// Default maximum size (in bytes) of a file sorted directly in memory.
pub const DEFAULT_THRESHOLD: u64 = 1024;

/// Sorting error.
#[derive(Debug)]
pub enum SortError {
    /// Temporary workspace creation error.
    TempDir(io::Error),
    /// Temporary half-file creation error.
    TempFile(io::Error),
    /// Common I/O error.
    Io(io::Error),
}

impl Error for SortError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        Some(match &self {
            SortError::TempDir(err) => err,
            SortError::TempFile(err) => err,
            SortError::Io(err) => err,
        })
    }
}

impl Display for SortError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self {
            SortError::TempDir(err) => write!(f, "temporary workspace not created: {}", err),
            SortError::TempFile(err) => write!(f, "temporary file not created: {}", err),
            SortError::Io(err) => write!(f, "I/O operation failed: {}", err),
        }
    }
}

/// How a file of a given size is sorted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SortState {
    /// The file fits under the threshold and is sorted in memory.
    Direct,
    /// The file is split into halves that are sorted recursively and merged.
    Split,
}

impl SortState {
    fn select(file_size: u64, threshold: u64) -> Self {
        if file_size <= threshold {
            SortState::Direct
        } else {
            SortState::Split
        }
    }
}

/// File sorter builder. Provides methods for [`FileSorter`] initialization.
#[derive(Clone)]
pub struct FileSorterBuilder<C = Utf8RepairCodec>
where
    C: LineCodec,
{
    /// Maximum size of a file to be sorted directly in memory.
    threshold: u64,
    /// Directory to be used to store temporary data.
    tmp_dir: Option<Box<Path>>,
    /// Line decoding strategy applied during splitting.
    codec: C,
}

impl FileSorterBuilder {
    /// Creates an instance of a builder with default parameters.
    pub fn new() -> Self {
        FileSorterBuilder::default()
    }
}

impl<C> FileSorterBuilder<C>
where
    C: LineCodec,
{
    /// Builds a [`FileSorter`] instance using provided configuration.
    pub fn build(self) -> Result<FileSorter<C>, SortError> {
        FileSorter::new(self.threshold, self.tmp_dir.as_deref(), self.codec)
    }

    /// Sets the maximum file size (in bytes) to be sorted directly in memory.
    pub fn with_threshold(mut self, threshold: u64) -> FileSorterBuilder<C> {
        self.threshold = threshold;
        return self;
    }

    /// Sets directory to be used to store temporary data.
    pub fn with_tmp_dir(mut self, path: &Path) -> FileSorterBuilder<C> {
        self.tmp_dir = Some(path.into());
        return self;
    }

    /// Sets the line decoding strategy applied during splitting.
    pub fn with_codec<N: LineCodec>(self, codec: N) -> FileSorterBuilder<N> {
        FileSorterBuilder {
            threshold: self.threshold,
            tmp_dir: self.tmp_dir,
            codec,
        }
    }
}

impl<C> Default for FileSorterBuilder<C>
where
    C: LineCodec + Default,
{
    fn default() -> Self {
        FileSorterBuilder {
            threshold: DEFAULT_THRESHOLD,
            tmp_dir: None,
            codec: C::default(),
        }
    }
}

/// External file sorter.
///
/// Sorts the lines of a file ascending by line length while keeping peak
/// memory bounded by the size threshold: a file at or under the threshold is
/// sorted directly in memory, a larger one is split at its byte midpoint into
/// two temporary half files that are sorted recursively and then merged back
/// in a single streaming pass.
///
/// All temporary files live in a private workspace directory that is removed
/// when the sorter is dropped, so an aborted sort leaves nothing behind.
pub struct FileSorter<C = Utf8RepairCodec>
where
    C: LineCodec,
{
    /// Maximum size of a file to be sorted directly in memory.
    threshold: u64,
    /// Workspace directory holding temporary half files.
    tmp_dir: tempfile::TempDir,
    /// Line decoding strategy applied during splitting.
    codec: C,
}

impl<C> FileSorter<C>
where
    C: LineCodec,
{
    /// Creates a new file sorter instance.
    ///
    /// # Arguments
    /// * `threshold` - Maximum file size (in bytes) to be sorted directly in memory.
    /// * `tmp_path` - Directory to be used to store temporary data. If the parameter is [`None`]
    ///   the default OS temporary directory will be used.
    /// * `codec` - Line decoding strategy applied during splitting.
    pub fn new(threshold: u64, tmp_path: Option<&Path>, codec: C) -> Result<Self, SortError> {
        let tmp_dir = match tmp_path {
            Some(tmp_path) => tempfile::tempdir_in(tmp_path),
            None => tempfile::tempdir(),
        }
        .map_err(SortError::TempDir)?;

        log::info!("using {} as a temporary workspace", tmp_dir.path().display());

        return Ok(FileSorter {
            threshold,
            tmp_dir,
            codec,
        });
    }

    /// Sorts the lines of `source` by length, writing the result to `dest`.
    ///
    /// `dest` is created (or truncated) fresh; `source` is only read. A
    /// failure at any recursion level aborts the whole operation and leaves
    /// `dest` absent or incomplete, never silently wrong.
    pub fn sort(&self, source: &Path, dest: &Path) -> Result<(), SortError> {
        let file_size = fs::metadata(source).map_err(SortError::Io)?.len();

        match SortState::select(file_size, self.threshold) {
            SortState::Direct => chunk::sort_file(source, dest).map_err(SortError::Io),
            SortState::Split => self.split_sort_merge(source, dest),
        }
    }

    fn split_sort_merge(&self, source: &Path, dest: &Path) -> Result<(), SortError> {
        let left = self.new_temp()?;
        let right = self.new_temp()?;
        split::split_file(source, &left, &right, &self.codec).map_err(SortError::Io)?;

        // A single line longer than the threshold cannot be reduced by
        // splitting: the whole line lands in the left half and the right half
        // stays empty. Sort the already-decoded left half directly instead of
        // recursing forever.
        if right.as_file().metadata().map_err(SortError::Io)?.len() == 0 {
            return chunk::sort_file(left.path(), dest).map_err(SortError::Io);
        }

        let left_sorted = self.sort_half(left.into_temp_path())?;
        let right_sorted = self.sort_half(right.into_temp_path())?;

        merge::merge_files(left_sorted, right_sorted, dest).map_err(SortError::Io)
    }

    /// Sorts one half file into a fresh temporary handle and deletes the
    /// unsorted half. The result always lives at a new path, so no step ever
    /// reads and writes the same file.
    fn sort_half(&self, half: TempPath) -> Result<TempPath, SortError> {
        let sorted = self.new_temp()?.into_temp_path();
        self.sort(&half, &sorted)?;
        half.close().map_err(SortError::Io)?;

        return Ok(sorted);
    }

    fn new_temp(&self) -> Result<NamedTempFile, SortError> {
        NamedTempFile::new_in(self.tmp_dir.path()).map_err(SortError::TempFile)
    }
}

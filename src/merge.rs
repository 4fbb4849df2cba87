//! Two-way streaming merge.

use std::fs;
use std::io;
use std::io::prelude::*;
use std::path::Path;

use log;
use tempfile::TempPath;

use crate::chunk::line_length;
use crate::codec::{read_text_line, write_line};

/// Merges two sorted half files into `output` in a single streaming pass.
///
/// Both inputs must already be sorted ascending by [`line_length`]; this is
/// assumed and preserved, not checked. At most one buffered line per input is
/// held at a time: on every step the shorter current line is written and its
/// stream advanced, with the left line favored when lengths tie. Once one
/// stream is exhausted the other is copied through unchanged. The merge is
/// done when both current lines are absent.
///
/// Takes ownership of the half files and deletes both once the merge has
/// completed. On an I/O failure the merge aborts before the explicit
/// deletion; the temp path guards still reclaim the files when dropped.
pub fn merge_files(left: TempPath, right: TempPath, output: &Path) -> io::Result<()> {
    let mut left_reader = io::BufReader::new(fs::File::open(&left)?);
    let mut right_reader = io::BufReader::new(fs::File::open(&right)?);
    let mut writer = io::BufWriter::new(fs::File::create(output)?);

    let mut left_line = read_text_line(&mut left_reader)?;
    let mut right_line = read_text_line(&mut right_reader)?;

    loop {
        match (&left_line, &right_line) {
            (Some(l), Some(r)) => {
                if line_length(l) <= line_length(r) {
                    write_line(&mut writer, l)?;
                    left_line = read_text_line(&mut left_reader)?;
                } else {
                    write_line(&mut writer, r)?;
                    right_line = read_text_line(&mut right_reader)?;
                }
            }
            (Some(l), None) => {
                write_line(&mut writer, l)?;
                left_line = read_text_line(&mut left_reader)?;
            }
            (None, Some(r)) => {
                write_line(&mut writer, r)?;
                right_line = read_text_line(&mut right_reader)?;
            }
            (None, None) => break,
        }
    }
    writer.flush()?;

    log::debug!(
        "{} and {} merged into {}",
        left.display(),
        right.display(),
        output.display()
    );

    left.close()?;
    right.close()?;

    Ok(())
}

#[cfg(test)]
mod test {
    use std::fs;
    use std::io::prelude::*;
    use std::path::PathBuf;

    use rstest::*;
    use tempfile::{NamedTempFile, TempPath};

    use super::merge_files;

    #[fixture]
    fn tmp_dir() -> tempfile::TempDir {
        tempfile::tempdir().unwrap()
    }

    fn sorted_half(tmp_dir: &tempfile::TempDir, lines: &[&str]) -> TempPath {
        let mut half = NamedTempFile::new_in(tmp_dir.path()).unwrap();
        for line in lines {
            writeln!(half, "{}", line).unwrap();
        }
        half.flush().unwrap();
        half.into_temp_path()
    }

    fn merge_halves(tmp_dir: &tempfile::TempDir, left: &[&str], right: &[&str]) -> Vec<String> {
        let left = sorted_half(tmp_dir, left);
        let right = sorted_half(tmp_dir, right);
        let output = tmp_dir.path().join("merged.txt");

        merge_files(left, right, &output).unwrap();

        let merged = fs::read_to_string(&output).unwrap();
        merged.lines().map(str::to_string).collect()
    }

    #[rstest]
    #[case(
        vec!["aa", "ccc"],
        vec!["bb", "ddd"],
        vec!["aa", "bb", "ccc", "ddd"],
    )]
    #[case(
        vec!["aa"],
        vec!["bb", "cc"],
        vec!["aa", "bb", "cc"],
    )]
    #[case(
        vec![],
        vec!["a", "bb"],
        vec!["a", "bb"],
    )]
    #[case(
        vec!["a", "bb"],
        vec![],
        vec!["a", "bb"],
    )]
    #[case(
        vec![],
        vec![],
        vec![],
    )]
    fn test_merge(
        tmp_dir: tempfile::TempDir,
        #[case] left: Vec<&str>,
        #[case] right: Vec<&str>,
        #[case] expected: Vec<&str>,
    ) {
        let merged = merge_halves(&tmp_dir, &left, &right);
        assert_eq!(merged, expected);
    }

    #[rstest]
    fn test_merge_favors_left_on_equal_length(tmp_dir: tempfile::TempDir) {
        let merged = merge_halves(&tmp_dir, &["ll", "LLL"], &["rr", "RRR"]);
        assert_eq!(merged, vec!["ll", "rr", "LLL", "RRR"]);
    }

    #[rstest]
    fn test_merge_copies_exhausted_tail_in_order(tmp_dir: tempfile::TempDir) {
        let merged = merge_halves(&tmp_dir, &["a"], &["bb", "ccc", "dddd"]);
        assert_eq!(merged, vec!["a", "bb", "ccc", "dddd"]);
    }

    #[rstest]
    fn test_merge_deletes_both_inputs(tmp_dir: tempfile::TempDir) {
        let left = sorted_half(&tmp_dir, &["a"]);
        let right = sorted_half(&tmp_dir, &["bb"]);
        let (left_path, right_path) = (PathBuf::from(&*left), PathBuf::from(&*right));
        let output = tmp_dir.path().join("merged.txt");

        merge_files(left, right, &output).unwrap();

        assert!(!left_path.exists());
        assert!(!right_path.exists());
        assert!(output.exists());
    }
}

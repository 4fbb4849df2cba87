//! In-memory chunk sorting.

use std::fs;
use std::io;
use std::io::prelude::*;
use std::path::Path;

use log;

use crate::codec::{read_text_line, write_line};

/// The ordering key: the number of characters in a line.
pub fn line_length(line: &str) -> usize {
    line.chars().count()
}

/// Sorts a file that fits in memory.
///
/// Reads every line of `input`, drops zero-length lines, sorts the rest
/// ascending by [`line_length`] (stable, so equal-length lines keep their
/// original relative order) and writes them to `output` one per line.
///
/// The whole file is materialized in memory, so this must only be called for
/// files at or under the sorter's size threshold.
pub fn sort_file(input: &Path, output: &Path) -> io::Result<()> {
    let mut lines = read_lines(input)?;
    lines.retain(|line| !line.is_empty());
    lines.sort_by_key(|line| line_length(line));

    let mut writer = io::BufWriter::new(fs::File::create(output)?);
    for line in &lines {
        write_line(&mut writer, line)?;
    }
    writer.flush()?;

    log::debug!("{} sorted in memory ({} lines)", input.display(), lines.len());

    Ok(())
}

fn read_lines(input: &Path) -> io::Result<Vec<String>> {
    let mut reader = io::BufReader::new(fs::File::open(input)?);
    let mut lines = Vec::new();

    while let Some(line) = read_text_line(&mut reader)? {
        lines.push(line);
    }

    Ok(lines)
}

#[cfg(test)]
mod test {
    use std::fs;

    use rstest::*;

    use super::{line_length, sort_file};

    #[fixture]
    fn tmp_dir() -> tempfile::TempDir {
        tempfile::tempdir().unwrap()
    }

    fn sort_content(tmp_dir: &tempfile::TempDir, content: &str) -> Vec<String> {
        let input = tmp_dir.path().join("input.txt");
        let output = tmp_dir.path().join("output.txt");
        fs::write(&input, content).unwrap();

        sort_file(&input, &output).unwrap();

        let sorted = fs::read_to_string(&output).unwrap();
        sorted.lines().map(str::to_string).collect()
    }

    #[rstest]
    fn test_blank_lines_dropped(tmp_dir: tempfile::TempDir) {
        let sorted = sort_content(&tmp_dir, "\nbb\n\na\n");
        assert_eq!(sorted, vec!["a", "bb"]);
    }

    #[rstest]
    fn test_equal_lengths_keep_input_order(tmp_dir: tempfile::TempDir) {
        let sorted = sort_content(&tmp_dir, "ccc\nbb\naa\ndd\n");
        assert_eq!(sorted, vec!["bb", "aa", "dd", "ccc"]);
    }

    #[rstest]
    fn test_empty_input(tmp_dir: tempfile::TempDir) {
        let sorted = sort_content(&tmp_dir, "");
        assert!(sorted.is_empty());
    }

    #[rstest]
    fn test_missing_terminator_on_last_line(tmp_dir: tempfile::TempDir) {
        let sorted = sort_content(&tmp_dir, "bbb\na");
        assert_eq!(sorted, vec!["a", "bbb"]);
    }

    #[test]
    fn test_line_length_counts_characters() {
        assert_eq!(line_length(""), 0);
        assert_eq!(line_length("abc"), 3);
        // two characters even though four bytes
        assert_eq!(line_length("éé"), 2);
    }
}

//! Review-API position mapping.
//!
//! GitHub addresses inline review comments by "position": a 1-based
//! counter over the lines of one file's diff, where each hunk header
//! occupies a slot and counting never resets between hunks. Source line
//! numbers are not positions; this module builds the translation tables.

use std::collections::HashMap;
use std::sync::LazyLock;

use indexmap::IndexMap;
use regex::Regex;

use super::parser::FileDiff;
use super::DiffError;

static HUNK_HEADER_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^@@ -(\d+)(?:,(\d+))? \+(\d+)(?:,(\d+))? @@").unwrap());

/// Per-file translation from old/new line numbers to diff positions.
///
/// Only lines that actually appear in a hunk body have an entry; absence
/// means the line cannot carry an inline comment.
#[derive(Debug, Default, Clone)]
pub struct PositionMap {
    new_line_to_position: IndexMap<String, HashMap<u32, u32>>,
    old_line_to_position: IndexMap<String, HashMap<u32, u32>>,
}

impl PositionMap {
    /// Position for a new-file line, if it appears in the diff.
    pub fn position_for_new_line(&self, path: &str, line: u32) -> Option<u32> {
        self.new_line_to_position.get(path)?.get(&line).copied()
    }

    /// Position for an old-file line, if it appears in the diff.
    pub fn position_for_old_line(&self, path: &str, line: u32) -> Option<u32> {
        self.old_line_to_position.get(path)?.get(&line).copied()
    }

    /// Whether any line of `path` is addressable.
    pub fn contains_path(&self, path: &str) -> bool {
        self.new_line_to_position.contains_key(path)
            || self.old_line_to_position.contains_key(path)
    }
}

/// Build the position map for a set of file diffs.
///
/// Fails when a hunk header is present but its line-number fields do not
/// parse as integers. Files without a single addressable line are left
/// out of the map.
pub fn build_position_map(files: &[FileDiff]) -> Result<PositionMap, DiffError> {
    let mut pm = PositionMap::default();
    for file in files {
        let (new_map, old_map) =
            build_file_position_maps(&file.text).map_err(|source| DiffError::PositionMap {
                path: file.path.clone(),
                source: Box::new(source),
            })?;
        if !new_map.is_empty() {
            pm.new_line_to_position.insert(file.path.clone(), new_map);
        }
        if !old_map.is_empty() {
            pm.old_line_to_position.insert(file.path.clone(), old_map);
        }
    }
    Ok(pm)
}

fn build_file_position_maps(
    file_diff: &str,
) -> Result<(HashMap<u32, u32>, HashMap<u32, u32>), DiffError> {
    let mut new_line_to_pos = HashMap::new();
    let mut old_line_to_pos = HashMap::new();

    let mut pos: u32 = 0;
    let mut old_line: u32 = 0;
    let mut new_line: u32 = 0;
    let mut in_hunk = false;

    for line in file_diff.split('\n') {
        if line.is_empty() {
            continue;
        }
        if let Some(caps) = HUNK_HEADER_RE.captures(line) {
            old_line = parse_line_number(&caps[1], line)?;
            new_line = parse_line_number(&caps[3], line)?;
            in_hunk = true;
            // The header itself occupies a position slot.
            pos += 1;
            continue;
        }
        if !in_hunk {
            // File metadata (---/+++/index) precedes the first hunk and is
            // not counted.
            continue;
        }

        pos += 1;
        match line.as_bytes()[0] {
            b' ' => {
                old_line_to_pos.insert(old_line, pos);
                new_line_to_pos.insert(new_line, pos);
                old_line += 1;
                new_line += 1;
            }
            b'+' => {
                new_line_to_pos.insert(new_line, pos);
                new_line += 1;
            }
            b'-' => {
                old_line_to_pos.insert(old_line, pos);
                old_line += 1;
            }
            // "\ No newline at end of file" applies to the previous line;
            // any other prefix is non-mappable. Both consume the slot.
            _ => {}
        }
    }

    Ok((new_line_to_pos, old_line_to_pos))
}

fn parse_line_number(field: &str, header: &str) -> Result<u32, DiffError> {
    field
        .parse()
        .map_err(|_| DiffError::InvalidHunkHeader(header.to_string()))
}

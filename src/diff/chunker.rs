//! Prompt chunk splitting.
//!
//! Turns parsed file diffs into `File: <path>`-prefixed text blocks
//! bounded by a character budget, skipping ignored and unparseable
//! files. The chunks are embedded verbatim in the review prompt.

use ignore::overrides::{Override, OverrideBuilder};

use super::parser::FileDiff;
use super::DiffError;

/// Build prompt chunks from file diffs.
///
/// At most `max_files` files contribute; files matching any of
/// `ignore_globs` (gitignore-style patterns) and files with an empty
/// path are skipped. Diff text longer than `max_chunk_chars` is split
/// into multiple chunks, each re-prefixed with the file header.
pub fn build_chunks(
    files: &[FileDiff],
    ignore_globs: &[String],
    max_files: usize,
    max_chunk_chars: usize,
) -> Result<Vec<String>, DiffError> {
    if max_files == 0 {
        return Err(DiffError::InvalidMaxFiles);
    }
    if max_chunk_chars == 0 {
        return Err(DiffError::InvalidMaxChunkChars);
    }

    let ignore_set = compile_globs(ignore_globs);

    let mut chunks = Vec::new();
    let mut count = 0;
    for file in files {
        if count >= max_files {
            break;
        }
        if file.path.is_empty() {
            continue;
        }
        if is_ignored(&ignore_set, &file.path) {
            continue;
        }
        chunks.extend(split_chunk(&file.path, &file.text, max_chunk_chars));
        count += 1;
    }
    Ok(chunks)
}

fn compile_globs(globs: &[String]) -> Option<Override> {
    if globs.is_empty() {
        return None;
    }
    let mut builder = OverrideBuilder::new("/");
    for glob in globs {
        // An invalid glob is skipped rather than aborting the review.
        let _ = builder.add(glob);
    }
    builder.build().ok()
}

fn is_ignored(ignore_set: &Option<Override>, path: &str) -> bool {
    match ignore_set {
        Some(ov) => ov.matched(path, false).is_whitelist(),
        None => false,
    }
}

fn split_chunk(path: &str, text: &str, max_chunk_chars: usize) -> Vec<String> {
    if text.len() <= max_chunk_chars {
        return vec![format_chunk(path, text)];
    }
    let mut chunks = Vec::new();
    let mut remaining = text;
    while !remaining.is_empty() {
        let limit = max_chunk_chars.min(remaining.len());
        // Avoid splitting inside a multi-byte character.
        let mut end = limit;
        while !remaining.is_char_boundary(end) {
            end -= 1;
        }
        let (piece, rest) = remaining.split_at(end);
        chunks.push(format_chunk(path, piece));
        remaining = rest;
    }
    chunks
}

fn format_chunk(path: &str, text: &str) -> String {
    format!("File: {path}\n{text}")
}

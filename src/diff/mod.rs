//! Diff engine: unified diff segmentation, review-API position mapping,
//! and prompt chunk splitting.

pub mod chunker;
pub mod parser;
pub mod position;

pub use parser::{parse_unified, FileDiff};
pub use position::{build_position_map, PositionMap};

use thiserror::Error;

/// Errors from the diff engine.
#[derive(Error, Debug)]
pub enum DiffError {
    #[error("invalid hunk header: {0:?}")]
    InvalidHunkHeader(String),

    #[error("build position map for {path:?}: {source}")]
    PositionMap {
        path: String,
        #[source]
        source: Box<DiffError>,
    },

    #[error("max_files must be > 0")]
    InvalidMaxFiles,

    #[error("max_chunk_chars must be > 0")]
    InvalidMaxChunkChars,
}

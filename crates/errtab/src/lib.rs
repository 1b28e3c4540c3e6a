//! strerror table generation from vendor errno sources.

use std::path::PathBuf;
use thiserror::Error;

pub mod driver;
pub mod emit;
pub mod entry;
pub mod extract;
pub mod family;
pub mod output;
pub mod table;

pub use emit::{
    dense_messages, emit_dense, emit_sparse, sparse_cases, Guard, Layout, SparseCase,
    MAX_DENSE_ELAST, UNKNOWN_ERROR,
};
pub use driver::{generate_from_path, log_level, run};
pub use entry::ErrnoEntry;
pub use extract::{extract, Entries, Syntax, MAX_ERRNO};
pub use family::{Family, FamilyInfo, Pipeline, Support};
pub use output::write_generated;
pub use table::ErrnoTable;

#[derive(Error, Debug)]
pub enum ErrtabError {
    #[error("unsupported OS family: {0}")]
    UnsupportedFamily(String),
    #[error("{family} support is currently broken: {reason}")]
    BrokenFamily {
        family: &'static str,
        reason: &'static str,
    },
    #[error("no errno entries found in input")]
    EmptyInput,
    #[error("errno {elast} is too large for a dense table (limit {limit})")]
    TableTooLarge { elast: u32, limit: u32 },
    #[error("failed to read {}: {source}", path.display())]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to move generated file into place: {0}")]
    Persist(#[from] tempfile::PersistError),
}

//! Input loading and table representation.

mod parser;
mod preamble;
mod source;

pub use parser::{make_unique, LoaderConfig, TableLoader};
pub use preamble::Preamble;
pub use source::{normalize_cell, normalize_name, DataTable, SourceMetadata};

//! Report generation: per-column algorithms, sections and assembly.

mod assembler;
mod engine;
mod literal;
mod section;
pub mod values;

pub use assembler::{assemble, write_report, Report};
pub use engine::{label_counts, ColumnMode, ColumnReportEngine};
pub use section::{Section, SectionRow};

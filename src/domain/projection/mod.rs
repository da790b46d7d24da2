//! Board projection: raw store rows in, sorted and filtered display rows out.

pub mod engine;
pub mod format;
pub mod order;

pub use engine::{DisplayRow, ProjectionEngine, project};
pub use order::{OrderBy, SortDirection, SortField};

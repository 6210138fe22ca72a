//! CLI command implementations.

pub mod scan;
pub mod search;

pub use scan::ScanCommand;
pub use search::SearchCommand;

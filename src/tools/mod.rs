pub mod catalog_stats;
pub mod load_catalog;
pub mod search;

pub use catalog_stats::*;
pub use load_catalog::*;
pub use search::*;

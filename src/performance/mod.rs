//! Performance record logic: bulk import, page filtering and alumni matching.

mod alumni;
mod csv_import;
mod filter;

pub use alumni::*;
pub use csv_import::*;
pub use filter::*;

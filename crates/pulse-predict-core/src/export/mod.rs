//! Export of scored tables.

mod results;

pub use results::*;

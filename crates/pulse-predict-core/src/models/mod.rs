//! Domain models for the PulsePredict screening flow.

mod entry;
mod prediction;
mod record;

pub use entry::*;
pub use prediction::*;
pub use record::*;

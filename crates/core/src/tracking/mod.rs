//! Service usage tracking: which services each session's tickets were validated for.

mod handle;
mod store;
mod writer;

pub use handle::*;
pub use store::*;
pub use writer::*;

//! One handler per invocation mode.

pub mod completions;
pub mod fix;
pub mod sync;

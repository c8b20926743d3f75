//! Utilities shared by acquisition strategies and the optimization loop
mod bounds;
mod find_result;
mod misc;

pub use bounds::*;
pub use find_result::*;
pub use misc::*;

//! Line reflow: pure wrapping plus the off-thread worker that runs it.

pub mod worker;
pub mod wrap;

pub use worker::{ReflowReply, ReflowWorker};
pub use wrap::wrap;

pub use crate::pipeline::Pipeline;
pub use crate::result::{Outcome, PipelineReport};

pub mod handlers;
pub mod server;

pub mod agent;
pub mod config;
pub mod error;
pub mod helpers;
pub mod pipeline;
pub mod result;
#[cfg(any(test, feature = "test-utils"))]
pub mod testing;

#[path = "llm/lib.rs"]
pub mod llm;
#[path = "guardrail/lib.rs"]
pub mod guardrail;
#[path = "api/lib.rs"]
pub mod api;

pub use agent::Agent;
pub use config::GuardConfig;
pub use error::{AgentError, ConfigError, PipelineError};
pub use pipeline::Pipeline;
pub use result::{Outcome, PipelineReport};

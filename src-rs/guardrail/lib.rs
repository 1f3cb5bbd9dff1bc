pub mod homework;
pub mod solution;
pub mod types;

pub use homework::{HomeworkCheck, HomeworkGuardrail};
pub use solution::{SolutionCheck, SolutionGuardrail};
pub use types::{Guardrail, GuardrailVerdict};

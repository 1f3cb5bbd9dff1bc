use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

pub const INPUT_BLOCKED_MESSAGE: &str = "Input Guardrail Blocked: This looks like math homework.";
pub const OUTPUT_BLOCKED_MESSAGE: &str = "Output Guardrail Blocked: Invalid or unclear math solution.";

/// The single result of one pipeline invocation.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum Outcome {
    Accepted { output: String },
    BlockedByInput { guardrail: String, rationale: String },
    BlockedByOutput { guardrail: String, explanation: String },
}

impl Outcome {
    pub fn is_accepted(&self) -> bool {
        matches!(self, Outcome::Accepted { .. })
    }

    pub fn kind(&self) -> &'static str {
        match self {
            Outcome::Accepted { .. } => "accepted",
            Outcome::BlockedByInput { .. } => "blocked_by_input",
            Outcome::BlockedByOutput { .. } => "blocked_by_output",
        }
    }

    pub fn output(&self) -> Option<&str> {
        match self {
            Outcome::Accepted { output } => Some(output.as_str()),
            _ => None,
        }
    }

    /// Guardrail reasoning for a blocked outcome.
    pub fn reason(&self) -> Option<&str> {
        match self {
            Outcome::Accepted { .. } => None,
            Outcome::BlockedByInput { rationale, .. } => Some(rationale.as_str()),
            Outcome::BlockedByOutput { explanation, .. } => Some(explanation.as_str()),
        }
    }
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Outcome::Accepted { output } => write!(f, "Agent Response:\n{}", output),
            Outcome::BlockedByInput { .. } => f.write_str(INPUT_BLOCKED_MESSAGE),
            Outcome::BlockedByOutput { .. } => f.write_str(OUTPUT_BLOCKED_MESSAGE),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Stage {
    InputGuardrail,
    Solver,
    OutputGuardrail,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct TraceStep {
    pub stage: Stage,
    pub agent: String,
    pub started_at: DateTime<Utc>,
    pub elapsed_ms: u64,
    pub tripwire_triggered: Option<bool>,
}

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct RunTrace {
    pub steps: Vec<TraceStep>,
}

impl RunTrace {
    pub fn stages(&self) -> Vec<Stage> {
        self.steps.iter().map(|step| step.stage).collect()
    }
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct PipelineReport {
    #[serde(flatten)]
    pub outcome: Outcome,
    pub trace: RunTrace,
}

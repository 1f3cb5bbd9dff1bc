use std::sync::Arc;
use std::time::Instant;

use chrono::Utc;
use tracing::{info, info_span, warn, Instrument};

use crate::agent::Agent;
use crate::config::GuardConfig;
use crate::error::{ConfigError, PipelineError};
use crate::guardrail::{Guardrail, GuardrailVerdict, HomeworkGuardrail, SolutionGuardrail};
use crate::helpers::build_provider;
use crate::llm::ProviderAdapter;
use crate::result::{Outcome, PipelineReport, RunTrace, Stage, TraceStep};

pub const SOLVER_INSTRUCTIONS: &str = "Solve the math question step-by-step and include a numeric answer.";

pub fn solver_agent() -> Agent {
    Agent::new("Math Solver Agent", SOLVER_INSTRUCTIONS)
}

/// Input guardrails, then the solver, then output guardrails; one model call
/// per step, strictly in that order.
pub struct Pipeline {
    provider: Arc<dyn ProviderAdapter>,
    solver: Agent,
    input_guardrails: Vec<Arc<dyn Guardrail>>,
    output_guardrails: Vec<Arc<dyn Guardrail>>,
}

impl Pipeline {
    pub fn new(config: &GuardConfig) -> Result<Self, ConfigError> {
        let provider = build_provider(config)?;
        Ok(Self::with_provider(provider))
    }

    /// Homework classifier in front, solution validator behind.
    pub fn with_provider(provider: Arc<dyn ProviderAdapter>) -> Self {
        Self::builder(provider, solver_agent())
            .input_guardrail(Arc::new(HomeworkGuardrail::new()))
            .output_guardrail(Arc::new(SolutionGuardrail::new()))
            .build()
    }

    pub fn builder(provider: Arc<dyn ProviderAdapter>, solver: Agent) -> PipelineBuilder {
        PipelineBuilder {
            pipeline: Self {
                provider,
                solver,
                input_guardrails: Vec::new(),
                output_guardrails: Vec::new(),
            },
        }
    }

    pub async fn process(&self, request: &str) -> Result<Outcome, PipelineError> {
        self.process_traced(request).await.map(|report| report.outcome)
    }

    pub async fn process_traced(&self, request: &str) -> Result<PipelineReport, PipelineError> {
        if request.trim().is_empty() {
            return Err(PipelineError::EmptyRequest);
        }
        let span = info_span!("pipeline", solver = %self.solver.name);
        self.run(request).instrument(span).await
    }

    async fn run(&self, request: &str) -> Result<PipelineReport, PipelineError> {
        let mut trace = RunTrace::default();

        for guardrail in &self.input_guardrails {
            let verdict = self
                .run_guardrail(guardrail.as_ref(), Stage::InputGuardrail, request, &mut trace)
                .await?;
            if verdict.tripwire_triggered {
                warn!(guardrail = %verdict.guardrail, "input guardrail tripped, solver skipped");
                let outcome = Outcome::BlockedByInput {
                    guardrail: verdict.guardrail,
                    rationale: verdict.info,
                };
                return Ok(PipelineReport { outcome, trace });
            }
        }

        let started_at = Utc::now();
        let started = Instant::now();
        let solution = self.solver.run_text(self.provider.as_ref(), request).await?;
        trace.steps.push(TraceStep {
            stage: Stage::Solver,
            agent: self.solver.name.clone(),
            started_at,
            elapsed_ms: started.elapsed().as_millis() as u64,
            tripwire_triggered: None,
        });
        info!(output_length = solution.len(), "solver finished");

        for guardrail in &self.output_guardrails {
            let verdict = self
                .run_guardrail(guardrail.as_ref(), Stage::OutputGuardrail, &solution, &mut trace)
                .await?;
            if verdict.tripwire_triggered {
                warn!(guardrail = %verdict.guardrail, "output guardrail tripped");
                let outcome = Outcome::BlockedByOutput {
                    guardrail: verdict.guardrail,
                    explanation: verdict.info,
                };
                return Ok(PipelineReport { outcome, trace });
            }
        }

        info!("solution accepted");
        Ok(PipelineReport {
            outcome: Outcome::Accepted { output: solution },
            trace,
        })
    }

    async fn run_guardrail(
        &self,
        guardrail: &dyn Guardrail,
        stage: Stage,
        text: &str,
        trace: &mut RunTrace,
    ) -> Result<GuardrailVerdict, PipelineError> {
        let started_at = Utc::now();
        let started = Instant::now();
        let verdict = guardrail.check(self.provider.as_ref(), text).await?;
        trace.steps.push(TraceStep {
            stage,
            agent: guardrail.name().to_string(),
            started_at,
            elapsed_ms: started.elapsed().as_millis() as u64,
            tripwire_triggered: Some(verdict.tripwire_triggered),
        });
        Ok(verdict)
    }
}

pub struct PipelineBuilder {
    pipeline: Pipeline,
}

impl PipelineBuilder {
    pub fn input_guardrail(mut self, guardrail: Arc<dyn Guardrail>) -> Self {
        self.pipeline.input_guardrails.push(guardrail);
        self
    }

    pub fn output_guardrail(mut self, guardrail: Arc<dyn Guardrail>) -> Self {
        self.pipeline.output_guardrails.push(guardrail);
        self
    }

    pub fn build(self) -> Pipeline {
        self.pipeline
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::MockProvider;

    #[tokio::test]
    async fn blank_request_makes_no_model_call() {
        let provider = Arc::new(MockProvider::new());
        let pipeline = Pipeline::with_provider(provider.clone());

        let err = pipeline.process("   ").await.unwrap_err();

        assert!(matches!(err, PipelineError::EmptyRequest));
        assert!(provider.requests().await.is_empty());
    }

    #[tokio::test]
    async fn solver_only_pipeline_accepts_directly() {
        let provider = Arc::new(MockProvider::with_responses(vec!["x = 4".to_string()]));
        let pipeline = Pipeline::builder(provider.clone(), solver_agent()).build();

        let report = pipeline.process_traced("2x = 8").await.unwrap();

        assert_eq!(report.outcome, Outcome::Accepted { output: "x = 4".into() });
        assert_eq!(report.trace.stages(), vec![Stage::Solver]);
    }

    #[test]
    fn new_rejects_config_without_key() {
        let result = Pipeline::new(&GuardConfig::default());
        assert!(matches!(result, Err(ConfigError::MissingApiKey)));
    }
}

//! Pipeline driver - walks the plan strictly in order, fail-fast

use crate::core::{
    ensure_interpreter, Plan, ProvisionError, RunReport, RunState, StepOutcome, REQUIRED_PYTHON,
};
use crate::execution::StepExecutor;
use crate::runner::CommandRunner;
use tracing::{error, info};
use uuid::Uuid;

/// Events emitted while a plan executes
#[derive(Debug, Clone)]
pub enum ProvisionEvent {
    RunStarted {
        run_id: Uuid,
        plan: String,
        total_steps: usize,
    },
    StepStarted {
        index: usize,
        step_id: String,
    },
    StepSkipped {
        index: usize,
        step_id: String,
    },
    StepSucceeded {
        index: usize,
        step_id: String,
    },
    StepFailed {
        index: usize,
        step_id: String,
        error: String,
    },
    RunCompleted {
        run_id: Uuid,
        success: bool,
    },
}

/// Type for event handlers
pub type EventHandler = Box<dyn Fn(&ProvisionEvent) + Send + Sync>;

/// Drives a plan through the step executor
///
/// Execution is strictly sequential: one step at a time, in declared order,
/// halting at the first failure. Steps may block for as long as their
/// underlying commands take; there is no timeout and no cancellation beyond
/// an operator interrupt.
pub struct Driver<R> {
    executor: StepExecutor<R>,
    handlers: Vec<EventHandler>,
}

impl<R: CommandRunner> Driver<R> {
    pub fn new(runner: R) -> Self {
        Self {
            executor: StepExecutor::new(runner),
            handlers: Vec::new(),
        }
    }

    /// Add an event handler
    pub fn on_event<F>(&mut self, handler: F)
    where
        F: Fn(&ProvisionEvent) + Send + Sync + 'static,
    {
        self.handlers.push(Box::new(handler));
    }

    fn emit(&self, event: ProvisionEvent) {
        for handler in &self.handlers {
            handler(&event);
        }
    }

    /// Execute the plan and report what happened
    ///
    /// The interpreter gate runs first; if it fails, no step is probed or
    /// executed and the report carries a precondition failure.
    pub async fn run(&self, plan: &Plan) -> RunReport {
        let run_id = Uuid::new_v4();
        let mut report = RunReport::begin(run_id, plan.name.clone());

        info!("starting provisioning run {} ({})", plan.name, run_id);
        self.emit(ProvisionEvent::RunStarted {
            run_id,
            plan: plan.name.clone(),
            total_steps: plan.len(),
        });

        match ensure_interpreter(self.executor.runner(), REQUIRED_PYTHON).await {
            Ok(version) => info!("interpreter check passed: python {}", version),
            Err(err) => {
                error!("{}", err);
                let reason = match err {
                    ProvisionError::Precondition(msg) => msg,
                    other => other.to_string(),
                };
                report.state = RunState::Failed { step: 0, reason };
                report.finished_at = Some(chrono::Utc::now());
                self.emit(ProvisionEvent::RunCompleted {
                    run_id,
                    success: false,
                });
                return report;
            }
        }

        for (index, step) in plan.steps().iter().enumerate() {
            report.state = RunState::Running { step: index };
            self.emit(ProvisionEvent::StepStarted {
                index,
                step_id: step.id.clone(),
            });

            let outcome = self.executor.execute(step).await;
            let failure = match &outcome {
                StepOutcome::Skipped => {
                    self.emit(ProvisionEvent::StepSkipped {
                        index,
                        step_id: step.id.clone(),
                    });
                    None
                }
                StepOutcome::Succeeded => {
                    self.emit(ProvisionEvent::StepSucceeded {
                        index,
                        step_id: step.id.clone(),
                    });
                    None
                }
                StepOutcome::Failed { error } => {
                    error!("step {} failed: {}", step.id, error);
                    self.emit(ProvisionEvent::StepFailed {
                        index,
                        step_id: step.id.clone(),
                        error: error.clone(),
                    });
                    Some(error.clone())
                }
            };

            report.record(step.id.clone(), outcome);

            if let Some(reason) = failure {
                report.state = RunState::Failed {
                    step: index,
                    reason,
                };
                report.finished_at = Some(chrono::Utc::now());
                self.emit(ProvisionEvent::RunCompleted {
                    run_id,
                    success: false,
                });
                return report;
            }
        }

        report.state = RunState::Succeeded;
        report.finished_at = Some(chrono::Utc::now());

        info!("provisioning run finished: {} ok", plan.name);
        self.emit(ProvisionEvent::RunCompleted {
            run_id,
            success: true,
        });

        report
    }
}

//! Run state models

use crate::core::error::ProvisionError;
use chrono::{DateTime, Utc};
use uuid::Uuid;

/// Outcome of a single step
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StepOutcome {
    /// The probe reported the artifact present; the action was not invoked
    Skipped,

    /// The action ran and every command exited zero
    Succeeded,

    /// The action exited nonzero or could not run
    Failed { error: String },
}

impl StepOutcome {
    pub fn is_failure(&self) -> bool {
        matches!(self, StepOutcome::Failed { .. })
    }

    pub fn is_skipped(&self) -> bool {
        matches!(self, StepOutcome::Skipped)
    }
}

/// State of the whole run
///
/// `Running(i)` advances to `Running(i + 1)` when step `i` is skipped or
/// succeeds. `Succeeded` and `Failed` are terminal; the recovery path for a
/// failed run is to fix the reported cause and re-invoke from the start,
/// relying on step idempotency to skip completed work.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RunState {
    NotStarted,
    Running { step: usize },
    Succeeded,
    Failed { step: usize, reason: String },
}

impl RunState {
    pub fn is_terminal(&self) -> bool {
        matches!(self, RunState::Succeeded | RunState::Failed { .. })
    }
}

/// Outcome of one executed step, in execution order
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StepRecord {
    pub step_id: String,
    pub outcome: StepOutcome,
}

/// Everything that happened during one provisioning run
#[derive(Debug, Clone)]
pub struct RunReport {
    /// Unique run id
    pub run_id: Uuid,

    /// Name of the executed plan
    pub plan: String,

    pub started_at: DateTime<Utc>,
    pub finished_at: Option<DateTime<Utc>>,

    /// Per-step outcomes, one entry per step that was reached
    pub records: Vec<StepRecord>,

    pub state: RunState,
}

impl RunReport {
    pub fn begin(run_id: Uuid, plan: impl Into<String>) -> Self {
        Self {
            run_id,
            plan: plan.into(),
            started_at: Utc::now(),
            finished_at: None,
            records: Vec::new(),
            state: RunState::NotStarted,
        }
    }

    pub fn record(&mut self, step_id: impl Into<String>, outcome: StepOutcome) {
        self.records.push(StepRecord {
            step_id: step_id.into(),
            outcome,
        });
    }

    pub fn succeeded(&self) -> bool {
        self.state == RunState::Succeeded
    }

    /// True when every reached step was skipped - the signature of a re-run
    /// over an already provisioned machine
    pub fn all_skipped(&self) -> bool {
        !self.records.is_empty() && self.records.iter().all(|r| r.outcome.is_skipped())
    }

    /// The failure behind a non-successful run, if any
    pub fn failure(&self) -> Option<ProvisionError> {
        match &self.state {
            RunState::Failed { reason, .. } => match self.records.last() {
                Some(record) if record.outcome.is_failure() => Some(ProvisionError::Step {
                    step: record.step_id.clone(),
                    reason: reason.clone(),
                }),
                _ => Some(ProvisionError::Precondition(reason.clone())),
            },
            _ => None,
        }
    }

    pub fn skipped_count(&self) -> usize {
        self.records.iter().filter(|r| r.outcome.is_skipped()).count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_run_state_terminal() {
        assert!(!RunState::NotStarted.is_terminal());
        assert!(!RunState::Running { step: 3 }.is_terminal());
        assert!(RunState::Succeeded.is_terminal());
        assert!(RunState::Failed {
            step: 1,
            reason: "boom".to_string()
        }
        .is_terminal());
    }

    #[test]
    fn test_all_skipped() {
        let mut report = RunReport::begin(Uuid::new_v4(), "test");
        assert!(!report.all_skipped());

        report.record("a", StepOutcome::Skipped);
        report.record("b", StepOutcome::Skipped);
        assert!(report.all_skipped());

        report.record("c", StepOutcome::Succeeded);
        assert!(!report.all_skipped());
    }

    #[test]
    fn test_failure_names_the_failing_step() {
        let mut report = RunReport::begin(Uuid::new_v4(), "test");
        report.record("a", StepOutcome::Succeeded);
        report.record(
            "b",
            StepOutcome::Failed {
                error: "exited with code 100".to_string(),
            },
        );
        report.state = RunState::Failed {
            step: 1,
            reason: "exited with code 100".to_string(),
        };

        match report.failure() {
            Some(ProvisionError::Step { step, reason }) => {
                assert_eq!(step, "b");
                assert!(reason.contains("100"));
            }
            other => panic!("expected step failure, got {:?}", other),
        }
    }

    #[test]
    fn test_failure_without_records_is_a_precondition() {
        let mut report = RunReport::begin(Uuid::new_v4(), "test");
        report.state = RunState::Failed {
            step: 0,
            reason: "python 3.10 is required".to_string(),
        };

        assert!(matches!(
            report.failure(),
            Some(ProvisionError::Precondition(_))
        ));
    }
}

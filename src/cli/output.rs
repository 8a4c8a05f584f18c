//! CLI output formatting

use crate::catalog::report::Session;
use crate::core::StepOutcome;
use crate::execution::ProvisionEvent;
use console::Emoji;
use indicatif::{ProgressBar, ProgressStyle};
use std::time::Duration;

// Re-export style
pub use console::style;

// Emojis for output
pub static CHECK: Emoji<'_, '_> = Emoji("✅ ", "✓ ");
pub static CROSS: Emoji<'_, '_> = Emoji("❌ ", "✗ ");
pub static SPINNER: Emoji<'_, '_> = Emoji("⏳ ", "~ ");
pub static INFO: Emoji<'_, '_> = Emoji("ℹ️  ", "i ");
pub static WARN: Emoji<'_, '_> = Emoji("⚠️  ", "! ");
pub static ROCKET: Emoji<'_, '_> = Emoji("🚀 ", "> ");

/// Create a progress bar spanning the plan's steps
pub fn create_progress_bar(total: usize) -> ProgressBar {
    let progress = ProgressBar::new(total as u64);
    progress.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} {msg}")
            .unwrap()
            .progress_chars("#>-"),
    );
    progress.enable_steady_tick(Duration::from_millis(100));
    progress
}

/// Format a step outcome for display
pub fn format_outcome(outcome: &StepOutcome) -> String {
    match outcome {
        StepOutcome::Skipped => style("SKIPPED").dim().to_string(),
        StepOutcome::Succeeded => style("OK").green().to_string(),
        StepOutcome::Failed { .. } => style("FAILED").red().to_string(),
    }
}

/// Format an execution event for display
pub fn format_event(event: &ProvisionEvent) -> String {
    match event {
        ProvisionEvent::RunStarted {
            run_id,
            plan,
            total_steps,
        } => format!(
            "{} Starting {} ({} steps, run {})",
            ROCKET,
            style(plan).bold(),
            total_steps,
            style(&run_id.to_string()[..8]).dim()
        ),
        ProvisionEvent::StepStarted { index, step_id } => {
            format!("{} [{}] {}", SPINNER, index + 1, style(step_id).cyan())
        }
        ProvisionEvent::StepSkipped { step_id, .. } => format!(
            "{} {} ({})",
            CHECK,
            style(step_id).green(),
            style("already present").dim()
        ),
        ProvisionEvent::StepSucceeded { step_id, .. } => {
            format!("{} {}", CHECK, style(step_id).green())
        }
        ProvisionEvent::StepFailed { step_id, error, .. } => {
            format!("{} {}: {}", CROSS, style(step_id).red(), style(error).dim())
        }
        ProvisionEvent::RunCompleted { run_id, success } => {
            let status = if *success {
                style("completed successfully").green().to_string()
            } else {
                style("failed").red().to_string()
            };
            format!(
                "{} Run ({}) {}",
                INFO,
                style(&run_id.to_string()[..8]).dim(),
                status
            )
        }
    }
}

/// Format the follow-up terminal sessions, one numbered block each
pub fn format_sessions(sessions: &[Session]) -> String {
    let mut out = String::new();
    out.push_str(&format!(
        "\n{} Provisioning is done. Open {} terminals and run:\n",
        INFO,
        sessions.len()
    ));

    for (index, session) in sessions.iter().enumerate() {
        out.push_str(&format!(
            "\n  {} {}\n",
            style(format!("terminal {}:", index + 1)).bold(),
            style(&session.name).cyan()
        ));
        for command in &session.commands {
            out.push_str(&format!("    {}\n", command));
        }
    }

    out
}

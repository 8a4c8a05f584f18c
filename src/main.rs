use airstrap::catalog;
use airstrap::cli::commands::{ListCommand, StatusCommand};
use airstrap::cli::output::{
    create_progress_bar, format_event, format_sessions, style, CHECK, CROSS, INFO, ROCKET, WARN,
};
use airstrap::cli::{Cli, Command};
use airstrap::core::{EnvContext, Plan, ProvisionConfig};
use airstrap::execution::{Driver, ProvisionEvent};
use airstrap::runner::SystemRunner;
use anyhow::{Context, Result};
use std::path::Path;
use tracing::{error, Level};
use tracing_subscriber::FmtSubscriber;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::from_args();

    // Initialize logging
    let log_level = if cli.verbose { Level::DEBUG } else { Level::INFO };
    let subscriber = FmtSubscriber::builder()
        .with_max_level(log_level)
        .with_writer(std::io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber)
        .context("Failed to set logging subscriber")?;

    let config = ProvisionConfig::load(cli.config.as_deref().map(Path::new))
        .context("Failed to load configuration")?;

    match cli.command.unwrap_or(Command::Up) {
        Command::Up => up(&config).await,
        Command::Status(cmd) => status(&config, &cmd).await,
        Command::List(cmd) => list(&config, &cmd).await,
    }
}

async fn resolve(config: &ProvisionConfig) -> (EnvContext, Plan) {
    let runner = SystemRunner::new();
    let ctx = EnvContext::detect(&runner, config).await;
    let plan = catalog::provisioning_plan(&ctx, config);
    (ctx, plan)
}

async fn up(config: &ProvisionConfig) -> Result<()> {
    let (ctx, plan) = resolve(config).await;

    println!(
        "{} {} ({} steps, workspace {})",
        ROCKET,
        style(&plan.name).bold(),
        plan.len(),
        style(ctx.workspace_root.display()).dim()
    );

    let mut driver = Driver::new(SystemRunner::new());

    let progress = create_progress_bar(plan.len());
    {
        let progress = progress.clone();
        driver.on_event(move |event| {
            progress.println(format_event(event));
            if matches!(
                event,
                ProvisionEvent::StepSkipped { .. }
                    | ProvisionEvent::StepSucceeded { .. }
                    | ProvisionEvent::StepFailed { .. }
            ) {
                progress.inc(1);
            }
        });
    }

    let report = driver.run(&plan).await;
    progress.finish_and_clear();

    match report.failure() {
        None => {
            println!(
                "\n{} {} completed {} ({} skipped, {} run)",
                CHECK,
                style(&report.plan).bold(),
                style("successfully").green(),
                report.skipped_count(),
                report.records.len() - report.skipped_count()
            );
            print!("{}", format_sessions(&catalog::report::followup_sessions(&ctx)));
            Ok(())
        }
        Some(err) => {
            println!(
                "\n{} {} {}",
                CROSS,
                style(&report.plan).bold(),
                style("failed").red()
            );
            error!("{}", err);
            std::process::exit(1);
        }
    }
}

async fn status(config: &ProvisionConfig, cmd: &StatusCommand) -> Result<()> {
    let runner = SystemRunner::new();
    let (_ctx, plan) = resolve(config).await;

    let mut rows = Vec::new();
    for step in plan.steps() {
        let present = match step.probe.evaluate(&runner).await {
            Ok(present) => Some(present),
            Err(_) => None,
        };
        rows.push((step, present));
    }

    if cmd.json {
        let data: Vec<_> = rows
            .iter()
            .map(|(step, present)| {
                serde_json::json!({
                    "step": step.id,
                    "artifact": step.probe.describe(),
                    "present": present,
                })
            })
            .collect();
        println!(
            "{}",
            serde_json::to_string_pretty(&serde_json::json!({ "steps": data }))?
        );
        return Ok(());
    }

    let mut missing = 0;
    for (step, present) in &rows {
        let marker = match present {
            Some(true) => format!("{}", CHECK),
            Some(false) => {
                missing += 1;
                format!("{}", CROSS)
            }
            None => {
                missing += 1;
                format!("{}", WARN)
            }
        };
        println!(
            "{} {} - {}",
            marker,
            style(&step.id).cyan(),
            style(step.probe.describe()).dim()
        );
    }

    if missing == 0 {
        println!("\n{} All artifacts present; `airstrap up` would skip every step", INFO);
    } else {
        println!(
            "\n{} {} of {} artifacts missing; `airstrap up` would provision them",
            INFO,
            missing,
            rows.len()
        );
    }

    Ok(())
}

async fn list(config: &ProvisionConfig, cmd: &ListCommand) -> Result<()> {
    let (_ctx, plan) = resolve(config).await;

    if cmd.json {
        let data: Vec<_> = plan
            .steps()
            .iter()
            .map(|step| {
                serde_json::json!({
                    "id": step.id,
                    "summary": step.summary,
                    "artifact": step.probe.describe(),
                })
            })
            .collect();
        println!(
            "{}",
            serde_json::to_string_pretty(&serde_json::json!({ "plan": plan.name, "steps": data }))?
        );
        return Ok(());
    }

    println!("{} {} ({} steps)", INFO, style(&plan.name).bold(), plan.len());
    for (index, step) in plan.steps().iter().enumerate() {
        println!(
            "  {:>2}. {} - {}",
            index + 1,
            style(&step.id).cyan(),
            step.summary
        );
    }

    Ok(())
}

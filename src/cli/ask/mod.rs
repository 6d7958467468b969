//! Ask command - one question on the terminal

use clap::Args;

use crate::domain::WorkflowOutcome;
use crate::infrastructure::observability::shutdown_tracing;

#[derive(Args, Debug)]
pub struct AskArgs {
    /// Question to answer
    pub question: String,
}

/// Answer one question, printing each visited node and the final answer
pub async fn run(args: AskArgs) -> anyhow::Result<()> {
    let config = super::load_config()?;
    let state = crate::create_app_state(&config).await?;

    let outcome = state.workflow.run(&args.question).await;
    shutdown_tracing();

    println!("{}", render_outcome(&outcome?));

    Ok(())
}

fn render_outcome(outcome: &WorkflowOutcome) -> String {
    let mut lines: Vec<String> = outcome
        .visited_nodes()
        .iter()
        .map(|node| format!("Node '{}':", node))
        .collect();

    lines.push("---".to_string());
    lines.push(outcome.generation().to_string());

    lines.join("\n")
}

//! Command-line front end for the Transport planners.
//!
//! `transport plan problem.json` loads a JSON problem document, runs the
//! selected planner under a time limit, checks the plan by replaying it and
//! prints the plan as JSON.
#![forbid(unsafe_code)]

use clap::{Parser, Subcommand};

mod error;
mod plan;

pub use error::CliError;

use plan::PlanArgs;

pub(crate) const ARG_PROBLEM: &str = "problem";
pub(crate) const ARG_PLANNER: &str = "planner";
pub(crate) const ARG_HEURISTIC: &str = "heuristic";
pub(crate) const ARG_SEED: &str = "seed";
pub(crate) const ARG_TIME_LIMIT: &str = "time-limit";
pub(crate) const ARG_MAX_TRIALS: &str = "max-trials";
pub(crate) const ARG_OUTPUT: &str = "output";
pub(crate) const ARG_REFUEL_COST: &str = "refuel-cost";
pub(crate) const ENV_PROBLEM: &str = "TRANSPORT_CMDS_PLAN_PROBLEM_PATH";
pub(crate) const ENV_MAX_TRIALS: &str = "TRANSPORT_CMDS_PLAN_MAX_TRIALS";

/// Run the CLI with the current process arguments and environment.
///
/// # Errors
///
/// Returns [`CliError`] when arguments, configuration, the problem file or
/// the planner fail. Help and version requests surface as
/// [`CliError::ArgumentParsing`].
pub fn run() -> Result<(), CliError> {
    let cli = Cli::try_parse().map_err(CliError::ArgumentParsing)?;
    match cli.command {
        Command::Plan(args) => plan::run_plan(args),
    }
}

#[derive(Debug, Parser)]
#[command(
    name = "transport",
    about = "Plan package deliveries over a road network",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Solve a problem document and print the plan.
    Plan(PlanArgs),
}

#[cfg(test)]
mod tests;

//! Error types emitted by the Transport CLI.

use std::sync::Arc;

use camino::Utf8PathBuf;
use thiserror::Error;
use transport_core::{ApplyError, PlanError, ProblemError};
use transport_solver_search::UnknownHeuristicError;

/// Errors emitted by the Transport CLI.
#[derive(Debug, Error)]
pub enum CliError {
    /// Provided arguments failed Clap validation.
    #[error(transparent)]
    ArgumentParsing(#[from] clap::Error),
    /// Configuration layering failed (files, env, CLI).
    #[error("failed to load configuration: {0}")]
    Configuration(#[from] Arc<ortho_config::OrthoError>),
    /// A required option is missing after configuration merging.
    #[error("missing {field} (set --{field} or {env})")]
    MissingArgument {
        /// Option name.
        field: &'static str,
        /// Environment variable that can supply it.
        env: &'static str,
    },
    /// The requested planner requires a missing compile-time feature.
    #[error("{action} requires the `{feature}` feature to be enabled")]
    MissingFeature {
        /// Cargo feature name.
        feature: &'static str,
        /// What was asked for.
        action: String,
    },
    /// The planner name matches no known planner.
    #[error(
        "unknown planner `{name}`; expected astar, weighted-astar, bfs, bfs-exhaustive, \
         restart-<strategy> or backtrack"
    )]
    UnknownPlanner {
        /// The rejected name.
        name: String,
    },
    /// The heuristic name matches no known heuristic.
    #[error(transparent)]
    UnknownHeuristic(#[from] UnknownHeuristicError),
    /// A referenced input path does not exist on disk.
    #[error("{field} path {path:?} does not exist")]
    MissingSourceFile {
        /// Option naming the path.
        field: &'static str,
        /// Offending path.
        path: Utf8PathBuf,
    },
    /// A referenced input path exists but is not a file.
    #[error("{field} path {path:?} exists but is not a file")]
    SourcePathNotFile {
        /// Option naming the path.
        field: &'static str,
        /// Offending path.
        path: Utf8PathBuf,
    },
    /// A referenced input path could not be inspected due to an IO error.
    #[error("failed to inspect {field} path {path:?}: {source}")]
    InspectSourcePath {
        /// Option naming the path.
        field: &'static str,
        /// Offending path.
        path: Utf8PathBuf,
        /// Underlying failure.
        #[source]
        source: std::io::Error,
    },
    /// Reading the problem file failed.
    #[error("failed to read problem at {path:?}: {source}")]
    ReadProblem {
        /// Problem path.
        path: Utf8PathBuf,
        /// Underlying failure.
        #[source]
        source: std::io::Error,
    },
    /// Problem JSON could not be decoded.
    #[error("failed to parse problem JSON at {path:?}: {source}")]
    ParseProblem {
        /// Problem path.
        path: Utf8PathBuf,
        /// Decoder failure.
        #[source]
        source: serde_json::Error,
    },
    /// The problem document names unknown entities or breaks a model rule.
    #[error("problem in {path:?} is invalid: {source}")]
    InvalidProblem {
        /// Problem path.
        path: Utf8PathBuf,
        /// Validation failure.
        #[source]
        source: ProblemError,
    },
    /// The planner reported a structural defect.
    #[error("planner failed: {source}")]
    Plan {
        /// Planner failure.
        #[source]
        source: PlanError,
    },
    /// The planner finished or ran out of time without a plan.
    #[error("{planner} found no plan")]
    NoPlan {
        /// Planner name.
        planner: String,
    },
    /// A returned plan does not replay on the problem.
    #[error("plan from {planner} does not replay: {source}")]
    InvalidPlan {
        /// Planner name.
        planner: String,
        /// First rejected action.
        #[source]
        source: ApplyError,
    },
    /// A returned plan replays but leaves the goal unmet.
    #[error("plan from {planner} does not reach the goal")]
    GoalNotReached {
        /// Planner name.
        planner: String,
    },
    /// Serializing the plan failed.
    #[error("failed to serialize plan: {0}")]
    SerializePlan(#[source] serde_json::Error),
    /// Writing the plan to stdout failed.
    #[error("failed to write plan: {0}")]
    WritePlanOutput(#[source] std::io::Error),
    /// Writing the plan to the output file failed.
    #[error("failed to write plan to {path:?}: {source}")]
    WritePlanFile {
        /// Output path.
        path: Utf8PathBuf,
        /// Underlying failure.
        #[source]
        source: std::io::Error,
    },
}

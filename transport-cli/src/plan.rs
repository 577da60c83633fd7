//! `plan` command implementation.

use std::fmt;
use std::io::{BufReader, Write};
use std::sync::mpsc::{self, RecvTimeoutError};
use std::thread;
use std::time::Duration;

use camino::{Utf8Path, Utf8PathBuf};
use clap::Parser;
use ortho_config::{OrthoConfig, SubcmdConfigMerge};
use serde::{Deserialize, Serialize};
use transport_core::{
    ActionCosts, Domain, Plan, PlanDocument, PlanError, PlanState, Planner, Problem,
    ProblemDocument,
};
use transport_fs::open_utf8_file;
use transport_solver_search::{
    BreadthFirstConfig, BreadthFirstPlanner, ForwardAstarPlanner, HeuristicKind,
    WeightedAstarPlanner,
};
#[cfg(feature = "solver-randomized")]
use transport_solver_randomized::{
    BacktrackPlanner, RandomizedConfig, RestartPlanner, RestartStrategy,
};

use crate::{
    ARG_HEURISTIC, ARG_MAX_TRIALS, ARG_OUTPUT, ARG_PLANNER, ARG_PROBLEM, ARG_REFUEL_COST, ARG_SEED,
    ARG_TIME_LIMIT, CliError, ENV_MAX_TRIALS, ENV_PROBLEM,
};

const DEFAULT_SEED: u64 = 2017;
const DEFAULT_TIME_LIMIT_SECS: u64 = 30;

/// CLI arguments for the `plan` subcommand.
#[derive(Debug, Clone, Parser, Deserialize, Serialize, OrthoConfig, Default)]
#[command(
    long_about = "Load a JSON problem document, run a planner until it \
                 finishes or the time limit expires, verify the best plan by \
                 replaying it and print it as JSON. Planners: astar, \
                 weighted-astar, bfs, bfs-exhaustive, restart-on-path, \
                 restart-on-path-nearby, restart-around-path-nearby, \
                 restart-around-path-distribution and backtrack.",
    about = "Plan deliveries for a problem document"
)]
#[ortho_config(prefix = "TRANSPORT")]
pub(crate) struct PlanArgs {
    /// Path to a JSON problem document.
    #[arg(value_name = "path")]
    #[serde(default)]
    pub(crate) problem_path: Option<Utf8PathBuf>,
    /// Planner to run (default: astar).
    #[arg(long = ARG_PLANNER, value_name = "name")]
    #[serde(default)]
    pub(crate) planner: Option<String>,
    /// Heuristic for the A* planners.
    #[arg(long = ARG_HEURISTIC, value_name = "name")]
    #[serde(default)]
    pub(crate) heuristic: Option<String>,
    /// Seed for the randomized planners.
    #[arg(long = ARG_SEED, value_name = "n")]
    #[serde(default)]
    pub(crate) seed: Option<u64>,
    /// Seconds before the planner is cancelled; 0 disables the limit.
    #[arg(long = ARG_TIME_LIMIT, value_name = "secs")]
    #[serde(default)]
    pub(crate) time_limit: Option<u64>,
    /// Trial budget for the randomized planners.
    #[arg(long = ARG_MAX_TRIALS, value_name = "n")]
    #[serde(default)]
    pub(crate) max_trials: Option<u64>,
    /// Write the plan here instead of stdout.
    #[arg(long = ARG_OUTPUT, short = 'o', value_name = "path")]
    #[serde(default)]
    pub(crate) output: Option<Utf8PathBuf>,
    /// Cost of a refuel action.
    #[arg(long = ARG_REFUEL_COST, value_name = "cost")]
    #[serde(default)]
    pub(crate) refuel_cost: Option<u32>,
}

impl PlanArgs {
    pub(crate) fn into_config(self) -> Result<PlanConfig, CliError> {
        let merged = self.load_and_merge().map_err(CliError::Configuration)?;
        PlanConfig::try_from(merged)
    }
}

/// Planner selected by name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub(crate) enum PlannerChoice {
    #[default]
    Astar,
    WeightedAstar,
    BreadthFirst {
        exhaustive: bool,
    },
    #[cfg(feature = "solver-randomized")]
    Restart(RestartStrategy),
    #[cfg(feature = "solver-randomized")]
    Backtrack,
}

impl PlannerChoice {
    pub(crate) fn parse(name: &str) -> Result<Self, CliError> {
        let normalized = name.trim().to_ascii_lowercase();
        match normalized.as_str() {
            "astar" => Ok(Self::Astar),
            "weighted-astar" => Ok(Self::WeightedAstar),
            "bfs" => Ok(Self::BreadthFirst { exhaustive: false }),
            "bfs-exhaustive" => Ok(Self::BreadthFirst { exhaustive: true }),
            other => Self::parse_randomized(other),
        }
    }

    #[cfg(feature = "solver-randomized")]
    fn parse_randomized(name: &str) -> Result<Self, CliError> {
        match name {
            "backtrack" => Ok(Self::Backtrack),
            "restart" => Ok(Self::Restart(RestartStrategy::default())),
            _ => name
                .strip_prefix("restart-")
                .and_then(|strategy| strategy.parse().ok())
                .map(Self::Restart)
                .ok_or_else(|| CliError::UnknownPlanner {
                    name: name.to_owned(),
                }),
        }
    }

    #[cfg(not(feature = "solver-randomized"))]
    fn parse_randomized(name: &str) -> Result<Self, CliError> {
        if name == "backtrack" || name.starts_with("restart") {
            Err(CliError::MissingFeature {
                feature: "solver-randomized",
                action: format!("planner `{name}`"),
            })
        } else {
            Err(CliError::UnknownPlanner {
                name: name.to_owned(),
            })
        }
    }

    /// True for planners that only stop when cancelled or out of trials.
    pub(crate) const fn is_anytime(self) -> bool {
        match self {
            Self::Astar | Self::WeightedAstar | Self::BreadthFirst { .. } => false,
            #[cfg(feature = "solver-randomized")]
            Self::Restart(_) | Self::Backtrack => true,
        }
    }
}

impl fmt::Display for PlannerChoice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Astar => f.write_str("astar"),
            Self::WeightedAstar => f.write_str("weighted-astar"),
            Self::BreadthFirst { exhaustive: false } => f.write_str("bfs"),
            Self::BreadthFirst { exhaustive: true } => f.write_str("bfs-exhaustive"),
            #[cfg(feature = "solver-randomized")]
            Self::Restart(strategy) => write!(f, "restart-{strategy}"),
            #[cfg(feature = "solver-randomized")]
            Self::Backtrack => f.write_str("backtrack"),
        }
    }
}

/// Resolved `plan` command configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct PlanConfig {
    /// Path to the JSON problem document.
    pub(crate) problem_path: Utf8PathBuf,
    pub(crate) planner: PlannerChoice,
    /// `None` keeps the planner's own default heuristic.
    pub(crate) heuristic: Option<HeuristicKind>,
    pub(crate) seed: u64,
    /// `None` lets the planner run until it finishes.
    pub(crate) time_limit: Option<Duration>,
    pub(crate) max_trials: Option<u64>,
    /// `None` prints to stdout.
    pub(crate) output: Option<Utf8PathBuf>,
    pub(crate) costs: ActionCosts,
}

impl PlanConfig {
    pub(crate) fn validate_sources(&self) -> Result<(), CliError> {
        require_existing(&self.problem_path, ARG_PROBLEM)
    }

    /// Domain for a problem, with fuel rules when any vehicle has a tank.
    pub(crate) fn domain(&self, fuel: bool) -> Domain {
        let domain = if fuel {
            Domain::with_fuel()
        } else {
            Domain::sequential()
        };
        domain.with_costs(self.costs)
    }

    #[cfg(feature = "solver-randomized")]
    fn randomized(&self) -> RandomizedConfig {
        let config = RandomizedConfig::default().with_seed(self.seed);
        self.max_trials
            .map_or(config, |trials| config.with_max_trials(trials))
    }
}

fn require_existing(path: &Utf8Path, field: &'static str) -> Result<(), CliError> {
    match transport_fs::file_is_file(path) {
        Ok(true) => Ok(()),
        Ok(false) => Err(CliError::SourcePathNotFile {
            field,
            path: path.to_path_buf(),
        }),
        Err(source) if source.kind() == std::io::ErrorKind::NotFound => {
            Err(CliError::MissingSourceFile {
                field,
                path: path.to_path_buf(),
            })
        }
        Err(source) => Err(CliError::InspectSourcePath {
            field,
            path: path.to_path_buf(),
            source,
        }),
    }
}

impl TryFrom<PlanArgs> for PlanConfig {
    type Error = CliError;

    fn try_from(args: PlanArgs) -> Result<Self, Self::Error> {
        let problem_path = args.problem_path.ok_or(CliError::MissingArgument {
            field: ARG_PROBLEM,
            env: ENV_PROBLEM,
        })?;
        let planner = args
            .planner
            .as_deref()
            .map_or(Ok(PlannerChoice::default()), PlannerChoice::parse)?;
        let heuristic = args
            .heuristic
            .as_deref()
            .map(str::parse::<HeuristicKind>)
            .transpose()?;
        let time_limit = match args.time_limit.unwrap_or(DEFAULT_TIME_LIMIT_SECS) {
            0 => None,
            secs => Some(Duration::from_secs(secs)),
        };
        if planner.is_anytime() && time_limit.is_none() && args.max_trials.is_none() {
            return Err(CliError::MissingArgument {
                field: ARG_MAX_TRIALS,
                env: ENV_MAX_TRIALS,
            });
        }
        let defaults = ActionCosts::default();
        Ok(Self {
            problem_path,
            planner,
            heuristic,
            seed: args.seed.unwrap_or(DEFAULT_SEED),
            time_limit,
            max_trials: args.max_trials,
            output: args.output,
            costs: ActionCosts {
                refuel: args.refuel_cost.unwrap_or(defaults.refuel),
                ..defaults
            },
        })
    }
}

/// Builds the planner for the current invocation.
pub(crate) trait PlannerBuilder {
    fn build(&self, config: &PlanConfig) -> Box<dyn Planner>;
}

pub(crate) struct DefaultPlannerBuilder;

impl PlannerBuilder for DefaultPlannerBuilder {
    fn build(&self, config: &PlanConfig) -> Box<dyn Planner> {
        let heuristic = config.heuristic;
        match config.planner {
            PlannerChoice::Astar => Box::new(
                heuristic.map_or_else(ForwardAstarPlanner::default, ForwardAstarPlanner::new),
            ),
            PlannerChoice::WeightedAstar => Box::new(
                heuristic.map_or_else(WeightedAstarPlanner::default, WeightedAstarPlanner::new),
            ),
            PlannerChoice::BreadthFirst { exhaustive } => Box::new(
                BreadthFirstPlanner::with_config(BreadthFirstConfig { exhaustive }),
            ),
            #[cfg(feature = "solver-randomized")]
            PlannerChoice::Restart(strategy) => Box::new(RestartPlanner::with_config(
                strategy,
                config.randomized(),
            )),
            #[cfg(feature = "solver-randomized")]
            PlannerChoice::Backtrack => {
                Box::new(BacktrackPlanner::with_config(config.randomized()))
            }
        }
    }
}

pub(crate) fn run_plan(args: PlanArgs) -> Result<(), CliError> {
    let mut stdout = std::io::stdout().lock();
    run_plan_with(args, &DefaultPlannerBuilder, &mut stdout)
}

pub(crate) fn run_plan_with(
    args: PlanArgs,
    builder: &dyn PlannerBuilder,
    writer: &mut dyn Write,
) -> Result<(), CliError> {
    let config = resolve_plan_config(args)?;
    let document = execute_plan(&config, builder)?;
    write_plan(&config, writer, &document)
}

fn resolve_plan_config(args: PlanArgs) -> Result<PlanConfig, CliError> {
    let config = args.into_config()?;
    config.validate_sources()?;
    Ok(config)
}

fn execute_plan(
    config: &PlanConfig,
    builder: &dyn PlannerBuilder,
) -> Result<PlanDocument, CliError> {
    let document = load_problem(&config.problem_path)?;
    let domain = config.domain(document.uses_fuel());
    let problem = document
        .into_problem()
        .map_err(|source| CliError::InvalidProblem {
            path: config.problem_path.clone(),
            source,
        })?;
    let planner = builder.build(config);
    log::info!(
        "planning {} with {} (seed {}, time limit {:?})",
        problem.name(),
        planner.name(),
        config.seed,
        config.time_limit
    );
    let plan = plan_within(planner.as_ref(), &domain, &problem, config.time_limit)
        .map_err(|source| CliError::Plan { source })?
        .ok_or_else(|| CliError::NoPlan {
            planner: planner.name().to_owned(),
        })?;
    verify_plan(planner.name(), &problem, &plan)?;
    log::info!(
        "{} found a plan of {} actions costing {}",
        planner.name(),
        plan.actions().len(),
        plan.total_cost()
    );
    Ok(PlanDocument::new(&plan, &problem))
}

/// Run `planner`, cancelling it from a timer thread once `limit` expires.
pub(crate) fn plan_within(
    planner: &dyn Planner,
    domain: &Domain,
    problem: &Problem,
    limit: Option<Duration>,
) -> Result<Option<Plan>, PlanError> {
    let Some(limit) = limit else {
        return planner.plan(domain, problem);
    };
    let token = planner.cancellation_token().clone();
    let (finished, done) = mpsc::channel::<()>();
    thread::scope(|scope| {
        scope.spawn(move || {
            if matches!(done.recv_timeout(limit), Err(RecvTimeoutError::Timeout)) {
                log::info!("time limit of {limit:?} reached, cancelling");
                token.cancel();
            }
        });
        let outcome = planner.plan(domain, problem);
        drop(finished);
        outcome
    })
}

fn verify_plan(planner: &str, problem: &Problem, plan: &Plan) -> Result<(), CliError> {
    let end = PlanState::replay(problem.clone(), plan.actions()).map_err(|source| {
        CliError::InvalidPlan {
            planner: planner.to_owned(),
            source,
        }
    })?;
    if end.is_goal() {
        Ok(())
    } else {
        Err(CliError::GoalNotReached {
            planner: planner.to_owned(),
        })
    }
}

/// Loads a JSON-encoded [`ProblemDocument`] from disk.
pub(crate) fn load_problem(path: &Utf8Path) -> Result<ProblemDocument, CliError> {
    let file = open_utf8_file(path).map_err(|source| CliError::ReadProblem {
        path: path.to_path_buf(),
        source,
    })?;
    serde_json::from_reader(BufReader::new(file)).map_err(|source| CliError::ParseProblem {
        path: path.to_path_buf(),
        source,
    })
}

fn write_plan(
    config: &PlanConfig,
    writer: &mut dyn Write,
    document: &PlanDocument,
) -> Result<(), CliError> {
    let mut payload = serde_json::to_string_pretty(document).map_err(CliError::SerializePlan)?;
    payload.push('\n');
    match &config.output {
        Some(path) => transport_fs::write_utf8_file(path, payload.as_bytes()).map_err(|source| {
            CliError::WritePlanFile {
                path: path.clone(),
                source,
            }
        }),
        None => writer
            .write_all(payload.as_bytes())
            .map_err(CliError::WritePlanOutput),
    }
}

#[cfg(test)]
pub(crate) fn config_from_layers_for_test(
    layers: Vec<ortho_config::MergeLayer<'static>>,
) -> Result<PlanConfig, CliError> {
    let merged = PlanArgs::merge_from_layers(layers).map_err(CliError::from)?;
    PlanConfig::try_from(merged)
}

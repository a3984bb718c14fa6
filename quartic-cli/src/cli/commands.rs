//! Command implementations and argument parsing for the quartic CLI.

use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};

use clap::{Args, Parser, Subcommand, ValueEnum};
use quartic_core::{
    CirculantGraph, DEFAULT_APPROXIMATE_WINDOW, DEFAULT_EXACT_WINDOW, DEFAULT_EXHAUSTIVE_BUDGET,
    DEFAULT_RNG_SEED, DEFAULT_THRESHOLD, GraphError, InfectionNumber, InfectionSearch,
    QuarticError, Regularity, SeedCensus, SeedError, SeedSampler, SeedSet, Simulator,
    SimulatorBuilder, Stability, Survey, SurveyRecord, SurveySummary, Topology, UniformSampler,
    Verdict, census, stability, summarize, valid_offsets, verify_infection_number,
};
use serde::Serialize;
use thiserror::Error;
use tracing::{Span, field, info, instrument};

use super::render::write_survey_csv;

/// Top-level CLI options parsed by [`clap`].
#[derive(Debug, Parser, Clone)]
#[command(
    name = "quartic",
    about = "Simulate threshold infection on quartic circulant graphs C_n(3,a)."
)]
pub struct Cli {
    /// Command to execute.
    #[command(subcommand)]
    pub command: Command,
}

/// Supported CLI commands.
#[derive(Debug, Subcommand, Clone)]
pub enum Command {
    /// Run the infection process from one seed and print every round.
    Simulate(SimulateCommand),
    /// Search for the infection number m_2 of one graph.
    InfectionNumber(InfectionNumberCommand),
    /// Count contagious seeds among every seed of one size.
    Census(CensusCommand),
    /// Compute m_2 for every valid graph in a range of orders.
    Survey(SurveyCommand),
    /// List the offsets a that give a valid C_n(3,a).
    Offsets(OffsetsCommand),
}

impl Command {
    /// Returns the output format requested for this command.
    #[must_use]
    pub fn format(&self) -> OutputFormat {
        match self {
            Self::Simulate(command) => command.format,
            Self::InfectionNumber(command) => command.format,
            Self::Census(command) => command.format,
            Self::Survey(command) => command.format,
            Self::Offsets(command) => command.format,
        }
    }

    fn label(&self) -> &'static str {
        match self {
            Self::Simulate(_) => "simulate",
            Self::InfectionNumber(_) => "infection-number",
            Self::Census(_) => "census",
            Self::Survey(_) => "survey",
            Self::Offsets(_) => "offsets",
        }
    }
}

/// Rendering used for command output on `stdout`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable text.
    #[default]
    Text,
    /// Pretty-printed JSON.
    Json,
}

/// Graph selection and infection rule shared by single-graph commands.
#[derive(Debug, Args, Clone)]
pub struct GraphArgs {
    /// Number of vertices n.
    #[arg(long)]
    pub order: usize,

    /// Second offset a of C_n(3,a).
    #[arg(long)]
    pub offset: usize,

    /// Infected neighbours needed to infect a healthy vertex.
    #[arg(long, default_value_t = DEFAULT_THRESHOLD)]
    pub threshold: usize,

    /// Accept connected graphs that are not 4-regular.
    #[arg(long)]
    pub relaxed: bool,
}

/// Options accepted by the `simulate` command.
#[derive(Debug, Args, Clone)]
pub struct SimulateCommand {
    /// Graph and rule selection.
    #[command(flatten)]
    pub graph: GraphArgs,

    /// Comma-separated seed vertices.
    #[arg(
        long,
        value_delimiter = ',',
        required_unless_present = "random",
        conflicts_with = "random"
    )]
    pub seeds: Vec<usize>,

    /// Draw a random seed of this size instead of listing vertices.
    #[arg(long)]
    pub random: Option<usize>,

    /// Seed for `--random`.
    #[arg(long, default_value_t = DEFAULT_RNG_SEED)]
    pub rng_seed: u64,

    /// Output format.
    #[arg(long, value_enum, default_value_t)]
    pub format: OutputFormat,
}

/// Options accepted by the `infection-number` command.
#[derive(Debug, Args, Clone)]
pub struct InfectionNumberCommand {
    /// Graph and rule selection.
    #[command(flatten)]
    pub graph: GraphArgs,

    /// Largest seed size to try (defaults to n).
    #[arg(long)]
    pub max_size: Option<usize>,

    /// Subsets tested exhaustively per size before switching to heuristics.
    #[arg(long, default_value_t = DEFAULT_EXHAUSTIVE_BUDGET)]
    pub budget: u64,

    /// Re-check the result exhaustively.
    #[arg(long)]
    pub verify: bool,

    /// Output format.
    #[arg(long, value_enum, default_value_t)]
    pub format: OutputFormat,
}

/// Options accepted by the `census` command.
#[derive(Debug, Args, Clone)]
pub struct CensusCommand {
    /// Graph and rule selection.
    #[command(flatten)]
    pub graph: GraphArgs,

    /// Seed size to enumerate.
    #[arg(long)]
    pub size: usize,

    /// Output format.
    #[arg(long, value_enum, default_value_t)]
    pub format: OutputFormat,
}

/// Options accepted by the `survey` command.
#[derive(Debug, Args, Clone)]
pub struct SurveyCommand {
    /// Smallest order surveyed.
    #[arg(long)]
    pub min_order: usize,

    /// Largest order surveyed.
    #[arg(long)]
    pub max_order: usize,

    /// Survey only C_n(3,a) for this a and report how m_2 settles.
    #[arg(long)]
    pub offset: Option<usize>,

    /// Infected neighbours needed to infect a healthy vertex.
    #[arg(long, default_value_t = DEFAULT_THRESHOLD)]
    pub threshold: usize,

    /// Subsets tested exhaustively per size before switching to heuristics.
    #[arg(long, default_value_t = DEFAULT_EXHAUSTIVE_BUDGET)]
    pub budget: u64,

    /// Largest seed size tried per graph (defaults to n).
    #[arg(long)]
    pub max_size: Option<usize>,

    /// Process graphs on the current thread only.
    #[arg(long)]
    pub sequential: bool,

    /// Also write the records to this CSV file.
    #[arg(long)]
    pub csv: Option<PathBuf>,

    /// Output format.
    #[arg(long, value_enum, default_value_t)]
    pub format: OutputFormat,
}

/// Options accepted by the `offsets` command.
#[derive(Debug, Args, Clone)]
pub struct OffsetsCommand {
    /// Number of vertices n.
    #[arg(long)]
    pub order: usize,

    /// Output format.
    #[arg(long, value_enum, default_value_t)]
    pub format: OutputFormat,
}

/// Errors surfaced while executing CLI commands.
#[derive(Debug, Error)]
pub enum CliError {
    /// Writing an output file failed.
    #[error("failed to write `{path}`: {source}")]
    Io {
        /// Path that triggered the failure.
        path: PathBuf,
        /// Underlying operating system error.
        #[source]
        source: io::Error,
    },
    /// Core validation or computation failed.
    #[error(transparent)]
    Core(#[from] QuarticError),
}

impl From<GraphError> for CliError {
    fn from(error: GraphError) -> Self {
        Self::Core(error.into())
    }
}

impl From<SeedError> for CliError {
    fn from(error: SeedError) -> Self {
        Self::Core(error.into())
    }
}

/// One round of a simulation as reported to the user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RoundReport {
    /// Round index, zero for the seed.
    pub round: usize,
    /// Infected vertices after this round.
    pub infected: Vec<usize>,
    /// Vertices infected during this round.
    pub newly_infected: Vec<usize>,
}

/// Outcome of the `simulate` command.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SimulationReport {
    /// Graph name, e.g. `C_12(3,2)`.
    pub graph: String,
    /// Number of vertices.
    pub order: usize,
    /// Infection threshold used.
    pub threshold: usize,
    /// Seed the run started from.
    pub seed: Vec<usize>,
    /// Every stored snapshot.
    pub rounds: Vec<RoundReport>,
    /// Round at which the state stopped changing.
    pub fixpoint_round: usize,
    /// Final verdict.
    pub verdict: Verdict,
}

/// Outcome of the `infection-number` command.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct InfectionNumberReport {
    /// Graph name.
    pub graph: String,
    /// Infection threshold used.
    pub threshold: usize,
    /// Search result.
    pub m2: usize,
    /// Witness seed.
    pub witness: Vec<usize>,
    /// Whether every smaller size was exhausted.
    pub exact: bool,
    /// Exhaustive verification result, when requested.
    pub verified: Option<bool>,
}

/// Outcome of the `census` command.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CensusReport {
    /// Graph name.
    pub graph: String,
    /// Infection threshold used.
    pub threshold: usize,
    /// Counts over every seed of the requested size.
    pub census: SeedCensus,
    /// Fraction of contagious seeds.
    pub success_ratio: f64,
}

/// Outcome of the `survey` command.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SurveyReport {
    /// One record per surveyed graph, ordered by `(n, a)`.
    pub records: Vec<SurveyRecord>,
    /// Aggregate statistics, absent when no graph was valid.
    pub summary: Option<SurveySummary>,
    /// Settling behaviour of m_2, reported for fixed-offset surveys.
    pub stability: Option<Stability>,
    /// CSV file written alongside, if any.
    pub csv: Option<PathBuf>,
}

/// Outcome of the `offsets` command.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OffsetsReport {
    /// Number of vertices.
    pub order: usize,
    /// Valid offsets in ascending order.
    pub offsets: Vec<usize>,
}

/// Result of executing any CLI command.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum CommandOutput {
    /// Output of `simulate`.
    Simulation(SimulationReport),
    /// Output of `infection-number`.
    InfectionNumber(InfectionNumberReport),
    /// Output of `census`.
    Census(CensusReport),
    /// Output of `survey`.
    Survey(SurveyReport),
    /// Output of `offsets`.
    Offsets(OffsetsReport),
}

/// Executes the CLI command represented by `cli`.
///
/// # Errors
/// Returns [`CliError`] when validation, computation, or file output fails.
///
/// # Examples
/// ```
/// use clap::Parser;
/// use quartic_cli::cli::{Cli, CommandOutput, run_cli};
///
/// let cli = Cli::parse_from(["quartic", "offsets", "--order", "12"]);
/// let CommandOutput::Offsets(report) = run_cli(cli)? else {
///     unreachable!("offsets command yields an offsets report");
/// };
/// assert_eq!(report.offsets, [1, 2, 4, 5, 7, 8, 10, 11]);
/// # Ok::<(), quartic_cli::cli::CliError>(())
/// ```
#[instrument(name = "cli.run", err, skip(cli), fields(command = field::Empty))]
pub fn run_cli(cli: Cli) -> Result<CommandOutput, CliError> {
    Span::current().record("command", field::display(cli.command.label()));
    match cli.command {
        Command::Simulate(command) => run_simulate(command).map(CommandOutput::Simulation),
        Command::InfectionNumber(command) => {
            run_infection_number(command).map(CommandOutput::InfectionNumber)
        }
        Command::Census(command) => run_census(command).map(CommandOutput::Census),
        Command::Survey(command) => run_survey(command).map(CommandOutput::Survey),
        Command::Offsets(command) => Ok(CommandOutput::Offsets(run_offsets(&command))),
    }
}

fn build_graph(args: &GraphArgs) -> Result<CirculantGraph, CliError> {
    let regularity = if args.relaxed {
        Regularity::Connected
    } else {
        Regularity::Quartic
    };
    Ok(CirculantGraph::builder(args.order, args.offset)
        .with_regularity(regularity)
        .build()?)
}

fn build_simulator(threshold: usize) -> Result<Simulator, CliError> {
    Ok(SimulatorBuilder::new().with_threshold(threshold).build()?)
}

#[instrument(
    name = "cli.simulate",
    err,
    skip(command),
    fields(graph = field::Empty, seed = field::Empty),
)]
pub(super) fn run_simulate(command: SimulateCommand) -> Result<SimulationReport, CliError> {
    let graph = build_graph(&command.graph)?;
    let simulator = build_simulator(command.graph.threshold)?;
    let seed = match command.random {
        Some(size) => UniformSampler::seeded(command.rng_seed).sample(graph.order(), size)?,
        None => SeedSet::new(graph.order(), command.seeds)?,
    }
    .ensure_non_empty()?;

    let span = Span::current();
    span.record("graph", field::display(graph.name()));
    span.record("seed", field::display(&seed));

    let trajectory = simulator.run(&graph, &seed)?;
    let rounds = trajectory
        .snapshots()
        .enumerate()
        .map(|(round, state)| RoundReport {
            round,
            infected: state.infected_vertices().collect(),
            newly_infected: trajectory.newly_infected(round).unwrap_or_default(),
        })
        .collect();
    info!(
        rounds = trajectory.fixpoint_round(),
        verdict = trajectory.verdict().label(),
        "simulation completed"
    );
    Ok(SimulationReport {
        graph: graph.name().to_owned(),
        order: graph.order(),
        threshold: simulator.threshold().get(),
        seed: seed.vertices().to_vec(),
        rounds,
        fixpoint_round: trajectory.fixpoint_round(),
        verdict: trajectory.verdict(),
    })
}

#[instrument(
    name = "cli.infection_number",
    err,
    skip(command),
    fields(graph = field::Empty, budget = command.budget),
)]
pub(super) fn run_infection_number(
    command: InfectionNumberCommand,
) -> Result<InfectionNumberReport, CliError> {
    let graph = build_graph(&command.graph)?;
    let simulator = build_simulator(command.graph.threshold)?;
    Span::current().record("graph", field::display(graph.name()));

    let mut search = InfectionSearch::new().with_exhaustive_budget(command.budget);
    if let Some(max_size) = command.max_size {
        search = search.with_max_size(max_size);
    }
    let InfectionNumber {
        value,
        witness,
        exact,
    } = search.infection_number(&simulator, &graph)?;
    let verified = if command.verify {
        Some(verify_infection_number(&simulator, &graph, value)?)
    } else {
        None
    };
    info!(m2 = value, exact, "infection number computed");
    Ok(InfectionNumberReport {
        graph: graph.name().to_owned(),
        threshold: simulator.threshold().get(),
        m2: value,
        witness: witness.vertices().to_vec(),
        exact,
        verified,
    })
}

#[instrument(
    name = "cli.census",
    err,
    skip(command),
    fields(graph = field::Empty, size = command.size),
)]
pub(super) fn run_census(command: CensusCommand) -> Result<CensusReport, CliError> {
    let graph = build_graph(&command.graph)?;
    let simulator = build_simulator(command.graph.threshold)?;
    Span::current().record("graph", field::display(graph.name()));

    let counts = census(&simulator, &graph, command.size)?;
    Ok(CensusReport {
        graph: graph.name().to_owned(),
        threshold: simulator.threshold().get(),
        success_ratio: counts.success_ratio(),
        census: counts,
    })
}

#[instrument(
    name = "cli.survey",
    err,
    skip(command),
    fields(
        min_order = command.min_order,
        max_order = command.max_order,
        records = field::Empty,
    ),
)]
pub(super) fn run_survey(command: SurveyCommand) -> Result<SurveyReport, CliError> {
    let simulator = build_simulator(command.threshold)?;
    let mut search = InfectionSearch::new().with_exhaustive_budget(command.budget);
    if let Some(max_size) = command.max_size {
        search = search.with_max_size(max_size);
    }
    let survey = Survey::new(simulator, search).with_parallel(!command.sequential);
    let orders = command.min_order..=command.max_order;

    let (records, settled) = match command.offset {
        Some(offset) => {
            let records = survey.run_fixed_offset(offset, orders)?;
            let settled = stability(
                &records,
                offset,
                DEFAULT_EXACT_WINDOW,
                DEFAULT_APPROXIMATE_WINDOW,
            );
            (records, Some(settled))
        }
        None => (survey.run(orders)?, None),
    };
    Span::current().record("records", records.len());

    if let Some(path) = &command.csv {
        write_csv_file(path, &records)?;
        info!(path = %path.display(), "survey CSV written");
    }

    Ok(SurveyReport {
        summary: summarize(&records),
        records,
        stability: settled,
        csv: command.csv,
    })
}

fn write_csv_file(path: &Path, records: &[SurveyRecord]) -> Result<(), CliError> {
    let to_cli = |source: io::Error| CliError::Io {
        path: path.to_path_buf(),
        source,
    };
    let file = File::create(path).map_err(to_cli)?;
    let mut writer = BufWriter::new(file);
    write_survey_csv(records, &mut writer).map_err(to_cli)?;
    writer.flush().map_err(to_cli)
}

pub(super) fn run_offsets(command: &OffsetsCommand) -> OffsetsReport {
    OffsetsReport {
        order: command.order,
        offsets: valid_offsets(command.order),
    }
}

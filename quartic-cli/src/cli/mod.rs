//! Command-line interface over the quartic core library.
//!
//! Each subcommand builds a graph (or a range of graphs), runs the matching
//! core operation, and returns a serialisable report that [`render_output`]
//! prints as text or JSON.

mod commands;
mod render;

pub use commands::{
    CensusCommand, CensusReport, Cli, CliError, Command, CommandOutput, GraphArgs,
    InfectionNumberCommand, InfectionNumberReport, OffsetsCommand, OffsetsReport, OutputFormat,
    RoundReport, SimulateCommand, SimulationReport, SurveyCommand, SurveyReport, run_cli,
};
pub use render::{render_output, write_survey_csv};

#[cfg(test)]
mod test_helpers;

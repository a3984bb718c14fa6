//! Text, JSON, and CSV rendering of command output.

use std::io::{self, Write};

use quartic_core::{Stability, SurveyRecord, SurveySummary, Verdict};

use super::commands::{
    CensusReport, CommandOutput, InfectionNumberReport, OffsetsReport, OutputFormat,
    SimulationReport, SurveyReport,
};

const CSV_HEADER: &str = "n,a,m2,contagious_set,exact,computation_time";

/// Renders `output` to `writer` in the requested format.
///
/// # Errors
/// Returns [`io::Error`] if writing to the supplied writer fails.
///
/// # Examples
/// ```
/// use quartic_cli::cli::{CommandOutput, OffsetsReport, OutputFormat, render_output};
///
/// let output = CommandOutput::Offsets(OffsetsReport { order: 5, offsets: vec![1, 4] });
/// let mut buffer = Vec::new();
/// render_output(&output, OutputFormat::Text, &mut buffer)?;
/// assert_eq!(String::from_utf8_lossy(&buffer), "valid offsets for n = 5: 1, 4\n");
/// # Ok::<(), std::io::Error>(())
/// ```
pub fn render_output(
    output: &CommandOutput,
    format: OutputFormat,
    mut writer: impl Write,
) -> io::Result<()> {
    match format {
        OutputFormat::Json => {
            serde_json::to_writer_pretty(&mut writer, output)?;
            writeln!(writer)
        }
        OutputFormat::Text => match output {
            CommandOutput::Simulation(report) => render_simulation(report, writer),
            CommandOutput::InfectionNumber(report) => render_infection_number(report, writer),
            CommandOutput::Census(report) => render_census(report, writer),
            CommandOutput::Survey(report) => render_survey(report, writer),
            CommandOutput::Offsets(report) => render_offsets(report, writer),
        },
    }
}

/// Writes survey records as CSV with a header row.
///
/// The witness column is quoted because it contains commas.
///
/// # Errors
/// Returns [`io::Error`] if writing to the supplied writer fails.
pub fn write_survey_csv(records: &[SurveyRecord], mut writer: impl Write) -> io::Result<()> {
    writeln!(writer, "{CSV_HEADER}")?;
    for record in records {
        writeln!(
            writer,
            "{},{},{},\"{}\",{},{:.6}",
            record.n,
            record.a,
            record.m2,
            record.contagious_set,
            record.exact,
            record.elapsed.as_secs_f64(),
        )?;
    }
    Ok(())
}

fn braces(vertices: &[usize]) -> String {
    let listed: Vec<String> = vertices.iter().map(ToString::to_string).collect();
    format!("{{{}}}", listed.join(", "))
}

fn render_simulation(report: &SimulationReport, mut writer: impl Write) -> io::Result<()> {
    writeln!(writer, "graph: {} (threshold {})", report.graph, report.threshold)?;
    writeln!(writer, "seed: {}", braces(&report.seed))?;
    for round in &report.rounds {
        write!(
            writer,
            "round {}: {}/{} infected {}",
            round.round,
            round.infected.len(),
            report.order,
            braces(&round.infected),
        )?;
        if round.round > 0 {
            write!(writer, " new {}", braces(&round.newly_infected))?;
        }
        writeln!(writer)?;
    }
    match &report.verdict {
        Verdict::FullyInfected => writeln!(
            writer,
            "verdict: fully infected at round {}",
            report.fixpoint_round
        ),
        Verdict::Stalled { healthy } => writeln!(
            writer,
            "verdict: stalled at round {} with healthy {}",
            report.fixpoint_round,
            braces(healthy)
        ),
    }
}

fn render_infection_number(
    report: &InfectionNumberReport,
    mut writer: impl Write,
) -> io::Result<()> {
    let qualifier = if report.exact { "exact" } else { "upper bound" };
    writeln!(
        writer,
        "{}: m_2 = {} ({qualifier}, threshold {})",
        report.graph, report.m2, report.threshold
    )?;
    writeln!(writer, "witness: {}", braces(&report.witness))?;
    if let Some(verified) = report.verified {
        let outcome = if verified { "confirmed" } else { "rejected" };
        writeln!(writer, "verification: {outcome}")?;
    }
    Ok(())
}

fn render_census(report: &CensusReport, mut writer: impl Write) -> io::Result<()> {
    let census = &report.census;
    writeln!(
        writer,
        "{}: {} seeds of size {} tested, {} contagious, {} stalled ({:.1}% contagious)",
        report.graph,
        census.tested,
        census.size,
        census.contagious,
        census.stalled(),
        report.success_ratio * 100.0,
    )
}

fn render_survey(report: &SurveyReport, mut writer: impl Write) -> io::Result<()> {
    let mut current = None;
    for record in &report.records {
        if current != Some(record.n) {
            writeln!(writer, "n = {}", record.n)?;
            current = Some(record.n);
        }
        let marker = if record.exact { "" } else { " (upper bound)" };
        writeln!(
            writer,
            "  a = {:>3}  m_2 = {}{marker}  witness {}  {:.3}s",
            record.a,
            record.m2,
            record.contagious_set,
            record.elapsed.as_secs_f64(),
        )?;
    }
    match &report.summary {
        Some(summary) => render_summary(summary, &mut writer)?,
        None => writeln!(writer, "no valid graphs in range")?,
    }
    if let Some(stability) = &report.stability {
        render_stability(stability, &mut writer)?;
    }
    if let Some(path) = &report.csv {
        writeln!(writer, "csv: {}", path.display())?;
    }
    Ok(())
}

fn render_summary(summary: &SurveySummary, mut writer: impl Write) -> io::Result<()> {
    writeln!(
        writer,
        "summary: {} graphs, n in {}..={}, m_2 in {}..={}, mean m_2 {:.3}",
        summary.total_graphs,
        summary.order_range.0,
        summary.order_range.1,
        summary.m2_range.0,
        summary.m2_range.1,
        summary.mean_m2,
    )?;
    writeln!(
        writer,
        "time: {:.3}s total, {:.3}s per graph",
        summary.total_time.as_secs_f64(),
        summary.mean_time.as_secs_f64(),
    )
}

fn render_stability(stability: &Stability, mut writer: impl Write) -> io::Result<()> {
    match stability {
        Stability::Stable { value, from_n } => {
            writeln!(writer, "stability: m_2 = {value} for every n >= {from_n}")
        }
        Stability::Approximate { low, high, from_n } => writeln!(
            writer,
            "stability: m_2 within {low}..={high} for every n >= {from_n}"
        ),
        Stability::Unstable => writeln!(writer, "stability: no settled value"),
    }
}

fn render_offsets(report: &OffsetsReport, mut writer: impl Write) -> io::Result<()> {
    let offsets: Vec<String> = report.offsets.iter().map(ToString::to_string).collect();
    if offsets.is_empty() {
        return writeln!(writer, "no valid offsets for n = {}", report.order);
    }
    writeln!(
        writer,
        "valid offsets for n = {}: {}",
        report.order,
        offsets.join(", ")
    )
}

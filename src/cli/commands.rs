//! Command implementations for the run dashboard CLI
//!
//! This module contains command dispatch, logging setup, configuration
//! loading and the text/JSON renderers for session results.

use crate::app::models::{ChartPoint, OverallMetrics, PersonMetrics, ValidationError};
use crate::app::services::csv_parser::CsvSource;
use crate::app::session::{Session, SessionStore};
use crate::cli::args::{Args, Commands, OutputFormat, SummaryArgs, ValidateArgs};
use crate::config::Config;
use crate::constants::LOG_TARGET;
use crate::{Error, Result};
use colored::*;
use serde::Serialize;
use tracing::{debug, info};

/// What a command found, used by `main` to pick the exit code
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CommandReport {
    /// Whether the parsed file was committed
    pub valid: bool,
    /// Number of records committed, or errors reported
    pub count: usize,
}

/// Main command runner for the run dashboard
///
/// Sets up logging, loads configuration and dispatches to the subcommand.
pub async fn run(args: Args) -> Result<CommandReport> {
    setup_logging(&args)?;
    debug!("Command line arguments: {:?}", args);

    args.validate()?;
    let config = load_configuration(&args)?;

    match args.command {
        Some(Commands::Summary(summary_args)) => run_summary(summary_args, &config).await,
        Some(Commands::Validate(validate_args)) => run_validate(validate_args, &config).await,
        None => Err(Error::configuration("No command given")),
    }
}

fn setup_logging(args: &Args) -> Result<()> {
    use tracing_subscriber::{
        EnvFilter, Layer, fmt, layer::SubscriberExt, util::SubscriberInitExt,
    };

    let log_level = args.get_log_level();
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("{}={}", LOG_TARGET, log_level)));

    // stdout carries the report, so logs always go to stderr
    let base = fmt::layer()
        .with_target(false)
        .with_level(true)
        .with_writer(std::io::stderr);
    let output = if args.quiet {
        base.compact().boxed()
    } else {
        base.with_timer(fmt::time::uptime()).boxed()
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(output)
        .try_init()
        .map_err(|e| Error::configuration(format!("Failed to initialize logging: {}", e)))?;

    debug!("Logging initialized at level: {}", log_level);
    Ok(())
}

fn load_configuration(args: &Args) -> Result<Config> {
    match &args.config_file {
        Some(path) => info!("Using config file: {}", path.display()),
        None => debug!("No config file given, using defaults"),
    }

    let config = Config::load(args.config_file.as_deref())?;
    config.validate()?;
    debug!("Loaded configuration: {:?}", config);
    Ok(config)
}

/// Parse a file, apply the person filter and print the full summary
pub async fn run_summary(args: SummaryArgs, config: &Config) -> Result<CommandReport> {
    let config = config
        .clone()
        .with_skip_empty_lines(config.skip_empty_lines && !args.keep_empty_lines);
    let store = SessionStore::new(&config)?;

    store.parse(CsvSource::path(&args.file)).await;
    if store.snapshot().is_valid() {
        store.select_person(args.person_filter());
    }
    let session = store.snapshot();

    match args.format {
        OutputFormat::Text => print!("{}", render_summary_text(&session, config.precision)),
        OutputFormat::Json => println!("{}", render_summary_json(&session)?),
    }

    Ok(report(&session))
}

/// Parse a file and print only the verdict and any errors
pub async fn run_validate(args: ValidateArgs, config: &Config) -> Result<CommandReport> {
    let store = SessionStore::new(config)?;

    store.parse(CsvSource::path(&args.file)).await;
    let session = store.snapshot();

    match args.format {
        OutputFormat::Text => print!("{}", render_validation_text(&session)),
        OutputFormat::Json => println!("{}", render_validation_json(&session)?),
    }

    Ok(report(&session))
}

fn report(session: &Session) -> CommandReport {
    match session.data() {
        Some(records) => CommandReport {
            valid: true,
            count: records.len(),
        },
        None => CommandReport {
            valid: false,
            count: session.errors().len(),
        },
    }
}

// =============================================================================
// Text Rendering
// =============================================================================

fn format_miles(miles: f64, precision: usize) -> String {
    format!("{:.*}", precision, miles)
}

fn render_errors(errors: &[ValidationError]) -> String {
    let mut out = format!(
        "{} {} problem(s) found, nothing was imported:\n",
        "✗".red().bold(),
        errors.len()
    );
    for error in errors {
        out.push_str(&format!("  - {}\n", error));
    }
    out
}

fn render_overall(metrics: &OverallMetrics, precision: usize) -> String {
    format!(
        "{}\n  Total miles:    {}\n  Average miles:  {}\n  Shortest run:   {}\n  Longest run:    {}\n  Total runs:     {}\n  Unique runners: {}\n",
        "Overall".bold(),
        format_miles(metrics.total_miles, precision),
        format_miles(metrics.average_miles, precision),
        format_miles(metrics.min_miles, precision),
        format_miles(metrics.max_miles, precision),
        metrics.total_runs,
        metrics.unique_runners
    )
}

fn render_leaderboard(people: &[PersonMetrics], precision: usize) -> String {
    let width = people
        .iter()
        .map(|p| p.person.chars().count())
        .max()
        .unwrap_or(0)
        .max("Runner".len());

    let mut out = format!(
        "{}\n  {:<width$}  {:>10}  {:>10}  {:>10}  {:>10}  {:>5}\n",
        "Leaderboard".bold(),
        "Runner",
        "Total",
        "Average",
        "Min",
        "Max",
        "Runs",
        width = width
    );
    for person in people {
        out.push_str(&format!(
            "  {:<width$}  {:>10}  {:>10}  {:>10}  {:>10}  {:>5}\n",
            person.person,
            format_miles(person.total_miles, precision),
            format_miles(person.average_miles, precision),
            format_miles(person.min_miles, precision),
            format_miles(person.max_miles, precision),
            person.runs,
            width = width
        ));
    }
    out
}

fn render_chart(points: &[ChartPoint], filter: &str, precision: usize) -> String {
    let mut out = format!("{} ({})\n", "Miles over time".bold(), filter);
    if points.is_empty() {
        out.push_str("  no runs to chart\n");
    }
    for point in points {
        out.push_str(&format!(
            "  {:<12} {:>10}  {}\n",
            point.date,
            format_miles(point.miles, precision),
            point.person
        ));
    }
    out
}

/// Render the whole session as human-readable text
pub fn render_summary_text(session: &Session, precision: usize) -> String {
    if !session.is_valid() {
        return render_errors(session.errors());
    }

    let mut out = format!(
        "{} {}\n\n",
        "✓".green().bold(),
        session.file_name().unwrap_or("upload")
    );
    match session.overall_metrics() {
        Some(metrics) => out.push_str(&render_overall(metrics, precision)),
        None => out.push_str("No runs in file.\n"),
    }
    if !session.person_metrics().is_empty() {
        out.push('\n');
        out.push_str(&render_leaderboard(session.person_metrics(), precision));
    }
    out.push('\n');
    out.push_str(&render_chart(
        session.chart_series(),
        &session.filter().to_string(),
        precision,
    ));
    out
}

/// Render only the validation verdict as text
pub fn render_validation_text(session: &Session) -> String {
    match session.data() {
        Some(records) => format!(
            "{} {} is valid ({} runs)\n",
            "✓".green().bold(),
            session.file_name().unwrap_or("upload"),
            records.len()
        ),
        None => render_errors(session.errors()),
    }
}

// =============================================================================
// JSON Rendering
// =============================================================================

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct SummaryDocument<'a> {
    file: Option<&'a str>,
    is_valid: bool,
    errors: Vec<String>,
    overall_metrics: Option<&'a OverallMetrics>,
    person_metrics: &'a [PersonMetrics],
    selected_person: String,
    chart_data: &'a [ChartPoint],
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ValidationDocument<'a> {
    file: Option<&'a str>,
    is_valid: bool,
    runs: usize,
    errors: &'a [ValidationError],
}

/// Render the whole session as a JSON document
pub fn render_summary_json(session: &Session) -> Result<String> {
    let document = SummaryDocument {
        file: session.file_name(),
        is_valid: session.is_valid(),
        errors: session.errors().iter().map(ToString::to_string).collect(),
        overall_metrics: session.overall_metrics(),
        person_metrics: session.person_metrics(),
        selected_person: session.filter().to_string(),
        chart_data: session.chart_series(),
    };
    serde_json::to_string_pretty(&document)
        .map_err(|e| Error::serialization("Failed to render summary", e))
}

/// Render the validation verdict as a JSON document
pub fn render_validation_json(session: &Session) -> Result<String> {
    let document = ValidationDocument {
        file: session.file_name(),
        is_valid: session.is_valid(),
        runs: session.data().map_or(0, <[_]>::len),
        errors: session.errors(),
    };
    serde_json::to_string_pretty(&document)
        .map_err(|e| Error::serialization("Failed to render validation result", e))
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    const RUNS: &str = "date,person,miles run\n\
                        2024-01-01,Alice,3\n\
                        2024-01-02,Alice,5\n\
                        2024-01-02,Bob,2.5\n";

    async fn session_for(content: &str) -> std::sync::Arc<Session> {
        colored::control::set_override(false);
        let store = SessionStore::new(&Config::default()).unwrap();
        store.parse(CsvSource::bytes("runs.csv", content)).await;
        store.snapshot()
    }

    #[test]
    fn test_setup_logging_installs_once() {
        let args = Args::parse_from(["run-dashboard", "--quiet", "validate", "runs.csv"]);

        assert!(setup_logging(&args).is_ok());
        assert!(matches!(
            setup_logging(&args),
            Err(Error::Configuration { .. })
        ));
    }

    #[test]
    fn test_format_miles() {
        assert_eq!(format_miles(8.0, 2), "8.00");
        assert_eq!(format_miles(3.14159, 1), "3.1");
        assert_eq!(format_miles(4.0, 0), "4");
    }

    #[tokio::test]
    async fn test_summary_text_valid() {
        let session = session_for(RUNS).await;
        let text = render_summary_text(&session, 2);

        assert!(text.contains("Total miles:    10.50"));
        assert!(text.contains("Unique runners: 2"));
        assert!(text.contains("Alice"));
        assert!(text.contains("1/2/2024"));
        assert!(report(&session).valid);
        assert_eq!(report(&session).count, 3);
    }

    #[tokio::test]
    async fn test_summary_text_rejected() {
        let session = session_for("date,person,miles run\n2024-01-01,Alice,3\n2024-01-02,Bob,-1\n").await;
        let text = render_summary_text(&session, 2);

        assert!(text.contains("1 problem(s) found"));
        assert!(text.contains("Row 3: \"miles run\" cannot be negative"));
        assert_eq!(report(&session), CommandReport { valid: false, count: 1 });
    }

    #[tokio::test]
    async fn test_summary_json_shape() {
        let session = session_for(RUNS).await;
        let json: serde_json::Value =
            serde_json::from_str(&render_summary_json(&session).unwrap()).unwrap();

        assert_eq!(json["isValid"], true);
        assert_eq!(json["overallMetrics"]["totalMiles"], 10.5);
        assert_eq!(json["overallMetrics"]["uniqueRunners"], 2);
        assert_eq!(json["personMetrics"][0]["person"], "Alice");
        assert_eq!(json["selectedPerson"], "all");
        assert_eq!(json["chartData"].as_array().map(Vec::len), Some(3));
    }

    #[tokio::test]
    async fn test_validation_json_rejected() {
        let session = session_for("date,person\n").await;
        let json: serde_json::Value =
            serde_json::from_str(&render_validation_json(&session).unwrap()).unwrap();

        assert_eq!(json["isValid"], false);
        assert_eq!(json["runs"], 0);
        assert_eq!(json["errors"][0]["kind"], "header");
        assert_eq!(json["errors"][0]["rowNumber"], 1);
        assert!(json["errors"][0].get("row_number").is_none());
        assert_eq!(
            json["errors"][0]["message"],
            "Missing required column: \"miles run\""
        );
    }

    #[tokio::test]
    async fn test_empty_file_summary() {
        let session = session_for("date,person,miles run\n").await;
        let text = render_summary_text(&session, 2);

        assert!(text.contains("No runs in file."));
        assert!(text.contains("no runs to chart"));
    }
}

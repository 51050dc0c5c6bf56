//! Integration tests for the end-to-end upload pipeline
//!
//! These tests drive the public API the way a dashboard front end would:
//! upload a file, read the session snapshot, change the person filter, reset.

use run_dashboard::app::services::csv_parser::{CsvParser, CsvSource, ParseOptions};
use run_dashboard::app::services::metrics::{build_series, overall_metrics, person_metrics};
use run_dashboard::constants::REQUIRED_COLUMNS;
use run_dashboard::{
    Config, Error, OverallMetrics, ParseOutcome, ParseState, PersonFilter, SessionStore,
    ValidationErrorKind,
};
use std::io::Write;
use tempfile::NamedTempFile;

fn write_csv(content: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    write!(file, "{}", content).unwrap();
    file
}

const TRAINING_LOG: &str = "Date, Person ,MILES RUN\n\
                            2024-03-04,Priya,6.2\n\
                            2024-03-01,Tom,3.1\n\
                            2024-03-02,Priya,4\n\
                            \n\
                            2024-03-01,Lena,10\n\
                            2024-03-03,Tom,0\n";

/// Upload a realistic file from disk and check every derived view
#[tokio::test]
async fn test_upload_from_disk_end_to_end() {
    let file = write_csv(TRAINING_LOG);
    let store = SessionStore::new(&Config::default()).unwrap();

    let outcome = store.parse(CsvSource::path(file.path())).await;
    assert!(outcome.is_valid());

    let session = store.snapshot();
    assert_eq!(session.state(), ParseState::Success);
    assert_eq!(session.data().map(<[_]>::len), Some(5));
    assert_eq!(session.people(), &["Priya", "Tom", "Lena"].map(String::from));

    let overall = session.overall_metrics().unwrap();
    assert!((overall.total_miles - 23.3).abs() < 1e-9);
    assert_eq!(overall.min_miles, 0.0);
    assert_eq!(overall.max_miles, 10.0);
    assert_eq!(overall.total_runs, 5);
    assert_eq!(overall.unique_runners, 3);

    let leaders: Vec<&str> = session
        .person_metrics()
        .iter()
        .map(|m| m.person.as_str())
        .collect();
    assert_eq!(leaders, vec!["Priya", "Lena", "Tom"]);

    let dates: Vec<&str> = session
        .chart_series()
        .iter()
        .map(|p| p.date.as_str())
        .collect();
    assert_eq!(
        dates,
        vec!["3/1/2024", "3/1/2024", "3/2/2024", "3/3/2024", "3/4/2024"]
    );
    // Same-day runs keep file order
    assert_eq!(session.chart_series()[0].person, "Tom");
    assert_eq!(session.chart_series()[1].person, "Lena");

    store.select_person("Tom");
    let tom: Vec<f64> = store
        .snapshot()
        .chart_series()
        .iter()
        .map(|p| p.miles)
        .collect();
    assert_eq!(tom, vec![3.1, 0.0]);

    store.reset();
    let session = store.snapshot();
    assert_eq!(session.state(), ParseState::Idle);
    assert!(session.overall_metrics().is_none());
    assert!(session.chart_series().is_empty());
}

/// The two worked examples: one rejected file, one committed file
#[tokio::test]
async fn test_documented_examples() {
    let parser = CsvParser::new(REQUIRED_COLUMNS.iter().copied());

    let rejected = parser
        .parse(
            CsvSource::bytes(
                "bad.csv",
                "date,person,miles run\n2024-01-01,Alice,3\n2024-01-02,Bob,-1\n",
            ),
            &ParseOptions::default(),
        )
        .await;
    let messages: Vec<String> = rejected.errors().iter().map(ToString::to_string).collect();
    assert_eq!(messages, vec!["Row 3: \"miles run\" cannot be negative"]);

    let committed = parser
        .parse(
            CsvSource::bytes(
                "good.csv",
                "date,person,miles run\n2024-01-01,Alice,3\n2024-01-02,Alice,5\n",
            ),
            &ParseOptions::default(),
        )
        .await;
    let records = committed.records().unwrap();
    assert_eq!(
        overall_metrics(records),
        Some(OverallMetrics {
            total_miles: 8.0,
            average_miles: 4.0,
            min_miles: 3.0,
            max_miles: 5.0,
            total_runs: 2,
            unique_runners: 1,
        })
    );
}

/// A missing header fails fast even when every row is also broken
#[tokio::test]
async fn test_header_errors_never_mix_with_row_errors() {
    let store = SessionStore::new(&Config::default()).unwrap();

    let outcome = store
        .parse(CsvSource::bytes(
            "runs.csv",
            "when,person,distance\n,,\nbad,,bad\n",
        ))
        .await;

    match outcome {
        ParseOutcome::Rejected { errors } => {
            assert_eq!(errors.len(), 2);
            assert!(errors.iter().all(|e| e.kind == ValidationErrorKind::Header));
            assert_eq!(errors[0].to_string(), "Missing required column: \"date\"");
            assert_eq!(errors[1].to_string(), "Missing required column: \"miles run\"");
        }
        ParseOutcome::Committed { .. } => panic!("file without required headers committed"),
    }
}

/// A failed upload replaces the previous session's data with its errors
#[tokio::test]
async fn test_failed_upload_after_success() {
    let store = SessionStore::new(&Config::default()).unwrap();
    store
        .parse(CsvSource::bytes("first.csv", TRAINING_LOG))
        .await;
    assert!(store.snapshot().is_valid());

    store
        .parse(CsvSource::bytes(
            "second.csv",
            "date,person,miles run\n2024-03-05,,x\n",
        ))
        .await;

    let session = store.snapshot();
    assert_eq!(session.state(), ParseState::Failed);
    assert_eq!(session.file_name(), Some("second.csv"));
    assert!(session.data().is_none());
    let messages: Vec<String> = session.errors().iter().map(ToString::to_string).collect();
    assert_eq!(
        messages,
        vec![
            "Row 2: \"person\" cannot be empty",
            "Row 2: \"miles run\" must be a number (got \"x\")",
        ]
    );
}

/// Aggregates computed directly agree with what the session exposes
#[tokio::test]
async fn test_session_matches_pure_functions() {
    let parser = CsvParser::new(REQUIRED_COLUMNS.iter().copied());
    let outcome = parser
        .parse(CsvSource::bytes("log.csv", TRAINING_LOG), &ParseOptions::default())
        .await;
    let records = outcome.records().unwrap();

    let store = SessionStore::new(&Config::default()).unwrap();
    store.parse(CsvSource::bytes("log.csv", TRAINING_LOG)).await;
    let session = store.snapshot();

    assert_eq!(session.overall_metrics(), overall_metrics(records).as_ref());
    assert_eq!(session.person_metrics(), person_metrics(records).as_slice());
    assert_eq!(
        session.chart_series(),
        build_series(records, &PersonFilter::All).to_points().as_slice()
    );

    let per_person: f64 = session.person_metrics().iter().map(|m| m.total_miles).sum();
    let overall = session.overall_metrics().unwrap().total_miles;
    assert!((per_person - overall).abs() < 1e-9);
}

/// Config changes the required columns and chart date format
#[tokio::test]
async fn test_custom_config() {
    let config = Config::default()
        .with_required_columns(["date", "person", "miles run", "route"])
        .with_chart_date_format("%Y-%m-%d");
    let store = SessionStore::new(&config).unwrap();

    store.parse(CsvSource::bytes("log.csv", TRAINING_LOG)).await;
    assert_eq!(
        store.snapshot().errors()[0].to_string(),
        "Missing required column: \"route\""
    );

    let config = Config::default().with_chart_date_format("%Y-%m-%d");
    let store = SessionStore::new(&config).unwrap();
    store.parse(CsvSource::bytes("log.csv", TRAINING_LOG)).await;
    assert_eq!(store.snapshot().chart_series()[0].date, "2024-03-01");

    let config = Config::default().with_chart_date_format("%Y-%m-%d %H:%M");
    assert!(matches!(
        SessionStore::new(&config),
        Err(Error::Configuration { .. })
    ));
}

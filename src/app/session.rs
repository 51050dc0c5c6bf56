//! Session state for one dashboard user
//!
//! A [`Session`] is an immutable snapshot: parse state, committed records,
//! errors, the active person filter and everything derived from them. The
//! [`SessionStore`] replaces the snapshot wholesale on every transition
//! (parse start, parse settle, reset, filter change) and publishes it through
//! a `tokio::sync::watch` channel, so readers never see a half-updated state.
//!
//! Each transition that starts or cancels work bumps the session generation.
//! A parse only lands if the generation it was issued under is still current,
//! which discards results from superseded or reset parses regardless of the
//! order in which they finish.

use std::sync::Arc;
use tokio::sync::watch;
use tracing::{debug, info};

use crate::app::models::{
    ChartPoint, OverallMetrics, ParseOutcome, ParseState, PersonFilter, PersonMetrics, RunRecord,
    ValidationError,
};
use crate::app::services::csv_parser::{CsvParser, CsvSource, ParseOptions};
use crate::app::services::metrics::{build_series, overall_metrics, person_metrics, unique_people};
use crate::config::Config;
use crate::Result;

/// Immutable snapshot of one session
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Session {
    generation: u64,
    state: ParseState,
    file_name: Option<String>,
    records: Arc<[RunRecord]>,
    errors: Vec<ValidationError>,
    filter: PersonFilter,
    people: Vec<String>,
    overall: Option<OverallMetrics>,
    person_metrics: Vec<PersonMetrics>,
    chart: Vec<ChartPoint>,
}

impl Session {
    /// Empty session at the given generation
    fn idle(generation: u64) -> Self {
        Self {
            generation,
            ..Self::default()
        }
    }

    /// Session with a parse in flight; prior data and errors are cleared
    fn loading(generation: u64, file_name: String) -> Self {
        Self {
            generation,
            state: ParseState::Loading,
            file_name: Some(file_name),
            ..Self::default()
        }
    }

    /// Session after a parse settled, with all derived values computed
    fn settled(
        generation: u64,
        file_name: Option<String>,
        outcome: &ParseOutcome,
        filter: PersonFilter,
        date_format: &str,
    ) -> Self {
        match outcome {
            ParseOutcome::Committed { records } => {
                let records = Arc::clone(records);
                let chart = build_series(&records, &filter)
                    .with_date_format(date_format)
                    .to_points();
                Self {
                    generation,
                    state: ParseState::Success,
                    file_name,
                    people: unique_people(&records),
                    overall: overall_metrics(&records),
                    person_metrics: person_metrics(&records),
                    chart,
                    errors: Vec::new(),
                    filter,
                    records,
                }
            }
            ParseOutcome::Rejected { errors } => Self {
                generation,
                state: ParseState::Failed,
                file_name,
                errors: errors.clone(),
                filter,
                ..Self::default()
            },
        }
    }

    /// Same session with a different person filter and its chart rebuilt
    fn with_filter(&self, filter: PersonFilter, date_format: &str) -> Self {
        let chart = build_series(&self.records, &filter)
            .with_date_format(date_format)
            .to_points();
        Self {
            filter,
            chart,
            ..self.clone()
        }
    }

    /// Tag of the last parse or reset issued for this session
    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn state(&self) -> ParseState {
        self.state
    }

    pub fn is_loading(&self) -> bool {
        self.state == ParseState::Loading
    }

    /// True only after a parse committed
    pub fn is_valid(&self) -> bool {
        self.state == ParseState::Success
    }

    /// Name of the file being parsed or last parsed
    pub fn file_name(&self) -> Option<&str> {
        self.file_name.as_deref()
    }

    /// Committed records; `None` unless the last parse succeeded
    pub fn data(&self) -> Option<&[RunRecord]> {
        self.is_valid().then_some(&self.records[..])
    }

    pub fn errors(&self) -> &[ValidationError] {
        &self.errors
    }

    /// Outcome of the settled parse; `None` while idle or loading
    pub fn outcome(&self) -> Option<ParseOutcome> {
        match self.state {
            ParseState::Success => Some(ParseOutcome::Committed {
                records: Arc::clone(&self.records),
            }),
            ParseState::Failed => Some(ParseOutcome::Rejected {
                errors: self.errors.clone(),
            }),
            ParseState::Idle | ParseState::Loading => None,
        }
    }

    pub fn filter(&self) -> &PersonFilter {
        &self.filter
    }

    /// Distinct runners in first-appearance order, for the person selector
    pub fn people(&self) -> &[String] {
        &self.people
    }

    pub fn overall_metrics(&self) -> Option<&OverallMetrics> {
        self.overall.as_ref()
    }

    pub fn person_metrics(&self) -> &[PersonMetrics] {
        &self.person_metrics
    }

    /// Chart points for the active filter, date ascending
    pub fn chart_series(&self) -> &[ChartPoint] {
        &self.chart
    }
}

/// Owner of the current session and the only writer to it
///
/// Parses may be started concurrently from several tasks; only the most
/// recently started one can settle into the session.
#[derive(Debug)]
pub struct SessionStore {
    parser: CsvParser,
    options: ParseOptions,
    chart_date_format: String,
    sender: watch::Sender<Arc<Session>>,
}

impl SessionStore {
    /// Create a store with an idle session, configured from `config`
    ///
    /// Fails if the configuration does not validate.
    pub fn new(config: &Config) -> Result<Self> {
        config.validate()?;
        let (sender, _receiver) = watch::channel(Arc::new(Session::default()));
        Ok(Self {
            parser: CsvParser::new(config.required_columns.iter().cloned()),
            options: ParseOptions::default().with_skip_empty_lines(config.skip_empty_lines),
            chart_date_format: config.chart_date_format.clone(),
            sender,
        })
    }

    /// Replace the parse options used when a call does not supply its own
    pub fn with_options(mut self, options: ParseOptions) -> Self {
        self.options = options;
        self
    }

    /// Current session snapshot
    pub fn snapshot(&self) -> Arc<Session> {
        Arc::clone(&self.sender.borrow())
    }

    /// Receiver notified on every session replacement
    pub fn subscribe(&self) -> watch::Receiver<Arc<Session>> {
        self.sender.subscribe()
    }

    /// Parse an upload with the store's default options
    pub async fn parse(&self, source: CsvSource) -> ParseOutcome {
        let options = self.options.clone();
        self.parse_with(source, &options).await
    }

    /// Parse an upload and, if still current when it settles, commit it
    ///
    /// The session moves to `Loading` immediately, clearing prior data and
    /// errors and resetting the person filter to everyone. The outcome is
    /// returned to the caller even when a newer parse or reset superseded it.
    pub async fn parse_with(&self, source: CsvSource, options: &ParseOptions) -> ParseOutcome {
        let file_name = source.name();
        let mut tag = 0;
        self.sender.send_modify(|session| {
            tag = session.generation() + 1;
            *session = Arc::new(Session::loading(tag, file_name.clone()));
        });
        debug!("Issued parse #{} for {}", tag, file_name);

        let outcome = self.parser.parse(source, options).await;

        let applied = self.sender.send_if_modified(|session| {
            if session.generation() != tag {
                return false;
            }
            *session = Arc::new(Session::settled(
                tag,
                Some(file_name.clone()),
                &outcome,
                session.filter().clone(),
                &self.chart_date_format,
            ));
            true
        });

        if applied {
            info!(
                "Session updated from {}: {}",
                file_name,
                if outcome.is_valid() { "success" } else { "failed" }
            );
        } else {
            debug!("Discarding stale result of parse #{} for {}", tag, file_name);
        }
        outcome
    }

    /// Return the session to its initial empty state
    ///
    /// Any parse still in flight is superseded and will not land.
    pub fn reset(&self) {
        self.sender.send_modify(|session| {
            *session = Arc::new(Session::idle(session.generation() + 1));
        });
        info!("Session reset");
    }

    /// Change the chart's person filter and rebuild the series
    pub fn select_person(&self, filter: impl Into<PersonFilter>) {
        let filter = filter.into();
        debug!("Selecting person filter: {}", filter);
        self.sender.send_modify(|session| {
            *session = Arc::new(session.with_filter(filter, &self.chart_date_format));
        });
    }
}

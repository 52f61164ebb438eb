//! Search sweep execution
//!
//! Scenarios are turned into `GET /entities` requests and handed to a
//! [`SearchBackend`]. The sweep runs on one dedicated worker thread that the
//! caller joins; the scenario list is shared read-only with it.

use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};
use url::Url;
use uuid::Uuid;

use search_types::AttributeSearchResponse;

use crate::config::HarnessConfig;
use crate::criteria::parse_attrs;
use crate::error::{HarnessError, Result};
use crate::options::EffectiveOptions;
use crate::query::{search_uri, RequestContext};
use crate::scenario::SearchScenario;

// ============================================================================
// REQUESTS AND BACKENDS
// ============================================================================

/// One search ready to be sent
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchRequest {
    pub context: RequestContext,
    /// Criteria JSON as sent in `attrs`
    pub attrs: String,
    pub effective: EffectiveOptions,
    pub include_flags: u32,
}

impl SearchRequest {
    pub fn from_scenario(
        base_url: &str,
        scenario: &SearchScenario,
        support_filtering: bool,
    ) -> Result<Self> {
        let attrs = scenario.criteria.to_attrs_text();
        parse_attrs(&attrs)?;

        let uri = search_uri(base_url, &scenario.criteria, &scenario.options)?;
        let effective = scenario.options.effective();
        let include_flags = effective.include_flags(support_filtering);

        Ok(Self {
            context: RequestContext::new(uri),
            attrs,
            effective,
            include_flags,
        })
    }

    pub fn uri(&self) -> &Url {
        self.context.request_uri()
    }
}

/// Something that can execute an attribute search
pub trait SearchBackend: Send {
    /// Execute the search; `Some(n)` when the number of results is known
    fn search(&mut self, request: &SearchRequest) -> Result<Option<usize>>;
}

type Responder = Box<dyn Fn(&SearchRequest) -> Result<Option<usize>> + Send>;

/// Records requests without any network I/O
///
/// Used for dry runs. A responder can be installed to fake result counts.
#[derive(Default)]
pub struct RecordingBackend {
    requests: Vec<SearchRequest>,
    responder: Option<Responder>,
}

impl RecordingBackend {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_responder(
        responder: impl Fn(&SearchRequest) -> Result<Option<usize>> + Send + 'static,
    ) -> Self {
        Self {
            requests: Vec::new(),
            responder: Some(Box::new(responder)),
        }
    }

    pub fn requests(&self) -> &[SearchRequest] {
        &self.requests
    }
}

impl SearchBackend for RecordingBackend {
    fn search(&mut self, request: &SearchRequest) -> Result<Option<usize>> {
        self.requests.push(request.clone());
        match &self.responder {
            Some(responder) => responder(request),
            None => Ok(None),
        }
    }
}

/// Sends searches to the REST service
pub struct HttpSearchBackend {
    client: reqwest::blocking::Client,
}

impl HttpSearchBackend {
    pub fn new(timeout: Duration) -> Result<Self> {
        let client = reqwest::blocking::Client::builder()
            .timeout(timeout)
            .build()?;
        Ok(Self { client })
    }
}

impl SearchBackend for HttpSearchBackend {
    fn search(&mut self, request: &SearchRequest) -> Result<Option<usize>> {
        let response = self
            .client
            .get(request.uri().clone())
            .send()?
            .error_for_status()?;
        let body: AttributeSearchResponse = response.json()?;
        Ok(Some(body.result_count()))
    }
}

// ============================================================================
// OUTCOMES
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OutcomeStatus {
    /// Result count matched
    Passed,
    /// Call succeeded but the backend reported no count
    Unverified,
    CountMismatch,
    Failed,
}

/// Result of one scenario
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScenarioOutcome {
    pub index: usize,
    pub uri: Option<String>,
    pub expected_count: u32,
    pub actual_count: Option<usize>,
    pub status: OutcomeStatus,
    pub error: Option<String>,
    pub duration_ms: u64,
}

/// Result of a whole sweep
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunSummary {
    pub run_id: Uuid,
    pub started_at: DateTime<Utc>,
    pub total_scenarios: usize,
    pub passed: usize,
    pub unverified: usize,
    pub count_mismatches: usize,
    pub failed: usize,
    pub total_duration_ms: u64,
    pub outcomes: Vec<ScenarioOutcome>,
}

impl RunSummary {
    fn new() -> Self {
        Self {
            run_id: Uuid::new_v4(),
            started_at: Utc::now(),
            total_scenarios: 0,
            passed: 0,
            unverified: 0,
            count_mismatches: 0,
            failed: 0,
            total_duration_ms: 0,
            outcomes: Vec::new(),
        }
    }

    fn record(&mut self, outcome: ScenarioOutcome) {
        self.total_scenarios += 1;
        match outcome.status {
            OutcomeStatus::Passed => self.passed += 1,
            OutcomeStatus::Unverified => self.unverified += 1,
            OutcomeStatus::CountMismatch => self.count_mismatches += 1,
            OutcomeStatus::Failed => self.failed += 1,
        }
        self.outcomes.push(outcome);
    }

    /// No scenario failed outright; count mismatches are reported only
    pub fn all_passed(&self) -> bool {
        self.failed == 0
    }

    /// Print a summary to stdout
    pub fn print_summary(&self, verbose: bool) {
        println!("\n=== Attribute Search Sweep Results ===\n");
        println!("Run:                  {}", self.run_id);
        println!("Total scenarios:      {}", self.total_scenarios);
        println!("Passed:               {}", self.passed);
        println!("Unverified:           {}", self.unverified);
        println!("Count mismatches:     {}", self.count_mismatches);
        println!("Failed:               {}", self.failed);
        println!("Duration:             {}ms", self.total_duration_ms);

        let interesting = self
            .outcomes
            .iter()
            .filter(|o| {
                verbose || !matches!(o.status, OutcomeStatus::Passed | OutcomeStatus::Unverified)
            });
        let mut header_printed = false;
        for outcome in interesting {
            if !header_printed {
                println!("\n--- Per-Scenario Results ---\n");
                header_printed = true;
            }
            let status = match outcome.status {
                OutcomeStatus::Passed => "✓",
                OutcomeStatus::Unverified => "○",
                OutcomeStatus::CountMismatch => "⚠",
                OutcomeStatus::Failed => "✗",
            };
            println!(
                "{} #{} expected={} actual={} {}",
                status,
                outcome.index,
                outcome.expected_count,
                outcome
                    .actual_count
                    .map(|c| c.to_string())
                    .unwrap_or_else(|| "-".to_string()),
                outcome.uri.as_deref().unwrap_or("<no uri>")
            );
            if let Some(ref err) = outcome.error {
                println!("    Error: {}", err);
            }
        }
    }
}

// ============================================================================
// RUNNER
// ============================================================================

/// Runs a scenario list against a backend
#[derive(Debug, Clone)]
pub struct SweepRunner {
    base_url: String,
    support_filtering: bool,
    worker_thread_name: String,
    limit: Option<usize>,
}

impl SweepRunner {
    pub fn new(config: &HarnessConfig) -> Self {
        Self {
            base_url: config.server_base_url.clone(),
            support_filtering: config.support_filtering,
            worker_thread_name: config.worker_thread_name.clone(),
            limit: None,
        }
    }

    /// Stop after the first `limit` scenarios
    pub fn with_limit(mut self, limit: Option<usize>) -> Self {
        self.limit = limit;
        self
    }

    /// Run every scenario on the calling thread
    pub fn run<B: SearchBackend + ?Sized>(
        &self,
        scenarios: &[SearchScenario],
        backend: &mut B,
    ) -> RunSummary {
        let started = Instant::now();
        let mut summary = RunSummary::new();
        let count = self.limit.map_or(scenarios.len(), |l| l.min(scenarios.len()));

        info!(run_id = %summary.run_id, scenarios = count, "Starting search sweep");
        for (index, scenario) in scenarios.iter().take(count).enumerate() {
            summary.record(self.run_one(index, scenario, backend));
        }
        summary.total_duration_ms = started.elapsed().as_millis() as u64;

        info!(
            passed = summary.passed,
            unverified = summary.unverified,
            mismatches = summary.count_mismatches,
            failed = summary.failed,
            "Search sweep complete"
        );
        summary
    }

    fn run_one<B: SearchBackend + ?Sized>(
        &self,
        index: usize,
        scenario: &SearchScenario,
        backend: &mut B,
    ) -> ScenarioOutcome {
        let started = Instant::now();
        let mut outcome = ScenarioOutcome {
            index,
            uri: None,
            expected_count: scenario.expected_count,
            actual_count: None,
            status: OutcomeStatus::Failed,
            error: None,
            duration_ms: 0,
        };

        let result = SearchRequest::from_scenario(&self.base_url, scenario, self.support_filtering)
            .and_then(|request| {
                outcome.uri = Some(request.uri().to_string());
                debug!(
                    json = %request.attrs,
                    flags = %format!("{:b}", request.include_flags),
                    "Calling search by attributes"
                );
                backend.search(&request)
            });

        match result {
            Ok(Some(actual)) if actual == scenario.expected_count as usize => {
                outcome.actual_count = Some(actual);
                outcome.status = OutcomeStatus::Passed;
            }
            Ok(Some(actual)) => {
                warn!(
                    index,
                    expected = scenario.expected_count,
                    actual,
                    "Search result count mismatch"
                );
                outcome.actual_count = Some(actual);
                outcome.status = OutcomeStatus::CountMismatch;
            }
            Ok(None) => outcome.status = OutcomeStatus::Unverified,
            Err(err) => {
                warn!(index, error = %err, "Search failed");
                outcome.error = Some(err.to_string());
            }
        }

        outcome.duration_ms = started.elapsed().as_millis() as u64;
        outcome
    }

    /// Run on a dedicated named thread and wait for it
    ///
    /// The backend moves to the worker and is handed back with the summary.
    pub fn run_on_worker<B>(
        &self,
        scenarios: Arc<Vec<SearchScenario>>,
        mut backend: B,
    ) -> Result<(RunSummary, B)>
    where
        B: SearchBackend + 'static,
    {
        let runner = self.clone();
        let handle = thread::Builder::new()
            .name(self.worker_thread_name.clone())
            .spawn(move || {
                let summary = runner.run(&scenarios, &mut backend);
                (summary, backend)
            })?;

        handle.join().map_err(|payload| {
            let message = payload
                .downcast_ref::<&str>()
                .map(|s| s.to_string())
                .or_else(|| payload.downcast_ref::<String>().cloned())
                .unwrap_or_else(|| "unknown panic".to_string());
            HarnessError::WorkerPanicked(message)
        })
    }
}

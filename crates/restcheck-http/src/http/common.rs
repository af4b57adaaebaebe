//! Report types shared by the runner, the CLI, and the tests.

use restcheck::RestCheckError;
use restcheck::contract::CheckFailure;
use serde::Serialize;

/// Header value the original suite sends on every mutating call.
pub const MUTATION_CONTENT_TYPE: &str = "application/json; charset=UTF-8";

/// Outcome of one contract case. Check failures (the contract was judged
/// and found violated) and errors (the case could not be judged) stay in
/// separate buckets.
#[derive(Debug, Clone, Serialize)]
pub struct CaseReport {
    pub case: String,
    pub requests: usize,
    pub failures: Vec<CheckFailure>,
    pub errors: Vec<String>,
}

impl CaseReport {
    pub fn new(case: &str) -> Self {
        Self {
            case: case.to_string(),
            requests: 0,
            failures: Vec::new(),
            errors: Vec::new(),
        }
    }

    pub fn record(&mut self, probe: Result<Vec<CheckFailure>, RestCheckError>) {
        self.requests += 1;
        match probe {
            Ok(failures) => self.failures.extend(failures),
            Err(error) => self.errors.push(error.to_string()),
        }
    }

    pub fn record_all(&mut self, probes: Vec<Result<Vec<CheckFailure>, RestCheckError>>) {
        for probe in probes {
            self.record(probe);
        }
    }

    pub fn passed(&self) -> bool {
        self.failures.is_empty() && self.errors.is_empty()
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct RunReport {
    pub started_at: String,
    pub cases: Vec<CaseReport>,
}

impl RunReport {
    pub fn new() -> Self {
        Self {
            started_at: chrono::Utc::now().to_rfc3339(),
            cases: Vec::new(),
        }
    }

    pub fn push(&mut self, case: CaseReport) {
        self.cases.push(case);
    }

    pub fn passed_count(&self) -> usize {
        self.cases.iter().filter(|c| c.passed()).count()
    }

    pub fn failed_count(&self) -> usize {
        self.cases.len() - self.passed_count()
    }

    pub fn is_success(&self) -> bool {
        self.cases.iter().all(CaseReport::passed)
    }
}

impl Default for RunReport {
    fn default() -> Self {
        Self::new()
    }
}

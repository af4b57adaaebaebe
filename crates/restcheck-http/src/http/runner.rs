//! Sequential execution of the case catalog against one API.

use restcheck::{info, warn};

use super::client::ApiClient;
use super::common::RunReport;
use super::scenarios::ContractCase;

/// Runs every case of the catalog (or a single named case) and collects
/// the reports. Cases run one after another; the requests inside a case
/// are issued concurrently by the case itself.
pub async fn run_contract(client: &ApiClient, filter: Option<&str>) -> RunReport {
    let mut report = RunReport::new();
    info!("running contract catalog against {}", client.base_url());
    for case in ContractCase::ALL {
        if let Some(name) = filter {
            if case.name() != name {
                continue;
            }
        }
        let case_report = case.run(client).await;
        if case_report.passed() {
            info!(
                "case '{}' passed ({} requests)",
                case_report.case, case_report.requests
            );
        } else {
            warn!(
                "case '{}' failed: {} check failure(s), {} error(s)",
                case_report.case,
                case_report.failures.len(),
                case_report.errors.len()
            );
        }
        report.push(case_report);
    }
    report
}

//! HTTP client, contract case catalog, and runner for restcheck.

pub mod http;

pub use http::client::ApiClient;
pub use http::common::{CaseReport, MUTATION_CONTENT_TYPE, RunReport};
pub use http::runner::run_contract;
pub use http::scenarios::ContractCase;

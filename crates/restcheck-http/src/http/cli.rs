//! CLI interface for the restcheck binary.

use clap::{Parser, Subcommand};

use super::client::ApiClient;
use super::common::RunReport;
use super::runner::run_contract;
use super::scenarios::ContractCase;

#[derive(Parser)]
#[command(name = "restcheck")]
#[command(about = "Contract checker for placeholder-style REST APIs")]
#[command(version)]
pub struct Cli {
    /// Base URL of the API under check.
    #[arg(short, long, default_value = "https://jsonplaceholder.typicode.com")]
    pub base_url: String,
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Run the contract case catalog against the API.
    Run {
        /// Run a single case by name (see `list`).
        #[arg(short, long)]
        case: Option<String>,
        /// Emit the report as JSON instead of text.
        #[arg(long)]
        json: bool,
    },
    /// List the cases in the catalog.
    List,
}

/// Dispatches a parsed command and returns the process exit code.
pub async fn handle_cli_command(client: &ApiClient, command: Commands) -> i32 {
    match command {
        Commands::Run { case, json } => {
            if let Some(name) = &case {
                if ContractCase::from_name(name).is_none() {
                    println!("Unknown case '{name}'; run `restcheck list` for the catalog");
                    return 2;
                }
            }
            let report = run_contract(client, case.as_deref()).await;
            if json {
                print_json_report(&report);
            } else {
                print_text_report(&report);
            }
            if report.is_success() { 0 } else { 1 }
        }
        Commands::List => {
            for case in ContractCase::ALL {
                println!("{:<28} {}", case.name(), case.description());
            }
            0
        }
    }
}

fn print_json_report(report: &RunReport) {
    match serde_json::to_string_pretty(report) {
        Ok(rendered) => println!("{rendered}"),
        Err(e) => println!("Failed to encode report as JSON: {e}"),
    }
}

fn print_text_report(report: &RunReport) {
    for case in &report.cases {
        if case.passed() {
            println!("PASS {} ({} requests)", case.case, case.requests);
            continue;
        }
        println!("FAIL {} ({} requests)", case.case, case.requests);
        for failure in &case.failures {
            println!("  check: {failure}");
        }
        for error in &case.errors {
            println!("  error: {error}");
        }
    }
    println!(
        "{} passed, {} failed (started {})",
        report.passed_count(),
        report.failed_count(),
        report.started_at
    );
}

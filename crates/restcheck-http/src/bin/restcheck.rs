//! restcheck CLI binary

use clap::Parser;
use restcheck_http::ApiClient;
use restcheck_http::http::cli::{Cli, handle_cli_command};

#[tokio::main]
async fn main() {
    restcheck::telemetry::init();
    let cli = Cli::parse();
    let client = ApiClient::new(&cli.base_url);
    let code = handle_cli_command(&client, cli.command).await;
    std::process::exit(code);
}

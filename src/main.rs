//! CLI entry point for yno, a YNO network device management API client.
//!
//! Authenticates with an API key, dispatches one subcommand to the matching
//! endpoint, and prints the JSON response on stdout.
//!
//! Exit codes:
//! - 0: success
//! - 1: runtime error (validation, API error, network failure, etc.)
//! - 2: argument validation error (clap handles this automatically)

use std::error::Error;
use std::process::ExitCode;
use std::time::Duration;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use yno_client::auth::ApiKey;
use yno_client::client::{YNO_BASE_URL, YnoClient};
use yno_client::device_stat::{GetDeviceStatsRequest, get_device_statistics};
use yno_client::option::ClientOption;
use yno_client::router::{
    RouterAssignedObject, RouterFilter, SearchRouterQuery, SearchRouterRequest, search_routers,
    update_router,
};
use yno_client::task::{CreateTaskRequest, GetExecuteTaskQuery, create_task, get_task_result};

#[derive(Parser)]
#[command(version, about, long_about = None)]
struct Cli {
    /// Base URL of the YNO management API.
    #[arg(long, env = "YNO_BASE_URL", default_value = YNO_BASE_URL)]
    base_url: String,

    /// API key. Prefer setting via the YNO_API_KEY environment variable to
    /// keep it out of process listings and shell history.
    #[arg(long, env = "YNO_API_KEY")]
    api_key: String,

    /// API version sent in X-Yamaha-YNO-MngAPI-Version. Omitted when empty.
    #[arg(long, env = "YNO_API_VERSION", default_value = "")]
    api_version: String,

    /// Per-request timeout in seconds.
    #[arg(long, default_value_t = 30)]
    timeout_secs: u64,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Search managed routers.
    Search {
        /// Results per page (5-100).
        #[arg(long)]
        page_size: Option<u32>,

        /// NextPageToken from a previous search.
        #[arg(long)]
        page_token: Option<String>,

        /// Filter tree as JSON, e.g. '{"$eq":{"ModelName":"RTX830"}}'.
        #[arg(long)]
        filter: Option<String>,
    },

    /// Replace the labels and/or users assigned to a router.
    UpdateRouter {
        /// Serial number of the router.
        #[arg(long)]
        serial: String,

        /// Label to assign. Repeat for several; omit to leave labels unchanged.
        #[arg(long = "label")]
        labels: Vec<String>,

        /// User to assign. Repeat for several; omit to leave users unchanged.
        #[arg(long = "user")]
        users: Vec<String>,
    },

    /// Run CLI commands on one or more routers.
    CreateTask {
        /// Target router serial number. Repeat for several.
        #[arg(long = "serial", required = true)]
        serials: Vec<String>,

        /// Command to run. Repeat for several; they run in order.
        #[arg(long = "command", required = true)]
        commands: Vec<String>,

        /// Seconds the server waits for each router (60-1800).
        #[arg(long)]
        timeout: Option<u32>,
    },

    /// Read one page of task results.
    Task {
        /// Task id returned by create-task.
        #[arg(long)]
        id: String,

        /// Results per page (5-100).
        #[arg(long)]
        page_size: Option<u32>,

        /// NextPageToken from a previous read.
        #[arg(long)]
        page_token: Option<String>,
    },

    /// Query device statistics. The request body is given as JSON.
    Stats {
        /// e.g. '{"Type":"CpuUtilization","SerialNumber":"M5B123456",...}'.
        #[arg(long)]
        request: String,
    },
}

/// Empty repeated flags mean "leave unchanged" rather than "clear".
fn non_empty(values: &[String]) -> Option<Vec<String>> {
    (!values.is_empty()).then(|| values.to_vec())
}

async fn run(cli: &Cli) -> Result<String, Box<dyn Error + Send + Sync>> {
    let key = ApiKey::new(&cli.api_key).with_version(&cli.api_version);
    let client = YnoClient::with_api_key(
        &cli.base_url,
        &key,
        &[ClientOption::timeout(Duration::from_secs(cli.timeout_secs))],
    )?;

    let output = match &cli.command {
        Command::Search {
            page_size,
            page_token,
            filter,
        } => {
            let filter: Option<RouterFilter> =
                filter.as_deref().map(serde_json::from_str).transpose()?;
            let request = SearchRouterRequest {
                page_size: *page_size,
                query: filter.map(|f| SearchRouterQuery { filter: Some(f) }),
                page_token: page_token.clone(),
            };
            serde_json::to_string_pretty(&search_routers(&client, &request, &[]).await?)?
        }
        Command::UpdateRouter {
            serial,
            labels,
            users,
        } => {
            let request = RouterAssignedObject {
                assigned_labels: non_empty(labels),
                assigned_users: non_empty(users),
            };
            serde_json::to_string_pretty(&update_router(&client, serial, &request, &[]).await?)?
        }
        Command::CreateTask {
            serials,
            commands,
            timeout,
        } => {
            let request = CreateTaskRequest {
                timeout: *timeout,
                ..CreateTaskRequest::execute_command(serials.clone(), commands.clone())
            };
            serde_json::to_string_pretty(&create_task(&client, &request, &[]).await?)?
        }
        Command::Task {
            id,
            page_size,
            page_token,
        } => {
            let query = GetExecuteTaskQuery {
                page_size: *page_size,
                page_token: page_token.clone(),
            };
            serde_json::to_string_pretty(&get_task_result(&client, id, &query, &[]).await?)?
        }
        Command::Stats { request } => {
            let request: GetDeviceStatsRequest = serde_json::from_str(request)?;
            serde_json::to_string_pretty(&get_device_statistics(&client, &request, &[]).await?)?
        }
    };

    Ok(output)
}

#[tokio::main]
async fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match run(&cli).await {
        Ok(output) => {
            println!("{output}");
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
    }
}

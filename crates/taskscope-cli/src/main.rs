//! taskscope - read-only monitor for a task-queue engine.
//!
//! Serves the HTTP API by default; the other subcommands run one query and
//! print the answer as JSON.

mod cli;
mod demo;
mod server;

use anyhow::Context;
use clap::Parser;
use serde::Serialize;
use taskscope_core::config::{BrokerKind, Config};
use taskscope_core::impls::InMemoryBackend;
use taskscope_core::{QueryService, ServiceBuilder};
use tokio_util::sync::CancellationToken;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

use cli::{Cli, Command, Opts};
use server::AppState;

const DEFAULT_LOG_FILTER: &str = "taskscope=info,tower_http=info";

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // .env first so that clap sees its values as environment
    let _ = dotenvy::dotenv();

    let cli = Cli::parse();
    init_tracing(cli.opts.log_json);

    let config = cli.opts.to_config();
    let service = build_service(&cli.opts, &config).await?;
    tracing::debug!(backend = service.backend_name(), "service ready");

    match cli.command {
        None | Some(Command::Serve) => run_server(service, &config).await,
        Some(command) => run_query(&service, command).await,
    }
}

fn init_tracing(json: bool) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER));
    let registry = tracing_subscriber::registry().with(filter);

    // stdout belongs to query output
    if json {
        registry
            .with(fmt::layer().json().with_writer(std::io::stderr))
            .init();
    } else {
        registry.with(fmt::layer().with_writer(std::io::stderr)).init();
    }
}

async fn build_service(opts: &Opts, config: &Config) -> anyhow::Result<QueryService> {
    let memory = InMemoryBackend::new();
    if opts.seed_demo {
        if config.broker.kind == BrokerKind::InMemory {
            demo::seed(&memory, &config.query.default_queue).await;
            tracing::info!("in-memory backend seeded with demo data");
        } else {
            tracing::warn!(broker = %config.broker.kind, "--seed-demo only applies to the in-memory backend");
        }
    }

    let service = ServiceBuilder::from_config_with_memory(config, memory)
        .await
        .with_context(|| format!("opening {} backend", config.broker.kind))?
        .build()?;
    Ok(service)
}

async fn run_server(service: QueryService, config: &Config) -> anyhow::Result<()> {
    let shutdown = CancellationToken::new();
    tokio::spawn(server::watch_signals(shutdown.clone()));

    let state = AppState::new(service, config.ui.clone(), shutdown);
    server::serve(state, &config.server.bind_addr()).await
}

async fn run_query(service: &QueryService, command: Command) -> anyhow::Result<()> {
    let ctx = service.context();
    match command {
        Command::Serve => anyhow::bail!("serve is not a one-shot query"),
        Command::Stats => print_json(&service.dashboard_stats(&ctx).await?),
        Command::Job { id } => print_json(&service.job(&ctx, &id).await?),
        Command::Chain { id } => print_json(&service.chain(&ctx, &id).await?),
        Command::Chains => print_json(&service.list_chains(&ctx).await?),
        Command::Group { id } => print_json(&service.group(&ctx, &id).await?),
        Command::Groups => print_json(&service.list_groups(&ctx).await?),
        Command::Pending {
            queue,
            offset,
            limit,
            all,
        } => {
            let queue = queue.unwrap_or_default();
            if all {
                print_json(&service.pending_jobs(&ctx, &queue).await?)
            } else {
                print_json(&service.pending_page(&ctx, &queue, offset, limit).await?)
            }
        }
        Command::Count { queue } => {
            let queue = queue.unwrap_or_default();
            print_json(&service.pending_count(&ctx, &queue).await?)
        }
        Command::Jobs { status } => print_json(&service.jobs_by_status(&ctx, &status).await?),
        Command::Search { id } => {
            let result = service.search(&ctx, &id).await?;
            print_json(&result)?;
            result.found()?;
            Ok(())
        }
        Command::Delete { id } => {
            service.delete_job(&ctx, &id).await?;
            println!("job {id} deleted");
            Ok(())
        }
    }
}

fn print_json<T: Serialize>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

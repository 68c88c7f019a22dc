//! ThreatLens: threat report analysis with role-gated disclosure.
//! Entry point for the `threatlens` binary.

mod cli;

use std::path::Path;
use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use secrecy::{ExposeSecret, SecretString};
use threatlens_config::{Config, StorageBackend, StorageConfig};
use threatlens_db::{AnalysisLog, MemoryLog, SupabaseLog};
use threatlens_pipeline::{AnalysisPipeline, AnalysisRequest};
use threatlens_security::Role;
use tokio::io::AsyncReadExt;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use crate::cli::{Cli, Commands};

fn build_log(storage: &StorageConfig) -> anyhow::Result<Arc<dyn AnalysisLog>> {
    match storage.backend {
        StorageBackend::Memory => {
            warn!("Using the in-memory analysis log; entries are lost when the process exits");
            Ok(Arc::new(MemoryLog::new()))
        }
        StorageBackend::Supabase => {
            let url = storage
                .url
                .as_deref()
                .context("storage.url (or SUPABASE_URL) is required for the supabase backend")?;
            let key = storage
                .api_key
                .as_ref()
                .context("storage.api_key (or SUPABASE_KEY) is required for the supabase backend")?;
            let key = SecretString::from(key.expose_secret().to_string());
            info!(table = %storage.table, "Using Supabase analysis log");
            Ok(Arc::new(SupabaseLog::new(url, key, storage.table.as_str())))
        }
    }
}

async fn read_report(path: &Path) -> anyhow::Result<String> {
    if path == Path::new("-") {
        let mut text = String::new();
        tokio::io::stdin()
            .read_to_string(&mut text)
            .await
            .context("Failed to read report from stdin")?;
        return Ok(text);
    }
    tokio::fs::read_to_string(path)
        .await
        .with_context(|| format!("Failed to read report {}", path.display()))
}

fn print_json<T: serde::Serialize>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("threatlens=debug,info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let config = Config::load().context("Failed to load configuration")?;

    let caps = threatlens_pipeline::init_global(&config)?;
    let log = build_log(&config.storage)?;
    let pipeline = AnalysisPipeline::from_capabilities(&caps)
        .with_evidence_concurrency(config.analysis.evidence_concurrency)
        .with_log(log);

    match cli.command {
        Commands::Analyze { role, file } => {
            let text = read_report(&file).await?;
            let request = AnalysisRequest::new(&role, text);
            let outcome = pipeline.analyze(&request).await?;
            print_json(&outcome)?;
        }
        Commands::History { role, limit } => {
            let limit = limit.unwrap_or(config.storage.history_limit);
            let entries = pipeline.history(Role::from_name(&role), limit).await?;
            print_json(&entries)?;
        }
        Commands::Delete { role, id } => {
            pipeline.delete_log(Role::from_name(&role), id).await?;
            info!(id, "Log entry deleted");
        }
        Commands::Clear { role } => {
            pipeline.clear_log(Role::from_name(&role)).await?;
            info!("Log cleared");
        }
    }

    drop(pipeline);
    drop(caps);
    threatlens_pipeline::shutdown_global()?;
    Ok(())
}

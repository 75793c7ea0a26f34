pub mod cli;
pub mod logging;
pub mod render;

use eds_client::backend::Backend;
use eds_client::query::QueryState;
use eds_client::{DesignSession, HttpBackend};
use eds_core::config::ClientConfig;
use eds_core::error::AppError;
use serde::Serialize;

pub use cli::{Cli, Commands};
use render::{ClearResponse, CountResponse, IndexSummary, RemoveResponse, StatusSummary};

fn emit<T: Serialize>(json: bool, value: &T, text: impl FnOnce(&T) -> String) -> Result<String, AppError> {
    if json {
        serde_json::to_string_pretty(value).map_err(|e| {
            AppError::new("OUTPUT_ENCODE_FAILED", "Failed to encode JSON output")
                .with_details(e.to_string())
        })
    } else {
        Ok(text(value))
    }
}

fn load_config(cli: &Cli) -> Result<ClientConfig, AppError> {
    let mut config = ClientConfig::load(cli.config.as_deref())?;
    if let Some(url) = &cli.base_url {
        config.base_url = url.clone();
        config.validate()?;
    }
    Ok(config)
}

/// Load configuration, connect and run one command. Returns what should be printed.
pub async fn run(cli: Cli) -> Result<String, AppError> {
    let config = load_config(&cli)?;
    logging::init_with_config(&config.logging);
    let backend = HttpBackend::with_timeout(&config.base_url, config.request_timeout())?;
    tracing::debug!(base_url = backend.base_url(), "backend configured");
    let mut session = DesignSession::new(backend, &config);
    execute(&mut session, cli.command, cli.json).await
}

pub async fn execute<B: Backend>(
    session: &mut DesignSession<B>,
    command: Commands,
    json: bool,
) -> Result<String, AppError> {
    match command {
        Commands::Query {
            text,
            materials,
            show_all,
        } => {
            match session.submit_query(&text, materials).await {
                None => return Err(AppError::new("QUERY_EMPTY", "Query text is empty")),
                Some(QueryState::Failed(e)) => return Err(e.clone()),
                Some(_) => {}
            }
            let view = session.result_view(show_all).ok_or_else(|| {
                AppError::new("QUERY_FAILED", "Query finished without a result")
            })?;
            emit(json, &view, render::result_text)
        }
        Commands::Upload { files } => {
            let report = session.upload_paths(&files).await;
            emit(json, &report, render::upload_text)
        }
        Commands::Index => {
            session.refresh_status().await?;
            let summary = IndexSummary::from_run(session.index_pending().await)?;
            emit(json, &summary, render::index_text)
        }
        Commands::Status => {
            session.refresh_status().await?;
            session.recount().await;
            let summary = StatusSummary::new(session.ledger(), session.document_count());
            emit(json, &summary, render::status_text)
        }
        Commands::Remove { filename } => {
            session.remove_pending(&filename).await?;
            let resp = RemoveResponse { ok: true, filename };
            emit(json, &resp, |r| format!("Removed {} from the pending queue.", r.filename))
        }
        Commands::Clear { yes } => {
            if !yes {
                return Err(AppError::new(
                    "CONFIRMATION_REQUIRED",
                    "Refusing to clear every document without --yes",
                ));
            }
            session.clear_documents().await?;
            let resp = ClearResponse {
                ok: true,
                total_indexed: session.document_count(),
            };
            emit(json, &resp, |_| "Cleared all pending and indexed documents.".to_string())
        }
        Commands::Search { text } => {
            let found = session.search(&text).await?;
            emit(json, &found, render::search_text)
        }
        Commands::Count => {
            let total_indexed = match session.recount().await {
                Some(n) if session.count_error().is_none() => n,
                _ => {
                    return Err(session.count_error().cloned().unwrap_or_else(|| {
                        AppError::new("DOCUMENTS_COUNT_FAILED", "Document count unavailable")
                    }))
                }
            };
            emit(json, &CountResponse { total_indexed }, |c| {
                format!("{} documents indexed", c.total_indexed)
            })
        }
        Commands::Health => {
            let health = session.health().await?;
            emit(json, &health, render::health_text)
        }
    }
}

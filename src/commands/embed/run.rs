use std::io::{self, Write};
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use rusqlite::Connection;
use tracing::{info, warn};

use super::types::{EmbedOptions, NOTHING_PENDING_MESSAGE};
use crate::cli::EmbedArgs;
use crate::embedder::{Embedder, OllamaEmbedder};
use crate::model::EmbedRunSummary;
use crate::progress::{ProgressSnapshot, render_summary};
use crate::semantic::prepare_text_with_limit;
use crate::store::{count_pending, fetch_pending, open_connection, store_embedding};

pub fn run(args: EmbedArgs) -> Result<()> {
    let mut connection = open_connection(&args.db_path)?;
    let embedder = OllamaEmbedder::new(
        args.endpoint.clone(),
        args.model.clone(),
        Duration::from_secs(args.timeout_secs),
    )?;
    let options = EmbedOptions {
        force: args.force,
        max_chars: args.max_chars,
    };

    info!(
        db_path = %args.db_path.display(),
        endpoint = %embedder.endpoint(),
        model = %embedder.model(),
        force = options.force,
        "starting embedding run"
    );

    let stdout = io::stdout();
    let mut out = stdout.lock();
    let summary = run_embed(&mut connection, &embedder, &options, &mut out)?;

    info!(
        total = summary.total,
        processed = summary.processed,
        errors = summary.errors,
        duration_ms = summary.elapsed.as_millis() as u64,
        "embedding run completed"
    );

    Ok(())
}

/// Embeds every pending document in id order, committing each vector as it
/// arrives. Embedding failures are counted and skipped; database failures
/// abort the run.
pub fn run_embed<E: Embedder, W: Write>(
    connection: &mut Connection,
    embedder: &E,
    options: &EmbedOptions,
    out: &mut W,
) -> Result<EmbedRunSummary> {
    let total = count_pending(connection, options.force)?;

    if total == 0 {
        writeln!(out, "{NOTHING_PENDING_MESSAGE}").context("failed to write console output")?;
        return Ok(EmbedRunSummary::nothing_pending());
    }

    writeln!(out, "Dokumentów do przetworzenia: {total}")
        .context("failed to write console output")?;

    let documents = fetch_pending(connection, options.force)?;
    let started = Instant::now();
    let mut processed = 0usize;
    let mut errors = 0usize;

    for (index, document) in documents.iter().enumerate() {
        let text = prepare_text_with_limit(
            document.title.as_deref(),
            document.subtitle.as_deref(),
            document.content.as_deref(),
            options.max_chars,
        );

        match embedder.embed(&text) {
            Some(vector) => {
                store_embedding(connection, document.id, &vector)?;
                processed += 1;
            }
            None => {
                errors += 1;
                warn!(document_id = document.id, "no embedding generated, document skipped");
                write!(out, "\n  Błąd: ID={}\n", document.id)
                    .context("failed to write console output")?;
            }
        }

        let snapshot = ProgressSnapshot::new(index + 1, total, started.elapsed());
        write!(out, "\r{}", snapshot.render()).context("failed to write console output")?;
        out.flush().context("failed to flush console output")?;
    }

    let elapsed = started.elapsed();
    writeln!(out, "\n\n{}", render_summary(processed, total, errors, elapsed))
        .context("failed to write console output")?;

    Ok(EmbedRunSummary {
        total,
        processed,
        errors,
        elapsed,
    })
}

//! C9: the pipeline loop wiring C5 -> C4 -> (C6 -> C7 -> C8) -> ack,
//! owning lifecycle, metrics, and graceful shutdown (§4.9).

use etrap_batcher::{BatchAccumulator, SealedBatch};
use etrap_context::AgentContext;
use etrap_utils::probe;

/// Runs the orchestrator loop until a shutdown signal arrives, then
/// drains the batch accumulator and exits. Mirrors the teacher's
/// `service::ignite` shape: `tokio::select!` against a shutdown
/// broadcast receiver obtained once at the top.
pub async fn run(ctx: &AgentContext) -> anyhow::Result<()> {
    let mut shutdown = ctx.shutdown_signal();
    let mut accumulator = BatchAccumulator::new(
        ctx.config.batcher.to_batcher_config(),
        &ctx.config.organization_id,
    );
    let mut known_streams: Vec<String> = Vec::new();
    let mut reconnect_backoff = etrap_stream::reconnect_backoff();

    loop {
        tokio::select! {
            biased;
            _ = shutdown.recv() => {
                tracing::info!("shutdown signal received, draining pipeline");
                break;
            }
            result = run_cycle(ctx, &mut accumulator, &mut known_streams) => {
                match result {
                    Ok(()) => {
                        reconnect_backoff = etrap_stream::reconnect_backoff();
                    }
                    Err(etrap_utils::Error::BrokerUnavailable(reason)) => {
                        use backoff::backoff::Backoff;
                        let delay = reconnect_backoff
                            .next_backoff()
                            .unwrap_or(std::time::Duration::from_secs(30));
                        tracing::warn!(reason = %reason, delay_ms = delay.as_millis() as u64, "broker unavailable, retrying");
                        known_streams.clear();
                        tokio::time::sleep(delay).await;
                    }
                    Err(e @ etrap_utils::Error::ObjectStoreUploadFailed { .. })
                    | Err(e @ etrap_utils::Error::MintFailed { .. }) => {
                        // §7: non-fatal, the batch is retried with a new id next cycle.
                        tracing::warn!(error = %e, "batch commit failed, retrying next cycle");
                    }
                    Err(e) => return Err(e.into()),
                }
            }
        }
    }

    let now = now_ms();
    let (sealed, dropped) = accumulator.shutdown(now);
    for (database, table) in dropped {
        tracing::warn!(
            database = %database,
            table = %table,
            "dropping buffer below min_batch_size at shutdown; events will be redelivered on restart"
        );
    }
    for batch in sealed {
        if let Err(e) = commit_batch(ctx, batch).await {
            tracing::error!(error = %e, "failed to commit force-sealed batch during shutdown");
        }
    }
    Ok(())
}

/// One iteration: (re)discover streams if needed, issue the blocking
/// multi-stream read, decode and buffer events, evaluate seal triggers,
/// and commit every batch that sealed. Runs trigger evaluation on every
/// read return, whether or not it carried events (§4.4).
async fn run_cycle(
    ctx: &AgentContext,
    accumulator: &mut BatchAccumulator,
    known_streams: &mut Vec<String>,
) -> etrap_utils::Result<()> {
    if known_streams.is_empty() {
        let mut discovered = ctx
            .broker
            .discover_streams(&ctx.config.broker.stream_pattern)
            .await?;
        discovered.sort();
        for stream in &discovered {
            ctx.broker
                .ensure_group(stream, &ctx.config.broker.consumer_group)
                .await?;
        }
        *known_streams = discovered;
    }

    if known_streams.is_empty() {
        tokio::time::sleep(ctx.config.batcher.idle_timeout()).await;
        return Ok(());
    }

    let entries = ctx
        .broker
        .read(
            known_streams,
            &ctx.config.broker.consumer_group,
            &ctx.config.broker.consumer_name,
            ctx.config.batcher.idle_timeout(),
        )
        .await?;

    let now = now_ms();
    let mut sealed_batches = Vec::new();

    if entries.is_empty() {
        ctx.metrics.record_empty_read();
        tracing::event!(target: probe::TARGET, tracing::Level::INFO, kind = %probe::Kind::EmptyRead);
    } else {
        let mut malformed_entries = Vec::new();
        for entry in entries {
            let stream_name = entry.stream_name.clone();
            let entry_id = entry.entry_id.clone();
            match etrap_stream::decode_entry(entry) {
                Ok(event) => {
                    ctx.metrics.record_events_processed(1);
                    if let Some(sealed) = accumulator.ingest(event, now) {
                        sealed_batches.push(sealed);
                    }
                }
                Err(etrap_utils::Error::MalformedEvent { stream, reason }) => {
                    // §7: log, drop the single event, ack its entry —
                    // never stalls the batch.
                    tracing::warn!(stream = %stream, entry_id = %entry_id, reason = %reason, "dropping malformed event");
                    malformed_entries.push((stream_name, entry_id));
                }
                Err(e) => return Err(e),
            }
        }
        if !malformed_entries.is_empty() {
            ctx.broker
                .ack(&ctx.config.broker.consumer_group, &malformed_entries)
                .await?;
        }
    }

    sealed_batches.extend(accumulator.evaluate_triggers(now));

    // §5: a trigger on one buffer does not affect others, so one batch's
    // commit failure must not prevent a sibling batch from committing.
    let mut first_err = None;
    for batch in sealed_batches {
        if let Err(e) = commit_batch(ctx, batch).await {
            match &e {
                etrap_utils::Error::BrokerUnavailable(_) => return Err(e),
                _ => {
                    tracing::warn!(error = %e, "batch commit failed, continuing with remaining batches");
                    first_err.get_or_insert(e);
                }
            }
        }
    }
    match first_err {
        Some(e) => Err(e),
        None => Ok(()),
    }
}

/// Runs one sealed batch through C6 -> C7 -> C8 and, only once the
/// token is minted or confirmed already-minted, acknowledges the
/// broker entries that fed it (§4.9, §7's core ordering invariant).
async fn commit_batch(ctx: &AgentContext, sealed: SealedBatch) -> etrap_utils::Result<()> {
    let SealedBatch { batch, entry_ids } = sealed;

    ctx.metrics.record_batch_sealed(batch.created_at_ms);
    tracing::event!(target: probe::TARGET, tracing::Level::INFO, kind = %probe::Kind::BatchSealed, batch_id = %batch.batch_id);

    let artifacts =
        etrap_artifacts::compose(&batch).map_err(|e| etrap_utils::Error::Other(e.into()))?;

    let bucket = ctx.config.object_store.bucket.clone();
    if let Err(e) =
        etrap_objectstore::publish(ctx.object_store.as_ref(), &bucket, &batch, &artifacts).await
    {
        tracing::error!(batch_id = %batch.batch_id, error = %e, "artifact publish failed; batch will be retried with a new id next cycle");
        return Err(e);
    }
    tracing::event!(target: probe::TARGET, tracing::Level::INFO, kind = %probe::Kind::ArtifactsPublished, batch_id = %batch.batch_id);

    let key_prefix = etrap_objectstore::batch_prefix(&batch);
    let summary = etrap_anchor::BatchSummary::from_batch(&batch, &bucket, &key_prefix);
    let metadata = etrap_anchor::TokenMetadata {
        title: format!("etrap batch {}", batch.batch_id),
        description: format!(
            "{} change events from {}.{}",
            batch.transactions.len(),
            batch.database_name,
            batch.canonical_table()
        ),
        reference_url: format!("s3://{bucket}/{key_prefix}/batch-data.json"),
    };

    match etrap_anchor::mint_with_retry(
        ctx.anchor.as_ref(),
        batch.batch_id.as_str(),
        &ctx.config.anchor.account,
        &metadata,
        &summary,
    )
    .await
    {
        Ok(_outcome) => {
            ctx.metrics.record_mint_result(true);
            tracing::event!(target: probe::TARGET, tracing::Level::INFO, kind = %probe::Kind::TokenMinted, batch_id = %batch.batch_id);
        }
        Err(e) => {
            ctx.metrics.record_mint_result(false);
            tracing::error!(batch_id = %batch.batch_id, error = %e, "mint failed after retries; artifacts remain, events will be redelivered");
            return Err(e);
        }
    }

    ctx.broker
        .ack(&ctx.config.broker.consumer_group, &entry_ids)
        .await?;
    tracing::event!(target: probe::TARGET, tracing::Level::INFO, kind = %probe::Kind::EntriesAcked, batch_id = %batch.batch_id, count = entry_ids.len());
    Ok(())
}

fn now_ms() -> i64 {
    chrono::Utc::now().timestamp_millis()
}

//! Ingestion: runs the extractor over source messages and writes the catalog.
//!
//! A message that doesn't describe an episode is skipped, never an error.
//! Re-indexing clears the catalog and replays a history in order; running it
//! again from the start converges to the same catalog.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::catalog::{CatalogError, EpisodeCatalog, EpisodeRecord, Locator};
use crate::extractor;
use crate::metrics;

/// Number of indexed files between two progress callbacks during a re-index.
pub const REINDEX_PROGRESS_INTERVAL: u64 = 50;

/// A media message from a source channel.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceMessage {
    pub message_id: i64,
    pub channel_id: i64,
    #[serde(default)]
    pub file_name: String,
    #[serde(default)]
    pub caption: String,
}

impl SourceMessage {
    pub fn locator(&self) -> Locator {
        Locator {
            message_id: self.message_id,
            channel_id: self.channel_id,
        }
    }
}

/// Result of indexing one message.
#[derive(Debug, Clone, PartialEq)]
pub enum IndexOutcome {
    Indexed(EpisodeRecord),
    Skipped,
}

/// Counters of a re-index run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReindexReport {
    pub scanned: u64,
    pub indexed: u64,
    pub skipped: u64,
}

/// Couples the extractor with an episode catalog.
pub struct Indexer {
    catalog: Arc<dyn EpisodeCatalog>,
}

impl Indexer {
    pub fn new(catalog: Arc<dyn EpisodeCatalog>) -> Self {
        Self { catalog }
    }

    /// Index one message at time `at`.
    pub fn index_message(
        &self,
        message: &SourceMessage,
        at: DateTime<Utc>,
    ) -> Result<IndexOutcome, CatalogError> {
        let Some(descriptor) = extractor::extract(&message.file_name, &message.caption) else {
            debug!(
                message_id = message.message_id,
                channel_id = message.channel_id,
                "skipping message without episode marker"
            );
            metrics::MESSAGES_SKIPPED.inc();
            return Ok(IndexOutcome::Skipped);
        };

        let record = self.catalog.put(&descriptor, message.locator(), at)?;
        metrics::EPISODES_INDEXED.inc();

        info!(
            id = %record.id,
            series = %record.series_name,
            code = %record.code(),
            quality = %record.quality,
            "indexed episode"
        );

        Ok(IndexOutcome::Indexed(record))
    }

    /// Clear the catalog and replay `history` in order.
    ///
    /// `on_progress` is called after every [`REINDEX_PROGRESS_INTERVAL`]
    /// indexed files. A store failure aborts the run; starting it again is
    /// safe.
    pub fn reindex<'a, I, F>(
        &self,
        history: I,
        mut on_progress: F,
    ) -> Result<ReindexReport, CatalogError>
    where
        I: IntoIterator<Item = &'a SourceMessage>,
        F: FnMut(&ReindexReport),
    {
        let timer = metrics::REINDEX_DURATION.start_timer();
        self.catalog.clear()?;
        info!("catalog cleared, replaying history");

        let mut report = ReindexReport::default();
        for message in history {
            report.scanned += 1;
            match self.index_message(message, Utc::now())? {
                IndexOutcome::Indexed(_) => {
                    report.indexed += 1;
                    if report.indexed % REINDEX_PROGRESS_INTERVAL == 0 {
                        on_progress(&report);
                    }
                }
                IndexOutcome::Skipped => report.skipped += 1,
            }
        }

        timer.observe_duration();
        metrics::REINDEX_RUNS.inc();
        info!(
            scanned = report.scanned,
            indexed = report.indexed,
            skipped = report.skipped,
            "re-index complete"
        );

        Ok(report)
    }
}

use tracing::{debug, info};

use crate::analysis::PlatformBreakdown;

/// Structured events emitted around aggregation.
#[derive(Debug, Clone, Copy)]
pub enum DiagnosticEvent<'a> {
    AggregationStarted {
        brand: &'a str,
        records: usize,
    },
    PlatformSummarized {
        platform: &'a str,
        summary: &'a PlatformBreakdown,
    },
    AggregationFinished {
        brand: &'a str,
        overall_score: f64,
        mentions: usize,
        no_data_records: usize,
    },
}

pub trait DiagnosticObserver {
    fn observe(&self, event: &DiagnosticEvent<'_>);
}

#[derive(Debug, Clone, Copy, Default)]
pub struct NoopObserver;

impl DiagnosticObserver for NoopObserver {
    fn observe(&self, _event: &DiagnosticEvent<'_>) {}
}

/// Forwards events to `tracing`.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingObserver;

impl DiagnosticObserver for TracingObserver {
    fn observe(&self, event: &DiagnosticEvent<'_>) {
        match *event {
            DiagnosticEvent::AggregationStarted { brand, records } => {
                debug!(brand, records, "aggregating visibility metrics");
            }
            DiagnosticEvent::PlatformSummarized { platform, summary } => {
                debug!(
                    platform,
                    queries = summary.total_queries,
                    mentions = summary.mentions,
                    avg_score = summary.avg_score,
                    "platform summarized"
                );
            }
            DiagnosticEvent::AggregationFinished {
                brand,
                overall_score,
                mentions,
                no_data_records,
            } => {
                info!(
                    brand,
                    overall_score, mentions, no_data_records, "visibility metrics ready"
                );
            }
        }
    }
}

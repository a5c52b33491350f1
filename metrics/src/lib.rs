use prometheus::{Encoder, Histogram, HistogramOpts, IntCounter, IntCounterVec, IntGauge, Opts, Registry, TextEncoder};
use std::sync::Arc;

pub use prometheus::Error as MetricsError;

#[derive(Clone)]
pub struct Metrics {
    registry: Registry,
    sync_runs: IntCounterVec,
    epochs_walked: IntCounter,
    records_ingested: IntCounter,
    persistence_failures: IntCounter,
    last_walked_epoch: IntGauge,
    finalized_epoch: IntGauge,
    epoch_fetch_time: Histogram,
}

impl Metrics {
    pub fn new() -> prometheus::Result<Self> {
        let registry = Registry::new();

        let sync_runs = IntCounterVec::new(
            Opts::new("graffiti_sync_runs_total", "Total number of sync runs by result"),
            &["result"],
        )?;
        registry.register(Box::new(sync_runs.clone()))?;

        let epochs_walked = IntCounter::with_opts(Opts::new("graffiti_epochs_walked_total", "Total number of epochs fetched"))?;
        registry.register(Box::new(epochs_walked.clone()))?;

        let records_ingested = IntCounter::with_opts(Opts::new("graffiti_records_ingested_total", "Total number of graffiti records persisted"))?;
        registry.register(Box::new(records_ingested.clone()))?;

        let persistence_failures = IntCounter::with_opts(Opts::new("graffiti_persistence_failures_total", "Total number of epoch batches the store rejected"))?;
        registry.register(Box::new(persistence_failures.clone()))?;

        let last_walked_epoch = IntGauge::with_opts(Opts::new("graffiti_last_walked_epoch", "Most recent epoch fetched"))?;
        registry.register(Box::new(last_walked_epoch.clone()))?;

        let finalized_epoch = IntGauge::with_opts(Opts::new("graffiti_finalized_epoch", "Finalized epoch reported by the explorer"))?;
        registry.register(Box::new(finalized_epoch.clone()))?;

        let epoch_fetch_time = Histogram::with_opts(
            HistogramOpts::new("graffiti_epoch_fetch_time_seconds", "Time taken to fetch one epoch from the explorer")
                .buckets(vec![0.05, 0.1, 0.25, 0.5, 1.0, 2.5, 5.0, 10.0]),
        )?;
        registry.register(Box::new(epoch_fetch_time.clone()))?;

        Ok(Self {
            registry,
            sync_runs,
            epochs_walked,
            records_ingested,
            persistence_failures,
            last_walked_epoch,
            finalized_epoch,
            epoch_fetch_time,
        })
    }

    pub fn gather(&self) -> prometheus::Result<String> {
        let metric_families = self.registry.gather();
        let mut buffer = Vec::<u8>::new();
        let encoder = TextEncoder::new();
        encoder.encode(&metric_families, &mut buffer)?;
        String::from_utf8(buffer).map_err(|err| prometheus::Error::Msg(err.to_string()))
    }

    pub fn inc_sync_runs(&self, result: &str) {
        self.sync_runs.with_label_values(&[result]).inc();
    }

    pub fn inc_epochs_walked(&self) {
        self.epochs_walked.inc();
    }

    pub fn inc_records_ingested(&self, count: u64) {
        self.records_ingested.inc_by(count);
    }

    pub fn inc_persistence_failures(&self) {
        self.persistence_failures.inc();
    }

    pub fn set_last_walked_epoch(&self, epoch: u64) {
        self.last_walked_epoch.set(clamp(epoch));
    }

    pub fn set_finalized_epoch(&self, epoch: u64) {
        self.finalized_epoch.set(clamp(epoch));
    }

    pub fn observe_epoch_fetch_time(&self, duration: f64) {
        self.epoch_fetch_time.observe(duration);
    }
}

fn clamp(value: u64) -> i64 {
    i64::try_from(value).unwrap_or(i64::MAX)
}

pub type SharedMetrics = Arc<Metrics>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_gather_renders_registered_series() {
        let metrics = Metrics::new().unwrap();
        metrics.inc_sync_runs("completed");
        metrics.inc_epochs_walked();
        metrics.inc_records_ingested(3);
        metrics.set_finalized_epoch(271_828);
        metrics.observe_epoch_fetch_time(0.3);

        let text = metrics.gather().unwrap();
        assert!(text.contains("graffiti_sync_runs_total{result=\"completed\"} 1"));
        assert!(text.contains("graffiti_epochs_walked_total 1"));
        assert!(text.contains("graffiti_records_ingested_total 3"));
        assert!(text.contains("graffiti_finalized_epoch 271828"));
        assert!(text.contains("graffiti_epoch_fetch_time_seconds_count 1"));
        assert!(text.contains("graffiti_epoch_fetch_time_seconds_bucket{le=\"0.5\"} 1"));
    }

    #[test]
    fn test_instances_do_not_share_registries() {
        let first = Metrics::new().unwrap();
        let second = Metrics::new().unwrap();
        first.inc_persistence_failures();

        assert!(first.gather().unwrap().contains("graffiti_persistence_failures_total 1"));
        assert!(second.gather().unwrap().contains("graffiti_persistence_failures_total 0"));
    }
}

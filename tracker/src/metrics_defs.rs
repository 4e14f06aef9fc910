//! Metrics definitions for the tracker.

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MetricType {
    Counter,
    Histogram,
}

#[derive(Debug, Clone, Copy)]
pub struct MetricDef {
    pub name: &'static str,
    pub metric_type: MetricType,
    pub description: &'static str,
}

pub const UPSTREAM_FETCH_FAILURE: MetricDef = MetricDef {
    name: "upstream.fetch.failure",
    metric_type: MetricType::Counter,
    description: "Number of upstream reads resolved to absent or default data",
};

pub const CRAWL_ENTRY_SUCCESS: MetricDef = MetricDef {
    name: "crawl.entry.success",
    metric_type: MetricType::Counter,
    description: "Number of roster entries fetched and upserted",
};

pub const CRAWL_ENTRY_FAILURE: MetricDef = MetricDef {
    name: "crawl.entry.failure",
    metric_type: MetricType::Counter,
    description: "Number of roster entries skipped during a crawl",
};

pub const CRAWL_RUN_DURATION: MetricDef = MetricDef {
    name: "crawl.run.duration",
    metric_type: MetricType::Histogram,
    description: "Time to complete a crawl over the full roster in milliseconds",
};

pub const SYNC_BATCH_REJECTED: MetricDef = MetricDef {
    name: "sync.batch.rejected",
    metric_type: MetricType::Counter,
    description: "Number of push-sync batches rejected for a bad shared secret",
};

pub const ALL_METRICS: &[MetricDef] = &[
    UPSTREAM_FETCH_FAILURE,
    CRAWL_ENTRY_SUCCESS,
    CRAWL_ENTRY_FAILURE,
    CRAWL_RUN_DURATION,
    SYNC_BATCH_REJECTED,
];

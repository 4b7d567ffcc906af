//! Metrics emitted while extracting DSNs from requests.

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MetricType {
    Counter,
}

impl MetricType {
    pub const fn as_str(&self) -> &'static str {
        match self {
            MetricType::Counter => "Counter",
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct MetricDef {
    pub name: &'static str,
    pub metric_type: MetricType,
    pub description: &'static str,
}

pub const DSN_EXTRACT: MetricDef = MetricDef {
    name: "dsn.extract",
    metric_type: MetricType::Counter,
    description: "DSN extraction attempts. Tagged with outcome.",
};

pub const DSN_CREDENTIAL_SOURCE: MetricDef = MetricDef {
    name: "dsn.credential_source",
    metric_type: MetricType::Counter,
    description: "Where request credentials were found. Tagged with source, endpoint.",
};

pub const ALL_METRICS: &[MetricDef] = &[DSN_EXTRACT, DSN_CREDENTIAL_SOURCE];

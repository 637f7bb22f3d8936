//! Prometheus instruments for the service
//!
//! One [`Metrics`] is built at startup and shared by clone. After that the
//! registry is only read (by the exporter) and the instruments only updated.

use std::sync::Arc;
use std::time::Duration;

use prometheus::{HistogramOpts, HistogramVec, IntCounterVec, Opts, Registry, TextEncoder};

use crate::{ErrorKind, Result};

const NAMESPACE: &str = "rota";

/// Content type of the text exposition format
pub const CONTENT_TYPE: &str = prometheus::TEXT_FORMAT;

/// Shared handle to the registry and its instruments
#[derive(Clone)]
pub struct Metrics {
    inner: Arc<Instruments>,
}

struct Instruments {
    registry: Registry,
    requests_total: IntCounterVec,
    requests_success_total: IntCounterVec,
    request_duration: HistogramVec,
    operations_total: IntCounterVec,
    operation_duration: HistogramVec,
}

impl Metrics {
    /// Create a registry with every instrument registered
    pub fn new() -> Result<Self> {
        let registry = Registry::new();

        let requests_total = IntCounterVec::new(
            Opts::new("requests_total", "HTTP requests handled")
                .namespace(NAMESPACE)
                .subsystem("rest"),
            &["method", "route", "code"],
        )?;
        let requests_success_total = IntCounterVec::new(
            Opts::new("requests_success_total", "HTTP requests answered with a 2xx status")
                .namespace(NAMESPACE)
                .subsystem("rest"),
            &["method", "route", "code"],
        )?;
        let request_duration = HistogramVec::new(
            HistogramOpts::new("request_duration_seconds", "HTTP request handling time")
                .namespace(NAMESPACE)
                .subsystem("rest"),
            &["method", "route"],
        )?;
        let operations_total = IntCounterVec::new(
            Opts::new("operations_total", "Engine and directory operations by outcome")
                .namespace(NAMESPACE),
            &["operation", "outcome"],
        )?;
        let operation_duration = HistogramVec::new(
            HistogramOpts::new("operation_duration_seconds", "Operation latency, including store time")
                .namespace(NAMESPACE),
            &["operation"],
        )?;

        registry.register(Box::new(requests_total.clone()))?;
        registry.register(Box::new(requests_success_total.clone()))?;
        registry.register(Box::new(request_duration.clone()))?;
        registry.register(Box::new(operations_total.clone()))?;
        registry.register(Box::new(operation_duration.clone()))?;

        Ok(Self {
            inner: Arc::new(Instruments {
                registry,
                requests_total,
                requests_success_total,
                request_duration,
                operations_total,
                operation_duration,
            }),
        })
    }

    /// Record one handled HTTP request
    ///
    /// `route` is the matched route pattern, not the raw path.
    pub fn observe_request(&self, method: &str, route: &str, status: u16, elapsed: Duration) {
        let code = status.to_string();
        let m = &self.inner;

        m.requests_total
            .with_label_values(&[method, route, code.as_str()])
            .inc();
        if (200..300).contains(&status) {
            m.requests_success_total
                .with_label_values(&[method, route, code.as_str()])
                .inc();
        }
        m.request_duration
            .with_label_values(&[method, route])
            .observe(elapsed.as_secs_f64());
    }

    /// Record one engine or directory call
    pub fn observe_operation<T>(&self, operation: &str, result: &Result<T>, elapsed: Duration) {
        let outcome = match result {
            Ok(_) => "ok",
            Err(e) => e.kind().as_str(),
        };
        let m = &self.inner;

        m.operations_total
            .with_label_values(&[operation, outcome])
            .inc();
        m.operation_duration
            .with_label_values(&[operation])
            .observe(elapsed.as_secs_f64());
    }

    /// Render every registered family in the text exposition format
    pub fn render(&self) -> Result<String> {
        Ok(TextEncoder::new().encode_to_string(&self.inner.registry.gather())?)
    }
}

impl ErrorKind {
    /// Label value used for the `outcome` of a failed operation
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorKind::NotFound => "not_found",
            ErrorKind::AlreadyExists => "already_exists",
            ErrorKind::InvalidState => "invalid_state",
            ErrorKind::NoCandidate => "no_candidate",
            ErrorKind::Precondition => "precondition",
            ErrorKind::Internal => "internal",
        }
    }
}

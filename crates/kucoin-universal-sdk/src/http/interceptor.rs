/*
[INPUT]:  Outgoing request context and call outcome
[OUTPUT]: Side effects (access logs) around every REST call
[POS]:    HTTP layer - before/after hooks
[UPDATE]: When adding interceptor hooks
*/

use std::fmt::Debug;
use std::time::Duration;

use reqwest::Method;
use tracing::{info, warn};

use crate::config::Domain;

#[derive(Debug, Clone)]
pub struct RequestContext {
    pub domain: Domain,
    pub method: Method,
    pub url: String,
}

#[derive(Debug, Clone)]
pub struct CallOutcome {
    pub status: Option<u16>,
    pub elapsed: Duration,
    pub error: Option<String>,
}

/// Hooks run around each REST call
pub trait Interceptor: Send + Sync + Debug {
    fn before(&self, _context: &RequestContext) {}

    fn after(&self, _context: &RequestContext, _outcome: &CallOutcome) {}
}

/// Writes one access line per call
#[derive(Debug, Default, Clone, Copy)]
pub struct LoggingInterceptor;

impl Interceptor for LoggingInterceptor {
    fn after(&self, context: &RequestContext, outcome: &CallOutcome) {
        let cost_ms = outcome.elapsed.as_millis() as u64;
        match &outcome.error {
            None => info!(
                domain = %context.domain,
                method = %context.method,
                url = %context.url,
                status = outcome.status,
                cost_ms,
                "[Access]"
            ),
            Some(error) => warn!(
                domain = %context.domain,
                method = %context.method,
                url = %context.url,
                status = outcome.status,
                cost_ms,
                error = %error,
                "[Access]"
            ),
        }
    }
}

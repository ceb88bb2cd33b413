/*
[INPUT]:  HTTP tuning knobs (pool, timeouts, proxy, retries, interceptors)
[OUTPUT]: TransportOption consumed by the REST transport
[POS]:    Configuration layer - REST transport settings
[UPDATE]: When adding connection options or changing defaults
*/

use std::sync::Arc;
use std::time::Duration;

use crate::http::interceptor::Interceptor;

/// HTTP transport configuration
#[derive(Debug, Clone)]
pub struct TransportOption {
    pub keep_alive: bool,
    pub max_idle_connections: usize,
    pub keep_alive_duration: Duration,
    pub connect_timeout: Duration,
    pub read_timeout: Duration,
    /// Whole-call deadline; `None` disables it
    pub call_timeout: Option<Duration>,
    pub proxy: Option<String>,
    pub retry_on_connection_failure: bool,
    /// Extra attempts after a connection failure
    pub max_retries: u32,
    pub retry_delay: Duration,
    pub interceptors: Vec<Arc<dyn Interceptor>>,
}

impl Default for TransportOption {
    fn default() -> Self {
        Self {
            keep_alive: true,
            max_idle_connections: 5,
            keep_alive_duration: Duration::from_secs(30),
            connect_timeout: Duration::from_secs(10),
            read_timeout: Duration::from_secs(30),
            call_timeout: None,
            proxy: None,
            retry_on_connection_failure: true,
            max_retries: 0,
            retry_delay: Duration::from_secs(2),
            interceptors: Vec::new(),
        }
    }
}

impl TransportOption {
    pub fn builder() -> TransportOptionBuilder {
        TransportOptionBuilder::default()
    }
}

#[derive(Debug, Default)]
pub struct TransportOptionBuilder {
    option: TransportOption,
}

impl TransportOptionBuilder {
    pub fn keep_alive(mut self, keep_alive: bool) -> Self {
        self.option.keep_alive = keep_alive;
        self
    }

    pub fn max_idle_connections(mut self, count: usize) -> Self {
        self.option.max_idle_connections = count;
        self
    }

    pub fn keep_alive_duration(mut self, duration: Duration) -> Self {
        self.option.keep_alive_duration = duration;
        self
    }

    pub fn connect_timeout(mut self, timeout: Duration) -> Self {
        self.option.connect_timeout = timeout;
        self
    }

    pub fn read_timeout(mut self, timeout: Duration) -> Self {
        self.option.read_timeout = timeout;
        self
    }

    pub fn call_timeout(mut self, timeout: Duration) -> Self {
        self.option.call_timeout = Some(timeout);
        self
    }

    pub fn proxy(mut self, proxy: impl Into<String>) -> Self {
        self.option.proxy = Some(proxy.into());
        self
    }

    pub fn retry_on_connection_failure(mut self, retry: bool) -> Self {
        self.option.retry_on_connection_failure = retry;
        self
    }

    pub fn max_retries(mut self, retries: u32) -> Self {
        self.option.max_retries = retries;
        self
    }

    pub fn retry_delay(mut self, delay: Duration) -> Self {
        self.option.retry_delay = delay;
        self
    }

    pub fn add_interceptor(mut self, interceptor: Arc<dyn Interceptor>) -> Self {
        self.option.interceptors.push(interceptor);
        self
    }

    pub fn interceptors(mut self, interceptors: Vec<Arc<dyn Interceptor>>) -> Self {
        self.option.interceptors = interceptors;
        self
    }

    pub fn build(self) -> TransportOption {
        self.option
    }
}

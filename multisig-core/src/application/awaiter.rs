//! Polls asynchronous agent operations to completion.
//!
//! This is the only place in the crate that retries. Everything that triggers remote work
//! hands the resulting [`Operation`] here; state the agent exposes without an operation
//! (contacts, notifications) is polled through [`OperationAwaiter::poll_until`].

use crate::application::abort::AbortSignal;
use crate::domain::Operation;
use crate::foundation::constants::{DEFAULT_INCREASE_FACTOR, DEFAULT_MAX_SLEEP_MS, DEFAULT_MIN_SLEEP_MS};
use crate::foundation::{MultisigError, Result};
use crate::infrastructure::agent::traits::OperationService;
use crate::infrastructure::config::WaitConfig;
use futures_util::future::BoxFuture;
use futures_util::FutureExt;
use log::{debug, trace, warn};
use std::fmt;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

/// Observer invoked with every re-fetched operation state and the retry count.
pub type RetryObserver = Arc<dyn Fn(&Operation, u32) + Send + Sync>;

#[derive(Clone)]
pub struct WaitOptions {
    pub signal: Option<AbortSignal>,
    pub min_sleep_ms: u64,
    pub max_sleep_ms: u64,
    pub increase_factor: u64,
    pub on_retry: Option<RetryObserver>,
}

impl Default for WaitOptions {
    fn default() -> Self {
        Self {
            signal: None,
            min_sleep_ms: DEFAULT_MIN_SLEEP_MS,
            max_sleep_ms: DEFAULT_MAX_SLEEP_MS,
            increase_factor: DEFAULT_INCREASE_FACTOR,
            on_retry: None,
        }
    }
}

impl fmt::Debug for WaitOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WaitOptions")
            .field("signal", &self.signal)
            .field("min_sleep_ms", &self.min_sleep_ms)
            .field("max_sleep_ms", &self.max_sleep_ms)
            .field("increase_factor", &self.increase_factor)
            .field("on_retry", &self.on_retry.is_some())
            .finish()
    }
}

impl WaitOptions {
    pub fn from_config(config: &WaitConfig) -> Self {
        Self {
            min_sleep_ms: config.min_sleep_ms,
            max_sleep_ms: config.max_sleep_ms,
            increase_factor: config.increase_factor,
            ..Self::default()
        }
    }

    pub fn with_signal(mut self, signal: AbortSignal) -> Self {
        self.signal = Some(signal);
        self
    }

    pub fn with_on_retry(mut self, observer: RetryObserver) -> Self {
        self.on_retry = Some(observer);
        self
    }

    pub fn delay(&self, retry: u32) -> Duration {
        Duration::from_millis(backoff_delay_ms(retry, self.min_sleep_ms, self.max_sleep_ms, self.increase_factor))
    }
}

/// `min(max(min_sleep, factor^retry), max_sleep)` in milliseconds, saturating.
pub fn backoff_delay_ms(retry: u32, min_sleep_ms: u64, max_sleep_ms: u64, increase_factor: u64) -> u64 {
    let grown = increase_factor.saturating_pow(retry);
    grown.max(min_sleep_ms).min(max_sleep_ms)
}

pub struct OperationAwaiter<S: ?Sized> {
    operations: Arc<S>,
}

impl<S: ?Sized> Clone for OperationAwaiter<S> {
    fn clone(&self) -> Self {
        Self { operations: Arc::clone(&self.operations) }
    }
}

impl<S> OperationAwaiter<S>
where
    S: OperationService + ?Sized,
{
    pub fn new(operations: Arc<S>) -> Self {
        Self { operations }
    }

    /// Wait until `op` is done, its `depends` chain first.
    ///
    /// Transport failures from the status fetch surface immediately; only "not done yet" is
    /// retried. A finished operation that carries an error becomes `RemoteRejected`.
    pub fn wait<'a>(&'a self, op: Operation, options: &'a WaitOptions) -> BoxFuture<'a, Result<Operation>> {
        async move {
            if let Some(depends) = op.depends().cloned() {
                debug!("awaiter: waiting for dependency name={} of name={}", depends.name, op.name);
                self.wait(depends, options).await?;
            }

            let mut operation = op;
            let mut retries: u32 = 0;
            while !operation.done {
                if let Some(signal) = &options.signal {
                    signal.throw_if_aborted(&operation.name)?;
                }

                operation = self.operations.get_operation(&operation.name).await?;
                if let Some(observer) = &options.on_retry {
                    observer(&operation, retries);
                }
                if operation.done {
                    break;
                }

                let delay = options.delay(retries);
                trace!("awaiter: poll name={} done={} retry={} sleep_ms={}", operation.name, operation.done, retries, delay.as_millis());
                match &options.signal {
                    Some(signal) => signal.sleep(delay).await,
                    None => tokio::time::sleep(delay).await,
                }
                retries = retries.saturating_add(1);
            }

            if let Some(error) = &operation.error {
                warn!("awaiter: operation failed name={} code={} message={}", operation.name, error.code, error.message);
                return Err(MultisigError::rejected(operation.name.to_string(), error.code, error.message.clone()));
            }
            debug!("awaiter: done name={} retries={}", operation.name, retries);
            Ok(operation)
        }
        .boxed()
    }

    /// Re-run `probe` with the same backoff until it yields a value.
    ///
    /// For agent state that becomes visible without an operation to poll. The probe runs
    /// once more before the signal is checked, so a value that shows up right at the
    /// deadline is still returned.
    pub async fn poll_until<T, F, Fut>(&self, what: &str, options: &WaitOptions, mut probe: F) -> Result<T>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<Option<T>>>,
    {
        let mut retries: u32 = 0;
        loop {
            if let Some(value) = probe().await? {
                debug!("awaiter: {} visible retries={}", what, retries);
                return Ok(value);
            }
            if let Some(signal) = &options.signal {
                signal.throw_if_aborted(what)?;
            }

            let delay = options.delay(retries);
            trace!("awaiter: {} not visible retry={} sleep_ms={}", what, retries, delay.as_millis());
            match &options.signal {
                Some(signal) => signal.sleep(delay).await,
                None => tokio::time::sleep(delay).await,
            }
            retries = retries.saturating_add(1);
        }
    }

    /// Wait for each operation in order, stopping at the first failure.
    pub async fn wait_all(&self, ops: Vec<Operation>, options: &WaitOptions) -> Result<Vec<Operation>> {
        let mut done = Vec::with_capacity(ops.len());
        for op in ops {
            done.push(self.wait(op, options).await?);
        }
        Ok(done)
    }

    /// Drain every unfinished operation the service still lists.
    ///
    /// Recovery path after an earlier wait gave up: the remote work went on without us.
    pub async fn wait_pending(&self, options: &WaitOptions) -> Result<Vec<Operation>> {
        let pending: Vec<Operation> = self.operations.list_operations().await?.into_iter().filter(|op| !op.done).collect();
        debug!("awaiter: draining {} pending operations", pending.len());
        self.wait_all(pending, options).await
    }
}

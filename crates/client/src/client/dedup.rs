//! In-flight request deduplication.
//!
//! Identical concurrent calls share one future. The first caller starts
//! the request; later callers with the same [`RequestKey`] await the same
//! shared result.
//!
//! # Invariants
//! - At most one in-flight future per key.
//! - The key is released once the call settles, or when the caller that
//!   started it is dropped. Callers that joined keep driving the shared future.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError};

use futures::FutureExt;
use futures::future::{BoxFuture, Shared};
use serde_json::Value;
use tracing::debug;

use crate::endpoints::RequestKey;
use crate::error::ClientError;
use crate::metrics::MetricsCollector;

pub(crate) type SharedResult = std::result::Result<Value, Arc<ClientError>>;
type SharedCall = Shared<BoxFuture<'static, SharedResult>>;
type CallMap = Arc<Mutex<HashMap<RequestKey, SharedCall>>>;

#[derive(Clone, Default)]
pub(crate) struct InFlight {
    calls: CallMap,
    metrics: Option<MetricsCollector>,
}

impl std::fmt::Debug for InFlight {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InFlight")
            .field("pending", &self.len())
            .finish()
    }
}

impl InFlight {
    pub(crate) fn new(metrics: Option<MetricsCollector>) -> Self {
        Self {
            calls: CallMap::default(),
            metrics,
        }
    }

    /// Await the running call for `key`, or start one with `start`.
    pub(crate) async fn run<F>(&self, key: RequestKey, start: F) -> SharedResult
    where
        F: FnOnce() -> BoxFuture<'static, SharedResult>,
    {
        let (call, leader) = {
            let mut calls = self.calls.lock().unwrap_or_else(PoisonError::into_inner);
            match calls.get(&key) {
                Some(existing) => (existing.clone(), false),
                None => {
                    let call = start().shared();
                    calls.insert(key.clone(), call.clone());
                    (call, true)
                }
            }
        };

        if !leader {
            debug!(method = %key.method, path = %key.path, "Joining in-flight request");
            if let Some(metrics) = &self.metrics {
                metrics.record_deduplicated(&key.path);
            }
        }

        let _release = Release {
            calls: Arc::clone(&self.calls),
            key,
            call: call.clone(),
            leader,
        };
        call.await
    }

    pub(crate) fn len(&self) -> usize {
        self.calls
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }
}

struct Release {
    calls: CallMap,
    key: RequestKey,
    call: SharedCall,
    leader: bool,
}

impl Drop for Release {
    fn drop(&mut self) {
        if !self.leader && self.call.peek().is_none() {
            return;
        }
        let mut calls = self.calls.lock().unwrap_or_else(PoisonError::into_inner);
        if calls
            .get(&self.key)
            .is_some_and(|current| current.ptr_eq(&self.call))
        {
            calls.remove(&self.key);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use tokio::sync::Notify;

    fn key(path: &str) -> RequestKey {
        RequestKey {
            method: "GET".to_string(),
            path: path.to_string(),
            query: vec![],
            body: None,
        }
    }

    fn gated(
        started: Arc<AtomicUsize>,
        gate: Arc<Notify>,
    ) -> impl FnOnce() -> BoxFuture<'static, SharedResult> {
        move || {
            async move {
                started.fetch_add(1, Ordering::SeqCst);
                gate.notified().await;
                Ok(json!("done"))
            }
            .boxed()
        }
    }

    #[tokio::test]
    async fn test_concurrent_identical_calls_share_one_future() {
        let inflight = InFlight::default();
        let started = Arc::new(AtomicUsize::new(0));
        let gate = Arc::new(Notify::new());

        let first = tokio::spawn({
            let inflight = inflight.clone();
            let start = gated(started.clone(), gate.clone());
            async move { inflight.run(key("/a"), start).await }
        });
        let second = tokio::spawn({
            let inflight = inflight.clone();
            let start = gated(started.clone(), gate.clone());
            async move { inflight.run(key("/a"), start).await }
        });

        while started.load(Ordering::SeqCst) == 0 || inflight.len() == 0 {
            tokio::task::yield_now().await;
        }
        tokio::task::yield_now().await;
        assert_eq!(inflight.len(), 1);
        gate.notify_one();

        assert_eq!(first.await.unwrap().unwrap(), json!("done"));
        assert_eq!(second.await.unwrap().unwrap(), json!("done"));
        assert_eq!(started.load(Ordering::SeqCst), 1);
        assert_eq!(inflight.len(), 0);
    }

    #[tokio::test]
    async fn test_key_released_after_settle() {
        let inflight = InFlight::default();
        let first = inflight
            .run(key("/b"), || async { Ok(json!(1)) }.boxed())
            .await;
        assert_eq!(first.unwrap(), json!(1));
        assert_eq!(inflight.len(), 0);

        let second = inflight
            .run(key("/b"), || async { Ok(json!(2)) }.boxed())
            .await;
        assert_eq!(second.unwrap(), json!(2));
    }

    #[tokio::test]
    async fn test_key_released_when_leader_dropped() {
        let inflight = InFlight::default();
        let handle = tokio::spawn({
            let inflight = inflight.clone();
            async move {
                inflight
                    .run(key("/c"), || futures::future::pending().boxed())
                    .await
            }
        });

        while inflight.len() == 0 {
            tokio::task::yield_now().await;
        }
        handle.abort();
        let _ = handle.await;

        assert_eq!(inflight.len(), 0);
    }

    #[tokio::test]
    async fn test_dropped_joiner_keeps_key() {
        let inflight = InFlight::default();
        let started = Arc::new(AtomicUsize::new(0));
        let gate = Arc::new(Notify::new());

        let leader = tokio::spawn({
            let inflight = inflight.clone();
            let start = gated(started.clone(), gate.clone());
            async move { inflight.run(key("/d"), start).await }
        });
        while started.load(Ordering::SeqCst) == 0 {
            tokio::task::yield_now().await;
        }

        let joiner = tokio::spawn({
            let inflight = inflight.clone();
            let start = gated(started.clone(), gate.clone());
            async move { inflight.run(key("/d"), start).await }
        });
        tokio::task::yield_now().await;
        joiner.abort();
        let _ = joiner.await;

        assert_eq!(inflight.len(), 1);
        gate.notify_one();
        assert!(leader.await.unwrap().is_ok());
        assert_eq!(inflight.len(), 0);
    }

    #[tokio::test]
    async fn test_errors_are_shared() {
        let inflight = InFlight::default();
        let err = inflight
            .run(key("/e"), || {
                async { Err(Arc::new(ClientError::LoginRequired)) }.boxed()
            })
            .await
            .unwrap_err();
        assert!(matches!(*err, ClientError::LoginRequired));
    }
}

//! Debounced remote test runner for the mapping preview.
//!
//! Responsibilities:
//! - Wait out a quiet period after each edit before testing remotely.
//! - Skip the network call when the mapping set is empty or unchanged since
//!   the last successful test.
//! - Discard responses that arrive after a newer request was issued.
//! - Keep the latest successful preview.
//!
//! Does NOT handle:
//! - Building the request (see `tower_mapping::TestMappingsRequest`).
//! - Rendering; `preview()` hands back the raw result.
//!
//! Invariants:
//! - Only the newest `test_now` call can update the preview, including
//!   calls that were skipped or found the set unchanged.
//! - A failed test leaves both the preview and the last tested hash untouched.

use std::future::Future;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Mutex, PoisonError};
use std::time::Duration;

use tower_config::MappingSettings;
use tower_mapping::TestMappingsRequest;
use tracing::{debug, warn};

use crate::client::TowerClient;
use crate::error::{ClientError, Result};
use crate::models::{PreviewResult, TestResult};

/// Something that can run a mapping test remotely.
pub trait MappingTester: Send + Sync {
    fn test_mappings(
        &self,
        request: &TestMappingsRequest,
    ) -> impl Future<Output = Result<TestResult>> + Send;
}

impl MappingTester for TowerClient {
    fn test_mappings(
        &self,
        request: &TestMappingsRequest,
    ) -> impl Future<Output = Result<TestResult>> + Send {
        TowerClient::test_mappings(self, request)
    }
}

/// What happened to one test attempt.
#[derive(Debug)]
pub enum PreviewOutcome {
    /// The server answered and the preview was replaced.
    Updated(PreviewResult),
    /// Same mapping set as the last successful test; nothing was sent.
    Unchanged,
    /// No mappings; nothing was sent.
    Skipped,
    /// Another edit arrived during the quiet period.
    Superseded,
    /// A newer request was issued while this one was in flight.
    Stale,
    /// The test failed; the previous preview is kept.
    Failed(ClientError),
}

#[derive(Debug, Default)]
struct RunnerState {
    last_hash: Option<String>,
    preview: Option<PreviewResult>,
}

/// Debounced test runner over any [`MappingTester`].
#[derive(Debug)]
pub struct PreviewRunner<T> {
    tester: T,
    debounce: Duration,
    edits: AtomicU64,
    issued: AtomicU64,
    state: Mutex<RunnerState>,
}

impl<T: MappingTester> PreviewRunner<T> {
    pub fn new(tester: T, debounce: Duration) -> Self {
        Self {
            tester,
            debounce,
            edits: AtomicU64::new(0),
            issued: AtomicU64::new(0),
            state: Mutex::new(RunnerState::default()),
        }
    }

    pub fn from_settings(tester: T, settings: &MappingSettings) -> Self {
        Self::new(tester, settings.preview_debounce)
    }

    pub fn tester(&self) -> &T {
        &self.tester
    }

    /// Report an edit. Tests after the quiet period unless another edit
    /// arrives first.
    pub async fn on_change(&self, request: TestMappingsRequest) -> PreviewOutcome {
        let edit = self.edits.fetch_add(1, Ordering::SeqCst) + 1;
        tokio::time::sleep(self.debounce).await;
        if self.edits.load(Ordering::SeqCst) != edit {
            debug!(edit, "Preview superseded by a newer edit");
            return PreviewOutcome::Superseded;
        }
        self.test_now(request).await
    }

    /// Test immediately, without debouncing.
    pub async fn test_now(&self, request: TestMappingsRequest) -> PreviewOutcome {
        // Claimed before any short-circuit so a revert also outdates
        // requests still in flight.
        let sequence = self.issued.fetch_add(1, Ordering::SeqCst) + 1;

        if request.is_empty() {
            debug!("No mappings to test");
            return PreviewOutcome::Skipped;
        }

        let hash = match request.content_hash() {
            Ok(hash) => hash,
            Err(e) => return self.failed(ClientError::from(e)),
        };
        if self.lock().last_hash.as_deref() == Some(hash.as_str()) {
            debug!("Mapping set unchanged since last test");
            return PreviewOutcome::Unchanged;
        }

        let result = self.tester.test_mappings(&request).await;

        if self.issued.load(Ordering::SeqCst) != sequence {
            debug!(sequence, "Discarding stale preview response");
            return PreviewOutcome::Stale;
        }

        match result {
            Ok(preview) => {
                let mut state = self.lock();
                state.last_hash = Some(hash);
                state.preview = Some(preview.clone());
                PreviewOutcome::Updated(preview)
            }
            Err(e) => self.failed(e),
        }
    }

    /// The latest successful preview.
    pub fn preview(&self) -> Option<PreviewResult> {
        self.lock().preview.clone()
    }

    /// Forget the last tested set so the next test always goes out.
    pub fn invalidate(&self) {
        self.lock().last_hash = None;
    }

    fn failed(&self, error: ClientError) -> PreviewOutcome {
        warn!(error = %error, "Mapping test failed, keeping previous preview");
        PreviewOutcome::Failed(error)
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, RunnerState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::sync::atomic::AtomicUsize;
    use tower_mapping::{FieldType, MappingMetadata, TransformId};

    struct FakeTester {
        calls: AtomicUsize,
    }

    impl FakeTester {
        fn new() -> Self {
            Self {
                calls: AtomicUsize::new(0),
            }
        }

        fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    /// Connection ids drive the fake: `slow*` takes 200 ms, `broken` fails.
    impl MappingTester for FakeTester {
        fn test_mappings(
            &self,
            request: &TestMappingsRequest,
        ) -> impl Future<Output = Result<TestResult>> + Send {
            self.calls.fetch_add(1, Ordering::SeqCst);
            let id = request.connection_id.clone();
            async move {
                let delay = if id.starts_with("slow") { 200 } else { 10 };
                tokio::time::sleep(Duration::from_millis(delay)).await;
                if id == "broken" {
                    return Err(ClientError::ApiError {
                        status: 500,
                        url: "http://tower/api/mappings/test".to_string(),
                        message: "boom".to_string(),
                        request_id: None,
                    });
                }
                Ok(TestResult {
                    source_data: json!({"price": "19.99"}),
                    transformed_data: json!({"connection": id}),
                })
            }
        }
    }

    fn request(connection: &str, transform: Option<TransformId>) -> TestMappingsRequest {
        TestMappingsRequest {
            connection_id: connection.to_string(),
            source_type: "shopify".to_string(),
            target_type: "erp".to_string(),
            mapping_metadata: vec![MappingMetadata {
                source_path: "price".to_string(),
                target_path: "price".to_string(),
                source_type: FieldType::String,
                target_type: FieldType::Number,
                transform,
            }],
        }
    }

    fn transformed(outcome: &PreviewOutcome) -> serde_json::Value {
        match outcome {
            PreviewOutcome::Updated(result) => result.transformed_data.clone(),
            other => panic!("expected Updated, got {other:?}"),
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_unchanged_set_is_not_resent() {
        let runner = PreviewRunner::new(FakeTester::new(), Duration::from_millis(500));

        let first = runner.test_now(request("c1", None)).await;
        assert!(matches!(first, PreviewOutcome::Updated(_)));
        let second = runner.test_now(request("c1", None)).await;
        assert!(matches!(second, PreviewOutcome::Unchanged));
        assert_eq!(runner.tester().calls(), 1);

        let third = runner
            .test_now(request("c1", Some(TransformId::ParseFloat)))
            .await;
        assert!(matches!(third, PreviewOutcome::Updated(_)));
        assert_eq!(runner.tester().calls(), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn test_empty_set_is_skipped() {
        let runner = PreviewRunner::new(FakeTester::new(), Duration::from_millis(500));
        let mut empty = request("c1", None);
        empty.mapping_metadata.clear();

        assert!(matches!(
            runner.test_now(empty).await,
            PreviewOutcome::Skipped
        ));
        assert_eq!(runner.tester().calls(), 0);
        assert!(runner.preview().is_none());
    }

    #[tokio::test(start_paused = true)]
    async fn test_rapid_edits_debounce_to_one_call() {
        let runner = PreviewRunner::new(FakeTester::new(), Duration::from_millis(500));

        let (first, second) = tokio::join!(runner.on_change(request("c1", None)), async {
            tokio::time::sleep(Duration::from_millis(100)).await;
            runner
                .on_change(request("c1", Some(TransformId::Round)))
                .await
        });

        assert!(matches!(first, PreviewOutcome::Superseded));
        assert!(matches!(second, PreviewOutcome::Updated(_)));
        assert_eq!(runner.tester().calls(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_late_response_is_discarded() {
        let runner = PreviewRunner::new(FakeTester::new(), Duration::ZERO);

        let (slow, fast) = tokio::join!(runner.test_now(request("slow", None)), async {
            tokio::time::sleep(Duration::from_millis(50)).await;
            runner.test_now(request("fast", None)).await
        });

        assert!(matches!(slow, PreviewOutcome::Stale));
        assert_eq!(transformed(&fast), json!({"connection": "fast"}));
        assert_eq!(
            runner.preview().unwrap().transformed_data,
            json!({"connection": "fast"})
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_revert_outdates_in_flight_request() {
        let runner = PreviewRunner::new(FakeTester::new(), Duration::ZERO);
        runner.test_now(request("c1", None)).await;

        let (edited, reverted) = tokio::join!(runner.test_now(request("slow", None)), async {
            tokio::time::sleep(Duration::from_millis(50)).await;
            runner.test_now(request("c1", None)).await
        });

        assert!(matches!(edited, PreviewOutcome::Stale));
        assert!(matches!(reverted, PreviewOutcome::Unchanged));
        assert_eq!(
            runner.preview().unwrap().transformed_data,
            json!({"connection": "c1"})
        );
        assert!(matches!(
            runner.test_now(request("c1", None)).await,
            PreviewOutcome::Unchanged
        ));
        assert_eq!(runner.tester().calls(), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn test_failure_keeps_previous_preview() {
        let runner = PreviewRunner::new(FakeTester::new(), Duration::ZERO);
        runner.test_now(request("c1", None)).await;

        let outcome = runner.test_now(request("broken", None)).await;
        assert!(matches!(outcome, PreviewOutcome::Failed(_)));
        assert_eq!(
            runner.preview().unwrap().transformed_data,
            json!({"connection": "c1"})
        );

        // the failed set was never recorded as tested
        runner.test_now(request("broken", None)).await;
        assert_eq!(runner.tester().calls(), 3);
    }

    #[tokio::test(start_paused = true)]
    async fn test_invalidate_forces_retest() {
        let runner = PreviewRunner::new(FakeTester::new(), Duration::ZERO);
        runner.test_now(request("c1", None)).await;
        runner.invalidate();
        assert!(matches!(
            runner.test_now(request("c1", None)).await,
            PreviewOutcome::Updated(_)
        ));
        assert_eq!(runner.tester().calls(), 2);
    }
}

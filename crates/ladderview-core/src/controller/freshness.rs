use std::panic::AssertUnwindSafe;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use futures::FutureExt;
use tokio::sync::watch;
use tokio::time::MissedTickBehavior;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, warn};

use super::polling::PollingHandle;
use super::reducer::{Transition, reduce};
use crate::cache::{CacheEntry, PersistentCache};
use crate::errors::ConfigError;
use crate::gateway::{Credentials, FetchOutcome, PlayerGateway};
use crate::view::{ViewState, ViewStatus};

/// What happened to one refresh.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RefreshReport {
    /// The outcome went through the transition table.
    Applied { status: ViewStatus, changed: bool },
    /// A newer response was already applied; this one was dropped.
    Stale,
    /// The controller was stopped; this one was dropped.
    TornDown,
}

#[derive(Debug, Clone, Default)]
pub struct ControllerOptions {
    /// Calls taking longer than this count as a transient failure.
    pub request_timeout: Option<Duration>,
}

struct Shared {
    gateway: Arc<dyn PlayerGateway>,
    cache: PersistentCache,
    options: ControllerOptions,
    state: watch::Sender<ViewState>,
    /// Sequence number of the newest applied response.
    applied: Mutex<u64>,
    issued: AtomicU64,
    lifetime: CancellationToken,
}

/// Owns the view state of one mounted viewer.
///
/// Cheap to clone; clones share state. All state writes go through a single
/// lock that also guards the request sequence and the liveness check.
#[derive(Clone)]
pub struct FreshnessController {
    shared: Arc<Shared>,
}

impl FreshnessController {
    pub fn new(gateway: Arc<dyn PlayerGateway>, cache: PersistentCache) -> Self {
        Self::with_options(gateway, cache, ControllerOptions::default())
    }

    pub fn with_options(
        gateway: Arc<dyn PlayerGateway>,
        cache: PersistentCache,
        options: ControllerOptions,
    ) -> Self {
        let (state, _) = watch::channel(ViewState::Loading);
        Self {
            shared: Arc::new(Shared {
                gateway,
                cache,
                options,
                state,
                applied: Mutex::new(0),
                issued: AtomicU64::new(0),
                lifetime: CancellationToken::new(),
            }),
        }
    }

    pub fn state(&self) -> ViewState {
        self.shared.state.borrow().clone()
    }

    /// Receiver notified on every state change.
    pub fn subscribe(&self) -> watch::Receiver<ViewState> {
        self.shared.state.subscribe()
    }

    pub fn cache(&self) -> &PersistentCache {
        &self.shared.cache
    }

    pub fn is_torn_down(&self) -> bool {
        self.shared.lifetime.is_cancelled()
    }

    /// Adopt the cached view for `channel_id` without touching the network.
    ///
    /// A miss leaves the state as it is. A cached entry that is not ready
    /// never replaces a ready display. Returns whether the state was adopted.
    pub fn hydrate(&self, channel_id: &str) -> bool {
        let _applied = self.lock_applied();
        if self.is_torn_down() {
            return false;
        }

        let Some(entry) = self.shared.cache.get(channel_id) else {
            debug!(event = "core.controller.hydrate_skipped", channel_id = channel_id, reason = "cache miss");
            return false;
        };

        let cached = entry.into_view_state();
        if !cached.is_ready() && self.shared.state.borrow().is_ready() {
            debug!(
                event = "core.controller.hydrate_skipped",
                channel_id = channel_id,
                reason = "would downgrade ready view"
            );
            return false;
        }

        let status = cached.status();
        self.set_state(cached);
        info!(
            event = "core.controller.hydrate_completed",
            channel_id = channel_id,
            status = %status
        );
        true
    }

    /// Fetch once from the gateway and apply the outcome.
    ///
    /// Overlapping calls are allowed. Each call takes a sequence number when
    /// issued; a response older than one already applied is discarded.
    pub async fn refresh(&self, channel_id: &str, token: &str) -> RefreshReport {
        if self.is_torn_down() {
            debug!(event = "core.controller.refresh_skipped", channel_id = channel_id, reason = "torn down");
            return RefreshReport::TornDown;
        }

        let request = self.shared.issued.fetch_add(1, Ordering::SeqCst) + 1;
        debug!(
            event = "core.controller.refresh_started",
            channel_id = channel_id,
            request = request
        );

        let outcome = self.fetch(channel_id, token).await;
        self.apply(request, channel_id, outcome)
    }

    /// Run the gateway call. Errors, panics and timeouts never escape.
    async fn fetch(&self, channel_id: &str, token: &str) -> FetchOutcome {
        let call =
            AssertUnwindSafe(self.shared.gateway.fetch_player_data(channel_id, token)).catch_unwind();

        let result = match self.shared.options.request_timeout {
            Some(limit) => match tokio::time::timeout(limit, call).await {
                Ok(result) => result,
                Err(_) => {
                    warn!(
                        event = "core.controller.fetch_timed_out",
                        channel_id = channel_id,
                        timeout_ms = u64::try_from(limit.as_millis()).unwrap_or(u64::MAX)
                    );
                    return FetchOutcome::TransientFailure;
                }
            },
            None => call.await,
        };

        match result {
            Ok(Ok(outcome)) => outcome,
            Ok(Err(e)) => {
                warn!(
                    event = "core.controller.fetch_failed",
                    channel_id = channel_id,
                    error = %e
                );
                FetchOutcome::ProtocolError
            }
            Err(_) => {
                error!(
                    event = "core.controller.fetch_panicked",
                    channel_id = channel_id,
                    "Gateway call panicked - treating as protocol error"
                );
                FetchOutcome::ProtocolError
            }
        }
    }

    fn apply(&self, request: u64, channel_id: &str, outcome: FetchOutcome) -> RefreshReport {
        let mut applied = self.lock_applied();

        if self.is_torn_down() {
            debug!(
                event = "core.controller.response_discarded",
                channel_id = channel_id,
                request = request,
                reason = "torn down"
            );
            return RefreshReport::TornDown;
        }

        if request <= *applied {
            debug!(
                event = "core.controller.response_discarded",
                channel_id = channel_id,
                request = request,
                applied = *applied,
                reason = "stale"
            );
            return RefreshReport::Stale;
        }
        *applied = request;

        // The cache write happens under the lock so cache order matches
        // state order; stores must answer quickly (see `KeyValueStore`).
        let next = match reduce(&self.state(), &outcome) {
            Transition::Keep => None,
            Transition::Store(snapshot) => {
                self.shared
                    .cache
                    .put(channel_id, &CacheEntry::ready(&snapshot));
                Some(ViewState::Ready(snapshot))
            }
            Transition::Show(state) => Some(state),
            Transition::Rehydrate => Some(
                self.shared
                    .cache
                    .get(channel_id)
                    .map(CacheEntry::into_view_state)
                    .unwrap_or(ViewState::Loading),
            ),
        };

        let changed = next.is_some_and(|next| self.set_state(next));
        let status = self.shared.state.borrow().status();

        if changed {
            info!(
                event = "core.controller.refresh_completed",
                channel_id = channel_id,
                request = request,
                outcome = outcome.kind(),
                status = %status
            );
        } else {
            debug!(
                event = "core.controller.refresh_completed",
                channel_id = channel_id,
                request = request,
                outcome = outcome.kind(),
                status = %status,
                changed = false
            );
        }

        RefreshReport::Applied { status, changed }
    }

    /// Schedule [`refresh`](Self::refresh) every `interval_ms`, first run one
    /// interval from now. Must be called inside a Tokio runtime.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidConfiguration` if `interval_ms` is zero.
    pub fn start_polling(
        &self,
        credentials: Credentials,
        interval_ms: u64,
    ) -> Result<PollingHandle, ConfigError> {
        if interval_ms == 0 {
            return Err(ConfigError::InvalidConfiguration {
                message: "polling interval must be a positive number of milliseconds, got 0"
                    .to_string(),
            });
        }

        let period = Duration::from_millis(interval_ms);
        let cancel = self.shared.lifetime.child_token();

        info!(
            event = "core.polling.started",
            channel_id = %credentials.channel_id,
            interval_ms = interval_ms
        );

        let task = tokio::spawn(self.clone().poll(credentials, period, cancel.clone()));
        Ok(PollingHandle::new(cancel, task))
    }

    async fn poll(self, credentials: Credentials, period: Duration, cancel: CancellationToken) {
        let mut ticker = tokio::time::interval_at(tokio::time::Instant::now() + period, period);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            tokio::select! {
                _ = cancel.cancelled() => break,
                _ = ticker.tick() => {
                    debug!(event = "core.polling.tick", channel_id = %credentials.channel_id);
                    self.refresh(&credentials.channel_id, &credentials.token).await;
                }
            }
        }

        debug!(
            event = "core.polling.stopped",
            channel_id = %credentials.channel_id
        );
    }

    /// Drop back to `Loading` and discard every response still in flight.
    /// Does nothing once the controller is torn down.
    pub fn reset(&self) {
        let mut applied = self.lock_applied();
        if self.is_torn_down() {
            debug!(event = "core.controller.reset_skipped", reason = "torn down");
            return;
        }
        *applied = self.shared.issued.load(Ordering::SeqCst);
        self.set_state(ViewState::Loading);
        debug!(event = "core.controller.reset_completed");
    }

    /// Tear the controller down. Cancels all polling; later responses are
    /// discarded. Idempotent.
    pub fn stop(&self) {
        let _applied = self.lock_applied();
        if self.shared.lifetime.is_cancelled() {
            return;
        }
        self.shared.lifetime.cancel();
        info!(event = "core.controller.stopped");
    }

    fn set_state(&self, next: ViewState) -> bool {
        self.shared.state.send_if_modified(|current| {
            if *current == next {
                false
            } else {
                *current = next;
                true
            }
        })
    }

    fn lock_applied(&self) -> MutexGuard<'_, u64> {
        self.shared
            .applied
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }
}

impl std::fmt::Debug for FreshnessController {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FreshnessController")
            .field("status", &self.shared.state.borrow().status())
            .field("cache", &self.shared.cache)
            .field("torn_down", &self.is_torn_down())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::MemoryStore;
    use crate::gateway::GatewayError;
    use crate::test_helpers::{ScriptedGateway, sample_snapshot};
    use crate::view::{ProjectedView, project};

    fn controller_with(gateway: &Arc<ScriptedGateway>) -> (FreshnessController, PersistentCache) {
        let cache = PersistentCache::in_memory("lv");
        let controller = FreshnessController::new(gateway.clone(), cache.clone());
        (controller, cache)
    }

    async fn wait_for_calls(gateway: &ScriptedGateway, calls: usize) {
        while gateway.calls() < calls {
            tokio::task::yield_now().await;
        }
    }

    #[tokio::test]
    async fn test_success_sets_ready_and_writes_cache() {
        let gateway = Arc::new(ScriptedGateway::new());
        let snapshot = sample_snapshot("Maru", "KR");
        gateway.push(FetchOutcome::success(snapshot.clone()));
        let (controller, cache) = controller_with(&gateway);

        let report = controller.refresh("42", "token").await;

        assert_eq!(
            report,
            RefreshReport::Applied {
                status: ViewStatus::Ready,
                changed: true
            }
        );
        assert_eq!(project(&controller.state()), ProjectedView::Ready(&snapshot));
        assert_eq!(cache.get("42").unwrap().snapshot, snapshot);
    }

    #[tokio::test]
    async fn test_ready_survives_transient_and_protocol_errors() {
        let gateway = Arc::new(ScriptedGateway::new());
        let snapshot = sample_snapshot("Serral", "EU");
        gateway.push(FetchOutcome::success(snapshot.clone()));
        gateway.push(FetchOutcome::TransientFailure);
        gateway.push(FetchOutcome::ProtocolError);
        gateway.push_error(GatewayError::Request {
            message: "connection reset".to_string(),
        });
        let (controller, _cache) = controller_with(&gateway);

        controller.refresh("42", "token").await;
        for _ in 0..3 {
            let report = controller.refresh("42", "token").await;
            assert_eq!(
                report,
                RefreshReport::Applied {
                    status: ViewStatus::Ready,
                    changed: false
                }
            );
        }

        assert_eq!(controller.state().snapshot(), Some(&snapshot));
    }

    #[tokio::test]
    async fn test_not_found_does_not_replace_ready() {
        let gateway = Arc::new(ScriptedGateway::new());
        let snapshot = sample_snapshot("Serral", "EU");
        gateway.push(FetchOutcome::success(snapshot.clone()));
        gateway.push(FetchOutcome::NotFound);
        let (controller, _cache) = controller_with(&gateway);

        controller.refresh("42", "token").await;
        controller.refresh("42", "token").await;

        assert_eq!(project(&controller.state()), ProjectedView::Ready(&snapshot));
    }

    #[tokio::test]
    async fn test_first_transient_failure_without_cache_is_loading() {
        let gateway = Arc::new(ScriptedGateway::new());
        gateway.push(FetchOutcome::TransientFailure);
        let (controller, _cache) = controller_with(&gateway);

        controller.refresh("42", "token").await;

        assert_eq!(project(&controller.state()), ProjectedView::Loading);
    }

    #[tokio::test]
    async fn test_transient_failure_falls_back_to_cache() {
        let gateway = Arc::new(ScriptedGateway::new());
        gateway.push(FetchOutcome::ProtocolError);
        gateway.push(FetchOutcome::TransientFailure);
        let (controller, cache) = controller_with(&gateway);
        let cached = sample_snapshot("Clem", "EU");
        cache.put("42", &CacheEntry::ready(&cached));

        controller.refresh("42", "token").await;
        assert_eq!(controller.state(), ViewState::Error);

        controller.refresh("42", "token").await;
        assert_eq!(controller.state().snapshot(), Some(&cached));
    }

    #[tokio::test]
    async fn test_hydrate_uses_cache_without_network() {
        let gateway = Arc::new(ScriptedGateway::new());
        let (controller, cache) = controller_with(&gateway);
        let cached = sample_snapshot("Maru", "KR");
        cache.put("42", &CacheEntry::ready(&cached));

        assert!(controller.hydrate("42"));

        assert_eq!(project(&controller.state()), ProjectedView::Ready(&cached));
        assert_eq!(gateway.calls(), 0);
    }

    #[tokio::test]
    async fn test_hydrate_miss_leaves_loading() {
        let gateway = Arc::new(ScriptedGateway::new());
        let (controller, _cache) = controller_with(&gateway);

        assert!(!controller.hydrate("42"));
        assert_eq!(controller.state(), ViewState::Loading);
    }

    #[tokio::test]
    async fn test_hydrate_with_disabled_cache_is_noop() {
        let store = Arc::new(MemoryStore::new());
        PersistentCache::new(store.clone(), true, "lv")
            .put("42", &CacheEntry::ready(&sample_snapshot("Maru", "KR")));
        let controller = FreshnessController::new(
            Arc::new(ScriptedGateway::new()),
            PersistentCache::new(store, false, "lv"),
        );

        assert!(!controller.hydrate("42"));
        assert_eq!(controller.state(), ViewState::Loading);
    }

    #[tokio::test]
    async fn test_newer_response_wins_over_older() {
        let gateway = Arc::new(ScriptedGateway::new());
        let first = gateway.gate();
        let second = gateway.gate();
        let (controller, cache) = controller_with(&gateway);

        let older = controller.clone();
        let request_1 = tokio::spawn(async move { older.refresh("42", "token").await });
        wait_for_calls(&gateway, 1).await;

        let newer = controller.clone();
        let request_2 = tokio::spawn(async move { newer.refresh("42", "token").await });
        wait_for_calls(&gateway, 2).await;

        let new_data = sample_snapshot("Reynor", "EU");
        second.send(FetchOutcome::success(new_data.clone())).unwrap();
        assert!(matches!(
            request_2.await.unwrap(),
            RefreshReport::Applied { .. }
        ));

        first
            .send(FetchOutcome::success(sample_snapshot("Stale", "EU")))
            .unwrap();
        assert_eq!(request_1.await.unwrap(), RefreshReport::Stale);

        assert_eq!(controller.state().snapshot(), Some(&new_data));
        assert_eq!(cache.get("42").unwrap().snapshot, new_data);
    }

    #[tokio::test]
    async fn test_in_order_completion_applies_both() {
        let gateway = Arc::new(ScriptedGateway::new());
        let first = gateway.gate();
        let second = gateway.gate();
        let (controller, _cache) = controller_with(&gateway);

        let c1 = controller.clone();
        let request_1 = tokio::spawn(async move { c1.refresh("42", "token").await });
        wait_for_calls(&gateway, 1).await;
        let c2 = controller.clone();
        let request_2 = tokio::spawn(async move { c2.refresh("42", "token").await });
        wait_for_calls(&gateway, 2).await;

        first.send(FetchOutcome::NotFound).unwrap();
        assert!(matches!(
            request_1.await.unwrap(),
            RefreshReport::Applied { status: ViewStatus::NotFound, .. }
        ));

        let snapshot = sample_snapshot("Maru", "KR");
        second.send(FetchOutcome::success(snapshot.clone())).unwrap();
        request_2.await.unwrap();
        assert_eq!(controller.state().snapshot(), Some(&snapshot));
    }

    #[tokio::test]
    async fn test_response_after_stop_is_discarded() {
        let gateway = Arc::new(ScriptedGateway::new());
        let gate = gateway.gate();
        let (controller, cache) = controller_with(&gateway);

        let in_flight = controller.clone();
        let request = tokio::spawn(async move { in_flight.refresh("42", "token").await });
        wait_for_calls(&gateway, 1).await;

        controller.stop();
        gate.send(FetchOutcome::success(sample_snapshot("Maru", "KR")))
            .unwrap();

        assert_eq!(request.await.unwrap(), RefreshReport::TornDown);
        assert_eq!(controller.state(), ViewState::Loading);
        assert!(cache.get("42").is_none());
        assert_eq!(
            controller.refresh("42", "token").await,
            RefreshReport::TornDown
        );
        assert!(!controller.hydrate("42"));
    }

    #[tokio::test]
    async fn test_stop_is_idempotent() {
        let gateway = Arc::new(ScriptedGateway::new());
        let (controller, _cache) = controller_with(&gateway);

        controller.stop();
        controller.stop();
        assert!(controller.is_torn_down());
    }

    #[tokio::test]
    async fn test_gateway_error_and_panic_map_to_error() {
        let gateway = Arc::new(ScriptedGateway::new());
        gateway.push_error(GatewayError::Decode {
            message: "unexpected token".to_string(),
        });
        gateway.push_panic();
        gateway.push(FetchOutcome::success(sample_snapshot("Maru", "KR")));
        let (controller, _cache) = controller_with(&gateway);

        controller.refresh("42", "token").await;
        assert_eq!(controller.state(), ViewState::Error);

        controller.refresh("42", "token").await;
        assert_eq!(controller.state(), ViewState::Error);

        // Still alive after a panicking gateway
        controller.refresh("42", "token").await;
        assert!(controller.state().is_ready());
    }

    #[tokio::test(start_paused = true)]
    async fn test_slow_gateway_times_out_as_transient() {
        let gateway = Arc::new(ScriptedGateway::new());
        let _gate = gateway.gate();
        let controller = FreshnessController::with_options(
            gateway.clone(),
            PersistentCache::in_memory("lv"),
            ControllerOptions {
                request_timeout: Some(Duration::from_millis(500)),
            },
        );

        let report = controller.refresh("42", "token").await;

        assert_eq!(
            report,
            RefreshReport::Applied {
                status: ViewStatus::Loading,
                changed: false
            }
        );
    }

    #[tokio::test]
    async fn test_not_found_then_success_scenario() {
        let gateway = Arc::new(ScriptedGateway::new());
        gateway.push(FetchOutcome::NotFound);
        let (controller, cache) = controller_with(&gateway);

        controller.hydrate("7");
        controller.refresh("7", "token").await;
        assert_eq!(project(&controller.state()), ProjectedView::NotFound);

        let snapshot = sample_snapshot("Maru", "KR");
        gateway.push(FetchOutcome::success(snapshot.clone()));
        controller.refresh("7", "token").await;

        assert_eq!(project(&controller.state()), ProjectedView::Ready(&snapshot));
        assert_eq!(cache.get("7").unwrap().snapshot, snapshot);
    }

    #[tokio::test]
    async fn test_reset_discards_in_flight() {
        let gateway = Arc::new(ScriptedGateway::new());
        let gate = gateway.gate();
        let (controller, _cache) = controller_with(&gateway);

        let in_flight = controller.clone();
        let request = tokio::spawn(async move { in_flight.refresh("42", "token").await });
        wait_for_calls(&gateway, 1).await;

        controller.reset();
        gate.send(FetchOutcome::NotFound).unwrap();

        assert_eq!(request.await.unwrap(), RefreshReport::Stale);
        assert_eq!(controller.state(), ViewState::Loading);
    }

    #[tokio::test]
    async fn test_reset_after_stop_leaves_state_alone() {
        let gateway = Arc::new(ScriptedGateway::new());
        gateway.push(FetchOutcome::success(sample_snapshot("Maru", "KR")));
        let (controller, _cache) = controller_with(&gateway);
        controller.refresh("42", "token").await;
        let mut rx = controller.subscribe();

        controller.stop();
        controller.reset();

        assert!(!rx.has_changed().unwrap());
        assert!(controller.state().is_ready());
    }

    #[tokio::test]
    async fn test_subscribers_see_changes() {
        let gateway = Arc::new(ScriptedGateway::new());
        gateway.push(FetchOutcome::NotFound);
        let (controller, _cache) = controller_with(&gateway);
        let mut rx = controller.subscribe();

        controller.refresh("42", "token").await;

        assert!(rx.has_changed().unwrap());
        assert_eq!(*rx.borrow_and_update(), ViewState::NotFound);
    }

    #[tokio::test(start_paused = true)]
    async fn test_polling_refreshes_every_interval() {
        let gateway = Arc::new(ScriptedGateway::with_fallback(FetchOutcome::success(
            sample_snapshot("Maru", "KR"),
        )));
        let (controller, _cache) = controller_with(&gateway);

        let handle = controller
            .start_polling(Credentials::new("42", "token"), 1000)
            .unwrap();
        assert!(handle.is_active());

        tokio::time::sleep(Duration::from_millis(3500)).await;
        assert_eq!(gateway.calls(), 3);
        assert!(controller.state().is_ready());

        handle.join().await;
        tokio::time::sleep(Duration::from_millis(5000)).await;
        assert_eq!(gateway.calls(), 3);
    }

    #[tokio::test(start_paused = true)]
    async fn test_controller_stop_cancels_polling() {
        let gateway = Arc::new(ScriptedGateway::new());
        let (controller, _cache) = controller_with(&gateway);

        let handle = controller
            .start_polling(Credentials::new("42", "token"), 1000)
            .unwrap();
        tokio::time::sleep(Duration::from_millis(1500)).await;
        assert_eq!(gateway.calls(), 1);

        controller.stop();
        assert!(!handle.is_active());
        tokio::time::sleep(Duration::from_millis(5000)).await;
        assert_eq!(gateway.calls(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_dropping_handle_cancels_polling() {
        let gateway = Arc::new(ScriptedGateway::new());
        let (controller, _cache) = controller_with(&gateway);

        let handle = controller
            .start_polling(Credentials::new("42", "token"), 1000)
            .unwrap();
        drop(handle);

        tokio::time::sleep(Duration::from_millis(5000)).await;
        assert_eq!(gateway.calls(), 0);
        assert!(!controller.is_torn_down());
    }

    #[tokio::test]
    async fn test_zero_interval_is_config_error() {
        let gateway = Arc::new(ScriptedGateway::new());
        let (controller, _cache) = controller_with(&gateway);

        let err = controller
            .start_polling(Credentials::new("42", "token"), 0)
            .unwrap_err();
        assert!(matches!(err, ConfigError::InvalidConfiguration { .. }));
    }
}

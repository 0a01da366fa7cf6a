//! Test utilities shared with downstream crates.
//!
//! Public so the CLI crate can use the scripted gateway and env guards in
//! its own tests.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Mutex, PoisonError};

use async_trait::async_trait;
use tokio::sync::oneshot;

use crate::cache::{CacheError, KeyValueStore};
use crate::config::loading::ENV_CACHE_DIR;
use crate::gateway::{FetchOutcome, GatewayError, PlayerGateway};
use crate::snapshot::{Clan, GameMode, LadderStats, Ladders, Player, PlayerSnapshot};

/// Snapshot with a ranked 1v1 ladder and defaults elsewhere.
pub fn sample_snapshot(name: &str, server: &str) -> PlayerSnapshot {
    PlayerSnapshot {
        player: Player {
            server: server.to_string(),
            name: name.to_string(),
            clan: Clan {
                name: "Team Liquid".to_string(),
                tag: "TL".to_string(),
            },
            rank: "Grandmaster".to_string(),
            portrait: "https://static.example/portraits/1.jpg".to_string(),
        },
        ladders: Ladders::default().with(
            GameMode::OneVsOne,
            LadderStats {
                total_ladders: 1,
                top_rank_id: 6,
                top_rank: "Grandmaster".to_string(),
                top_mmr: 6800,
                wins: 150,
                losses: 70,
                ties: 0,
            },
        ),
    }
}

enum ScriptStep {
    Respond(Result<FetchOutcome, GatewayError>),
    Gate(oneshot::Receiver<FetchOutcome>),
    Panic,
}

/// Gateway answering from a queue of scripted steps, then from a fallback.
///
/// Gated steps block until the test sends the outcome, which lets tests
/// control completion order of overlapping requests.
pub struct ScriptedGateway {
    script: Mutex<VecDeque<ScriptStep>>,
    fallback: Mutex<FetchOutcome>,
    calls: AtomicUsize,
}

impl ScriptedGateway {
    pub fn new() -> Self {
        Self::with_fallback(FetchOutcome::TransientFailure)
    }

    pub fn with_fallback(fallback: FetchOutcome) -> Self {
        Self {
            script: Mutex::new(VecDeque::new()),
            fallback: Mutex::new(fallback),
            calls: AtomicUsize::new(0),
        }
    }

    pub fn push(&self, outcome: FetchOutcome) {
        self.push_step(ScriptStep::Respond(Ok(outcome)));
    }

    pub fn push_error(&self, error: GatewayError) {
        self.push_step(ScriptStep::Respond(Err(error)));
    }

    pub fn push_panic(&self) {
        self.push_step(ScriptStep::Panic);
    }

    /// Queue a call that waits for the returned sender.
    pub fn gate(&self) -> oneshot::Sender<FetchOutcome> {
        let (tx, rx) = oneshot::channel();
        self.push_step(ScriptStep::Gate(rx));
        tx
    }

    pub fn set_fallback(&self, outcome: FetchOutcome) {
        *self.fallback.lock().unwrap_or_else(PoisonError::into_inner) = outcome;
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    fn push_step(&self, step: ScriptStep) {
        self.script
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push_back(step);
    }
}

impl Default for ScriptedGateway {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl PlayerGateway for ScriptedGateway {
    async fn fetch_player_data(
        &self,
        _channel_id: &str,
        _token: &str,
    ) -> Result<FetchOutcome, GatewayError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let step = self
            .script
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .pop_front();

        match step {
            None => Ok(self
                .fallback
                .lock()
                .unwrap_or_else(PoisonError::into_inner)
                .clone()),
            Some(ScriptStep::Respond(result)) => result,
            Some(ScriptStep::Gate(rx)) => rx.await.map_err(|_| GatewayError::Request {
                message: "gate dropped".to_string(),
            }),
            Some(ScriptStep::Panic) => panic!("scripted gateway panic"),
        }
    }
}

/// Store whose every operation fails.
pub struct FailingStore;

impl KeyValueStore for FailingStore {
    fn get(&self, key: &str) -> Result<Option<String>, CacheError> {
        Err(CacheError::ReadFailed {
            key: key.to_string(),
            message: "storage disabled by host".to_string(),
        })
    }

    fn put(&self, key: &str, _value: &str) -> Result<(), CacheError> {
        Err(CacheError::WriteFailed {
            key: key.to_string(),
            message: "quota exceeded".to_string(),
        })
    }

    fn remove(&self, _key: &str) -> Result<(), CacheError> {
        Err(CacheError::StoreUnavailable {
            message: "storage disabled by host".to_string(),
        })
    }
}

/// Mutex to serialize tests that modify LADDERVIEW_CACHE_DIR.
pub static CACHE_DIR_ENV_LOCK: Mutex<()> = Mutex::new(());

/// RAII guard that removes LADDERVIEW_CACHE_DIR on drop.
pub struct CacheDirEnvGuard;

impl CacheDirEnvGuard {
    pub fn new(path: &std::path::Path) -> Self {
        // SAFETY: Caller must hold CACHE_DIR_ENV_LOCK to serialize access
        // from Rust test code. This is inherently unsafe as other threads or
        // C code could read the environment, but acceptable in test-only code.
        unsafe { std::env::set_var(ENV_CACHE_DIR, path) };
        Self
    }
}

impl Drop for CacheDirEnvGuard {
    fn drop(&mut self) {
        // SAFETY: Caller must hold CACHE_DIR_ENV_LOCK throughout guard
        // lifetime. See safety comment in new().
        unsafe { std::env::remove_var(ENV_CACHE_DIR) };
    }
}

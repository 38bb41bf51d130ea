//! Connection manager: memoized, at-most-once engine initialization.
//!
//! The first call to [`ConnectionManager::get_connection`] spawns the engine
//! bootstrap and stores the in-flight attempt. Every caller that arrives while
//! the attempt is pending attaches to the same shared task, so the bootstrap
//! runs exactly once per attempt.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};

use futures::future::{BoxFuture, FutureExt, Shared};
use serde::{Deserialize, Serialize};
use tracing::{error, info, warn};

use crate::db::{EngineBootstrap, EngineConfig, Handle};
use crate::error::{RangeviewError, Result};
use crate::status::{DiscardStatus, Status, StatusSink};

/// What a later call does after an initialization attempt has failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FailurePolicy {
    /// Keep returning the cached error; never bootstrap again.
    #[default]
    Cache,
    /// Start a fresh attempt on the next call.
    Retry,
}

/// Snapshot of the connection lifecycle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConnectionPhase {
    Uninitialized,
    Pending,
    Ready,
    Failed(RangeviewError),
}

type SharedAttempt = Shared<BoxFuture<'static, Result<Handle>>>;

enum ConnectionState {
    Uninitialized,
    Pending { attempt: u64, task: SharedAttempt },
    Ready(Handle),
    Failed(RangeviewError),
}

struct Inner {
    bootstrap: Arc<dyn EngineBootstrap>,
    config: EngineConfig,
    policy: FailurePolicy,
    status: Arc<dyn StatusSink>,
    state: Mutex<ConnectionState>,
    attempts: AtomicU64,
}

impl Inner {
    fn lock_state(&self) -> MutexGuard<'_, ConnectionState> {
        // State transitions are single assignments, so a poisoned lock still
        // holds a consistent value.
        self.state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Records the outcome of `attempt`, unless a newer attempt replaced it.
    fn settle(&self, attempt: u64, outcome: &Result<Handle>) {
        let mut state = self.lock_state();
        let current = matches!(&*state, ConnectionState::Pending { attempt: a, .. } if *a == attempt);
        if !current {
            return;
        }

        match outcome {
            Ok(handle) => {
                info!("Connected to {}", self.config.url);
                *state = ConnectionState::Ready(Arc::clone(handle));
                drop(state);
                self.status.set_status(Status::Connected);
            }
            Err(e) => {
                error!("Failed to initialize database engine: {}", e);
                *state = ConnectionState::Failed(e.clone());
                drop(state);
                self.status.set_status(Status::ConnectionFailed);
            }
        }
    }
}

/// Manages the lazily created query engine handle.
///
/// Cloning is cheap; clones share the same state.
#[derive(Clone)]
pub struct ConnectionManager {
    inner: Arc<Inner>,
}

/// Builder for [`ConnectionManager`].
pub struct ConnectionManagerBuilder {
    bootstrap: Arc<dyn EngineBootstrap>,
    config: EngineConfig,
    policy: FailurePolicy,
    status: Arc<dyn StatusSink>,
}

impl ConnectionManagerBuilder {
    /// Sets the behaviour after a failed attempt.
    pub fn failure_policy(mut self, policy: FailurePolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Sets where lifecycle status updates are sent.
    pub fn status_sink(mut self, status: Arc<dyn StatusSink>) -> Self {
        self.status = status;
        self
    }

    pub fn build(self) -> ConnectionManager {
        ConnectionManager {
            inner: Arc::new(Inner {
                bootstrap: self.bootstrap,
                config: self.config,
                policy: self.policy,
                status: self.status,
                state: Mutex::new(ConnectionState::Uninitialized),
                attempts: AtomicU64::new(0),
            }),
        }
    }
}

impl ConnectionManager {
    /// Starts building a manager around `bootstrap` and `config`.
    pub fn builder(
        bootstrap: Arc<dyn EngineBootstrap>,
        config: EngineConfig,
    ) -> ConnectionManagerBuilder {
        ConnectionManagerBuilder {
            bootstrap,
            config,
            policy: FailurePolicy::default(),
            status: Arc::new(DiscardStatus),
        }
    }

    /// Returns the engine handle, creating it on first use.
    ///
    /// Concurrent callers share one pending attempt. Once it resolves, every
    /// caller (past and future) observes the same handle or the same error;
    /// with [`FailurePolicy::Retry`] a call after a failure starts over.
    pub async fn get_connection(&self) -> Result<Handle> {
        let task = {
            let mut state = self.inner.lock_state();
            match &*state {
                ConnectionState::Ready(handle) => return Ok(Arc::clone(handle)),
                ConnectionState::Failed(e) if self.inner.policy == FailurePolicy::Cache => {
                    return Err(e.clone());
                }
                ConnectionState::Pending { task, .. } => task.clone(),
                ConnectionState::Uninitialized | ConnectionState::Failed(_) => {
                    if matches!(&*state, ConnectionState::Failed(_)) {
                        warn!("Retrying database initialization after a failed attempt");
                    }
                    let (attempt, task) = self.start_attempt();
                    *state = ConnectionState::Pending {
                        attempt,
                        task: task.clone(),
                    };
                    task
                }
            }
        };

        task.await
    }

    /// Spawns one bootstrap attempt. Must be called with the state locked.
    fn start_attempt(&self) -> (u64, SharedAttempt) {
        let attempt = self.inner.attempts.fetch_add(1, Ordering::SeqCst) + 1;
        info!(
            "Connecting to {} (attempt {}, chunk size {})",
            self.inner.config.url, attempt, self.inner.config.request_chunk_size
        );
        self.inner.status.set_status(Status::Connecting);

        let inner = Arc::clone(&self.inner);
        let join = tokio::spawn(async move {
            let outcome = inner.bootstrap.create(&inner.config).await;
            inner.settle(attempt, &outcome);
            outcome
        });

        let inner = Arc::clone(&self.inner);
        let task = async move {
            let outcome = join.await.unwrap_or_else(|e| {
                Err(RangeviewError::connection(format!(
                    "Engine initialization task failed: {e}"
                )))
            });
            // No-op when the spawned task already settled this attempt.
            inner.settle(attempt, &outcome);
            outcome
        }
        .boxed()
        .shared();

        (attempt, task)
    }

    /// Returns a snapshot of the lifecycle phase.
    pub fn phase(&self) -> ConnectionPhase {
        match &*self.inner.lock_state() {
            ConnectionState::Uninitialized => ConnectionPhase::Uninitialized,
            ConnectionState::Pending { .. } => ConnectionPhase::Pending,
            ConnectionState::Ready(_) => ConnectionPhase::Ready,
            ConnectionState::Failed(e) => ConnectionPhase::Failed(e.clone()),
        }
    }

    /// Check if the engine handle is ready.
    pub fn is_connected(&self) -> bool {
        self.phase() == ConnectionPhase::Ready
    }

    /// Number of bootstrap attempts started so far.
    pub fn attempts(&self) -> u64 {
        self.inner.attempts.load(Ordering::SeqCst)
    }

    /// The engine configuration used for every attempt.
    pub fn config(&self) -> &EngineConfig {
        &self.inner.config
    }

    pub fn failure_policy(&self) -> FailurePolicy {
        self.inner.policy
    }
}

//! Lifecycle coordinator.
//!
//! # States
//! ```text
//! Idle ──listen()──► Starting ──► Running ──shutdown/signal──► Stopping ──► Idle
//!   ▲        │            │
//!   │        │ guard held │ working dir / node startup failure
//!   └────────┘            └──► Err(LifecycleError), guard released
//! ```
//!
//! # Teardown order
//! 1. stop the node
//! 2. clear the published node
//! 3. stop the scheduler task and wait for it
//! 4. release the run guard
//!
//! Each step completes before the next starts. The scheduler has its own stop
//! token, independent of the shutdown trigger, so it keeps running while the
//! node shuts down.
//!
//! # Cancellation
//! Dropping a `listen` future mid-run skips the node shutdown (it cannot be
//! awaited from `Drop`) but still cancels the scheduler, clears the published
//! node and identity, disarms the trigger and releases the guard.

use std::future::Future;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use arc_swap::ArcSwapOption;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

use crate::config::resolver::{resolve, Resolved};
use crate::config::schema::NodeConfig;
use crate::config::validation::advisories;
use crate::config::Opt;
use crate::error::{LifecycleError, LifecycleResult, NodeError};
use crate::lifecycle::guard::RunGuard;
use crate::lifecycle::identity::{self, AppIdentity};
use crate::lifecycle::shutdown::{ShutdownHandle, ShutdownReason, ShutdownSlot};
use crate::lifecycle::signals::{self, SignalSource};
use crate::observability::metrics;

type WorkingDirSource = dyn Fn() -> std::io::Result<PathBuf> + Send + Sync;

/// The node started and stopped by a run.
pub trait Node: Send + Sync + 'static {
    /// Bring the node up. An error aborts the run.
    fn startup(&self) -> impl Future<Output = Result<(), NodeError>> + Send;

    /// Close the node gracefully.
    fn shutdown(&self) -> impl Future<Output = ()> + Send;
}

/// Creates the node for a run from its resolved configuration.
pub trait NodeBuilder: Send + Sync + 'static {
    type Node: Node;

    fn build(&self, config: NodeConfig) -> Self::Node;
}

impl<F, N> NodeBuilder for F
where
    F: Fn(NodeConfig) -> N + Send + Sync + 'static,
    N: Node,
{
    type Node = N;

    fn build(&self, config: NodeConfig) -> N {
        self(config)
    }
}

/// Background scheduler running for the lifetime of a run.
pub trait Scheduler: Send + Sync + 'static {
    /// Run until `stop` is cancelled.
    fn run(&self, stop: CancellationToken) -> impl Future<Output = ()> + Send;
}

/// Summary of a completed run.
#[derive(Debug, Clone)]
pub struct RunReport {
    pub name: String,
    pub reason: ShutdownReason,
    pub uptime: Duration,
}

/// What a call to [`Lifecycle::listen`] did.
#[derive(Debug, Clone)]
pub enum ListenOutcome {
    /// Another run was active; nothing was started.
    AlreadyRunning,
    /// The run went through startup and a full teardown.
    Stopped(RunReport),
}

struct Inner<B: NodeBuilder, S> {
    guard: RunGuard,
    shutdown: Arc<ShutdownSlot>,
    current: ArcSwapOption<B::Node>,
    identity: ArcSwapOption<AppIdentity>,
    builder: B,
    scheduler: Arc<S>,
    signals: Box<SignalSource>,
    working_dir: Box<WorkingDirSource>,
}

/// Cleans up a run that ends without reaching the end of teardown.
///
/// Armed from guard acquisition until [`RunScope::finish`]; dropping it early
/// (startup error or a dropped `listen` future) performs the non-async part
/// of teardown.
struct RunScope<'a, B: NodeBuilder, S> {
    inner: &'a Inner<B, S>,
    scheduler_stop: Option<CancellationToken>,
    finished: bool,
}

impl<'a, B: NodeBuilder, S> RunScope<'a, B, S> {
    fn new(inner: &'a Inner<B, S>) -> Self {
        Self {
            inner,
            scheduler_stop: None,
            finished: false,
        }
    }

    /// Teardown step 4: forget run state and release the guard.
    fn finish(mut self) {
        self.release();
        self.finished = true;
    }

    fn release(&self) {
        self.inner.identity.store(None);
        self.inner.shutdown.disarm();
        self.inner.guard.release();
    }
}

impl<B: NodeBuilder, S> Drop for RunScope<'_, B, S> {
    fn drop(&mut self) {
        if self.finished {
            return;
        }
        if let Some(stop) = self.scheduler_stop.take() {
            tracing::warn!("Run dropped while active, node was not shut down");
            stop.cancel();
        }
        self.inner.current.store(None);
        self.release();
    }
}

/// State owned by a run between startup and teardown.
struct Running<N> {
    node: Arc<N>,
    identity: Arc<AppIdentity>,
    scheduler_stop: CancellationToken,
    scheduler_task: JoinHandle<()>,
}

/// Owns the run guard, the shutdown trigger and the published node.
///
/// Cloning yields another handle to the same lifecycle.
pub struct Lifecycle<B: NodeBuilder, S: Scheduler> {
    inner: Arc<Inner<B, S>>,
}

impl<B: NodeBuilder, S: Scheduler> Clone for Lifecycle<B, S> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

/// Builder for [`Lifecycle`] with replaceable process-environment sources.
pub struct LifecycleBuilder<B, S> {
    builder: B,
    scheduler: S,
    signals: Box<SignalSource>,
    working_dir: Box<WorkingDirSource>,
}

impl<B: NodeBuilder, S: Scheduler> LifecycleBuilder<B, S> {
    /// Replace the OS signal source.
    pub fn signal_source<F>(mut self, signals: F) -> Self
    where
        F: Fn() -> futures_util::future::BoxFuture<'static, std::io::Result<&'static str>>
            + Send
            + Sync
            + 'static,
    {
        self.signals = Box::new(signals);
        self
    }

    /// Replace how the working directory is resolved at startup.
    pub fn working_dir<F>(mut self, working_dir: F) -> Self
    where
        F: Fn() -> std::io::Result<PathBuf> + Send + Sync + 'static,
    {
        self.working_dir = Box::new(working_dir);
        self
    }

    pub fn build(self) -> Lifecycle<B, S> {
        Lifecycle {
            inner: Arc::new(Inner {
                guard: RunGuard::new(),
                shutdown: Arc::new(ShutdownSlot::default()),
                current: ArcSwapOption::empty(),
                identity: ArcSwapOption::empty(),
                builder: self.builder,
                scheduler: Arc::new(self.scheduler),
                signals: self.signals,
                working_dir: self.working_dir,
            }),
        }
    }
}

impl<B: NodeBuilder, S: Scheduler> Lifecycle<B, S> {
    /// Start building a lifecycle with real OS signals and working directory.
    pub fn builder(builder: B, scheduler: S) -> LifecycleBuilder<B, S> {
        LifecycleBuilder {
            builder,
            scheduler,
            signals: Box::new(signals::os_signals),
            working_dir: Box::new(identity::current_working_dir),
        }
    }

    /// Create a lifecycle that listens for real OS signals.
    pub fn new(builder: B, scheduler: S) -> Self {
        Self::builder(builder, scheduler).build()
    }

    /// Create a lifecycle with a custom OS signal source.
    pub fn with_signal_source<F>(builder: B, scheduler: S, signals: F) -> Self
    where
        F: Fn() -> futures_util::future::BoxFuture<'static, std::io::Result<&'static str>>
            + Send
            + Sync
            + 'static,
    {
        Self::builder(builder, scheduler)
            .signal_source(signals)
            .build()
    }

    /// Start a node on `addr` and run until shutdown.
    ///
    /// Does not return before teardown has completed. If another run is
    /// active this is a logged no-op returning [`ListenOutcome::AlreadyRunning`].
    pub async fn listen(&self, addr: &str, opts: &[Opt]) -> LifecycleResult<ListenOutcome> {
        let inner = &self.inner;
        if !inner.guard.try_acquire() {
            tracing::warn!(addr = %addr, "Quantum has running");
            metrics::record_duplicate_listen();
            return Ok(ListenOutcome::AlreadyRunning);
        }

        let mut scope = RunScope::new(inner);

        // Armed before startup so a trigger during startup is not lost.
        let trigger = inner.shutdown.arm();

        let running = match self.start(addr, opts, &mut scope).await {
            Ok(running) => running,
            Err(err) => {
                tracing::error!(error = %err, "Quantum server failed to start");
                return Err(err);
            }
        };

        let reason = self.wait_for_shutdown(&trigger).await;
        tracing::info!(reason = %reason, "Quantum server is stopping...");

        let report = RunReport {
            name: running.identity.name.clone(),
            uptime: running.identity.uptime(),
            reason,
        };
        self.teardown(running).await;
        scope.finish();

        metrics::record_run_stopped(report.reason.label());
        tracing::info!(
            name = %report.name,
            uptime = ?report.uptime,
            "Quantum server stopped"
        );
        Ok(ListenOutcome::Stopped(report))
    }

    async fn start(
        &self,
        addr: &str,
        opts: &[Opt],
        scope: &mut RunScope<'_, B, S>,
    ) -> LifecycleResult<Running<B::Node>> {
        let inner = &self.inner;

        let identity = match AppIdentity::capture_with(&*inner.working_dir) {
            Ok(identity) => Arc::new(identity),
            Err(err) => {
                metrics::record_startup_failure("working_dir");
                return Err(LifecycleError::WorkingDir(err));
            }
        };
        inner.identity.store(Some(Arc::clone(&identity)));

        let Resolved {
            config,
            singleton_inferred,
        } = resolve(addr, opts);
        if singleton_inferred {
            tracing::info!("The current server running in singleton mode");
        }
        for advisory in advisories(&config) {
            tracing::warn!(advisory = %advisory, "Configuration advisory");
        }

        let client_addr = config.client_addr.clone();
        let service_addr = config.service_addr.clone();
        tracing::debug!(
            is_master = config.is_master,
            advertise_addr = %config.advertise_addr,
            retry_interval = ?config.retry_interval,
            components = config.components.len(),
            "Configuration resolved"
        );

        let node = Arc::new(inner.builder.build(config));
        if let Err(err) = node.startup().await {
            metrics::record_startup_failure("node");
            return Err(LifecycleError::NodeStartup(err));
        }
        inner.current.store(Some(Arc::clone(&node)));

        if client_addr.is_empty() {
            tracing::info!(
                name = %identity.name,
                service_addr = %service_addr,
                "Startup *Quantum backend server*"
            );
        } else {
            tracing::info!(
                name = %identity.name,
                client_addr = %client_addr,
                service_addr = %service_addr,
                "Startup *Quantum gate server*"
            );
        }

        let scheduler_stop = CancellationToken::new();
        let scheduler = Arc::clone(&inner.scheduler);
        let stop = scheduler_stop.clone();
        scope.scheduler_stop = Some(scheduler_stop.clone());
        let scheduler_task = tokio::spawn(async move {
            scheduler.run(stop).await;
        });

        metrics::record_run_started();
        Ok(Running {
            node,
            identity,
            scheduler_stop,
            scheduler_task,
        })
    }

    async fn wait_for_shutdown(&self, trigger: &CancellationToken) -> ShutdownReason {
        let os_signal = (self.inner.signals)();
        tokio::select! {
            _ = trigger.cancelled() => ShutdownReason::Requested,
            res = os_signal => match res {
                Ok(name) => {
                    tracing::info!(signal = name, "Quantum server got signal");
                    ShutdownReason::Signal(name)
                }
                Err(err) => {
                    tracing::warn!(
                        error = %err,
                        "Failed to install signal handlers, waiting for shutdown request"
                    );
                    trigger.cancelled().await;
                    ShutdownReason::Requested
                }
            },
        }
    }

    async fn teardown(&self, running: Running<B::Node>) {
        let inner = &self.inner;

        running.node.shutdown().await;
        tracing::debug!("Node stopped");

        inner.current.store(None);

        running.scheduler_stop.cancel();
        if let Err(err) = running.scheduler_task.await {
            tracing::error!(error = %err, "Scheduler task ended abnormally");
        }
        tracing::debug!("Scheduler stopped");
    }

    /// Ask the active run, if any, to shut down. Idempotent.
    pub fn shutdown(&self) -> bool {
        self.shutdown_handle().trigger()
    }

    /// A handle other tasks can use to trigger shutdown.
    pub fn shutdown_handle(&self) -> ShutdownHandle {
        ShutdownHandle::new(Arc::clone(&self.inner.shutdown))
    }

    /// The node of the active run.
    ///
    /// May be stale or already cleared while a teardown is in progress.
    pub fn current_node(&self) -> Option<Arc<B::Node>> {
        self.inner.current.load_full()
    }

    /// Identity of the active run.
    pub fn identity(&self) -> Option<Arc<AppIdentity>> {
        self.inner.identity.load_full()
    }

    /// Whether a run holds the guard.
    pub fn is_running(&self) -> bool {
        self.inner.guard.is_held()
    }
}

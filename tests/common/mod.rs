//! Shared collaborators for lifecycle integration tests.

use std::future::Future;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use futures_util::future::BoxFuture;
use futures_util::FutureExt;
use tokio::sync::Notify;
use tokio_util::sync::CancellationToken;

use quantum::{Lifecycle, Node, NodeBuilder, NodeConfig, NodeError, Scheduler};

/// Collaborator events in the order they happened.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    NodeBuilt,
    NodeStarted,
    NodeStopping,
    NodeStopped,
    SchedulerStarted,
    SchedulerStopped,
}

#[derive(Clone, Default)]
pub struct EventLog(Arc<Mutex<Vec<Event>>>);

impl EventLog {
    pub fn push(&self, event: Event) {
        self.0.lock().unwrap().push(event);
    }

    pub fn events(&self) -> Vec<Event> {
        self.0.lock().unwrap().clone()
    }

    #[allow(dead_code)]
    pub fn count(&self, event: &Event) -> usize {
        self.0.lock().unwrap().iter().filter(|e| *e == event).count()
    }
}

/// Builds [`RecordingNode`]s and keeps the configs they were built from.
#[derive(Clone, Default)]
pub struct RecordingBuilder {
    pub log: EventLog,
    pub configs: Arc<Mutex<Vec<NodeConfig>>>,
    pub fail_startup: bool,
    pub startup_delay: Duration,
}

impl RecordingBuilder {
    #[allow(dead_code)]
    pub fn last_config(&self) -> Option<NodeConfig> {
        self.configs.lock().unwrap().last().cloned()
    }
}

impl NodeBuilder for RecordingBuilder {
    type Node = RecordingNode;

    fn build(&self, config: NodeConfig) -> RecordingNode {
        self.log.push(Event::NodeBuilt);
        self.configs.lock().unwrap().push(config.clone());
        RecordingNode {
            log: self.log.clone(),
            config,
            fail_startup: self.fail_startup,
            startup_delay: self.startup_delay,
        }
    }
}

pub struct RecordingNode {
    log: EventLog,
    pub config: NodeConfig,
    fail_startup: bool,
    startup_delay: Duration,
}

impl Node for RecordingNode {
    async fn startup(&self) -> Result<(), NodeError> {
        if !self.startup_delay.is_zero() {
            tokio::time::sleep(self.startup_delay).await;
        }
        if self.fail_startup {
            return Err(NodeError::new("address already in use"));
        }
        self.log.push(Event::NodeStarted);
        Ok(())
    }

    async fn shutdown(&self) {
        self.log.push(Event::NodeStopping);
        // Give a misordered teardown the chance to stop the scheduler first.
        tokio::time::sleep(Duration::from_millis(20)).await;
        self.log.push(Event::NodeStopped);
    }
}

pub struct RecordingScheduler {
    pub log: EventLog,
}

impl Scheduler for RecordingScheduler {
    async fn run(&self, stop: CancellationToken) {
        self.log.push(Event::SchedulerStarted);
        stop.cancelled().await;
        self.log.push(Event::SchedulerStopped);
    }
}

pub type TestLifecycle = Lifecycle<RecordingBuilder, RecordingScheduler>;

/// A signal source fired by notifying the returned handle.
pub fn fake_signals() -> (
    Arc<Notify>,
    impl Fn() -> BoxFuture<'static, std::io::Result<&'static str>> + Send + Sync + 'static,
) {
    let notify = Arc::new(Notify::new());
    let source = {
        let notify = Arc::clone(&notify);
        move || {
            let notify = Arc::clone(&notify);
            async move {
                notify.notified().await;
                Ok("SIGTERM")
            }
            .boxed()
        }
    };
    (notify, source)
}

/// A lifecycle driven by a fake signal source.
pub fn lifecycle(builder: RecordingBuilder) -> (TestLifecycle, Arc<Notify>) {
    let (notify, source) = fake_signals();
    let scheduler = RecordingScheduler {
        log: builder.log.clone(),
    };
    (Lifecycle::with_signal_source(builder, scheduler, source), notify)
}

/// Poll `cond` until it holds, panicking after two seconds.
pub async fn wait_until<F>(mut cond: F)
where
    F: FnMut() -> bool,
{
    let deadline = tokio::time::Instant::now() + Duration::from_secs(2);
    while !cond() {
        assert!(tokio::time::Instant::now() < deadline, "condition not reached in time");
        tokio::time::sleep(Duration::from_millis(5)).await;
    }
}

/// Await `fut` with a two second limit.
pub async fn within<T>(fut: impl Future<Output = T>) -> T {
    tokio::time::timeout(Duration::from_secs(2), fut)
        .await
        .expect("timed out")
}

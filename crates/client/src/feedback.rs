//! Transient success/error messages shown after a mutation.
//!
//! A message clears itself [`FEEDBACK_TTL`] after it was set. Setting a new
//! message disarms the pending clear and arms a fresh one, so only the latest
//! message is ever shown and it always gets the full delay.

use std::{
    sync::{Arc, Mutex, PoisonError, Weak},
    time::Duration,
};

use tokio::{sync::watch, task::JoinHandle};

pub const FEEDBACK_TTL: Duration = Duration::from_millis(2800);

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FeedbackLevel {
    Success,
    Error,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FeedbackMessage {
    pub level: FeedbackLevel,
    pub message: String,
}

impl FeedbackMessage {
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            level: FeedbackLevel::Success,
            message: message.into(),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            level: FeedbackLevel::Error,
            message: message.into(),
        }
    }
}

#[derive(Default)]
struct Timer {
    generation: u64,
    handle: Option<JoinHandle<()>>,
}

struct Inner {
    current: watch::Sender<Option<FeedbackMessage>>,
    timer: Mutex<Timer>,
    ttl: Duration,
}

#[derive(Clone)]
pub struct Feedback {
    inner: Arc<Inner>,
}

impl Default for Feedback {
    fn default() -> Self {
        Self::with_ttl(FEEDBACK_TTL)
    }
}

impl Feedback {
    pub fn with_ttl(ttl: Duration) -> Self {
        let (current, _) = watch::channel(None);
        Self {
            inner: Arc::new(Inner {
                current,
                timer: Mutex::new(Timer::default()),
                ttl,
            }),
        }
    }

    pub fn success(&self, message: impl Into<String>) {
        self.set(FeedbackMessage::success(message));
    }

    pub fn error(&self, message: impl Into<String>) {
        self.set(FeedbackMessage::error(message));
    }

    pub fn set(&self, message: FeedbackMessage) {
        let mut timer = self.lock();
        if let Some(handle) = timer.handle.take() {
            handle.abort();
        }
        timer.generation += 1;
        self.inner.current.send_replace(Some(message));

        let Ok(runtime) = tokio::runtime::Handle::try_current() else {
            tracing::debug!("no runtime, feedback will not auto-clear");
            return;
        };
        let generation = timer.generation;
        let ttl = self.inner.ttl;
        let weak = Arc::downgrade(&self.inner);
        timer.handle = Some(runtime.spawn(async move {
            tokio::time::sleep(ttl).await;
            expire(&weak, generation);
        }));
    }

    pub fn clear(&self) {
        let mut timer = self.lock();
        if let Some(handle) = timer.handle.take() {
            handle.abort();
        }
        timer.generation += 1;
        self.inner.current.send_replace(None);
    }

    pub fn current(&self) -> Option<FeedbackMessage> {
        self.inner.current.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<Option<FeedbackMessage>> {
        self.inner.current.subscribe()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Timer> {
        self.inner.timer.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

fn expire(inner: &Weak<Inner>, generation: u64) {
    let Some(inner) = inner.upgrade() else {
        return;
    };
    let mut timer = inner.timer.lock().unwrap_or_else(PoisonError::into_inner);
    if timer.generation != generation {
        return;
    }
    timer.handle = None;
    inner.current.send_replace(None);
}

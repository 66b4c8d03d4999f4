//! Transient notification registry.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError, Weak};
use std::time::Duration;

pub const DEFAULT_TOAST_DURATION: Duration = Duration::from_millis(4000);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ToastKind {
    Success,
    Error,
    Warning,
    #[default]
    Info,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToastOptions {
    pub kind: ToastKind,
    pub title: Option<String>,
    /// `None` or zero keeps the toast until dismissed.
    pub duration: Option<Duration>,
    pub dismissible: bool,
}

impl Default for ToastOptions {
    fn default() -> Self {
        Self {
            kind: ToastKind::Info,
            title: None,
            duration: Some(DEFAULT_TOAST_DURATION),
            dismissible: true,
        }
    }
}

impl ToastOptions {
    pub fn kind(kind: ToastKind) -> Self {
        Self {
            kind,
            ..Self::default()
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Toast {
    pub id: u64,
    pub message: String,
    pub kind: ToastKind,
    pub title: Option<String>,
    pub duration: Option<Duration>,
    pub dismissible: bool,
}

#[derive(Default)]
struct Inner {
    toasts: Mutex<Vec<Toast>>,
    next_id: AtomicU64,
}

/// Ordered list of visible toasts, oldest first.
///
/// Timed toasts are removed by a task on the ambient tokio runtime; outside a
/// runtime they stay until dismissed.
#[derive(Clone, Default)]
pub struct ToastRegistry {
    inner: Arc<Inner>,
}

impl ToastRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn show(&self, message: impl Into<String>, options: ToastOptions) -> u64 {
        let id = self.inner.next_id.fetch_add(1, Ordering::Relaxed) + 1;
        let toast = Toast {
            id,
            message: message.into(),
            kind: options.kind,
            title: options.title,
            duration: options.duration,
            dismissible: options.dismissible,
        };
        self.lock().push(toast);

        if let Some(duration) = options.duration.filter(|d| !d.is_zero()) {
            self.schedule_dismiss(id, duration);
        }
        id
    }

    pub fn success(&self, message: impl Into<String>) -> u64 {
        self.show(message, ToastOptions::kind(ToastKind::Success))
    }

    pub fn error(&self, message: impl Into<String>) -> u64 {
        self.show(message, ToastOptions::kind(ToastKind::Error))
    }

    pub fn warning(&self, message: impl Into<String>) -> u64 {
        self.show(message, ToastOptions::kind(ToastKind::Warning))
    }

    pub fn info(&self, message: impl Into<String>) -> u64 {
        self.show(message, ToastOptions::kind(ToastKind::Info))
    }

    /// Returns whether a toast was removed. Unknown ids are a no-op.
    pub fn dismiss(&self, id: u64) -> bool {
        let mut toasts = self.lock();
        let before = toasts.len();
        toasts.retain(|t| t.id != id);
        toasts.len() != before
    }

    pub fn dismiss_all(&self) {
        self.lock().clear();
    }

    pub fn toasts(&self) -> Vec<Toast> {
        self.lock().clone()
    }

    fn lock(&self) -> MutexGuard<'_, Vec<Toast>> {
        self.inner.toasts.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn schedule_dismiss(&self, id: u64, after: Duration) {
        let Ok(handle) = tokio::runtime::Handle::try_current() else {
            tracing::debug!(id, "no runtime, toast will not auto-dismiss");
            return;
        };
        let weak: Weak<Inner> = Arc::downgrade(&self.inner);
        handle.spawn(async move {
            tokio::time::sleep(after).await;
            if let Some(inner) = weak.upgrade() {
                ToastRegistry { inner }.dismiss(id);
            }
        });
    }
}

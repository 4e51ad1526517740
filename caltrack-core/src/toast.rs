use serde::{Deserialize, Serialize};
use std::sync::Mutex;
use std::time::{Duration, Instant};
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ToastId(pub Uuid);

impl ToastId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ToastVariant {
    Default,
    Destructive,
}

/// A transient user-visible notification.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Toast {
    pub title: String,
    pub description: String,
    pub variant: ToastVariant,
}

impl Toast {
    pub fn info(title: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            description: description.into(),
            variant: ToastVariant::Default,
        }
    }

    pub fn error(description: impl Into<String>) -> Self {
        Self {
            title: "Error".into(),
            description: description.into(),
            variant: ToastVariant::Destructive,
        }
    }

    pub fn is_error(&self) -> bool {
        self.variant == ToastVariant::Destructive
    }
}

struct Entry {
    id: ToastId,
    toast: Toast,
    expires_at: Instant,
}

/// In-memory toast queue. Entries expire after a fixed TTL and are pruned on read.
pub struct ToastCenter {
    ttl: Duration,
    entries: Mutex<Vec<Entry>>,
}

impl ToastCenter {
    pub fn new(ttl: Duration) -> Self {
        Self {
            ttl,
            entries: Mutex::new(Vec::new()),
        }
    }

    pub fn push(&self, toast: Toast) -> ToastId {
        let id = ToastId::new();
        let mut entries = self.lock();
        Self::prune(&mut entries);
        entries.push(Entry {
            id,
            toast,
            expires_at: Instant::now() + self.ttl,
        });
        id
    }

    pub fn active(&self) -> Vec<(ToastId, Toast)> {
        let mut entries = self.lock();
        Self::prune(&mut entries);
        entries.iter().map(|e| (e.id, e.toast.clone())).collect()
    }

    /// Removes and returns every live toast, oldest first.
    pub fn drain(&self) -> Vec<Toast> {
        let mut entries = self.lock();
        Self::prune(&mut entries);
        entries.drain(..).map(|e| e.toast).collect()
    }

    pub fn dismiss(&self, id: ToastId) {
        self.lock().retain(|e| e.id != id);
    }

    fn prune(entries: &mut Vec<Entry>) {
        let now = Instant::now();
        entries.retain(|e| e.expires_at > now);
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Vec<Entry>> {
        self.entries.lock().unwrap_or_else(|e| e.into_inner())
    }
}

impl std::fmt::Debug for ToastCenter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ToastCenter")
            .field("ttl", &self.ttl)
            .field("len", &self.lock().len())
            .finish()
    }
}

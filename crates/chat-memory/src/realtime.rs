//! In-memory realtime keyed store
//!
//! The whole database is one JSON tree. Writes replace or merge subtrees and
//! then notify every registration whose path overlaps the written path.
//! A registration fires only when its own snapshot actually changed.
//! Every committed write bumps the tree version; a registration delivers one
//! snapshot at a time and never one older than what it already delivered.
//! Listeners run outside the tree lock.

use std::cell::RefCell;
use std::sync::atomic::{AtomicBool, AtomicU64, AtomicUsize, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use dashmap::DashMap;
use parking_lot::{Mutex, ReentrantMutex, RwLock};
use serde_json::{Map, Value};
use tracing::{debug, warn};

use chat_core::error::DomainError;
use chat_core::traits::{Listener, RealtimeStore, RepoResult, Subscription};
use chat_core::value_objects::{PushIdGenerator, StorePath};

/// In-memory realtime keyed store
#[derive(Clone, Default)]
pub struct MemoryRealtimeStore {
    inner: Arc<Inner>,
}

#[derive(Default)]
struct Inner {
    tree: RwLock<Value>,
    version: AtomicU64,
    registrations: DashMap<u64, Arc<Registration>>,
    next_registration: AtomicU64,
    push_ids: PushIdGenerator,
    write_failure: Mutex<Option<String>>,
    writes: AtomicUsize,
}

struct Registration {
    path: StorePath,
    listener: Listener<Value>,
    delivered: ReentrantMutex<RefCell<Delivered>>,
    active: AtomicBool,
}

/// Last snapshot handed to a listener and the tree version it was read at
#[derive(Default)]
struct Delivered {
    version: Option<u64>,
    value: Option<Value>,
}

impl MemoryRealtimeStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every following write fail with `reason` (`None` heals the store)
    pub fn set_write_failure(&self, reason: Option<&str>) {
        *self.inner.write_failure.lock() = reason.map(str::to_string);
    }

    /// Number of successful writes so far
    pub fn write_count(&self) -> usize {
        self.inner.writes.load(Ordering::SeqCst)
    }

    /// Number of live subscriptions
    pub fn listener_count(&self) -> usize {
        self.inner.registrations.len()
    }

    /// Copy of the whole tree
    pub fn snapshot(&self) -> Value {
        self.inner.tree.read().clone()
    }
}

impl Inner {
    fn check_writable(&self, path: &StorePath) -> RepoResult<()> {
        if let Some(reason) = self.write_failure.lock().clone() {
            warn!(path = %path, reason = %reason, "Rejecting write");
            return Err(DomainError::StoreWrite(reason));
        }
        Ok(())
    }

    /// Apply a mutation and bump the version under one write lock
    fn write_tree(&self, apply: impl FnOnce(&mut Value)) {
        let mut tree = self.tree.write();
        apply(&mut tree);
        self.version.fetch_add(1, Ordering::SeqCst);
    }

    fn committed(&self, path: &StorePath) {
        self.writes.fetch_add(1, Ordering::SeqCst);
        debug!(path = %path, "Write committed");

        let affected: Vec<Arc<Registration>> = self
            .registrations
            .iter()
            .filter(|entry| entry.path.overlaps(path))
            .map(|entry| Arc::clone(entry.value()))
            .collect();

        for registration in affected {
            self.deliver(&registration);
        }
    }

    fn deliver(&self, registration: &Registration) {
        if !registration.active.load(Ordering::SeqCst) {
            return;
        }

        let (version, snapshot) = {
            let tree = self.tree.read();
            (self.version.load(Ordering::SeqCst), read_at(&tree, &registration.path))
        };

        // Held through the listener call so deliveries never overtake each other
        let guard = registration.delivered.lock();
        {
            let mut delivered = guard.borrow_mut();
            if delivered.version.is_some_and(|seen| version <= seen) {
                return;
            }
            delivered.version = Some(version);
            if delivered.value.as_ref() == Some(&snapshot) {
                return;
            }
            delivered.value = Some(snapshot.clone());
        }

        (registration.listener)(snapshot);
    }
}

#[async_trait]
impl RealtimeStore for MemoryRealtimeStore {
    fn push_key(&self, _parent: &StorePath) -> String {
        self.inner.push_ids.generate()
    }

    async fn set(&self, path: &StorePath, value: Value) -> RepoResult<()> {
        self.inner.check_writable(path)?;

        let value = normalize(value);
        self.inner
            .write_tree(|tree| write_at(tree, path.segments(), value));

        self.inner.committed(path);
        Ok(())
    }

    async fn update(&self, path: &StorePath, fields: Map<String, Value>) -> RepoResult<()> {
        self.inner.check_writable(path)?;

        let mut targets = Vec::with_capacity(fields.len());
        for (key, value) in fields {
            let mut target = path.clone();
            for segment in key.split('/').filter(|s| !s.is_empty()) {
                target = target.child(segment)?;
            }
            if target == *path {
                return Err(DomainError::ValidationError(format!(
                    "update key '{key}' names no child"
                )));
            }
            targets.push((target, normalize(value)));
        }

        self.inner.write_tree(|tree| {
            for (target, value) in targets {
                write_at(tree, target.segments(), value);
            }
        });

        self.inner.committed(path);
        Ok(())
    }

    async fn once(&self, path: &StorePath) -> RepoResult<Value> {
        Ok(read_at(&self.inner.tree.read(), path))
    }

    fn subscribe(&self, path: &StorePath, listener: Listener<Value>) -> RepoResult<Subscription> {
        let id = self.inner.next_registration.fetch_add(1, Ordering::SeqCst);
        let registration = Arc::new(Registration {
            path: path.clone(),
            listener,
            delivered: ReentrantMutex::new(RefCell::new(Delivered::default())),
            active: AtomicBool::new(true),
        });

        self.inner.registrations.insert(id, Arc::clone(&registration));
        self.inner.deliver(&registration);

        let inner = Arc::downgrade(&self.inner);
        Ok(Subscription::new(path.to_string(), move || {
            registration.active.store(false, Ordering::SeqCst);
            if let Some(inner) = inner.upgrade() {
                inner.registrations.remove(&id);
            }
        }))
    }
}

// ============================================================================
// Tree helpers
// ============================================================================

fn read_at(tree: &Value, path: &StorePath) -> Value {
    let mut node = tree;
    for segment in path.segments() {
        match node.get(segment) {
            Some(child) => node = child,
            None => return Value::Null,
        }
    }
    node.clone()
}

/// Drop null leaves and empty objects; the store never holds either
fn normalize(value: Value) -> Value {
    match value {
        Value::Object(children) => {
            let children: Map<String, Value> = children
                .into_iter()
                .map(|(key, child)| (key, normalize(child)))
                .filter(|(_, child)| !child.is_null())
                .collect();
            if children.is_empty() {
                Value::Null
            } else {
                Value::Object(children)
            }
        }
        other => other,
    }
}

fn write_at(node: &mut Value, segments: &[String], value: Value) {
    let Some((head, rest)) = segments.split_first() else {
        *node = value;
        return;
    };

    if value.is_null() {
        let Value::Object(children) = node else {
            return;
        };
        let emptied = match children.get_mut(head) {
            Some(child) if !rest.is_empty() => {
                write_at(child, rest, Value::Null);
                child.is_null()
            }
            Some(_) => true,
            None => false,
        };
        if emptied {
            children.remove(head);
        }
        if children.is_empty() {
            *node = Value::Null;
        }
        return;
    }

    if !node.is_object() {
        *node = Value::Object(Map::new());
    }
    if let Value::Object(children) = node {
        let child = children.entry(head.clone()).or_insert(Value::Null);
        write_at(child, rest, value);
    }
}

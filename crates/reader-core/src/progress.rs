use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

use hypr_storage::{DocumentPatch, DocumentStore};
use tokio::task::JoinHandle;

struct Pending {
    seq: u64,
    patch: DocumentPatch,
    task: JoinHandle<()>,
}

struct Inner {
    store: Arc<dyn DocumentStore>,
    delay: Duration,
    next_seq: Mutex<u64>,
    pending: Mutex<HashMap<String, Pending>>,
    write_lock: tokio::sync::Mutex<()>,
}

/// Coalesces document updates and writes them after a quiet period.
///
/// Each [`schedule`](Self::schedule) merges into the document's pending patch
/// (later fields win) and restarts its timer. Writes run on spawned tasks,
/// one at a time, and failures are only logged.
#[derive(Clone)]
pub struct DebouncedWriter {
    inner: Arc<Inner>,
}

impl DebouncedWriter {
    pub fn new(store: Arc<dyn DocumentStore>, delay: Duration) -> Self {
        Self {
            inner: Arc::new(Inner {
                store,
                delay,
                next_seq: Mutex::new(0),
                pending: Mutex::new(HashMap::new()),
                write_lock: tokio::sync::Mutex::new(()),
            }),
        }
    }

    /// Must be called from within a tokio runtime.
    pub fn schedule(&self, document_id: &str, patch: DocumentPatch) {
        let seq = {
            let mut next = self
                .inner
                .next_seq
                .lock()
                .unwrap_or_else(PoisonError::into_inner);
            *next += 1;
            *next
        };

        let mut pending = self
            .inner
            .pending
            .lock()
            .unwrap_or_else(PoisonError::into_inner);

        let patch = match pending.remove(document_id) {
            Some(previous) => {
                previous.task.abort();
                previous.patch.merge(patch)
            }
            None => patch,
        };

        let task = tokio::spawn({
            let inner = self.inner.clone();
            let document_id = document_id.to_string();
            async move {
                tokio::time::sleep(inner.delay).await;
                if let Some(patch) = inner.take(&document_id, seq) {
                    inner.write(&document_id, patch).await;
                }
            }
        });

        pending.insert(document_id.to_string(), Pending { seq, patch, task });
    }

    pub fn has_pending(&self) -> bool {
        !self
            .inner
            .pending
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .is_empty()
    }

    /// Write everything still pending now, without waiting for the timers.
    /// Returns once writes already in progress have landed as well.
    pub async fn flush(&self) {
        let drained: Vec<(String, DocumentPatch)> = {
            let mut pending = self
                .inner
                .pending
                .lock()
                .unwrap_or_else(PoisonError::into_inner);
            pending
                .drain()
                .map(|(id, p)| {
                    p.task.abort();
                    (id, p.patch)
                })
                .collect()
        };

        for (document_id, patch) in drained {
            self.inner.write(&document_id, patch).await;
        }

        // A fired timer takes its patch and queues on the lock with no await
        // in between, and the lock is fair, so this waits for it.
        drop(self.inner.write_lock.lock().await);
    }
}

impl Inner {
    /// Removes the pending patch, but only if `seq` still owns the entry.
    fn take(&self, document_id: &str, seq: u64) -> Option<DocumentPatch> {
        let mut pending = self.pending.lock().unwrap_or_else(PoisonError::into_inner);
        match pending.get(document_id) {
            Some(entry) if entry.seq == seq => {
                pending.remove(document_id).map(|p| p.patch)
            }
            _ => None,
        }
    }

    async fn write(&self, document_id: &str, patch: DocumentPatch) {
        if patch.is_empty() {
            return;
        }
        let _guard = self.write_lock.lock().await;
        match self.store.update(document_id, patch).await {
            Ok(doc) => {
                tracing::debug!(
                    document_id,
                    last_read_position = doc.last_read_position,
                    "document_written"
                );
            }
            Err(error) => {
                tracing::warn!(document_id, %error, "document_write_failed");
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use hypr_storage::{BoxFuture, Document, MemoryStore};
    use hypr_tiptap::Node;

    #[derive(Default)]
    struct CountingStore {
        inner: MemoryStore,
        updates: AtomicUsize,
    }

    impl DocumentStore for CountingStore {
        fn get<'a>(&'a self, id: &'a str) -> BoxFuture<'a, hypr_storage::Result<Option<Document>>> {
            self.inner.get(id)
        }

        fn list(&self) -> BoxFuture<'_, hypr_storage::Result<Vec<Document>>> {
            self.inner.list()
        }

        fn create<'a>(
            &'a self,
            name: &'a str,
            content: Node,
        ) -> BoxFuture<'a, hypr_storage::Result<Document>> {
            self.inner.create(name, content)
        }

        fn update<'a>(
            &'a self,
            id: &'a str,
            patch: DocumentPatch,
        ) -> BoxFuture<'a, hypr_storage::Result<Document>> {
            self.updates.fetch_add(1, Ordering::SeqCst);
            self.inner.update(id, patch)
        }
    }

    struct SlowStore {
        inner: CountingStore,
        latency: Duration,
    }

    impl DocumentStore for SlowStore {
        fn get<'a>(&'a self, id: &'a str) -> BoxFuture<'a, hypr_storage::Result<Option<Document>>> {
            self.inner.get(id)
        }

        fn list(&self) -> BoxFuture<'_, hypr_storage::Result<Vec<Document>>> {
            self.inner.list()
        }

        fn create<'a>(
            &'a self,
            name: &'a str,
            content: Node,
        ) -> BoxFuture<'a, hypr_storage::Result<Document>> {
            self.inner.create(name, content)
        }

        fn update<'a>(
            &'a self,
            id: &'a str,
            patch: DocumentPatch,
        ) -> BoxFuture<'a, hypr_storage::Result<Document>> {
            Box::pin(async move {
                tokio::time::sleep(self.latency).await;
                self.inner.update(id, patch).await
            })
        }
    }

    async fn setup() -> (Arc<CountingStore>, DebouncedWriter, String) {
        let store = Arc::new(CountingStore::default());
        let doc = store.create("notes", Node::empty_doc()).await.unwrap();
        let writer = DebouncedWriter::new(store.clone(), Duration::from_millis(1000));
        (store, writer, doc.id)
    }

    #[tokio::test(start_paused = true)]
    async fn burst_is_written_once_with_merged_fields() {
        let (store, writer, id) = setup().await;

        writer.schedule(&id, DocumentPatch::content(Node::from_plain_text("draft")));
        tokio::time::sleep(Duration::from_millis(500)).await;
        writer.schedule(&id, DocumentPatch::last_read_position(4));
        tokio::time::sleep(Duration::from_millis(500)).await;
        writer.schedule(&id, DocumentPatch::last_read_position(9));

        tokio::time::sleep(Duration::from_millis(999)).await;
        assert_eq!(store.updates.load(Ordering::SeqCst), 0);

        tokio::time::sleep(Duration::from_millis(2)).await;
        assert_eq!(store.updates.load(Ordering::SeqCst), 1);
        assert!(!writer.has_pending());

        let doc = store.get(&id).await.unwrap().unwrap();
        assert_eq!(doc.last_read_position, 9);
        assert_eq!(doc.content, Node::from_plain_text("draft"));
    }

    #[tokio::test(start_paused = true)]
    async fn flush_writes_without_waiting() {
        let (store, writer, id) = setup().await;

        writer.schedule(&id, DocumentPatch::last_read_position(3));
        writer.flush().await;
        assert_eq!(store.updates.load(Ordering::SeqCst), 1);

        tokio::time::sleep(Duration::from_millis(2000)).await;
        assert_eq!(store.updates.load(Ordering::SeqCst), 1);
        assert_eq!(store.get(&id).await.unwrap().unwrap().last_read_position, 3);
    }

    #[tokio::test(start_paused = true)]
    async fn flush_waits_for_a_write_already_running() {
        let store = Arc::new(SlowStore {
            inner: CountingStore::default(),
            latency: Duration::from_millis(100),
        });
        let id = store.create("notes", Node::empty_doc()).await.unwrap().id;
        let writer = DebouncedWriter::new(store.clone(), Duration::from_millis(1000));

        writer.schedule(&id, DocumentPatch::last_read_position(7));
        tokio::time::sleep(Duration::from_millis(1010)).await;
        assert!(!writer.has_pending());
        assert_eq!(
            store.inner.get(&id).await.unwrap().unwrap().last_read_position,
            0
        );

        writer.flush().await;
        assert_eq!(
            store.inner.get(&id).await.unwrap().unwrap().last_read_position,
            7
        );
    }

    #[tokio::test(start_paused = true)]
    async fn documents_are_debounced_independently() {
        let (store, writer, first) = setup().await;
        let second = store
            .create("other", Node::empty_doc())
            .await
            .unwrap()
            .id;

        writer.schedule(&first, DocumentPatch::last_read_position(1));
        writer.schedule(&second, DocumentPatch::last_read_position(2));
        tokio::time::sleep(Duration::from_millis(1001)).await;

        assert_eq!(store.updates.load(Ordering::SeqCst), 2);
        assert_eq!(store.get(&first).await.unwrap().unwrap().last_read_position, 1);
        assert_eq!(store.get(&second).await.unwrap().unwrap().last_read_position, 2);
    }

    #[tokio::test(start_paused = true)]
    async fn failed_write_is_swallowed() {
        let (store, writer, id) = setup().await;

        writer.schedule("missing", DocumentPatch::last_read_position(1));
        tokio::time::sleep(Duration::from_millis(1001)).await;

        writer.schedule(&id, DocumentPatch::last_read_position(5));
        tokio::time::sleep(Duration::from_millis(1001)).await;

        assert_eq!(store.updates.load(Ordering::SeqCst), 2);
        assert_eq!(store.get(&id).await.unwrap().unwrap().last_read_position, 5);
    }
}

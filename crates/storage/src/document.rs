use std::collections::BTreeMap;
use std::future::Future;
use std::path::PathBuf;
use std::pin::Pin;

use chrono::{DateTime, Utc};
use hypr_tiptap::Node;
use tokio::sync::RwLock;

pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Document {
    pub id: String,
    pub name: String,
    pub content: Node,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    /// Char offset into the extracted plain text where reading resumes.
    #[serde(default)]
    pub last_read_position: usize,
    #[serde(default)]
    pub sort_order: i64,
}

/// Partial update. `None` fields are left untouched.
#[derive(Debug, Clone, Default, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct DocumentPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<Node>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_read_position: Option<usize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sort_order: Option<i64>,
}

impl DocumentPatch {
    pub fn last_read_position(position: usize) -> Self {
        Self {
            last_read_position: Some(position),
            ..Default::default()
        }
    }

    pub fn content(content: Node) -> Self {
        Self {
            content: Some(content),
            ..Default::default()
        }
    }

    pub fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.content.is_none()
            && self.last_read_position.is_none()
            && self.sort_order.is_none()
    }

    /// Combine with a later patch; fields set in `newer` win.
    pub fn merge(self, newer: DocumentPatch) -> DocumentPatch {
        DocumentPatch {
            name: newer.name.or(self.name),
            content: newer.content.or(self.content),
            last_read_position: newer.last_read_position.or(self.last_read_position),
            sort_order: newer.sort_order.or(self.sort_order),
        }
    }

    pub fn apply(self, doc: &mut Document, now: DateTime<Utc>) {
        if let Some(name) = self.name {
            doc.name = name;
        }
        if let Some(content) = self.content {
            doc.content = content;
        }
        if let Some(position) = self.last_read_position {
            doc.last_read_position = position;
        }
        if let Some(sort_order) = self.sort_order {
            doc.sort_order = sort_order;
        }
        doc.updated_at = now;
    }
}

/// Local document persistence.
///
/// Object-safe via the explicit [`BoxFuture`] return type, so callers can hold
/// an `Arc<dyn DocumentStore>`.
pub trait DocumentStore: Send + Sync + 'static {
    fn get<'a>(&'a self, id: &'a str) -> BoxFuture<'a, crate::Result<Option<Document>>>;

    /// All documents by `sort_order`, then creation time.
    fn list(&self) -> BoxFuture<'_, crate::Result<Vec<Document>>>;

    /// Appends a new document after the last one in the current order.
    fn create<'a>(&'a self, name: &'a str, content: Node) -> BoxFuture<'a, crate::Result<Document>>;

    fn update<'a>(
        &'a self,
        id: &'a str,
        patch: DocumentPatch,
    ) -> BoxFuture<'a, crate::Result<Document>>;
}

fn new_document(name: &str, content: Node, sort_order: i64) -> Document {
    let now = Utc::now();
    Document {
        id: uuid::Uuid::new_v4().to_string(),
        name: name.to_string(),
        content,
        created_at: now,
        updated_at: now,
        last_read_position: 0,
        sort_order,
    }
}

fn next_sort_order<'a>(docs: impl Iterator<Item = &'a Document>) -> i64 {
    docs.map(|d| d.sort_order).max().map_or(0, |max| max + 1)
}

fn sorted(mut docs: Vec<Document>) -> Vec<Document> {
    docs.sort_by(|a, b| {
        a.sort_order
            .cmp(&b.sort_order)
            .then(a.created_at.cmp(&b.created_at))
    });
    docs
}

#[derive(Default)]
pub struct MemoryStore {
    docs: RwLock<BTreeMap<String, Document>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl DocumentStore for MemoryStore {
    fn get<'a>(&'a self, id: &'a str) -> BoxFuture<'a, crate::Result<Option<Document>>> {
        Box::pin(async move { Ok(self.docs.read().await.get(id).cloned()) })
    }

    fn list(&self) -> BoxFuture<'_, crate::Result<Vec<Document>>> {
        Box::pin(async move { Ok(sorted(self.docs.read().await.values().cloned().collect())) })
    }

    fn create<'a>(&'a self, name: &'a str, content: Node) -> BoxFuture<'a, crate::Result<Document>> {
        Box::pin(async move {
            let mut docs = self.docs.write().await;
            let doc = new_document(name, content, next_sort_order(docs.values()));
            docs.insert(doc.id.clone(), doc.clone());
            Ok(doc)
        })
    }

    fn update<'a>(
        &'a self,
        id: &'a str,
        patch: DocumentPatch,
    ) -> BoxFuture<'a, crate::Result<Document>> {
        Box::pin(async move {
            let mut docs = self.docs.write().await;
            let doc = docs
                .get_mut(id)
                .ok_or_else(|| crate::Error::DocumentNotFound(id.to_string()))?;
            patch.apply(doc, Utc::now());
            Ok(doc.clone())
        })
    }
}

/// All documents in one JSON array, rewritten atomically on every change.
pub struct JsonFileStore {
    path: PathBuf,
    lock: RwLock<()>,
}

impl JsonFileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            lock: RwLock::new(()),
        }
    }

    async fn read_all(&self) -> crate::Result<Vec<Document>> {
        match crate::fs::read_if_exists(&self.path).await? {
            Some(content) => Ok(serde_json::from_str(&content)?),
            None => Ok(Vec::new()),
        }
    }

    async fn write_all(&self, docs: &[Document]) -> crate::Result<()> {
        let content = serde_json::to_string_pretty(docs)?;
        crate::fs::atomic_write_async(&self.path, &content).await?;
        Ok(())
    }
}

impl DocumentStore for JsonFileStore {
    fn get<'a>(&'a self, id: &'a str) -> BoxFuture<'a, crate::Result<Option<Document>>> {
        Box::pin(async move {
            let _guard = self.lock.read().await;
            Ok(self.read_all().await?.into_iter().find(|d| d.id == id))
        })
    }

    fn list(&self) -> BoxFuture<'_, crate::Result<Vec<Document>>> {
        Box::pin(async move {
            let _guard = self.lock.read().await;
            Ok(sorted(self.read_all().await?))
        })
    }

    fn create<'a>(&'a self, name: &'a str, content: Node) -> BoxFuture<'a, crate::Result<Document>> {
        Box::pin(async move {
            let _guard = self.lock.write().await;
            let mut docs = self.read_all().await?;
            let doc = new_document(name, content, next_sort_order(docs.iter()));
            docs.push(doc.clone());
            self.write_all(&docs).await?;
            Ok(doc)
        })
    }

    fn update<'a>(
        &'a self,
        id: &'a str,
        patch: DocumentPatch,
    ) -> BoxFuture<'a, crate::Result<Document>> {
        Box::pin(async move {
            let _guard = self.lock.write().await;
            let mut docs = self.read_all().await?;
            let doc = docs
                .iter_mut()
                .find(|d| d.id == id)
                .ok_or_else(|| crate::Error::DocumentNotFound(id.to_string()))?;
            patch.apply(doc, Utc::now());
            let updated = doc.clone();
            self.write_all(&docs).await?;
            Ok(updated)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn later_patch_fields_win() {
        let merged = DocumentPatch::content(Node::from_plain_text("draft"))
            .merge(DocumentPatch::last_read_position(4))
            .merge(DocumentPatch::last_read_position(9));

        assert_eq!(merged.last_read_position, Some(9));
        assert_eq!(merged.content, Some(Node::from_plain_text("draft")));
        assert!(merged.name.is_none());
        assert!(DocumentPatch::default().is_empty());
    }

    #[tokio::test]
    async fn memory_store_orders_by_sort_order() {
        let store = MemoryStore::new();
        let first = store.create("first", Node::empty_doc()).await.unwrap();
        let second = store.create("second", Node::empty_doc()).await.unwrap();
        assert_eq!(second.sort_order, first.sort_order + 1);

        store
            .update(
                &second.id,
                DocumentPatch {
                    sort_order: Some(-1),
                    ..Default::default()
                },
            )
            .await
            .unwrap();

        let names: Vec<_> = store
            .list()
            .await
            .unwrap()
            .into_iter()
            .map(|d| d.name)
            .collect();
        assert_eq!(names, ["second", "first"]);
    }

    #[tokio::test]
    async fn update_refreshes_timestamp_and_reports_missing() {
        let store = MemoryStore::new();
        let doc = store.create("notes", Node::empty_doc()).await.unwrap();

        let updated = store
            .update(&doc.id, DocumentPatch::last_read_position(12))
            .await
            .unwrap();
        assert_eq!(updated.last_read_position, 12);
        assert!(updated.updated_at >= doc.updated_at);

        let err = store
            .update("missing", DocumentPatch::last_read_position(1))
            .await
            .unwrap_err();
        assert!(matches!(err, crate::Error::DocumentNotFound(id) if id == "missing"));
    }

    #[tokio::test]
    async fn json_file_store_persists_across_instances() {
        let temp = tempdir().unwrap();
        let path = crate::global::compute_documents_path(temp.path());

        let doc = {
            let store = JsonFileStore::new(&path);
            let doc = store
                .create("chapter", Node::from_plain_text("Once upon a time"))
                .await
                .unwrap();
            store
                .update(&doc.id, DocumentPatch::last_read_position(5))
                .await
                .unwrap();
            doc
        };

        let reopened = JsonFileStore::new(&path);
        let loaded = reopened.get(&doc.id).await.unwrap().unwrap();
        assert_eq!(loaded.name, "chapter");
        assert_eq!(loaded.last_read_position, 5);
        assert_eq!(loaded.content, Node::from_plain_text("Once upon a time"));
    }

    #[tokio::test]
    async fn json_file_store_starts_empty() {
        let temp = tempdir().unwrap();
        let store = JsonFileStore::new(temp.path().join("documents.json"));
        assert!(store.list().await.unwrap().is_empty());
        assert!(store.get("nope").await.unwrap().is_none());
    }
}

use std::path::Path;

use hypr_storage::{Document, DocumentPatch, DocumentStore};
use hypr_tiptap::Node;

use super::Context;

/// Store the file as a document named after its stem. A document with the
/// same name is refreshed instead of duplicated.
pub async fn import(ctx: &Context, path: &Path) -> anyhow::Result<Document> {
    let raw = tokio::fs::read_to_string(path).await?;
    let content = match path.extension().and_then(|e| e.to_str()) {
        Some("json") => Node::from_json(&raw)?,
        _ => Node::from_plain_text(&raw),
    };
    let name = path
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("untitled");

    let existing = ctx
        .documents
        .list()
        .await?
        .into_iter()
        .find(|d| d.name == name);

    let doc = match existing {
        Some(doc) if doc.content == content => doc,
        Some(doc) => {
            tracing::info!(document_id = %doc.id, "document_content_refreshed");
            ctx.documents
                .update(&doc.id, DocumentPatch::content(content))
                .await?
        }
        None => ctx.documents.create(name, content).await?,
    };
    Ok(doc)
}

pub async fn add(ctx: &Context, path: &Path) -> anyhow::Result<()> {
    let doc = import(ctx, path).await?;
    println!("{}\t{}", doc.id, doc.name);
    Ok(())
}

pub async fn list(ctx: &Context) -> anyhow::Result<()> {
    for doc in ctx.documents.list().await? {
        let len = hypr_word_index::char_len(&hypr_tiptap::extract_plain_text(&doc.content));
        println!(
            "{}\t{}\t{}/{}\t{}",
            doc.id,
            doc.name,
            doc.last_read_position,
            len,
            doc.updated_at.format("%Y-%m-%d %H:%M")
        );
    }
    Ok(())
}

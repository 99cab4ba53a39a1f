use hypr_word_index::char_len;

/// Non-text nodes that take a single position and carry no text.
const LEAF_TYPES: &[&str] = &["hardBreak", "horizontalRule", "image"];

/// One node of a Tiptap (ProseMirror) JSON document.
#[derive(Debug, Clone, Default, PartialEq, serde::Serialize, serde::Deserialize)]
#[cfg_attr(feature = "specta", derive(specta::Type))]
pub struct Node {
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub attrs: Option<serde_json::Value>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub content: Vec<Node>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub marks: Vec<Mark>,
}

#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
#[cfg_attr(feature = "specta", derive(specta::Type))]
pub struct Mark {
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub attrs: Option<serde_json::Value>,
}

impl Node {
    pub fn empty_doc() -> Self {
        Self {
            kind: "doc".to_string(),
            ..Default::default()
        }
    }

    pub fn from_json(json: &str) -> crate::Result<Self> {
        let node: Node = serde_json::from_str(json)?;
        if node.kind != "doc" {
            return Err(crate::Error::NotADocument(node.kind));
        }
        Ok(node)
    }

    pub fn to_json(&self) -> crate::Result<String> {
        Ok(serde_json::to_string(self)?)
    }

    /// One paragraph per input line. Blank lines become empty paragraphs.
    pub fn from_plain_text(text: &str) -> Self {
        let content = text
            .lines()
            .map(|line| Node {
                kind: "paragraph".to_string(),
                content: if line.is_empty() {
                    vec![]
                } else {
                    vec![Node::text(line)]
                },
                ..Default::default()
            })
            .collect();

        Self {
            kind: "doc".to_string(),
            content,
            ..Default::default()
        }
    }

    pub fn text(text: impl Into<String>) -> Self {
        Self {
            kind: "text".to_string(),
            text: Some(text.into()),
            ..Default::default()
        }
    }

    pub fn is_text(&self) -> bool {
        self.text.is_some()
    }

    pub fn is_leaf(&self) -> bool {
        self.is_text() || LEAF_TYPES.contains(&self.kind.as_str())
    }

    /// Size in ProseMirror positions.
    pub fn node_size(&self) -> usize {
        match &self.text {
            Some(text) => char_len(text),
            None if self.is_leaf() => 1,
            None => 2 + self.content_size(),
        }
    }

    pub fn content_size(&self) -> usize {
        self.content.iter().map(Node::node_size).sum()
    }

    /// Visit every non-empty text node with its starting position.
    ///
    /// `pos` is the position where this node's content begins (0 for the
    /// document itself).
    pub(crate) fn walk_text<'a>(&'a self, pos: usize, visit: &mut impl FnMut(usize, &'a str)) {
        let mut cursor = pos;
        for child in &self.content {
            match &child.text {
                Some(text) if !text.is_empty() => visit(cursor, text),
                Some(_) => {}
                None if child.is_leaf() => {}
                None => child.walk_text(cursor + 1, visit),
            }
            cursor += child.node_size();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_json_rejects_non_documents() {
        let err = Node::from_json(r#"{"type":"paragraph"}"#).unwrap_err();
        assert!(matches!(err, crate::Error::NotADocument(kind) if kind == "paragraph"));
        assert!(matches!(
            Node::from_json("{not json").unwrap_err(),
            crate::Error::Json(_)
        ));
    }

    #[test]
    fn node_sizes_follow_prosemirror() {
        let doc = Node::from_plain_text("Hello\n\nworld");
        // paragraph("Hello") = 7, empty paragraph = 2, paragraph("world") = 7
        assert_eq!(doc.content_size(), 16);
        assert_eq!(Node::text("héllo").node_size(), 5);
    }

    #[test]
    fn json_round_trip_keeps_marks() {
        let json = r#"{"type":"doc","content":[{"type":"paragraph","content":[{"type":"text","text":"hi","marks":[{"type":"bold"}]}]}]}"#;
        let doc = Node::from_json(json).unwrap();
        assert_eq!(doc.content[0].content[0].marks[0].kind, "bold");
        assert_eq!(doc.to_json().unwrap(), json);
    }
}

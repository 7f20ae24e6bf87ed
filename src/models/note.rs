use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// List entry returned by the notes index endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NoteSummary {
    pub id: String,
    pub title: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Note {
    pub id: String,
    pub title: String,
    #[serde(default, rename = "notebookId")]
    pub notebook_id: Option<String>,
    #[serde(default)]
    pub blocks: Vec<Block>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Serialize)]
pub struct NewNote {
    #[serde(rename = "notebookId")]
    pub notebook_id: String,
    pub title: String,
    pub blocks: Vec<Block>,
}

#[derive(Debug, Clone, Serialize)]
pub struct NoteUpdate {
    pub title: String,
    pub blocks: Vec<Block>,
}

/// One node of a note document. Blocks nest through `children`; the
/// block kind and per-kind props are kept as loose JSON so unknown
/// editor blocks survive a round trip untouched.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Block {
    pub id: String,
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default, skip_serializing_if = "serde_json::Map::is_empty")]
    pub props: serde_json::Map<String, serde_json::Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<BlockContent>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<Block>,
}

/// Most blocks carry a flat run of inline content; table blocks carry
/// a row structure instead.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum BlockContent {
    Inline(Vec<InlineContent>),
    Table(TableContent),
}

/// Inline items are discriminated structurally: links carry `href`,
/// plain runs carry `text`, and anything else falls through to the
/// permissive variant, which must stay last.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum InlineContent {
    Link(LinkContent),
    Text(StyledText),
    Custom(CustomInline),
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StyledText {
    #[serde(rename = "type")]
    pub kind: String,
    pub text: String,
    #[serde(default, skip_serializing_if = "serde_json::Map::is_empty")]
    pub styles: serde_json::Map<String, serde_json::Value>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LinkContent {
    #[serde(rename = "type")]
    pub kind: String,
    pub content: Vec<StyledText>,
    pub href: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CustomInline {
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default, skip_serializing_if = "serde_json::Map::is_empty")]
    pub props: serde_json::Map<String, serde_json::Value>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub content: Vec<StyledText>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TableContent {
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default)]
    pub rows: Vec<TableRow>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TableRow {
    #[serde(default)]
    pub cells: Vec<Vec<InlineContent>>,
}

impl StyledText {
    pub fn plain(text: &str) -> Self {
        Self {
            kind: "text".to_string(),
            text: text.to_string(),
            styles: serde_json::Map::new(),
        }
    }
}

impl InlineContent {
    pub fn text(&self) -> String {
        match self {
            InlineContent::Link(link) => {
                link.content.iter().map(|t| t.text.as_str()).collect()
            }
            InlineContent::Text(run) => run.text.clone(),
            InlineContent::Custom(custom) => {
                custom.content.iter().map(|t| t.text.as_str()).collect()
            }
        }
    }
}

impl Block {
    /// A fresh paragraph block. Block ids are assigned client-side by
    /// the editor; the backend stores documents opaquely.
    pub fn paragraph(text: &str) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            kind: "paragraph".to_string(),
            props: serde_json::Map::new(),
            content: Some(BlockContent::Inline(vec![InlineContent::Text(
                StyledText::plain(text),
            )])),
            children: Vec::new(),
        }
    }

    pub fn plain_text(&self) -> String {
        let mut lines = Vec::new();
        self.collect_text(&mut lines);
        lines.join("\n")
    }

    fn collect_text(&self, lines: &mut Vec<String>) {
        match &self.content {
            Some(BlockContent::Inline(items)) => {
                lines.push(items.iter().map(|i| i.text()).collect::<String>());
            }
            Some(BlockContent::Table(table)) => {
                for row in &table.rows {
                    let cells: Vec<String> = row
                        .cells
                        .iter()
                        .map(|cell| cell.iter().map(|i| i.text()).collect::<String>())
                        .collect();
                    lines.push(cells.join(" | "));
                }
            }
            None => {}
        }
        for child in &self.children {
            child.collect_text(lines);
        }
    }
}

impl Note {
    pub fn plain_text(&self) -> String {
        self.blocks
            .iter()
            .map(|b| b.plain_text())
            .filter(|s| !s.is_empty())
            .collect::<Vec<_>>()
            .join("\n")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn inline_content_discriminates_on_shape() {
        let json = r#"[
            {"type": "text", "text": "see ", "styles": {}},
            {"type": "link", "content": [{"type": "text", "text": "here", "styles": {"bold": true}}], "href": "https://example.com"},
            {"type": "mention", "props": {"user": "ada"}}
        ]"#;
        let items: Vec<InlineContent> = serde_json::from_str(json).unwrap();
        assert!(matches!(items[0], InlineContent::Text(_)));
        assert!(matches!(items[1], InlineContent::Link(_)));
        assert!(matches!(items[2], InlineContent::Custom(_)));
        assert_eq!(items[1].text(), "here");
    }

    #[test]
    fn block_tree_flattens_to_plain_text() {
        let json = r#"{
            "id": "b1",
            "type": "bulletListItem",
            "content": [{"type": "text", "text": "top", "styles": {}}],
            "children": [{
                "id": "b2",
                "type": "paragraph",
                "content": [{"type": "text", "text": "nested", "styles": {}}]
            }]
        }"#;
        let block: Block = serde_json::from_str(json).unwrap();
        assert_eq!(block.plain_text(), "top\nnested");
    }

    #[test]
    fn table_content_parses_rows() {
        let json = r#"{
            "id": "t1",
            "type": "table",
            "content": {
                "type": "tableContent",
                "rows": [{"cells": [
                    [{"type": "text", "text": "a", "styles": {}}],
                    [{"type": "text", "text": "b", "styles": {}}]
                ]}]
            }
        }"#;
        let block: Block = serde_json::from_str(json).unwrap();
        assert_eq!(block.plain_text(), "a | b");
    }

    #[test]
    fn paragraph_helper_matches_editor_shape() {
        let block = Block::paragraph("hello");
        let value = serde_json::to_value(&block).unwrap();
        assert_eq!(value["type"], "paragraph");
        assert_eq!(value["content"][0]["type"], "text");
        assert_eq!(value["content"][0]["text"], "hello");
        assert!(!value["id"].as_str().unwrap().is_empty());
    }
}

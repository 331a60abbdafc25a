//! HTML parsing into flat node records the script prelude rebuilds as live nodes.

use std::collections::HashMap;

use scraper::{ElementRef, Html, Node};
use serde::Serialize;
use tracing::debug;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum NodeKind {
    Element,
    Text,
}

/// One parsed node. Records are in document order, so a parent always
/// precedes its children and the prelude can attach them in a single pass.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NodeRecord {
    /// Index of the parent record; `None` for the `<html>` root.
    pub parent: Option<usize>,
    pub kind: NodeKind,
    /// Lowercase tag name, empty for text.
    pub name: String,
    pub attrs: Vec<(String, String)>,
    /// Character data, empty for elements.
    pub text: String,
}

impl NodeRecord {
    fn element(parent: Option<usize>, name: &str, attrs: Vec<(String, String)>) -> Self {
        Self {
            parent,
            kind: NodeKind::Element,
            name: name.to_string(),
            attrs,
            text: String::new(),
        }
    }

    fn text(parent: Option<usize>, text: &str) -> Self {
        Self {
            parent,
            kind: NodeKind::Text,
            name: String::new(),
            attrs: Vec::new(),
            text: text.to_string(),
        }
    }

    pub fn attr(&self, key: &str) -> Option<&str> {
        self.attrs
            .iter()
            .find(|(name, _)| name == key)
            .map(|(_, value)| value.as_str())
    }
}

/// A classic inline `<script>` found in document order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InlineScript {
    /// Position among all `<script>` elements, including skipped ones.
    pub index: usize,
    pub source: String,
}

#[derive(Debug, Clone)]
pub struct ParsedDocument {
    /// Every element and text node under `<html>` (which html5ever always
    /// synthesizes), root first.
    pub nodes: Vec<NodeRecord>,
    pub scripts: Vec<InlineScript>,
}

const SCRIPT_TYPES: &[&str] = &[
    "",
    "text/javascript",
    "application/javascript",
    "text/ecmascript",
    "application/ecmascript",
    "application/x-javascript",
];

pub fn parse_document(html: &str) -> ParsedDocument {
    let document = Html::parse_document(html);
    let mut nodes = Vec::new();
    let mut positions: HashMap<_, usize> = HashMap::new();
    let mut scripts = Vec::new();
    let mut script_count = 0;

    for node in document.root_element().descendants() {
        let parent = node
            .parent()
            .and_then(|parent| positions.get(&parent.id()).copied());

        let record = match node.value() {
            Node::Element(element) => {
                let attrs = element
                    .attrs()
                    .map(|(name, value)| (name.to_string(), value.to_string()))
                    .collect();
                NodeRecord::element(parent, element.name(), attrs)
            }
            Node::Text(text) => {
                let text: &str = text;
                NodeRecord::text(parent, text)
            }
            _ => continue,
        };

        if record.kind == NodeKind::Element && record.name == "script" {
            let source = ElementRef::wrap(node)
                .map(|element| element.text().collect::<String>())
                .unwrap_or_default();
            if let Some(script) = classic_script(&record, script_count, source) {
                scripts.push(script);
            }
            script_count += 1;
        }

        positions.insert(node.id(), nodes.len());
        nodes.push(record);
    }

    ParsedDocument { nodes, scripts }
}

fn classic_script(record: &NodeRecord, index: usize, source: String) -> Option<InlineScript> {
    if let Some(src) = record.attr("src") {
        debug!(index, src, "external script not fetched");
        return None;
    }
    let kind = record.attr("type").unwrap_or("").trim().to_ascii_lowercase();
    if !SCRIPT_TYPES.contains(&kind.as_str()) {
        debug!(index, kind = %kind, "non-classic script skipped");
        return None;
    }
    Some(InlineScript { index, source })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn child_names(nodes: &[NodeRecord], parent: usize) -> Vec<&str> {
        nodes
            .iter()
            .filter(|node| node.parent == Some(parent) && node.kind == NodeKind::Element)
            .map(|node| node.name.as_str())
            .collect()
    }

    #[test]
    fn synthesizes_html_head_body() {
        let parsed = parse_document("<p>hi</p>");
        assert_eq!(parsed.nodes[0].name, "html");
        assert_eq!(parsed.nodes[0].parent, None);
        assert_eq!(child_names(&parsed.nodes, 0), vec!["head", "body"]);
    }

    #[test]
    fn keeps_attributes_and_text() {
        let parsed = parse_document(r#"<body><div id="greeting" class="big">hello</div></body>"#);
        let div = parsed.nodes.iter().position(|n| n.name == "div").unwrap();
        assert_eq!(parsed.nodes[div].attr("id"), Some("greeting"));
        assert_eq!(parsed.nodes[div].attr("class"), Some("big"));

        let text = &parsed.nodes[div + 1];
        assert_eq!(text.kind, NodeKind::Text);
        assert_eq!(text.text, "hello");
        assert_eq!(text.parent, Some(div));
    }

    #[test]
    fn parents_precede_children() {
        let parsed = parse_document(
            "<body><nav><ul><li><a href='/'>Home</a></li><li><span>x</span></li></ul></nav></body>",
        );
        for (index, node) in parsed.nodes.iter().enumerate() {
            if let Some(parent) = node.parent {
                assert!(parent < index);
                assert_eq!(parsed.nodes[parent].kind, NodeKind::Element);
            }
        }
        let ul = parsed.nodes.iter().position(|n| n.name == "ul").unwrap();
        assert_eq!(child_names(&parsed.nodes, ul), vec!["li", "li"]);
    }

    #[test]
    fn deep_nesting_stays_flat() {
        let depth = 500;
        let html = format!("<body>{}x{}</body>", "<div>".repeat(depth), "</div>".repeat(depth));
        let parsed = parse_document(&html);
        let divs = parsed.nodes.iter().filter(|n| n.name == "div").count();
        assert_eq!(divs, depth);

        let json = serde_json::to_string(&parsed.nodes).unwrap();
        assert!(json.starts_with(r#"[{"parent":null,"kind":"element","name":"html""#));
    }

    #[test]
    fn collects_inline_scripts_in_order() {
        let parsed = parse_document(
            r#"<head><script>var a = 1;</script></head>
               <body><script src="app.js"></script><script type="text/javascript">var b = 2;</script></body>"#,
        );
        assert_eq!(
            parsed.scripts,
            vec![
                InlineScript {
                    index: 0,
                    source: "var a = 1;".into()
                },
                InlineScript {
                    index: 2,
                    source: "var b = 2;".into()
                },
            ]
        );
    }

    #[test]
    fn skips_non_classic_scripts() {
        let parsed = parse_document(
            r#"<script type="module">import x from './x.js';</script>
               <script type="application/json">{"a":1}</script>"#,
        );
        assert!(parsed.scripts.is_empty());
    }
}

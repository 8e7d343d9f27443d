use serde::{Deserialize, Serialize};

/// Span information for locating a node in the serialized markup
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Span {
    pub start: usize,
    pub end: usize,
    pub id: String,
}

impl Span {
    pub fn new(start: usize, end: usize, id: String) -> Self {
        Self { start, end, id }
    }

    /// Span for a node created by the editor rather than the parser
    pub fn synthetic(id: String) -> Self {
        Self { start: 0, end: 0, id }
    }
}

/// A single attribute on an element, order-preserving
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Attribute {
    pub name: String,
    pub value: String,
}

impl Attribute {
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
        }
    }
}

/// Class marker identifying a stitch-reference span
pub const STITCH_REF_CLASS: &str = "stitch-ref";

/// Attribute carrying the referenced stitch id
pub const STITCH_ID_ATTR: &str = "data-stitch-id";

/// Root of a parsed instructions fragment
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Fragment {
    pub nodes: Vec<Node>,
}

/// Content model node
///
/// Text, images and stitch references are the typed entities of the dialect;
/// everything else (formatting wrappers, unknown tags) passes through as a
/// generic `Element` so that foreign-but-harmless markup survives a
/// round trip untouched.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Node {
    /// Plain text node (entity-decoded)
    Text { content: String, span: Span },

    /// Inline image (`<img>`); `src` is extracted from the attributes
    Image {
        src: String,
        attributes: Vec<Attribute>,
        span: Span,
    },

    /// Atomic, non-editable stitch reference. `label` is a frozen copy of
    /// the stitch name at insertion time; it is never re-resolved.
    StitchRef {
        stitch_id: i64,
        label: String,
        attributes: Vec<Attribute>,
        span: Span,
    },

    /// Any other element, passed through verbatim
    Element {
        tag: String,
        attributes: Vec<Attribute>,
        children: Vec<Node>,
        span: Span,
    },
}

impl Node {
    pub fn text(content: impl Into<String>, span: Span) -> Self {
        Node::Text {
            content: content.into(),
            span,
        }
    }

    /// Image node the way the editor inserts one
    pub fn image(src: impl Into<String>, span: Span) -> Self {
        let src = src.into();
        Node::Image {
            attributes: vec![
                Attribute::new("src", src.clone()),
                Attribute::new("alt", "Pattern step"),
            ],
            src,
            span,
        }
    }

    /// Stitch-reference node the way the editor inserts one
    pub fn stitch_ref(stitch_id: i64, label: impl Into<String>, span: Span) -> Self {
        Node::StitchRef {
            stitch_id,
            label: label.into(),
            attributes: vec![
                Attribute::new("class", STITCH_REF_CLASS),
                Attribute::new(STITCH_ID_ATTR, stitch_id.to_string()),
                Attribute::new("contenteditable", "false"),
            ],
            span,
        }
    }

    pub fn element(tag: impl Into<String>, span: Span) -> Self {
        Node::Element {
            tag: tag.into(),
            attributes: Vec::new(),
            children: Vec::new(),
            span,
        }
    }

    pub fn span(&self) -> &Span {
        match self {
            Node::Text { span, .. }
            | Node::Image { span, .. }
            | Node::StitchRef { span, .. }
            | Node::Element { span, .. } => span,
        }
    }

    pub fn children(&self) -> Option<&Vec<Node>> {
        match self {
            Node::Element { children, .. } => Some(children),
            _ => None,
        }
    }

    pub fn children_mut(&mut self) -> Option<&mut Vec<Node>> {
        match self {
            Node::Element { children, .. } => Some(children),
            _ => None,
        }
    }
}

/// Tags serialized without a closing tag
pub fn is_void_tag(tag: &str) -> bool {
    matches!(tag, "img" | "br" | "hr" | "input" | "wbr")
}

impl Fragment {
    pub fn new() -> Self {
        Self { nodes: Vec::new() }
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Visible text of the fragment, as a reader would see it.
    /// Stitch references contribute their frozen label.
    pub fn visible_text(&self) -> String {
        fn walk(nodes: &[Node], out: &mut String) {
            for node in nodes {
                match node {
                    Node::Text { content, .. } => out.push_str(content),
                    Node::StitchRef { label, .. } => out.push_str(label),
                    Node::Image { .. } => {}
                    Node::Element { tag, children, .. } => {
                        if tag == "br" {
                            out.push('\n');
                        }
                        walk(children, out);
                    }
                }
            }
        }
        let mut out = String::new();
        walk(&self.nodes, &mut out);
        out
    }

    /// Stitch ids referenced anywhere in the fragment, in document order
    pub fn stitch_ids(&self) -> Vec<i64> {
        fn walk(nodes: &[Node], out: &mut Vec<i64>) {
            for node in nodes {
                match node {
                    Node::StitchRef { stitch_id, .. } => out.push(*stitch_id),
                    Node::Element { children, .. } => walk(children, out),
                    _ => {}
                }
            }
        }
        let mut out = Vec::new();
        walk(&self.nodes, &mut out);
        out
    }
}

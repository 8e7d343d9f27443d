//! Read-only rendering of pattern instructions. The stored markup is parsed
//! back into the content model and lowered to a display tree; stitch
//! references resolve their tooltip against the pattern's stitch snapshot.

use serde::Serialize;
use yarnbook_markup::{parse, Fragment, Node};
use yarnbook_store::{Pattern, Stitch};

/// Tooltip shown when a referenced stitch has no description (or the stitch
/// is gone from the snapshot)
pub const NO_DESCRIPTION: &str = "No description available.";

/// Display tree for the instructions area
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type")]
pub enum RenderNode {
    Text {
        content: String,
    },
    Image {
        src: String,
    },
    /// Shown as the frozen label with a hover tooltip
    StitchRef {
        stitch_id: i64,
        label: String,
        tooltip: String,
    },
    Element {
        tag: String,
        children: Vec<RenderNode>,
    },
}

/// Render a pattern's instructions. Markup that no longer parses degrades
/// to its raw text instead of a blank page.
pub fn render_instructions(pattern: &Pattern) -> Vec<RenderNode> {
    match parse(&pattern.instructions) {
        Ok(fragment) => render_fragment(&fragment, &pattern.stitches),
        Err(_) => vec![RenderNode::Text {
            content: pattern.instructions.clone(),
        }],
    }
}

pub fn render_fragment(fragment: &Fragment, stitches: &[Stitch]) -> Vec<RenderNode> {
    fragment
        .nodes
        .iter()
        .map(|node| render_node(node, stitches))
        .collect()
}

fn render_node(node: &Node, stitches: &[Stitch]) -> RenderNode {
    match node {
        Node::Text { content, .. } => RenderNode::Text {
            content: content.clone(),
        },
        Node::Image { src, .. } => RenderNode::Image { src: src.clone() },
        Node::StitchRef {
            stitch_id, label, ..
        } => RenderNode::StitchRef {
            stitch_id: *stitch_id,
            label: label.clone(),
            tooltip: tooltip_for(*stitch_id, stitches),
        },
        Node::Element { tag, children, .. } => RenderNode::Element {
            tag: tag.clone(),
            children: children
                .iter()
                .map(|child| render_node(child, stitches))
                .collect(),
        },
    }
}

fn tooltip_for(stitch_id: i64, stitches: &[Stitch]) -> String {
    stitches
        .iter()
        .find(|s| s.id == stitch_id)
        .map(|s| s.description.trim())
        .filter(|d| !d.is_empty())
        .map(str::to_string)
        .unwrap_or_else(|| NO_DESCRIPTION.to_string())
}

use crate::ast::*;

/// Visitor pattern for traversing fragment nodes immutably
///
/// Default implementations walk the entire tree; override specific
/// visit_* methods to act on the node kinds you care about.
pub trait Visitor: Sized {
    fn visit_fragment(&mut self, fragment: &Fragment) {
        walk_fragment(self, fragment);
    }

    fn visit_text(&mut self, _content: &str, _span: &Span) {
        // Leaf node, no children to walk
    }

    fn visit_image(&mut self, _src: &str, _attributes: &[Attribute], _span: &Span) {
        // Leaf node, no children to walk
    }

    fn visit_stitch_ref(&mut self, _stitch_id: i64, _label: &str, _span: &Span) {
        // Leaf node, no children to walk
    }

    fn visit_element(&mut self, element: &Node) {
        walk_element(self, element);
    }
}

pub fn walk_fragment<V: Visitor>(visitor: &mut V, fragment: &Fragment) {
    for node in &fragment.nodes {
        walk_node(visitor, node);
    }
}

pub fn walk_node<V: Visitor>(visitor: &mut V, node: &Node) {
    match node {
        Node::Text { content, span } => visitor.visit_text(content, span),
        Node::Image {
            src,
            attributes,
            span,
        } => visitor.visit_image(src, attributes, span),
        Node::StitchRef {
            stitch_id,
            label,
            span,
            ..
        } => visitor.visit_stitch_ref(*stitch_id, label, span),
        Node::Element { .. } => visitor.visit_element(node),
    }
}

pub fn walk_element<V: Visitor>(visitor: &mut V, element: &Node) {
    if let Node::Element { children, .. } = element {
        for child in children {
            walk_node(visitor, child);
        }
    }
}

//! Caret addressing and structural insertion for the instructions fragment.
//!
//! A caret addresses one slot in the node tree: the child-index path from the
//! fragment root, plus a character offset when the addressed node is text.
//! The last path index may equal the sibling count, meaning "after the last
//! sibling".

use yarnbook_markup::{Fragment, IdGenerator, Node, Span};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Caret {
    /// Child indices from the fragment root down to the addressed node
    pub path: Vec<usize>,
    /// Character offset within the addressed text node; 0 otherwise
    pub offset: usize,
}

impl Caret {
    pub fn new(path: Vec<usize>, offset: usize) -> Self {
        Self { path, offset }
    }

    /// Caret after the last top-level node
    pub fn at_end(fragment: &Fragment) -> Self {
        Self {
            path: vec![fragment.nodes.len()],
            offset: 0,
        }
    }
}

fn byte_at_char(s: &str, chars: usize) -> usize {
    s.char_indices()
        .nth(chars)
        .map(|(i, _)| i)
        .unwrap_or(s.len())
}

/// Sibling list containing the addressed node. All but the last path index
/// must resolve to elements.
fn sibling_list_mut<'a>(fragment: &'a mut Fragment, path: &[usize]) -> Option<&'a mut Vec<Node>> {
    let mut list = &mut fragment.nodes;
    let Some((_, ancestors)) = path.split_last() else {
        return None;
    };
    for &index in ancestors {
        list = list.get_mut(index)?.children_mut()?;
    }
    Some(list)
}

/// Insert `node` at the caret, splitting the addressed text node when the
/// caret sits strictly inside it. Returns the caret after the insertion, or
/// `None` when the caret no longer addresses a valid slot.
pub fn insert_node(
    fragment: &mut Fragment,
    caret: &Caret,
    node: Node,
    ids: &mut IdGenerator,
) -> Option<Caret> {
    let list = sibling_list_mut(fragment, &caret.path)?;
    let index = *caret.path.last()?;
    if index > list.len() {
        return None;
    }

    let mut after = caret.clone();
    if let Some(Node::Text { content, .. }) = list.get_mut(index) {
        let char_count = content.chars().count();
        if caret.offset > 0 && caret.offset < char_count {
            let split = byte_at_char(content, caret.offset);
            let tail = content.split_off(split);
            list.insert(index + 1, node);
            list.insert(index + 2, Node::text(tail, Span::synthetic(ids.new_id())));
            *after.path.last_mut().unwrap() = index + 2;
            after.offset = 0;
            return Some(after);
        }
        if caret.offset >= char_count && char_count > 0 {
            list.insert(index + 1, node);
            *after.path.last_mut().unwrap() = index + 2;
            after.offset = 0;
            return Some(after);
        }
    }

    // Caret before the addressed node (or at the append slot)
    list.insert(index, node);
    *after.path.last_mut().unwrap() = index + 1;
    after.offset = 0;
    Some(after)
}

/// Insert plain text at the caret, splicing into the addressed text node or
/// merging with the preceding one rather than creating fragmented runs.
pub fn insert_text(
    fragment: &mut Fragment,
    caret: &Caret,
    text: &str,
    ids: &mut IdGenerator,
) -> Option<Caret> {
    if text.is_empty() {
        return Some(caret.clone());
    }
    let list = sibling_list_mut(fragment, &caret.path)?;
    let index = *caret.path.last()?;
    if index > list.len() {
        return None;
    }

    let inserted_chars = text.chars().count();
    let mut after = caret.clone();

    if let Some(Node::Text { content, .. }) = list.get_mut(index) {
        let split = byte_at_char(content, caret.offset);
        content.insert_str(split, text);
        after.offset = caret.offset + inserted_chars;
        return Some(after);
    }

    if index > 0 {
        if let Some(Node::Text { content, .. }) = list.get_mut(index - 1) {
            let existing_chars = content.chars().count();
            content.push_str(text);
            *after.path.last_mut().unwrap() = index - 1;
            after.offset = existing_chars + inserted_chars;
            return Some(after);
        }
    }

    list.insert(index, Node::text(text, Span::synthetic(ids.new_id())));
    after.offset = inserted_chars;
    Some(after)
}

#[cfg(test)]
mod tests {
    use super::*;
    use yarnbook_markup::parse;

    fn ids() -> IdGenerator {
        IdGenerator::new("caret-test")
    }

    #[test]
    fn test_insert_inside_text_splits_the_run() {
        let mut fragment = parse("chain twelve").unwrap();
        let caret = Caret::new(vec![0], 6);
        let mut gen = ids();

        let node = Node::image("https://img.test/a.png", Span::synthetic(gen.new_id()));
        let after = insert_node(&mut fragment, &caret, node, &mut gen).unwrap();

        assert_eq!(fragment.nodes.len(), 3);
        assert!(matches!(&fragment.nodes[0], Node::Text { content, .. } if content == "chain "));
        assert!(matches!(&fragment.nodes[1], Node::Image { .. }));
        assert!(matches!(&fragment.nodes[2], Node::Text { content, .. } if content == "twelve"));
        assert_eq!(after, Caret::new(vec![2], 0));
    }

    #[test]
    fn test_insert_at_text_end_goes_after_the_node() {
        let mut fragment = parse("row 1").unwrap();
        let caret = Caret::new(vec![0], 5);
        let mut gen = ids();

        let node = Node::stitch_ref(7, "sc", Span::synthetic(gen.new_id()));
        let after = insert_node(&mut fragment, &caret, node, &mut gen).unwrap();

        assert!(matches!(&fragment.nodes[1], Node::StitchRef { stitch_id: 7, .. }));
        assert_eq!(after, Caret::new(vec![2], 0));
    }

    #[test]
    fn test_insert_text_merges_with_preceding_run() {
        let mut fragment = parse("turn").unwrap();
        let caret = Caret::at_end(&fragment);
        let mut gen = ids();

        let after = insert_text(&mut fragment, &caret, ", repeat", &mut gen).unwrap();

        assert_eq!(fragment.nodes.len(), 1);
        assert_eq!(fragment.visible_text(), "turn, repeat");
        assert_eq!(after, Caret::new(vec![0], 12));
    }

    #[test]
    fn test_insert_text_into_empty_fragment() {
        let mut fragment = Fragment::new();
        let caret = Caret::at_end(&fragment);
        let mut gen = ids();

        let after = insert_text(&mut fragment, &caret, "begin", &mut gen).unwrap();

        assert_eq!(fragment.visible_text(), "begin");
        assert_eq!(after.offset, 5);
    }

    #[test]
    fn test_stale_caret_is_rejected() {
        let mut fragment = parse("x").unwrap();
        let caret = Caret::new(vec![5], 0);
        let mut gen = ids();

        let node = Node::text("y", Span::synthetic(gen.new_id()));
        assert!(insert_node(&mut fragment, &caret, node, &mut gen).is_none());
    }

    #[test]
    fn test_insert_descends_into_elements() {
        let mut fragment = parse("<b>bold run</b>").unwrap();
        let caret = Caret::new(vec![0, 0], 4);
        let mut gen = ids();

        let node = Node::stitch_ref(3, "dc", Span::synthetic(gen.new_id()));
        let after = insert_node(&mut fragment, &caret, node, &mut gen).unwrap();

        let children = fragment.nodes[0].children().unwrap();
        assert_eq!(children.len(), 3);
        assert!(matches!(&children[1], Node::StitchRef { stitch_id: 3, .. }));
        assert_eq!(after, Caret::new(vec![0, 2], 0));
    }
}

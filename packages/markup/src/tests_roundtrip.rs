//! Round-trip tests for the content model: the serialized form of any
//! fragment built from text and stitch-reference insertions must parse back
//! to the same ordered text/stitch sequence.

use crate::ast::{Fragment, Node, Span};
use crate::parser::parse;
use crate::serializer::serialize;

fn synthetic(id: &str) -> Span {
    Span::synthetic(id.to_string())
}

/// Flatten a fragment into the (text, stitch-id) event sequence the
/// round-trip law is stated over
fn event_sequence(fragment: &Fragment) -> Vec<(String, Option<i64>)> {
    fn walk(nodes: &[Node], out: &mut Vec<(String, Option<i64>)>) {
        for node in nodes {
            match node {
                Node::Text { content, .. } => out.push((content.clone(), None)),
                Node::StitchRef {
                    stitch_id, label, ..
                } => out.push((label.clone(), Some(*stitch_id))),
                Node::Element { children, .. } => walk(children, out),
                Node::Image { .. } => {}
            }
        }
    }
    let mut out = Vec::new();
    walk(&fragment.nodes, &mut out);
    out
}

#[test]
fn test_round_trip_of_editor_insertions() {
    let fragment = Fragment {
        nodes: vec![
            Node::text("Row 1: ch 6, ", synthetic("t-1")),
            Node::stitch_ref(100, "magic ring", synthetic("s-1")),
            Node::text(" ", synthetic("t-2")),
            Node::text("then ", synthetic("t-3")),
            Node::stitch_ref(200, "dc2tog", synthetic("s-2")),
            Node::text(" to finish.", synthetic("t-4")),
        ],
    };

    let reparsed = parse(&serialize(&fragment)).unwrap();

    // Adjacent text nodes may be merged by the reparse; compare the
    // concatenated event stream instead of node counts
    let expected = vec![
        ("Row 1: ch 6, ".to_string(), None),
        ("magic ring".to_string(), Some(100)),
        (" then ".to_string(), None),
        ("dc2tog".to_string(), Some(200)),
        (" to finish.".to_string(), None),
    ];
    assert_eq!(event_sequence(&reparsed), expected);
}

#[test]
fn test_round_trip_preserves_image_sources() {
    let fragment = Fragment {
        nodes: vec![
            Node::text("step ", synthetic("t-1")),
            Node::image("https://img.host/one.png", synthetic("i-1")),
            Node::image("https://img.host/two.png", synthetic("i-2")),
        ],
    };

    let reparsed = parse(&serialize(&fragment)).unwrap();
    assert_eq!(
        crate::images::extract_images(&reparsed),
        vec!["https://img.host/one.png", "https://img.host/two.png"]
    );
}

#[test]
fn test_round_trip_preserves_stitch_bindings_inside_formatting() {
    let source = "<b>Row 2: <span class=\"stitch-ref\" data-stitch-id=\"7\" contenteditable=\"false\">sc</span> across</b>";
    let fragment = parse(source).unwrap();
    let reparsed = parse(&serialize(&fragment)).unwrap();

    assert_eq!(reparsed.stitch_ids(), vec![7]);
    assert_eq!(reparsed.visible_text(), fragment.visible_text());
}

#[test]
fn test_double_round_trip_is_stable() {
    let source = "Row 1: <i>ch 6</i> <span class=\"stitch-ref\" data-stitch-id=\"5\" contenteditable=\"false\">sl st</span> <img src=\"a.png\" alt=\"Pattern step\">";
    let once = serialize(&parse(source).unwrap());
    let twice = serialize(&parse(&once).unwrap());
    assert_eq!(once, twice);
}

#[test]
fn test_frozen_label_survives_round_trip() {
    // The visible text of a stitch ref is whatever was frozen at insertion
    // time, even if it no longer matches any glossary entry
    let fragment = Fragment {
        nodes: vec![Node::stitch_ref(9, "old name", synthetic("s-1"))],
    };
    let reparsed = parse(&serialize(&fragment)).unwrap();
    assert_eq!(reparsed.visible_text(), "old name");
    assert_eq!(reparsed.stitch_ids(), vec![9]);
}

use crate::ast::*;
use crate::tokenizer::{encode_attribute, encode_text};

/// Serialize a fragment back to markup.
///
/// Attribute order is preserved as parsed; text and attribute values are
/// entity-encoded. The round trip keeps visible text, image sources and
/// stitch-id bindings intact; whitespace inside tags is normalized.
pub fn serialize(fragment: &Fragment) -> String {
    let mut output = String::new();
    for node in &fragment.nodes {
        serialize_node(node, &mut output);
    }
    output
}

fn serialize_node(node: &Node, output: &mut String) {
    match node {
        Node::Text { content, .. } => output.push_str(&encode_text(content)),

        Node::Image { attributes, .. } => {
            serialize_open_tag("img", attributes, output);
        }

        Node::StitchRef {
            label, attributes, ..
        } => {
            serialize_open_tag("span", attributes, output);
            output.push_str(&encode_text(label));
            output.push_str("</span>");
        }

        Node::Element {
            tag,
            attributes,
            children,
            ..
        } => {
            serialize_open_tag(tag, attributes, output);
            if is_void_tag(tag) {
                return;
            }
            for child in children {
                serialize_node(child, output);
            }
            output.push_str("</");
            output.push_str(tag);
            output.push('>');
        }
    }
}

fn serialize_open_tag(tag: &str, attributes: &[Attribute], output: &mut String) {
    output.push('<');
    output.push_str(tag);
    for attr in attributes {
        output.push(' ');
        output.push_str(&attr.name);
        if !attr.value.is_empty() {
            output.push_str("=\"");
            output.push_str(&encode_attribute(&attr.value));
            output.push('"');
        }
    }
    output.push('>');
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::parse;

    #[test]
    fn test_serialize_editor_built_nodes() {
        let fragment = Fragment {
            nodes: vec![
                Node::text("Row 1: ", Span::synthetic("t-1".into())),
                Node::stitch_ref(42, "dc2tog", Span::synthetic("s-1".into())),
                Node::text(" then ", Span::synthetic("t-2".into())),
                Node::image("https://img.host/a.png", Span::synthetic("i-1".into())),
            ],
        };

        let markup = serialize(&fragment);
        assert_eq!(
            markup,
            "Row 1: <span class=\"stitch-ref\" data-stitch-id=\"42\" contenteditable=\"false\">dc2tog</span> then <img src=\"https://img.host/a.png\" alt=\"Pattern step\">"
        );
    }

    #[test]
    fn test_serialize_preserves_unknown_markup() {
        let source = r#"<div data-step="3"><u>weave in ends</u></div>"#;
        let fragment = parse(source).unwrap();
        assert_eq!(serialize(&fragment), source);
    }

    #[test]
    fn test_text_is_entity_encoded() {
        let fragment = parse("yarn &amp; hook").unwrap();
        assert_eq!(serialize(&fragment), "yarn &amp; hook");
    }
}

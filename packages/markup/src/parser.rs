use crate::ast::*;
use crate::error::{ParseError, ParseResult};
use crate::id_generator::IdGenerator;
use crate::tokenizer::{decode_entities, tokenize, Token};
use std::ops::Range;

/// Parse an instructions fragment with a default id seed
pub fn parse(source: &str) -> ParseResult<Fragment> {
    parse_with_key(source, "fragment")
}

/// Parse with an explicit document key (node ids are seeded from it)
pub fn parse_with_key(source: &str, key: &str) -> ParseResult<Fragment> {
    let mut parser = Parser::new(source, IdGenerator::new(key))?;
    parser.parse_fragment()
}

/// Recursive-descent parser over the token stream.
///
/// Unmatched close tags are dropped and formatting tags left open at end of
/// input are implicitly closed; editing surfaces emit both shapes and saved
/// patterns must stay renderable. Tag syntax itself is strict.
pub struct Parser<'src> {
    tokens: Vec<(Token<'src>, Range<usize>)>,
    pos: usize,
    source_len: usize,
    id_generator: IdGenerator,
}

impl<'src> Parser<'src> {
    pub fn new(source: &'src str, id_generator: IdGenerator) -> ParseResult<Self> {
        let tokens = tokenize(source)?;
        Ok(Self {
            tokens,
            pos: 0,
            source_len: source.len(),
            id_generator,
        })
    }

    /// Parse a complete fragment
    pub fn parse_fragment(&mut self) -> ParseResult<Fragment> {
        let mut open_stack: Vec<String> = Vec::new();
        let nodes = self.parse_nodes(&mut open_stack)?;
        Ok(Fragment { nodes })
    }

    fn parse_nodes(&mut self, open_stack: &mut Vec<String>) -> ParseResult<Vec<Node>> {
        let mut nodes = Vec::new();

        while let Some((token, range)) = self.peek().cloned() {
            match token {
                Token::Text(raw) => {
                    self.advance();
                    nodes.push(Node::Text {
                        content: decode_entities(raw),
                        span: self.span(range),
                    });
                }

                Token::OpenTag(raw) => {
                    self.advance();
                    nodes.push(self.parse_element(raw, range, open_stack)?);
                }

                Token::CloseTag(raw) => {
                    let name = close_tag_name(raw);
                    if open_stack.last().map(String::as_str) == Some(name.as_str()) {
                        // Current element ends here; caller consumes the token
                        return Ok(nodes);
                    }
                    if open_stack.iter().any(|t| t == &name) {
                        // Closes an ancestor: implicitly close this element
                        // without consuming, so the ancestor sees it too
                        return Ok(nodes);
                    }
                    // Stray close tag with no matching open: drop it
                    self.advance();
                }

                Token::Comment => {
                    self.advance();
                }
            }
        }

        Ok(nodes)
    }

    fn parse_element(
        &mut self,
        raw: &str,
        range: Range<usize>,
        open_stack: &mut Vec<String>,
    ) -> ParseResult<Node> {
        let tag = scan_tag(raw, range.start)?;
        let start = range.start;

        if tag.self_closing || is_void_tag(&tag.name) {
            let span = Span::new(start, range.end, self.id_generator.new_id());
            return Ok(self.leaf_node(tag, span));
        }

        open_stack.push(tag.name.clone());
        let children = self.parse_nodes(open_stack)?;
        open_stack.pop();

        // Consume the matching close tag if it is actually present;
        // at end of input the element is implicitly closed
        let close_end = match self.peek() {
            Some((Token::CloseTag(raw), r)) if close_tag_name(raw) == tag.name => Some(r.end),
            _ => None,
        };
        let end = match close_end {
            Some(end) => {
                self.advance();
                end
            }
            None => match self.peek() {
                Some((_, r)) => r.start,
                None => self.source_len,
            },
        };

        let span = Span::new(start, end, self.id_generator.new_id());

        if tag.name == "span" && is_stitch_ref(&tag.attributes) {
            if let Some(stitch_id) = stitch_id_of(&tag.attributes) {
                let label = Fragment { nodes: children }.visible_text();
                return Ok(Node::StitchRef {
                    stitch_id,
                    label,
                    attributes: tag.attributes,
                    span,
                });
            }
            // Marker class without a usable id: plain pass-through element
        }

        Ok(Node::Element {
            tag: tag.name,
            attributes: tag.attributes,
            children,
            span,
        })
    }

    fn leaf_node(&mut self, tag: ScannedTag, span: Span) -> Node {
        if tag.name == "img" {
            if let Some(src) = tag
                .attributes
                .iter()
                .find(|a| a.name == "src")
                .map(|a| a.value.clone())
            {
                return Node::Image {
                    src,
                    attributes: tag.attributes,
                    span,
                };
            }
        }
        Node::Element {
            tag: tag.name,
            attributes: tag.attributes,
            children: Vec::new(),
            span,
        }
    }

    fn span(&mut self, range: Range<usize>) -> Span {
        Span::new(range.start, range.end, self.id_generator.new_id())
    }

    fn peek(&self) -> Option<&(Token<'src>, Range<usize>)> {
        self.tokens.get(self.pos)
    }

    fn advance(&mut self) {
        self.pos += 1;
    }
}

fn is_stitch_ref(attributes: &[Attribute]) -> bool {
    attributes.iter().any(|a| {
        a.name == "class" && a.value.split_whitespace().any(|c| c == STITCH_REF_CLASS)
    })
}

fn stitch_id_of(attributes: &[Attribute]) -> Option<i64> {
    attributes
        .iter()
        .find(|a| a.name == STITCH_ID_ATTR)
        .and_then(|a| a.value.parse().ok())
}

fn close_tag_name(raw: &str) -> String {
    raw.trim_start_matches("</")
        .trim_end_matches('>')
        .trim()
        .to_ascii_lowercase()
}

struct ScannedTag {
    name: String,
    attributes: Vec<Attribute>,
    self_closing: bool,
}

/// Scan the inside of an open tag: name, attributes, trailing `/`.
///
/// Attribute values may be double-quoted, single-quoted, unquoted, or
/// absent (bare attributes get an empty value).
fn scan_tag(raw: &str, pos: usize) -> ParseResult<ScannedTag> {
    let inner = raw
        .strip_prefix('<')
        .and_then(|s| s.strip_suffix('>'))
        .ok_or_else(|| ParseError::malformed_tag(pos, "not a tag"))?;

    let mut chars = inner.char_indices().peekable();

    let mut name = String::new();
    while let Some(&(_, ch)) = chars.peek() {
        if ch.is_ascii_alphanumeric() || ch == '-' {
            name.push(ch.to_ascii_lowercase());
            chars.next();
        } else {
            break;
        }
    }
    if name.is_empty() {
        return Err(ParseError::malformed_tag(pos, "missing tag name"));
    }

    let mut attributes = Vec::new();
    let mut self_closing = false;

    loop {
        while matches!(chars.peek(), Some(&(_, ch)) if ch.is_whitespace()) {
            chars.next();
        }

        let Some(&(idx, ch)) = chars.peek() else { break };

        if ch == '/' {
            chars.next();
            if chars.peek().is_some() {
                return Err(ParseError::malformed_tag(
                    pos + idx,
                    "unexpected content after '/'",
                ));
            }
            self_closing = true;
            break;
        }

        // Attribute name
        let mut attr_name = String::new();
        while let Some(&(_, ch)) = chars.peek() {
            if ch.is_whitespace() || ch == '=' || ch == '/' {
                break;
            }
            attr_name.push(ch.to_ascii_lowercase());
            chars.next();
        }
        if attr_name.is_empty() {
            return Err(ParseError::malformed_tag(pos + idx, "malformed attribute"));
        }

        while matches!(chars.peek(), Some(&(_, ch)) if ch.is_whitespace()) {
            chars.next();
        }

        if !matches!(chars.peek(), Some(&(_, '='))) {
            attributes.push(Attribute::new(attr_name, ""));
            continue;
        }
        chars.next(); // consume '='

        while matches!(chars.peek(), Some(&(_, ch)) if ch.is_whitespace()) {
            chars.next();
        }

        let value = match chars.peek().copied() {
            Some((qidx, quote @ ('"' | '\''))) => {
                chars.next();
                let mut value = String::new();
                let mut terminated = false;
                for (_, ch) in chars.by_ref() {
                    if ch == quote {
                        terminated = true;
                        break;
                    }
                    value.push(ch);
                }
                if !terminated {
                    return Err(ParseError::unterminated_attribute(pos + qidx));
                }
                value
            }
            Some(_) => {
                let mut value = String::new();
                while let Some(&(_, ch)) = chars.peek() {
                    if ch.is_whitespace() {
                        break;
                    }
                    value.push(ch);
                    chars.next();
                }
                value
            }
            None => String::new(),
        };

        attributes.push(Attribute::new(attr_name, decode_entities(&value)));
    }

    Ok(ScannedTag {
        name,
        attributes,
        self_closing,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_plain_text() {
        let fragment = parse("Row 1: ch 6, turn.").unwrap();
        assert_eq!(fragment.nodes.len(), 1);
        assert_eq!(fragment.visible_text(), "Row 1: ch 6, turn.");
    }

    #[test]
    fn test_parse_image() {
        let fragment = parse(r#"<img src="https://img.host/a.png" alt="Pattern step">"#).unwrap();
        match &fragment.nodes[0] {
            Node::Image { src, .. } => assert_eq!(src, "https://img.host/a.png"),
            other => panic!("expected image, got {:?}", other),
        }
    }

    #[test]
    fn test_parse_stitch_ref() {
        let source = r#"<span class="stitch-ref fancy" data-stitch-id="42" contenteditable="false">dc2tog</span>"#;
        let fragment = parse(source).unwrap();
        match &fragment.nodes[0] {
            Node::StitchRef {
                stitch_id, label, ..
            } => {
                assert_eq!(*stitch_id, 42);
                assert_eq!(label, "dc2tog");
            }
            other => panic!("expected stitch ref, got {:?}", other),
        }
    }

    #[test]
    fn test_stitch_span_without_numeric_id_passes_through() {
        let source = r#"<span class="stitch-ref" data-stitch-id="oops">sc</span>"#;
        let fragment = parse(source).unwrap();
        assert!(matches!(fragment.nodes[0], Node::Element { .. }));
    }

    #[test]
    fn test_formatting_wrappers_nest() {
        let fragment = parse("<b>bold <i>both</i></b> tail").unwrap();
        let Node::Element { tag, children, .. } = &fragment.nodes[0] else {
            panic!("expected element");
        };
        assert_eq!(tag, "b");
        assert_eq!(children.len(), 2);
        assert_eq!(fragment.visible_text(), "bold both tail");
    }

    #[test]
    fn test_unclosed_tag_is_implicitly_closed() {
        let fragment = parse("<b>never closed").unwrap();
        assert_eq!(fragment.nodes.len(), 1);
        assert_eq!(fragment.visible_text(), "never closed");
    }

    #[test]
    fn test_stray_close_tag_is_dropped() {
        let fragment = parse("a</b>c").unwrap();
        assert_eq!(fragment.visible_text(), "ac");
    }

    #[test]
    fn test_close_of_ancestor_implicitly_closes_inner() {
        let fragment = parse("<ol><li>one</ol>").unwrap();
        let Node::Element { tag, children, .. } = &fragment.nodes[0] else {
            panic!("expected element");
        };
        assert_eq!(tag, "ol");
        assert!(matches!(&children[0], Node::Element { tag, .. } if tag == "li"));
    }

    #[test]
    fn test_malformed_attribute_is_an_error() {
        assert!(parse(r#"<img src="unterminated>"#).is_err());
    }

    #[test]
    fn test_entities_in_text_are_decoded() {
        let fragment = parse("yarn &amp; hook").unwrap();
        assert_eq!(fragment.visible_text(), "yarn & hook");
    }
}

use crate::error::{ParseError, ParseResult};
use logos::Logos;
use std::ops::Range;

/// Lexer tokens for the instructions markup dialect.
///
/// The dialect is flat at the lexical level: a tag is one token carrying its
/// raw source slice, and everything between tags is text. Attribute syntax
/// inside a tag is scanned by the parser.
#[derive(Logos, Debug, Clone, PartialEq)]
pub enum Token<'src> {
    /// `<!-- ... -->`
    #[regex(r"<!--([^-]|-[^-]|--[^>])*-->", logos::skip)]
    Comment,

    /// `</tag ...>`
    #[regex(r"</[a-zA-Z][^>]*>", |lex| lex.slice())]
    CloseTag(&'src str),

    /// `<tag ...>` including self-closing forms
    #[regex(r"<[a-zA-Z][^>]*>", |lex| lex.slice())]
    OpenTag(&'src str),

    /// Run of text up to the next tag
    #[regex(r"[^<]+", |lex| lex.slice())]
    Text(&'src str),
}

/// Tokenize markup into a spanned token stream.
///
/// A `<` that does not start a well-formed tag is a lexer error; the dialect
/// is strict about tag syntax (entity-encoded `&lt;` is how a literal `<`
/// reaches the text).
pub fn tokenize(source: &str) -> ParseResult<Vec<(Token<'_>, Range<usize>)>> {
    let mut tokens = Vec::new();
    let mut lexer = Token::lexer(source);

    while let Some(result) = lexer.next() {
        match result {
            Ok(token) => tokens.push((token, lexer.span())),
            Err(_) => return Err(ParseError::lexer_error(lexer.span().start)),
        }
    }

    Ok(tokens)
}

/// Decode the entity set the editing surface produces
pub fn decode_entities(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut rest = text;

    while let Some(idx) = rest.find('&') {
        out.push_str(&rest[..idx]);
        rest = &rest[idx..];

        let decoded = [
            ("&amp;", '&'),
            ("&lt;", '<'),
            ("&gt;", '>'),
            ("&quot;", '"'),
            ("&#39;", '\''),
            ("&nbsp;", '\u{a0}'),
        ]
        .iter()
        .find(|(entity, _)| rest.starts_with(entity));

        match decoded {
            Some((entity, ch)) => {
                out.push(*ch);
                rest = &rest[entity.len()..];
            }
            None => {
                out.push('&');
                rest = &rest[1..];
            }
        }
    }

    out.push_str(rest);
    out
}

/// Re-encode text content for serialization
pub fn encode_text(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '\u{a0}' => out.push_str("&nbsp;"),
            _ => out.push(ch),
        }
    }
    out
}

/// Re-encode an attribute value for serialization (double-quoted context)
pub fn encode_attribute(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for ch in value.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '"' => out.push_str("&quot;"),
            '<' => out.push_str("&lt;"),
            _ => out.push(ch),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tokenize_text_and_tags() {
        let tokens = tokenize("Row 1: <b>ch 6</b>").unwrap();
        assert_eq!(tokens.len(), 4);
        assert_eq!(tokens[0].0, Token::Text("Row 1: "));
        assert_eq!(tokens[1].0, Token::OpenTag("<b>"));
        assert_eq!(tokens[2].0, Token::Text("ch 6"));
        assert_eq!(tokens[3].0, Token::CloseTag("</b>"));
    }

    #[test]
    fn test_tokenize_rejects_stray_angle_bracket() {
        assert!(tokenize("3 < 4").is_err());
    }

    #[test]
    fn test_comments_are_skipped() {
        let tokens = tokenize("a<!-- note -->b").unwrap();
        assert_eq!(tokens.len(), 2);
    }

    #[test]
    fn test_entity_round_trip() {
        let decoded = decode_entities("yarn &amp; hook &lt;4mm&gt;&nbsp;");
        assert_eq!(decoded, "yarn & hook <4mm>\u{a0}");
        assert_eq!(encode_text(&decoded), "yarn &amp; hook &lt;4mm&gt;&nbsp;");
    }

    #[test]
    fn test_unknown_entity_passes_through() {
        assert_eq!(decode_entities("a &bogus; b"), "a &bogus; b");
    }
}

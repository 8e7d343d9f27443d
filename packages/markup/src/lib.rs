//! # Yarnbook Markup
//!
//! The content model for pattern instructions: a restricted HTML dialect
//! carrying plain text, inline images, and atomic stitch-reference spans
//! bound to glossary entries by id.
//!
//! ```text
//! editor surface state ── serialize ──▶ markup string ── persist
//! markup string ── parse ──▶ Fragment ── render (viewer)
//! ```
//!
//! The round-trip contract: `parse(serialize(x))` reproduces the same
//! visible text, image sources, and stitch-id bindings as `x`.

pub mod ast;
pub mod error;
pub mod id_generator;
pub mod images;
pub mod parser;
pub mod serializer;
pub mod tokenizer;
pub mod visitor;

#[cfg(test)]
mod tests_roundtrip;

pub use ast::{Attribute, Fragment, Node, Span, STITCH_ID_ATTR, STITCH_REF_CLASS};
pub use error::{ParseError, ParseResult};
pub use id_generator::IdGenerator;
pub use images::{extract_images, extract_images_from_markup};
pub use parser::{parse, parse_with_key, Parser};
pub use serializer::serialize;
pub use tokenizer::{tokenize, Token};
pub use visitor::Visitor;

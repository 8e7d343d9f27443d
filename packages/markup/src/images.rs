use crate::ast::{Attribute, Fragment, Span};
use crate::parser::parse;
use crate::visitor::Visitor;
use std::collections::HashSet;

/// Collects distinct image sources in first-seen order
struct ImageCollector {
    seen: HashSet<String>,
    images: Vec<String>,
}

impl Visitor for ImageCollector {
    fn visit_image(&mut self, src: &str, _attributes: &[Attribute], _span: &Span) {
        if self.seen.insert(src.to_string()) {
            self.images.push(src.to_string());
        }
    }
}

/// Ordered set of distinct image URLs appearing anywhere in the fragment
pub fn extract_images(fragment: &Fragment) -> Vec<String> {
    let mut collector = ImageCollector {
        seen: HashSet::new(),
        images: Vec::new(),
    };
    collector.visit_fragment(fragment);
    collector.images
}

/// Extract image URLs straight from serialized instructions.
///
/// Instructions that fail to parse contribute no images; the caller still
/// has the top-level gallery.
pub fn extract_images_from_markup(markup: &str) -> Vec<String> {
    match parse(markup) {
        Ok(fragment) => extract_images(&fragment),
        Err(_) => Vec::new(),
    }
}

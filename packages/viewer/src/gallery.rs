//! The viewer's photo gallery: the pattern's project photos plus every image
//! embedded in the instructions, first occurrence wins.

use std::collections::HashSet;
use yarnbook_markup::extract_images_from_markup;
use yarnbook_store::Pattern;

pub fn gallery_images(pattern: &Pattern) -> Vec<String> {
    let mut seen = HashSet::new();
    let mut out = Vec::new();
    let embedded = extract_images_from_markup(&pattern.instructions);
    for src in pattern.images.iter().cloned().chain(embedded) {
        if seen.insert(src.clone()) {
            out.push(src);
        }
    }
    out
}

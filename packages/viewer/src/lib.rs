//! Read-only pattern viewing: the instructions display tree with stitch
//! tooltips, the photo gallery, and materials-list normalization.

pub mod gallery;
pub mod materials;
pub mod render;

pub use gallery::gallery_images;
pub use materials::display_materials;
pub use render::{render_fragment, render_instructions, RenderNode, NO_DESCRIPTION};

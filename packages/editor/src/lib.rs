//! Pattern-editor core: form and instructions state, caret-based insertion
//! of images and stitch references, the floating-toolbar state machine,
//! draft recovery, and the stitch manager.

pub mod caret;
pub mod drafts;
pub mod error;
pub mod session;
pub mod stitches;
pub mod surface;
pub mod toolbar;

pub use caret::Caret;
pub use drafts::DraftStore;
pub use error::{EditorError, EditorResult};
pub use session::PatternEditor;
pub use stitches::{StitchManager, STITCHES_PER_PAGE};
pub use surface::{FormatCommand, RecordingSurface, RichTextSurface};
pub use toolbar::ToolbarState;

//! Formatting commands and the surface they are dispatched to. The editor
//! core does not rewrite the tree for formatting; the host surface (the
//! contenteditable area, in the shipped client) owns wrapping and unwrapping,
//! and the core decides only whether a command may fire.

/// Inline and block formatting commands exposed on the floating toolbar
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormatCommand {
    Bold,
    Italic,
    Underline,
    OrderedList,
    UnorderedList,
}

impl FormatCommand {
    /// Tag the command wraps its selection in
    pub fn tag(&self) -> &'static str {
        match self {
            FormatCommand::Bold => "b",
            FormatCommand::Italic => "i",
            FormatCommand::Underline => "u",
            FormatCommand::OrderedList => "ol",
            FormatCommand::UnorderedList => "ul",
        }
    }
}

/// Capability trait over whatever rich-text widget hosts the instructions
/// area
pub trait RichTextSurface {
    fn toggle_bold(&mut self);
    fn toggle_italic(&mut self);
    fn toggle_underline(&mut self);
    fn toggle_ordered_list(&mut self);
    fn toggle_unordered_list(&mut self);

    fn apply(&mut self, command: FormatCommand) {
        match command {
            FormatCommand::Bold => self.toggle_bold(),
            FormatCommand::Italic => self.toggle_italic(),
            FormatCommand::Underline => self.toggle_underline(),
            FormatCommand::OrderedList => self.toggle_ordered_list(),
            FormatCommand::UnorderedList => self.toggle_unordered_list(),
        }
    }
}

/// Surface that records every dispatched command, for tests
#[derive(Debug, Default)]
pub struct RecordingSurface {
    pub applied: Vec<FormatCommand>,
}

impl RichTextSurface for RecordingSurface {
    fn toggle_bold(&mut self) {
        self.applied.push(FormatCommand::Bold);
    }

    fn toggle_italic(&mut self) {
        self.applied.push(FormatCommand::Italic);
    }

    fn toggle_underline(&mut self) {
        self.applied.push(FormatCommand::Underline);
    }

    fn toggle_ordered_list(&mut self) {
        self.applied.push(FormatCommand::OrderedList);
    }

    fn toggle_unordered_list(&mut self) {
        self.applied.push(FormatCommand::UnorderedList);
    }
}

//! Toolbar formatting commands
//!
//! Command names follow the browser rich-text command vocabulary
//! (`bold`, `formatBlock`, `insertImage`, ...) so a form or script can post
//! the same names a contenteditable toolbar would issue.

use crate::error::FormatError;

/// One toolbar operation
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormatCommand {
    /// Toggle `<strong>`
    Bold,
    /// Toggle `<em>`
    Italic,
    /// Toggle `<u>`
    Underline,
    /// Turn blocks into `<hN>`
    Heading(u8),
    /// Turn blocks into `<p>`
    Paragraph,
    /// Toggle a bulleted list
    UnorderedList,
    /// Toggle a numbered list
    OrderedList,
    /// Insert an image; `None` or a blank URL is a no-op
    InsertImage(Option<String>),
    /// Strip inline formatting
    ClearFormatting,
}

impl FormatCommand {
    /// Parse a command name and optional argument
    ///
    /// `formatBlock` takes a tag argument (`H3`, `P`); `insertImage` takes the URL.
    pub fn parse(name: &str, arg: Option<&str>) -> Result<Self, FormatError> {
        match name {
            "bold" => Ok(Self::Bold),
            "italic" => Ok(Self::Italic),
            "underline" => Ok(Self::Underline),
            "formatBlock" => parse_block_tag(arg.unwrap_or("P")),
            "insertUnorderedList" => Ok(Self::UnorderedList),
            "insertOrderedList" => Ok(Self::OrderedList),
            "insertImage" => Ok(Self::InsertImage(arg.map(str::to_string))),
            "removeFormat" => Ok(Self::ClearFormatting),
            other => Err(FormatError::UnknownCommand(other.to_string())),
        }
    }

    /// Command name
    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            Self::Bold => "bold",
            Self::Italic => "italic",
            Self::Underline => "underline",
            Self::Heading(_) | Self::Paragraph => "formatBlock",
            Self::UnorderedList => "insertUnorderedList",
            Self::OrderedList => "insertOrderedList",
            Self::InsertImage(_) => "insertImage",
            Self::ClearFormatting => "removeFormat",
        }
    }
}

fn parse_block_tag(tag: &str) -> Result<FormatCommand, FormatError> {
    let tag = tag.trim().trim_start_matches('<').trim_end_matches('>');
    if tag.eq_ignore_ascii_case("p") {
        return Ok(FormatCommand::Paragraph);
    }
    let level = tag
        .strip_prefix(|c: char| c == 'h' || c == 'H')
        .and_then(|n| n.parse::<u8>().ok())
        .ok_or_else(|| FormatError::UnknownCommand(format!("formatBlock {tag}")))?;
    if (1..=6).contains(&level) {
        Ok(FormatCommand::Heading(level))
    } else {
        Err(FormatError::InvalidHeadingLevel(level))
    }
}

/// Toolbar button description
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ToolbarButton {
    /// Button text
    pub label: &'static str,
    /// Tooltip
    pub title: &'static str,
    /// Command name
    pub command: &'static str,
    /// Command argument
    pub arg: Option<&'static str>,
}

/// The editor toolbar, in display order
pub const TOOLBAR: [ToolbarButton; 9] = [
    ToolbarButton { label: "B", title: "加粗", command: "bold", arg: None },
    ToolbarButton { label: "I", title: "斜体", command: "italic", arg: None },
    ToolbarButton { label: "U", title: "下划线", command: "underline", arg: None },
    ToolbarButton { label: "标题", title: "标题", command: "formatBlock", arg: Some("H3") },
    ToolbarButton { label: "正文", title: "正文", command: "formatBlock", arg: Some("P") },
    ToolbarButton { label: "• 列表", title: "无序列表", command: "insertUnorderedList", arg: None },
    ToolbarButton { label: "1. 列表", title: "有序列表", command: "insertOrderedList", arg: None },
    ToolbarButton { label: "📷 图片", title: "插入图片", command: "insertImage", arg: None },
    ToolbarButton { label: "🧹 清除格式", title: "清除格式", command: "removeFormat", arg: None },
];

/// Block range a command applies to (end exclusive)
///
/// A collapsed range addresses the block holding the caret.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Selection {
    /// First block
    pub start: usize,
    /// One past the last block
    pub end: usize,
}

impl Selection {
    /// Range `start..end`
    #[inline]
    #[must_use]
    pub fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }

    /// Caret inside one block
    #[inline]
    #[must_use]
    pub fn caret(block: usize) -> Self {
        Self::new(block, block)
    }

    /// Every block
    #[inline]
    #[must_use]
    pub fn all() -> Self {
        Self::new(0, usize::MAX)
    }

    /// Clamp to a document of `len` blocks; never empty when `len > 0`
    #[must_use]
    pub fn clamp(self, len: usize) -> std::ops::Range<usize> {
        if len == 0 {
            return 0..0;
        }
        let start = self.start.min(len - 1);
        let end = self.end.clamp(start + 1, len);
        start..end
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_command_names() {
        assert_eq!(FormatCommand::parse("bold", None).unwrap(), FormatCommand::Bold);
        assert_eq!(
            FormatCommand::parse("formatBlock", Some("H3")).unwrap(),
            FormatCommand::Heading(3)
        );
        assert_eq!(
            FormatCommand::parse("formatBlock", Some("<p>")).unwrap(),
            FormatCommand::Paragraph
        );
        assert_eq!(
            FormatCommand::parse("insertImage", Some("a.png")).unwrap(),
            FormatCommand::InsertImage(Some("a.png".into()))
        );
        assert!(matches!(
            FormatCommand::parse("formatBlock", Some("H9")),
            Err(FormatError::InvalidHeadingLevel(9))
        ));
        assert!(FormatCommand::parse("strikeThrough", None).is_err());
    }

    #[test]
    fn toolbar_commands_parse() {
        for button in TOOLBAR {
            let cmd = FormatCommand::parse(button.command, button.arg).unwrap();
            assert_eq!(cmd.name(), button.command);
        }
    }

    #[test]
    fn selection_clamp() {
        assert_eq!(Selection::all().clamp(4), 0..4);
        assert_eq!(Selection::caret(2).clamp(4), 2..3);
        assert_eq!(Selection::new(9, 12).clamp(4), 3..4);
        assert_eq!(Selection::new(1, 0).clamp(4), 1..2);
        assert_eq!(Selection::all().clamp(0), 0..0);
    }
}

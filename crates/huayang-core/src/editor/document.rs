//! Block document model behind the formatting commands
//!
//! Editor HTML is read as a flat list of blocks: paragraphs, headings, list
//! items and images. Inline markup inside a block is kept as raw HTML.
//! Loose text and inline markup between blocks become paragraphs. Any other
//! markup (unknown elements, comments, stray text inside a list) is kept as
//! an opaque block that renders back verbatim and that commands skip.

use super::command::{FormatCommand, Selection};

/// List flavour
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListKind {
    /// `<ul>`
    Unordered,
    /// `<ol>`
    Ordered,
}

impl ListKind {
    fn tag(self) -> &'static str {
        match self {
            ListKind::Unordered => "ul",
            ListKind::Ordered => "ol",
        }
    }
}

/// Block type
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BlockKind {
    /// `<p>`
    Paragraph,
    /// `<h1>`..`<h6>`
    Heading(u8),
    /// `<li>` in a list of the given kind
    ListItem(ListKind),
    /// `<img>`; the block text is the image URL
    Image,
    /// Markup kept verbatim
    Raw,
}

/// One block with its inline HTML (or image URL)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Block {
    /// Block type
    pub kind: BlockKind,
    /// Inline HTML, the URL for images, or the markup of a raw block
    pub inline: String,
}

impl Block {
    /// Create a block
    #[must_use]
    pub fn new(kind: BlockKind, inline: impl Into<String>) -> Self {
        Self {
            kind,
            inline: inline.into(),
        }
    }

    fn is_opaque(&self) -> bool {
        matches!(self.kind, BlockKind::Image | BlockKind::Raw)
    }
}

/// Parsed editor content
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Document {
    blocks: Vec<Block>,
}

impl Document {
    /// Parse editor HTML
    #[must_use]
    pub fn parse(html: &str) -> Self {
        let mut blocks = Vec::new();
        let mut loose = String::new();
        let mut rest = html;

        while !rest.is_empty() {
            if let Some(len) = opaque_markup(rest) {
                flush_loose(&mut loose, &mut blocks);
                blocks.push(Block::new(BlockKind::Raw, &rest[..len]));
                rest = &rest[len..];
                continue;
            }
            if let Some(tag) = OpenTag::at(rest) {
                let kind = match tag.name.as_str() {
                    "p" | "div" => Some(BlockKind::Paragraph),
                    "ul" => Some(BlockKind::ListItem(ListKind::Unordered)),
                    "ol" => Some(BlockKind::ListItem(ListKind::Ordered)),
                    "img" => Some(BlockKind::Image),
                    name => heading_level(name).map(BlockKind::Heading),
                };
                if let Some(kind) = kind {
                    flush_loose(&mut loose, &mut blocks);
                    match kind {
                        BlockKind::Image => {
                            let src = attr(&tag.attrs, "src").unwrap_or_default();
                            blocks.push(Block::new(BlockKind::Image, src));
                            rest = &rest[tag.len..];
                        }
                        BlockKind::ListItem(list) => {
                            let (inner, consumed) = element_body(rest, &tag);
                            blocks.extend(list_blocks(inner, list));
                            rest = &rest[consumed..];
                        }
                        _ => {
                            let (inner, consumed) = element_body(rest, &tag);
                            blocks.push(Block::new(kind, normalize_inline(inner)));
                            rest = &rest[consumed..];
                        }
                    }
                    continue;
                }
                if !is_inline(&tag.name) {
                    flush_loose(&mut loose, &mut blocks);
                    let consumed = element_len(rest, &tag);
                    blocks.push(Block::new(BlockKind::Raw, &rest[..consumed]));
                    rest = &rest[consumed..];
                    continue;
                }
            }

            let mut chars = rest.chars();
            if let Some(ch) = chars.next() {
                loose.push(ch);
            }
            rest = chars.as_str();
        }
        flush_loose(&mut loose, &mut blocks);

        Self { blocks }
    }

    /// Document from blocks
    #[must_use]
    pub fn from_blocks(blocks: Vec<Block>) -> Self {
        Self { blocks }
    }

    /// Blocks in order
    #[inline]
    #[must_use]
    pub fn blocks(&self) -> &[Block] {
        &self.blocks
    }

    /// Number of blocks
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.blocks.len()
    }

    /// Whether there are no blocks
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }

    /// Serialize back to HTML, grouping adjacent list items
    #[must_use]
    pub fn render(&self) -> String {
        let mut out = String::new();
        let mut open_list: Option<ListKind> = None;

        for block in &self.blocks {
            let list = match block.kind {
                BlockKind::ListItem(kind) => Some(kind),
                _ => None,
            };
            if open_list != list {
                if let Some(kind) = open_list {
                    out.push_str(&format!("</{}>", kind.tag()));
                }
                if let Some(kind) = list {
                    out.push_str(&format!("<{}>", kind.tag()));
                }
                open_list = list;
            }

            if block.kind == BlockKind::Raw {
                out.push_str(&block.inline);
                continue;
            }
            let inline = if block.inline.is_empty() {
                "<br>"
            } else {
                block.inline.as_str()
            };
            match block.kind {
                BlockKind::Paragraph => out.push_str(&format!("<p>{inline}</p>")),
                BlockKind::Heading(level) => {
                    out.push_str(&format!("<h{level}>{inline}</h{level}>"));
                }
                BlockKind::ListItem(_) => out.push_str(&format!("<li>{inline}</li>")),
                BlockKind::Image => {
                    out.push_str(&format!("<img src=\"{}\">", escape_attr(&block.inline)));
                }
                BlockKind::Raw => {}
            }
        }
        if let Some(kind) = open_list {
            out.push_str(&format!("</{}>", kind.tag()));
        }
        out
    }

    /// Run one command over a block range; `false` when nothing changed
    pub fn apply(&mut self, command: &FormatCommand, selection: Selection) -> bool {
        if let FormatCommand::InsertImage(url) = command {
            return self.insert_image(url.as_deref(), selection);
        }

        if self.blocks.is_empty() {
            self.blocks.push(Block::new(BlockKind::Paragraph, ""));
        }
        let range = selection.clamp(self.blocks.len());
        let before = self.blocks.clone();
        let targets = self.blocks[range].iter_mut().filter(|b| !b.is_opaque());

        match command {
            FormatCommand::Bold => targets.for_each(|b| toggle_mark(b, &["strong", "b"])),
            FormatCommand::Italic => targets.for_each(|b| toggle_mark(b, &["em", "i"])),
            FormatCommand::Underline => targets.for_each(|b| toggle_mark(b, &["u"])),
            FormatCommand::Heading(level) => {
                targets.for_each(|b| b.kind = BlockKind::Heading(*level));
            }
            FormatCommand::Paragraph => targets.for_each(|b| b.kind = BlockKind::Paragraph),
            FormatCommand::UnorderedList => toggle_list(targets.collect(), ListKind::Unordered),
            FormatCommand::OrderedList => toggle_list(targets.collect(), ListKind::Ordered),
            FormatCommand::ClearFormatting => {
                targets.for_each(|b| b.inline = strip_format_tags(&b.inline));
            }
            FormatCommand::InsertImage(_) => {}
        }

        self.blocks != before
    }

    fn insert_image(&mut self, url: Option<&str>, selection: Selection) -> bool {
        let Some(url) = url.map(str::trim).filter(|u| !u.is_empty()) else {
            return false;
        };
        let at = selection.clamp(self.blocks.len()).end;
        self.blocks.insert(at, Block::new(BlockKind::Image, url));
        true
    }
}

fn toggle_list(blocks: Vec<&mut Block>, kind: ListKind) {
    let all_in_list = !blocks.is_empty()
        && blocks
            .iter()
            .all(|b| b.kind == BlockKind::ListItem(kind));
    let target = if all_in_list {
        BlockKind::Paragraph
    } else {
        BlockKind::ListItem(kind)
    };
    for block in blocks {
        block.kind = target;
    }
}

fn toggle_mark(block: &mut Block, tags: &[&str]) {
    let trimmed = block.inline.trim();
    if let Some(tag) = OpenTag::at(trimmed) {
        if tags.contains(&tag.name.as_str()) {
            let (inner, consumed) = element_body(trimmed, &tag);
            if consumed == trimmed.len() {
                block.inline = inner.to_string();
                return;
            }
        }
    }
    let tag = tags[0];
    block.inline = format!("<{tag}>{}</{tag}>", block.inline);
}

const FORMAT_TAGS: [&str; 13] = [
    "b", "strong", "i", "em", "u", "s", "strike", "span", "font", "sub", "sup", "code", "mark",
];

fn strip_format_tags(inline: &str) -> String {
    let mut out = String::with_capacity(inline.len());
    let mut rest = inline;
    while let Some(lt) = rest.find('<') {
        out.push_str(&rest[..lt]);
        let tail = &rest[lt..];
        let name_start = if tail.starts_with("</") { 2 } else { 1 };
        let name: String = tail[name_start..]
            .chars()
            .take_while(char::is_ascii_alphanumeric)
            .collect::<String>()
            .to_ascii_lowercase();
        match tail.find('>') {
            Some(gt) if FORMAT_TAGS.contains(&name.as_str()) => rest = &tail[gt + 1..],
            Some(gt) => {
                out.push_str(&tail[..=gt]);
                rest = &tail[gt + 1..];
            }
            None => {
                out.push_str(tail);
                rest = "";
            }
        }
    }
    out.push_str(rest);
    out
}

fn flush_loose(loose: &mut String, blocks: &mut Vec<Block>) {
    let inline = normalize_inline(loose);
    if !inline.is_empty() {
        blocks.push(Block::new(BlockKind::Paragraph, inline));
    }
    loose.clear();
}

/// Trim, and treat a lone `<br>` as empty
fn normalize_inline(inline: &str) -> String {
    let trimmed = inline.trim();
    match trimmed.to_ascii_lowercase().as_str() {
        "<br>" | "<br/>" | "<br />" => String::new(),
        _ => trimmed.to_string(),
    }
}

fn heading_level(name: &str) -> Option<u8> {
    let level = name.strip_prefix('h')?.parse::<u8>().ok()?;
    (1..=6).contains(&level).then_some(level)
}

/// Items of a list body; anything between items is kept as raw blocks
fn list_blocks(inner: &str, list: ListKind) -> Vec<Block> {
    let mut blocks = Vec::new();
    let mut stray = String::new();
    let mut rest = inner;

    while !rest.is_empty() {
        match OpenTag::at(rest) {
            Some(tag) if tag.name == "li" => {
                push_raw(&mut stray, &mut blocks);
                let (body, consumed) = element_body(rest, &tag);
                blocks.push(Block::new(BlockKind::ListItem(list), normalize_inline(body)));
                rest = &rest[consumed..];
            }
            Some(tag) => {
                let consumed = element_len(rest, &tag);
                stray.push_str(&rest[..consumed]);
                rest = &rest[consumed..];
            }
            None => {
                let mut chars = rest.chars();
                if let Some(ch) = chars.next() {
                    stray.push(ch);
                }
                rest = chars.as_str();
            }
        }
    }
    push_raw(&mut stray, &mut blocks);
    blocks
}

fn push_raw(stray: &mut String, blocks: &mut Vec<Block>) {
    let markup = stray.trim();
    if !markup.is_empty() {
        blocks.push(Block::new(BlockKind::Raw, markup));
    }
    stray.clear();
}

/// Inline elements stay inside loose paragraphs
const INLINE_TAGS: [&str; 14] = [
    "a", "br", "abbr", "small", "big", "q", "cite", "del", "ins", "kbd", "ruby", "rt", "rp", "wbr",
];

fn is_inline(name: &str) -> bool {
    FORMAT_TAGS.contains(&name) || INLINE_TAGS.contains(&name)
}

const VOID_TAGS: [&str; 10] = [
    "hr", "meta", "link", "input", "col", "area", "base", "embed", "source", "track",
];

/// Bytes taken by the element opened at the start of `s`
fn element_len(s: &str, tag: &OpenTag) -> usize {
    if tag.self_closing || VOID_TAGS.contains(&tag.name.as_str()) {
        tag.len
    } else {
        element_body(s, tag).1
    }
}

/// Length of a comment, declaration or stray block-level closing tag at the
/// start of `s`
fn opaque_markup(s: &str) -> Option<usize> {
    if let Some(body) = s.strip_prefix("<!--") {
        return Some(body.find("-->").map_or(s.len(), |end| 4 + end + 3));
    }
    if s.starts_with("<!") || s.starts_with("<?") {
        return Some(s.find('>').map_or(s.len(), |gt| gt + 1));
    }
    let name: String = s
        .strip_prefix("</")?
        .chars()
        .take_while(char::is_ascii_alphanumeric)
        .collect::<String>()
        .to_ascii_lowercase();
    if name.is_empty() || is_inline(&name) {
        return None;
    }
    s.find('>').map(|gt| gt + 1)
}

/// Opening tag at the start of a string
#[derive(Debug)]
struct OpenTag {
    name: String,
    attrs: String,
    self_closing: bool,
    len: usize,
}

impl OpenTag {
    fn at(s: &str) -> Option<Self> {
        let after = s.strip_prefix('<')?;
        let name: String = after
            .chars()
            .take_while(char::is_ascii_alphanumeric)
            .collect();
        if name.is_empty() || !name.starts_with(|c: char| c.is_ascii_alphabetic()) {
            return None;
        }
        let gt = s.find('>')?;
        let attrs = s[1 + name.len()..gt].trim().trim_end_matches('/').to_string();
        Some(Self {
            name: name.to_ascii_lowercase(),
            attrs,
            self_closing: s[..gt].ends_with('/'),
            len: gt + 1,
        })
    }
}

/// Inner HTML of the element opened at the start of `s`, and bytes consumed
/// including the closing tag. Unclosed elements run to the end.
fn element_body<'a>(s: &'a str, tag: &OpenTag) -> (&'a str, usize) {
    let open = format!("<{}", tag.name);
    let close = format!("</{}", tag.name);
    let mut depth = 1usize;
    let mut pos = tag.len;

    while let Some(offset) = s[pos..].find('<') {
        let at = pos + offset;
        let tail = &s[at..];
        if starts_with_tag(tail, &close) {
            depth -= 1;
            if depth == 0 {
                let end = tail.find('>').map_or(s.len(), |gt| at + gt + 1);
                return (&s[tag.len..at], end);
            }
        } else if starts_with_tag(tail, &open) {
            depth += 1;
        }
        pos = at + 1;
    }
    (&s[tag.len..], s.len())
}

/// Case-insensitive prefix match that stops at a tag-name boundary
fn starts_with_tag(s: &str, prefix: &str) -> bool {
    let bytes = s.as_bytes();
    if bytes.len() < prefix.len() || !bytes[..prefix.len()].eq_ignore_ascii_case(prefix.as_bytes()) {
        return false;
    }
    matches!(
        bytes.get(prefix.len()),
        None | Some(b'>' | b'/' | b' ' | b'\t' | b'\n' | b'\r')
    )
}

fn attr(attrs: &str, name: &str) -> Option<String> {
    let lower = attrs.to_ascii_lowercase();
    let needle = format!("{name}=");
    let mut search = 0;
    while let Some(found) = lower[search..].find(&needle) {
        let at = search + found;
        let boundary = at == 0 || lower.as_bytes()[at - 1].is_ascii_whitespace();
        if boundary {
            let value = &attrs[at + needle.len()..];
            let raw = match value.chars().next() {
                Some(q @ ('"' | '\'')) => value[1..].split(q).next().unwrap_or_default(),
                _ => value.split(char::is_whitespace).next().unwrap_or_default(),
            };
            return Some(unescape_attr(raw));
        }
        search = at + needle.len();
    }
    None
}

fn escape_attr(value: &str) -> String {
    value
        .replace('&', "&amp;")
        .replace('"', "&quot;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}

fn unescape_attr(value: &str) -> String {
    value
        .replace("&quot;", "\"")
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&amp;", "&")
}

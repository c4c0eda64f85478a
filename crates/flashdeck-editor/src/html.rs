#![forbid(unsafe_code)]

//! HTML export and import.
//!
//! Two serializations exist:
//!
//! - **wire HTML** ([`to_html`]) is what gets stored with a card. Chunks carry
//!   their kind in `data-w-e-type` and their id in `data-chunk-id`.
//! - **rendered HTML** ([`render_html`]) is what the editor shows. Chunks get
//!   `ai-chunk` classes styled by the shared stylesheet.
//!
//! [`parse_html`] reads wire HTML (and ordinary pasted HTML) back into node
//! specs. Chunks without children come back with one empty text run.
//!
//! Text marks nest as `span[style] > strong > em > u > s > code`.

use quick_xml::Reader;
use quick_xml::events::{BytesStart, Event};

use crate::document::Document;
use crate::error::HtmlError;
use crate::node::{ChunkKind, ElementKind, MarkFlags, Marks, NodeId, NodeSpec};

/// Attribute holding the chunk element type.
pub const TYPE_ATTR: &str = "data-w-e-type";
/// Attribute holding the chunk id.
pub const CHUNK_ID_ATTR: &str = "data-chunk-id";

const MARK_TAGS: [(MarkFlags, &str); 5] = [
    (MarkFlags::BOLD, "strong"),
    (MarkFlags::ITALIC, "em"),
    (MarkFlags::UNDERLINE, "u"),
    (MarkFlags::STRIKE, "s"),
    (MarkFlags::CODE, "code"),
];

fn escape_text(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for ch in s.chars() {
        match ch {
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '&' => out.push_str("&amp;"),
            '\u{a0}' => out.push_str("&nbsp;"),
            _ => out.push(ch),
        }
    }
    out
}

fn escape_attr(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('"', "&quot;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}

/// Wire markup of a chunk element around already serialized children.
#[must_use]
pub fn serialize_chunk(kind: ChunkKind, chunk_id: &str, children_html: &str) -> String {
    format!(
        "<span {TYPE_ATTR}=\"{}\" {CHUNK_ID_ATTR}=\"{}\">{children_html}</span>",
        kind.element_type(),
        escape_attr(chunk_id),
    )
}

/// Visual markup of a chunk element around already rendered children.
#[must_use]
pub fn render_chunk(kind: ChunkKind, chunk_id: &str, children_html: &str) -> String {
    format!(
        "<span class=\"ai-chunk {}\" {CHUNK_ID_ATTR}=\"{}\">{children_html}</span>",
        kind.class_modifier(),
        escape_attr(chunk_id),
    )
}

fn text_html(text: &str, marks: &Marks) -> String {
    let mut html = escape_text(text);
    for (flag, tag) in MARK_TAGS.iter().rev() {
        if marks.flags.contains(*flag) {
            html = format!("<{tag}>{html}</{tag}>");
        }
    }
    let mut style = Vec::new();
    if let Some(color) = &marks.color {
        style.push(format!("color: {color}"));
    }
    if let Some(background) = &marks.background {
        style.push(format!("background-color: {background}"));
    }
    if !style.is_empty() {
        html = format!(
            "<span style=\"{}\">{html}</span>",
            escape_attr(&style.join("; "))
        );
    }
    html
}

type ChunkWriter = fn(ChunkKind, &str, &str) -> String;

fn spec_html(spec: &NodeSpec, chunk: ChunkWriter, out: &mut String) {
    match spec {
        NodeSpec::Text { text, marks } => out.push_str(&text_html(text, marks)),
        NodeSpec::Element { kind, children } => {
            let mut inner = String::new();
            for child in children {
                spec_html(child, chunk, &mut inner);
            }
            match kind {
                ElementKind::Paragraph => {
                    out.push_str("<p>");
                    out.push_str(&inner);
                    out.push_str("</p>");
                }
                ElementKind::Heading(level) => {
                    out.push_str(&format!("<h{level}>{inner}</h{level}>"));
                }
                ElementKind::Chunk { kind, chunk_id } => {
                    out.push_str(&chunk(*kind, chunk_id, &inner));
                }
            }
        }
    }
}

fn document_html(doc: &Document, chunk: ChunkWriter) -> String {
    let mut out = String::new();
    for spec in doc.to_specs() {
        spec_html(&spec, chunk, &mut out);
    }
    out
}

/// Wire HTML of the whole document.
#[must_use]
pub fn to_html(doc: &Document) -> String {
    document_html(doc, serialize_chunk)
}

/// Rendered HTML of the whole document.
#[must_use]
pub fn render_html(doc: &Document) -> String {
    document_html(doc, render_chunk)
}

/// Decode the entities HTML editors actually emit. Unknown entities are kept
/// verbatim.
fn decode_entities(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    let mut rest = raw;
    while let Some(amp) = rest.find('&') {
        out.push_str(&rest[..amp]);
        let tail = &rest[amp..];
        let decoded = tail.find(';').and_then(|semi| {
            let name = &tail[1..semi];
            let ch = match name {
                "amp" => Some('&'),
                "lt" => Some('<'),
                "gt" => Some('>'),
                "quot" => Some('"'),
                "apos" => Some('\''),
                "nbsp" => Some('\u{a0}'),
                _ => name
                    .strip_prefix("#x")
                    .or_else(|| name.strip_prefix("#X"))
                    .and_then(|hex| u32::from_str_radix(hex, 16).ok())
                    .or_else(|| name.strip_prefix('#').and_then(|dec| dec.parse().ok()))
                    .and_then(char::from_u32),
            };
            ch.map(|c| (c, semi + 1))
        });
        match decoded {
            Some((ch, consumed)) => {
                out.push(ch);
                rest = &tail[consumed..];
            }
            None => {
                out.push('&');
                rest = &tail[1..];
            }
        }
    }
    out.push_str(rest);
    out
}

fn attribute(e: &BytesStart<'_>, key: &str) -> Option<String> {
    e.html_attributes()
        .flatten()
        .find(|a| a.key.as_ref().eq_ignore_ascii_case(key.as_bytes()))
        .map(|a| decode_entities(&String::from_utf8_lossy(&a.value)))
}

fn style_marks(style: &str, mut marks: Marks) -> Marks {
    for decl in style.split(';') {
        let Some((prop, value)) = decl.split_once(':') else {
            continue;
        };
        let value = value.trim();
        if value.is_empty() {
            continue;
        }
        match prop.trim().to_ascii_lowercase().as_str() {
            "color" => marks.color = Some(value.to_owned()),
            "background-color" | "background" => marks.background = Some(value.to_owned()),
            "font-weight" if value == "bold" || value == "700" => marks.flags |= MarkFlags::BOLD,
            "font-style" if value == "italic" => marks.flags |= MarkFlags::ITALIC,
            _ => {}
        }
    }
    marks
}

fn is_void(tag: &str) -> bool {
    matches!(tag, "br" | "hr" | "img" | "input" | "meta" | "link" | "wbr")
}

fn block_kind(tag: &str) -> Option<ElementKind> {
    match tag {
        "p" | "div" | "blockquote" | "li" | "pre" => Some(ElementKind::Paragraph),
        "h1" | "h2" | "h3" | "h4" | "h5" | "h6" => {
            tag[1..].parse().ok().map(ElementKind::Heading)
        }
        _ => None,
    }
}

fn mark_flag(tag: &str) -> Option<MarkFlags> {
    match tag {
        "strong" | "b" => Some(MarkFlags::BOLD),
        "em" | "i" => Some(MarkFlags::ITALIC),
        "u" => Some(MarkFlags::UNDERLINE),
        "s" | "del" | "strike" => Some(MarkFlags::STRIKE),
        "code" => Some(MarkFlags::CODE),
        _ => None,
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Open {
    Block,
    Chunk,
    Mark,
    Other,
}

#[derive(Debug, Default)]
struct TreeBuilder {
    blocks: Vec<NodeSpec>,
    containers: Vec<(ElementKind, Vec<NodeSpec>)>,
    marks: Vec<Marks>,
    open: Vec<Open>,
    implicit_block: bool,
}

impl TreeBuilder {
    fn current_marks(&self) -> Marks {
        self.marks.last().cloned().unwrap_or_default()
    }

    fn in_chunk(&self) -> bool {
        self.containers.last().is_some_and(|(kind, _)| kind.is_inline())
    }

    fn ensure_block(&mut self) {
        if self.containers.is_empty() {
            self.containers.push((ElementKind::Paragraph, Vec::new()));
            self.implicit_block = true;
        }
    }

    fn start(&mut self, tag: &str, e: &BytesStart<'_>) {
        if is_void(tag) {
            return;
        }
        if let Some(kind) = block_kind(tag) {
            if self.implicit_block {
                self.close_block();
            }
            if self.containers.is_empty() {
                self.containers.push((kind, Vec::new()));
                self.open.push(Open::Block);
            } else {
                self.open.push(Open::Other);
            }
            return;
        }
        if tag == "span"
            && let Some(kind) = attribute(e, TYPE_ATTR).and_then(|t| ChunkKind::from_element_type(&t))
        {
            self.ensure_block();
            if self.in_chunk() {
                self.open.push(Open::Other);
            } else {
                let chunk_id = attribute(e, CHUNK_ID_ATTR).unwrap_or_default();
                self.containers
                    .push((ElementKind::Chunk { kind, chunk_id }, Vec::new()));
                self.open.push(Open::Chunk);
            }
            return;
        }
        let mut marks = self.current_marks();
        if let Some(flag) = mark_flag(tag) {
            marks.flags |= flag;
        }
        if let Some(style) = attribute(e, "style") {
            marks = style_marks(&style, marks);
        }
        if mark_flag(tag).is_some() || tag == "span" {
            self.marks.push(marks);
            self.open.push(Open::Mark);
        } else {
            self.open.push(Open::Other);
        }
    }

    fn end(&mut self, tag: &str) {
        if is_void(tag) {
            return;
        }
        match self.open.pop() {
            Some(Open::Block) => self.close_block(),
            Some(Open::Chunk) => self.close_chunk(),
            Some(Open::Mark) => {
                self.marks.pop();
            }
            Some(Open::Other) | None => {}
        }
    }

    fn text(&mut self, text: String) {
        if text.is_empty() {
            return;
        }
        if self.containers.is_empty() {
            if text.trim().is_empty() {
                return;
            }
            self.ensure_block();
        }
        let marks = self.current_marks();
        if let Some((_, children)) = self.containers.last_mut() {
            children.push(NodeSpec::styled(text, marks));
        }
    }

    fn close_chunk(&mut self) {
        let Some((kind, children)) = self.containers.pop() else {
            return;
        };
        let spec = NodeSpec::Element {
            kind,
            children: non_empty(children),
        };
        match self.containers.last_mut() {
            Some((_, parent)) => parent.push(spec),
            None => self.blocks.push(spec),
        }
    }

    fn close_block(&mut self) {
        while self.in_chunk() {
            self.close_chunk();
        }
        if let Some((kind, children)) = self.containers.pop() {
            self.blocks.push(NodeSpec::Element {
                kind,
                children: non_empty(children),
            });
        }
        self.implicit_block = false;
    }

    fn finish(mut self) -> Vec<NodeSpec> {
        while !self.containers.is_empty() {
            self.close_block();
        }
        self.blocks
    }
}

fn non_empty(children: Vec<NodeSpec>) -> Vec<NodeSpec> {
    if children.is_empty() {
        vec![NodeSpec::text("")]
    } else {
        children
    }
}

/// Parse HTML into block specs.
pub fn parse_html(html: &str) -> Result<Vec<NodeSpec>, HtmlError> {
    let mut reader = Reader::from_str(html);
    reader.config_mut().check_end_names = false;
    let mut builder = TreeBuilder::default();

    loop {
        match reader.read_event()? {
            Event::Start(e) => {
                let tag = String::from_utf8_lossy(e.name().as_ref()).to_ascii_lowercase();
                builder.start(&tag, &e);
            }
            Event::Empty(e) => {
                let tag = String::from_utf8_lossy(e.name().as_ref()).to_ascii_lowercase();
                builder.start(&tag, &e);
                builder.end(&tag);
            }
            Event::End(e) => {
                let tag = String::from_utf8_lossy(e.name().as_ref()).to_ascii_lowercase();
                builder.end(&tag);
            }
            Event::Text(t) => {
                let raw = t.into_inner();
                builder.text(decode_entities(&String::from_utf8_lossy(&raw)));
            }
            Event::CData(c) => {
                let raw = c.into_inner();
                builder.text(String::from_utf8_lossy(&raw).into_owned());
            }
            Event::Eof => break,
            _ => {}
        }
    }

    Ok(builder.finish())
}

/// Build a document from HTML.
pub fn from_html(html: &str) -> Result<Document, HtmlError> {
    Ok(Document::from_blocks(parse_html(html)?)?)
}

/// Parse `html` and insert its blocks starting at block index `at`.
pub fn insert_html(doc: &mut Document, at: usize, html: &str) -> Result<Vec<NodeId>, HtmlError> {
    let specs = parse_html(html)?;
    let mut ids = Vec::with_capacity(specs.len());
    for (offset, spec) in specs.into_iter().enumerate() {
        ids.push(doc.insert_node(&[at + offset], spec)?);
    }
    Ok(ids)
}

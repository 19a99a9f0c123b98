//! Minimal text layout on A4 pages with the built-in Helvetica fonts.

use lopdf::content::{Content, Operation};
use lopdf::{dictionary, Document, Object, ObjectId, Stream};

/// A4 portrait in points.
const PAGE_WIDTH: i64 = 595;
const PAGE_HEIGHT: i64 = 842;
const MARGIN_LEFT: f32 = 64.0;
const MARGIN_TOP: f32 = 72.0;
const MARGIN_BOTTOM: f32 = 72.0;

/// Characters per line before body text wraps.
const WRAP_COLUMNS: usize = 88;

/// Prefix of the continuation lines of a wrapped [`PageText::line`].
const CONTINUATION_INDENT: &str = "    ";

/// One laid-out line of text.
#[derive(Debug, Clone, PartialEq)]
pub(crate) enum Line {
    Heading(String),
    Body(String),
    Bold(String),
    Blank,
}

impl Line {
    fn font(&self) -> (&'static str, f32) {
        match self {
            Line::Heading(_) => ("F2", 16.0),
            Line::Bold(_) => ("F2", 11.0),
            Line::Body(_) | Line::Blank => ("F1", 11.0),
        }
    }

    fn leading(&self) -> f32 {
        match self {
            Line::Heading(_) => 26.0,
            _ => 16.0,
        }
    }

    fn text(&self) -> &str {
        match self {
            Line::Heading(t) | Line::Body(t) | Line::Bold(t) => t,
            Line::Blank => "",
        }
    }
}

/// Builds a sequence of lines. Everything except headings wraps at
/// [`WRAP_COLUMNS`].
#[derive(Debug, Default)]
pub(crate) struct PageText {
    lines: Vec<Line>,
}

impl PageText {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn heading(&mut self, text: impl Into<String>) -> &mut Self {
        self.lines.push(Line::Heading(text.into()));
        self
    }

    pub(crate) fn bold(&mut self, text: impl Into<String>) -> &mut Self {
        for wrapped in wrap(&text.into(), WRAP_COLUMNS) {
            self.lines.push(Line::Bold(wrapped));
        }
        self
    }

    /// A single logical line. Leading whitespace is kept and overflow
    /// continues on further indented lines.
    pub(crate) fn line(&mut self, text: impl Into<String>) -> &mut Self {
        let text = text.into();
        let body = text.trim_start();
        let lead = &text[..text.len() - body.len()];
        let width = WRAP_COLUMNS
            .saturating_sub(lead.len() + CONTINUATION_INDENT.len())
            .max(1);
        let wrapped = wrap(body, width);
        if wrapped.is_empty() {
            self.lines.push(Line::Body(lead.to_string()));
        }
        for (i, part) in wrapped.into_iter().enumerate() {
            let indent = if i == 0 { "" } else { CONTINUATION_INDENT };
            self.lines.push(Line::Body(format!("{lead}{indent}{part}")));
        }
        self
    }

    /// A body paragraph wrapped at word boundaries.
    pub(crate) fn paragraph(&mut self, text: &str) -> &mut Self {
        for wrapped in wrap(text, WRAP_COLUMNS) {
            self.lines.push(Line::Body(wrapped));
        }
        self
    }

    pub(crate) fn blank(&mut self) -> &mut Self {
        self.lines.push(Line::Blank);
        self
    }

    pub(crate) fn lines(&self) -> &[Line] {
        &self.lines
    }

    /// Lay the lines out over as many pages as needed and serialize the PDF.
    pub(crate) fn into_pdf(self) -> Result<Vec<u8>, lopdf::Error> {
        let mut doc = Document::with_version("1.5");
        let pages_id = doc.new_object_id();

        let regular = doc.add_object(dictionary! {
            "Type" => "Font",
            "Subtype" => "Type1",
            "BaseFont" => "Helvetica",
        });
        let bold = doc.add_object(dictionary! {
            "Type" => "Font",
            "Subtype" => "Type1",
            "BaseFont" => "Helvetica-Bold",
        });
        let resources_id = doc.add_object(dictionary! {
            "Font" => dictionary! {
                "F1" => regular,
                "F2" => bold,
            },
        });

        let mut page_ids: Vec<ObjectId> = Vec::new();
        for chunk in paginate(&self.lines) {
            let content = page_content(chunk);
            let content_id = doc.add_object(Stream::new(dictionary! {}, content.encode()?));
            let page_id = doc.add_object(dictionary! {
                "Type" => "Page",
                "Parent" => pages_id,
                "Contents" => content_id,
            });
            page_ids.push(page_id);
        }

        let kids: Vec<Object> = page_ids.iter().map(|id| Object::Reference(*id)).collect();
        let count = kids.len() as i64;
        doc.objects.insert(
            pages_id,
            Object::Dictionary(dictionary! {
                "Type" => "Pages",
                "Kids" => kids,
                "Count" => count,
                "Resources" => resources_id,
                "MediaBox" => vec![0.into(), 0.into(), PAGE_WIDTH.into(), PAGE_HEIGHT.into()],
            }),
        );
        let catalog_id = doc.add_object(dictionary! {
            "Type" => "Catalog",
            "Pages" => pages_id,
        });
        doc.trailer.set("Root", catalog_id);
        doc.compress();

        let mut bytes = Vec::new();
        doc.save_to(&mut bytes)?;
        Ok(bytes)
    }
}

/// Split lines into page-sized chunks. Always yields at least one page.
fn paginate(lines: &[Line]) -> Vec<&[Line]> {
    let usable = PAGE_HEIGHT as f32 - MARGIN_TOP - MARGIN_BOTTOM;
    let mut pages = Vec::new();
    let mut start = 0;
    let mut used = 0.0;
    for (i, line) in lines.iter().enumerate() {
        if used + line.leading() > usable && i > start {
            pages.push(&lines[start..i]);
            start = i;
            used = 0.0;
        }
        used += line.leading();
    }
    pages.push(&lines[start..]);
    pages
}

fn page_content(lines: &[Line]) -> Content {
    let mut operations = Vec::with_capacity(lines.len() * 4 + 2);
    let mut y = PAGE_HEIGHT as f32 - MARGIN_TOP;
    for line in lines {
        if !matches!(line, Line::Blank) {
            let (font, size) = line.font();
            operations.push(Operation::new("BT", vec![]));
            operations.push(Operation::new("Tf", vec![font.into(), size.into()]));
            operations.push(Operation::new("Td", vec![MARGIN_LEFT.into(), y.into()]));
            operations.push(Operation::new(
                "Tj",
                vec![Object::string_literal(pdf_safe(line.text()))],
            ));
            operations.push(Operation::new("ET", vec![]));
        }
        y -= line.leading();
    }
    Content { operations }
}

/// Replace characters the standard Type1 encoding cannot show.
pub(crate) fn pdf_safe(text: &str) -> String {
    text.chars()
        .map(|c| match c {
            '\u{2018}' | '\u{2019}' => '\'',
            '\u{201C}' | '\u{201D}' => '"',
            '\u{2013}' | '\u{2014}' => '-',
            c if c.is_ascii() && !c.is_ascii_control() => c,
            _ => '?',
        })
        .collect()
}

/// Greedy word wrap at `width` characters. Words longer than `width` are
/// broken across lines.
pub(crate) fn wrap(text: &str, width: usize) -> Vec<String> {
    let mut out = Vec::new();
    let mut current = String::new();
    let mut current_len = 0;
    for word in text.split_whitespace().flat_map(|w| split_word(w, width)) {
        let word_len = word.chars().count();
        if current_len > 0 && current_len + 1 + word_len > width {
            out.push(std::mem::take(&mut current));
            current_len = 0;
        }
        if current_len > 0 {
            current.push(' ');
            current_len += 1;
        }
        current.push_str(&word);
        current_len += word_len;
    }
    if !current.is_empty() {
        out.push(current);
    }
    out
}

fn split_word(word: &str, width: usize) -> Vec<String> {
    let chars: Vec<char> = word.chars().collect();
    chars
        .chunks(width.max(1))
        .map(|chunk| chunk.iter().collect())
        .collect()
}

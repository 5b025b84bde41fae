//! A small top-down flow layout over raw PDF content operators.
//!
//! Text is set in the standard Helvetica faces with WinAnsi encoding, so no
//! font program is embedded and the output depends only on the input.

use lopdf::content::{Content, Operation};
use lopdf::{Document, Object, Stream, StringFormat, dictionary};

use crate::core::ImportError;

pub(crate) const PAGE_WIDTH: f32 = 595.0;
pub(crate) const PAGE_HEIGHT: f32 = 842.0;
pub(crate) const MARGIN: f32 = 40.0;
pub(crate) const CONTENT_WIDTH: f32 = PAGE_WIDTH - 2.0 * MARGIN;

const CELL_PADDING: f32 = 5.0;
const LINE_FACTOR: f32 = 1.25;

/// Helvetica advance widths for 0x20..=0x7E, in 1/1000 em.
const HELVETICA_WIDTHS: [u16; 95] = [
    278, 278, 355, 556, 556, 889, 667, 191, 333, 333, 389, 584, 278, 333, 278, 278, // ' '..'/'
    556, 556, 556, 556, 556, 556, 556, 556, 556, 556, 278, 278, 584, 584, 584, 556, // '0'..'?'
    1015, 667, 667, 722, 722, 667, 611, 778, 722, 278, 500, 667, 556, 833, 722, 778, // '@'..'O'
    667, 778, 722, 667, 611, 722, 667, 944, 667, 667, 611, 278, 278, 278, 469, 556, // 'P'..'_'
    333, 556, 556, 500, 556, 556, 278, 556, 556, 222, 222, 500, 222, 833, 556, 556, // '`'..'o'
    556, 556, 333, 500, 278, 556, 500, 722, 500, 500, 500, 334, 260, 334, 584, // 'p'..'~'
];

/// Helvetica-Bold advance widths for 0x20..=0x7E, in 1/1000 em.
const HELVETICA_BOLD_WIDTHS: [u16; 95] = [
    278, 333, 474, 556, 556, 889, 722, 238, 333, 333, 389, 584, 278, 333, 278, 278, // ' '..'/'
    556, 556, 556, 556, 556, 556, 556, 556, 556, 556, 333, 333, 584, 584, 584, 611, // '0'..'?'
    975, 722, 722, 722, 722, 667, 611, 778, 722, 278, 556, 722, 611, 833, 722, 778, // '@'..'O'
    667, 778, 722, 667, 611, 722, 667, 944, 667, 667, 611, 333, 278, 333, 584, 556, // 'P'..'_'
    333, 556, 611, 556, 611, 556, 333, 611, 611, 278, 278, 556, 278, 889, 611, 611, // '`'..'o'
    611, 611, 389, 556, 333, 611, 556, 778, 556, 556, 500, 389, 280, 389, 584, // 'p'..'~'
];

const FALLBACK_WIDTH: u16 = 556;
const BOLD_FALLBACK_WIDTH: u16 = 611;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Font {
    Regular,
    Bold,
}

impl Font {
    fn resource_name(self) -> &'static str {
        match self {
            Font::Regular => "F1",
            Font::Bold => "F2",
        }
    }
}

/// An RGB fill or stroke colour, components in 0..=1.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct Rgb(pub f32, pub f32, pub f32);

impl Rgb {
    pub(crate) const fn hex(value: u32) -> Self {
        Rgb(
            ((value >> 16) & 0xff) as f32 / 255.0,
            ((value >> 8) & 0xff) as f32 / 255.0,
            (value & 0xff) as f32 / 255.0,
        )
    }

    pub(crate) const BLACK: Rgb = Rgb(0.0, 0.0, 0.0);
    pub(crate) const WHITE: Rgb = Rgb(1.0, 1.0, 1.0);
    pub(crate) const GRID: Rgb = Rgb(0.5, 0.5, 0.5);

    fn operands(self) -> Vec<Object> {
        vec![real(self.0), real(self.1), real(self.2)]
    }
}

/// Text style for one run.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct TextStyle {
    pub font: Font,
    pub size: f32,
    pub color: Rgb,
}

impl TextStyle {
    pub(crate) const fn regular(size: f32) -> Self {
        Self {
            font: Font::Regular,
            size,
            color: Rgb::BLACK,
        }
    }

    pub(crate) const fn bold(size: f32) -> Self {
        Self {
            font: Font::Bold,
            size,
            color: Rgb::BLACK,
        }
    }

    pub(crate) const fn with_color(mut self, color: Rgb) -> Self {
        self.color = color;
        self
    }

    fn leading(&self) -> f32 {
        self.size * LINE_FACTOR
    }
}

/// Width of `text` in points when set in `font` at `size`.
pub(crate) fn text_width(text: &str, font: Font, size: f32) -> f32 {
    let units: u32 = text.chars().map(|c| u32::from(char_width(c, font))).sum();
    units as f32 * size / 1000.0
}

fn char_width(c: char, font: Font) -> u16 {
    let (table, fallback) = match font {
        Font::Regular => (&HELVETICA_WIDTHS, FALLBACK_WIDTH),
        Font::Bold => (&HELVETICA_BOLD_WIDTHS, BOLD_FALLBACK_WIDTH),
    };
    match strip_accent(c) as u32 {
        code @ 0x20..=0x7e => table[(code - 0x20) as usize],
        _ => fallback,
    }
}

/// Map accented Latin letters to their base letter for width lookup.
fn strip_accent(c: char) -> char {
    match c {
        'á' | 'à' | 'â' | 'ã' | 'ä' => 'a',
        'Á' | 'À' | 'Â' | 'Ã' | 'Ä' => 'A',
        'é' | 'è' | 'ê' | 'ë' => 'e',
        'É' | 'È' | 'Ê' | 'Ë' => 'E',
        'í' | 'ì' | 'î' | 'ï' => 'i',
        'Í' | 'Ì' | 'Î' | 'Ï' => 'I',
        'ó' | 'ò' | 'ô' | 'õ' | 'ö' => 'o',
        'Ó' | 'Ò' | 'Ô' | 'Õ' | 'Ö' => 'O',
        'ú' | 'ù' | 'û' | 'ü' => 'u',
        'Ú' | 'Ù' | 'Û' | 'Ü' => 'U',
        'ç' => 'c',
        'Ç' => 'C',
        'ñ' => 'n',
        'Ñ' => 'N',
        other => other,
    }
}

/// Encode text for a WinAnsiEncoding font. Unmappable characters become `?`.
pub(crate) fn encode_win_ansi(text: &str) -> Vec<u8> {
    text.chars()
        .map(|c| match c as u32 {
            code @ (0x20..=0x7e | 0xa0..=0xff) => code as u8,
            _ => match c {
                '\t' => b' ',
                '€' => 0x80,
                '‚' => 0x82,
                '„' => 0x84,
                '…' => 0x85,
                '‰' => 0x89,
                '‘' => 0x91,
                '’' => 0x92,
                '“' => 0x93,
                '”' => 0x94,
                '•' => 0x95,
                '–' => 0x96,
                '—' => 0x97,
                '™' => 0x99,
                _ => b'?',
            },
        })
        .collect()
}

/// Greedy word wrap. Words wider than `max_width` are broken by character.
/// Explicit newlines start a new line. Always returns at least one line.
pub(crate) fn wrap(text: &str, font: Font, size: f32, max_width: f32) -> Vec<String> {
    let mut lines = Vec::new();
    for paragraph in text.split('\n') {
        let mut current = String::new();
        for word in paragraph.split_whitespace() {
            let candidate = if current.is_empty() {
                word.to_string()
            } else {
                format!("{current} {word}")
            };
            if text_width(&candidate, font, size) <= max_width {
                current = candidate;
                continue;
            }
            if !current.is_empty() {
                lines.push(std::mem::take(&mut current));
            }
            if text_width(word, font, size) <= max_width {
                current = word.to_string();
            } else {
                for ch in word.chars() {
                    current.push(ch);
                    if text_width(&current, font, size) > max_width && current.chars().count() > 1
                    {
                        current.pop();
                        lines.push(std::mem::take(&mut current));
                        current.push(ch);
                    }
                }
            }
        }
        lines.push(current);
    }
    lines
}

/// Slack for float rounding when deciding whether lines still fit.
const EPSILON: f32 = 0.01;

/// Whether a block of `height` points fits on an empty page.
fn fits_on_page(height: f32) -> bool {
    height <= PAGE_HEIGHT - 2.0 * MARGIN
}

/// `lines[start..end]`, clamped to the lines that exist.
fn line_range(lines: &[String], start: usize, end: usize) -> &[String] {
    let len = lines.len();
    &lines[start.min(len)..end.min(len)]
}

fn real(value: f32) -> Object {
    Object::Real(value)
}

/// Flow layout state: finished pages plus the page being written.
///
/// `cursor` is the y coordinate (from the page bottom) of the next free line.
pub(crate) struct Layout {
    pages: Vec<Vec<Operation>>,
    current: Vec<Operation>,
    cursor: f32,
}

impl Layout {
    pub(crate) fn new() -> Self {
        Self {
            pages: Vec::new(),
            current: Vec::new(),
            cursor: PAGE_HEIGHT - MARGIN,
        }
    }

    pub(crate) fn page_count(&self) -> usize {
        self.pages.len() + usize::from(!self.current.is_empty() || self.pages.is_empty())
    }

    fn new_page(&mut self) {
        let finished = std::mem::take(&mut self.current);
        self.pages.push(finished);
        self.cursor = PAGE_HEIGHT - MARGIN;
    }

    /// Start a new page unless `height` points still fit above the bottom margin.
    pub(crate) fn ensure_space(&mut self, height: f32) {
        let page_is_fresh = self.current.is_empty();
        if self.cursor - height < MARGIN && !page_is_fresh {
            self.new_page();
        }
    }

    pub(crate) fn spacer(&mut self, height: f32) {
        self.cursor -= height;
        if self.cursor < MARGIN {
            self.new_page();
        }
    }

    fn push(&mut self, operator: &str, operands: Vec<Object>) {
        self.current.push(Operation::new(operator, operands));
    }

    fn fill_rect(&mut self, x: f32, y: f32, w: f32, h: f32, color: Rgb) {
        self.push("q", vec![]);
        self.push("rg", color.operands());
        self.push("re", vec![real(x), real(y), real(w), real(h)]);
        self.push("f", vec![]);
        self.push("Q", vec![]);
    }

    fn stroke_rect(&mut self, x: f32, y: f32, w: f32, h: f32) {
        self.push("q", vec![]);
        self.push("w", vec![real(0.5)]);
        self.push("RG", Rgb::GRID.operands());
        self.push("re", vec![real(x), real(y), real(w), real(h)]);
        self.push("S", vec![]);
        self.push("Q", vec![]);
    }

    fn text_at(&mut self, x: f32, baseline: f32, style: TextStyle, text: &str) {
        self.push("BT", vec![]);
        self.push("rg", style.color.operands());
        self.push(
            "Tf",
            vec![
                Object::Name(style.font.resource_name().as_bytes().to_vec()),
                real(style.size),
            ],
        );
        self.push("Td", vec![real(x), real(baseline)]);
        self.push(
            "Tj",
            vec![Object::String(encode_win_ansi(text), StringFormat::Literal)],
        );
        self.push("ET", vec![]);
    }

    /// Wrapped paragraph across the content width. Breaks pages between lines.
    pub(crate) fn paragraph(&mut self, text: &str, style: TextStyle) {
        for line in wrap(text, style.font, style.size, CONTENT_WIDTH) {
            self.ensure_space(style.leading());
            self.cursor -= style.leading();
            self.text_at(MARGIN, self.cursor + style.size * 0.25, style, &line);
        }
    }

    /// Single line of text, horizontally centred.
    pub(crate) fn centered(&mut self, text: &str, style: TextStyle) {
        self.ensure_space(style.leading());
        self.cursor -= style.leading();
        let width = text_width(text, style.font, style.size);
        let x = MARGIN + ((CONTENT_WIDTH - width) / 2.0).max(0.0);
        self.text_at(x, self.cursor + style.size * 0.25, style, text);
    }

    /// Full-width filled band with one or more lines of text inside.
    /// A band taller than a page continues on the next one.
    pub(crate) fn banner(&mut self, lines: &[(String, TextStyle)], fill: Rgb) {
        let wrapped: Vec<(String, TextStyle)> = lines
            .iter()
            .flat_map(|(text, style)| {
                wrap(text, style.font, style.size, CONTENT_WIDTH - 2.0 * CELL_PADDING)
                    .into_iter()
                    .map(move |line| (line, *style))
            })
            .collect();
        let height: f32 =
            wrapped.iter().map(|(_, s)| s.leading()).sum::<f32>() + 2.0 * CELL_PADDING;
        let first_line = wrapped.first().map_or(0.0, |(_, s)| s.leading());
        self.ensure_space(if fits_on_page(height) {
            height
        } else {
            first_line + 2.0 * CELL_PADDING
        });

        let mut rest = wrapped.as_slice();
        while !rest.is_empty() {
            let room = self.cursor - MARGIN - 2.0 * CELL_PADDING + EPSILON;
            let mut take = 0;
            let mut used = 0.0;
            for (_, style) in rest {
                if take > 0 && used + style.leading() > room {
                    break;
                }
                used += style.leading();
                take += 1;
            }
            let (chunk, tail) = rest.split_at(take);

            let top = self.cursor;
            let band = used + 2.0 * CELL_PADDING;
            self.fill_rect(MARGIN, top - band, CONTENT_WIDTH, band, fill);
            let mut y = top - CELL_PADDING;
            for (line, style) in chunk {
                y -= style.leading();
                self.text_at(MARGIN + CELL_PADDING, y + style.size * 0.25, *style, line);
            }
            self.cursor = top - band;

            rest = tail;
            if !rest.is_empty() {
                self.new_page();
            }
        }
    }

    /// Two-column table: shaded label column, wrapped value column, grid lines.
    /// A row that fits on one page is kept together; a taller row continues
    /// on the next page with a blank label cell.
    pub(crate) fn table(&mut self, rows: &[(&str, String)], label_width: f32, style: TextStyle) {
        let label_style = TextStyle {
            font: Font::Bold,
            ..style
        };
        let value_width = CONTENT_WIDTH - label_width;
        let leading = style.leading();

        for (label, value) in rows {
            let label_lines = wrap(label, label_style.font, style.size, label_width - 2.0 * CELL_PADDING);
            let value_lines = wrap(value, style.font, style.size, value_width - 2.0 * CELL_PADDING);
            let line_count = label_lines.len().max(value_lines.len());
            let height = line_count as f32 * leading + 2.0 * CELL_PADDING;
            self.ensure_space(if fits_on_page(height) {
                height
            } else {
                leading + 2.0 * CELL_PADDING
            });

            let mut start = 0;
            while start < line_count {
                let room = (self.cursor - MARGIN - 2.0 * CELL_PADDING + EPSILON) / leading;
                let end = (start + (room.floor() as usize).max(1)).min(line_count);
                let top = self.cursor;
                let bottom = top - ((end - start) as f32 * leading + 2.0 * CELL_PADDING);

                self.fill_rect(MARGIN, bottom, label_width, top - bottom, Rgb::hex(0xf3f4f6));
                self.stroke_rect(MARGIN, bottom, label_width, top - bottom);
                self.stroke_rect(MARGIN + label_width, bottom, value_width, top - bottom);
                self.cell_lines(MARGIN, top, line_range(&label_lines, start, end), label_style);
                self.cell_lines(MARGIN + label_width, top, line_range(&value_lines, start, end), style);
                self.cursor = bottom;

                start = end;
                if start < line_count {
                    self.new_page();
                }
            }
        }
    }

    fn cell_lines(&mut self, x: f32, top: f32, lines: &[String], style: TextStyle) {
        let mut y = top - CELL_PADDING;
        for line in lines {
            y -= style.leading();
            self.text_at(x + CELL_PADDING, y + style.size * 0.25, style, line);
        }
    }

    /// Thin horizontal rule across the content width.
    pub(crate) fn rule(&mut self) {
        self.ensure_space(1.0);
        let y = self.cursor;
        self.push("q", vec![]);
        self.push("w", vec![real(0.5)]);
        self.push("RG", Rgb::GRID.operands());
        self.push("m", vec![real(MARGIN), real(y)]);
        self.push("l", vec![real(MARGIN + CONTENT_WIDTH), real(y)]);
        self.push("S", vec![]);
        self.push("Q", vec![]);
    }

    /// Assemble the pages into a PDF file.
    pub(crate) fn finish(
        mut self,
        title: &str,
        creation_date: &str,
    ) -> Result<Vec<u8>, ImportError> {
        if !self.current.is_empty() || self.pages.is_empty() {
            self.new_page();
        }

        let mut doc = Document::with_version("1.7");
        let pages_id = doc.new_object_id();
        let regular_id = doc.add_object(dictionary! {
            "Type" => "Font",
            "Subtype" => "Type1",
            "BaseFont" => "Helvetica",
            "Encoding" => "WinAnsiEncoding",
        });
        let bold_id = doc.add_object(dictionary! {
            "Type" => "Font",
            "Subtype" => "Type1",
            "BaseFont" => "Helvetica-Bold",
            "Encoding" => "WinAnsiEncoding",
        });
        let resources_id = doc.add_object(dictionary! {
            "Font" => dictionary! {
                Font::Regular.resource_name() => Object::Reference(regular_id),
                Font::Bold.resource_name() => Object::Reference(bold_id),
            },
        });

        let mut kids = Vec::with_capacity(self.pages.len());
        for operations in self.pages {
            let content = Content { operations }
                .encode()
                .map_err(|e| ImportError::RenderFault(format!("failed to encode page content: {e}")))?;
            let content_id = doc.add_object(Stream::new(dictionary! {}, content));
            let page_id = doc.add_object(dictionary! {
                "Type" => "Page",
                "Parent" => Object::Reference(pages_id),
                "MediaBox" => vec![0.into(), 0.into(), real(PAGE_WIDTH), real(PAGE_HEIGHT)],
                "Contents" => Object::Reference(content_id),
                "Resources" => Object::Reference(resources_id),
            });
            kids.push(Object::Reference(page_id));
        }

        let count = kids.len() as i64;
        doc.objects.insert(
            pages_id,
            Object::Dictionary(dictionary! {
                "Type" => "Pages",
                "Kids" => kids,
                "Count" => count,
            }),
        );
        let catalog_id = doc.add_object(dictionary! {
            "Type" => "Catalog",
            "Pages" => Object::Reference(pages_id),
        });
        let info_id = doc.add_object(dictionary! {
            "Title" => Object::String(encode_win_ansi(title), StringFormat::Literal),
            "CreationDate" => Object::string_literal(creation_date),
        });
        doc.trailer.set("Root", Object::Reference(catalog_id));
        doc.trailer.set("Info", Object::Reference(info_id));

        let mut output = Vec::new();
        doc.save_to(&mut output)
            .map_err(|e| ImportError::RenderFault(format!("failed to save PDF: {e}")))?;
        Ok(output)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn widths_follow_afm() {
        assert_eq!(text_width("0", Font::Regular, 1000.0), 556.0);
        assert_eq!(text_width("ã", Font::Regular, 1000.0), text_width("a", Font::Regular, 1000.0));
        assert!(text_width("W", Font::Bold, 10.0) > text_width("W", Font::Regular, 10.0));
    }

    #[test]
    fn bold_widths_follow_bold_afm() {
        assert_eq!(text_width("i", Font::Bold, 1000.0), 278.0);
        assert_eq!(text_width("l", Font::Bold, 1000.0), 278.0);
        assert_eq!(text_width("r", Font::Bold, 1000.0), 389.0);
        assert_eq!(text_width("Ç", Font::Bold, 1000.0), 722.0);
        assert_eq!(text_width("日", Font::Bold, 1000.0), 611.0);
    }

    fn text_baselines(bytes: &[u8]) -> Vec<f32> {
        let doc = Document::load_mem(bytes).unwrap();
        let mut baselines = Vec::new();
        for page_id in doc.get_pages().into_values() {
            let content = Content::decode(&doc.get_page_content(page_id).unwrap()).unwrap();
            for op in content.operations.iter().filter(|op| op.operator == "Td") {
                baselines.push(op.operands[1].as_float().unwrap());
            }
        }
        baselines
    }

    #[test]
    fn tall_table_row_continues_on_next_page() {
        let mut layout = Layout::new();
        let value = "Servico de consultoria tributaria mensal. ".repeat(300);
        layout.table(&[("Descrição", value.clone()), ("Depois", "fim".into())], 150.0, TextStyle::regular(9.0));
        assert!(layout.page_count() >= 2);

        let bytes = layout.finish("t", "D:20260101000000").unwrap();
        let baselines = text_baselines(&bytes);
        assert!(baselines.iter().all(|&y| (MARGIN..=PAGE_HEIGHT - MARGIN).contains(&y)));
        // Every word of the value was placed.
        let lines = wrap(&value, Font::Regular, 9.0, CONTENT_WIDTH - 150.0 - 2.0 * CELL_PADDING);
        assert_eq!(baselines.len(), 1 + lines.len() + 2);
    }

    #[test]
    fn tall_banner_continues_on_next_page() {
        let mut layout = Layout::new();
        let text = "Observacao importante sobre a nota. ".repeat(400);
        layout.banner(&[(text, TextStyle::bold(10.0))], Rgb::WHITE);
        assert!(layout.page_count() >= 2);
        let bytes = layout.finish("t", "D:20260101000000").unwrap();
        assert!(text_baselines(&bytes).iter().all(|&y| (MARGIN..=PAGE_HEIGHT - MARGIN).contains(&y)));
    }

    #[test]
    fn win_ansi_keeps_portuguese_letters() {
        assert_eq!(encode_win_ansi("Ação"), vec![b'A', 0xe7, 0xe3, b'o']);
        assert_eq!(encode_win_ansi("€–"), vec![0x80, 0x96]);
        assert_eq!(encode_win_ansi("日"), b"?".to_vec());
    }

    #[test]
    fn wrap_respects_width() {
        let text = "Prestação de serviços de desenvolvimento de software sob encomenda";
        let lines = wrap(text, Font::Regular, 10.0, 120.0);
        assert!(lines.len() > 1);
        for line in &lines {
            assert!(text_width(line, Font::Regular, 10.0) <= 120.0, "{line}");
        }
        assert_eq!(lines.join(" "), text);
    }

    #[test]
    fn wrap_breaks_long_words_and_keeps_newlines() {
        let key = "A".repeat(200);
        let lines = wrap(&key, Font::Regular, 10.0, 100.0);
        assert!(lines.len() > 1);
        assert_eq!(lines.concat(), key);

        assert_eq!(wrap("a\nb", Font::Regular, 10.0, 500.0), vec!["a", "b"]);
        assert_eq!(wrap("", Font::Regular, 10.0, 500.0), vec![""]);
    }

    #[test]
    fn long_flow_breaks_pages() {
        let mut layout = Layout::new();
        for _ in 0..200 {
            layout.paragraph("linha", TextStyle::regular(10.0));
        }
        assert!(layout.page_count() > 1);
        let bytes = layout.finish("t", "D:20260101000000").unwrap();
        let doc = Document::load_mem(&bytes).unwrap();
        assert_eq!(doc.get_pages().len(), layout_pages_for(200));
    }

    fn layout_pages_for(lines: usize) -> usize {
        let per_page = ((PAGE_HEIGHT - 2.0 * MARGIN) / (10.0 * LINE_FACTOR)).floor() as usize;
        lines.div_ceil(per_page)
    }
}

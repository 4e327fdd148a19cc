//! Content stream interpretation.
//!
//! Walks a page's content stream and produces [`TextSpan`]s with top-down
//! bounding boxes, font size and boldness. Only the operators that affect
//! text placement are interpreted; painting operators are ignored.

use std::collections::BTreeMap;

use lopdf::{content::Content, Dictionary, Document as LopdfDocument, Object, ObjectId};

use crate::error::{Error, Result};
use crate::model::{Rect, TextSpan};

use super::text::{decode_pdf_string, number, resolve};

/// Ascent and descent as fractions of the font size.
const ASCENT: f32 = 0.8;
const DESCENT: f32 = 0.2;

/// Glyph advance used when a font declares no widths.
const DEFAULT_ADVANCE_EM: f32 = 0.5;

/// Gap (in em) above which adjacent pieces get a separating space.
const SPACE_GAP_EM: f32 = 0.15;

/// Gap (in em) above which adjacent pieces become separate spans.
const SPLIT_GAP_EM: f32 = 3.0;

/// Extract the positioned text spans of one page.
pub(crate) fn extract_page_spans(
    doc: &LopdfDocument,
    page_id: ObjectId,
    page_index: usize,
) -> Result<Vec<TextSpan>> {
    let media = page_media_box(doc, page_id);
    let fonts = load_fonts(doc, page_id)?;
    let content = page_content(doc, page_id)?;
    if content.is_empty() {
        return Ok(Vec::new());
    }

    let content = Content::decode(&content).map_err(|e| Error::PdfParse(e.to_string()))?;

    let mut interpreter = Interpreter::new(doc, &fonts, page_index, media);
    for op in &content.operations {
        interpreter.apply(&op.operator, &op.operands);
    }
    Ok(interpreter.finish())
}

/// Page MediaBox as `[llx, lly, urx, ury]`, following inheritance.
pub(crate) fn page_media_box(doc: &LopdfDocument, page_id: ObjectId) -> [f32; 4] {
    let mut current = doc.get_dictionary(page_id).ok();
    // Guard against cyclic /Parent chains.
    for _ in 0..32 {
        let Some(dict) = current else { break };
        if let Some(arr) = dict
            .get(b"MediaBox")
            .ok()
            .and_then(|o| resolve(doc, o))
            .and_then(|o| o.as_array().ok())
        {
            let values: Vec<f32> = arr
                .iter()
                .filter_map(|o| resolve(doc, o).and_then(number))
                .collect();
            if values.len() >= 4 {
                return [
                    values[0].min(values[2]),
                    values[1].min(values[3]),
                    values[0].max(values[2]),
                    values[1].max(values[3]),
                ];
            }
        }
        current = dict
            .get(b"Parent")
            .ok()
            .and_then(|o| o.as_reference().ok())
            .and_then(|id| doc.get_dictionary(id).ok());
    }

    // Letter size
    [0.0, 0.0, 612.0, 792.0]
}

/// Raw (decompressed) content bytes of a page.
fn page_content(doc: &LopdfDocument, page_id: ObjectId) -> Result<Vec<u8>> {
    let page_dict = doc
        .get_dictionary(page_id)
        .map_err(|e| Error::PdfParse(e.to_string()))?;

    let contents = match page_dict.get(b"Contents") {
        Ok(obj) => obj,
        // A page without content is blank, not broken.
        Err(_) => return Ok(Vec::new()),
    };

    let stream_bytes = |obj: &Object| -> Option<Vec<u8>> {
        match resolve(doc, obj)? {
            Object::Stream(s) => s
                .decompressed_content()
                .ok()
                .or_else(|| Some(s.content.clone())),
            _ => None,
        }
    };

    match resolve(doc, contents) {
        Some(Object::Array(arr)) => {
            let mut content = Vec::new();
            for obj in arr {
                if let Some(data) = stream_bytes(obj) {
                    content.extend_from_slice(&data);
                    content.push(b' ');
                }
            }
            Ok(content)
        }
        Some(obj @ Object::Stream(_)) => {
            stream_bytes(obj).ok_or_else(|| Error::PdfParse("Invalid content stream".to_string()))
        }
        _ => Err(Error::PdfParse("Invalid content stream".to_string())),
    }
}

/// Per-font data needed for decoding and measuring text.
struct FontInfo<'a> {
    dict: &'a Dictionary,
    base_font: String,
    is_bold: bool,
    first_char: i64,
    widths: Vec<f32>,
    two_byte: bool,
}

impl FontInfo<'_> {
    /// Advance of an encoded string in text space units (em).
    fn advance_em(&self, bytes: &[u8], decoded: &str) -> f32 {
        if self.widths.is_empty() || self.two_byte {
            return decoded.chars().count() as f32 * DEFAULT_ADVANCE_EM;
        }
        bytes
            .iter()
            .map(|&b| {
                usize::try_from(i64::from(b) - self.first_char)
                    .ok()
                    .and_then(|i| self.widths.get(i))
                    .map_or(DEFAULT_ADVANCE_EM, |w| w / 1000.0)
            })
            .sum()
    }
}

fn load_fonts(doc: &LopdfDocument, page_id: ObjectId) -> Result<BTreeMap<Vec<u8>, FontInfo<'_>>> {
    let lopdf_fonts = doc
        .get_page_fonts(page_id)
        .map_err(|e| Error::PdfParse(e.to_string()))?;

    let mut fonts = BTreeMap::new();
    for (name, dict) in lopdf_fonts {
        let base_font = dict
            .get(b"BaseFont")
            .ok()
            .and_then(|o| o.as_name().ok())
            .map(|n| String::from_utf8_lossy(n).to_string())
            .unwrap_or_else(|| "Unknown".to_string());

        let is_bold = is_bold_font_name(&base_font) || descriptor_says_bold(doc, dict);

        let first_char = dict
            .get(b"FirstChar")
            .ok()
            .and_then(|o| o.as_i64().ok())
            .unwrap_or(0);
        let widths = dict
            .get(b"Widths")
            .ok()
            .and_then(|o| resolve(doc, o))
            .and_then(|o| o.as_array().ok())
            .map(|arr| {
                arr.iter()
                    .map(|o| resolve(doc, o).and_then(number).unwrap_or(0.0))
                    .collect()
            })
            .unwrap_or_default();
        let two_byte = matches!(
            dict.get(b"Subtype").ok().and_then(|o| o.as_name().ok()),
            Some(b"Type0")
        );

        fonts.insert(
            name,
            FontInfo {
                dict,
                base_font,
                is_bold,
                first_char,
                widths,
                two_byte,
            },
        );
    }
    Ok(fonts)
}

/// Check whether a base font name looks bold.
pub fn is_bold_font_name(name: &str) -> bool {
    let lower = name.to_lowercase();
    lower.contains("bold") || lower.contains("black") || lower.contains("heavy")
}

/// Font descriptor weight of at least 600, or the ForceBold flag.
fn descriptor_says_bold(doc: &LopdfDocument, font: &Dictionary) -> bool {
    let lookup = |dict: &Dictionary| -> Option<Dictionary> {
        resolve(doc, dict.get(b"FontDescriptor").ok()?)?
            .as_dict()
            .ok()
            .cloned()
    };

    let descriptor = lookup(font).or_else(|| {
        // Composite fonts keep the descriptor on the descendant.
        let descendants = resolve(doc, font.get(b"DescendantFonts").ok()?)?
            .as_array()
            .ok()?;
        let first = resolve(doc, descendants.first()?)?.as_dict().ok()?;
        lookup(first)
    });

    let Some(descriptor) = descriptor else {
        return false;
    };

    let weight = descriptor
        .get(b"FontWeight")
        .ok()
        .and_then(number)
        .unwrap_or(0.0);
    let flags = descriptor
        .get(b"Flags")
        .ok()
        .and_then(|o| o.as_i64().ok())
        .unwrap_or(0);

    weight >= 600.0 || flags & (1 << 18) != 0
}

/// Affine transform `[a b c d e f]` in PDF row-vector convention.
#[derive(Debug, Clone, Copy, PartialEq)]
struct Matrix {
    a: f32,
    b: f32,
    c: f32,
    d: f32,
    e: f32,
    f: f32,
}

impl Matrix {
    const IDENTITY: Matrix = Matrix {
        a: 1.0,
        b: 0.0,
        c: 0.0,
        d: 1.0,
        e: 0.0,
        f: 0.0,
    };

    fn from_operands(operands: &[Object]) -> Option<Matrix> {
        if operands.len() < 6 {
            return None;
        }
        Some(Matrix {
            a: number(&operands[0])?,
            b: number(&operands[1])?,
            c: number(&operands[2])?,
            d: number(&operands[3])?,
            e: number(&operands[4])?,
            f: number(&operands[5])?,
        })
    }

    fn translation(tx: f32, ty: f32) -> Matrix {
        Matrix {
            e: tx,
            f: ty,
            ..Matrix::IDENTITY
        }
    }

    /// `self × other`
    fn then(&self, other: &Matrix) -> Matrix {
        Matrix {
            a: self.a * other.a + self.b * other.c,
            b: self.a * other.b + self.b * other.d,
            c: self.c * other.a + self.d * other.c,
            d: self.c * other.b + self.d * other.d,
            e: self.e * other.a + self.f * other.c + other.e,
            f: self.e * other.b + self.f * other.d + other.f,
        }
    }

    fn apply(&self, x: f32, y: f32) -> (f32, f32) {
        (
            self.a * x + self.c * y + self.e,
            self.b * x + self.d * y + self.f,
        )
    }

    fn x_scale(&self) -> f32 {
        (self.a * self.a + self.b * self.b).sqrt()
    }

    fn y_scale(&self) -> f32 {
        (self.c * self.c + self.d * self.d).sqrt()
    }
}

/// Text state parameters that survive `BT`/`ET` but not `Q`.
#[derive(Debug, Clone)]
struct TextState {
    font: Vec<u8>,
    size: f32,
    leading: f32,
    rise: f32,
}

impl Default for TextState {
    fn default() -> Self {
        Self {
            font: Vec::new(),
            size: 12.0,
            leading: 0.0,
            rise: 0.0,
        }
    }
}

/// Metadata of the span currently open for merging.
struct OpenSpan {
    block: usize,
    font: Vec<u8>,
    baseline: f32,
}

struct Interpreter<'a, 'f> {
    doc: &'a LopdfDocument,
    fonts: &'f BTreeMap<Vec<u8>, FontInfo<'a>>,
    page: usize,
    media: [f32; 4],
    ctm: Matrix,
    state: TextState,
    stack: Vec<(Matrix, TextState)>,
    tm: Matrix,
    tlm: Matrix,
    block: usize,
    spans: Vec<TextSpan>,
    open: Option<OpenSpan>,
}

impl<'a, 'f> Interpreter<'a, 'f> {
    fn new(
        doc: &'a LopdfDocument,
        fonts: &'f BTreeMap<Vec<u8>, FontInfo<'a>>,
        page: usize,
        media: [f32; 4],
    ) -> Self {
        Self {
            doc,
            fonts,
            page,
            media,
            ctm: Matrix::IDENTITY,
            state: TextState::default(),
            stack: Vec::new(),
            tm: Matrix::IDENTITY,
            tlm: Matrix::IDENTITY,
            block: 0,
            spans: Vec::new(),
            open: None,
        }
    }

    fn finish(self) -> Vec<TextSpan> {
        self.spans
    }

    fn apply(&mut self, operator: &str, operands: &[Object]) {
        match operator {
            "q" => self.stack.push((self.ctm, self.state.clone())),
            "Q" => {
                if let Some((ctm, state)) = self.stack.pop() {
                    self.ctm = ctm;
                    self.state = state;
                }
            }
            "cm" => {
                if let Some(m) = Matrix::from_operands(operands) {
                    self.ctm = m.then(&self.ctm);
                }
            }
            "BT" => {
                self.block += 1;
                self.tm = Matrix::IDENTITY;
                self.tlm = Matrix::IDENTITY;
            }
            "ET" => self.open = None,
            "Tf" => {
                if let [Object::Name(font), size, ..] = operands {
                    self.state.font = font.clone();
                    self.state.size = number(size).unwrap_or(12.0);
                }
            }
            "TL" => {
                if let Some(leading) = operands.first().and_then(number) {
                    self.state.leading = leading;
                }
            }
            "Ts" => {
                if let Some(rise) = operands.first().and_then(number) {
                    self.state.rise = rise;
                }
            }
            "Td" | "TD" => {
                if let [tx, ty, ..] = operands {
                    let tx = number(tx).unwrap_or(0.0);
                    let ty = number(ty).unwrap_or(0.0);
                    if operator == "TD" {
                        self.state.leading = -ty;
                    }
                    self.move_line(tx, ty);
                }
            }
            "Tm" => {
                if let Some(m) = Matrix::from_operands(operands) {
                    self.tm = m;
                    self.tlm = m;
                }
            }
            "T*" => self.next_line(),
            "Tj" => {
                if let Some(Object::String(bytes, _)) = operands.first() {
                    self.show(bytes);
                }
            }
            "TJ" => {
                if let Some(Object::Array(items)) = operands.first() {
                    for item in items {
                        match item {
                            Object::String(bytes, _) => self.show(bytes),
                            other => {
                                if let Some(adjust) = number(other) {
                                    let tx = -adjust / 1000.0 * self.state.size;
                                    self.tm = Matrix::translation(tx, 0.0).then(&self.tm);
                                }
                            }
                        }
                    }
                }
            }
            "'" => {
                self.next_line();
                if let Some(Object::String(bytes, _)) = operands.first() {
                    self.show(bytes);
                }
            }
            "\"" => {
                self.next_line();
                if let Some(Object::String(bytes, _)) = operands.get(2) {
                    self.show(bytes);
                }
            }
            _ => {}
        }
    }

    fn move_line(&mut self, tx: f32, ty: f32) {
        self.tlm = Matrix::translation(tx, ty).then(&self.tlm);
        self.tm = self.tlm;
    }

    fn next_line(&mut self) {
        let leading = self.state.leading;
        self.move_line(0.0, -leading);
    }

    fn decode(&self, bytes: &[u8]) -> String {
        if let Some(font) = self.fonts.get(&self.state.font) {
            if let Ok(encoding) = font.dict.get_font_encoding(self.doc) {
                if let Ok(text) = LopdfDocument::decode_text(&encoding, bytes) {
                    return text;
                }
            }
        }
        decode_pdf_string(bytes)
    }

    /// Show one encoded string at the current text position and advance.
    fn show(&mut self, bytes: &[u8]) {
        let text = self.decode(bytes);
        let fonts = self.fonts;
        let font = fonts.get(&self.state.font);
        let advance_em = font.map_or_else(
            || text.chars().count() as f32 * DEFAULT_ADVANCE_EM,
            |f| f.advance_em(bytes, &text),
        );

        let trm = self.tm.then(&self.ctm);
        let size = self.state.size * trm.y_scale();
        let (x, y) = trm.apply(0.0, self.state.rise);
        let width = advance_em * self.state.size * trm.x_scale();

        self.tm = Matrix::translation(advance_em * self.state.size, 0.0).then(&self.tm);

        if text.trim().is_empty() {
            return;
        }

        let [llx, _, _, ury] = self.media;
        let x0 = x - llx;
        let baseline = ury - y;
        let bbox = Rect::new(
            x0,
            baseline - size * ASCENT,
            x0 + width,
            baseline + size * DESCENT,
        );

        if self.try_merge(&text, &bbox, size, baseline) {
            return;
        }

        let (font_name, is_bold) = font.map_or_else(
            || (String::from_utf8_lossy(&self.state.font).to_string(), false),
            |f| (f.base_font.clone(), f.is_bold),
        );
        self.spans.push(TextSpan::new(
            text, self.page, bbox, size, font_name, is_bold,
        ));
        self.open = Some(OpenSpan {
            block: self.block,
            font: self.state.font.clone(),
            baseline,
        });
    }

    /// Append to the previous span when this piece continues it on the same line.
    fn try_merge(&mut self, text: &str, bbox: &Rect, size: f32, baseline: f32) -> bool {
        let Some(open) = &self.open else {
            return false;
        };
        let Some(last) = self.spans.last_mut() else {
            return false;
        };

        let continues = open.block == self.block
            && open.font == self.state.font
            && (last.font_size - size).abs() < 0.01
            && (open.baseline - baseline).abs() < 0.5
            && bbox.x0 >= last.bbox.x0;
        let gap = bbox.x0 - last.bbox.x1;
        if !continues || gap > size * SPLIT_GAP_EM {
            return false;
        }

        let needs_space = gap > size * SPACE_GAP_EM
            && !last.text.ends_with(char::is_whitespace)
            && !text.starts_with(char::is_whitespace)
            && !(last.text.chars().last().is_some_and(is_spaceless_script_char)
                && text.chars().next().is_some_and(is_spaceless_script_char));
        if needs_space {
            last.text.push(' ');
        }
        last.text.push_str(text);
        last.bbox = last.bbox.union(bbox);
        true
    }
}

/// Scripts written without spaces between words (Chinese, Japanese).
/// Korean uses word spaces and is not included.
fn is_spaceless_script_char(c: char) -> bool {
    let code = c as u32;

    // CJK Unified Ideographs and Extension A
    (0x4E00..=0x9FFF).contains(&code)
    || (0x3400..=0x4DBF).contains(&code)
    // Extensions B-F
    || (0x20000..=0x2EBEF).contains(&code)
    // Hiragana, Katakana
    || (0x3040..=0x30FF).contains(&code)
    // CJK Symbols and Punctuation
    || (0x3000..=0x303F).contains(&code)
}

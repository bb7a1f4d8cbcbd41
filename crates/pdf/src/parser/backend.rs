use std::collections::BTreeMap;

use lopdf::{self, content::Content};

use crate::PdfError;

/// A page identifier mirroring `lopdf::ObjectId`: (object number, generation number).
pub type PageId = (u32, u16);

/// A font entry from a page's resource dictionary.
#[derive(Debug, Clone)]
pub struct PageFont {
    /// Resource key as used by `Tf` (e.g. `b"F1"`).
    pub key: Vec<u8>,
    /// `BaseFont` name, if declared.
    pub base_font: Option<String>,
}

/// Operand of a content-stream operator, detached from `lopdf::Object`.
#[derive(Debug, Clone, PartialEq)]
pub enum Operand {
    Number(f32),
    Name(Vec<u8>),
    Str(Vec<u8>),
    Array(Vec<Operand>),
    Other,
}

impl Operand {
    pub fn as_number(&self) -> Option<f32> {
        match self {
            Operand::Number(n) => Some(*n),
            _ => None,
        }
    }
}

/// A single content-stream operation (operator + operands).
#[derive(Debug, Clone)]
pub struct ContentOp {
    pub operator: String,
    pub operands: Vec<Operand>,
}

impl From<&lopdf::Object> for Operand {
    fn from(obj: &lopdf::Object) -> Self {
        match obj {
            lopdf::Object::Integer(i) => Operand::Number(*i as f32),
            lopdf::Object::Real(f) => Operand::Number(*f),
            lopdf::Object::Name(n) => Operand::Name(n.clone()),
            lopdf::Object::String(s, _) => Operand::Str(s.clone()),
            lopdf::Object::Array(arr) => Operand::Array(arr.iter().map(Operand::from).collect()),
            _ => Operand::Other,
        }
    }
}

/// Best-effort decoding of raw PDF string bytes.
///
/// UTF-16BE with a BOM first, then UTF-8, then Latin-1 byte-per-char.
pub fn decode_text_simple(bytes: &[u8]) -> String {
    if let Some(payload) = bytes.strip_prefix(&[0xFE, 0xFF]) {
        let code_units: Vec<u16> = payload
            .chunks_exact(2)
            .map(|chunk| u16::from_be_bytes([chunk[0], chunk[1]]))
            .collect();
        return String::from_utf16_lossy(&code_units);
    }

    if let Ok(s) = std::str::from_utf8(bytes) {
        return s.to_string();
    }

    bytes.iter().map(|&b| b as char).collect()
}

/// What the text extractor needs from a PDF parser.
///
/// Kept narrow so the content-stream walker can be driven by a mock in tests.
pub trait PdfBackend {
    /// 1-based page number -> [`PageId`].
    fn pages(&self) -> BTreeMap<u32, PageId>;

    fn page_fonts(&self, page: PageId) -> Result<Vec<PageFont>, PdfError>;

    /// Decoded content-stream operations of a page.
    fn page_ops(&self, page: PageId) -> Result<Vec<ContentOp>, PdfError>;

    /// Decode the bytes of a text-showing operand set in `font_key`.
    fn decode_text(&self, page: PageId, font_key: &[u8], bytes: &[u8]) -> String;
}

/// [`PdfBackend`] backed by [`lopdf::Document`].
pub struct LopdfBackend {
    doc: lopdf::Document,
}

impl LopdfBackend {
    pub fn load_bytes(data: &[u8]) -> Result<Self, PdfError> {
        let doc = lopdf::Document::load_mem(data).map_err(|e| PdfError::Parse(e.to_string()))?;

        if doc.is_encrypted() {
            return Err(PdfError::Encrypted);
        }

        Ok(Self { doc })
    }

    pub fn page_count(&self) -> usize {
        self.doc.get_pages().len()
    }

    /// String entries of the trailer's Info dictionary.
    pub fn metadata(&self) -> BTreeMap<String, String> {
        let mut meta = BTreeMap::new();

        let info_dict = match self.doc.trailer.get(b"Info") {
            Ok(lopdf::Object::Reference(id)) => match self.doc.get_object(*id) {
                Ok(lopdf::Object::Dictionary(d)) => d,
                _ => return meta,
            },
            Ok(lopdf::Object::Dictionary(d)) => d,
            _ => return meta,
        };

        let keys: &[&[u8]] = &[b"Title", b"Author", b"Creator", b"Producer"];
        for key in keys {
            if let Ok(lopdf::Object::String(bytes, _)) = info_dict.get(key) {
                meta.insert(
                    String::from_utf8_lossy(key).into_owned(),
                    decode_text_simple(bytes),
                );
            }
        }

        meta
    }

    fn font_encoding_name(&self, page: PageId, font_key: &[u8]) -> Option<String> {
        let fonts = self.doc.get_page_fonts(page).ok()?;
        match fonts.get(font_key)?.get(b"Encoding").ok()? {
            lopdf::Object::Name(name) => Some(String::from_utf8_lossy(name).into_owned()),
            _ => None,
        }
    }
}

fn name_entry(dict: &lopdf::Dictionary, key: &[u8]) -> Option<String> {
    dict.get(key)
        .ok()
        .and_then(|o| o.as_name().ok())
        .map(|n| String::from_utf8_lossy(n).into_owned())
}

impl PdfBackend for LopdfBackend {
    fn pages(&self) -> BTreeMap<u32, PageId> {
        self.doc.get_pages()
    }

    fn page_fonts(&self, page: PageId) -> Result<Vec<PageFont>, PdfError> {
        let fonts = self
            .doc
            .get_page_fonts(page)
            .map_err(|e| PdfError::Parse(format!("cannot get page fonts: {}", e)))?;

        Ok(fonts
            .iter()
            .map(|(key, dict)| PageFont {
                key: key.clone(),
                base_font: name_entry(dict, b"BaseFont"),
            })
            .collect())
    }

    fn page_ops(&self, page: PageId) -> Result<Vec<ContentOp>, PdfError> {
        let raw = self
            .doc
            .get_page_content(page)
            .map_err(|e| PdfError::Parse(format!("cannot get page content: {}", e)))?;

        let content = Content::decode(&raw)
            .map_err(|e| PdfError::Parse(format!("content stream decode error: {}", e)))?;

        Ok(content
            .operations
            .into_iter()
            .map(|op| ContentOp {
                operands: op.operands.iter().map(Operand::from).collect(),
                operator: op.operator,
            })
            .collect())
    }

    fn decode_text(&self, page: PageId, font_key: &[u8], bytes: &[u8]) -> String {
        // Identity-H/V fonts usually carry 2-byte codes that line up with UTF-16.
        let identity = self
            .font_encoding_name(page, font_key)
            .is_some_and(|enc| enc.contains("Identity"));

        if identity && bytes.len() >= 2 && bytes.len() % 2 == 0 {
            let code_units: Vec<u16> = bytes
                .chunks_exact(2)
                .map(|c| u16::from_be_bytes([c[0], c[1]]))
                .collect();
            let decoded = String::from_utf16_lossy(&code_units);
            if !decoded.chars().all(|c| c == '\u{FFFD}' || c == '\0') {
                return decoded;
            }
        }

        decode_text_simple(bytes)
    }
}

//! Text-only PDF rendering of the lead list.
//!
//! The layout is a single column of `|`-separated lines in Helvetica on US
//! Letter pages. The title and column header appear on the first page only;
//! continuation pages carry rows alone.

use crm_console_core::Lead;
use deunicode::deunicode_char;
use lopdf::content::{Content, Operation};
use lopdf::{Document, Object, Stream, dictionary};

/// Report title on the first page.
pub const REPORT_TITLE: &str = "Lead Report";
/// Column header line under the title.
pub const HEADER_LINE: &str = "Name | Email | Phone | Source | Status | Rep";

const FONT: &str = "F1";
const PAGE_WIDTH: f32 = 612.0;
const PAGE_HEIGHT: f32 = 792.0;
const MARGIN_X: f32 = 50.0;
const TOP_OFFSET: f32 = 40.0;
const BOTTOM_LIMIT: f32 = 50.0;

const TITLE_SIZE: f32 = 18.0;
const FONT_SIZE: f32 = 12.0;
const TITLE_STEP: f32 = 30.0;
const HEADER_STEP: f32 = 15.0;
const SEPARATOR_STEP: f32 = 20.0;
const ROW_STEP: f32 = 20.0;

type Rgb = (f32, f32, f32);

const TITLE_COLOR: Rgb = (0.2, 0.2, 0.6);
const HEADER_COLOR: Rgb = (0.1, 0.1, 0.1);
const ROW_COLOR: Rgb = (0.0, 0.0, 0.0);
const SEPARATOR_COLOR: Rgb = (0.7, 0.7, 0.7);

/// One drawing instruction on a page.
#[derive(Debug, Clone, PartialEq)]
pub enum DrawOp {
    Text {
        x: f32,
        y: f32,
        size: f32,
        color: Rgb,
        text: String,
    },
    Line {
        from: (f32, f32),
        to: (f32, f32),
        width: f32,
        color: Rgb,
    },
}

/// The printable lead list.
#[derive(Debug, Clone, Copy)]
pub struct LeadReport<'a> {
    rows: &'a [Lead],
}

impl<'a> LeadReport<'a> {
    #[must_use]
    pub const fn new(rows: &'a [Lead]) -> Self {
        Self { rows }
    }

    /// `name | email | phone | source | status | rep` for one lead.
    #[must_use]
    pub fn row_line(lead: &Lead) -> String {
        format!(
            "{} | {} | {} | {} | {} | {}",
            lead.name, lead.email, lead.phone, lead.source, lead.status, lead.rep
        )
    }

    /// Drawing instructions, one `Vec` per page.
    #[must_use]
    pub fn layout(&self) -> Vec<Vec<DrawOp>> {
        let mut pages = Vec::new();
        let mut ops = Vec::new();
        let mut y = PAGE_HEIGHT - TOP_OFFSET;

        ops.push(text(y, TITLE_SIZE, TITLE_COLOR, REPORT_TITLE));
        y -= TITLE_STEP;

        ops.push(text(y, FONT_SIZE, HEADER_COLOR, HEADER_LINE));
        y -= HEADER_STEP;

        ops.push(DrawOp::Line {
            from: (MARGIN_X, y),
            to: (PAGE_WIDTH - MARGIN_X, y),
            width: 1.0,
            color: SEPARATOR_COLOR,
        });
        y -= SEPARATOR_STEP;

        for lead in self.rows {
            if y < BOTTOM_LIMIT {
                pages.push(std::mem::take(&mut ops));
                y = PAGE_HEIGHT - TOP_OFFSET;
            }
            ops.push(text(y, FONT_SIZE, ROW_COLOR, &Self::row_line(lead)));
            y -= ROW_STEP;
        }

        pages.push(ops);
        pages
    }

    /// Serialize the report as a PDF 1.4 document.
    ///
    /// # Errors
    ///
    /// Returns the `lopdf` error if a content stream or the document cannot
    /// be written.
    pub fn to_pdf(&self) -> Result<Vec<u8>, lopdf::Error> {
        let mut doc = Document::with_version("1.4");
        let pages_id = doc.new_object_id();

        let font_id = doc.add_object(dictionary! {
            "Type" => "Font",
            "Subtype" => "Type1",
            "BaseFont" => "Helvetica",
            "Encoding" => "WinAnsiEncoding",
        });
        let resources_id = doc.add_object(dictionary! {
            "Font" => dictionary! { FONT => font_id },
        });

        let mut kids = Vec::new();
        for ops in self.layout() {
            let content: Content<Vec<Operation>> = Content {
                operations: ops.iter().flat_map(DrawOp::operations).collect(),
            };
            let content_id = doc.add_object(Stream::new(dictionary! {}, content.encode()?));
            let page_id = doc.add_object(dictionary! {
                "Type" => "Page",
                "Parent" => pages_id,
                "Contents" => content_id,
            });
            kids.push(Object::from(page_id));
        }

        let count = i64::try_from(kids.len()).unwrap_or(i64::MAX);
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

        let mut out = Vec::new();
        doc.save_to(&mut out)?;
        Ok(out)
    }
}

impl DrawOp {
    fn operations(&self) -> Vec<Operation> {
        match self {
            Self::Text {
                x,
                y,
                size,
                color: (r, g, b),
                text,
            } => vec![
                Operation::new("BT", vec![]),
                Operation::new("Tf", vec![FONT.into(), (*size).into()]),
                Operation::new("rg", vec![(*r).into(), (*g).into(), (*b).into()]),
                Operation::new("Td", vec![(*x).into(), (*y).into()]),
                Operation::new("Tj", vec![Object::string_literal(win_ansi(text))]),
                Operation::new("ET", vec![]),
            ],
            Self::Line {
                from: (x1, y1),
                to: (x2, y2),
                width,
                color: (r, g, b),
            } => vec![
                Operation::new("RG", vec![(*r).into(), (*g).into(), (*b).into()]),
                Operation::new("w", vec![(*width).into()]),
                Operation::new("m", vec![(*x1).into(), (*y1).into()]),
                Operation::new("l", vec![(*x2).into(), (*y2).into()]),
                Operation::new("S", vec![]),
            ],
        }
    }
}

fn text(y: f32, size: f32, color: Rgb, text: &str) -> DrawOp {
    DrawOp::Text {
        x: MARGIN_X,
        y,
        size,
        color,
        text: text.to_owned(),
    }
}

/// Encode `text` for the WinAnsi Helvetica font.
///
/// Latin-1 characters pass through; anything else is transliterated to
/// ASCII, so `Łukasz` prints as `Lukasz`. Characters with no
/// transliteration become `?`.
fn win_ansi(text: &str) -> Vec<u8> {
    let mut out = Vec::with_capacity(text.len());
    for c in text.chars() {
        match u8::try_from(u32::from(c)) {
            Ok(byte) if !(0x80..0xA0).contains(&byte) => out.push(byte),
            _ => match deunicode_char(c) {
                Some(ascii) if !ascii.is_empty() => out.extend_from_slice(ascii.as_bytes()),
                _ => out.push(b'?'),
            },
        }
    }
    out
}

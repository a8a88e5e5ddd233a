//! PDF backend for the document renderer.
//!
//! Keeps a vertical write cursor per page; every write measures its height
//! first and starts a new page when the block would cross the footer area.
//! Footers are stamped over all pages at save time, once the final page
//! count is known.

use printpdf::path::{PaintMode, WindingOrder};
use printpdf::{
    BuiltinFont, Color, IndirectFontRef, Line, Mm, PdfDocument,
    PdfDocumentReference, PdfLayerIndex, PdfLayerReference, PdfPageIndex, Point, Polygon, Rgb,
};

use super::document::{CoverPage, DocumentSink};
use crate::assemble::{Cell, CellStatus, Table};
use crate::errors::RenderError;
use crate::fmt::{truncate, wrap};

const PAGE_WIDTH: f32 = 210.0;
const PAGE_HEIGHT: f32 = 297.0;
const MARGIN: f32 = 15.0;
const TOP: f32 = 20.0;
const BOTTOM: f32 = 22.0;
const LINE_STEP: f32 = 6.0;
const ROW_STEP: f32 = 7.0;
const NOTE_STEP: f32 = 5.0;
const NOTE_WIDTH_CHARS: usize = 100;

/// Colors and labels used by the PDF backend. Injectable so alternate
/// palettes can be supplied by callers or tests.
#[derive(Debug, Clone)]
pub struct Theme {
    pub product_label: String,
    pub heading: (f32, f32, f32),
    pub rule: (f32, f32, f32),
    pub table_head_fill: (f32, f32, f32),
    pub pass_fill: (f32, f32, f32),
    pub fail_fill: (f32, f32, f32),
    pub text: (f32, f32, f32),
    pub muted: (f32, f32, f32),
}

impl Default for Theme {
    fn default() -> Self {
        Self {
            product_label: "Dossier Evaluation Suite".to_string(),
            heading: (0.13, 0.20, 0.40),
            rule: (0.55, 0.60, 0.70),
            table_head_fill: (0.88, 0.90, 0.94),
            pass_fill: (0.84, 0.93, 0.84),
            fail_fill: (0.96, 0.84, 0.84),
            text: (0.10, 0.10, 0.12),
            muted: (0.45, 0.45, 0.50),
        }
    }
}

#[derive(Clone, Copy)]
enum FontKind {
    Regular,
    Bold,
}

pub struct PdfSink {
    doc: PdfDocumentReference,
    pages: Vec<(PdfPageIndex, PdfLayerIndex)>,
    regular: IndirectFontRef,
    bold: IndirectFontRef,
    /// Write position, measured from the top edge of the current page.
    cursor: f32,
    theme: Theme,
}

impl PdfSink {
    pub fn new(document_title: &str, theme: Theme) -> Result<Self, RenderError> {
        let (doc, page, layer) =
            PdfDocument::new(document_title, Mm(PAGE_WIDTH as _), Mm(PAGE_HEIGHT as _), "content");
        let regular = doc
            .add_builtin_font(BuiltinFont::Helvetica)
            .map_err(backend)?;
        let bold = doc
            .add_builtin_font(BuiltinFont::HelveticaBold)
            .map_err(backend)?;
        Ok(Self {
            doc,
            pages: vec![(page, layer)],
            regular,
            bold,
            cursor: TOP,
            theme,
        })
    }

    fn layer(&self) -> PdfLayerReference {
        let (page, layer) = self.pages[self.pages.len() - 1];
        self.doc.get_page(page).get_layer(layer)
    }

    fn new_page(&mut self) {
        let (page, layer) = self
            .doc
            .add_page(Mm(PAGE_WIDTH as _), Mm(PAGE_HEIGHT as _), "content");
        self.pages.push((page, layer));
        self.cursor = TOP;
    }

    /// Start a new page unless `height` still fits above the footer area.
    fn ensure_room(&mut self, height: f32) {
        if self.cursor + height > PAGE_HEIGHT - BOTTOM {
            self.new_page();
        }
    }

    fn font(&self, kind: FontKind) -> &IndirectFontRef {
        match kind {
            FontKind::Regular => &self.regular,
            FontKind::Bold => &self.bold,
        }
    }

    /// Place text with the baseline `from_top` millimeters below the top
    /// edge.
    fn put(
        &self,
        layer: &PdfLayerReference,
        text: &str,
        size: f32,
        x: f32,
        from_top: f32,
        kind: FontKind,
        color: (f32, f32, f32),
    ) {
        layer.set_fill_color(Color::Rgb(Rgb::new(
            color.0 as _,
            color.1 as _,
            color.2 as _,
            None,
        )));
        layer.use_text(
            text,
            size as _,
            Mm(x as _),
            Mm((PAGE_HEIGHT - from_top) as _),
            self.font(kind),
        );
    }

    fn rule(&self, layer: &PdfLayerReference, x1: f32, x2: f32, from_top: f32) {
        layer.set_outline_color(Color::Rgb(Rgb::new(
            self.theme.rule.0 as _,
            self.theme.rule.1 as _,
            self.theme.rule.2 as _,
            None,
        )));
        layer.set_outline_thickness(0.6);
        let y = PAGE_HEIGHT - from_top;
        layer.add_line(Line {
            points: vec![
                (Point::new(Mm(x1 as _), Mm(y as _)), false),
                (Point::new(Mm(x2 as _), Mm(y as _)), false),
            ],
            is_closed: false,
        });
    }

    fn fill_band(
        &self,
        layer: &PdfLayerReference,
        x1: f32,
        x2: f32,
        top: f32,
        bottom: f32,
        color: (f32, f32, f32),
    ) {
        layer.set_fill_color(Color::Rgb(Rgb::new(
            color.0 as _,
            color.1 as _,
            color.2 as _,
            None,
        )));
        let y_top = PAGE_HEIGHT - top;
        let y_bottom = PAGE_HEIGHT - bottom;
        let band = Polygon {
            rings: vec![vec![
                (Point::new(Mm(x1 as _), Mm(y_top as _)), false),
                (Point::new(Mm(x2 as _), Mm(y_top as _)), false),
                (Point::new(Mm(x2 as _), Mm(y_bottom as _)), false),
                (Point::new(Mm(x1 as _), Mm(y_bottom as _)), false),
            ]],
            mode: PaintMode::Fill,
            winding_order: WindingOrder::NonZero,
        };
        layer.add_polygon(band);
    }

    fn table_header_row(&mut self, columns: &[String], col_width: f32, budget: usize) {
        let layer = self.layer();
        let top = self.cursor;
        self.fill_band(
            &layer,
            MARGIN,
            PAGE_WIDTH - MARGIN,
            top,
            top + ROW_STEP,
            self.theme.table_head_fill,
        );
        for (i, cell) in columns.iter().enumerate() {
            let x = MARGIN + col_width * i as f32 + 1.5;
            self.put(
                &layer,
                &truncate(cell, budget),
                9.0,
                x,
                top + 5.0,
                FontKind::Bold,
                self.theme.text,
            );
        }
        self.cursor += ROW_STEP;
    }

    fn table_body_row(&mut self, cells: &[Cell], col_width: f32, budget: usize) {
        let layer = self.layer();
        let top = self.cursor;
        for (i, cell) in cells.iter().enumerate() {
            let x = MARGIN + col_width * i as f32;
            if let Some(status) = cell.status {
                let fill = match status {
                    CellStatus::Pass => self.theme.pass_fill,
                    CellStatus::Fail => self.theme.fail_fill,
                };
                self.fill_band(&layer, x, x + col_width, top, top + ROW_STEP, fill);
            }
            self.put(
                &layer,
                &truncate(&cell.text, budget),
                9.0,
                x + 1.5,
                top + 5.0,
                FontKind::Regular,
                self.theme.text,
            );
        }
        self.rule(&layer, MARGIN, PAGE_WIDTH - MARGIN, top + ROW_STEP);
        self.cursor += ROW_STEP;
    }
}

impl DocumentSink for PdfSink {
    fn cover(&mut self, cover: &CoverPage) -> Result<(), RenderError> {
        let layer = self.layer();
        let mut y = 90.0;
        self.put(
            &layer,
            &cover.title,
            26.0,
            MARGIN,
            y,
            FontKind::Bold,
            self.theme.heading,
        );
        y += 14.0;
        self.put(
            &layer,
            &cover.subtitle,
            15.0,
            MARGIN,
            y,
            FontKind::Regular,
            self.theme.text,
        );
        y += 8.0;
        self.rule(&layer, MARGIN, PAGE_WIDTH - MARGIN, y);
        y += 14.0;
        for (key, value) in &cover.facts {
            self.put(
                &layer,
                &format!("{key}:"),
                11.0,
                MARGIN,
                y,
                FontKind::Bold,
                self.theme.muted,
            );
            self.put(&layer, value, 11.0, MARGIN + 48.0, y, FontKind::Regular, self.theme.text);
            y += LINE_STEP + 1.0;
        }
        self.cursor = y;
        Ok(())
    }

    fn start_section(&mut self, number: usize, title: &str) -> Result<(), RenderError> {
        self.ensure_room(18.0);
        self.cursor += 4.0;
        let layer = self.layer();
        self.put(
            &layer,
            &format!("{number}. {title}"),
            14.0,
            MARGIN,
            self.cursor + 5.0,
            FontKind::Bold,
            self.theme.heading,
        );
        self.rule(&layer, MARGIN, PAGE_WIDTH - MARGIN, self.cursor + 7.0);
        self.cursor += 12.0;
        Ok(())
    }

    fn write_subheading(&mut self, text: &str) -> Result<(), RenderError> {
        self.ensure_room(10.0);
        self.cursor += 2.0;
        let layer = self.layer();
        self.put(
            &layer,
            text,
            11.5,
            MARGIN,
            self.cursor + 4.5,
            FontKind::Bold,
            self.theme.text,
        );
        self.cursor += 7.0;
        Ok(())
    }

    fn write_key_value(&mut self, key: &str, value: &str) -> Result<(), RenderError> {
        self.ensure_room(LINE_STEP);
        let layer = self.layer();
        let baseline = self.cursor + 4.5;
        self.put(
            &layer,
            &format!("{key}:"),
            10.0,
            MARGIN + 2.0,
            baseline,
            FontKind::Bold,
            self.theme.muted,
        );
        self.put(
            &layer,
            &truncate(value, 90),
            10.0,
            MARGIN + 52.0,
            baseline,
            FontKind::Regular,
            self.theme.text,
        );
        self.cursor += LINE_STEP;
        Ok(())
    }

    fn write_table(&mut self, table: &Table) -> Result<(), RenderError> {
        if let Some(title) = &table.title {
            self.write_subheading(title)?;
        }
        let columns = table.header.len().max(1);
        let col_width = (PAGE_WIDTH - 2.0 * MARGIN) / columns as f32;
        // Roughly 1.6 mm per character at the 9 pt table size.
        let budget = ((col_width - 3.0) / 1.6).max(4.0) as usize;

        // Header plus at least one body row must fit before drawing starts.
        self.ensure_room(ROW_STEP * 2.0);
        self.table_header_row(&table.header, col_width, budget);
        for row in &table.rows {
            self.ensure_room(ROW_STEP);
            self.table_body_row(row, col_width, budget);
        }
        self.cursor += 3.0;
        Ok(())
    }

    fn write_note(&mut self, text: &str) -> Result<(), RenderError> {
        let lines = wrap(text, NOTE_WIDTH_CHARS);
        self.ensure_room(NOTE_STEP * lines.len() as f32 + 2.0);
        let layer = self.layer();
        for line in &lines {
            self.put(
                &layer,
                line,
                9.5,
                MARGIN + 2.0,
                self.cursor + 4.0,
                FontKind::Regular,
                self.theme.text,
            );
            self.cursor += NOTE_STEP;
        }
        self.cursor += 2.0;
        Ok(())
    }

    fn page_break(&mut self) -> Result<(), RenderError> {
        self.new_page();
        Ok(())
    }

    fn save(self) -> Result<Vec<u8>, RenderError> {
        // Footer pass: the total page count is only known here.
        let total = self.pages.len();
        for (i, (page, layer)) in self.pages.iter().enumerate() {
            let layer = self.doc.get_page(*page).get_layer(*layer);
            self.put(
                &layer,
                &self.theme.product_label,
                8.0,
                MARGIN,
                PAGE_HEIGHT - 10.0,
                FontKind::Regular,
                self.theme.muted,
            );
            let label = format!("Page {} of {}", i + 1, total);
            let x = PAGE_WIDTH - MARGIN - label.chars().count() as f32 * 1.5;
            self.put(
                &layer,
                &label,
                8.0,
                x,
                PAGE_HEIGHT - 10.0,
                FontKind::Regular,
                self.theme.muted,
            );
        }
        self.doc
            .save_to_bytes()
            .map_err(|e| RenderError::Backend(e.to_string()))
    }
}

fn backend(err: printpdf::Error) -> RenderError {
    RenderError::Backend(err.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::report::document::{render_document, CoverPage};
    use crate::{ContentBlock, Section, SectionId};

    fn cover() -> CoverPage {
        CoverPage {
            title: "Evaluation Report".to_string(),
            subtitle: "Smoke".to_string(),
            facts: vec![("Project".to_string(), "Atlas".to_string())],
        }
    }

    #[test]
    fn pdf_bytes_start_with_magic() {
        let sink = PdfSink::new("Smoke", Theme::default()).unwrap();
        let sections = vec![Section {
            id: SectionId::ExecutiveSummary,
            title: "Executive Summary".to_string(),
            blocks: vec![ContentBlock::Note("hello".to_string())],
        }];
        let bytes = render_document(sink, &cover(), &sections).unwrap();
        assert!(bytes.starts_with(b"%PDF"), "not a PDF header");
        assert!(bytes.len() > 500);
    }

    #[test]
    fn long_tables_spill_onto_new_pages() {
        let mut sink = PdfSink::new("Paging", Theme::default()).unwrap();
        sink.cover(&cover()).unwrap();
        sink.page_break().unwrap();
        let before = sink.pages.len();
        let table = crate::assemble::Table {
            title: Some("Big".to_string()),
            header: vec!["A".to_string(), "B".to_string()],
            rows: (0..80)
                .map(|i| vec![Cell::plain(i.to_string()), Cell::verdict(i % 2 == 0)])
                .collect(),
        };
        sink.write_table(&table).unwrap();
        assert!(sink.pages.len() > before, "expected a page break");
        let bytes = sink.save().unwrap();
        assert!(bytes.starts_with(b"%PDF"));
    }
}

use anyhow::Result;
use budget_core::ExportFormat;
use docx_rs::{
    AlignmentType, Docx, LineSpacing, PageMargin, Paragraph as DocxParagraph, Run as DocxRun,
    Shading, Table as DocxTable, TableCell as DocxTableCell, TableRow as DocxTableRow, WidthType,
};
use std::io::Cursor;

use crate::encoder::DocumentEncoder;
use crate::tree::{Alignment, Block, Document, HeadingLevel, Paragraph, Run, Table};

/// Title size in half-points (24pt).
const TITLE_SIZE: usize = 48;
/// Section heading size in half-points (14pt).
const SECTION_SIZE: usize = 28;
/// Table width in fiftieths of a percent, i.e. 100%.
const FULL_WIDTH_PCT: usize = 5000;

/// Word (.docx) output via `docx-rs`.
#[derive(Debug, Clone, Copy, Default)]
pub struct DocxEncoder;

impl DocumentEncoder for DocxEncoder {
    fn format(&self) -> ExportFormat {
        ExportFormat::Docx
    }

    fn encode(&self, doc: &Document) -> Result<Vec<u8>> {
        let margin = doc.page_margin as i32;
        let mut docx = Docx::new().page_margin(
            PageMargin::new()
                .top(margin)
                .right(margin)
                .bottom(margin)
                .left(margin),
        );

        for block in &doc.blocks {
            docx = match block {
                Block::Paragraph(p) => docx.add_paragraph(paragraph(p)),
                Block::Table(t) => docx.add_table(table(t)),
            };
        }

        let mut buf = Cursor::new(Vec::new());
        docx.build()
            .pack(&mut buf)
            .map_err(|e| anyhow::anyhow!("Failed to pack DOCX: {}", e))?;

        Ok(buf.into_inner())
    }
}

fn paragraph(p: &Paragraph) -> DocxParagraph {
    let heading_size = match p.heading {
        Some(HeadingLevel::Title) => Some(TITLE_SIZE),
        Some(HeadingLevel::Section) => Some(SECTION_SIZE),
        None => None,
    };

    let mut out = DocxParagraph::new();
    for r in &p.runs {
        let mut docx_run = run(r);
        if let Some(size) = heading_size {
            docx_run = docx_run.bold().size(size);
        }
        out = out.add_run(docx_run);
    }

    let alignment = match p.alignment {
        Alignment::Left => AlignmentType::Left,
        Alignment::Center => AlignmentType::Center,
        Alignment::Right => AlignmentType::Right,
    };
    out.align(alignment)
        .line_spacing(LineSpacing::new().before(p.spacing_before).after(p.spacing_after))
}

fn run(r: &Run) -> DocxRun {
    let mut out = DocxRun::new().add_text(&r.text);
    if r.bold {
        out = out.bold();
    }
    if let Some(size) = r.size {
        out = out.size(size);
    }
    if let Some(color) = &r.color {
        out = out.color(color);
    }
    out
}

fn table(t: &Table) -> DocxTable {
    let rows = t
        .rows
        .iter()
        .map(|row| {
            let cells = row
                .cells
                .iter()
                .map(|cell| {
                    let mut out = DocxTableCell::new();
                    for p in &cell.paragraphs {
                        out = out.add_paragraph(paragraph(p));
                    }
                    if let Some(fill) = &cell.shading {
                        out = out.shading(Shading::new().fill(fill));
                    }
                    out
                })
                .collect();
            DocxTableRow::new(cells)
        })
        .collect();

    let out = DocxTable::new(rows).width(FULL_WIDTH_PCT, WidthType::Pct);
    if t.borderless {
        out.clear_all_border()
    } else {
        out
    }
}

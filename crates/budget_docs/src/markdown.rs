use anyhow::Result;
use budget_core::ExportFormat;

use crate::encoder::DocumentEncoder;
use crate::tree::{Block, Document, HeadingLevel, Paragraph, Table};

/// Plain Markdown output. Formatting beyond bold and headings is dropped.
#[derive(Debug, Clone, Copy, Default)]
pub struct MarkdownEncoder;

impl DocumentEncoder for MarkdownEncoder {
    fn format(&self) -> ExportFormat {
        ExportFormat::Markdown
    }

    fn encode(&self, doc: &Document) -> Result<Vec<u8>> {
        let parts: Vec<String> = doc
            .blocks
            .iter()
            .map(|block| match block {
                Block::Paragraph(p) => paragraph_markdown(p),
                Block::Table(t) => table_markdown(t),
            })
            .filter(|part| !part.is_empty())
            .collect();

        let mut out = parts.join("\n\n");
        out.push('\n');
        Ok(out.into_bytes())
    }
}

fn paragraph_markdown(p: &Paragraph) -> String {
    let text: String = p
        .runs
        .iter()
        .map(|r| {
            let trimmed = r.text.trim_end();
            if r.bold && p.heading.is_none() && !trimmed.is_empty() {
                // keep trailing space outside the emphasis markers
                format!("**{trimmed}**{}", &r.text[trimmed.len()..])
            } else {
                r.text.clone()
            }
        })
        .collect();

    match p.heading {
        Some(HeadingLevel::Title) => format!("# {text}"),
        Some(HeadingLevel::Section) => format!("## {text}"),
        None => text.trim().to_string(),
    }
}

fn table_markdown(t: &Table) -> String {
    if t.borderless {
        // Layout-only tables flatten into their paragraphs.
        return t
            .rows
            .iter()
            .flat_map(|row| row.cells.iter())
            .flat_map(|cell| cell.paragraphs.iter())
            .map(paragraph_markdown)
            .filter(|line| !line.is_empty())
            .collect::<Vec<_>>()
            .join("\n\n");
    }

    let Some(header) = t.rows.first() else {
        return String::new();
    };

    let cell_text = |cell: &crate::tree::TableCell| escape_pipe(&cell.plain_text().replace('\n', " "));

    let mut lines = Vec::with_capacity(t.rows.len() + 1);
    let header_cells: Vec<String> = header.cells.iter().map(cell_text).collect();
    lines.push(format!("| {} |", header_cells.join(" | ")));

    let separators: Vec<&str> = header.cells.iter().map(|_| "---").collect();
    lines.push(format!("| {} |", separators.join(" | ")));

    for row in t.body_rows() {
        let cells: Vec<String> = row.cells.iter().map(cell_text).collect();
        lines.push(format!("| {} |", cells.join(" | ")));
    }

    lines.join("\n")
}

fn escape_pipe(s: &str) -> String {
    s.replace('|', "\\|")
}

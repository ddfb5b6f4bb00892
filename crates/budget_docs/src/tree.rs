//! Language-neutral document tree.
//!
//! The builder produces this tree; encoders turn it into bytes. Sizes are in
//! half-points and spacing in twentieths of a point (twips), the units DOCX
//! uses natively.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Alignment {
    #[default]
    Left,
    Center,
    Right,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum HeadingLevel {
    Title,
    Section,
}

/// A span of text sharing one formatting.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Run {
    pub text: String,
    pub bold: bool,
    /// Font size in half-points.
    pub size: Option<usize>,
    /// Hex RGB, e.g. `"FFFFFF"`.
    pub color: Option<String>,
}

impl Run {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            ..Self::default()
        }
    }

    pub fn bold(mut self) -> Self {
        self.bold = true;
        self
    }

    pub fn size(mut self, half_points: usize) -> Self {
        self.size = Some(half_points);
        self
    }

    pub fn color(mut self, hex: impl Into<String>) -> Self {
        self.color = Some(hex.into());
        self
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Paragraph {
    pub runs: Vec<Run>,
    pub heading: Option<HeadingLevel>,
    pub alignment: Alignment,
    pub spacing_before: u32,
    pub spacing_after: u32,
}

impl Paragraph {
    pub fn new() -> Self {
        Self::default()
    }

    /// A paragraph holding a single plain run.
    pub fn text(text: impl Into<String>) -> Self {
        Self::new().run(Run::new(text))
    }

    pub fn heading(level: HeadingLevel, text: impl Into<String>) -> Self {
        Self {
            heading: Some(level),
            ..Self::text(text)
        }
    }

    pub fn run(mut self, run: Run) -> Self {
        self.runs.push(run);
        self
    }

    pub fn align(mut self, alignment: Alignment) -> Self {
        self.alignment = alignment;
        self
    }

    pub fn spacing(mut self, before: u32, after: u32) -> Self {
        self.spacing_before = before;
        self.spacing_after = after;
        self
    }

    /// Concatenated text of all runs.
    pub fn plain_text(&self) -> String {
        self.runs.iter().map(|r| r.text.as_str()).collect()
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct TableCell {
    pub paragraphs: Vec<Paragraph>,
    /// Background fill, hex RGB.
    pub shading: Option<String>,
}

impl TableCell {
    pub fn new(paragraph: Paragraph) -> Self {
        Self {
            paragraphs: vec![paragraph],
            shading: None,
        }
    }

    pub fn with_paragraphs(paragraphs: Vec<Paragraph>) -> Self {
        Self {
            paragraphs,
            shading: None,
        }
    }

    pub fn shaded(mut self, fill: impl Into<String>) -> Self {
        self.shading = Some(fill.into());
        self
    }

    pub fn plain_text(&self) -> String {
        self.paragraphs
            .iter()
            .map(Paragraph::plain_text)
            .collect::<Vec<_>>()
            .join("\n")
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct TableRow {
    pub cells: Vec<TableCell>,
}

impl TableRow {
    pub fn new(cells: Vec<TableCell>) -> Self {
        Self { cells }
    }
}

/// A full-width table. The first row is the header unless `borderless`.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Table {
    pub rows: Vec<TableRow>,
    pub borderless: bool,
}

impl Table {
    pub fn new(rows: Vec<TableRow>) -> Self {
        Self {
            rows,
            borderless: false,
        }
    }

    pub fn borderless(mut self) -> Self {
        self.borderless = true;
        self
    }

    /// Rows after the header row.
    pub fn body_rows(&self) -> &[TableRow] {
        self.rows.get(1..).unwrap_or(&[])
    }

    pub fn column_count(&self) -> usize {
        self.rows.first().map(|r| r.cells.len()).unwrap_or(0)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Block {
    Paragraph(Paragraph),
    Table(Table),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Document {
    /// Page margin on every side, in twips.
    pub page_margin: u32,
    pub blocks: Vec<Block>,
}

impl Document {
    pub fn new(page_margin: u32) -> Self {
        Self {
            page_margin,
            blocks: Vec::new(),
        }
    }

    pub fn push_paragraph(&mut self, paragraph: Paragraph) {
        self.blocks.push(Block::Paragraph(paragraph));
    }

    pub fn push_table(&mut self, table: Table) {
        self.blocks.push(Block::Table(table));
    }

    pub fn tables(&self) -> Vec<&Table> {
        self.blocks
            .iter()
            .filter_map(|b| match b {
                Block::Table(t) => Some(t),
                Block::Paragraph(_) => None,
            })
            .collect()
    }

    pub fn paragraphs(&self) -> Vec<&Paragraph> {
        self.blocks
            .iter()
            .filter_map(|b| match b {
                Block::Paragraph(p) => Some(p),
                Block::Table(_) => None,
            })
            .collect()
    }

    /// Text of every top-level paragraph, in order.
    pub fn paragraph_texts(&self) -> Vec<String> {
        self.paragraphs().into_iter().map(Paragraph::plain_text).collect()
    }
}

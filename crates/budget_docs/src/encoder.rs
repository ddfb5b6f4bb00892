use anyhow::Result;
use budget_core::ExportFormat;

use crate::docx::DocxEncoder;
use crate::html::HtmlEncoder;
use crate::markdown::MarkdownEncoder;
use crate::tree::Document;

/// Turns a document tree into the bytes of one concrete file format.
pub trait DocumentEncoder: Send + Sync {
    fn format(&self) -> ExportFormat;

    fn encode(&self, doc: &Document) -> Result<Vec<u8>>;
}

/// The built-in encoder for `format`.
pub fn encoder_for(format: ExportFormat) -> Box<dyn DocumentEncoder> {
    match format {
        ExportFormat::Docx => Box::new(DocxEncoder),
        ExportFormat::Html => Box::new(HtmlEncoder),
        ExportFormat::Markdown => Box::new(MarkdownEncoder),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn factory_matches_format() {
        for format in [ExportFormat::Docx, ExportFormat::Html, ExportFormat::Markdown] {
            assert_eq!(encoder_for(format).format(), format);
        }
    }
}

use anyhow::Result;
use budget_core::ExportFormat;

use crate::encoder::DocumentEncoder;
use crate::tree::{Alignment, Block, Document, HeadingLevel, Paragraph, Table};

/// Standalone HTML page, viewable in any browser.
#[derive(Debug, Clone, Copy, Default)]
pub struct HtmlEncoder;

impl DocumentEncoder for HtmlEncoder {
    fn format(&self) -> ExportFormat {
        ExportFormat::Html
    }

    fn encode(&self, doc: &Document) -> Result<Vec<u8>> {
        let title = doc
            .paragraphs()
            .into_iter()
            .find(|p| p.heading == Some(HeadingLevel::Title))
            .map(Paragraph::plain_text)
            .unwrap_or_default();

        let body: Vec<String> = doc
            .blocks
            .iter()
            .map(|block| match block {
                Block::Paragraph(p) => paragraph_html(p),
                Block::Table(t) => table_html(t),
            })
            .collect();

        Ok(generate_html(&title, &body.join("\n")).into_bytes())
    }
}

/// Wrap `body_html` in a complete HTML document.
pub fn generate_html(title: &str, body_html: &str) -> String {
    format!(
        r#"<!DOCTYPE html>
<html>
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>{title}</title>
    <style>
        body {{ font-family: -apple-system, BlinkMacSystemFont, "Segoe UI", Roboto, sans-serif; margin: 2rem; line-height: 1.6; color: #333; }}
        table {{ border-collapse: collapse; width: 100%; margin: 0.5rem 0; }}
        th, td {{ border: 1px solid #ddd; padding: 8px; text-align: left; }}
        table.borderless td {{ border: none; vertical-align: top; }}
        p {{ margin: 0.25rem 0; }}
    </style>
</head>
<body>
{body_html}
</body>
</html>"#,
        title = escape_html(title),
        body_html = body_html,
    )
}

fn paragraph_html(p: &Paragraph) -> String {
    let inner: String = p
        .runs
        .iter()
        .map(|r| {
            let mut style = Vec::new();
            if let Some(size) = r.size {
                // half-points to points
                style.push(format!("font-size: {}pt", size as f64 / 2.0));
            }
            if let Some(color) = &r.color {
                style.push(format!("color: #{}", escape_html(color)));
            }
            let text = escape_html(&r.text);
            let text = if r.bold { format!("<strong>{text}</strong>") } else { text };
            if style.is_empty() {
                text
            } else {
                format!("<span style=\"{}\">{text}</span>", style.join("; "))
            }
        })
        .collect();

    let tag = match p.heading {
        Some(HeadingLevel::Title) => "h1",
        Some(HeadingLevel::Section) => "h2",
        None => "p",
    };
    match p.alignment {
        Alignment::Left => format!("<{tag}>{inner}</{tag}>"),
        Alignment::Center => format!("<{tag} style=\"text-align: center\">{inner}</{tag}>"),
        Alignment::Right => format!("<{tag} style=\"text-align: right\">{inner}</{tag}>"),
    }
}

fn table_html(t: &Table) -> String {
    let mut html = if t.borderless {
        String::from("<table class=\"borderless\">\n")
    } else {
        String::from("<table>\n")
    };

    for (i, row) in t.rows.iter().enumerate() {
        let cell_tag = if i == 0 && !t.borderless { "th" } else { "td" };
        html.push_str("<tr>\n");
        for cell in &row.cells {
            let style = cell
                .shading
                .as_ref()
                .map(|fill| format!(" style=\"background-color: #{}\"", escape_html(fill)))
                .unwrap_or_default();
            let content: String = cell.paragraphs.iter().map(paragraph_html).collect();
            html.push_str(&format!("    <{cell_tag}{style}>{content}</{cell_tag}>\n"));
        }
        html.push_str("</tr>\n");
    }

    html.push_str("</table>");
    html
}

fn escape_html(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#39;")
}

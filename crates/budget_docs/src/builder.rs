//! Maps the form state onto the document tree.

use budget_core::{BudgetState, Language, Totals};

use crate::format::{currency, price, quantity};
use crate::i18n::{Translations, translations};
use crate::tree::{Alignment, Document, HeadingLevel, Paragraph, Run, Table, TableCell, TableRow};

/// Half-inch page margins.
pub const PAGE_MARGIN_TWIPS: u32 = 720;
/// Background of table header cells.
pub const HEADER_FILL: &str = "3498DB";
const HEADER_TEXT_COLOR: &str = "FFFFFF";
/// 10pt.
const CELL_TEXT_SIZE: usize = 20;
/// 16pt.
const GRAND_TOTAL_SIZE: usize = 32;
const RULE_SIZE: usize = 24;
const RULE: &str = "________________________________________________";
const SIGNATURE_LINE: &str = "_________________________";
/// Shown for blank beneficiary or main worker.
const PLACEHOLDER: &str = "-";

/// Build the export document for `state` in `lang`.
///
/// `totals` is the snapshot taken alongside `state`; subtotal lines print it
/// verbatim rather than recomputing.
pub fn build_budget_document(state: &BudgetState, lang: Language, totals: &Totals) -> Document {
    let t = translations(lang);
    let mut doc = Document::new(PAGE_MARGIN_TWIPS);

    doc.push_paragraph(
        Paragraph::heading(HeadingLevel::Title, t.title)
            .align(Alignment::Center)
            .spacing(0, 120),
    );

    doc.push_paragraph(
        labeled(t.beneficiary, or_placeholder(&state.project.beneficiary)).spacing(0, 120),
    );
    // Strictly the first worker, whatever its role.
    doc.push_paragraph(
        labeled(t.main_worker, or_placeholder(state.main_worker_name().unwrap_or(""))).spacing(0, 240),
    );

    // Materials
    doc.push_paragraph(section_heading(t.materials));
    let material_rows = state
        .materials
        .iter()
        .filter(|m| !is_blank(&m.description))
        .map(|m| {
            body_row(&[
                m.description.clone(),
                quantity(m.quantity),
                m.unit_code().to_string(),
                price(m.unit_price),
                price(m.line_total()),
            ])
        });
    doc.push_table(data_table(
        &[t.description, t.quantity, t.unit, t.unit_price, t.total],
        material_rows,
    ));
    doc.push_paragraph(subtotal(t.materials_total, totals.materials, t, 240));

    // Labor
    doc.push_paragraph(section_heading(t.labor));
    let labor_rows = state
        .labor
        .iter()
        .filter(|l| !is_blank(&l.description))
        .map(|l| body_row(&[l.description.clone(), price(l.cost)]));
    doc.push_table(data_table(&[t.work_description, t.cost], labor_rows));
    doc.push_paragraph(subtotal(t.labor_total, totals.labor, t, 240));

    // Diet
    doc.push_paragraph(section_heading(t.diets));
    let diet = &state.diet;
    doc.push_paragraph(
        Paragraph::text(format!(
            "{} {} × {} {} × {} {}",
            diet.workers_count,
            t.workers,
            diet.work_days,
            t.days,
            price(diet.cost_per_diet),
            t.per_meal
        ))
        .spacing(0, 120),
    );
    doc.push_paragraph(subtotal(t.diets_total, totals.diet, t, 360));

    // Grand total
    doc.push_paragraph(
        Paragraph::new()
            .run(Run::new(RULE).size(RULE_SIZE))
            .align(Alignment::Center)
            .spacing(240, 240),
    );
    doc.push_paragraph(
        Paragraph::new()
            .run(Run::new(format!("{} ", t.final_total)).bold().size(GRAND_TOTAL_SIZE))
            .run(Run::new(currency(totals.final_total, t)).bold().size(GRAND_TOTAL_SIZE))
            .align(Alignment::Center)
            .spacing(0, 480),
    );

    doc.push_table(signature_block(state, t));

    let observations = &state.signatures.observations;
    if !is_blank(observations) {
        doc.push_paragraph(
            Paragraph::new()
                .run(Run::new(t.observations).bold())
                .spacing(400, 120),
        );
        for line in observations.lines() {
            doc.push_paragraph(Paragraph::text(line));
        }
    }

    doc
}

/// Only the empty string is blank; whitespace is exported as typed.
fn is_blank(text: &str) -> bool {
    text.is_empty()
}

fn or_placeholder(text: &str) -> &str {
    if is_blank(text) { PLACEHOLDER } else { text }
}

/// `Label: value` with the label in bold.
fn labeled(label: &str, value: &str) -> Paragraph {
    Paragraph::new()
        .run(Run::new(format!("{label} ")).bold())
        .run(Run::new(value))
}

fn section_heading(text: &str) -> Paragraph {
    Paragraph::heading(HeadingLevel::Section, text).spacing(240, 120)
}

fn subtotal(label: &str, value: f64, t: &Translations, after: u32) -> Paragraph {
    labeled(label, &currency(value, t))
        .align(Alignment::Right)
        .spacing(120, after)
}

fn header_cell(text: &str) -> TableCell {
    TableCell::new(
        Paragraph::new().run(
            Run::new(text)
                .bold()
                .size(CELL_TEXT_SIZE)
                .color(HEADER_TEXT_COLOR),
        ),
    )
    .shaded(HEADER_FILL)
}

fn body_row(values: &[String]) -> TableRow {
    TableRow::new(
        values
            .iter()
            .map(|v| TableCell::new(Paragraph::new().run(Run::new(v.as_str()).size(CELL_TEXT_SIZE))))
            .collect(),
    )
}

fn data_table(headers: &[&str], rows: impl Iterator<Item = TableRow>) -> Table {
    let mut all_rows = vec![TableRow::new(headers.iter().map(|h| header_cell(h)).collect())];
    all_rows.extend(rows);
    Table::new(all_rows)
}

/// Two borderless columns: approver and signature line left, date right.
fn signature_block(state: &BudgetState, t: &Translations) -> Table {
    let sig = &state.signatures;
    let left = TableCell::with_paragraphs(vec![
        labeled(t.approved_by, &sig.approver_name),
        Paragraph::text(" ").spacing(400, 0),
        Paragraph::text(SIGNATURE_LINE),
        Paragraph::text(t.signature),
    ]);
    let right = TableCell::new(labeled(
        t.date,
        &sig.approval_date.format("%Y-%m-%d").to_string(),
    ));
    Table::new(vec![TableRow::new(vec![left, right])]).borderless()
}

#[cfg(test)]
mod tests {
    use super::*;
    use budget_core::{DietInfo, LaborItem, Material, Unit};
    use chrono::NaiveDate;

    fn state() -> BudgetState {
        BudgetState::seeded(NaiveDate::from_ymd_opt(2024, 4, 2).unwrap())
    }

    fn material(description: &str, quantity: f64, unit_price: f64) -> Material {
        Material {
            description: description.into(),
            quantity,
            unit_price,
            unit: Some(Unit::Bolsa),
            ..Material::blank()
        }
    }

    fn build(state: &BudgetState, lang: Language) -> Document {
        build_budget_document(state, lang, &Totals::compute(state))
    }

    #[test]
    fn blank_material_description_is_excluded_but_still_totaled() {
        let mut s = state();
        s.materials = vec![material("", 5.0, 10.0)];
        let totals = Totals::compute(&s);
        assert_eq!(totals.materials, 50.0);

        let doc = build_budget_document(&s, Language::Es, &totals);
        let tables = doc.tables();
        let materials_table = tables[0];
        assert!(materials_table.body_rows().is_empty());
        assert!(doc.paragraph_texts().contains(&"TOTAL MATERIALES: $50.00 MN".to_string()));
    }

    #[test]
    fn whitespace_description_is_not_blank() {
        let mut s = state();
        s.materials = vec![
            material("  ", 1.0, 1.0),
            material("", 3.0, 1.0),
            material("Cemento", 2.0, 180.0),
        ];
        s.labor = vec![
            LaborItem {
                description: "\t".into(),
                cost: 10.0,
                ..LaborItem::blank()
            },
            LaborItem::blank(),
        ];
        let doc = build(&s, Language::Es);
        let tables = doc.tables();
        assert_eq!(tables[0].body_rows().len(), 2);
        assert_eq!(tables[0].body_rows()[0].cells[0].plain_text(), "  ");
        assert_eq!(tables[1].body_rows().len(), 1);
    }

    #[test]
    fn whitespace_beneficiary_and_worker_print_verbatim() {
        let mut s = state();
        s.project.beneficiary = " ".into();
        s.workers[0].name = "  ".into();
        let texts = build(&s, Language::Es).paragraph_texts();
        assert_eq!(texts[1], "Beneficiario:  ");
        assert_eq!(texts[2], "Albañil Principal:   ");
    }

    #[test]
    fn whitespace_observations_still_emit_the_block() {
        let mut s = state();
        s.signatures.observations = " ".into();
        let texts = build(&s, Language::Es).paragraph_texts();
        let n = texts.len();
        assert_eq!(texts[n - 2], "Observaciones:");
        assert_eq!(texts[n - 1], " ");
    }

    #[test]
    fn material_row_cells() {
        let mut s = state();
        s.materials = vec![material("Cemento", 2.0, 180.0)];
        let doc = build(&s, Language::Es);
        let tables = doc.tables();
        let row = &tables[0].body_rows()[0];
        let cells: Vec<String> = row.cells.iter().map(TableCell::plain_text).collect();
        assert_eq!(cells, vec!["Cemento", "2", "bolsa", "$180.00", "$360.00"]);
    }

    #[test]
    fn header_cells_are_shaded_white_bold() {
        let doc = build(&state(), Language::En);
        let tables = doc.tables();
        let header = &tables[0].rows[0];
        assert_eq!(header.cells.len(), 5);
        for cell in &header.cells {
            assert_eq!(cell.shading.as_deref(), Some(HEADER_FILL));
            let run = &cell.paragraphs[0].runs[0];
            assert!(run.bold);
            assert_eq!(run.color.as_deref(), Some("FFFFFF"));
        }
        let labels: Vec<String> = header.cells.iter().map(TableCell::plain_text).collect();
        assert_eq!(labels, vec!["Description", "Qty", "Unit", "Unit Price", "Total"]);
    }

    #[test]
    fn placeholders_for_blank_beneficiary_and_worker() {
        let doc = build(&state(), Language::En);
        let texts = doc.paragraph_texts();
        assert_eq!(texts[1], "Beneficiary: -");
        assert_eq!(texts[2], "Main Worker: -");
    }

    #[test]
    fn placeholder_when_no_workers_at_all() {
        let mut s = state();
        s.workers.clear();
        let texts = build(&s, Language::Es).paragraph_texts();
        assert_eq!(texts[2], "Albañil Principal: -");
    }

    #[test]
    fn diet_narrative() {
        let mut s = state();
        s.diet = DietInfo {
            workers_count: 3,
            work_days: 10,
            cost_per_diet: 5.5,
        };
        let texts = build(&s, Language::Es).paragraph_texts();
        assert!(texts.contains(&"3 trabajadores × 10 días × $5.50 por dieta".to_string()));
        assert!(texts.contains(&"TOTAL DIETAS: $165.00 MN".to_string()));
    }

    #[test]
    fn grand_total_is_bold_centered() {
        let doc = build(&state(), Language::En);
        let total = doc
            .paragraphs()
            .into_iter()
            .find(|p| p.plain_text().starts_with("TOTAL BUDGET:"))
            .unwrap();
        assert_eq!(total.alignment, Alignment::Center);
        assert!(total.runs.iter().all(|r| r.bold && r.size == Some(GRAND_TOTAL_SIZE)));
        assert_eq!(total.plain_text(), "TOTAL BUDGET: $0.00 MN");
    }

    #[test]
    fn signature_block_layout() {
        let mut s = state();
        s.signatures.approver_name = "Ing. Ruiz".into();
        let doc = build(&s, Language::Es);
        let tables = doc.tables();
        let sig = tables[2];
        assert!(sig.borderless);
        assert_eq!(sig.rows.len(), 1);
        let left = sig.rows[0].cells[0].plain_text();
        let right = sig.rows[0].cells[1].plain_text();
        assert!(left.starts_with("Aprobado por: Ing. Ruiz"));
        assert!(left.ends_with("Firma"));
        assert_eq!(right, "Fecha: 2024-04-02");
    }

    #[test]
    fn observations_only_when_present() {
        let doc = build(&state(), Language::Es);
        assert!(!doc.paragraph_texts().iter().any(|t| t == "Observaciones:"));

        let mut s = state();
        s.signatures.observations = "Entrega en dos fases".into();
        let texts = build(&s, Language::Es).paragraph_texts();
        let n = texts.len();
        assert_eq!(texts[n - 2], "Observaciones:");
        assert_eq!(texts[n - 1], "Entrega en dos fases");
    }

    #[test]
    fn section_order() {
        let doc = build(&state(), Language::En);
        let headings: Vec<String> = doc
            .paragraphs()
            .into_iter()
            .filter(|p| p.heading.is_some())
            .map(Paragraph::plain_text)
            .collect();
        assert_eq!(
            headings,
            vec!["BUDGET SUMMARY", "MATERIALS USED", "WORK PERFORMED", "MEALS"]
        );
        assert_eq!(doc.tables().len(), 3);
    }
}

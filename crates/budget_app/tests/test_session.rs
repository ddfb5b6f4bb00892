use budget_app::console;
use budget_app::{BudgetSession, DirectorySink, ExportOutcome};
use budget_core::{BudgetError, ExportFormat, Language};
use budget_docs::encoder_for;

const SCRIPT: &str = "\
project Casa  Nueva
beneficiary Marta López
worker 1 Juan Pérez
material 1 desc Cemento
material 1 qty 10
material 1 unit bolsa
material 1 price 180
labor 1 desc Albañilería
labor 1 cost 2500
diet workers 3
diet days 10
diet cost 5.5
export es
export en html
quit
";

#[tokio::test]
async fn console_session_exports_both_languages() {
    let tmp = tempfile::tempdir().unwrap();
    let mut session = BudgetSession::new(
        encoder_for(ExportFormat::Docx),
        Box::new(DirectorySink::new(tmp.path())),
    );
    let mut output = Vec::new();

    console::run(&mut session, SCRIPT.as_bytes(), &mut output, Language::Es)
        .await
        .unwrap();

    let totals = session.totals();
    assert_eq!(totals.materials, 1800.0);
    assert_eq!(totals.labor, 2500.0);
    assert_eq!(totals.diet, 165.0);
    assert_eq!(totals.final_total, 4465.0);

    let docx = std::fs::read(tmp.path().join("Casa_Nueva_es.docx")).unwrap();
    assert_eq!(&docx[..2], b"PK");

    let html = std::fs::read_to_string(tmp.path().join("Casa_Nueva_en.html")).unwrap();
    assert!(html.contains("TOTAL BUDGET"));
    assert!(html.contains("$4465.00 MN"));

    let text = String::from_utf8(output).unwrap();
    assert!(!text.contains("Error:"));
}

#[tokio::test]
async fn save_failure_is_reported_and_not_fatal() {
    let tmp = tempfile::tempdir().unwrap();
    let mut session = BudgetSession::new(
        encoder_for(ExportFormat::Markdown),
        Box::new(DirectorySink::new(tmp.path().join("unmounted"))),
    );
    let input = "project Obra\nexport\nproject Obra 2\n";
    let mut output = Vec::new();

    console::run(&mut session, input.as_bytes(), &mut output, Language::En)
        .await
        .unwrap();

    let text = String::from_utf8(output).unwrap();
    assert!(text.contains("Error: The document could not be saved."));
    // The loop kept going after the failed export.
    assert_eq!(session.state().project.project_name, "Obra 2");
    assert!(!session.is_exporting());

    let outcome = session.export(Language::Es).await;
    assert!(matches!(outcome, ExportOutcome::Failed(BudgetError::Save(_))));
}

#[tokio::test]
async fn saved_file_name_matches_the_file_on_disk() {
    let tmp = tempfile::tempdir().unwrap();
    let mut session = BudgetSession::new(
        encoder_for(ExportFormat::Docx),
        Box::new(DirectorySink::new(tmp.path())),
    );
    session.dispatch(budget_core::FormEvent::Project(budget_core::ProjectField::Name(
        "Obra 1/2".into(),
    )));

    let ExportOutcome::Saved(saved) = session.export(Language::Es).await else {
        panic!("expected a saved file");
    };
    assert_eq!(saved.file_name, "Obra_1_2_es.docx");
    assert_eq!(
        saved.location.file_name().and_then(|n| n.to_str()),
        Some(saved.file_name.as_str())
    );
    assert_eq!(saved.location, tmp.path().join("Obra_1_2_es.docx"));
    assert_eq!(
        std::fs::metadata(&saved.location).unwrap().len() as usize,
        saved.size
    );
}

//! Line-oriented front-end for the budget form.
//!
//! Each input line is one command. It runs to completion (exports included)
//! before the next line is read, so the form is only ever touched by one
//! command at a time.

use anyhow::Result;
use budget_core::model::Keyed;
use budget_core::{
    BudgetState, DietField, ExportFormat, FormEvent, LaborField, Language, MaterialField,
    NotificationType, ProjectField, RowKey, SignatureField, Totals, Unit, WorkerRole,
};
use budget_docs::format::{price, quantity};
use chrono::NaiveDate;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt};
use tracing::debug;

use crate::session::{BudgetSession, ExportOutcome};

pub const HELP: &str = "\
Commands (rows are numbered as shown by `show`):
  project TEXT                 set the project name
  beneficiary TEXT             set the beneficiary
  worker N TEXT                name worker N (1 is the main worker)
  material add | rm N          add or remove a material row
  material N desc|qty|unit|price VALUE
                               units: unidad bolsa kg m m2 m3 l caja juego
  labor add | rm N             add or remove a labor row
  labor N desc|cost VALUE
  diet workers|days|cost VALUE
  approver TEXT                set the approver's name
  date YYYY-MM-DD              set the approval date
  notes TEXT                   set observations (\\n starts a new line)
  show                         print the whole form
  totals                       print the totals
  export [es|en] [docx|html|md]
  reset                        clear the form (asks first)
  help
  quit";

const WORKER_USAGE: &str = "Usage: worker N NAME";
const MATERIAL_USAGE: &str = "Usage: material add | material rm N | material N desc|qty|unit|price VALUE";
const LABOR_USAGE: &str = "Usage: labor add | labor rm N | labor N desc|cost VALUE";
const DIET_USAGE: &str = "Usage: diet workers|days|cost VALUE";
const DATE_USAGE: &str = "Usage: date YYYY-MM-DD";
const EXPORT_USAGE: &str = "Usage: export [es|en] [docx|html|md]";

#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    Edit(Edit),
    Show,
    Totals,
    Export {
        lang: Option<Language>,
        format: Option<ExportFormat>,
    },
    Reset,
    Help,
    Quit,
}

/// A form edit addressed by row number rather than row key.
#[derive(Debug, Clone, PartialEq)]
pub enum Edit {
    ProjectName(String),
    Beneficiary(String),
    WorkerName { slot: usize, name: String },
    AddMaterial,
    RemoveMaterial(usize),
    Material { row: usize, field: MaterialField },
    AddLabor,
    RemoveLabor(usize),
    Labor { row: usize, field: LaborField },
    Diet(DietField),
    Approver(String),
    Date(NaiveDate),
    Notes(String),
}

impl Edit {
    /// Resolve row numbers against `state`. `None` when a row does not exist.
    pub fn into_event(self, state: &BudgetState) -> Option<FormEvent> {
        let event = match self {
            Self::ProjectName(name) => FormEvent::Project(ProjectField::Name(name)),
            Self::Beneficiary(name) => FormEvent::Project(ProjectField::Beneficiary(name)),
            Self::WorkerName { slot, name } => FormEvent::WorkerName {
                key: nth_key(&state.workers, slot)?,
                name,
            },
            Self::AddMaterial => FormEvent::AddMaterial,
            Self::RemoveMaterial(row) => FormEvent::RemoveMaterial(nth_key(&state.materials, row)?),
            Self::Material { row, field } => FormEvent::UpdateMaterial {
                key: nth_key(&state.materials, row)?,
                field,
            },
            Self::AddLabor => FormEvent::AddLabor,
            Self::RemoveLabor(row) => FormEvent::RemoveLabor(nth_key(&state.labor, row)?),
            Self::Labor { row, field } => FormEvent::UpdateLabor {
                key: nth_key(&state.labor, row)?,
                field,
            },
            Self::Diet(field) => FormEvent::Diet(field),
            Self::Approver(name) => FormEvent::Signature(SignatureField::ApproverName(name)),
            Self::Date(date) => FormEvent::Signature(SignatureField::ApprovalDate(date)),
            Self::Notes(text) => FormEvent::Signature(SignatureField::Observations(text)),
        };
        Some(event)
    }
}

fn nth_key<T: Keyed>(rows: &[T], row: usize) -> Option<RowKey> {
    row.checked_sub(1)
        .and_then(|i| rows.get(i))
        .map(|item| item.key().clone())
}

fn split_word(s: &str) -> (&str, &str) {
    let s = s.trim();
    match s.split_once(char::is_whitespace) {
        Some((head, rest)) => (head, rest.trim()),
        None => (s, ""),
    }
}

fn row_number(raw: &str, usage: &str) -> Result<usize, String> {
    raw.parse::<usize>()
        .ok()
        .filter(|n| *n > 0)
        .ok_or_else(|| usage.to_string())
}

/// Parse one input line. The error is a usage hint for the user.
pub fn parse_command(line: &str) -> Result<Command, String> {
    let (verb, rest) = split_word(line);
    let edit = match verb.to_ascii_lowercase().as_str() {
        "project" => Edit::ProjectName(rest.to_string()),
        "beneficiary" => Edit::Beneficiary(rest.to_string()),
        "worker" => {
            let (slot, name) = split_word(rest);
            Edit::WorkerName {
                slot: row_number(slot, WORKER_USAGE)?,
                name: name.to_string(),
            }
        }
        "material" => parse_material(rest)?,
        "labor" => parse_labor(rest)?,
        "diet" => parse_diet(rest)?,
        "approver" => Edit::Approver(rest.to_string()),
        "date" => NaiveDate::parse_from_str(rest, "%Y-%m-%d")
            .map(Edit::Date)
            .map_err(|_| DATE_USAGE.to_string())?,
        "notes" => Edit::Notes(rest.replace("\\n", "\n")),
        "show" => return Ok(Command::Show),
        "totals" => return Ok(Command::Totals),
        "export" => return parse_export(rest),
        "reset" => return Ok(Command::Reset),
        "help" | "?" => return Ok(Command::Help),
        "quit" | "exit" => return Ok(Command::Quit),
        _ => return Err(format!("Unknown command `{verb}`. Type `help` for the list.")),
    };
    Ok(Command::Edit(edit))
}

fn parse_material(rest: &str) -> Result<Edit, String> {
    let (head, tail) = split_word(rest);
    match head {
        "add" if tail.is_empty() => Ok(Edit::AddMaterial),
        "rm" => Ok(Edit::RemoveMaterial(row_number(tail, MATERIAL_USAGE)?)),
        _ => {
            let row = row_number(head, MATERIAL_USAGE)?;
            let (name, value) = split_word(tail);
            let field = match name {
                "desc" => MaterialField::Description(value.to_string()),
                "qty" => MaterialField::quantity_from_input(value),
                "unit" => MaterialField::unit_from_input(value),
                "price" => MaterialField::unit_price_from_input(value),
                _ => return Err(MATERIAL_USAGE.to_string()),
            };
            Ok(Edit::Material { row, field })
        }
    }
}

fn parse_labor(rest: &str) -> Result<Edit, String> {
    let (head, tail) = split_word(rest);
    match head {
        "add" if tail.is_empty() => Ok(Edit::AddLabor),
        "rm" => Ok(Edit::RemoveLabor(row_number(tail, LABOR_USAGE)?)),
        _ => {
            let row = row_number(head, LABOR_USAGE)?;
            let (name, value) = split_word(tail);
            let field = match name {
                "desc" => LaborField::Description(value.to_string()),
                "cost" => LaborField::cost_from_input(value),
                _ => return Err(LABOR_USAGE.to_string()),
            };
            Ok(Edit::Labor { row, field })
        }
    }
}

fn parse_diet(rest: &str) -> Result<Edit, String> {
    let (name, value) = split_word(rest);
    let field = match name {
        "workers" => DietField::workers_count_from_input(value),
        "days" => DietField::work_days_from_input(value),
        "cost" => DietField::cost_per_diet_from_input(value),
        _ => return Err(DIET_USAGE.to_string()),
    };
    Ok(Edit::Diet(field))
}

fn parse_export(rest: &str) -> Result<Command, String> {
    let mut words = rest.split_whitespace();
    let lang = words
        .next()
        .map(str::parse::<Language>)
        .transpose()
        .map_err(|_| EXPORT_USAGE.to_string())?;
    let format = words
        .next()
        .map(str::parse::<ExportFormat>)
        .transpose()
        .map_err(|_| EXPORT_USAGE.to_string())?;
    if words.next().is_some() {
        return Err(EXPORT_USAGE.to_string());
    }
    Ok(Command::Export { lang, format })
}

// ---------------------------------------------------------------------------
// Rendering
// ---------------------------------------------------------------------------

fn role_label(role: WorkerRole) -> &'static str {
    match role {
        WorkerRole::Principal => "main",
        WorkerRole::Helper => "helper",
        WorkerRole::Other => "other",
    }
}

pub fn render_totals(totals: &Totals) -> String {
    format!(
        "Materials {} | Labor {} | Diet {} | TOTAL {}",
        price(totals.materials),
        price(totals.labor),
        price(totals.diet),
        price(totals.final_total)
    )
}

/// The whole form as plain text, rows numbered from 1.
pub fn render_form(state: &BudgetState, totals: &Totals) -> String {
    let mut lines = vec![
        format!("Project:     {}", state.project.project_name),
        format!("Beneficiary: {}", state.project.beneficiary),
        "Workers:".to_string(),
    ];
    for (i, worker) in state.workers.iter().enumerate() {
        lines.push(format!("  {}. [{}] {}", i + 1, role_label(worker.role), worker.name));
    }

    lines.push("Materials:".to_string());
    for (i, item) in state.materials.iter().enumerate() {
        lines.push(format!(
            "  {}. {} | {} {} | {} | {}",
            i + 1,
            item.description,
            quantity(item.quantity),
            item.unit.map(Unit::label).unwrap_or(""),
            price(item.unit_price),
            price(item.line_total())
        ));
    }

    lines.push("Labor:".to_string());
    for (i, item) in state.labor.iter().enumerate() {
        lines.push(format!("  {}. {} | {}", i + 1, item.description, price(item.cost)));
    }

    lines.push(format!(
        "Diet:        {} workers x {} days x {}",
        state.diet.workers_count,
        state.diet.work_days,
        price(state.diet.cost_per_diet)
    ));
    lines.push(format!(
        "Approval:    {} ({})",
        state.signatures.approver_name,
        state.signatures.approval_date.format("%Y-%m-%d")
    ));
    if !state.signatures.observations.is_empty() {
        lines.push("Observations:".to_string());
        lines.extend(state.signatures.observations.lines().map(|l| format!("  {l}")));
    }
    lines.push(render_totals(totals));
    lines.join("\n")
}

// ---------------------------------------------------------------------------
// Event loop
// ---------------------------------------------------------------------------

async fn say<W: AsyncWrite + Unpin>(output: &mut W, text: &str) -> Result<()> {
    output.write_all(text.as_bytes()).await?;
    output.write_all(b"\n").await?;
    output.flush().await?;
    Ok(())
}

async fn prompt<W: AsyncWrite + Unpin>(output: &mut W, text: &str) -> Result<()> {
    output.write_all(text.as_bytes()).await?;
    output.flush().await?;
    Ok(())
}

fn is_yes(answer: &str) -> bool {
    matches!(
        answer.trim().to_lowercase().as_str(),
        "y" | "yes" | "s" | "si" | "sí"
    )
}

/// Read commands from `input` until `quit` or end of input.
pub async fn run<R, W>(
    session: &mut BudgetSession,
    input: R,
    mut output: W,
    default_lang: Language,
) -> Result<()>
where
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin,
{
    let mut lines = input.lines();

    loop {
        prompt(&mut output, "> ").await?;
        let Some(line) = lines.next_line().await? else {
            break;
        };
        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        let command = match parse_command(line) {
            Ok(command) => command,
            Err(usage) => {
                say(&mut output, &usage).await?;
                continue;
            }
        };
        debug!(?command, "console command");

        match command {
            Command::Quit => break,
            Command::Help => say(&mut output, HELP).await?,
            Command::Show => {
                let text = render_form(session.state(), &session.totals());
                say(&mut output, &text).await?;
            }
            Command::Totals => say(&mut output, &render_totals(&session.totals())).await?,
            Command::Edit(edit) => match edit.into_event(session.state()) {
                Some(event) => {
                    session.dispatch(event);
                    say(&mut output, &render_totals(&session.totals())).await?;
                }
                None => say(&mut output, "No such row. Use `show` to list rows.").await?,
            },
            Command::Reset => {
                prompt(&mut output, "Reset the whole form? All data will be lost. [y/N] ").await?;
                let answer = lines.next_line().await?.unwrap_or_default();
                let confirmed = is_yes(&answer);
                let message = if session.reset(|| confirmed) {
                    "Form reset."
                } else {
                    "Reset cancelled."
                };
                say(&mut output, message).await?;
            }
            Command::Export { lang, format } => {
                let lang = lang.unwrap_or(default_lang);
                let outcome = match format {
                    Some(format) => session.export_as(lang, format).await,
                    None => session.export(lang).await,
                };
                if let ExportOutcome::Busy = outcome {
                    say(&mut output, "An export is already running.").await?;
                }
                while let Some(note) = session.take_notification() {
                    let text = match note.notification_type {
                        NotificationType::Error => format!("Error: {}", note.message),
                        _ => note.message,
                    };
                    say(&mut output, &text).await?;
                }
            }
        }
    }

    output.flush().await?;
    Ok(())
}

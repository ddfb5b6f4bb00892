//! Form mutations as pure reducers.
//!
//! Every edit the form can make is a [`FormEvent`]. [`BudgetState::apply`]
//! consumes the current state and returns the next one; nothing is mutated
//! behind the caller's back.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::coerce::{parse_amount, parse_count, sanitize_amount};
use crate::model::{BudgetState, Keyed, LaborItem, Material, RowKey, Unit};

// ---------------------------------------------------------------------------
// Field edits
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ProjectField {
    Name(String),
    Beneficiary(String),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum MaterialField {
    Description(String),
    Quantity(f64),
    Unit(Option<Unit>),
    UnitPrice(f64),
}

impl MaterialField {
    pub fn quantity_from_input(raw: &str) -> Self {
        Self::Quantity(parse_amount(raw))
    }

    pub fn unit_price_from_input(raw: &str) -> Self {
        Self::UnitPrice(parse_amount(raw))
    }

    pub fn unit_from_input(raw: &str) -> Self {
        Self::Unit(Unit::from_code(raw))
    }

    fn write(self, item: &mut Material) {
        match self {
            Self::Description(text) => item.description = text,
            Self::Quantity(value) => item.quantity = sanitize_amount(value),
            Self::Unit(unit) => item.unit = unit,
            Self::UnitPrice(value) => item.unit_price = sanitize_amount(value),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum LaborField {
    Description(String),
    Cost(f64),
}

impl LaborField {
    pub fn cost_from_input(raw: &str) -> Self {
        Self::Cost(parse_amount(raw))
    }

    fn write(self, item: &mut LaborItem) {
        match self {
            Self::Description(text) => item.description = text,
            Self::Cost(value) => item.cost = sanitize_amount(value),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum DietField {
    WorkersCount(u32),
    WorkDays(u32),
    CostPerDiet(f64),
}

impl DietField {
    pub fn workers_count_from_input(raw: &str) -> Self {
        Self::WorkersCount(parse_count(raw))
    }

    pub fn work_days_from_input(raw: &str) -> Self {
        Self::WorkDays(parse_count(raw))
    }

    pub fn cost_per_diet_from_input(raw: &str) -> Self {
        Self::CostPerDiet(parse_amount(raw))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum SignatureField {
    ApproverName(String),
    ApprovalDate(NaiveDate),
    Observations(String),
}

// ---------------------------------------------------------------------------
// FormEvent
// ---------------------------------------------------------------------------

/// One mutation of the budget form.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum FormEvent {
    Project(ProjectField),
    WorkerName { key: RowKey, name: String },
    AddMaterial,
    RemoveMaterial(RowKey),
    UpdateMaterial { key: RowKey, field: MaterialField },
    AddLabor,
    RemoveLabor(RowKey),
    UpdateLabor { key: RowKey, field: LaborField },
    Diet(DietField),
    Signature(SignatureField),
    Reset { today: NaiveDate },
}

impl BudgetState {
    /// Apply one event and return the resulting state.
    pub fn apply(self, event: FormEvent) -> Self {
        debug!(?event, "applying form event");
        match event {
            FormEvent::Project(field) => self.with_project(field),
            FormEvent::WorkerName { key, name } => Self {
                workers: update_row(self.workers, &key, |w| w.name = name),
                ..self
            },
            FormEvent::AddMaterial => self.with_material_added(),
            FormEvent::RemoveMaterial(key) => Self {
                materials: remove_row(self.materials, &key),
                ..self
            },
            FormEvent::UpdateMaterial { key, field } => Self {
                materials: update_row(self.materials, &key, |m| field.write(m)),
                ..self
            },
            FormEvent::AddLabor => self.with_labor_added(),
            FormEvent::RemoveLabor(key) => Self {
                labor: remove_row(self.labor, &key),
                ..self
            },
            FormEvent::UpdateLabor { key, field } => Self {
                labor: update_row(self.labor, &key, |l| field.write(l)),
                ..self
            },
            FormEvent::Diet(field) => self.with_diet(field),
            FormEvent::Signature(field) => self.with_signature(field),
            FormEvent::Reset { today } => BudgetState::seeded(today),
        }
    }

    /// Append a blank material row.
    pub fn with_material_added(self) -> Self {
        let mut materials = self.materials;
        materials.push(Material::blank());
        Self { materials, ..self }
    }

    /// Append a blank labor row.
    pub fn with_labor_added(self) -> Self {
        let mut labor = self.labor;
        labor.push(LaborItem::blank());
        Self { labor, ..self }
    }

    fn with_project(self, field: ProjectField) -> Self {
        let mut project = self.project;
        match field {
            ProjectField::Name(name) => project.project_name = name,
            ProjectField::Beneficiary(name) => project.beneficiary = name,
        }
        Self { project, ..self }
    }

    fn with_diet(self, field: DietField) -> Self {
        let mut diet = self.diet;
        match field {
            DietField::WorkersCount(n) => diet.workers_count = n,
            DietField::WorkDays(n) => diet.work_days = n,
            DietField::CostPerDiet(cost) => diet.cost_per_diet = sanitize_amount(cost),
        }
        Self { diet, ..self }
    }

    fn with_signature(self, field: SignatureField) -> Self {
        let mut signatures = self.signatures;
        match field {
            SignatureField::ApproverName(name) => signatures.approver_name = name,
            SignatureField::ApprovalDate(date) => signatures.approval_date = date,
            SignatureField::Observations(text) => signatures.observations = text,
        }
        Self { signatures, ..self }
    }
}

// ---------------------------------------------------------------------------
// Keyed collection helpers
// ---------------------------------------------------------------------------

/// Drop the row with `key`. Absent keys leave the collection unchanged.
pub fn remove_row<T: Keyed>(mut rows: Vec<T>, key: &RowKey) -> Vec<T> {
    rows.retain(|row| row.key() != key);
    rows
}

/// Edit the row with `key` in place. Absent keys leave the collection unchanged.
pub fn update_row<T: Keyed>(mut rows: Vec<T>, key: &RowKey, edit: impl FnOnce(&mut T)) -> Vec<T> {
    if let Some(row) = rows.iter_mut().find(|row| row.key() == key) {
        edit(row);
    }
    rows
}

use chrono::{NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Number of blank material rows in a freshly seeded form.
pub const SEED_MATERIAL_ROWS: usize = 5;
/// Number of blank labor rows in a freshly seeded form.
pub const SEED_LABOR_ROWS: usize = 3;
/// Helper slots seeded after the principal worker.
pub const SEED_HELPER_SLOTS: usize = 3;

// ---------------------------------------------------------------------------
// Row keys
// ---------------------------------------------------------------------------

/// Opaque identifier for a line item. Carries no business meaning; only used
/// to target updates and removals.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RowKey(String);

impl RowKey {
    /// Generate a fresh, unique key.
    pub fn generate() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for RowKey {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl fmt::Display for RowKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Anything that lives in a keyed, ordered row collection.
pub trait Keyed {
    fn key(&self) -> &RowKey;
}

// ---------------------------------------------------------------------------
// Project & workers
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProjectInfo {
    pub project_name: String,
    pub beneficiary: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum WorkerRole {
    Principal,
    #[serde(rename = "Ayudante")]
    Helper,
    #[serde(rename = "Otro")]
    Other,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkerInfo {
    pub key: RowKey,
    pub name: String,
    pub role: WorkerRole,
}

impl WorkerInfo {
    pub fn new(role: WorkerRole) -> Self {
        Self {
            key: RowKey::generate(),
            name: String::new(),
            role,
        }
    }
}

impl Keyed for WorkerInfo {
    fn key(&self) -> &RowKey {
        &self.key
    }
}

// ---------------------------------------------------------------------------
// Materials
// ---------------------------------------------------------------------------

/// Units of measure offered by the materials table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Unit {
    Unidad,
    Bolsa,
    Kg,
    M,
    M2,
    M3,
    L,
    Caja,
    Juego,
}

impl Unit {
    pub const ALL: [Unit; 9] = [
        Unit::Unidad,
        Unit::Bolsa,
        Unit::Kg,
        Unit::M,
        Unit::M2,
        Unit::M3,
        Unit::L,
        Unit::Caja,
        Unit::Juego,
    ];

    /// Stable code, exported verbatim in the materials table.
    pub fn code(self) -> &'static str {
        match self {
            Unit::Unidad => "unidad",
            Unit::Bolsa => "bolsa",
            Unit::Kg => "kg",
            Unit::M => "m",
            Unit::M2 => "m2",
            Unit::M3 => "m3",
            Unit::L => "l",
            Unit::Caja => "caja",
            Unit::Juego => "juego",
        }
    }

    /// Label shown in the unit selector.
    pub fn label(self) -> &'static str {
        match self {
            Unit::Unidad => "Unidad",
            Unit::Bolsa => "Bolsa",
            Unit::Kg => "Kg",
            Unit::M => "Metro",
            Unit::M2 => "m²",
            Unit::M3 => "m³",
            Unit::L => "Litro",
            Unit::Caja => "Caja",
            Unit::Juego => "Juego",
        }
    }

    /// Parse a selector code. The empty selection and unknown codes yield `None`.
    pub fn from_code(code: &str) -> Option<Unit> {
        let code = code.trim();
        Unit::ALL
            .into_iter()
            .find(|u| u.code().eq_ignore_ascii_case(code))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Material {
    pub key: RowKey,
    pub description: String,
    pub quantity: f64,
    pub unit: Option<Unit>,
    pub unit_price: f64,
}

impl Material {
    /// A blank row with a fresh key.
    pub fn blank() -> Self {
        Self {
            key: RowKey::generate(),
            description: String::new(),
            quantity: 0.0,
            unit: None,
            unit_price: 0.0,
        }
    }

    pub fn line_total(&self) -> f64 {
        self.quantity * self.unit_price
    }

    /// Code of the selected unit, or `""` for the empty selection.
    pub fn unit_code(&self) -> &'static str {
        self.unit.map(Unit::code).unwrap_or("")
    }
}

impl Keyed for Material {
    fn key(&self) -> &RowKey {
        &self.key
    }
}

// ---------------------------------------------------------------------------
// Labor
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LaborItem {
    pub key: RowKey,
    pub description: String,
    pub cost: f64,
}

impl LaborItem {
    pub fn blank() -> Self {
        Self {
            key: RowKey::generate(),
            description: String::new(),
            cost: 0.0,
        }
    }
}

impl Keyed for LaborItem {
    fn key(&self) -> &RowKey {
        &self.key
    }
}

// ---------------------------------------------------------------------------
// Diet & signatures
// ---------------------------------------------------------------------------

/// Per-worker, per-day meal allowance.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct DietInfo {
    pub workers_count: u32,
    pub work_days: u32,
    pub cost_per_diet: f64,
}

impl DietInfo {
    pub fn total(&self) -> f64 {
        f64::from(self.workers_count) * f64::from(self.work_days) * self.cost_per_diet
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Signatures {
    pub approver_name: String,
    pub approval_date: NaiveDate,
    pub observations: String,
}

impl Signatures {
    pub fn new(approval_date: NaiveDate) -> Self {
        Self {
            approver_name: String::new(),
            approval_date,
            observations: String::new(),
        }
    }
}

// ---------------------------------------------------------------------------
// BudgetState
// ---------------------------------------------------------------------------

/// Aggregate root of the form. Lives in memory for one session only.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BudgetState {
    pub project: ProjectInfo,
    pub workers: Vec<WorkerInfo>,
    pub materials: Vec<Material>,
    pub labor: Vec<LaborItem>,
    pub diet: DietInfo,
    pub signatures: Signatures,
}

impl BudgetState {
    /// Seed the form dated today (UTC).
    pub fn new() -> Self {
        Self::seeded(Utc::now().date_naive())
    }

    /// Seed the form: one principal plus three helper slots, five blank
    /// material rows, three blank labor rows, zeroed diet fields.
    pub fn seeded(today: NaiveDate) -> Self {
        let mut workers = Vec::with_capacity(1 + SEED_HELPER_SLOTS);
        workers.push(WorkerInfo::new(WorkerRole::Principal));
        workers.extend((0..SEED_HELPER_SLOTS).map(|_| WorkerInfo::new(WorkerRole::Helper)));

        Self {
            project: ProjectInfo::default(),
            workers,
            materials: (0..SEED_MATERIAL_ROWS).map(|_| Material::blank()).collect(),
            labor: (0..SEED_LABOR_ROWS).map(|_| LaborItem::blank()).collect(),
            diet: DietInfo::default(),
            signatures: Signatures::new(today),
        }
    }

    /// Name of the worker in position 0, regardless of role.
    pub fn main_worker_name(&self) -> Option<&str> {
        self.workers.first().map(|w| w.name.as_str())
    }
}

impl Default for BudgetState {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn seed_shape() {
        let state = BudgetState::seeded(date(2024, 3, 1));
        assert_eq!(state.workers.len(), 4);
        assert_eq!(state.workers[0].role, WorkerRole::Principal);
        assert!(state.workers[1..].iter().all(|w| w.role == WorkerRole::Helper));
        assert_eq!(state.materials.len(), 5);
        assert_eq!(state.labor.len(), 3);
        assert_eq!(state.diet, DietInfo::default());
        assert_eq!(state.signatures.approval_date, date(2024, 3, 1));
        assert!(state.signatures.observations.is_empty());
    }

    #[test]
    fn seed_keys_are_unique() {
        let state = BudgetState::seeded(date(2024, 3, 1));
        let mut keys: Vec<&str> = state
            .materials
            .iter()
            .map(|m| m.key.as_str())
            .chain(state.labor.iter().map(|l| l.key.as_str()))
            .chain(state.workers.iter().map(|w| w.key.as_str()))
            .collect();
        let total = keys.len();
        keys.sort_unstable();
        keys.dedup();
        assert_eq!(keys.len(), total);
    }

    #[test]
    fn material_line_total() {
        let mut m = Material::blank();
        m.quantity = 4.0;
        m.unit_price = 2.5;
        assert_eq!(m.line_total(), 10.0);
    }

    #[test]
    fn diet_total_multiplies_all_three() {
        let diet = DietInfo {
            workers_count: 3,
            work_days: 10,
            cost_per_diet: 5.5,
        };
        assert!((diet.total() - 165.0).abs() < 1e-9);
    }

    #[test]
    fn unit_codes_round_trip_through_parser() {
        for unit in Unit::ALL {
            assert_eq!(Unit::from_code(unit.code()), Some(unit));
        }
        assert_eq!(Unit::from_code(""), None);
        assert_eq!(Unit::from_code("furlong"), None);
        assert_eq!(Unit::from_code(" KG "), Some(Unit::Kg));
    }

    #[test]
    fn worker_role_serializes_with_form_labels() {
        let json = serde_json::to_string(&WorkerRole::Helper).unwrap();
        assert_eq!(json, "\"Ayudante\"");
        let parsed: WorkerRole = serde_json::from_str("\"Otro\"").unwrap();
        assert_eq!(parsed, WorkerRole::Other);
    }

    #[test]
    fn main_worker_is_positional() {
        let mut state = BudgetState::seeded(date(2024, 1, 1));
        state.workers[0].role = WorkerRole::Helper;
        state.workers[0].name = "Ana".into();
        state.workers[1].role = WorkerRole::Principal;
        state.workers[1].name = "Luis".into();
        assert_eq!(state.main_worker_name(), Some("Ana"));

        state.workers.clear();
        assert_eq!(state.main_worker_name(), None);
    }
}

use serde::{Deserialize, Serialize};

use crate::model::BudgetState;

/// Subtotals derived from the form. Recomputed on every state change.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Totals {
    pub materials: f64,
    pub labor: f64,
    pub diet: f64,
    #[serde(rename = "final")]
    pub final_total: f64,
}

impl Totals {
    pub fn compute(state: &BudgetState) -> Self {
        let materials: f64 = state.materials.iter().map(|m| m.line_total()).sum();
        let labor: f64 = state.labor.iter().map(|l| l.cost).sum();
        let diet = state.diet.total();

        Self {
            materials,
            labor,
            diet,
            final_total: materials + labor + diet,
        }
    }
}

use budget_core::Language;

/// Every label printed in an exported budget.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Translations {
    pub title: &'static str,
    pub beneficiary: &'static str,
    pub main_worker: &'static str,
    pub materials: &'static str,
    pub labor: &'static str,
    pub diets: &'static str,
    pub materials_total: &'static str,
    pub labor_total: &'static str,
    pub diets_total: &'static str,
    pub final_total: &'static str,
    pub approved_by: &'static str,
    pub date: &'static str,
    pub signature: &'static str,
    pub observations: &'static str,
    pub description: &'static str,
    pub quantity: &'static str,
    pub unit: &'static str,
    pub unit_price: &'static str,
    pub total: &'static str,
    pub work_description: &'static str,
    pub cost: &'static str,
    pub workers: &'static str,
    pub days: &'static str,
    pub per_meal: &'static str,
    pub currency: &'static str,
}

pub const ES: Translations = Translations {
    title: "RESUMEN DE PRESUPUESTO",
    beneficiary: "Beneficiario:",
    main_worker: "Albañil Principal:",
    materials: "MATERIALES UTILIZADOS",
    labor: "TRABAJOS REALIZADOS",
    diets: "DIETAS",
    materials_total: "TOTAL MATERIALES:",
    labor_total: "TOTAL MANO DE OBRA:",
    diets_total: "TOTAL DIETAS:",
    final_total: "PRESUPUESTO TOTAL:",
    approved_by: "Aprobado por:",
    date: "Fecha:",
    signature: "Firma",
    observations: "Observaciones:",
    description: "Descripción",
    quantity: "Cant.",
    unit: "Unidad",
    unit_price: "P. Unitario",
    total: "Total",
    work_description: "Descripción del Trabajo",
    cost: "Costo",
    workers: "trabajadores",
    days: "días",
    per_meal: "por dieta",
    currency: "MN",
};

pub const EN: Translations = Translations {
    title: "BUDGET SUMMARY",
    beneficiary: "Beneficiary:",
    main_worker: "Main Worker:",
    materials: "MATERIALS USED",
    labor: "WORK PERFORMED",
    diets: "MEALS",
    materials_total: "TOTAL MATERIALS:",
    labor_total: "TOTAL LABOR:",
    diets_total: "TOTAL MEALS:",
    final_total: "TOTAL BUDGET:",
    approved_by: "Approved by:",
    date: "Date:",
    signature: "Signature",
    observations: "Observations:",
    description: "Description",
    quantity: "Qty",
    unit: "Unit",
    unit_price: "Unit Price",
    total: "Total",
    work_description: "Work Description",
    cost: "Cost",
    workers: "workers",
    days: "days",
    per_meal: "per meal",
    currency: "MN",
};

pub fn translations(lang: Language) -> &'static Translations {
    match lang {
        Language::Es => &ES,
        Language::En => &EN,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lookup_by_language() {
        assert_eq!(translations(Language::Es).title, "RESUMEN DE PRESUPUESTO");
        assert_eq!(translations(Language::En).title, "BUDGET SUMMARY");
    }

    #[test]
    fn both_sets_use_the_same_currency() {
        assert_eq!(ES.currency, EN.currency);
    }
}

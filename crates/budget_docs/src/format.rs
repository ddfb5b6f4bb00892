//! Number formatting for exported documents.

use crate::i18n::Translations;

/// Monetary amount with the localized currency suffix: `$1234.50 MN`.
pub fn currency(value: f64, t: &Translations) -> String {
    format!("{} {}", price(value), t.currency)
}

/// Monetary amount without suffix, as used in table cells: `$1234.50`.
pub fn price(value: f64) -> String {
    format!("${value:.2}")
}

/// Quantity in its shortest decimal form: `5`, `2.5`.
pub fn quantity(value: f64) -> String {
    format!("{value}")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::i18n::{EN, ES};

    #[test]
    fn currency_has_two_decimals_and_suffix() {
        assert_eq!(currency(165.0, &ES), "$165.00 MN");
        assert_eq!(currency(0.0, &EN), "$0.00 MN");
        assert_eq!(currency(1234.5, &EN), "$1234.50 MN");
    }

    #[test]
    fn price_rounds_to_cents() {
        assert_eq!(price(5.5), "$5.50");
        assert_eq!(price(2.0 / 3.0), "$0.67");
    }

    #[test]
    fn quantity_is_shortest_form() {
        assert_eq!(quantity(5.0), "5");
        assert_eq!(quantity(2.5), "2.5");
        assert_eq!(quantity(0.0), "0");
    }
}

use crate::commands::Out;
use crate::model::{CategoryOption, TransactionType};
use serde::Serialize;
use std::fmt::Write;

/// The picker list of one transaction type.
#[derive(Debug, Clone, Serialize)]
pub struct CategoryListing {
    pub kind: TransactionType,
    pub options: Vec<CategoryOption>,
}

/// Lists the categories each capture form offers, as `value  label` pairs.
pub fn categories() -> Out<Vec<CategoryListing>> {
    let listings: Vec<CategoryListing> = [TransactionType::Expense, TransactionType::Income]
        .into_iter()
        .map(|kind| CategoryListing {
            kind,
            options: kind.category_options(),
        })
        .collect();

    let mut message = String::new();
    for listing in &listings {
        let _ = writeln!(message, "{} categories:", listing.kind);
        for option in &listing.options {
            let _ = writeln!(message, "  {:<24}{}", option.value, option.label);
        }
    }
    Out::new(message, listings)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_categories() {
        let out = categories();
        let listings = out.structure().unwrap();
        assert_eq!(listings.len(), 2);
        assert_eq!(listings[0].kind, TransactionType::Expense);
        assert_eq!(listings[0].options.len(), 11);
        assert_eq!(listings[1].options.len(), 2);
        assert!(out.message().contains("food_beverages"));
        assert!(out.message().contains("Salary"));
    }
}

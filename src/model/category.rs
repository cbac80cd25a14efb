//! The fixed category lists offered by the capture forms.
//!
//! Stored records carry the category as free text and are never checked against these lists
//! when read back, so a category that is not listed here still aggregates normally.

use serde::{Deserialize, Serialize};

/// Categories offered by the expense form.
#[derive(
    Debug, Clone, Copy, Eq, PartialEq, Ord, PartialOrd, Hash, Serialize, Deserialize, clap::ValueEnum,
)]
#[serde(rename_all = "snake_case")]
#[value(rename_all = "snake_case")]
pub enum ExpenseCategory {
    FoodBeverages,
    Transportation,
    HousingUtilities,
    Healthcare,
    Entertainment,
    Education,
    ClothingPersonalCare,
    Insurance,
    SavingsInvestments,
    DebtPayments,
    Miscellaneous,
}

serde_plain::derive_display_from_serialize!(ExpenseCategory);
serde_plain::derive_fromstr_from_deserialize!(ExpenseCategory);

impl ExpenseCategory {
    pub const ALL: [ExpenseCategory; 11] = [
        ExpenseCategory::FoodBeverages,
        ExpenseCategory::Transportation,
        ExpenseCategory::HousingUtilities,
        ExpenseCategory::Healthcare,
        ExpenseCategory::Entertainment,
        ExpenseCategory::Education,
        ExpenseCategory::ClothingPersonalCare,
        ExpenseCategory::Insurance,
        ExpenseCategory::SavingsInvestments,
        ExpenseCategory::DebtPayments,
        ExpenseCategory::Miscellaneous,
    ];

    /// The human-readable label shown in the picker.
    pub fn label(&self) -> &'static str {
        match self {
            ExpenseCategory::FoodBeverages => "Food & Beverages",
            ExpenseCategory::Transportation => "Transportation",
            ExpenseCategory::HousingUtilities => "Housing & Utilities",
            ExpenseCategory::Healthcare => "Healthcare",
            ExpenseCategory::Entertainment => "Entertainment",
            ExpenseCategory::Education => "Education",
            ExpenseCategory::ClothingPersonalCare => "Clothing & Personal Care",
            ExpenseCategory::Insurance => "Insurance",
            ExpenseCategory::SavingsInvestments => "Savings & Investments",
            ExpenseCategory::DebtPayments => "Debt Payments",
            ExpenseCategory::Miscellaneous => "Miscellaneous",
        }
    }
}

/// Categories offered by the income form.
#[derive(
    Debug, Clone, Copy, Eq, PartialEq, Ord, PartialOrd, Hash, Serialize, Deserialize, clap::ValueEnum,
)]
#[serde(rename_all = "snake_case")]
#[value(rename_all = "snake_case")]
pub enum IncomeCategory {
    Salary,
    Other,
}

serde_plain::derive_display_from_serialize!(IncomeCategory);
serde_plain::derive_fromstr_from_deserialize!(IncomeCategory);

impl IncomeCategory {
    pub const ALL: [IncomeCategory; 2] = [IncomeCategory::Salary, IncomeCategory::Other];

    /// The human-readable label shown in the picker.
    pub fn label(&self) -> &'static str {
        match self {
            IncomeCategory::Salary => "Salary",
            IncomeCategory::Other => "Other",
        }
    }
}

/// One entry of a picker list, as shown by `kantong categories`.
#[derive(Debug, Clone, Eq, PartialEq, Serialize, Deserialize)]
pub struct CategoryOption {
    pub value: String,
    pub label: String,
}

/// Looks up the picker label for a stored category string, from either list. Returns `None` for
/// free text that neither form offers.
pub fn label_for(category: &str) -> Option<&'static str> {
    if let Ok(c) = category.parse::<ExpenseCategory>() {
        return Some(c.label());
    }
    category.parse::<IncomeCategory>().ok().map(|c| c.label())
}

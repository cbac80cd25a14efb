//! Grouping of transactions by category.

use crate::model::Transaction;
use serde::Serialize;
use std::collections::HashMap;

/// The transactions that share one category string, in the order they were given.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategoryGroup {
    category: String,
    transactions: Vec<Transaction>,
}

impl CategoryGroup {
    pub fn category(&self) -> &str {
        &self.category
    }

    pub fn transactions(&self) -> &[Transaction] {
        &self.transactions
    }

    /// The picker label of the group's category, or the category itself for free text.
    pub fn label(&self) -> &str {
        crate::model::label_for(&self.category).unwrap_or(self.category.as_str())
    }

    /// Sum of the group's amounts. Amounts that are not numbers count as zero.
    pub fn total(&self) -> f64 {
        self.transactions
            .iter()
            .map(|t| t.amount().value_or_zero())
            .sum()
    }
}

/// Partitions `transactions` by category. Groups come out in the order their category first
/// appears, and each group keeps the relative order of its members. Only categories that occur
/// in `transactions` get a group.
pub fn group_by_category(transactions: &[Transaction]) -> Vec<CategoryGroup> {
    let mut index: HashMap<&str, usize> = HashMap::new();
    let mut groups: Vec<CategoryGroup> = Vec::new();

    for transaction in transactions {
        let ix = *index.entry(transaction.category()).or_insert_with(|| {
            groups.push(CategoryGroup {
                category: transaction.category().to_string(),
                transactions: Vec::new(),
            });
            groups.len() - 1
        });
        groups[ix].transactions.push(transaction.clone());
    }

    groups
}

/// The total of the group for `category`, or zero if there is no such group.
pub fn total_by_category(groups: &[CategoryGroup], category: &str) -> f64 {
    groups
        .iter()
        .find(|g| g.category == category)
        .map(CategoryGroup::total)
        .unwrap_or(0.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Record, TransactionType};

    fn tx(amount: &str, category: &str, kind: TransactionType) -> Transaction {
        Transaction::new(Record::new(amount, category, "2024-01-01"), kind)
    }

    #[test]
    fn test_empty_input_has_no_groups() {
        assert!(group_by_category(&[]).is_empty());
    }

    #[test]
    fn test_groups_are_a_partition() {
        let transactions = vec![
            tx("1", "food_beverages", TransactionType::Expense),
            tx("2", "salary", TransactionType::Income),
            tx("3", "food_beverages", TransactionType::Expense),
            tx("4", "transportation", TransactionType::Expense),
            tx("5", "salary", TransactionType::Income),
            tx("5", "salary", TransactionType::Income),
        ];
        let groups = group_by_category(&transactions);

        let categories: Vec<&str> = groups.iter().map(|g| g.category()).collect();
        assert_eq!(categories, vec!["food_beverages", "salary", "transportation"]);

        let mut flattened: Vec<Transaction> = groups
            .iter()
            .flat_map(|g| g.transactions().iter().cloned())
            .collect();
        let mut original = transactions.clone();
        let key = |t: &Transaction| (t.category().to_string(), t.amount().raw().to_string());
        flattened.sort_by_key(key);
        original.sort_by_key(key);
        assert_eq!(flattened, original);

        for group in &groups {
            assert!(group
                .transactions()
                .iter()
                .all(|t| t.category() == group.category()));
        }
    }

    #[test]
    fn test_group_keeps_member_order() {
        let transactions = vec![
            tx("1", "salary", TransactionType::Income),
            tx("2", "other", TransactionType::Income),
            tx("3", "salary", TransactionType::Income),
        ];
        let groups = group_by_category(&transactions);
        let amounts: Vec<&str> = groups[0]
            .transactions()
            .iter()
            .map(|t| t.amount().raw())
            .collect();
        assert_eq!(amounts, vec!["1", "3"]);
    }

    #[test]
    fn test_total_by_category() {
        let transactions = vec![
            tx("1500", "healthcare", TransactionType::Expense),
            tx("abc", "healthcare", TransactionType::Expense),
            tx("250.25", "healthcare", TransactionType::Expense),
            tx("99", "education", TransactionType::Expense),
        ];
        let groups = group_by_category(&transactions);
        assert_eq!(total_by_category(&groups, "healthcare"), 1750.25);
        assert_eq!(total_by_category(&groups, "education"), 99.0);
        assert_eq!(total_by_category(&groups, "insurance"), 0.0);
    }

    #[test]
    fn test_label() {
        let groups = group_by_category(&[
            tx("1", "housing_utilities", TransactionType::Expense),
            tx("1", "Kopi", TransactionType::Expense),
        ]);
        assert_eq!(groups[0].label(), "Housing & Utilities");
        assert_eq!(groups[1].label(), "Kopi");
    }
}

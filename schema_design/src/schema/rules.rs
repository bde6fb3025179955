//! Heuristic normal-form rules
//!
//! Catalogs expose no functional dependencies, so every rule here is a naming
//! heuristic over a single table. Rules are evaluated in table order; adding a
//! heuristic means adding a `NormalizationRule`, not changing the analyzer.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::schema::types::{Column, Table};

/// Column-name tokens suggesting a column stores several values
pub const NON_ATOMIC_TOKENS: &[&str] = &["json", "array", "list", "multi"];

/// Column-name tokens suggesting an enumerated value, in claim order
pub const ENUM_TOKENS: &[&str] = &["status", "type", "category", "level", "priority"];

/// Normal-form level checked by a rule
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum NormalForm {
    #[serde(rename = "first_normal_form")]
    First,
    #[serde(rename = "second_normal_form")]
    Second,
    #[serde(rename = "third_normal_form")]
    Third,
}

impl NormalForm {
    pub const ALL: [NormalForm; 3] = [NormalForm::First, NormalForm::Second, NormalForm::Third];

    /// Advice given when a level is violated
    pub fn recommendation(&self) -> &'static str {
        match self {
            NormalForm::First => "Split non-atomic values into separate columns or tables",
            NormalForm::Second => "Move partially dependent columns to separate tables",
            NormalForm::Third => "Remove transitive dependencies by creating lookup tables",
        }
    }
}

impl fmt::Display for NormalForm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NormalForm::First => f.write_str("1NF"),
            NormalForm::Second => f.write_str("2NF"),
            NormalForm::Third => f.write_str("3NF"),
        }
    }
}

/// A suspected violation of a normal form
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Violation {
    pub table: String,
    /// One column, or the ordered pair for transitive dependencies
    pub columns: Vec<String>,
    pub issue: String,
}

impl Violation {
    pub fn new(table: &str, columns: &[&str], issue: &str) -> Self {
        Self {
            table: table.to_string(),
            columns: columns.iter().map(|c| c.to_string()).collect(),
            issue: issue.to_string(),
        }
    }
}

/// A single heuristic evaluated per table
pub trait NormalizationRule: Send + Sync {
    /// Level the rule reports against
    fn level(&self) -> NormalForm;

    /// Append the violations found in `table`
    fn check(&self, table: &Table, violations: &mut Vec<Violation>);
}

/// First token of `name` (case-insensitive) found in `tokens`
pub fn matching_token(name: &str, tokens: &[&'static str]) -> Option<&'static str> {
    let lowered = name.to_lowercase();
    tokens.iter().copied().find(|token| lowered.contains(token))
}

/// 1NF: names hinting at JSON blobs, arrays or lists
pub struct NonAtomicNameRule;

impl NormalizationRule for NonAtomicNameRule {
    fn level(&self) -> NormalForm {
        NormalForm::First
    }

    fn check(&self, table: &Table, violations: &mut Vec<Violation>) {
        for column in &table.columns {
            if matching_token(&column.name, NON_ATOMIC_TOKENS).is_some() {
                violations.push(Violation::new(
                    &table.name,
                    &[&column.name],
                    "Potential non-atomic values",
                ));
            }
        }
    }
}

/// 2NF: on composite keys, non-key columns sharing the first key column's
/// leading `_` token are assumed to depend on that part of the key only
pub struct PartialDependencyRule;

impl NormalizationRule for PartialDependencyRule {
    fn level(&self) -> NormalForm {
        NormalForm::Second
    }

    fn check(&self, table: &Table, violations: &mut Vec<Violation>) {
        if table.primary_keys.len() < 2 {
            return;
        }

        let token = table.primary_keys[0]
            .split('_')
            .next()
            .unwrap_or_default()
            .to_lowercase();
        if token.is_empty() {
            return;
        }

        for column in non_key_columns(table) {
            if column.name.to_lowercase().starts_with(&token) {
                violations.push(Violation::new(
                    &table.name,
                    &[&column.name],
                    "Partial dependency on composite key",
                ));
            }
        }
    }
}

/// 3NF: `category_id` next to `category_name` suggests the name depends on
/// the id rather than on the key. Each unordered pair is reported once.
pub struct TransitiveDependencyRule;

impl NormalizationRule for TransitiveDependencyRule {
    fn level(&self) -> NormalForm {
        NormalForm::Third
    }

    fn check(&self, table: &Table, violations: &mut Vec<Violation>) {
        let columns: Vec<&Column> = non_key_columns(table).collect();
        let mut reported: Vec<(usize, usize)> = Vec::new();

        for (i, determinant) in columns.iter().enumerate() {
            let stem = determinant
                .name
                .strip_suffix("_id")
                .unwrap_or(&determinant.name);
            if stem.is_empty() {
                continue;
            }

            for (j, dependent) in columns.iter().enumerate() {
                if i == j || !dependent.name.contains(stem) {
                    continue;
                }
                let pair = (i.min(j), i.max(j));
                if reported.contains(&pair) {
                    continue;
                }
                reported.push(pair);
                violations.push(Violation::new(
                    &table.name,
                    &[&determinant.name, &dependent.name],
                    "Potential transitive dependency",
                ));
            }
        }
    }
}

fn non_key_columns(table: &Table) -> impl Iterator<Item = &Column> {
    table
        .columns
        .iter()
        .filter(move |c| !c.primary_key && !table.is_key_column(&c.name))
}

/// The built-in rules, in evaluation order
pub fn default_rules() -> Vec<Box<dyn NormalizationRule>> {
    vec![
        Box::new(NonAtomicNameRule),
        Box::new(PartialDependencyRule),
        Box::new(TransitiveDependencyRule),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    fn run(rule: &dyn NormalizationRule, table: &Table) -> Vec<Violation> {
        let mut violations = Vec::new();
        rule.check(table, &mut violations);
        violations
    }

    #[test]
    fn test_matching_token_is_case_insensitive() {
        assert_eq!(matching_token("Tags_JSON", NON_ATOMIC_TOKENS), Some("json"));
        assert_eq!(matching_token("order_status", ENUM_TOKENS), Some("status"));
        assert_eq!(matching_token("email", ENUM_TOKENS), None);
    }

    #[test]
    fn test_partial_dependency_needs_composite_key() {
        let table = Table::new("orders")
            .with_column(Column::new("order_id", "INTEGER").primary_key())
            .with_column(Column::new("order_date", "TIMESTAMP"));
        assert!(run(&PartialDependencyRule, &table).is_empty());
    }

    #[test]
    fn test_transitive_pairs_reported_once() {
        // `user` and `user_id` each contain the other's stem
        let table = Table::new("sessions")
            .with_column(Column::new("id", "INTEGER").primary_key())
            .with_column(Column::new("user_id", "INTEGER"))
            .with_column(Column::new("user", "TEXT"));

        let violations = run(&TransitiveDependencyRule, &table);
        assert_eq!(violations.len(), 1);
        assert_eq!(violations[0].columns, vec!["user_id", "user"]);
    }

    #[test]
    fn test_transitive_ignores_key_columns() {
        let table = Table::new("categories")
            .with_column(Column::new("category_id", "INTEGER").primary_key())
            .with_column(Column::new("category_name", "TEXT"));
        assert!(run(&TransitiveDependencyRule, &table).is_empty());
    }

    #[test]
    fn test_rule_order() {
        let levels: Vec<NormalForm> = default_rules().iter().map(|r| r.level()).collect();
        assert_eq!(levels, NormalForm::ALL.to_vec());
    }
}

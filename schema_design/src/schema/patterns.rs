//! Domain design patterns
//!
//! A pattern is a set of tables commonly found together. Matching is by exact
//! table name.

use serde::Serialize;

use crate::schema::types::DatabaseSchema;

/// A known combination of tables
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DesignPattern {
    pub name: &'static str,
    pub description: &'static str,
    pub tables: &'static [&'static str],
}

pub const DESIGN_PATTERNS: &[DesignPattern] = &[
    DesignPattern {
        name: "user_management",
        description: "Standard user management pattern",
        tables: &["users", "roles", "permissions", "user_roles"],
    },
    DesignPattern {
        name: "e_commerce",
        description: "E-commerce domain pattern",
        tables: &["customers", "products", "orders", "order_items", "categories"],
    },
    DesignPattern {
        name: "blog_cms",
        description: "Blog/CMS content management pattern",
        tables: &["users", "posts", "categories", "comments", "tags", "post_tags"],
    },
];

/// How much of a pattern a schema contains
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PatternMatch {
    pub name: String,
    pub description: String,
    pub matched_tables: Vec<String>,
    pub missing_tables: Vec<String>,
    /// Fraction of the pattern's tables present, in `(0, 1]`
    pub coverage: f64,
}

/// Patterns with at least one table present, best coverage first
pub fn detect_design_patterns(schema: &DatabaseSchema) -> Vec<PatternMatch> {
    let mut matches: Vec<PatternMatch> = DESIGN_PATTERNS
        .iter()
        .filter_map(|pattern| {
            let (matched, missing): (Vec<&str>, Vec<&str>) = pattern
                .tables
                .iter()
                .copied()
                .partition(|name| schema.table(name).is_some());
            if matched.is_empty() {
                return None;
            }

            Some(PatternMatch {
                name: pattern.name.to_string(),
                description: pattern.description.to_string(),
                coverage: matched.len() as f64 / pattern.tables.len() as f64,
                matched_tables: matched.into_iter().map(String::from).collect(),
                missing_tables: missing.into_iter().map(String::from).collect(),
            })
        })
        .collect();

    // Stable sort keeps catalogue order among equal coverage
    matches.sort_by(|a, b| b.coverage.total_cmp(&a.coverage));
    matches
}

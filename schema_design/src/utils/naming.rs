//! Naming utilities for schema_design
//!
//! Helpers for naming synthesized tables, columns and constraints, and for
//! turning schema names into file names.

use inflector::Inflector;

/// Format a name according to a pattern with placeholders
pub fn format_name(pattern: &str, replacements: &[(&str, &str)]) -> String {
    let mut result = pattern.to_string();

    for (placeholder, value) in replacements {
        result = result.replace(&format!("{{{}}}", placeholder), value);
    }

    result
}

/// Get foreign key constraint name according to pattern
pub fn get_foreign_key_name(pattern: &str, table_name: &str, column_name: &str) -> String {
    format_name(pattern, &[("table", table_name), ("column", column_name)])
}

/// Constraint name used for synthesized and extracted foreign keys
pub fn foreign_key_constraint_name(table_name: &str, column_name: &str) -> String {
    get_foreign_key_name("fk_{table}_{column}", table_name, column_name)
}

/// Name of a lookup table extracted from `table` for values of `token`
pub fn lookup_table_name(table_name: &str, token: &str) -> String {
    format!("{}_{}", table_name, pluralize(token))
}

/// Convert a singular name to plural
pub fn pluralize(name: &str) -> String {
    // Handle special cases first
    match name.to_lowercase().as_str() {
        "person" => "people".to_string(),
        "child" => "children".to_string(),
        "status" => "statuses".to_string(),
        _ => name.to_plural(),
    }
}

/// Human-readable form of a token, e.g. `priority` -> `Priority`
pub fn title(name: &str) -> String {
    name.to_title_case()
}

/// Generate a unique name with a suffix if name exists in the list
pub fn generate_unique_name(name: &str, existing_names: &[String]) -> String {
    if !existing_names.iter().any(|n| n == name) {
        return name.to_string();
    }

    let mut counter = 1;
    loop {
        let new_name = format!("{}_{}", name, counter);
        if !existing_names.contains(&new_name) {
            return new_name;
        }
        counter += 1;
    }
}

/// Format name as a valid file name
pub fn format_file_name(name: &str) -> String {
    name.chars()
        .map(|c| match c {
            ' ' | '/' | '\\' | ':' | '*' | '?' | '"' | '<' | '>' | '|' => '_',
            _ => c,
        })
        .collect()
}

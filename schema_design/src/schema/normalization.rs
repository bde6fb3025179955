//! Normalization analysis
//!
//! Evaluates a schema against the heuristic rule table and summarizes the
//! result per normal-form level.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::schema::rules::{default_rules, NormalForm, NormalizationRule, Violation};
use crate::schema::types::DatabaseSchema;

/// Outcome for one normal-form level
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct LevelAnalysis {
    pub compliant: bool,
    pub violations: Vec<Violation>,
}

/// Result of `check_normalization_level`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NormalizationReport {
    #[serde(flatten)]
    pub levels: IndexMap<NormalForm, LevelAnalysis>,
    pub recommendations: Vec<String>,
}

impl NormalizationReport {
    /// Analysis for a level; every report carries all three levels
    pub fn level(&self, form: NormalForm) -> &LevelAnalysis {
        &self.levels[&form]
    }

    pub fn is_compliant(&self, form: NormalForm) -> bool {
        self.levels.get(&form).map_or(true, |l| l.compliant)
    }

    /// Number of violations across all levels
    pub fn violation_count(&self) -> usize {
        self.levels.values().map(|l| l.violations.len()).sum()
    }
}

/// Runs an ordered list of rules over every table of a schema
pub struct NormalizationAnalyzer {
    rules: Vec<Box<dyn NormalizationRule>>,
}

impl Default for NormalizationAnalyzer {
    fn default() -> Self {
        Self::new()
    }
}

impl NormalizationAnalyzer {
    /// Analyzer with the built-in 1NF, 2NF and 3NF rules
    pub fn new() -> Self {
        Self {
            rules: default_rules(),
        }
    }

    /// Append a rule, evaluated after the existing ones
    pub fn with_rule(mut self, rule: Box<dyn NormalizationRule>) -> Self {
        self.rules.push(rule);
        self
    }

    /// Analyze the schema. Inconsistent schemas are rejected before any rule runs.
    pub fn analyze(&self, schema: &DatabaseSchema) -> Result<NormalizationReport> {
        schema.validate()?;

        let mut levels: IndexMap<NormalForm, LevelAnalysis> = NormalForm::ALL
            .iter()
            .map(|form| (*form, LevelAnalysis::default()))
            .collect();

        for table in &schema.tables {
            for rule in &self.rules {
                let level = levels.entry(rule.level()).or_default();
                rule.check(table, &mut level.violations);
            }
        }

        let mut recommendations = Vec::new();
        for (form, level) in levels.iter_mut() {
            level.compliant = level.violations.is_empty();
            if !level.compliant {
                recommendations.push(form.recommendation().to_string());
            }
        }

        let report = NormalizationReport {
            levels,
            recommendations,
        };

        tracing::debug!(
            schema = %schema.name,
            violations = report.violation_count(),
            first = report.is_compliant(NormalForm::First),
            second = report.is_compliant(NormalForm::Second),
            third = report.is_compliant(NormalForm::Third),
            "Checked normalization level"
        );

        Ok(report)
    }
}

/// Analyze a schema with the built-in rules
pub fn check_normalization_level(schema: &DatabaseSchema) -> Result<NormalizationReport> {
    NormalizationAnalyzer::new().analyze(schema)
}

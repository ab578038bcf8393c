//! Code-table provider
//!
//! Maps each [`ResourceKind`] to the coded concepts eligible for it under a
//! locale. The eligible set is the base table plus whatever additions the
//! locale descriptor contributes for that kind, so supporting a new region is
//! a data change on [`Locale`](crate::locale::Locale) only.
//!
//! ```rust
//! use ipsgen::domain::ResourceKind;
//! use ipsgen::locale::Locale;
//! use ipsgen::terminology::CodeTables;
//!
//! let base = CodeTables::for_locale(Locale::base());
//! let irish = CodeTables::for_locale(Locale::ireland());
//! assert_eq!(
//!     irish.concepts(ResourceKind::Condition).len(),
//!     base.concepts(ResourceKind::Condition).len() + 4
//! );
//! ```

pub mod measurements;
pub mod tables;

use crate::domain::{CodedConcept, IpsError, ResourceKind, Result};
use crate::locale::Locale;
use std::collections::BTreeMap;

/// The base table for a kind, shared by every locale
pub fn base_table(kind: ResourceKind) -> &'static [CodedConcept] {
    match kind {
        ResourceKind::Allergy => tables::ALLERGIES,
        ResourceKind::Medication => tables::MEDICATIONS,
        ResourceKind::Condition => tables::CONDITIONS,
        ResourceKind::Immunization => tables::IMMUNIZATIONS,
        ResourceKind::Procedure => tables::PROCEDURES,
        ResourceKind::Observation => tables::OBSERVATIONS,
    }
}

/// Resolved code tables for one locale
#[derive(Debug, Clone, PartialEq)]
pub struct CodeTables {
    locale_code: &'static str,
    tables: BTreeMap<ResourceKind, Vec<CodedConcept>>,
}

impl CodeTables {
    /// Resolves base tables plus the locale's additions for every kind
    pub fn for_locale(locale: &Locale) -> Self {
        let tables = ResourceKind::ALL
            .into_iter()
            .map(|kind| {
                let mut concepts = base_table(kind).to_vec();
                for extra in locale.extensions_for(kind) {
                    if !concepts.contains(extra) {
                        concepts.push(*extra);
                    }
                }
                (kind, concepts)
            })
            .collect();

        Self {
            locale_code: locale.code,
            tables,
        }
    }

    /// Builds tables from explicit data, e.g. for a custom locale
    pub fn from_tables(
        locale_code: &'static str,
        tables: BTreeMap<ResourceKind, Vec<CodedConcept>>,
    ) -> Self {
        Self {
            locale_code,
            tables,
        }
    }

    /// Eligible concepts for a kind (empty when the kind has no table)
    pub fn concepts(&self, kind: ResourceKind) -> &[CodedConcept] {
        self.tables.get(&kind).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Eligible concepts, treating an empty table as a configuration error
    pub fn require(&self, kind: ResourceKind) -> Result<&[CodedConcept]> {
        let concepts = self.concepts(kind);
        if concepts.is_empty() {
            return Err(IpsError::Configuration(format!(
                "code table for {} is empty under locale {}",
                kind.resource_type(),
                self.locale_code
            )));
        }
        Ok(concepts)
    }

    /// Whether a concept is eligible for a kind
    pub fn contains(&self, kind: ResourceKind, concept: &CodedConcept) -> bool {
        self.concepts(kind).contains(concept)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    #[test_case(Locale::base() ; "base locale")]
    #[test_case(Locale::ireland() ; "irish locale")]
    fn test_every_kind_is_non_empty(locale: &Locale) {
        let tables = CodeTables::for_locale(locale);
        for kind in ResourceKind::ALL {
            assert!(tables.require(kind).is_ok(), "{kind} is empty");
        }
    }

    #[test]
    fn test_ireland_extends_conditions_with_four_codes() {
        let base = CodeTables::for_locale(Locale::base());
        let irish = CodeTables::for_locale(Locale::ireland());
        assert_eq!(
            irish.concepts(ResourceKind::Condition).len(),
            base.concepts(ResourceKind::Condition).len() + 4
        );
        for extra in tables::IRISH_CONDITIONS {
            assert!(irish.contains(ResourceKind::Condition, extra));
            assert!(!base.contains(ResourceKind::Condition, extra));
        }
        for base_concept in tables::CONDITIONS {
            assert!(irish.contains(ResourceKind::Condition, base_concept));
        }
    }

    #[test]
    fn test_other_kinds_match_base_under_ireland() {
        let base = CodeTables::for_locale(Locale::base());
        let irish = CodeTables::for_locale(Locale::ireland());
        for kind in ResourceKind::ALL {
            if kind != ResourceKind::Condition {
                assert_eq!(irish.concepts(kind), base.concepts(kind));
            }
        }
    }

    #[test]
    fn test_resolution_is_deterministic() {
        assert_eq!(
            CodeTables::for_locale(Locale::ireland()),
            CodeTables::for_locale(Locale::ireland())
        );
    }

    #[test]
    fn test_empty_table_is_configuration_error() {
        let tables = CodeTables::from_tables("xx_XX", BTreeMap::new());
        let err = tables.require(ResourceKind::Procedure).unwrap_err();
        assert!(err.is_configuration());
        assert!(err.to_string().contains("Procedure"));
    }

    #[test]
    fn test_codes_unique_within_each_table() {
        let tables = CodeTables::for_locale(Locale::ireland());
        for kind in ResourceKind::ALL {
            let mut codes: Vec<_> = tables.concepts(kind).iter().map(|c| c.code).collect();
            let total = codes.len();
            codes.sort();
            codes.dedup();
            assert_eq!(codes.len(), total, "duplicate code in {kind}");
        }
    }
}

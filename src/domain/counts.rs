//! Per-kind resource counts requested for a bundle

use super::errors::IpsError;
use super::kind::ResourceKind;
use super::result::Result;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Largest number of records of one kind in a single bundle
pub const MAX_PER_KIND: usize = 10_000;

/// How many records of each clinical kind to generate
///
/// Zero is valid and omits the kind (and its section) from the bundle.
/// Counts above [`MAX_PER_KIND`] are rejected by [`ResourceCounts::validate`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResourceCounts {
    pub allergies: usize,
    pub medications: usize,
    pub conditions: usize,
    pub immunizations: usize,
    pub procedures: usize,
    pub observations: usize,
}

impl Default for ResourceCounts {
    fn default() -> Self {
        Self {
            allergies: 2,
            medications: 3,
            conditions: 2,
            immunizations: 3,
            procedures: 1,
            observations: 2,
        }
    }
}

impl ResourceCounts {
    /// All counts zero
    pub fn none() -> Self {
        Self {
            allergies: 0,
            medications: 0,
            conditions: 0,
            immunizations: 0,
            procedures: 0,
            observations: 0,
        }
    }

    /// Count for one kind
    pub fn get(&self, kind: ResourceKind) -> usize {
        match kind {
            ResourceKind::Allergy => self.allergies,
            ResourceKind::Medication => self.medications,
            ResourceKind::Condition => self.conditions,
            ResourceKind::Immunization => self.immunizations,
            ResourceKind::Procedure => self.procedures,
            ResourceKind::Observation => self.observations,
        }
    }

    /// Sets the count for one kind
    pub fn set(&mut self, kind: ResourceKind, count: usize) {
        let slot = match kind {
            ResourceKind::Allergy => &mut self.allergies,
            ResourceKind::Medication => &mut self.medications,
            ResourceKind::Condition => &mut self.conditions,
            ResourceKind::Immunization => &mut self.immunizations,
            ResourceKind::Procedure => &mut self.procedures,
            ResourceKind::Observation => &mut self.observations,
        };
        *slot = count;
    }

    /// Builder form of [`set`](Self::set)
    pub fn with(mut self, kind: ResourceKind, count: usize) -> Self {
        self.set(kind, count);
        self
    }

    /// Sum over all kinds, saturating at `usize::MAX`
    pub fn total(&self) -> usize {
        ResourceKind::ALL
            .iter()
            .fold(0usize, |sum, k| sum.saturating_add(self.get(*k)))
    }

    /// Checks every count against [`MAX_PER_KIND`]
    ///
    /// # Errors
    ///
    /// Returns a configuration error naming the first kind over the limit.
    pub fn validate(&self) -> Result<()> {
        match ResourceKind::ALL
            .into_iter()
            .find(|kind| self.get(*kind) > MAX_PER_KIND)
        {
            Some(kind) => Err(IpsError::Configuration(format!(
                "Count for {} is {}, at most {MAX_PER_KIND} are allowed",
                kind.plural(),
                self.get(kind)
            ))),
            None => Ok(()),
        }
    }

    /// Applies named overrides on top of these counts
    ///
    /// Keys are kind names (`conditions`, `Condition`, `condition`, ...).
    ///
    /// # Errors
    ///
    /// Returns a configuration error for unknown keys and negative values.
    pub fn apply_overrides(mut self, overrides: &BTreeMap<String, i64>) -> Result<Self> {
        for (name, value) in overrides {
            let kind: ResourceKind = name.parse().map_err(|_| {
                IpsError::Configuration(format!("Unknown resource kind in counts: '{name}'"))
            })?;
            let count = usize::try_from(*value).map_err(|_| {
                IpsError::Configuration(format!(
                    "Count for {} must be non-negative, got {value}",
                    kind.plural()
                ))
            })?;
            self.set(kind, count);
        }
        self.validate()?;
        Ok(self)
    }
}

impl TryFrom<&BTreeMap<String, i64>> for ResourceCounts {
    type Error = IpsError;

    /// Unspecified kinds keep their defaults
    fn try_from(map: &BTreeMap<String, i64>) -> Result<Self> {
        Self::default().apply_overrides(map)
    }
}

impl fmt::Display for ResourceCounts {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let parts: Vec<String> = ResourceKind::ALL
            .iter()
            .map(|k| format!("{}={}", k.plural(), self.get(*k)))
            .collect();
        write!(f, "{}", parts.join(", "))
    }
}

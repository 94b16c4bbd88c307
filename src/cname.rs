//! CNAME Reference Checker
//!
//! A CNAME record is considered valid if:
//! 1. it points to a name that exists in the record index, or
//! 2. it points to a name outside all managed zones.
//!
//! Every other CNAME is reported. Chains are not followed, so `a -> b -> a`
//! passes as long as both names exist.

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

use crate::index::RecordIndex;
use crate::types::ManagedZone;

/// How a CNAME target is matched against managed zone names
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ZoneMatch {
    /// Plain string suffix: `evilexample.com` counts as inside `example.com`
    #[default]
    Suffix,
    /// Suffix on a label boundary only
    Label,
}

impl ZoneMatch {
    /// Whether `target` falls under any of `zones`
    pub fn in_managed_zones(self, target: &str, zones: &[ManagedZone]) -> bool {
        zones.iter().any(|mz| match self {
            ZoneMatch::Suffix => target.ends_with(mz.fqdn.as_str()),
            ZoneMatch::Label => mz.owns(target),
        })
    }
}

impl std::fmt::Display for ZoneMatch {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ZoneMatch::Suffix => write!(f, "suffix"),
            ZoneMatch::Label => write!(f, "label"),
        }
    }
}

/// One invalid CNAME record
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub enum CnameViolation {
    /// The record has no target at all
    MissingTarget { fqdn: String },
    /// The target is inside a managed zone but has no record
    Dangling { fqdn: String, target: String },
}

impl CnameViolation {
    /// Name of the offending CNAME record
    pub fn fqdn(&self) -> &str {
        match self {
            CnameViolation::MissingTarget { fqdn } | CnameViolation::Dangling { fqdn, .. } => fqdn,
        }
    }
}

impl std::fmt::Display for CnameViolation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CnameViolation::MissingTarget { fqdn } => {
                write!(f, "Record with FQDN '{}' does not have a CNAME reference", fqdn)
            }
            CnameViolation::Dangling { fqdn, target } => write!(
                f,
                "Record with FQDN '{}' has invalid CNAME reference to '{}'",
                fqdn, target
            ),
        }
    }
}

/// All invalid CNAME records found in one pass
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{}", render(.0))]
pub struct InvalidCnames(pub Vec<CnameViolation>);

impl InvalidCnames {
    pub fn violations(&self) -> &[CnameViolation] {
        &self.0
    }
}

fn render(violations: &[CnameViolation]) -> String {
    let mut out = format!("Found {} invalid CNAME reference(s):", violations.len());
    for violation in violations {
        out.push('\n');
        out.push_str(&violation.to_string());
    }
    out
}

/// Collect every invalid CNAME in `index`, sorted by record name
pub fn find_invalid_cnames(
    index: &RecordIndex,
    zones: &[ManagedZone],
    matching: ZoneMatch,
) -> Vec<CnameViolation> {
    let mut violations: Vec<CnameViolation> = index
        .records()
        .filter(|record| record.is_cname())
        .filter_map(|record| {
            let Some(target) = record.cname_target() else {
                return Some(CnameViolation::MissingTarget {
                    fqdn: record.fqdn.clone(),
                });
            };

            if index.contains(target) || !matching.in_managed_zones(target, zones) {
                return None;
            }

            Some(CnameViolation::Dangling {
                fqdn: record.fqdn.clone(),
                target: target.to_string(),
            })
        })
        .collect();

    violations.sort_by(|a, b| a.fqdn().cmp(b.fqdn()).then_with(|| a.cmp(b)));
    debug!(violations = violations.len(), %matching, "Checked CNAME references");
    violations
}

/// Check the CNAME records in `index` against the managed zones
pub fn check_cnames(
    index: &RecordIndex,
    zones: &[ManagedZone],
    matching: ZoneMatch,
) -> Result<(), InvalidCnames> {
    let violations = find_invalid_cnames(index, zones, matching);
    if violations.is_empty() {
        Ok(())
    } else {
        Err(InvalidCnames(violations))
    }
}

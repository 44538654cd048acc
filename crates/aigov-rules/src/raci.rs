//! RACI matrix validation.

use std::collections::{BTreeMap, HashSet};

use serde::{Deserialize, Serialize};

use crate::error::{Result, RulesError};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Responsibility {
    #[serde(rename = "R", alias = "responsible")]
    Responsible,
    #[serde(rename = "A", alias = "accountable")]
    Accountable,
    #[serde(rename = "C", alias = "consulted")]
    Consulted,
    #[serde(rename = "I", alias = "informed")]
    Informed,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RaciAssignment {
    pub activity: String,
    pub assignee: String,
    pub responsibility: Responsibility,
}

/// Collect every structural problem in a matrix.
///
/// Each activity needs exactly one accountable and at least one responsible
/// assignee; an assignee appears at most once per activity.
pub fn raci_findings(assignments: &[RaciAssignment]) -> Vec<String> {
    let mut findings = Vec::new();
    if assignments.is_empty() {
        findings.push("matrix has no assignments".to_string());
        return findings;
    }

    let mut seen = HashSet::new();
    // activity -> (accountable, responsible)
    let mut counts: BTreeMap<&str, (usize, usize)> = BTreeMap::new();

    for (row, a) in assignments.iter().enumerate() {
        let activity = a.activity.trim();
        let assignee = a.assignee.trim();
        if activity.is_empty() || assignee.is_empty() {
            findings.push(format!("row {row}: activity and assignee are required"));
            continue;
        }
        if !seen.insert((activity, assignee)) {
            findings.push(format!(
                "{assignee} is assigned more than once to '{activity}'"
            ));
        }
        let entry = counts.entry(activity).or_default();
        match a.responsibility {
            Responsibility::Accountable => entry.0 += 1,
            Responsibility::Responsible => entry.1 += 1,
            Responsibility::Consulted | Responsibility::Informed => {}
        }
    }

    for (activity, (accountable, responsible)) in counts {
        if accountable != 1 {
            findings.push(format!(
                "'{activity}' must have exactly one accountable assignee, found {accountable}"
            ));
        }
        if responsible == 0 {
            findings.push(format!("'{activity}' has no responsible assignee"));
        }
    }

    findings
}

pub fn validate_raci(assignments: &[RaciAssignment]) -> Result<()> {
    let findings = raci_findings(assignments);
    if findings.is_empty() {
        Ok(())
    } else {
        Err(RulesError::validation(findings.join("; ")))
    }
}

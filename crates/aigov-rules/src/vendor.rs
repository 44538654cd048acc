//! Weighted vendor due-diligence scoring.

use serde::{Deserialize, Serialize};

use crate::error::{Result, RulesError};

pub const MIN_RATING: u8 = 1;
pub const MAX_RATING: u8 = 5;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VendorCriterion {
    Security,
    DataPrivacy,
    Transparency,
    Reliability,
    Support,
    Cost,
}

impl VendorCriterion {
    pub const ALL: [VendorCriterion; 6] = [
        VendorCriterion::Security,
        VendorCriterion::DataPrivacy,
        VendorCriterion::Transparency,
        VendorCriterion::Reliability,
        VendorCriterion::Support,
        VendorCriterion::Cost,
    ];

    /// Weight out of 100.
    pub fn weight(&self) -> u32 {
        match self {
            VendorCriterion::Security => 25,
            VendorCriterion::DataPrivacy => 20,
            VendorCriterion::Transparency => 15,
            VendorCriterion::Reliability => 15,
            VendorCriterion::Support => 10,
            VendorCriterion::Cost => 15,
        }
    }

    /// A minimum rating on a blocking criterion rejects the vendor outright.
    pub fn is_blocking(&self) -> bool {
        matches!(self, VendorCriterion::Security | VendorCriterion::DataPrivacy)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            VendorCriterion::Security => "security",
            VendorCriterion::DataPrivacy => "data_privacy",
            VendorCriterion::Transparency => "transparency",
            VendorCriterion::Reliability => "reliability",
            VendorCriterion::Support => "support",
            VendorCriterion::Cost => "cost",
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct VendorRating {
    pub criterion: VendorCriterion,
    pub rating: u8,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VendorTier {
    Preferred,
    Approved,
    Conditional,
    Rejected,
}

impl VendorTier {
    fn from_score(score: u8) -> Self {
        match score {
            80.. => VendorTier::Preferred,
            60..=79 => VendorTier::Approved,
            40..=59 => VendorTier::Conditional,
            _ => VendorTier::Rejected,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct VendorScore {
    pub vendor: String,
    /// Weighted score normalized to 0-100.
    pub score: u8,
    pub tier: VendorTier,
    pub blocking_findings: Vec<String>,
}

/// Score a vendor. Every criterion must be rated exactly once.
pub fn score_vendor(vendor: &str, ratings: &[VendorRating]) -> Result<VendorScore> {
    let mut weighted = 0u32;
    let mut blocking_findings = Vec::new();

    for criterion in VendorCriterion::ALL {
        let mut matching = ratings.iter().filter(|r| r.criterion == criterion);
        let rating = match (matching.next(), matching.next()) {
            (Some(r), None) => r.rating,
            (None, _) => {
                return Err(RulesError::validation(format!(
                    "missing rating for {}",
                    criterion.as_str()
                )))
            }
            (Some(_), Some(_)) => {
                return Err(RulesError::validation(format!(
                    "duplicate rating for {}",
                    criterion.as_str()
                )))
            }
        };
        if !(MIN_RATING..=MAX_RATING).contains(&rating) {
            return Err(RulesError::validation(format!(
                "rating for {} must be between {MIN_RATING} and {MAX_RATING}",
                criterion.as_str()
            )));
        }
        if criterion.is_blocking() && rating == MIN_RATING {
            blocking_findings.push(format!("{} rated {MIN_RATING}", criterion.as_str()));
        }
        // shift 1..=5 onto 0..=4
        weighted += criterion.weight() * u32::from(rating - MIN_RATING);
    }

    let max = 100 * u32::from(MAX_RATING - MIN_RATING);
    let score = ((weighted * 100 + max / 2) / max) as u8;
    let tier = if blocking_findings.is_empty() {
        VendorTier::from_score(score)
    } else {
        VendorTier::Rejected
    };

    Ok(VendorScore {
        vendor: vendor.to_string(),
        score,
        tier,
        blocking_findings,
    })
}

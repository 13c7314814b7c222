//! Sellable paper domain models.
//!
//! Free, paid, past and quiz papers share one catalog keyed by `(test_type, id)`.
//! The engine only reads scoring and classification data from the catalog and only
//! writes the claim fields and the lifecycle status.

use chrono::{DateTime, Utc};
use entity::sea_orm_active_enums::{PaperState, TestType};
use sea_orm::DbErr;
use serde::Serialize;
use std::fmt;

use crate::util::time::from_millis;

/// Scoring metadata copied onto attempts and placeholders.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Scoring {
    pub question_count: i32,
    pub marks_per_question: f64,
    /// Marks deducted per wrong answer.
    pub negative_marks: f64,
}

impl Scoring {
    /// Highest score reachable on the paper.
    pub fn max_marks(&self) -> f64 {
        self.question_count as f64 * self.marks_per_question
    }
}

/// Catalog entry for a paper that can be sold through subscriptions.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SellablePaper {
    pub test_type: TestType,
    pub id: String,
    pub title: String,
    pub category: String,
    pub sub_category: String,
    pub status: PaperState,
    pub claimed: bool,
    /// Subscription holding the claim.
    pub claimed_by: Option<i64>,
    pub valid_from: DateTime<Utc>,
    pub valid_until: DateTime<Utc>,
    pub scoring: Scoring,
}

impl SellablePaper {
    /// Converts an entity model to a domain model at the repository boundary.
    ///
    /// # Returns
    /// - `Ok(SellablePaper)` - Converted model
    /// - `Err(DbErr::Custom)` - A stored timestamp could not be converted
    pub fn from_entity(entity: entity::sellable_paper::Model) -> Result<Self, DbErr> {
        Ok(Self {
            test_type: entity.test_type,
            id: entity.id,
            title: entity.title,
            category: entity.category,
            sub_category: entity.sub_category,
            status: entity.status,
            claimed: entity.claimed,
            claimed_by: entity.claimed_by,
            valid_from: from_millis(entity.start_date)?,
            valid_until: from_millis(entity.end_date)?,
            scoring: Scoring {
                question_count: entity.question_count,
                marks_per_question: entity.marks_per_question,
                negative_marks: entity.negative_marks,
            },
        })
    }

    /// Whether a subscription other than `subscription_id` holds this paper.
    pub fn is_claimed_by_other(&self, subscription_id: Option<i64>) -> bool {
        self.claimed && (self.claimed_by.is_none() || self.claimed_by != subscription_id)
    }
}

/// Claim invariant violation found by the ledger audit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum ClaimAnomaly {
    /// More than one active subscription bundles the paper.
    #[serde(rename_all = "camelCase")]
    MultipleClaimants {
        paper_id: String,
        subscription_ids: Vec<i64>,
    },
    /// An active subscription bundles a paper it does not hold the claim for.
    #[serde(rename_all = "camelCase")]
    UnclaimedBundlePaper {
        paper_id: String,
        subscription_id: i64,
        claimed_by: Option<i64>,
    },
    /// An active subscription bundles a paper missing from the catalog.
    #[serde(rename_all = "camelCase")]
    MissingPaper {
        paper_id: String,
        subscription_id: i64,
    },
    /// A paper is claimed without an active subscription behind the claim.
    #[serde(rename_all = "camelCase")]
    OrphanClaim {
        paper_id: String,
        claimed_by: Option<i64>,
    },
}

impl fmt::Display for ClaimAnomaly {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MultipleClaimants {
                paper_id,
                subscription_ids,
            } => write!(
                f,
                "paper {} is bundled by active subscriptions {:?}",
                paper_id, subscription_ids
            ),
            Self::UnclaimedBundlePaper {
                paper_id,
                subscription_id,
                claimed_by,
            } => write!(
                f,
                "paper {} is bundled by active subscription {} but claimed by {:?}",
                paper_id, subscription_id, claimed_by
            ),
            Self::MissingPaper {
                paper_id,
                subscription_id,
            } => write!(
                f,
                "active subscription {} bundles unknown paper {}",
                subscription_id, paper_id
            ),
            Self::OrphanClaim {
                paper_id,
                claimed_by,
            } => write!(
                f,
                "paper {} is claimed by {:?} which is not an active subscription",
                paper_id, claimed_by
            ),
        }
    }
}

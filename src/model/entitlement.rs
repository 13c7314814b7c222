//! Entitlement domain models and parameters.
//!
//! An entitlement is a time-bounded grant giving one user access to a
//! subscription's papers, a test series, or a single paper (DAY grants).

use chrono::{DateTime, Utc};
use entity::sea_orm_active_enums::{EntitlementKind, TestType};
use sea_orm::DbErr;
use serde::Serialize;

use crate::{error::validation::ValidationError, util::time::from_millis};

/// Inclusive access window of a grant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidityWindow {
    pub valid_from: DateTime<Utc>,
    pub valid_until: DateTime<Utc>,
}

impl ValidityWindow {
    pub fn new(
        valid_from: DateTime<Utc>,
        valid_until: DateTime<Utc>,
    ) -> Result<Self, ValidationError> {
        if valid_until <= valid_from {
            return Err(ValidationError::InvalidWindow);
        }

        Ok(Self {
            valid_from,
            valid_until,
        })
    }
}

/// Time-bounded access grant for one user.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Entitlement {
    pub id: i64,
    pub user_id: String,
    pub subscription_id: i64,
    pub kind: EntitlementKind,
    /// Set only for DAY grants.
    pub paper_id: Option<String>,
    pub window: ValidityWindow,
    pub active: bool,
}

impl Entitlement {
    /// Converts an entity model to a domain model at the repository boundary.
    pub fn from_entity(entity: entity::entitlement::Model) -> Result<Self, DbErr> {
        Ok(Self {
            id: entity.id,
            user_id: entity.user_id,
            subscription_id: entity.subscription_id,
            kind: entity.kind,
            paper_id: entity.paper_id,
            window: ValidityWindow {
                valid_from: from_millis(entity.created_date)?,
                valid_until: from_millis(entity.validity)?,
            },
            active: entity.active,
        })
    }
}

/// Parameters for granting an entitlement.
#[derive(Debug, Clone)]
pub struct GrantParams {
    pub user_id: String,
    pub subscription_id: i64,
    pub kind: EntitlementKind,
    pub window: ValidityWindow,
    /// Paper for DAY grants; must be `None` otherwise.
    pub paper_id: Option<String>,
}

/// Row data handed to the repository when persisting a grant.
#[derive(Debug, Clone)]
pub struct NewEntitlement {
    pub id: i64,
    pub user_id: String,
    pub subscription_id: i64,
    pub kind: EntitlementKind,
    pub paper_id: Option<String>,
    pub window: ValidityWindow,
}

/// Result of a grant request.
#[derive(Debug, Clone, PartialEq)]
pub enum GrantOutcome {
    /// A new entitlement was persisted.
    Created(Entitlement),
    /// A live broader grant already covers the request; nothing was persisted.
    AlreadyCovered(Entitlement),
}

impl GrantOutcome {
    pub fn entitlement(&self) -> &Entitlement {
        match self {
            Self::Created(e) | Self::AlreadyCovered(e) => e,
        }
    }
}

/// A paper the user may open, with the grant that authorizes it.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AccessiblePaper {
    pub test_type: TestType,
    pub paper_id: String,
    pub subscription_id: i64,
    pub entitlement_id: i64,
    pub kind: EntitlementKind,
    /// Window of the most recently created live grant covering the paper.
    pub window: ValidityWindow,
}

//! Sequence categories for generated record IDs.

/// Logical entity category with its own ID counter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SequenceCategory {
    Subscription,
    Entitlement,
    Purchase,
    Paper,
    User,
}

impl SequenceCategory {
    /// Counter key stored in the database.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Subscription => "subscription",
            Self::Entitlement => "entitlement",
            Self::Purchase => "purchase",
            Self::Paper => "paper",
            Self::User => "user",
        }
    }
}

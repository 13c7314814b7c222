//! Domain models and parameter types.
//!
//! Domain models are converted from entity models at the repository boundary. The
//! read-side views (`AccessiblePaper`, `PaperStatusView`, `Subscription`) serialize
//! with camelCase fields for the web layer.

pub mod attempt;
pub mod entitlement;
pub mod paper;
pub mod purchase;
pub mod sequence;
pub mod subscription;

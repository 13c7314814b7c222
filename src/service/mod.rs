//! Service layer for business rules and orchestration.
//!
//! Services sit between callers (a web layer, the maintenance binary) and the data
//! layer. They are responsible for:
//!
//! - **Business Rules**: validation, lifecycle transitions and entitlement checks
//! - **Orchestration**: coordinating repository calls, including compensating
//!   releases when a multi-step claim fails part way
//! - **Domain Models**: working with domain models rather than entity models
//!
//! Every operation takes the current time explicitly so results are deterministic.

pub mod attempt;
pub mod entitlement;
pub mod ledger;
pub mod paper_status;
pub mod purchase;
pub mod sequence;
pub mod subscription;

#[cfg(test)]
mod test;

//! Database repository layer.
//!
//! Each repository borrows a database connection and performs the queries, inserts
//! and conditional updates for one table family. Repositories use SeaORM entity models
//! internally and return domain models so the service layer never touches entities.
//! Every write that guards an invariant (counter increments, paper claims, terminal
//! attempt states) is a single conditional statement rather than a read followed by
//! a write.

pub mod attempt;
pub mod entitlement;
pub mod paper;
pub mod purchase;
pub mod sequence;
pub mod subscription;
pub mod test_series;

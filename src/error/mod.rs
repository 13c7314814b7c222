//! Error types for the engine.
//!
//! `AppError` is the top-level error returned by every service operation. It wraps
//! the domain-specific errors below so callers can map each family (validation,
//! conflict, not-found, integrity) to their own response handling.

pub mod config;
pub mod entitlement;
pub mod integrity;
pub mod internal;
pub mod subscription;
pub mod validation;

use thiserror::Error;

use crate::error::{
    config::ConfigError, entitlement::EntitlementError, integrity::IntegrityError,
    internal::InternalError, subscription::SubscriptionError, validation::ValidationError,
};

/// Top-level application error type.
///
/// Most variants use `#[from]` for automatic conversion so services can use `?`
/// on repository and domain results alike.
#[derive(Error, Debug)]
pub enum AppError {
    /// Configuration error during startup or environment variable loading.
    #[error(transparent)]
    ConfigErr(#[from] ConfigError),

    /// Database operation error from SeaORM.
    #[error(transparent)]
    DbErr(#[from] sea_orm::DbErr),

    /// Request failed validation; nothing was persisted.
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// Subscription lifecycle conflict.
    #[error(transparent)]
    Subscription(#[from] SubscriptionError),

    /// Entitlement grant or access conflict.
    #[error(transparent)]
    Entitlement(#[from] EntitlementError),

    /// Stored state violates a claim invariant.
    #[error(transparent)]
    Integrity(#[from] IntegrityError),

    /// Unexpected store state or arithmetic failure.
    #[error(transparent)]
    InternalErr(#[from] InternalError),

    /// Resource not found error.
    ///
    /// # Fields
    /// - Message describing what resource was not found
    #[error("{0}")]
    NotFound(String),
}

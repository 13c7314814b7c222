//! Subscription and entitlement engine for the exam-preparation platform.
//!
//! This crate owns the part of the platform that sells access to papers: it issues
//! record IDs, tracks which sellable papers are claimed by which subscription, drives
//! subscriptions through their DRAFT/ACTIVE lifecycle, grants users time-bounded
//! entitlements, and reconciles what a user may access with the attempts they have
//! already started.
//!
//! # Architecture
//!
//! - **Service Layer** (`service/`) - Business rules, state transitions and compensating side effects
//! - **Data Layer** (`data/`) - Database operations and entity-to-domain model conversion
//! - **Model Layer** (`model/`) - Domain models and operation-specific parameter types
//! - **Error Layer** (`error/`) - Application error hierarchy
//!
//! Supporting modules provide configuration loading (`config`), database and logging
//! initialization (`startup`) and timestamp conversion helpers (`util`).
//!
//! The HTTP surface, authentication and payment gateways live outside this crate; a web
//! layer constructs services over a shared `DatabaseConnection` per request.

pub mod config;
pub mod data;
pub mod error;
pub mod model;
pub mod service;
pub mod startup;
pub mod util;

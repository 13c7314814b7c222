use crate::{
    data::entitlement::EntitlementRepository,
    model::entitlement::{NewEntitlement, ValidityWindow},
};
use chrono::Duration;
use entity::{prelude::*, sea_orm_active_enums::EntitlementKind};
use sea_orm::DbErr;
use test_utils::{
    builder::TestBuilder,
    factory::{entitlement::EntitlementFactory, helpers::fixed_now},
};

mod deactivate;

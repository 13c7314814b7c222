use crate::data::test_series::TestSeriesRepository;
use entity::prelude::*;
use sea_orm::DbErr;
use test_utils::{builder::TestBuilder, factory};

mod paper_ids;
mod replace;

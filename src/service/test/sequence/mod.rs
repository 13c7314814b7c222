use crate::{error::AppError, model::sequence::SequenceCategory, service::sequence::SequenceService};
use entity::prelude::*;
use test_utils::builder::TestBuilder;

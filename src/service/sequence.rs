use sea_orm::DatabaseConnection;

use crate::{data::sequence::SequenceRepository, error::AppError, model::sequence::SequenceCategory};

/// Issues unique, increasing IDs per entity category.
pub struct SequenceService<'a> {
    db: &'a DatabaseConnection,
}

impl<'a> SequenceService<'a> {
    pub fn new(db: &'a DatabaseConnection) -> Self {
        Self { db }
    }

    /// Returns the next ID for a category. The first ID issued is 1.
    pub async fn next(&self, category: SequenceCategory) -> Result<i64, AppError> {
        let repo = SequenceRepository::new(self.db);

        Ok(repo.next(category.as_str()).await?)
    }
}

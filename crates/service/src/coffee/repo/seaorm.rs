use async_trait::async_trait;
use sea_orm::DatabaseConnection;

use crate::coffee::domain::{Coffee, CoffeeId, CoffeeInput};
use crate::coffee::repository::CoffeeRepository;
use crate::errors::ServiceError;

/// SQLite-backed repository. Every call borrows a pooled connection for one statement.
pub struct SeaOrmCoffeeRepository {
    pub db: DatabaseConnection,
}

fn row_id(id: &str) -> Option<i32> {
    id.parse().ok()
}

#[async_trait]
impl CoffeeRepository for SeaOrmCoffeeRepository {
    async fn list_all(&self) -> Result<Vec<Coffee>, ServiceError> {
        let rows = models::coffee::list(&self.db).await?;
        Ok(rows.into_iter().map(Coffee::from).collect())
    }

    async fn add(&self, input: &CoffeeInput) -> Result<CoffeeId, ServiceError> {
        let created = models::coffee::create(
            &self.db,
            &input.name,
            input.description.as_deref(),
            input.image_url.as_deref(),
        )
        .await?;
        Ok(created.id.into())
    }

    async fn update(&self, id: &str, input: &CoffeeInput) -> Result<bool, ServiceError> {
        let Some(id) = row_id(id) else { return Ok(false) };
        Ok(models::coffee::update_details(
            &self.db,
            id,
            &input.name,
            input.description.as_deref(),
            input.image_url.as_deref(),
        )
        .await?)
    }

    async fn delete(&self, id: &str) -> Result<bool, ServiceError> {
        let Some(id) = row_id(id) else { return Ok(false) };
        Ok(models::coffee::hard_delete(&self.db, id).await?)
    }

    async fn increment_vote(&self, id: &str) -> Result<bool, ServiceError> {
        let Some(id) = row_id(id) else { return Ok(false) };
        Ok(models::coffee::increment_votes(&self.db, id).await?)
    }
}

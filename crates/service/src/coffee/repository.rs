use async_trait::async_trait;

use super::domain::{Coffee, CoffeeId, CoffeeInput};
use crate::errors::ServiceError;

/// Record store for coffees.
///
/// Ids arrive as the raw path segment. An id the backend cannot have issued
/// (e.g. a non-numeric id for SQLite) is treated like an absent record, so
/// `update`, `delete` and `increment_vote` return `Ok(false)` rather than an
/// error.
#[async_trait]
pub trait CoffeeRepository: Send + Sync {
    async fn list_all(&self) -> Result<Vec<Coffee>, ServiceError>;
    /// Create with zero votes and return the store-assigned id.
    async fn add(&self, input: &CoffeeInput) -> Result<CoffeeId, ServiceError>;
    /// Overwrite name, description and image_url; votes are untouched.
    async fn update(&self, id: &str, input: &CoffeeInput) -> Result<bool, ServiceError>;
    async fn delete(&self, id: &str) -> Result<bool, ServiceError>;
    async fn increment_vote(&self, id: &str) -> Result<bool, ServiceError>;
}

/// Simple in-memory mock repository for tests and doc examples
pub mod mock {
    use super::*;
    use std::collections::BTreeMap;
    use std::sync::Mutex;

    #[derive(Default)]
    pub struct MockCoffeeRepository {
        rows: Mutex<BTreeMap<i64, Coffee>>,
        next_id: Mutex<i64>,
        fail_writes: bool,
    }

    impl MockCoffeeRepository {
        /// A repository whose `add` always fails, to exercise store-failure paths.
        pub fn failing() -> Self {
            Self { fail_writes: true, ..Default::default() }
        }

        pub fn votes(&self, id: i64) -> Option<i64> {
            self.rows.lock().unwrap().get(&id).map(|c| c.votes)
        }
    }

    #[async_trait]
    impl CoffeeRepository for MockCoffeeRepository {
        async fn list_all(&self) -> Result<Vec<Coffee>, ServiceError> {
            Ok(self.rows.lock().unwrap().values().cloned().collect())
        }

        async fn add(&self, input: &CoffeeInput) -> Result<CoffeeId, ServiceError> {
            if self.fail_writes {
                return Err(ServiceError::Db("mock store unavailable".into()));
            }
            let mut next = self.next_id.lock().unwrap();
            *next += 1;
            let id = CoffeeId::Int(*next);
            self.rows.lock().unwrap().insert(*next, input.clone().into_coffee(id.clone()));
            Ok(id)
        }

        async fn update(&self, id: &str, input: &CoffeeInput) -> Result<bool, ServiceError> {
            let Ok(key) = id.parse::<i64>() else { return Ok(false) };
            let mut rows = self.rows.lock().unwrap();
            let Some(row) = rows.get_mut(&key) else { return Ok(false) };
            row.name = input.name.clone();
            row.description = input.description.clone();
            row.image_url = input.image_url.clone();
            Ok(true)
        }

        async fn delete(&self, id: &str) -> Result<bool, ServiceError> {
            let Ok(key) = id.parse::<i64>() else { return Ok(false) };
            Ok(self.rows.lock().unwrap().remove(&key).is_some())
        }

        async fn increment_vote(&self, id: &str) -> Result<bool, ServiceError> {
            let Ok(key) = id.parse::<i64>() else { return Ok(false) };
            let mut rows = self.rows.lock().unwrap();
            let Some(row) = rows.get_mut(&key) else { return Ok(false) };
            row.votes += 1;
            Ok(true)
        }
    }
}

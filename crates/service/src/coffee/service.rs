use std::sync::Arc;

use tracing::{info, instrument};

use super::domain::{Coffee, CoffeeInput};
use super::repository::CoffeeRepository;
use crate::errors::ServiceError;

/// Coffee catalog service independent of web framework.
///
/// Each operation validates its input, performs exactly one repository call
/// and turns a `false` from the repository into [`ServiceError::NotFound`].
pub struct CoffeeService<R: CoffeeRepository + ?Sized> {
    repo: Arc<R>,
}

impl<R: CoffeeRepository + ?Sized> CoffeeService<R> {
    pub fn new(repo: Arc<R>) -> Self { Self { repo } }

    pub async fn list(&self) -> Result<Vec<Coffee>, ServiceError> {
        self.repo.list_all().await
    }

    /// Create a coffee; the result carries the new id and zero votes.
    ///
    /// # Examples
    /// ```
    /// use service::coffee::{CoffeeService, domain::{CoffeeId, CoffeeInput}, repository::mock::MockCoffeeRepository};
    /// use std::sync::Arc;
    /// let svc = CoffeeService::new(Arc::new(MockCoffeeRepository::default()));
    /// let created = tokio_test::block_on(svc.create(CoffeeInput::new("Latte", Some("Milky"), None))).unwrap();
    /// assert_eq!(created.id, Some(CoffeeId::Int(1)));
    /// assert_eq!(created.votes, 0);
    /// ```
    #[instrument(skip(self, input), fields(name = %input.name))]
    pub async fn create(&self, input: CoffeeInput) -> Result<Coffee, ServiceError> {
        validate(&input)?;
        let id = self.repo.add(&input).await?;
        info!(%id, "coffee_created");
        Ok(input.into_coffee(id))
    }

    #[instrument(skip(self, input), fields(name = %input.name))]
    pub async fn update(&self, id: &str, input: &CoffeeInput) -> Result<(), ServiceError> {
        validate(input)?;
        if !self.repo.update(id, input).await? {
            return Err(ServiceError::not_found("coffee"));
        }
        info!("coffee_updated");
        Ok(())
    }

    #[instrument(skip(self))]
    pub async fn delete(&self, id: &str) -> Result<(), ServiceError> {
        if !self.repo.delete(id).await? {
            return Err(ServiceError::not_found("coffee"));
        }
        info!("coffee_deleted");
        Ok(())
    }

    /// Count one vote. Duplicate-vote detection is the caller's job.
    #[instrument(skip(self))]
    pub async fn vote(&self, id: &str) -> Result<(), ServiceError> {
        if !self.repo.increment_vote(id).await? {
            return Err(ServiceError::not_found("coffee"));
        }
        info!("vote_recorded");
        Ok(())
    }
}

fn validate(input: &CoffeeInput) -> Result<(), ServiceError> {
    if input.name.trim().is_empty() {
        return Err(ServiceError::Validation("name must not be empty".into()));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::coffee::{domain::CoffeeId, repository::mock::MockCoffeeRepository};

    fn svc() -> (CoffeeService<MockCoffeeRepository>, Arc<MockCoffeeRepository>) {
        let repo = Arc::new(MockCoffeeRepository::default());
        (CoffeeService::new(repo.clone()), repo)
    }

    #[tokio::test]
    async fn create_assigns_id_and_zero_votes() {
        let (svc, _) = svc();
        let a = svc.create(CoffeeInput::new("Latte", Some("Milky"), Some("/x.jpg"))).await.unwrap();
        let b = svc.create(CoffeeInput::new("Mocha", None, None)).await.unwrap();
        assert_eq!(a.id, Some(CoffeeId::Int(1)));
        assert_eq!(b.id, Some(CoffeeId::Int(2)));
        assert_eq!(a.votes, 0);

        let listed = svc.list().await.unwrap();
        assert_eq!(listed.len(), 2);
        assert_eq!(listed[0], a);
    }

    #[tokio::test]
    async fn blank_name_never_reaches_the_store() {
        let (svc, repo) = svc();
        let err = svc.create(CoffeeInput::new("  ", None, None)).await.unwrap_err();
        assert!(matches!(err, ServiceError::Validation(_)));
        assert!(repo.list_all().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn missing_ids_map_to_not_found() {
        let (svc, _) = svc();
        let input = CoffeeInput::new("Ghost", None, None);
        assert!(matches!(svc.update("42", &input).await, Err(ServiceError::NotFound(_))));
        assert!(matches!(svc.delete("42").await, Err(ServiceError::NotFound(_))));
        assert!(matches!(svc.vote("42").await, Err(ServiceError::NotFound(_))));
        assert!(matches!(svc.vote("not-a-number").await, Err(ServiceError::NotFound(_))));
    }

    #[tokio::test]
    async fn vote_adds_exactly_one() {
        let (svc, repo) = svc();
        svc.create(CoffeeInput::new("Latte", None, None)).await.unwrap();
        svc.vote("1").await.unwrap();
        assert_eq!(repo.votes(1), Some(1));
        svc.vote("1").await.unwrap();
        assert_eq!(repo.votes(1), Some(2));
    }

    #[tokio::test]
    async fn update_keeps_votes() {
        let (svc, repo) = svc();
        svc.create(CoffeeInput::new("Latte", None, None)).await.unwrap();
        svc.vote("1").await.unwrap();
        svc.update("1", &CoffeeInput::new("Oat Latte", Some("Oaty"), None)).await.unwrap();

        let row = repo.list_all().await.unwrap().remove(0);
        assert_eq!(row.name, "Oat Latte");
        assert_eq!(row.description.as_deref(), Some("Oaty"));
        assert_eq!(row.votes, 1);
    }

    #[tokio::test]
    async fn store_failure_is_reported() {
        let svc = CoffeeService::new(Arc::new(MockCoffeeRepository::failing()));
        let err = svc.create(CoffeeInput::new("Latte", None, None)).await.unwrap_err();
        assert!(err.is_store_failure());
    }
}

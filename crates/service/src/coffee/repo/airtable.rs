//! Airtable-backed repository.
//!
//! Talks to the Airtable REST API (`{api_url}/{base_id}/{table_id}`) with a
//! shared `reqwest::Client`. Records look like
//! `{"id": "rec…", "fields": {"name", "description", "image_url", "votes"}}`;
//! Airtable omits empty fields, so every field is optional on the way in.
//!
//! The API has no atomic increment: `increment_vote` reads the record and
//! writes `votes + 1`, so two concurrent votes can be counted once.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, Response, StatusCode, Url};
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::{debug, warn};

use configs::AirtableConfig;

use crate::coffee::domain::{Coffee, CoffeeId, CoffeeInput};
use crate::coffee::repository::CoffeeRepository;
use crate::errors::ServiceError;

#[derive(Debug, Default, Serialize, Deserialize)]
struct Fields {
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    description: Option<String>,
    #[serde(default)]
    image_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    votes: Option<i64>,
}

#[derive(Debug, Deserialize)]
struct Record {
    id: String,
    #[serde(default)]
    fields: Fields,
}

#[derive(Debug, Deserialize)]
struct ListPage {
    #[serde(default)]
    records: Vec<Record>,
    #[serde(default)]
    offset: Option<String>,
}

impl From<Record> for Coffee {
    fn from(r: Record) -> Self {
        Coffee {
            id: Some(CoffeeId::Text(r.id)),
            name: r.fields.name.unwrap_or_default(),
            description: r.fields.description,
            image_url: r.fields.image_url,
            votes: r.fields.votes.unwrap_or(0),
        }
    }
}

pub struct AirtableCoffeeRepository {
    client: Client,
    table_url: Url,
    token: String,
}

impl AirtableCoffeeRepository {
    pub fn new(cfg: &AirtableConfig) -> Result<Self, ServiceError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(cfg.timeout_secs))
            .build()?;
        let raw = format!("{}/{}/{}", cfg.api_url.trim_end_matches('/'), cfg.base_id, cfg.table_id);
        let table_url = Url::parse(&raw)
            .map_err(|e| ServiceError::Validation(format!("invalid airtable url {raw}: {e}")))?;
        Ok(Self { client, table_url, token: cfg.api_token.clone() })
    }

    /// URL of one record. `None` for ids Airtable cannot have issued
    /// (record ids are short alphanumeric strings like `rec8116cdd76088af`).
    fn record_url(&self, id: &str) -> Option<Url> {
        if id.is_empty() || !id.chars().all(|c| c.is_ascii_alphanumeric()) {
            return None;
        }
        let mut url = self.table_url.clone();
        url.path_segments_mut().ok()?.push(id);
        Some(url)
    }

    fn authed(&self, req: RequestBuilder) -> RequestBuilder {
        req.bearer_auth(&self.token)
    }

    /// `Ok(None)` on 404, the response on 2xx, an error otherwise.
    async fn send(&self, req: RequestBuilder) -> Result<Option<Response>, ServiceError> {
        let resp = self.authed(req).send().await?;
        let status = resp.status();
        if status == StatusCode::NOT_FOUND {
            return Ok(None);
        }
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            warn!(%status, %body, "airtable request failed");
            return Err(ServiceError::Remote(format!("airtable returned {status}: {body}")));
        }
        Ok(Some(resp))
    }

    async fn fetch(&self, url: Url) -> Result<Option<Record>, ServiceError> {
        match self.send(self.client.get(url)).await? {
            Some(resp) => Ok(Some(resp.json::<Record>().await?)),
            None => Ok(None),
        }
    }

    async fn patch_fields(&self, url: Url, fields: serde_json::Value) -> Result<bool, ServiceError> {
        let sent = self.send(self.client.patch(url).json(&json!({ "fields": fields }))).await?;
        Ok(sent.is_some())
    }
}

#[async_trait]
impl CoffeeRepository for AirtableCoffeeRepository {
    async fn list_all(&self) -> Result<Vec<Coffee>, ServiceError> {
        let mut coffees = Vec::new();
        let mut offset: Option<String> = None;
        loop {
            let mut req = self.client.get(self.table_url.clone());
            if let Some(o) = &offset {
                req = req.query(&[("offset", o)]);
            }
            let resp = self
                .send(req)
                .await?
                .ok_or_else(|| ServiceError::Remote("airtable table not found".into()))?;
            let page: ListPage = resp.json().await?;
            coffees.extend(page.records.into_iter().map(Coffee::from));
            match page.offset {
                Some(next) => offset = Some(next),
                None => break,
            }
        }
        debug!(count = coffees.len(), "listed airtable records");
        Ok(coffees)
    }

    async fn add(&self, input: &CoffeeInput) -> Result<CoffeeId, ServiceError> {
        let fields = Fields {
            name: Some(input.name.clone()),
            description: input.description.clone(),
            image_url: input.image_url.clone(),
            votes: Some(0),
        };
        let resp = self
            .send(self.client.post(self.table_url.clone()).json(&json!({ "fields": fields })))
            .await?
            .ok_or_else(|| ServiceError::Remote("airtable table not found".into()))?;
        let created: Record = resp.json().await?;
        Ok(CoffeeId::Text(created.id))
    }

    async fn update(&self, id: &str, input: &CoffeeInput) -> Result<bool, ServiceError> {
        let Some(url) = self.record_url(id) else { return Ok(false) };
        let fields = json!({
            "name": input.name,
            "description": input.description,
            "image_url": input.image_url,
        });
        self.patch_fields(url, fields).await
    }

    async fn delete(&self, id: &str) -> Result<bool, ServiceError> {
        let Some(url) = self.record_url(id) else { return Ok(false) };
        Ok(self.send(self.client.delete(url)).await?.is_some())
    }

    async fn increment_vote(&self, id: &str) -> Result<bool, ServiceError> {
        let Some(url) = self.record_url(id) else { return Ok(false) };
        let Some(record) = self.fetch(url.clone()).await? else { return Ok(false) };
        let votes = record.fields.votes.unwrap_or(0);
        self.patch_fields(url, json!({ "votes": votes + 1 })).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::FakeAirtable;

    #[tokio::test]
    async fn add_list_update_roundtrip() -> Result<(), anyhow::Error> {
        let fake = FakeAirtable::start(2).await?;
        let repo = AirtableCoffeeRepository::new(&fake.config())?;

        let id = repo.add(&CoffeeInput::new("Latte", Some("Milky"), Some("/x.jpg"))).await?;
        let CoffeeId::Text(ref key) = id else { panic!("airtable ids are strings") };
        assert!(key.starts_with("rec"));

        assert!(repo.update(key, &CoffeeInput::new("Latte", None, Some("/y.jpg"))).await?);
        let all = repo.list_all().await?;
        assert_eq!(all.len(), 1);
        assert_eq!(all[0].id, Some(id.clone()));
        assert_eq!(all[0].description, None);
        assert_eq!(all[0].image_url.as_deref(), Some("/y.jpg"));
        assert_eq!(all[0].votes, 0);
        Ok(())
    }

    #[tokio::test]
    async fn list_follows_offsets_across_pages() -> Result<(), anyhow::Error> {
        let fake = FakeAirtable::start(2).await?;
        let repo = AirtableCoffeeRepository::new(&fake.config())?;
        for name in ["A", "B", "C", "D", "E"] {
            repo.add(&CoffeeInput::new(name, None, None)).await?;
        }
        let names: Vec<String> = repo.list_all().await?.into_iter().map(|c| c.name).collect();
        assert_eq!(names, ["A", "B", "C", "D", "E"]);
        Ok(())
    }

    #[tokio::test]
    async fn missing_votes_field_defaults_to_zero_and_increments() -> Result<(), anyhow::Error> {
        let fake = FakeAirtable::start(100).await?;
        let key = fake.insert_raw(json!({ "name": "Cold Brew" })).await;
        let repo = AirtableCoffeeRepository::new(&fake.config())?;

        assert_eq!(repo.list_all().await?[0].votes, 0);
        assert!(repo.increment_vote(&key).await?);
        assert!(repo.increment_vote(&key).await?);
        assert_eq!(repo.list_all().await?[0].votes, 2);
        Ok(())
    }

    #[tokio::test]
    async fn unknown_and_malformed_ids_are_absent() -> Result<(), anyhow::Error> {
        let fake = FakeAirtable::start(100).await?;
        let repo = AirtableCoffeeRepository::new(&fake.config())?;
        let input = CoffeeInput::new("Ghost", None, None);

        assert!(!repo.update("recDoesNotExist1", &input).await?);
        assert!(!repo.delete("recDoesNotExist1").await?);
        assert!(!repo.increment_vote("recDoesNotExist1").await?);
        assert!(!repo.delete("../other-table").await?);
        assert_eq!(fake.request_count().await, 3);
        Ok(())
    }

    #[tokio::test]
    async fn delete_removes_record() -> Result<(), anyhow::Error> {
        let fake = FakeAirtable::start(100).await?;
        let repo = AirtableCoffeeRepository::new(&fake.config())?;
        let id = repo.add(&CoffeeInput::new("Latte", None, None)).await?.to_string();

        assert!(repo.delete(&id).await?);
        assert!(repo.list_all().await?.is_empty());
        assert!(!repo.delete(&id).await?);
        Ok(())
    }

    #[tokio::test]
    async fn rejected_token_is_a_remote_error() -> Result<(), anyhow::Error> {
        let fake = FakeAirtable::start(100).await?;
        let mut cfg = fake.config();
        cfg.api_token = "wrong".into();
        let repo = AirtableCoffeeRepository::new(&cfg)?;

        let err = repo.add(&CoffeeInput::new("Latte", None, None)).await.unwrap_err();
        assert!(matches!(err, ServiceError::Remote(_)));
        assert!(err.is_store_failure());
        Ok(())
    }

    #[tokio::test]
    async fn unreachable_store_is_a_remote_error() -> Result<(), anyhow::Error> {
        let cfg = AirtableConfig {
            api_url: "http://127.0.0.1:1/v0".into(),
            api_token: "t".into(),
            base_id: "app".into(),
            table_id: "tbl".into(),
            timeout_secs: 2,
        };
        let repo = AirtableCoffeeRepository::new(&cfg)?;
        assert!(matches!(repo.list_all().await, Err(ServiceError::Remote(_))));
        Ok(())
    }
}

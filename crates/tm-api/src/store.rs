use std::collections::HashMap;
use std::path::Path;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use tm_common::profile::RawProfile;
use tm_common::{BoostState, InteractionRecord, JobPosting, SubscriptionState};

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("candidate not found: {0}")]
    NotFound(i64),
    #[error("data layer unavailable: {0}")]
    Unavailable(String),
}

/// Read-only view of the marketplace data layer. The real implementation
/// lives outside this service; the engine only needs these five reads per
/// request and performs no retries of its own.
#[async_trait]
pub trait Directory: Send + Sync {
    async fn candidate_profile(&self, candidate_id: i64) -> Result<RawProfile, StoreError>;
    async fn job_catalog(&self) -> Result<Vec<JobPosting>, StoreError>;
    async fn interactions(&self, candidate_id: i64) -> Result<Vec<InteractionRecord>, StoreError>;
    async fn subscription(&self, candidate_id: i64)
        -> Result<Option<SubscriptionState>, StoreError>;
    async fn boost(&self, candidate_id: i64) -> Result<Option<BoostState>, StoreError>;
}

/// One candidate entry in a seed catalog.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SeedCandidate {
    pub profile: RawProfile,
    #[serde(default)]
    pub subscription: Option<SubscriptionState>,
    #[serde(default)]
    pub boost: Option<BoostState>,
}

/// JSON-seeded snapshot of the data layer, used for local runs and tests.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Catalog {
    #[serde(default)]
    pub candidates: Vec<SeedCandidate>,
    #[serde(default)]
    pub jobs: Vec<JobPosting>,
    #[serde(default)]
    pub interactions: Vec<InteractionRecord>,
}

pub struct InMemoryDirectory {
    candidates: HashMap<i64, SeedCandidate>,
    jobs: Vec<JobPosting>,
    interactions: Vec<InteractionRecord>,
}

impl InMemoryDirectory {
    pub fn new(catalog: Catalog) -> Self {
        let candidates = catalog
            .candidates
            .into_iter()
            .map(|candidate| (candidate.profile.id, candidate))
            .collect();

        Self {
            candidates,
            jobs: catalog.jobs,
            interactions: catalog.interactions,
        }
    }

    pub fn empty() -> Self {
        Self::new(Catalog::default())
    }

    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        Ok(Self::new(serde_json::from_str(json)?))
    }

    pub fn from_path(path: &Path) -> Result<Self, StoreError> {
        let contents = std::fs::read_to_string(path)
            .map_err(|err| StoreError::Unavailable(format!("seed file {path:?}: {err}")))?;
        Self::from_json(&contents)
            .map_err(|err| StoreError::Unavailable(format!("seed file {path:?}: {err}")))
    }

    fn candidate(&self, candidate_id: i64) -> Result<&SeedCandidate, StoreError> {
        self.candidates
            .get(&candidate_id)
            .ok_or(StoreError::NotFound(candidate_id))
    }
}

#[async_trait]
impl Directory for InMemoryDirectory {
    async fn candidate_profile(&self, candidate_id: i64) -> Result<RawProfile, StoreError> {
        Ok(self.candidate(candidate_id)?.profile.clone())
    }

    async fn job_catalog(&self) -> Result<Vec<JobPosting>, StoreError> {
        Ok(self.jobs.clone())
    }

    async fn interactions(&self, candidate_id: i64) -> Result<Vec<InteractionRecord>, StoreError> {
        Ok(self
            .interactions
            .iter()
            .filter(|record| record.candidate_id == candidate_id)
            .cloned()
            .collect())
    }

    async fn subscription(
        &self,
        candidate_id: i64,
    ) -> Result<Option<SubscriptionState>, StoreError> {
        Ok(self.candidate(candidate_id)?.subscription.clone())
    }

    async fn boost(&self, candidate_id: i64) -> Result<Option<BoostState>, StoreError> {
        Ok(self.candidate(candidate_id)?.boost.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn missing_candidate_is_not_found() {
        let store = InMemoryDirectory::empty();
        let err = store.candidate_profile(1).await.unwrap_err();
        assert!(matches!(err, StoreError::NotFound(1)));
    }

    #[tokio::test]
    async fn loads_catalog_from_json() {
        let store = InMemoryDirectory::from_json(
            r#"{
                "candidates": [
                    {"profile": {"id": 1, "attributes": {"skills": "php, mysql"}}}
                ],
                "jobs": [
                    {"id": 10, "required_skills": ["php"], "status": "active"}
                ],
                "interactions": [
                    {"candidate_id": 1, "job_id": 10, "kind": "saved"}
                ]
            }"#,
        )
        .unwrap();

        let profile = store.candidate_profile(1).await.unwrap();
        assert_eq!(profile.attributes["skills"], "php, mysql");
        assert_eq!(store.job_catalog().await.unwrap().len(), 1);
        assert_eq!(store.interactions(1).await.unwrap().len(), 1);
        assert!(store.interactions(2).await.unwrap().is_empty());
    }
}

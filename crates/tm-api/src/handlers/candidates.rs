use axum::{extract::State, Json};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use tm_common::matching::priority::{rank_candidates, SearchCandidate, SecondarySortKey};
use tm_common::profile::{completeness_pct, normalize_profile};

use crate::error::ApiError;
use crate::SharedState;

#[derive(Debug, Deserialize)]
pub struct RankRequest {
    pub candidate_ids: Vec<i64>,
    #[serde(default)]
    pub sort: SecondarySortKey,
    /// Reference instant for subscription/boost expiry; defaults to now.
    pub now: Option<DateTime<Utc>>,
}

#[derive(Debug, Serialize)]
pub struct RankedCandidateDto {
    pub candidate_id: i64,
    pub is_premium: bool,
    pub completeness_pct: f64,
}

/// Employer-search ordering: premium tier first, caller-chosen key within
/// each tier.
pub async fn rank(
    State(state): State<SharedState>,
    Json(request): Json<RankRequest>,
) -> Result<Json<Vec<RankedCandidateDto>>, ApiError> {
    if request.candidate_ids.is_empty() {
        return Ok(Json(Vec::new()));
    }

    let mut candidates = Vec::with_capacity(request.candidate_ids.len());
    for candidate_id in &request.candidate_ids {
        let raw = state.directory.candidate_profile(*candidate_id).await?;
        let subscription = state.directory.subscription(*candidate_id).await?;
        let boost = state.directory.boost(*candidate_id).await?;

        candidates.push(SearchCandidate {
            profile: normalize_profile(&raw),
            subscription,
            boost,
        });
    }

    let now = request.now.unwrap_or_else(Utc::now);
    let ranked = rank_candidates(candidates, request.sort, now);

    Ok(Json(
        ranked
            .into_iter()
            .map(|candidate| RankedCandidateDto {
                candidate_id: candidate.profile.id,
                is_premium: candidate.is_premium,
                completeness_pct: completeness_pct(&candidate.profile),
            })
            .collect(),
    ))
}

use axum::{
    extract::{Path, Query, State},
    Json,
};
use chrono::{NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use tm_common::matching::ranker::{MatchingEngine, Recommendations};
use tm_common::matching::scoring::{FactorScore, MatchScore};
use tm_common::profile::normalize_profile;

use crate::error::ApiError;
use crate::SharedState;

const MAX_RESULT_LIMIT: usize = 100;

#[derive(Debug, Deserialize)]
pub struct RecommendationParams {
    /// Reference date for deadline and recency checks; defaults to the
    /// current UTC date. Explicit for reproducible calls.
    pub today: Option<NaiveDate>,
    pub limit: Option<usize>,
    /// Set true to keep saved-but-not-applied postings in the output.
    pub include_saved: Option<bool>,
}

#[derive(Debug, Serialize)]
pub struct FactorDto {
    pub score: f64,
    pub status: &'static str,
    pub details: String,
}

impl From<&FactorScore> for FactorDto {
    fn from(factor: &FactorScore) -> Self {
        Self {
            score: factor.score,
            status: factor.status,
            details: factor.details.clone(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct BreakdownDto {
    pub skills: FactorDto,
    pub location: FactorDto,
    pub salary: FactorDto,
    pub experience: FactorDto,
    pub education: FactorDto,
    pub urgency: FactorDto,
}

impl From<&MatchScore> for BreakdownDto {
    fn from(score: &MatchScore) -> Self {
        Self {
            skills: (&score.skills).into(),
            location: (&score.location).into(),
            salary: (&score.salary).into(),
            experience: (&score.experience).into(),
            education: (&score.education).into(),
            urgency: (&score.urgency).into(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct RecommendedJobDto {
    pub job_id: i64,
    pub title: Option<String>,
    pub total_score: f64,
    pub breakdown: BreakdownDto,
}

#[derive(Debug, Serialize)]
pub struct RecommendationResponse {
    pub candidate_id: i64,
    pub completeness_pct: f64,
    pub recommendations: Vec<RecommendedJobDto>,
}

impl RecommendationResponse {
    fn from_result(candidate_id: i64, result: Recommendations) -> Self {
        Self {
            candidate_id,
            completeness_pct: result.completeness_pct,
            recommendations: result
                .items
                .iter()
                .map(|ranked| RecommendedJobDto {
                    job_id: ranked.job.id,
                    title: ranked.job.title.clone(),
                    total_score: ranked.score.total,
                    breakdown: (&ranked.score).into(),
                })
                .collect(),
        }
    }
}

pub async fn recommend(
    State(state): State<SharedState>,
    Path(candidate_id): Path<i64>,
    Query(params): Query<RecommendationParams>,
) -> Result<Json<RecommendationResponse>, ApiError> {
    let raw = state.directory.candidate_profile(candidate_id).await?;
    let jobs = state.directory.job_catalog().await?;
    let interactions = state.directory.interactions(candidate_id).await?;

    let profile = normalize_profile(&raw);
    let today = params.today.unwrap_or_else(|| Utc::now().date_naive());

    let mut config = state.engine_config.clone();
    if let Some(include_saved) = params.include_saved {
        config.eligibility.exclude_saved = !include_saved;
    }

    let limit = params.limit.map(|limit| limit.clamp(1, MAX_RESULT_LIMIT));
    let result = MatchingEngine::new(config).recommend(&profile, &jobs, &interactions, today, limit);

    tracing::info!(
        candidate_id,
        completeness_pct = result.completeness_pct,
        returned = result.items.len(),
        "served recommendations"
    );

    Ok(Json(RecommendationResponse::from_result(candidate_id, result)))
}

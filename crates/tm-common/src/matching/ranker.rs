use chrono::NaiveDate;

use super::eligibility::{filter_eligible, EligibilityConfig};
use super::scoring::{MatchScore, ScoringConfig, ScoringEngine};
use crate::profile::completeness_pct;
use crate::{CandidateProfile, InteractionRecord, JobPosting};

pub const DEFAULT_RESULT_LIMIT: usize = 20;

#[derive(Debug, Clone)]
pub struct MatchingEngineConfig {
    pub eligibility: EligibilityConfig,
    pub scoring: ScoringConfig,
    /// Upper bound on returned recommendations.
    pub limit: usize,
}

impl Default for MatchingEngineConfig {
    fn default() -> Self {
        Self {
            eligibility: EligibilityConfig::default(),
            scoring: ScoringConfig::default(),
            limit: DEFAULT_RESULT_LIMIT,
        }
    }
}

#[derive(Debug, Clone)]
pub struct RankedJob {
    pub job: JobPosting,
    pub score: MatchScore,
}

/// The full recommendation result: ordered postings plus the completeness
/// percentage so callers can explain weak results to the candidate.
#[derive(Debug, Clone)]
pub struct Recommendations {
    pub completeness_pct: f64,
    pub items: Vec<RankedJob>,
}

pub struct MatchingEngine {
    config: MatchingEngineConfig,
    scorer: ScoringEngine,
}

impl Default for MatchingEngine {
    fn default() -> Self {
        Self::new(MatchingEngineConfig::default())
    }
}

impl MatchingEngine {
    pub fn new(config: MatchingEngineConfig) -> Self {
        let scorer = ScoringEngine::new(config.scoring.clone());
        Self { config, scorer }
    }

    /// Filter, score and rank the catalog for one candidate. Order is total
    /// score descending, then newest posting first, then job id ascending,
    /// so identical snapshots always produce identical output.
    pub fn recommend(
        &self,
        profile: &CandidateProfile,
        jobs: &[JobPosting],
        interactions: &[InteractionRecord],
        today: NaiveDate,
        limit: Option<usize>,
    ) -> Recommendations {
        let eligible = filter_eligible(
            jobs,
            interactions,
            profile.id,
            today,
            &self.config.eligibility,
        );

        let mut ranked: Vec<RankedJob> = eligible
            .into_iter()
            .map(|job| RankedJob {
                score: self.scorer.score(profile, job, today),
                job: job.clone(),
            })
            .collect();

        ranked.sort_by(|a, b| {
            b.score
                .total
                .total_cmp(&a.score.total)
                .then_with(|| b.job.created_at.cmp(&a.job.created_at))
                .then_with(|| a.job.id.cmp(&b.job.id))
        });

        let limit = limit.unwrap_or(self.config.limit);
        ranked.truncate(limit);

        tracing::debug!(
            candidate_id = profile.id,
            returned = ranked.len(),
            "recommendation ranking complete"
        );

        Recommendations {
            completeness_pct: completeness_pct(profile),
            items: ranked,
        }
    }
}

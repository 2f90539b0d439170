use std::collections::HashSet;

use chrono::NaiveDate;

use crate::{InteractionKind, InteractionRecord, JobPosting, JobStatus};

#[derive(Debug, Clone)]
pub struct EligibilityConfig {
    /// Whether postings the candidate merely saved (not applied to) are
    /// also kept out of recommendations. Applied postings are always
    /// excluded.
    pub exclude_saved: bool,
}

impl Default for EligibilityConfig {
    fn default() -> Self {
        Self { exclude_saved: true }
    }
}

/// Narrow the job catalog down to postings this candidate can still act on:
/// active, not past deadline, not already interacted with. An empty result
/// is a normal outcome.
pub fn filter_eligible<'a>(
    jobs: &'a [JobPosting],
    interactions: &[InteractionRecord],
    candidate_id: i64,
    today: NaiveDate,
    config: &EligibilityConfig,
) -> Vec<&'a JobPosting> {
    let seen: HashSet<i64> = interactions
        .iter()
        .filter(|record| record.candidate_id == candidate_id)
        .filter(|record| match record.kind {
            InteractionKind::Applied => true,
            InteractionKind::Saved => config.exclude_saved,
        })
        .map(|record| record.job_id)
        .collect();

    jobs.iter()
        .filter(|job| job.status == JobStatus::Active)
        .filter(|job| job.deadline.map(|deadline| deadline >= today).unwrap_or(true))
        .filter(|job| !seen.contains(&job.id))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn active_job(id: i64) -> JobPosting {
        JobPosting {
            id,
            status: JobStatus::Active,
            ..JobPosting::default()
        }
    }

    fn applied(candidate_id: i64, job_id: i64) -> InteractionRecord {
        InteractionRecord {
            candidate_id,
            job_id,
            kind: InteractionKind::Applied,
        }
    }

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 8, 30).unwrap()
    }

    #[test]
    fn keeps_only_active_postings() {
        let mut draft = active_job(1);
        draft.status = JobStatus::Draft;
        let mut paused = active_job(2);
        paused.status = JobStatus::Paused;
        let jobs = [draft, paused, active_job(3)];

        let eligible = filter_eligible(&jobs, &[], 7, today(), &EligibilityConfig::default());
        assert_eq!(eligible.len(), 1);
        assert_eq!(eligible[0].id, 3);
    }

    #[test]
    fn excludes_postings_past_deadline() {
        let mut expired = active_job(1);
        expired.deadline = Some(today().pred_opt().unwrap());
        let mut closing_today = active_job(2);
        closing_today.deadline = Some(today());
        let open_ended = active_job(3);

        let jobs = [expired, closing_today, open_ended];
        let eligible = filter_eligible(
            &jobs,
            &[],
            7,
            today(),
            &EligibilityConfig::default(),
        );

        let ids: Vec<i64> = eligible.iter().map(|job| job.id).collect();
        assert_eq!(ids, vec![2, 3]);
    }

    #[test]
    fn excludes_applied_postings_for_this_candidate_only() {
        let jobs = [active_job(1), active_job(2)];
        let interactions = [applied(7, 1), applied(99, 2)];

        let eligible = filter_eligible(&jobs, &interactions, 7, today(), &EligibilityConfig::default());
        assert_eq!(eligible.len(), 1);
        assert_eq!(eligible[0].id, 2);
    }

    #[test]
    fn saved_exclusion_is_configurable() {
        let jobs = [active_job(1)];
        let saved = [InteractionRecord {
            candidate_id: 7,
            job_id: 1,
            kind: InteractionKind::Saved,
        }];

        let default = filter_eligible(&jobs, &saved, 7, today(), &EligibilityConfig::default());
        assert!(default.is_empty());

        let include_saved = EligibilityConfig { exclude_saved: false };
        let kept = filter_eligible(&jobs, &saved, 7, today(), &include_saved);
        assert_eq!(kept.len(), 1);
    }

    #[test]
    fn empty_catalog_is_a_normal_outcome() {
        let eligible = filter_eligible(&[], &[], 7, today(), &EligibilityConfig::default());
        assert!(eligible.is_empty());
    }
}

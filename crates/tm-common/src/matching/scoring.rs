use chrono::NaiveDate;

use super::weights::{Weights, DEFAULT_WEIGHTS};
use crate::skills::normalize_skill_set;
use crate::{CandidateProfile, ExperienceLevel, JobPosting, LocationType};

#[derive(Debug, Clone)]
pub struct ScoringConfig {
    pub weights: Weights,
    /// Postings created within this many days of "today" earn the
    /// freshness bonus even without the urgent flag.
    pub recency_window_days: i64,
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self {
            weights: DEFAULT_WEIGHTS,
            recency_window_days: env_recency_window_days(),
        }
    }
}

fn env_recency_window_days() -> i64 {
    std::env::var("TM_RECENCY_WINDOW_DAYS")
        .ok()
        .and_then(|s| s.parse().ok())
        .unwrap_or(7)
}

/// One factor of the compatibility score, with a human-readable explanation
/// so a caller can show why a posting ranked where it did.
#[derive(Debug, Clone)]
pub struct FactorScore {
    pub score: f64,
    pub max_score: f64,
    pub status: &'static str,
    pub details: String,
}

impl FactorScore {
    fn new(score: f64, status: &'static str, details: String) -> Self {
        Self {
            score,
            max_score: 1.0,
            status,
            details,
        }
    }

    fn unknown(details: impl Into<String>) -> Self {
        Self::new(0.5, "UNKNOWN", details.into())
    }

    fn unconstrained(details: impl Into<String>) -> Self {
        Self::new(1.0, "PERFECT_MATCH", details.into())
    }
}

#[derive(Debug, Clone)]
pub struct MatchScore {
    pub total: f64,
    pub skills: FactorScore,
    pub location: FactorScore,
    pub salary: FactorScore,
    pub experience: FactorScore,
    pub education: FactorScore,
    pub urgency: FactorScore,
}

/// Score one candidate against one posting with the default configuration.
pub fn calculate_match_score(
    profile: &CandidateProfile,
    job: &JobPosting,
    today: NaiveDate,
) -> MatchScore {
    ScoringEngine::new(ScoringConfig::default()).score(profile, job, today)
}

pub struct ScoringEngine {
    config: ScoringConfig,
}

impl ScoringEngine {
    pub fn new(config: ScoringConfig) -> Self {
        Self { config }
    }

    /// Weighted total over the six factors. Individual factors degrade to a
    /// neutral score on unknown or malformed input; this function never
    /// fails for a single dirty field.
    pub fn score(&self, profile: &CandidateProfile, job: &JobPosting, today: NaiveDate) -> MatchScore {
        let skills = self.score_skills(profile, job);
        let location = self.score_location(profile, job);
        let salary = self.score_salary(profile, job);
        let experience = self.score_experience(profile, job);
        let education = self.score_education(profile, job);
        let urgency = self.score_urgency(job, today);

        let weights = self.config.weights;
        let total = skills.score * weights.skills
            + location.score * weights.location
            + salary.score * weights.salary
            + experience.score * weights.experience
            + education.score * weights.education
            + urgency.score * weights.urgency;

        MatchScore {
            total,
            skills,
            location,
            salary,
            experience,
            education,
            urgency,
        }
    }

    fn score_skills(&self, profile: &CandidateProfile, job: &JobPosting) -> FactorScore {
        let required = normalize_skill_set(&job.required_skills);
        if required.is_empty() {
            return FactorScore::unconstrained("posting lists no required skills");
        }

        let possessed = normalize_skill_set(&profile.skills);
        if possessed.is_empty() {
            return FactorScore::new(
                0.0,
                "MISS",
                "candidate lists no skills to match against".into(),
            );
        }

        let mut matched: Vec<&String> = required.intersection(&possessed).collect();
        matched.sort();
        let mut missing: Vec<&String> = required.difference(&possessed).collect();
        missing.sort();

        let ratio = matched.len() as f64 / required.len() as f64;
        let details = format!(
            "matched {} of {} required skills (matched: {}; missing: {})",
            matched.len(),
            required.len(),
            join_or_none(&matched),
            join_or_none(&missing),
        );

        FactorScore::new(ratio, status_from_score(ratio), details)
    }

    fn score_location(&self, profile: &CandidateProfile, job: &JobPosting) -> FactorScore {
        if job.location_type == Some(LocationType::Remote) || job.remote_friendly {
            return FactorScore::unconstrained("posting is remote or remote-friendly");
        }

        let job_region = match job.region.as_deref() {
            Some(region) => region.to_lowercase(),
            None => return FactorScore::unconstrained("posting has no location requirement"),
        };

        // Regions and localities are compared case-insensitively; the
        // normalizer lowercases them but profiles can also be built directly.
        let candidate_region = match profile.region.as_deref() {
            Some(region) => region.to_lowercase(),
            None => return FactorScore::unknown("candidate location unknown, scored neutrally"),
        };

        if candidate_region != job_region {
            return FactorScore::new(
                0.0,
                "MISS",
                format!("different regions: {candidate_region} vs {job_region}"),
            );
        }

        let locality_match = match (profile.locality.as_deref(), job.locality.as_deref()) {
            (Some(cand), Some(job_loc)) => cand.to_lowercase() == job_loc.to_lowercase(),
            _ => false,
        };

        if locality_match {
            FactorScore::new(1.0, "PERFECT_MATCH", format!("same locality in {job_region}"))
        } else {
            FactorScore::new(
                0.6,
                "PARTIAL_MATCH",
                format!("same region ({job_region}) but different locality"),
            )
        }
    }

    fn score_salary(&self, profile: &CandidateProfile, job: &JobPosting) -> FactorScore {
        let malformed: Vec<&str> = ["salary_min", "salary_max"]
            .into_iter()
            .filter(|field| profile.is_field_malformed(field))
            .collect();
        if !malformed.is_empty() {
            return FactorScore::unknown(format!(
                "candidate {} malformed, scored neutrally",
                malformed.join(", ")
            ));
        }

        // A single stated bound is treated as a point expectation.
        let (cand_min, cand_max) = match (profile.salary_min, profile.salary_max) {
            (None, None) => {
                return FactorScore::unconstrained("candidate states no salary expectation")
            }
            (Some(min), None) => (f64::from(min), f64::from(min)),
            (None, Some(max)) => (f64::from(max), f64::from(max)),
            (Some(min), Some(max)) => (f64::from(min), f64::from(max)),
        };

        if cand_min > cand_max {
            return FactorScore::unknown("candidate salary range inverted, scored neutrally");
        }

        if job.salary_min.is_none() && job.salary_max.is_none() {
            return FactorScore::unconstrained("posting states no salary range");
        }

        if let (Some(cand_cur), Some(job_cur)) =
            (profile.salary_currency.as_deref(), job.salary_currency.as_deref())
        {
            if !cand_cur.eq_ignore_ascii_case(job_cur) {
                return FactorScore::unknown(format!(
                    "currencies not comparable: {cand_cur} vs {job_cur}"
                ));
            }
        }

        let job_min = job.salary_min.map(f64::from).unwrap_or(0.0);
        let job_max = job.salary_max.map(f64::from).unwrap_or(f64::MAX);

        let overlap = (cand_max.min(job_max) - cand_min.max(job_min)).max(0.0);
        let width = cand_max - cand_min;

        // Point expectation (min == max): in or out of the offered range.
        let ratio = if width == 0.0 {
            if cand_min >= job_min && cand_min <= job_max {
                1.0
            } else {
                0.0
            }
        } else {
            (overlap / width).clamp(0.0, 1.0)
        };

        let details = if ratio == 0.0 {
            "salary ranges do not overlap".to_string()
        } else {
            format!("{:.0}% of expected range covered by the offer", ratio * 100.0)
        };

        FactorScore::new(ratio, status_from_score(ratio), details)
    }

    fn score_experience(&self, profile: &CandidateProfile, job: &JobPosting) -> FactorScore {
        let required = match job.required_experience {
            Some(level) => level,
            None => return FactorScore::unconstrained("posting has no experience requirement"),
        };

        let years = match profile.years_experience {
            Some(years) => years,
            None => return FactorScore::unknown("candidate experience unknown, scored neutrally"),
        };

        let actual = ExperienceLevel::from_years(years);
        let diff = actual.rank() as i32 - required.rank() as i32;

        let (score, status, details) = match diff {
            0 => (
                1.0,
                "PERFECT_MATCH",
                format!("{actual} matches required {required}"),
            ),
            -1 => (
                0.6,
                "PARTIAL_MATCH",
                format!("{actual} is one level below required {required}"),
            ),
            d if d <= -2 => (
                0.0,
                "MISS",
                format!("{actual} is well below required {required}"),
            ),
            // Over-qualified candidates keep most of the credit.
            _ => (
                0.8,
                "MATCH",
                format!("{actual} exceeds required {required}"),
            ),
        };

        FactorScore::new(score, status, details)
    }

    fn score_education(&self, profile: &CandidateProfile, job: &JobPosting) -> FactorScore {
        let required = match job.required_education {
            Some(level) => level,
            None => return FactorScore::unconstrained("posting has no education requirement"),
        };

        let actual = match profile.education {
            Some(level) => level,
            None => return FactorScore::unknown("candidate education unknown, scored neutrally"),
        };

        if actual >= required {
            return FactorScore::new(
                1.0,
                "PERFECT_MATCH",
                format!("{actual} meets required {required}"),
            );
        }

        let gap = (required.rank() - actual.rank()) as f64;
        let score = (1.0 - 0.25 * gap).max(0.0);

        FactorScore::new(
            score,
            status_from_score(score),
            format!("{actual} is {gap:.0} level(s) below required {required}"),
        )
    }

    fn score_urgency(&self, job: &JobPosting, today: NaiveDate) -> FactorScore {
        if job.urgent {
            return FactorScore::new(1.0, "PERFECT_MATCH", "posting flagged urgent".into());
        }

        if let Some(created_at) = job.created_at {
            let age_days = (today - created_at.date_naive()).num_days();
            if age_days <= self.config.recency_window_days {
                return FactorScore::new(
                    1.0,
                    "PERFECT_MATCH",
                    format!("posted {age_days} day(s) ago"),
                );
            }
        }

        FactorScore::new(0.0, "MISS", "not urgent and outside recency window".into())
    }
}

fn join_or_none(skills: &[&String]) -> String {
    if skills.is_empty() {
        "none".to_string()
    } else {
        skills
            .iter()
            .map(|s| s.as_str())
            .collect::<Vec<_>>()
            .join(", ")
    }
}

fn status_from_score(score: f64) -> &'static str {
    if score >= 0.9 {
        "PERFECT_MATCH"
    } else if score >= 0.7 {
        "MATCH"
    } else if score >= 0.4 {
        "PARTIAL_MATCH"
    } else {
        "MISS"
    }
}

pub mod matching;
pub mod profile;
pub mod skills;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

/// Ordinal education levels. Ordering is the comparison used by the
/// education factor, so the variant order is load-bearing.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize, Display, EnumString,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum EducationLevel {
    None,
    Secondary,
    Diploma,
    Bachelor,
    Master,
    Doctorate,
}

impl EducationLevel {
    pub fn rank(self) -> u8 {
        self as u8
    }
}

/// Ordinal seniority bands, shared between a job's requirement and the
/// level derived from a candidate's years of experience.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize, Display, EnumString,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum ExperienceLevel {
    Entry,
    Junior,
    Mid,
    Senior,
    Lead,
}

impl ExperienceLevel {
    pub fn from_years(years: u32) -> Self {
        match years {
            0..=1 => ExperienceLevel::Entry,
            2..=3 => ExperienceLevel::Junior,
            4..=6 => ExperienceLevel::Mid,
            7..=9 => ExperienceLevel::Senior,
            _ => ExperienceLevel::Lead,
        }
    }

    pub fn rank(self) -> u8 {
        self as u8
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display, EnumString)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum EmploymentStatus {
    Open,
    Passive,
    NotLooking,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display, EnumString)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum LocationType {
    Onsite,
    Hybrid,
    Remote,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, Display, EnumString)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum JobStatus {
    #[default]
    Draft,
    Active,
    Paused,
    Deleted,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display, EnumString)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum SalaryPeriod {
    Hourly,
    Monthly,
    Annual,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display, EnumString)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum InteractionKind {
    Applied,
    Saved,
}

/// A normalized job-seeker profile. Fields the data layer could not supply
/// stay `None`; the scorer treats them as unknown, not as zero.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CandidateProfile {
    pub id: i64,
    /// Canonical lowercase skill tokens, sorted and deduplicated.
    #[serde(default)]
    pub skills: Vec<String>,
    pub years_experience: Option<u32>,
    pub education: Option<EducationLevel>,
    pub region: Option<String>,
    pub locality: Option<String>,
    pub employment_status: Option<EmploymentStatus>,
    pub salary_min: Option<u32>,
    pub salary_max: Option<u32>,
    pub salary_currency: Option<String>,
    pub summary: Option<String>,
    pub created_at: Option<DateTime<Utc>>,
    /// Attribute names that failed normalization; the matching factors fall
    /// back to a neutral score for these instead of erroring.
    #[serde(default)]
    pub malformed_fields: Vec<String>,
}

impl CandidateProfile {
    pub fn is_field_malformed(&self, field: &str) -> bool {
        self.malformed_fields.iter().any(|f| f == field)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct JobPosting {
    pub id: i64,
    pub title: Option<String>,
    pub category: Option<String>,
    pub employment_type: Option<String>,
    /// Canonical lowercase skill tokens required by the posting.
    #[serde(default)]
    pub required_skills: Vec<String>,
    pub location_type: Option<LocationType>,
    pub region: Option<String>,
    pub locality: Option<String>,
    pub required_experience: Option<ExperienceLevel>,
    pub required_education: Option<EducationLevel>,
    pub salary_min: Option<u32>,
    pub salary_max: Option<u32>,
    pub salary_currency: Option<String>,
    pub salary_period: Option<SalaryPeriod>,
    #[serde(default)]
    pub urgent: bool,
    #[serde(default)]
    pub remote_friendly: bool,
    pub deadline: Option<NaiveDate>,
    #[serde(default)]
    pub status: JobStatus,
    pub created_at: Option<DateTime<Utc>>,
}

/// Append-only record of a candidate touching a posting. Used only to keep
/// already-seen postings out of the recommendation output.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InteractionRecord {
    pub candidate_id: i64,
    pub job_id: i64,
    pub kind: InteractionKind,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display, EnumString)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum SubscriptionStatus {
    Active,
    PastDue,
    Canceled,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display, EnumString)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum SubscriptionPlan {
    Basic,
    Pro,
}

/// Billing state owned by the out-of-scope subscription subsystem; read
/// here only to derive the premium tier.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SubscriptionState {
    pub status: SubscriptionStatus,
    pub plan: SubscriptionPlan,
    pub end_date: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BoostState {
    pub boosted: bool,
    pub boost_until: Option<DateTime<Utc>>,
}

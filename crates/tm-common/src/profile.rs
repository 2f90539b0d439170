use std::collections::HashMap;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::skills::tokenize_skill_field;
use crate::{CandidateProfile, EducationLevel, EmploymentStatus};

/// Number of tracked fields in the completeness percentage.
pub const COMPLETENESS_FIELD_COUNT: u32 = 9;

/// A candidate record exactly as the data layer hands it over: a loose
/// attribute map whose keys drifted across schema generations. Anything can
/// be absent, blank, or unparsable.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawProfile {
    pub id: i64,
    #[serde(default)]
    pub attributes: HashMap<String, String>,
    pub created_at: Option<DateTime<Utc>>,
}

/// First non-blank value among a priority-ordered list of historical field
/// names. One helper for every multi-aliased attribute instead of per-field
/// fallback chains.
pub fn resolve_alias<'a>(attributes: &'a HashMap<String, String>, keys: &[&str]) -> Option<&'a str> {
    keys.iter()
        .find_map(|key| attributes.get(*key))
        .map(|value| value.trim())
        .filter(|value| !value.is_empty())
}

fn parse_field<T: FromStr>(
    attributes: &HashMap<String, String>,
    keys: &[&str],
    field: &str,
    malformed: &mut Vec<String>,
) -> Option<T> {
    let raw = resolve_alias(attributes, keys)?;
    match raw.parse::<T>() {
        Ok(value) => Some(value),
        Err(_) => {
            tracing::debug!(field, raw, "profile attribute failed to parse");
            malformed.push(field.to_string());
            None
        }
    }
}

/// Build a [`CandidateProfile`] from raw attributes. Missing data never
/// errors; unparsable data is recorded in `malformed_fields` and left
/// unset so the scorer can substitute a neutral factor.
pub fn normalize_profile(raw: &RawProfile) -> CandidateProfile {
    let attrs = &raw.attributes;
    let mut malformed = Vec::new();

    let skills = resolve_alias(attrs, &["skills", "skill_set", "skills_csv"])
        .map(tokenize_skill_field)
        .unwrap_or_default();

    let years_experience: Option<u32> = parse_field(
        attrs,
        &["years_experience", "experience_years", "yoe"],
        "years_experience",
        &mut malformed,
    );

    let education: Option<EducationLevel> = resolve_alias(
        attrs,
        &["education_level", "education", "highest_qualification"],
    )
    .and_then(|raw| match raw.to_lowercase().parse() {
        Ok(level) => Some(level),
        Err(_) => {
            malformed.push("education".to_string());
            None
        }
    });

    let employment_status: Option<EmploymentStatus> =
        resolve_alias(attrs, &["employment_status", "availability"])
            .and_then(|raw| raw.to_lowercase().parse().ok());

    let salary_min: Option<u32> = parse_field(
        attrs,
        &["salary_min", "expected_salary_min", "desired_salary_min"],
        "salary_min",
        &mut malformed,
    );
    let salary_max: Option<u32> = parse_field(
        attrs,
        &["salary_max", "expected_salary_max", "desired_salary_max"],
        "salary_max",
        &mut malformed,
    );

    CandidateProfile {
        id: raw.id,
        skills,
        years_experience,
        education,
        region: resolve_alias(attrs, &["region", "current_region", "province"])
            .map(str::to_lowercase),
        locality: resolve_alias(attrs, &["locality", "city", "town"]).map(str::to_lowercase),
        employment_status,
        salary_min,
        salary_max,
        salary_currency: resolve_alias(attrs, &["salary_currency", "currency"])
            .map(str::to_uppercase),
        summary: resolve_alias(attrs, &["summary", "about_me", "bio"]).map(str::to_string),
        created_at: raw.created_at,
        malformed_fields: malformed,
    }
}

/// Profile completeness as a percentage in [0, 100], one decimal place.
/// Recomputed from the current field values on every call so it can never
/// go stale.
pub fn completeness_pct(profile: &CandidateProfile) -> f64 {
    let filled = [
        !profile.skills.is_empty(),
        profile.years_experience.map(|y| y > 0).unwrap_or(false),
        profile.education.is_some(),
        profile.region.is_some(),
        profile.locality.is_some(),
        profile.employment_status.is_some(),
        profile.salary_min.is_some(),
        profile.salary_max.is_some(),
        profile
            .summary
            .as_deref()
            .map(|s| !s.trim().is_empty())
            .unwrap_or(false),
    ]
    .iter()
    .filter(|&&present| present)
    .count();

    let pct = filled as f64 * 100.0 / COMPLETENESS_FIELD_COUNT as f64;
    (pct * 10.0).round() / 10.0
}

#[cfg(test)]
mod tests {
    use super::*;

    fn raw_with(attrs: &[(&str, &str)]) -> RawProfile {
        RawProfile {
            id: 1,
            attributes: attrs
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
            created_at: None,
        }
    }

    fn full_raw() -> RawProfile {
        raw_with(&[
            ("skills", "PHP, MySQL"),
            ("years_experience", "6"),
            ("education_level", "bachelor"),
            ("region", "Western"),
            ("locality", "Colombo"),
            ("employment_status", "open"),
            ("salary_min", "80000"),
            ("salary_max", "120000"),
            ("salary_currency", "lkr"),
            ("summary", "Backend developer."),
        ])
    }

    #[test]
    fn normalizes_full_profile() {
        let profile = normalize_profile(&full_raw());

        assert_eq!(profile.skills, vec!["mysql".to_string(), "php".to_string()]);
        assert_eq!(profile.years_experience, Some(6));
        assert_eq!(profile.education, Some(EducationLevel::Bachelor));
        assert_eq!(profile.region.as_deref(), Some("western"));
        assert_eq!(profile.salary_currency.as_deref(), Some("LKR"));
        assert!(profile.malformed_fields.is_empty());
        assert_eq!(completeness_pct(&profile), 100.0);
    }

    #[test]
    fn alias_resolution_prefers_earlier_keys() {
        let raw = raw_with(&[("skills", "rust"), ("skill_set", "cobol")]);
        let profile = normalize_profile(&raw);
        assert_eq!(profile.skills, vec!["rust".to_string()]);

        let raw = raw_with(&[("skills", "   "), ("skill_set", "cobol")]);
        let profile = normalize_profile(&raw);
        assert_eq!(profile.skills, vec!["cobol".to_string()]);
    }

    #[test]
    fn legacy_field_names_still_resolve() {
        let raw = raw_with(&[("yoe", "3"), ("city", "Kandy"), ("about_me", "hi")]);
        let profile = normalize_profile(&raw);

        assert_eq!(profile.years_experience, Some(3));
        assert_eq!(profile.locality.as_deref(), Some("kandy"));
        assert_eq!(profile.summary.as_deref(), Some("hi"));
    }

    #[test]
    fn malformed_salary_is_recorded_not_fatal() {
        let raw = raw_with(&[("salary_min", "eighty thousand"), ("salary_max", "120000")]);
        let profile = normalize_profile(&raw);

        assert_eq!(profile.salary_min, None);
        assert_eq!(profile.salary_max, Some(120_000));
        assert!(profile.is_field_malformed("salary_min"));
        assert!(!profile.is_field_malformed("salary_max"));
    }

    #[test]
    fn empty_profile_is_zero_percent_complete() {
        let profile = normalize_profile(&raw_with(&[]));
        assert_eq!(completeness_pct(&profile), 0.0);
    }

    #[test]
    fn zero_years_do_not_count_toward_completeness() {
        let profile = normalize_profile(&raw_with(&[("years_experience", "0")]));
        assert_eq!(profile.years_experience, Some(0));
        assert_eq!(completeness_pct(&profile), 0.0);
    }

    #[test]
    fn completeness_steps_are_ninths() {
        let profile = normalize_profile(&raw_with(&[("skills", "php")]));
        assert_eq!(completeness_pct(&profile), 11.1);

        let profile = normalize_profile(&raw_with(&[("skills", "php"), ("region", "Western")]));
        assert_eq!(completeness_pct(&profile), 22.2);

        let five = normalize_profile(&raw_with(&[
            ("skills", "php"),
            ("region", "Western"),
            ("locality", "Colombo"),
            ("education", "diploma"),
            ("employment_status", "open"),
        ]));
        assert_eq!(completeness_pct(&five), 55.6);
    }

    #[test]
    fn completeness_always_in_bounds() {
        for raw in [full_raw(), raw_with(&[]), raw_with(&[("summary", " ")])] {
            let pct = completeness_pct(&normalize_profile(&raw));
            assert!((0.0..=100.0).contains(&pct));
        }
    }
}

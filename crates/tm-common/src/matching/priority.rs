use std::cmp::Ordering;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

use crate::profile::completeness_pct;
use crate::{BoostState, CandidateProfile, SubscriptionPlan, SubscriptionState, SubscriptionStatus};

/// Caller-selected ordering applied inside each premium tier.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, Display, EnumString,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum SecondarySortKey {
    #[default]
    NewestFirst,
    MostExperienced,
    HighestCompleteness,
}

/// A candidate as seen by employer search: the profile plus the billing
/// state the tier is derived from.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SearchCandidate {
    pub profile: CandidateProfile,
    pub subscription: Option<SubscriptionState>,
    pub boost: Option<BoostState>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RankedCandidate {
    pub profile: CandidateProfile,
    pub is_premium: bool,
}

/// Premium tier: an active pro subscription that has not ended, or a live
/// boost. Derived at read time; never stored.
pub fn is_premium(
    subscription: Option<&SubscriptionState>,
    boost: Option<&BoostState>,
    now: DateTime<Utc>,
) -> bool {
    let active_subscription = subscription.is_some_and(|sub| {
        sub.status == SubscriptionStatus::Active
            && sub.plan == SubscriptionPlan::Pro
            && sub.end_date.map(|end| end > now).unwrap_or(true)
    });

    let active_boost = boost.is_some_and(|boost| {
        boost.boosted && boost.boost_until.map(|until| until > now).unwrap_or(true)
    });

    active_subscription || active_boost
}

/// Order employer search results premium-tier-first, then by the selected
/// secondary key within each tier, then by candidate id for determinism.
/// A premium candidate never trails a non-premium one, whatever the key.
pub fn rank_candidates(
    candidates: Vec<SearchCandidate>,
    key: SecondarySortKey,
    now: DateTime<Utc>,
) -> Vec<RankedCandidate> {
    let mut ranked: Vec<RankedCandidate> = candidates
        .into_iter()
        .map(|candidate| RankedCandidate {
            is_premium: is_premium(
                candidate.subscription.as_ref(),
                candidate.boost.as_ref(),
                now,
            ),
            profile: candidate.profile,
        })
        .collect();

    ranked.sort_by(|a, b| {
        b.is_premium
            .cmp(&a.is_premium)
            .then_with(|| secondary_order(&a.profile, &b.profile, key))
            .then_with(|| a.profile.id.cmp(&b.profile.id))
    });

    ranked
}

fn secondary_order(a: &CandidateProfile, b: &CandidateProfile, key: SecondarySortKey) -> Ordering {
    match key {
        SecondarySortKey::NewestFirst => b.created_at.cmp(&a.created_at),
        SecondarySortKey::MostExperienced => b.years_experience.cmp(&a.years_experience),
        SecondarySortKey::HighestCompleteness => {
            completeness_pct(b).total_cmp(&completeness_pct(a))
        }
    }
}

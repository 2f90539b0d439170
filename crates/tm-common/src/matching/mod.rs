pub mod eligibility;
pub mod priority;
pub mod ranker;
pub mod scoring;
pub mod weights;

/// Default factor weights for the recommendation scorer. These are product
/// defaults, not invariants; callers may supply their own set as long as it
/// sums to 1.0.
pub const DEFAULT_WEIGHTS: Weights = Weights {
    skills: 0.35,
    location: 0.20,
    salary: 0.15,
    experience: 0.15,
    education: 0.10,
    urgency: 0.05,
};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Weights {
    pub skills: f64,
    pub location: f64,
    pub salary: f64,
    pub experience: f64,
    pub education: f64,
    pub urgency: f64,
}

impl Weights {
    pub fn sum(&self) -> f64 {
        self.skills + self.location + self.salary + self.experience + self.education + self.urgency
    }
}

impl Default for Weights {
    fn default() -> Self {
        DEFAULT_WEIGHTS
    }
}

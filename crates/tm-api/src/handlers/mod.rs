pub mod candidates;
pub mod health;
pub mod recommendations;

pub mod candidates;
pub mod decisions;
pub mod health;
pub mod matches;
pub mod profile;

pub mod analysis;
pub mod classify;
pub mod health;
pub mod health_plan;
pub mod recommendations;
pub mod reports;
pub mod standardize;
pub mod trends;

pub mod diagnose;
pub mod rules;

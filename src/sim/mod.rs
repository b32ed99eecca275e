/// Battery state and the per-interval dispatch rule.
pub mod battery;
/// Synthetic consumption models.
pub mod consumption;
pub mod engine;
pub mod kpi;
pub mod types;

pub mod plan;
pub mod show;

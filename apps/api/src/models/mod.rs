pub mod interview;
pub mod study_plan;

pub mod course;
pub mod orphan;

pub mod courses;
pub mod lectures;
pub mod media;

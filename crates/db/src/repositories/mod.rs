mod memory_course_store;
mod pg_course_store;

pub use memory_course_store::MemoryCourseStore;
pub use pg_course_store::PgCourseStore;

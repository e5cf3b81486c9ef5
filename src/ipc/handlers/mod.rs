pub mod core;
pub mod semesters;
pub mod student;

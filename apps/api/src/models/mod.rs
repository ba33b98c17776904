pub mod category;
pub mod scholarship;
pub mod student;

pub mod course;
pub mod instructor;
pub mod trace;
pub mod user;

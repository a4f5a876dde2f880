pub mod course;
pub mod instructor;
pub mod shared;
pub mod trace;
pub mod user;

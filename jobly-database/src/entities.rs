pub mod applications;
pub mod companies;
pub mod jobs;
pub mod users;

pub mod auth;
pub mod certificates;
pub mod enrollments;
pub mod health;
pub mod meetings;
pub mod submissions;
pub mod trainings;

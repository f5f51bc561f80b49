pub mod certificate_repository;
pub mod content_repository;
pub mod enrollment_repository;
pub mod meeting_repository;
pub mod score_repository;
pub mod submission_repository;
pub mod training_repository;
pub mod user_repository;

pub use certificate_repository::CertificateRepository;
pub use content_repository::ContentRepository;
pub use enrollment_repository::EnrollmentRepository;
pub use meeting_repository::MeetingRepository;
pub use score_repository::ScoreRepository;
pub use submission_repository::SubmissionRepository;
pub use training_repository::{TrainingRepository, TrainingUpdate};
pub use user_repository::UserRepository;

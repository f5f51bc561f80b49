pub mod certificate;
pub mod certificate_renderer;
pub mod completion;
pub mod grading;
pub mod progress;
pub mod score_aggregation;

//! Analysis engine
//!
//! Composes the scorers into full analyses: [`ScoringPipeline`] is the pure,
//! request-scoped part and [`AnalysisOrchestrator`] adds the concurrent
//! collaborator fetches around it.

pub mod orchestrator;
pub mod pipeline;
pub mod request;
pub mod result;

pub use orchestrator::AnalysisOrchestrator;
pub use pipeline::ScoringPipeline;
pub use request::AnalysisRequest;
pub use result::{AnalysisReport, AnalysisResult, SourceReport, SourceStatus};

//! Request processing pipeline.
//!
//! # Data Flow
//! ```text
//! Request (from the selected backend)
//!     → stage[0].process
//!     → stage[1].process
//!     → ...
//!     → annotated Request (stored in the backend log)
//! ```
//!
//! # Design Decisions
//! - Stage order is data (a `Vec`), fixed at construction
//! - One pipeline is shared read-only by every backend (`Arc<Pipeline>`)
//! - No locks: stages are stateless, so pipelines run concurrently

pub mod stages;

use std::fmt;

pub use stages::{AuthenticationStage, LoggingStage, Stage, StageKind, ValidationStage};

use crate::request::Request;

/// An ordered, immutable chain of stages.
pub struct Pipeline {
    stages: Vec<Box<dyn Stage>>,
}

impl Pipeline {
    /// Create a pipeline running `stages` left to right.
    pub fn new(stages: Vec<Box<dyn Stage>>) -> Self {
        Self { stages }
    }

    /// Authentication, then logging, then validation.
    pub fn standard() -> Self {
        Self::from_kinds(&StageKind::STANDARD)
    }

    /// Build a pipeline from configured stage kinds.
    pub fn from_kinds(kinds: &[StageKind]) -> Self {
        Self::new(kinds.iter().map(|kind| kind.build()).collect())
    }

    /// Thread the request through every stage in order.
    pub fn run(&self, request: Request) -> Request {
        self.stages
            .iter()
            .fold(request, |request, stage| stage.process(request))
    }

    /// Stage names in execution order.
    pub fn stage_names(&self) -> Vec<&'static str> {
        self.stages.iter().map(|s| s.name()).collect()
    }

    pub fn len(&self) -> usize {
        self.stages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stages.is_empty()
    }
}

impl Default for Pipeline {
    fn default() -> Self {
        Self::standard()
    }
}

impl fmt::Debug for Pipeline {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Pipeline")
            .field("stages", &self.stage_names())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::request::{Marker, Method, RequestDraft};

    fn request() -> Request {
        Request::from_draft(RequestDraft::new(Method::Get, "/orders"))
    }

    #[test]
    fn test_standard_pipeline_marks_in_order() {
        let out = Pipeline::standard().run(request());
        let markers: Vec<_> = out.markers().collect();
        assert_eq!(
            markers,
            vec![Marker::Authenticated, Marker::Logged, Marker::Validated]
        );
        assert!(out.annotations().iter().all(|a| a.value));
    }

    #[test]
    fn test_configured_order_is_respected() {
        let pipeline = Pipeline::from_kinds(&[StageKind::Validation, StageKind::Authentication]);
        assert_eq!(pipeline.stage_names(), vec!["validation", "authentication"]);

        let markers: Vec<_> = pipeline.run(request()).markers().collect();
        assert_eq!(markers, vec![Marker::Validated, Marker::Authenticated]);
    }

    #[test]
    fn test_later_stage_keeps_earlier_annotations() {
        let pipeline = Pipeline::standard();
        let input = request().annotate(Marker::Logged, false);
        let out = pipeline.run(input);

        // the pre-existing marker keeps its position and is overwritten by its own stage
        let markers: Vec<_> = out.markers().collect();
        assert_eq!(
            markers,
            vec![Marker::Logged, Marker::Authenticated, Marker::Validated]
        );
        assert!(out.is_marked(Marker::Logged));
    }

    #[test]
    fn test_empty_pipeline_is_identity() {
        let pipeline = Pipeline::new(Vec::new());
        assert!(pipeline.is_empty());
        let input = request();
        assert_eq!(pipeline.run(input.clone()), input);
    }
}

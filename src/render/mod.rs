//! Frame delivery: the render worker and the presenter that draws its output.

pub mod presenter;
pub mod worker;

pub use presenter::{Presenter, Surface, SurfaceTransform, TextSurface};
pub use worker::{FrameRequest, FrameResponse, RenderBackend, RenderWorker};

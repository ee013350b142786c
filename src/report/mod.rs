//! Report selection, dispatch and rendering.

pub mod dispatcher;
pub mod generator;
pub mod registry;

pub use dispatcher::{Dispatched, Dispatcher, RenderTarget};
pub use generator::ReportRenderer;
pub use registry::ReportRegistry;

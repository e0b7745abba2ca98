//! Evaluation Report: flat view of a record, fixed-width layout, and pluggable renderers.
//!
//! `AppState` holds an `Arc<dyn ReportRenderer>`. The shipped backend is `TextReportRenderer`;
//! a PDF backend implements the same trait. Rendering is CPU-bound and runs inside
//! `tokio::task::spawn_blocking`.

pub mod handlers;
pub mod layout;
pub mod renderer;
pub mod view;

pub use layout::PageConfig;
pub use renderer::{RenderError, ReportRenderer, TextReportRenderer};
pub use view::EvaluationView;

//! View state owned by the freshness controller and the projector renderers
//! read it through.

pub mod projector;
pub mod types;

pub use projector::{PanelMessage, ProjectedView, project};
pub use types::{ViewState, ViewStatus};

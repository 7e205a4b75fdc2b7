pub mod error;
pub mod graph;
pub mod id;
pub mod layout;
pub mod model;
pub mod vector;

pub use error::{DesignerError, ErrorKind, Invariant, Result};
pub use graph::WorkflowGraph;
pub use id::{ActivityId, ConnectionId};
pub use layout::{
    ActivityLayout, Bounds, ConnectionGeometry, MonospaceMeasure, TextMeasure, ViewTransform,
    Viewport,
};
pub use model::*;
pub use vector::Vector;

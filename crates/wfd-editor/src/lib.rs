//! Interactive editing for the workflow designer.
//!
//! Raw host events are normalized by [`input`], classified by
//! [`interaction`], and routed by the [`Designer`] to at most one active
//! drag from [`actions`]. [`DesignerHost`] wraps all of it behind the
//! operations and notifications an embedding application uses.

pub mod actions;
pub mod animation;
pub mod config;
pub mod designer;
pub mod emitter;
pub mod host;
pub mod input;
pub mod interaction;
pub mod state;
pub mod toolbar;

pub use actions::{Action, ActionKind, HostRequest};
pub use animation::{Animation, Animator, ScrollAnimation};
pub use config::{DesignerConfig, ZoomLimits};
pub use designer::Designer;
pub use emitter::{EventEmitter, ListenerId};
pub use host::DesignerHost;
pub use input::{HitResolver, InputEvent, Interaction};
pub use interaction::{InteractionInfo, InteractionKind, check_click};
pub use state::DesignerState;
pub use toolbar::{ToolbarCommand, ToolbarState};

pub mod color;
pub mod hit;
pub mod paint;
pub mod surface;
pub mod theme;

pub use hit::{HitTarget, hit_test, hit_test_page};
pub use paint::{PaintContext, paint_designer};
pub use surface::{DrawOp, Primitive, Recorder, Surface};
pub use theme::Theme;

// Re-export drawing types so downstream crates don't need a direct dependency
pub use kurbo;
pub use peniko;

//! Input abstraction layer.
//!
//! Normalizes mouse and touch events into an [`Interaction`]: a page-space
//! position plus the element under it. Touch events only ever look at the
//! first touch point; a touch event with no touch points (the usual shape of
//! `touchend`) yields an interaction with neither field set.

use wfd_core::Vector;
use wfd_render::HitTarget;

/// A raw input event from the host, positions in page coordinates.
#[derive(Debug, Clone, PartialEq)]
pub enum InputEvent {
    MouseDown(Vector),
    MouseMove(Vector),
    MouseUp(Vector),
    /// Current touch points, first one wins.
    TouchStart(Vec<Vector>),
    TouchMove(Vec<Vector>),
    TouchEnd(Vec<Vector>),
    /// Wheel scroll; only the sign of `delta_y` matters.
    Wheel { delta_y: f64 },
    DoubleClick(Vector),
}

impl InputEvent {
    /// Page position of the pointer, if the event carries one.
    pub fn position(&self) -> Option<Vector> {
        match self {
            Self::MouseDown(p) | Self::MouseMove(p) | Self::MouseUp(p) | Self::DoubleClick(p) => {
                Some(*p)
            }
            Self::TouchStart(t) | Self::TouchMove(t) | Self::TouchEnd(t) => t.first().copied(),
            Self::Wheel { .. } => None,
        }
    }

    pub fn is_touch(&self) -> bool {
        matches!(
            self,
            Self::TouchStart(_) | Self::TouchMove(_) | Self::TouchEnd(_)
        )
    }
}

/// Resolves the element under a page point.
pub trait HitResolver {
    fn element_at(&self, page: Vector) -> Option<HitTarget>;
}

/// A normalized pointer sample.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Interaction {
    pub position: Option<Vector>,
    pub target: Option<HitTarget>,
}

impl Interaction {
    pub const EMPTY: Interaction = Interaction {
        position: None,
        target: None,
    };

    pub fn at(position: Vector, target: Option<HitTarget>) -> Self {
        Self {
            position: Some(position),
            target,
        }
    }
}

/// Mouse events always carry a position.
pub fn read_pointer(page: Vector, resolver: &dyn HitResolver) -> Interaction {
    Interaction::at(page, resolver.element_at(page))
}

/// First touch point, or [`Interaction::EMPTY`] when there are none.
pub fn read_touch(touches: &[Vector], resolver: &dyn HitResolver) -> Interaction {
    match touches.first() {
        Some(&page) => Interaction::at(page, resolver.element_at(page)),
        None => Interaction::EMPTY,
    }
}

/// Normalize any positional event. Wheel events have no interaction.
pub fn read_interaction(event: &InputEvent, resolver: &dyn HitResolver) -> Interaction {
    match event {
        InputEvent::TouchStart(t) | InputEvent::TouchMove(t) | InputEvent::TouchEnd(t) => {
            read_touch(t, resolver)
        }
        other => match other.position() {
            Some(page) => read_pointer(page, resolver),
            None => Interaction::EMPTY,
        },
    }
}

//! Time-driven scroll animation.
//!
//! The designer owns no timer. The host calls [`Animator::tick`] with a
//! monotonic clock (about every 10 ms, or once per animation frame) and
//! applies the returned scroll position.

use wfd_core::Vector;

/// Progress of a fixed-duration animation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Animation {
    started_ms: f64,
    duration_ms: f64,
}

impl Animation {
    pub fn new(started_ms: f64, duration_ms: f64) -> Self {
        Self {
            started_ms,
            duration_ms,
        }
    }

    /// Elapsed fraction in `[0, 1]`. Non-positive durations complete at once.
    pub fn fraction(&self, now_ms: f64) -> f64 {
        if self.duration_ms <= 0.0 {
            return 1.0;
        }
        ((now_ms - self.started_ms) / self.duration_ms).clamp(0.0, 1.0)
    }

    pub fn is_finished(&self, now_ms: f64) -> bool {
        self.fraction(now_ms) >= 1.0
    }
}

/// Linear interpolation of the scroll position.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScrollAnimation {
    pub from: Vector,
    pub to: Vector,
    pub timing: Animation,
}

impl ScrollAnimation {
    pub fn sample(&self, now_ms: f64) -> Vector {
        let t = self.timing.fraction(now_ms);
        self.from.add(self.to.subtract(self.from).multiply_const(t))
    }
}

/// Runs at most one scroll animation. Starting another replaces the first.
#[derive(Debug, Default)]
pub struct Animator {
    current: Option<ScrollAnimation>,
}

impl Animator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn start(&mut self, from: Vector, to: Vector, now_ms: f64, duration_ms: f64) {
        if self.current.is_some() {
            log::debug!("ANIMATE replacing running scroll animation");
        }
        self.current = Some(ScrollAnimation {
            from,
            to,
            timing: Animation::new(now_ms, duration_ms),
        });
    }

    pub fn is_running(&self) -> bool {
        self.current.is_some()
    }

    pub fn cancel(&mut self) {
        self.current = None;
    }

    /// Scroll position for this frame, or `None` when idle. The final frame
    /// lands exactly on the target and ends the animation.
    pub fn tick(&mut self, now_ms: f64) -> Option<Vector> {
        let anim = self.current?;
        if anim.timing.is_finished(now_ms) {
            self.current = None;
            Some(anim.to)
        } else {
            Some(anim.sample(now_ms))
        }
    }
}

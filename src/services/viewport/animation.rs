use egui::Vec2;
use std::time::Duration;

pub const SCROLL_ANIMATION: Duration = Duration::from_millis(300);

/// Smooth scroll from one offset pair to another.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ScrollAnimation {
    pub from: Vec2,
    pub to: Vec2,
    pub started: Duration,
    pub duration: Duration,
}

impl ScrollAnimation {
    pub fn new(from: Vec2, to: Vec2, started: Duration) -> Self {
        Self {
            from,
            to,
            started,
            duration: SCROLL_ANIMATION,
        }
    }

    /// Position at `now` and whether the animation has completed.
    pub fn sample(&self, now: Duration) -> (Vec2, bool) {
        let elapsed = now.saturating_sub(self.started).as_secs_f32();
        let total = self.duration.as_secs_f32();
        if total <= 0.0 || elapsed >= total {
            return (self.to, true);
        }

        let t = elapsed / total;
        let eased = 1.0 - (1.0 - t).powi(3);
        (self.from + (self.to - self.from) * eased, false)
    }

    /// Move both endpoints horizontally, used when columns are inserted on the left.
    pub fn shift_x(&mut self, dx: f32) {
        self.from.x += dx;
        self.to.x += dx;
    }
}

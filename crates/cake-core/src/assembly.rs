use std::time::Duration;

/// Cubic ease-in-out (`power3.inOut`).
#[inline]
pub fn ease_in_out_cubic(t: f32) -> f32 {
    let t = t.clamp(0.0, 1.0);
    if t < 0.5 {
        4.0 * t * t * t
    } else {
        let u = -2.0 * t + 2.0;
        1.0 - u * u * u * 0.5
    }
}

/// Owns the single assembly `progress` scalar: 0 is scattered, 1 assembled.
///
/// A new target restarts the tween from wherever progress currently is, so
/// toggling mid-flight reverses smoothly instead of snapping or queueing.
#[derive(Clone, Debug)]
pub struct AssemblyDriver {
    assembled: bool,
    from: f32,
    to: f32,
    value: f32,
    elapsed: Duration,
    duration: Duration,
}

impl AssemblyDriver {
    pub fn new(duration: Duration) -> Self {
        Self {
            assembled: false,
            from: 0.0,
            to: 0.0,
            value: 0.0,
            elapsed: Duration::ZERO,
            duration,
        }
    }

    /// Returns whether a new tween started; repeating the current target is a
    /// no-op.
    pub fn set_target(&mut self, assembled: bool) -> bool {
        if assembled == self.assembled {
            return false;
        }
        self.assembled = assembled;
        self.from = self.value;
        self.to = if assembled { 1.0 } else { 0.0 };
        self.elapsed = Duration::ZERO;
        log::debug!(
            "[assembly] retarget {:.3} -> {:.1}",
            self.from,
            self.to
        );
        true
    }

    pub fn toggle(&mut self) -> bool {
        self.set_target(!self.assembled)
    }

    pub fn advance(&mut self, dt: Duration) {
        if self.value == self.to {
            return;
        }
        self.elapsed += dt;
        let k = if self.duration.is_zero() {
            1.0
        } else {
            (self.elapsed.as_secs_f32() / self.duration.as_secs_f32()).min(1.0)
        };
        self.value = if k >= 1.0 {
            self.to
        } else {
            (self.from + (self.to - self.from) * ease_in_out_cubic(k)).clamp(0.0, 1.0)
        };
    }

    pub fn progress(&self) -> f32 {
        self.value
    }

    /// The requested end state, which may still be in flight.
    pub fn target(&self) -> bool {
        self.assembled
    }

    pub fn is_settled(&self) -> bool {
        self.value == self.to
    }
}

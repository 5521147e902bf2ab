/// Where playback is, expressed as a reference point rather than a counter.
///
/// While running, the position is `now - reference_clock_time`; while frozen
/// it is `reference_position`. Every read recomputes from the pair, so no
/// per-frame error can accumulate.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct PositionModel {
    reference_clock_time: f64,
    reference_position: f64,
    is_running: bool,
}

impl PositionModel {
    /// A stopped model at `position`.
    pub fn frozen(position: f64) -> Self {
        Self {
            reference_clock_time: 0.0,
            reference_position: position,
            is_running: false,
        }
    }

    /// A running model that reads `position` at clock time `now`.
    pub fn running_from(now: f64, position: f64) -> Self {
        Self {
            reference_clock_time: now - position,
            reference_position: position,
            is_running: true,
        }
    }

    pub fn is_running(&self) -> bool {
        self.is_running
    }

    /// Unclamped position at clock time `now`.
    pub fn position_at(&self, now: f64) -> f64 {
        if self.is_running {
            now - self.reference_clock_time
        } else {
            self.reference_position
        }
    }
}

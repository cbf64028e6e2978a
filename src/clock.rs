/// Elapsed animation time in seconds.
///
/// The first [`Clock::advance`] anchors the origin, so the first frame after a
/// (re)start sees `t = 0`. Later readings never go backwards even if the host
/// timestamp does.
#[derive(Debug, Clone, Default)]
pub struct Clock {
    origin: Option<f64>,
    elapsed: f64,
}

impl Clock {
    pub fn new() -> Self {
        Self::default()
    }

    /// Advances to the host timestamp `now` (seconds) and returns elapsed time.
    pub fn advance(&mut self, now: f64) -> f64 {
        if !now.is_finite() {
            return self.elapsed;
        }
        let origin = *self.origin.get_or_insert(now);
        self.elapsed = self.elapsed.max(now - origin);
        self.elapsed
    }

    pub fn elapsed(&self) -> f64 {
        self.elapsed
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

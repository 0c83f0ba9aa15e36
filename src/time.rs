use std::time::Instant;

use crate::renderer::FrameStats;

/// Per-frame delta timing plus a ~1 Hz stats line, standing in for an
/// on-screen readout.
pub struct FrameTimer {
    last_frame: Instant,
    window_start: Instant,
    frames: u32,
    last_stats: FrameStats,
}

impl FrameTimer {
    pub fn new() -> Self {
        let now = Instant::now();
        Self {
            last_frame: now,
            window_start: now,
            frames: 0,
            last_stats: FrameStats::default(),
        }
    }

    /// Seconds since the previous tick.
    pub fn tick(&mut self) -> f64 {
        let now = Instant::now();
        let dt = (now - self.last_frame).as_secs_f64();
        self.last_frame = now;
        dt
    }

    pub fn record(&mut self, stats: FrameStats) {
        self.frames += 1;
        self.last_stats = stats;

        let elapsed = self.window_start.elapsed().as_secs_f64();
        if elapsed >= 1.0 {
            let fps = f64::from(self.frames) / elapsed;
            log::info!(
                "{:.1} fps, {} transparent fragments",
                fps,
                self.last_stats.transparent_fragments
            );
            self.window_start = Instant::now();
            self.frames = 0;
        }
    }
}

impl Default for FrameTimer {
    fn default() -> Self {
        Self::new()
    }
}

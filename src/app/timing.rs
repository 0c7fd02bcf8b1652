use std::time::{Duration, Instant};

/// Frame clock. `now_seconds` is the timestamp handed to every tick.
pub struct FrameTiming {
    start_time: Instant,
    last_frame_time: Option<Instant>,
    last_fps_time: Instant,
    frame_count: u32,
    pub frame_dt: f32,
    label: String,
}

impl FrameTiming {
    pub fn new(label: String, start_time: Instant) -> Self {
        Self {
            start_time,
            last_frame_time: None,
            last_fps_time: start_time,
            frame_count: 0,
            frame_dt: 1.0 / 60.0,
            label,
        }
    }

    pub fn now_seconds(&self, now: Instant) -> f64 {
        now.saturating_duration_since(self.start_time).as_secs_f64()
    }

    pub fn update(&mut self, now: Instant) {
        let dt_duration = if let Some(last) = self.last_frame_time {
            now.saturating_duration_since(last)
        } else {
            Duration::from_millis(16)
        };
        self.last_frame_time = Some(now);
        self.frame_dt = dt_duration.as_secs_f32().max(0.0);

        self.frame_count = self.frame_count.saturating_add(1);
        let elapsed = now.saturating_duration_since(self.last_fps_time);
        if elapsed.as_secs_f32() >= 0.5 {
            let fps = self.frame_count as f32 / elapsed.as_secs_f32();
            log::debug!(
                "{} - {:.1} fps (cadence {:.2} ms)",
                self.label,
                fps,
                self.frame_dt * 1000.0
            );
            self.frame_count = 0;
            self.last_fps_time = now;
        }
    }
}

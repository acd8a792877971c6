use std::time::{Duration, Instant};

/// Frame timing for the host loop: last and running-average populate time,
/// logged once per period.
pub struct Telemetry {
    pub last_ms: f32,
    pub frames: u64,
    total_ms: f64,

    period_last: Instant,
    period_frames: u32,
    period_sec: f32,
}

impl Telemetry {
    pub fn new() -> Self {
        Self {
            last_ms: 0.0,
            frames: 0,
            total_ms: 0.0,
            period_last: Instant::now(),
            period_frames: 0,
            period_sec: 1.0,
        }
    }

    #[inline]
    pub fn average_ms(&self) -> f32 {
        if self.frames == 0 {
            0.0
        } else {
            (self.total_ms / self.frames as f64) as f32
        }
    }

    pub fn frame_tick(&mut self, dt: Duration) {
        self.last_ms = dt.as_secs_f32() * 1000.0;
        self.total_ms += self.last_ms as f64;
        self.frames += 1;

        self.period_frames += 1;
        let elapsed = self.period_last.elapsed().as_secs_f32();
        if elapsed >= self.period_sec {
            let fps = self.period_frames as f32 / elapsed.max(0.0001);
            log::info!(
                "fps={:.1} populate_ms={:.3} avg_ms={:.3} frames={}",
                fps,
                self.last_ms,
                self.average_ms(),
                self.frames
            );
            self.period_frames = 0;
            self.period_last = Instant::now();
        }
    }
}

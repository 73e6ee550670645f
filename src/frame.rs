//! Frame driver (§4.G): fixed-timestep accumulator that turns a host
//! animation-frame `dt` into a bounded number of stepper ticks, plus the
//! periodic stats aggregation the host polls for its HUD.
//!
//! Grounded on the teacher's `world.rs::step()`/`PerfStats` (per-tick
//! phase timings rolled into one struct handed back to JS) and the
//! cancellation-by-token idiom implied by its `World::new` /
//! re-`init` reset path — generalized here into an explicit loop token
//! instead of relying on JS dropping the old animation-frame callback.

use crate::ring::InputRing;

pub const BASE_STEP_MS: f32 = 1000.0 / 60.0;
pub const MAX_DT_MS: f32 = 100.0;
pub const MAX_STEPS_PER_FRAME: u32 = 8;
const FPS_SAMPLE_COUNT: usize = 60;
const STATS_INTERVAL_MS: f32 = 200.0;

#[derive(Debug, Clone, Default, serde::Serialize)]
pub struct FrameStats {
    pub fps: f32,
    pub particle_count: u32,
    pub steps_per_frame: u32,
    pub ring_overflow_count: u32,
    pub memory_bytes: u32,
}

pub struct FrameDriver {
    accumulator: f32,
    loop_token: u64,
    fps_samples: [f32; FPS_SAMPLE_COUNT],
    fps_sample_idx: usize,
    fps_sample_count: usize,
    since_last_stats_ms: f32,
    ring_overflow_count: u32,
    last_stats: FrameStats,
}

impl FrameDriver {
    pub fn new() -> Self {
        Self {
            accumulator: 0.0,
            loop_token: 0,
            fps_samples: [0.0; FPS_SAMPLE_COUNT],
            fps_sample_idx: 0,
            fps_sample_count: 0,
            since_last_stats_ms: 0.0,
            ring_overflow_count: 0,
            last_stats: FrameStats::default(),
        }
    }

    /// Bumps the cancellation token (called on every `INIT`, §4.G).
    pub fn bump_loop_token(&mut self) -> u64 {
        self.loop_token = self.loop_token.wrapping_add(1);
        self.loop_token
    }

    pub fn loop_token(&self) -> u64 {
        self.loop_token
    }

    /// A loop iteration started under an older token should bail out rather
    /// than keep ticking a world that's been reinitialized underneath it.
    pub fn is_current(&self, token: u64) -> bool {
        token == self.loop_token
    }

    /// Feeds one host animation frame's wall-clock delta and speed setting,
    /// returning how many stepper ticks should run this frame (§4.G steps
    /// 1-3). Clamps `dt`, accumulates `speed * dt / BASE_STEP_MS`, caps the
    /// step count, and resets the accumulator to a small residual when
    /// capped to avoid a spiral of death.
    pub fn advance(&mut self, dt_ms: f32, speed: f32) -> u32 {
        let dt = dt_ms.clamp(0.0, MAX_DT_MS);
        self.accumulator += speed * dt / BASE_STEP_MS;

        let steps = self.accumulator.floor();
        let steps_u32 = steps as u32;
        if steps_u32 > MAX_STEPS_PER_FRAME {
            self.accumulator = (self.accumulator - steps).clamp(0.0, 1.0);
            MAX_STEPS_PER_FRAME
        } else {
            self.accumulator -= steps;
            steps_u32
        }
    }

    pub fn record_fps_sample(&mut self, dt_ms: f32) {
        let fps = if dt_ms > 0.0 { 1000.0 / dt_ms } else { 0.0 };
        self.fps_samples[self.fps_sample_idx] = fps;
        self.fps_sample_idx = (self.fps_sample_idx + 1) % FPS_SAMPLE_COUNT;
        self.fps_sample_count = (self.fps_sample_count + 1).min(FPS_SAMPLE_COUNT);
    }

    pub fn note_ring_drain(&mut self, ring: &InputRing, overflowed: bool) {
        let _ = ring;
        if overflowed {
            self.ring_overflow_count = self.ring_overflow_count.saturating_add(1);
        }
    }

    /// Advances the 200ms stats clock (§4.G step 7); returns `Some(stats)`
    /// exactly on the frames that cross a 200ms boundary.
    pub fn maybe_emit_stats(
        &mut self,
        dt_ms: f32,
        steps_this_frame: u32,
        particle_count: u32,
        memory_bytes: u32,
    ) -> Option<FrameStats> {
        self.since_last_stats_ms += dt_ms;
        if self.since_last_stats_ms < STATS_INTERVAL_MS {
            return None;
        }
        self.since_last_stats_ms = 0.0;

        let avg_fps = if self.fps_sample_count > 0 {
            self.fps_samples[..self.fps_sample_count].iter().sum::<f32>() / self.fps_sample_count as f32
        } else {
            0.0
        };

        let stats = FrameStats {
            fps: avg_fps,
            particle_count,
            steps_per_frame: steps_this_frame,
            ring_overflow_count: self.ring_overflow_count,
            memory_bytes,
        };
        self.last_stats = stats.clone();
        Some(stats)
    }

    pub fn last_stats(&self) -> &FrameStats {
        &self.last_stats
    }
}

impl Default for FrameDriver {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn one_base_step_frame_yields_one_tick() {
        let mut d = FrameDriver::new();
        let steps = d.advance(BASE_STEP_MS, 1.0);
        assert_eq!(steps, 1);
    }

    #[test]
    fn zero_speed_never_accumulates_steps() {
        let mut d = FrameDriver::new();
        for _ in 0..10 {
            assert_eq!(d.advance(BASE_STEP_MS, 0.0), 0);
        }
    }

    #[test]
    fn huge_dt_is_capped_at_max_steps_per_frame() {
        let mut d = FrameDriver::new();
        let steps = d.advance(10_000.0, 8.0);
        assert_eq!(steps, MAX_STEPS_PER_FRAME);
    }

    #[test]
    fn capped_frame_resets_accumulator_into_zero_one_residual() {
        let mut d = FrameDriver::new();
        d.advance(10_000.0, 8.0);
        assert!(d.accumulator >= 0.0 && d.accumulator <= 1.0);
    }

    #[test]
    fn init_bumps_token_and_stale_loops_are_detected() {
        let mut d = FrameDriver::new();
        let t0 = d.loop_token();
        assert!(d.is_current(t0));
        d.bump_loop_token();
        assert!(!d.is_current(t0));
    }

    #[test]
    fn stats_emit_only_after_two_hundred_milliseconds() {
        let mut d = FrameDriver::new();
        assert!(d.maybe_emit_stats(100.0, 1, 10, 0).is_none());
        assert!(d.maybe_emit_stats(101.0, 1, 10, 0).is_some());
    }
}

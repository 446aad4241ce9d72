use std::time::{Duration, Instant};

use crate::strategy::FrameTick;

const DEFAULT_STEP: Duration = Duration::from_micros(16_667);

/// Converts wall-clock frame times into a whole number of fixed simulation
/// steps so effect speed does not depend on the display refresh rate.
#[derive(Debug, Clone)]
pub struct StepClock {
    step: Duration,
    max_catch_up: u32,
    last: Option<Instant>,
    accumulated: Duration,
}

impl StepClock {
    /// Creates a clock stepping `step_hz` times per second that will never
    /// report more than `max_catch_up` steps for a single frame.
    ///
    /// Rates that do not yield a usable step length fall back to 60 Hz.
    pub fn new(step_hz: f32, max_catch_up: u32) -> Self {
        let step = Some(step_hz)
            .filter(|hz| hz.is_finite() && *hz > 0.0)
            .and_then(|hz| Duration::try_from_secs_f32(1.0 / hz).ok())
            .filter(|step| !step.is_zero())
            .unwrap_or(DEFAULT_STEP);
        Self {
            step,
            max_catch_up: max_catch_up.max(1),
            last: None,
            accumulated: Duration::ZERO,
        }
    }

    pub fn step_duration(&self) -> Duration {
        self.step
    }

    /// Forgets the previous frame time; the next `advance` runs one step.
    pub fn reset(&mut self) {
        self.last = None;
        self.accumulated = Duration::ZERO;
    }

    /// Steps owed for a frame presented at `now`.
    ///
    /// The first frame after construction or [`reset`](Self::reset) always
    /// runs exactly one step. Time beyond the catch-up limit is dropped.
    pub fn advance(&mut self, now: Instant) -> FrameTick {
        let Some(last) = self.last.replace(now) else {
            return FrameTick::steps(1);
        };
        self.accumulated += now.saturating_duration_since(last);

        let mut steps = 0;
        while self.accumulated >= self.step && steps < self.max_catch_up {
            self.accumulated -= self.step;
            steps += 1;
        }
        if steps == self.max_catch_up && self.accumulated >= self.step {
            tracing::trace!(
                dropped_ms = self.accumulated.as_secs_f32() * 1000.0,
                "simulation fell behind; dropping backlog"
            );
            self.accumulated = Duration::ZERO;
        }
        FrameTick::steps(steps)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_frame_runs_one_step() {
        let mut clock = StepClock::new(60.0, 4);
        assert_eq!(clock.advance(Instant::now()).steps, 1);
    }

    #[test]
    fn steady_frames_run_one_step_each() {
        let mut clock = StepClock::new(60.0, 4);
        let start = Instant::now();
        clock.advance(start);
        let step = clock.step_duration();
        let mut total = 0;
        for frame in 1..=60 {
            total += clock.advance(start + step * frame).steps;
        }
        assert_eq!(total, 60);
    }

    #[test]
    fn high_refresh_rate_does_not_speed_up_simulation() {
        let mut clock = StepClock::new(60.0, 4);
        let start = Instant::now();
        clock.advance(start);
        let frame = Duration::from_secs_f64(1.0 / 144.0);
        let mut total = 0;
        for i in 1..=144 {
            total += clock.advance(start + frame * i).steps;
        }
        assert!((59..=60).contains(&total), "ran {total} steps");
    }

    #[test]
    fn long_stall_is_capped() {
        let mut clock = StepClock::new(60.0, 4);
        let start = Instant::now();
        clock.advance(start);
        let tick = clock.advance(start + Duration::from_secs(2));
        assert_eq!(tick.steps, 4);
        let next = clock.advance(start + Duration::from_secs(2) + clock.step_duration());
        assert_eq!(next.steps, 1);
    }

    #[test]
    fn unusable_rates_fall_back_to_sixty_hertz() {
        for step_hz in [1e-20, 0.0, -5.0, f32::NAN, f32::INFINITY] {
            let clock = StepClock::new(step_hz, 4);
            assert_eq!(clock.step_duration(), DEFAULT_STEP, "{step_hz}");
        }
        assert_eq!(
            StepClock::new(120.0, 4).step_duration().as_micros(),
            8_333
        );
    }

    #[test]
    fn reset_restarts_with_one_step() {
        let mut clock = StepClock::new(60.0, 4);
        let start = Instant::now();
        clock.advance(start);
        clock.reset();
        assert_eq!(clock.advance(start + Duration::from_secs(5)).steps, 1);
    }
}

// Copyright 2025 eraflo
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Frame pacing: turns raw wall-clock deltas into a simulation step and a
//! smoothed frame-rate reading.
//!
//! The pacer never sleeps or throttles the loop. Per frame it:
//! 1. samples the wall-clock delta `dt_real` and restarts its clock;
//! 2. tracks the smallest and largest delta of the current window;
//! 3. derives the simulation step `dt = max(dt_real, MIN_SIMULATION_STEP)`;
//! 4. folds `dt_real` into a self-weighted moving average, so long frames
//!    pull the estimate harder than short ones;
//! 5. every [`INDICATOR_REFRESH_INTERVAL`] seconds publishes a
//!    [`RateReading`], and after [`EXTREMES_RESET_CYCLES`] publications
//!    without a new extreme restarts the min/max window at the latest sample.

use std::fmt;

use crate::utils::timer::Stopwatch;

/// Lower bound of the simulation step, in seconds (10 updates per second).
pub const MIN_SIMULATION_STEP: f64 = 0.1;

/// Seconds of real time between two rate readings.
pub const INDICATOR_REFRESH_INTERVAL: f64 = 0.5;

/// Readings without a new extreme before the min/max window restarts.
pub const EXTREMES_RESET_CYCLES: u32 = 6;

/// A snapshot of the frame rate, in frames per second.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RateReading {
    /// The damped frame rate.
    pub rate: f64,
    /// The slowest rate of the current window (from the longest delta).
    pub min_rate: f64,
    /// The fastest rate of the current window (from the shortest delta).
    pub max_rate: f64,
}

impl RateReading {
    fn from_intervals(damped: f64, longest: f64, shortest: f64) -> Self {
        Self {
            rate: damped.recip(),
            min_rate: longest.recip(),
            max_rate: shortest.recip(),
        }
    }
}

impl fmt::Display for RateReading {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{:.0} Hz [{:.0}..{:.0}]",
            self.rate, self.min_rate, self.max_rate
        )
    }
}

/// The outcome of pacing one frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameStep {
    /// Measured wall-clock time since the previous frame, in seconds.
    pub dt_real: f64,
    /// The step handed to the simulation; never below [`MIN_SIMULATION_STEP`].
    pub dt: f64,
    /// A fresh reading, present only on frames where the indicator refreshes.
    pub reading: Option<RateReading>,
}

#[derive(Debug, Clone, Copy, PartialEq)]
struct Extremes {
    shortest: f64,
    longest: f64,
}

/// Derives a bounded simulation step and a smoothed rate estimate from
/// successive wall-clock samples.
///
/// A pacer holds no persistent data; build a fresh one for every run of the
/// main loop.
#[derive(Debug, Clone)]
pub struct FramePacer {
    clock: Stopwatch,
    extremes: Option<Extremes>,
    fresh_extreme: bool,
    quiet_cycles: u32,
    damped_interval: Option<f64>,
    refresh_timer: f64,
    reading: Option<RateReading>,
    frames: u64,
}

impl FramePacer {
    /// Creates a pacer whose clock starts now.
    pub fn new() -> Self {
        Self {
            clock: Stopwatch::new(),
            extremes: None,
            fresh_extreme: false,
            quiet_cycles: 0,
            damped_interval: None,
            refresh_timer: 0.0,
            reading: None,
            frames: 0,
        }
    }

    /// Samples the wall clock, restarts it, and paces the elapsed interval.
    pub fn sample(&mut self) -> FrameStep {
        let dt_real = self.clock.lap().as_secs_f64();
        self.advance_by(dt_real)
    }

    /// Paces a frame that lasted `dt_real` seconds.
    ///
    /// Negative or NaN inputs are treated as zero.
    pub fn advance_by(&mut self, dt_real: f64) -> FrameStep {
        let dt_real = dt_real.max(0.0);
        self.frames += 1;
        self.track_extremes(dt_real);

        let dt = dt_real.max(MIN_SIMULATION_STEP);

        // Self-weighted moving average: the sample's weight is its own length.
        let factor = dt_real;
        let damped = match self.damped_interval {
            Some(previous) => (previous + dt_real * factor) / (1.0 + factor),
            None => dt_real,
        };
        self.damped_interval = Some(damped);

        let mut reading = None;
        self.refresh_timer += dt_real;
        if self.refresh_timer > INDICATOR_REFRESH_INTERVAL {
            self.refresh_timer -= INDICATOR_REFRESH_INTERVAL;
            reading = self.refresh(damped, dt_real);
        }

        FrameStep {
            dt_real,
            dt,
            reading,
        }
    }

    fn track_extremes(&mut self, dt_real: f64) {
        match self.extremes.as_mut() {
            None => {
                self.extremes = Some(Extremes {
                    shortest: dt_real,
                    longest: dt_real,
                });
                self.fresh_extreme = true;
            }
            Some(extremes) => {
                if dt_real > extremes.longest {
                    extremes.longest = dt_real;
                    self.fresh_extreme = true;
                }
                if dt_real < extremes.shortest {
                    extremes.shortest = dt_real;
                    self.fresh_extreme = true;
                }
            }
        }
    }

    fn refresh(&mut self, damped: f64, dt_real: f64) -> Option<RateReading> {
        let extremes = self.extremes?;
        let reading = RateReading::from_intervals(damped, extremes.longest, extremes.shortest);
        self.reading = Some(reading);

        if self.fresh_extreme {
            self.fresh_extreme = false;
            self.quiet_cycles = 0;
        } else {
            self.quiet_cycles += 1;
            if self.quiet_cycles >= EXTREMES_RESET_CYCLES {
                log::trace!("rate window reset after {} quiet cycles", self.quiet_cycles);
                self.quiet_cycles = 0;
                self.extremes = Some(Extremes {
                    shortest: dt_real,
                    longest: dt_real,
                });
            }
        }
        Some(reading)
    }

    /// The `(shortest, longest)` deltas of the current window, in seconds.
    pub fn extremes(&self) -> Option<(f64, f64)> {
        self.extremes.map(|e| (e.shortest, e.longest))
    }

    /// The current damped frame interval, in seconds.
    pub fn damped_interval(&self) -> Option<f64> {
        self.damped_interval
    }

    /// The most recently published reading.
    pub fn reading(&self) -> Option<RateReading> {
        self.reading
    }

    /// Number of frames paced so far.
    pub fn frame_count(&self) -> u64 {
        self.frames
    }
}

impl Default for FramePacer {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn simulation_step_is_floored() {
        let mut pacer = FramePacer::new();
        let steps: Vec<f64> = [0.2, 0.01, 5.0]
            .into_iter()
            .map(|dt_real| pacer.advance_by(dt_real).dt)
            .collect();
        assert_eq!(steps, vec![0.2, 0.1, 5.0]);
    }

    #[test]
    fn zero_negative_and_nan_deltas_become_zero() {
        let mut pacer = FramePacer::new();
        for input in [0.0, -3.0, f64::NAN] {
            let step = pacer.advance_by(input);
            assert_eq!(step.dt_real, 0.0);
            assert_eq!(step.dt, MIN_SIMULATION_STEP);
        }
    }

    #[test]
    fn damped_interval_weights_by_sample_length() {
        let mut pacer = FramePacer::new();
        pacer.advance_by(0.5);
        assert_relative_eq!(pacer.damped_interval().unwrap_or_default(), 0.5);

        pacer.advance_by(1.0);
        // (0.5 + 1.0 * 1.0) / (1 + 1.0)
        assert_relative_eq!(pacer.damped_interval().unwrap_or_default(), 0.75);

        pacer.advance_by(0.0);
        assert_relative_eq!(
            pacer.damped_interval().unwrap_or_default(),
            0.75,
            epsilon = 1e-12
        );
    }

    #[test]
    fn readings_are_published_every_half_second() {
        let mut pacer = FramePacer::new();
        let published: Vec<bool> = std::iter::repeat(0.125)
            .take(12)
            .map(|dt_real| pacer.advance_by(dt_real).reading.is_some())
            .collect();
        // The timer must strictly exceed 0.5s, so the 5th frame is the first.
        assert_eq!(
            published,
            vec![false, false, false, false, true, false, false, false, true, false, false, false]
        );
    }

    #[test]
    fn reading_formats_rate_and_range() {
        let mut pacer = FramePacer::new();
        let step = pacer.advance_by(0.625);
        let reading = step.reading.expect("A 0.625s frame refreshes the indicator");
        assert_eq!(reading.to_string(), "2 Hz [2..2]");
        assert_eq!(pacer.reading(), Some(reading));
    }

    #[test]
    fn first_reading_uses_window_extremes() {
        let mut pacer = FramePacer::new();
        pacer.advance_by(0.25);
        let reading = pacer
            .advance_by(0.5)
            .reading
            .expect("0.75s accumulated should refresh");
        assert_relative_eq!(reading.min_rate, 2.0);
        assert_relative_eq!(reading.max_rate, 4.0);
    }
}

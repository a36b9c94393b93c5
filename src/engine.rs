//! Animation engine for the curve trace
//!
//! The engine owns the visible point buffer, its color buffer and the
//! animation state machine:
//!
//! | State       | Entry                    | Tick                               | Exit                      |
//! |-------------|--------------------------|------------------------------------|---------------------------|
//! | `Frozen`    | generate the full trace  | nothing                            | mode change               |
//! | `Growing`   | empty buffer             | append one point, redo gradient    | buffer reaches the tail   |
//! | `Sliding`   | fix the gradient         | drop the oldest point, append one  | mode or parameter change  |
//!
//! Every mutation happens inside a `&mut self` call, so a [`Frame`] taken with
//! [`AnimationEngine::current_frame`] always sees complete, equal-length buffers.

mod buffer;

pub use buffer::{PREALLOC_LIMIT, PointRing};

use crate::colors::{self, Rgb, gradient_color};
use crate::curve::{self, CurveParameters, CurvePoint};
use serde::{Deserialize, Serialize};
use std::f64::consts::TAU;

/// Rendering mode selected by the control layer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    /// Static multi-cycle trace, generated once
    Frozen,
    /// Growing then sliding tail driven by ticks
    Animated,
}

/// Animation state machine
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnimationState {
    Frozen,
    /// Tail is still growing; holds the number of points generated so far
    Growing(usize),
    /// Tail has reached its full length and advances one point per tick
    Sliding,
}

/// Sizing and coloring of the trace
#[derive(Debug, Clone, PartialEq)]
pub struct EngineConfig {
    /// Full periods drawn in frozen mode
    pub cycles: u32,
    pub points_per_cycle: usize,
    /// Number of points in the animated tail
    pub tail_length: usize,
    /// Time between two consecutive animated samples
    pub step_size: f64,
    pub cold: Rgb,
    pub hot: Rgb,
    pub frozen_color: Rgb,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            cycles: 10,
            points_per_cycle: 1000,
            tail_length: 1000,
            step_size: TAU / 1000.0,
            cold: colors::COLD,
            hot: colors::HOT,
            frozen_color: colors::FROZEN,
        }
    }
}

impl EngineConfig {
    /// Number of points in the frozen trace
    pub fn frozen_len(&self) -> usize {
        curve::sample_count(self.cycles, self.points_per_cycle)
    }
}

/// Read-only snapshot handed to the rendering backend
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct Frame {
    pub points: Vec<CurvePoint>,
    pub colors: Vec<Rgb>,
}

impl Frame {
    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Consecutive point pairs with their vertex colors, for line-strip drawing
    pub fn segments(&self) -> impl Iterator<Item = ((CurvePoint, Rgb), (CurvePoint, Rgb))> + '_ {
        self.points
            .windows(2)
            .zip(self.colors.windows(2))
            .map(|(p, c)| ((p[0], c[0]), (p[1], c[1])))
    }
}

/// Owns the point and color buffers and advances them on each tick
#[derive(Debug)]
pub struct AnimationEngine {
    config: EngineConfig,
    params: CurveParameters,
    mode: Mode,
    state: AnimationState,
    points: PointRing,
    colors: Vec<Rgb>,
    /// Samples taken since the animation (re)started
    samples: u64,
    running: bool,
}

impl AnimationEngine {
    /// Create an engine in frozen mode with empty buffers
    ///
    /// Nothing is generated until the first [`set_mode`](Self::set_mode) or
    /// parameter change.
    pub fn new(config: EngineConfig, params: CurveParameters) -> Self {
        Self {
            config,
            params,
            mode: Mode::Frozen,
            state: AnimationState::Frozen,
            points: PointRing::with_capacity(0),
            colors: Vec::new(),
            samples: 0,
            running: false,
        }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn parameters(&self) -> CurveParameters {
        self.params
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    pub fn state(&self) -> AnimationState {
        self.state
    }

    /// Whether ticks are still being processed
    pub fn is_running(&self) -> bool {
        self.running
    }

    /// Number of points currently visible
    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Time of the most recent animated sample
    pub fn timestep(&self) -> f64 {
        self.samples as f64 * self.config.step_size
    }

    /// Switch mode and restart from scratch
    pub fn set_mode(&mut self, mode: Mode) {
        tracing::debug!(from = ?self.mode, to = ?mode, "mode change");
        self.mode = mode;
        self.restart();
    }

    /// Replace the curve parameters and restart in the current mode
    pub fn set_parameters(&mut self, params: CurveParameters) {
        self.params = params;
        self.on_parameters_changed();
    }

    /// Restart after a parameter change
    ///
    /// Every historical sample depends on the parameters, so the buffers are
    /// rebuilt rather than patched.
    pub fn on_parameters_changed(&mut self) {
        tracing::debug!(params = ?self.params, "parameters changed");
        self.restart();
    }

    /// Restart in the current mode
    pub fn reset(&mut self) {
        tracing::debug!(mode = ?self.mode, "reset");
        self.restart();
    }

    /// Change the number of cycles of the frozen trace
    pub fn set_cycles(&mut self, cycles: u32) {
        self.config.cycles = cycles;
        if self.mode == Mode::Frozen && !self.points.is_empty() {
            self.restart();
        }
    }

    /// Change the animated tail length; restarts when animating
    pub fn set_tail_length(&mut self, tail_length: usize) {
        self.config.tail_length = tail_length;
        if self.mode == Mode::Animated {
            self.restart();
        }
    }

    /// Stop processing ticks, keeping the current buffers on display
    pub fn stop(&mut self) {
        if self.running {
            tracing::debug!(state = ?self.state, len = self.points.len(), "animation stopped");
        }
        self.running = false;
    }

    /// Advance the animation by one step
    ///
    /// Returns `true` when the buffers changed.
    pub fn on_tick(&mut self) -> bool {
        if !self.running {
            return false;
        }

        match self.state {
            AnimationState::Frozen => false,
            AnimationState::Growing(generated) => {
                self.grow(generated);
                true
            }
            AnimationState::Sliding => {
                self.slide();
                true
            }
        }
    }

    /// Snapshot of the current buffers
    pub fn current_frame(&self) -> Frame {
        debug_assert_eq!(self.points.len(), self.colors.len());
        Frame {
            points: self.points.to_vec(),
            colors: self.colors.clone(),
        }
    }

    fn restart(&mut self) {
        match self.mode {
            Mode::Frozen => self.generate_frozen(),
            Mode::Animated => self.start_growing(),
        }
    }

    fn generate_frozen(&mut self) {
        let points = curve::sample_cycles(&self.params, self.config.cycles, self.config.points_per_cycle);
        let len = points.len();

        self.points = PointRing::from_points(points);
        self.colors = vec![self.config.frozen_color; len];
        self.state = AnimationState::Frozen;
        self.samples = 0;
        self.running = false;

        tracing::debug!(points = len, cycles = self.config.cycles, "frozen trace generated");
    }

    fn start_growing(&mut self) {
        let tail = self.config.tail_length;

        // Fresh buffers: a snapshot taken before the restart keeps the old data
        self.points = PointRing::with_capacity(tail);
        self.colors = Vec::with_capacity(tail.min(PREALLOC_LIMIT));
        self.state = AnimationState::Growing(0);
        self.samples = 0;
        self.running = true;

        tracing::debug!(tail, step = self.config.step_size, "animation started");
    }

    fn grow(&mut self, generated: usize) {
        let tail = self.config.tail_length;

        self.samples = generated as u64 + 1;
        let point = curve::evaluate(&self.params, self.timestep());
        self.points.push(point);

        if self.points.len() >= tail {
            if self.points.len() > tail || self.points.capacity() != tail {
                tracing::debug!(len = self.points.len(), tail, "tail overshoot, truncating");
                self.points.truncate(tail);
                self.points = PointRing::from_points(self.points.to_vec());
            }
            self.recolor();
            self.state = AnimationState::Sliding;
            tracing::debug!(len = self.points.len(), "tail complete, sliding");
        } else {
            self.recolor();
            self.state = AnimationState::Growing(self.points.len());
            tracing::trace!(len = self.points.len(), "tail growing");
        }
    }

    fn slide(&mut self) {
        self.samples += 1;
        let point = curve::evaluate(&self.params, self.timestep());

        // A full ring drops its oldest point; the gradient stays put
        self.points.push(point);
        tracing::trace!(t = self.timestep(), "tail slid");
    }

    /// Recompute the cold-to-hot gradient over the current length
    fn recolor(&mut self) {
        let len = self.points.len();
        let (cold, hot) = (self.config.cold, self.config.hot);

        self.colors.clear();
        self.colors.extend((0..len).map(|i| gradient_color(i, len, cold, hot)));
    }
}

//! Control layer
//!
//! Turns user intents (slider moves, button presses) into engine calls. This is
//! the only place that mutates the curve parameters: every change goes through
//! [`AnimationEngine::set_parameters`], which restarts the trace.

use crate::curve::CurveParameters;
use crate::engine::{AnimationEngine, Mode};
use std::f64::consts::PI;

pub const FREQUENCY_MIN: f64 = 1.0;
pub const FREQUENCY_MAX: f64 = 30.0;
/// Frequency sliders move in tenths
const FREQUENCY_STEPS_PER_UNIT: f64 = 10.0;

/// Phase slider positions run from 0 to 2π in steps of π/12
pub const PHASE_DETENTS: u8 = 24;

pub const CYCLES_MIN: u32 = 1;
pub const CYCLES_MAX: u32 = 10;

/// Snap a frequency to the slider grid and clamp it to the allowed range
pub fn quantize_frequency(value: f64) -> f64 {
    if !value.is_finite() {
        return FREQUENCY_MIN;
    }
    let steps = (value * FREQUENCY_STEPS_PER_UNIT).round().clamp(
        FREQUENCY_MIN * FREQUENCY_STEPS_PER_UNIT,
        FREQUENCY_MAX * FREQUENCY_STEPS_PER_UNIT,
    );
    steps / FREQUENCY_STEPS_PER_UNIT
}

/// Phase offset in radians for a slider position
pub fn phase_from_detent(detent: u8) -> f64 {
    PI * detent.min(PHASE_DETENTS) as f64 / 12.0
}

/// Nearest slider position for a phase offset
///
/// Offsets outside `[0, 2π]` wrap around.
pub fn detent_from_phase(phase: f64) -> u8 {
    if !phase.is_finite() {
        return 0;
    }
    let detent = (phase * 12.0 / PI).round();
    let max = PHASE_DETENTS as f64;
    if (0.0..=max).contains(&detent) {
        detent as u8
    } else {
        detent.rem_euclid(max) as u8
    }
}

/// Display label for a slider position
pub fn phase_label(detent: u8) -> String {
    match detent.min(PHASE_DETENTS) {
        0 => "0 rad".to_string(),
        12 => "\u{03c0} rad".to_string(),
        24 => "2\u{03c0} rad".to_string(),
        n => format!("{}\u{03c0} / 12 rad", n),
    }
}

/// A user action from the control panel
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Command {
    SetXFrequency(f64),
    SetYFrequency(f64),
    SetPhaseDetent(u8),
    SetCycles(u32),
    /// Switch between the frozen trace and the animation
    ToggleAnimation,
    /// Restart the animation; ignored while frozen
    Reset,
}

/// Owns the engine and applies commands to it
#[derive(Debug)]
pub struct Controller {
    engine: AnimationEngine,
    phase_detent: u8,
}

impl Controller {
    /// Take over an engine, snapping its parameters to the slider grid
    ///
    /// The engine restarts only if snapping changed something.
    pub fn new(mut engine: AnimationEngine) -> Self {
        let current = engine.parameters();
        let phase_detent = detent_from_phase(current.phase_offset);
        let snapped = CurveParameters::new(
            quantize_frequency(current.x_frequency),
            quantize_frequency(current.y_frequency),
            phase_from_detent(phase_detent),
        );
        if snapped != current {
            tracing::debug!(from = ?current, to = ?snapped, "snapping parameters to slider positions");
            engine.set_parameters(snapped);
        }

        Self {
            engine,
            phase_detent,
        }
    }

    pub fn engine(&self) -> &AnimationEngine {
        &self.engine
    }

    /// Mutable access for the tick source
    pub fn engine_mut(&mut self) -> &mut AnimationEngine {
        &mut self.engine
    }

    pub fn into_engine(self) -> AnimationEngine {
        self.engine
    }

    pub fn is_animating(&self) -> bool {
        self.engine.mode() == Mode::Animated
    }

    /// Reset only makes sense while animating
    pub fn reset_enabled(&self) -> bool {
        self.is_animating()
    }

    pub fn phase_detent(&self) -> u8 {
        self.phase_detent
    }

    pub fn phase_label(&self) -> String {
        phase_label(self.phase_detent)
    }

    /// Apply a command; returns `true` when the display needs a redraw
    pub fn apply(&mut self, command: Command) -> bool {
        tracing::debug!(?command, "control command");

        match command {
            Command::SetXFrequency(value) => {
                let value = quantize_frequency(value);
                self.update_parameters(|params| params.set_x_frequency(value))
            }
            Command::SetYFrequency(value) => {
                let value = quantize_frequency(value);
                self.update_parameters(|params| params.set_y_frequency(value))
            }
            Command::SetPhaseDetent(detent) => {
                let detent = detent.min(PHASE_DETENTS);
                self.phase_detent = detent;
                self.update_parameters(|params| params.set_phase_offset(phase_from_detent(detent)))
            }
            Command::SetCycles(cycles) => {
                let cycles = cycles.clamp(CYCLES_MIN, CYCLES_MAX);
                if cycles == self.engine.config().cycles {
                    return false;
                }
                self.engine.set_cycles(cycles);
                !self.is_animating()
            }
            Command::ToggleAnimation => {
                self.engine.stop();
                let next = match self.engine.mode() {
                    Mode::Frozen => Mode::Animated,
                    Mode::Animated => Mode::Frozen,
                };
                self.engine.set_mode(next);
                true
            }
            Command::Reset => {
                if !self.reset_enabled() {
                    tracing::debug!("reset ignored while frozen");
                    return false;
                }
                self.engine.stop();
                self.engine.reset();
                true
            }
        }
    }

    fn update_parameters(&mut self, update: impl FnOnce(&mut CurveParameters)) -> bool {
        let mut params = self.engine.parameters();
        update(&mut params);
        if params == self.engine.parameters() {
            return false;
        }
        self.engine.set_parameters(params);
        true
    }
}

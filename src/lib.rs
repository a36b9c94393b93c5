//! Lissajous curve sketcher
//!
//! The curve is two sine oscillators combined with a phase shift. It is shown
//! either as a static multi-cycle trace or as an animated tail that grows from
//! a single point to a fixed length and then slides forward forever.
//!
//! - `curve`: pure evaluation of the curve
//! - `engine`: point/color buffers and the Frozen/Growing/Sliding state machine
//! - `controls`: slider and button semantics on top of the engine
//! - `ticker`: tokio-driven periodic ticks
//! - `render`: tiny-skia rasterisation of a frame
//! - `config`: TOML settings

pub mod colors;
pub mod config;
pub mod controls;
pub mod curve;
pub mod engine;
pub mod error;
pub mod render;
pub mod ticker;

pub use controls::{Command, Controller};
pub use curve::{CurveParameters, CurvePoint, evaluate};
pub use engine::{AnimationEngine, AnimationState, EngineConfig, Frame, Mode};

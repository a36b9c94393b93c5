//! Periodic tick source
//!
//! Drives [`AnimationEngine::on_tick`] from a tokio interval. The loop ends
//! when the tick limit is reached, when the engine stops accepting ticks, or on
//! Ctrl-C. Ticks run on the caller's task, one after another, so the engine is
//! never touched concurrently.

use crate::config::TimerSettings;
use crate::engine::AnimationEngine;
use std::future::Future;
use std::time::Duration;
use tokio::time::MissedTickBehavior;

/// Timer presets
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TickProfile {
    /// Fast timer for the growing and sliding tail
    #[default]
    Animated,
    /// Slower timer for the single-trail variant
    Simple,
}

/// Why the tick loop ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StopReason {
    /// The requested number of ticks was delivered
    Limit,
    /// The engine stopped accepting ticks
    Stopped,
    /// Ctrl-C
    Interrupted,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TickSummary {
    pub ticks: u64,
    pub reason: StopReason,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Ticker {
    interval: Duration,
    limit: Option<u64>,
}

impl Ticker {
    pub fn new(interval: Duration) -> Self {
        Self {
            // tokio panics on a zero period
            interval: interval.max(Duration::from_millis(1)),
            limit: None,
        }
    }

    pub fn from_settings(settings: &TimerSettings, profile: TickProfile) -> Self {
        match profile {
            TickProfile::Animated => Self::new(settings.interval()),
            TickProfile::Simple => Self::new(settings.simple_interval()),
        }
    }

    /// Stop after `ticks` ticks
    pub fn with_limit(mut self, ticks: u64) -> Self {
        self.limit = Some(ticks);
        self
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    pub fn limit(&self) -> Option<u64> {
        self.limit
    }

    /// Tick the engine until the limit, a stop, or Ctrl-C
    ///
    /// `on_frame` runs after every tick that changed the buffers, with the tick
    /// count so far. An error from it stops the engine and ends the loop.
    pub async fn run<F, E>(&self, engine: &mut AnimationEngine, on_frame: F) -> Result<TickSummary, E>
    where
        F: FnMut(u64, &AnimationEngine) -> Result<(), E>,
    {
        self.run_until(engine, tokio::signal::ctrl_c(), on_frame).await
    }

    /// Same as [`run`](Self::run), but interrupted when `shutdown` completes
    pub async fn run_until<S, F, E>(
        &self,
        engine: &mut AnimationEngine,
        shutdown: S,
        mut on_frame: F,
    ) -> Result<TickSummary, E>
    where
        S: Future,
        F: FnMut(u64, &AnimationEngine) -> Result<(), E>,
    {
        let mut interval = tokio::time::interval(self.interval);
        interval.set_missed_tick_behavior(MissedTickBehavior::Skip);

        tokio::pin!(shutdown);

        tracing::debug!(interval_ms = self.interval.as_millis() as u64, limit = ?self.limit, "tick loop started");

        let mut ticks = 0;
        let reason = loop {
            if self.limit.is_some_and(|limit| ticks >= limit) {
                break StopReason::Limit;
            }
            if !engine.is_running() {
                break StopReason::Stopped;
            }

            tokio::select! {
                _ = &mut shutdown => {
                    tracing::info!("Interrupted, stopping animation");
                    engine.stop();
                    break StopReason::Interrupted;
                }
                _ = interval.tick() => {
                    ticks += 1;
                    if engine.on_tick()
                        && let Err(e) = on_frame(ticks, engine)
                    {
                        engine.stop();
                        return Err(e);
                    }
                }
            }
        };

        tracing::debug!(ticks, ?reason, "tick loop finished");
        Ok(TickSummary { ticks, reason })
    }
}

/// Deliver `ticks` ticks back to back, without a timer
///
/// Returns the number of ticks that changed the buffers.
pub fn advance(engine: &mut AnimationEngine, ticks: u64) -> u64 {
    (0..ticks).filter(|_| engine.on_tick()).count() as u64
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::curve::CurveParameters;
    use crate::engine::{AnimationState, EngineConfig, Mode};

    fn animated(tail_length: usize) -> AnimationEngine {
        let config = EngineConfig {
            tail_length,
            ..EngineConfig::default()
        };
        let mut engine = AnimationEngine::new(config, CurveParameters::default());
        engine.set_mode(Mode::Animated);
        engine
    }

    #[test]
    fn test_profiles_use_configured_intervals() {
        let settings = TimerSettings::default();
        assert_eq!(
            Ticker::from_settings(&settings, TickProfile::Animated).interval(),
            Duration::from_millis(10)
        );
        assert_eq!(
            Ticker::from_settings(&settings, TickProfile::Simple).interval(),
            Duration::from_millis(40)
        );
        assert_eq!(Ticker::new(Duration::ZERO).interval(), Duration::from_millis(1));
    }

    #[test]
    fn test_advance_without_timer() {
        let mut engine = animated(10);
        assert_eq!(advance(&mut engine, 12), 12);
        assert_eq!(engine.state(), AnimationState::Sliding);

        engine.stop();
        assert_eq!(advance(&mut engine, 5), 0);
    }

    #[tokio::test]
    async fn test_run_until_limit() {
        let mut engine = animated(5);
        let mut seen = Vec::new();

        let summary = Ticker::new(Duration::from_millis(1))
            .with_limit(8)
            .run(&mut engine, |tick, engine| {
                seen.push((tick, engine.len()));
                Ok::<_, std::convert::Infallible>(())
            })
            .await
            .unwrap();

        assert_eq!(summary, TickSummary { ticks: 8, reason: StopReason::Limit });
        assert_eq!(seen.len(), 8);
        assert_eq!(seen[0], (1, 1));
        assert_eq!(seen[7], (8, 5));
        assert_eq!(engine.state(), AnimationState::Sliding);
    }

    #[tokio::test]
    async fn test_frozen_engine_needs_no_ticks() {
        let mut engine = AnimationEngine::new(EngineConfig::default(), CurveParameters::default());
        engine.set_mode(Mode::Frozen);

        let summary = Ticker::new(Duration::from_millis(1))
            .run(&mut engine, |_, _| Ok::<_, std::convert::Infallible>(()))
            .await
            .unwrap();

        assert_eq!(summary, TickSummary { ticks: 0, reason: StopReason::Stopped });
    }

    #[tokio::test]
    async fn test_shutdown_signal_interrupts() {
        let mut engine = animated(5);
        let (tx, rx) = tokio::sync::oneshot::channel::<()>();
        let mut tx = Some(tx);

        // The next tick is far away, so only the signal can end the loop
        let summary = Ticker::new(Duration::from_secs(60))
            .with_limit(100)
            .run_until(&mut engine, rx, |_, _| {
                if let Some(tx) = tx.take() {
                    let _ = tx.send(());
                }
                Ok::<_, std::convert::Infallible>(())
            })
            .await
            .unwrap();

        assert_eq!(summary, TickSummary { ticks: 1, reason: StopReason::Interrupted });
        assert!(!engine.is_running());
        assert_eq!(engine.len(), 1);
        assert!(!engine.on_tick());
    }

    #[tokio::test]
    async fn test_callback_error_stops_engine() {
        let mut engine = animated(5);

        let result = Ticker::new(Duration::from_millis(1))
            .with_limit(100)
            .run(&mut engine, |tick, _| if tick == 3 { Err("disk full") } else { Ok(()) })
            .await;

        assert_eq!(result, Err("disk full"));
        assert!(!engine.is_running());
        assert_eq!(engine.len(), 3);
    }
}

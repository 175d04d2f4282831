use std::time::Duration;

use log::debug;

use crate::util::RandomSource;
use crate::{SimulationEngine, StepOutcome};

/// Timer that fires engine steps. Hosts implement this over whatever timer
/// they have; the engine never reads the clock itself.
pub trait Clock {
    fn start(&mut self, interval: Duration);

    /// Reprogram the period. Called whenever the tick interval changes.
    fn reschedule(&mut self, interval: Duration);

    fn stop(&mut self);
}

/// Glue between a clock and an engine: starts the clock at the engine's
/// interval and keeps it in sync after each step.
#[derive(Debug, Default)]
pub struct GameLoop {
    running: bool,
}

impl GameLoop {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn start<R: RandomSource, C: Clock>(&mut self, engine: &SimulationEngine<R>, clock: &mut C) {
        if engine.is_terminated() {
            return;
        }
        clock.start(engine.tick_interval());
        self.running = true;
    }

    /// Run one step; call this from the clock's callback.
    pub fn tick<R: RandomSource, C: Clock>(
        &mut self,
        engine: &mut SimulationEngine<R>,
        clock: &mut C,
    ) -> StepOutcome {
        let outcome = engine.step();
        if !self.running {
            return outcome;
        }

        if let Some(interval) = outcome.reschedule() {
            debug!("Rescheduling clock to {:?}", interval);
            clock.reschedule(interval);
        }
        if outcome.terminated.is_some() {
            clock.stop();
            self.running = false;
        }
        outcome
    }

    pub fn stop<C: Clock>(&mut self, clock: &mut C) {
        if self.running {
            clock.stop();
            self.running = false;
        }
    }

    pub fn is_running(&self) -> bool {
        self.running
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClockEvent {
    Started(Duration),
    Rescheduled(Duration),
    Stopped,
}

/// Clock that only records what it was asked to do. Steps are driven by hand.
#[derive(Debug, Default)]
pub struct ManualClock {
    pub events: Vec<ClockEvent>,
    pub interval: Option<Duration>,
}

impl ManualClock {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_running(&self) -> bool {
        self.interval.is_some()
    }
}

impl Clock for ManualClock {
    fn start(&mut self, interval: Duration) {
        self.events.push(ClockEvent::Started(interval));
        self.interval = Some(interval);
    }

    fn reschedule(&mut self, interval: Duration) {
        self.events.push(ClockEvent::Rescheduled(interval));
        self.interval = Some(interval);
    }

    fn stop(&mut self) {
        self.events.push(ClockEvent::Stopped);
        self.interval = None;
    }
}

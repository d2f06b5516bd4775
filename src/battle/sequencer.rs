//! Timed two-turn battle run.
//!
//! The sequencer owns no clock. Callers feed it elapsed time through
//! [`BattleSequencer::advance`] and render the [`SequencerEvent`]s it returns.
//! The countdown and the typing reveal run side by side; whichever finishes
//! first ends the run.

use super::PerSide;
use crate::types::{BattleConfig, Side, Turn};
use serde::Serialize;
use std::time::Duration;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum BattlePhase {
    #[default]
    Idle,
    TurnLeft,
    TurnRight,
    Ended,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum EndReason {
    /// The countdown reached zero
    Countdown,
    /// Both verses were fully revealed
    TurnsComplete,
}

/// What the page should change after a sequencer step
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum SequencerEvent {
    StartControl {
        enabled: bool,
    },
    VotingControls {
        enabled: bool,
    },
    TurnChanged {
        side: Side,
    },
    /// Characters revealed in this step, to append to the side's display
    Reveal {
        side: Side,
        text: String,
    },
    Timer {
        remaining_secs: u64,
        display: String,
        urgent: bool,
    },
    Ended {
        reason: EndReason,
    },
}

/// Format whole seconds as `mm:ss`
pub fn format_clock(secs: u64) -> String {
    format!("{:02}:{:02}", secs / 60, secs % 60)
}

fn ceil_secs(duration: Duration) -> u64 {
    let secs = duration.as_secs();
    if duration.subsec_nanos() > 0 {
        secs + 1
    } else {
        secs
    }
}

#[derive(Debug, Clone)]
pub struct BattleSequencer {
    config: BattleConfig,
    phase: BattlePhase,
    /// Verses captured when the run started
    script: PerSide<Vec<char>>,
    /// Characters of the active side already revealed
    revealed: usize,
    /// Elapsed time not yet spent on revealing characters
    reveal_budget: Duration,
    remaining: Duration,
}

impl BattleSequencer {
    pub fn new(config: BattleConfig) -> Self {
        Self {
            remaining: config.duration,
            config,
            phase: BattlePhase::Idle,
            script: PerSide::default(),
            revealed: 0,
            reveal_budget: Duration::ZERO,
        }
    }

    pub fn config(&self) -> &BattleConfig {
        &self.config
    }

    pub fn phase(&self) -> BattlePhase {
        self.phase
    }

    pub fn is_running(&self) -> bool {
        matches!(self.phase, BattlePhase::TurnLeft | BattlePhase::TurnRight)
    }

    pub fn remaining(&self) -> Duration {
        self.remaining
    }

    pub fn current_turn(&self) -> Turn {
        match self.phase {
            BattlePhase::TurnLeft => Turn::Left,
            BattlePhase::TurnRight => Turn::Right,
            BattlePhase::Idle | BattlePhase::Ended => Turn::None,
        }
    }

    /// Begin a run with the given verses. Does nothing while a run is active.
    pub fn start(&mut self, left: &str, right: &str) -> Vec<SequencerEvent> {
        if self.is_running() {
            return Vec::new();
        }

        self.script = PerSide::new(left.chars().collect(), right.chars().collect());
        self.remaining = self.config.duration;
        self.revealed = 0;
        self.reveal_budget = Duration::ZERO;
        self.phase = BattlePhase::TurnLeft;

        let mut events = vec![
            SequencerEvent::StartControl { enabled: false },
            SequencerEvent::VotingControls { enabled: false },
            SequencerEvent::TurnChanged { side: Side::Left },
            self.timer_event(ceil_secs(self.remaining)),
        ];
        // Empty verses have nothing to reveal
        self.reveal(&mut events);
        events
    }

    /// Move the run forward by `elapsed`
    pub fn advance(&mut self, elapsed: Duration) -> Vec<SequencerEvent> {
        let mut events = Vec::new();
        if !self.is_running() {
            return events;
        }

        let step = elapsed.min(self.remaining);
        self.reveal_budget += step;
        self.reveal(&mut events);
        if !self.is_running() {
            return events;
        }

        let before = ceil_secs(self.remaining);
        self.remaining -= step;
        let after = ceil_secs(self.remaining);
        for secs in (after..before).rev() {
            events.push(self.timer_event(secs));
        }

        if self.remaining.is_zero() {
            self.finish(EndReason::Countdown, &mut events);
        }
        events
    }

    /// Force the countdown to zero
    pub fn expire(&mut self) -> Vec<SequencerEvent> {
        let mut events = Vec::new();
        if !self.is_running() {
            return events;
        }

        self.remaining = Duration::ZERO;
        events.push(self.timer_event(0));
        self.finish(EndReason::Countdown, &mut events);
        events
    }

    fn active_side(&self) -> Option<Side> {
        match self.phase {
            BattlePhase::TurnLeft => Some(Side::Left),
            BattlePhase::TurnRight => Some(Side::Right),
            BattlePhase::Idle | BattlePhase::Ended => None,
        }
    }

    /// Spend the reveal budget on characters, switching turns as verses run out
    fn reveal(&mut self, events: &mut Vec<SequencerEvent>) {
        while let Some(side) = self.active_side() {
            let verse = self.script.get(side);
            let left_to_reveal = verse.len() - self.revealed;

            let count = if self.config.reveal_interval.is_zero() {
                left_to_reveal
            } else {
                let affordable =
                    self.reveal_budget.as_nanos() / self.config.reveal_interval.as_nanos();
                let count = usize::try_from(affordable)
                    .unwrap_or(usize::MAX)
                    .min(left_to_reveal);
                let spent = self.config.reveal_interval.as_nanos() * count as u128;
                self.reveal_budget = self
                    .reveal_budget
                    .saturating_sub(Duration::from_nanos(spent as u64));
                count
            };

            if count > 0 {
                let text: String = verse[self.revealed..self.revealed + count].iter().collect();
                self.revealed += count;
                events.push(SequencerEvent::Reveal { side, text });
            }

            if self.revealed < self.script.get(side).len() {
                break;
            }

            // This side is done
            self.revealed = 0;
            match side {
                Side::Left => {
                    self.phase = BattlePhase::TurnRight;
                    events.push(SequencerEvent::TurnChanged { side: Side::Right });
                }
                Side::Right => self.finish(EndReason::TurnsComplete, events),
            }
        }
    }

    fn finish(&mut self, reason: EndReason, events: &mut Vec<SequencerEvent>) {
        tracing::info!(?reason, "Battle ended");

        self.phase = BattlePhase::Ended;
        self.remaining = self.config.duration;
        self.revealed = 0;
        self.reveal_budget = Duration::ZERO;

        events.push(SequencerEvent::Ended { reason });
        events.push(SequencerEvent::VotingControls { enabled: true });
        events.push(SequencerEvent::Timer {
            remaining_secs: ceil_secs(self.config.duration),
            display: format_clock(ceil_secs(self.config.duration)),
            urgent: false,
        });
        events.push(SequencerEvent::StartControl { enabled: true });
    }

    fn timer_event(&self, remaining_secs: u64) -> SequencerEvent {
        SequencerEvent::Timer {
            remaining_secs,
            display: format_clock(remaining_secs),
            urgent: Duration::from_secs(remaining_secs) <= self.config.urgent_threshold,
        }
    }
}

use super::{Arena, Notice};
use serde::{Deserialize, Serialize};

/// Which controls on the battle page are usable right now
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ControlState {
    pub compose: bool,
    pub clear: bool,
    pub preview: bool,
    pub convert: bool,
    pub vote: bool,
    pub react: bool,
    pub comment: bool,
    pub category_select: bool,
    pub start: bool,
    pub avatar_overlays_visible: bool,
}

impl Arena {
    /// Flip spectator mode and describe the new mode
    pub fn toggle_spectator(&mut self) -> Notice {
        self.spectator = !self.spectator;
        tracing::info!(arena = %self.id, spectator = self.spectator, "Spectator mode toggled");

        if self.spectator {
            Notice::info("Spectator mode enabled - Vote and comment only 👀")
        } else {
            Notice::info("Spectator mode disabled - Full access mode 🎤")
        }
    }

    pub fn controls(&self) -> ControlState {
        let interactive = !self.spectator;
        let running = self.sequencer.is_running();

        ControlState {
            compose: interactive,
            clear: interactive,
            preview: interactive,
            convert: interactive,
            vote: interactive && !self.tally.has_voted && !running,
            react: interactive,
            comment: true,
            category_select: interactive,
            start: !running,
            avatar_overlays_visible: interactive,
        }
    }
}

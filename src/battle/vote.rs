use super::{Arena, Notice, UiError, UiResult};
use crate::types::Side;
use serde::{Deserialize, Serialize};

/// Votes cast on this page. One vote per session.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct VoteTally {
    pub left_count: u32,
    pub right_count: u32,
    pub has_voted: bool,
}

impl VoteTally {
    pub fn total(&self) -> u32 {
        self.left_count.saturating_add(self.right_count)
    }

    /// Record a vote, refusing any after the first
    pub fn record(&mut self, side: Side) -> UiResult<()> {
        if self.has_voted {
            return Err(UiError::AlreadyVoted);
        }
        match side {
            Side::Left => self.left_count = self.left_count.saturating_add(1),
            Side::Right => self.right_count = self.right_count.saturating_add(1),
        }
        self.has_voted = true;
        Ok(())
    }

    /// Left and right share in percent; they always add up to 100.
    ///
    /// With no votes the indicator sits in the middle.
    pub fn percentages(&self) -> (u8, u8) {
        let total = u64::from(self.left_count) + u64::from(self.right_count);
        if total == 0 {
            return (50, 50);
        }
        // round(left / total * 100), halves rounded up
        let left = (200 * u64::from(self.left_count) + total) / (2 * total);
        let left = left as u8;
        (left, 100 - left)
    }

    /// Width of the proportional indicator's left fill, in percent
    pub fn indicator_width(&self) -> u8 {
        self.percentages().0
    }
}

impl Arena {
    /// Vote for one side of the battle
    pub fn cast_vote(&mut self, side: Side) -> UiResult<Notice> {
        self.ensure_not_spectator("Voting")?;
        if self.tally.has_voted {
            return Err(UiError::AlreadyVoted);
        }
        if self.sequencer.is_running() {
            return Err(UiError::BattleInProgress);
        }

        self.tally.record(side)?;
        let (left, right) = self.tally.percentages();
        tracing::info!(
            arena = %self.id,
            ?side,
            left_percent = left,
            right_percent = right,
            "Vote cast"
        );

        Ok(Notice::success(format!(
            "Voted for {}! 🎤",
            self.rapper_name(side)
        )))
    }
}

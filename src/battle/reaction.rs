use super::{Arena, Notice, UiResult};
use crate::types::Reaction;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Reaction counts; they only ever go up
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReactionCounts(BTreeMap<Reaction, u32>);

impl Default for ReactionCounts {
    fn default() -> Self {
        Self(Reaction::ALL.into_iter().map(|r| (r, 0)).collect())
    }
}

impl ReactionCounts {
    pub fn get(&self, reaction: Reaction) -> u32 {
        self.0.get(&reaction).copied().unwrap_or(0)
    }

    pub fn increment(&mut self, reaction: Reaction) -> u32 {
        let count = self.0.entry(reaction).or_insert(0);
        *count = count.saturating_add(1);
        *count
    }

    pub fn iter(&self) -> impl Iterator<Item = (Reaction, u32)> + '_ {
        self.0.iter().map(|(r, c)| (*r, *c))
    }
}

impl Arena {
    pub fn react(&mut self, reaction: Reaction) -> UiResult<Notice> {
        self.ensure_not_spectator("Reacting")?;
        let count = self.reactions.increment(reaction);
        tracing::debug!(?reaction, count, "Reaction added");
        Ok(Notice::info(format!("{} x{}", reaction.emoji(), count)))
    }
}

//! Boundary between an [`Arena`] and whatever displays it.

use super::sequencer::SequencerEvent;
use super::ticker::Ticker;
use super::{Arena, Notice, UiError, UiResult};
use crate::types::{Category, Reaction, Side, Voice};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Duration;

/// Display elements a battle run writes into
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Anchor {
    Timer,
    Progress,
    TurnIndicator,
}

impl Anchor {
    pub const ALL: [Anchor; 3] = [Anchor::Timer, Anchor::Progress, Anchor::TurnIndicator];
}

impl fmt::Display for Anchor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Anchor::Timer => "timer",
            Anchor::Progress => "progress",
            Anchor::TurnIndicator => "turn indicator",
        };
        f.write_str(name)
    }
}

pub trait BattleView: Send {
    fn has_anchor(&self, anchor: Anchor) -> bool;

    fn apply(&mut self, event: &SequencerEvent);

    fn notify(&mut self, notice: &Notice);
}

/// Drives an arena and reports every outcome to its view.
///
/// Failed operations never propagate; the view gets an error notice instead.
pub struct ArenaController<V> {
    arena: Arena,
    view: V,
}

impl<V: BattleView> ArenaController<V> {
    /// Attach a view. Refuses views that lack any of the battle anchors.
    pub fn new(arena: Arena, view: V) -> UiResult<Self> {
        if let Some(missing) = Anchor::ALL.into_iter().find(|a| !view.has_anchor(*a)) {
            tracing::error!(anchor = %missing, arena = %arena.id, "Battle view incomplete");
            return Err(UiError::MissingAnchor(missing));
        }
        Ok(Self { arena, view })
    }

    pub fn arena(&self) -> &Arena {
        &self.arena
    }

    pub fn view(&self) -> &V {
        &self.view
    }

    pub fn into_parts(self) -> (Arena, V) {
        (self.arena, self.view)
    }

    fn report(&mut self, result: UiResult<Notice>) -> bool {
        match result {
            Ok(notice) => {
                self.view.notify(&notice);
                true
            }
            Err(err) => {
                tracing::debug!(kind = err.kind(), error = %err, "Action rejected");
                self.view.notify(&Notice::from(&err));
                false
            }
        }
    }

    fn render(&mut self, events: Vec<SequencerEvent>) {
        for event in &events {
            self.view.apply(event);
        }
    }

    pub fn select_category(&mut self, category: Category) -> bool {
        let result = self.arena.select_category(category);
        self.report(result)
    }

    pub fn select_voice(&mut self, side: Side, voice: Voice) {
        self.arena.select_voice(side, voice);
    }

    pub fn toggle_spectator(&mut self) {
        let notice = self.arena.toggle_spectator();
        self.view.notify(&notice);
    }

    pub fn type_text(&mut self, side: Side, text: &str) -> bool {
        match self.arena.type_text(side, text) {
            Ok(()) => true,
            Err(err) => self.report(Err(err)),
        }
    }

    pub fn focus(&mut self, side: Side) {
        self.arena.focus(side);
    }

    pub fn append_suggestion(&mut self, side: Side, line: &str) -> bool {
        let result = self.arena.append_suggestion(side, line);
        self.report(result)
    }

    pub fn append_to_focused(&mut self, line: &str) -> bool {
        let result = self.arena.append_to_focused(line);
        self.report(result)
    }

    pub fn clear(&mut self, side: Side) -> bool {
        let result = self.arena.clear(side);
        self.report(result)
    }

    pub fn preview(&mut self, side: Side) -> bool {
        let result = self.arena.preview(side);
        self.report(result)
    }

    pub fn cast_vote(&mut self, side: Side) -> bool {
        let result = self.arena.cast_vote(side);
        self.report(result)
    }

    pub fn react(&mut self, reaction: Reaction) -> bool {
        let result = self.arena.react(reaction);
        self.report(result)
    }

    pub fn post_comment(&mut self, text: &str) -> bool {
        let result = self.arena.post_comment(text);
        self.report(result)
    }

    pub fn like_comment(&mut self, id: &str) -> bool {
        let result = self.arena.like_comment(id);
        self.report(result)
    }

    pub fn start_battle(&mut self) -> bool {
        match self.arena.start_battle() {
            Ok(events) => {
                self.render(events);
                true
            }
            Err(err) => self.report(Err(err)),
        }
    }

    pub fn advance(&mut self, elapsed: Duration) {
        let events = self.arena.advance(elapsed);
        self.render(events);
    }

    pub fn expire_battle(&mut self) {
        let events = self.arena.expire_battle();
        self.render(events);
    }

    /// Start a battle and tick it until it ends
    pub async fn run_battle<T: Ticker + ?Sized>(&mut self, ticker: &mut T) -> bool {
        if !self.start_battle() {
            return false;
        }
        while self.arena.sequencer().is_running() {
            let elapsed = ticker.tick().await;
            self.advance(elapsed);
        }
        true
    }
}

//! Battle page state.
//!
//! An [`Arena`] holds everything one battle screen knows about: category,
//! verses, votes, reactions, comments, spectator mode and the timed battle
//! run. It has
//! no I/O. Operations return a [`Notice`] for the page to show, or a
//! [`UiError`] which the page also shows as a notice.

pub mod catalog;
mod comment;
mod reaction;
pub mod sequencer;
mod spectator;
pub mod ticker;
mod verse;
pub mod view;
mod vote;

use rand::Rng;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::types::*;
use catalog::{RapperPair, Suggestions};
use sequencer::{BattleSequencer, SequencerEvent};

pub use comment::{Comment, CommentId, CommentThread};
pub use reaction::ReactionCounts;
pub use spectator::ControlState;
pub use verse::{ConversionDraft, VerseBuffer};
pub use view::{Anchor, ArenaController, BattleView};
pub use vote::VoteTally;

/// A value per battle side
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PerSide<T> {
    pub left: T,
    pub right: T,
}

impl<T> PerSide<T> {
    pub fn new(left: T, right: T) -> Self {
        Self { left, right }
    }

    pub fn get(&self, side: Side) -> &T {
        match side {
            Side::Left => &self.left,
            Side::Right => &self.right,
        }
    }

    pub fn get_mut(&mut self, side: Side) -> &mut T {
        match side {
            Side::Left => &mut self.left,
            Side::Right => &mut self.right,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NoticeLevel {
    Info,
    Success,
    Error,
}

/// Transient message for the user
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Notice {
    pub level: NoticeLevel,
    pub message: String,
}

impl Notice {
    pub fn info(message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Info,
            message: message.into(),
        }
    }

    pub fn success(message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Success,
            message: message.into(),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Error,
            message: message.into(),
        }
    }
}

impl fmt::Display for Notice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

/// Client-side guard failures. Always recovered locally as a notice.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum UiError {
    #[error("{0} is disabled in spectator mode 👀")]
    SpectatorMode(&'static str),

    #[error("You have already voted! 🎭")]
    AlreadyVoted,

    #[error("Voting opens when the battle ends ⏳")]
    BattleInProgress,

    #[error("No verse to preview! Write something first 📝")]
    EmptyVerse,

    #[error("Please enter text to convert")]
    NothingToConvert,

    #[error("Write a verse before starting the battle 📝")]
    NothingToBattle,

    #[error("No verse data found in drop")]
    EmptySuggestion,

    #[error("Please write something first! 📝")]
    EmptyComment,

    #[error("Comment {0} not found")]
    UnknownComment(String),

    #[error("Battle display is missing its {0} element")]
    MissingAnchor(Anchor),
}

impl UiError {
    pub fn kind(&self) -> &'static str {
        "ui_precondition_failed"
    }
}

impl From<&UiError> for Notice {
    fn from(err: &UiError) -> Self {
        Notice::error(err.to_string())
    }
}

pub type UiResult<T> = Result<T, UiError>;

/// State of one battle page session
#[derive(Debug, Clone)]
pub struct Arena {
    pub id: String,
    category: Category,
    pair: RapperPair,
    suggestions: Suggestions,
    verses: PerSide<VerseBuffer>,
    voices: PerSide<Voice>,
    /// Target of click-to-append
    focus: Side,
    tally: VoteTally,
    reactions: ReactionCounts,
    comments: CommentThread,
    spectator: bool,
    sequencer: BattleSequencer,
}

impl Arena {
    pub fn new(config: BattleConfig) -> Self {
        Self::with_rng(config, &mut rand::rng())
    }

    /// Build an arena with the first category selected, drawing its
    /// suggestion lines from `rng`
    pub fn with_rng<R: Rng + ?Sized>(config: BattleConfig, rng: &mut R) -> Self {
        let category = Category::ALL[0];
        Self {
            id: ulid::Ulid::new().to_string(),
            category,
            pair: catalog::rapper_pair(category),
            suggestions: catalog::draw_suggestions(category, rng),
            verses: PerSide::default(),
            voices: PerSide::new(Side::Left.default_voice(), Side::Right.default_voice()),
            focus: Side::Left,
            tally: VoteTally::default(),
            reactions: ReactionCounts::default(),
            comments: CommentThread::default(),
            spectator: false,
            sequencer: BattleSequencer::new(config),
        }
    }

    pub fn category(&self) -> Category {
        self.category
    }

    pub fn pair(&self) -> &RapperPair {
        &self.pair
    }

    pub fn rapper_name(&self, side: Side) -> &str {
        match side {
            Side::Left => &self.pair.left.name,
            Side::Right => &self.pair.right.name,
        }
    }

    pub fn suggestions(&self) -> &Suggestions {
        &self.suggestions
    }

    pub fn is_spectator(&self) -> bool {
        self.spectator
    }

    pub fn tally(&self) -> &VoteTally {
        &self.tally
    }

    pub fn reactions(&self) -> &ReactionCounts {
        &self.reactions
    }

    pub fn sequencer(&self) -> &BattleSequencer {
        &self.sequencer
    }

    pub fn time_remaining(&self) -> std::time::Duration {
        self.sequencer.remaining()
    }

    pub fn current_turn(&self) -> Turn {
        self.sequencer.current_turn()
    }

    pub fn voice(&self, side: Side) -> Voice {
        *self.voices.get(side)
    }

    pub fn select_voice(&mut self, side: Side, voice: Voice) {
        tracing::debug!(side = side.label(), voice = voice.id(), "Voice changed");
        *self.voices.get_mut(side) = voice;
    }

    /// Switch category, rapper pair and suggestion lines
    pub fn select_category(&mut self, category: Category) -> UiResult<Notice> {
        self.select_category_with(category, &mut rand::rng())
    }

    pub fn select_category_with<R: Rng + ?Sized>(
        &mut self,
        category: Category,
        rng: &mut R,
    ) -> UiResult<Notice> {
        self.ensure_not_spectator("Switching categories")?;

        self.category = category;
        self.pair = catalog::rapper_pair(category);
        self.suggestions = catalog::draw_suggestions(category, rng);
        tracing::debug!(%category, "Category selected");

        Ok(Notice::info(format!("Switched to {} mode! 🎤", category)))
    }

    /// Start a battle run from the current verses.
    ///
    /// Starting while a run is active changes nothing and yields no events.
    pub fn start_battle(&mut self) -> UiResult<Vec<SequencerEvent>> {
        if self.sequencer.is_running() {
            tracing::debug!("Battle already running, ignoring start");
            return Ok(Vec::new());
        }
        if self.verses.left.is_blank() && self.verses.right.is_blank() {
            return Err(UiError::NothingToBattle);
        }

        tracing::info!(arena = %self.id, category = %self.category, "Battle started");
        Ok(self
            .sequencer
            .start(self.verses.left.text(), self.verses.right.text()))
    }

    /// Feed elapsed time into the running battle
    pub fn advance(&mut self, elapsed: std::time::Duration) -> Vec<SequencerEvent> {
        self.sequencer.advance(elapsed)
    }

    /// Force the countdown to zero
    pub fn expire_battle(&mut self) -> Vec<SequencerEvent> {
        self.sequencer.expire()
    }

    fn ensure_not_spectator(&self, action: &'static str) -> UiResult<()> {
        if self.spectator {
            Err(UiError::SpectatorMode(action))
        } else {
            Ok(())
        }
    }
}

impl Default for Arena {
    fn default() -> Self {
        Self::new(BattleConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use std::time::Duration;

    fn arena() -> Arena {
        Arena::with_rng(BattleConfig::default(), &mut StdRng::seed_from_u64(1))
    }

    #[test]
    fn test_new_arena_defaults() {
        let arena = arena();

        assert_eq!(arena.category(), Category::Roast);
        assert_eq!(arena.rapper_name(Side::Left), "Raftaar");
        assert_eq!(arena.rapper_name(Side::Right), "2Pac");
        assert_eq!(arena.voice(Side::Left), Voice::EnInRohan);
        assert_eq!(arena.voice(Side::Right), Voice::EnInAarav);
        assert_eq!(arena.current_turn(), Turn::None);
        assert_eq!(arena.time_remaining(), Duration::from_secs(120));
        assert!(!arena.is_spectator());
        assert_eq!(arena.tally().total(), 0);
    }

    #[test]
    fn test_select_category_switches_pair() {
        let mut arena = arena();
        let mut rng = StdRng::seed_from_u64(3);

        let notice = arena
            .select_category_with(Category::Funny, &mut rng)
            .unwrap();

        assert_eq!(notice.message, "Switched to funny mode! 🎤");
        assert_eq!(arena.category(), Category::Funny);
        assert_eq!(arena.rapper_name(Side::Left), "Tyler");
        assert_eq!(arena.rapper_name(Side::Right), "MC Stan");

        let pool = catalog::suggestion_pool(Category::Funny);
        assert!(pool.hinglish.contains(&arena.suggestions().hinglish));
        assert!(pool.english.contains(&arena.suggestions().english));
    }

    #[test]
    fn test_select_category_blocked_for_spectators() {
        let mut arena = arena();
        arena.toggle_spectator();

        let result = arena.select_category(Category::Freestyle);
        assert!(matches!(result, Err(UiError::SpectatorMode(_))));
        assert_eq!(arena.category(), Category::Roast);
    }

    #[test]
    fn test_start_battle_requires_a_verse() {
        let mut arena = arena();
        assert_eq!(arena.start_battle(), Err(UiError::NothingToBattle));

        arena.type_text(Side::Right, "only the right side").unwrap();
        let events = arena.start_battle().unwrap();
        assert!(!events.is_empty());
        assert!(arena.sequencer().is_running());
    }

    #[test]
    fn test_start_battle_twice_is_noop() {
        let mut arena = arena();
        arena.type_text(Side::Left, "first").unwrap();
        arena.start_battle().unwrap();
        arena.advance(Duration::from_millis(100));

        let remaining = arena.time_remaining();
        let turn = arena.current_turn();
        assert!(arena.start_battle().unwrap().is_empty());
        assert_eq!(arena.time_remaining(), remaining);
        assert_eq!(arena.current_turn(), turn);
    }

    #[test]
    fn test_ui_errors_become_error_notices() {
        let notice = Notice::from(&UiError::AlreadyVoted);
        assert_eq!(notice.level, NoticeLevel::Error);
        assert_eq!(notice.message, "You have already voted! 🎭");
        assert_eq!(UiError::EmptyVerse.kind(), "ui_precondition_failed");
    }

    #[test]
    fn test_spectator_gating_leaves_state_untouched() {
        let mut arena = arena();
        arena.type_text(Side::Left, "bars").unwrap();
        arena.react(Reaction::Fire).unwrap();
        arena.toggle_spectator();

        let verses_before = arena.verses.clone();
        let tally_before = arena.tally().clone();
        let reactions_before = arena.reactions().clone();

        let results = [
            arena.type_text(Side::Left, "overwrite").map(|_| ()),
            arena.append_suggestion(Side::Left, "new line").map(|_| ()),
            arena.clear(Side::Left).map(|_| ()),
            arena.preview(Side::Left).map(|_| ()),
            arena.conversion_request(Side::Left).map(|_| ()),
            arena.cast_vote(Side::Left).map(|_| ()),
            arena.react(Reaction::Fire).map(|_| ()),
        ];

        for result in results {
            assert!(matches!(result, Err(UiError::SpectatorMode(_))));
        }
        assert_eq!(arena.verses, verses_before);
        assert_eq!(arena.tally(), &tally_before);
        assert_eq!(arena.reactions(), &reactions_before);
    }
}

use super::{Arena, Notice, UiError, UiResult};
use crate::types::{Side, Voice};
use serde::{Deserialize, Serialize};

/// Editable verse text for one side, plus its rendered preview
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct VerseBuffer {
    text: String,
    preview: Option<String>,
}

impl VerseBuffer {
    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn preview(&self) -> Option<&str> {
        self.preview.as_deref()
    }

    pub fn is_blank(&self) -> bool {
        self.text.trim().is_empty()
    }

    pub fn set_text(&mut self, text: &str) {
        self.text = text.to_string();
    }

    /// Append a line so that it starts on its own line
    pub fn append_line(&mut self, line: &str) {
        if !self.text.is_empty() && !self.text.ends_with('\n') {
            self.text.push('\n');
        }
        self.text.push_str(line);
        if self.preview.is_some() {
            self.preview = Some(self.text.clone());
        }
    }

    pub fn clear(&mut self) {
        self.text.clear();
        self.preview = None;
    }

    /// Render the text verbatim. Returns false, hiding any old preview, when
    /// there is nothing but whitespace to show.
    pub fn render_preview(&mut self) -> bool {
        if self.is_blank() {
            self.preview = None;
            false
        } else {
            self.preview = Some(self.text.clone());
            true
        }
    }
}

/// Text and voice ready to send to the relay
#[derive(Debug, Clone, PartialEq)]
pub struct ConversionDraft {
    pub text: String,
    pub voice: Voice,
}

impl Arena {
    pub fn verse(&self, side: Side) -> &VerseBuffer {
        self.verses.get(side)
    }

    pub fn focused_side(&self) -> Side {
        self.focus
    }

    /// Choose which side click-to-append writes into
    pub fn focus(&mut self, side: Side) {
        self.focus = side;
    }

    /// Direct typing into a verse box
    pub fn type_text(&mut self, side: Side, text: &str) -> UiResult<()> {
        self.ensure_not_spectator("Writing verses")?;
        self.verses.get_mut(side).set_text(text);
        Ok(())
    }

    /// Drop a suggestion line into a verse
    pub fn append_suggestion(&mut self, side: Side, line: &str) -> UiResult<Notice> {
        self.insert_line(side, line)?;
        Ok(Notice::success(format!("Verse added to {}! 🎤", side.label())))
    }

    /// Click-to-append into the focused verse
    pub fn append_to_focused(&mut self, line: &str) -> UiResult<Notice> {
        let side = self.focus;
        self.insert_line(side, line)?;
        Ok(Notice::success(format!("Line added to {}! ✍️", side.label())))
    }

    fn insert_line(&mut self, side: Side, line: &str) -> UiResult<()> {
        self.ensure_not_spectator("Adding lines")?;
        if line.is_empty() {
            return Err(UiError::EmptySuggestion);
        }
        self.verses.get_mut(side).append_line(line);
        tracing::debug!(side = side.label(), "Suggestion line added");
        Ok(())
    }

    pub fn clear(&mut self, side: Side) -> UiResult<Notice> {
        self.ensure_not_spectator("Clearing verses")?;
        self.verses.get_mut(side).clear();
        Ok(Notice::info("Verse cleared! 🗑️"))
    }

    pub fn preview(&mut self, side: Side) -> UiResult<Notice> {
        self.ensure_not_spectator("Previewing verses")?;
        if self.verses.get_mut(side).render_preview() {
            Ok(Notice::info("Verse previewed! 👀"))
        } else {
            Err(UiError::EmptyVerse)
        }
    }

    /// Gather what the convert control of `side` would send
    pub fn conversion_request(&self, side: Side) -> UiResult<ConversionDraft> {
        self.ensure_not_spectator("Converting verses")?;
        let verse = self.verses.get(side);
        if verse.is_blank() {
            return Err(UiError::NothingToConvert);
        }
        Ok(ConversionDraft {
            text: verse.text().trim().to_string(),
            voice: self.voice(side),
        })
    }
}

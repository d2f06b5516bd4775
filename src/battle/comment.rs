use super::{Arena, Notice, UiError, UiResult};
use serde::{Deserialize, Serialize};

/// Author shown on comments posted from this page
pub const LOCAL_AUTHOR: &str = "User";

pub type CommentId = String;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Comment {
    pub id: CommentId,
    pub author: String,
    pub text: String,
    /// Display label, either a clock time or a relative age
    pub time: String,
    pub likes: u32,
    pub ts: String,
}

impl Comment {
    fn new(author: &str, text: &str, time: String) -> Self {
        Self {
            id: ulid::Ulid::new().to_string(),
            author: author.to_string(),
            text: text.to_string(),
            time,
            likes: 0,
            ts: chrono::Utc::now().to_rfc3339(),
        }
    }
}

/// Comments under the battle, newest first
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CommentThread(Vec<Comment>);

impl Default for CommentThread {
    /// A fresh page is never empty
    fn default() -> Self {
        Self(vec![
            Comment::new("RapFan123", "This battle is 🔥", "5m ago".to_string()),
            Comment::new(
                "BeatMaster",
                "Both rappers are killing it!",
                "10m ago".to_string(),
            ),
        ])
    }
}

impl CommentThread {
    pub fn iter(&self) -> impl Iterator<Item = &Comment> {
        self.0.iter()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn get(&self, id: &str) -> Option<&Comment> {
        self.0.iter().find(|c| c.id == id)
    }

    /// Put a comment at the top of the thread
    pub fn post(&mut self, author: &str, text: &str, time: String) -> &Comment {
        self.0.insert(0, Comment::new(author, text, time));
        &self.0[0]
    }

    /// Add one like, returning the new count
    pub fn like(&mut self, id: &str) -> Option<u32> {
        let comment = self.0.iter_mut().find(|c| c.id == id)?;
        comment.likes = comment.likes.saturating_add(1);
        Some(comment.likes)
    }
}

impl Arena {
    pub fn comments(&self) -> &CommentThread {
        &self.comments
    }

    /// Post a comment as the local user. Spectators may comment.
    pub fn post_comment(&mut self, text: &str) -> UiResult<Notice> {
        let text = text.trim();
        if text.is_empty() {
            return Err(UiError::EmptyComment);
        }

        let time = chrono::Local::now().format("%H:%M").to_string();
        let comment = self.comments.post(LOCAL_AUTHOR, text, time);
        tracing::debug!(arena = %self.id, comment = %comment.id, "Comment posted");
        Ok(Notice::success("Comment posted! 💬"))
    }

    pub fn like_comment(&mut self, id: &str) -> UiResult<Notice> {
        match self.comments.like(id) {
            Some(likes) => {
                tracing::debug!(comment = id, likes, "Comment liked");
                Ok(Notice::success("Comment liked! 👍"))
            }
            None => Err(UiError::UnknownComment(id.to_string())),
        }
    }
}

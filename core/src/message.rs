use alloc::string::String;
use serde::{Deserialize, Serialize};

use crate::*;

/// Banner shown over the grid at the end of a round.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    text: Option<String>,
    token: u64,
}

impl Message {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn text(&self) -> Option<&str> {
        self.text.as_deref()
    }

    pub fn is_visible(&self) -> bool {
        self.text.is_some()
    }

    /// Displays `text` and returns the deferred event that hides it again
    /// after `duration_ms`.
    pub fn show(&mut self, text: impl Into<String>, duration_ms: u32) -> Command {
        self.token = self.token.wrapping_add(1);
        self.text = Some(text.into());
        Command::Schedule {
            delay_ms: duration_ms,
            event: Event::MessageElapsed { token: self.token },
        }
    }

    /// Returns whether anything was on screen.
    pub fn hide(&mut self) -> bool {
        self.text.take().is_some()
    }

    /// Auto-hide for the message shown with `token`; later messages are left alone.
    pub fn expire(&mut self, token: u64) -> bool {
        if token == self.token {
            self.hide()
        } else {
            false
        }
    }
}

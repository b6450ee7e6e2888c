use core::fmt;
use serde::{Deserialize, Serialize};

/// What is printed on a card.
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Face {
    Value(u16),
    /// Lone card that fills an odd grid and has no pair.
    Filler,
}

impl Face {
    pub const fn is_filler(self) -> bool {
        matches!(self, Self::Filler)
    }
}

impl fmt::Display for Face {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Value(value) => write!(f, "{value}"),
            Self::Filler => f.write_str("end"),
        }
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Card {
    face: Face,
    active: bool,
}

impl Card {
    pub const fn new(face: Face) -> Self {
        Self {
            face,
            active: false,
        }
    }

    pub const fn face(&self) -> Face {
        self.face
    }

    pub const fn is_active(&self) -> bool {
        self.active
    }

    pub fn set_active(&mut self, active: bool) {
        self.active = active;
    }

    /// Turns the card face up and hands back its face, or `None` when it is
    /// already face up.
    pub fn click(&mut self) -> Option<Face> {
        if self.active {
            return None;
        }
        self.active = true;
        Some(self.face)
    }
}

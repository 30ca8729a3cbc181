use std::fmt;
use std::str::FromStr;

use crate::{Result, Side, Step, UndoTree};

/// A move through the history as seen in a tree view where the root is at the top and older
/// branches are to the left.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "arbitrary", derive(arbitrary::Arbitrary))]
pub enum Direction {
    /// Towards the root (undo).
    Up,
    /// Towards the leaves along the preferred branch (redo).
    Down,
    /// To the older sibling.
    Left,
    /// To the newer sibling.
    Right,
}

impl FromStr for Direction {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "up" => Ok(Direction::Up),
            "down" => Ok(Direction::Down),
            "left" => Ok(Direction::Left),
            "right" => Ok(Direction::Right),
            _ => Err(format!("unknown direction `{s}`")),
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Direction::Up => write!(f, "up"),
            Direction::Down => write!(f, "down"),
            Direction::Left => write!(f, "left"),
            Direction::Right => write!(f, "right"),
        }
    }
}

impl UndoTree {
    #[inline]
    pub fn navigate(&mut self, direction: Direction) -> Result<Step> {
        match direction {
            Direction::Up => self.undo(),
            Direction::Down => self.redo(),
            Direction::Left => self.move_branch(Side::Left),
            Direction::Right => self.move_branch(Side::Right),
        }
    }
}

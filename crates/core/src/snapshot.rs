use serde::Serialize;

use crate::types::{BlockId, Difficulty, GameMode, MatchCentroid, MatchOutcome};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct BlockSnapshot {
    pub id: BlockId,
    pub value: u8,
    pub row: u8,
    pub col: u8,
    pub selected: bool,
    /// Sitting in one of the top danger rows.
    pub endangered: bool,
}

/// Owned, serializable copy of everything a presentation layer may query.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GameSnapshot {
    pub mode: Option<GameMode>,
    pub difficulty: Difficulty,
    pub rows: u8,
    pub cols: u8,
    pub blocks: Vec<BlockSnapshot>,
    pub selected: Vec<BlockId>,
    pub selection_sum: u32,
    pub outcome: MatchOutcome,
    pub target: u32,
    pub score: u32,
    pub combo: u32,
    pub time_left: u32,
    pub processing: bool,
    pub game_over: bool,
    pub episode_id: u32,
    pub last_match_pos: Option<MatchCentroid>,
}

impl GameSnapshot {
    /// Menu state: no game running
    pub fn in_menu(&self) -> bool {
        self.mode.is_none()
    }

    pub fn playable(&self) -> bool {
        self.mode.is_some() && !self.game_over && !self.processing
    }

    pub fn block_at(&self, row: u8, col: u8) -> Option<&BlockSnapshot> {
        self.blocks.iter().find(|b| b.row == row && b.col == col)
    }
}

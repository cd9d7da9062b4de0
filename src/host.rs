//! Host configuration and the keyboard session that turns input into commands.

use std::env;

use rand::RngCore;

use crate::core::{GameState, IdSource};
use crate::input::{Cursor, InputAction};
use crate::term::CursorPos;
use crate::types::{Difficulty, GameCommand};

/// Host settings that are not engine rules
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HostConfig {
    /// Fixed RNG seed for reproducible games; entropy when unset
    pub seed: Option<u64>,
    /// Difficulty preselected in the menu
    pub difficulty: Difficulty,
    /// JSON-lines log destination; logging is off when unset
    pub log_path: Option<String>,
}

impl HostConfig {
    /// Create from environment variables
    ///
    /// - `SUMFALL_SEED`: u64 seed
    /// - `SUMFALL_DIFFICULTY`: `slow`, `medium` or `fast`
    /// - `SUMFALL_LOG_PATH`: log file path
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Same as [`HostConfig::from_env`] with an injectable variable lookup.
    ///
    /// Unparseable values fall back to the defaults.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let seed = lookup("SUMFALL_SEED").and_then(|s| s.trim().parse().ok());

        let difficulty = lookup("SUMFALL_DIFFICULTY")
            .and_then(|s| Difficulty::from_str(s.trim()))
            .unwrap_or_default();

        let log_path = lookup("SUMFALL_LOG_PATH")
            .map(|s| s.trim().to_string())
            .and_then(|s| if s.is_empty() { None } else { Some(s) });

        Self {
            seed,
            difficulty,
            log_path,
        }
    }
}

/// Keyboard play state that lives outside the engine: the cursor and the
/// difficulty chosen in the menu.
#[derive(Debug, Clone)]
pub struct Session {
    cursor: Cursor,
    difficulty: Difficulty,
}

impl Session {
    pub fn new(rows: u8, cols: u8, difficulty: Difficulty) -> Self {
        Self {
            cursor: Cursor::new(rows, cols),
            difficulty,
        }
    }

    pub fn cursor(&self) -> Cursor {
        self.cursor
    }

    pub fn difficulty(&self) -> Difficulty {
        self.difficulty
    }

    /// Cursor position to draw, `None` while in the menu
    pub fn cursor_pos<R: RngCore, I: IdSource>(&self, game: &GameState<R, I>) -> Option<CursorPos> {
        game.is_active().then(|| CursorPos {
            row: self.cursor.row(),
            col: self.cursor.col(),
        })
    }

    /// Translate one input action into an engine command, if any
    pub fn command_for<R: RngCore, I: IdSource>(
        &mut self,
        game: &GameState<R, I>,
        action: InputAction,
    ) -> Option<GameCommand> {
        if self.cursor.apply(action) {
            return None;
        }

        match action {
            InputAction::Select => {
                let block = game.grid().block_at(self.cursor.row(), self.cursor.col())?;
                Some(GameCommand::Toggle(block.id))
            }
            InputAction::Start(mode) if !game.is_active() => {
                Some(GameCommand::Start(mode, self.difficulty))
            }
            InputAction::CycleDifficulty if !game.is_active() => {
                self.difficulty = self.difficulty.next();
                None
            }
            InputAction::Restart => Some(GameCommand::Restart),
            InputAction::Menu if game.is_active() => Some(GameCommand::Reset),
            _ => None,
        }
    }

    /// Handle one input action end to end. Returns `true` if the engine accepted a command.
    pub fn handle<R: RngCore, I: IdSource>(
        &mut self,
        game: &mut GameState<R, I>,
        action: InputAction,
    ) -> bool {
        let Some(command) = self.command_for(game, action) else {
            return false;
        };

        let accepted = game.apply_command(command);
        if accepted && matches!(command, GameCommand::Start(..) | GameCommand::Restart) {
            let config = game.config();
            self.cursor = Cursor::new(config.rows, config.cols);
        }
        if !accepted {
            log::trace!("command rejected: {:?}", command);
        }
        accepted
    }
}

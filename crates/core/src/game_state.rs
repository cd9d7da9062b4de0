//! Game state module - manages the complete game state
//!
//! This module ties together all core components: grid, selection, RNG and
//! scoring. It owns the game lifecycle (menu, running, game over), the match and
//! overshoot presentation delays, and the time-mode countdown.
//!
//! Two ways to drive it:
//!
//! - Call [`GameState::advance`] every frame with the elapsed milliseconds. It
//!   owns the pending delays and turns wall-clock time into countdown steps.
//! - Or schedule things yourself: [`GameState::tick`] once per second in time
//!   mode, [`GameState::resolve_match`] after the confirm delay and
//!   [`GameState::clear_overshoot`] after the overshoot delay.

use arrayvec::ArrayVec;
use rand::RngCore;

use crate::config::{ConfigError, EngineConfig};
use crate::grid::{Grid, InjectOutcome};
use crate::rng::{BlockSpawner, IdSource, SequentialIds, SimpleRng};
use crate::scoring::score_match;
use crate::selection::{evaluate, Selection};
use crate::snapshot::{BlockSnapshot, GameSnapshot};
use crate::types::*;

/// Upper bound on events reported by a single [`GameState::advance`] call.
pub const MAX_EVENTS_PER_ADVANCE: usize = 8;

pub type EngineEvents = ArrayVec<EngineEvent, MAX_EVENTS_PER_ADVANCE>;

/// Something that happened during [`GameState::advance`]
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum EngineEvent {
    MatchResolved(MatchEvent),
    OvershootCleared,
    RowInjected,
    GameOver,
    /// The last-match centroid was cleared
    FeedbackExpired,
}

/// Result of one countdown step
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickOutcome {
    /// Not in a running time-mode game, or suspended by the processing guard
    Idle,
    /// Countdown decremented
    Counted,
    RowInjected,
    GameOver,
}

/// Resolution waiting for its presentation delay.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Pending {
    ResolveMatch { remaining_ms: u32 },
    ClearOvershoot { remaining_ms: u32 },
}

/// Complete game state
#[derive(Debug, Clone)]
pub struct GameState<R = SimpleRng, I = SequentialIds> {
    config: EngineConfig,
    spawner: BlockSpawner<R, I>,
    /// `None` is the menu: no game running.
    mode: Option<GameMode>,
    difficulty: Difficulty,
    grid: Grid,
    selection: Selection,
    target: u32,
    score: u32,
    combo: u32,
    /// Seconds until the next forced row (time mode).
    time_left: u32,
    /// Set while a match or overshoot waits for its delay; rejects toggles and
    /// suspends the countdown.
    processing: bool,
    game_over: bool,
    /// Monotonic game id (increments on every start).
    episode_id: u32,
    pending: Option<Pending>,
    /// Wall-clock time accumulated toward the next countdown step.
    countdown_ms: u32,
    last_match_pos: Option<MatchCentroid>,
    /// Remaining lifetime of `last_match_pos`; 0 means not counting down.
    feedback_ms: u32,
    /// Last match event (consumed by observers).
    last_event: Option<MatchEvent>,
}

impl GameState<SimpleRng, SequentialIds> {
    /// Create an engine in the menu state with the reference config and a seeded RNG
    pub fn new(seed: u32) -> Self {
        Self::build(
            EngineConfig::default(),
            BlockSpawner::new(SimpleRng::new(seed), SequentialIds::new()),
        )
    }

    pub fn with_config(config: EngineConfig, seed: u32) -> Result<Self, ConfigError> {
        Self::with_sources(config, SimpleRng::new(seed), SequentialIds::new())
    }
}

impl<R: RngCore, I: IdSource> GameState<R, I> {
    /// Create an engine with caller-supplied randomness and id sources
    pub fn with_sources(config: EngineConfig, rng: R, ids: I) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self::build(config, BlockSpawner::new(rng, ids)))
    }

    fn build(config: EngineConfig, spawner: BlockSpawner<R, I>) -> Self {
        let difficulty = Difficulty::default();
        Self {
            grid: Grid::empty(config.rows, config.cols),
            config,
            spawner,
            mode: None,
            difficulty,
            selection: Selection::new(),
            target: 0,
            score: 0,
            combo: 0,
            time_left: difficulty.seconds_per_row(),
            processing: false,
            game_over: false,
            episode_id: 0,
            pending: None,
            countdown_ms: 0,
            last_match_pos: None,
            feedback_ms: 0,
            last_event: None,
        }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn mode(&self) -> Option<GameMode> {
        self.mode
    }

    pub fn difficulty(&self) -> Difficulty {
        self.difficulty
    }

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    pub fn selection(&self) -> &Selection {
        &self.selection
    }

    pub fn selected_ids(&self) -> &[BlockId] {
        self.selection.ids()
    }

    pub fn target(&self) -> u32 {
        self.target
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn combo(&self) -> u32 {
        self.combo
    }

    pub fn time_left(&self) -> u32 {
        self.time_left
    }

    pub fn is_processing(&self) -> bool {
        self.processing
    }

    pub fn is_game_over(&self) -> bool {
        self.game_over
    }

    /// A game is running or finished (not in the menu)
    pub fn is_active(&self) -> bool {
        self.mode.is_some()
    }

    pub fn episode_id(&self) -> u32 {
        self.episode_id
    }

    pub fn last_match_pos(&self) -> Option<MatchCentroid> {
        self.last_match_pos
    }

    pub fn selection_sum(&self) -> u32 {
        self.selection.sum(&self.grid)
    }

    /// Classification of the current selection
    pub fn outcome(&self) -> MatchOutcome {
        evaluate(&self.grid, &self.selection, self.target)
    }

    /// Whether a block sits in the top danger rows
    pub fn is_endangered(&self, id: BlockId) -> bool {
        self.grid
            .block(id)
            .map_or(false, |b| b.row < self.config.danger_rows)
    }

    /// Take and clear the last match event.
    pub fn take_last_event(&mut self) -> Option<MatchEvent> {
        self.last_event.take()
    }

    pub fn snapshot(&self) -> GameSnapshot {
        let blocks = self
            .grid
            .blocks()
            .iter()
            .map(|b| BlockSnapshot {
                id: b.id,
                value: b.value,
                row: b.row,
                col: b.col,
                selected: self.selection.contains(b.id),
                endangered: self.is_endangered(b.id),
            })
            .collect();

        GameSnapshot {
            mode: self.mode,
            difficulty: self.difficulty,
            rows: self.grid.rows(),
            cols: self.grid.cols(),
            blocks,
            selected: self.selection.ids().to_vec(),
            selection_sum: self.selection_sum(),
            outcome: self.outcome(),
            target: self.target,
            score: self.score,
            combo: self.combo,
            time_left: self.time_left,
            processing: self.processing,
            game_over: self.game_over,
            episode_id: self.episode_id,
            last_match_pos: self.last_match_pos,
        }
    }

    /// Start a fresh game. Always succeeds.
    pub fn start(&mut self, mode: GameMode, difficulty: Difficulty) {
        let grid = Grid::initialize(
            self.config.rows,
            self.config.cols,
            self.config.initial_rows,
            &mut self.spawner,
        );
        let target = self
            .spawner
            .roll_target(self.config.target_min, self.config.target_max);
        self.begin(mode, difficulty, grid, target);
    }

    /// Start a game from a prepared grid and target (puzzles, replays, tests)
    pub fn start_from(
        &mut self,
        mode: GameMode,
        difficulty: Difficulty,
        grid: Grid,
        target: u32,
    ) -> Result<(), ConfigError> {
        if grid.rows() != self.config.rows || grid.cols() != self.config.cols {
            return Err(ConfigError::GridMismatch {
                rows: self.config.rows,
                cols: self.config.cols,
                got_rows: grid.rows(),
                got_cols: grid.cols(),
            });
        }
        if target == 0 {
            return Err(ConfigError::ZeroTarget);
        }
        for block in grid.blocks() {
            self.spawner.reserve_id(block.id);
        }
        self.begin(mode, difficulty, grid, target);
        Ok(())
    }

    fn begin(&mut self, mode: GameMode, difficulty: Difficulty, grid: Grid, target: u32) {
        self.episode_id = self.episode_id.wrapping_add(1);
        self.mode = Some(mode);
        self.difficulty = difficulty;
        self.grid = grid;
        self.selection.clear();
        self.target = target;
        self.score = 0;
        self.combo = 0;
        self.time_left = difficulty.seconds_per_row();
        self.processing = false;
        self.game_over = false;
        self.pending = None;
        self.countdown_ms = 0;
        self.last_match_pos = None;
        self.feedback_ms = 0;
        self.last_event = None;

        log::debug!(
            "episode {} started: mode={} difficulty={} target={} blocks={}",
            self.episode_id,
            mode.as_str(),
            difficulty.as_str(),
            target,
            self.grid.len()
        );
    }

    /// Start again with the current mode and difficulty
    ///
    /// Returns `false` in the menu state, where there is nothing to restart.
    pub fn restart(&mut self) -> bool {
        match self.mode {
            Some(mode) => {
                self.start(mode, self.difficulty);
                true
            }
            None => false,
        }
    }

    /// Back to the menu; discards grid, score and selection
    pub fn reset(&mut self) {
        self.mode = None;
        self.grid = Grid::empty(self.config.rows, self.config.cols);
        self.selection.clear();
        self.target = 0;
        self.score = 0;
        self.combo = 0;
        self.time_left = self.difficulty.seconds_per_row();
        self.processing = false;
        self.game_over = false;
        self.pending = None;
        self.countdown_ms = 0;
        self.last_match_pos = None;
        self.feedback_ms = 0;
        self.last_event = None;

        log::debug!("episode {} discarded, back to menu", self.episode_id);
    }

    /// Dispatch a command. Returns `false` when it was rejected as a no-op.
    pub fn apply_command(&mut self, command: GameCommand) -> bool {
        match command {
            GameCommand::Start(mode, difficulty) => {
                self.start(mode, difficulty);
                true
            }
            GameCommand::Toggle(id) => self.toggle(id).is_some(),
            GameCommand::Restart => self.restart(),
            GameCommand::Reset => {
                self.reset();
                true
            }
        }
    }

    /// Flip a block in or out of the selection and classify the result.
    ///
    /// Returns `None` when the toggle was rejected: no game, game over, a
    /// resolution in flight, or an id that is not on the grid.
    ///
    /// - `Exact` arms the match confirm delay and sets the processing guard.
    /// - `Over` arms the overshoot clear delay and sets the processing guard.
    /// - `Under` has no side effect.
    pub fn toggle(&mut self, id: BlockId) -> Option<MatchOutcome> {
        if self.mode.is_none() || self.game_over || self.processing {
            return None;
        }
        if !self.grid.contains(id) {
            return None;
        }

        self.selection.toggle(id);
        let outcome = evaluate(&self.grid, &self.selection, self.target);

        match outcome {
            MatchOutcome::Exact => {
                self.processing = true;
                self.countdown_ms = 0;
                self.last_match_pos = self.selection.centroid(&self.grid);
                self.feedback_ms = 0;
                self.pending = Some(Pending::ResolveMatch {
                    remaining_ms: self.config.match_confirm_ms,
                });
            }
            MatchOutcome::Over => {
                self.processing = true;
                self.countdown_ms = 0;
                self.pending = Some(Pending::ClearOvershoot {
                    remaining_ms: self.config.overshoot_clear_ms,
                });
            }
            MatchOutcome::Under => {}
        }

        Some(outcome)
    }

    /// Resolve the pending exact match.
    ///
    /// Stale calls (no match pending, game over) are no-ops returning `None`.
    pub fn resolve_match(&mut self) -> Option<MatchEvent> {
        if self.game_over || !matches!(self.pending, Some(Pending::ResolveMatch { .. })) {
            return None;
        }
        let mode = self.mode?;
        self.pending = None;

        let centroid = self
            .last_match_pos
            .or_else(|| self.selection.centroid(&self.grid))
            .unwrap_or(MatchCentroid { x: 0.0, y: 0.0 });
        let matched: Vec<BlockId> = self.selection.ids().to_vec();

        let scored = score_match(matched.len(), self.combo);
        self.combo = scored.combo;
        self.score = self.score.saturating_add(scored.points);

        let removed = self.grid.remove_and_compact(&matched);
        self.selection.clear();

        let row_injected =
            mode == GameMode::Classic && self.inject_row() == InjectOutcome::Injected;

        if !self.game_over {
            self.target = self
                .spawner
                .roll_target(self.config.target_min, self.config.target_max);
            if mode == GameMode::Time {
                self.time_left = self.difficulty.seconds_per_row();
            }
        }

        self.countdown_ms = 0;
        self.processing = false;
        self.feedback_ms = self.config.match_feedback_ms;
        if self.feedback_ms == 0 {
            self.last_match_pos = None;
        }

        let event = MatchEvent {
            blocks_removed: removed as u32,
            points: scored.points,
            combo: scored.combo,
            centroid,
            row_injected,
            game_over: self.game_over,
        };
        self.last_event = Some(event);

        log::debug!(
            "match resolved: {} blocks, +{} points, combo {}, next target {}",
            removed,
            scored.points,
            scored.combo,
            self.target
        );

        Some(event)
    }

    /// Clear an over-target selection and break the combo.
    ///
    /// Returns `false` when no overshoot is pending.
    pub fn clear_overshoot(&mut self) -> bool {
        if self.game_over || !matches!(self.pending, Some(Pending::ClearOvershoot { .. })) {
            return false;
        }
        self.pending = None;
        self.selection.clear();
        self.combo = 0;
        self.processing = false;
        self.countdown_ms = 0;
        true
    }

    /// One countdown step (one second) in time mode.
    ///
    /// When the countdown would reach zero a row is injected instead and the
    /// countdown restarts at the difficulty interval.
    pub fn tick(&mut self) -> TickOutcome {
        if self.mode != Some(GameMode::Time) || self.game_over || self.processing {
            return TickOutcome::Idle;
        }

        if self.time_left > 1 {
            self.time_left -= 1;
            return TickOutcome::Counted;
        }

        self.time_left = self.difficulty.seconds_per_row();
        match self.inject_row() {
            InjectOutcome::Injected => TickOutcome::RowInjected,
            InjectOutcome::GameOver => TickOutcome::GameOver,
        }
    }

    /// Fixed-timestep driver: run pending delays and the countdown.
    pub fn advance(&mut self, elapsed_ms: u32) -> EngineEvents {
        let mut events = EngineEvents::new();
        if self.mode.is_none() {
            return events;
        }

        if self.feedback_ms > 0 {
            self.feedback_ms = self.feedback_ms.saturating_sub(elapsed_ms);
            if self.feedback_ms == 0 {
                self.last_match_pos = None;
                push_event(&mut events, EngineEvent::FeedbackExpired);
            }
        }

        if self.game_over {
            return events;
        }

        match self.pending {
            Some(Pending::ResolveMatch { remaining_ms }) => {
                if elapsed_ms >= remaining_ms {
                    if let Some(event) = self.resolve_match() {
                        push_event(&mut events, EngineEvent::MatchResolved(event));
                        if event.game_over {
                            push_event(&mut events, EngineEvent::GameOver);
                        }
                    }
                } else {
                    self.pending = Some(Pending::ResolveMatch {
                        remaining_ms: remaining_ms - elapsed_ms,
                    });
                }
                return events;
            }
            Some(Pending::ClearOvershoot { remaining_ms }) => {
                if elapsed_ms >= remaining_ms {
                    if self.clear_overshoot() {
                        push_event(&mut events, EngineEvent::OvershootCleared);
                    }
                } else {
                    self.pending = Some(Pending::ClearOvershoot {
                        remaining_ms: remaining_ms - elapsed_ms,
                    });
                }
                return events;
            }
            None => {}
        }

        if self.mode == Some(GameMode::Time) {
            self.countdown_ms = self.countdown_ms.saturating_add(elapsed_ms);
            while self.countdown_ms >= COUNTDOWN_STEP_MS {
                self.countdown_ms -= COUNTDOWN_STEP_MS;
                match self.tick() {
                    TickOutcome::RowInjected => push_event(&mut events, EngineEvent::RowInjected),
                    TickOutcome::GameOver => {
                        push_event(&mut events, EngineEvent::GameOver);
                        break;
                    }
                    TickOutcome::Counted | TickOutcome::Idle => {}
                }
            }
        }

        events
    }

    /// Push a row in and apply its side effects (combo break or game over)
    fn inject_row(&mut self) -> InjectOutcome {
        let outcome = self.grid.inject_row(&mut self.spawner);
        match outcome {
            InjectOutcome::Injected => {
                self.combo = 0;
                log::debug!("row injected, {} blocks on grid", self.grid.len());
            }
            InjectOutcome::GameOver => {
                self.game_over = true;
                self.processing = false;
                self.pending = None;
                self.countdown_ms = 0;
                log::info!(
                    "game over: episode {} final score {}",
                    self.episode_id,
                    self.score
                );
            }
        }
        outcome
    }
}

// State is always applied; only the notification is dropped past capacity.
fn push_event(events: &mut EngineEvents, event: EngineEvent) {
    let _ = events.try_push(event);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grid::Block;

    /// Build a settled grid from rows of values listed top to bottom and
    /// anchored to the bottom of the board. `0` leaves a cell empty.
    fn layout(rows: u8, cols: u8, values: &[&[u8]]) -> Grid {
        let mut blocks = Vec::new();
        let mut id = 0;
        let first_row = rows as usize - values.len();
        for (r, line) in values.iter().enumerate() {
            for (c, &v) in line.iter().enumerate() {
                if v == 0 {
                    continue;
                }
                id += 1;
                blocks.push(Block {
                    id: BlockId(id),
                    value: v,
                    row: (first_row + r) as u8,
                    col: c as u8,
                });
            }
        }
        Grid::from_blocks(rows, cols, blocks).unwrap()
    }

    fn id_at(state: &GameState, row: u8, col: u8) -> BlockId {
        state.grid().block_at(row, col).unwrap().id
    }

    fn started(mode: GameMode, target: u32, values: &[&[u8]]) -> GameState {
        let mut state = GameState::new(12345);
        let grid = layout(10, 6, values);
        state
            .start_from(mode, Difficulty::Medium, grid, target)
            .unwrap();
        state
    }

    #[test]
    fn test_new_state_is_menu() {
        let mut state = GameState::new(1);
        assert!(!state.is_active());
        assert!(state.grid().is_empty());
        assert_eq!(state.toggle(BlockId(1)), None);
        assert_eq!(state.tick(), TickOutcome::Idle);
        assert!(state.advance(5000).is_empty());
    }

    #[test]
    fn test_start_builds_fresh_game() {
        let mut state = GameState::new(7);
        state.start(GameMode::Time, Difficulty::Fast);

        assert_eq!(state.mode(), Some(GameMode::Time));
        assert_eq!(state.grid().len(), 24);
        assert!((10..=24).contains(&state.target()));
        assert_eq!(state.time_left(), 5);
        assert_eq!(state.score(), 0);
        assert_eq!(state.combo(), 0);
        assert!(!state.is_processing());
        assert!(!state.is_game_over());
        assert_eq!(state.episode_id(), 1);
    }

    #[test]
    fn test_same_seed_same_game() {
        let mut a = GameState::new(99);
        let mut b = GameState::new(99);
        a.start(GameMode::Classic, Difficulty::Medium);
        b.start(GameMode::Classic, Difficulty::Medium);
        assert_eq!(a.grid(), b.grid());
        assert_eq!(a.target(), b.target());
    }

    #[test]
    fn test_toggle_unknown_id_is_rejected() {
        let mut state = started(GameMode::Classic, 15, &[&[1, 2, 3, 4, 5, 6]]);
        assert_eq!(state.toggle(BlockId(999)), None);
        assert!(state.selection().is_empty());
    }

    #[test]
    fn test_under_has_no_side_effects() {
        let mut state = started(GameMode::Time, 15, &[&[1, 2, 3, 4, 5, 6]]);
        let a = id_at(&state, 9, 0);
        assert_eq!(state.toggle(a), Some(MatchOutcome::Under));
        assert!(!state.is_processing());
        assert_eq!(state.selection_sum(), 1);

        // Deselect again.
        assert_eq!(state.toggle(a), Some(MatchOutcome::Under));
        assert!(state.selection().is_empty());
    }

    #[test]
    fn test_exact_match_waits_for_confirm_delay() {
        let mut state = started(GameMode::Time, 15, &[&[4, 5, 6, 1, 1, 1]]);
        state.toggle(id_at(&state, 9, 0));
        state.toggle(id_at(&state, 9, 1));
        assert_eq!(state.toggle(id_at(&state, 9, 2)), Some(MatchOutcome::Exact));
        assert!(state.is_processing());
        let centroid = state.last_match_pos().unwrap();
        assert_eq!((centroid.x, centroid.y), (1.0, 9.0));

        // Further toggles are rejected while processing.
        assert_eq!(state.toggle(id_at(&state, 9, 3)), None);

        assert!(state.advance(249).is_empty());
        assert_eq!(state.grid().len(), 6);

        let events = state.advance(1);
        assert!(matches!(events[0], EngineEvent::MatchResolved(_)));
        assert_eq!(state.grid().len(), 3);
        assert_eq!(state.score(), 30);
        assert_eq!(state.combo(), 1);
        assert!(!state.is_processing());
        assert!(state.selection().is_empty());
    }

    #[test]
    fn test_resolve_without_pending_match_is_noop() {
        let mut state = started(GameMode::Classic, 15, &[&[4, 5, 6, 1, 1, 1]]);
        assert_eq!(state.resolve_match(), None);
        assert!(!state.clear_overshoot());
    }

    #[test]
    fn test_classic_match_injects_row_and_breaks_combo() {
        let mut state = started(GameMode::Classic, 15, &[&[4, 5, 6, 1, 1, 1]]);
        let survivor = id_at(&state, 9, 3);
        state.toggle(id_at(&state, 9, 0));
        state.toggle(id_at(&state, 9, 1));
        state.toggle(id_at(&state, 9, 2));

        let event = state.resolve_match().unwrap();
        assert!(event.row_injected);
        assert_eq!(event.points, 30);
        assert_eq!(event.combo, 1);
        assert_eq!(state.combo(), 0);
        assert_eq!(state.grid().len(), 9);
        assert_eq!(state.grid().block(survivor).unwrap().row, 8);
        assert!(state.grid().is_gravity_consistent());
        assert_eq!(state.take_last_event(), Some(event));
        assert_eq!(state.take_last_event(), None);
    }

    #[test]
    fn test_classic_match_with_full_column_ends_game() {
        // Column 0 is full to the top; matching in column 5 cannot free it.
        let mut values: Vec<&[u8]> = vec![&[9, 0, 0, 0, 0, 0]; 9];
        values.push(&[9, 0, 0, 0, 7, 8]);
        let mut state = started(GameMode::Classic, 15, &values);
        state.toggle(id_at(&state, 9, 4));
        assert_eq!(state.toggle(id_at(&state, 9, 5)), Some(MatchOutcome::Exact));

        let before_target = state.target();
        let event = state.resolve_match().unwrap();
        assert!(event.game_over);
        assert!(!event.row_injected);
        assert!(state.is_game_over());
        assert_eq!(state.score(), 20);
        assert_eq!(state.combo(), 1);
        assert_eq!(state.target(), before_target);
        assert_eq!(state.grid().len(), 10);
        assert!(!state.is_processing());
    }

    #[test]
    fn test_overshoot_clears_after_delay() {
        let mut state = started(GameMode::Time, 10, &[&[9, 8, 1, 1, 1, 1]]);
        state.combo = 3;
        state.toggle(id_at(&state, 9, 0));
        assert_eq!(state.toggle(id_at(&state, 9, 1)), Some(MatchOutcome::Over));
        assert!(state.is_processing());
        let grid_before = state.grid().clone();

        assert!(state.advance(149).is_empty());
        assert_eq!(state.selection().len(), 2);

        let events = state.advance(1);
        assert_eq!(events.as_slice(), &[EngineEvent::OvershootCleared]);
        assert!(state.selection().is_empty());
        assert_eq!(state.combo(), 0);
        assert_eq!(state.grid(), &grid_before);
        assert!(!state.is_processing());
    }

    #[test]
    fn test_time_mode_countdown_injects_on_zero() {
        let mut state = started(GameMode::Time, 20, &[&[1, 1, 1, 1, 1, 1]]);
        state.combo = 2;
        for expected in (1..8).rev() {
            assert_eq!(state.tick(), TickOutcome::Counted);
            assert_eq!(state.time_left(), expected);
        }
        assert_eq!(state.tick(), TickOutcome::RowInjected);
        assert_eq!(state.time_left(), 8);
        assert_eq!(state.grid().len(), 12);
        assert_eq!(state.combo(), 0);
    }

    #[test]
    fn test_tick_is_idle_in_classic_mode() {
        let mut state = started(GameMode::Classic, 20, &[&[1, 1, 1, 1, 1, 1]]);
        assert_eq!(state.tick(), TickOutcome::Idle);
        assert_eq!(state.time_left(), 8);
    }

    #[test]
    fn test_countdown_suspended_while_processing() {
        let mut state = started(GameMode::Time, 10, &[&[9, 1, 1, 1, 1, 1]]);
        state.toggle(id_at(&state, 9, 0));
        state.toggle(id_at(&state, 9, 1));
        assert!(state.is_processing());
        assert_eq!(state.tick(), TickOutcome::Idle);
        assert_eq!(state.time_left(), 8);
    }

    #[test]
    fn test_pending_overshoot_holds_countdown() {
        let mut state = started(GameMode::Time, 10, &[&[9, 8, 1, 1, 1, 1]]);
        for _ in 0..7 {
            state.advance(1000);
        }
        assert!(state.advance(900).is_empty());
        assert_eq!(state.time_left(), 1);

        state.toggle(id_at(&state, 9, 0));
        assert_eq!(state.toggle(id_at(&state, 9, 1)), Some(MatchOutcome::Over));

        // The clear window neither counts down nor accepts toggles.
        assert!(state.advance(100).is_empty());
        assert_eq!(state.time_left(), 1);
        assert_eq!(state.toggle(id_at(&state, 9, 2)), None);

        assert_eq!(state.advance(50).as_slice(), &[EngineEvent::OvershootCleared]);
        assert_eq!(state.time_left(), 1);
        assert_eq!(state.grid().len(), 6);

        // The partial second from before the overshoot is forfeited.
        assert!(state.advance(999).is_empty());
        assert_eq!(state.advance(1).as_slice(), &[EngineEvent::RowInjected]);
        assert_eq!(state.time_left(), 8);
    }

    #[test]
    fn test_advance_drives_countdown() {
        let mut state = started(GameMode::Time, 20, &[&[1, 1, 1, 1, 1, 1]]);
        for _ in 0..7 {
            assert!(state.advance(1000).is_empty());
        }
        assert_eq!(state.time_left(), 1);
        assert_eq!(state.advance(999).len(), 0);
        assert_eq!(state.advance(1).as_slice(), &[EngineEvent::RowInjected]);
        assert_eq!(state.time_left(), 8);
    }

    #[test]
    fn test_match_refreshes_countdown() {
        let mut state = started(GameMode::Time, 10, &[&[9, 1, 1, 1, 1, 1]]);
        state.tick();
        state.tick();
        assert_eq!(state.time_left(), 6);
        state.toggle(id_at(&state, 9, 0));
        state.toggle(id_at(&state, 9, 1));
        state.resolve_match().unwrap();
        assert_eq!(state.time_left(), 8);
    }

    #[test]
    fn test_time_mode_game_over_is_terminal() {
        let values: Vec<&[u8]> = vec![&[1, 2, 3, 4, 5, 6]; 10];
        let mut state = started(GameMode::Time, 10, &values);
        for _ in 0..7 {
            state.tick();
        }
        assert_eq!(state.tick(), TickOutcome::GameOver);
        assert!(state.is_game_over());
        assert_eq!(state.grid().len(), 60);

        assert_eq!(state.tick(), TickOutcome::Idle);
        assert_eq!(state.toggle(id_at(&state, 9, 0)), None);
        assert_eq!(state.resolve_match(), None);
        assert!(state.advance(10_000).is_empty());
    }

    #[test]
    fn test_combo_streak_scores_in_time_mode() {
        let mut state = started(
            GameMode::Time,
            10,
            &[&[5, 5, 0, 0, 0, 0], &[5, 5, 5, 5, 0, 0]],
        );

        // Pairs of 5 while the target stays reachable; force the target each round.
        let mut expected = 0;
        for round in 1..=3u32 {
            state.target = 10;
            let ids: Vec<BlockId> = state.grid().blocks().iter().take(2).map(|b| b.id).collect();
            state.toggle(ids[0]);
            assert_eq!(state.toggle(ids[1]), Some(MatchOutcome::Exact));
            state.resolve_match().unwrap();
            expected += 10 * 2 * round;
            assert_eq!(state.combo(), round);
            assert_eq!(state.score(), expected);
        }
    }

    #[test]
    fn test_centroid_expires_after_feedback() {
        let mut state = started(GameMode::Time, 10, &[&[9, 1, 1, 1, 1, 1]]);
        state.toggle(id_at(&state, 9, 0));
        state.toggle(id_at(&state, 9, 1));
        state.advance(250);
        assert!(state.last_match_pos().is_some());

        assert!(state.advance(499).is_empty());
        assert_eq!(state.advance(1).as_slice(), &[EngineEvent::FeedbackExpired]);
        assert_eq!(state.last_match_pos(), None);
    }

    #[test]
    fn test_reset_discards_everything() {
        let mut state = GameState::new(3);
        state.start(GameMode::Classic, Difficulty::Slow);
        let id = state.grid().blocks()[0].id;
        state.toggle(id);

        state.reset();
        assert_eq!(state.mode(), None);
        assert!(state.grid().is_empty());
        assert!(state.selection().is_empty());
        assert_eq!(state.score(), 0);
        assert!(!state.restart());
    }

    #[test]
    fn test_restart_keeps_mode_and_difficulty() {
        let mut state = GameState::new(3);
        state.start(GameMode::Time, Difficulty::Fast);
        assert!(state.restart());
        assert_eq!(state.mode(), Some(GameMode::Time));
        assert_eq!(state.difficulty(), Difficulty::Fast);
        assert_eq!(state.episode_id(), 2);
    }

    #[test]
    fn test_apply_command_dispatch() {
        let mut state = GameState::new(11);
        assert!(!state.apply_command(GameCommand::Restart));
        assert!(state.apply_command(GameCommand::Start(GameMode::Classic, Difficulty::Medium)));
        let id = state.grid().blocks()[0].id;
        assert!(state.apply_command(GameCommand::Toggle(id)));
        assert!(state.selection().contains(id));
        assert!(state.apply_command(GameCommand::Reset));
        assert!(!state.is_active());
    }

    #[test]
    fn test_start_from_validates_input() {
        let mut state = GameState::new(1);
        let small = layout(4, 6, &[&[1, 1, 1, 1, 1, 1]]);
        assert!(matches!(
            state.start_from(GameMode::Classic, Difficulty::Medium, small, 10),
            Err(ConfigError::GridMismatch { .. })
        ));

        let grid = layout(10, 6, &[&[1, 1, 1, 1, 1, 1]]);
        assert_eq!(
            state.start_from(GameMode::Classic, Difficulty::Medium, grid, 0),
            Err(ConfigError::ZeroTarget)
        );
    }

    #[test]
    fn test_injected_ids_never_collide_with_prepared_grid() {
        let mut state = started(GameMode::Time, 20, &[&[1, 1, 1, 1, 1, 1]]);
        for _ in 0..8 {
            state.tick();
        }
        let mut ids: Vec<BlockId> = state.grid().blocks().iter().map(|b| b.id).collect();
        ids.sort();
        ids.dedup();
        assert_eq!(ids.len(), 12);
    }

    #[test]
    fn test_snapshot_reflects_state() {
        let mut state = started(GameMode::Classic, 15, &[&[9, 0, 0, 0, 0, 0], &[4, 5, 6, 1, 1, 1]]);
        let top = id_at(&state, 8, 0);
        state.toggle(top);

        let snap = state.snapshot();
        assert_eq!(snap.mode, Some(GameMode::Classic));
        assert_eq!(snap.blocks.len(), 7);
        assert_eq!(snap.selected, vec![top]);
        assert_eq!(snap.selection_sum, 9);
        assert_eq!(snap.outcome, MatchOutcome::Under);
        assert!(snap.block_at(8, 0).unwrap().selected);
        assert!(!snap.block_at(8, 0).unwrap().endangered);
        assert!(snap.playable());
    }

    #[test]
    fn test_snapshot_flags_danger_rows() {
        let column: &[u8] = &[1, 0, 0, 0, 0, 0];
        let state = started(GameMode::Classic, 20, &[column; 9]);
        let top = id_at(&state, 1, 0);
        assert!(state.is_endangered(top));
        assert!(!state.is_endangered(id_at(&state, 2, 0)));

        let snap = state.snapshot();
        let flagged: Vec<u8> = snap
            .blocks
            .iter()
            .filter(|b| b.endangered)
            .map(|b| b.row)
            .collect();
        assert_eq!(flagged, vec![1]);
    }

    #[test]
    fn test_invalid_config_is_rejected() {
        let cfg = EngineConfig::with_dimensions(10, 0, 4);
        assert!(GameState::with_config(cfg, 1).is_err());
    }
}

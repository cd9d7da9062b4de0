//! GameView: maps a `core::GameSnapshot` into a terminal framebuffer.
//!
//! This module is pure (no I/O). It can be unit-tested.

use crate::core::{BlockSnapshot, GameSnapshot};
use crate::fb::{CellStyle, FrameBuffer, Rgb};
use crate::types::{Difficulty, GameMode, MatchOutcome};

const BOARD_BG: Rgb = Rgb::new(30, 30, 40);
const DANGER_BG: Rgb = Rgb::new(70, 25, 30);
const PANEL_BG: Rgb = Rgb::new(0, 0, 0);

/// Terminal viewport dimensions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Viewport {
    pub width: u16,
    pub height: u16,
}

impl Viewport {
    pub fn new(width: u16, height: u16) -> Self {
        Self { width, height }
    }
}

/// Board cell highlighted by the keyboard cursor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CursorPos {
    pub row: u8,
    pub col: u8,
}

/// A lightweight terminal renderer for the puzzle.
pub struct GameView {
    /// Board cell width in terminal columns.
    cell_w: u16,
    /// Board cell height in terminal rows.
    cell_h: u16,
    anchor_y: AnchorY,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnchorY {
    Center,
    Top,
}

impl Default for GameView {
    fn default() -> Self {
        // 3x1 leaves room for the digit plus cursor brackets.
        Self {
            cell_w: 3,
            cell_h: 1,
            anchor_y: AnchorY::Center,
        }
    }
}

impl GameView {
    pub fn new(cell_w: u16, cell_h: u16) -> Self {
        Self {
            cell_w: cell_w.max(1),
            cell_h: cell_h.max(1),
            anchor_y: AnchorY::Center,
        }
    }

    pub fn with_anchor_y(mut self, anchor_y: AnchorY) -> Self {
        self.anchor_y = anchor_y;
        self
    }

    /// Render the current game state into an existing framebuffer.
    ///
    /// Callers can reuse a framebuffer across frames; it is only resized when
    /// the terminal size changes.
    pub fn render_into(
        &self,
        snap: &GameSnapshot,
        cursor: Option<CursorPos>,
        viewport: Viewport,
        fb: &mut FrameBuffer,
    ) {
        fb.resize(viewport.width, viewport.height);
        fb.clear(CellStyle::default().cell(' '));

        if snap.in_menu() {
            self.draw_menu(fb, snap.difficulty, viewport);
            return;
        }

        let board_px_w = (snap.cols as u16) * self.cell_w;
        let board_px_h = (snap.rows as u16) * self.cell_h;
        let frame_w = board_px_w + 2;
        let frame_h = board_px_h + 2;

        let start_x = viewport.width.saturating_sub(frame_w) / 2;
        let start_y = match self.anchor_y {
            AnchorY::Center => viewport.height.saturating_sub(frame_h) / 2,
            AnchorY::Top => 0,
        };

        let border = CellStyle::fg_bg(Rgb::new(200, 200, 200), PANEL_BG);
        fb.fill_rect(
            start_x + 1,
            start_y + 1,
            board_px_w,
            board_px_h,
            ' ',
            CellStyle::fg_bg(Rgb::new(80, 80, 90), BOARD_BG),
        );
        self.draw_border(fb, start_x, start_y, frame_w, frame_h, border);

        for row in 0..snap.rows {
            for col in 0..snap.cols {
                match snap.block_at(row, col) {
                    Some(block) => self.draw_block(fb, start_x, start_y, block),
                    None => self.draw_empty_cell(fb, start_x, start_y, row, col),
                }
            }
        }

        if let Some(pos) = snap.last_match_pos {
            let col = pos.x.round() as u16;
            let row = pos.y.round() as u16;
            if col < snap.cols as u16 && row < snap.rows as u16 {
                let spark = CellStyle {
                    bold: true,
                    ..CellStyle::fg_bg(Rgb::new(255, 230, 120), BOARD_BG)
                };
                let (px, py) = self.cell_origin(start_x, start_y, col, row);
                fb.put_char(px + self.cell_w / 2, py, '*', spark);
            }
        }

        if let Some(cursor) = cursor {
            if cursor.row < snap.rows && cursor.col < snap.cols && !snap.game_over {
                self.draw_cursor(fb, start_x, start_y, cursor);
            }
        }

        self.draw_side_panel(fb, snap, viewport, start_x, start_y, frame_w);

        if snap.game_over {
            self.draw_overlay_text(fb, start_x, start_y, frame_w, frame_h, "GAME OVER");
        }
    }

    /// Convenience helper that allocates a new framebuffer.
    pub fn render(
        &self,
        snap: &GameSnapshot,
        cursor: Option<CursorPos>,
        viewport: Viewport,
    ) -> FrameBuffer {
        let mut fb = FrameBuffer::new(viewport.width, viewport.height);
        self.render_into(snap, cursor, viewport, &mut fb);
        fb
    }

    fn draw_menu(&self, fb: &mut FrameBuffer, difficulty: Difficulty, viewport: Viewport) {
        let title = CellStyle {
            bold: true,
            ..CellStyle::fg_bg(Rgb::new(240, 220, 80), PANEL_BG)
        };
        let text = CellStyle::default();
        let dim = CellStyle { dim: true, ..text };

        let lines: [(&str, CellStyle); 5] = [
            ("SUMFALL", title),
            ("", text),
            ("1  Classic", text),
            ("2  Time attack", text),
            ("", text),
        ];
        let width = 20u16;
        let height = lines.len() as u16 + 3;
        let x = viewport.width.saturating_sub(width) / 2;
        let mut y = viewport.height.saturating_sub(height) / 2;

        for (line, style) in lines {
            fb.put_str(x, y, line, style);
            y = y.saturating_add(1);
        }
        let end = fb.put_str(x, y, "Tab  Speed ", text);
        fb.put_str(end, y, difficulty_label(difficulty), title);
        y = y.saturating_add(2);
        fb.put_str(x, y, "q  Quit", dim);
    }

    fn draw_border(&self, fb: &mut FrameBuffer, x: u16, y: u16, w: u16, h: u16, style: CellStyle) {
        if w < 2 || h < 2 {
            return;
        }

        fb.put_char(x, y, '┌', style);
        fb.put_char(x + w - 1, y, '┐', style);
        fb.put_char(x, y + h - 1, '└', style);
        fb.put_char(x + w - 1, y + h - 1, '┘', style);

        for dx in 1..w - 1 {
            fb.put_char(x + dx, y, '─', style);
            fb.put_char(x + dx, y + h - 1, '─', style);
        }
        for dy in 1..h - 1 {
            fb.put_char(x, y + dy, '│', style);
            fb.put_char(x + w - 1, y + dy, '│', style);
        }
    }

    fn cell_origin(&self, start_x: u16, start_y: u16, col: u16, row: u16) -> (u16, u16) {
        (
            start_x + 1 + col * self.cell_w,
            start_y + 1 + row * self.cell_h,
        )
    }

    fn draw_empty_cell(&self, fb: &mut FrameBuffer, start_x: u16, start_y: u16, row: u8, col: u8) {
        let style = CellStyle {
            dim: true,
            ..CellStyle::fg_bg(Rgb::new(90, 90, 100), BOARD_BG)
        };
        let (px, py) = self.cell_origin(start_x, start_y, col as u16, row as u16);
        fb.put_char(px + self.cell_w / 2, py, '·', style);
    }

    fn draw_block(&self, fb: &mut FrameBuffer, start_x: u16, start_y: u16, block: &BlockSnapshot) {
        let style = CellStyle {
            fg: value_color(block.value),
            bg: if block.endangered { DANGER_BG } else { BOARD_BG },
            bold: true,
            dim: false,
            reverse: block.selected,
        };
        let (px, py) = self.cell_origin(start_x, start_y, block.col as u16, block.row as u16);
        fb.fill_rect(px, py, self.cell_w, self.cell_h, ' ', style);
        fb.put_char(px + self.cell_w / 2, py, value_digit(block.value), style);
    }

    fn draw_cursor(&self, fb: &mut FrameBuffer, start_x: u16, start_y: u16, cursor: CursorPos) {
        let (px, py) = self.cell_origin(start_x, start_y, cursor.col as u16, cursor.row as u16);
        let Some(left) = fb.get(px, py) else {
            return;
        };
        let mut style = left.style;
        style.fg = Rgb::new(255, 255, 255);
        style.bold = true;
        if self.cell_w >= 3 {
            fb.put_char(px, py, '[', style);
            fb.put_char(px + self.cell_w - 1, py, ']', style);
        } else {
            fb.put_char(px, py, '>', style);
        }
    }

    fn draw_side_panel(
        &self,
        fb: &mut FrameBuffer,
        snap: &GameSnapshot,
        viewport: Viewport,
        start_x: u16,
        start_y: u16,
        frame_w: u16,
    ) {
        let panel_x = start_x.saturating_add(frame_w).saturating_add(2);
        if panel_x >= viewport.width {
            return;
        }
        let panel_w = viewport.width - panel_x;
        if panel_w < 8 {
            return;
        }

        let label = CellStyle {
            bold: true,
            ..CellStyle::default()
        };
        let value = CellStyle::fg_bg(Rgb::new(200, 200, 200), PANEL_BG);

        let mut y = start_y;
        fb.put_str(panel_x, y, "TARGET", label);
        y = y.saturating_add(1);
        fb.put_u32(
            panel_x,
            y,
            snap.target,
            CellStyle {
                bold: true,
                ..CellStyle::fg_bg(Rgb::new(240, 220, 80), PANEL_BG)
            },
        );
        y = y.saturating_add(2);

        fb.put_str(panel_x, y, "SUM", label);
        y = y.saturating_add(1);
        let sum_style = CellStyle {
            fg: outcome_color(snap.outcome),
            ..value
        };
        fb.put_u32(panel_x, y, snap.selection_sum, sum_style);
        y = y.saturating_add(2);

        fb.put_str(panel_x, y, "SCORE", label);
        y = y.saturating_add(1);
        fb.put_u32(panel_x, y, snap.score, value);
        y = y.saturating_add(2);

        fb.put_str(panel_x, y, "COMBO", label);
        y = y.saturating_add(1);
        fb.put_char(panel_x, y, 'x', value);
        fb.put_u32(panel_x + 1, y, snap.combo, value);
        y = y.saturating_add(2);

        if snap.mode == Some(GameMode::Time) {
            fb.put_str(panel_x, y, "NEXT ROW", label);
            y = y.saturating_add(1);
            let end = fb.put_u32(panel_x, y, snap.time_left, value);
            fb.put_char(end, y, 's', value);
            y = y.saturating_add(2);
        }

        let dim = CellStyle { dim: true, ..value };
        if let Some(mode) = snap.mode {
            fb.put_str(panel_x, y, mode_label(mode), dim);
            y = y.saturating_add(1);
        }
        fb.put_str(panel_x, y, difficulty_label(snap.difficulty), dim);
    }

    fn draw_overlay_text(
        &self,
        fb: &mut FrameBuffer,
        start_x: u16,
        start_y: u16,
        frame_w: u16,
        frame_h: u16,
        text: &str,
    ) {
        let style = CellStyle {
            bold: true,
            ..CellStyle::fg_bg(Rgb::new(255, 255, 255), PANEL_BG)
        };
        let hint = CellStyle { dim: true, ..style };

        let mid_y = start_y.saturating_add(frame_h / 2);
        let text_w = text.chars().count() as u16;
        let x = start_x.saturating_add(frame_w.saturating_sub(text_w) / 2);
        fb.put_str(x, mid_y, text, style);

        let help = "r:again esc:menu";
        let help_w = help.chars().count() as u16;
        let hx = start_x.saturating_add(frame_w.saturating_sub(help_w) / 2);
        fb.put_str(hx, mid_y.saturating_add(1), help, hint);
    }
}

fn value_digit(value: u8) -> char {
    char::from_digit(value as u32, 10).unwrap_or('?')
}

fn value_color(value: u8) -> Rgb {
    match value {
        1 => Rgb::new(80, 220, 220),
        2 => Rgb::new(100, 220, 120),
        3 => Rgb::new(170, 230, 90),
        4 => Rgb::new(240, 220, 80),
        5 => Rgb::new(255, 165, 0),
        6 => Rgb::new(240, 110, 70),
        7 => Rgb::new(220, 80, 120),
        8 => Rgb::new(200, 120, 220),
        _ => Rgb::new(120, 140, 240),
    }
}

fn outcome_color(outcome: MatchOutcome) -> Rgb {
    match outcome {
        MatchOutcome::Under => Rgb::new(200, 200, 200),
        MatchOutcome::Exact => Rgb::new(100, 230, 120),
        MatchOutcome::Over => Rgb::new(230, 80, 80),
    }
}

fn mode_label(mode: GameMode) -> &'static str {
    match mode {
        GameMode::Classic => "CLASSIC",
        GameMode::Time => "TIME",
    }
}

fn difficulty_label(difficulty: Difficulty) -> &'static str {
    match difficulty {
        Difficulty::Slow => "SLOW",
        Difficulty::Medium => "MEDIUM",
        Difficulty::Fast => "FAST",
    }
}

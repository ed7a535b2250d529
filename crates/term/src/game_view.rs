//! GameView: maps a [`GameSnapshot`] into a terminal framebuffer.
//!
//! This module is pure (no I/O). It can be unit-tested.
//!
//! Layout, top to bottom: a cursor row marking the selected column, the
//! framed grid with row 0 drawn last, then a one-line status message. The
//! side panel sits to the right of the frame when the viewport is wide enough.

use crate::core::{BlockSnapshot, GameSnapshot};
use crate::fb::{CellStyle, FrameBuffer, Rgb};
use crate::types::{BlockValue, CellPos};

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

/// Per-frame state that is not part of the session.
#[derive(Debug, Clone, Copy, Default)]
pub struct Overlay<'a> {
    /// Selected column, drawn as a marker above the grid.
    pub cursor: Option<usize>,
    /// Block drawn on top of the grid while a drop animates.
    pub falling: Option<(CellPos, BlockSnapshot)>,
    /// Cells highlighted after a merge.
    pub flashing: &'a [CellPos],
    /// One-line status shown under the grid.
    pub message: Option<&'a str>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnchorY {
    Center,
    Top,
}

const PLAY_BG: Rgb = Rgb::new(30, 30, 40);
const PANEL_MIN_WIDTH: u16 = 14;

/// A lightweight terminal renderer for the merge grid.
#[derive(Debug, Clone)]
pub struct GameView {
    /// Grid cell width in terminal columns.
    cell_w: u16,
    /// Grid cell height in terminal rows.
    cell_h: u16,
    anchor_y: AnchorY,
}

impl Default for GameView {
    fn default() -> Self {
        // 8x3 fits seven-digit values and looks roughly square.
        Self::new(8, 3)
    }
}

/// Screen rectangle of the framed grid.
#[derive(Debug, Clone, Copy)]
struct Frame {
    x: u16,
    y: u16,
    w: u16,
    h: u16,
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

    /// Render into an existing framebuffer, resizing it to the viewport.
    pub fn render_into(
        &self,
        snap: &GameSnapshot,
        overlay: &Overlay<'_>,
        viewport: Viewport,
        fb: &mut FrameBuffer,
    ) {
        fb.resize(viewport.width, viewport.height);
        fb.clear(CellStyle::default().cell(' '));

        let frame = self.layout(snap, viewport);

        let border = CellStyle::new(Rgb::new(200, 200, 200), Rgb::BLACK);
        fb.fill_rect(frame.x + 1, frame.y + 1, frame.w - 2, frame.h - 2, ' ', CellStyle::new(PLAY_BG, PLAY_BG));
        fb.draw_box(frame.x, frame.y, frame.w, frame.h, border);

        if let Some(column) = overlay.cursor.filter(|&c| c < snap.columns as usize) {
            let x = frame.x + 1 + column as u16 * self.cell_w;
            let marker = CellStyle::new(Rgb::new(255, 220, 120), Rgb::BLACK).bold();
            fb.put_str_centered(x, frame.y.saturating_sub(1), self.cell_w, "▼", marker);
        }

        for row in 0..snap.rows {
            for column in 0..snap.columns {
                let pos = CellPos::new(column, row);
                match snap.cell(pos) {
                    Some(block) => {
                        let flash = overlay.flashing.contains(&pos);
                        self.draw_block(fb, frame, snap.rows, pos, block, flash);
                    }
                    None => self.draw_empty(fb, frame, snap.rows, pos),
                }
            }
        }

        if let Some((pos, block)) = overlay.falling {
            if pos.column < snap.columns && pos.row < snap.rows {
                self.draw_block(fb, frame, snap.rows, pos, block, false);
            }
        }

        self.draw_side_panel(fb, snap, viewport, frame);

        if let Some(message) = overlay.message {
            let style = CellStyle::new(Rgb::new(230, 160, 120), Rgb::BLACK);
            fb.put_str(frame.x, frame.y + frame.h, message, style);
        }

        if snap.stuck {
            let style = CellStyle::new(Rgb::WHITE, Rgb::BLACK).bold();
            let mid = frame.y + frame.h / 2;
            fb.put_str_centered(frame.x, mid, frame.w, "GAME OVER", style);
            fb.put_str_centered(frame.x, mid + 1, frame.w, "r to restart", style.dim());
        }
    }

    /// Convenience helper that allocates a new framebuffer.
    pub fn render(&self, snap: &GameSnapshot, overlay: &Overlay<'_>, viewport: Viewport) -> FrameBuffer {
        let mut fb = FrameBuffer::new(viewport.width, viewport.height);
        self.render_into(snap, overlay, viewport, &mut fb);
        fb
    }

    fn layout(&self, snap: &GameSnapshot, viewport: Viewport) -> Frame {
        let w = snap.columns as u16 * self.cell_w + 2;
        let h = snap.rows as u16 * self.cell_h + 2;
        // One row above for the cursor, one below for the status line.
        let x = viewport.width.saturating_sub(w + PANEL_MIN_WIDTH) / 2;
        let y = match self.anchor_y {
            AnchorY::Center => viewport.height.saturating_sub(h + 2) / 2 + 1,
            AnchorY::Top => 1,
        };
        Frame { x, y, w, h }
    }

    fn cell_origin(&self, frame: Frame, rows: u8, pos: CellPos) -> (u16, u16) {
        let x = frame.x + 1 + pos.column as u16 * self.cell_w;
        let y = frame.y + 1 + (rows - 1 - pos.row) as u16 * self.cell_h;
        (x, y)
    }

    fn draw_empty(&self, fb: &mut FrameBuffer, frame: Frame, rows: u8, pos: CellPos) {
        let (x, y) = self.cell_origin(frame, rows, pos);
        let dot = CellStyle::new(Rgb::new(90, 90, 100), PLAY_BG).dim();
        fb.put_str_centered(x, y + self.cell_h / 2, self.cell_w, "·", dot);
    }

    fn draw_block(
        &self,
        fb: &mut FrameBuffer,
        frame: Frame,
        rows: u8,
        pos: CellPos,
        block: BlockSnapshot,
        flash: bool,
    ) {
        let (x, y) = self.cell_origin(frame, rows, pos);
        let mut bg = Rgb::from(block.color);
        if flash {
            bg = bg.lighten();
        }
        let style = CellStyle::new(bg.contrast(), bg).bold();
        fb.fill_rect(x, y, self.cell_w, self.cell_h, ' ', style);
        fb.put_str_centered(x, y + self.cell_h / 2, self.cell_w, &block.value.to_string(), style);
    }

    fn draw_side_panel(&self, fb: &mut FrameBuffer, snap: &GameSnapshot, viewport: Viewport, frame: Frame) {
        let panel_x = frame.x.saturating_add(frame.w).saturating_add(2);
        if panel_x >= viewport.width || viewport.width - panel_x < PANEL_MIN_WIDTH - 2 {
            return;
        }

        let label = CellStyle::new(Rgb::new(220, 220, 220), Rgb::BLACK).bold();
        let value = CellStyle::new(Rgb::new(200, 200, 200), Rgb::BLACK);

        let mut y = frame.y;
        fb.put_str(panel_x, y, "SCORE", label);
        fb.put_u64(panel_x, y + 1, snap.score, value);
        y += 3;

        fb.put_str(panel_x, y, "BEST", label);
        fb.put_str(panel_x, y + 1, &display_value(snap.highest), value);
        y += 3;

        fb.put_str(panel_x, y, "NEXT", label);
        match snap.next {
            Some(next) => {
                let bg = Rgb::from(next.color);
                let chip = CellStyle::new(bg.contrast(), bg).bold();
                fb.put_str(panel_x, y + 1, &format!(" {} ", next.value), chip);
            }
            None => {
                fb.put_str(panel_x, y + 1, "-", value);
            }
        }
        y += 3;

        fb.put_str(panel_x, y, "POOL", label);
        let pool = snap
            .pool
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join(" ");
        fb.put_str(panel_x, y + 1, if pool.is_empty() { "-" } else { &pool }, value);
        y += 3;

        fb.put_str(panel_x, y, "MILESTONE", label);
        fb.put_str(
            panel_x,
            y + 1,
            &format!("{}/{}", snap.milestone_cursor, snap.milestone_count),
            value,
        );
        y += 3;

        fb.put_str(panel_x, y, "GAME", label);
        fb.put_u64(panel_x, y + 1, u64::from(snap.episode_id) + 1, value.dim());
    }
}

fn display_value(value: BlockValue) -> String {
    if value.get() == 0 {
        "-".to_string()
    } else {
        value.to_string()
    }
}

//! GameView: character-grid rendering of a [`GameSnapshot`].
//!
//! Each board cell is two terminal columns wide to compensate for typical glyph
//! aspect ratio. The board sits inside a one-cell box border; the score title is
//! drawn on the top border and a status line sits below the frame.
//!
//! This module is pure (no I/O). It can be unit-tested.

use crate::core::GameSnapshot;
use crate::fb::{FrameBuffer, Style};
use crate::types::Cell;
use crate::view::{self, palette, RemoteStatus, View, Viewport};

pub struct GameView {
    /// Board cell width in terminal columns.
    cell_w: u16,
}

impl Default for GameView {
    fn default() -> Self {
        Self { cell_w: 2 }
    }
}

impl GameView {
    /// Frame size (border included) for a `width x height` board.
    pub fn frame_size(&self, width: u16, height: u16) -> (u16, u16) {
        (
            width.saturating_mul(self.cell_w).saturating_add(2),
            height.saturating_add(2),
        )
    }

    /// Cells past the `u16` screen range clamp to the last column and are
    /// clipped by the framebuffer.
    fn put_cell(
        &self,
        fb: &mut FrameBuffer,
        origin: (u16, u16),
        cell: Cell,
        ch: char,
        style: Style,
    ) {
        let (Ok(col), Ok(row)) = (u16::try_from(cell.col), u16::try_from(cell.row)) else {
            return;
        };
        let x = origin
            .0
            .saturating_add(1)
            .saturating_add(col.saturating_mul(self.cell_w));
        let y = origin.1.saturating_add(1).saturating_add(row);
        fb.put_char(x, y, ch, style);
        let pad = Style { bold: false, ..style };
        for dx in 1..self.cell_w {
            fb.put_char(x.saturating_add(dx), y, ' ', pad);
        }
    }
}

impl View for GameView {
    fn fit_board(&self, viewport: Viewport) -> (u16, u16) {
        (
            viewport.width.saturating_sub(2) / self.cell_w,
            // border rows + status line
            viewport.height.saturating_sub(3),
        )
    }

    fn render_into(
        &self,
        snap: &GameSnapshot,
        remote: Option<&RemoteStatus>,
        viewport: Viewport,
        fb: &mut FrameBuffer,
    ) {
        fb.resize(viewport.width, viewport.height);
        fb.clear(Style::new(palette::TEXT, palette::SCREEN).glyph(' '));

        let (frame_w, frame_h) = self.frame_size(snap.width, snap.height);
        let origin = view::centered_origin(viewport, frame_w, frame_h + 1);
        let (x0, y0) = origin;

        // Play area with grid dots.
        let field = Style::new(palette::GRID, palette::FIELD).dim();
        fb.fill_rect(
            x0.saturating_add(1),
            y0.saturating_add(1),
            frame_w - 2,
            frame_h - 2,
            ' ',
            field,
        );
        for row in 0..snap.height as i32 {
            for col in 0..snap.width as i32 {
                self.put_cell(fb, origin, Cell::new(row, col), '·', field);
            }
        }

        fb.draw_box(x0, y0, frame_w, frame_h, palette::BORDER);
        view::put_counter_centered(fb, x0, frame_w, y0, " score ", snap.score, palette::LABEL);

        if let Some(food) = snap.food {
            let style = Style::new(palette::FOOD, palette::FIELD).bold();
            self.put_cell(fb, origin, food, '●', style);
        }

        // Tail first so the head wins if a corrupt snapshot overlaps itself.
        let (head_fg, body_fg) = if snap.alive || snap.filled {
            (palette::HEAD, palette::BODY)
        } else {
            (palette::DEAD, palette::DEAD)
        };
        let body = Style::new(body_fg, palette::FIELD);
        for &cell in snap.snake.iter().skip(1).rev() {
            self.put_cell(fb, origin, cell, 'o', body);
        }
        if let Some(head) = snap.head() {
            self.put_cell(fb, origin, head, '@', Style::new(head_fg, palette::FIELD).bold());
        }

        view::draw_status_line(fb, x0, y0.saturating_add(frame_h), snap, remote);
        view::draw_overlay(fb, x0, y0, frame_w, frame_h, snap);
    }
}

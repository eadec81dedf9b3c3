//! PixelView: renders each board cell as one pixel.
//!
//! Two pixel rows share one terminal row through the upper-half-block glyph:
//! the foreground paints the upper pixel, the background the lower one. This
//! gives square pixels on most terminal fonts and fits twice as many rows as
//! [`GameView`](crate::GameView).

use crate::core::GameSnapshot;
use crate::fb::{FrameBuffer, Rgb, Style};
use crate::types::Cell;
use crate::view::{self, palette, RemoteStatus, View, Viewport};

const UPPER_HALF: char = '▀';

#[derive(Debug, Clone, Copy, Default)]
pub struct PixelView;

impl PixelView {
    pub fn new() -> Self {
        Self
    }

    /// Frame size (border included) for a `width x height` board.
    pub fn frame_size(&self, width: u16, height: u16) -> (u16, u16) {
        (
            width.saturating_add(2),
            height.div_ceil(2).saturating_add(2),
        )
    }
}

/// Paint one board pixel into the half-block glyph that holds it.
fn put_pixel(
    fb: &mut FrameBuffer,
    origin: (u16, u16),
    snap: &GameSnapshot,
    cell: Cell,
    rgb: Rgb,
) {
    let (Ok(col), Ok(row)) = (u16::try_from(cell.col), u16::try_from(cell.row)) else {
        return;
    };
    if row >= snap.height || col >= snap.width {
        return;
    }
    let x = origin.0.saturating_add(1).saturating_add(col);
    let y = origin.1.saturating_add(1).saturating_add(row / 2);
    if let Some(mut glyph) = fb.get(x, y) {
        if cell.row % 2 == 0 {
            glyph.style.fg = rgb;
        } else {
            glyph.style.bg = rgb;
        }
        fb.set(x, y, glyph);
    }
}

impl View for PixelView {
    fn fit_board(&self, viewport: Viewport) -> (u16, u16) {
        (
            viewport.width.saturating_sub(2),
            viewport.height.saturating_sub(3).saturating_mul(2),
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

        // Empty field; odd heights leave the last lower half outside the board.
        // Columns past the right edge of the screen are never visible.
        let visible_w = snap.width.min(viewport.width);
        for row in (0..snap.height).step_by(2) {
            let bottom = if row + 1 < snap.height {
                palette::FIELD
            } else {
                palette::SCREEN
            };
            let style = Style::new(palette::FIELD, bottom);
            let y = y0.saturating_add(1).saturating_add(row / 2);
            for col in 0..visible_w {
                fb.put_char(x0.saturating_add(1).saturating_add(col), y, UPPER_HALF, style);
            }
        }

        if let Some(food) = snap.food {
            put_pixel(fb, origin, snap, food, palette::FOOD);
        }
        let (head, body) = if snap.alive || snap.filled {
            (palette::HEAD, palette::BODY)
        } else {
            (palette::DEAD, palette::DEAD)
        };
        for &cell in snap.snake.iter().skip(1) {
            put_pixel(fb, origin, snap, cell, body);
        }
        if let Some(cell) = snap.head() {
            put_pixel(fb, origin, snap, cell, head);
        }

        fb.draw_box(x0, y0, frame_w, frame_h, palette::BORDER);
        view::draw_status_line(fb, x0, y0.saturating_add(frame_h), snap, remote);
        view::draw_overlay(fb, x0, y0, frame_w, frame_h, snap);
    }
}

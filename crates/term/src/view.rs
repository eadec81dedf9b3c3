//! Shared view plumbing: viewport, the [`View`] trait, palette and status line.

use crate::core::GameSnapshot;
use crate::fb::{FrameBuffer, Rgb, Style};

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

/// Remote adapter state shown on the status line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RemoteStatus {
    pub clients: u16,
    pub controller_id: Option<usize>,
}

/// Maps a [`GameSnapshot`] into a framebuffer. Implementations are pure.
pub trait View {
    /// Largest board (columns, rows) whose frame fits inside `viewport`.
    fn fit_board(&self, viewport: Viewport) -> (u16, u16);

    /// Render into an existing framebuffer, resizing it to `viewport`.
    fn render_into(
        &self,
        snap: &GameSnapshot,
        remote: Option<&RemoteStatus>,
        viewport: Viewport,
        fb: &mut FrameBuffer,
    );

    /// Convenience helper that allocates a new framebuffer.
    fn render(&self, snap: &GameSnapshot, viewport: Viewport) -> FrameBuffer {
        let mut fb = FrameBuffer::new(viewport.width, viewport.height);
        self.render_into(snap, None, viewport, &mut fb);
        fb
    }
}

pub(crate) mod palette {
    use super::*;

    pub const SCREEN: Rgb = Rgb::new(0, 0, 0);
    pub const FIELD: Rgb = Rgb::new(24, 26, 32);
    pub const GRID: Rgb = Rgb::new(70, 74, 86);
    pub const HEAD: Rgb = Rgb::new(150, 240, 120);
    pub const BODY: Rgb = Rgb::new(70, 180, 80);
    pub const DEAD: Rgb = Rgb::new(150, 150, 150);
    pub const FOOD: Rgb = Rgb::new(230, 70, 70);
    pub const TEXT: Rgb = Rgb::new(220, 220, 220);

    pub const BORDER: Style = Style::new(Rgb::new(200, 200, 200), SCREEN);
    pub const LABEL: Style = Style::new(TEXT, SCREEN).bold();
    pub const HINT: Style = Style::new(TEXT, SCREEN).dim();
    pub const OVERLAY: Style = Style::new(Rgb::new(255, 255, 255), SCREEN).bold();
}

/// Top-left corner that centers a `w x h` frame in `viewport`.
pub(crate) fn centered_origin(viewport: Viewport, w: u16, h: u16) -> (u16, u16) {
    (
        viewport.width.saturating_sub(w) / 2,
        viewport.height.saturating_sub(h) / 2,
    )
}

/// One row below the frame: score, length, and either the remote status or the
/// key hints.
pub(crate) fn draw_status_line(
    fb: &mut FrameBuffer,
    x: u16,
    y: u16,
    snap: &GameSnapshot,
    remote: Option<&RemoteStatus>,
) {
    let mut cx = fb.put_str(x, y, "score ", palette::HINT);
    cx = fb.put_u32(cx, y, snap.score, palette::LABEL);
    cx = fb.put_str(cx, y, "  len ", palette::HINT);
    cx = fb.put_u32(cx, y, snap.snake.len() as u32, palette::LABEL);

    match remote {
        Some(st) => {
            cx = fb.put_str(cx, y, "  remote ", palette::HINT);
            cx = fb.put_u32(cx, y, st.clients as u32, palette::LABEL);
            cx = fb.put_str(cx, y, " ctl ", palette::HINT);
            match st.controller_id {
                Some(id) => fb.put_u32(cx, y, id as u32, palette::LABEL),
                None => fb.put_str(cx, y, "-", palette::LABEL),
            };
        }
        None => {
            fb.put_str(cx, y, "  p pause  r restart  q quit", palette::HINT);
        }
    }
}

/// Centered message lines over a frame: pause, death or win.
pub(crate) fn draw_overlay(
    fb: &mut FrameBuffer,
    x: u16,
    y: u16,
    w: u16,
    h: u16,
    snap: &GameSnapshot,
) {
    let mid = y.saturating_add(h / 2);
    if snap.paused {
        fb.put_str_centered(x, w, mid, " PAUSED ", palette::OVERLAY);
        return;
    }
    if !snap.game_over() {
        return;
    }

    let title = if snap.filled { " YOU WIN " } else { " GAME OVER " };
    fb.put_str_centered(x, w, mid.saturating_sub(1), title, palette::OVERLAY);

    put_counter_centered(fb, x, w, mid, " score ", snap.score, palette::OVERLAY);

    fb.put_str_centered(x, w, mid.saturating_add(1), " r restart  q quit ", palette::HINT);
}

/// Write `label` followed by `value` and a trailing space, centered within
/// `[x, x + w)`, without formatting into a `String`.
pub(crate) fn put_counter_centered(
    fb: &mut FrameBuffer,
    x: u16,
    w: u16,
    y: u16,
    label: &str,
    value: u32,
    style: Style,
) {
    let line_w = label.chars().count() as u16 + decimal_width(value) + 1;
    let sx = x.saturating_add(w.saturating_sub(line_w) / 2);
    let cx = fb.put_str(sx, y, label, style);
    let cx = fb.put_u32(cx, y, value, style);
    fb.put_char(cx, y, ' ', style);
}

fn decimal_width(mut n: u32) -> u16 {
    let mut w = 1;
    while n >= 10 {
        n /= 10;
        w += 1;
    }
    w
}

use ratatui::{
    buffer::Buffer,
    layout::{Alignment, Rect},
    style::{Color, Modifier, Style},
    widgets::{Block, Borders, Widget},
};

use crate::model::SignalKind;
use crate::render::scene::{AXIS, BACKGROUND, TITLE};
use crate::render::{ChartScene, Rgb, Shape};

/// Horizontal pixels represented by one terminal column.
pub const CELL_WIDTH_PX: f64 = 8.0;

pub fn color(rgb: Rgb) -> Color {
    Color::Rgb(rgb.0, rgb.1, rgb.2)
}

/// Viewport width in chart pixels for a terminal `columns` wide.
pub fn viewport_px(columns: u16) -> f64 {
    columns as f64 * CELL_WIDTH_PX
}

/// Paints a `ChartScene` into terminal cells.
pub struct ChartWidget<'a> {
    scene: &'a ChartScene,
}

impl<'a> ChartWidget<'a> {
    pub fn new(scene: &'a ChartScene) -> Self {
        Self { scene }
    }
}

struct Grid {
    x0: u16,
    y0: u16,
    cols: u16,
    rows: u16,
    width_px: f64,
    height_px: f64,
}

impl Grid {
    fn col(&self, x: f64) -> Option<u16> {
        if self.cols == 0 || self.width_px <= 0.0 || !x.is_finite() {
            return None;
        }
        let c = (x / self.width_px * (self.cols - 1) as f64).round();
        if c < 0.0 || c > (self.cols - 1) as f64 {
            return None;
        }
        Some(self.x0 + c as u16)
    }

    fn row(&self, y: f64) -> u16 {
        let max = self.rows.saturating_sub(1) as f64;
        let r = if self.height_px > 0.0 && y.is_finite() {
            (y / self.height_px * max).round().clamp(0.0, max)
        } else {
            max
        };
        self.y0 + r as u16
    }
}

impl Widget for ChartWidget<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let scene = self.scene;
        let block = Block::default()
            .title(format!(" {} ", scene.title))
            .title_style(Style::default().fg(color(TITLE)).add_modifier(Modifier::BOLD))
            .title_alignment(Alignment::Center)
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::DarkGray));
        let inner = block.inner(area);
        block.render(area, buf);
        buf.set_style(inner, Style::default().bg(color(BACKGROUND)));

        if inner.height < 3 || inner.width < 8 {
            return;
        }

        // last row is the time axis
        let plot_cols = ((scene.width / CELL_WIDTH_PX).ceil() as u16).clamp(1, inner.width);
        let grid = Grid {
            x0: inner.x,
            y0: inner.y,
            cols: plot_cols,
            rows: inner.height - 1,
            width_px: scene.width,
            height_px: scene.height,
        };

        for cmd in &scene.commands {
            let Some(x) = grid.col(cmd.x) else {
                continue;
            };
            let fg = color(cmd.shape.color());
            match cmd.shape {
                Shape::Candle { top, height, .. } => {
                    let r0 = grid.row(top);
                    let r1 = grid.row(top + height).max(r0);
                    for y in r0..=r1 {
                        buf.set_string(x, y, "█", Style::default().fg(fg));
                    }
                }
                Shape::SmaDot { y, .. } => {
                    buf.set_string(x, grid.row(y), "•", Style::default().fg(fg));
                }
                Shape::Halo { y, .. } => {
                    let cell = &mut buf[(x, grid.row(y))];
                    cell.set_bg(fg);
                }
                Shape::SignalMarker { y, kind } => {
                    let glyph = match kind {
                        SignalKind::Buy => "▲",
                        SignalKind::Sell => "▼",
                    };
                    buf.set_string(
                        x,
                        grid.row(y),
                        glyph,
                        Style::default().fg(fg).add_modifier(Modifier::BOLD),
                    );
                }
            }
        }

        let axis_style = Style::default().fg(color(AXIS));
        let (lo, hi) = scene.y_scale.domain();
        buf.set_string(inner.x, inner.y, format!("{:.2}", hi), axis_style);
        buf.set_string(
            inner.x,
            inner.y + inner.height - 2,
            format!("{:.2}", lo),
            axis_style,
        );

        let axis_y = inner.y + inner.height - 1;
        let mut next_free = inner.x;
        for tick in &scene.x_ticks {
            let Some(x) = grid.col(tick.x) else {
                continue;
            };
            let width = tick.label.chars().count() as u16;
            if x < next_free || x + width > inner.x + inner.width {
                continue;
            }
            buf.set_string(x, axis_y, &tick.label, axis_style);
            next_free = x + width + 1;
        }
    }
}

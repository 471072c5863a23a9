use chrono::{DateTime, Utc};

use crate::model::{PricePoint, Signal, SignalKind};

use super::scale::{tick_label, LinearScale, TimeScale};

pub const MAX_X_TICKS: usize = 30;
pub const CANDLE_WIDTH: f64 = 6.0;
pub const SMA_DOT_RADIUS: f64 = 3.0;
/// Vertical distance between a signal price and its marker.
pub const MARKER_OFFSET: f64 = 10.0;
pub const HALO_RX: f64 = 15.0;
pub const HALO_RY: f64 = 8.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rgb(pub u8, pub u8, pub u8);

pub const BACKGROUND: Rgb = Rgb(0x1a, 0x1a, 0x1a);
pub const AXIS: Rgb = Rgb(0x84, 0x8e, 0x9c);
pub const BULLISH: Rgb = Rgb(0x0e, 0xcb, 0x81);
pub const BEARISH: Rgb = Rgb(0xf6, 0x46, 0x5d);
pub const SMA_DOT: Rgb = Rgb(0x00, 0x00, 0xff);
pub const BUY_MARKER: Rgb = Rgb(0xff, 0xff, 0x00);
pub const SELL_MARKER: Rgb = Rgb(0x80, 0x00, 0x80);
pub const BUY_HALO: Rgb = Rgb(0x00, 0xff, 0x00);
pub const SELL_HALO: Rgb = Rgb(0xff, 0x00, 0x00);
pub const TITLE: Rgb = Rgb(0xff, 0xff, 0x00);

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Margin {
    pub top: f64,
    pub right: f64,
    pub bottom: f64,
    pub left: f64,
}

/// Fixed chart geometry plus the responsive width rule.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ChartLayout {
    pub margin: Margin,
    pub outer_width: f64,
    pub outer_height: f64,
    pub narrow_breakpoint: f64,
    pub narrow_fraction: f64,
}

impl Default for ChartLayout {
    fn default() -> Self {
        Self {
            margin: Margin {
                top: 20.0,
                right: 20.0,
                bottom: 50.0,
                left: 0.0,
            },
            outer_width: 1200.0,
            outer_height: 400.0,
            narrow_breakpoint: 768.0,
            narrow_fraction: 0.9,
        }
    }
}

impl ChartLayout {
    pub fn full_plot_width(&self) -> f64 {
        self.outer_width - self.margin.left - self.margin.right
    }

    pub fn plot_height(&self) -> f64 {
        self.outer_height - self.margin.top - self.margin.bottom
    }

    /// Plot width for a viewport: a fraction of it on narrow screens,
    /// otherwise the full width.
    pub fn plot_width_for(&self, viewport_width: f64) -> f64 {
        if viewport_width < self.narrow_breakpoint {
            (viewport_width * self.narrow_fraction - self.margin.left - self.margin.right).max(0.0)
        } else {
            self.full_plot_width()
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Shape {
    /// Body from `top` downwards, centered on x.
    Candle {
        top: f64,
        height: f64,
        width: f64,
        bullish: bool,
    },
    SmaDot { y: f64, radius: f64 },
    SignalMarker { y: f64, kind: SignalKind },
    Halo { y: f64, rx: f64, ry: f64, kind: SignalKind },
}

impl Shape {
    pub fn color(&self) -> Rgb {
        match self {
            Self::Candle { bullish: true, .. } => BULLISH,
            Self::Candle { bullish: false, .. } => BEARISH,
            Self::SmaDot { .. } => SMA_DOT,
            Self::SignalMarker {
                kind: SignalKind::Buy,
                ..
            } => BUY_MARKER,
            Self::SignalMarker {
                kind: SignalKind::Sell,
                ..
            } => SELL_MARKER,
            Self::Halo {
                kind: SignalKind::Buy,
                ..
            } => BUY_HALO,
            Self::Halo {
                kind: SignalKind::Sell,
                ..
            } => SELL_HALO,
        }
    }
}

/// A shape anchored at an instant; `x` is derived from the anchor.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DrawCommand {
    pub anchor_ms: i64,
    pub x: f64,
    pub shape: Shape,
}

#[derive(Debug, Clone, PartialEq)]
pub struct AxisTick {
    pub anchor_ms: i64,
    pub x: f64,
    pub label: String,
}

/// Everything a chart needs for one pass of drawing.
#[derive(Debug, Clone, Copy)]
pub struct ChartInput<'a> {
    pub symbol: &'a str,
    pub points: &'a [PricePoint],
    pub signals: &'a [Signal],
    pub confirmations: &'a [Signal],
    pub live_price: &'a str,
}

/// Draw commands for one symbol in plot coordinates (origin at the top-left
/// of the plot area, y growing downwards).
#[derive(Debug, Clone, PartialEq)]
pub struct ChartScene {
    pub symbol: String,
    pub title: String,
    pub width: f64,
    pub height: f64,
    pub margin: Margin,
    pub x_scale: TimeScale,
    pub y_scale: LinearScale,
    pub commands: Vec<DrawCommand>,
    pub x_ticks: Vec<AxisTick>,
}

impl ChartScene {
    /// Build the scene at `plot_width`.
    pub fn build(input: ChartInput<'_>, layout: &ChartLayout, plot_width: f64) -> Self {
        let height = layout.plot_height();
        let x_scale = TimeScale::from_extent(input.points.iter().map(|p| p.timestamp), (0.0, plot_width));
        let y_scale = price_scale(input.points, height);

        let mut commands = Vec::with_capacity(
            input.points.len() * 2 + input.signals.len() * 2 + input.confirmations.len(),
        );

        for p in input.points {
            let top = y_scale.map(p.body_high());
            let height = if p.body_open() == p.close {
                1.0
            } else {
                (y_scale.map(p.body_open()) - y_scale.map(p.close)).abs()
            };
            commands.push(anchored(
                p.timestamp,
                Shape::Candle {
                    top,
                    height,
                    width: CANDLE_WIDTH,
                    bullish: p.is_bullish(),
                },
            ));
        }

        for p in input.points {
            if let Some(sma) = p.sma {
                commands.push(anchored(
                    p.timestamp,
                    Shape::SmaDot {
                        y: y_scale.map(sma),
                        radius: SMA_DOT_RADIUS,
                    },
                ));
            }
        }

        for s in input.signals {
            let y = match s.kind {
                SignalKind::Buy => y_scale.map(s.price) - MARKER_OFFSET,
                SignalKind::Sell => y_scale.map(s.price) + MARKER_OFFSET,
            };
            commands.push(anchored(s.timestamp, Shape::SignalMarker { y, kind: s.kind }));
        }

        for s in input.signals.iter().filter(|s| s.is_sell()) {
            commands.push(anchored(
                s.timestamp,
                Shape::Halo {
                    y: y_scale.map(s.price),
                    rx: HALO_RX,
                    ry: HALO_RY,
                    kind: SignalKind::Sell,
                },
            ));
        }

        for s in input.confirmations.iter().filter(|s| s.is_buy()) {
            commands.push(anchored(
                s.timestamp,
                Shape::Halo {
                    y: y_scale.map(s.price) - MARKER_OFFSET,
                    rx: HALO_RX,
                    ry: HALO_RY,
                    kind: SignalKind::Buy,
                },
            ));
        }

        let x_ticks = x_scale
            .ticks(MAX_X_TICKS)
            .into_iter()
            .map(|anchor_ms| AxisTick {
                anchor_ms,
                x: 0.0,
                label: tick_label(anchor_ms),
            })
            .collect();

        let mut scene = Self {
            symbol: input.symbol.to_string(),
            title: format!("{} : {}", input.symbol, input.live_price),
            width: plot_width,
            height,
            margin: layout.margin,
            x_scale,
            y_scale,
            commands,
            x_ticks,
        };
        scene.layout_x();
        scene
    }

    /// Re-map x positions for a new viewport width. Nothing else changes.
    pub fn rescale(&mut self, viewport_width: f64, layout: &ChartLayout) {
        let width = layout.plot_width_for(viewport_width);
        if width == self.width {
            return;
        }
        self.width = width;
        self.x_scale.set_range((0.0, width));
        self.layout_x();
    }

    fn layout_x(&mut self) {
        let x_scale = self.x_scale;
        for cmd in &mut self.commands {
            cmd.x = x_scale.map_ms(cmd.anchor_ms);
        }
        for tick in &mut self.x_ticks {
            tick.x = x_scale.map_ms(tick.anchor_ms);
        }
    }

    pub fn count_shapes<F>(&self, pred: F) -> usize
    where
        F: Fn(&Shape) -> bool,
    {
        self.commands.iter().filter(|c| pred(&c.shape)).count()
    }
}

fn anchored(at: DateTime<Utc>, shape: Shape) -> DrawCommand {
    DrawCommand {
        anchor_ms: at.timestamp_millis(),
        x: 0.0,
        shape,
    }
}

fn price_scale(points: &[PricePoint], height: f64) -> LinearScale {
    let lo = points
        .iter()
        .map(|p| p.body_low())
        .fold(f64::INFINITY, f64::min);
    let hi = points
        .iter()
        .map(|p| p.body_high())
        .fold(f64::NEG_INFINITY, f64::max);
    let domain = if lo.is_finite() && hi.is_finite() {
        (lo, hi)
    } else {
        (0.0, 0.0)
    };
    LinearScale::new(domain, (height, 0.0)).nice()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn ts(hours: i64) -> DateTime<Utc> {
        Utc.timestamp_millis_opt(hours * 3_600_000).unwrap()
    }

    #[test]
    fn responsive_width_rule() {
        let layout = ChartLayout::default();
        assert_eq!(layout.full_plot_width(), 1180.0);
        assert_eq!(layout.plot_height(), 330.0);
        assert_eq!(layout.plot_width_for(1920.0), 1180.0);
        assert_eq!(layout.plot_width_for(768.0), 1180.0);
        assert!((layout.plot_width_for(500.0) - 430.0).abs() < 1e-9);
    }

    #[test]
    fn candle_geometry() {
        let points = vec![
            PricePoint::new(ts(0), Some(100.0), 110.0, None),
            PricePoint::new(ts(1), Some(110.0), 100.0, None),
            PricePoint::new(ts(2), None, 105.0, None),
        ];
        let scene = ChartScene::build(
            ChartInput {
                symbol: "BTCUSDT",
                points: &points,
                signals: &[],
                confirmations: &[],
                live_price: "105.00",
            },
            &ChartLayout::default(),
            1000.0,
        );
        assert_eq!(scene.title, "BTCUSDT : 105.00");
        let candles: Vec<_> = scene
            .commands
            .iter()
            .filter_map(|c| match c.shape {
                Shape::Candle {
                    top,
                    height,
                    bullish,
                    ..
                } => Some((c.x, top, height, bullish)),
                _ => None,
            })
            .collect();
        assert_eq!(candles.len(), 3);
        assert_eq!(candles[0].0, 0.0);
        assert_eq!(candles[1].0, 500.0);
        assert_eq!(candles[2].0, 1000.0);
        // domain 100..110, height 330
        assert_eq!(candles[0].1, 0.0);
        assert!((candles[0].2 - 330.0).abs() < 1e-9);
        assert!(candles[0].3);
        assert!(!candles[1].3);
        assert_eq!(candles[2].2, 1.0);
        assert_eq!(scene.count_shapes(|s| matches!(s, Shape::SmaDot { .. })), 0);
    }

    #[test]
    fn markers_halos_and_rescale() {
        let points = vec![
            PricePoint::new(ts(0), None, 94.0, Some(95.0)),
            PricePoint::new(ts(1), None, 96.0, Some(95.0)),
            PricePoint::new(ts(2), None, 94.0, Some(95.0)),
        ];
        let buy = Signal {
            timestamp: ts(1),
            kind: SignalKind::Buy,
            price: 96.0,
        };
        let sell = Signal {
            timestamp: ts(2),
            kind: SignalKind::Sell,
            price: 94.0,
        };
        let layout = ChartLayout::default();
        let mut scene = ChartScene::build(
            ChartInput {
                symbol: "ETHUSDT",
                points: &points,
                signals: &[buy.clone(), sell],
                confirmations: &[buy],
                live_price: "94.00",
            },
            &layout,
            layout.plot_width_for(1920.0),
        );

        let marker_y = |kind: SignalKind| {
            scene
                .commands
                .iter()
                .find_map(|c| match c.shape {
                    Shape::SignalMarker { y, kind: k } if k == kind => Some(y),
                    _ => None,
                })
                .unwrap()
        };
        let y96 = scene.y_scale.map(96.0);
        let y94 = scene.y_scale.map(94.0);
        assert!((marker_y(SignalKind::Buy) - (y96 - MARKER_OFFSET)).abs() < 1e-9);
        assert!((marker_y(SignalKind::Sell) - (y94 + MARKER_OFFSET)).abs() < 1e-9);
        assert_eq!(scene.count_shapes(|s| matches!(s, Shape::SmaDot { .. })), 3);
        assert_eq!(scene.count_shapes(|s| matches!(s, Shape::Halo { .. })), 2);

        let before: Vec<_> = scene.commands.iter().map(|c| c.shape).collect();
        scene.rescale(500.0, &layout);
        assert!((scene.width - 430.0).abs() < 1e-9);
        let after: Vec<_> = scene.commands.iter().map(|c| c.shape).collect();
        assert_eq!(before, after);
        let sell_x = scene
            .commands
            .iter()
            .find(|c| matches!(c.shape, Shape::Halo { kind: SignalKind::Sell, .. }))
            .unwrap()
            .x;
        assert!((sell_x - 430.0).abs() < 1e-9);
    }
}

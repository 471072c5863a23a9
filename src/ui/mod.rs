pub mod chart;

use ratatui::layout::{Constraint, Direction, Layout};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph};
use ratatui::Frame;

use crate::config::CandleInterval;
use crate::store::LoadStatus;
use crate::view::ChartView;

use chart::ChartWidget;

pub use chart::viewport_px;

pub fn render(frame: &mut Frame, view: &ChartView, interval: CandleInterval) {
    let outer = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1), // heading
            Constraint::Min(6),    // body
            Constraint::Length(1), // keybinds
        ])
        .split(frame.area());

    let snapshot = view.snapshot();
    let heading = format!(
        "Top {} Coins - Candlestick Charts with Signals ({})",
        snapshot.coins.len(),
        interval
    );
    frame.render_widget(
        Paragraph::new(heading)
            .style(Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD))
            .centered(),
        outer[0],
    );

    match &snapshot.status {
        LoadStatus::Loading => {
            frame.render_widget(
                Paragraph::new("Loading...").style(Style::default().fg(Color::White)),
                outer[1],
            );
        }
        LoadStatus::Failed(message) => {
            frame.render_widget(
                Paragraph::new(message.as_str()).style(Style::default().fg(Color::Red)),
                outer[1],
            );
        }
        LoadStatus::Ready => render_charts(frame, view, outer[1]),
    }

    frame.render_widget(
        Paragraph::new(Line::from(vec![
            Span::styled("[←/→]", Style::default().fg(Color::Yellow)),
            Span::raw(" symbol  "),
            Span::styled("[g/End]", Style::default().fg(Color::Yellow)),
            Span::raw(" first/last  "),
            Span::styled("[q]", Style::default().fg(Color::Yellow)),
            Span::raw(" quit"),
        ]))
        .style(Style::default().fg(Color::DarkGray)),
        outer[2],
    );
}

fn render_charts(frame: &mut Frame, view: &ChartView, area: ratatui::layout::Rect) {
    let body = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Length(26), Constraint::Min(20)])
        .split(area);

    let live = &view.snapshot().live;
    let lines: Vec<Line> = view
        .scenes()
        .iter()
        .enumerate()
        .map(|(i, scene)| {
            let selected = i == view.selected();
            let marker = if selected { "> " } else { "  " };
            let style = if selected {
                Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD)
            } else {
                Style::default().fg(Color::White)
            };
            Line::from(vec![
                Span::styled(format!("{}{:<10}", marker, scene.symbol), style),
                Span::styled(
                    format!("${}", live.price_label(&scene.symbol)),
                    Style::default().fg(Color::White),
                ),
            ])
        })
        .collect();
    let scroll = (view.selected() as u16).saturating_sub(body[0].height.saturating_sub(3));
    frame.render_widget(
        Paragraph::new(lines)
            .scroll((scroll, 0))
            .block(
                Block::default()
                    .title(" Symbols ")
                    .borders(Borders::ALL)
                    .border_style(Style::default().fg(Color::DarkGray)),
            ),
        body[0],
    );

    match view.selected_scene() {
        Some(scene) => frame.render_widget(ChartWidget::new(scene), body[1]),
        None => frame.render_widget(
            Paragraph::new("No symbols returned").style(Style::default().fg(Color::DarkGray)),
            body[1],
        ),
    }
}

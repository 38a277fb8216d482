// Terminal presentation - layout, key mapping and terminal lifecycle
use std::io::{self, Stdout};

use crossterm::event::{Event, KeyCode, KeyEventKind, KeyModifiers};
use crossterm::execute;
use crossterm::terminal::{
    disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen,
};
use ratatui::backend::CrosstermBackend;
use ratatui::layout::{Alignment, Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::symbols;
use ratatui::text::{Line, Span};
use ratatui::widgets::{
    Axis, Block, Borders, Chart, Clear, Dataset, Gauge, GraphType, List, ListItem, Paragraph, Wrap,
};
use ratatui::{Frame, Terminal};

use crate::application::charts::{ChartHandle, ChartSlotId};
use crate::application::refresh_service::UiState;
use crate::domain::view::ViewState;

pub type Term = Terminal<CrosstermBackend<Stdout>>;

/// What a key press asks the event loop to do.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UiAction {
    Quit,
    Refresh,
    DownloadReport,
    DismissNotice,
}

pub fn setup_terminal() -> anyhow::Result<Term> {
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let terminal = Terminal::new(CrosstermBackend::new(stdout))?;
    Ok(terminal)
}

pub fn teardown_terminal(terminal: &mut Term) -> anyhow::Result<()> {
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;
    Ok(())
}

/// Map a terminal event to an action. While a notice is open it behaves like
/// a blocking alert: the next key press only dismisses it.
pub fn handle_event(event: &Event, notice_open: bool) -> Option<UiAction> {
    let Event::Key(key) = event else {
        return None;
    };
    if key.kind != KeyEventKind::Press {
        return None;
    }
    if notice_open {
        return Some(UiAction::DismissNotice);
    }
    match key.code {
        KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => {
            Some(UiAction::Quit)
        }
        KeyCode::Char('q') | KeyCode::Esc => Some(UiAction::Quit),
        KeyCode::Char('r') => Some(UiAction::Refresh),
        KeyCode::Char('d') => Some(UiAction::DownloadReport),
        _ => None,
    }
}

pub fn render(f: &mut Frame, state: &UiState) {
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Length(11),
            Constraint::Min(10),
            Constraint::Length(8),
        ])
        .split(f.area());

    render_header(f, rows[0], &state.view);
    render_decision_row(f, rows[1], &state.view);
    render_charts_row(f, rows[2], state);
    render_bottom_row(f, rows[3], &state.view);

    if let Some(notice) = &state.view.notice {
        render_notice(f, notice);
    }
}

fn render_header(f: &mut Frame, area: Rect, view: &ViewState) {
    let clock = chrono::Local::now().format("%Y-%m-%d %H:%M:%S").to_string();
    let refresh_style = if view.refresh.enabled() {
        Style::default().fg(Color::Cyan)
    } else {
        Style::default().fg(Color::DarkGray)
    };
    let download_style = if view.download.enabled() {
        Style::default().fg(Color::Cyan)
    } else {
        Style::default().fg(Color::DarkGray)
    };

    let line = Line::from(vec![
        Span::styled(
            "Investment Analysis Dashboard",
            Style::default().add_modifier(Modifier::BOLD),
        ),
        Span::raw("  |  "),
        Span::raw(clock),
        Span::raw("  |  Analysis date: "),
        Span::styled(&view.as_of_date, Style::default().add_modifier(Modifier::BOLD)),
        Span::raw("  |  Last price: "),
        Span::styled(&view.last_price, Style::default().add_modifier(Modifier::BOLD)),
        Span::raw("  |  [r] "),
        Span::styled(view.refresh.label(), refresh_style),
        Span::raw("  [d] "),
        Span::styled(view.download.label(), download_style),
        Span::raw("  [q] Quit"),
    ]);

    let header = Paragraph::new(line)
        .alignment(Alignment::Center)
        .block(Block::default().borders(Borders::ALL));
    f.render_widget(header, area);
}

fn render_decision_row(f: &mut Frame, area: Rect, view: &ViewState) {
    let cols = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage(22),
            Constraint::Percentage(22),
            Constraint::Percentage(28),
            Constraint::Percentage(28),
        ])
        .split(area);

    let decision_color = hex_color(&view.decision_color);
    let decision = Paragraph::new(vec![
        Line::default(),
        Line::from(Span::styled(
            format!("{}  {}", view.decision.glyph(), view.decision_label),
            Style::default().fg(decision_color).add_modifier(Modifier::BOLD),
        )),
    ])
    .alignment(Alignment::Center)
    .block(Block::default().borders(Borders::ALL).title("Decision"));
    f.render_widget(decision, cols[0]);

    // Terminal stand-in for the circular progress ring.
    let confidence = view.confidence_percent.clamp(0.0, 100.0);
    let gauge = Gauge::default()
        .block(Block::default().borders(Borders::ALL).title("Confidence"))
        .gauge_style(Style::default().fg(hex_color(&view.confidence_color)))
        .label(format!("{}%", view.confidence_percent))
        .percent(confidence.round() as u16);
    f.render_widget(gauge, cols[1]);

    let reasoning = Paragraph::new(view.reasoning.as_str())
        .wrap(Wrap { trim: true })
        .block(Block::default().borders(Borders::ALL).title("AI Reasoning"));
    f.render_widget(reasoning, cols[2]);

    let factors: Vec<ListItem> = view
        .key_factors
        .iter()
        .map(|factor| {
            ListItem::new(Line::from(vec![
                Span::styled(
                    format!("Factor {}: ", factor.position),
                    Style::default().add_modifier(Modifier::BOLD),
                ),
                Span::raw(factor.body.as_str()),
            ]))
        })
        .collect();
    let factors = List::new(factors)
        .block(Block::default().borders(Borders::ALL).title("Key Decision Factors"));
    f.render_widget(factors, cols[3]);
}

fn render_charts_row(f: &mut Frame, area: Rect, state: &UiState) {
    let cols = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
        .split(area);

    let lstm_title = format!(
        "LSTM Prediction  score {}  interval {}",
        state.view.lstm_score, state.view.lstm_interval
    );
    render_chart_slot(f, cols[0], state.charts.get(ChartSlotId::Prediction), &lstm_title);

    let sentiment_title = format!("Sentiment Trend  score {}", state.view.sentiment_score);
    render_chart_slot(
        f,
        cols[1],
        state.charts.get(ChartSlotId::SentimentTrend),
        &sentiment_title,
    );
}

fn render_chart_slot(f: &mut Frame, area: Rect, handle: Option<&ChartHandle>, title: &str) {
    let block = Block::default().borders(Borders::ALL).title(title.to_string());
    let Some(handle) = handle else {
        let placeholder = Paragraph::new("Loading...")
            .alignment(Alignment::Center)
            .block(block);
        f.render_widget(placeholder, area);
        return;
    };

    let color = hex_color(&handle.line_color);
    let dataset = Dataset::default()
        .name(handle.title.as_str())
        .marker(symbols::Marker::Braille)
        .graph_type(GraphType::Line)
        .style(Style::default().fg(color))
        .data(&handle.points);

    let x_bounds = handle.x_bounds();
    let y_bounds = handle.y_bounds();
    let chart = Chart::new(vec![dataset])
        .block(block)
        .x_axis(
            Axis::default()
                .style(Style::default().fg(Color::Gray))
                .bounds(x_bounds)
                .labels(edge_labels(&handle.labels)),
        )
        .y_axis(
            Axis::default()
                .style(Style::default().fg(Color::Gray))
                .bounds(y_bounds)
                .labels(vec![
                    Span::raw(format!("{:.2}", y_bounds[0])),
                    Span::raw(format!("{:.2}", y_bounds[1])),
                ]),
        );
    f.render_widget(chart, area);
}

fn render_bottom_row(f: &mut Frame, area: Rect, view: &ViewState) {
    let cols = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage(40),
            Constraint::Percentage(30),
            Constraint::Percentage(30),
        ])
        .split(area);

    let events: Vec<ListItem> = view
        .events
        .iter()
        .map(|event| {
            ListItem::new(Line::from(vec![
                Span::styled("• ", Style::default().fg(Color::Yellow)),
                Span::raw(event.as_str()),
            ]))
        })
        .collect();
    let events = List::new(events)
        .block(Block::default().borders(Borders::ALL).title("Event Impact"));
    f.render_widget(events, cols[0]);

    let memory = Paragraph::new(vec![
        Line::from(vec![
            Span::raw("Scenarios found: "),
            Span::styled(&view.scenarios_found, Style::default().add_modifier(Modifier::BOLD)),
        ]),
        Line::from(vec![
            Span::raw("Success rate: "),
            Span::styled(&view.success_rate, Style::default().add_modifier(Modifier::BOLD)),
        ]),
        Line::from(view.memory_insight.as_str()),
    ])
    .wrap(Wrap { trim: true })
    .block(Block::default().borders(Borders::ALL).title("Memory Bank"));
    f.render_widget(memory, cols[1]);

    let sentiment = Paragraph::new(view.sentiment_summary.as_str())
        .wrap(Wrap { trim: true })
        .block(Block::default().borders(Borders::ALL).title("Sentiment Summary"));
    f.render_widget(sentiment, cols[2]);
}

fn render_notice(f: &mut Frame, notice: &str) {
    let area = centered_rect(50, 20, f.area());
    f.render_widget(Clear, area);
    let popup = Paragraph::new(vec![
        Line::from(notice),
        Line::default(),
        Line::from(Span::styled(
            "press any key to dismiss",
            Style::default().fg(Color::DarkGray),
        )),
    ])
    .alignment(Alignment::Center)
    .wrap(Wrap { trim: true })
    .block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Red))
            .title("Error"),
    );
    f.render_widget(popup, area);
}

fn centered_rect(percent_x: u16, percent_y: u16, area: Rect) -> Rect {
    let vertical = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(area);
    let horizontal = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(vertical[1]);
    horizontal[1]
}

/// First / middle / last x labels, enough for a narrow terminal axis.
fn edge_labels(labels: &[String]) -> Vec<Span<'_>> {
    match labels.len() {
        0 => Vec::new(),
        1 => vec![Span::raw(labels[0].as_str())],
        2 => vec![Span::raw(labels[0].as_str()), Span::raw(labels[1].as_str())],
        n => vec![
            Span::raw(labels[0].as_str()),
            Span::raw(labels[n / 2].as_str()),
            Span::raw(labels[n - 1].as_str()),
        ],
    }
}

fn hex_color(hex: &str) -> Color {
    let digits = hex.trim().trim_start_matches('#');
    if digits.len() == 6 && digits.is_ascii() {
        if let (Ok(r), Ok(g), Ok(b)) = (
            u8::from_str_radix(&digits[0..2], 16),
            u8::from_str_radix(&digits[2..4], 16),
            u8::from_str_radix(&digits[4..6], 16),
        ) {
            return Color::Rgb(r, g, b);
        }
    }
    Color::Gray
}

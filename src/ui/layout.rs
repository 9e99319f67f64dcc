use {
    crate::aggregator_core::TrendSignal,
    crate::source::{PaymentType, Sector},
    crate::state::DashboardState,
    crate::ui::renderer::{format_count, format_kes, format_pct, signal_label},
    ratatui::{
        layout::{Constraint, Direction, Layout as RatLayout, Rect},
        style::{Color, Modifier, Style},
        text::{Line, Span},
        widgets::{Block, Borders, Paragraph, Row, Sparkline, Table},
        Frame,
    },
};

/// Render the main UI layout
pub fn render_layout(f: &mut Frame, area: Rect, state: &DashboardState) {
    let chunks = RatLayout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Header
            Constraint::Length(3), // Stat tiles
            Constraint::Length(8), // TPM sparkline
            Constraint::Min(0),    // Breakdown + alerts
        ])
        .split(area);

    render_header(f, chunks[0], state);
    render_tiles(f, chunks[1], state);
    render_tpm_chart(f, chunks[2], state);

    let lower = RatLayout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(60), Constraint::Percentage(40)])
        .split(chunks[3]);

    render_breakdowns(f, lower[0], state);
    render_side_panel(f, lower[1], state);
}

fn render_header(f: &mut Frame, area: Rect, state: &DashboardState) {
    let text = vec![Line::from(vec![
        Span::styled(
            "PesaFlow",
            Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
        ),
        Span::raw(" - Live Mobile Money Monitor | Region: "),
        Span::styled(
            state.region.clone(),
            Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD),
        ),
        Span::raw(" | \u{2190}/\u{2192} switch region, 'q' quit"),
    ])];

    let header = Block::default().borders(Borders::ALL);
    f.render_widget(Paragraph::new(text).block(header), area);
}

fn render_tiles(f: &mut Frame, area: Rect, state: &DashboardState) {
    let tiles = RatLayout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage(25),
            Constraint::Percentage(25),
            Constraint::Percentage(25),
            Constraint::Percentage(25),
        ])
        .split(area);

    let (total, amount, tpm, reading) = match &state.snapshot {
        Some(snapshot) => (
            format_count(snapshot.stats.total_count),
            format_kes(snapshot.stats.total_amount_estimate),
            format_count(snapshot.stats.current_window_count),
            format!(
                "{} ({})",
                signal_label(snapshot.stats.signal),
                format_pct(snapshot.reading.deviation_pct)
            ),
        ),
        None => (
            "-".to_string(),
            "-".to_string(),
            "-".to_string(),
            "waiting...".to_string(),
        ),
    };

    let signal_color = match state.snapshot.as_ref().map(|s| s.stats.signal) {
        Some(TrendSignal::Spike) => Color::Green,
        Some(TrendSignal::Drop) => Color::Red,
        _ => Color::Gray,
    };

    render_tile(f, tiles[0], "Txns (Last Hour)", &total, Color::Green);
    render_tile(f, tiles[1], "Amount (Est)", &amount, Color::Magenta);
    render_tile(f, tiles[2], "Current TPM", &tpm, Color::Cyan);
    render_tile(f, tiles[3], "Trend", &reading, signal_color);
}

fn render_tile(f: &mut Frame, area: Rect, title: &str, value: &str, color: Color) {
    let block = Block::default().borders(Borders::ALL).title(title.to_string());
    let text = Paragraph::new(Line::from(Span::styled(
        value.to_string(),
        Style::default().fg(color).add_modifier(Modifier::BOLD),
    )))
    .block(block);
    f.render_widget(text, area);
}

fn render_tpm_chart(f: &mut Frame, area: Rect, state: &DashboardState) {
    let data: Vec<u64> = state
        .snapshot
        .as_ref()
        .map(|s| s.series.window_series.iter().map(|b| b.count).collect())
        .unwrap_or_default();

    let sparkline = Sparkline::default()
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title("Transactions per Minute (trailing hour)"),
        )
        .style(Style::default().fg(Color::Cyan))
        .data(&data);
    f.render_widget(sparkline, area);
}

fn render_breakdowns(f: &mut Frame, area: Rect, state: &DashboardState) {
    let header = Row::new(vec!["Category", "Latest Window", "Share"])
        .style(Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD));

    let mut rows: Vec<Row> = Vec::new();
    if let Some(snapshot) = &state.snapshot {
        let latest_count = snapshot
            .series
            .window_series
            .last()
            .map(|b| b.count as f64)
            .unwrap_or(0.0);

        if let Some(allocation) = snapshot.series.payment_breakdown.last() {
            for (payment, value) in PaymentType::all().iter().zip(&allocation.values) {
                rows.push(breakdown_row(payment.as_str(), *value, latest_count, Color::Green));
            }
        }
        if let Some(allocation) = snapshot.series.sector_breakdown.last() {
            for (sector, value) in Sector::all().iter().zip(&allocation.values) {
                rows.push(breakdown_row(sector.as_str(), *value, latest_count, Color::Cyan));
            }
        }
    }

    let widths = [
        Constraint::Length(16),
        Constraint::Length(14),
        Constraint::Length(8),
    ];
    let table = Table::new(rows, widths).header(header).block(
        Block::default()
            .borders(Borders::ALL)
            .title("Latest Window Breakdown"),
    );
    f.render_widget(table, area);
}

fn breakdown_row(label: &str, value: f64, latest_count: f64, color: Color) -> Row<'static> {
    let share = if latest_count > 0.0 {
        format!("{:.0}%", value / latest_count * 100.0)
    } else {
        "-".to_string()
    };
    Row::new(vec![
        label.to_string(),
        format!("{:.0}", value),
        share,
    ])
    .style(Style::default().fg(color))
}

fn render_side_panel(f: &mut Frame, area: Rect, state: &DashboardState) {
    let panels = RatLayout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(8),
            Constraint::Length(5),
            Constraint::Min(0),
        ])
        .split(area);

    render_top_regions(f, panels[0], state);
    render_hourly(f, panels[1], state);
    render_alerts(f, panels[2], state);
}

fn render_hourly(f: &mut Frame, area: Rect, state: &DashboardState) {
    let heatmap: &[(u32, u64)] = state
        .snapshot
        .as_ref()
        .map(|s| s.series.hourly_heatmap.as_slice())
        .unwrap_or(&[]);
    let max = heatmap.iter().map(|(_, c)| *c).max().unwrap_or(0).max(1);

    let lines: Vec<Line> = heatmap
        .iter()
        .map(|(hour, count)| {
            let bar = "\u{2588}".repeat((count * 16 / max) as usize);
            Line::from(vec![
                Span::raw(format!("{:02}:00 ", hour)),
                Span::styled(bar, Style::default().fg(Color::Magenta)),
                Span::raw(format!(" {}", format_count(*count))),
            ])
        })
        .collect();

    let block = Block::default().borders(Borders::ALL).title("Hourly Volume");
    f.render_widget(Paragraph::new(lines).block(block), area);
}

fn render_top_regions(f: &mut Frame, area: Rect, state: &DashboardState) {
    let lines: Vec<Line> = state
        .snapshot
        .as_ref()
        .map(|s| {
            s.series
                .top_regions
                .iter()
                .map(|(region, total)| {
                    Line::from(vec![
                        Span::styled(
                            format!("{:<16}", region),
                            Style::default().fg(Color::Yellow),
                        ),
                        Span::raw(format_count(*total)),
                    ])
                })
                .collect()
        })
        .unwrap_or_default();

    let block = Block::default().borders(Borders::ALL).title("Top Regions");
    f.render_widget(Paragraph::new(lines).block(block), area);
}

fn render_alerts(f: &mut Frame, area: Rect, state: &DashboardState) {
    // Most recent last, matching the log snapshot order
    let lines: Vec<Line> = state
        .alerts
        .iter()
        .map(|alert| {
            let color = match alert.signal {
                TrendSignal::Spike => Color::Green,
                TrendSignal::Drop => Color::Red,
                TrendSignal::Stable => Color::Gray,
            };
            Line::from(vec![
                Span::raw(format!("{} - {}: ", alert.timestamp, alert.region)),
                Span::styled(signal_label(alert.signal), Style::default().fg(color)),
            ])
        })
        .collect();

    let block = Block::default().borders(Borders::ALL).title("Recent Alerts");
    f.render_widget(Paragraph::new(lines).block(block), area);
}

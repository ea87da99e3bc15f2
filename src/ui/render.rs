use crate::calendar::{time, CalendarEvent, ViewFilter};
use crate::ui::app::{App, InputMode};
use chrono::{DateTime, Local};
use ratatui::layout::{Alignment, Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Cell, Paragraph, Row, Table, Wrap};
use ratatui::Frame;

const FILTERS: [ViewFilter; 4] = [
    ViewFilter::All,
    ViewFilter::Upcoming,
    ViewFilter::Past,
    ViewFilter::Birthdays,
];

/// Draw one frame. The visible subset is recomputed from the filter
/// engine on every render.
pub fn draw(f: &mut Frame, app: &mut App, now: DateTime<Local>) {
    if !app.signed_in() {
        draw_signed_out(f, app);
        return;
    }

    let visible = app.visible_events(now);

    // Keep the selection inside the visible list after filter changes
    if let Some(selected) = app.table_state.selected() {
        if selected >= visible.len() {
            app.table_state.select(visible.last().map(|_| visible.len() - 1));
            if visible.is_empty() {
                app.detail_open = false;
            }
        }
    }

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Min(5),
            Constraint::Length(1),
        ])
        .split(f.area());

    draw_filter_bar(f, app, chunks[0]);

    let selected_event = app
        .detail_open
        .then(|| app.table_state.selected())
        .flatten()
        .and_then(|i| visible.get(i).cloned());

    if let Some(event) = &selected_event {
        let main = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(60), Constraint::Percentage(40)])
            .split(chunks[1]);
        draw_event_table(f, app, &visible, main[0]);
        draw_detail(f, event, main[1]);
    } else {
        draw_event_table(f, app, &visible, chunks[1]);
    }

    draw_status_line(f, app, chunks[2]);
}

fn draw_signed_out(f: &mut Frame, app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage(40),
            Constraint::Length(5),
            Constraint::Min(0),
        ])
        .split(f.area());

    let mut lines = vec![
        Line::from(Span::styled(
            "Calendar Events Viewer",
            Style::default().add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
        Line::from("Press s to sign in with Google, q to quit"),
    ];
    if let Some(status) = &app.status {
        lines.push(Line::from(""));
        lines.push(Line::from(Span::styled(
            status.clone(),
            Style::default().fg(Color::Yellow),
        )));
    }
    let paragraph = Paragraph::new(lines).alignment(Alignment::Center);
    f.render_widget(paragraph, chunks[1]);
}

fn draw_filter_bar(f: &mut Frame, app: &App, area: Rect) {
    let mut spans = Vec::new();
    for filter in FILTERS {
        let style = if filter == app.filter {
            Style::default()
                .fg(Color::Black)
                .bg(Color::Blue)
                .add_modifier(Modifier::BOLD)
        } else {
            Style::default()
        };
        spans.push(Span::styled(format!(" {} ", filter.label()), style));
        spans.push(Span::raw(" "));
    }

    match app.input_mode {
        InputMode::DateEntry => {
            spans.push(Span::styled(
                format!("Date: {}_", app.date_input),
                Style::default().fg(Color::Yellow),
            ));
        }
        InputMode::Normal => {
            if let Some(date) = app.selected_date {
                spans.push(Span::styled(
                    format!("Date: {} (c to clear)", date),
                    Style::default().fg(Color::Yellow),
                ));
            }
        }
    }

    let bar = Paragraph::new(Line::from(spans))
        .block(Block::default().borders(Borders::ALL).title("Your Calendar Events"));
    f.render_widget(bar, area);
}

fn draw_event_table(f: &mut Frame, app: &mut App, visible: &[CalendarEvent], area: Rect) {
    let block = Block::default().borders(Borders::ALL).title("Events");

    if visible.is_empty() {
        let empty = Paragraph::new("No events found")
            .alignment(Alignment::Center)
            .block(block);
        f.render_widget(empty, area);
        return;
    }

    let header = Row::new(vec!["Event Name", "Date", "Time"])
        .style(Style::default().add_modifier(Modifier::BOLD));

    let rows: Vec<Row> = visible
        .iter()
        .map(|event| {
            let start = time::effective_start(event);
            let date = start
                .map(|s| time::format_list_date(s, event.is_birthday()))
                .unwrap_or_default();
            Row::new(vec![
                Cell::from(event.summary.clone().unwrap_or_default()),
                Cell::from(date),
                Cell::from(time::format_time_cell(event)),
            ])
        })
        .collect();

    let table = Table::new(
        rows,
        [
            Constraint::Percentage(45),
            Constraint::Percentage(30),
            Constraint::Percentage(25),
        ],
    )
    .header(header)
    .block(block)
    .row_highlight_style(Style::default().add_modifier(Modifier::REVERSED));

    f.render_stateful_widget(table, area, &mut app.table_state);
}

fn draw_detail(f: &mut Frame, event: &CalendarEvent, area: Rect) {
    let is_birthday = event.is_birthday();
    let mut lines = vec![Line::from(Span::styled(
        event.summary.clone().unwrap_or_default(),
        Style::default().add_modifier(Modifier::BOLD),
    ))];

    if let Some(start) = time::effective_start(event) {
        lines.push(Line::from(time::format_full_date(start, is_birthday)));
    }
    if let Some(range) = time::format_time_range(event) {
        lines.push(Line::from(range));
    }

    if let Some(location) = &event.location {
        lines.push(Line::from(""));
        lines.push(Line::from(format!("Location: {}", location)));
    }

    if let Some(description) = &event.description {
        lines.push(Line::from(""));
        lines.push(Line::from(Span::styled(
            "Description",
            Style::default().fg(Color::Gray),
        )));
        for text_line in description.lines() {
            lines.push(Line::from(text_line.to_string()));
        }
    }

    if let Some(link) = event.meet_link() {
        lines.push(Line::from(""));
        lines.push(Line::from(Span::styled(
            link,
            Style::default().fg(Color::Blue),
        )));
    }

    let detail = Paragraph::new(lines)
        .wrap(Wrap { trim: false })
        .block(Block::default().borders(Borders::ALL).title("Details"));
    f.render_widget(detail, area);
}

fn draw_status_line(f: &mut Frame, app: &App, area: Rect) {
    let text = if let Some(status) = &app.status {
        status.clone()
    } else if app.fetch_pending {
        String::from("Fetching events...")
    } else {
        String::from(
            "a/u/p/b filter | d date | c clear date | Up/Down select | Enter details | r refresh | o sign out | q quit",
        )
    };
    let line = Paragraph::new(text).style(Style::default().fg(Color::DarkGray));
    f.render_widget(line, area);
}

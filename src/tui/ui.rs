//! TUI rendering module.
//!
//! Pure rendering: everything drawn here is read from [`App`]; no state is
//! mutated during a frame.

use super::App;
use chrono::{DateTime, Utc};
use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Cell, Clear, Paragraph, Row, Table, TableState},
    Frame,
};
use unicode_width::UnicodeWidthStr;

/// Main draw function - renders the entire TUI.
pub fn draw(f: &mut Frame, app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Header/search
            Constraint::Min(0),    // Repository table
            Constraint::Length(1), // Status bar
        ])
        .split(f.area());

    draw_header(f, app, chunks[0]);
    draw_table(f, app, chunks[1]);
    draw_status_bar(f, app, chunks[2]);

    if app.deletion.awaiting_confirmation() || app.deletion.in_flight() {
        draw_confirm_modal(f, app);
    }
    if app.show_help {
        draw_help_popup(f);
    }
}

fn draw_header(f: &mut Frame, app: &App, area: Rect) {
    let title_style = Style::default()
        .fg(Color::Yellow)
        .add_modifier(Modifier::BOLD);
    let dim = Style::default().fg(Color::DarkGray);

    let account = match &app.profile {
        Some(profile) => match &profile.name {
            Some(name) => format!("{} ({})", name, profile.login),
            None => profile.login.clone(),
        },
        None => app.config.github.login.clone(),
    };

    let mut top = vec![
        Span::styled(" reposweep ", title_style),
        Span::styled(account, Style::default().fg(Color::Cyan)),
        Span::raw("  "),
        Span::styled(
            format!(
                "{} shown / {} repos",
                app.derived.total_count,
                app.mirror.len()
            ),
            dim,
        ),
        Span::raw("  "),
        Span::styled(
            format!("page {}/{}", app.view.page, app.derived.total_pages),
            dim,
        ),
    ];
    if app.is_loading {
        top.push(Span::raw("  "));
        top.push(Span::styled(
            format!("{} syncing...", app.spinner_char()),
            Style::default().fg(Color::Yellow),
        ));
    }

    let search = if app.search_mode || !app.view.search_text.is_empty() {
        Line::from(vec![
            Span::styled(" /", Style::default().fg(Color::Yellow)),
            Span::raw(app.view.search_text.clone()),
            Span::styled(if app.search_mode { "▌" } else { "" }, dim),
            Span::raw("  "),
            Span::styled(filter_summary(app), dim),
        ])
    } else {
        Line::from(vec![Span::raw(" "), Span::styled(filter_summary(app), dim)])
    };

    let block = Block::default().borders(Borders::BOTTOM);
    let paragraph = Paragraph::new(vec![Line::from(top), search]).block(block);
    f.render_widget(paragraph, area);
}

fn filter_summary(app: &App) -> String {
    format!(
        "vis:{}  kind:{}  lang:{}  sort:{} {}",
        app.view.visibility.label(),
        app.view.derivation.label(),
        app.view.language.as_deref().unwrap_or("all"),
        app.view.sort_key.label(),
        app.view.sort_direction.label(),
    )
}

fn draw_table(f: &mut Frame, app: &App, area: Rect) {
    let header_style = Style::default()
        .fg(Color::Cyan)
        .add_modifier(Modifier::BOLD);
    let header = Row::new(vec!["Name", "Vis", "Language", "★", "⑂", "Updated"])
        .style(header_style);

    let name_width = (area.width as usize).saturating_sub(42).max(16);

    let rows: Vec<Row> = app
        .derived
        .page_items
        .iter()
        .map(|repo| {
            let name_style = if repo.fork {
                Style::default().fg(Color::DarkGray)
            } else {
                Style::default().fg(Color::White)
            };
            Row::new(vec![
                Cell::from(truncate_str(&repo.name, name_width)).style(name_style),
                Cell::from(repo.visibility().label()),
                Cell::from(truncate_str(
                    repo.language.as_deref().unwrap_or("-"),
                    12,
                )),
                Cell::from(repo.stargazers_count.to_string()),
                Cell::from(repo.forks_count.to_string()),
                Cell::from(relative_age(repo.updated_at)),
            ])
        })
        .collect();

    let widths = [
        Constraint::Min(16),
        Constraint::Length(7),
        Constraint::Length(12),
        Constraint::Length(6),
        Constraint::Length(6),
        Constraint::Length(9),
    ];

    let table = Table::new(rows, widths)
        .header(header)
        .block(Block::default().borders(Borders::NONE))
        .row_highlight_style(
            Style::default()
                .bg(Color::DarkGray)
                .add_modifier(Modifier::BOLD),
        );

    let mut state = TableState::default();
    if !app.derived.page_items.is_empty() {
        state.select(Some(app.selected));
    }
    f.render_stateful_widget(table, area, &mut state);

    if app.derived.page_items.is_empty() && !app.is_loading {
        let msg = if app.mirror.is_empty() {
            "No repositories. Press r to sync."
        } else {
            "No repositories match the current filters. Press x to clear them."
        };
        let paragraph = Paragraph::new(msg)
            .style(Style::default().fg(Color::DarkGray))
            .alignment(Alignment::Center);
        let centered = Rect {
            y: area.y + area.height / 3,
            height: 1,
            ..area
        };
        f.render_widget(paragraph, centered);
    }
}

fn draw_status_bar(f: &mut Frame, app: &App, area: Rect) {
    let line = if let Some(err) = &app.error_message {
        Line::from(Span::styled(
            format!(" {}", err),
            Style::default().fg(Color::Red),
        ))
    } else if let Some(notice) = &app.notice {
        Line::from(Span::styled(
            format!(" {}", notice),
            Style::default().fg(Color::Green),
        ))
    } else {
        Line::from(Span::styled(
            " j/k move  h/l page  / search  v/f/L filters  s/S sort  d delete  r sync  ? help  q quit",
            Style::default().fg(Color::DarkGray),
        ))
    };
    f.render_widget(Paragraph::new(line), area);
}

fn draw_confirm_modal(f: &mut Frame, app: &App) {
    let Some(repo) = app.deletion.target() else {
        return;
    };
    let area = popup_rect(50, 20, 44, 7, f.area());
    f.render_widget(Clear, area);

    let block = Block::default()
        .title(" Delete repository ")
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Red));

    let lines = if app.deletion.in_flight() {
        vec![
            Line::from(""),
            Line::from(Span::styled(
                format!("  {} deleting {}...", app.spinner_char(), repo.full_name),
                Style::default().fg(Color::Yellow),
            )),
        ]
    } else {
        vec![
            Line::from(""),
            Line::from(vec![
                Span::raw("  Permanently delete "),
                Span::styled(
                    repo.full_name.clone(),
                    Style::default().fg(Color::White).add_modifier(Modifier::BOLD),
                ),
                Span::raw("?"),
            ]),
            Line::from(""),
            Line::from(Span::styled(
                "  This cannot be undone.  [y] delete  [n] cancel",
                Style::default().fg(Color::DarkGray),
            )),
        ]
    };

    f.render_widget(Paragraph::new(lines).block(block), area);
}

fn draw_help_popup(f: &mut Frame) {
    let area = popup_rect(60, 60, 52, 18, f.area());
    f.render_widget(Clear, area);

    let block = Block::default()
        .title(" Help ")
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Yellow));

    let key_style = Style::default().fg(Color::Cyan);
    let entries: &[(&str, &str)] = &[
        ("j / k", "move cursor"),
        ("h / l", "previous / next page"),
        ("g / G", "first / last page"),
        ("/", "search name, description, language"),
        ("v", "cycle visibility filter"),
        ("f", "cycle fork filter"),
        ("L", "cycle language filter"),
        ("x", "clear all filters"),
        ("s", "cycle sort key"),
        ("S", "toggle sort direction"),
        ("d", "delete selected repository"),
        ("Enter", "open in browser"),
        ("r", "re-sync from GitHub"),
        ("q", "quit"),
    ];

    let lines: Vec<Line> = entries
        .iter()
        .map(|(key, desc)| {
            Line::from(vec![
                Span::styled(format!("  {:<8}", key), key_style),
                Span::raw(*desc),
            ])
        })
        .collect();

    f.render_widget(Paragraph::new(lines).block(block), area);
}

/// Centered popup rect sized as a percentage of the frame, with minimums.
fn popup_rect(percent_x: u16, percent_y: u16, min_w: u16, min_h: u16, frame: Rect) -> Rect {
    let w = (frame.width * percent_x / 100).max(min_w).min(frame.width);
    let h = (frame.height * percent_y / 100).max(min_h).min(frame.height);
    Rect {
        x: frame.x + (frame.width.saturating_sub(w)) / 2,
        y: frame.y + (frame.height.saturating_sub(h)) / 2,
        width: w,
        height: h,
    }
}

/// Truncate to a display width, appending an ellipsis when cut.
fn truncate_str(s: &str, max_width: usize) -> String {
    if s.width() <= max_width {
        return s.to_string();
    }
    let mut out = String::new();
    let mut width = 0;
    for c in s.chars() {
        let cw = unicode_width::UnicodeWidthChar::width(c).unwrap_or(0);
        if width + cw > max_width.saturating_sub(1) {
            break;
        }
        width += cw;
        out.push(c);
    }
    out.push('…');
    out
}

/// Compact relative age, e.g. "3d", "2mo".
fn relative_age(then: DateTime<Utc>) -> String {
    let delta = Utc::now().signed_duration_since(then);
    let minutes = delta.num_minutes();
    if minutes < 1 {
        return "now".to_string();
    }
    if minutes < 60 {
        return format!("{}m", minutes);
    }
    let hours = delta.num_hours();
    if hours < 24 {
        return format!("{}h", hours);
    }
    let days = delta.num_days();
    if days < 30 {
        return format!("{}d", days);
    }
    if days < 365 {
        return format!("{}mo", days / 30);
    }
    format!("{}y", days / 365)
}

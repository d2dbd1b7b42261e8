use tasko_client::alert::AlertKind;
use tasko_client::view::{SortDirection, SortKey};
use tasko_shared::{Priority, Task, TaskStatus};
use tui::{
    backend::Backend,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Span, Spans},
    widgets::{Block, Borders, Cell, Clear, List, ListItem, Paragraph, Row, Table, TableState, Tabs, Wrap},
    Frame,
};

use crate::app::{App, AuthField, AuthMode, Carry, FormField, Mode, Screen, Tab, TaskForm};

pub fn draw<B: Backend>(f: &mut Frame<B>, app: &mut App) {
    match app.screen {
        Screen::Login => draw_login(f, app),
        Screen::Dashboard => draw_dashboard(f, app),
    }
}

fn draw_login<B: Backend>(f: &mut Frame<B>, app: &mut App) {
    let area = centered(50, 14, f.size());
    let title = match app.auth.mode {
        AuthMode::Login => "tasko · Login",
        AuthMode::Signup => "tasko · Sign up",
    };

    let mut lines = vec![
        Spans::from(Span::styled(
            "Enter your credentials to access your account",
            Style::default().fg(Color::Gray),
        )),
        Spans::from(""),
    ];
    for field in app.auth.fields() {
        let (label, value) = match field {
            AuthField::Name => ("Name", app.auth.name.clone()),
            AuthField::Email => ("Email", app.auth.email.clone()),
            AuthField::Password => ("Password", "•".repeat(app.auth.password.chars().count())),
        };
        lines.push(input_line(label, &value, *field == app.auth.focus));
    }
    lines.push(Spans::from(""));
    if app.snapshot.loading {
        lines.push(Spans::from(Span::styled("Working…", Style::default().fg(Color::Yellow))));
    }
    if let Some(alert) = app.alerts.visible() {
        lines.push(alert_line(alert.kind, &alert.message));
    }

    let form = Paragraph::new(lines)
        .block(Block::default().borders(Borders::ALL).title(title))
        .wrap(Wrap { trim: false });
    f.render_widget(form, area);

    let switch = match app.auth.mode {
        AuthMode::Login => "F2 sign up",
        AuthMode::Signup => "F2 log in",
    };
    let help = Paragraph::new(format!("Enter submit · Tab next field · {switch} · Esc quit"))
        .alignment(Alignment::Center)
        .style(Style::default().fg(Color::DarkGray));
    let below = Rect {
        y: (area.y + area.height).min(f.size().height.saturating_sub(1)),
        height: 1,
        ..area
    };
    f.render_widget(help, below);
}

fn draw_dashboard<B: Backend>(f: &mut Frame<B>, app: &mut App) {
    let alert = app.alerts.visible().map(|a| (a.kind, a.message.clone()));

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .margin(1)
        .constraints(
            [
                Constraint::Length(3),
                Constraint::Length(1),
                Constraint::Length(if alert.is_some() { 1 } else { 0 }),
                Constraint::Min(5),
                Constraint::Length(1),
            ]
            .as_ref(),
        )
        .split(f.size());

    let tabs = Tabs::new(vec![Spans::from("List View"), Spans::from("Board View")])
        .block(Block::default().borders(Borders::ALL).title("Task Management"))
        .select(match app.tab {
            Tab::List => 0,
            Tab::Board => 1,
        })
        .highlight_style(Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD));
    f.render_widget(tabs, chunks[0]);

    f.render_widget(Paragraph::new(filter_line(app)), chunks[1]);

    if let Some((kind, message)) = alert {
        f.render_widget(Paragraph::new(alert_line(kind, &message)), chunks[2]);
    }

    match app.tab {
        Tab::List => draw_list(f, app, chunks[3]),
        Tab::Board => draw_board(f, app, chunks[3]),
    }

    f.render_widget(
        Paragraph::new(help_line(app)).style(Style::default().fg(Color::DarkGray)),
        chunks[4],
    );

    match &app.mode {
        Mode::Form(form) => draw_form(f, form),
        Mode::ConfirmDelete { title, .. } => draw_confirm(f, title),
        _ => {}
    }
}

fn filter_line(app: &App) -> Spans<'static> {
    let search_style = if app.mode == Mode::Search {
        Style::default().fg(Color::Yellow)
    } else {
        Style::default()
    };
    let status = app.view.status.map_or("All status", TaskStatus::as_str);
    let priority = app.view.priority.map_or("All priority", Priority::as_str);

    let mut spans = vec![
        Span::raw("Search: "),
        Span::styled(format!("[{}]", app.view.search), search_style),
        Span::raw(format!("  Status: {status}  Priority: {priority}")),
    ];
    if app.snapshot.loading {
        spans.push(Span::styled("  loading…", Style::default().fg(Color::Yellow)));
    } else if app.snapshot.from_cache {
        spans.push(Span::styled("  (cached)", Style::default().fg(Color::DarkGray)));
    }
    Spans::from(spans)
}

fn draw_list<B: Backend>(f: &mut Frame<B>, app: &App, area: Rect) {
    let header = Row::new(SortKey::ALL.iter().enumerate().map(|(i, key)| {
        let arrow = match app.view.sort {
            Some(spec) if spec.key == *key => match spec.direction {
                SortDirection::Ascending => " ▲",
                SortDirection::Descending => " ▼",
            },
            _ => "",
        };
        Cell::from(format!("{} {}{}", i + 1, key.label(), arrow))
    }))
    .style(Style::default().add_modifier(Modifier::BOLD));

    let rows: Vec<Row> = app
        .visible_tasks()
        .into_iter()
        .map(|task| {
            Row::new(vec![
                Cell::from(task.title.clone()),
                Cell::from(task.status.as_str()),
                Cell::from(Span::styled(task.priority.as_str(), priority_style(task.priority))),
                Cell::from(task.due_date.format("%Y-%m-%d").to_string()),
            ])
        })
        .collect();
    let empty = rows.is_empty();

    let widths = [
        Constraint::Percentage(46),
        Constraint::Percentage(18),
        Constraint::Percentage(16),
        Constraint::Percentage(20),
    ];
    let table = Table::new(rows)
        .header(header)
        .block(Block::default().borders(Borders::ALL).title("Tasks"))
        .widths(&widths)
        .highlight_style(Style::default().bg(Color::DarkGray))
        .highlight_symbol("> ");

    let mut state = TableState::default();
    if !empty {
        state.select(Some(app.list_cursor));
    }
    f.render_stateful_widget(table, area, &mut state);
}

fn draw_board<B: Backend>(f: &mut Frame<B>, app: &App, area: Rect) {
    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Ratio(1, 3), Constraint::Ratio(1, 3), Constraint::Ratio(1, 3)].as_ref())
        .split(area);

    let carry = match &app.mode {
        Mode::Carrying(carry) => Some(carry),
        _ => None,
    };
    let lands_after = carry.is_some_and(|c| app.drop_lands_after(c));

    for (column, tasks) in app.board_columns().iter().enumerate() {
        let status = TaskStatus::ALL[column];
        let mut items: Vec<ListItem> = Vec::new();

        for (row, task) in tasks.iter().enumerate() {
            let slot = is_drop_slot(carry, column, row);
            if slot && !lands_after {
                items.push(drop_marker());
            }
            let selected = carry.is_none() && app.board_cursor == (column, row);
            let carried = carry.is_some_and(|c| c.task_id == task.id);
            items.push(card(task, selected, carried));
            if slot && lands_after {
                items.push(drop_marker());
            }
        }
        if is_drop_slot(carry, column, tasks.len()) {
            items.push(drop_marker());
        }

        let focused = carry.map_or(app.board_cursor.0 == column, |c| c.column == column);
        let border = if focused {
            Style::default().fg(Color::Yellow)
        } else {
            Style::default()
        };
        let list = List::new(items).block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(border)
                .title(format!("{} ({})", status, tasks.len())),
        );
        f.render_widget(list, chunks[column]);
    }
}

fn is_drop_slot(carry: Option<&Carry>, column: usize, row: usize) -> bool {
    carry.is_some_and(|c| c.column == column && c.row == row)
}

fn drop_marker() -> ListItem<'static> {
    ListItem::new(Span::styled("▶ drop here", Style::default().fg(Color::Yellow)))
}

fn card(task: &Task, selected: bool, carried: bool) -> ListItem<'static> {
    let mut title_style = Style::default().add_modifier(Modifier::BOLD);
    if selected {
        title_style = title_style.bg(Color::DarkGray);
    }
    if carried {
        title_style = title_style.fg(Color::Yellow);
    }

    let mut lines = vec![Spans::from(Span::styled(task.title.clone(), title_style))];
    if !task.description.is_empty() {
        lines.push(Spans::from(Span::styled(
            task.description.clone(),
            Style::default().fg(Color::Gray),
        )));
    }
    lines.push(Spans::from(vec![
        Span::styled(task.priority.as_str(), priority_style(task.priority)),
        Span::raw(format!(" · due {}", task.due_date.format("%Y-%m-%d"))),
    ]));
    lines.push(Spans::from(""));
    ListItem::new(lines)
}

fn draw_form<B: Backend>(f: &mut Frame<B>, form: &TaskForm) {
    let area = centered(60, 13, f.size());
    let title = match form.editing {
        Some(_) => "Edit Task",
        None => "Add New Task",
    };

    let mut lines = Vec::new();
    for field in FormField::ALL {
        let value = if field.is_choice() {
            format!("‹ {} ›", form.value(field))
        } else {
            form.value(field).to_string()
        };
        lines.push(input_line(field.label(), &value, field == form.focus));
    }
    lines.push(Spans::from(""));
    lines.push(Spans::from(Span::styled(
        "Enter save · Tab next · ←/→ change choice · Esc cancel",
        Style::default().fg(Color::DarkGray),
    )));

    f.render_widget(Clear, area);
    f.render_widget(
        Paragraph::new(lines).block(Block::default().borders(Borders::ALL).title(title)),
        area,
    );
}

fn draw_confirm<B: Backend>(f: &mut Frame<B>, title: &str) {
    let area = centered(50, 5, f.size());
    let text = vec![
        Spans::from(format!("Are you sure you want to delete \"{title}\"?")),
        Spans::from(""),
        Spans::from(Span::styled("y delete · n cancel", Style::default().fg(Color::DarkGray))),
    ];
    f.render_widget(Clear, area);
    f.render_widget(
        Paragraph::new(text)
            .block(Block::default().borders(Borders::ALL).title("Delete Task"))
            .wrap(Wrap { trim: true }),
        area,
    );
}

fn help_line(app: &App) -> &'static str {
    match (&app.mode, app.tab) {
        (Mode::Search, _) => "type to search · Enter keep · Esc clear",
        (Mode::Carrying(_), _) => "arrows choose slot · Space/Enter drop · Esc cancel",
        (Mode::Form(_), _) | (Mode::ConfirmDelete { .. }, _) => "",
        (Mode::Normal, Tab::List) => {
            "Tab board · / search · s status · p priority · 1-4 sort · a add · e edit · d delete · r refresh · L logout · q quit"
        }
        (Mode::Normal, Tab::Board) => {
            "Tab list · / search · s status · p priority · Space pick up · a add · e edit · d delete · r refresh · L logout · q quit"
        }
    }
}

fn input_line(label: &str, value: &str, focused: bool) -> Spans<'static> {
    let style = if focused {
        Style::default().fg(Color::Yellow)
    } else {
        Style::default()
    };
    let cursor = if focused { "▏" } else { "" };
    Spans::from(vec![
        Span::styled(format!("{label:>22}: "), style),
        Span::raw(format!("{value}{cursor}")),
    ])
}

fn alert_line(kind: AlertKind, message: &str) -> Spans<'static> {
    let style = match kind {
        AlertKind::Success => Style::default().fg(Color::Green),
        AlertKind::Error => Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
    };
    Spans::from(Span::styled(message.to_string(), style))
}

fn priority_style(priority: Priority) -> Style {
    match priority {
        Priority::High => Style::default().fg(Color::Red),
        Priority::Medium => Style::default().fg(Color::Yellow),
        Priority::Low => Style::default().fg(Color::Green),
    }
}

fn centered(width: u16, height: u16, outer: Rect) -> Rect {
    let width = width.min(outer.width);
    let height = height.min(outer.height);
    Rect {
        x: outer.x + (outer.width - width) / 2,
        y: outer.y + (outer.height - height) / 2,
        width,
        height,
    }
}

//! Dashboard rendering logic

use ratatui::{
    Frame,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Cell, Clear, Paragraph, Row, Table, Wrap},
};

use crate::cli::tui::app::DashboardApp;
use crate::models::device::{Device, PLACEHOLDER};
use crate::models::tui::{FocusedPane, status_style};
use crate::panel::busy::SessionAction;
use crate::panel::form::FormField;
use crate::panel::notify::NotificationLevel;
use crate::panel::output::ConsoleContent;
use crate::panel::render::{
    CONSOLE_EMPTY, CONSOLE_LOADING, CONSOLE_PROMPT, EMPTY_TABLE_MESSAGE, rover_option_label,
};

/// Main UI rendering function
pub fn ui(f: &mut Frame, app: &DashboardApp) {
    let main_chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Min(0),
            Constraint::Length(3),
        ])
        .split(f.area());

    render_notifications(f, app, main_chunks[0]);

    let body = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
        .split(main_chunks[1]);

    render_device_table(f, app, body[0]);

    let bottom = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(40), Constraint::Percentage(60)])
        .split(body[1]);

    render_form(f, app, bottom[0]);
    render_output(f, app, bottom[1]);
    render_help_bar(f, app, main_chunks[2]);

    if let Some(pending) = &app.pending {
        let area = centered_rect(50, 20, f.area());
        f.render_widget(Clear, area);
        let text = vec![
            Line::from(pending.prompt()),
            Line::from(""),
            Line::from(vec![
                Span::styled("[y/Enter]", Style::default().fg(Color::Green)),
                Span::raw(" Yes  "),
                Span::styled("[n/Esc]", Style::default().fg(Color::Red)),
                Span::raw(" No"),
            ]),
        ];
        let modal = Paragraph::new(text)
            .block(
                Block::default()
                    .title(pending.title())
                    .borders(Borders::ALL)
                    .border_style(Style::default().fg(Color::Yellow)),
            )
            .style(Style::default().bg(Color::Black))
            .wrap(Wrap { trim: true });
        f.render_widget(modal, area);
    }

    if app.show_help {
        let area = centered_rect(60, 60, f.area());
        f.render_widget(Clear, area);
        let help_text = vec![
            Line::from("🛰️ Roverpool Help"),
            Line::from(""),
            Line::from("Devices:"),
            Line::from("  ↑/k ↓/j  - Move selection"),
            Line::from("  e        - Edit highlighted device"),
            Line::from("  n        - New device"),
            Line::from("  d        - Delete highlighted device"),
            Line::from("  s / x    - Start / stop rover session"),
            Line::from("  r        - Refresh now"),
            Line::from(""),
            Line::from("Output:"),
            Line::from("  o        - View highlighted rover"),
            Line::from("  [ / ]    - Previous / next rover"),
            Line::from(""),
            Line::from("Form:"),
            Line::from("  ↑/↓      - Move field, type to edit"),
            Line::from("  Enter    - Submit, Esc - Cancel"),
            Line::from(""),
            Line::from("Tab - Switch pane, q - Quit"),
        ];
        let help = Paragraph::new(help_text)
            .block(Block::default().title("Help").borders(Borders::ALL))
            .style(Style::default().bg(Color::Black));
        f.render_widget(help, area);
    }
}

fn pane_block(title: String, focused: bool) -> Block<'static> {
    let block = Block::default().title(title).borders(Borders::ALL);
    if focused {
        block.border_style(Style::default().fg(Color::Cyan))
    } else {
        block
    }
}

fn render_notifications(f: &mut Frame, app: &DashboardApp, area: Rect) {
    let line = match app.snapshot.notifications.last() {
        Some(note) => {
            let color = match note.level {
                NotificationLevel::Success => Color::Green,
                NotificationLevel::Info => Color::Blue,
                NotificationLevel::Error => Color::Red,
            };
            Line::from(vec![
                Span::raw(note.level.symbol()),
                Span::raw(" "),
                Span::styled(note.message.clone(), Style::default().fg(color)),
            ])
        }
        None => Line::from(Span::styled(
            format!("Connected to {}", app.server_url),
            Style::default().fg(Color::Gray),
        )),
    };

    let strip = Paragraph::new(line).block(Block::default().borders(Borders::ALL));
    f.render_widget(strip, area);
}

fn actions_text(device: &Device, app: &DashboardApp) -> String {
    let mut actions = Vec::new();
    if device.is_rover() {
        let action = if device.is_session_running() {
            SessionAction::Stop
        } else {
            SessionAction::Start
        };
        if app.snapshot.is_busy(&device.serial, action) {
            actions.push("⏳".to_string());
        } else {
            let key = match action {
                SessionAction::Start => 's',
                SessionAction::Stop => 'x',
            };
            actions.push(format!("[{}]{}", key, action.name()));
        }
    }
    actions.push("[e]Edit".to_string());
    actions.push("[d]Delete".to_string());
    actions.join(" ")
}

fn render_device_table(f: &mut Frame, app: &DashboardApp, area: Rect) {
    let focused = app.focused_pane == FocusedPane::DeviceTable;
    let title = format!("📡 Devices ({})", app.snapshot.devices.len());

    if app.snapshot.devices.is_empty() {
        let empty = Paragraph::new(Line::from(Span::styled(
            EMPTY_TABLE_MESSAGE,
            Style::default().fg(Color::Gray),
        )))
        .block(pane_block(title, focused));
        f.render_widget(empty, area);
        return;
    }

    let header = Row::new(
        ["Name", "Serial", "Endpoint", "Role", "Status", "X", "Y", "Z", "Actions"]
            .map(|h| Cell::from(h).style(Style::default().add_modifier(Modifier::BOLD))),
    );

    let rows: Vec<Row> = app
        .snapshot
        .devices
        .iter()
        .map(|device| {
            let status = device.effective_status();
            let (symbol, color) = status_style(status);
            let status_text = status.map_or(PLACEHOLDER.to_string(), |s| {
                format!("{} {}", symbol, s)
            });
            let [x, y, z] = device
                .coordinate_texts()
                .map(|v| v.unwrap_or_else(|| PLACEHOLDER.to_string()));
            let role_color = if device.is_rover() {
                Color::Magenta
            } else {
                Color::Blue
            };

            Row::new(vec![
                Cell::from(device.name.clone()),
                Cell::from(device.serial.clone()),
                Cell::from(device.endpoint()),
                Cell::from(device.role.name()).style(Style::default().fg(role_color)),
                Cell::from(status_text).style(Style::default().fg(color)),
                Cell::from(x),
                Cell::from(y),
                Cell::from(z),
                Cell::from(actions_text(device, app)),
            ])
        })
        .collect();

    let widths = [
        Constraint::Percentage(14),
        Constraint::Percentage(10),
        Constraint::Percentage(14),
        Constraint::Percentage(7),
        Constraint::Percentage(10),
        Constraint::Percentage(8),
        Constraint::Percentage(8),
        Constraint::Percentage(7),
        Constraint::Percentage(22),
    ];

    let table = Table::new(rows, widths)
        .header(header)
        .block(pane_block(title, focused))
        .row_highlight_style(
            Style::default()
                .bg(Color::DarkGray)
                .add_modifier(Modifier::BOLD),
        );

    f.render_stateful_widget(table, area, &mut app.table_state.clone());
}

fn render_form(f: &mut Frame, app: &DashboardApp, area: Rect) {
    let focused = app.focused_pane == FocusedPane::Form;
    let form = &app.snapshot.form;
    let title = match form.editing_serial() {
        Some(serial) => format!("✏️ Edit {}", serial),
        None => "➕ New Device".to_string(),
    };

    let mut lines: Vec<Line> = FormField::ALL
        .iter()
        .map(|field| {
            let current = focused && *field == app.form_field;
            let marker = if current { "> " } else { "  " };
            let mut value = form.value(*field);
            if *field == FormField::Serial && form.serial_locked() {
                value.push_str(" 🔒");
            }
            let style = if current {
                Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD)
            } else {
                Style::default()
            };
            Line::from(vec![
                Span::raw(marker),
                Span::styled(format!("{:<7}", field.label()), Style::default().fg(Color::Gray)),
                Span::styled(value, style),
            ])
        })
        .collect();

    lines.push(Line::from(""));
    let mut buttons = vec![
        Span::styled("[Enter] ", Style::default().fg(Color::Green)),
        Span::raw(form.submit_label()),
    ];
    if form.cancel_visible() {
        buttons.push(Span::styled("  [Esc] ", Style::default().fg(Color::Red)));
        buttons.push(Span::raw("Cancel"));
    }
    lines.push(Line::from(buttons));

    let paragraph = Paragraph::new(lines).block(pane_block(title, focused));
    f.render_widget(paragraph, area);
}

fn render_output(f: &mut Frame, app: &DashboardApp, area: Rect) {
    let focused = app.focused_pane == FocusedPane::Output;
    let selected = app
        .snapshot
        .selected_output
        .as_deref()
        .and_then(|serial| app.snapshot.rovers().find(|r| r.serial == serial));
    let title = match selected {
        Some(rover) => {
            let polling = if app.snapshot.output_polling { " 🔄" } else { "" };
            format!("📺 {}{}", rover_option_label(rover), polling)
        }
        None => "📺 Output".to_string(),
    };

    let placeholder = |text: &str| vec![Line::from(Span::styled(text.to_string(), Style::default().fg(Color::Gray)))];
    let lines: Vec<Line> = match &app.snapshot.console {
        ConsoleContent::Prompt => placeholder(CONSOLE_PROMPT),
        ConsoleContent::Loading => placeholder(CONSOLE_LOADING),
        ConsoleContent::Empty => placeholder(CONSOLE_EMPTY),
        ConsoleContent::Lines(output) => output.iter().map(|l| Line::from(l.clone())).collect(),
        ConsoleContent::Error(message) => vec![Line::from(Span::styled(
            message.clone(),
            Style::default().fg(Color::Red),
        ))],
    };

    // Keep the newest line in view
    let visible = area.height.saturating_sub(2) as usize;
    let scroll = lines.len().saturating_sub(visible) as u16;

    let paragraph = Paragraph::new(lines)
        .block(pane_block(title, focused))
        .scroll((scroll, 0));
    f.render_widget(paragraph, area);
}

fn centered_rect(percent_x: u16, percent_y: u16, r: Rect) -> Rect {
    let popup_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(r);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(popup_layout[1])[1]
}

/// Render the help bar at the bottom
fn render_help_bar(f: &mut Frame, app: &DashboardApp, area: Rect) {
    let help_text = match app.focused_pane {
        FocusedPane::Form => vec![
            Span::styled("[↑↓]Field ", Style::default().fg(Color::Cyan)),
            Span::styled("[Type]Edit ", Style::default().fg(Color::Cyan)),
            Span::styled("[Enter]Submit ", Style::default().fg(Color::Green)),
            Span::styled("[Esc]Cancel ", Style::default().fg(Color::Red)),
            Span::styled("[Tab]Pane", Style::default().fg(Color::Blue)),
        ],
        _ => vec![
            Span::styled("[↑↓]Move ", Style::default().fg(Color::Cyan)),
            Span::styled("[e]Edit [n]New [d]Delete ", Style::default().fg(Color::Yellow)),
            Span::styled("[s/x]Session ", Style::default().fg(Color::Green)),
            Span::styled("[o][ ]Output ", Style::default().fg(Color::Magenta)),
            Span::styled("[r]Refresh ", Style::default().fg(Color::Cyan)),
            Span::styled("[Tab]Pane [?]Help ", Style::default().fg(Color::Blue)),
            Span::styled("[q]Quit", Style::default().fg(Color::Red)),
        ],
    };

    let help_bar = Paragraph::new(Line::from(help_text))
        .block(Block::default().borders(Borders::ALL))
        .wrap(Wrap { trim: true });
    f.render_widget(help_bar, area);
}

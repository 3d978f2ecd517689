//! HTML rendering of the admin panel
//!
//! Every renderer is a pure function of a [`PanelSnapshot`] (or part of one), so rendering
//! the same snapshot twice yields identical markup. Every piece of text that originates from
//! the service or the user goes through [`escape_html`] before it is placed in markup,
//! including attribute values.

use std::fmt::Write;

use super::busy::SessionAction;
use super::form::DeviceForm;
use super::notify::Notification;
use super::output::ConsoleContent;
use super::state::PanelSnapshot;
use crate::models::device::{Device, PLACEHOLDER, Role};

/// Number of columns of the device table
pub const TABLE_COLUMNS: usize = 9;

pub const EMPTY_TABLE_MESSAGE: &str = "No devices configured";
pub const SELECTOR_PLACEHOLDER: &str = "Select a rover to view its output";
pub const CONSOLE_PROMPT: &str = "Select a rover to view its NMEA output";
pub const CONSOLE_LOADING: &str = "Loading output...";
pub const CONSOLE_EMPTY: &str = "No output available for this rover";

/// Escape text for use in element content and quoted attribute values
pub fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

/// Rendered fragments of the whole panel
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PanelView {
    pub table: String,
    pub rover_selector: String,
    pub form: String,
    pub console: String,
    /// The console shows lines and should be scrolled to the newest one
    pub console_autoscroll: bool,
    pub alerts: String,
}

impl PanelView {
    /// All fragments assembled into one document body
    pub fn to_document(&self) -> String {
        let mut doc = String::new();
        let _ = writeln!(doc, "<div id=\"alertContainer\">{}</div>", self.alerts);
        let _ = writeln!(doc, "{}", self.form);
        let _ = writeln!(
            doc,
            "<table class=\"devices\"><tbody id=\"devicesTableBody\">{}</tbody></table>",
            self.table
        );
        let _ = writeln!(
            doc,
            "<select id=\"outputDeviceSelect\">{}</select>",
            self.rover_selector
        );
        let scroll = if self.console_autoscroll {
            " data-scroll=\"bottom\""
        } else {
            ""
        };
        let _ = writeln!(
            doc,
            "<div id=\"outputConsole\"{}>{}</div>",
            scroll, self.console
        );
        doc
    }
}

pub fn render_panel(snapshot: &PanelSnapshot) -> PanelView {
    PanelView {
        table: render_device_table(snapshot),
        rover_selector: render_rover_selector(&snapshot.devices, snapshot.selected_output.as_deref()),
        form: render_device_form(&snapshot.form),
        console: render_output_console(&snapshot.console),
        console_autoscroll: matches!(snapshot.console, ConsoleContent::Lines(_)),
        alerts: render_notifications(&snapshot.notifications),
    }
}

/// Table body: one row per device, or a single informational row when there are none
pub fn render_device_table(snapshot: &PanelSnapshot) -> String {
    if snapshot.devices.is_empty() {
        return format!(
            "<tr><td colspan=\"{}\" class=\"empty-row\">{}</td></tr>",
            TABLE_COLUMNS, EMPTY_TABLE_MESSAGE
        );
    }

    snapshot
        .devices
        .iter()
        .map(|device| render_device_row(device, snapshot))
        .collect()
}

fn render_device_row(device: &Device, snapshot: &PanelSnapshot) -> String {
    let mut row = String::from("<tr>");
    let _ = write!(row, "<td>{}</td>", escape_html(&device.name));
    let _ = write!(row, "<td><code>{}</code></td>", escape_html(&device.serial));
    let _ = write!(row, "<td>{}</td>", escape_html(&device.endpoint()));
    let _ = write!(
        row,
        "<td><span class=\"{}\">{}</span></td>",
        device.role.css_class(),
        device.role
    );
    let _ = write!(row, "<td>{}</td>", render_status_badge(device));
    for axis in device.coordinate_texts() {
        let text = axis.as_deref().unwrap_or(PLACEHOLDER);
        let _ = write!(row, "<td>{}</td>", escape_html(text));
    }
    let _ = write!(row, "<td>{}</td>", render_actions(device, snapshot));
    row.push_str("</tr>");
    row
}

fn render_status_badge(device: &Device) -> String {
    match device.effective_status() {
        Some(status) => {
            let class = if status.is_running() {
                "status-running"
            } else {
                "status-stopped"
            };
            format!("<span class=\"status-badge {}\">{}</span>", class, status)
        }
        None => format!("<span class=\"status-none\">{}</span>", PLACEHOLDER),
    }
}

fn render_actions(device: &Device, snapshot: &PanelSnapshot) -> String {
    let serial = escape_html(&device.serial);
    let mut cell = String::new();

    if device.role == Role::Rover {
        let (action, class, label, title) = if device.is_session_running() {
            (SessionAction::Stop, "btn-danger", "⏹️ Stop", "Stop session")
        } else {
            (SessionAction::Start, "btn-success", "▶️ Start", "Start session")
        };
        let data_action = action.name().to_ascii_lowercase();
        if snapshot.is_busy(&device.serial, action) {
            let _ = write!(
                cell,
                "<button class=\"{} btn-small\" data-action=\"{}\" data-serial=\"{}\" disabled><div class=\"loading\"></div></button>",
                class, data_action, serial
            );
        } else {
            let _ = write!(
                cell,
                "<button class=\"{} btn-small\" data-action=\"{}\" data-serial=\"{}\" title=\"{}\">{}</button>",
                class, data_action, serial, title, label
            );
        }
    }

    let _ = write!(
        cell,
        "<button class=\"btn-warning btn-small\" data-action=\"edit\" data-serial=\"{}\" title=\"Edit device\">✏️ Edit</button>",
        serial
    );
    let _ = write!(
        cell,
        "<button class=\"btn-danger btn-small\" data-action=\"delete\" data-serial=\"{}\" title=\"Delete device\">🗑️ Delete</button>",
        serial
    );
    cell
}

/// Label of a rover in the output selector
pub fn rover_option_label(rover: &Device) -> String {
    let suffix = if rover.is_session_running() {
        "active"
    } else {
        "inactive"
    };
    format!("{} ({}) - {}", rover.name, rover.serial, suffix)
}

/// Rover selector options. The previous selection is kept when that rover still exists,
/// otherwise the placeholder is selected.
pub fn render_rover_selector(devices: &[Device], selected: Option<&str>) -> String {
    let rovers: Vec<&Device> = devices.iter().filter(|d| d.is_rover()).collect();
    let selected = selected.filter(|serial| rovers.iter().any(|r| r.serial == *serial));

    let mut html = format!(
        "<option value=\"\"{}>{}</option>",
        if selected.is_none() { " selected" } else { "" },
        SELECTOR_PLACEHOLDER
    );
    for rover in rovers {
        let is_selected = selected == Some(rover.serial.as_str());
        let _ = write!(
            html,
            "<option value=\"{}\"{}>{}</option>",
            escape_html(&rover.serial),
            if is_selected { " selected" } else { "" },
            escape_html(&rover_option_label(rover))
        );
    }
    html
}

pub fn render_device_form(form: &DeviceForm) -> String {
    let fields = form.fields();
    let mut html = String::from("<form id=\"deviceForm\">");

    let inputs = [
        ("deviceName", "name", &fields.name, false),
        ("deviceSerial", "serial", &fields.serial, form.serial_locked()),
        ("deviceIp", "ip", &fields.ip, false),
        ("devicePort", "port", &fields.port, false),
    ];
    for (id, name, value, disabled) in inputs {
        let _ = write!(
            html,
            "<input id=\"{}\" name=\"{}\" value=\"{}\"{}>",
            id,
            name,
            escape_html(value),
            if disabled { " disabled" } else { "" }
        );
    }

    html.push_str("<select id=\"deviceRole\" name=\"role\">");
    for role in [Role::Master, Role::Rover] {
        let _ = write!(
            html,
            "<option value=\"{}\"{}>{}</option>",
            role,
            if fields.role == role { " selected" } else { "" },
            role
        );
    }
    html.push_str("</select>");

    let _ = write!(
        html,
        "<button type=\"submit\" id=\"submitBtn\">{}</button>",
        form.submit_label()
    );
    let _ = write!(
        html,
        "<button type=\"button\" id=\"cancelBtn\"{}>Cancel</button>",
        if form.cancel_visible() {
            ""
        } else {
            " class=\"hidden\""
        }
    );
    html.push_str("</form>");
    html
}

pub fn render_output_console(console: &ConsoleContent) -> String {
    match console {
        ConsoleContent::Prompt => format!("<div class=\"output-placeholder\">{}</div>", CONSOLE_PROMPT),
        ConsoleContent::Loading => {
            format!("<div class=\"output-placeholder\">{}</div>", CONSOLE_LOADING)
        }
        ConsoleContent::Empty => format!("<div class=\"output-placeholder\">{}</div>", CONSOLE_EMPTY),
        ConsoleContent::Lines(lines) => lines
            .iter()
            .map(|line| format!("<div class=\"output-line\">{}</div>", escape_html(line)))
            .collect(),
        ConsoleContent::Error(message) => {
            format!("<div class=\"output-error\">{}</div>", escape_html(message))
        }
    }
}

pub fn render_notifications(notifications: &[Notification]) -> String {
    notifications
        .iter()
        .map(|n| {
            format!(
                "<div class=\"alert alert-{}\" data-id=\"{}\">{}</div>",
                n.level.css_suffix(),
                n.id,
                escape_html(&n.message)
            )
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::device::{Coordinates, SessionStatus};
    use crate::panel::busy::BusyKey;
    use crate::panel::notify::NotificationLevel;
    use std::collections::HashSet;

    fn device(name: &str, serial: &str, role: Role, status: Option<SessionStatus>) -> Device {
        Device {
            name: name.to_string(),
            serial: serial.to_string(),
            ip: "10.0.0.5".to_string(),
            port: 9001,
            role,
            session_status: status,
            coordinates: None,
        }
    }

    fn snapshot(devices: Vec<Device>) -> PanelSnapshot {
        PanelSnapshot {
            devices,
            form: DeviceForm::new(),
            selected_output: None,
            console: ConsoleContent::Prompt,
            output_polling: false,
            busy: HashSet::new(),
            notifications: Vec::new(),
        }
    }

    #[test]
    fn test_escape_html() {
        assert_eq!(
            escape_html(r#"<img src=x onerror="a('b')">&"#),
            "&lt;img src=x onerror=&quot;a(&#39;b&#39;)&quot;&gt;&amp;"
        );
        assert_eq!(escape_html("plain"), "plain");
    }

    #[test]
    fn test_empty_table_has_single_informational_row() {
        let html = render_device_table(&snapshot(Vec::new()));
        assert_eq!(html.matches("<tr>").count(), 1);
        assert!(html.contains(EMPTY_TABLE_MESSAGE));
        assert!(html.contains("colspan=\"9\""));
    }

    #[test]
    fn test_one_row_per_device_with_escaped_fields() {
        let devices = vec![
            device("<b>R1</b>", "S&1", Role::Rover, None),
            device("Base", "M1", Role::Master, None),
        ];
        let html = render_device_table(&snapshot(devices));

        assert_eq!(html.matches("<tr>").count(), 2);
        assert!(html.contains("<td>&lt;b&gt;R1&lt;/b&gt;</td>"));
        assert!(html.contains("<code>S&amp;1</code>"));
        assert!(html.contains("data-serial=\"S&amp;1\""));
        assert!(!html.contains("<b>R1"));
    }

    #[test]
    fn test_rover_actions_follow_status() {
        let stopped = render_device_table(&snapshot(vec![device("R1", "S1", Role::Rover, None)]));
        assert!(stopped.contains("status-stopped\">stopped"));
        assert!(stopped.contains("data-action=\"start\""));
        assert!(!stopped.contains("data-action=\"stop\""));

        let running = render_device_table(&snapshot(vec![device(
            "R1",
            "S1",
            Role::Rover,
            Some(SessionStatus::Running),
        )]));
        assert!(running.contains("status-running\">running"));
        assert!(running.contains("data-action=\"stop\""));
        assert!(!running.contains("data-action=\"start\""));

        for html in [&stopped, &running] {
            assert!(html.contains("data-action=\"edit\""));
            assert!(html.contains("data-action=\"delete\""));
        }
    }

    #[test]
    fn test_master_row_has_placeholder_and_no_session_actions() {
        let html = render_device_table(&snapshot(vec![device("Base", "M1", Role::Master, None)]));
        assert!(html.contains("<span class=\"status-none\">N/A</span>"));
        assert!(!html.contains("data-action=\"start\""));
        assert!(!html.contains("data-action=\"stop\""));
        assert!(html.contains("data-action=\"edit\""));
    }

    #[test]
    fn test_unknown_role_renders_like_master() {
        let html = render_device_table(&snapshot(vec![device("Odd", "B1", Role::Unknown, None)]));
        assert!(html.contains("<span class=\"role-unknown\">Unknown</span>"));
        assert!(html.contains("<span class=\"status-none\">N/A</span>"));
        assert!(!html.contains("data-action=\"start\""));
        assert!(html.contains("data-action=\"delete\" data-serial=\"B1\""));

        let selector = render_rover_selector(&[device("Odd", "B1", Role::Unknown, None)], None);
        assert!(!selector.contains("B1"));
    }

    #[test]
    fn test_coordinates_and_placeholders() {
        let mut rover = device("R1", "S1", Role::Rover, None);
        rover.coordinates = Some(Coordinates {
            x: Some(serde_json::json!(45.06)),
            y: Some(serde_json::json!("<7.67>")),
            z: None,
        });
        let html = render_device_table(&snapshot(vec![rover]));
        assert!(html.contains("<td>45.06</td>"));
        assert!(html.contains("<td>&lt;7.67&gt;</td>"));
        assert!(html.contains("<td>N/A</td>"));
    }

    #[test]
    fn test_busy_button_is_disabled_with_indicator() {
        let mut snap = snapshot(vec![device("R1", "S1", Role::Rover, None)]);
        snap.busy.insert(BusyKey::new("S1", SessionAction::Start));
        let html = render_device_table(&snap);
        assert!(html.contains("disabled><div class=\"loading\"></div></button>"));
        assert!(!html.contains("▶️ Start"));
    }

    #[test]
    fn test_rendering_is_idempotent() {
        let snap = snapshot(vec![
            device("R1", "S1", Role::Rover, Some(SessionStatus::Running)),
            device("Base", "M1", Role::Master, None),
        ]);
        assert_eq!(render_panel(&snap), render_panel(&snap));
    }

    #[test]
    fn test_selector_lists_rovers_and_keeps_selection() {
        let devices = vec![
            device("R1", "S1", Role::Rover, Some(SessionStatus::Running)),
            device("Base", "M1", Role::Master, None),
            device("R2", "S2", Role::Rover, None),
        ];

        let html = render_rover_selector(&devices, Some("S2"));
        assert_eq!(html.matches("<option").count(), 3);
        assert!(html.contains("<option value=\"\">Select a rover"));
        assert!(html.contains(">R1 (S1) - active<"));
        assert!(html.contains("<option value=\"S2\" selected>R2 (S2) - inactive</option>"));
        assert!(!html.contains("M1"));
    }

    #[test]
    fn test_selector_falls_back_to_placeholder() {
        let devices = vec![device("R1", "S1", Role::Rover, None)];
        let html = render_rover_selector(&devices, Some("GONE"));
        assert!(html.starts_with("<option value=\"\" selected>"));
        assert!(!html.contains("S1\" selected"));
    }

    #[test]
    fn test_form_reflects_mode() {
        let mut form = DeviceForm::new();
        let create = render_device_form(&form);
        assert!(create.contains("id=\"submitBtn\">Add Device<"));
        assert!(create.contains("id=\"cancelBtn\" class=\"hidden\""));
        assert!(!create.contains("disabled"));

        form.begin_edit(&device("R\"1", "S1", Role::Rover, None));
        let editing = render_device_form(&form);
        assert!(editing.contains("id=\"submitBtn\">Update Device<"));
        assert!(editing.contains("name=\"serial\" value=\"S1\" disabled"));
        assert!(editing.contains("value=\"R&quot;1\""));
        assert!(editing.contains("<option value=\"Rover\" selected>"));
        assert!(!editing.contains("class=\"hidden\""));
    }

    #[test]
    fn test_console_rendering() {
        assert!(render_output_console(&ConsoleContent::Prompt).contains(CONSOLE_PROMPT));
        assert!(render_output_console(&ConsoleContent::Empty).contains(CONSOLE_EMPTY));

        let lines = ConsoleContent::Lines(vec!["$GPGGA,1".to_string(), "<x>".to_string()]);
        assert_eq!(
            render_output_console(&lines),
            "<div class=\"output-line\">$GPGGA,1</div><div class=\"output-line\">&lt;x&gt;</div>"
        );

        let error = ConsoleContent::Error("Failed to load output: <boom>".to_string());
        assert!(render_output_console(&error).contains("&lt;boom&gt;"));
    }

    #[test]
    fn test_notifications_are_escaped() {
        let notes = vec![Notification {
            id: 7,
            level: NotificationLevel::Error,
            message: "<script>".to_string(),
            expires_at: tokio::time::Instant::now(),
        }];
        assert_eq!(
            render_notifications(&notes),
            "<div class=\"alert alert-error\" data-id=\"7\">&lt;script&gt;</div>"
        );
    }
}

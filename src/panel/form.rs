//! Device form state machine
//!
//! One form serves both creation and update. In `Create` every field is editable; in
//! `Editing(serial)` the serial field is locked to the device being edited.

use crate::models::device::{Device, DeviceUpdate, NewDevice, Role};

/// Which request a submit will issue
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormMode {
    Create,
    Editing(String),
}

/// Form inputs, in display order
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormField {
    Name,
    Serial,
    Ip,
    Port,
    Role,
}

impl FormField {
    pub const ALL: [FormField; 5] = [
        FormField::Name,
        FormField::Serial,
        FormField::Ip,
        FormField::Port,
        FormField::Role,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            FormField::Name => "Name",
            FormField::Serial => "Serial",
            FormField::Ip => "IP",
            FormField::Port => "Port",
            FormField::Role => "Role",
        }
    }

    pub fn next(&self) -> FormField {
        let idx = Self::ALL.iter().position(|f| f == self).unwrap_or(0);
        Self::ALL[(idx + 1) % Self::ALL.len()]
    }

    pub fn previous(&self) -> FormField {
        let idx = Self::ALL.iter().position(|f| f == self).unwrap_or(0);
        Self::ALL[(idx + Self::ALL.len() - 1) % Self::ALL.len()]
    }
}

/// Raw field values, as typed
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormFields {
    pub name: String,
    pub serial: String,
    pub ip: String,
    pub port: String,
    pub role: Role,
}

impl Default for FormFields {
    fn default() -> Self {
        Self {
            name: String::new(),
            serial: String::new(),
            ip: String::new(),
            port: String::new(),
            role: Role::Rover,
        }
    }
}

/// The request a submit translates into
#[derive(Debug, Clone, PartialEq)]
pub enum FormSubmission {
    Create(NewDevice),
    Update { serial: String, update: DeviceUpdate },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeviceForm {
    mode: FormMode,
    fields: FormFields,
}

impl Default for DeviceForm {
    fn default() -> Self {
        Self::new()
    }
}

impl DeviceForm {
    pub fn new() -> Self {
        Self {
            mode: FormMode::Create,
            fields: FormFields::default(),
        }
    }

    pub fn mode(&self) -> &FormMode {
        &self.mode
    }

    pub fn fields(&self) -> &FormFields {
        &self.fields
    }

    pub fn is_editing(&self) -> bool {
        matches!(self.mode, FormMode::Editing(_))
    }

    /// Serial of the device being edited
    pub fn editing_serial(&self) -> Option<&str> {
        match &self.mode {
            FormMode::Editing(serial) => Some(serial),
            FormMode::Create => None,
        }
    }

    pub fn serial_locked(&self) -> bool {
        self.is_editing()
    }

    pub fn submit_label(&self) -> &'static str {
        match self.mode {
            FormMode::Create => "Add Device",
            FormMode::Editing(_) => "Update Device",
        }
    }

    pub fn cancel_visible(&self) -> bool {
        self.is_editing()
    }

    /// Load `device` into the form and lock its serial
    pub fn begin_edit(&mut self, device: &Device) {
        self.fields = FormFields {
            name: device.name.clone(),
            serial: device.serial.clone(),
            ip: device.ip.clone(),
            port: device.port.to_string(),
            role: device.role,
        };
        self.mode = FormMode::Editing(device.serial.clone());
    }

    /// Back to an empty create form
    pub fn reset(&mut self) {
        *self = Self::new();
    }

    /// Current text of a field
    pub fn value(&self, field: FormField) -> String {
        match field {
            FormField::Name => self.fields.name.clone(),
            FormField::Serial => self.fields.serial.clone(),
            FormField::Ip => self.fields.ip.clone(),
            FormField::Port => self.fields.port.clone(),
            FormField::Role => self.fields.role.name().to_string(),
        }
    }

    /// Set a field from text. Returns `false` when the value was refused: the serial while
    /// editing, or an unknown role.
    pub fn set(&mut self, field: FormField, value: &str) -> bool {
        match field {
            FormField::Name => self.fields.name = value.to_string(),
            FormField::Serial => {
                if self.serial_locked() {
                    return false;
                }
                self.fields.serial = value.to_string();
            }
            FormField::Ip => self.fields.ip = value.to_string(),
            FormField::Port => self.fields.port = value.to_string(),
            FormField::Role => match value.parse::<Role>() {
                Ok(role) => self.fields.role = role,
                Err(_) => return false,
            },
        }
        true
    }

    /// Append a typed character to a text field
    pub fn push_char(&mut self, field: FormField, c: char) -> bool {
        if field == FormField::Role {
            return false;
        }
        let mut value = self.value(field);
        value.push(c);
        self.set(field, &value)
    }

    /// Remove the last character of a text field
    pub fn pop_char(&mut self, field: FormField) -> bool {
        if field == FormField::Role {
            return false;
        }
        let mut value = self.value(field);
        value.pop();
        self.set(field, &value)
    }

    pub fn toggle_role(&mut self) {
        self.fields.role = self.fields.role.toggled();
    }

    /// Build the request for the current mode. The serial of an update comes from the
    /// mode, never from the field.
    pub fn submission(&self) -> FormSubmission {
        let fields = &self.fields;
        match &self.mode {
            FormMode::Create => FormSubmission::Create(NewDevice {
                name: fields.name.clone(),
                serial: fields.serial.clone(),
                ip: fields.ip.clone(),
                port: fields.port.clone(),
                role: fields.role,
            }),
            FormMode::Editing(serial) => FormSubmission::Update {
                serial: serial.clone(),
                update: DeviceUpdate {
                    name: fields.name.clone(),
                    ip: fields.ip.clone(),
                    port: fields.port.clone(),
                    role: fields.role,
                },
            },
        }
    }
}

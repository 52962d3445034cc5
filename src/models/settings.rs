use serde::{Deserialize, Serialize};
use serde_json::Value;

pub const POOL_CAPACITY: &str = "pool_capacity";
pub const CANCELLATION_WINDOW_HOURS: &str = "cancellation_window_hours";
pub const MAINTENANCE_MODE: &str = "maintenance_mode";
pub const CONTACT_EMAIL: &str = "contact_email";

fn default_pool_capacity() -> u32 {
    25
}

fn default_cancellation_window_hours() -> u32 {
    24
}

fn default_contact_email() -> String {
    "info@classbook.app".to_string()
}

/// Row of the `settings` key/value table
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SettingRow {
    pub key: String,
    #[serde(default)]
    pub value: Value,
}

/// Typed view over the `settings` table
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Settings {
    #[serde(default = "default_pool_capacity")]
    pub pool_capacity: u32,
    #[serde(default = "default_cancellation_window_hours")]
    pub cancellation_window_hours: u32,
    #[serde(default)]
    pub maintenance_mode: bool,
    #[serde(default = "default_contact_email")]
    pub contact_email: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            pool_capacity: default_pool_capacity(),
            cancellation_window_hours: default_cancellation_window_hours(),
            maintenance_mode: false,
            contact_email: default_contact_email(),
        }
    }
}

impl Settings {
    /// Assemble settings from raw rows. Missing or unparseable values keep
    /// their defaults; unknown keys are ignored.
    pub fn from_rows<I>(rows: I) -> Self
    where
        I: IntoIterator<Item = SettingRow>,
    {
        let mut settings = Self::default();

        for row in rows {
            match row.key.as_str() {
                POOL_CAPACITY => match as_u32(&row.value) {
                    Some(v) => settings.pool_capacity = v,
                    None => warn_unparsed(&row),
                },
                CANCELLATION_WINDOW_HOURS => match as_u32(&row.value) {
                    Some(v) => settings.cancellation_window_hours = v,
                    None => warn_unparsed(&row),
                },
                MAINTENANCE_MODE => match as_bool(&row.value) {
                    Some(v) => settings.maintenance_mode = v,
                    None => warn_unparsed(&row),
                },
                CONTACT_EMAIL => match as_text(&row.value) {
                    Some(v) if !v.is_empty() => settings.contact_email = v,
                    _ => warn_unparsed(&row),
                },
                other => tracing::debug!("Ignoring unknown setting {}", other),
            }
        }

        settings
    }

    /// One row per named setting, values in text form.
    pub fn to_rows(&self) -> Vec<SettingRow> {
        vec![
            SettingRow {
                key: POOL_CAPACITY.to_string(),
                value: Value::String(self.pool_capacity.to_string()),
            },
            SettingRow {
                key: CANCELLATION_WINDOW_HOURS.to_string(),
                value: Value::String(self.cancellation_window_hours.to_string()),
            },
            SettingRow {
                key: MAINTENANCE_MODE.to_string(),
                value: Value::String(self.maintenance_mode.to_string()),
            },
            SettingRow {
                key: CONTACT_EMAIL.to_string(),
                value: Value::String(strip_quotes(&self.contact_email)),
            },
        ]
    }
}

fn warn_unparsed(row: &SettingRow) {
    tracing::warn!("Setting {} has unusable value {}, keeping default", row.key, row.value);
}

fn strip_quotes(s: &str) -> String {
    s.replace('"', "").trim().to_string()
}

fn as_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(strip_quotes(s)),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

fn as_u32(value: &Value) -> Option<u32> {
    match value {
        Value::Number(n) => n.as_u64().and_then(|n| u32::try_from(n).ok()),
        _ => as_text(value)?.parse().ok(),
    }
}

fn as_bool(value: &Value) -> Option<bool> {
    match value {
        Value::Bool(b) => Some(*b),
        _ => match as_text(value)?.to_lowercase().as_str() {
            "true" | "1" | "on" | "yes" => Some(true),
            "false" | "0" | "off" | "no" => Some(false),
            _ => None,
        },
    }
}

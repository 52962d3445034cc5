use serde::{Deserialize, Serialize};

/// A bookable kind of class
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClassType {
    pub id: String,
    pub name: String,
    pub description: Option<String>,
    pub duration_minutes: u32,
    /// Both prices come from the single stored `price` column. There is no
    /// separate package price in storage yet.
    pub price_single: f64,
    pub price_package: f64,
    pub difficulty: Option<String>,
    pub capacity: u32,
}

/// Row of the `class_types` table
#[derive(Debug, Clone, Deserialize)]
pub struct ClassTypeRow {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub duration_minutes: Option<u32>,
    #[serde(default)]
    pub price: Option<f64>,
    #[serde(default)]
    pub difficulty: Option<String>,
    #[serde(default)]
    pub capacity: Option<u32>,
}

impl From<ClassTypeRow> for ClassType {
    fn from(row: ClassTypeRow) -> Self {
        let price = row.price.unwrap_or(0.0);
        Self {
            id: row.id,
            name: row.name,
            description: row.description,
            duration_minutes: row.duration_minutes.unwrap_or(0),
            price_single: price,
            price_package: price,
            difficulty: row.difficulty,
            capacity: row.capacity.unwrap_or(0),
        }
    }
}

/// New class type. `price_single` is written to the `price` column.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateClassType {
    pub name: String,
    pub description: Option<String>,
    pub duration_minutes: u32,
    #[serde(rename = "price")]
    pub price_single: f64,
    pub difficulty: Option<String>,
    pub capacity: u32,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateClassType {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub duration_minutes: Option<u32>,
    #[serde(rename = "price", skip_serializing_if = "Option::is_none")]
    pub price_single: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub difficulty: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub capacity: Option<u32>,
}

impl UpdateClassType {
    pub fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.description.is_none()
            && self.duration_minutes.is_none()
            && self.price_single.is_none()
            && self.difficulty.is_none()
            && self.capacity.is_none()
    }
}

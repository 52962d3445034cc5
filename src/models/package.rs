use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A purchasable bundle of credits
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Package {
    pub id: String,
    pub name: String,
    pub credits: u32,
    pub price: f64,
    pub active: bool,
}

/// Row of the `packages` table
#[derive(Debug, Clone, Deserialize)]
pub struct PackageRow {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub credits: Option<u32>,
    #[serde(default)]
    pub price: Option<f64>,
    #[serde(default)]
    pub active: Option<bool>,
}

impl From<PackageRow> for Package {
    fn from(row: PackageRow) -> Self {
        Self {
            id: row.id,
            name: row.name,
            credits: row.credits.unwrap_or(0),
            price: row.price.unwrap_or(0.0),
            active: row.active.unwrap_or(true),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreatePackage {
    pub name: String,
    pub credits: u32,
    pub price: f64,
    pub active: bool,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdatePackage {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub credits: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub price: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub active: Option<bool>,
}

impl UpdatePackage {
    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.credits.is_none() && self.price.is_none() && self.active.is_none()
    }
}

/// Append-only ledger entry. Name, credits and price are copied from the
/// package at purchase time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Purchase {
    pub id: String,
    pub user_id: String,
    pub package_name: String,
    pub credits: u32,
    pub price: f64,
    pub date: DateTime<Utc>,
}

/// Row of the `purchases` table
#[derive(Debug, Clone, Deserialize)]
pub struct PurchaseRow {
    pub id: String,
    pub user_id: String,
    pub package_name: String,
    #[serde(default)]
    pub credits: Option<u32>,
    #[serde(default)]
    pub price: Option<f64>,
    pub date: DateTime<Utc>,
}

impl From<PurchaseRow> for Purchase {
    fn from(row: PurchaseRow) -> Self {
        Self {
            id: row.id,
            user_id: row.user_id,
            package_name: row.package_name,
            credits: row.credits.unwrap_or(0),
            price: row.price.unwrap_or(0.0),
            date: row.date,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct CreatePurchase {
    pub user_id: String,
    pub package_name: String,
    pub credits: u32,
    pub price: f64,
    pub date: DateTime<Utc>,
}

impl CreatePurchase {
    /// Snapshot `package` into a ledger entry for `user_id`.
    pub fn snapshot(package: &Package, user_id: &str, date: DateTime<Utc>) -> Self {
        Self {
            user_id: user_id.to_string(),
            package_name: package.name.clone(),
            credits: package.credits,
            price: package.price,
            date,
        }
    }
}

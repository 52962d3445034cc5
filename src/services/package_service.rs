use chrono::Utc;

use super::credits::adjust_credits;
use crate::api::{BackendClient, Query};
use crate::error::{DataError, DataResult};
use crate::models::{
    CreatePackage, CreatePurchase, Package, PackageRow, Purchase, PurchaseRow, UpdatePackage,
};

const PACKAGES: &str = "packages";
const PURCHASES: &str = "purchases";

#[derive(Clone)]
pub struct PackageService {
    client: BackendClient,
}

impl PackageService {
    pub fn new(client: BackendClient) -> Self {
        Self { client }
    }

    /// Packages currently on sale, cheapest first.
    pub async fn list_active_packages(&self) -> DataResult<Vec<Package>> {
        let rows: Vec<PackageRow> = self
            .client
            .select(PACKAGES, &Query::new().eq("active", true).order("price", true))
            .await?;

        Ok(rows.into_iter().map(Package::from).collect())
    }

    pub async fn get_package(&self, package_id: &str) -> DataResult<Option<Package>> {
        let row: Option<PackageRow> = self
            .client
            .select_one(PACKAGES, &Query::new().eq("id", package_id))
            .await?;

        Ok(row.map(Package::from))
    }

    pub async fn create_package(&self, package: &CreatePackage) -> DataResult<Package> {
        let row: PackageRow = self.client.insert(PACKAGES, package).await?;

        tracing::info!("Created package {} ({})", row.name, row.id);
        Ok(Package::from(row))
    }

    pub async fn update_package(&self, package_id: &str, update: &UpdatePackage) -> DataResult<Package> {
        if update.is_empty() {
            return Err(DataError::Validation("no package fields to update".to_string()));
        }

        let rows: Vec<PackageRow> = self
            .client
            .update(PACKAGES, &Query::new().eq("id", package_id), update)
            .await?;

        rows.into_iter()
            .next()
            .map(Package::from)
            .ok_or_else(|| DataError::NotFound {
                entity: "package",
                id: package_id.to_string(),
            })
    }

    pub async fn delete_package(&self, package_id: &str) -> DataResult<()> {
        self.client
            .delete(PACKAGES, &Query::new().eq("id", package_id))
            .await?;

        tracing::info!("Deleted package {}", package_id);
        Ok(())
    }

    /// Record a purchase in the ledger, then add the package's credits to
    /// the buyer's balance.
    ///
    /// The two writes are not atomic. If the balance update fails the
    /// ledger row stays and the error is returned; nothing is rolled back.
    /// A contended balance is re-read and re-applied a few times before
    /// `ConcurrentCreditUpdate` is reported.
    pub async fn purchase_package(&self, package_id: &str, user_id: &str) -> DataResult<Purchase> {
        let package = self
            .get_package(package_id)
            .await?
            .ok_or_else(|| DataError::NotFound {
                entity: "package",
                id: package_id.to_string(),
            })?;

        let entry = CreatePurchase::snapshot(&package, user_id, Utc::now());
        let row: PurchaseRow = self.client.insert(PURCHASES, &entry).await?;
        let purchase = Purchase::from(row);

        let credits = package.credits;
        match adjust_credits(&self.client, user_id, |balance| {
            Some(balance.saturating_add(credits))
        })
        .await
        {
            Ok(balance) => {
                tracing::info!(
                    "User {} bought {} (+{} credits, balance {:?})",
                    user_id,
                    package.name,
                    credits,
                    balance
                );
                Ok(purchase)
            }
            Err(e) => {
                tracing::warn!(
                    "Purchase {} recorded but crediting user {} failed: {}",
                    purchase.id,
                    user_id,
                    e
                );
                Err(e)
            }
        }
    }

    /// A user's purchase history, most recent first.
    pub async fn list_purchases(&self, user_id: &str) -> DataResult<Vec<Purchase>> {
        let rows: Vec<PurchaseRow> = self
            .client
            .select(
                PURCHASES,
                &Query::new().eq("user_id", user_id).order("date", false),
            )
            .await?;

        Ok(rows.into_iter().map(Purchase::from).collect())
    }
}

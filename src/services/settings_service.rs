use crate::api::{BackendClient, Query};
use crate::error::DataResult;
use crate::models::{SettingRow, Settings};

const SETTINGS: &str = "settings";

#[derive(Clone)]
pub struct SettingsService {
    client: BackendClient,
}

impl SettingsService {
    pub fn new(client: BackendClient) -> Self {
        Self { client }
    }

    pub async fn get_settings(&self) -> DataResult<Settings> {
        let rows: Vec<SettingRow> = self
            .client
            .select(SETTINGS, &Query::new().select("key,value"))
            .await?;

        Ok(Settings::from_rows(rows))
    }

    /// Write every named setting, one upsert per key.
    pub async fn save_settings(&self, settings: &Settings) -> DataResult<()> {
        for row in settings.to_rows() {
            let _: SettingRow = self.client.upsert(SETTINGS, &row, "key").await?;
        }

        tracing::info!("Saved settings");
        Ok(())
    }
}

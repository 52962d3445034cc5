use crate::api::{BackendClient, Query};
use crate::error::{DataError, DataResult};
use crate::models::{
    validate_day_of_week, Availability, AvailabilityRow, Blockout, BlockoutRow, CreateAvailability,
    CreateBlockout, UpdateAvailability, UpdateBlockout,
};

const AVAILABILITY: &str = "availability";
const BLOCKOUTS: &str = "blockouts";

/// Instructor availability windows and blockout dates
#[derive(Clone)]
pub struct ScheduleService {
    client: BackendClient,
}

impl ScheduleService {
    pub fn new(client: BackendClient) -> Self {
        Self { client }
    }

    pub async fn list_availability(&self, instructor_id: &str) -> DataResult<Vec<Availability>> {
        let rows: Vec<AvailabilityRow> = self
            .client
            .select(
                AVAILABILITY,
                &Query::new()
                    .eq("instructor_id", instructor_id)
                    .order("start_time", true),
            )
            .await?;

        let mut windows = rows
            .into_iter()
            .map(Availability::try_from)
            .collect::<DataResult<Vec<_>>>()?;
        // textual day columns do not sort numerically on the server
        windows.sort_by_key(|w| (w.day_of_week, w.start_time));

        Ok(windows)
    }

    pub async fn create_availability(&self, availability: &CreateAvailability) -> DataResult<Availability> {
        validate_day_of_week(availability.day_of_week)?;
        validate_window(availability.start_time < availability.end_time)?;

        let row: AvailabilityRow = self.client.insert(AVAILABILITY, availability).await?;

        tracing::info!(
            "Added availability {} for instructor {}",
            row.id,
            availability.instructor_id
        );
        Availability::try_from(row)
    }

    pub async fn update_availability(
        &self,
        availability_id: &str,
        update: &UpdateAvailability,
    ) -> DataResult<Availability> {
        if update.is_empty() {
            return Err(DataError::Validation("no availability fields to update".to_string()));
        }
        if let Some(day) = update.day_of_week {
            validate_day_of_week(day)?;
        }
        if let (Some(start), Some(end)) = (update.start_time, update.end_time) {
            validate_window(start < end)?;
        }

        let rows: Vec<AvailabilityRow> = self
            .client
            .update(AVAILABILITY, &Query::new().eq("id", availability_id), update)
            .await?;

        let row = rows.into_iter().next().ok_or_else(|| DataError::NotFound {
            entity: "availability",
            id: availability_id.to_string(),
        })?;

        Availability::try_from(row)
    }

    pub async fn delete_availability(&self, availability_id: &str) -> DataResult<()> {
        self.client
            .delete(AVAILABILITY, &Query::new().eq("id", availability_id))
            .await?;

        tracing::info!("Deleted availability {}", availability_id);
        Ok(())
    }

    pub async fn list_blockouts(&self, instructor_id: &str) -> DataResult<Vec<Blockout>> {
        let rows: Vec<BlockoutRow> = self
            .client
            .select(
                BLOCKOUTS,
                &Query::new()
                    .eq("instructor_id", instructor_id)
                    .order("date", true),
            )
            .await?;

        Ok(rows.into_iter().map(Blockout::from).collect())
    }

    pub async fn create_blockout(&self, blockout: &CreateBlockout) -> DataResult<Blockout> {
        if let (Some(start), Some(end)) = (blockout.start_time, blockout.end_time) {
            validate_window(start < end)?;
        }

        let row: BlockoutRow = self.client.insert(BLOCKOUTS, blockout).await?;

        tracing::info!(
            "Added blockout {} on {} for instructor {}",
            row.id,
            row.date,
            row.instructor_id
        );
        Ok(Blockout::from(row))
    }

    pub async fn update_blockout(&self, blockout_id: &str, update: &UpdateBlockout) -> DataResult<Blockout> {
        if update.is_empty() {
            return Err(DataError::Validation("no blockout fields to update".to_string()));
        }

        let rows: Vec<BlockoutRow> = self
            .client
            .update(BLOCKOUTS, &Query::new().eq("id", blockout_id), update)
            .await?;

        rows.into_iter()
            .next()
            .map(Blockout::from)
            .ok_or_else(|| DataError::NotFound {
                entity: "blockout",
                id: blockout_id.to_string(),
            })
    }

    pub async fn delete_blockout(&self, blockout_id: &str) -> DataResult<()> {
        self.client
            .delete(BLOCKOUTS, &Query::new().eq("id", blockout_id))
            .await?;

        tracing::info!("Deleted blockout {}", blockout_id);
        Ok(())
    }
}

fn validate_window(ordered: bool) -> DataResult<()> {
    if ordered {
        Ok(())
    } else {
        Err(DataError::Validation("start time must be before end time".to_string()))
    }
}

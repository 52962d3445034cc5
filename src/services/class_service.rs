use crate::api::{BackendClient, Query};
use crate::error::{DataError, DataResult};
use crate::models::{ClassType, ClassTypeRow, CreateClassType, UpdateClassType};

const CLASS_TYPES: &str = "class_types";

#[derive(Clone)]
pub struct ClassService {
    client: BackendClient,
}

impl ClassService {
    pub fn new(client: BackendClient) -> Self {
        Self { client }
    }

    pub async fn list_classes(&self) -> DataResult<Vec<ClassType>> {
        let rows: Vec<ClassTypeRow> = self
            .client
            .select(CLASS_TYPES, &Query::new().order("name", true))
            .await?;

        Ok(rows.into_iter().map(ClassType::from).collect())
    }

    pub async fn get_class(&self, class_id: &str) -> DataResult<Option<ClassType>> {
        let row: Option<ClassTypeRow> = self
            .client
            .select_one(CLASS_TYPES, &Query::new().eq("id", class_id))
            .await?;

        Ok(row.map(ClassType::from))
    }

    pub async fn create_class(&self, class: &CreateClassType) -> DataResult<ClassType> {
        let row: ClassTypeRow = self.client.insert(CLASS_TYPES, class).await?;

        tracing::info!("Created class type {} ({})", row.name, row.id);
        Ok(ClassType::from(row))
    }

    pub async fn update_class(&self, class_id: &str, update: &UpdateClassType) -> DataResult<ClassType> {
        if update.is_empty() {
            return Err(DataError::Validation("no class fields to update".to_string()));
        }

        let rows: Vec<ClassTypeRow> = self
            .client
            .update(CLASS_TYPES, &Query::new().eq("id", class_id), update)
            .await?;

        rows.into_iter()
            .next()
            .map(ClassType::from)
            .ok_or_else(|| DataError::NotFound {
                entity: "class type",
                id: class_id.to_string(),
            })
    }

    pub async fn delete_class(&self, class_id: &str) -> DataResult<()> {
        self.client
            .delete(CLASS_TYPES, &Query::new().eq("id", class_id))
            .await?;

        tracing::info!("Deleted class type {}", class_id);
        Ok(())
    }
}

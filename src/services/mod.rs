// Data-access services, one per entity family

pub mod auth_service;
pub mod class_service;
mod credits;
pub mod package_service;
pub mod progress_service;
pub mod schedule_service;
pub mod session_service;
pub mod settings_service;
pub mod user_service;

pub use auth_service::AuthService;
pub use class_service::ClassService;
pub use package_service::PackageService;
pub use progress_service::ProgressService;
pub use schedule_service::ScheduleService;
pub use session_service::SessionService;
pub use settings_service::SettingsService;
pub use user_service::UserService;

use crate::api::BackendClient;
use crate::config::BackendConfig;
use crate::error::DataResult;

/// Every service over one shared backend client
#[derive(Clone)]
pub struct Store {
    client: BackendClient,
    pub auth: AuthService,
    pub users: UserService,
    pub classes: ClassService,
    pub sessions: SessionService,
    pub packages: PackageService,
    pub schedule: ScheduleService,
    pub progress: ProgressService,
    pub settings: SettingsService,
}

impl Store {
    pub fn new(client: BackendClient) -> Self {
        let users = UserService::new(client.clone());

        Self {
            auth: AuthService::new(client.clone(), users.clone()),
            users,
            classes: ClassService::new(client.clone()),
            sessions: SessionService::new(client.clone()),
            packages: PackageService::new(client.clone()),
            schedule: ScheduleService::new(client.clone()),
            progress: ProgressService::new(client.clone()),
            settings: SettingsService::new(client.clone()),
            client,
        }
    }

    pub fn connect(config: &BackendConfig) -> DataResult<Self> {
        Ok(Self::new(BackendClient::new(config)?))
    }

    pub fn client(&self) -> &BackendClient {
        &self.client
    }
}

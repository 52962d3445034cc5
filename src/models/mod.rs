// Application records, table rows and the mapping between them

pub mod class_type;
pub mod package;
pub mod progress;
pub mod schedule;
pub mod session;
pub mod settings;
pub mod user;

pub use class_type::*;
pub use package::*;
pub use progress::*;
pub use schedule::*;
pub use session::*;
pub use settings::{SettingRow, Settings};
pub use user::*;

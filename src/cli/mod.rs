mod activity;
mod auth;
mod commands;
mod course;
pub mod credentials;
pub mod http_client;
mod info;
pub mod pickers;
mod section;
mod site;
mod token;
mod user;

pub use activity::{run_activity_add, run_activity_delete};
pub use auth::{run_auth_login, run_auth_logout};
pub use commands::{
    ActivityCommands, AdminCommands, AuthCommands, CourseCommands, SectionCommands, SiteCommands,
    TokenCommands, UserCommands,
};
pub use course::{run_course_create, run_course_delete, run_course_list, run_course_show};
pub use info::run_info;
pub use section::{run_section_add, run_section_delete};
pub use site::{run_site_create, run_site_list};
pub use token::{run_token_create, run_token_revoke};
pub use user::{run_user_add, run_user_remove};

use crate::config::ServerConfig;
use crate::store::SqliteStore;

/// Open the store in `data_dir`, failing if `admin init` never ran there.
pub fn init_store(data_dir: &str) -> anyhow::Result<SqliteStore> {
    let config = ServerConfig {
        data_dir: data_dir.into(),
        ..ServerConfig::default()
    };
    let db_path = config.db_path();

    if !db_path.exists() {
        anyhow::bail!(
            "Database not found at {}. Run 'coursewright admin init' first.",
            db_path.display()
        );
    }

    SqliteStore::new(&db_path).map_err(Into::into)
}

mod schema;
mod sqlite;

pub use sqlite::SqliteStore;

use crate::error::Result;
use crate::types::*;

/// Store defines the row-store interface the authoring model persists through.
///
/// Every method is a single independent round trip; callers get no
/// transaction spanning two calls.
pub trait Store: Send + Sync {
    fn initialize(&self) -> Result<()>;

    // User operations
    fn create_user(&self, user: &User) -> Result<()>;
    fn get_user(&self, id: &str) -> Result<Option<User>>;
    fn get_user_by_email(&self, email: &str) -> Result<Option<User>>;
    fn list_users(&self, cursor: &str, limit: i32) -> Result<Vec<User>>;
    fn delete_user(&self, id: &str) -> Result<bool>;

    // Token operations
    fn create_token(&self, token: &Token) -> Result<()>;
    fn get_token_by_id(&self, id: &str) -> Result<Option<Token>>;
    fn get_token_by_lookup(&self, lookup: &str) -> Result<Option<Token>>;
    fn list_tokens(&self, cursor: &str, limit: i32) -> Result<Vec<Token>>;
    fn list_user_tokens(&self, user_id: &str) -> Result<Vec<Token>>;
    fn delete_token(&self, id: &str) -> Result<bool>;
    fn update_token_last_used(&self, id: &str) -> Result<()>;

    // Site operations
    fn create_site(&self, site: &Site) -> Result<()>;
    fn get_site(&self, id: &str) -> Result<Option<Site>>;
    fn get_site_by_url(&self, url: &str) -> Result<Option<Site>>;
    fn list_sites(&self, user_id: &str) -> Result<Vec<Site>>;
    fn update_site(&self, site: &Site) -> Result<()>;
    fn delete_site(&self, id: &str) -> Result<bool>;

    // Course operations
    fn create_course(&self, course: &Course) -> Result<()>;
    fn get_course(&self, id: &str) -> Result<Option<Course>>;
    fn get_course_by_title(&self, user_id: &str, title: &str) -> Result<Option<Course>>;
    /// Newest first.
    fn list_courses(&self, user_id: &str) -> Result<Vec<Course>>;
    fn update_course(&self, course: &Course) -> Result<()>;
    fn delete_course(&self, id: &str) -> Result<bool>;

    // Section operations
    fn create_section(&self, section: &Section) -> Result<()>;
    fn get_section(&self, id: &str) -> Result<Option<Section>>;
    /// Ordered by `order_index`.
    fn list_sections(&self, course_id: &str) -> Result<Vec<Section>>;
    fn update_section(&self, section: &Section) -> Result<()>;
    fn delete_section(&self, id: &str) -> Result<bool>;

    // Activity operations
    fn create_activity(&self, activity: &Activity) -> Result<()>;
    fn get_activity(&self, id: &str) -> Result<Option<Activity>>;
    fn list_course_activities(&self, course_id: &str) -> Result<Vec<Activity>>;
    fn update_activity(&self, activity: &Activity) -> Result<()>;
    fn delete_activity(&self, id: &str) -> Result<bool>;
    fn delete_section_activities(&self, section_id: &str) -> Result<usize>;

    // Settings rows (one per course), upserted by course id
    fn get_course_settings(&self, course_id: &str) -> Result<Option<CourseSettings>>;
    fn upsert_course_settings(&self, settings: &CourseSettings) -> Result<()>;
    fn delete_course_settings(&self, course_id: &str) -> Result<bool>;
    fn list_site_course_ids(&self, site_id: &str) -> Result<Vec<String>>;
    fn unlink_site(&self, site_id: &str) -> Result<usize>;

    fn get_course_access(&self, course_id: &str) -> Result<Option<CourseAccess>>;
    fn upsert_course_access(&self, access: &CourseAccess) -> Result<()>;
    fn delete_course_access(&self, course_id: &str) -> Result<bool>;

    fn get_course_pricing(&self, course_id: &str) -> Result<Option<CoursePricing>>;
    fn upsert_course_pricing(&self, pricing: &CoursePricing) -> Result<()>;
    fn delete_course_pricing(&self, course_id: &str) -> Result<bool>;

    // Admin
    fn has_admin_token(&self) -> Result<bool>;
    fn count_rows(&self, table: Table) -> Result<i64>;

    fn close(&self) -> Result<()>;
}

/// Tables that can be counted for status reporting.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Table {
    Users,
    Tokens,
    Sites,
    Courses,
    Sections,
    Activities,
}

impl Table {
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Users => "users",
            Self::Tokens => "tokens",
            Self::Sites => "sites",
            Self::Courses => "courses",
            Self::Sections => "course_sections",
            Self::Activities => "course_activities",
        }
    }
}

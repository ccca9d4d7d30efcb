//! The course authoring model.
//!
//! A course is loaded into a [`CourseTree`], edited through a
//! [`CourseEditor`] and configured through settings [`Panel`]s. Every edit is
//! applied to the tree first and then persisted with one store call; if the
//! call fails the local change is reverted before the error is returned.

pub mod catalog;
pub mod courses;
mod editor;
pub mod preview;
mod settings;
pub mod title;
mod tree;
pub mod video;

pub use editor::{ActivityDraft, ActivityPatch, CourseEditor, SectionPatch};
pub use preview::{CoursePreview, render_preview};
pub use title::TitleDebouncer;
pub use settings::{AccessPanel, GeneralPanel, Panel, PanelKind, PricingPanel};
pub use tree::{ActivityNode, CourseTree, SectionNode, load_course_tree};

use crate::error::{Error, Result};

/// Rejects blank input with `message`, returning the trimmed value otherwise.
pub(crate) fn require_text(value: &str, message: &str) -> Result<String> {
    let value = value.trim();
    if value.is_empty() {
        return Err(Error::validation(message));
    }
    Ok(value.to_string())
}

#[cfg(test)]
pub(crate) mod test_support {
    use chrono::Utc;
    use tempfile::TempDir;

    use crate::store::{SqliteStore, Store};
    use crate::types::*;

    pub struct Fixture {
        pub _temp: TempDir,
        pub store: SqliteStore,
        pub user: User,
        pub course: Course,
    }

    pub fn fixture() -> Fixture {
        let temp = TempDir::new().unwrap();
        let store = SqliteStore::new(temp.path().join("test.db")).unwrap();
        store.initialize().unwrap();

        let user = User {
            id: "user-1".to_string(),
            email: "author@example.com".to_string(),
            display_name: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };
        store.create_user(&user).unwrap();

        let course = Course {
            id: "course-1".to_string(),
            user_id: user.id.clone(),
            title: "Rust for Authors".to_string(),
            description: "Learn by building".to_string(),
            status: PublishStatus::Draft,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };
        store.create_course(&course).unwrap();

        Fixture {
            _temp: temp,
            store,
            user,
            course,
        }
    }

    pub fn site(store: &SqliteStore, id: &str, user_id: &str, url: &str) -> Site {
        let site = Site {
            id: id.to_string(),
            user_id: user_id.to_string(),
            name: url.to_string(),
            url: url.to_string(),
            status: PublishStatus::Published,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };
        store.create_site(&site).unwrap();
        site
    }
}

//! Course lifecycle: creation, title availability and cascading delete.

use chrono::Utc;
use serde::Deserialize;

use super::require_text;
use crate::error::{Error, Result};
use crate::store::Store;
use crate::types::*;

pub const DUPLICATE_TITLE: &str = "A course with this name already exists";

#[derive(Debug, Clone, Deserialize)]
pub struct NewCourse {
    pub title: String,
    pub description: String,
    #[serde(default)]
    pub course_image: Option<String>,
    /// Access chosen at creation. Anything but `draft` publishes the course.
    #[serde(default)]
    pub access_type: Option<AccessType>,
}

/// Whether `user_id` can use `title` for a new course.
pub fn title_available(store: &dyn Store, user_id: &str, title: &str) -> Result<bool> {
    let title = title.trim();
    if title.is_empty() {
        return Ok(false);
    }
    Ok(store.get_course_by_title(user_id, title)?.is_none())
}

pub fn create_course(store: &dyn Store, user_id: &str, new: NewCourse) -> Result<Course> {
    let title = require_text(&new.title, "Course title is required")?;
    let description = require_text(&new.description, "Course description is required")?;

    if !title_available(store, user_id, &title)? {
        return Err(Error::Conflict(DUPLICATE_TITLE.to_string()));
    }

    let now = Utc::now();
    let course = Course {
        id: uuid::Uuid::new_v4().to_string(),
        user_id: user_id.to_string(),
        title,
        description,
        status: match new.access_type {
            Some(access) if access != AccessType::Draft => PublishStatus::Published,
            _ => PublishStatus::Draft,
        },
        created_at: now,
        updated_at: now,
    };
    store.create_course(&course)?;

    if let Some(image) = new.course_image.filter(|i| !i.trim().is_empty()) {
        let mut settings = CourseSettings::empty(&course.id);
        settings.course_image = Some(image.trim().to_string());
        store.upsert_course_settings(&settings)?;
    }

    if let Some(access_type) = new.access_type {
        let mut access = CourseAccess::empty(&course.id);
        access.access_type = access_type;
        store.upsert_course_access(&access)?;
    }

    tracing::info!(course_id = %course.id, user_id, "Created course");
    Ok(course)
}

/// Deletes a course and everything hanging off it, one row group at a time.
///
/// Returns `false` if the course does not exist.
pub fn delete_course(store: &dyn Store, course_id: &str) -> Result<bool> {
    if store.get_course(course_id)?.is_none() {
        return Ok(false);
    }

    for section in store.list_sections(course_id)? {
        store.delete_section_activities(&section.id)?;
        store.delete_section(&section.id)?;
    }
    for stray in store.list_course_activities(course_id)? {
        store.delete_activity(&stray.id)?;
    }

    store.delete_course_settings(course_id)?;
    store.delete_course_access(course_id)?;
    store.delete_course_pricing(course_id)?;

    let deleted = store.delete_course(course_id)?;
    if deleted {
        tracing::info!(course_id, "Deleted course");
    }
    Ok(deleted)
}

/// Deletes every course owned by `user_id`.
pub fn delete_user_courses(store: &dyn Store, user_id: &str) -> Result<usize> {
    let mut count = 0;
    for course in store.list_courses(user_id)? {
        if delete_course(store, &course.id)? {
            count += 1;
        }
    }
    Ok(count)
}

/// Removes a user with their courses. Site links are cleared first so no
/// other course keeps pointing at the user's sites; tokens and sites go with
/// the user row.
pub fn delete_user_account(store: &dyn Store, user_id: &str) -> Result<bool> {
    for site in store.list_sites(user_id)? {
        store.unlink_site(&site.id)?;
    }
    let courses = delete_user_courses(store, user_id)?;

    let deleted = store.delete_user(user_id)?;
    if deleted {
        tracing::info!(user_id, courses, "Deleted user");
    }
    Ok(deleted)
}

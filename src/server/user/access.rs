//! Ownership checks. Rows owned by someone else are reported as missing.

use crate::server::response::{ApiError, StoreOptionExt, StoreResultExt};
use crate::store::Store;
use crate::types::{Activity, Course, Section, Site, User};

pub fn owned_course(store: &dyn Store, user: &User, course_id: &str) -> Result<Course, ApiError> {
    store
        .get_course(course_id)
        .api_err("Failed to get course")?
        .filter(|c| c.user_id == user.id)
        .or_not_found("Course not found")
}

pub fn owned_section(
    store: &dyn Store,
    user: &User,
    section_id: &str,
) -> Result<(Course, Section), ApiError> {
    let section = store
        .get_section(section_id)
        .api_err("Failed to get section")?
        .or_not_found("Section not found")?;

    let course = owned_course(store, user, &section.course_id)
        .map_err(|_| ApiError::not_found("Section not found"))?;

    Ok((course, section))
}

pub fn owned_activity(
    store: &dyn Store,
    user: &User,
    activity_id: &str,
) -> Result<(Course, Activity), ApiError> {
    let activity = store
        .get_activity(activity_id)
        .api_err("Failed to get activity")?
        .or_not_found("Activity not found")?;

    let course = owned_course(store, user, &activity.course_id)
        .map_err(|_| ApiError::not_found("Activity not found"))?;

    Ok((course, activity))
}

pub fn owned_site(store: &dyn Store, user: &User, site_id: &str) -> Result<Site, ApiError> {
    store
        .get_site(site_id)
        .api_err("Failed to get site")?
        .filter(|s| s.user_id == user.id)
        .or_not_found("Site not found")
}

//! Public catalog of published courses per site.

use serde::Serialize;

use crate::error::Result;
use crate::store::Store;
use crate::types::*;

#[derive(Debug, Clone, Serialize)]
pub struct CatalogCourse {
    pub id: String,
    pub slug: String,
    pub title: String,
    pub description: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    pub includes: Vec<String>,
    pub what_you_learn: Vec<String>,
    pub instructor_name: String,
    pub instructor_title: String,
    pub instructor_bio: String,
    pub access_type: AccessType,
    pub price: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub compare_at_price: Option<i64>,
    pub sections: Vec<CatalogSection>,
}

#[derive(Debug, Clone, Serialize)]
pub struct CatalogSection {
    pub id: String,
    pub title: String,
    pub description: String,
    pub order_index: i64,
}

/// Lower-cases a title and replaces whitespace runs with `-`.
#[must_use]
pub fn slugify(title: &str) -> String {
    title
        .to_lowercase()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join("-")
}

fn lines(joined: &str) -> Vec<String> {
    joined
        .lines()
        .map(str::trim)
        .filter(|l| !l.is_empty())
        .map(str::to_string)
        .collect()
}

/// Published courses of the site's owner that are linked to the site.
///
/// An unknown site yields an empty catalog.
pub fn courses_for_site(store: &dyn Store, site_url: &str) -> Result<Vec<CatalogCourse>> {
    let Some(site) = store.get_site_by_url(site_url)? else {
        return Ok(Vec::new());
    };

    let linked = store.list_site_course_ids(&site.id)?;

    let mut catalog = Vec::new();
    for course in store.list_courses(&site.user_id)? {
        if course.status != PublishStatus::Published || !linked.contains(&course.id) {
            continue;
        }

        let settings = store
            .get_course_settings(&course.id)?
            .unwrap_or_else(|| CourseSettings::empty(&course.id));
        let access = store
            .get_course_access(&course.id)?
            .unwrap_or_else(|| CourseAccess::empty(&course.id));
        let pricing = store
            .get_course_pricing(&course.id)?
            .unwrap_or_else(|| CoursePricing::empty(&course.id));
        let free = access.access_type == AccessType::Free;
        let sections = store
            .list_sections(&course.id)?
            .into_iter()
            .map(|s| CatalogSection {
                id: s.id,
                title: s.title,
                description: s.description,
                order_index: s.order_index,
            })
            .collect();

        catalog.push(CatalogCourse {
            slug: slugify(&course.title),
            id: course.id,
            title: course.title,
            description: course.description,
            image: settings.course_image,
            includes: if settings.show_course_includes {
                lines(&settings.course_label)
            } else {
                Vec::new()
            },
            what_you_learn: if settings.show_what_you_learn {
                lines(&settings.what_you_learn)
            } else {
                Vec::new()
            },
            instructor_name: settings.instructor_name,
            instructor_title: settings.instructor_title,
            instructor_bio: settings.instructor_bio,
            price: if free { 0 } else { pricing.price },
            compare_at_price: (!free && pricing.show_compare_at_price)
                .then_some(pricing.compare_at_price),
            access_type: access.access_type,
            sections,
        });
    }

    Ok(catalog)
}

pub fn course_by_slug(store: &dyn Store, site_url: &str, slug: &str) -> Result<Option<CatalogCourse>> {
    Ok(courses_for_site(store, site_url)?
        .into_iter()
        .find(|c| c.slug == slug))
}

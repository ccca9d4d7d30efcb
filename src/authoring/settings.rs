use std::collections::HashSet;

use chrono::Utc;
use serde::{Deserialize, Serialize};

use super::require_text;
use crate::error::{Error, Result};
use crate::store::Store;
use crate::types::*;

pub const MAX_INCLUDES: usize = 5;
pub const MAX_WHAT_YOU_LEARN: usize = 3;

const FREE_PRICING: &str = "Cannot set pricing for free courses";
const PRICE_ABOVE_COMPARE: &str = "Course price must be lower than compare-at price";
/// ₹10 crore, in paise.
pub const MAX_PRICE: i64 = 10_000_000_000;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum PanelKind {
    General,
    Access,
    Pricing,
}

/// One settings form, loaded from and saved to a single row.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "panel", rename_all = "kebab-case")]
pub enum Panel {
    General(GeneralPanel),
    Access(AccessPanel),
    Pricing(PricingPanel),
}

impl Panel {
    pub fn load(store: &dyn Store, kind: PanelKind, course_id: &str) -> Result<Self> {
        Ok(match kind {
            PanelKind::General => Self::General(GeneralPanel::load(store, course_id)?),
            PanelKind::Access => Self::Access(AccessPanel::load(store, course_id)?),
            PanelKind::Pricing => Self::Pricing(PricingPanel::load(store, course_id)?),
        })
    }

    pub fn kind(&self) -> PanelKind {
        match self {
            Self::General(_) => PanelKind::General,
            Self::Access(_) => PanelKind::Access,
            Self::Pricing(_) => PanelKind::Pricing,
        }
    }

    pub fn save(&self, store: &dyn Store) -> Result<()> {
        match self {
            Self::General(panel) => panel.save(store).map(|_| ()),
            Self::Access(panel) => panel.save(store).map(|_| ()),
            Self::Pricing(panel) => panel.save(store).map(|_| ()),
        }
    }
}

fn split_lines(joined: &str) -> Vec<String> {
    joined
        .split('\n')
        .map(str::trim)
        .filter(|l| !l.is_empty())
        .map(str::to_string)
        .collect()
}

fn join_lines(lines: &[String]) -> String {
    lines
        .iter()
        .map(|l| l.trim())
        .filter(|l| !l.is_empty())
        .collect::<Vec<_>>()
        .join("\n")
}

/// Title, description and the marketing fields shown on course pages.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeneralPanel {
    #[serde(skip_deserializing)]
    pub course_id: String,
    pub title: String,
    pub description: String,
    #[serde(default)]
    pub course_image: Option<String>,
    #[serde(default)]
    pub includes: Vec<String>,
    #[serde(default)]
    pub what_you_learn: Vec<String>,
    #[serde(default)]
    pub instructor_name: String,
    #[serde(default)]
    pub instructor_title: String,
    #[serde(default)]
    pub instructor_bio: String,
    #[serde(default = "default_true")]
    pub show_course_includes: bool,
    #[serde(default = "default_true")]
    pub show_what_you_learn: bool,
    #[serde(default = "default_true")]
    pub show_instructor: bool,
    #[serde(default)]
    pub website_ids: Vec<String>,
}

fn default_true() -> bool {
    true
}

impl GeneralPanel {
    pub fn load(store: &dyn Store, course_id: &str) -> Result<Self> {
        let course = store.get_course(course_id)?.ok_or(Error::NotFound)?;
        let settings = store
            .get_course_settings(course_id)?
            .unwrap_or_else(|| CourseSettings::empty(course_id));

        Ok(Self {
            course_id: course.id,
            title: course.title,
            description: course.description,
            course_image: settings.course_image,
            includes: split_lines(&settings.course_label),
            what_you_learn: split_lines(&settings.what_you_learn),
            instructor_name: settings.instructor_name,
            instructor_title: settings.instructor_title,
            instructor_bio: settings.instructor_bio,
            show_course_includes: settings.show_course_includes,
            show_what_you_learn: settings.show_what_you_learn,
            show_instructor: settings.show_instructor,
            website_ids: settings.website_ids,
        })
    }

    /// Validates, updates the course row and upserts the settings row.
    pub fn save(&self, store: &dyn Store) -> Result<CourseSettings> {
        let title = require_text(&self.title, "Course title is required")?;

        let includes = join_lines(&self.includes);
        if includes.lines().count() > MAX_INCLUDES {
            return Err(Error::validation(format!(
                "A course can list at most {MAX_INCLUDES} includes"
            )));
        }
        let what_you_learn = join_lines(&self.what_you_learn);
        if what_you_learn.lines().count() > MAX_WHAT_YOU_LEARN {
            return Err(Error::validation(format!(
                "A course can list at most {MAX_WHAT_YOU_LEARN} learning outcomes"
            )));
        }

        let mut course = store.get_course(&self.course_id)?.ok_or(Error::NotFound)?;

        let mut seen = HashSet::new();
        let mut website_ids = Vec::new();
        for id in &self.website_ids {
            let id = id.trim();
            if id.is_empty() || !seen.insert(id.to_string()) {
                continue;
            }
            match store.get_site(id)? {
                Some(site) if site.user_id == course.user_id => website_ids.push(site.id),
                _ => return Err(Error::validation(format!("Unknown site: {id}"))),
            }
        }

        course.title = title;
        course.description = self.description.trim().to_string();
        course.updated_at = Utc::now();
        store.update_course(&course)?;

        let settings = CourseSettings {
            course_id: course.id,
            course_image: self
                .course_image
                .as_deref()
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(str::to_string),
            course_label: includes,
            what_you_learn,
            instructor_name: self.instructor_name.trim().to_string(),
            instructor_title: self.instructor_title.trim().to_string(),
            instructor_bio: self.instructor_bio.trim().to_string(),
            show_course_includes: self.show_course_includes,
            show_what_you_learn: self.show_what_you_learn,
            show_instructor: self.show_instructor,
            website_ids,
            updated_at: Utc::now(),
        };
        store.upsert_course_settings(&settings)?;

        Ok(settings)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AccessPanel {
    #[serde(skip_deserializing)]
    pub course_id: String,
    pub access_type: AccessType,
    #[serde(default)]
    pub navigation_type: NavigationType,
}

impl AccessPanel {
    pub fn load(store: &dyn Store, course_id: &str) -> Result<Self> {
        let access = store
            .get_course_access(course_id)?
            .unwrap_or_else(|| CourseAccess::empty(course_id));

        Ok(Self {
            course_id: access.course_id,
            access_type: access.access_type,
            navigation_type: access.navigation_type,
        })
    }

    pub fn save(&self, store: &dyn Store) -> Result<CourseAccess> {
        let access = CourseAccess {
            course_id: self.course_id.clone(),
            access_type: self.access_type,
            navigation_type: self.navigation_type,
            updated_at: Utc::now(),
        };
        store.upsert_course_access(&access)?;
        Ok(access)
    }
}

/// Price form. Amounts are in paise.
///
/// Mutators reject changes outright while the course is free and when the
/// amount is negative. Ordering problems between price and compare-at price
/// are kept as an inline error that blocks [`PricingPanel::save`].
#[derive(Debug, Clone, Serialize)]
pub struct PricingPanel {
    pub course_id: String,
    pub access_type: AccessType,
    pub price: i64,
    pub compare_at_price: i64,
    pub show_compare_at_price: bool,
    #[serde(skip)]
    error: Option<String>,
}

/// Formats paise as rupees, e.g. `₹499.01`.
#[must_use]
pub fn format_rupees(paise: i64) -> String {
    format!("₹{}.{:02}", paise / 100, paise % 100)
}

fn check_amount(amount: i64) -> Result<()> {
    if amount < 0 {
        return Err(Error::validation("Price cannot be negative"));
    }
    if amount > MAX_PRICE {
        return Err(Error::validation("Price is too large"));
    }
    Ok(())
}

fn compare_at_minimum(price: i64) -> String {
    format!(
        "The compare-at price must be at least {}",
        format_rupees(price.saturating_add(1))
    )
}

impl PricingPanel {
    pub fn load(store: &dyn Store, course_id: &str) -> Result<Self> {
        let access_type = store
            .get_course_access(course_id)?
            .map(|a| a.access_type)
            .unwrap_or_default();
        let pricing = store
            .get_course_pricing(course_id)?
            .unwrap_or_else(|| CoursePricing::empty(course_id));

        Ok(Self {
            course_id: course_id.to_string(),
            access_type,
            price: pricing.price,
            compare_at_price: pricing.compare_at_price,
            show_compare_at_price: pricing.show_compare_at_price,
            error: None,
        })
    }

    /// Current inline error, if any.
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// Free courses only accept clearing an amount back to zero.
    fn guard(&self, amount: i64) -> Result<()> {
        if self.access_type == AccessType::Free && amount != 0 {
            return Err(Error::validation(FREE_PRICING));
        }
        check_amount(amount)
    }

    pub fn set_price(&mut self, price: i64) -> Result<()> {
        self.guard(price)?;
        self.price = price;
        self.error = (self.show_compare_at_price
            && self.compare_at_price > 0
            && price >= self.compare_at_price)
            .then(|| PRICE_ABOVE_COMPARE.to_string());
        Ok(())
    }

    pub fn set_compare_at_price(&mut self, compare_at_price: i64) -> Result<()> {
        self.guard(compare_at_price)?;
        self.compare_at_price = compare_at_price;
        self.error = (compare_at_price > 0 && self.price > 0 && compare_at_price <= self.price)
            .then(|| compare_at_minimum(self.price));
        Ok(())
    }

    pub fn set_show_compare_at_price(&mut self, show: bool) -> Result<()> {
        if self.access_type == AccessType::Free && show {
            return Err(Error::validation(FREE_PRICING));
        }
        self.show_compare_at_price = show;
        Ok(())
    }

    /// Checks the whole form, independent of the order fields were set in.
    pub fn validate(&self) -> Result<()> {
        if let Some(error) = &self.error {
            return Err(Error::validation(error.clone()));
        }
        check_amount(self.price)?;
        check_amount(self.compare_at_price)?;
        if self.compare_at_price > 0 && self.price > 0 && self.compare_at_price <= self.price {
            return Err(Error::validation(if self.show_compare_at_price {
                PRICE_ABOVE_COMPARE.to_string()
            } else {
                compare_at_minimum(self.price)
            }));
        }
        Ok(())
    }

    pub fn save(&self, store: &dyn Store) -> Result<CoursePricing> {
        self.validate()?;

        let pricing = CoursePricing {
            course_id: self.course_id.clone(),
            price: self.price,
            compare_at_price: self.compare_at_price,
            show_compare_at_price: self.show_compare_at_price,
            updated_at: Utc::now(),
        };
        store.upsert_course_pricing(&pricing)?;
        Ok(pricing)
    }
}

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Implements `Display` and `FromStr` for a fieldless enum that exposes
/// `ALL` and `as_str`.
macro_rules! impl_str_enum {
    ($ty:ident, $what:literal) => {
        impl fmt::Display for $ty {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl FromStr for $ty {
            type Err = String;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                Self::ALL
                    .iter()
                    .copied()
                    .find(|v| v.as_str() == s)
                    .ok_or_else(|| format!("unknown {}: {s}", $what))
            }
        }
    };
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: String,
    pub email: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Token {
    pub id: String,
    #[serde(skip)]
    pub token_hash: String,
    #[serde(skip)]
    pub token_lookup: String,
    pub is_admin: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_id: Option<String>,
    pub created_at: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expires_at: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_used_at: Option<DateTime<Utc>>,
}

/// Publication state shared by courses and sites.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum PublishStatus {
    #[default]
    Draft,
    Published,
}

impl PublishStatus {
    pub const ALL: [Self; 2] = [Self::Draft, Self::Published];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Draft => "draft",
            Self::Published => "published",
        }
    }
}

impl_str_enum!(PublishStatus, "status");

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Site {
    pub id: String,
    pub user_id: String,
    pub name: String,
    pub url: String,
    pub status: PublishStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Course {
    pub id: String,
    pub user_id: String,
    pub title: String,
    pub description: String,
    pub status: PublishStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Section {
    pub id: String,
    pub course_id: String,
    pub title: String,
    pub description: String,
    pub order_index: i64,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ActivityType {
    Video,
    Pdf,
    Audio,
    Presentation,
    File,
}

impl ActivityType {
    pub const ALL: [Self; 5] = [
        Self::Video,
        Self::Pdf,
        Self::Audio,
        Self::Presentation,
        Self::File,
    ];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Video => "video",
            Self::Pdf => "pdf",
            Self::Audio => "audio",
            Self::Presentation => "presentation",
            Self::File => "file",
        }
    }

    /// Guesses the activity type of an uploaded file from its extension.
    #[must_use]
    pub fn from_file_name(name: &str) -> Self {
        let ext = name
            .rsplit_once('.')
            .map(|(_, ext)| ext.to_ascii_lowercase())
            .unwrap_or_default();
        match ext.as_str() {
            "mp4" | "mov" | "webm" | "mkv" | "avi" => Self::Video,
            "mp3" | "wav" | "m4a" | "ogg" | "aac" => Self::Audio,
            "pdf" => Self::Pdf,
            "ppt" | "pptx" | "key" | "odp" => Self::Presentation,
            _ => Self::File,
        }
    }
}

impl_str_enum!(ActivityType, "activity type");

/// Where an activity's content comes from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ActivitySource {
    Youtube,
    Vimeo,
    Upload,
    Url,
    /// Raw embed code (iframe or script markup).
    Embed,
}

impl ActivitySource {
    pub const ALL: [Self; 5] = [
        Self::Youtube,
        Self::Vimeo,
        Self::Upload,
        Self::Url,
        Self::Embed,
    ];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Youtube => "youtube",
            Self::Vimeo => "vimeo",
            Self::Upload => "upload",
            Self::Url => "url",
            Self::Embed => "embed",
        }
    }
}

impl_str_enum!(ActivitySource, "activity source");

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Activity {
    pub id: String,
    pub course_id: String,
    pub section_id: String,
    pub title: String,
    pub activity_type: ActivityType,
    pub source: ActivitySource,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub file_url: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CourseSettings {
    pub course_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub course_image: Option<String>,
    /// "Course includes" lines, newline-joined.
    pub course_label: String,
    /// "What you'll learn" lines, newline-joined.
    pub what_you_learn: String,
    pub instructor_name: String,
    pub instructor_title: String,
    pub instructor_bio: String,
    pub show_course_includes: bool,
    pub show_what_you_learn: bool,
    pub show_instructor: bool,
    /// Sites displaying this course, in display order.
    pub website_ids: Vec<String>,
    pub updated_at: DateTime<Utc>,
}

impl CourseSettings {
    #[must_use]
    pub fn empty(course_id: &str) -> Self {
        Self {
            course_id: course_id.to_string(),
            course_image: None,
            course_label: String::new(),
            what_you_learn: String::new(),
            instructor_name: String::new(),
            instructor_title: String::new(),
            instructor_bio: String::new(),
            show_course_includes: true,
            show_what_you_learn: true,
            show_instructor: true,
            website_ids: Vec::new(),
            updated_at: Utc::now(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum AccessType {
    #[default]
    Free,
    Paid,
    Draft,
    ComingSoon,
    EnrollmentClosed,
    Private,
}

impl AccessType {
    pub const ALL: [Self; 6] = [
        Self::Free,
        Self::Paid,
        Self::Draft,
        Self::ComingSoon,
        Self::EnrollmentClosed,
        Self::Private,
    ];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Free => "free",
            Self::Paid => "paid",
            Self::Draft => "draft",
            Self::ComingSoon => "coming-soon",
            Self::EnrollmentClosed => "enrollment-closed",
            Self::Private => "private",
        }
    }
}

impl_str_enum!(AccessType, "access type");

/// Where learners land after enrolling.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum NavigationType {
    #[default]
    Global,
    Specific,
}

impl NavigationType {
    pub const ALL: [Self; 2] = [Self::Global, Self::Specific];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Global => "global",
            Self::Specific => "specific",
        }
    }
}

impl_str_enum!(NavigationType, "navigation type");

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CourseAccess {
    pub course_id: String,
    pub access_type: AccessType,
    pub navigation_type: NavigationType,
    pub updated_at: DateTime<Utc>,
}

impl CourseAccess {
    #[must_use]
    pub fn empty(course_id: &str) -> Self {
        Self {
            course_id: course_id.to_string(),
            access_type: AccessType::default(),
            navigation_type: NavigationType::default(),
            updated_at: Utc::now(),
        }
    }
}

/// Amounts are integer minor units (paise).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CoursePricing {
    pub course_id: String,
    pub price: i64,
    pub compare_at_price: i64,
    pub show_compare_at_price: bool,
    pub updated_at: DateTime<Utc>,
}

impl CoursePricing {
    #[must_use]
    pub fn empty(course_id: &str) -> Self {
        Self {
            course_id: course_id.to_string(),
            price: 0,
            compare_at_price: 0,
            show_compare_at_price: false,
            updated_at: Utc::now(),
        }
    }
}

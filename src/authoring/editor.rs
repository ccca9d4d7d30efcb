use std::path::PathBuf;

use chrono::Utc;
use serde::Deserialize;

use super::require_text;
use super::tree::{ActivityNode, CourseTree, SectionNode, load_course_tree};
use super::video::{
    embed_url, is_valid_video_url, validate_source_url, video_kind_from_url, youtube_embed_form,
};
use crate::error::{Error, Result};
use crate::store::Store;
use crate::types::*;

#[derive(Debug, Clone, Default, Deserialize)]
pub struct SectionPatch {
    pub title: Option<String>,
    pub description: Option<String>,
}

/// A new activity as entered in the editor.
#[derive(Debug, Clone, Deserialize)]
pub struct ActivityDraft {
    pub title: String,
    pub activity_type: ActivityType,
    pub source: ActivitySource,
    #[serde(default)]
    pub url: Option<String>,
    /// File picked for an upload; only its name is persisted.
    #[serde(skip)]
    pub local_file: Option<PathBuf>,
    /// Placeholder name for uploads that arrive without a local path.
    #[serde(default)]
    pub file_name: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ActivityPatch {
    pub title: Option<String>,
    pub url: Option<String>,
}

/// Validates an activity link and returns the form that gets stored.
///
/// Video links pasted as a plain URL or embed code are classified by host
/// and turned into a player URL.
fn stored_url(activity_type: ActivityType, source: ActivitySource, url: &str) -> Result<String> {
    let video = activity_type == ActivityType::Video;
    match source {
        ActivitySource::Youtube => {
            if video {
                validate_source_url(source, url)?;
            }
            Ok(youtube_embed_form(url))
        }
        ActivitySource::Vimeo => {
            if video {
                validate_source_url(source, url)?;
            }
            Ok(url.to_string())
        }
        ActivitySource::Url | ActivitySource::Embed if video => {
            embed_url(url, video_kind_from_url(url))
        }
        ActivitySource::Url | ActivitySource::Embed => {
            if !is_valid_video_url(url) {
                return Err(Error::validation("Invalid URL or iframe code"));
            }
            Ok(url.to_string())
        }
        ActivitySource::Upload => Ok(url.to_string()),
    }
}

/// Editor over one loaded course.
pub struct CourseEditor<'a> {
    store: &'a dyn Store,
    tree: CourseTree,
}

impl<'a> CourseEditor<'a> {
    pub fn open(store: &'a dyn Store, course_id: &str) -> Result<Self> {
        let tree = load_course_tree(store, course_id)?;
        Ok(Self { store, tree })
    }

    pub fn tree(&self) -> &CourseTree {
        &self.tree
    }

    pub fn into_tree(self) -> CourseTree {
        self.tree
    }

    /// Reloads the tree from the store.
    ///
    /// On failure the current tree is kept and `false` is returned.
    pub fn refresh(&mut self) -> bool {
        match load_course_tree(self.store, &self.tree.course.id) {
            Ok(tree) => {
                self.tree = tree;
                true
            }
            Err(e) => {
                tracing::warn!(course_id = %self.tree.course.id, "Failed to reload course: {}", e);
                false
            }
        }
    }

    pub fn add_section(&mut self, title: &str, description: &str) -> Result<Section> {
        let title = require_text(title, "Section title is required")?;

        let section = Section {
            id: uuid::Uuid::new_v4().to_string(),
            course_id: self.tree.course.id.clone(),
            title,
            description: description.trim().to_string(),
            order_index: self.tree.sections.len() as i64,
            created_at: Utc::now(),
        };

        self.tree.sections.push(SectionNode {
            section: section.clone(),
            activities: Vec::new(),
        });

        if let Err(e) = self.store.create_section(&section) {
            self.tree.sections.pop();
            return Err(e);
        }

        Ok(section)
    }

    pub fn edit_section(&mut self, section_id: &str, patch: SectionPatch) -> Result<Section> {
        let node = self.tree.section_mut(section_id).ok_or(Error::NotFound)?;

        let mut updated = node.section.clone();
        if let Some(title) = patch.title {
            updated.title = require_text(&title, "Section title is required")?;
        }
        if let Some(description) = patch.description {
            updated.description = description.trim().to_string();
        }

        let previous = std::mem::replace(&mut node.section, updated.clone());

        if let Err(e) = self.store.update_section(&updated) {
            if let Some(node) = self.tree.section_mut(section_id) {
                node.section = previous;
            }
            return Err(e);
        }

        Ok(updated)
    }

    /// Deletes a section and its activities.
    ///
    /// Activity rows go first, then the section row, with no transaction
    /// around the pair. Returns `false` if the section is not in the tree.
    pub fn delete_section(&mut self, section_id: &str) -> Result<bool> {
        let Some(pos) = self
            .tree
            .sections
            .iter()
            .position(|s| s.section.id == section_id)
        else {
            return Ok(false);
        };

        let mut removed = self.tree.sections.remove(pos);

        if let Err(e) = self.store.delete_section_activities(section_id) {
            self.tree.sections.insert(pos, removed);
            return Err(e);
        }

        if let Err(e) = self.store.delete_section(section_id) {
            tracing::warn!(
                section_id,
                "Section row survived after its activities were deleted: {}",
                e
            );
            removed.activities.clear();
            self.tree.sections.insert(pos, removed);
            return Err(e);
        }

        Ok(true)
    }

    pub fn add_activity(&mut self, section_id: &str, draft: ActivityDraft) -> Result<Activity> {
        if self.tree.section(section_id).is_none() {
            return Err(Error::NotFound);
        }

        let title = require_text(&draft.title, "Activity title is required")?;
        let url = draft
            .url
            .as_deref()
            .map(str::trim)
            .filter(|u| !u.is_empty())
            .map(str::to_string);

        let file_url = match draft.source {
            ActivitySource::Upload => {
                let name = draft
                    .local_file
                    .as_ref()
                    .and_then(|p| p.file_name())
                    .map(|n| n.to_string_lossy().into_owned())
                    .or(draft.file_name.clone())
                    .filter(|n| !n.trim().is_empty());
                if name.is_none() {
                    return Err(Error::validation("Please choose a file to upload"));
                }
                name
            }
            _ => None,
        };

        let url = match (draft.source, url) {
            (ActivitySource::Upload, url) => url,
            (_, None) => {
                return Err(Error::validation(
                    "Please provide a URL or upload a file",
                ));
            }
            (source, Some(url)) => Some(stored_url(draft.activity_type, source, &url)?),
        };

        let activity = Activity {
            id: uuid::Uuid::new_v4().to_string(),
            course_id: self.tree.course.id.clone(),
            section_id: section_id.to_string(),
            title,
            activity_type: draft.activity_type,
            source: draft.source,
            url,
            file_url,
            created_at: Utc::now(),
        };

        let node = ActivityNode {
            activity: activity.clone(),
            completed: false,
            local_file: draft.local_file,
        };
        if let Some(section) = self.tree.section_mut(section_id) {
            section.activities.push(node);
        }

        if let Err(e) = self.store.create_activity(&activity) {
            if let Some(section) = self.tree.section_mut(section_id) {
                section.activities.retain(|a| a.activity.id != activity.id);
            }
            return Err(e);
        }

        Ok(activity)
    }

    pub fn edit_activity(&mut self, activity_id: &str, patch: ActivityPatch) -> Result<Activity> {
        let node = self.tree.activity_mut(activity_id).ok_or(Error::NotFound)?;

        let mut updated = node.activity.clone();
        if let Some(title) = patch.title {
            updated.title = require_text(&title, "Activity title is required")?;
        }
        if let Some(url) = patch.url {
            let url = url.trim();
            updated.url = if url.is_empty() && updated.source != ActivitySource::Youtube {
                None
            } else {
                Some(stored_url(updated.activity_type, updated.source, url)?)
            };
        }

        let previous = std::mem::replace(&mut node.activity, updated.clone());

        if let Err(e) = self.store.update_activity(&updated) {
            if let Some(node) = self.tree.activity_mut(activity_id) {
                node.activity = previous;
            }
            return Err(e);
        }

        Ok(updated)
    }

    /// Returns `false` when the activity is not in the given section.
    pub fn delete_activity(&mut self, section_id: &str, activity_id: &str) -> Result<bool> {
        let Some(section) = self.tree.section_mut(section_id) else {
            return Ok(false);
        };
        let Some(pos) = section
            .activities
            .iter()
            .position(|a| a.activity.id == activity_id)
        else {
            return Ok(false);
        };

        let removed = section.activities.remove(pos);

        if let Err(e) = self.store.delete_activity(activity_id) {
            if let Some(section) = self.tree.section_mut(section_id) {
                section.activities.insert(pos, removed);
            }
            return Err(e);
        }

        Ok(true)
    }

    /// Marks a lesson completed in the preview. Nothing is persisted.
    ///
    /// Returns whether the flag changed.
    pub fn open_lesson(&mut self, activity_id: &str) -> bool {
        match self.tree.activity_mut(activity_id) {
            Some(node) if !node.completed => {
                node.completed = true;
                true
            }
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::authoring::test_support::fixture;

    fn video(url: &str, source: ActivitySource) -> ActivityDraft {
        ActivityDraft {
            title: "Intro".to_string(),
            activity_type: ActivityType::Video,
            source,
            url: Some(url.to_string()),
            local_file: None,
            file_name: None,
        }
    }

    #[test]
    fn test_sections_get_insertion_order_indexes() {
        let fx = fixture();
        let mut editor = CourseEditor::open(&fx.store, &fx.course.id).unwrap();

        for title in ["One", "Two", "Three", "Four"] {
            editor.add_section(title, "").unwrap();
        }

        let indexes: Vec<i64> = editor
            .tree()
            .sections
            .iter()
            .map(|s| s.section.order_index)
            .collect();
        assert_eq!(indexes, [0, 1, 2, 3]);

        let reloaded = load_course_tree(&fx.store, &fx.course.id).unwrap();
        let titles: Vec<&str> = reloaded
            .sections
            .iter()
            .map(|s| s.section.title.as_str())
            .collect();
        assert_eq!(titles, ["One", "Two", "Three", "Four"]);
    }

    #[test]
    fn test_blank_section_title_rejected() {
        let fx = fixture();
        let mut editor = CourseEditor::open(&fx.store, &fx.course.id).unwrap();

        let err = editor.add_section("   ", "desc").unwrap_err();
        assert_eq!(err.to_string(), "Section title is required");
        assert!(editor.tree().sections.is_empty());
    }

    #[test]
    fn test_edit_section() {
        let fx = fixture();
        let mut editor = CourseEditor::open(&fx.store, &fx.course.id).unwrap();
        let section = editor.add_section("Basics", "").unwrap();

        let patch = SectionPatch {
            title: Some("Fundamentals".to_string()),
            description: None,
        };
        editor.edit_section(&section.id, patch).unwrap();

        assert_eq!(editor.tree().sections[0].section.title, "Fundamentals");
        let stored = fx.store.get_section(&section.id).unwrap().unwrap();
        assert_eq!(stored.title, "Fundamentals");

        assert!(matches!(
            editor.edit_section("missing", SectionPatch::default()),
            Err(Error::NotFound)
        ));
    }

    #[test]
    fn test_delete_section_removes_activities_and_is_idempotent() {
        let fx = fixture();
        let mut editor = CourseEditor::open(&fx.store, &fx.course.id).unwrap();
        let section = editor.add_section("Basics", "").unwrap();
        let keep = editor.add_section("Advanced", "").unwrap();

        editor
            .add_activity(
                &section.id,
                video("https://youtu.be/abc12345678", ActivitySource::Youtube),
            )
            .unwrap();
        editor
            .add_activity(
                &section.id,
                video("https://vimeo.com/76979871", ActivitySource::Vimeo),
            )
            .unwrap();
        editor
            .add_activity(
                &keep.id,
                video("https://vimeo.com/1", ActivitySource::Vimeo),
            )
            .unwrap();

        assert!(editor.delete_section(&section.id).unwrap());
        assert_eq!(editor.tree().sections.len(), 1);
        assert_eq!(editor.tree().activity_count(), 1);
        assert_eq!(fx.store.list_course_activities(&fx.course.id).unwrap().len(), 1);

        assert!(!editor.delete_section(&section.id).unwrap());
        assert_eq!(editor.tree().sections.len(), 1);
    }

    #[test]
    fn test_delete_section_partial_failure_keeps_empty_section() {
        let fx = fixture();
        let mut editor = CourseEditor::open(&fx.store, &fx.course.id).unwrap();
        let section = editor.add_section("Basics", "").unwrap();
        editor
            .add_activity(
                &section.id,
                video("https://vimeo.com/76979871", ActivitySource::Vimeo),
            )
            .unwrap();

        fx.store
            .connection()
            .execute_batch(
                "CREATE TRIGGER keep_sections BEFORE DELETE ON course_sections
                 BEGIN SELECT RAISE(ABORT, 'sections are locked'); END;",
            )
            .unwrap();

        assert!(matches!(
            editor.delete_section(&section.id),
            Err(Error::Database(_))
        ));
        assert_eq!(editor.tree().sections.len(), 1);
        assert_eq!(editor.tree().sections[0].section.id, section.id);
        assert_eq!(editor.tree().activity_count(), 0);

        assert!(fx.store.get_section(&section.id).unwrap().is_some());
        assert!(fx.store.list_course_activities(&fx.course.id).unwrap().is_empty());
    }

    #[test]
    fn test_linked_and_embedded_videos_use_player_urls() {
        let fx = fixture();
        let mut editor = CourseEditor::open(&fx.store, &fx.course.id).unwrap();
        let section = editor.add_section("Basics", "").unwrap();

        let vimeo = editor
            .add_activity(
                &section.id,
                video("https://vimeo.com/76979871", ActivitySource::Url),
            )
            .unwrap();
        assert_eq!(
            vimeo.url.as_deref(),
            Some("https://player.vimeo.com/video/76979871?title=0&byline=0&portrait=0")
        );

        let iframe = r#"<iframe src="https://example.com/player"></iframe>"#;
        let embedded = editor
            .add_activity(&section.id, video(iframe, ActivitySource::Embed))
            .unwrap();
        assert_eq!(embedded.url.as_deref(), Some(iframe));

        let gumlet = editor
            .add_activity(
                &section.id,
                video("https://play.gumlet.io/embed/abc", ActivitySource::Url),
            )
            .unwrap();
        assert_eq!(gumlet.url.as_deref(), Some("https://play.gumlet.io/embed/abc"));

        let err = editor
            .add_activity(&section.id, video("vdocipher lesson 4", ActivitySource::Url))
            .unwrap_err();
        assert_eq!(err.to_string(), "Invalid URL format");

        let err = editor
            .add_activity(&section.id, video("just some text", ActivitySource::Embed))
            .unwrap_err();
        assert_eq!(err.to_string(), "Invalid URL or iframe code");
        assert_eq!(editor.tree().activity_count(), 3);
    }

    #[test]
    fn test_youtube_video_activity_validation() {
        let fx = fixture();
        let mut editor = CourseEditor::open(&fx.store, &fx.course.id).unwrap();
        let section = editor.add_section("Basics", "").unwrap();

        let activity = editor
            .add_activity(
                &section.id,
                video(
                    "https://www.youtube.com/watch?v=abc12345678",
                    ActivitySource::Youtube,
                ),
            )
            .unwrap();
        assert_eq!(
            activity.url.as_deref(),
            Some("https://www.youtube.com/embed/abc12345678")
        );

        let err = editor
            .add_activity(
                &section.id,
                video("https://notyoutube.com/x", ActivitySource::Youtube),
            )
            .unwrap_err();
        assert!(matches!(err, Error::Validation(_)));
        assert!(err.to_string().contains("valid YouTube URL"));
        assert_eq!(editor.tree().activity_count(), 1);
    }

    #[test]
    fn test_upload_keeps_file_name_as_placeholder() {
        let fx = fixture();
        let mut editor = CourseEditor::open(&fx.store, &fx.course.id).unwrap();
        let section = editor.add_section("Downloads", "").unwrap();

        let draft = ActivityDraft {
            title: "Workbook".to_string(),
            activity_type: ActivityType::Pdf,
            source: ActivitySource::Upload,
            url: None,
            local_file: Some(PathBuf::from("/tmp/uploads/workbook.pdf")),
            file_name: None,
        };
        let activity = editor.add_activity(&section.id, draft).unwrap();
        assert_eq!(activity.file_url.as_deref(), Some("workbook.pdf"));

        let node = editor.tree().activity(&activity.id).unwrap();
        assert_eq!(
            node.local_file.as_deref(),
            Some(std::path::Path::new("/tmp/uploads/workbook.pdf"))
        );

        // The local path never reaches the store.
        let reloaded = load_course_tree(&fx.store, &fx.course.id).unwrap();
        assert!(reloaded.activity(&activity.id).unwrap().local_file.is_none());
    }

    #[test]
    fn test_delete_activity() {
        let fx = fixture();
        let mut editor = CourseEditor::open(&fx.store, &fx.course.id).unwrap();
        let section = editor.add_section("Basics", "").unwrap();
        let activity = editor
            .add_activity(
                &section.id,
                video("https://vimeo.com/76979871", ActivitySource::Vimeo),
            )
            .unwrap();

        assert!(!editor.delete_activity("other", &activity.id).unwrap());
        assert!(editor.delete_activity(&section.id, &activity.id).unwrap());
        assert!(!editor.delete_activity(&section.id, &activity.id).unwrap());
        assert!(fx.store.get_activity(&activity.id).unwrap().is_none());
    }

    #[test]
    fn test_edit_activity_revalidates_url() {
        let fx = fixture();
        let mut editor = CourseEditor::open(&fx.store, &fx.course.id).unwrap();
        let section = editor.add_section("Basics", "").unwrap();
        let activity = editor
            .add_activity(
                &section.id,
                video("https://vimeo.com/76979871", ActivitySource::Vimeo),
            )
            .unwrap();

        let bad = ActivityPatch {
            title: None,
            url: Some("https://example.com/video".to_string()),
        };
        assert!(editor.edit_activity(&activity.id, bad).is_err());

        let good = ActivityPatch {
            title: Some("Welcome".to_string()),
            url: Some("https://vimeo.com/42".to_string()),
        };
        let updated = editor.edit_activity(&activity.id, good).unwrap();
        assert_eq!(updated.title, "Welcome");
        assert_eq!(updated.url.as_deref(), Some("https://vimeo.com/42"));
    }

    #[test]
    fn test_failed_insert_reverts_local_change() {
        let fx = fixture();
        let mut editor = CourseEditor::open(&fx.store, &fx.course.id).unwrap();
        editor.add_section("Kept", "").unwrap();

        fx.store
            .connection()
            .execute_batch("DROP TABLE course_sections")
            .unwrap();

        assert!(matches!(
            editor.add_section("Lost", ""),
            Err(Error::Database(_))
        ));
        assert_eq!(editor.tree().sections.len(), 1);
        assert_eq!(editor.tree().sections[0].section.title, "Kept");

        // Reload fails too, leaving the tree in place.
        assert!(!editor.refresh());
        assert_eq!(editor.tree().sections.len(), 1);
    }

    #[test]
    fn test_open_lesson_marks_completed_once() {
        let fx = fixture();
        let mut editor = CourseEditor::open(&fx.store, &fx.course.id).unwrap();
        let section = editor.add_section("Basics", "").unwrap();
        let activity = editor
            .add_activity(
                &section.id,
                video("https://vimeo.com/76979871", ActivitySource::Vimeo),
            )
            .unwrap();

        assert!(editor.open_lesson(&activity.id));
        assert!(!editor.open_lesson(&activity.id));
        assert!(!editor.open_lesson("missing"));

        assert!(editor.refresh());
        assert!(!editor.tree().activity(&activity.id).unwrap().completed);
    }
}

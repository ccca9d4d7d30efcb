//! Learner view derived from a course tree.

use serde::Serialize;

use super::tree::CourseTree;
use crate::types::{ActivitySource, ActivityType};

#[derive(Debug, Clone, Serialize)]
pub struct CoursePreview {
    pub title: String,
    /// Rounded percentage of completed lessons, 0 for an empty course.
    pub progress: u8,
    pub completed: usize,
    pub total: usize,
    pub sections: Vec<PreviewSection>,
}

#[derive(Debug, Clone, Serialize)]
pub struct PreviewSection {
    pub id: String,
    pub title: String,
    pub lessons: Vec<Lesson>,
}

#[derive(Debug, Clone, Serialize)]
pub struct Lesson {
    pub id: String,
    pub title: String,
    pub activity_type: ActivityType,
    pub source: ActivitySource,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    pub completed: bool,
}

#[must_use]
pub fn progress_percent(completed: usize, total: usize) -> u8 {
    if total == 0 {
        return 0;
    }
    (completed as f64 / total as f64 * 100.0).round() as u8
}

#[must_use]
pub fn render_preview(tree: &CourseTree) -> CoursePreview {
    let sections: Vec<PreviewSection> = tree
        .sections
        .iter()
        .map(|node| PreviewSection {
            id: node.section.id.clone(),
            title: node.section.title.clone(),
            lessons: node
                .activities
                .iter()
                .map(|a| Lesson {
                    id: a.activity.id.clone(),
                    title: a.activity.title.clone(),
                    activity_type: a.activity.activity_type,
                    source: a.activity.source,
                    url: a.activity.url.clone().or_else(|| a.activity.file_url.clone()),
                    completed: a.completed,
                })
                .collect(),
        })
        .collect();

    let total = tree.activity_count();
    let completed = sections
        .iter()
        .flat_map(|s| s.lessons.iter())
        .filter(|l| l.completed)
        .count();

    CoursePreview {
        title: tree.course.title.clone(),
        progress: progress_percent(completed, total),
        completed,
        total,
        sections,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::authoring::{ActivityDraft, CourseEditor};
    use crate::authoring::test_support::fixture;

    #[test]
    fn test_progress_rounding() {
        assert_eq!(progress_percent(0, 0), 0);
        assert_eq!(progress_percent(1, 3), 33);
        assert_eq!(progress_percent(2, 3), 67);
        assert_eq!(progress_percent(3, 3), 100);
    }

    #[test]
    fn test_preview_reflects_opened_lessons() {
        let fx = fixture();
        let mut editor = CourseEditor::open(&fx.store, &fx.course.id).unwrap();

        let empty = render_preview(editor.tree());
        assert_eq!(empty.progress, 0);
        assert!(empty.sections.is_empty());

        let section = editor.add_section("Basics", "").unwrap();
        let mut ids = Vec::new();
        for n in 0..3 {
            let draft = ActivityDraft {
                title: format!("Lesson {n}"),
                activity_type: crate::types::ActivityType::Pdf,
                source: crate::types::ActivitySource::Url,
                url: Some(format!("https://example.com/{n}.pdf")),
                local_file: None,
                file_name: None,
            };
            ids.push(editor.add_activity(&section.id, draft).unwrap().id);
        }

        editor.open_lesson(&ids[0]);
        let preview = render_preview(editor.tree());
        assert_eq!(preview.title, fx.course.title);
        assert_eq!(preview.total, 3);
        assert_eq!(preview.completed, 1);
        assert_eq!(preview.progress, 33);
        assert!(preview.sections[0].lessons[0].completed);
        assert!(!preview.sections[0].lessons[1].completed);
    }
}

use std::collections::HashMap;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::store::Store;
use crate::types::*;

/// In-memory aggregate of one course, as the editor and preview see it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CourseTree {
    pub course: Course,
    pub sections: Vec<SectionNode>,
    pub settings: CourseSettings,
    pub access: CourseAccess,
    pub pricing: CoursePricing,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SectionNode {
    #[serde(flatten)]
    pub section: Section,
    pub activities: Vec<ActivityNode>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ActivityNode {
    #[serde(flatten)]
    pub activity: Activity,
    /// Learner-local flag set by the preview pane. Never persisted.
    #[serde(default)]
    pub completed: bool,
    /// Session-only path of an uploaded file.
    #[serde(skip)]
    pub local_file: Option<PathBuf>,
}

impl ActivityNode {
    #[must_use]
    pub fn new(activity: Activity) -> Self {
        Self {
            activity,
            completed: false,
            local_file: None,
        }
    }
}

impl CourseTree {
    pub fn section(&self, section_id: &str) -> Option<&SectionNode> {
        self.sections.iter().find(|s| s.section.id == section_id)
    }

    pub(crate) fn section_mut(&mut self, section_id: &str) -> Option<&mut SectionNode> {
        self.sections.iter_mut().find(|s| s.section.id == section_id)
    }

    /// Finds an activity anywhere in the tree.
    pub fn activity(&self, activity_id: &str) -> Option<&ActivityNode> {
        self.sections
            .iter()
            .flat_map(|s| s.activities.iter())
            .find(|a| a.activity.id == activity_id)
    }

    pub(crate) fn activity_mut(&mut self, activity_id: &str) -> Option<&mut ActivityNode> {
        self.sections
            .iter_mut()
            .flat_map(|s| s.activities.iter_mut())
            .find(|a| a.activity.id == activity_id)
    }

    #[must_use]
    pub fn activity_count(&self) -> usize {
        self.sections.iter().map(|s| s.activities.len()).sum()
    }
}

/// Loads a course with its ordered sections, their activities and the
/// settings, access and pricing rows. Missing settings rows yield defaults.
pub fn load_course_tree(store: &dyn Store, course_id: &str) -> Result<CourseTree> {
    let course = store.get_course(course_id)?.ok_or(Error::NotFound)?;

    let mut sections: Vec<SectionNode> = store
        .list_sections(course_id)?
        .into_iter()
        .map(|section| SectionNode {
            section,
            activities: Vec::new(),
        })
        .collect();

    let index: HashMap<String, usize> = sections
        .iter()
        .enumerate()
        .map(|(i, s)| (s.section.id.clone(), i))
        .collect();

    for activity in store.list_course_activities(course_id)? {
        match index.get(&activity.section_id) {
            Some(&i) => sections[i].activities.push(ActivityNode::new(activity)),
            None => tracing::warn!(
                activity_id = %activity.id,
                section_id = %activity.section_id,
                "Skipping activity whose section is not loaded"
            ),
        }
    }

    let settings = store
        .get_course_settings(course_id)?
        .unwrap_or_else(|| CourseSettings::empty(course_id));
    let access = store
        .get_course_access(course_id)?
        .unwrap_or_else(|| CourseAccess::empty(course_id));
    let pricing = store
        .get_course_pricing(course_id)?
        .unwrap_or_else(|| CoursePricing::empty(course_id));

    Ok(CourseTree {
        course,
        sections,
        settings,
        access,
        pricing,
    })
}

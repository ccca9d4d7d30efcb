use inquire::{InquireError, Select, Text};
use serde::Serialize;

use crate::authoring::CourseTree;
use crate::types::{AccessType, Course};

use super::credentials::load_credentials;
use super::http_client::{ApiClient, segment};
use super::pickers::{confirm_action, format_relative_time};

#[derive(Serialize)]
struct NewCourseBody<'a> {
    title: &'a str,
    description: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    course_image: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    access_type: Option<AccessType>,
}

pub(super) fn client() -> anyhow::Result<ApiClient> {
    ApiClient::new(&load_credentials()?)
}

struct CourseChoice(Course);

impl std::fmt::Display for CourseChoice {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} [{}]", self.0.title, self.0.status)
    }
}

fn get_or_pick_course(
    client: &ApiClient,
    course_id: Option<String>,
    non_interactive: bool,
) -> anyhow::Result<Option<String>> {
    if let Some(id) = course_id {
        return Ok(Some(id));
    }
    if non_interactive {
        anyhow::bail!("A course ID is required in non-interactive mode");
    }

    let courses: Vec<Course> = client.get("/courses")?;
    if courses.is_empty() {
        anyhow::bail!("No courses found. Create one with 'coursewright course create'.");
    }
    let options = courses.into_iter().map(CourseChoice).collect();
    match Select::new("Select course:", options)
        .with_vim_mode(true)
        .prompt()
    {
        Ok(choice) => Ok(Some(choice.0.id)),
        Err(InquireError::OperationCanceled | InquireError::OperationInterrupted) => Ok(None),
        Err(e) => Err(e.into()),
    }
}

pub fn run_course_list(json: bool) -> anyhow::Result<()> {
    let client = client()?;
    let courses: Vec<Course> = client.get("/courses")?;

    if json {
        println!("{}", serde_json::to_string_pretty(&courses)?);
        return Ok(());
    }

    if courses.is_empty() {
        println!("No courses yet.");
        return Ok(());
    }
    println!();
    for course in &courses {
        println!(
            "  {}  {}  [{}]  created {}",
            course.id,
            course.title,
            course.status,
            format_relative_time(&course.created_at)
        );
    }
    println!();
    Ok(())
}

pub fn run_course_create(
    title: Option<String>,
    description: Option<String>,
    image: Option<String>,
    access: Option<String>,
    non_interactive: bool,
) -> anyhow::Result<()> {
    let access_type: Option<AccessType> = access
        .as_deref()
        .map(str::parse::<AccessType>)
        .transpose()
        .map_err(anyhow::Error::msg)?;
    let client = client()?;

    let title = match title {
        Some(t) => t,
        None if non_interactive => anyhow::bail!("--title is required in non-interactive mode"),
        None => Text::new("Course title:").prompt()?,
    };
    let description = match description {
        Some(d) => d,
        None if non_interactive => {
            anyhow::bail!("--description is required in non-interactive mode")
        }
        None => Text::new("Description:").prompt()?,
    };

    let course: Course = client.post(
        "/courses",
        &NewCourseBody {
            title: &title,
            description: &description,
            course_image: image.as_deref(),
            access_type,
        },
    )?;

    println!();
    println!("Created course \"{}\" ({})", course.title, course.id);
    println!();
    Ok(())
}

pub fn run_course_show(
    course_id: Option<String>,
    json: bool,
    non_interactive: bool,
) -> anyhow::Result<()> {
    let client = client()?;
    let Some(course_id) = get_or_pick_course(&client, course_id, non_interactive)? else {
        return Ok(());
    };

    let tree: CourseTree = client.get(&format!("/courses/{}", segment(&course_id)))?;

    if json {
        println!("{}", serde_json::to_string_pretty(&tree)?);
        return Ok(());
    }

    println!();
    println!("{} [{}]", tree.course.title, tree.course.status);
    println!("{}", tree.course.description);
    println!();
    if tree.sections.is_empty() {
        println!("  No sections yet.");
    }
    for (i, node) in tree.sections.iter().enumerate() {
        println!("  {}. {}  ({})", i + 1, node.section.title, node.section.id);
        for activity in &node.activities {
            println!(
                "       - {} [{} / {}]  ({})",
                activity.activity.title,
                activity.activity.activity_type,
                activity.activity.source,
                activity.activity.id
            );
        }
    }
    println!();
    Ok(())
}

pub fn run_course_delete(
    course_id: Option<String>,
    non_interactive: bool,
    yes: bool,
) -> anyhow::Result<()> {
    let client = client()?;
    let Some(course_id) = get_or_pick_course(&client, course_id, non_interactive)? else {
        return Ok(());
    };

    let course: CourseTree = client.get(&format!("/courses/{}", segment(&course_id)))?;
    let confirmed = confirm_action(
        &format!(
            "Delete course '{}'? All sections, activities and settings will be lost.",
            course.course.title
        ),
        yes,
        non_interactive,
    )?;
    if !confirmed {
        println!("Cancelled.");
        return Ok(());
    }

    client.delete(&format!("/courses/{}", segment(&course_id)))?;

    println!();
    println!("Deleted course '{}'", course.course.title);
    println!();
    Ok(())
}

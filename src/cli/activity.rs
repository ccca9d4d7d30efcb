use std::path::Path;

use serde::Serialize;

use crate::types::{Activity, ActivitySource, ActivityType};

use super::course::client;
use super::http_client::segment;
use super::pickers::confirm_action;

#[derive(Debug, Serialize)]
struct NewActivityBody {
    title: String,
    activity_type: ActivityType,
    source: ActivitySource,
    #[serde(skip_serializing_if = "Option::is_none")]
    url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    file_name: Option<String>,
}

/// Uploads register the file name only; the type defaults from its extension.
fn build_body(
    title: String,
    activity_type: Option<String>,
    source: &str,
    url: Option<String>,
    file: Option<String>,
) -> anyhow::Result<NewActivityBody> {
    let source: ActivitySource = source.parse().map_err(anyhow::Error::msg)?;

    let file_name = file
        .as_deref()
        .map(|f| {
            Path::new(f)
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .ok_or_else(|| anyhow::anyhow!("Not a file: {f}"))
        })
        .transpose()?;

    let activity_type = match (activity_type, &file_name) {
        (Some(t), _) => t.parse().map_err(anyhow::Error::msg)?,
        (None, Some(name)) => ActivityType::from_file_name(name),
        (None, None) => ActivityType::Video,
    };

    Ok(NewActivityBody {
        title,
        activity_type,
        source,
        url,
        file_name,
    })
}

pub fn run_activity_add(
    section_id: String,
    title: String,
    activity_type: Option<String>,
    source: String,
    url: Option<String>,
    file: Option<String>,
) -> anyhow::Result<()> {
    let body = build_body(title, activity_type, &source, url, file)?;
    let activity: Activity =
        client()?.post(&format!("/sections/{}/activities", segment(&section_id)), &body)?;

    println!();
    println!(
        "Added {} activity \"{}\" ({})",
        activity.activity_type, activity.title, activity.id
    );
    if let Some(url) = &activity.url {
        println!("  {url}");
    }
    println!();
    Ok(())
}

pub fn run_activity_delete(
    activity_id: String,
    non_interactive: bool,
    yes: bool,
) -> anyhow::Result<()> {
    let confirmed = confirm_action("Delete this activity?", yes, non_interactive)?;
    if !confirmed {
        println!("Cancelled.");
        return Ok(());
    }

    client()?.delete(&format!("/activities/{}", segment(&activity_id)))?;

    println!();
    println!("Deleted activity {activity_id}");
    println!();
    Ok(())
}

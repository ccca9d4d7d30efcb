use serde::Serialize;

use crate::types::Section;

use super::course::client;
use super::http_client::segment;
use super::pickers::confirm_action;

#[derive(Serialize)]
struct NewSectionBody<'a> {
    title: &'a str,
    description: &'a str,
}

pub fn run_section_add(course_id: String, title: String, description: String) -> anyhow::Result<()> {
    let client = client()?;
    let section: Section = client.post(
        &format!("/courses/{}/sections", segment(&course_id)),
        &NewSectionBody {
            title: &title,
            description: &description,
        },
    )?;

    println!();
    println!(
        "Added section \"{}\" at position {} ({})",
        section.title,
        section.order_index + 1,
        section.id
    );
    println!();
    Ok(())
}

pub fn run_section_delete(section_id: String, non_interactive: bool, yes: bool) -> anyhow::Result<()> {
    let confirmed = confirm_action(
        "Delete this section? Its activities will be deleted too.",
        yes,
        non_interactive,
    )?;
    if !confirmed {
        println!("Cancelled.");
        return Ok(());
    }

    client()?.delete(&format!("/sections/{}", segment(&section_id)))?;

    println!();
    println!("Deleted section {section_id}");
    println!();
    Ok(())
}

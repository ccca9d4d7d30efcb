use serde::Serialize;

use crate::types::{PublishStatus, Site};

use super::course::client;

#[derive(Serialize)]
struct NewSiteBody<'a> {
    name: &'a str,
    url: &'a str,
    status: PublishStatus,
}

pub fn run_site_list(json: bool) -> anyhow::Result<()> {
    let sites: Vec<Site> = client()?.get("/sites")?;

    if json {
        println!("{}", serde_json::to_string_pretty(&sites)?);
        return Ok(());
    }

    if sites.is_empty() {
        println!("No sites yet.");
        return Ok(());
    }
    println!();
    for site in &sites {
        println!("  {}  {}  ({})  [{}]", site.id, site.name, site.url, site.status);
    }
    println!();
    Ok(())
}

pub fn run_site_create(name: String, url: String, publish: bool) -> anyhow::Result<()> {
    let status = if publish {
        PublishStatus::Published
    } else {
        PublishStatus::Draft
    };
    let site: Site = client()?.post(
        "/sites",
        &NewSiteBody {
            name: &name,
            url: &url,
            status,
        },
    )?;

    println!();
    println!("Created site \"{}\" at {} ({})", site.name, site.url, site.id);
    println!();
    Ok(())
}

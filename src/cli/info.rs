use serde::Serialize;

use crate::store::{Store, Table};

use super::init_store;
use super::pickers::list_tokens;

#[derive(Serialize)]
struct ServerInfo {
    users: i64,
    tokens: i64,
    sites: i64,
    courses: i64,
    sections: i64,
    activities: i64,
}

#[derive(Serialize)]
struct UserOutput {
    id: String,
    email: String,
    display_name: Option<String>,
    courses: usize,
    sites: usize,
    created_at: String,
}

#[derive(Serialize)]
struct TokenOutput {
    id: String,
    lookup: String,
    user_id: Option<String>,
    email: Option<String>,
    is_admin: bool,
    created_at: String,
    expires_at: Option<String>,
}

#[derive(Serialize)]
struct DetailedServerInfo {
    counts: ServerInfo,
    users: Vec<UserOutput>,
    tokens: Vec<TokenOutput>,
}

fn counts(store: &impl Store) -> anyhow::Result<ServerInfo> {
    Ok(ServerInfo {
        users: store.count_rows(Table::Users)?,
        tokens: store.count_rows(Table::Tokens)?,
        sites: store.count_rows(Table::Sites)?,
        courses: store.count_rows(Table::Courses)?,
        sections: store.count_rows(Table::Sections)?,
        activities: store.count_rows(Table::Activities)?,
    })
}

pub fn run_info(data_dir: String, json: bool) -> anyhow::Result<()> {
    let store = init_store(&data_dir)?;
    let info = counts(&store)?;

    if json {
        let mut users = Vec::new();
        for user in store.list_users("", 10_000)? {
            users.push(UserOutput {
                courses: store.list_courses(&user.id)?.len(),
                sites: store.list_sites(&user.id)?.len(),
                id: user.id,
                email: user.email,
                display_name: user.display_name,
                created_at: user.created_at.to_rfc3339(),
            });
        }

        let tokens = list_tokens(&store)?
            .into_iter()
            .map(|d| TokenOutput {
                id: d.token.id,
                lookup: d.token.token_lookup,
                user_id: d.token.user_id,
                email: d.email,
                is_admin: d.token.is_admin,
                created_at: d.token.created_at.to_rfc3339(),
                expires_at: d.token.expires_at.map(|dt| dt.to_rfc3339()),
            })
            .collect();

        let detailed = DetailedServerInfo {
            counts: info,
            users,
            tokens,
        };
        println!("{}", serde_json::to_string_pretty(&detailed)?);
    } else {
        println!();
        println!("Coursewright Server Status");
        println!("{}", "─".repeat(26));
        println!("Users:       {}", info.users);
        println!("Tokens:      {}", info.tokens);
        println!("Sites:       {}", info.sites);
        println!("Courses:     {}", info.courses);
        println!("Sections:    {}", info.sections);
        println!("Activities:  {}", info.activities);
        println!();
    }

    Ok(())
}

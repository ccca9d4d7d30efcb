use chrono::{Duration, Utc};
use serde::Serialize;

use crate::auth::{TOKEN_PREFIX, TokenGenerator};
use crate::store::Store;

use super::init_store;
use super::pickers::{
    TokenDisplay, confirm_action, get_or_pick_user, list_tokens, pick_expiration, pick_token,
    resolve_token_email,
};

#[derive(Serialize)]
struct TokenOutput {
    id: String,
    lookup: String,
    user_id: Option<String>,
    email: Option<String>,
    is_admin: bool,
    created_at: String,
    expires_at: Option<String>,
    last_used_at: Option<String>,
}

impl From<&TokenDisplay> for TokenOutput {
    fn from(display: &TokenDisplay) -> Self {
        Self {
            id: display.token.id.clone(),
            lookup: display.token.token_lookup.clone(),
            user_id: display.token.user_id.clone(),
            email: display.email.clone(),
            is_admin: display.token.is_admin,
            created_at: display.token.created_at.to_rfc3339(),
            expires_at: display.token.expires_at.map(|dt| dt.to_rfc3339()),
            last_used_at: display.token.last_used_at.map(|dt| dt.to_rfc3339()),
        }
    }
}

fn print_tokens(store: &impl Store, json: bool) -> anyhow::Result<()> {
    let tokens = list_tokens(store)?;
    if json {
        let output: Vec<TokenOutput> = tokens.iter().map(TokenOutput::from).collect();
        println!("{}", serde_json::to_string_pretty(&output)?);
        return Ok(());
    }

    if tokens.is_empty() {
        println!("No tokens found.");
        return Ok(());
    }
    println!();
    for token in &tokens {
        println!("  {token}");
    }
    println!();
    Ok(())
}

pub fn run_token_create(
    data_dir: String,
    user_id: Option<String>,
    expires_days: Option<i64>,
    non_interactive: bool,
    list: bool,
    json: bool,
) -> anyhow::Result<()> {
    let store = init_store(&data_dir)?;

    if list {
        return print_tokens(&store, json);
    }

    let Some(user) = get_or_pick_user(&store, user_id, non_interactive)? else {
        return Ok(());
    };

    let expires_in = if let Some(days) = expires_days {
        (days > 0).then(|| Duration::days(days))
    } else if non_interactive {
        None
    } else {
        match pick_expiration()? {
            Some(exp) => exp,
            None => {
                println!("Cancelled.");
                return Ok(());
            }
        }
    };

    let issued = TokenGenerator::new().issue(
        &store,
        false,
        Some(&user.id),
        expires_in.map(|d| Utc::now() + d),
    )?;

    println!();
    println!("Token created for '{}': {}", user.email, issued.raw);
    println!("  Save this now - it cannot be retrieved later.");
    println!();

    Ok(())
}

pub fn run_token_revoke(
    data_dir: String,
    token_id: Option<String>,
    non_interactive: bool,
    list: bool,
    json: bool,
    yes: bool,
) -> anyhow::Result<()> {
    let store = init_store(&data_dir)?;

    if list {
        return print_tokens(&store, json);
    }

    let token = if let Some(id) = token_id {
        store
            .get_token_by_id(&id)?
            .ok_or_else(|| anyhow::anyhow!("Token not found: {id}"))?
    } else if non_interactive {
        anyhow::bail!("--token-id is required in non-interactive mode");
    } else {
        match pick_token(&store)? {
            Some(token) => token,
            None => return Ok(()),
        }
    };

    let owner = resolve_token_email(&store, &token)?;
    let owner = owner.as_deref().unwrap_or("admin");

    let confirmed = confirm_action(
        &format!(
            "Revoke token {TOKEN_PREFIX}_{}... for '{}'?",
            &token.token_lookup, owner
        ),
        yes,
        non_interactive,
    )?;

    if !confirmed {
        println!("Cancelled.");
        return Ok(());
    }

    store.delete_token(&token.id)?;

    println!();
    println!("Token revoked.");
    println!();

    Ok(())
}

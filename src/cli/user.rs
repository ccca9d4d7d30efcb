use chrono::Utc;
use inquire::{Confirm, Text};
use uuid::Uuid;

use crate::auth::TokenGenerator;
use crate::authoring::courses::delete_user_account;
use crate::server::validation::validate_email;
use crate::store::Store;
use crate::types::User;

use super::init_store;
use super::pickers::{confirm_action, get_or_pick_user, pick_expiration};

fn check_email(email: &str) -> anyhow::Result<()> {
    validate_email(email).map_err(|e| anyhow::anyhow!(e.message))
}

pub fn run_user_add(
    data_dir: String,
    email: Option<String>,
    display_name: Option<String>,
    create_token_flag: bool,
    non_interactive: bool,
) -> anyhow::Result<()> {
    let store = init_store(&data_dir)?;

    let email = if let Some(email) = email {
        email
    } else if non_interactive {
        anyhow::bail!("--email is required in non-interactive mode");
    } else {
        Text::new("Email:")
            .with_validator(|input: &str| {
                Ok(match validate_email(&input.trim().to_lowercase()) {
                    Ok(()) => inquire::validator::Validation::Valid,
                    Err(e) => inquire::validator::Validation::Invalid(e.message.into()),
                })
            })
            .prompt()?
    };
    let email = email.trim().to_lowercase();
    check_email(&email)?;

    if store.get_user_by_email(&email)?.is_some() {
        anyhow::bail!("User '{}' already exists", email);
    }

    let now = Utc::now();
    let user = User {
        id: Uuid::new_v4().to_string(),
        email: email.clone(),
        display_name: display_name
            .map(|n| n.trim().to_string())
            .filter(|n| !n.is_empty()),
        created_at: now,
        updated_at: now,
    };
    store.create_user(&user)?;

    println!();
    println!("Created user \"{}\" ({})", email, user.id);

    let should_create_token = if create_token_flag {
        true
    } else if non_interactive {
        false
    } else {
        Confirm::new("Create access token?")
            .with_default(true)
            .prompt()?
    };

    if should_create_token {
        let expires_in = if non_interactive {
            None
        } else {
            match pick_expiration()? {
                Some(exp) => exp,
                None => {
                    println!("Token creation cancelled.");
                    return Ok(());
                }
            }
        };

        let issued = TokenGenerator::new().issue(
            &store,
            false,
            Some(&user.id),
            expires_in.map(|d| now + d),
        )?;

        println!();
        println!("Token created: {}", issued.raw);
        println!("  Save this now - it cannot be retrieved later.");
    }

    println!();

    Ok(())
}

pub fn run_user_remove(
    data_dir: String,
    user_id: Option<String>,
    non_interactive: bool,
    yes: bool,
) -> anyhow::Result<()> {
    let store = init_store(&data_dir)?;

    let Some(user) = get_or_pick_user(&store, user_id, non_interactive)? else {
        return Ok(());
    };

    let confirmed = confirm_action(
        &format!(
            "Delete user '{}'? This will also delete their courses, sites, and tokens.",
            user.email
        ),
        yes,
        non_interactive,
    )?;

    if !confirmed {
        println!("Cancelled.");
        return Ok(());
    }

    delete_user_account(&store, &user.id)?;

    println!();
    println!("Deleted user '{}'", user.email);
    println!();

    Ok(())
}

use std::fmt;

use chrono::{DateTime, Duration, Utc};
use inquire::{InquireError, Select};

use crate::auth::TOKEN_PREFIX;
use crate::store::Store;
use crate::types::{Token, User};

/// Pages through store listings in admin commands.
const LIST_LIMIT: i32 = 10_000;

pub struct UserDisplay {
    pub user: User,
}

impl fmt::Display for UserDisplay {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let short_id = self.user.id.get(..8).unwrap_or(&self.user.id);
        match &self.user.display_name {
            Some(name) => write!(f, "{} <{}> ({short_id}...)", name, self.user.email),
            None => write!(f, "{} ({short_id}...)", self.user.email),
        }
    }
}

/// Token with resolved owner email for display
pub struct TokenDisplay {
    pub token: Token,
    pub email: Option<String>,
}

impl fmt::Display for TokenDisplay {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let owner = self.email.as_deref().unwrap_or("admin");
        let created = format_relative_time(&self.token.created_at);
        let last_used = match &self.token.last_used_at {
            Some(dt) => format_relative_time(dt),
            None => "never used".to_string(),
        };
        write!(
            f,
            "{TOKEN_PREFIX}_{}...  {}  created {}  {}",
            &self.token.token_lookup, owner, created, last_used
        )
    }
}

#[derive(Clone)]
pub struct ExpirationOption {
    pub label: &'static str,
    pub days: Option<i64>,
}

impl fmt::Display for ExpirationOption {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label)
    }
}

/// Format a datetime as relative time (e.g., "2 days ago")
#[must_use]
pub fn format_relative_time(dt: &DateTime<Utc>) -> String {
    let diff = Utc::now().signed_duration_since(*dt);

    if diff.num_seconds() < 0 {
        return "in the future".to_string();
    }
    if diff.num_seconds() < 60 {
        return "just now".to_string();
    }

    let (count, unit) = if diff.num_minutes() < 60 {
        (diff.num_minutes(), "minute")
    } else if diff.num_hours() < 24 {
        (diff.num_hours(), "hour")
    } else if diff.num_days() < 30 {
        (diff.num_days(), "day")
    } else if diff.num_days() < 365 {
        (diff.num_days() / 30, "month")
    } else {
        (diff.num_days() / 365, "year")
    };

    if count == 1 {
        format!("1 {unit} ago")
    } else {
        format!("{count} {unit}s ago")
    }
}

pub fn list_users(store: &impl Store) -> anyhow::Result<Vec<UserDisplay>> {
    Ok(store
        .list_users("", LIST_LIMIT)?
        .into_iter()
        .map(|user| UserDisplay { user })
        .collect())
}

pub fn list_tokens(store: &impl Store) -> anyhow::Result<Vec<TokenDisplay>> {
    let tokens = store.list_tokens("", LIST_LIMIT)?;
    let mut result = Vec::with_capacity(tokens.len());
    for token in tokens {
        let email = resolve_token_email(store, &token)?;
        result.push(TokenDisplay { token, email });
    }
    Ok(result)
}

/// Resolve the owner email of a token; admin tokens have none.
pub fn resolve_token_email(store: &impl Store, token: &Token) -> anyhow::Result<Option<String>> {
    match &token.user_id {
        Some(uid) => Ok(store.get_user(uid)?.map(|u| u.email)),
        None => Ok(None),
    }
}

fn prompt_select<T: fmt::Display>(message: &str, options: Vec<T>) -> anyhow::Result<Option<T>> {
    match Select::new(message, options)
        .with_page_size(10)
        .with_vim_mode(true)
        .prompt()
    {
        Ok(choice) => Ok(Some(choice)),
        Err(InquireError::OperationCanceled | InquireError::OperationInterrupted) => Ok(None),
        Err(e) => Err(e.into()),
    }
}

pub fn pick_user(store: &impl Store) -> anyhow::Result<Option<User>> {
    let users = list_users(store)?;
    if users.is_empty() {
        anyhow::bail!("No users found. Add one with 'coursewright admin user add'.");
    }
    Ok(prompt_select("Select user:", users)?.map(|d| d.user))
}

pub fn pick_token(store: &impl Store) -> anyhow::Result<Option<Token>> {
    let tokens = list_tokens(store)?;
    if tokens.is_empty() {
        anyhow::bail!("No tokens found.");
    }
    Ok(prompt_select("Select token:", tokens)?.map(|d| d.token))
}

/// Pick token expiration. The outer `None` means the prompt was cancelled.
pub fn pick_expiration() -> anyhow::Result<Option<Option<Duration>>> {
    let options = vec![
        ExpirationOption {
            label: "30 days",
            days: Some(30),
        },
        ExpirationOption {
            label: "90 days",
            days: Some(90),
        },
        ExpirationOption {
            label: "1 year",
            days: Some(365),
        },
        ExpirationOption {
            label: "Never",
            days: None,
        },
    ];

    Ok(prompt_select("Token expiration:", options)?.map(|opt| opt.days.map(Duration::days)))
}

/// Get a user by ID or interactively pick one
pub fn get_or_pick_user(
    store: &impl Store,
    user_id: Option<String>,
    non_interactive: bool,
) -> anyhow::Result<Option<User>> {
    if let Some(id) = user_id {
        let user = store
            .get_user(&id)?
            .ok_or_else(|| anyhow::anyhow!("User not found: {id}"))?;
        Ok(Some(user))
    } else if non_interactive {
        anyhow::bail!("--user-id is required in non-interactive mode");
    } else {
        pick_user(store)
    }
}

/// Request confirmation for a destructive operation
pub fn confirm_action(message: &str, yes: bool, non_interactive: bool) -> anyhow::Result<bool> {
    if yes {
        Ok(true)
    } else if non_interactive {
        anyhow::bail!("--yes is required for destructive operations in non-interactive mode");
    } else {
        Ok(inquire::Confirm::new(message)
            .with_default(false)
            .prompt()?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_relative_time() {
        let now = Utc::now();
        assert_eq!(format_relative_time(&now), "just now");
        assert_eq!(
            format_relative_time(&(now - Duration::minutes(1))),
            "1 minute ago"
        );
        assert_eq!(
            format_relative_time(&(now - Duration::hours(5))),
            "5 hours ago"
        );
        assert_eq!(
            format_relative_time(&(now - Duration::days(400))),
            "1 year ago"
        );
        assert_eq!(
            format_relative_time(&(now + Duration::days(1))),
            "in the future"
        );
    }

    #[test]
    fn test_confirm_action_flags() {
        assert!(confirm_action("Delete?", true, true).unwrap());
        assert!(confirm_action("Delete?", false, true).is_err());
    }
}

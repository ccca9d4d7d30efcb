use inquire::Text;

use super::credentials::{Credentials, delete_credentials, save_credentials};
use super::http_client::ApiClient;
use crate::auth::TOKEN_PREFIX;
use crate::types::User;

fn normalize_server_url(url: &str) -> String {
    let url = url.trim().trim_end_matches('/');

    // Strip trailing API paths to avoid duplication when constructing request URLs
    let url = url
        .trim_end_matches("/api/v1")
        .trim_end_matches("/api")
        .trim_end_matches('/');

    if url.starts_with("http://") || url.starts_with("https://") {
        return url.to_string();
    }

    if url.starts_with("localhost") || url.starts_with("127.0.0.1") {
        format!("http://{url}")
    } else {
        format!("https://{url}")
    }
}

pub fn run_auth_login(
    server: Option<String>,
    token: Option<String>,
    non_interactive: bool,
) -> anyhow::Result<()> {
    let server = if let Some(s) = server {
        if s.trim().is_empty() {
            anyhow::bail!("Server URL cannot be empty");
        }
        s
    } else if non_interactive {
        anyhow::bail!("--server is required in non-interactive mode");
    } else {
        Text::new("Server URL:")
            .with_validator(|input: &str| {
                if input.trim().is_empty() {
                    Ok(inquire::validator::Validation::Invalid(
                        "Server URL is required".into(),
                    ))
                } else {
                    Ok(inquire::validator::Validation::Valid)
                }
            })
            .prompt()?
    };

    let server_url = normalize_server_url(&server);

    let token = if let Some(t) = token {
        t
    } else if non_interactive {
        anyhow::bail!("--token is required in non-interactive mode");
    } else {
        Text::new("Token:")
            .with_placeholder(&format!("{TOKEN_PREFIX}_..."))
            .prompt()?
    };

    if !token.starts_with(&format!("{TOKEN_PREFIX}_")) {
        anyhow::bail!("Invalid token format. Token should start with '{TOKEN_PREFIX}_'");
    }

    let creds = Credentials {
        server_url: server_url.clone(),
        token,
    };

    let client = ApiClient::new(&creds)?;
    let me: User = client.get("/me")?;

    save_credentials(&creds)?;

    println!();
    println!("Logged in to {} as {}", server_url, me.email);
    println!();

    Ok(())
}

pub fn run_auth_logout() -> anyhow::Result<()> {
    println!();
    if delete_credentials()? {
        println!("Logged out successfully.");
    } else {
        println!("No credentials found.");
    }
    println!();
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_server_url() {
        assert_eq!(normalize_server_url("localhost:8080"), "http://localhost:8080");
        assert_eq!(
            normalize_server_url("courses.example.com/api/v1/"),
            "https://courses.example.com"
        );
        assert_eq!(
            normalize_server_url("http://127.0.0.1:3000"),
            "http://127.0.0.1:3000"
        );
    }
}

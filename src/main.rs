use std::fs;
use std::sync::Arc;

use anyhow::bail;
use clap::{Parser, Subcommand};
use tracing::info;
use tracing_subscriber::EnvFilter;

use coursewright::auth::TokenGenerator;
use coursewright::cli::{
    self, ActivityCommands, AdminCommands, AuthCommands, CourseCommands, SectionCommands,
    SiteCommands, TokenCommands, UserCommands,
};
use coursewright::config::ServerConfig;
use coursewright::server::{AppState, create_router};
use coursewright::store::{SqliteStore, Store};

#[cfg(unix)]
fn set_restrictive_permissions(path: &std::path::Path) {
    use std::os::unix::fs::PermissionsExt;
    if let Err(e) = fs::set_permissions(path, fs::Permissions::from_mode(0o600)) {
        tracing::warn!("Failed to set permissions on {}: {e}", path.display());
    }
}

#[derive(Parser)]
#[command(name = "coursewright")]
#[command(about = "A course builder server", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Administrative commands (operate on the local database)
    Admin {
        #[command(subcommand)]
        command: AdminCommands,
    },

    /// Log in to or out of a server
    Auth {
        #[command(subcommand)]
        command: AuthCommands,
    },

    /// Manage your courses
    Course {
        #[command(subcommand)]
        command: CourseCommands,
    },

    /// Manage course sections
    Section {
        #[command(subcommand)]
        command: SectionCommands,
    },

    /// Manage section activities
    Activity {
        #[command(subcommand)]
        command: ActivityCommands,
    },

    /// Manage your sites
    Site {
        #[command(subcommand)]
        command: SiteCommands,
    },

    /// Start the server
    Serve {
        /// Host to bind to
        #[arg(long, default_value = "127.0.0.1")]
        host: String,

        /// Port to bind to
        #[arg(long, short, default_value = "8080")]
        port: u16,

        /// Data directory for the database
        #[arg(long, default_value = "./data")]
        data_dir: String,
    },
}

fn run_init(data_dir: String, non_interactive: bool) -> anyhow::Result<()> {
    let config = ServerConfig {
        data_dir: data_dir.into(),
        ..ServerConfig::default()
    };
    fs::create_dir_all(&config.data_dir)?;

    let store = SqliteStore::new(config.db_path())?;
    store.initialize()?;

    let token_file = config.admin_token_path();

    if store.has_admin_token()? {
        bail!(
            "Server already initialized. Admin token exists at: {}",
            token_file.display()
        );
    }

    let issued = TokenGenerator::new().issue(&store, true, None, None)?;
    fs::write(&token_file, &issued.raw)?;

    #[cfg(unix)]
    set_restrictive_permissions(&token_file);

    println!();
    println!("========================================");
    println!("Admin token (save this, it won't be shown again):");
    println!();
    println!("  {}", issued.raw);
    println!();
    println!("Token also written to: {}", token_file.display());
    println!("========================================");
    println!();

    if !non_interactive {
        let add_user = inquire::Confirm::new("Would you like to create a first user?")
            .with_default(false)
            .prompt()?;
        if add_user {
            cli::run_user_add(
                config.data_dir.to_string_lossy().into_owned(),
                None,
                None,
                true,
                false,
            )?;
        }
    }

    Ok(())
}

async fn run_serve(config: ServerConfig) -> anyhow::Result<()> {
    let not_initialized =
        "Server not initialized. Run 'coursewright admin init' first to create the database and admin token.";

    let token_file = config.admin_token_path();
    if !token_file.exists() {
        bail!(not_initialized);
    }

    let store = SqliteStore::new(config.db_path())?;
    store.initialize()?;
    if !store.has_admin_token()? {
        bail!(not_initialized);
    }

    info!("Admin token available at {}", token_file.display());

    let state = Arc::new(AppState::new(Arc::new(store), config.data_dir.clone()));
    let app = create_router(state);
    let addr = config.socket_addr()?;

    info!("Starting server on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;
    Ok(())
}

fn run_admin(command: AdminCommands) -> anyhow::Result<()> {
    match command {
        AdminCommands::Init {
            data_dir,
            non_interactive,
        } => run_init(data_dir, non_interactive),
        AdminCommands::User { command } => match command {
            UserCommands::Add {
                data_dir,
                email,
                display_name,
                create_token,
                non_interactive,
            } => cli::run_user_add(data_dir, email, display_name, create_token, non_interactive),
            UserCommands::Remove {
                data_dir,
                user_id,
                non_interactive,
                yes,
            } => cli::run_user_remove(data_dir, user_id, non_interactive, yes),
        },
        AdminCommands::Token { command } => match command {
            TokenCommands::Create {
                data_dir,
                user_id,
                expires_days,
                non_interactive,
                list,
                json,
            } => cli::run_token_create(data_dir, user_id, expires_days, non_interactive, list, json),
            TokenCommands::Revoke {
                data_dir,
                token_id,
                non_interactive,
                list,
                json,
                yes,
            } => cli::run_token_revoke(data_dir, token_id, non_interactive, list, json, yes),
        },
        AdminCommands::Info { data_dir, json } => cli::run_info(data_dir, json),
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("coursewright=info".parse()?))
        .with_writer(std::io::stderr)
        .init();

    let args = Cli::parse();

    match args.command {
        Commands::Admin { command } => run_admin(command)?,
        // The blocking HTTP client must not run on a runtime worker thread.
        Commands::Auth { command } => tokio::task::spawn_blocking(move || match command {
            AuthCommands::Login {
                server,
                token,
                non_interactive,
            } => cli::run_auth_login(server, token, non_interactive),
            AuthCommands::Logout => cli::run_auth_logout(),
        })
        .await??,
        Commands::Course { command } => tokio::task::spawn_blocking(move || match command {
            CourseCommands::List { json } => cli::run_course_list(json),
            CourseCommands::Create {
                title,
                description,
                image,
                access,
                non_interactive,
            } => cli::run_course_create(title, description, image, access, non_interactive),
            CourseCommands::Show {
                course_id,
                json,
                non_interactive,
            } => cli::run_course_show(course_id, json, non_interactive),
            CourseCommands::Delete {
                course_id,
                non_interactive,
                yes,
            } => cli::run_course_delete(course_id, non_interactive, yes),
        })
        .await??,
        Commands::Section { command } => tokio::task::spawn_blocking(move || match command {
            SectionCommands::Add {
                course_id,
                title,
                description,
            } => cli::run_section_add(course_id, title, description),
            SectionCommands::Delete {
                section_id,
                non_interactive,
                yes,
            } => cli::run_section_delete(section_id, non_interactive, yes),
        })
        .await??,
        Commands::Activity { command } => tokio::task::spawn_blocking(move || match command {
            ActivityCommands::Add {
                section_id,
                title,
                activity_type,
                source,
                url,
                file,
            } => cli::run_activity_add(section_id, title, activity_type, source, url, file),
            ActivityCommands::Delete {
                activity_id,
                non_interactive,
                yes,
            } => cli::run_activity_delete(activity_id, non_interactive, yes),
        })
        .await??,
        Commands::Site { command } => tokio::task::spawn_blocking(move || match command {
            SiteCommands::List { json } => cli::run_site_list(json),
            SiteCommands::Create { name, url, publish } => cli::run_site_create(name, url, publish),
        })
        .await??,
        Commands::Serve {
            host,
            port,
            data_dir,
        } => {
            run_serve(ServerConfig {
                host,
                port,
                data_dir: data_dir.into(),
            })
            .await?;
        }
    }

    Ok(())
}

use clap::Subcommand;

#[derive(Subcommand)]
pub enum AdminCommands {
    /// Initialize the server (create database and admin token)
    Init {
        /// Data directory for the database
        #[arg(long, default_value = "./data")]
        data_dir: String,

        /// Skip interactive prompts
        #[arg(long)]
        non_interactive: bool,
    },

    /// Manage users
    User {
        #[command(subcommand)]
        command: UserCommands,
    },

    /// Manage access tokens
    Token {
        #[command(subcommand)]
        command: TokenCommands,
    },

    /// Show server status information
    Info {
        /// Data directory for the database
        #[arg(long, default_value = "./data")]
        data_dir: String,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
}

#[derive(Subcommand)]
pub enum UserCommands {
    /// Add a new user and optionally a token
    Add {
        /// Data directory for the database
        #[arg(long, default_value = "./data")]
        data_dir: String,

        /// Email address of the new user
        #[arg(long)]
        email: Option<String>,

        /// Name shown on the user's courses
        #[arg(long)]
        display_name: Option<String>,

        /// Create a token for the new user
        #[arg(long)]
        create_token: bool,

        /// Skip interactive prompts (requires --email)
        #[arg(long)]
        non_interactive: bool,
    },

    /// Remove a user along with their courses, sites links and tokens
    Remove {
        /// Data directory for the database
        #[arg(long, default_value = "./data")]
        data_dir: String,

        /// User ID to remove
        #[arg(long)]
        user_id: Option<String>,

        /// Skip interactive prompts (requires --user-id)
        #[arg(long)]
        non_interactive: bool,

        /// Skip confirmation prompt
        #[arg(long, short = 'y')]
        yes: bool,
    },
}

#[derive(Subcommand)]
pub enum TokenCommands {
    /// Create a token for a user
    Create {
        /// Data directory for the database
        #[arg(long, default_value = "./data")]
        data_dir: String,

        /// User ID to create the token for
        #[arg(long)]
        user_id: Option<String>,

        /// Days until the token expires (0 or less never expires)
        #[arg(long)]
        expires_days: Option<i64>,

        /// Skip interactive prompts (requires --user-id)
        #[arg(long)]
        non_interactive: bool,

        /// List existing tokens instead of creating one
        #[arg(long)]
        list: bool,

        /// Output the list as JSON
        #[arg(long)]
        json: bool,
    },

    /// Revoke a token
    Revoke {
        /// Data directory for the database
        #[arg(long, default_value = "./data")]
        data_dir: String,

        /// Token ID to revoke
        #[arg(long)]
        token_id: Option<String>,

        /// Skip interactive prompts (requires --token-id)
        #[arg(long)]
        non_interactive: bool,

        /// List existing tokens instead of revoking one
        #[arg(long)]
        list: bool,

        /// Output the list as JSON
        #[arg(long)]
        json: bool,

        /// Skip confirmation prompt
        #[arg(long, short = 'y')]
        yes: bool,
    },
}

#[derive(Subcommand)]
pub enum AuthCommands {
    /// Configure server URL and authentication token
    Login {
        /// Server URL
        #[arg(long)]
        server: Option<String>,

        /// Authentication token
        #[arg(long)]
        token: Option<String>,

        /// Skip interactive prompts
        #[arg(long)]
        non_interactive: bool,
    },

    /// Clear stored credentials
    Logout,
}

#[derive(Subcommand)]
pub enum CourseCommands {
    /// List your courses, newest first
    List {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Create a course
    Create {
        /// Course title
        #[arg(long)]
        title: Option<String>,

        /// Course description
        #[arg(long)]
        description: Option<String>,

        /// Cover image URL
        #[arg(long)]
        image: Option<String>,

        /// Initial access type; anything but draft publishes the course
        #[arg(long)]
        access: Option<String>,

        /// Skip interactive prompts (requires --title and --description)
        #[arg(long)]
        non_interactive: bool,
    },

    /// Show a course with its sections and activities
    Show {
        /// Course ID
        course_id: Option<String>,

        /// Output as JSON
        #[arg(long)]
        json: bool,

        /// Skip interactive prompts
        #[arg(long)]
        non_interactive: bool,
    },

    /// Delete a course and everything in it
    Delete {
        /// Course ID
        course_id: Option<String>,

        /// Skip interactive prompts
        #[arg(long)]
        non_interactive: bool,

        /// Skip confirmation
        #[arg(long, short = 'y')]
        yes: bool,
    },
}

#[derive(Subcommand)]
pub enum SectionCommands {
    /// Append a section to a course
    Add {
        /// Course ID
        #[arg(long)]
        course_id: String,

        /// Section title
        #[arg(long)]
        title: String,

        /// Section description
        #[arg(long, default_value = "")]
        description: String,
    },

    /// Delete a section and its activities
    Delete {
        /// Section ID
        section_id: String,

        /// Skip interactive prompts
        #[arg(long)]
        non_interactive: bool,

        /// Skip confirmation
        #[arg(long, short = 'y')]
        yes: bool,
    },
}

#[derive(Subcommand)]
pub enum ActivityCommands {
    /// Add an activity to a section
    Add {
        /// Section ID
        #[arg(long)]
        section_id: String,

        /// Activity title
        #[arg(long)]
        title: String,

        /// Activity type (video, pdf, audio, presentation, file)
        #[arg(long = "type")]
        activity_type: Option<String>,

        /// Content source (youtube, vimeo, upload, url, embed)
        #[arg(long)]
        source: String,

        /// Content URL or embed code
        #[arg(long)]
        url: Option<String>,

        /// Local file to register as an upload
        #[arg(long)]
        file: Option<String>,
    },

    /// Delete an activity
    Delete {
        /// Activity ID
        activity_id: String,

        /// Skip interactive prompts
        #[arg(long)]
        non_interactive: bool,

        /// Skip confirmation
        #[arg(long, short = 'y')]
        yes: bool,
    },
}

#[derive(Subcommand)]
pub enum SiteCommands {
    /// List your sites
    List {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Create a site
    Create {
        /// Display name
        #[arg(long)]
        name: String,

        /// Subdomain-style url slug
        #[arg(long)]
        url: String,

        /// Publish the site immediately
        #[arg(long)]
        publish: bool,
    },
}

pub const SCHEMA: &str = r#"
-- Users own sites and courses; tokens are just auth credentials for users
CREATE TABLE IF NOT EXISTS users (
    id TEXT PRIMARY KEY,
    email TEXT NOT NULL UNIQUE,
    display_name TEXT,
    created_at TEXT DEFAULT (datetime('now')),
    updated_at TEXT DEFAULT (datetime('now'))
);

-- Tokens are auth credentials; non-admin tokens must belong to a user
CREATE TABLE IF NOT EXISTS tokens (
    id TEXT PRIMARY KEY,
    token_hash TEXT NOT NULL,          -- argon2id hash with embedded salt
    token_lookup TEXT NOT NULL,        -- 8 char lookup segment of the token
    is_admin INTEGER NOT NULL DEFAULT 0,  -- admin tokens only access /api/v1/admin/* routes

    -- User binding (required for non-admin tokens, NULL only for admin tokens)
    user_id TEXT REFERENCES users(id) ON DELETE CASCADE,

    -- Lifecycle
    created_at TEXT DEFAULT (datetime('now')),
    expires_at TEXT,            -- NULL = never
    last_used_at TEXT
);

-- Marketing sites that can display courses
CREATE TABLE IF NOT EXISTS sites (
    id TEXT PRIMARY KEY,
    user_id TEXT NOT NULL REFERENCES users(id) ON DELETE CASCADE,
    name TEXT NOT NULL,
    url TEXT NOT NULL UNIQUE,
    status TEXT NOT NULL DEFAULT 'draft',
    created_at TEXT DEFAULT (datetime('now')),
    updated_at TEXT DEFAULT (datetime('now'))
);

-- Courses. Child rows are removed by explicit sequential deletes, so the
-- foreign keys below carry no ON DELETE action.
CREATE TABLE IF NOT EXISTS courses (
    id TEXT PRIMARY KEY,
    user_id TEXT NOT NULL REFERENCES users(id) ON DELETE CASCADE,
    title TEXT NOT NULL,
    description TEXT NOT NULL DEFAULT '',
    status TEXT NOT NULL DEFAULT 'draft',
    created_at TEXT DEFAULT (datetime('now')),
    updated_at TEXT DEFAULT (datetime('now'))
);

CREATE TABLE IF NOT EXISTS course_sections (
    id TEXT PRIMARY KEY,
    course_id TEXT NOT NULL,
    title TEXT NOT NULL,
    description TEXT NOT NULL DEFAULT '',
    order_index INTEGER NOT NULL,     -- append index at creation, never rebalanced
    created_at TEXT DEFAULT (datetime('now'))
);

CREATE TABLE IF NOT EXISTS course_activities (
    id TEXT PRIMARY KEY,
    course_id TEXT NOT NULL,
    section_id TEXT NOT NULL,
    title TEXT NOT NULL,
    activity_type TEXT NOT NULL,
    source TEXT NOT NULL,
    url TEXT,
    file_url TEXT,                    -- placeholder for uploads, binaries are not stored
    created_at TEXT DEFAULT (datetime('now'))
);

-- One row per course, upserted by course_id
CREATE TABLE IF NOT EXISTS course_settings (
    course_id TEXT PRIMARY KEY,
    course_image TEXT,
    course_label TEXT NOT NULL DEFAULT '',
    what_you_learn TEXT NOT NULL DEFAULT '',
    instructor_name TEXT NOT NULL DEFAULT '',
    instructor_title TEXT NOT NULL DEFAULT '',
    instructor_bio TEXT NOT NULL DEFAULT '',
    show_course_includes INTEGER NOT NULL DEFAULT 1,
    show_what_you_learn INTEGER NOT NULL DEFAULT 1,
    show_instructor INTEGER NOT NULL DEFAULT 1,
    updated_at TEXT DEFAULT (datetime('now'))
);

-- Sites displaying a course (replaces a comma-joined id list)
CREATE TABLE IF NOT EXISTS course_websites (
    course_id TEXT NOT NULL,
    site_id TEXT NOT NULL REFERENCES sites(id) ON DELETE CASCADE,
    position INTEGER NOT NULL,
    PRIMARY KEY (course_id, site_id)
);

CREATE TABLE IF NOT EXISTS course_access (
    course_id TEXT PRIMARY KEY,
    access_type TEXT NOT NULL DEFAULT 'free',
    navigation_type TEXT NOT NULL DEFAULT 'global',
    updated_at TEXT DEFAULT (datetime('now'))
);

-- Amounts in minor units
CREATE TABLE IF NOT EXISTS course_pricing (
    course_id TEXT PRIMARY KEY,
    price INTEGER NOT NULL DEFAULT 0,
    compare_at_price INTEGER NOT NULL DEFAULT 0,
    show_compare_at_price INTEGER NOT NULL DEFAULT 0,
    updated_at TEXT DEFAULT (datetime('now'))
);

-- Create indexes
CREATE UNIQUE INDEX IF NOT EXISTS idx_tokens_lookup ON tokens(token_lookup);
CREATE INDEX IF NOT EXISTS idx_tokens_user ON tokens(user_id);
CREATE INDEX IF NOT EXISTS idx_sites_user ON sites(user_id);
CREATE INDEX IF NOT EXISTS idx_courses_user ON courses(user_id);
CREATE INDEX IF NOT EXISTS idx_sections_course ON course_sections(course_id);
CREATE INDEX IF NOT EXISTS idx_activities_section ON course_activities(section_id);
CREATE INDEX IF NOT EXISTS idx_activities_course ON course_activities(course_id);
CREATE INDEX IF NOT EXISTS idx_course_websites_site ON course_websites(site_id);
"#;

use std::path::Path;
use std::str::FromStr;
use std::sync::Mutex;

use chrono::{DateTime, Utc};
use rusqlite::{Connection, OptionalExtension, Row, params};

use super::schema::SCHEMA;
use super::{Store, Table};
use crate::error::{Error, Result};
use crate::types::*;

pub struct SqliteStore {
    conn: Mutex<Connection>,
}

impl SqliteStore {
    pub fn new<P: AsRef<Path>>(db_path: P) -> Result<Self> {
        let conn = Connection::open(db_path)?;

        conn.pragma_update(None, "foreign_keys", "ON")?;
        conn.pragma_update(None, "journal_mode", "WAL")?;

        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    /// Opens a private in-memory database, mostly useful in tests.
    pub fn in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        conn.pragma_update(None, "foreign_keys", "ON")?;

        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    fn conn(&self) -> std::sync::MutexGuard<'_, Connection> {
        self.conn.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Returns a guard to the underlying database connection.
    /// This allows consuming applications to execute custom SQL.
    pub fn connection(&self) -> std::sync::MutexGuard<'_, Connection> {
        self.conn()
    }
}

fn parse_datetime(s: &str) -> DateTime<Utc> {
    DateTime::parse_from_rfc3339(s)
        .map(|dt| dt.with_timezone(&Utc))
        .or_else(|_| {
            // Handle SQLite's default datetime format: "YYYY-MM-DD HH:MM:SS"
            chrono::NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S").map(|ndt| ndt.and_utc())
        })
        .unwrap_or_else(|e| {
            tracing::error!("Invalid datetime in database: '{}' - {}", s, e);
            Utc::now()
        })
}

fn format_datetime(dt: &DateTime<Utc>) -> String {
    dt.to_rfc3339()
}

fn parse_enum<T: FromStr<Err = String>>(idx: usize, value: String) -> rusqlite::Result<T> {
    value.parse().map_err(|e: String| {
        rusqlite::Error::FromSqlConversionFailure(idx, rusqlite::types::Type::Text, e.into())
    })
}

const USER_COLUMNS: &str = "id, email, display_name, created_at, updated_at";

fn user_from_row(row: &Row<'_>) -> rusqlite::Result<User> {
    Ok(User {
        id: row.get(0)?,
        email: row.get(1)?,
        display_name: row.get(2)?,
        created_at: parse_datetime(&row.get::<_, String>(3)?),
        updated_at: parse_datetime(&row.get::<_, String>(4)?),
    })
}

const TOKEN_COLUMNS: &str =
    "id, token_hash, token_lookup, is_admin, user_id, created_at, expires_at, last_used_at";

fn token_from_row(row: &Row<'_>) -> rusqlite::Result<Token> {
    Ok(Token {
        id: row.get(0)?,
        token_hash: row.get(1)?,
        token_lookup: row.get(2)?,
        is_admin: row.get(3)?,
        user_id: row.get(4)?,
        created_at: parse_datetime(&row.get::<_, String>(5)?),
        expires_at: row.get::<_, Option<String>>(6)?.map(|s| parse_datetime(&s)),
        last_used_at: row.get::<_, Option<String>>(7)?.map(|s| parse_datetime(&s)),
    })
}

const SITE_COLUMNS: &str = "id, user_id, name, url, status, created_at, updated_at";

fn site_from_row(row: &Row<'_>) -> rusqlite::Result<Site> {
    Ok(Site {
        id: row.get(0)?,
        user_id: row.get(1)?,
        name: row.get(2)?,
        url: row.get(3)?,
        status: parse_enum(4, row.get(4)?)?,
        created_at: parse_datetime(&row.get::<_, String>(5)?),
        updated_at: parse_datetime(&row.get::<_, String>(6)?),
    })
}

const COURSE_COLUMNS: &str = "id, user_id, title, description, status, created_at, updated_at";

fn course_from_row(row: &Row<'_>) -> rusqlite::Result<Course> {
    Ok(Course {
        id: row.get(0)?,
        user_id: row.get(1)?,
        title: row.get(2)?,
        description: row.get(3)?,
        status: parse_enum(4, row.get(4)?)?,
        created_at: parse_datetime(&row.get::<_, String>(5)?),
        updated_at: parse_datetime(&row.get::<_, String>(6)?),
    })
}

const SECTION_COLUMNS: &str = "id, course_id, title, description, order_index, created_at";

fn section_from_row(row: &Row<'_>) -> rusqlite::Result<Section> {
    Ok(Section {
        id: row.get(0)?,
        course_id: row.get(1)?,
        title: row.get(2)?,
        description: row.get(3)?,
        order_index: row.get(4)?,
        created_at: parse_datetime(&row.get::<_, String>(5)?),
    })
}

const ACTIVITY_COLUMNS: &str =
    "id, course_id, section_id, title, activity_type, source, url, file_url, created_at";

fn activity_from_row(row: &Row<'_>) -> rusqlite::Result<Activity> {
    Ok(Activity {
        id: row.get(0)?,
        course_id: row.get(1)?,
        section_id: row.get(2)?,
        title: row.get(3)?,
        activity_type: parse_enum(4, row.get(4)?)?,
        source: parse_enum(5, row.get(5)?)?,
        url: row.get(6)?,
        file_url: row.get(7)?,
        created_at: parse_datetime(&row.get::<_, String>(8)?),
    })
}

impl Store for SqliteStore {
    fn initialize(&self) -> Result<()> {
        self.conn().execute_batch(SCHEMA)?;
        Ok(())
    }

    // User operations

    fn create_user(&self, user: &User) -> Result<()> {
        let result = self.conn().execute(
            "INSERT INTO users (id, email, display_name, created_at, updated_at)
             VALUES (?1, ?2, ?3, ?4, ?5)",
            params![
                user.id,
                user.email,
                user.display_name,
                format_datetime(&user.created_at),
                format_datetime(&user.updated_at),
            ],
        );

        match result {
            Ok(_) => Ok(()),
            Err(rusqlite::Error::SqliteFailure(err, _))
                if err.code == rusqlite::ErrorCode::ConstraintViolation =>
            {
                Err(Error::AlreadyExists)
            }
            Err(e) => Err(Error::from(e)),
        }
    }

    fn get_user(&self, id: &str) -> Result<Option<User>> {
        let conn = self.conn();
        conn.query_row(
            &format!("SELECT {USER_COLUMNS} FROM users WHERE id = ?1"),
            params![id],
            user_from_row,
        )
        .optional()
        .map_err(Error::from)
    }

    fn get_user_by_email(&self, email: &str) -> Result<Option<User>> {
        let conn = self.conn();
        conn.query_row(
            &format!("SELECT {USER_COLUMNS} FROM users WHERE email = ?1"),
            params![email],
            user_from_row,
        )
        .optional()
        .map_err(Error::from)
    }

    fn list_users(&self, cursor: &str, limit: i32) -> Result<Vec<User>> {
        let conn = self.conn();
        let mut stmt = conn.prepare(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE id > ?1 ORDER BY id LIMIT ?2"
        ))?;

        let rows = stmt.query_map(params![cursor, limit], user_from_row)?;

        rows.collect::<std::result::Result<Vec<_>, _>>()
            .map_err(Error::from)
    }

    fn delete_user(&self, id: &str) -> Result<bool> {
        let rows = self
            .conn()
            .execute("DELETE FROM users WHERE id = ?1", params![id])?;
        Ok(rows > 0)
    }

    // Token operations

    fn create_token(&self, token: &Token) -> Result<()> {
        let result = self.conn().execute(
            "INSERT INTO tokens (id, token_hash, token_lookup, is_admin, user_id, created_at, expires_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
            params![
                token.id,
                token.token_hash,
                token.token_lookup,
                token.is_admin,
                token.user_id,
                format_datetime(&token.created_at),
                token.expires_at.as_ref().map(format_datetime),
            ],
        );

        match result {
            Ok(_) => Ok(()),
            Err(rusqlite::Error::SqliteFailure(err, _))
                if err.code == rusqlite::ErrorCode::ConstraintViolation =>
            {
                Err(Error::TokenLookupCollision)
            }
            Err(e) => Err(Error::from(e)),
        }
    }

    fn get_token_by_id(&self, id: &str) -> Result<Option<Token>> {
        let conn = self.conn();
        conn.query_row(
            &format!("SELECT {TOKEN_COLUMNS} FROM tokens WHERE id = ?1"),
            params![id],
            token_from_row,
        )
        .optional()
        .map_err(Error::from)
    }

    fn get_token_by_lookup(&self, lookup: &str) -> Result<Option<Token>> {
        let conn = self.conn();
        conn.query_row(
            &format!("SELECT {TOKEN_COLUMNS} FROM tokens WHERE token_lookup = ?1"),
            params![lookup],
            token_from_row,
        )
        .optional()
        .map_err(Error::from)
    }

    fn list_tokens(&self, cursor: &str, limit: i32) -> Result<Vec<Token>> {
        let conn = self.conn();
        let mut stmt = conn.prepare(&format!(
            "SELECT {TOKEN_COLUMNS} FROM tokens WHERE id > ?1 ORDER BY id LIMIT ?2"
        ))?;

        let rows = stmt.query_map(params![cursor, limit], token_from_row)?;

        rows.collect::<std::result::Result<Vec<_>, _>>()
            .map_err(Error::from)
    }

    fn list_user_tokens(&self, user_id: &str) -> Result<Vec<Token>> {
        let conn = self.conn();
        let mut stmt = conn.prepare(&format!(
            "SELECT {TOKEN_COLUMNS} FROM tokens WHERE user_id = ?1 ORDER BY created_at"
        ))?;

        let rows = stmt.query_map(params![user_id], token_from_row)?;

        rows.collect::<std::result::Result<Vec<_>, _>>()
            .map_err(Error::from)
    }

    fn delete_token(&self, id: &str) -> Result<bool> {
        let rows = self
            .conn()
            .execute("DELETE FROM tokens WHERE id = ?1", params![id])?;
        Ok(rows > 0)
    }

    fn update_token_last_used(&self, id: &str) -> Result<()> {
        self.conn().execute(
            "UPDATE tokens SET last_used_at = ?1 WHERE id = ?2",
            params![format_datetime(&Utc::now()), id],
        )?;
        Ok(())
    }

    // Site operations

    fn create_site(&self, site: &Site) -> Result<()> {
        let result = self.conn().execute(
            "INSERT INTO sites (id, user_id, name, url, status, created_at, updated_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
            params![
                site.id,
                site.user_id,
                site.name,
                site.url,
                site.status.as_str(),
                format_datetime(&site.created_at),
                format_datetime(&site.updated_at),
            ],
        );

        match result {
            Ok(_) => Ok(()),
            Err(rusqlite::Error::SqliteFailure(err, _))
                if err.code == rusqlite::ErrorCode::ConstraintViolation =>
            {
                Err(Error::AlreadyExists)
            }
            Err(e) => Err(Error::from(e)),
        }
    }

    fn get_site(&self, id: &str) -> Result<Option<Site>> {
        let conn = self.conn();
        conn.query_row(
            &format!("SELECT {SITE_COLUMNS} FROM sites WHERE id = ?1"),
            params![id],
            site_from_row,
        )
        .optional()
        .map_err(Error::from)
    }

    fn get_site_by_url(&self, url: &str) -> Result<Option<Site>> {
        let conn = self.conn();
        conn.query_row(
            &format!("SELECT {SITE_COLUMNS} FROM sites WHERE url = ?1"),
            params![url],
            site_from_row,
        )
        .optional()
        .map_err(Error::from)
    }

    fn list_sites(&self, user_id: &str) -> Result<Vec<Site>> {
        let conn = self.conn();
        let mut stmt = conn.prepare(&format!(
            "SELECT {SITE_COLUMNS} FROM sites WHERE user_id = ?1 ORDER BY name"
        ))?;

        let rows = stmt.query_map(params![user_id], site_from_row)?;

        rows.collect::<std::result::Result<Vec<_>, _>>()
            .map_err(Error::from)
    }

    fn update_site(&self, site: &Site) -> Result<()> {
        let rows = self.conn().execute(
            "UPDATE sites SET name = ?1, url = ?2, status = ?3, updated_at = ?4 WHERE id = ?5",
            params![
                site.name,
                site.url,
                site.status.as_str(),
                format_datetime(&site.updated_at),
                site.id
            ],
        )?;

        if rows == 0 {
            return Err(Error::NotFound);
        }
        Ok(())
    }

    fn delete_site(&self, id: &str) -> Result<bool> {
        let rows = self
            .conn()
            .execute("DELETE FROM sites WHERE id = ?1", params![id])?;
        Ok(rows > 0)
    }

    // Course operations

    fn create_course(&self, course: &Course) -> Result<()> {
        self.conn().execute(
            "INSERT INTO courses (id, user_id, title, description, status, created_at, updated_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
            params![
                course.id,
                course.user_id,
                course.title,
                course.description,
                course.status.as_str(),
                format_datetime(&course.created_at),
                format_datetime(&course.updated_at),
            ],
        )?;
        Ok(())
    }

    fn get_course(&self, id: &str) -> Result<Option<Course>> {
        let conn = self.conn();
        conn.query_row(
            &format!("SELECT {COURSE_COLUMNS} FROM courses WHERE id = ?1"),
            params![id],
            course_from_row,
        )
        .optional()
        .map_err(Error::from)
    }

    fn get_course_by_title(&self, user_id: &str, title: &str) -> Result<Option<Course>> {
        let conn = self.conn();
        conn.query_row(
            &format!(
                "SELECT {COURSE_COLUMNS} FROM courses WHERE user_id = ?1 AND title = ?2 LIMIT 1"
            ),
            params![user_id, title],
            course_from_row,
        )
        .optional()
        .map_err(Error::from)
    }

    fn list_courses(&self, user_id: &str) -> Result<Vec<Course>> {
        let conn = self.conn();
        let mut stmt = conn.prepare(&format!(
            "SELECT {COURSE_COLUMNS} FROM courses WHERE user_id = ?1
             ORDER BY created_at DESC, rowid DESC"
        ))?;

        let rows = stmt.query_map(params![user_id], course_from_row)?;

        rows.collect::<std::result::Result<Vec<_>, _>>()
            .map_err(Error::from)
    }

    fn update_course(&self, course: &Course) -> Result<()> {
        let rows = self.conn().execute(
            "UPDATE courses SET title = ?1, description = ?2, status = ?3, updated_at = ?4
             WHERE id = ?5",
            params![
                course.title,
                course.description,
                course.status.as_str(),
                format_datetime(&course.updated_at),
                course.id
            ],
        )?;

        if rows == 0 {
            return Err(Error::NotFound);
        }
        Ok(())
    }

    fn delete_course(&self, id: &str) -> Result<bool> {
        let rows = self
            .conn()
            .execute("DELETE FROM courses WHERE id = ?1", params![id])?;
        Ok(rows > 0)
    }

    // Section operations

    fn create_section(&self, section: &Section) -> Result<()> {
        self.conn().execute(
            "INSERT INTO course_sections (id, course_id, title, description, order_index, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            params![
                section.id,
                section.course_id,
                section.title,
                section.description,
                section.order_index,
                format_datetime(&section.created_at),
            ],
        )?;
        Ok(())
    }

    fn get_section(&self, id: &str) -> Result<Option<Section>> {
        let conn = self.conn();
        conn.query_row(
            &format!("SELECT {SECTION_COLUMNS} FROM course_sections WHERE id = ?1"),
            params![id],
            section_from_row,
        )
        .optional()
        .map_err(Error::from)
    }

    fn list_sections(&self, course_id: &str) -> Result<Vec<Section>> {
        let conn = self.conn();
        let mut stmt = conn.prepare(&format!(
            "SELECT {SECTION_COLUMNS} FROM course_sections WHERE course_id = ?1
             ORDER BY order_index, rowid"
        ))?;

        let rows = stmt.query_map(params![course_id], section_from_row)?;

        rows.collect::<std::result::Result<Vec<_>, _>>()
            .map_err(Error::from)
    }

    fn update_section(&self, section: &Section) -> Result<()> {
        let rows = self.conn().execute(
            "UPDATE course_sections SET title = ?1, description = ?2, order_index = ?3
             WHERE id = ?4",
            params![
                section.title,
                section.description,
                section.order_index,
                section.id
            ],
        )?;

        if rows == 0 {
            return Err(Error::NotFound);
        }
        Ok(())
    }

    fn delete_section(&self, id: &str) -> Result<bool> {
        let rows = self
            .conn()
            .execute("DELETE FROM course_sections WHERE id = ?1", params![id])?;
        Ok(rows > 0)
    }

    // Activity operations

    fn create_activity(&self, activity: &Activity) -> Result<()> {
        self.conn().execute(
            "INSERT INTO course_activities
                (id, course_id, section_id, title, activity_type, source, url, file_url, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)",
            params![
                activity.id,
                activity.course_id,
                activity.section_id,
                activity.title,
                activity.activity_type.as_str(),
                activity.source.as_str(),
                activity.url,
                activity.file_url,
                format_datetime(&activity.created_at),
            ],
        )?;
        Ok(())
    }

    fn get_activity(&self, id: &str) -> Result<Option<Activity>> {
        let conn = self.conn();
        conn.query_row(
            &format!("SELECT {ACTIVITY_COLUMNS} FROM course_activities WHERE id = ?1"),
            params![id],
            activity_from_row,
        )
        .optional()
        .map_err(Error::from)
    }

    fn list_course_activities(&self, course_id: &str) -> Result<Vec<Activity>> {
        let conn = self.conn();
        let mut stmt = conn.prepare(&format!(
            "SELECT {ACTIVITY_COLUMNS} FROM course_activities WHERE course_id = ?1 ORDER BY rowid"
        ))?;

        let rows = stmt.query_map(params![course_id], activity_from_row)?;

        rows.collect::<std::result::Result<Vec<_>, _>>()
            .map_err(Error::from)
    }

    fn update_activity(&self, activity: &Activity) -> Result<()> {
        let rows = self.conn().execute(
            "UPDATE course_activities
             SET title = ?1, activity_type = ?2, source = ?3, url = ?4, file_url = ?5
             WHERE id = ?6",
            params![
                activity.title,
                activity.activity_type.as_str(),
                activity.source.as_str(),
                activity.url,
                activity.file_url,
                activity.id
            ],
        )?;

        if rows == 0 {
            return Err(Error::NotFound);
        }
        Ok(())
    }

    fn delete_activity(&self, id: &str) -> Result<bool> {
        let rows = self
            .conn()
            .execute("DELETE FROM course_activities WHERE id = ?1", params![id])?;
        Ok(rows > 0)
    }

    fn delete_section_activities(&self, section_id: &str) -> Result<usize> {
        let rows = self.conn().execute(
            "DELETE FROM course_activities WHERE section_id = ?1",
            params![section_id],
        )?;
        Ok(rows)
    }

    // Settings rows

    fn get_course_settings(&self, course_id: &str) -> Result<Option<CourseSettings>> {
        let conn = self.conn();
        let settings = conn
            .query_row(
                "SELECT course_id, course_image, course_label, what_you_learn, instructor_name,
                        instructor_title, instructor_bio, show_course_includes,
                        show_what_you_learn, show_instructor, updated_at
                 FROM course_settings WHERE course_id = ?1",
                params![course_id],
                |row| {
                    Ok(CourseSettings {
                        course_id: row.get(0)?,
                        course_image: row.get(1)?,
                        course_label: row.get(2)?,
                        what_you_learn: row.get(3)?,
                        instructor_name: row.get(4)?,
                        instructor_title: row.get(5)?,
                        instructor_bio: row.get(6)?,
                        show_course_includes: row.get(7)?,
                        show_what_you_learn: row.get(8)?,
                        show_instructor: row.get(9)?,
                        website_ids: Vec::new(),
                        updated_at: parse_datetime(&row.get::<_, String>(10)?),
                    })
                },
            )
            .optional()?;

        let Some(mut settings) = settings else {
            return Ok(None);
        };

        let mut stmt = conn.prepare(
            "SELECT site_id FROM course_websites WHERE course_id = ?1 ORDER BY position",
        )?;
        settings.website_ids = stmt
            .query_map(params![course_id], |row| row.get(0))?
            .collect::<std::result::Result<Vec<String>, _>>()?;

        Ok(Some(settings))
    }

    fn upsert_course_settings(&self, settings: &CourseSettings) -> Result<()> {
        let mut conn = self.conn();
        let tx = conn.transaction()?;

        tx.execute(
            "INSERT INTO course_settings
                (course_id, course_image, course_label, what_you_learn, instructor_name,
                 instructor_title, instructor_bio, show_course_includes, show_what_you_learn,
                 show_instructor, updated_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11)
             ON CONFLICT(course_id) DO UPDATE SET
                course_image = excluded.course_image,
                course_label = excluded.course_label,
                what_you_learn = excluded.what_you_learn,
                instructor_name = excluded.instructor_name,
                instructor_title = excluded.instructor_title,
                instructor_bio = excluded.instructor_bio,
                show_course_includes = excluded.show_course_includes,
                show_what_you_learn = excluded.show_what_you_learn,
                show_instructor = excluded.show_instructor,
                updated_at = excluded.updated_at",
            params![
                settings.course_id,
                settings.course_image,
                settings.course_label,
                settings.what_you_learn,
                settings.instructor_name,
                settings.instructor_title,
                settings.instructor_bio,
                settings.show_course_includes,
                settings.show_what_you_learn,
                settings.show_instructor,
                format_datetime(&settings.updated_at),
            ],
        )?;

        tx.execute(
            "DELETE FROM course_websites WHERE course_id = ?1",
            params![settings.course_id],
        )?;
        for (position, site_id) in settings.website_ids.iter().enumerate() {
            tx.execute(
                "INSERT INTO course_websites (course_id, site_id, position) VALUES (?1, ?2, ?3)",
                params![settings.course_id, site_id, position as i64],
            )?;
        }

        tx.commit()?;
        Ok(())
    }

    fn delete_course_settings(&self, course_id: &str) -> Result<bool> {
        let conn = self.conn();
        conn.execute(
            "DELETE FROM course_websites WHERE course_id = ?1",
            params![course_id],
        )?;
        let rows = conn.execute(
            "DELETE FROM course_settings WHERE course_id = ?1",
            params![course_id],
        )?;
        Ok(rows > 0)
    }

    fn list_site_course_ids(&self, site_id: &str) -> Result<Vec<String>> {
        let conn = self.conn();
        let mut stmt = conn.prepare(
            "SELECT course_id FROM course_websites WHERE site_id = ?1 ORDER BY course_id",
        )?;

        let rows = stmt.query_map(params![site_id], |row| row.get(0))?;

        rows.collect::<std::result::Result<Vec<String>, _>>()
            .map_err(Error::from)
    }

    fn unlink_site(&self, site_id: &str) -> Result<usize> {
        let rows = self.conn().execute(
            "DELETE FROM course_websites WHERE site_id = ?1",
            params![site_id],
        )?;
        Ok(rows)
    }

    fn get_course_access(&self, course_id: &str) -> Result<Option<CourseAccess>> {
        let conn = self.conn();
        conn.query_row(
            "SELECT course_id, access_type, navigation_type, updated_at
             FROM course_access WHERE course_id = ?1",
            params![course_id],
            |row| {
                Ok(CourseAccess {
                    course_id: row.get(0)?,
                    access_type: parse_enum(1, row.get(1)?)?,
                    navigation_type: parse_enum(2, row.get(2)?)?,
                    updated_at: parse_datetime(&row.get::<_, String>(3)?),
                })
            },
        )
        .optional()
        .map_err(Error::from)
    }

    fn upsert_course_access(&self, access: &CourseAccess) -> Result<()> {
        self.conn().execute(
            "INSERT INTO course_access (course_id, access_type, navigation_type, updated_at)
             VALUES (?1, ?2, ?3, ?4)
             ON CONFLICT(course_id) DO UPDATE SET
                access_type = excluded.access_type,
                navigation_type = excluded.navigation_type,
                updated_at = excluded.updated_at",
            params![
                access.course_id,
                access.access_type.as_str(),
                access.navigation_type.as_str(),
                format_datetime(&access.updated_at),
            ],
        )?;
        Ok(())
    }

    fn delete_course_access(&self, course_id: &str) -> Result<bool> {
        let rows = self.conn().execute(
            "DELETE FROM course_access WHERE course_id = ?1",
            params![course_id],
        )?;
        Ok(rows > 0)
    }

    fn get_course_pricing(&self, course_id: &str) -> Result<Option<CoursePricing>> {
        let conn = self.conn();
        conn.query_row(
            "SELECT course_id, price, compare_at_price, show_compare_at_price, updated_at
             FROM course_pricing WHERE course_id = ?1",
            params![course_id],
            |row| {
                Ok(CoursePricing {
                    course_id: row.get(0)?,
                    price: row.get(1)?,
                    compare_at_price: row.get(2)?,
                    show_compare_at_price: row.get(3)?,
                    updated_at: parse_datetime(&row.get::<_, String>(4)?),
                })
            },
        )
        .optional()
        .map_err(Error::from)
    }

    fn upsert_course_pricing(&self, pricing: &CoursePricing) -> Result<()> {
        self.conn().execute(
            "INSERT INTO course_pricing
                (course_id, price, compare_at_price, show_compare_at_price, updated_at)
             VALUES (?1, ?2, ?3, ?4, ?5)
             ON CONFLICT(course_id) DO UPDATE SET
                price = excluded.price,
                compare_at_price = excluded.compare_at_price,
                show_compare_at_price = excluded.show_compare_at_price,
                updated_at = excluded.updated_at",
            params![
                pricing.course_id,
                pricing.price,
                pricing.compare_at_price,
                pricing.show_compare_at_price,
                format_datetime(&pricing.updated_at),
            ],
        )?;
        Ok(())
    }

    fn delete_course_pricing(&self, course_id: &str) -> Result<bool> {
        let rows = self.conn().execute(
            "DELETE FROM course_pricing WHERE course_id = ?1",
            params![course_id],
        )?;
        Ok(rows > 0)
    }

    fn has_admin_token(&self) -> Result<bool> {
        let count: i32 = self.conn().query_row(
            "SELECT COUNT(*) FROM tokens WHERE is_admin = 1",
            [],
            |row| row.get(0),
        )?;
        Ok(count > 0)
    }

    fn count_rows(&self, table: Table) -> Result<i64> {
        let count = self.conn().query_row(
            &format!("SELECT COUNT(*) FROM {}", table.name()),
            [],
            |row| row.get(0),
        )?;
        Ok(count)
    }

    fn close(&self) -> Result<()> {
        Ok(())
    }
}

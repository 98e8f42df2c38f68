//! SQLite database with Diesel ORM
//!
//! Stores the versioned application state blob, local user accounts and
//! sign-in sessions. Tables are created on open.

use crate::schema::*;
use diesel::prelude::*;
use diesel::r2d2::{ConnectionManager, Pool, PooledConnection};
use diesel::sqlite::SqliteConnection;
use std::path::{Path, PathBuf};
use thiserror::Error;

pub const DEFAULT_DB_PATH: &str = "hrbotics.db";

/// Current state schema
pub const CURRENT_SCHEMA: StateSchema = StateSchema {
    version: 1,
    name: "versioned-state",
    features: &[
        "last_interview",
        "practice_stats",
        "weekly_reset",
        "hashed_credentials",
        "legacy_import",
    ],
};

/// Describes the version and capabilities of the stored state layout
#[derive(Debug, Clone)]
pub struct StateSchema {
    pub version: u32,
    pub name: &'static str,
    pub features: &'static [&'static str],
}

impl StateSchema {
    pub fn can_read(&self, stored_version: u32) -> bool {
        stored_version <= self.version
    }

    pub fn has_feature(&self, feature: &str) -> bool {
        self.features.contains(&feature)
    }
}

impl std::fmt::Display for StateSchema {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "v{} ({})", self.version, self.name)
    }
}

// ============================================================================
// Diesel Models
// ============================================================================

#[derive(Insertable)]
#[diesel(table_name = schema_versions)]
pub struct NewSchemaVersion<'a> {
    pub version: i32,
    pub name: &'a str,
    pub features: &'a str,
    pub introduced_at: &'a str,
}

#[derive(Queryable, Selectable, Debug, Clone, serde::Serialize)]
#[diesel(table_name = schema_versions)]
pub struct StoredSchema {
    pub id: i32,
    pub version: i32,
    pub name: String,
    pub features: String,
    pub introduced_at: String,
}

/// Insertable state blob
#[derive(Insertable)]
#[diesel(table_name = app_state)]
pub struct NewStateBlob<'a> {
    pub name: &'a str,
    pub version: i32,
    pub payload: &'a str,
    pub updated_at: &'a str,
}

/// Queryable state blob
#[derive(Queryable, Selectable, Debug, Clone)]
#[diesel(table_name = app_state)]
pub struct StateBlob {
    pub name: String,
    pub version: i32,
    pub payload: String,
    pub updated_at: String,
}

#[derive(Insertable)]
#[diesel(table_name = users)]
pub struct NewUser<'a> {
    pub email: &'a str,
    pub name: &'a str,
    pub password_hash: &'a str,
    pub created_at: &'a str,
}

#[derive(Queryable, Selectable, Debug, Clone)]
#[diesel(table_name = users)]
pub struct UserRecord {
    pub id: i32,
    pub email: String,
    pub name: String,
    pub password_hash: String,
    pub created_at: String,
}

#[derive(Insertable)]
#[diesel(table_name = auth_sessions)]
pub struct NewAuthSession<'a> {
    pub user_id: i32,
    pub started_at: &'a str,
    pub ended_at: Option<&'a str>,
}

// ============================================================================
// Database Connection
// ============================================================================

type DbPool = Pool<ConnectionManager<SqliteConnection>>;
type DbConn = PooledConnection<ConnectionManager<SqliteConnection>>;

/// Database connection wrapper with connection pool
pub struct Database {
    pool: DbPool,
    path: PathBuf,
}

#[derive(Debug, Error)]
pub enum DbError {
    #[error("Connection error: {0}")]
    Connection(String),
    #[error("Query error: {0}")]
    Query(#[from] diesel::result::Error),
    #[error("Backup failed: {0}")]
    Backup(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, DbError>;

impl Database {
    /// Open (creating if needed) the database at `path`
    pub fn open_at<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path_str = path.as_ref().to_string_lossy().to_string();
        let manager = ConnectionManager::<SqliteConnection>::new(&path_str);
        let pool = Pool::builder()
            .max_size(4)
            .build(manager)
            .map_err(|e| DbError::Connection(e.to_string()))?;

        let db = Self { pool, path: path.as_ref().to_path_buf() };
        db.init_schema()?;
        log::debug!("opened database {} ({})", path_str, CURRENT_SCHEMA);
        Ok(db)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn get_conn(&self) -> Result<DbConn> {
        self.pool.get().map_err(|e| DbError::Connection(e.to_string()))
    }

    fn init_schema(&self) -> Result<()> {
        let mut conn = self.get_conn()?;

        diesel::sql_query(r#"
            CREATE TABLE IF NOT EXISTS schema_versions (
                id INTEGER PRIMARY KEY AUTOINCREMENT NOT NULL,
                version INTEGER NOT NULL UNIQUE,
                name TEXT NOT NULL,
                features TEXT NOT NULL,
                introduced_at TEXT NOT NULL
            )
        "#).execute(&mut conn)?;

        diesel::sql_query(r#"
            CREATE TABLE IF NOT EXISTS app_state (
                name TEXT PRIMARY KEY NOT NULL,
                version INTEGER NOT NULL,
                payload TEXT NOT NULL,
                updated_at TEXT NOT NULL
            )
        "#).execute(&mut conn)?;

        diesel::sql_query(r#"
            CREATE TABLE IF NOT EXISTS users (
                id INTEGER PRIMARY KEY AUTOINCREMENT NOT NULL,
                email TEXT NOT NULL UNIQUE,
                name TEXT NOT NULL,
                password_hash TEXT NOT NULL,
                created_at TEXT NOT NULL
            )
        "#).execute(&mut conn)?;

        diesel::sql_query(r#"
            CREATE TABLE IF NOT EXISTS auth_sessions (
                id INTEGER PRIMARY KEY AUTOINCREMENT NOT NULL,
                user_id INTEGER NOT NULL,
                started_at TEXT NOT NULL,
                ended_at TEXT,
                FOREIGN KEY (user_id) REFERENCES users(id)
            )
        "#).execute(&mut conn)?;

        diesel::sql_query("CREATE INDEX IF NOT EXISTS idx_sessions_open ON auth_sessions(ended_at)").execute(&mut conn)?;

        self.register_schema(&CURRENT_SCHEMA)?;
        Ok(())
    }

    fn register_schema(&self, schema: &StateSchema) -> Result<()> {
        let mut conn = self.get_conn()?;
        let now = chrono::Local::now().to_rfc3339();
        let features_json = serde_json::to_string(&schema.features).unwrap_or_default();

        let new_schema = NewSchemaVersion {
            version: schema.version as i32,
            name: schema.name,
            features: &features_json,
            introduced_at: &now,
        };

        diesel::insert_or_ignore_into(schema_versions::table)
            .values(&new_schema)
            .execute(&mut conn)?;

        Ok(())
    }

    /// All schema versions this database has been opened with
    pub fn schema_history(&self) -> Result<Vec<StoredSchema>> {
        let mut conn = self.get_conn()?;
        let rows = schema_versions::table
            .order(schema_versions::version.asc())
            .load::<StoredSchema>(&mut conn)?;
        Ok(rows)
    }

    // ========================================================================
    // State Blobs
    // ========================================================================

    pub fn get_state(&self, name: &str) -> Result<Option<StateBlob>> {
        let mut conn = self.get_conn()?;
        let blob = app_state::table
            .filter(app_state::name.eq(name))
            .first::<StateBlob>(&mut conn)
            .optional()?;
        Ok(blob)
    }

    /// Insert or overwrite a state blob in one statement
    pub fn put_state(&self, name: &str, version: u32, payload: &str) -> Result<()> {
        let mut conn = self.get_conn()?;
        let now = chrono::Local::now().to_rfc3339();

        let blob = NewStateBlob {
            name,
            version: version as i32,
            payload,
            updated_at: &now,
        };

        diesel::replace_into(app_state::table)
            .values(&blob)
            .execute(&mut conn)?;

        Ok(())
    }

    pub fn delete_state(&self, name: &str) -> Result<usize> {
        let mut conn = self.get_conn()?;
        let count = diesel::delete(app_state::table.filter(app_state::name.eq(name)))
            .execute(&mut conn)?;
        Ok(count)
    }

    // ========================================================================
    // Users
    // ========================================================================

    pub fn insert_user(&self, email: &str, name: &str, password_hash: &str) -> Result<i32> {
        let mut conn = self.get_conn()?;
        let now = chrono::Local::now().to_rfc3339();

        let new_user = NewUser { email, name, password_hash, created_at: &now };

        diesel::insert_into(users::table)
            .values(&new_user)
            .execute(&mut conn)?;

        let id: i32 = diesel::select(diesel::dsl::sql::<diesel::sql_types::Integer>("last_insert_rowid()"))
            .first(&mut conn)?;

        Ok(id)
    }

    pub fn find_user_by_email(&self, email: &str) -> Result<Option<UserRecord>> {
        let mut conn = self.get_conn()?;
        let user = users::table
            .filter(users::email.eq(email))
            .first::<UserRecord>(&mut conn)
            .optional()?;
        Ok(user)
    }

    // ========================================================================
    // Sign-in Sessions
    // ========================================================================

    /// Close any open session and open a new one for `user_id`
    pub fn start_session(&self, user_id: i32) -> Result<()> {
        self.end_sessions()?;
        let mut conn = self.get_conn()?;
        let now = chrono::Local::now().to_rfc3339();

        let session = NewAuthSession { user_id, started_at: &now, ended_at: None };

        diesel::insert_into(auth_sessions::table)
            .values(&session)
            .execute(&mut conn)?;

        Ok(())
    }

    /// Close every open session. Returns how many were open.
    pub fn end_sessions(&self) -> Result<usize> {
        let mut conn = self.get_conn()?;
        let now = chrono::Local::now().to_rfc3339();

        let count = diesel::update(auth_sessions::table.filter(auth_sessions::ended_at.is_null()))
            .set(auth_sessions::ended_at.eq(Some(&now)))
            .execute(&mut conn)?;

        Ok(count)
    }

    /// User of the most recent open session
    pub fn session_user(&self) -> Result<Option<UserRecord>> {
        let mut conn = self.get_conn()?;
        let user = auth_sessions::table
            .inner_join(users::table)
            .filter(auth_sessions::ended_at.is_null())
            .order(auth_sessions::id.desc())
            .select(UserRecord::as_select())
            .first::<UserRecord>(&mut conn)
            .optional()?;
        Ok(user)
    }

    // ========================================================================
    // Maintenance
    // ========================================================================

    /// Copy the database file to `dest`. Returns bytes copied.
    pub fn backup_to<P: AsRef<Path>>(&self, dest: P) -> Result<u64> {
        let bytes = std::fs::copy(&self.path, dest)?;
        Ok(bytes)
    }
}

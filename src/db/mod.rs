//! Read-only access to a Photos library database.
//!
//! The library is a Core Data store: tables are prefixed with `Z`, primary
//! keys are `Z_PK`, and dates are seconds since 2001-01-01. Only fixed
//! `SELECT` queries are issued; the file is opened read-only so nothing here
//! can modify the user's library.

pub mod assets;
pub mod people;
#[cfg(test)]
mod schema;

use rusqlite::{Connection, OpenFlags};
use std::path::{Path, PathBuf};

use crate::error::{PipelineError, Result};

pub use assets::MediaAsset;
pub use people::{Person, PersonAppearance};

/// A validated, read-only connection to the library database.
///
/// The connection lives as long as this value; dropping it on any exit path
/// releases the file.
pub struct LibraryDb {
    conn: Connection,
    path: PathBuf,
}

impl LibraryDb {
    /// Open the database file read-only.
    ///
    /// Fails with [`PipelineError::Connection`] if the file does not exist,
    /// cannot be opened, or is not a SQLite database.
    pub fn open(path: &Path) -> Result<Self> {
        if !path.is_file() {
            return Err(PipelineError::Connection {
                path: path.to_path_buf(),
                reason: "file not found".to_string(),
            });
        }

        let conn = Connection::open_with_flags(
            path,
            OpenFlags::SQLITE_OPEN_READ_ONLY | OpenFlags::SQLITE_OPEN_NO_MUTEX,
        )
        .map_err(|e| connection_error(path, e))?;

        Self::validate(conn, path.to_path_buf())
    }

    /// Wrap an existing connection, e.g. an in-memory database.
    pub fn from_connection(conn: Connection) -> Result<Self> {
        let path = conn
            .path()
            .map(PathBuf::from)
            .filter(|p| !p.as_os_str().is_empty())
            .unwrap_or_else(|| PathBuf::from(":memory:"));
        Self::validate(conn, path)
    }

    // SQLite opens lazily; reading the catalog forces the header check so a
    // corrupt or foreign file fails here rather than in the first query.
    fn validate(conn: Connection, path: PathBuf) -> Result<Self> {
        conn.query_row("SELECT COUNT(*) FROM sqlite_master", [], |row| {
            row.get::<_, i64>(0)
        })
        .map_err(|e| connection_error(&path, e))?;

        tracing::debug!("Opened photo library database at {:?}", path);
        Ok(Self { conn, path })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Release the connection, reporting a failed close.
    pub fn close(self) -> Result<()> {
        let path = self.path;
        self.conn.close().map_err(|(_, e)| PipelineError::Query(e))?;
        tracing::debug!("Closed photo library database at {:?}", path);
        Ok(())
    }
}

fn connection_error(path: &Path, err: rusqlite::Error) -> PipelineError {
    PipelineError::Connection {
        path: path.to_path_buf(),
        reason: err.to_string(),
    }
}

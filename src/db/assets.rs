//! Asset and resource queries for the storage growth pipeline.

use super::LibraryDb;
use crate::error::Result;
use crate::timestamp::RawTimestamp;

/// One stored resource of an asset, with its raw added date.
#[derive(Debug, Clone)]
pub struct MediaAsset {
    pub asset_id: i64,
    pub added_date: RawTimestamp,
    pub file_size: i64,
}

impl LibraryDb {
    /// Every asset resource with a known added date and byte length,
    /// oldest first.
    pub fn media_assets(&self) -> Result<Vec<MediaAsset>> {
        let mut stmt = self.conn.prepare(
            r#"
            SELECT
                ZASSET.Z_PK AS asset_id,
                ZASSET.ZADDEDDATE AS added_date,
                ZINTERNALRESOURCE.ZDATALENGTH AS file_size
            FROM ZASSET
            JOIN ZINTERNALRESOURCE ON ZASSET.Z_PK = ZINTERNALRESOURCE.ZASSET
            WHERE ZASSET.ZADDEDDATE IS NOT NULL
              AND ZINTERNALRESOURCE.ZDATALENGTH IS NOT NULL
            ORDER BY ZASSET.ZADDEDDATE
            "#,
        )?;

        let assets = stmt
            .query_map([], |row| {
                Ok(MediaAsset {
                    asset_id: row.get(0)?,
                    added_date: row.get(1)?,
                    file_size: row.get(2)?,
                })
            })?
            .collect::<rusqlite::Result<Vec<_>>>()?;

        tracing::debug!("Fetched {} asset resources", assets.len());
        Ok(assets)
    }
}

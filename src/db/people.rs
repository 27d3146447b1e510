//! Person and detected-face queries for the people pipelines.

use rusqlite::types::ValueRef;

use super::LibraryDb;
use crate::error::Result;
use crate::timestamp::RawTimestamp;

/// A named person with face and asset totals.
#[derive(Debug, Clone, PartialEq)]
pub struct Person {
    pub person_id: i64,
    pub display_name: String,
    pub face_count: i64,
    /// Distinct assets with at least one face of this person.
    pub asset_count: i64,
    /// The real name when `display_name` holds a pseudonym. Never exported.
    pub original_name: Option<String>,
}

/// One detected face of a named person on an asset.
#[derive(Debug, Clone)]
pub struct PersonAppearance {
    pub person_id: i64,
    pub person_name: String,
    pub added_date: RawTimestamp,
}

impl LibraryDb {
    /// Named people with their asset counts, most photographed first.
    pub fn people(&self) -> Result<Vec<Person>> {
        let mut stmt = self.conn.prepare(
            r#"
            SELECT
                ZPERSON.Z_PK AS person_id,
                ZPERSON.ZDISPLAYNAME AS person_name,
                ZPERSON.ZFACECOUNT AS face_count,
                COUNT(DISTINCT ZDETECTEDFACE.ZASSETFORFACE) AS asset_count
            FROM ZPERSON
            LEFT JOIN ZDETECTEDFACE ON ZPERSON.Z_PK = ZDETECTEDFACE.ZPERSONFORFACE
            WHERE ZPERSON.ZDISPLAYNAME IS NOT NULL
              AND ZPERSON.ZDISPLAYNAME != ''
            GROUP BY ZPERSON.Z_PK
            ORDER BY asset_count DESC
            "#,
        )?;

        let people = stmt
            .query_map([], |row| {
                Ok(Person {
                    person_id: row.get(0)?,
                    display_name: name_from(row.get_ref(1)?),
                    face_count: row.get::<_, Option<i64>>(2)?.unwrap_or(0),
                    asset_count: row.get(3)?,
                    original_name: None,
                })
            })?
            .collect::<rusqlite::Result<Vec<_>>>()?;

        tracing::debug!("Fetched {} named people", people.len());
        Ok(people)
    }

    /// Every face of a named person joined to its asset's added date,
    /// oldest first.
    pub fn person_appearances(&self) -> Result<Vec<PersonAppearance>> {
        let mut stmt = self.conn.prepare(
            r#"
            SELECT
                ZPERSON.Z_PK AS person_id,
                ZPERSON.ZDISPLAYNAME AS person_name,
                ZASSET.ZADDEDDATE AS added_date
            FROM ZPERSON
            JOIN ZDETECTEDFACE ON ZPERSON.Z_PK = ZDETECTEDFACE.ZPERSONFORFACE
            JOIN ZASSET ON ZDETECTEDFACE.ZASSETFORFACE = ZASSET.Z_PK
            WHERE ZPERSON.ZDISPLAYNAME IS NOT NULL
              AND ZPERSON.ZDISPLAYNAME != ''
              AND ZASSET.ZADDEDDATE IS NOT NULL
            ORDER BY ZASSET.ZADDEDDATE
            "#,
        )?;

        let appearances = stmt
            .query_map([], |row| {
                Ok(PersonAppearance {
                    person_id: row.get(0)?,
                    person_name: name_from(row.get_ref(1)?),
                    added_date: row.get(2)?,
                })
            })?
            .collect::<rusqlite::Result<Vec<_>>>()?;

        tracing::debug!("Fetched {} person appearances", appearances.len());
        Ok(appearances)
    }
}

/// A display name from whatever the cell holds. Bytes that are not valid
/// UTF-8 become replacement characters rather than failing the query.
fn name_from(value: ValueRef<'_>) -> String {
    match value {
        ValueRef::Text(bytes) | ValueRef::Blob(bytes) => String::from_utf8_lossy(bytes).into_owned(),
        ValueRef::Integer(v) => v.to_string(),
        ValueRef::Real(v) => v.to_string(),
        ValueRef::Null => String::new(),
    }
}

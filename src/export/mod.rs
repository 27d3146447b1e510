use std::path::Path;

use crate::aggregate::MonthlyBucket;
use crate::db::Person;
use crate::error::Result;

pub const GROWTH_CSV: &str = "photos_library_growth.csv";
pub const PEOPLE_CSV: &str = "photos_people_data.csv";

const GROWTH_HEADERS: [&str; 4] = ["year_month", "file_size_gb", "cumulative_size_gb", "growth_gb"];
const PEOPLE_HEADERS: [&str; 4] = ["person_id", "person_name", "face_count", "asset_count"];

/// Write the monthly growth table, oldest month first.
pub fn export_growth_csv(buckets: &[MonthlyBucket], output_path: &Path) -> Result<usize> {
    let mut wtr = csv::Writer::from_path(output_path)?;

    wtr.write_record(GROWTH_HEADERS)?;

    for bucket in buckets {
        wtr.write_record([
            bucket.year_month.to_string(),
            bucket.file_size_gb.to_string(),
            bucket.cumulative_size_gb.to_string(),
            bucket.growth_gb().to_string(),
        ])?;
    }

    wtr.flush()?;
    Ok(buckets.len())
}

/// Write the people table in the given order.
///
/// Only `display_name` is written; a real name kept in `original_name`
/// never leaves memory.
pub fn export_people_csv(people: &[Person], output_path: &Path) -> Result<usize> {
    let mut wtr = csv::Writer::from_path(output_path)?;

    wtr.write_record(PEOPLE_HEADERS)?;

    for person in people {
        wtr.write_record([
            person.person_id.to_string(),
            person.display_name.clone(),
            person.face_count.to_string(),
            person.asset_count.to_string(),
        ])?;
    }

    wtr.flush()?;
    Ok(people.len())
}

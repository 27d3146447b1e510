//! Console summaries for the growth and people pipelines.

use std::io::{self, Write};

use crate::aggregate::{top_n, MonthlyBucket};
use crate::db::Person;

/// Trailing windows, in months, for the recent growth averages.
pub const TRAILING_WINDOWS: [usize; 3] = [3, 6, 12];

/// Mean `growth_gb` of the last `months` buckets, if there are that many.
pub fn trailing_average(buckets: &[MonthlyBucket], months: usize) -> Option<f64> {
    if months == 0 || buckets.len() < months {
        return None;
    }
    let tail = &buckets[buckets.len() - months..];
    Some(tail.iter().map(MonthlyBucket::growth_gb).sum::<f64>() / months as f64)
}

/// Buckets sorted by growth, largest first. Ties stay chronological.
pub fn largest_months(buckets: &[MonthlyBucket], n: usize) -> Vec<&MonthlyBucket> {
    let mut sorted: Vec<&MonthlyBucket> = buckets.iter().collect();
    sorted.sort_by(|a, b| b.growth_gb().total_cmp(&a.growth_gb()));
    sorted.truncate(n);
    sorted
}

pub fn write_growth_summary(
    out: &mut dyn Write,
    buckets: &[MonthlyBucket],
    top_months: usize,
) -> io::Result<()> {
    let Some(last) = buckets.last() else {
        return Ok(());
    };
    let months = buckets.len();
    let average = buckets.iter().map(MonthlyBucket::growth_gb).sum::<f64>() / months as f64;
    // largest_months keeps the earliest of equal months first.
    let peak = largest_months(buckets, 1)[0];

    writeln!(out)?;
    writeln!(out, "===== Photos Library Growth Summary =====")?;
    writeln!(out, "Total library size: {:.2} GB", last.cumulative_size_gb)?;
    writeln!(out, "Data spans {} months", months)?;
    writeln!(out, "Average monthly growth: {:.2} GB", average)?;
    writeln!(
        out,
        "Maximum monthly growth: {:.2} GB (in {})",
        peak.growth_gb(),
        peak.year_month
    )?;

    for window in TRAILING_WINDOWS {
        if let Some(avg) = trailing_average(buckets, window) {
            writeln!(
                out,
                "Average monthly growth (last {} months): {:.2} GB",
                window, avg
            )?;
        }
    }

    writeln!(out)?;
    writeln!(out, "Top {} months with highest growth:", top_months)?;
    for bucket in largest_months(buckets, top_months) {
        writeln!(out, "{}: {:.2} GB", bucket.year_month, bucket.growth_gb())?;
    }

    Ok(())
}

/// People statistics; `people` must already be ranked.
pub fn write_people_summary(
    out: &mut dyn Write,
    people: &[Person],
    top_people: usize,
) -> io::Result<()> {
    // Corrupt counts saturate instead of overflowing.
    let total_faces = people.iter().fold(0i64, |acc, p| acc.saturating_add(p.face_count));
    let total_assets = people.iter().fold(0i64, |acc, p| acc.saturating_add(p.asset_count));

    writeln!(out)?;
    writeln!(out, "===== Photos Library People Statistics =====")?;
    writeln!(out, "Total number of people: {}", people.len())?;
    writeln!(out, "Total number of faces detected: {}", total_faces)?;
    writeln!(out, "Total number of photos/videos with people: {}", total_assets)?;

    writeln!(out)?;
    writeln!(out, "Top {} people with the most photos/videos:", top_people)?;
    for (rank, person) in top_n(people, top_people).iter().enumerate() {
        writeln!(
            out,
            "{}. {}: {} photos/videos, {} faces",
            rank + 1,
            person.display_name,
            person.asset_count,
            person.face_count
        )?;
    }

    Ok(())
}

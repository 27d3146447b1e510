//! Monthly storage growth, people ranking and the people timeline.

use chrono::NaiveDateTime;
use std::collections::{BTreeMap, BTreeSet, HashMap};

use crate::db::{MediaAsset, Person, PersonAppearance};
use crate::timestamp::{normalize, YearMonth};

const BYTES_PER_GB: f64 = 1024.0 * 1024.0 * 1024.0;

/// Rows that survived normalization, and how many were dropped.
#[derive(Debug, Clone)]
pub struct Normalized<T> {
    pub rows: Vec<T>,
    pub dropped: usize,
}

impl<T> Normalized<T> {
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// An asset resource with a valid added date.
#[derive(Debug, Clone)]
pub struct DatedAsset {
    pub asset_id: i64,
    pub added: NaiveDateTime,
    pub file_size: u64,
}

/// A person appearance with a valid added date.
#[derive(Debug, Clone)]
pub struct DatedAppearance {
    pub person_id: i64,
    pub person_name: String,
    pub added: NaiveDateTime,
}

/// Normalize added dates, dropping rows with an unusable date or a negative
/// byte length.
pub fn date_assets(assets: Vec<MediaAsset>) -> Normalized<DatedAsset> {
    let total = assets.len();
    let rows: Vec<DatedAsset> = assets
        .into_iter()
        .filter_map(|asset| {
            let added = normalize(&asset.added_date)?;
            let file_size = u64::try_from(asset.file_size).ok()?;
            Some(DatedAsset {
                asset_id: asset.asset_id,
                added,
                file_size,
            })
        })
        .collect();

    Normalized {
        dropped: total - rows.len(),
        rows,
    }
}

/// Normalize appearance dates, dropping rows with an unusable date.
pub fn date_appearances(appearances: Vec<PersonAppearance>) -> Normalized<DatedAppearance> {
    let total = appearances.len();
    let rows: Vec<DatedAppearance> = appearances
        .into_iter()
        .filter_map(|appearance| {
            let added = normalize(&appearance.added_date)?;
            Some(DatedAppearance {
                person_id: appearance.person_id,
                person_name: appearance.person_name,
                added,
            })
        })
        .collect();

    Normalized {
        dropped: total - rows.len(),
        rows,
    }
}

/// Storage added in one calendar month.
#[derive(Debug, Clone, PartialEq)]
pub struct MonthlyBucket {
    pub year_month: YearMonth,
    /// Exact byte total; wide enough that no number of rows can overflow it.
    pub file_size_bytes: u128,
    pub file_size_gb: f64,
    /// Running total of `file_size_gb` up to and including this month.
    pub cumulative_size_gb: f64,
}

impl MonthlyBucket {
    /// Storage added this month; the same figure as `file_size_gb`.
    pub fn growth_gb(&self) -> f64 {
        self.file_size_gb
    }
}

/// Group assets by the month they were added, oldest month first.
pub fn monthly_growth(assets: &[DatedAsset]) -> Vec<MonthlyBucket> {
    let mut by_month: BTreeMap<YearMonth, u128> = BTreeMap::new();
    for asset in assets {
        *by_month.entry(YearMonth::of(&asset.added)).or_default() += u128::from(asset.file_size);
    }

    // BTreeMap iterates in chronological order, which the running sum needs.
    let mut cumulative = 0.0;
    by_month
        .into_iter()
        .map(|(year_month, bytes)| {
            let file_size_gb = bytes as f64 / BYTES_PER_GB;
            cumulative += file_size_gb;
            MonthlyBucket {
                year_month,
                file_size_bytes: bytes,
                file_size_gb,
                cumulative_size_gb: cumulative,
            }
        })
        .collect()
}

/// Sort people by asset count, highest first. Ties keep their input order.
pub fn rank_people(mut people: Vec<Person>) -> Vec<Person> {
    people.sort_by(|a, b| b.asset_count.cmp(&a.asset_count));
    people
}

/// The first `n` rows, or all of them if there are fewer.
pub fn top_n<T>(rows: &[T], n: usize) -> &[T] {
    &rows[..n.min(rows.len())]
}

/// Monthly appearance counts for the most frequent people.
///
/// `counts[m][p]` is the number of appearances of `people[p]` in
/// `months[m]`. Months only appear when at least one selected person does.
#[derive(Debug, Clone, PartialEq)]
pub struct PeopleTimeline {
    pub months: Vec<YearMonth>,
    pub people: Vec<String>,
    counts: Vec<Vec<u64>>,
}

impl PeopleTimeline {
    pub fn is_empty(&self) -> bool {
        self.months.is_empty()
    }

    pub fn count(&self, month: usize, person: usize) -> u64 {
        self.counts
            .get(month)
            .and_then(|row| row.get(person))
            .copied()
            .unwrap_or(0)
    }

    /// One person's counts over every month of the timeline.
    pub fn series(&self, person: usize) -> Vec<(YearMonth, u64)> {
        self.months
            .iter()
            .enumerate()
            .map(|(m, month)| (*month, self.count(m, person)))
            .collect()
    }

    pub fn max_count(&self) -> u64 {
        self.counts.iter().flatten().copied().max().unwrap_or(0)
    }
}

/// Build the timeline for the `top_n` people with the most appearances.
///
/// People are grouped by name. Ties in the total count go to whoever
/// appears first in `appearances`.
pub fn people_timeline(appearances: &[DatedAppearance], top_n: usize) -> PeopleTimeline {
    let mut totals: Vec<(&str, u64)> = Vec::new();
    let mut index: HashMap<&str, usize> = HashMap::new();
    for appearance in appearances {
        let name = appearance.person_name.as_str();
        match index.get(name) {
            Some(&i) => totals[i].1 += 1,
            None => {
                index.insert(name, totals.len());
                totals.push((name, 1));
            }
        }
    }
    totals.sort_by(|a, b| b.1.cmp(&a.1));
    totals.truncate(top_n);

    let people: Vec<String> = totals.iter().map(|(name, _)| name.to_string()).collect();
    let column: HashMap<&str, usize> = totals
        .iter()
        .enumerate()
        .map(|(i, (name, _))| (*name, i))
        .collect();

    let selected: Vec<(YearMonth, usize)> = appearances
        .iter()
        .filter_map(|a| {
            column
                .get(a.person_name.as_str())
                .map(|&p| (YearMonth::of(&a.added), p))
        })
        .collect();

    let months: Vec<YearMonth> = selected
        .iter()
        .map(|(month, _)| *month)
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect();
    let row: HashMap<YearMonth, usize> = months.iter().enumerate().map(|(i, m)| (*m, i)).collect();

    let mut counts = vec![vec![0u64; people.len()]; months.len()];
    for (month, p) in selected {
        counts[row[&month]][p] += 1;
    }

    PeopleTimeline {
        months,
        people,
        counts,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::timestamp::{reference_epoch, RawTimestamp};
    use chrono::NaiveDate;

    const GIB: i64 = 1_073_741_824;

    fn date(y: i32, m: u32, d: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(y, m, d)
            .unwrap()
            .and_hms_opt(12, 0, 0)
            .unwrap()
    }

    fn seconds(dt: NaiveDateTime) -> RawTimestamp {
        RawTimestamp::Integer((dt - reference_epoch()).num_seconds())
    }

    fn asset(id: i64, added: NaiveDateTime, size: u64) -> DatedAsset {
        DatedAsset {
            asset_id: id,
            added,
            file_size: size,
        }
    }

    fn person(id: i64, name: &str, count: i64) -> Person {
        Person {
            person_id: id,
            display_name: name.to_string(),
            face_count: count,
            asset_count: count,
            original_name: None,
        }
    }

    fn appearance(name: &str, added: NaiveDateTime) -> DatedAppearance {
        DatedAppearance {
            person_id: 0,
            person_name: name.to_string(),
            added,
        }
    }

    #[test]
    fn test_date_assets_drops_invalid_rows() {
        let raw = vec![
            MediaAsset { asset_id: 1, added_date: RawTimestamp::Integer(-5), file_size: 10 },
            MediaAsset { asset_id: 2, added_date: RawTimestamp::Integer(0), file_size: 10 },
            MediaAsset { asset_id: 3, added_date: RawTimestamp::Integer(50_000_000), file_size: 10 },
            MediaAsset { asset_id: 4, added_date: RawTimestamp::Integer(50_000_000), file_size: -1 },
        ];

        let dated = date_assets(raw);
        assert_eq!(dated.dropped, 3);
        assert_eq!(dated.rows.len(), 1);
        assert_eq!(dated.rows[0].asset_id, 3);
    }

    #[test]
    fn test_same_month_sums_to_gigabytes() {
        let assets = vec![
            asset(1, date(2024, 3, 1), GIB as u64),
            asset(2, date(2024, 3, 28), 2 * GIB as u64),
        ];

        let buckets = monthly_growth(&assets);
        assert_eq!(buckets.len(), 1);
        assert_eq!(buckets[0].year_month.to_string(), "2024-03");
        assert_eq!(buckets[0].file_size_gb, 3.0);
        assert_eq!(buckets[0].growth_gb(), 3.0);
        assert_eq!(buckets[0].cumulative_size_gb, 3.0);
    }

    #[test]
    fn test_cumulative_is_chronological_prefix_sum() {
        // Deliberately out of order, spanning a year boundary.
        let assets = vec![
            asset(1, date(2024, 2, 10), 5 * GIB as u64),
            asset(2, date(2023, 11, 3), GIB as u64 / 2),
            asset(3, date(2023, 12, 31), 0),
            asset(4, date(2024, 1, 1), 3 * GIB as u64),
            asset(5, date(2023, 11, 20), GIB as u64 / 4),
        ];

        let buckets = monthly_growth(&assets);
        let months: Vec<String> = buckets.iter().map(|b| b.year_month.to_string()).collect();
        assert_eq!(months, vec!["2023-11", "2023-12", "2024-01", "2024-02"]);

        let mut prefix = 0.0;
        for window in buckets.windows(2) {
            assert!(window[1].cumulative_size_gb >= window[0].cumulative_size_gb);
        }
        for bucket in &buckets {
            prefix += bucket.file_size_gb;
            assert_eq!(bucket.cumulative_size_gb, prefix);
        }
        assert_eq!(buckets.last().unwrap().cumulative_size_gb, 8.75);
    }

    #[test]
    fn test_only_valid_timestamp_is_aggregated() {
        let raw = [-5_i64, 0, 50_000_000]
            .into_iter()
            .enumerate()
            .map(|(i, t)| MediaAsset {
                asset_id: i as i64,
                added_date: RawTimestamp::Integer(t),
                file_size: GIB,
            })
            .collect();

        let dated = date_assets(raw);
        let buckets = monthly_growth(&dated.rows);
        assert_eq!(buckets.len(), 1);
        assert_eq!(buckets[0].year_month.to_string(), "2002-08");
        assert_eq!(buckets[0].file_size_gb, 1.0);
    }

    #[test]
    fn test_huge_sizes_do_not_overflow() {
        let raw = (1..=3)
            .map(|id| MediaAsset {
                asset_id: id,
                added_date: RawTimestamp::Integer(50_000_000),
                file_size: i64::MAX,
            })
            .collect();

        let dated = date_assets(raw);
        assert_eq!(dated.dropped, 0);

        let buckets = monthly_growth(&dated.rows);
        assert_eq!(buckets.len(), 1);
        assert_eq!(buckets[0].file_size_bytes, 3 * i64::MAX as u128);
        let expected_gb = 3.0 * i64::MAX as f64 / BYTES_PER_GB;
        assert!((buckets[0].file_size_gb - expected_gb).abs() / expected_gb < 1e-12);
        assert!(buckets[0].cumulative_size_gb.is_finite());
    }

    #[test]
    fn test_rank_people_is_stable() {
        let people = vec![
            person(3, "Cara", 5),
            person(1, "Alice", 10),
            person(2, "Bob", 10),
        ];
        let ranked = rank_people(people);
        let names: Vec<&str> = ranked.iter().map(|p| p.display_name.as_str()).collect();
        assert_eq!(names, vec!["Alice", "Bob", "Cara"]);

        let ranked = rank_people(vec![
            person(1, "Alice", 10),
            person(2, "Bob", 10),
            person(3, "Cara", 5),
        ]);
        let names: Vec<&str> = ranked.iter().map(|p| p.display_name.as_str()).collect();
        assert_eq!(names, vec!["Alice", "Bob", "Cara"]);
    }

    #[test]
    fn test_top_n() {
        let rows = [1, 2, 3];
        assert_eq!(top_n(&rows, 2), &[1, 2]);
        assert_eq!(top_n(&rows, 20), &[1, 2, 3]);
        assert!(top_n(&rows, 0).is_empty());
    }

    #[test]
    fn test_people_timeline_fills_zeros() {
        let appearances = vec![
            appearance("Nova Starlight", date(2024, 1, 5)),
            appearance("Luna Moonbeam", date(2024, 1, 6)),
            appearance("Nova Starlight", date(2024, 1, 7)),
            appearance("Nova Starlight", date(2024, 3, 2)),
            appearance("Atlas Daybreak", date(2024, 3, 3)),
        ];

        let timeline = people_timeline(&appearances, 2);
        assert_eq!(timeline.people, vec!["Nova Starlight", "Luna Moonbeam"]);
        let months: Vec<String> = timeline.months.iter().map(|m| m.to_string()).collect();
        assert_eq!(months, vec!["2024-01", "2024-03"]);

        assert_eq!(timeline.count(0, 0), 2);
        assert_eq!(timeline.count(0, 1), 1);
        assert_eq!(timeline.count(1, 0), 1);
        assert_eq!(timeline.count(1, 1), 0);
        assert_eq!(timeline.max_count(), 2);
        assert_eq!(
            timeline.series(1),
            vec![
                (YearMonth::new(2024, 1).unwrap(), 1),
                (YearMonth::new(2024, 3).unwrap(), 0)
            ]
        );
    }

    #[test]
    fn test_people_timeline_ties_favor_first_seen() {
        let appearances = vec![
            appearance("B", date(2024, 1, 1)),
            appearance("A", date(2024, 1, 2)),
            appearance("C", date(2024, 1, 3)),
        ];
        let timeline = people_timeline(&appearances, 2);
        assert_eq!(timeline.people, vec!["B", "A"]);
    }

    #[test]
    fn test_people_timeline_empty() {
        let timeline = people_timeline(&[], 5);
        assert!(timeline.is_empty());
        assert!(timeline.people.is_empty());
        assert_eq!(timeline.max_count(), 0);
    }

    #[test]
    fn test_date_appearances() {
        let raw = vec![
            PersonAppearance {
                person_id: 1,
                person_name: "A".to_string(),
                added_date: seconds(date(2024, 1, 1)),
            },
            PersonAppearance {
                person_id: 1,
                person_name: "A".to_string(),
                added_date: RawTimestamp::Text("n/a".to_string()),
            },
        ];
        let dated = date_appearances(raw);
        assert_eq!(dated.dropped, 1);
        assert_eq!(dated.rows[0].added, date(2024, 1, 1));
    }
}

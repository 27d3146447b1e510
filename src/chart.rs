//! PNG charts for the growth and people pipelines.
//!
//! Categorical axes (months, people) are drawn on an `f64` axis where the
//! category with index `i` is centred on `i`. Tick labels are only printed
//! at whole-number positions.

use plotters::prelude::*;
use plotters::style::{FontTransform, TextStyle};
use std::error::Error;
use std::path::Path;

use crate::aggregate::{MonthlyBucket, PeopleTimeline};
use crate::db::Person;
use crate::error::{PipelineError, Result};

pub const GROWTH_PNG: &str = "photos_library_growth.png";
pub const PEOPLE_COUNT_PNG: &str = "photos_people_count.png";
pub const PEOPLE_TIMELINE_PNG: &str = "photos_people_timeline.png";

const SKY_BLUE: RGBColor = RGBColor(135, 206, 235);
const DARK_BLUE: RGBColor = RGBColor(0, 0, 139);
const GRID: RGBColor = RGBColor(220, 220, 220);

type DrawResult = std::result::Result<(), Box<dyn Error + Send + Sync>>;

/// Monthly growth bars above a cumulative size line.
pub fn render_growth(buckets: &[MonthlyBucket], path: &Path) -> Result<()> {
    draw_growth(buckets, path).map_err(render_error)?;
    tracing::info!("Rendered growth chart to {}", path.display());
    Ok(())
}

/// Horizontal bars of asset counts, highest on top.
pub fn render_people_count(people: &[Person], path: &Path) -> Result<()> {
    draw_people_count(people, path).map_err(render_error)?;
    tracing::info!("Rendered people chart to {}", path.display());
    Ok(())
}

/// One line per person over the months of the timeline.
pub fn render_people_timeline(timeline: &PeopleTimeline, path: &Path) -> Result<()> {
    draw_people_timeline(timeline, path).map_err(render_error)?;
    tracing::info!("Rendered people timeline to {}", path.display());
    Ok(())
}

fn render_error(err: Box<dyn Error + Send + Sync>) -> PipelineError {
    PipelineError::Render(err.to_string())
}

/// Label for a categorical tick: the category at a whole-number position,
/// empty between categories and outside the axis.
pub fn category_label(labels: &[String], position: f64) -> String {
    let nearest = position.round();
    if (position - nearest).abs() > 1e-6 || nearest < 0.0 {
        return String::new();
    }
    labels.get(nearest as usize).cloned().unwrap_or_default()
}

/// Upper axis bound with headroom above the largest value.
pub fn axis_max(max_value: f64) -> f64 {
    if max_value > 0.0 {
        max_value * 1.1
    } else {
        1.0
    }
}

fn category_range(count: usize) -> std::ops::Range<f64> {
    -0.5..(count.max(1) as f64 - 0.5)
}

fn month_label_style() -> TextStyle<'static> {
    ("sans-serif", 12)
        .into_font()
        .transform(FontTransform::Rotate90)
        .into()
}

fn draw_growth(buckets: &[MonthlyBucket], path: &Path) -> DrawResult {
    let root = BitMapBackend::new(path, (1500, 1000)).into_drawing_area();
    root.fill(&WHITE)?;
    let (upper, lower) = root.split_vertically(500);

    let labels: Vec<String> = buckets.iter().map(|b| b.year_month.to_string()).collect();
    let max_growth = buckets.iter().map(MonthlyBucket::growth_gb).fold(0.0, f64::max);
    let max_total = buckets.last().map(|b| b.cumulative_size_gb).unwrap_or(0.0);

    let mut bars = ChartBuilder::on(&upper)
        .caption("Monthly Growth of Photos Library (GB)", ("sans-serif", 24))
        .margin(15)
        .x_label_area_size(80)
        .y_label_area_size(70)
        .build_cartesian_2d(category_range(buckets.len()), 0f64..axis_max(max_growth))?;

    bars.configure_mesh()
        .disable_x_mesh()
        .light_line_style(GRID)
        .x_labels(buckets.len().max(1))
        .x_label_formatter(&|x| category_label(&labels, *x))
        .x_label_style(month_label_style())
        .x_desc("Month")
        .y_desc("Size Added (GB)")
        .draw()?;

    bars.draw_series(buckets.iter().enumerate().map(|(i, b)| {
        let x = i as f64;
        Rectangle::new([(x - 0.4, 0.0), (x + 0.4, b.growth_gb())], SKY_BLUE.filled())
    }))?;

    let mut line = ChartBuilder::on(&lower)
        .caption("Cumulative Size of Photos Library Over Time", ("sans-serif", 24))
        .margin(15)
        .x_label_area_size(80)
        .y_label_area_size(70)
        .build_cartesian_2d(category_range(buckets.len()), 0f64..axis_max(max_total))?;

    line.configure_mesh()
        .light_line_style(GRID)
        .x_labels(buckets.len().max(1))
        .x_label_formatter(&|x| category_label(&labels, *x))
        .x_label_style(month_label_style())
        .x_desc("Month")
        .y_desc("Total Size (GB)")
        .draw()?;

    let points: Vec<(f64, f64)> = buckets
        .iter()
        .enumerate()
        .map(|(i, b)| (i as f64, b.cumulative_size_gb))
        .collect();
    line.draw_series(LineSeries::new(points.iter().copied(), &DARK_BLUE))?;
    line.draw_series(
        points
            .iter()
            .map(|point| Circle::new(*point, 4, DARK_BLUE.filled())),
    )?;

    root.present()?;
    Ok(())
}

fn draw_people_count(people: &[Person], path: &Path) -> DrawResult {
    let root = BitMapBackend::new(path, (1200, 1000)).into_drawing_area();
    root.fill(&WHITE)?;

    // Highest count gets the top row.
    let labels: Vec<String> = people
        .iter()
        .rev()
        .map(|p| p.display_name.clone())
        .collect();
    let max_count = people.iter().map(|p| p.asset_count).max().unwrap_or(0) as f64;
    let title = format!("Top {} People in Your Photos Library", people.len());

    let mut chart = ChartBuilder::on(&root)
        .caption(title, ("sans-serif", 28))
        .margin(20)
        .x_label_area_size(50)
        .y_label_area_size(220)
        .build_cartesian_2d(0f64..axis_max(max_count) * 1.05, category_range(people.len()))?;

    chart
        .configure_mesh()
        .disable_y_mesh()
        .light_line_style(GRID)
        .y_labels(people.len().max(1))
        .y_label_formatter(&|y| category_label(&labels, *y))
        .x_desc("Number of Photos/Videos")
        .y_desc("Person")
        .draw()?;

    let rows = people.len();
    for (i, person) in people.iter().enumerate() {
        let y = (rows - 1 - i) as f64;
        let count = person.asset_count as f64;
        let color = Palette99::pick(i).to_rgba();

        chart.draw_series(std::iter::once(Rectangle::new(
            [(0.0, y - 0.4), (count, y + 0.4)],
            color.filled(),
        )))?;
        chart.draw_series(std::iter::once(Text::new(
            person.asset_count.to_string(),
            (count + max_count * 0.01 + 0.5, y + 0.15),
            ("sans-serif", 14).into_font().color(&BLACK),
        )))?;
    }

    root.present()?;
    Ok(())
}

fn draw_people_timeline(timeline: &PeopleTimeline, path: &Path) -> DrawResult {
    let root = BitMapBackend::new(path, (1500, 800)).into_drawing_area();
    root.fill(&WHITE)?;

    let labels: Vec<String> = timeline.months.iter().map(|m| m.to_string()).collect();
    let title = format!("Appearances of Top {} People Over Time", timeline.people.len());

    let mut chart = ChartBuilder::on(&root)
        .caption(title, ("sans-serif", 28))
        .margin(20)
        .x_label_area_size(80)
        .y_label_area_size(70)
        .build_cartesian_2d(
            category_range(timeline.months.len()),
            0f64..axis_max(timeline.max_count() as f64),
        )?;

    chart
        .configure_mesh()
        .light_line_style(GRID)
        .x_labels(timeline.months.len().max(1))
        .x_label_formatter(&|x| category_label(&labels, *x))
        .x_label_style(month_label_style())
        .x_desc("Date")
        .y_desc("Number of Photos/Videos")
        .draw()?;

    for (p, name) in timeline.people.iter().enumerate() {
        let color = Palette99::pick(p).to_rgba();
        let points: Vec<(f64, f64)> = timeline
            .series(p)
            .into_iter()
            .enumerate()
            .map(|(m, (_, count))| (m as f64, count as f64))
            .collect();

        chart
            .draw_series(LineSeries::new(points.iter().copied(), color.stroke_width(2)))?
            .label(name.as_str())
            .legend(move |(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], color.stroke_width(2)));
        chart.draw_series(points.iter().map(|point| Circle::new(*point, 3, color.filled())))?;
    }

    chart
        .configure_series_labels()
        .background_style(WHITE.mix(0.8))
        .border_style(BLACK)
        .draw()?;

    root.present()?;
    Ok(())
}

/// Hand a written chart to an image viewer without waiting for it.
///
/// Uses `viewer` when set, otherwise the platform opener. A viewer that
/// cannot be launched is logged and otherwise ignored.
pub fn display_chart(path: &Path, viewer: Option<&str>) {
    let opener = if let Some(viewer) = viewer {
        viewer
    } else {
        #[cfg(target_os = "macos")]
        {
            "open"
        }
        #[cfg(not(target_os = "macos"))]
        {
            "xdg-open"
        }
    };

    match std::process::Command::new(opener).arg(path).spawn() {
        Ok(_) => tracing::debug!("Opened {} with {}", path.display(), opener),
        Err(e) => tracing::warn!("Could not open {} with {}: {}", path.display(), opener, e),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::aggregate::{monthly_growth, people_timeline, DatedAppearance, DatedAsset};
    use chrono::NaiveDate;
    use tempfile::tempdir;

    fn day(y: i32, m: u32, d: u32) -> chrono::NaiveDateTime {
        NaiveDate::from_ymd_opt(y, m, d)
            .unwrap()
            .and_hms_opt(8, 0, 0)
            .unwrap()
    }

    fn assert_png(path: &Path) {
        let bytes = std::fs::read(path).unwrap();
        assert!(bytes.starts_with(b"\x89PNG"), "{} is not a PNG", path.display());
    }

    #[test]
    fn test_category_label() {
        let labels = vec!["2024-01".to_string(), "2024-02".to_string()];
        assert_eq!(category_label(&labels, 0.0), "2024-01");
        assert_eq!(category_label(&labels, 1.0), "2024-02");
        assert_eq!(category_label(&labels, 0.5), "");
        assert_eq!(category_label(&labels, -1.0), "");
        assert_eq!(category_label(&labels, 2.0), "");
    }

    #[test]
    fn test_axis_max() {
        assert_eq!(axis_max(0.0), 1.0);
        assert!((axis_max(10.0) - 11.0).abs() < 1e-9);
    }

    #[test]
    fn test_category_range_centres_categories() {
        assert_eq!(category_range(3), -0.5..2.5);
        assert_eq!(category_range(0), -0.5..0.5);
    }

    #[test]
    fn test_render_growth_writes_png() {
        let dir = tempdir().unwrap();
        let path = dir.path().join(GROWTH_PNG);
        let buckets = monthly_growth(&[
            DatedAsset { asset_id: 1, added: day(2024, 1, 3), file_size: 1 << 30 },
            DatedAsset { asset_id: 2, added: day(2024, 3, 9), file_size: 1 << 29 },
        ]);

        render_growth(&buckets, &path).unwrap();
        assert_png(&path);
    }

    #[test]
    fn test_render_people_count_writes_png() {
        let dir = tempdir().unwrap();
        let path = dir.path().join(PEOPLE_COUNT_PNG);
        let people = vec![
            Person {
                person_id: 1,
                display_name: "Caspian Ceruleanfall".to_string(),
                face_count: 4,
                asset_count: 3,
                original_name: None,
            },
            Person {
                person_id: 2,
                display_name: "Pixel Sienna".to_string(),
                face_count: 1,
                asset_count: 1,
                original_name: None,
            },
        ];

        render_people_count(&people, &path).unwrap();
        assert_png(&path);
    }

    #[test]
    fn test_render_people_timeline_writes_png() {
        let dir = tempdir().unwrap();
        let path = dir.path().join(PEOPLE_TIMELINE_PNG);
        let appearances: Vec<DatedAppearance> = [("Nova", day(2024, 1, 2)), ("Luna", day(2024, 2, 5))]
            .into_iter()
            .map(|(name, added)| DatedAppearance {
                person_id: 0,
                person_name: name.to_string(),
                added,
            })
            .collect();
        let timeline = people_timeline(&appearances, 5);

        render_people_timeline(&timeline, &path).unwrap();
        assert_png(&path);
    }
}

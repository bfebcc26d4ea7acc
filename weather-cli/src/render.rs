//! Terminal rendering of dashboard state.

use comfy_table::{
    Attribute, Cell, CellAlignment, Color, ContentArrangement, Table, modifiers::UTF8_ROUND_CORNERS,
    presets::UTF8_FULL,
};
use weather_core::{
    ChartData, Dashboard, Paginator, Query, Theme, ValidationErrors, View, WeatherResult,
    format::{TemperatureBand, coordinate_label, date_range_label},
    model::Rgb,
    table::{TableRow, headers},
};

const SPARK_BARS: [char; 8] = ['▁', '▂', '▃', '▄', '▅', '▆', '▇', '█'];

pub fn print_dashboard(dashboard: &Dashboard, theme: Theme) {
    match dashboard.view() {
        View::Idle => println!("Enter location coordinates and date range to view weather data"),
        View::Loading => println!("Loading weather data..."),
        View::Failed(message) => println!("Error: {message}"),
        View::Loaded(result) => {
            println!("{}", location_line(result));
            println!();
            match dashboard.chart() {
                Some(chart) if !chart.datasets.is_empty() => println!("{}", chart_table(&chart, theme)),
                _ => println!("No series selected."),
            }
            println!();
            println!("{}", data_table(&dashboard.table_rows(), theme));
            println!("{}", pagination_line(dashboard.paginator()));
        }
    }
}

pub fn print_validation_errors(errors: &ValidationErrors) {
    for (field, message) in errors.iter() {
        eprintln!("  {field}: {message}");
    }
}

pub fn print_recent(queries: &[Query]) {
    if queries.is_empty() {
        println!("No recent queries.");
        return;
    }

    println!("Recent Searches");
    for (i, query) in queries.iter().enumerate() {
        println!("  {}. {}  {}", i + 1, coordinate_label(query), date_range_label(query));
    }
}

fn location_line(result: &WeatherResult) -> String {
    let loc = &result.location;
    format!(
        "{:.4}, {:.4}  elevation {:.0} m  {} ({})  {} days",
        loc.latitude,
        loc.longitude,
        loc.elevation,
        loc.timezone,
        loc.timezone_abbreviation,
        result.len(),
    )
}

fn base_table(theme: Theme, header: Vec<&str>) -> Table {
    let header_color = if theme.is_dark() { Color::White } else { Color::Black };

    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(
            header
                .into_iter()
                .map(|h| Cell::new(h).fg(header_color).add_attribute(Attribute::Bold))
                .collect::<Vec<_>>(),
        );
    table
}

fn rgb(color: Rgb) -> Color {
    Color::Rgb { r: color.0, g: color.1, b: color.2 }
}

fn chart_table(chart: &ChartData, theme: Theme) -> Table {
    let mut table = base_table(theme, vec!["Series", "Trend", "Min", "Max"]);
    let bounds = chart.value_bounds();

    for dataset in &chart.datasets {
        let present = dataset.points.iter().flatten().copied();
        let min = present.clone().reduce(f64::min);
        let max = present.reduce(f64::max);

        table.add_row(vec![
            Cell::new(dataset.label).fg(rgb(dataset.color)),
            Cell::new(sparkline(&dataset.points, bounds)).fg(rgb(dataset.color)),
            Cell::new(temperature(min)).set_alignment(CellAlignment::Right),
            Cell::new(temperature(max)).set_alignment(CellAlignment::Right),
        ]);
    }

    table
}

fn temperature(value: Option<f64>) -> String {
    value.map(|v| format!("{v:.1}°C")).unwrap_or_else(|| "N/A".to_string())
}

/// One bar per point scaled into `bounds`; gaps stay blank.
fn sparkline(points: &[Option<f64>], bounds: Option<(f64, f64)>) -> String {
    let Some((lo, hi)) = bounds else {
        return " ".repeat(points.len());
    };
    let span = hi - lo;
    let top = SPARK_BARS.len() - 1;

    points
        .iter()
        .map(|p| match p {
            None => ' ',
            Some(_) if span <= f64::EPSILON => SPARK_BARS[top / 2],
            Some(v) => {
                let idx = (((v - lo) / span) * top as f64).round() as usize;
                SPARK_BARS[idx.min(top)]
            }
        })
        .collect()
}

fn band_color(band: TemperatureBand, theme: Theme) -> Option<Color> {
    match (band, theme.is_dark()) {
        (TemperatureBand::Hot, false) => Some(Color::Red),
        (TemperatureBand::Hot, true) => Some(Color::Rgb { r: 248, g: 113, b: 113 }),
        (TemperatureBand::Cold, false) => Some(Color::Blue),
        (TemperatureBand::Cold, true) => Some(Color::Rgb { r: 96, g: 165, b: 250 }),
        (TemperatureBand::Missing, false) => Some(Color::Grey),
        (TemperatureBand::Missing, true) => Some(Color::DarkGrey),
        (TemperatureBand::Mild, _) => None,
    }
}

fn data_table(rows: &[TableRow], theme: Theme) -> Table {
    let mut table = base_table(theme, headers());

    for row in rows {
        let mut cells = vec![Cell::new(&row.label)];
        for cell in &row.cells {
            let mut c = Cell::new(&cell.text).set_alignment(CellAlignment::Right);
            if let Some(color) = band_color(cell.band, theme) {
                c = c.fg(color);
            }
            cells.push(c);
        }
        table.add_row(cells);
    }

    table
}

/// `« ‹ 1 [2] 3 › »  Showing 11 to 20 of 23 days`; just the summary on a single page.
fn pagination_line(paginator: &Paginator) -> String {
    let summary = paginator.summary();
    if !paginator.needs_controls() {
        return summary;
    }

    let buttons: Vec<String> = paginator
        .page_buttons()
        .map(|n| if n == paginator.current_page() { format!("[{n}]") } else { n.to_string() })
        .collect();

    let back = if paginator.has_previous() { "« ‹" } else { "  " };
    let forward = if paginator.has_next() { "› »" } else { "  " };

    format!(
        "{back} {} {forward}  {summary}  (page {} of {})",
        buttons.join(" "),
        paginator.current_page(),
        paginator.total_pages()
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use weather_core::PageSize;

    #[test]
    fn sparkline_scales_between_bounds() {
        let line = sparkline(&[Some(0.0), Some(5.0), None, Some(10.0)], Some((0.0, 10.0)));
        assert_eq!(line, "▁▅ █");
    }

    #[test]
    fn sparkline_flat_series_uses_middle_bar() {
        let line = sparkline(&[Some(3.0), Some(3.0)], Some((3.0, 3.0)));
        assert_eq!(line.chars().count(), 2);
        assert!(line.chars().all(|c| c == SPARK_BARS[3]));
    }

    #[test]
    fn pagination_line_marks_current_page() {
        let mut p = Paginator::new(23, PageSize::Ten);
        p.go_to(2);
        let line = pagination_line(&p);
        assert!(line.contains("1 [2] 3"));
        assert!(line.contains("Showing 11 to 20 of 23 days"));
    }

    #[test]
    fn single_page_shows_summary_only() {
        let p = Paginator::new(3, PageSize::Ten);
        assert_eq!(pagination_line(&p), "Showing 1 to 3 of 3 days");
    }

    #[test]
    fn mild_cells_are_uncoloured() {
        assert_eq!(band_color(TemperatureBand::Mild, Theme::Dark), None);
        assert_eq!(band_color(TemperatureBand::Hot, Theme::Light), Some(Color::Red));
    }
}

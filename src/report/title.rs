//! Report titles.

use crate::models::PeriodWindow;

/// Separates title lines inside a configured title.
pub const TITLE_LINE_SEPARATOR: char = '!';

const HEADING_MARK: &str = "##### ";

/// The full title: `base` followed by the window's year label.
///
/// ```
/// use allocation_engine::config::WindowConfig;
/// use allocation_engine::models::PeriodWindow;
/// use allocation_engine::report::report_title;
///
/// let window = PeriodWindow::new(2024, 7, 12, &WindowConfig::default()).unwrap();
/// assert_eq!(
///     report_title("Yearly Department FTE Trend", &window),
///     "Yearly Department FTE Trend 2024/2025"
/// );
/// ```
pub fn report_title(base: &str, window: &PeriodWindow) -> String {
    format!("{} {}", base, window.title_suffix())
}

/// Splits a title into its trimmed lines.
pub fn title_lines(title: &str) -> Vec<&str> {
    title.split(TITLE_LINE_SEPARATOR).map(str::trim).collect()
}

/// Renders a title as markdown headings, one per title line.
pub fn title_heading(title: &str) -> String {
    title_lines(title)
        .into_iter()
        .map(|line| format!("{}{}\n", HEADING_MARK, line))
        .collect()
}

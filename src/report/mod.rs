//! Presentation adapter.
//!
//! Renders aggregate tables as markdown documents. Rounding and number
//! formatting happen here and nowhere else.

mod markdown;
mod title;

pub use markdown::{format_number, render_cost_centre_section, render_markdown};
pub use title::{TITLE_LINE_SEPARATOR, report_title, title_heading, title_lines};

use serde::Serialize;

/// A rendered report: its title and one markdown section per page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RenderedReport {
    /// Full title, including the year label.
    pub title: String,
    /// Markdown sections; trend reports have one, breakdowns one per cost centre.
    pub sections: Vec<String>,
}

impl RenderedReport {
    /// The whole report as one markdown document, with the title heading
    /// repeated above every section.
    pub fn to_markdown(&self) -> String {
        let heading = title_heading(&self.title);
        self.sections
            .iter()
            .map(|section| format!("{}\n\n{}", heading, section))
            .collect::<Vec<_>>()
            .join("\n")
    }
}

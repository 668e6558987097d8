//! Markdown rendering of aggregate tables.
//!
//! Layout: a header row of label columns and period labels, one line per
//! category row, two blank spacer rows and a bold Total row. Cells without
//! data render as `-`.

use rust_decimal::{Decimal, RoundingStrategy};

use crate::models::{AggregateTable, CostCentreBreakdown, RowKind};

const MISSING_CELL: &str = "-";

/// Formats a value with thousands separators and exactly `decimals` places.
///
/// Halves round away from zero.
///
/// # Example
///
/// ```
/// use allocation_engine::report::format_number;
/// use rust_decimal::Decimal;
///
/// assert_eq!(format_number(Decimal::new(1234567, 3), 2), "1,234.57");
/// assert_eq!(format_number(Decimal::new(25, 1), 0), "3");
/// ```
pub fn format_number(value: Decimal, decimals: u32) -> String {
    let mut rounded = value.round_dp_with_strategy(decimals, RoundingStrategy::MidpointAwayFromZero);
    rounded.rescale(decimals);

    let text = rounded.abs().to_string();
    let (int_part, frac_part) = match text.split_once('.') {
        Some((int_part, frac_part)) => (int_part, Some(frac_part)),
        None => (text.as_str(), None),
    };

    let digits = int_part.len();
    let mut grouped = String::with_capacity(digits + digits / 3 + 1);
    if rounded.is_sign_negative() && !rounded.is_zero() {
        grouped.push('-');
    }
    for (i, c) in int_part.chars().enumerate() {
        if i > 0 && (digits - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(c);
    }

    match frac_part {
        Some(frac) => format!("{}.{}", grouped, frac),
        None => grouped,
    }
}

/// Renders a table as a markdown pipe table.
pub fn render_markdown(table: &AggregateTable, decimals: u32) -> String {
    let width = table.label_columns.len() + table.periods.len();

    let header: Vec<String> = table
        .label_columns
        .iter()
        .cloned()
        .chain(table.periods.iter().map(ToString::to_string))
        .collect();

    let mut lines = vec![pipe_row(&header), pipe_row(&vec!["---".to_string(); width])];

    for (index, row) in table.rows.iter().enumerate() {
        let values = row.values.iter().map(|value| match value {
            Some(value) => format_number(*value, decimals),
            None => MISSING_CELL.to_string(),
        });

        match row.kind {
            RowKind::Category => {
                let cells: Vec<String> = table.display_labels(index).into_iter().chain(values).collect();
                lines.push(pipe_row(&cells));
            }
            RowKind::Total => {
                let spacer = vec![String::new(); width];
                lines.push(pipe_row(&spacer));
                lines.push(pipe_row(&spacer));

                let cells: Vec<String> = table
                    .display_labels(index)
                    .into_iter()
                    .chain(values)
                    .map(|cell| bold(&cell))
                    .collect();
                lines.push(pipe_row(&cells));
            }
        }
    }

    let mut markdown = lines.join("\n");
    markdown.push('\n');
    markdown
}

/// Renders one cost centre's table under a `Cost Centre : NAME (CODE)` heading.
pub fn render_cost_centre_section(breakdown: &CostCentreBreakdown, decimals: u32) -> String {
    format!(
        "##### Cost Centre : {} ({})\n\n{}",
        breakdown.cost_centre_name,
        breakdown.cost_centre_code,
        render_markdown(&breakdown.table, decimals)
    )
}

fn bold(cell: &str) -> String {
    if cell.is_empty() {
        String::new()
    } else {
        format!("**{}**", cell)
    }
}

fn pipe_row(cells: &[String]) -> String {
    format!("| {} |", cells.join(" | "))
}

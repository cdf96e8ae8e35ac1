use super::common::KpiColumn;
use crate::Result;
use crate::kpi::KpiTable;
use core::fmt::Write;
use owo_colors::OwoColorize;
use strum::IntoEnumIterator;

/// Render the KPI table as aligned text columns.
pub fn generate<W: Write>(kpis: &KpiTable, use_colors: bool, writer: &mut W) -> Result<()> {
    if kpis.is_empty() {
        writeln!(writer, "No KPI data")?;
        return Ok(());
    }

    let headers: Vec<String> = KpiColumn::iter().map(|c| c.to_string()).collect();
    let rows: Vec<Vec<String>> = kpis
        .iter()
        .map(|(user, kpi)| {
            KpiColumn::iter()
                .map(|column| match column {
                    KpiColumn::User => user.to_string(),
                    _ => column.cell(user, kpi),
                })
                .collect()
        })
        .collect();

    let widths: Vec<usize> = headers
        .iter()
        .enumerate()
        .map(|(i, header)| {
            rows.iter()
                .map(|row| display_width(&row[i]))
                .chain([display_width(header)])
                .max()
                .unwrap_or(0)
        })
        .collect();

    let header_line = join_aligned(&headers, &widths);
    if use_colors {
        writeln!(writer, "{}", header_line.bold())?;
    } else {
        writeln!(writer, "{header_line}")?;
    }

    let rule: usize = widths.iter().sum::<usize>() + 2 * widths.len().saturating_sub(1);
    writeln!(writer, "{}", "─".repeat(rule))?;

    for ((user, _), row) in kpis.iter().zip(&rows) {
        let line = join_aligned(row, &widths);
        if use_colors && !user.is_resolved() {
            writeln!(writer, "{}", line.dimmed())?;
        } else {
            writeln!(writer, "{line}")?;
        }
    }

    Ok(())
}

/// Left-align the first column and right-align the numeric ones.
fn join_aligned(cells: &[String], widths: &[usize]) -> String {
    let mut line = String::new();
    for (i, (cell, &width)) in cells.iter().zip(widths).enumerate() {
        let _ = if i == 0 {
            write!(line, "{cell:<width$}")
        } else {
            write!(line, "  {cell:>width$}")
        };
    }
    line.trim_end().to_string()
}

/// Width of a cell as counted by the `{:<width$}` padding, in characters rather than bytes.
fn display_width(cell: &str) -> usize {
    cell.chars().count()
}

/// A one-line summary of a fetch/filter step, e.g. `Test runs: 12 fetched, 3 excluded, 9 kept`.
#[must_use]
pub fn count_line(label: &str, fetched: usize, kept: usize) -> String {
    format!(
        "{label}: {fetched} fetched, {} excluded, {kept} kept",
        fetched.saturating_sub(kept)
    )
}

use super::common::{self, DEFECT_HEADERS, KpiColumn, TESTRUN_HEADERS};
use crate::Result;
use crate::kpi::{KpiTable, UserKpi};
use crate::records::{DefectProjection, TestRunProjection};
use rust_xlsxwriter::{DocProperties, Format, FormatAlign, Workbook, Worksheet};
use std::io::Write;
use strum::IntoEnumIterator;

/// Write the KPI workbook with its "KP", "Defect" and "Test run" sheets.
#[expect(unused_results, reason = "rust_xlsxwriter methods return &mut Worksheet for chaining")]
pub fn generate<W: Write>(
    kpis: &KpiTable,
    defects: &[DefectProjection],
    testruns: &[TestRunProjection],
    writer: &mut W,
) -> Result<()> {
    let mut workbook = Workbook::new();

    let properties = DocProperties::new().set_author("jama-kpi");
    workbook.set_properties(&properties);

    let header_format = Format::new().set_bold().set_align(FormatAlign::Left);
    let count_format = Format::new();
    let ratio_format = Format::new().set_num_format("0.00");

    let worksheet = workbook.add_worksheet().set_name("KP")?;
    write_headers(worksheet, KpiColumn::iter().map(|c| c.to_string()), &header_format)?;
    for (row, (user, kpi)) in (1..).zip(kpis.iter()) {
        for (col, column) in (0..).zip(KpiColumn::iter()) {
            if let Some(number) = kpi_number(column, kpi) {
                let format = match column {
                    KpiColumn::Productivity | KpiColumn::DefectRate => &ratio_format,
                    _ => &count_format,
                };
                worksheet.write_number_with_format(row, col, number, format)?;
            } else if let Some(name) = user.as_deref() {
                worksheet.write_string(row, col, name)?;
            }
        }
    }
    worksheet.set_freeze_panes(1, 0)?;
    worksheet.autofit();

    let worksheet = workbook.add_worksheet().set_name("Defect")?;
    write_headers(worksheet, DEFECT_HEADERS, &header_format)?;
    for (row, defect) in (1..).zip(defects) {
        write_text_row(worksheet, row, common::defect_cells(defect))?;
    }
    worksheet.set_freeze_panes(1, 0)?;
    worksheet.autofit();

    let worksheet = workbook.add_worksheet().set_name("Test run")?;
    write_headers(worksheet, TESTRUN_HEADERS, &header_format)?;
    for (row, testrun) in (1..).zip(testruns) {
        write_text_row(worksheet, row, common::testrun_cells(testrun))?;
    }
    worksheet.set_freeze_panes(1, 0)?;
    worksheet.autofit();

    let data = workbook.save_to_buffer()?;
    writer.write_all(&data)?;

    Ok(())
}

#[expect(unused_results, reason = "rust_xlsxwriter methods return &mut Worksheet for chaining")]
fn write_headers<S: AsRef<str>>(worksheet: &mut Worksheet, headers: impl IntoIterator<Item = S>, format: &Format) -> Result<()> {
    for (col, header) in (0..).zip(headers) {
        worksheet.write_string_with_format(0, col, header.as_ref(), format)?;
    }
    Ok(())
}

/// Write one row of optional text cells. Absent values leave the cell blank.
#[expect(unused_results, reason = "rust_xlsxwriter methods return &mut Worksheet for chaining")]
fn write_text_row(worksheet: &mut Worksheet, row: u32, cells: [Option<&str>; 5]) -> Result<()> {
    for (col, cell) in (0..).zip(cells) {
        if let Some(text) = cell {
            worksheet.write_string(row, col, text)?;
        }
    }
    Ok(())
}

#[expect(clippy::cast_precision_loss, reason = "Intentional conversion to f64 for Excel output")]
const fn kpi_number(column: KpiColumn, kpi: &UserKpi) -> Option<f64> {
    match column {
        KpiColumn::User => None,
        KpiColumn::TestrunCount => Some(kpi.testrun_count as f64),
        KpiColumn::DefectCount => Some(kpi.defect_count as f64),
        KpiColumn::Days => Some(kpi.distinct_days as f64),
        KpiColumn::Productivity => Some(kpi.productivity),
        KpiColumn::DefectRate => Some(kpi.defect_rate),
    }
}

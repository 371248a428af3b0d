use crate::analysis::report::{
    build_report, parse_window, report_file_name, select_rows, NOTHING_TO_EXPORT_MESSAGE,
};
use crate::commands::db;
use crate::commands::settings::load_effective_settings;
use crate::error::{self, command_error, FundError};
use crate::models::report::{ExportOutcome, Report, ReportFilter, ReportRow};
use crate::models::session::SessionState;
use csv::WriterBuilder;
use std::fs;
use std::io::Write;
use std::path::Path;

#[cfg(feature = "desktop")]
#[tauri::command]
pub async fn load_report(
    data_dir: String,
    filter: ReportFilter,
    sessions: tauri::State<'_, SessionState>,
) -> Result<Report, String> {
    load_report_internal(&data_dir, &filter, sessions.inner())
        .map_err(|e| command_error("Load report", e))
}

pub fn load_report_internal(data_dir: &str, filter: &ReportFilter, sessions: &SessionState) -> error::Result<Report> {
    sessions.require_admin()?;
    let filter = with_default_status(data_dir, filter)?;
    let rows = report_rows(data_dir, &filter)?;
    Ok(build_report(rows))
}

/// Status goes to the store query; the date window is applied in memory.
fn report_rows(data_dir: &str, filter: &ReportFilter) -> error::Result<Vec<ReportRow>> {
    let window = parse_window(filter)?;
    let conn = db::get_db_connection(data_dir)?;
    let records = db::load_requests(&conn, window.status)?;
    Ok(select_rows(&records, &window))
}

fn with_default_status(data_dir: &str, filter: &ReportFilter) -> error::Result<ReportFilter> {
    let has_status = filter.status.as_deref().is_some_and(|s| !s.trim().is_empty());
    if has_status {
        return Ok(filter.clone());
    }
    let settings = load_effective_settings(data_dir).map_err(FundError::Settings)?;
    Ok(ReportFilter {
        status: Some(settings.default_report_status),
        ..filter.clone()
    })
}

#[cfg(feature = "desktop")]
#[tauri::command]
pub async fn export_report(
    data_dir: String,
    filter: ReportFilter,
    sessions: tauri::State<'_, SessionState>,
) -> Result<ExportOutcome, String> {
    export_report_internal(&data_dir, &filter, sessions.inner())
        .map_err(|e| command_error("Export report", e))
}

/// Writes the filtered report as CSV under the configured export directory.
///
/// The file is named after the effective filter, so a status filled in from
/// `defaultReportStatus` shows up in the name.
pub fn export_report_internal(
    data_dir: &str,
    filter: &ReportFilter,
    sessions: &SessionState,
) -> error::Result<ExportOutcome> {
    sessions.require_admin()?;
    let filter = with_default_status(data_dir, filter)?;
    let rows = report_rows(data_dir, &filter)?;
    if rows.is_empty() {
        return Err(FundError::Export(NOTHING_TO_EXPORT_MESSAGE.to_string()));
    }

    let settings = load_effective_settings(data_dir).map_err(FundError::Settings)?;
    let dir = Path::new(data_dir).join(&settings.export_directory);
    fs::create_dir_all(&dir)?;

    let file_name = report_file_name(&filter);
    let path = dir.join(&file_name);
    let file = fs::File::create(&path)?;
    write_rows(file, &rows)?;

    log::info!("exported {} rows to {}", rows.len(), path.display());
    Ok(ExportOutcome {
        file_name,
        path: path.to_string_lossy().to_string(),
        row_count: rows.len(),
    })
}

pub fn write_rows<W: Write>(w: W, rows: &[ReportRow]) -> error::Result<()> {
    let mut writer = WriterBuilder::new().from_writer(w);
    for row in rows {
        writer.serialize(row)?;
    }
    writer.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn csv_has_header_row_and_quotes_commas() {
        let rows = vec![ReportRow {
            user: "ana@example.com".to_string(),
            amount: "100".to_string(),
            reason: "Paper, ink".to_string(),
            status: "Approved".to_string(),
            date: "2024-03-10 12:00:00".to_string(),
            money_taken_by: "-".to_string(),
        }];

        let mut out = Vec::new();
        write_rows(&mut out, &rows).expect("write csv");
        let text = String::from_utf8(out).expect("utf8");
        let mut lines = text.lines();

        assert_eq!(lines.next(), Some("User,Amount,Reason,Status,Date,Money Taken By"));
        assert_eq!(
            lines.next(),
            Some("ana@example.com,100,\"Paper, ink\",Approved,2024-03-10 12:00:00,-")
        );
    }
}

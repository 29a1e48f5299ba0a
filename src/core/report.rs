use crate::domain::model::ScanReport;
use crate::utils::error::{Result, ScanError};
use serde::Serialize;
use serde_json::ser::{PrettyFormatter, Serializer};
use std::path::Path;

pub const FILE_INDENT: &[u8] = b"  ";
pub const CONSOLE_INDENT: &[u8] = b"    ";

/// 以指定縮排輸出 JSON，非 ASCII 字元不跳脫
pub fn render_json(report: &ScanReport, indent: &[u8]) -> Result<Vec<u8>> {
    let mut buffer = Vec::new();
    let formatter = PrettyFormatter::with_indent(indent);
    let mut serializer = Serializer::with_formatter(&mut buffer, formatter);
    report.serialize(&mut serializer)?;
    Ok(buffer)
}

pub fn render_console(report: &ScanReport) -> Result<String> {
    let bytes = render_json(report, CONSOLE_INDENT)?;
    Ok(String::from_utf8_lossy(&bytes).into_owned())
}

/// `index,message`，每則訊息一列
pub fn render_csv(report: &ScanReport) -> Result<Vec<u8>> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    writer.write_record(["index", "message"])?;
    for (index, message) in report.messages.iter().enumerate() {
        writer.write_record([index.to_string().as_str(), message.as_str()])?;
    }
    writer
        .into_inner()
        .map_err(|e| ScanError::IoError(e.into_error()))
}

/// CSV 檔名；輸出檔本身已是 `.csv` 時改用 `<stem>.messages.csv`，避免覆寫 JSON 報告
pub fn csv_file_name(output_file: &str) -> String {
    let path = Path::new(output_file);
    let extension = if path.extension().is_some_and(|ext| ext == "csv") {
        "messages.csv"
    } else {
        "csv"
    };
    path.with_extension(extension).to_string_lossy().into_owned()
}

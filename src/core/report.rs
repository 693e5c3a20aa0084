use crate::domain::model::{BusinessRecord, Lead};
use crate::domain::ports::Storage;
use crate::utils::error::{LeadGenError, Result};

const TABLE_HEADERS: [&str; 8] = [
    "Name", "Category", "Location", "Phone", "Website", "Rating", "Reviews", "Priority",
];
const TABLE_WIDTHS: [usize; 8] = [30, 20, 20, 15, 30, 8, 8, 10];

pub const LEADS_CSV_HEADER: [&str; 11] = [
    "name",
    "category",
    "location",
    "phone",
    "website",
    "rating",
    "reviews",
    "priority",
    "reasoning",
    "has_online_presence",
    "outreach_message",
];

pub const RAW_CSV_HEADER: [&str; 11] = [
    "name",
    "category",
    "location",
    "phone",
    "website",
    "rating",
    "reviews",
    "address",
    "hours",
    "gps_coordinates",
    "data_id",
];

fn truncate(text: &str, width: usize) -> String {
    if text.chars().count() <= width {
        text.to_string()
    } else {
        let kept: String = text.chars().take(width.saturating_sub(3)).collect();
        format!("{}...", kept)
    }
}

fn cell(text: &str, width: usize) -> String {
    format!("{:<width$}", truncate(text, width), width = width)
}

fn opt_str(value: &Option<String>) -> String {
    value.clone().unwrap_or_default()
}

fn opt_num<T: ToString>(value: &Option<T>) -> String {
    value.as_ref().map(|v| v.to_string()).unwrap_or_default()
}

/// Render the fixed-column summary table. Values are truncated to their
/// column width. Empty input renders a notice line instead of a table.
pub fn render_table(leads: &[Lead]) -> String {
    if leads.is_empty() {
        return "No leads to display.".to_string();
    }

    let header_line = TABLE_HEADERS
        .iter()
        .zip(TABLE_WIDTHS.iter())
        .map(|(h, w)| cell(h, *w))
        .collect::<Vec<_>>()
        .join(" | ");

    let mut lines = vec![header_line.clone(), "-".repeat(header_line.len())];

    for lead in leads {
        let record = &lead.record;
        let row = [
            record.name.clone(),
            record.category.clone(),
            record.location.clone(),
            opt_str(&record.phone),
            opt_str(&record.website),
            opt_num(&record.rating),
            opt_num(&record.reviews),
            lead.verdict.priority.as_str().to_string(),
        ];
        lines.push(
            row.iter()
                .zip(TABLE_WIDTHS.iter())
                .map(|(value, w)| cell(value, *w))
                .collect::<Vec<_>>()
                .join(" | "),
        );
    }

    lines.join("\n")
}

/// Serialize leads into the fixed 11-column CSV. Missing fields render as
/// empty strings.
pub fn to_csv(leads: &[Lead]) -> Result<Vec<u8>> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    writer.write_record(&LEADS_CSV_HEADER)?;

    for lead in leads {
        let record = &lead.record;
        let verdict = &lead.verdict;
        writer.write_record(&[
            record.name.clone(),
            record.category.clone(),
            record.location.clone(),
            opt_str(&record.phone),
            opt_str(&record.website),
            opt_num(&record.rating),
            opt_num(&record.reviews),
            verdict.priority.as_str().to_string(),
            verdict.reasoning.clone(),
            verdict.has_online_presence.as_str().to_string(),
            lead.outreach.clone().unwrap_or_default(),
        ])?;
    }

    finish_csv(writer)
}

/// Serialize unevaluated search results for the raw fetch binary.
pub fn raw_to_csv(records: &[BusinessRecord]) -> Result<Vec<u8>> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    writer.write_record(&RAW_CSV_HEADER)?;

    for record in records {
        writer.write_record(&[
            record.name.clone(),
            record.category.clone(),
            record.location.clone(),
            opt_str(&record.phone),
            opt_str(&record.website),
            opt_num(&record.rating),
            opt_num(&record.reviews),
            opt_str(&record.address),
            opt_str(&record.hours),
            record
                .gps_coordinates
                .map(|gps| format!("{},{}", gps.latitude, gps.longitude))
                .unwrap_or_default(),
            opt_str(&record.data_id),
        ])?;
    }

    finish_csv(writer)
}

fn finish_csv(writer: csv::Writer<Vec<u8>>) -> Result<Vec<u8>> {
    writer.into_inner().map_err(|e| {
        LeadGenError::IoError(std::io::Error::new(std::io::ErrorKind::Other, e.to_string()))
    })
}

/// Write the leads CSV through the storage port. Returns whether a file was
/// written; empty input writes nothing.
pub async fn save_csv<S: Storage>(storage: &S, filename: &str, leads: &[Lead]) -> Result<bool> {
    if leads.is_empty() {
        tracing::info!("No leads to save, skipping CSV write");
        return Ok(false);
    }

    let bytes = to_csv(leads)?;
    storage.write_file(filename, &bytes).await?;
    Ok(true)
}

use std::fmt::Write;

use chrono::{DateTime, Local, Utc};

use regwatch_core::config::DisplayConfig;
use regwatch_core::pdf::PdfStatus;
use regwatch_core::{Digest, DigestEntry};

const LIST_DATE_FORMAT: &str = "%d %b %Y, %H:%M:%S";
const TABLE_DATE_FORMAT: &str = "%d-%m-%Y %H:%M";
const TABLE_TITLE_WIDTH: usize = 60;
const RULE: &str = "---";

pub fn format_timestamp(dt: &DateTime<Utc>, format: &str, local_time: bool) -> String {
    if local_time {
        dt.with_timezone(&Local).format(format).to_string()
    } else {
        dt.format(format).to_string()
    }
}

/// Description as wrapped plain text, or untouched when `raw`
pub fn description_text(description: &str, width: usize, raw: bool) -> String {
    if raw {
        return description.trim().to_string();
    }
    html2text::from_read(description.as_bytes(), width.max(20))
        .map(|text| text.trim().to_string())
        .unwrap_or_else(|_| description.trim().to_string())
}

fn pdf_line(status: &PdfStatus) -> String {
    match status {
        PdfStatus::Found(url) => format!("PDF: {}", url),
        PdfStatus::NotFound => "PDF: not found".to_string(),
        PdfStatus::Skipped => "PDF: lookup skipped".to_string(),
    }
}

fn pdf_cell(status: &PdfStatus) -> String {
    match status {
        PdfStatus::Found(url) => url.to_string(),
        PdfStatus::NotFound => "not found".to_string(),
        PdfStatus::Skipped => "-".to_string(),
    }
}

pub fn empty_message(window_weeks: u32) -> String {
    format!(
        "No recent circulars, master circulars, or regulation/amendment updates found in the last {} weeks.",
        window_weeks
    )
}

pub fn render_entry(ordinal: usize, entry: &DigestEntry, display: &DisplayConfig, raw: bool) -> String {
    let record = &entry.record;
    let mut out = String::new();

    let _ = writeln!(out, "{}. {}", ordinal, record.title());
    if !record.link().is_empty() {
        let _ = writeln!(out, "   {}", record.link());
    }
    let _ = writeln!(
        out,
        "   Published: {}",
        format_timestamp(&record.pub_date, LIST_DATE_FORMAT, display.local_time)
    );

    let description = description_text(record.description(), display.description_width, raw);
    if !description.is_empty() {
        out.push('\n');
        for line in description.lines() {
            let _ = writeln!(out, "   {}", line);
        }
    }

    out.push('\n');
    let _ = writeln!(out, "   {}", pdf_line(&entry.pdf));
    out
}

pub fn render_list(digest: &Digest, display: &DisplayConfig, raw: bool) -> String {
    if digest.is_empty() {
        return empty_message(digest.window_weeks);
    }

    digest
        .entries
        .iter()
        .enumerate()
        .map(|(i, entry)| render_entry(i + 1, entry, display, raw))
        .collect::<Vec<_>>()
        .join(&format!("{}\n", RULE))
}

/// Cut to at most `max_chars` characters, marking the cut with "..."
fn truncate(text: &str, max_chars: usize) -> String {
    if text.chars().count() <= max_chars {
        return text.to_string();
    }
    let kept: String = text.chars().take(max_chars.saturating_sub(3)).collect();
    format!("{}...", kept)
}

pub fn render_table(digest: &Digest, display: &DisplayConfig) -> String {
    if digest.is_empty() {
        return empty_message(digest.window_weeks);
    }

    let header = ["#", "Title", "Published", "Link", "PDF"].map(str::to_string);
    let rows: Vec<[String; 5]> = digest
        .entries
        .iter()
        .enumerate()
        .map(|(i, entry)| {
            [
                (i + 1).to_string(),
                truncate(entry.record.title(), TABLE_TITLE_WIDTH),
                format_timestamp(&entry.record.pub_date, TABLE_DATE_FORMAT, display.local_time),
                entry.record.link().to_string(),
                pdf_cell(&entry.pdf),
            ]
        })
        .collect();

    let mut widths = [0usize; 5];
    for row in std::iter::once(&header).chain(rows.iter()) {
        for (width, cell) in widths.iter_mut().zip(row.iter()) {
            *width = (*width).max(cell.chars().count());
        }
    }

    let format_row = |row: &[String; 5]| -> String {
        row.iter()
            .zip(widths.iter())
            .map(|(cell, width)| format!("{:<width$}", cell, width = *width))
            .collect::<Vec<_>>()
            .join("  ")
            .trim_end()
            .to_string()
    };

    let mut out = String::new();
    let _ = writeln!(out, "{}", format_row(&header));
    let _ = writeln!(
        out,
        "{}",
        widths.iter().map(|w| "-".repeat(*w)).collect::<Vec<_>>().join("  ")
    );
    for row in &rows {
        let _ = writeln!(out, "{}", format_row(row));
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use regwatch_core::feed::{FeedRecord, FilteredRecord};

    fn entry(title: &str, pdf: PdfStatus) -> DigestEntry {
        DigestEntry {
            record: FilteredRecord {
                record: FeedRecord {
                    title: title.to_string(),
                    link: "https://www.sebi.gov.in/legal/circulars/oct-2025/circ.html".to_string(),
                    pub_date_raw: "17 Oct, 2025 +0000".to_string(),
                    description: "<p>Master circular for <b>stock brokers</b></p>".to_string(),
                },
                pub_date: Utc.with_ymd_and_hms(2025, 10, 17, 9, 5, 3).unwrap(),
            },
            pdf,
        }
    }

    fn digest(entries: Vec<DigestEntry>) -> Digest {
        let now = Utc.with_ymd_and_hms(2025, 10, 18, 0, 0, 0).unwrap();
        Digest {
            feed_url: "https://www.sebi.gov.in/sebirss.xml".to_string(),
            window_weeks: 3,
            generated_at: now,
            cutoff: now - chrono::Duration::weeks(3),
            total_records: entries.len(),
            entries,
        }
    }

    #[test]
    fn test_render_entry() {
        let pdf = url::Url::parse("https://www.sebi.gov.in/docs/circ.pdf").unwrap();
        let text = render_entry(1, &entry("Master Circular", PdfStatus::Found(pdf)), &DisplayConfig::default(), false);

        assert!(text.starts_with("1. Master Circular\n"));
        assert!(text.contains("Published: 17 Oct 2025, 09:05:03"));
        assert!(text.contains("stock brokers"));
        assert!(!text.contains("<b>"));
        assert!(text.contains("PDF: https://www.sebi.gov.in/docs/circ.pdf"));
    }

    #[test]
    fn test_render_entry_raw_description() {
        let text = render_entry(2, &entry("Circular", PdfStatus::NotFound), &DisplayConfig::default(), true);
        assert!(text.contains("<b>stock brokers</b>"));
        assert!(text.contains("PDF: not found"));
    }

    #[test]
    fn test_render_list_numbers_entries() {
        let text = render_list(
            &digest(vec![entry("First", PdfStatus::Skipped), entry("Second", PdfStatus::Skipped)]),
            &DisplayConfig::default(),
            false,
        );
        assert!(text.contains("1. First"));
        assert!(text.contains("2. Second"));
        assert!(text.contains("---"));
    }

    #[test]
    fn test_empty_digest_message() {
        let text = render_list(&digest(vec![]), &DisplayConfig::default(), false);
        assert_eq!(text, empty_message(3));
        assert!(render_table(&digest(vec![]), &DisplayConfig::default()).contains("last 3 weeks"));
    }

    #[test]
    fn test_render_table() {
        let text = render_table(
            &digest(vec![entry("Circular", PdfStatus::NotFound)]),
            &DisplayConfig::default(),
        );
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 3);
        assert!(lines[0].starts_with("#  Title"));
        assert!(lines[2].contains("17-10-2025 09:05"));
        assert!(lines[2].ends_with("not found"));
    }

    #[test]
    fn test_truncate_is_char_aware() {
        assert_eq!(truncate("short", 10), "short");
        assert_eq!(truncate("abcdefghij", 6), "abc...");
        assert_eq!(truncate("éééééééé", 5), "éé...");
    }
}

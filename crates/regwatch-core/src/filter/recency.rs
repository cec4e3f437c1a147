use chrono::{DateTime, Duration, Utc};

use super::date::parse_date;
use super::keywords::KeywordMatcher;
use crate::feed::{FeedRecord, FilteredRecord};

/// The trailing window records must fall into
#[derive(Debug, Clone, Copy)]
pub struct Selection {
    pub window_weeks: u32,
    pub now: DateTime<Utc>,
}

impl Selection {
    pub fn new(window_weeks: u32, now: DateTime<Utc>) -> Self {
        Self { window_weeks, now }
    }

    /// Window ending at the current instant
    pub fn ending_now(window_weeks: u32) -> Self {
        Self::new(window_weeks, Utc::now())
    }

    /// Oldest publication time still inside the window. Saturates at the
    /// earliest representable instant.
    pub fn cutoff(&self) -> DateTime<Utc> {
        Duration::try_weeks(i64::from(self.window_weeks))
            .and_then(|window| self.now.checked_sub_signed(window))
            .unwrap_or(DateTime::<Utc>::MIN_UTC)
    }
}

/// Keep records with a parseable date at or after the cutoff that match a
/// keyword, newest first. Equal dates keep feed order.
pub fn select(
    records: &[FeedRecord],
    selection: &Selection,
    matcher: &KeywordMatcher,
) -> Vec<FilteredRecord> {
    let cutoff = selection.cutoff();

    let mut selected: Vec<FilteredRecord> = records
        .iter()
        .filter_map(|record| {
            let Some(pub_date) = parse_date(&record.pub_date_raw) else {
                tracing::warn!(
                    "Skipping '{}': unrecognised date {:?}",
                    record.title,
                    record.pub_date_raw
                );
                return None;
            };

            if pub_date < cutoff {
                tracing::debug!("Skipping '{}': published {} before cutoff", record.title, pub_date);
                return None;
            }

            if !matcher.matches_record(record) {
                tracing::debug!("Skipping '{}': no keyword match", record.title);
                return None;
            }

            Some(FilteredRecord {
                record: record.clone(),
                pub_date,
            })
        })
        .collect();

    selected.sort_by(|a, b| b.pub_date.cmp(&a.pub_date));

    tracing::info!(
        "Selected {} of {} records published since {}",
        selected.len(),
        records.len(),
        cutoff.format("%Y-%m-%d %H:%M")
    );

    selected
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::AppConfig;
    use chrono::TimeZone;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 10, 18, 12, 0, 0).unwrap()
    }

    fn record(title: &str, date: DateTime<Utc>) -> FeedRecord {
        FeedRecord {
            title: title.to_string(),
            link: format!("https://example.com/{}", title.len()),
            pub_date_raw: date.format("%a, %d %b %Y %H:%M:%S %z").to_string(),
            description: String::new(),
        }
    }

    fn matcher() -> KeywordMatcher {
        KeywordMatcher::new(&AppConfig::default().filter.keywords).unwrap()
    }

    #[test]
    fn test_cutoff_is_inclusive() {
        let selection = Selection::new(3, now());
        let cutoff = selection.cutoff();
        assert_eq!(cutoff, now() - Duration::days(21));

        let records = vec![
            record("Circular at cutoff", cutoff),
            record("Circular just before", cutoff - Duration::seconds(1)),
        ];

        let selected = select(&records, &selection, &matcher());
        assert_eq!(selected.len(), 1);
        assert_eq!(selected[0].title(), "Circular at cutoff");
        assert_eq!(selected[0].pub_date, cutoff);
    }

    #[test]
    fn test_sorted_newest_first() {
        let records = vec![
            record("Circular A", now() - Duration::days(10)),
            record("Circular B", now() - Duration::days(1)),
            record("Circular C", now() - Duration::days(5)),
            record("Circular D", now() - Duration::days(20)),
        ];

        let selected = select(&records, &Selection::new(3, now()), &matcher());
        let titles: Vec<&str> = selected.iter().map(|r| r.title()).collect();
        assert_eq!(titles, vec!["Circular B", "Circular C", "Circular A", "Circular D"]);
        assert!(selected.windows(2).all(|w| w[0].pub_date >= w[1].pub_date));
    }

    #[test]
    fn test_ties_keep_feed_order() {
        let when = now() - Duration::days(2);
        let records = vec![
            record("Circular first", when),
            record("Circular second", when),
        ];

        let selected = select(&records, &Selection::new(3, now()), &matcher());
        assert_eq!(selected[0].title(), "Circular first");
        assert_eq!(selected[1].title(), "Circular second");
    }

    #[test]
    fn test_unparseable_and_unmatched_excluded() {
        let mut undated = record("Circular with no date", now());
        undated.pub_date_raw = "sometime last week".to_string();

        let records = vec![
            undated,
            record("Annual Report 2024", now() - Duration::days(2)),
            record("New Regulation on ABC", now() - Duration::days(30)),
            record("SEBI issues Master Circular on XYZ", now() - Duration::days(5)),
        ];

        let selected = select(&records, &Selection::new(3, now()), &matcher());
        assert_eq!(selected.len(), 1);
        assert_eq!(selected[0].title(), "SEBI issues Master Circular on XYZ");
    }

    #[test]
    fn test_description_match_is_enough() {
        let mut entry = record("Press release", now() - Duration::days(1));
        entry.description = "Draft amendment to the framework".to_string();

        let selected = select(&[entry], &Selection::new(3, now()), &matcher());
        assert_eq!(selected.len(), 1);
    }

    #[test]
    fn test_huge_window_saturates() {
        let selection = Selection::new(u32::MAX, now());
        assert_eq!(selection.cutoff(), DateTime::<Utc>::MIN_UTC);

        let records = vec![record("Circular from long ago", now() - Duration::days(3650))];
        assert_eq!(select(&records, &selection, &matcher()).len(), 1);
    }

    #[test]
    fn test_window_size_changes_cutoff() {
        let records = vec![record("Circular old", now() - Duration::days(30))];

        assert!(select(&records, &Selection::new(3, now()), &matcher()).is_empty());
        assert_eq!(select(&records, &Selection::new(5, now()), &matcher()).len(), 1);
    }
}

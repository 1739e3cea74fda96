use chrono::{Days, NaiveDate, NaiveDateTime};

use crate::models::HistoryEntry;

/// Timestamp pattern used by the history endpoint. Lexicographic order on
/// the raw string matches chronological order for this pattern, which
/// [`latest_scan`] relies on.
pub const SCAN_TIMESTAMP_FORMAT: &str = "%Y-%m-%dT%H:%M:%S";

pub fn parse_scan_timestamp(raw: &str) -> Option<NaiveDateTime> {
    NaiveDateTime::parse_from_str(raw, SCAN_TIMESTAMP_FORMAT).ok()
}

/// Display section for a history entry, relative to the viewer's current
/// calendar day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Bucket {
    Today,
    Yesterday,
    Older,
}

impl Bucket {
    pub const ORDER: [Bucket; 3] = [Bucket::Today, Bucket::Yesterday, Bucket::Older];

    pub fn label(self) -> &'static str {
        match self {
            Bucket::Today => "Today",
            Bucket::Yesterday => "Yesterday",
            Bucket::Older => "Older",
        }
    }
}

/// Buckets purely by calendar day: same day as `today` is `Today`, exactly
/// one day earlier is `Yesterday`, everything else (including unparseable
/// timestamps) is `Older`.
pub fn bucket_for(raw_timestamp: &str, today: NaiveDate) -> Bucket {
    let Some(scanned) = parse_scan_timestamp(raw_timestamp) else {
        return Bucket::Older;
    };
    let day = scanned.date();
    if day == today {
        Bucket::Today
    } else if today.checked_sub_days(Days::new(1)) == Some(day) {
        Bucket::Yesterday
    } else {
        Bucket::Older
    }
}

/// One row of the rendered history list: a section header or an entry.
#[derive(Debug, Clone, PartialEq)]
pub enum HistoryRow {
    Header(Bucket),
    Entry(HistoryEntry),
}

/// Flattens entries into header-then-items rows in today/yesterday/older
/// order. Buckets with no entries produce no header. Entry order within a
/// bucket follows the input.
pub fn build_rows(entries: &[HistoryEntry], today: NaiveDate) -> Vec<HistoryRow> {
    let mut rows = Vec::with_capacity(entries.len() + Bucket::ORDER.len());
    for bucket in Bucket::ORDER {
        let mut wrote_header = false;
        for entry in entries {
            if bucket_for(&entry.time_scanned, today) == bucket {
                if !wrote_header {
                    rows.push(HistoryRow::Header(bucket));
                    wrote_header = true;
                }
                rows.push(HistoryRow::Entry(entry.clone()));
            }
        }
    }
    rows
}

/// Case-insensitive filter on the snapshot display name. Headers always
/// survive, so a bucket whose entries are all filtered out still shows its
/// bare header. An empty query returns the rows unchanged.
pub fn filter_rows(rows: &[HistoryRow], query: &str) -> Vec<HistoryRow> {
    if query.is_empty() {
        return rows.to_vec();
    }
    let needle = query.to_lowercase();
    rows.iter()
        .filter(|row| match row {
            HistoryRow::Header(_) => true,
            HistoryRow::Entry(entry) => entry.profile.name.to_lowercase().contains(&needle),
        })
        .cloned()
        .collect()
}

/// The most recent entry by raw timestamp, used by the scan flow to pull
/// the contacts snapshot of the user just recognized.
pub fn latest_scan(entries: &[HistoryEntry]) -> Option<&HistoryEntry> {
    entries.iter().max_by(|a, b| a.time_scanned.cmp(&b.time_scanned))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::ProfileCard;
    use pretty_assertions::assert_eq;

    fn entry(name: &str, time_scanned: &str) -> HistoryEntry {
        HistoryEntry {
            time_scanned: time_scanned.into(),
            profile: ProfileCard {
                name: name.into(),
                bio: None,
                job_title: None,
                company: None,
                profile_picture: None,
            },
            contacts: Vec::new(),
        }
    }

    fn fixed_today() -> NaiveDate {
        // Matches now=2024-06-10T09:00:00.
        NaiveDate::from_ymd_opt(2024, 6, 10).expect("valid date")
    }

    #[test]
    fn bucket_boundaries_follow_calendar_days() {
        let today = fixed_today();
        assert_eq!(bucket_for("2024-06-10T23:59:59", today), Bucket::Today);
        assert_eq!(bucket_for("2024-06-09T00:00:01", today), Bucket::Yesterday);
        assert_eq!(bucket_for("2024-06-01T00:00:00", today), Bucket::Older);
    }

    #[test]
    fn unparseable_timestamp_falls_into_older() {
        assert_eq!(bucket_for("not a timestamp", fixed_today()), Bucket::Older);
    }

    #[test]
    fn rows_are_grouped_under_ordered_headers() {
        let entries = vec![
            entry("Older One", "2024-06-01T00:00:00"),
            entry("Ann", "2024-06-10T08:30:00"),
            entry("Ben", "2024-06-09T12:00:00"),
            entry("Cleo", "2024-06-10T07:00:00"),
        ];
        let rows = build_rows(&entries, fixed_today());
        let summary: Vec<String> = rows
            .iter()
            .map(|row| match row {
                HistoryRow::Header(bucket) => format!("# {}", bucket.label()),
                HistoryRow::Entry(entry) => entry.profile.name.clone(),
            })
            .collect();
        assert_eq!(
            summary,
            vec![
                "# Today".to_string(),
                "Ann".to_string(),
                "Cleo".to_string(),
                "# Yesterday".to_string(),
                "Ben".to_string(),
                "# Older".to_string(),
                "Older One".to_string(),
            ]
        );
    }

    #[test]
    fn empty_buckets_produce_no_header() {
        let rows = build_rows(&[entry("Ann", "2024-06-10T08:30:00")], fixed_today());
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0], HistoryRow::Header(Bucket::Today));
    }

    #[test]
    fn filter_is_case_insensitive_and_keeps_headers() {
        let entries = vec![
            entry("Annika", "2024-06-10T08:30:00"),
            entry("Ben", "2024-06-09T12:00:00"),
            entry("Joanne", "2024-06-01T00:00:00"),
        ];
        let rows = build_rows(&entries, fixed_today());
        let filtered = filter_rows(&rows, "ann");
        let summary: Vec<String> = filtered
            .iter()
            .map(|row| match row {
                HistoryRow::Header(bucket) => format!("# {}", bucket.label()),
                HistoryRow::Entry(entry) => entry.profile.name.clone(),
            })
            .collect();
        // "Ben" is gone but every header survives, including his bucket's.
        assert_eq!(
            summary,
            vec![
                "# Today".to_string(),
                "Annika".to_string(),
                "# Yesterday".to_string(),
                "# Older".to_string(),
                "Joanne".to_string(),
            ]
        );
    }

    #[test]
    fn empty_query_returns_rows_unchanged() {
        let rows = build_rows(&[entry("Ann", "2024-06-10T08:30:00")], fixed_today());
        assert_eq!(filter_rows(&rows, ""), rows);
    }

    #[test]
    fn latest_scan_picks_newest_raw_timestamp() {
        let entries = vec![
            entry("Old", "2024-06-01T00:00:00"),
            entry("New", "2024-06-10T09:00:00"),
            entry("Mid", "2024-06-09T23:59:59"),
        ];
        let latest = latest_scan(&entries).expect("non-empty");
        assert_eq!(latest.profile.name, "New");
        assert_eq!(latest_scan(&[]), None);
    }
}

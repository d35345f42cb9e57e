//! Export filename and timestamp conventions

use chrono::{DateTime, Utc};

/// Timestamp convention used in export filenames.
///
/// The storage layout has carried two conventions over time: one with the
/// day-of-month segment doubled and one without. Both are exposed so a
/// deployment selects one explicitly; `DoubledDay` is what existing
/// consumers of the stored objects expect, so it is the default.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TimestampFormat {
    /// `YYYY-MM-DD_DD_HH:MM:SS` - the day-of-month appears twice
    #[default]
    DoubledDay,
    /// `YYYY-MM-DD_HH:MM:SS`
    Plain,
}

impl TimestampFormat {
    pub const fn pattern(self) -> &'static str {
        match self {
            TimestampFormat::DoubledDay => "%Y-%m-%d_%d_%H:%M:%S",
            TimestampFormat::Plain => "%Y-%m-%d_%H:%M:%S",
        }
    }

    pub fn format(self, timestamp: &DateTime<Utc>) -> String {
        timestamp.format(self.pattern()).to_string()
    }
}

/// Export filename: `{service}-{data_source}-{timestamp}.json`
pub fn export_filename(
    service: &str,
    data_source: &str,
    timestamp: &DateTime<Utc>,
    format: TimestampFormat,
) -> String {
    format!(
        "{service}-{data_source}-{}.json",
        format.format(timestamp)
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn fixed_timestamp() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 3, 7, 14, 5, 9).unwrap()
    }

    #[test]
    fn doubled_day_repeats_the_day_segment() {
        assert_eq!(
            TimestampFormat::DoubledDay.format(&fixed_timestamp()),
            "2024-03-07_07_14:05:09"
        );
    }

    #[test]
    fn plain_format_has_a_single_day_segment() {
        assert_eq!(
            TimestampFormat::Plain.format(&fixed_timestamp()),
            "2024-03-07_14:05:09"
        );
    }

    #[test]
    fn filename_combines_service_source_and_timestamp() {
        assert_eq!(
            export_filename(
                "appliance",
                "nodes",
                &fixed_timestamp(),
                TimestampFormat::Plain
            ),
            "appliance-nodes-2024-03-07_14:05:09.json"
        );
    }
}

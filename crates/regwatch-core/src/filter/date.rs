use chrono::format::{parse, Parsed, StrftimeItems};
use chrono::{DateTime, NaiveTime, TimeZone, Utc, Weekday};

/// One way a feed may spell a publication date
#[derive(Debug, Clone, Copy)]
enum DateFormat {
    /// strftime pattern; `time`/`zone` say whether it carries a clock time and an offset.
    /// With `weekday` set the value must open with `Www,`, which is not checked
    /// against the date.
    Pattern {
        pattern: &'static str,
        weekday: bool,
        time: bool,
        zone: bool,
    },
    /// RFC 2822, including the named zones (`GMT`, `EST`, ...) `%z` refuses.
    /// A leading day name is dropped before parsing.
    Rfc2822,
}

/// Tried in order, first match wins
const DATE_FORMATS: &[DateFormat] = &[
    DateFormat::Pattern {
        pattern: "%d %b %Y %H:%M:%S %z",
        weekday: true,
        time: true,
        zone: true,
    },
    DateFormat::Rfc2822,
    DateFormat::Pattern {
        pattern: "%d %b, %Y %H:%M:%S %z",
        weekday: false,
        time: true,
        zone: true,
    },
    DateFormat::Pattern {
        pattern: "%d %b, %Y %z",
        weekday: false,
        time: false,
        zone: true,
    },
    DateFormat::Pattern {
        pattern: "%d %b, %Y %H:%M:%S",
        weekday: false,
        time: true,
        zone: false,
    },
    DateFormat::Pattern {
        pattern: "%d %b, %Y",
        weekday: false,
        time: false,
        zone: false,
    },
    DateFormat::Pattern {
        pattern: "%d-%m-%Y",
        weekday: false,
        time: false,
        zone: false,
    },
    DateFormat::Pattern {
        pattern: "%Y-%m-%d",
        weekday: false,
        time: false,
        zone: false,
    },
];

impl DateFormat {
    fn parse(&self, raw: &str) -> Option<DateTime<Utc>> {
        match *self {
            Self::Rfc2822 => {
                let raw = strip_weekday(raw).unwrap_or(raw);
                DateTime::parse_from_rfc2822(raw)
                    .ok()
                    .map(|dt| dt.with_timezone(&Utc))
            }
            Self::Pattern {
                pattern,
                weekday,
                time,
                zone,
            } => {
                let raw = if weekday { strip_weekday(raw)? } else { raw };

                let mut parsed = Parsed::new();
                parse(&mut parsed, raw, StrftimeItems::new(pattern)).ok()?;

                let date = parsed.to_naive_date().ok()?;
                let time = if time {
                    parsed.to_naive_time().ok()?
                } else {
                    NaiveTime::from_hms_opt(0, 0, 0)?
                };
                let local = date.and_time(time);

                if zone {
                    let offset = parsed.to_fixed_offset().ok()?;
                    offset
                        .from_local_datetime(&local)
                        .single()
                        .map(|dt| dt.with_timezone(&Utc))
                } else {
                    Some(local.and_utc())
                }
            }
        }
    }
}

/// Remainder after a leading three-letter day name and its comma
fn strip_weekday(raw: &str) -> Option<&str> {
    let (day, rest) = raw.split_once(',')?;
    if day.len() != 3 || day.parse::<Weekday>().is_err() {
        return None;
    }
    Some(rest.trim_start())
}

/// Normalize a feed date string to UTC.
///
/// Values with an offset are converted to UTC; values without one are read
/// as UTC. Returns `None` when no known format matches.
pub fn parse_date(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }

    DATE_FORMATS.iter().find_map(|format| format.parse(raw))
}

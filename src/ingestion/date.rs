//! Publication date normalization.
//!
//! Feeds in the wild disagree on date formats, so `normalize` walks an ordered
//! list of layouts and keeps the first that parses. Order matters: numeric
//! zones before named zones, four-digit years before two-digit years.

use chrono::{DateTime, FixedOffset, NaiveDateTime, TimeZone, Utc, Weekday};

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Zone {
    /// `+0000` / `-0700`
    Numeric,
    /// `GMT`, `MST`, ...
    Named,
}

#[derive(Copy, Clone, Debug)]
pub struct Layout {
    pub name: &'static str,
    /// Leading `Ddd, ` day name. Only its spelling is checked, never that it
    /// agrees with the date.
    pub weekday: bool,
    pub format: &'static str,
    pub zone: Zone,
}

/// Tried in order; first match wins.
pub const LAYOUTS: &[Layout] = &[
    // Mon, 02 Jan 2006 15:04:05 -0700
    Layout { name: "rfc1123z", weekday: true, format: "%d %b %Y %H:%M:%S %z", zone: Zone::Numeric },
    // Mon, 02 Jan 2006 15:04:05 MST
    Layout { name: "rfc1123", weekday: true, format: "%d %b %Y %H:%M:%S", zone: Zone::Named },
    // 02 Jan 06 15:04 -0700
    Layout { name: "rfc822z", weekday: false, format: "%d %b %y %H:%M %z", zone: Zone::Numeric },
    // 02 Jan 06 15:04 MST
    Layout { name: "rfc822", weekday: false, format: "%d %b %y %H:%M", zone: Zone::Named },
];

impl Layout {
    pub fn parse(&self, raw: &str) -> Option<DateTime<Utc>> {
        let mut raw = raw.trim();
        if self.weekday {
            raw = strip_weekday(raw)?;
        }
        match self.zone {
            Zone::Numeric => DateTime::parse_from_str(raw, self.format)
                .ok()
                .map(|dt| dt.with_timezone(&Utc)),
            Zone::Named => {
                let (stamp, abbr) = raw.rsplit_once(char::is_whitespace)?;
                let offset = named_offset(abbr)?;
                let naive = NaiveDateTime::parse_from_str(stamp.trim_end(), self.format).ok()?;
                offset
                    .from_local_datetime(&naive)
                    .single()
                    .map(|dt| dt.with_timezone(&Utc))
            }
        }
    }
}

/// Normalize a raw publication date. `None` means no known layout matched.
pub fn normalize(raw: &str) -> Option<DateTime<Utc>> {
    normalize_with_layout(raw).map(|(at, _)| at)
}

/// Like [`normalize`], also naming the layout that matched.
pub fn normalize_with_layout(raw: &str) -> Option<(DateTime<Utc>, &'static str)> {
    LAYOUTS
        .iter()
        .find_map(|layout| layout.parse(raw).map(|at| (at, layout.name)))
}

// "Tue, 02 Jan 2006 ..." -> "02 Jan 2006 ...". chrono's `%a` would reject a
// day name that disagrees with the date, which real feeds get wrong often.
fn strip_weekday(raw: &str) -> Option<&str> {
    let (day, rest) = raw.split_once(',')?;
    if day.len() != 3 || day.parse::<Weekday>().is_err() {
        return None;
    }
    Some(rest.trim_start())
}

// RFC 822 zone names resolve to their real offsets, unlike Go's time.Parse,
// which reads any abbreviation other than the local zone's as +0000. Other
// alphabetic abbreviations are read as UTC.
fn named_offset(abbr: &str) -> Option<FixedOffset> {
    if abbr.is_empty() || !abbr.chars().all(|c| c.is_ascii_alphabetic()) {
        return None;
    }
    let hours = match abbr.to_ascii_uppercase().as_str() {
        "EDT" => -4,
        "EST" | "CDT" => -5,
        "CST" | "MDT" => -6,
        "MST" | "PDT" => -7,
        "PST" => -8,
        _ => 0,
    };
    FixedOffset::east_opt(hours * 3600)
}

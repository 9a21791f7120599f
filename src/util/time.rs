use anyhow::{bail, Result};
use std::time::Duration;

// Unit suffixes accepted in interval strings, longest first so "ms" wins over "m".
const UNITS: &[(&str, f64)] = &[
    ("ns", 1e-9),
    ("us", 1e-6),
    ("µs", 1e-6),
    ("ms", 1e-3),
    ("s", 1.0),
    ("m", 60.0),
    ("h", 3600.0),
];

// Parse an interval string like "30s", "1m", "1h30m" or "1.5h" into a Duration.
// Each component is a decimal number followed by a unit. The total must be > 0.
pub fn parse_interval(s: &str) -> Result<Duration> {
    let input = s.trim();
    if input.is_empty() { bail!("invalid interval: empty string"); }
    if input.starts_with('-') { bail!("invalid interval {:?}: must be positive", s); }

    let mut rest = input.strip_prefix('+').unwrap_or(input);
    let mut total_secs = 0f64;
    while !rest.is_empty() {
        let num_len = rest.find(|c: char| !(c.is_ascii_digit() || c == '.')).unwrap_or(rest.len());
        let (num, tail) = rest.split_at(num_len);
        if num.is_empty() || num == "." { bail!("invalid interval {:?}: expected a number", s); }
        let value: f64 = match num.parse() {
            Ok(v) => v,
            Err(_) => bail!("invalid interval {:?}: bad number {:?}", s, num),
        };

        let Some((unit, scale)) = UNITS
            .iter()
            .filter(|(u, _)| tail.starts_with(u))
            .max_by_key(|(u, _)| u.len())
        else {
            bail!("invalid interval {:?}: missing or unknown unit", s);
        };
        total_secs += value * scale;
        rest = &tail[unit.len()..];
    }

    let Ok(d) = Duration::try_from_secs_f64(total_secs) else {
        bail!("invalid interval {:?}: out of range", s);
    };
    // also catches totals below 1ns, which round down to zero
    if d.is_zero() { bail!("invalid interval {:?}: must be positive", s); }
    Ok(d)
}

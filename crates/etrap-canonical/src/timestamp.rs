use once_cell::sync::Lazy;
use regex::Regex;

static TIMESTAMP_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"^(?P<date>\d{4}-\d{2}-\d{2})[T ](?P<time>\d{2}:\d{2}:\d{2})(?:\.(?P<frac>\d+))?(?P<tz>Z|[+-]\d{2}:?\d{2})?$",
    )
    .unwrap()
});

/// If `value` looks like an ISO-8601 timestamp, reformat it to the
/// canonical `YYYY-MM-DDTHH:MM:SS.mmm[tz]` shape (§4.1): millisecond
/// precision, `T` separator, sub-millisecond truncated, missing
/// sub-second padded with `.000`, timezone kept only if present in the
/// source. Returns `None` for anything that doesn't match the shape,
/// in which case the caller keeps the original string untouched.
pub fn normalize_timestamp(value: &str) -> Option<String> {
    let caps = TIMESTAMP_RE.captures(value)?;
    let date = &caps["date"];
    let time = &caps["time"];
    let millis = match caps.name("frac") {
        Some(m) => {
            let digits = m.as_str();
            if digits.len() >= 3 {
                digits[..3].to_string()
            } else {
                format!("{digits:0<3}")
            }
        }
        None => "000".to_string(),
    };
    let tz = caps.name("tz").map(|m| m.as_str()).unwrap_or("");
    Some(format!("{date}T{time}.{millis}{tz}"))
}

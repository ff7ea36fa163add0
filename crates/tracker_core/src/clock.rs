use time::OffsetDateTime;

/// Milliseconds since the Unix epoch, the unit every stored timestamp uses.
pub trait Clock {
    fn now_millis(&self) -> i64;
}

pub struct SystemClock;

impl Clock for SystemClock {
    fn now_millis(&self) -> i64 {
        (OffsetDateTime::now_utc().unix_timestamp_nanos() / 1_000_000) as i64
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FixedClock(pub i64);

impl Clock for FixedClock {
    fn now_millis(&self) -> i64 {
        self.0
    }
}

pub fn format_millis(millis: i64) -> Option<String> {
    let datetime =
        OffsetDateTime::from_unix_timestamp_nanos(i128::from(millis) * 1_000_000).ok()?;
    datetime
        .format(&time::format_description::well_known::Rfc3339)
        .ok()
}

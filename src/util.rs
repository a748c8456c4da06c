use std::fmt::{self, Formatter};

use crate::ParsedId;

pub fn debug_parsed(parsed: &ParsedId, f: &mut Formatter<'_>) -> fmt::Result {
    struct Timestamp(Option<u64>);
    impl fmt::Debug for Timestamp {
        fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
            match self.0 {
                Some(millis) => write!(f, "\"{ts}\"", ts = timestamp_to_string(millis)),
                None => f.write_str("None"),
            }
        }
    }

    f.debug_struct("ParsedId")
        .field("timestamp", &Timestamp(parsed.timestamp))
        .field("worker_id", &parsed.worker_id)
        .field("datacenter_id", &parsed.datacenter_id)
        .field("salt", &parsed.salt)
        .finish()
}

fn timestamp_to_string(millis: u64) -> String {
    const DAYS_PER_YEAR: u64 = 365;
    const DAYS_PER_LEAP_YEAR: u64 = DAYS_PER_YEAR + 1;

    const DAYS_PER_QUAD_YEAR: u64 = 4 * DAYS_PER_YEAR + 1; // leap year: every 4 years,
    const DAYS_PER_CENTURY: u64 = 25 * DAYS_PER_QUAD_YEAR - 1; // but not every 100 years,
    const DAYS_PER_QUADRICENTENNIAL: u64 = 4 * DAYS_PER_CENTURY + 1; // but again every 400 years.

    const BASE: u64 = 1600;
    const DAYS_BASE_TO_1970: u64 = 3 * DAYS_PER_CENTURY + 1 + 70 * DAYS_PER_YEAR + 70 / 4;

    let (seconds, millis) = (millis / 1000, (millis % 1000) as u32);
    let (minutes, seconds) = (seconds / 60, (seconds % 60) as u32);
    let (hours, minutes) = (minutes / 60, (minutes % 60) as u32);
    let (days, hours) = (hours / 24, (hours % 24) as u32);

    // days relative to year 1600
    let days = days + DAYS_BASE_TO_1970;

    let (quadricentennials, days) = (days / DAYS_PER_QUADRICENTENNIAL, days % DAYS_PER_QUADRICENTENNIAL);
    let (centuries, days) = (days / DAYS_PER_CENTURY, days % DAYS_PER_CENTURY);
    let (quad_years, days) = (days / DAYS_PER_QUAD_YEAR, days % DAYS_PER_QUAD_YEAR);

    let is_leap_year = days < DAYS_PER_LEAP_YEAR;

    let (years, days) = if is_leap_year {
        (0, days)
    } else {
        let days = days - DAYS_PER_LEAP_YEAR;
        let (normal_years, days) = (days / DAYS_PER_YEAR, days % DAYS_PER_YEAR);
        (normal_years + 1, days)
    };

    let year = BASE + quadricentennials * 400 + centuries * 100 + quad_years * 4 + years;

    #[rustfmt::skip]
    let days_in_month = [
        31,
        if is_leap_year { 29 } else { 28 },
        31, 30, 31, 30, 31, 31, 30, 31, 30, 31,
    ];

    let mut days = days;
    let mut month = 0;
    while days >= days_in_month[month] {
        days -= days_in_month[month];
        month += 1;
    }

    let month = month + 1;
    let day = days + 1;

    format!("{year:04}-{month:02}-{day:02}T{hours:02}:{minutes:02}:{seconds:02}.{millis:03}Z")
}

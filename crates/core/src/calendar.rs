//! India Standard Time helpers.
//!
//! Every calendar rule in the portal (attendance days, interview slots,
//! letter dates) is evaluated in IST, a fixed +05:30 offset with no daylight
//! saving. Timestamps are stored in UTC and only localized here.

use chrono::{DateTime, Duration, FixedOffset, NaiveDate, TimeZone, Utc};

use crate::types::Timestamp;

/// UTC offset of India Standard Time in seconds (+05:30).
pub const IST_OFFSET_SECS: i32 = 5 * 3600 + 30 * 60;

/// The IST offset as a chrono time zone.
pub fn ist() -> FixedOffset {
    FixedOffset::east_opt(IST_OFFSET_SECS).expect("+05:30 is a valid offset")
}

/// Localize a UTC timestamp to IST.
pub fn to_ist(ts: Timestamp) -> DateTime<FixedOffset> {
    ts.with_timezone(&ist())
}

/// The IST calendar day a UTC instant falls on.
pub fn ist_day(ts: Timestamp) -> NaiveDate {
    to_ist(ts).date_naive()
}

/// The UTC instant of IST midnight at the start of `day`.
pub fn ist_day_start_utc(day: NaiveDate) -> Timestamp {
    let midnight = day.and_hms_opt(0, 0, 0).expect("midnight is a valid time");
    Utc.from_utc_datetime(&(midnight - Duration::seconds(i64::from(IST_OFFSET_SECS))))
}

/// Today's calendar day in IST.
pub fn ist_today() -> NaiveDate {
    ist_day(Utc::now())
}

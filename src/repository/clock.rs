//! Sources of "today".

use chrono::{DateTime, Local, NaiveDate, NaiveTime, Utc};

/// Supplies the current date and time to the engine.
pub trait Clock {
    /// The current instant, used to stamp recorded events.
    fn now(&self) -> DateTime<Utc>;

    /// The facility's calendar date.
    fn today(&self) -> NaiveDate;
}

/// The system clock. "Today" is the local calendar date.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }

    fn today(&self) -> NaiveDate {
        Local::now().date_naive()
    }
}

/// A clock frozen at one instant.
///
/// # Example
///
/// ```
/// use care_engine::repository::{Clock, FixedClock};
/// use chrono::NaiveDate;
///
/// let day = NaiveDate::from_ymd_opt(2024, 1, 5).unwrap();
/// let clock = FixedClock::on(day);
/// assert_eq!(clock.today(), day);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FixedClock {
    now: DateTime<Utc>,
}

impl FixedClock {
    /// Freezes the clock at `now`; "today" is its UTC date.
    pub fn at(now: DateTime<Utc>) -> Self {
        Self { now }
    }

    /// Freezes the clock at midnight UTC on `date`.
    pub fn on(date: NaiveDate) -> Self {
        Self {
            now: date.and_time(NaiveTime::MIN).and_utc(),
        }
    }
}

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        self.now
    }

    fn today(&self) -> NaiveDate {
        self.now.date_naive()
    }
}

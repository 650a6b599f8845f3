use chrono::{DateTime, Local, NaiveDate, NaiveTime, Utc};

/// Source of "now" for relative date arithmetic and timestamps.
pub trait Clock: Send + Sync {
    /// Current instant, stored on commitments and as the queue's `last_scan`.
    fn now(&self) -> DateTime<Utc>;

    /// Calendar date used for deadline resolution and id prefixes.
    fn today(&self) -> NaiveDate;
}

/// Wall clock. `today` follows the local timezone, since "end of day" means
/// the user's day.
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

/// Clock pinned to a fixed date, for tests and replays.
#[derive(Debug, Clone, Copy)]
pub struct FixedClock {
    now: DateTime<Utc>,
    today: NaiveDate,
}

impl FixedClock {
    #[must_use]
    pub const fn new(now: DateTime<Utc>, today: NaiveDate) -> Self {
        Self { now, today }
    }

    /// Pin the clock to noon UTC on `date`.
    #[must_use]
    pub fn on(date: NaiveDate) -> Self {
        let noon = NaiveTime::from_hms_opt(12, 0, 0).unwrap_or(NaiveTime::MIN);
        Self {
            now: date.and_time(noon).and_utc(),
            today: date,
        }
    }
}

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        self.now
    }

    fn today(&self) -> NaiveDate {
        self.today
    }
}

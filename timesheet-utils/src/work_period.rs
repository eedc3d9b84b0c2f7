use rust_decimal::Decimal;
use thiserror::Error;
use time::{Date, PrimitiveDateTime, Time};

const SECONDS_PER_HOUR: i64 = 3600;

#[derive(Debug, Error)]
pub enum TimesheetUtilsError {
    #[error("Hour out of range: {0}")]
    HourOutOfRange(u8),
}

/// A work period given as start and end calendar dates with full hours.
///
/// Hours are `0..=23`.  An end hour of `0` on a later date than the start
/// means the period ends at the midnight which begins `end_date`, so a shift
/// from 20:00 until midnight is entered as `end_date = start_date + 1` and
/// `end_hour = 0`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WorkPeriod {
    start_date: Date,
    start_hour: u8,
    end_date: Date,
    end_hour: u8,
}

impl WorkPeriod {
    pub fn new(
        start_date: Date,
        start_hour: u8,
        end_date: Date,
        end_hour: u8,
    ) -> Result<Self, TimesheetUtilsError> {
        for hour in [start_hour, end_hour] {
            if hour > 23 {
                return Err(TimesheetUtilsError::HourOutOfRange(hour));
            }
        }
        Ok(Self {
            start_date,
            start_hour,
            end_date,
            end_hour,
        })
    }

    pub fn start_date(&self) -> Date {
        self.start_date
    }
    pub fn start_hour(&self) -> u8 {
        self.start_hour
    }
    pub fn end_date(&self) -> Date {
        self.end_date
    }
    pub fn end_hour(&self) -> u8 {
        self.end_hour
    }

    /// True if the period ends at midnight on a later day than it started.
    pub fn ends_at_midnight(&self) -> bool {
        self.end_hour == 0 && self.end_date > self.start_date
    }

    pub fn start(&self) -> PrimitiveDateTime {
        PrimitiveDateTime::new(self.start_date, full_hour(self.start_hour))
    }

    pub fn end(&self) -> PrimitiveDateTime {
        if self.ends_at_midnight() {
            self.end_date.midnight()
        } else {
            PrimitiveDateTime::new(self.end_date, full_hour(self.end_hour))
        }
    }

    /// The single rule which decides whether a period can be stored.
    ///
    /// A midnight rollover is always accepted, every other period must end
    /// strictly after it started.
    pub fn is_chronological(&self) -> bool {
        self.ends_at_midnight() || self.end() > self.start()
    }

    /// Elapsed hours between start and end, rounded to two decimal places.
    ///
    /// Never negative and never fails: a period which ends before it starts
    /// yields zero.
    pub fn worked_hours(&self) -> Decimal {
        let seconds = (self.end() - self.start()).whole_seconds();
        if seconds <= 0 {
            return Decimal::ZERO;
        }
        (Decimal::from(seconds) / Decimal::from(SECONDS_PER_HOUR)).round_dp(2)
    }
}

fn full_hour(hour: u8) -> Time {
    // Hours are checked in `WorkPeriod::new`.
    Time::from_hms(hour, 0, 0).unwrap_or(Time::MIDNIGHT)
}

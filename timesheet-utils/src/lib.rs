mod hours_split;
mod work_period;

pub use hours_split::{HoursSplit, REGULAR_HOURS_PER_DAY};
pub use work_period::{TimesheetUtilsError, WorkPeriod};

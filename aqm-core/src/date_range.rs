use chrono::{DateTime, NaiveDate, TimeDelta, Utc};

/// Yields each calendar day from the start date through the end date
/// (inclusive). A reversed range yields nothing.
#[derive(Clone, Eq, PartialEq, Copy, Debug)]
pub struct DateRange(pub NaiveDate, pub NaiveDate);

impl DateRange {
    /// Number of days the range will yield.
    pub fn day_count(&self) -> usize {
        let days = (self.1 - self.0).num_days();
        if days < 0 {
            0
        } else {
            days as usize + 1
        }
    }
}

impl Iterator for DateRange {
    type Item = NaiveDate;

    fn next(&mut self) -> Option<Self::Item> {
        if self.0 > self.1 {
            return None;
        }
        let current = self.0;
        match current.succ_opt() {
            Some(next) => self.0 = next,
            // NaiveDate::MAX has no successor
            None => self.1 = NaiveDate::MIN,
        }
        Some(current)
    }
}

/// Evenly spaced instants: `count` steps of `step`, starting at `start`.
#[derive(Clone, Copy, Debug)]
pub struct TimeSteps {
    next: DateTime<Utc>,
    step: TimeDelta,
    remaining: usize,
}

impl TimeSteps {
    pub fn new(start: DateTime<Utc>, step: TimeDelta, count: usize) -> Self {
        TimeSteps {
            next: start,
            step,
            remaining: count,
        }
    }

    /// `count` hourly instants ending exactly at `end`.
    pub fn hours_ending_at(end: DateTime<Utc>, count: usize) -> Self {
        let back = TimeDelta::hours(count.saturating_sub(1) as i64);
        TimeSteps::new(end - back, TimeDelta::hours(1), count)
    }
}

impl Iterator for TimeSteps {
    type Item = DateTime<Utc>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.remaining == 0 {
            return None;
        }
        self.remaining -= 1;
        let current = self.next;
        self.next = current + self.step;
        Some(current)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl ExactSizeIterator for TimeSteps {}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_date_range_iteration() {
        let start = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        let end = NaiveDate::from_ymd_opt(2024, 1, 3).unwrap();
        let range = DateRange(start, end);
        assert_eq!(range.day_count(), 3);
        let dates: Vec<NaiveDate> = range.collect();
        assert_eq!(dates.len(), 3);
        assert_eq!(dates[0], start);
        assert_eq!(dates[2], end);
    }

    #[test]
    fn test_date_range_single_day() {
        let day = NaiveDate::from_ymd_opt(2022, 3, 15).unwrap();
        let dates: Vec<NaiveDate> = DateRange(day, day).collect();
        assert_eq!(dates, vec![day]);
    }

    #[test]
    fn test_date_range_reversed_is_empty() {
        let start = NaiveDate::from_ymd_opt(2022, 3, 15).unwrap();
        let end = NaiveDate::from_ymd_opt(2022, 3, 14).unwrap();
        let range = DateRange(start, end);
        assert_eq!(range.day_count(), 0);
        assert_eq!(range.count(), 0);
    }

    #[test]
    fn test_date_range_stops_at_max() {
        let dates: Vec<NaiveDate> = DateRange(NaiveDate::MAX, NaiveDate::MAX).collect();
        assert_eq!(dates, vec![NaiveDate::MAX]);
    }

    #[test]
    fn test_hours_ending_at() {
        let end = Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap();
        let steps: Vec<_> = TimeSteps::hours_ending_at(end, 24).collect();
        assert_eq!(steps.len(), 24);
        assert_eq!(*steps.last().unwrap(), end);
        assert_eq!(steps[0], Utc.with_ymd_and_hms(2024, 4, 30, 13, 0, 0).unwrap());
        assert!(steps.windows(2).all(|w| w[1] - w[0] == TimeDelta::hours(1)));
    }

    #[test]
    fn test_zero_steps() {
        let end = Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap();
        assert_eq!(TimeSteps::hours_ending_at(end, 0).len(), 0);
    }
}

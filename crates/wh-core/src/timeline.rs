//! ASCII occupancy bar for a day's events.
//!
//! The window is sampled at bucket centers: the first at
//! `start + resolution / 2`, then every `resolution`, while the center is
//! before `end + resolution / 2`. Each bucket shows the first character of
//! the first event containing its center, or a space. Containment is
//! inclusive at both ends, so a center exactly on an event boundary counts
//! as inside.

use chrono::{Duration, NaiveDate, NaiveDateTime, NaiveTime};

use crate::error::AccountingError;
use crate::event::{DayEvents, Event, EventTime};

/// Delimiter written before and after the bar.
const BAR_EDGE: &str = "[]";

/// Time-of-day window and sampling resolution for a timeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimelineWindow {
    start: NaiveTime,
    end: NaiveTime,
    resolution: Duration,
}

impl Default for TimelineWindow {
    fn default() -> Self {
        Self::working_hours()
    }
}

impl TimelineWindow {
    pub fn new(
        start: NaiveTime,
        end: NaiveTime,
        resolution: Duration,
    ) -> Result<Self, AccountingError> {
        if resolution <= Duration::zero() || resolution > Duration::days(1) {
            return Err(AccountingError::InvalidResolution);
        }
        Ok(Self {
            start,
            end,
            resolution,
        })
    }

    /// 08:00 to 17:00 in 15 minute buckets.
    pub fn working_hours() -> Self {
        Self {
            start: NaiveTime::from_hms_opt(8, 0, 0).unwrap_or(NaiveTime::MIN),
            end: NaiveTime::from_hms_opt(17, 0, 0).unwrap_or(NaiveTime::MIN),
            resolution: Duration::minutes(15),
        }
    }

    /// The whole day (00:00 to 23:59:59) in 15 minute buckets.
    pub fn full_day() -> Self {
        Self {
            start: NaiveTime::MIN,
            end: NaiveTime::from_hms_opt(23, 59, 59).unwrap_or(NaiveTime::MIN),
            resolution: Duration::minutes(15),
        }
    }

    /// Bucket centers on the reference date; late centers may fall on the next day.
    fn bucket_centers(&self) -> Vec<NaiveDateTime> {
        let half = self.resolution / 2;
        let mut centers = Vec::new();
        let (Some(limit), Some(mut center)) = (
            reference(self.end).checked_add_signed(half),
            reference(self.start).checked_add_signed(half),
        ) else {
            return centers;
        };
        while center < limit {
            centers.push(center);
            match center.checked_add_signed(self.resolution) {
                Some(next) => center = next,
                None => break,
            }
        }
        centers
    }

    /// Number of characters between the delimiters.
    pub fn bucket_count(&self) -> usize {
        self.bucket_centers().len()
    }
}

/// Arbitrary fixed date used to place times of day on one line.
fn reference(time: NaiveTime) -> NaiveDateTime {
    NaiveDate::MIN.and_time(time)
}

/// Time-of-day span of an event; all-day events cover the whole day.
fn time_span(event: &Event) -> (NaiveDateTime, NaiveDateTime) {
    let whole_day_end = NaiveTime::from_hms_opt(23, 59, 59).unwrap_or(NaiveTime::MIN);
    let start = match event.start {
        EventTime::DateTime(at) => at.time(),
        EventTime::Date(_) => NaiveTime::MIN,
    };
    let end = match event.end {
        EventTime::DateTime(at) => at.time(),
        EventTime::Date(_) => whole_day_end,
    };
    (reference(start), reference(end))
}

/// Inclusive range test that wraps past midnight when `start > end`.
fn in_range(x: NaiveDateTime, start: NaiveDateTime, end: NaiveDateTime) -> bool {
    if start <= end {
        start <= x && x <= end
    } else {
        start <= x || x <= end
    }
}

/// Renders the occupancy bar for one day's events.
///
/// Only the time of day is compared, which is why the input is a
/// [`DayEvents`]: every event is known to start on the same date.
pub fn render_timeline(day: &DayEvents<'_>, window: &TimelineWindow) -> String {
    let spans: Vec<(char, NaiveDateTime, NaiveDateTime)> = day
        .iter()
        .map(|event| {
            let (start, end) = time_span(event);
            let mark = event.summary.chars().next().unwrap_or(' ');
            (mark, start, end)
        })
        .collect();

    let mut bar = String::from(BAR_EDGE);
    for center in window.bucket_centers() {
        let mark = spans
            .iter()
            .find(|(_, start, end)| in_range(center, *start, *end))
            .map_or(' ', |(mark, _, _)| *mark);
        bar.push(mark);
    }
    bar.push_str(BAR_EDGE);
    bar
}

#[cfg(test)]
mod tests {
    use super::*;

    use chrono::DateTime;

    fn timed(summary: &str, start: &str, end: &str) -> Event {
        Event {
            id: String::new(),
            summary: summary.to_string(),
            description: None,
            location: None,
            start: EventTime::DateTime(DateTime::parse_from_rfc3339(start).unwrap()),
            end: EventTime::DateTime(DateTime::parse_from_rfc3339(end).unwrap()),
        }
    }

    fn render(events: &[Event]) -> String {
        let date = NaiveDate::from_ymd_opt(2020, 10, 14).unwrap();
        render_timeline(&DayEvents::on(events, date), &TimelineWindow::default())
    }

    #[test]
    fn single_event() {
        let events = [timed(
            "WORK",
            "2020-10-14T10:00:00+02:00",
            "2020-10-14T14:00:00+02:00",
        )];
        assert_eq!(render(&events), "[]        WWWWWWWWWWWWWWWW            []");
    }

    #[test]
    fn two_events() {
        let events = [
            timed("WORK", "2020-10-14T08:00:00+02:00", "2020-10-14T10:00:00+02:00"),
            timed("WORK", "2020-10-14T14:00:00+02:00", "2020-10-14T15:00:00+02:00"),
        ];
        assert_eq!(render(&events), "[]WWWWWWWW                WWWW        []");
    }

    #[test]
    fn start_just_after_bucket_center_misses_it() {
        let events = [timed(
            "WORK",
            "2020-10-14T10:07:31+02:00",
            "2020-10-14T14:00:00+02:00",
        )];
        assert_eq!(render(&events), "[]         WWWWWWWWWWWWWWW            []");
    }

    #[test]
    fn start_exactly_on_bucket_center_is_inside() {
        let events = [timed(
            "WORK",
            "2020-10-14T10:07:30+02:00",
            "2020-10-14T14:00:00+02:00",
        )];
        assert_eq!(render(&events), "[]        WWWWWWWWWWWWWWWW            []");
    }

    #[test]
    fn no_events_renders_blank_bar() {
        let bar = render(&[]);
        assert_eq!(bar, format!("[]{}[]", " ".repeat(36)));
    }

    #[test]
    fn first_matching_event_wins() {
        let events = [
            timed("JOUR", "2020-10-14T08:00:00+02:00", "2020-10-14T09:00:00+02:00"),
            timed("WORK", "2020-10-14T08:00:00+02:00", "2020-10-14T10:00:00+02:00"),
        ];
        assert_eq!(render(&events), "[]JJJJWWWW                            []");
    }

    #[test]
    fn overnight_span_wraps_around_midnight() {
        let events = [timed(
            "ON-CALL",
            "2020-10-14T16:00:00+02:00",
            "2020-10-15T08:30:00+02:00",
        )];
        // Covers 08:07:30 and 08:22:30 in the morning and 16:07:30 onwards.
        assert_eq!(render(&events), "[]OO                              OOOO[]");
    }

    #[test]
    fn all_day_event_fills_the_window() {
        let date = NaiveDate::from_ymd_opt(2020, 10, 14).unwrap();
        let events = [Event {
            id: String::new(),
            summary: "VACATION".to_string(),
            description: None,
            location: None,
            start: EventTime::Date(date),
            end: EventTime::Date(date.succ_opt().unwrap()),
        }];
        assert_eq!(render(&events), format!("[]{}[]", "V".repeat(36)));
    }

    #[test]
    fn bucket_counts() {
        assert_eq!(TimelineWindow::working_hours().bucket_count(), 36);
        assert_eq!(TimelineWindow::full_day().bucket_count(), 96);

        let hourly = TimelineWindow::new(
            NaiveTime::from_hms_opt(9, 0, 0).unwrap(),
            NaiveTime::from_hms_opt(12, 0, 0).unwrap(),
            Duration::hours(1),
        )
        .unwrap();
        assert_eq!(hourly.bucket_count(), 3);

        let empty = DayEvents::on(&[], NaiveDate::from_ymd_opt(2020, 10, 14).unwrap());
        assert_eq!(render_timeline(&empty, &hourly).len(), 4 + 3);
    }

    #[test]
    fn zero_resolution_is_rejected() {
        assert_eq!(
            TimelineWindow::new(NaiveTime::MIN, NaiveTime::MIN, Duration::zero()),
            Err(AccountingError::InvalidResolution)
        );
    }

    #[test]
    fn resolution_longer_than_a_day_is_rejected() {
        assert_eq!(
            TimelineWindow::new(NaiveTime::MIN, NaiveTime::MIN, Duration::days(400_000_000)),
            Err(AccountingError::InvalidResolution)
        );
    }

    #[test]
    fn day_long_resolution_renders_one_bucket() {
        let window = TimelineWindow::new(
            NaiveTime::MIN,
            NaiveTime::from_hms_opt(23, 59, 59).unwrap(),
            Duration::days(1),
        )
        .unwrap();
        let events = vec![timed("WORK", "2020-10-14T11:00:00Z", "2020-10-14T13:00:00Z")];
        let day = DayEvents::on(&events, NaiveDate::from_ymd_opt(2020, 10, 14).unwrap());
        assert_eq!(render_timeline(&day, &window), "[]W[]");
    }
}

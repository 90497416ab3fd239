//! Terminal rendering for summaries.

use owo_colors::OwoColorize;
use wh_core::{Summary, SummaryEntry};

/// The summary report: one line per entry, then the total.
///
/// With `color`, weekend days are dimmed and week/month subtotals bold.
pub fn summary_report(summary: &Summary, color: bool) -> String {
    let mut lines: Vec<String> = summary
        .entries
        .iter()
        .map(|entry| {
            let line = entry.render();
            if !color {
                return line;
            }
            match entry {
                SummaryEntry::Day(day) if day.is_weekend() => line.dimmed().to_string(),
                SummaryEntry::Day(_) => line,
                SummaryEntry::Week { .. } | SummaryEntry::Month { .. } => line.bold().to_string(),
            }
        })
        .collect();
    lines.push(summary.total_line());
    lines.join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    use chrono::{DateTime, Duration, NaiveDate, NaiveTime};
    use insta::assert_snapshot;
    use wh_core::{
        Categories, Event, EventTime, Policy, PolicyTable, SummaryOptions, TimelineWindow,
        summarize,
    };

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn work(start: &str, end: &str) -> Event {
        Event {
            id: start.to_string(),
            summary: "WORK".to_string(),
            description: None,
            location: None,
            start: EventTime::DateTime(DateTime::parse_from_rfc3339(start).unwrap()),
            end: EventTime::DateTime(DateTime::parse_from_rfc3339(end).unwrap()),
        }
    }

    /// Friday 9h, weekend off, Monday 7h, against 8h weekdays.
    fn weekend_summary() -> Summary {
        let events = vec![
            work("2020-10-16T09:00:00Z", "2020-10-16T18:00:00Z"),
            work("2020-10-19T09:00:00Z", "2020-10-19T16:00:00Z"),
        ];
        let policies = PolicyTable::new(vec![Policy {
            effective_from: date(2020, 1, 1),
            hours_by_weekday: [8.0, 8.0, 8.0, 8.0, 8.0, 0.0, 0.0],
        }])
        .unwrap();
        let options = SummaryOptions {
            days: true,
            weeks: true,
            months: false,
            timeline: TimelineWindow::new(
                NaiveTime::from_hms_opt(8, 0, 0).unwrap(),
                NaiveTime::from_hms_opt(11, 0, 0).unwrap(),
                Duration::hours(1),
            )
            .unwrap(),
        };
        summarize(
            &events,
            date(2020, 10, 16),
            date(2020, 10, 19),
            &policies,
            &Categories::default(),
            &options,
        )
        .unwrap()
    }

    fn trimmed(report: &str) -> String {
        report
            .lines()
            .map(str::trim_end)
            .collect::<Vec<_>>()
            .join("\n")
    }

    #[test]
    fn test_summary_report_plain() {
        let report = summary_report(&weekend_summary(), false);
        assert_snapshot!(trimmed(&report), @r"
        2020-10-16 09:00:00 +01:00:00   [] WW[] +01:00:00
        2020-10-17 00:00:00 -00:00:00   []   [] +01:00:00
        2020-10-18 00:00:00 -00:00:00   []   [] +01:00:00
         ** WEEK 42 SUMMARY: +01:00:00
        2020-10-19 07:00:00 -01:00:00   [] WW[] -00:00:00
        Total: -00:00:00
        ");
    }

    #[test]
    fn test_summary_report_colors_weekends_only() {
        let report = summary_report(&weekend_summary(), true);
        let lines: Vec<&str> = report.lines().collect();
        assert!(!lines[0].contains('\u{1b}'));
        assert!(lines[1].contains('\u{1b}'));
        assert!(lines[2].contains('\u{1b}'));
        assert!(lines[3].contains('\u{1b}'));
        assert!(!lines[4].contains('\u{1b}'));
        assert_eq!(lines[5], "Total: -00:00:00  ");
    }
}

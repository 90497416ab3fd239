//! Fixed-width duration and event formatting.

use chrono::Duration;

use crate::event::{Event, EventTime};

/// Default template for [`format_elapsed`].
pub const ELAPSED_FORMAT: &str = "%H:%M:%S";

/// Hours above which a deviation is flagged with `<`.
const LARGE_DEVIATION_HOURS: u64 = 3;

/// Formats a signed number of seconds as `+HH:MM:SS ` / `-HH:MM:SS<`.
///
/// Positive values get `plus_sign`, zero and negative values get `-`.
/// The magnitude is floored into hours, minutes and seconds; the trailing
/// flag is `<` when the hour count exceeds three and a space otherwise, so
/// the output width only grows past 100 hours.
#[allow(
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss,
    reason = "magnitude is non-negative and floored; out-of-range values saturate"
)]
pub fn format_signed_duration(seconds: f64, plus_sign: &str) -> String {
    let sign = if seconds > 0.0 { plus_sign } else { "-" };
    let magnitude = seconds.abs();

    let hours = (magnitude / 3600.0).floor() as u64;
    let remainder = magnitude % 3600.0;
    let minutes = (remainder / 60.0).floor() as u64;
    let secs = (remainder % 60.0).floor() as u64;

    let flag = if hours > LARGE_DEVIATION_HOURS { '<' } else { ' ' };
    format!("{sign}{hours:02}:{minutes:02}:{secs:02} {flag}")
}

/// [`format_signed_duration`] with a `+` for positive values.
pub fn format_deviation(seconds: f64) -> String {
    format_signed_duration(seconds, "+")
}

/// Renders an elapsed duration through a `%`-template.
///
/// Placeholders: `%D` days, `%H` hours within the day, `%M` minutes and
/// `%S` seconds (the last three zero-padded), `%%` a literal percent sign.
/// Anything else is copied through. Sub-second precision is dropped.
pub fn format_elapsed(duration: Duration, fmt: &str) -> String {
    let total = duration.num_seconds();
    let days = total.div_euclid(86_400);
    let in_day = total.rem_euclid(86_400);
    let hours = in_day / 3600;
    let minutes = (in_day % 3600) / 60;
    let seconds = in_day % 60;

    let mut output = String::with_capacity(fmt.len());
    let mut chars = fmt.chars();
    while let Some(c) = chars.next() {
        if c != '%' {
            output.push(c);
            continue;
        }
        match chars.next() {
            Some('D') => output.push_str(&days.to_string()),
            Some('H') => output.push_str(&format!("{hours:02}")),
            Some('M') => output.push_str(&format!("{minutes:02}")),
            Some('S') => output.push_str(&format!("{seconds:02}")),
            Some('%') => output.push('%'),
            Some(other) => {
                output.push('%');
                output.push(other);
            }
            None => output.push('%'),
        }
    }
    output
}

/// One listing line: `date start-end (duration) SUMMARY [id] : description`.
pub fn format_event(event: &Event) -> String {
    let span = match (event.start, event.end) {
        (EventTime::DateTime(start), EventTime::DateTime(end)) => {
            format!("{}-{}", start.time(), end.time())
        }
        _ => "all-day".to_string(),
    };
    let duration = event.duration().map_or_else(
        |_| "--:--:--  ".to_string(),
        |span| format_signed_duration(seconds_f64(span), ""),
    );
    format!(
        "{} {span} ({duration}) {} [{}] : {}",
        event.date(),
        event.summary,
        event.id,
        event.description.as_deref().unwrap_or_default()
    )
}

/// Duration as fractional seconds (millisecond precision).
#[allow(
    clippy::cast_precision_loss,
    reason = "millisecond counts stay far below 2^52"
)]
pub fn seconds_f64(duration: Duration) -> f64 {
    duration.num_milliseconds() as f64 / 1000.0
}

#[cfg(test)]
mod tests {
    use super::*;

    use crate::event::EventRecord;

    #[test]
    fn positive_deviation_gets_plus_sign() {
        assert_eq!(format_deviation(2880.0), "+00:48:00  ");
    }

    #[test]
    fn zero_and_negative_get_minus_sign() {
        assert_eq!(format_deviation(0.0), "-00:00:00  ");
        assert_eq!(format_deviation(-25_920.0), "-07:12:00 <");
    }

    #[test]
    fn flag_appears_only_above_three_hours() {
        assert_eq!(format_deviation(3.0 * 3600.0 + 3599.0), "+03:59:59  ");
        assert_eq!(format_deviation(4.0 * 3600.0), "+04:00:00 <");
    }

    #[test]
    fn fractional_seconds_are_truncated() {
        assert_eq!(format_deviation(59.999), "+00:00:59  ");
        assert_eq!(format_deviation(-0.5), "-00:00:00  ");
    }

    #[test]
    fn custom_plus_sign() {
        assert_eq!(format_signed_duration(14_400.0, ""), "04:00:00 <");
    }

    #[test]
    fn hours_grow_past_two_digits() {
        assert_eq!(format_deviation(-360_000.0), "-100:00:00 <");
    }

    #[test]
    fn sign_flip_only_changes_the_sign_character() {
        for x in [1.0, 59.5, 3600.0, 12_345.678, 86_400.0 * 3.0, 0.25] {
            let positive = format_deviation(x);
            let negative = format_deviation(-x);
            assert_eq!(negative, format!("-{}", &positive[1..]), "x = {x}");
        }
    }

    #[test]
    fn elapsed_default_format() {
        let worked = Duration::hours(7) + Duration::minutes(12) + Duration::seconds(5);
        assert_eq!(format_elapsed(worked, ELAPSED_FORMAT), "07:12:05");
        assert_eq!(format_elapsed(Duration::zero(), ELAPSED_FORMAT), "00:00:00");
    }

    #[test]
    fn elapsed_hours_wrap_into_days() {
        let long = Duration::hours(26) + Duration::minutes(3);
        assert_eq!(format_elapsed(long, ELAPSED_FORMAT), "02:03:00");
        assert_eq!(format_elapsed(long, "%Dd %H:%M"), "1d 02:03");
    }

    #[test]
    fn elapsed_passes_unknown_placeholders_through() {
        assert_eq!(format_elapsed(Duration::minutes(90), "%H%% %X %"), "01% %X %");
    }

    #[test]
    fn event_line_for_timed_event() {
        let event = crate::Event::try_from(
            serde_json::from_str::<EventRecord>(
                r#"{"id": "abc", "summary": "WORK", "description": "review",
                    "start": {"dateTime": "2020-10-14T10:00:00+02:00"},
                    "end": {"dateTime": "2020-10-14T14:00:00+02:00"}}"#,
            )
            .unwrap(),
        )
        .unwrap();
        assert_eq!(
            format_event(&event),
            "2020-10-14 10:00:00-14:00:00 (04:00:00 <) WORK [abc] : review"
        );
    }

    #[test]
    fn event_line_for_all_day_event() {
        let event = crate::Event::try_from(
            serde_json::from_str::<EventRecord>(
                r#"{"id": "v", "summary": "VACATION",
                    "start": {"date": "2020-10-14"}, "end": {"date": "2020-10-15"}}"#,
            )
            .unwrap(),
        )
        .unwrap();
        assert_eq!(
            format_event(&event),
            "2020-10-14 all-day (--:--:--  ) VACATION [v] : "
        );
    }
}

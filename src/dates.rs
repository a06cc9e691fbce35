use chrono::NaiveDate;

const WEEK_SEPARATOR: &str = " - ";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DateFormat {
    Short,
    Long,
}

/// Human label for a record date or a `"<first> - <last>"` week label.
///
/// Anything that is not an ISO date is returned unchanged.
pub fn display_label(date_key: &str, format: DateFormat) -> String {
    match date_key.split_once(WEEK_SEPARATOR) {
        Some((first, last)) => format!(
            "{}{WEEK_SEPARATOR}{}",
            format_day(first, format),
            format_day(last, format)
        ),
        None => format_day(date_key, format),
    }
}

fn format_day(raw: &str, format: DateFormat) -> String {
    let Ok(date) = NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d") else {
        return raw.to_string();
    };
    match format {
        DateFormat::Short => date.format("%b %-d").to_string(),
        DateFormat::Long => date.format("%b %-d, %Y").to_string(),
    }
}

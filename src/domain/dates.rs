use time::{Date, OffsetDateTime, macros::format_description};

/// Parse an ISO `YYYY-MM-DD` literal.
pub fn parse_date(text: &str) -> Option<Date> {
    let format = format_description!("[year]-[month]-[day]");
    Date::parse(text.trim(), &format).ok()
}

pub fn format_date(date: Date) -> String {
    let format = format_description!("[year]-[month]-[day]");
    date.format(&format).unwrap_or_else(|_| date.to_string())
}

pub fn today() -> Date {
    OffsetDateTime::now_utc().date()
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::Month;

    #[test]
    fn parses_iso_dates_and_rejects_garbage() {
        let date = parse_date(" 2024-02-29 ").expect("leap day parses");
        assert_eq!(date.year(), 2024);
        assert_eq!(date.month(), Month::February);
        assert_eq!(date.day(), 29);
        assert!(parse_date("2023-02-29").is_none());
        assert!(parse_date("29/02/2024").is_none());
    }

    #[test]
    fn formats_with_zero_padding() {
        let date = Date::from_calendar_date(2024, Month::March, 5).unwrap();
        assert_eq!(format_date(date), "2024-03-05");
    }
}

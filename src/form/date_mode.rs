use time::Date;

use crate::domain::DateMode;

/// Badge text for a picked date, or `None` when the mode carries no badge.
pub fn decorate(selected: Date, mode: DateMode, today: Date) -> Option<String> {
    match mode {
        DateMode::None => None,
        DateMode::Birth => Some(format!("{}yrs", age_in_years(selected, today))),
        DateMode::Expiry => Some(time_until(selected, today)),
    }
}

/// Whole calendar years between `born` and `today`; a birthday not reached
/// yet this year does not count. Future dates give zero.
pub fn age_in_years(born: Date, today: Date) -> i32 {
    let mut years = today.year() - born.year();
    if (today.month() as u8, today.day()) < (born.month() as u8, born.day()) {
        years -= 1;
    }
    years.max(0)
}

pub fn time_until(expiry: Date, today: Date) -> String {
    let days = (expiry - today).whole_days();
    match days {
        0 => "expires today".to_string(),
        d if d > 0 => format!("in {}", span(d)),
        d => format!("expired {} ago", span(-d)),
    }
}

fn span(days: i64) -> String {
    let (amount, unit) = if days < 30 {
        (days, "day")
    } else if days < 365 {
        (days / 30, "month")
    } else {
        (days / 365, "year")
    };
    if amount == 1 {
        format!("1 {unit}")
    } else {
        format!("{amount} {unit}s")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::macros::date;

    const TODAY: Date = date!(2024 - 06 - 15);

    #[test]
    fn birthday_not_reached_counts_one_year_less() {
        let born = date!(1990 - 06 - 16);
        assert_eq!(age_in_years(born, TODAY), 2024 - 1990 - 1);
        assert_eq!(
            decorate(born, DateMode::Birth, TODAY).as_deref(),
            Some("33yrs")
        );
    }

    #[test]
    fn birthday_passed_or_today_counts_full_year() {
        assert_eq!(age_in_years(date!(1990 - 06 - 14), TODAY), 34);
        assert_eq!(age_in_years(date!(1990 - 06 - 15), TODAY), 34);
        assert_eq!(age_in_years(date!(1990 - 01 - 01), TODAY), 34);
    }

    #[test]
    fn expiry_wording_covers_future_and_past() {
        assert_eq!(time_until(TODAY, TODAY), "expires today");
        assert_eq!(time_until(date!(2024 - 06 - 16), TODAY), "in 1 day");
        assert_eq!(time_until(date!(2024 - 06 - 18), TODAY), "in 3 days");
        assert_eq!(time_until(date!(2024 - 08 - 20), TODAY), "in 2 months");
        assert_eq!(time_until(date!(2026 - 07 - 01), TODAY), "in 2 years");
        assert_eq!(time_until(date!(2024 - 06 - 10), TODAY), "expired 5 days ago");
    }

    #[test]
    fn plain_dates_have_no_badge() {
        assert!(decorate(TODAY, DateMode::None, TODAY).is_none());
    }
}

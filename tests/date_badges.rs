use formctl::domain::DateMode;
use formctl::form::date_mode::{age_in_years, decorate};
use proptest::prelude::*;
use time::{Date, Duration, Month, macros::date};

fn arb_date() -> impl Strategy<Value = Date> {
    (1950i32..2030, 1u8..=12, 1u8..=28).prop_map(|(year, month, day)| {
        let month = Month::try_from(month).unwrap_or(Month::January);
        Date::from_calendar_date(year, month, day).unwrap_or(date!(2000 - 01 - 01))
    })
}

#[test]
fn day_before_birthday_is_one_year_short() {
    let today = date!(2024 - 06 - 15);
    let born = date!(1990 - 06 - 16);
    assert_eq!(
        decorate(born, DateMode::Birth, today).as_deref(),
        Some("33yrs")
    );
    let born = date!(1990 - 06 - 14);
    assert_eq!(
        decorate(born, DateMode::Birth, today).as_deref(),
        Some("34yrs")
    );
}

#[test]
fn leap_day_birthdays_count_from_march_in_common_years() {
    let born = date!(2000 - 02 - 29);
    assert_eq!(age_in_years(born, date!(2023 - 02 - 28)), 22);
    assert_eq!(age_in_years(born, date!(2023 - 03 - 01)), 23);
}

proptest! {
    #[test]
    fn birthday_boundary_matches_year_difference(born in arb_date(), year in 1950i32..2040) {
        prop_assume!(year > born.year());
        let birthday = Date::from_calendar_date(year, born.month(), born.day()).unwrap();
        let day_before = birthday - Duration::days(1);
        prop_assert_eq!(age_in_years(born, birthday), year - born.year());
        prop_assert_eq!(age_in_years(born, day_before), year - born.year() - 1);
    }

    #[test]
    fn ages_are_never_negative(born in arb_date(), today in arb_date()) {
        prop_assert!(age_in_years(born, today) >= 0);
    }

    #[test]
    fn expiry_wording_matches_direction(expiry in arb_date(), today in arb_date()) {
        let badge = decorate(expiry, DateMode::Expiry, today).unwrap();
        if expiry > today {
            prop_assert!(badge.starts_with("in "));
        } else if expiry < today {
            prop_assert!(badge.starts_with("expired ") && badge.ends_with(" ago"));
        } else {
            prop_assert_eq!(badge, "expires today");
        }
    }
}

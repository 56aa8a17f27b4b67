use time::{Date, Duration, Month, Weekday, util::days_in_year_month};

pub const WEEKDAY_HEADER: [&str; 7] = ["Su", "Mo", "Tu", "We", "Th", "Fr", "Sa"];

/// One visible month of the date picker plus the keyboard cursor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CalendarState {
    year: i32,
    month: Month,
    cursor: Date,
    min: Option<Date>,
    max: Option<Date>,
}

impl CalendarState {
    /// Opens on the selected date when there is one, otherwise on today,
    /// pulled inside the bounds.
    pub fn new(selected: Option<Date>, today: Date, min: Option<Date>, max: Option<Date>) -> Self {
        let mut cursor = selected.unwrap_or(today);
        if let Some(min) = min {
            cursor = cursor.max(min);
        }
        if let Some(max) = max {
            cursor = cursor.min(max);
        }
        Self {
            year: cursor.year(),
            month: cursor.month(),
            cursor,
            min,
            max,
        }
    }

    pub fn cursor(&self) -> Date {
        self.cursor
    }

    pub fn year(&self) -> i32 {
        self.year
    }

    pub fn month(&self) -> Month {
        self.month
    }

    pub fn month_label(&self) -> String {
        format!("{} {}", self.month, self.year)
    }

    pub fn is_selectable(&self, date: Date) -> bool {
        self.min.is_none_or(|min| date >= min) && self.max.is_none_or(|max| date <= max)
    }

    /// Sunday-first rows; cells outside the month are empty.
    pub fn weeks(&self) -> Vec<[Option<Date>; 7]> {
        let Ok(first) = Date::from_calendar_date(self.year, self.month, 1) else {
            return Vec::new();
        };
        let offset = first.weekday().number_days_from_sunday() as usize;
        let days = days_in_year_month(self.year, self.month);
        let mut weeks = Vec::new();
        let mut row = [None; 7];
        let mut column = offset;
        for day in 1..=days {
            row[column] = Date::from_calendar_date(self.year, self.month, day).ok();
            column += 1;
            if column == 7 {
                weeks.push(row);
                row = [None; 7];
                column = 0;
            }
        }
        if column > 0 {
            weeks.push(row);
        }
        weeks
    }

    pub fn can_go_prev(&self) -> bool {
        let Some(min) = self.min else {
            return true;
        };
        (self.year, self.month as u8) > (min.year(), min.month() as u8)
    }

    pub fn can_go_next(&self) -> bool {
        let Some(max) = self.max else {
            return true;
        };
        (self.year, self.month as u8) < (max.year(), max.month() as u8)
    }

    pub fn prev_month(&mut self) -> bool {
        if !self.can_go_prev() {
            return false;
        }
        if self.month == Month::January {
            self.year -= 1;
        }
        self.month = self.month.previous();
        self.clamp_cursor_into_month();
        true
    }

    pub fn next_month(&mut self) -> bool {
        if !self.can_go_next() {
            return false;
        }
        if self.month == Month::December {
            self.year += 1;
        }
        self.month = self.month.next();
        self.clamp_cursor_into_month();
        true
    }

    /// Move the cursor by whole days, following it across month boundaries.
    /// Moves that would leave the bounds are ignored.
    pub fn move_cursor(&mut self, days: i64) -> bool {
        let Some(next) = self.cursor.checked_add(Duration::days(days)) else {
            return false;
        };
        if !self.is_selectable(next) {
            return false;
        }
        self.cursor = next;
        self.year = next.year();
        self.month = next.month();
        true
    }

    fn clamp_cursor_into_month(&mut self) {
        let last = days_in_year_month(self.year, self.month);
        let day = self.cursor.day().min(last);
        if let Ok(date) = Date::from_calendar_date(self.year, self.month, day) {
            self.cursor = date;
        }
        if let Some(min) = self.min {
            self.cursor = self.cursor.max(min);
        }
        if let Some(max) = self.max {
            self.cursor = self.cursor.min(max);
        }
    }
}

pub fn weekday_column(weekday: Weekday) -> usize {
    weekday.number_days_from_sunday() as usize
}

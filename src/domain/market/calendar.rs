use chrono::{Datelike, Duration, NaiveDate, Weekday};

/// First business day strictly after `after`.
///
/// Saturday and Sunday are the only non-trading days considered; exchange
/// holidays are out of scope.
pub fn next_business_day(after: NaiveDate) -> NaiveDate {
    let mut day = after + Duration::days(1);
    while matches!(day.weekday(), Weekday::Sat | Weekday::Sun) {
        day += Duration::days(1);
    }
    day
}

mod bar;
mod calendar;

pub use bar::{Bar, validate_ordering};
pub use calendar::next_business_day;

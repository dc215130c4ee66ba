/// custom recurrence rules - twice-monthly, weekday, and day-interval schedules
use payment_schedule_rs::chrono::{NaiveDate, Weekday};
use payment_schedule_rs::{CustomRecurrence, RecurrenceGenerator, RecurrenceRule};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let start = NaiveDate::from_ymd_opt(2024, 1, 1).ok_or("bad date")?;

    // rent-style: the 1st and the 15th of every month
    let twice_monthly = RecurrenceRule::Custom(CustomRecurrence::MultipleDatesPerMonth {
        days_of_month: vec![1, 15],
    });
    println!("1st and 15th of each month:");
    for date in RecurrenceGenerator::generate(&twice_monthly, start, 6)? {
        println!("  {date}");
    }

    // payday-style: every other friday
    let biweekly_friday = RecurrenceRule::Custom(CustomRecurrence::DayOfWeek {
        weekday: Weekday::Fri,
        every_n_weeks: 2,
    });
    println!("\nevery other friday:");
    for date in RecurrenceGenerator::generate(&biweekly_friday, start, 6)? {
        println!("  {date}");
    }

    // every 45 days from an explicit anchor
    let interval = RecurrenceRule::Custom(CustomRecurrence::Interval {
        every_n_days: 45,
        anchor_date: NaiveDate::from_ymd_opt(2024, 2, 1),
    });
    println!("\nevery 45 days from 2024-02-01:");
    for date in RecurrenceGenerator::generate(&interval, start, 6)? {
        println!("  {date}");
    }

    // month-end clamping: the 31st collapses to short months' last day
    let month_end = RecurrenceRule::Custom(CustomRecurrence::DayOfMonth { day: 31 });
    println!("\nthe 31st (clamped to month length):");
    for date in RecurrenceGenerator::generate(&month_end, start, 6)? {
        println!("  {date}");
    }

    Ok(())
}

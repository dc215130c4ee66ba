/// payoff plan lifecycle - sweep a missed payment past due, then catch up
use payment_schedule_rs::chrono::{NaiveDate, TimeZone, Utc};
use payment_schedule_rs::{
    EventStore, Money, Payment, PaymentLifecycleManager, PaymentView, PayoffPlanInput,
    PlannedPaymentInput, ProjectedPayment, SafeTimeProvider, StatusSweeper, TimeSource,
};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    // pin the clock to mid-june
    let time = SafeTimeProvider::new(TimeSource::Test(
        Utc.with_ymd_and_hms(2024, 6, 15, 9, 0, 0).single().ok_or("bad time")?,
    ));
    let manager = PaymentLifecycleManager::new(&time);
    let sweeper = StatusSweeper::new(&time);
    let mut events = EventStore::new();

    // a $300 payment that was due on june 1st and never arrived
    let projection = ProjectedPayment {
        sequence_number: 1,
        due_date: NaiveDate::from_ymd_opt(2024, 6, 1).ok_or("bad date")?,
        scheduled_amount: Money::from_major(300),
        breakdown: None,
    };
    let mut payment = Payment::from_projection(&projection, "tenant-1", "account-1");

    // the sweep runs before any read, so status reflects the calendar
    sweeper.sweep(std::slice::from_mut(&mut payment), &mut events);
    println!("after sweep: {:?}", payment.status);

    // set up two catch-up payments
    manager.create_payoff_plan(
        &mut payment,
        PayoffPlanInput {
            total_past_due: Money::from_major(300),
            target_payoff_date: NaiveDate::from_ymd_opt(2024, 8, 1).ok_or("bad date")?,
            planned_payments: vec![
                PlannedPaymentInput {
                    planned_date: NaiveDate::from_ymd_opt(2024, 7, 1).ok_or("bad date")?,
                    planned_amount: Money::from_major(150),
                },
                PlannedPaymentInput {
                    planned_date: NaiveDate::from_ymd_opt(2024, 8, 1).ok_or("bad date")?,
                    planned_amount: Money::from_major(150),
                },
            ],
        },
        &mut events,
    )?;

    // record both catch-up payments
    let ids: Vec<_> = payment
        .payoff_plan
        .as_ref()
        .ok_or("missing plan")?
        .planned_payments
        .iter()
        .map(|p| p.id)
        .collect();

    for (i, id) in ids.iter().enumerate() {
        manager.record_planned_payment(
            &mut payment,
            *id,
            NaiveDate::from_ymd_opt(2024, 7, i as u32 * 14 + 1).ok_or("bad date")?,
            Money::from_major(150),
            &mut events,
        )?;
        let progress = &payment.payoff_plan.as_ref().ok_or("missing plan")?.progress;
        println!(
            "step {}: {}% complete, {} remaining, on track: {}",
            i + 1,
            progress.percent_complete,
            progress.remaining,
            progress.on_track,
        );
    }

    println!("\nfinal state:");
    println!("{}", PaymentView::from_payment(&payment).to_json_pretty()?);

    for event in events.take_events() {
        println!("event: {event:?}");
    }

    Ok(())
}

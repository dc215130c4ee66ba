/// quick start - project a loan schedule and persist it
use payment_schedule_rs::chrono::NaiveDate;
use payment_schedule_rs::{
    InMemoryPaymentStore, Money, Payment, PaymentStore, PaymentTerms, ProjectionConfig,
};
use rust_decimal_macros::dec;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    // a $100,000 loan at 12% over 12 months, paid monthly
    let start = NaiveDate::from_ymd_opt(2024, 1, 1).ok_or("bad date")?;
    let terms = PaymentTerms::amortized_monthly(Money::from_major(100_000), dec!(12), 12, start);

    // materialize the next 12 payments
    let projected = terms.project(&ProjectionConfig::default())?;

    println!("seq  due date    amount     principal  interest   balance");
    for p in &projected {
        let b = p.breakdown.as_ref().ok_or("missing breakdown")?;
        println!(
            "{:>3}  {}  {:>9}  {:>9}  {:>8}  {:>9}",
            p.sequence_number, p.due_date, p.scheduled_amount, b.principal_paid, b.interest_paid,
            b.balance_after,
        );
    }

    // hand the projection to the persistence layer
    let mut store = InMemoryPaymentStore::new();
    let rows: Vec<Payment> = projected
        .iter()
        .map(|p| Payment::from_projection(p, "tenant-1", "account-1"))
        .collect();
    store.create_many(rows)?;

    println!("\npersisted {} upcoming payments", store.len());

    Ok(())
}

//! End-to-end pricing flow
//!
//! Exercises the full wiring: opt-in flag in the catalog, renewal
//! schedule, cache, and the "due today" output a price filter would
//! append.

use renewal_proration::{
    Amount, BillingPeriod, CurrencySettings, FixedSchedule, MemoryCache, MemoryCatalog, ProductId,
    ProrationService, RenderMemo, SubscriptionProduct, SECONDS_PER_DAY,
};
use rust_decimal_macros::dec;
use std::sync::Arc;
use std::time::Duration;

struct Fixture {
    service: ProrationService,
    schedule: Arc<FixedSchedule>,
}

fn fixture() -> Fixture {
    let schedule = Arc::new(FixedSchedule::new());
    let service = ProrationService::new(
        Arc::new(MemoryCatalog::new()),
        schedule.clone(),
        Arc::new(CurrencySettings::default()),
        Arc::new(MemoryCache::new()),
    );
    Fixture { service, schedule }
}

fn monthly_product(id: i64) -> SubscriptionProduct {
    SubscriptionProduct::new(
        ProductId(id),
        BillingPeriod::Month,
        1,
        Amount::new(dec!(30.00)),
    )
}

#[test]
fn test_opted_in_product_shows_due_today() {
    let fx = fixture();
    let product = monthly_product(21);
    fx.schedule.set_renewal(21, 10 * SECONDS_PER_DAY);
    fx.service.enable_proration(ProductId(21)).unwrap();

    // 10 of ~30.4375 days at 30.00 => 9.86
    assert_eq!(
        fx.service.due_today(&product, 0),
        Some(Amount::new(dec!(9.86)))
    );
    assert_eq!(
        fx.service.due_today_text(&product, 0),
        Some("$9.86 due today".to_string())
    );
}

#[test]
fn test_opt_out_round_trip() {
    let fx = fixture();
    let product = monthly_product(21);
    fx.schedule.set_renewal(21, 10 * SECONDS_PER_DAY);

    // Default is disabled.
    assert_eq!(fx.service.due_today(&product, 0), None);

    fx.service.enable_proration(ProductId(21)).unwrap();
    assert!(fx.service.due_today(&product, 0).is_some());

    fx.service.disable_proration(ProductId(21)).unwrap();
    assert_eq!(fx.service.due_today(&product, 0), None);
}

#[test]
fn test_trial_longer_than_cycle_charges_full_price() {
    let fx = fixture();
    let product = SubscriptionProduct::new(
        ProductId(30),
        BillingPeriod::Year,
        1,
        Amount::new(dec!(120.00)),
    );
    fx.schedule.set_renewal(30, 400 * SECONDS_PER_DAY);
    fx.service.enable_proration(ProductId(30)).unwrap();

    assert_eq!(
        fx.service.due_today(&product, 0),
        Some(Amount::new(dec!(120.00)))
    );
}

#[test]
fn test_renewal_already_covered_shows_nothing() {
    let fx = fixture();
    let product = monthly_product(21);
    fx.service.enable_proration(ProductId(21)).unwrap();

    fx.schedule.set_renewal(21, 0);
    assert_eq!(fx.service.due_today(&product, 0), None);
    assert_eq!(fx.service.due_today(&product, SECONDS_PER_DAY), None);
}

#[test]
fn test_partial_day_rounds_up_to_a_full_trial_day() {
    let fx = fixture();
    let product = monthly_product(21);
    fx.service.enable_proration(ProductId(21)).unwrap();

    // One second past nine days counts as ten trial days.
    fx.schedule.set_renewal(21, 9 * SECONDS_PER_DAY + 1);
    assert_eq!(
        fx.service.due_today(&product, 0),
        Some(Amount::new(dec!(9.86)))
    );
}

#[test]
fn test_cached_result_survives_within_ttl() {
    let fx = fixture();
    let product = monthly_product(21);
    fx.schedule.set_renewal(21, 10 * SECONDS_PER_DAY);
    fx.service.enable_proration(ProductId(21)).unwrap();

    let first = fx.service.due_today(&product, 0);
    let second = fx.service.due_today(&product, 0);
    assert_eq!(first, second);
}

#[test]
fn test_zero_ttl_behaves_as_cache_off() {
    let schedule = Arc::new(FixedSchedule::new());
    schedule.set_renewal(21, 10 * SECONDS_PER_DAY);
    let service = ProrationService::new(
        Arc::new(MemoryCatalog::new()),
        schedule,
        Arc::new(CurrencySettings::default()),
        Arc::new(MemoryCache::new()),
    )
    .with_cache_ttl(Duration::from_secs(0));
    service.enable_proration(ProductId(21)).unwrap();

    let product = monthly_product(21);
    // Every call recomputes; results stay identical because the
    // calculation is pure.
    assert_eq!(
        service.due_today(&product, 0),
        Some(Amount::new(dec!(9.86)))
    );
    assert_eq!(
        service.due_today(&product, 0),
        Some(Amount::new(dec!(9.86)))
    );
}

#[test]
fn test_memo_table_spans_one_rendering_pass() {
    let fx = fixture();
    let product = monthly_product(21);
    fx.schedule.set_renewal(21, 10 * SECONDS_PER_DAY);
    fx.service.enable_proration(ProductId(21)).unwrap();

    let mut memo = RenderMemo::new();
    let first = fx.service.due_today_memoized(&mut memo, &product, 0);
    let second = fx.service.due_today_memoized(&mut memo, &product, 0);

    assert_eq!(first, Some(Amount::new(dec!(9.86))));
    assert_eq!(first, second);
    assert_eq!(memo.len(), 1);
}

#[test]
fn test_zero_decimal_currency() {
    let schedule = Arc::new(FixedSchedule::new());
    schedule.set_renewal(21, 10 * SECONDS_PER_DAY);
    let service = ProrationService::new(
        Arc::new(MemoryCatalog::new()),
        schedule,
        Arc::new(CurrencySettings::new("¥", 0)),
        Arc::new(MemoryCache::new()),
    );
    service.enable_proration(ProductId(21)).unwrap();

    let product = monthly_product(21);
    assert_eq!(
        service.due_today(&product, 0),
        Some(Amount::new(dec!(10)))
    );
    assert_eq!(
        service.due_today_text(&product, 0),
        Some("¥10 due today".to_string())
    );
}

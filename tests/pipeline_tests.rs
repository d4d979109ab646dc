mod support;

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use spreadwatch::app::TickOutcome;
use spreadwatch::domain::{SourceId, SpreadReading};
use spreadwatch::error::FanoutError;
use spreadwatch::testkit::source::Step;

use support::pipeline::{Pipeline, SOURCES};

#[tokio::test(start_paused = true)]
async fn wide_spread_produces_persisted_opportunity() {
    let pipeline = Pipeline::new();
    pipeline.source.script_prices(&[
        ("A", dec!(100)),
        ("B", dec!(101)),
        ("C", dec!(99)),
        ("D", dec!(100)),
    ]);

    let outcome = pipeline.scheduler.tick().await;

    let (event, persisted) = match outcome {
        TickOutcome::Opportunity { event, persisted } => (event, persisted),
        other => panic!("expected opportunity, got {other:?}"),
    };
    assert!(persisted);
    assert_eq!(event.high_source().as_str(), "B");
    assert_eq!(event.low_source().as_str(), "C");
    assert_eq!(event.spread_pct().round_dp(4), dec!(2.0202));

    assert_eq!(
        pipeline.log.records(),
        vec!["[PROFIT] B vs C | Spread: 2.020%".to_string()]
    );

    let opportunities = pipeline.history().opportunities();
    assert_eq!(opportunities.len(), 1);
    assert!(opportunities[0]
        .display_line()
        .ends_with(": [PROFIT] B vs C | Spread: 2.020%"));
}

#[tokio::test(start_paused = true)]
async fn narrow_spread_records_sample_without_event() {
    let pipeline = Pipeline::new();
    pipeline.source.script_prices(&[
        ("A", dec!(100.00)),
        ("B", dec!(100.01)),
        ("C", dec!(100.00)),
        ("D", dec!(100.00)),
    ]);

    let outcome = pipeline.scheduler.tick().await;

    let spread = match outcome {
        TickOutcome::Sampled {
            reading: SpreadReading::BelowThreshold(spread),
        } => spread,
        other => panic!("expected below-threshold sample, got {other:?}"),
    };
    assert_eq!(spread.spread_pct, dec!(0.01));

    assert_eq!(pipeline.history().sample_count(), 1);
    assert_eq!(pipeline.history().opportunity_count(), 0);
    assert_eq!(pipeline.log.attempts(), 0);
}

#[tokio::test(start_paused = true)]
async fn timed_out_source_abandons_tick_and_leaves_history_untouched() {
    let pipeline = Pipeline::new();
    pipeline.source.script_prices(&[
        ("A", dec!(100)),
        ("B", dec!(101)),
        ("C", dec!(99)),
        ("D", dec!(100)),
    ]);
    pipeline.scheduler.tick().await;
    let before = pipeline.history().snapshot();

    pipeline.source.script("C", [Step::hang()]);
    let outcome = pipeline.scheduler.tick().await;

    let error = match outcome {
        TickOutcome::Abandoned { error } => error,
        other => panic!("expected abandoned tick, got {other:?}"),
    };
    assert!(matches!(error, FanoutError::Exhausted { attempts: 3, .. }));
    // One call from the first tick, three from the abandoned one.
    assert_eq!(pipeline.source.calls_for("C"), 4);

    let after = pipeline.history().snapshot();
    assert_eq!(after.samples, before.samples);
    assert_eq!(after.opportunities, before.opportunities);
    assert_eq!(pipeline.log.records().len(), 1);
}

#[tokio::test(start_paused = true)]
async fn every_attempt_timing_out_makes_exactly_three_attempts() {
    let pipeline = Pipeline::new();
    for id in SOURCES {
        pipeline.source.script(id, [Step::hang()]);
    }

    let outcome = pipeline.scheduler.tick().await;

    assert!(matches!(outcome, TickOutcome::Abandoned { .. }));
    for id in SOURCES {
        assert_eq!(pipeline.source.calls_for(id), 3);
    }
    assert_eq!(pipeline.history().sample_count(), 0);
    assert_eq!(pipeline.log.attempts(), 0);
}

#[tokio::test(start_paused = true)]
async fn transient_failure_is_recovered_by_retry() {
    let pipeline = Pipeline::new();
    pipeline.source.script_prices(&[("A", dec!(100)), ("C", dec!(100)), ("D", dec!(100))]);
    pipeline
        .source
        .script("B", [Step::fail(), Step::price(dec!(100))]);

    let outcome = pipeline.scheduler.tick().await;

    assert!(matches!(outcome, TickOutcome::Sampled { .. }));
    assert_eq!(pipeline.history().sample_count(), 1);
}

#[tokio::test(start_paused = true)]
async fn samples_hold_one_price_per_source_in_configured_order() {
    let pipeline = Pipeline::new();
    pipeline.source.script("A", [Step::delayed(dec!(1), 400)]);
    pipeline.source.script("B", [Step::delayed(dec!(2), 300)]);
    pipeline.source.script("C", [Step::delayed(dec!(3), 200)]);
    pipeline.source.script("D", [Step::delayed(dec!(4), 100)]);

    pipeline.scheduler.tick().await;

    let samples = pipeline.history().samples();
    let prices: Vec<_> = samples[0]
        .prices()
        .iter()
        .map(|(id, price)| (id.as_str().to_string(), *price))
        .collect();
    assert_eq!(
        prices,
        vec![
            ("A".to_string(), dec!(1)),
            ("B".to_string(), dec!(2)),
            ("C".to_string(), dec!(3)),
            ("D".to_string(), dec!(4)),
        ]
    );
}

#[tokio::test(start_paused = true)]
async fn collections_stay_bounded_over_many_ticks() {
    let pipeline = Pipeline::new();

    for i in 0..35u32 {
        let high = Decimal::from(101 + i);
        pipeline.source.script_prices(&[
            ("A", dec!(100)),
            ("B", high),
            ("C", dec!(99)),
            ("D", dec!(100)),
        ]);
        pipeline.scheduler.tick().await;

        assert!(pipeline.history().sample_count() <= 20);
        assert!(pipeline.history().opportunity_count() <= 10);
    }

    let samples = pipeline.history().samples();
    assert_eq!(samples.len(), 20);
    // Oldest retained is tick 15, newest is tick 34.
    assert_eq!(samples[0].price_of(&SourceId::new("B")), Some(dec!(116)));
    assert_eq!(samples[19].price_of(&SourceId::new("B")), Some(dec!(135)));

    let events = pipeline.history().opportunities();
    assert_eq!(events.len(), 10);
    assert!(events[0].spread_pct() > events[9].spread_pct());
    assert_eq!(pipeline.log.records().len(), 35);
}

#[tokio::test(start_paused = true)]
async fn persistence_failure_does_not_stop_the_loop() {
    let pipeline = Pipeline::new();
    pipeline.source.script_prices(&[
        ("A", dec!(100)),
        ("B", dec!(101)),
        ("C", dec!(99)),
        ("D", dec!(100)),
    ]);
    pipeline.log.set_failing(true);

    let summary = pipeline
        .scheduler
        .run(tokio::time::sleep(std::time::Duration::from_millis(2_500)))
        .await;

    assert_eq!(summary.ticks, 3);
    assert_eq!(summary.opportunities, 3);
    assert_eq!(summary.persistence_failures, 3);
    assert_eq!(pipeline.history().opportunity_count(), 3);
    assert!(pipeline.log.records().is_empty());
}

#[tokio::test(start_paused = true)]
async fn abandoned_ticks_do_not_stop_the_loop() {
    let pipeline = Pipeline::new();
    pipeline.source.script_prices(&[("A", dec!(100)), ("B", dec!(100)), ("C", dec!(100))]);
    pipeline.source.script("D", [Step::fail()]);

    let summary = pipeline
        .scheduler
        .run(tokio::time::sleep(std::time::Duration::from_millis(2_500)))
        .await;

    assert_eq!(summary.ticks, 3);
    assert_eq!(summary.abandoned, 3);
    assert_eq!(pipeline.history().sample_count(), 0);
}

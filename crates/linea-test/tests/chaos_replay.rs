//! Convergence under hostile delivery
//!
//! The same scripted feed, delivered cleanly and delivered with duplicates
//! and reordering, must converge to the same reconciled state and the same
//! marker set: the producer is a source of present truth, so the next valid
//! update resynchronizes whatever chaos disturbed.

use linea_core::{InstanceName, TimePoint};
use linea_runtime::{SessionConfig, StrategySession};
use linea_test::{ChaosConfig, ChaosDelivery, RecordingSurface, ScriptedProducer};
use proptest::prelude::*;

const START: i64 = 1_700_000_000;

fn scripted_feed() -> Vec<String> {
    let mut producer = ScriptedProducer::new("IPC", TimePoint::from_secs(START));
    let mut frames = Vec::new();

    frames.push(producer.heartbeat().unwrap());
    producer.advance(60);
    frames.push(producer.open(99_000.0, 97_000.0, 101_000.0, 100_000.0));
    for step in 0..4 {
        producer.advance(60);
        frames.push(producer.heartbeat().unwrap());
        producer.advance(60);
        frames.push(producer.trail(97_500.0 + step as f64 * 250.0, 100_000.0));
    }
    producer.advance(60);
    frames.push(producer.close(100_400.0, "STOP_LOSS_HIT"));
    producer.advance(60);
    frames.push(producer.heartbeat().unwrap());
    frames
}

fn run(frames: &[String]) -> StrategySession<RecordingSurface> {
    let mut session = StrategySession::new(SessionConfig::default(), RecordingSurface::new());
    session.select(InstanceName::new("IPC"));
    session.seed_history(Vec::new());
    for frame in frames {
        session.handle_raw(frame);
    }
    session
}

#[test]
fn test_duplicates_and_reorder_converge_to_clean_state() {
    let frames = scripted_feed();
    let clean = run(&frames);

    let mut chaos = ChaosDelivery::new(ChaosConfig {
        duplicate_rate: 0.5,
        swap_rate: 0.3,
        drop_rate: 0.0,
        seed: 7,
    });
    let mangled = chaos.deliver(frames);
    let chaotic = run(&mangled);

    let clean_state = clean.state().unwrap();
    let chaotic_state = chaotic.state().unwrap();
    assert_eq!(clean_state.lines, chaotic_state.lines);
    assert_eq!(clean_state.timestamp, chaotic_state.timestamp);

    // Duplicate events never became duplicate markers
    assert_eq!(clean.surface().markers().len(), chaotic.surface().markers().len());
    assert!(chaotic.stats().duplicates + chaotic.stats().rejected > 0);
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(16))]

    #[test]
    fn prop_any_seed_converges(seed in 0u64..1000) {
        let frames = scripted_feed();
        let clean = run(&frames);

        let mut chaos = ChaosDelivery::new(ChaosConfig {
            duplicate_rate: 0.4,
            swap_rate: 0.4,
            drop_rate: 0.0,
            seed,
        });
        let chaotic = run(&chaos.deliver(frames));

        prop_assert_eq!(
            &clean.state().unwrap().lines,
            &chaotic.state().unwrap().lines
        );
        prop_assert_eq!(
            clean.surface().markers().len(),
            chaotic.surface().markers().len()
        );
    }
}

use multisig_core::application::backoff_delay_ms;
use proptest::prelude::*;

proptest! {
    #[test]
    fn backoff_stays_within_bounds(retry in 0u32..200, min in 1u64..5_000, spread in 0u64..60_000, factor in 1u64..8) {
        let max = min + spread;
        let delay = backoff_delay_ms(retry, min, max, factor);
        prop_assert!(delay >= min);
        prop_assert!(delay <= max);
    }

    #[test]
    fn backoff_never_shrinks_with_retries(retry in 0u32..64, min in 1u64..1_000, spread in 0u64..10_000, factor in 1u64..5) {
        let max = min + spread;
        prop_assert!(backoff_delay_ms(retry + 1, min, max, factor) >= backoff_delay_ms(retry, min, max, factor));
    }
}

#[test]
fn test_backoff_when_default_knobs_then_doubles_until_capped() {
    let delays: Vec<u64> = (0..12).map(|retry| backoff_delay_ms(retry, 100, 1_000, 2)).collect();
    assert!(delays[..7].iter().all(|delay| *delay == 100));
    assert_eq!(delays[7], 128);
    assert_eq!(delays[9], 512);
    assert_eq!(delays[10], 1_000);
    assert_eq!(delays[11], 1_000);
}

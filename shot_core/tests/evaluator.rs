use chrono::Local;
use proptest::prelude::*;
use rstest::rstest;
use shot_core::{ShotConfiguration, ShotStatus, ShotType, classify, evaluate, recommend_grind_time};

#[rstest]
#[case(0.0, ShotStatus::Fast)]
#[case(24.999, ShotStatus::Fast)]
#[case(25.0, ShotStatus::Perfect)]
#[case(27.3, ShotStatus::Perfect)]
#[case(30.0, ShotStatus::Perfect)]
#[case(30.001, ShotStatus::Slow)]
#[case(45.0, ShotStatus::Slow)]
fn boundaries(#[case] t: f64, #[case] expected: ShotStatus) {
    assert_eq!(classify(t), expected);
}

#[rstest]
#[case(
    12.0,
    ShotStatus::Fast,
    "TOO FAST. ACIDIC. UNDER-EXTRACTED.",
    "GRIND FINER (-) OR INCREASE DOSE (+)"
)]
#[case(
    34.0,
    ShotStatus::Slow,
    "TOO SLOW. BITTER. OVER-EXTRACTED.",
    "GRIND COARSER (+) OR DECREASE DOSE (-)"
)]
#[case(
    28.0,
    ShotStatus::Perfect,
    "SOLID SHOT. GOLDEN RATIO HIT.",
    "LOCK IT IN. NO CHANGES."
)]
fn feedback_and_action_follow_status(
    #[case] t: f64,
    #[case] status: ShotStatus,
    #[case] feedback: &str,
    #[case] action: &str,
) {
    let r = evaluate(&ShotConfiguration::default(), t, 36.0, Local::now());
    assert_eq!(r.status(), status);
    assert_eq!(r.feedback(), feedback);
    assert_eq!(r.action(), action);
}

#[test]
fn target_output_is_twice_the_dose() {
    assert_eq!(ShotType::Single.target_output_g(), 18.0);
    assert_eq!(ShotType::Double.target_output_g(), 36.0);
}

#[test]
fn recommendation_example() {
    assert_eq!(recommend_grind_time(8.0, Some(20.0), 18.0), Some(7.2));
    assert_eq!(recommend_grind_time(8.0, Some(0.0), 18.0), None);
    assert_eq!(recommend_grind_time(8.0, None, 18.0), None);
}

#[test]
fn evaluated_time_is_rounded_for_storage() {
    let r = evaluate(&ShotConfiguration::default(), 27.349, 35.5, Local::now());
    assert_eq!(r.extraction_time_s(), 27.3);
    assert_eq!(r.output_weight_g(), 35.5);
    assert_eq!(r.input_weight_g(), 18.0);
}

proptest! {
    #[test]
    fn inside_window_is_perfect(t in 25.0f64..=30.0) {
        prop_assert_eq!(classify(t), ShotStatus::Perfect);
    }

    #[test]
    fn below_window_is_fast(t in 0.0f64..25.0) {
        prop_assert_eq!(classify(t), ShotStatus::Fast);
    }

    #[test]
    fn above_window_is_slow(t in 30.000_001f64..600.0) {
        prop_assert_eq!(classify(t), ShotStatus::Slow);
    }

    #[test]
    fn recommendation_is_linear_in_dose(
        time in 0.5f64..30.0,
        yield_g in 0.5f64..60.0,
    ) {
        let single = recommend_grind_time(time, Some(yield_g), 9.0).unwrap();
        let double = recommend_grind_time(time, Some(yield_g), 18.0).unwrap();
        let exact_double = 18.0 / yield_g * time;
        // One-decimal rounding bounds the error.
        prop_assert!((double - exact_double).abs() <= 0.05 + 1e-9);
        prop_assert!((double - 2.0 * single).abs() <= 0.15 + 1e-9);
    }

    #[test]
    fn non_positive_yield_never_recommends(time in 0.0f64..30.0, yield_g in -50.0f64..=0.0) {
        prop_assert_eq!(recommend_grind_time(time, Some(yield_g), 18.0), None);
    }
}

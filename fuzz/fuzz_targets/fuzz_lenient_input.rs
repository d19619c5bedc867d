#![no_main]
use libfuzzer_sys::fuzz_target;
use shot_core::util::{number_or_zero, parse_lenient};

fuzz_target!(|data: &str| {
    // Typed field input never panics and never yields a non-finite number.
    if let Some(v) = parse_lenient(data) {
        assert!(v.is_finite());
    }
    let t = number_or_zero(data);
    assert!(t.is_finite());

    let cfg = shot_core::ShotConfiguration::default();
    let r = shot_core::evaluate(&cfg, t, number_or_zero(data), chrono::Local::now());
    assert_eq!(r.status(), shot_core::classify(t));
    let _ = shot_core::recommend_grind_time(t, parse_lenient(data), cfg.input_weight_g());
});

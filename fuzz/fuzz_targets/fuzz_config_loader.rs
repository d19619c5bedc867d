#![no_main]
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &str| {
    // Arbitrary TOML must parse or fail cleanly; a parsed config must
    // validate without panicking and map into runtime settings.
    if let Ok(cfg) = toml::from_str::<shot_config::Config>(data) {
        if cfg.validate().is_ok() {
            let shot: shot_core::ShotConfiguration = (&cfg).into();
            let timer: shot_core::TimerCfg = (&cfg.timer).into();
            assert!((1..=20).contains(&shot.grind_size));
            assert!(!timer.period().is_zero());
        }
    }
});

use chrono::Local;
use shot_core::{
    Phase, Session, SessionError, ShotConfiguration, ShotStatus, ShotType, Step, TimerCfg,
    TimerError,
};
use shot_traits::{ManualClock, ManualTicker};

type TestSession = Session<ManualClock, ManualTicker>;

fn session() -> (TestSession, ManualClock, ManualTicker) {
    let clock = ManualClock::new();
    let ticker = ManualTicker::new();
    let s = Session::new(
        ShotConfiguration::default(),
        &TimerCfg::default(),
        clock.clone(),
        ticker.clone(),
    );
    (s, clock, ticker)
}

/// Start a pull and finish it straight away (still in pre-infusion).
fn quick_pull(s: &mut TestSession) {
    s.enter_pull().expect("enter pull");
    s.start_timer().expect("start");
    s.finish_pull().expect("finish");
}

#[test]
fn starts_on_setup_with_defaults() {
    let (s, _, _) = session();
    assert_eq!(s.step(), Step::Setup);
    assert_eq!(s.config().shot_type, ShotType::Double);
    assert_eq!(s.config().target_output_g(), 36.0);
    assert!(s.history().is_empty());
    assert!(!s.timer_active());
    assert_eq!(s.recommended_grind_time_s(), None);
}

#[test]
fn full_workflow_records_a_perfect_shot() {
    let (mut s, clock, ticker) = session();
    s.set_calibration_yield("20");
    assert_eq!(s.recommended_grind_time_s(), Some(7.2));

    s.enter_pull().unwrap();
    s.start_timer().unwrap();
    clock.advance_secs(10.0);
    ticker.fire();
    assert_eq!(s.pump().phase, Phase::Brew);
    clock.advance_secs(27.3);
    ticker.fire();
    let shown = s.pump().display_s;
    assert!((shown - 27.3).abs() < 1e-6);

    let t = s.finish_pull().unwrap();
    assert!((t - 27.3).abs() < 1e-6);
    assert_eq!(s.step(), Step::Analyze);
    assert_eq!(ticker.live(), 0);
    // Output prefilled with the target yield.
    assert_eq!(s.actual_output_g(), Some(36.0));

    s.set_output("38.5").unwrap();
    let r = s.analyze().unwrap().clone();
    assert_eq!(r.status(), ShotStatus::Perfect);
    assert_eq!(r.extraction_time_s(), 27.3);
    assert_eq!(r.output_weight_g(), 38.5);
    assert_eq!(r.grind_time_s(), 7.2);
    assert_eq!(s.history().len(), 1);
    assert_eq!(s.latest(), Some(&r));
}

#[test]
fn finishing_during_preinfusion_grades_fast() {
    let (mut s, clock, _) = session();
    s.enter_pull().unwrap();
    s.start_timer().unwrap();
    clock.advance_secs(4.0);
    assert_eq!(s.finish_pull().unwrap(), 0.0);
    let r = s.analyze().unwrap();
    assert_eq!(r.status(), ShotStatus::Fast);
    assert_eq!(r.output_weight_g(), 36.0);
}

#[test]
fn prefill_follows_shot_type() {
    let (mut s, _, _) = session();
    s.set_shot_type(ShotType::Single);
    quick_pull(&mut s);
    assert_eq!(s.actual_output_g(), Some(18.0));
}

#[test]
fn garbage_output_coerces_to_zero() {
    let (mut s, _, _) = session();
    quick_pull(&mut s);
    s.set_output("lots").unwrap();
    assert_eq!(s.actual_output_g(), Some(0.0));
    assert_eq!(s.analyze().unwrap().output_weight_g(), 0.0);
}

#[test]
fn analyze_only_once_per_pull() {
    let (mut s, _, _) = session();
    quick_pull(&mut s);
    s.analyze().unwrap();
    assert_eq!(s.analyze().err(), Some(SessionError::AlreadyAnalyzed));
    assert_eq!(s.set_output("10").err(), Some(SessionError::AlreadyAnalyzed));
    assert_eq!(s.history().len(), 1);
}

#[test]
fn each_analysis_prepends_and_purge_clears() {
    let (mut s, _, _) = session();
    let at = Local::now();
    for _ in 0..3 {
        quick_pull(&mut s);
        s.analyze_at(at).unwrap();
        s.reset_workflow();
    }
    assert_eq!(s.history().len(), 3);
    let ids: Vec<u64> = s.history().iter().map(|r| r.id()).collect();
    assert!(ids.windows(2).all(|w| w[0] > w[1]), "newest first: {ids:?}");

    assert_eq!(s.purge_history(), 3);
    assert!(s.history().is_empty());
    assert_eq!(s.purge_history(), 0);
}

#[test]
fn reset_workflow_returns_to_setup_and_keeps_history() {
    let (mut s, _, _) = session();
    quick_pull(&mut s);
    s.analyze().unwrap();
    s.reset_workflow();
    assert_eq!(s.step(), Step::Setup);
    assert_eq!(s.latest(), None);
    assert_eq!(s.actual_output_g(), None);
    assert_eq!(s.actual_time_s(), 0.0);
    assert_eq!(s.reading().display_s, 0.0);
    assert_eq!(s.history().len(), 1);
}

#[test]
fn operations_on_the_wrong_screen_are_rejected() {
    let (mut s, _, ticker) = session();
    assert_eq!(
        s.start_timer().err(),
        Some(SessionError::WrongStep {
            expected: Step::Pull,
            actual: Step::Setup
        })
    );
    assert_eq!(ticker.scheduled(), 0);
    assert!(s.analyze().is_err());
    assert!(s.close_history().is_err());
    assert_eq!(s.step(), Step::Setup);
}

#[test]
fn cannot_leave_pull_screen_mid_run() {
    let (mut s, _, ticker) = session();
    s.enter_pull().unwrap();
    s.start_timer().unwrap();
    assert_eq!(s.leave_pull().err(), Some(SessionError::TimerRunning));
    assert_eq!(s.step(), Step::Pull);
    assert_eq!(ticker.live(), 1);

    s.stop_timer().unwrap();
    s.leave_pull().unwrap();
    assert_eq!(s.step(), Step::Setup);
    assert_eq!(s.reading().phase, Phase::Idle);
}

#[test]
fn reset_timer_is_rejected_while_running() {
    let (mut s, _, _) = session();
    s.enter_pull().unwrap();
    s.start_timer().unwrap();
    assert_eq!(
        s.reset_timer().err(),
        Some(SessionError::Timer(TimerError::ResetWhileActive))
    );
    s.stop_timer().unwrap();
    s.reset_timer().unwrap();
    assert_eq!(s.reading().pre_infusion_remaining_s, 10.0);
}

#[test]
fn stop_then_finish_uses_frozen_time() {
    let (mut s, clock, ticker) = session();
    s.enter_pull().unwrap();
    s.start_timer().unwrap();
    clock.advance_secs(10.0);
    ticker.fire();
    s.pump();
    clock.advance_secs(31.0);
    assert!((s.stop_timer().unwrap() - 31.0).abs() < 1e-6);
    assert!((s.finish_pull().unwrap() - 31.0).abs() < 1e-6);
    assert_eq!(s.analyze().unwrap().status(), ShotStatus::Slow);
}

#[test]
fn finish_without_a_run_is_rejected() {
    let (mut s, _, _) = session();
    s.enter_pull().unwrap();
    assert_eq!(
        s.finish_pull().err(),
        Some(SessionError::Timer(TimerError::NotActive))
    );
    assert_eq!(s.step(), Step::Pull);
}

#[test]
fn opening_history_mid_run_tears_the_timer_down() {
    let (mut s, _, ticker) = session();
    s.enter_pull().unwrap();
    s.start_timer().unwrap();
    s.open_history();
    assert_eq!(s.step(), Step::History);
    assert!(!s.timer_active());
    assert_eq!(ticker.live(), 0);
    s.close_history().unwrap();
    assert_eq!(s.step(), Step::Setup);
}

#[test]
fn preinfusion_edits_are_coerced_and_locked_mid_run() {
    let (mut s, _, _) = session();
    s.set_pre_infusion("abc").unwrap();
    assert_eq!(s.config().pre_infusion_s, 0.0);
    s.set_pre_infusion("7.5s").unwrap();
    assert_eq!(s.config().pre_infusion_s, 7.5);
    assert_eq!(s.reading().pre_infusion_remaining_s, 7.5);

    s.enter_pull().unwrap();
    s.start_timer().unwrap();
    assert_eq!(
        s.set_pre_infusion("3").err(),
        Some(SessionError::Timer(TimerError::ConfigLocked))
    );
    assert_eq!(s.config().pre_infusion_s, 7.5);
}

#[test]
fn setup_fields_coerce_bad_input() {
    let (mut s, _, _) = session();
    s.set_calibration_time("");
    assert_eq!(s.config().calibration_time_s, 0.0);
    s.set_calibration_yield("20");
    s.set_calibration_yield("nothing");
    assert_eq!(s.config().calibration_yield_g, None);
    assert_eq!(s.recommended_grind_time_s(), None);
    s.set_calibration_yield("0");
    assert_eq!(s.recommended_grind_time_s(), None);
    s.set_grind_size(25);
    assert_eq!(s.config().grind_size, 20);
}

#[test]
fn dropping_session_cancels_live_tick() {
    let ticker = ManualTicker::new();
    {
        let mut s = Session::new(
            ShotConfiguration::default(),
            &TimerCfg::default(),
            ManualClock::new(),
            ticker.clone(),
        );
        s.enter_pull().unwrap();
        s.start_timer().unwrap();
        assert!(s.has_live_tick());
    }
    assert_eq!(ticker.live(), 0);
}

#[test]
fn finished_pull_cannot_be_finished_again_after_history_round_trip() {
    let (mut s, clock, ticker) = session();
    s.enter_pull().unwrap();
    s.start_timer().unwrap();
    clock.advance_secs(10.0);
    ticker.fire();
    s.pump();
    clock.advance_secs(27.0);
    assert!((s.finish_pull().unwrap() - 27.0).abs() < 1e-6);
    assert_eq!(s.reading().phase, Phase::Idle);
    assert_eq!(s.reading().display_s, 0.0);
    s.analyze().unwrap();

    s.open_history();
    s.close_history().unwrap();
    s.enter_pull().unwrap();

    let r = s.reading();
    assert_eq!(r.phase, Phase::Idle);
    assert_eq!(r.display_s, 0.0);
    assert_eq!(r.elapsed_s, 0.0);
    assert_eq!(
        s.finish_pull().err(),
        Some(SessionError::Timer(TimerError::NotActive))
    );
    assert_eq!(s.step(), Step::Pull);
    assert_eq!(s.history().len(), 1);
}

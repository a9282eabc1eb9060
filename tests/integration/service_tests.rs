//! Integration tests for the frame → estimator → policies → driver pipeline.

use super::mock_hw::{
    BrokenModel, EmptyModel, LeftFractionModel, MockHardware, RecordingSink, StubLoader,
    frame_with_green_columns, last_for,
};

use duckweed::app::commands::AppCommand;
use duckweed::app::events::AppEvent;
use duckweed::app::service::{CommandOutcome, ControlService};
use duckweed::config::ControlConfig;
use duckweed::drivers::{Actuator, NullDriver};
use duckweed::error::{ConfigError, Error};
use duckweed::sensors::{FixedPhReading, NoPhSensor};
use duckweed::state::ActuatorState;
use duckweed::vision::{CoverageEstimator, EstimatorMode};

fn hsv_service(hw: MockHardware) -> ControlService<MockHardware> {
    ControlService::new(
        CoverageEstimator::hsv("weights/missing.pt"),
        ControlConfig::default(),
        hw,
    )
    .unwrap()
}

// ── Valve threshold boundary ──────────────────────────────────

#[test]
fn valve_closes_at_exactly_threshold() {
    let (hw, calls) = MockHardware::new();
    let svc = hsv_service(hw);
    let mut sink = RecordingSink::new();

    let report = svc
        .analyze(&frame_with_green_columns(10_000, 1, 4_000), None, &mut sink)
        .unwrap();
    assert!((report.coverage_pct - 40.0).abs() < 1e-9);
    assert!(report.valve_closed);
    assert!(report.valve_applied);
    assert_eq!(last_for(&calls, Actuator::InletValve), Some(true));
}

#[test]
fn valve_opens_just_below_threshold() {
    let (hw, calls) = MockHardware::new();
    let svc = hsv_service(hw);
    let mut sink = RecordingSink::new();

    let report = svc
        .analyze(&frame_with_green_columns(10_000, 1, 3_999), None, &mut sink)
        .unwrap();
    assert!((report.coverage_pct - 39.99).abs() < 1e-9);
    assert!(!report.valve_closed);
    assert_eq!(last_for(&calls, Actuator::InletValve), Some(false));
}

#[test]
fn valve_closes_at_fractional_threshold() {
    let (hw, calls) = MockHardware::new();
    let svc = hsv_service(hw);
    let mut sink = RecordingSink::new();
    svc.set_close_threshold(30.1, &mut sink).unwrap();

    let report = svc
        .analyze(&frame_with_green_columns(10_000, 1, 3_010), None, &mut sink)
        .unwrap();
    assert_eq!(report.coverage_pct, 30.1);
    assert_eq!(report.threshold, 30.1);
    assert!(report.valve_closed);
    assert_eq!(last_for(&calls, Actuator::InletValve), Some(true));

    let report = svc
        .analyze(&frame_with_green_columns(10_000, 1, 3_009), None, &mut sink)
        .unwrap();
    assert!(!report.valve_closed);
}

#[test]
fn ph_relay_releases_at_fractional_high_edge() {
    let (hw, _calls) = MockHardware::new();
    let config = ControlConfig {
        ph_high: 70.3,
        ..ControlConfig::default()
    };
    let svc = ControlService::new(CoverageEstimator::hsv("weights/missing.pt"), config, hw)
        .unwrap();
    let mut sink = RecordingSink::new();
    svc.handle_command(AppCommand::SetPhAdjustment(true), &mut sink)
        .unwrap();

    let report = svc
        .analyze(&frame_with_green_columns(10_000, 1, 7_030), None, &mut sink)
        .unwrap();
    assert_eq!(report.coverage_pct, 70.3);
    assert!(!report.ph_adjustment_active);
}

// ── pH hysteresis through the service ─────────────────────────

#[test]
fn ph_relay_holds_inside_band_across_frames() {
    let (hw, calls) = MockHardware::new();
    let svc = hsv_service(hw);
    let mut sink = RecordingSink::new();

    // 20 % → activate.
    let r = svc
        .analyze(&frame_with_green_columns(100, 20, 20), None, &mut sink)
        .unwrap();
    assert!(r.ph_adjustment_active);

    // 50 % → inside (30, 70): held active.
    let r = svc
        .analyze(&frame_with_green_columns(100, 20, 50), None, &mut sink)
        .unwrap();
    assert!(r.ph_adjustment_active);
    assert_eq!(svc.actuator_state(Actuator::PhRelay), ActuatorState::Engaged);

    // 80 % → deactivate, then 50 % holds inactive.
    let r = svc
        .analyze(&frame_with_green_columns(100, 20, 80), None, &mut sink)
        .unwrap();
    assert!(!r.ph_adjustment_active);
    let r = svc
        .analyze(&frame_with_green_columns(100, 20, 50), None, &mut sink)
        .unwrap();
    assert!(!r.ph_adjustment_active);
    assert_eq!(last_for(&calls, Actuator::PhRelay), Some(false));
}

#[test]
fn first_frame_inside_band_defaults_inactive() {
    let (hw, _calls) = MockHardware::new();
    let svc = hsv_service(hw);
    let r = svc
        .analyze(&frame_with_green_columns(100, 10, 50), None, &mut RecordingSink::new())
        .unwrap();
    assert!(!r.ph_adjustment_active);
}

#[test]
fn sensor_reading_overrides_coverage() {
    let (hw, _calls) = MockHardware::new();
    let svc = hsv_service(hw);
    let mut sink = RecordingSink::new();

    // 90 % coverage would deactivate, but pH 8.0 is out of band.
    let r = svc
        .analyze_with_sensor(
            &frame_with_green_columns(100, 10, 90),
            &mut FixedPhReading(8.0),
            &mut sink,
        )
        .unwrap();
    assert!(r.ph_adjustment_active);
    assert_eq!(r.ph_reading, Some(8.0));

    // 10 % coverage would activate, but pH 7.0 is in band.
    let r = svc
        .analyze_with_sensor(
            &frame_with_green_columns(100, 10, 10),
            &mut FixedPhReading(7.0),
            &mut sink,
        )
        .unwrap();
    assert!(!r.ph_adjustment_active);
}

#[test]
fn absent_sensor_uses_hysteresis() {
    let (hw, _calls) = MockHardware::new();
    let svc = hsv_service(hw);
    let r = svc
        .analyze_with_sensor(
            &frame_with_green_columns(100, 10, 10),
            &mut NoPhSensor,
            &mut RecordingSink::new(),
        )
        .unwrap();
    assert!(r.ph_adjustment_active);
    assert_eq!(r.ph_reading, None);
}

#[test]
fn nan_reading_treated_as_absent() {
    let (hw, _calls) = MockHardware::new();
    let svc = hsv_service(hw);
    let r = svc
        .analyze(
            &frame_with_green_columns(100, 10, 10),
            Some(f32::NAN),
            &mut RecordingSink::new(),
        )
        .unwrap();
    assert_eq!(r.ph_reading, None);
    assert!(r.ph_adjustment_active);
}

// ── Driver availability ──────────────────────────────────────

#[test]
fn failed_apply_still_updates_store() {
    let (hw, calls) = MockHardware::failing();
    let svc = hsv_service(hw);
    let r = svc
        .analyze(&frame_with_green_columns(100, 10, 100), None, &mut RecordingSink::new())
        .unwrap();
    assert!(r.valve_closed);
    assert!(!r.valve_applied);
    assert_eq!(calls.lock().unwrap().len(), 2);

    let status = svc.status();
    assert_eq!(status.valve_closed, ActuatorState::Engaged);
    assert!(!status.valve_applied);
    assert!(status.driver_available);
}

#[test]
fn null_driver_reports_unavailable() {
    let svc = ControlService::new(
        CoverageEstimator::hsv("weights/missing.pt"),
        ControlConfig::default(),
        NullDriver::new(),
    )
    .unwrap();
    let outcome = svc
        .handle_command(AppCommand::SetPhAdjustment(true), &mut RecordingSink::new())
        .unwrap();
    assert_eq!(
        outcome,
        CommandOutcome::Actuated {
            actuator: Actuator::PhRelay,
            engaged: true,
            applied: false
        }
    );
    let status = svc.status();
    assert!(!status.driver_available);
    assert_eq!(status.ph_adjustment_active, ActuatorState::Engaged);
    assert_eq!(status.valve_closed, ActuatorState::Unknown);
}

// ── Manual overrides ─────────────────────────────────────────

#[test]
fn manual_valve_goes_through_driver_and_store() {
    let (hw, calls) = MockHardware::new();
    let svc = hsv_service(hw);
    let mut sink = RecordingSink::new();

    svc.handle_command(AppCommand::SetValve(true), &mut sink).unwrap();
    assert_eq!(last_for(&calls, Actuator::InletValve), Some(true));
    assert_eq!(svc.actuator_state(Actuator::InletValve), ActuatorState::Engaged);

    svc.handle_command(AppCommand::SetValve(false), &mut sink).unwrap();
    assert_eq!(svc.actuator_state(Actuator::InletValve), ActuatorState::Released);

    assert!(sink.events.iter().all(|e| matches!(
        e,
        AppEvent::Commanded { manual: true, actuator: Actuator::InletValve, .. }
    )));
}

#[test]
fn manual_ph_activation_is_held_by_hysteresis() {
    let (hw, _calls) = MockHardware::new();
    let svc = hsv_service(hw);
    let mut sink = RecordingSink::new();

    svc.handle_command(AppCommand::SetPhAdjustment(true), &mut sink)
        .unwrap();
    let r = svc
        .analyze(&frame_with_green_columns(100, 10, 50), None, &mut sink)
        .unwrap();
    assert!(r.ph_adjustment_active);
}

#[test]
fn threshold_update_changes_valve_decision() {
    let (hw, _calls) = MockHardware::new();
    let svc = hsv_service(hw);
    let mut sink = RecordingSink::new();
    let frame = frame_with_green_columns(100, 10, 50);

    assert!(svc.analyze(&frame, None, &mut sink).unwrap().valve_closed);

    let outcome = svc
        .handle_command(AppCommand::SetCloseThreshold(60.0), &mut sink)
        .unwrap();
    assert_eq!(outcome, CommandOutcome::ThresholdSet { threshold: 60.0 });

    let r = svc.analyze(&frame, None, &mut sink).unwrap();
    assert!(!r.valve_closed);
    assert_eq!(r.threshold, 60.0);
}

#[test]
fn invalid_threshold_update_is_rejected() {
    let (hw, _calls) = MockHardware::new();
    let svc = hsv_service(hw);
    let mut sink = RecordingSink::new();

    for bad in [-1.0, 100.5, f64::NAN, f64::INFINITY] {
        let err = svc
            .handle_command(AppCommand::SetCloseThreshold(bad), &mut sink)
            .unwrap_err();
        assert!(matches!(err, ConfigError::ValidationFailed(_)));
    }
    assert_eq!(svc.config().close_threshold, 40.0);
    assert_eq!(
        sink.events
            .iter()
            .filter(|e| matches!(e, AppEvent::ThresholdRejected { .. }))
            .count(),
        4
    );
}

// ── Estimator strategies ─────────────────────────────────────

#[test]
fn model_strategy_reports_model_mode() {
    let (hw, _calls) = MockHardware::new();
    let svc = ControlService::new(
        CoverageEstimator::with_model(Box::new(LeftFractionModel { fraction: 0.25 }), "w.pt"),
        ControlConfig::default(),
        hw,
    )
    .unwrap();
    let r = svc
        .analyze(&frame_with_green_columns(100, 40, 0), None, &mut RecordingSink::new())
        .unwrap();
    assert_eq!(r.mode, EstimatorMode::Model);
    assert!((r.coverage_pct - 25.0).abs() < 1e-9);
    assert!(r.ph_adjustment_active);
    assert!(!r.valve_closed);
    assert_eq!(svc.status().mode, EstimatorMode::Model);
}

#[test]
fn model_without_masks_is_zero_coverage() {
    let (hw, _calls) = MockHardware::new();
    let svc = ControlService::new(
        CoverageEstimator::with_model(Box::new(EmptyModel), "w.pt"),
        ControlConfig::default(),
        hw,
    )
    .unwrap();
    let r = svc
        .analyze(&frame_with_green_columns(32, 32, 32), None, &mut RecordingSink::new())
        .unwrap();
    assert_eq!(r.coverage_pct, 0.0);
}

#[test]
fn inference_failure_leaves_actuators_untouched() {
    let (hw, calls) = MockHardware::new();
    let svc = ControlService::new(
        CoverageEstimator::with_model(Box::new(BrokenModel), "w.pt"),
        ControlConfig::default(),
        hw,
    )
    .unwrap();
    let err = svc
        .analyze(&frame_with_green_columns(8, 8, 4), None, &mut RecordingSink::new())
        .unwrap_err();
    assert!(matches!(err, Error::Inference(_)));
    assert!(calls.lock().unwrap().is_empty());
    assert_eq!(svc.status().valve_closed, ActuatorState::Unknown);
}

#[test]
fn startup_selection_with_backend_and_weights() {
    let weights = tempfile::NamedTempFile::new().unwrap();
    let est = CoverageEstimator::select(weights.path(), Some(&StubLoader));
    assert_eq!(est.mode(), EstimatorMode::Model);

    let (hw, _calls) = MockHardware::new();
    let svc = ControlService::new(est, ControlConfig::default(), hw).unwrap();
    let status = svc.status();
    assert!(status.weights_present);
    assert_eq!(status.weights_path, weights.path());
}

#[test]
fn zero_area_frame_is_zero_not_error() {
    let (hw, _calls) = MockHardware::new();
    let svc = hsv_service(hw);
    let r = svc
        .analyze(&image::RgbImage::new(0, 0), None, &mut RecordingSink::new())
        .unwrap();
    assert_eq!(r.coverage_pct, 0.0);
    assert!(!r.valve_closed);
    assert!(r.ph_adjustment_active);
}

// ── Event stream ─────────────────────────────────────────────

#[test]
fn analyze_emits_frame_then_two_commands() {
    let (hw, _calls) = MockHardware::new();
    let svc = hsv_service(hw);
    let mut sink = RecordingSink::new();
    svc.analyze(&frame_with_green_columns(100, 4, 45), None, &mut sink)
        .unwrap();

    assert_eq!(sink.events.len(), 3);
    assert!(matches!(
        sink.events[0],
        AppEvent::Analyzed { mode: EstimatorMode::Hsv, .. }
    ));
    assert!(matches!(
        sink.events[1],
        AppEvent::Commanded { actuator: Actuator::InletValve, engaged: true, manual: false, .. }
    ));
    assert!(matches!(
        sink.events[2],
        AppEvent::Commanded { actuator: Actuator::PhRelay, engaged: false, manual: false, .. }
    ));
}

//! End-to-end sessions: form -> engine thread -> hub -> bridge -> state.

use std::fs;
use std::path::Path;
use std::time::{Duration, Instant};

use engine::CollisionMode;
use orchestrator::{
    Action, DragPosition, EventBridge, EventHub, LocalEngine, Orchestrator, PreferenceCache,
    Screen,
};

fn wait_for_completion(bridge: &EventBridge, orchestrator: &mut Orchestrator<LocalEngine>) {
    let deadline = Instant::now() + Duration::from_secs(30);
    while orchestrator.screen() == Screen::Progress {
        assert!(Instant::now() < deadline, "backup did not complete in time");
        bridge.wait(orchestrator, Duration::from_millis(100));
    }
}

fn write_tree(root: &Path) {
    fs::create_dir_all(root.join("sub")).expect("Failed to create tree");
    fs::write(root.join("a.txt"), "a").expect("Failed to write a");
    fs::write(root.join("b.txt"), "b").expect("Failed to write b");
    fs::write(root.join("sub").join("c.txt"), "c").expect("Failed to write c");
    fs::write(root.join("trace.log"), "noise").expect("Failed to write log");
}

#[test]
fn test_backup_runs_to_completion() {
    let temp_dir = tempfile::tempdir().expect("Failed to create temp dir");
    let src = temp_dir.path().join("docs");
    write_tree(&src);
    let target = temp_dir.path().join("backup");

    let hub = EventHub::new();
    let bridge = EventBridge::mount(&hub);
    let mut orchestrator = Orchestrator::new(LocalEngine::new(hub.clone()));

    orchestrator.dispatch(Action::PickSources(vec![src.to_string_lossy().to_string()]));
    orchestrator.dispatch(Action::PickTarget(target.to_string_lossy().to_string()));
    orchestrator.dispatch(Action::AddBlacklistItem("*.log".to_string()));

    assert!(orchestrator.submit());
    wait_for_completion(&bridge, &mut orchestrator);

    let state = orchestrator.state();
    assert_eq!(state.screen, Screen::Complete);
    let outcome = state.session.outcome.as_ref().expect("outcome");
    assert!(outcome.success, "{}", outcome.message);
    assert_eq!(outcome.copied_count, 3);
    assert_eq!(outcome.message, "Successfully copied 3 files");
    assert_eq!(state.session.progress.percent(), 100);
    assert!(state.session.errors.is_empty());

    assert!(target.join("docs").join("sub").join("c.txt").is_file());
    assert!(!target.join("docs").join("trace.log").exists());
}

#[test]
fn test_second_run_skips_and_reset_keeps_preferences() {
    let temp_dir = tempfile::tempdir().expect("Failed to create temp dir");
    let src = temp_dir.path().join("docs");
    write_tree(&src);
    let target = temp_dir.path().join("backup");
    let cache = PreferenceCache::new(temp_dir.path().join("prefs.json"));

    let hub = EventHub::new();
    let bridge = EventBridge::mount(&hub);
    let mut orchestrator = Orchestrator::with_cache(LocalEngine::new(hub.clone()), cache.clone());
    orchestrator.dispatch(Action::SetCollisionMode(CollisionMode::Skip));

    for run in 0..2 {
        orchestrator.dispatch(Action::PickSources(vec![src.to_string_lossy().to_string()]));
        orchestrator.dispatch(Action::PickTarget(target.to_string_lossy().to_string()));
        assert!(orchestrator.submit());
        wait_for_completion(&bridge, &mut orchestrator);

        let outcome = orchestrator.state().session.outcome.clone().expect("outcome");
        if run == 1 {
            assert_eq!(outcome.skipped_count, 4);
            assert_eq!(outcome.copied_count, 0);
        }
        orchestrator.dispatch(Action::Reset);
        assert_eq!(orchestrator.screen(), Screen::Form);
        assert!(orchestrator.state().form.source_paths.is_empty());
    }

    let prefs = cache.load().expect("load").expect("record");
    assert_eq!(prefs.source_history, vec![src.to_string_lossy().to_string()]);
    assert_eq!(prefs.target_history, vec![target.to_string_lossy().to_string()]);
}

#[test]
fn test_rejected_submission_reports_engine_message() {
    let temp_dir = tempfile::tempdir().expect("Failed to create temp dir");
    let missing = temp_dir.path().join("gone").to_string_lossy().to_string();

    let hub = EventHub::new();
    let bridge = EventBridge::mount(&hub);
    let mut orchestrator = Orchestrator::new(LocalEngine::new(hub.clone()));
    orchestrator.dispatch(Action::AddSourcePath(missing.clone()));
    orchestrator.dispatch(Action::SetTargetPath(
        temp_dir.path().join("out").to_string_lossy().to_string(),
    ));

    assert!(orchestrator.submit());

    assert_eq!(orchestrator.screen(), Screen::Complete);
    let outcome = orchestrator.state().session.outcome.clone().expect("outcome");
    assert!(!outcome.success);
    assert_eq!(outcome.message, format!("Source path does not exist: {}", missing));
    assert_eq!(bridge.pump(&mut orchestrator), 0);
}

#[test]
fn test_drag_and_drop_fills_the_form() {
    let hub = EventHub::new();
    let mut orchestrator = Orchestrator::new(LocalEngine::new(hub));
    let height = 700.0;

    orchestrator.dispatch(Action::DragEnter(DragPosition::new(0.1 * height, height)));
    orchestrator.dispatch(Action::Drop {
        paths: vec!["/photos".to_string(), "/music".to_string()],
        position: DragPosition::new(0.2 * height, height),
    });
    orchestrator.dispatch(Action::Drop {
        paths: vec!["/mnt/usb".to_string(), "/mnt/other".to_string()],
        position: DragPosition::new(0.45 * height, height),
    });

    let state = orchestrator.state();
    assert_eq!(state.form.source_paths, vec!["/photos", "/music"]);
    assert_eq!(state.form.target_path, "/mnt/usb");
    assert_eq!(state.preferences.target_history, vec!["/mnt/usb"]);
    assert!(state.hover_zone.is_none());
    assert!(state.can_submit());
}

#[test]
fn test_bridge_teardown_unsubscribes() {
    let hub = EventHub::new();
    {
        let _bridge = EventBridge::mount(&hub);
        assert_eq!(hub.subscriber_count(), 1);
    }
    assert_eq!(hub.subscriber_count(), 0);
}

// tests/supervisor_lifecycle.rs

use std::io;
use std::path::PathBuf;

use sidecar_test_utils::builders::settings;
use sidecar_test_utils::fake_backend::FakeProcessBackend;
use sidecar_test_utils::init_tracing;
use sidecar_test_utils::recording_notifier::RecordingNotifier;

use sidecar_supervisor::engine::ProcessEvent;
use sidecar_supervisor::fs::mock::MockFileSystem;
use sidecar_supervisor::supervisor::{ExitNotice, FatalNotice, Supervisor, SupervisorSettings, SupervisorState};
use sidecar_supervisor::types::DeploymentMode;

const CANDIDATES: [&str; 3] = [
    "/app/resources/api.exe",
    "/app/resources/app.asar.unpacked/api.exe",
    "/app/resources/resources/api.exe",
];

struct Harness {
    fs: MockFileSystem,
    backend: FakeProcessBackend,
    notifier: RecordingNotifier,
    supervisor: Supervisor<FakeProcessBackend, RecordingNotifier>,
}

fn harness_with(settings: SupervisorSettings, backend: FakeProcessBackend) -> Harness {
    init_tracing();
    let fs = MockFileSystem::new();
    let notifier = RecordingNotifier::new();
    let supervisor = Supervisor::new(
        settings,
        Box::new(fs.clone()),
        backend.clone(),
        notifier.clone(),
    );
    Harness {
        fs,
        backend,
        notifier,
        supervisor,
    }
}

fn packaged() -> Harness {
    harness_with(
        settings(DeploymentMode::Packaged, &CANDIDATES),
        FakeProcessBackend::new(),
    )
}

#[test]
fn development_mode_never_probes_or_spawns() {
    let mut h = harness_with(
        settings(DeploymentMode::Development, &CANDIDATES),
        FakeProcessBackend::new(),
    );
    h.fs.add_file(CANDIDATES[0], b"".to_vec());

    h.supervisor.start();

    assert!(h.fs.probed_paths().is_empty());
    assert!(h.backend.launches().is_empty());
    assert!(h.notifier.fatal_notices().is_empty());
    assert_eq!(h.supervisor.state(), SupervisorState::Idle);
    assert!(h.supervisor.current().is_none());
}

#[test]
fn missing_executable_raises_one_fatal_notice_listing_candidates() {
    let mut h = packaged();

    h.supervisor.start();

    let expected: Vec<PathBuf> = CANDIDATES.iter().map(PathBuf::from).collect();
    assert_eq!(
        h.notifier.fatal_notices(),
        vec![FatalNotice::ExecutableNotFound {
            candidates: expected.clone()
        }]
    );
    assert_eq!(h.fs.probed_paths(), expected);
    assert!(h.backend.launches().is_empty());
    assert!(h.supervisor.current().is_none());
    assert_eq!(h.supervisor.state(), SupervisorState::Stopped);
}

#[test]
fn backend_runs_in_the_directory_of_its_executable() {
    let mut h = packaged();
    h.fs.add_file("/app/resources/resources/api.exe", b"".to_vec());

    h.supervisor.start();

    let launches = h.backend.launches();
    assert_eq!(launches.len(), 1);
    assert_eq!(
        launches[0].program,
        PathBuf::from("/app/resources/resources/api.exe")
    );
    assert_eq!(launches[0].working_dir, PathBuf::from("/app/resources/resources"));
    assert_eq!(h.supervisor.state(), SupervisorState::Starting);
    assert_eq!(h.supervisor.current().map(|p| p.generation), Some(1));
}

#[test]
fn spawn_failure_raises_one_fatal_notice_with_os_detail() {
    let mut h = harness_with(
        settings(DeploymentMode::Packaged, &CANDIDATES),
        FakeProcessBackend::new().failing(io::ErrorKind::PermissionDenied),
    );
    h.fs.add_file(CANDIDATES[0], b"".to_vec());

    h.supervisor.start();

    let notices = h.notifier.fatal_notices();
    assert_eq!(notices.len(), 1);
    match &notices[0] {
        FatalNotice::SpawnFailed { program, detail } => {
            assert_eq!(program, &PathBuf::from(CANDIDATES[0]));
            assert!(detail.contains("fake spawn failure"), "detail was {detail}");
        }
        other => panic!("expected SpawnFailed, got {other:?}"),
    }
    assert!(h.supervisor.current().is_none());
    assert_eq!(h.supervisor.state(), SupervisorState::Stopped);
}

#[test]
fn started_event_moves_to_running() {
    let mut h = packaged();
    h.fs.add_file(CANDIDATES[1], b"".to_vec());
    h.supervisor.start();

    h.supervisor.handle_event(ProcessEvent::Started {
        generation: 1,
        pid: Some(4242),
    });

    assert_eq!(h.supervisor.state(), SupervisorState::Running);
}

#[test]
fn second_start_does_not_create_a_second_handle() {
    let mut h = packaged();
    h.fs.add_file(CANDIDATES[0], b"".to_vec());

    h.supervisor.start();
    h.supervisor.handle_event(ProcessEvent::Started {
        generation: 1,
        pid: Some(1),
    });
    h.supervisor.start();

    assert_eq!(h.backend.launches().len(), 1);
    assert_eq!(h.supervisor.current().map(|p| p.generation), Some(1));
    assert_eq!(h.supervisor.state(), SupervisorState::Running);
}

#[test]
fn stop_without_handle_is_a_noop() {
    let mut h = packaged();

    h.supervisor.stop();

    assert!(h.backend.terminations().is_empty());
    assert_eq!(h.supervisor.state(), SupervisorState::Idle);
}

#[test]
fn stop_terminates_the_handle_exactly_once() {
    let mut h = packaged();
    h.fs.add_file(CANDIDATES[0], b"".to_vec());
    h.supervisor.start();

    h.supervisor.stop();
    h.supervisor.stop();

    assert_eq!(h.backend.terminations(), vec![1]);
    assert!(h.supervisor.current().is_none());
    assert_eq!(h.supervisor.state(), SupervisorState::Stopped);
}

#[test]
fn unexpected_exit_clears_handle_so_stop_becomes_a_noop() {
    let mut h = packaged();
    h.fs.add_file(CANDIDATES[0], b"".to_vec());
    h.supervisor.start();
    h.supervisor.handle_event(ProcessEvent::Started {
        generation: 1,
        pid: Some(7),
    });

    h.supervisor.handle_event(ProcessEvent::Exited {
        generation: 1,
        code: Some(1),
    });
    h.supervisor.stop();

    assert!(h.supervisor.current().is_none());
    assert_eq!(h.supervisor.state(), SupervisorState::Stopped);
    assert!(h.backend.terminations().is_empty());
    // Log-only by default: no modal, no indicator.
    assert!(h.notifier.fatal_notices().is_empty());
    assert!(h.notifier.exit_notices().is_empty());
}

#[test]
fn unexpected_exit_indicator_is_opt_in() {
    let mut cfg = settings(DeploymentMode::Packaged, &CANDIDATES);
    cfg.notify_on_unexpected_exit = true;
    let mut h = harness_with(cfg, FakeProcessBackend::new());
    h.fs.add_file(CANDIDATES[0], b"".to_vec());
    h.supervisor.start();

    h.supervisor.handle_event(ProcessEvent::Exited {
        generation: 1,
        code: Some(0),
    });
    assert!(h.notifier.exit_notices().is_empty());

    h.supervisor.start();
    h.supervisor.handle_event(ProcessEvent::Exited {
        generation: 2,
        code: Some(137),
    });

    assert_eq!(
        h.notifier.exit_notices(),
        vec![ExitNotice {
            pid: Some(40_002),
            code: Some(137),
        }]
    );
    assert!(h.notifier.fatal_notices().is_empty());
}

#[test]
fn exit_of_a_stopped_process_does_not_touch_the_new_one() {
    let mut h = packaged();
    h.fs.add_file(CANDIDATES[0], b"".to_vec());

    h.supervisor.start();
    h.supervisor.stop();
    h.supervisor.start();

    // The first process finally reports its exit after the restart.
    h.supervisor.handle_event(ProcessEvent::Exited {
        generation: 1,
        code: None,
    });
    h.supervisor.handle_event(ProcessEvent::Started {
        generation: 1,
        pid: Some(1),
    });

    assert_eq!(h.supervisor.current().map(|p| p.generation), Some(2));
    assert_eq!(h.supervisor.state(), SupervisorState::Starting);
    assert_eq!(h.backend.launches().len(), 2);
}

#[test]
fn output_lines_never_change_state() {
    let mut h = packaged();
    h.fs.add_file(CANDIDATES[0], b"".to_vec());
    h.supervisor.start();

    h.supervisor.handle_event(ProcessEvent::OutputLine {
        generation: 1,
        line: "INFO:     Uvicorn running on http://127.0.0.1:8000".to_string(),
    });
    h.supervisor.handle_event(ProcessEvent::ErrorLine {
        generation: 9,
        line: "stale".to_string(),
    });

    assert_eq!(h.supervisor.state(), SupervisorState::Starting);
    assert!(h.supervisor.current().is_some());
}

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use intake_config::IntakeConfig;
use intake_resolver::{IntakeError, bootstrap};
use intake_test_support::assert::{collect_until_terminal, kinds};
use intake_test_support::fixtures::{DIRECT_URL, DOWNLOADED_FILENAME};
use intake_test_support::mocks::{Script, ScriptedBackend};
use intake_torrent_core::SubmissionRequest;

#[tokio::test(start_paused = true)]
async fn bootstrap_wires_config_into_resolver() -> anyhow::Result<()> {
    let overrides = HashMap::from([
        ("INTAKE_CALL_TIMEOUT_MS", "2000"),
        ("INTAKE_EVENT_REPLAY_CAPACITY", "16"),
        ("INTAKE_LOG_FORMAT", "json"),
    ]);
    let config = IntakeConfig::from_lookup(|name| overrides.get(name).map(ToString::to_string))?;

    let backend = ScriptedBackend::new()
        .with_download(Script::ok(DOWNLOADED_FILENAME.to_string()))
        .with_torrent_info(Script::hang());
    let intake = bootstrap(&config, Arc::new(backend)).expect("first bootstrap succeeds");
    assert_eq!(
        intake.resolver.config().call_timeout(),
        Duration::from_secs(2)
    );

    let mut stream = intake.events.subscribe(None);
    let submission = intake
        .resolver
        .submit(SubmissionRequest::without_cookies(DIRECT_URL));
    let events = collect_until_terminal(
        &mut stream,
        submission.correlation_id().as_uuid(),
        Duration::from_secs(10),
    )
    .await;
    assert_eq!(kinds(&events), vec!["beforeadd", "add_failed"]);
    assert_eq!(intake.metrics.snapshot().failed_total, 1);

    // Logging is global; a second bootstrap in the same process is refused.
    let second = bootstrap(&config, Arc::new(ScriptedBackend::new()));
    assert!(matches!(second, Err(IntakeError::Telemetry { .. })));
    Ok(())
}

#[test]
fn invalid_config_is_rejected_before_logging_starts() {
    let config = IntakeConfig {
        events: intake_config::EventsConfig { replay_capacity: 0 },
        ..IntakeConfig::default()
    };
    let result = bootstrap(&config, Arc::new(ScriptedBackend::new()));
    assert!(matches!(result, Err(IntakeError::Config { .. })));
}

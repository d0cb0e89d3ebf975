//! Session flows through the runtime: sampling, alerts, pairing, theme
//! persistence and export, all against mock adapters.

use soil_dashboard::alerts::{ALERT_LANGUAGE, LOW_MOISTURE_MESSAGE};
use soil_dashboard::app::commands::AppCommand;
use soil_dashboard::app::events::AppEvent;
use soil_dashboard::app::ports::load_theme;
use soil_dashboard::app::runtime::{Outbound, Runtime};
use soil_dashboard::app::service::DashboardService;
use soil_dashboard::config::DashboardConfig;
use soil_dashboard::export::CSV_HEADER;
use soil_dashboard::fsm::LinkState;
use soil_dashboard::reading::{ControlName, Reading, Theme};

use crate::mock_ports::{
    DeviceCall, MemStorage, MockDevice, MockSpeech, RecordingSink, ScriptedSensor,
};

type TestRuntime = Runtime<MockDevice, MockSpeech, MemStorage, RecordingSink>;

// 2024-05-01T10:00:00.000Z
const T0: i64 = 1_714_557_600_000;

fn runtime_with(device: MockDevice, storage: MemStorage) -> TestRuntime {
    let config = DashboardConfig {
        export_dir: std::env::temp_dir(),
        ..DashboardConfig::default()
    };
    let service = DashboardService::new(config, Theme::Light);
    let mut rt = Runtime::new(
        service,
        device,
        MockSpeech::default(),
        storage,
        RecordingSink::default(),
    );
    assert!(rt.start(T0).is_empty());
    rt
}

fn runtime() -> TestRuntime {
    runtime_with(MockDevice::unavailable(), MemStorage::default())
}

fn healthy() -> Reading {
    Reading::new(6.5, 55.0, 24.0, 90.0)
}

#[test]
fn samples_on_the_interval() {
    let mut rt = runtime();
    let mut sensor = ScriptedSensor::constant(healthy());
    assert!(rt.timer().is_running());

    rt.poll_sampling(&mut sensor, T0 + 1_999);
    assert_eq!(sensor.calls, 0);
    rt.poll_sampling(&mut sensor, T0 + 2_000);
    rt.poll_sampling(&mut sensor, T0 + 4_000);
    assert_eq!(sensor.calls, 2);
    assert_eq!(rt.service().history().len(), 2);
    assert_eq!(rt.service().latest().unwrap().timestamp_ms, T0 + 4_000);
}

#[test]
fn dry_soil_is_spoken_once_per_cooldown() {
    let mut rt = runtime();
    let mut sensor = ScriptedSensor::constant(Reading::new(6.5, 20.0, 24.0, 90.0));

    // 20 samples over 40 s: fires at +2 s and again at +32 s.
    for i in 1..=20 {
        rt.poll_sampling(&mut sensor, T0 + i * 2_000);
    }
    let spoken = &rt.speech().utterances;
    assert_eq!(spoken.len(), 2);
    assert!(
        spoken
            .iter()
            .all(|(text, lang)| text == LOW_MOISTURE_MESSAGE && lang == ALERT_LANGUAGE)
    );
    assert_eq!(
        rt.sink()
            .count(|e| matches!(e, AppEvent::AlertRaised(_))),
        2
    );
}

#[test]
fn connected_device_pauses_simulation() {
    let mut rt = runtime_with(MockDevice::available(), MemStorage::default());
    let mut sensor = ScriptedSensor::constant(healthy());

    rt.dispatch(AppCommand::Connect, T0 + 100);
    assert_eq!(rt.service().status(), LinkState::Connected);
    assert!(!rt.timer().is_running());
    assert_eq!(
        rt.device().calls,
        vec![
            DeviceCall::Request("SOIL-ESP32".into()),
            DeviceCall::Connect("de:ad:be:ef:00:01".into()),
        ]
    );

    rt.poll_sampling(&mut sensor, T0 + 10_000);
    assert_eq!(sensor.calls, 0);

    // Device readings flow in through the command path instead.
    rt.dispatch(AppCommand::ReadingReceived(healthy()), T0 + 10_500);
    assert_eq!(rt.service().history().len(), 1);

    rt.dispatch(AppCommand::Disconnect, T0 + 11_000);
    assert_eq!(rt.service().status(), LinkState::Disconnected);
    assert!(rt.timer().is_running());
    assert_eq!(
        rt.device().calls.last(),
        Some(&DeviceCall::Disconnect("de:ad:be:ef:00:01".into()))
    );

    rt.poll_sampling(&mut sensor, T0 + 13_000);
    assert_eq!(sensor.calls, 1);
}

#[test]
fn missing_device_is_a_notice_not_a_failure() {
    let mut rt = runtime();
    let out = rt.dispatch(AppCommand::Connect, T0);
    assert!(matches!(out.as_slice(), [Outbound::Notice(_)]));
    assert_eq!(rt.service().status(), LinkState::Disconnected);
    assert!(rt.timer().is_running());
    assert_eq!(
        rt.sink().count(|e| matches!(e, AppEvent::DeviceUnavailable)),
        1
    );
}

#[test]
fn lost_link_resumes_sampling() {
    let mut rt = runtime_with(MockDevice::available(), MemStorage::default());
    rt.dispatch(AppCommand::Connect, T0);
    assert!(!rt.timer().is_running());

    rt.dispatch(AppCommand::ConnectionLost, T0 + 5_000);
    assert_eq!(rt.service().status(), LinkState::Disconnected);
    assert!(rt.timer().is_running());
    assert_eq!(
        rt.sink().count(|e| matches!(
            e,
            AppEvent::StatusChanged {
                to: LinkState::Disconnected,
                ..
            }
        )),
        1
    );
}

#[test]
fn theme_toggle_is_persisted() {
    let mut rt = runtime();
    rt.dispatch(AppCommand::ToggleTheme, T0);
    assert_eq!(rt.service().theme(), Theme::Dark);
    assert_eq!(load_theme(rt.prefs()), Ok(Some(Theme::Dark)));

    rt.dispatch(AppCommand::ToggleTheme, T0);
    assert_eq!(load_theme(rt.prefs()), Ok(Some(Theme::Light)));
}

#[test]
fn theme_storage_failure_is_not_fatal() {
    let storage = MemStorage {
        fail_writes: true,
        ..MemStorage::default()
    };
    let mut rt = runtime_with(MockDevice::unavailable(), storage);
    rt.dispatch(AppCommand::ToggleTheme, T0);
    assert_eq!(rt.service().theme(), Theme::Dark);
    assert_eq!(load_theme(rt.prefs()), Ok(None));
}

#[test]
fn toggles_never_reach_the_device() {
    let mut rt = runtime_with(MockDevice::available(), MemStorage::default());
    rt.dispatch(AppCommand::Connect, T0);
    let calls_before = rt.device().calls.len();

    rt.dispatch(AppCommand::ToggleControl(ControlName::Light), T0);
    assert!(rt.service().controls().is_on(ControlName::Light));
    assert_eq!(rt.device().calls.len(), calls_before);
    assert!(rt.sink().events.contains(&AppEvent::ControlToggled {
        control: ControlName::Light,
        on: true,
        command: "light:on".into(),
    }));
}

#[test]
fn export_writes_csv_file() {
    let mut rt = runtime();
    let mut sensor = ScriptedSensor::constant(healthy());
    rt.poll_sampling(&mut sensor, T0 + 2_000);
    rt.poll_sampling(&mut sensor, T0 + 4_000);

    let out = rt.dispatch(AppCommand::ExportCsv, T0 + 5_000);
    assert!(matches!(out.as_slice(), [Outbound::Notice(msg)] if msg.starts_with("Exported 2 rows")));

    let path = std::env::temp_dir().join("soil_data_2024-05-01.csv");
    let contents = std::fs::read_to_string(&path).unwrap();
    let mut lines = contents.split('\n');
    assert_eq!(lines.next(), Some(CSV_HEADER));
    assert_eq!(
        lines.next(),
        Some("2024-05-01T10:00:04.000Z,6.50,55.00,24.00,90.00")
    );
    assert_eq!(lines.count(), 1);
}

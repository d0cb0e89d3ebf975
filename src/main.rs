//! Soil Dashboard: Main Entry Point
//!
//! Terminal front end around the dashboard core.
//!
//! ```text
//! ┌────────────────────────────────────────────────────────────────┐
//! │                      Adapters (outer ring)                     │
//! │                                                                │
//! │  SimulatedSoilSensor  LogEventSink  PrefsStore  SystemClock    │
//! │  (SensorPort)         (EventSink)   (Storage)                  │
//! │  StubDeviceAdapter    SpeechAdapter GeminiClient               │
//! │  (DevicePort)         (SpeechPort)  (TextGenerator)            │
//! │                                                                │
//! │  ──────────────── Port Trait Boundary ───────────────────      │
//! │                                                                │
//! │  ┌────────────────────────────────────────────────────────┐    │
//! │  │        Runtime ─▶ DashboardService (pure logic)        │    │
//! │  │  Link FSM · History · Alerts · Chart · Advice slot     │    │
//! │  └────────────────────────────────────────────────────────┘    │
//! │                                                                │
//! │  stdin reader thread ─┐                                        │
//! │  advice worker threads ┴─▶ mpsc ─▶ dispatcher loop             │
//! └────────────────────────────────────────────────────────────────┘
//! ```

use std::io::BufRead;
use std::sync::Arc;
use std::sync::mpsc::{self, RecvTimeoutError, Sender};
use std::thread;
use std::time::Duration;

use anyhow::Result;
use log::{info, warn};

use soil_dashboard::adapters::device::StubDeviceAdapter;
use soil_dashboard::adapters::log_sink::LogEventSink;
use soil_dashboard::adapters::prefs::PrefsStore;
use soil_dashboard::adapters::speech::SpeechAdapter;
use soil_dashboard::adapters::time::SystemClock;
use soil_dashboard::advice::AdviceBridge;
use soil_dashboard::advice::gemini::GeminiClient;
use soil_dashboard::app::commands::AppCommand;
use soil_dashboard::app::ports::load_theme;
use soil_dashboard::app::runtime::{Outbound, Runtime};
use soil_dashboard::app::service::DashboardService;
use soil_dashboard::config::DashboardConfig;
use soil_dashboard::error::ServiceError;
use soil_dashboard::reading::Theme;
use soil_dashboard::sensors::SimulatedSoilSensor;
use soil_dashboard::shell::{self, HELP, ParseError, ShellCommand};
use soil_dashboard::view;

/// Receive timeout while the sampling timer is stopped.
const IDLE_POLL: Duration = Duration::from_millis(500);

type Advisor = Arc<AdviceBridge<GeminiClient>>;

/// Everything that can wake the dispatcher besides the sampling timer.
enum ShellEvent {
    Input(String),
    InputClosed,
    Advice(std::result::Result<String, ServiceError>),
}

fn spawn_stdin_reader(tx: Sender<ShellEvent>) {
    thread::spawn(move || {
        for line in std::io::stdin().lock().lines() {
            let Ok(line) = line else { break };
            if tx.send(ShellEvent::Input(line)).is_err() {
                return;
            }
        }
        let _ = tx.send(ShellEvent::InputClosed);
    });
}

fn handle_outbound(out: Vec<Outbound>, advisor: Option<&Advisor>, tx: &Sender<ShellEvent>) {
    for item in out {
        match item {
            Outbound::Notice(text) => println!("{text}"),
            Outbound::RequestAdvice { reading, question } => {
                println!("Thinking...");
                let tx = tx.clone();
                let Some(bridge) = advisor.cloned() else {
                    let _ = tx.send(ShellEvent::Advice(Err(ServiceError::MissingCredential)));
                    continue;
                };
                thread::spawn(move || {
                    let result = bridge.request_advice(&reading, &question);
                    let _ = tx.send(ShellEvent::Advice(result));
                });
            }
        }
    }
}

// ── Main ──────────────────────────────────────────────────────

fn main() -> Result<()> {
    // ── 1. Logging ────────────────────────────────────────────
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    info!("╔══════════════════════════════════════╗");
    info!("║  Soil Dashboard v{}               ║", env!("CARGO_PKG_VERSION"));
    info!("╚══════════════════════════════════════╝");

    // ── 2. Config + preferences ───────────────────────────────
    let config = DashboardConfig::load()?;

    let prefs = match PrefsStore::open(&config.prefs_path) {
        Ok(p) => p,
        Err(e) => {
            warn!("Preference store unavailable ({}), theme will not persist", e);
            PrefsStore::in_memory()
        }
    };
    let theme = match load_theme(&prefs) {
        Ok(stored) => stored.unwrap_or_default(),
        Err(e) => {
            warn!("Stored theme unreadable ({}), using {}", e, Theme::default());
            Theme::default()
        }
    };

    // ── 3. Advice service (optional) ──────────────────────────
    let advisor: Option<Advisor> = match GeminiClient::from_env(&config.advice) {
        Ok(client) => {
            info!("Advice enabled ({})", client.model());
            Some(Arc::new(AdviceBridge::with_temperature(
                client,
                config.advice.temperature,
            )))
        }
        Err(e) => {
            warn!("Advice disabled: {}", e);
            None
        }
    };

    // ── 4. Adapters + service ─────────────────────────────────
    let mut sensor = SimulatedSoilSensor::from_env(config.sim_profile);
    info!("Simulation profile: {}", sensor.profile());

    let mut service = DashboardService::new(config.clone(), theme);
    service.set_advice_available(advisor.is_some());

    let mut rt = Runtime::new(
        service,
        StubDeviceAdapter::new(config.device_stub_available),
        SpeechAdapter::new(config.speech_program.clone()),
        prefs,
        LogEventSink::new(),
    );
    let clock = SystemClock::new();

    let (tx, rx) = mpsc::channel();
    spawn_stdin_reader(tx.clone());

    let out = rt.start(clock.now_ms());
    handle_outbound(out, advisor.as_ref(), &tx);

    println!("{HELP}\n");
    print!("{}", view::render_dashboard(rt.service()));

    // ── 5. Dispatcher loop ────────────────────────────────────
    loop {
        let now = clock.now_ms();
        let out = rt.poll_sampling(&mut sensor, now);
        handle_outbound(out, advisor.as_ref(), &tx);

        let timeout = rt.next_wakeup(now).unwrap_or(IDLE_POLL);
        let event = match rx.recv_timeout(timeout) {
            Ok(event) => event,
            Err(RecvTimeoutError::Timeout) => continue,
            Err(RecvTimeoutError::Disconnected) => break,
        };

        match event {
            ShellEvent::Input(line) => match shell::parse(&line) {
                Ok(ShellCommand::Quit) => break,
                Ok(ShellCommand::Help) => println!("{HELP}"),
                Ok(ShellCommand::Status) => print!("{}", view::render_dashboard(rt.service())),
                Ok(ShellCommand::Chart { svg: true }) => print!("{}", rt.service().chart_svg()),
                Ok(ShellCommand::Chart { svg: false }) => {
                    println!("{}", view::chart_summary(&rt.service().chart()));
                }
                Ok(ShellCommand::App(cmd)) => {
                    let out = rt.dispatch(cmd, clock.now_ms());
                    handle_outbound(out, advisor.as_ref(), &tx);
                    print!("{}", view::render_dashboard(rt.service()));
                }
                Err(ParseError::Empty) => {}
                Err(e) => println!("{e}"),
            },
            ShellEvent::Advice(result) => {
                let out = rt.dispatch(AppCommand::AdviceResolved(result), clock.now_ms());
                handle_outbound(out, advisor.as_ref(), &tx);
                if let Some(answer) = rt.service().last_advice() {
                    println!("Advice: {answer}");
                }
            }
            ShellEvent::InputClosed => break,
        }
    }

    info!("Soil Dashboard shutting down");
    Ok(())
}

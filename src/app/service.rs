//! Dashboard service: the hexagonal core.
//!
//! [`DashboardService`] owns every piece of session state: the link FSM,
//! history, alert cooldowns, actuator toggles, theme and the advice slot.
//! All state changes go through [`handle_command`](DashboardService::handle_command)
//! or [`tick`](DashboardService::tick); both return the [`Effect`]s the
//! caller must carry out and report what happened through an
//! [`EventSink`].
//!
//! ```text
//!  SensorPort ──▶ ┌──────────────────────────────┐ ──▶ EventSink
//!                 │       DashboardService       │
//!  AppCommand ──▶ │ Link FSM · History · Alerts  │ ──▶ Effects
//!                 └──────────────────────────────┘
//! ```

use log::{debug, info, warn};

use crate::advice::FALLBACK_ADVICE;
use crate::alerts::{ALERT_LANGUAGE, AlertEvaluator, CooldownTable};
use crate::chart::{ChartProjection, ChartProjector};
use crate::config::DashboardConfig;
use crate::export::export_history;
use crate::fsm::context::{LinkAction, LinkContext};
use crate::fsm::states::build_state_table;
use crate::fsm::{Fsm, LinkEvent, LinkState};
use crate::history::HistoryBuffer;
use crate::reading::{Controls, HistoryRecord, Reading, Theme};

use super::commands::AppCommand;
use super::effects::{Effect, Effects};
use super::events::AppEvent;
use super::ports::{DeviceHandle, EventSink, SensorPort};

// ───────────────────────────────────────────────────────────────
// Advice slot
// ───────────────────────────────────────────────────────────────

#[derive(Debug, Default)]
struct AdviceSlot {
    /// Whether a text generator was configured at startup.
    available: bool,
    /// A request is in flight.
    pending: bool,
    /// Last answer (or fallback) shown to the user.
    last: Option<String>,
}

// ───────────────────────────────────────────────────────────────
// DashboardService
// ───────────────────────────────────────────────────────────────

pub struct DashboardService {
    config: DashboardConfig,
    fsm: Fsm,
    link: LinkContext,
    history: HistoryBuffer,
    alerts: AlertEvaluator,
    cooldowns: CooldownTable,
    chart: ChartProjector,
    controls: Controls,
    theme: Theme,
    device: Option<DeviceHandle>,
    advice: AdviceSlot,
}

impl DashboardService {
    /// Construct the service with the stored theme preference.
    ///
    /// Does **not** start the link FSM: call [`start`](Self::start) next.
    pub fn new(config: DashboardConfig, theme: Theme) -> Self {
        let alerts = AlertEvaluator::from_config(&config);
        let chart = ChartProjector::new(config.chart_ranges, config.chart_geometry);
        Self {
            fsm: Fsm::new(build_state_table(), LinkState::Disconnected),
            link: LinkContext::new(),
            history: HistoryBuffer::new(),
            alerts,
            cooldowns: CooldownTable::new(),
            chart,
            controls: Controls::default(),
            theme,
            device: None,
            advice: AdviceSlot::default(),
            config,
        }
    }

    // ── Lifecycle ─────────────────────────────────────────────

    /// Enter `Disconnected`, which arms simulated sampling.
    pub fn start(&mut self, sink: &mut impl EventSink) -> Effects {
        self.fsm.start(&mut self.link);
        sink.emit(&AppEvent::Started {
            status: self.status(),
            theme: self.theme,
        });
        info!("DashboardService started ({}, theme {})", self.status(), self.theme);
        self.drain_link_actions()
    }

    /// Mark the advice feature as usable (a text generator exists).
    pub fn set_advice_available(&mut self, available: bool) {
        self.advice.available = available;
    }

    // ── Sampling ──────────────────────────────────────────────

    /// One sampling-timer tick: pull a reading from `sensor` and ingest it.
    /// Does nothing while a device link is up.
    pub fn tick(
        &mut self,
        sensor: &mut impl SensorPort,
        now_ms: i64,
        sink: &mut impl EventSink,
    ) -> Effects {
        if !self.link.sampling_active() {
            debug!("Sampling tick ignored while {}", self.status());
            return Effects::new();
        }
        let reading = sensor.sample(now_ms);
        self.ingest(reading, now_ms, sink)
    }

    // ── Command handling ──────────────────────────────────────

    /// Process one external command.
    pub fn handle_command(
        &mut self,
        cmd: AppCommand,
        now_ms: i64,
        sink: &mut impl EventSink,
    ) -> Effects {
        match cmd {
            AppCommand::Connect => self.link_event(LinkEvent::ConnectRequested, sink),

            AppCommand::DeviceConnected(device) => {
                if self.status() != LinkState::Connecting {
                    warn!("Device {} connected while {}, releasing", device.name, self.status());
                    return vec![Effect::DisconnectDevice(device)];
                }
                info!("Device connected: {} ({})", device.name, device.id);
                self.device = Some(device);
                self.link_event(LinkEvent::Connected, sink)
            }

            AppCommand::DeviceUnavailable => {
                sink.emit(&AppEvent::DeviceUnavailable);
                let mut effects = self.link_event(LinkEvent::PairingFailed, sink);
                effects.push(Effect::Notice(
                    "No sensor device available; showing simulated data.".into(),
                ));
                effects
            }

            AppCommand::Disconnect => self.link_event(LinkEvent::DisconnectRequested, sink),

            AppCommand::ConnectionLost => {
                let mut effects = self.link_event(LinkEvent::ConnectionLost, sink);
                if !effects.is_empty() {
                    effects.push(Effect::Notice("Device disconnected.".into()));
                }
                effects
            }

            AppCommand::ReadingReceived(reading) => {
                if self.status() != LinkState::Connected {
                    warn!("Device reading dropped while {}", self.status());
                    return Effects::new();
                }
                self.ingest(reading, now_ms, sink)
            }

            AppCommand::ToggleControl(control) => {
                let on = self.controls.toggle(control);
                let command = self.controls.command_string(control);
                // Nothing is transmitted, even when a device is connected.
                info!("Actuator command (not sent): {}", command);
                sink.emit(&AppEvent::ControlToggled {
                    control,
                    on,
                    command,
                });
                Effects::new()
            }

            AppCommand::ToggleTheme => {
                self.theme = self.theme.toggled();
                sink.emit(&AppEvent::ThemeChanged(self.theme));
                vec![Effect::PersistTheme(self.theme)]
            }

            AppCommand::AskAdvice(question) => self.ask(question, sink),

            AppCommand::AdviceResolved(result) => {
                if !self.advice.pending {
                    warn!("Advice result arrived with no request in flight, dropped");
                    return Effects::new();
                }
                self.advice.pending = false;
                let (text, fallback) = match result {
                    Ok(text) => (text, false),
                    Err(e) => {
                        warn!("Advice request failed: {}", e);
                        (FALLBACK_ADVICE.to_string(), true)
                    }
                };
                sink.emit(&AppEvent::AdviceAnswered { fallback });
                self.advice.last = Some(text);
                Effects::new()
            }

            AppCommand::ExportCsv => {
                let export = export_history(&self.history, now_ms);
                sink.emit(&AppEvent::Exported {
                    file_name: export.file_name.clone(),
                    rows: export.rows,
                });
                vec![Effect::SaveExport(export)]
            }
        }
    }

    // ── Queries ───────────────────────────────────────────────

    /// Current connection status.
    pub fn status(&self) -> LinkState {
        self.fsm.current_state()
    }

    pub fn history(&self) -> &HistoryBuffer {
        &self.history
    }

    /// Most recent reading, if any.
    pub fn latest(&self) -> Option<&HistoryRecord> {
        self.history.latest()
    }

    pub fn controls(&self) -> &Controls {
        &self.controls
    }

    pub fn theme(&self) -> Theme {
        self.theme
    }

    pub fn sampling_active(&self) -> bool {
        self.link.sampling_active()
    }

    pub fn device(&self) -> Option<&DeviceHandle> {
        self.device.as_ref()
    }

    pub fn advice_available(&self) -> bool {
        self.advice.available
    }

    pub fn advice_pending(&self) -> bool {
        self.advice.pending
    }

    pub fn last_advice(&self) -> Option<&str> {
        self.advice.last.as_deref()
    }

    pub fn cooldowns(&self) -> &CooldownTable {
        &self.cooldowns
    }

    pub fn config(&self) -> &DashboardConfig {
        &self.config
    }

    /// Chart frame for the current history window.
    pub fn chart(&self) -> ChartProjection {
        self.chart.project(&self.history.window())
    }

    /// Chart frame as a themed SVG document.
    pub fn chart_svg(&self) -> String {
        self.chart.render_svg(&self.chart(), self.theme)
    }

    // ── Internal ──────────────────────────────────────────────

    /// Stamp a reading into history and evaluate the alert rules, in that
    /// order, within one call.
    fn ingest(&mut self, reading: Reading, now_ms: i64, sink: &mut impl EventSink) -> Effects {
        let record = self.history.record(reading, now_ms);
        sink.emit(&AppEvent::ReadingRecorded(record));

        self.alerts
            .evaluate(&reading, now_ms, &mut self.cooldowns)
            .into_iter()
            .map(|alert| {
                sink.emit(&AppEvent::AlertRaised(alert));
                Effect::Speak {
                    text: alert.message,
                    language: ALERT_LANGUAGE,
                }
            })
            .collect()
    }

    fn ask(&mut self, question: String, sink: &mut impl EventSink) -> Effects {
        if question.is_empty() {
            debug!("Empty question ignored");
            return Effects::new();
        }
        let Some(latest) = self.history.latest() else {
            debug!("Question ignored: no reading yet");
            return Effects::new();
        };
        if !self.advice.available {
            return vec![Effect::Notice(
                "Advice is unavailable: no API key configured.".into(),
            )];
        }
        if self.advice.pending {
            return vec![Effect::Notice(
                "Still thinking about the previous question.".into(),
            )];
        }

        let reading = latest.reading;
        self.advice.pending = true;
        sink.emit(&AppEvent::AdviceRequested);
        vec![Effect::RequestAdvice { reading, question }]
    }

    fn link_event(&mut self, event: LinkEvent, sink: &mut impl EventSink) -> Effects {
        if let Some((from, to)) = self.fsm.handle(event, &mut self.link) {
            sink.emit(&AppEvent::StatusChanged { from, to });
        }
        self.drain_link_actions()
    }

    /// Translate queued FSM actions into effects.
    fn drain_link_actions(&mut self) -> Effects {
        let mut effects = Effects::new();
        for action in self.link.take_actions() {
            match action {
                LinkAction::StartSampling => effects.push(Effect::StartSampling),
                LinkAction::StopSampling => effects.push(Effect::StopSampling),
                LinkAction::RequestDevice => effects.push(Effect::RequestDevice {
                    filter: self.config.device_filter.clone(),
                }),
                LinkAction::ReleaseDevice => {
                    if let Some(device) = self.device.take() {
                        effects.push(Effect::DisconnectDevice(device));
                    }
                }
            }
        }
        effects
    }
}

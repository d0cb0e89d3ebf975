//! Effect runtime.
//!
//! Wraps a [`DashboardService`] together with its driven adapters and the
//! sampling timer, and carries out every [`Effect`] the service returns.
//! Commands produced while applying effects (pairing results) are queued
//! and dispatched in order before the call returns, so the service only
//! ever sees one command at a time.
//!
//! Work that must leave the dispatcher thread (advice requests) and
//! messages for the user are handed back as [`Outbound`] items.

use std::collections::VecDeque;
use std::path::PathBuf;
use std::time::Duration;

use log::{info, warn};

use crate::reading::Reading;
use crate::scheduler::SamplingTimer;

use super::commands::AppCommand;
use super::effects::{Effect, Effects};
use super::ports::{DevicePort, EventSink, SensorPort, SpeechPort, StoragePort, save_theme};
use super::service::DashboardService;

/// Items the shell has to handle itself.
#[derive(Debug, Clone, PartialEq)]
pub enum Outbound {
    /// Run the advice request and feed the result back as
    /// [`AppCommand::AdviceResolved`].
    RequestAdvice { reading: Reading, question: String },
    /// Print a one-line notice.
    Notice(String),
}

pub struct Runtime<D, S, P, K>
where
    D: DevicePort,
    S: SpeechPort,
    P: StoragePort,
    K: EventSink,
{
    service: DashboardService,
    timer: SamplingTimer,
    device: D,
    speech: S,
    prefs: P,
    sink: K,
    queue: VecDeque<AppCommand>,
    export_dir: PathBuf,
}

impl<D, S, P, K> Runtime<D, S, P, K>
where
    D: DevicePort,
    S: SpeechPort,
    P: StoragePort,
    K: EventSink,
{
    pub fn new(service: DashboardService, device: D, speech: S, prefs: P, sink: K) -> Self {
        let timer = SamplingTimer::new(service.config().sample_interval_ms);
        let export_dir = service.config().export_dir.clone();
        Self {
            service,
            timer,
            device,
            speech,
            prefs,
            sink,
            queue: VecDeque::new(),
            export_dir,
        }
    }

    /// Start the service and arm sampling.
    pub fn start(&mut self, now_ms: i64) -> Vec<Outbound> {
        let effects = self.service.start(&mut self.sink);
        let mut out = Vec::new();
        self.apply(effects, now_ms, &mut out);
        self.drain(now_ms, &mut out);
        out
    }

    /// Dispatch one command plus anything it triggers.
    pub fn dispatch(&mut self, cmd: AppCommand, now_ms: i64) -> Vec<Outbound> {
        self.queue.push_back(cmd);
        let mut out = Vec::new();
        self.drain(now_ms, &mut out);
        out
    }

    /// Take a sample if the timer is due.
    pub fn poll_sampling(&mut self, sensor: &mut impl SensorPort, now_ms: i64) -> Vec<Outbound> {
        let mut out = Vec::new();
        if self.timer.poll(now_ms) {
            let effects = self.service.tick(sensor, now_ms, &mut self.sink);
            self.apply(effects, now_ms, &mut out);
            self.drain(now_ms, &mut out);
        }
        out
    }

    /// How long the caller may block before the next sample is due.
    pub fn next_wakeup(&self, now_ms: i64) -> Option<Duration> {
        self.timer.time_until_due(now_ms)
    }

    pub fn service(&self) -> &DashboardService {
        &self.service
    }

    pub fn service_mut(&mut self) -> &mut DashboardService {
        &mut self.service
    }

    pub fn timer(&self) -> &SamplingTimer {
        &self.timer
    }

    pub fn device(&self) -> &D {
        &self.device
    }

    pub fn speech(&self) -> &S {
        &self.speech
    }

    pub fn prefs(&self) -> &P {
        &self.prefs
    }

    pub fn sink(&self) -> &K {
        &self.sink
    }

    // ── Internal ──────────────────────────────────────────────

    fn drain(&mut self, now_ms: i64, out: &mut Vec<Outbound>) {
        while let Some(cmd) = self.queue.pop_front() {
            let effects = self.service.handle_command(cmd, now_ms, &mut self.sink);
            self.apply(effects, now_ms, out);
        }
    }

    fn apply(&mut self, effects: Effects, now_ms: i64, out: &mut Vec<Outbound>) {
        for effect in effects {
            match effect {
                Effect::StartSampling => self.timer.start(now_ms),
                Effect::StopSampling => self.timer.stop(),
                Effect::Speak { text, language } => self.speech.speak(text, language),
                Effect::RequestDevice { filter } => {
                    let paired = self.device.request_device(&filter).and_then(|device| {
                        self.device.connect(&device)?;
                        Ok(device)
                    });
                    let next = match paired {
                        Ok(device) => AppCommand::DeviceConnected(device),
                        Err(e) => {
                            warn!("Pairing failed: {}", e);
                            AppCommand::DeviceUnavailable
                        }
                    };
                    self.queue.push_back(next);
                }
                Effect::DisconnectDevice(device) => self.device.disconnect(&device),
                Effect::RequestAdvice { reading, question } => {
                    out.push(Outbound::RequestAdvice { reading, question });
                }
                Effect::PersistTheme(theme) => {
                    if let Err(e) = save_theme(&mut self.prefs, theme) {
                        warn!("Theme not saved: {}", e);
                    }
                }
                Effect::SaveExport(export) => {
                    let path = self.export_dir.join(&export.file_name);
                    match std::fs::write(&path, export.contents.as_bytes()) {
                        Ok(()) => {
                            info!("Exported {} rows to {}", export.rows, path.display());
                            out.push(Outbound::Notice(format!(
                                "Exported {} rows to {}",
                                export.rows,
                                path.display()
                            )));
                        }
                        Err(e) => {
                            warn!("Export to {} failed: {}", path.display(), e);
                            out.push(Outbound::Notice(format!("Export failed: {e}")));
                        }
                    }
                }
                Effect::Notice(text) => out.push(Outbound::Notice(text)),
            }
        }
    }
}

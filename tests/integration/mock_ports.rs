//! Mock adapters for integration tests.
//!
//! Record every port call so tests can assert on the full history
//! without a speaker, radio, network or preference file.

use std::collections::HashMap;

use soil_dashboard::app::events::AppEvent;
use soil_dashboard::app::ports::{
    DeviceHandle, DevicePort, EventSink, SensorPort, SpeechPort, StorageError, StoragePort,
};
use soil_dashboard::error::Error;
use soil_dashboard::reading::Reading;

// ── Event sink ────────────────────────────────────────────────

#[derive(Default)]
pub struct RecordingSink {
    pub events: Vec<AppEvent>,
}

#[allow(dead_code)]
impl RecordingSink {
    pub fn count(&self, pred: impl Fn(&AppEvent) -> bool) -> usize {
        self.events.iter().filter(|e| pred(e)).count()
    }
}

impl EventSink for RecordingSink {
    fn emit(&mut self, event: &AppEvent) {
        self.events.push(event.clone());
    }
}

// ── Speech ────────────────────────────────────────────────────

#[derive(Default)]
pub struct MockSpeech {
    pub utterances: Vec<(String, String)>,
}

impl SpeechPort for MockSpeech {
    fn speak(&mut self, text: &str, language_tag: &str) {
        self.utterances
            .push((text.to_string(), language_tag.to_string()));
    }
}

// ── Device ────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq)]
pub enum DeviceCall {
    Request(String),
    Connect(String),
    Disconnect(String),
}

pub struct MockDevice {
    pub available: bool,
    pub calls: Vec<DeviceCall>,
}

#[allow(dead_code)]
impl MockDevice {
    pub fn available() -> Self {
        Self {
            available: true,
            calls: Vec::new(),
        }
    }

    pub fn unavailable() -> Self {
        Self {
            available: false,
            calls: Vec::new(),
        }
    }
}

impl DevicePort for MockDevice {
    fn request_device(&mut self, filter: &str) -> Result<DeviceHandle, Error> {
        self.calls.push(DeviceCall::Request(filter.to_string()));
        if !self.available {
            return Err(Error::DeviceUnavailable);
        }
        Ok(DeviceHandle {
            id: "de:ad:be:ef:00:01".into(),
            name: filter.to_string(),
        })
    }

    fn connect(&mut self, device: &DeviceHandle) -> Result<(), Error> {
        self.calls.push(DeviceCall::Connect(device.id.clone()));
        Ok(())
    }

    fn disconnect(&mut self, device: &DeviceHandle) {
        self.calls.push(DeviceCall::Disconnect(device.id.clone()));
    }
}

// ── Storage ───────────────────────────────────────────────────

#[derive(Default)]
pub struct MemStorage {
    pub data: HashMap<String, Vec<u8>>,
    pub fail_writes: bool,
}

impl StoragePort for MemStorage {
    fn read(&self, ns: &str, key: &str, buf: &mut [u8]) -> Result<usize, StorageError> {
        let v = self
            .data
            .get(&format!("{ns}::{key}"))
            .ok_or(StorageError::NotFound)?;
        if v.len() > buf.len() {
            return Err(StorageError::BufferTooSmall);
        }
        buf[..v.len()].copy_from_slice(v);
        Ok(v.len())
    }

    fn write(&mut self, ns: &str, key: &str, data: &[u8]) -> Result<(), StorageError> {
        if self.fail_writes {
            return Err(StorageError::IoError);
        }
        self.data.insert(format!("{ns}::{key}"), data.to_vec());
        Ok(())
    }

    fn exists(&self, ns: &str, key: &str) -> bool {
        self.data.contains_key(&format!("{ns}::{key}"))
    }
}

// ── Sensor ────────────────────────────────────────────────────

/// Replays a fixed script of readings, repeating the last one.
pub struct ScriptedSensor {
    script: Vec<Reading>,
    pub calls: usize,
}

#[allow(dead_code)]
impl ScriptedSensor {
    pub fn new(script: Vec<Reading>) -> Self {
        assert!(!script.is_empty());
        Self { script, calls: 0 }
    }

    pub fn constant(reading: Reading) -> Self {
        Self::new(vec![reading])
    }
}

impl SensorPort for ScriptedSensor {
    fn sample(&mut self, _now_ms: i64) -> Reading {
        let r = self.script[self.calls.min(self.script.len() - 1)];
        self.calls += 1;
        r
    }
}

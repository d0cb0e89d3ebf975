//! Port traits: the boundary between the dashboard core and the outside world.
//!
//! ```text
//!   Adapter ──▶ Port trait ──▶ DashboardService (domain)
//! ```
//!
//! Driven adapters (sample source, speech, pairing, text generation,
//! event sinks, preference storage) implement these traits.  The core
//! consumes them via generics, so it never touches a process, socket or
//! file directly.

use crate::error::{Error, ServiceError};
use crate::reading::{Reading, Theme};

// ───────────────────────────────────────────────────────────────
// Sensor port (driven adapter: sample source → domain)
// ───────────────────────────────────────────────────────────────

/// Read-side port: the domain calls this once per sampling tick.
pub trait SensorPort {
    fn sample(&mut self, now_ms: i64) -> Reading;
}

// ───────────────────────────────────────────────────────────────
// Speech port (driven adapter: domain → audio)
// ───────────────────────────────────────────────────────────────

/// Fire-and-forget speech output.  Implementations swallow their own
/// failures; an alert that cannot be voiced is still logged.
pub trait SpeechPort {
    fn speak(&mut self, text: &str, language_tag: &str);
}

// ───────────────────────────────────────────────────────────────
// Device port (driven adapter: domain ↔ wireless pairing)
// ───────────────────────────────────────────────────────────────

/// A paired sensor device.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeviceHandle {
    pub id: String,
    pub name: String,
}

pub trait DevicePort {
    /// Prompt for a device advertising `filter`.
    /// [`Error::DeviceUnavailable`] if there is no pairing capability or
    /// the user cancels.
    fn request_device(&mut self, filter: &str) -> Result<DeviceHandle, Error>;

    /// Open a link to a previously selected device.
    fn connect(&mut self, device: &DeviceHandle) -> Result<(), Error>;

    /// Close the link.  Never fails.
    fn disconnect(&mut self, device: &DeviceHandle);
}

// ───────────────────────────────────────────────────────────────
// Text-generation port (driven adapter: domain → hosted model)
// ───────────────────────────────────────────────────────────────

pub trait TextGenerator {
    fn generate(
        &self,
        prompt: &str,
        system_instruction: &str,
        temperature: f32,
    ) -> Result<String, ServiceError>;
}

// ───────────────────────────────────────────────────────────────
// Event sink port (driven adapter: domain → logging)
// ───────────────────────────────────────────────────────────────

/// The domain emits structured [`AppEvent`](super::events::AppEvent)s
/// through this port.  Adapters decide where they go.
pub trait EventSink {
    fn emit(&mut self, event: &super::events::AppEvent);
}

// ───────────────────────────────────────────────────────────────
// Storage port (driven adapter: domain ↔ preference file)
// ───────────────────────────────────────────────────────────────

/// Persistent key-value storage for user preferences.
///
/// Keys are namespaced to prevent collisions between subsystems.
/// Writes replace the whole value.
pub trait StoragePort {
    /// Read a value.  Returns the number of bytes written to `buf`.
    fn read(&self, namespace: &str, key: &str, buf: &mut [u8]) -> Result<usize, StorageError>;

    /// Write a value.
    fn write(&mut self, namespace: &str, key: &str, data: &[u8]) -> Result<(), StorageError>;

    /// Check whether a key exists without reading it.
    fn exists(&self, namespace: &str, key: &str) -> bool;
}

pub const PREFS_NAMESPACE: &str = "prefs";
pub const THEME_KEY: &str = "theme";

/// Stored theme, or `Ok(None)` on first run.
pub fn load_theme(storage: &impl StoragePort) -> Result<Option<Theme>, StorageError> {
    if !storage.exists(PREFS_NAMESPACE, THEME_KEY) {
        return Ok(None);
    }
    let mut buf = [0u8; 16];
    let n = storage.read(PREFS_NAMESPACE, THEME_KEY, &mut buf)?;
    let theme = postcard::from_bytes(&buf[..n]).map_err(|_| StorageError::Corrupted)?;
    Ok(Some(theme))
}

pub fn save_theme(storage: &mut impl StoragePort, theme: Theme) -> Result<(), StorageError> {
    let mut buf = [0u8; 16];
    let bytes = postcard::to_slice(&theme, &mut buf).map_err(|_| StorageError::Corrupted)?;
    storage.write(PREFS_NAMESPACE, THEME_KEY, bytes)
}

// ───────────────────────────────────────────────────────────────
// Error types
// ───────────────────────────────────────────────────────────────

/// Errors from [`StoragePort`] operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StorageError {
    /// Requested key does not exist.
    NotFound,
    /// Destination buffer too small for the stored value.
    BufferTooSmall,
    /// Stored bytes failed to decode.
    Corrupted,
    /// Generic I/O error.
    IoError,
}

impl core::fmt::Display for StorageError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::NotFound => write!(f, "key not found"),
            Self::BufferTooSmall => write!(f, "buffer too small"),
            Self::Corrupted => write!(f, "stored value corrupted"),
            Self::IoError => write!(f, "I/O error"),
        }
    }
}

impl std::error::Error for StorageError {}

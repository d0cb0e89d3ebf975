//! Device pairing adapter.
//!
//! Wireless pairing is not implemented on this host.  [`StubDeviceAdapter`]
//! implements [`DevicePort`] so the connect flow can be exercised end to
//! end: by default it reports no pairing capability, and when configured
//! as available it "pairs" with a fake device that never streams
//! readings.

use log::{info, warn};

use crate::app::ports::{DeviceHandle, DevicePort};
use crate::error::Error;

pub struct StubDeviceAdapter {
    available: bool,
    connected: Option<DeviceHandle>,
}

impl StubDeviceAdapter {
    pub fn new(available: bool) -> Self {
        Self {
            available,
            connected: None,
        }
    }

    pub fn is_connected(&self) -> bool {
        self.connected.is_some()
    }
}

impl DevicePort for StubDeviceAdapter {
    fn request_device(&mut self, filter: &str) -> Result<DeviceHandle, Error> {
        if !self.available {
            warn!("No pairing capability on this host (filter {})", filter);
            return Err(Error::DeviceUnavailable);
        }
        info!("Stub pairing with {}", filter);
        Ok(DeviceHandle {
            id: "00:00:00:00:00:00".into(),
            name: filter.to_string(),
        })
    }

    fn connect(&mut self, device: &DeviceHandle) -> Result<(), Error> {
        info!("Stub link up: {}", device.name);
        self.connected = Some(device.clone());
        Ok(())
    }

    fn disconnect(&mut self, device: &DeviceHandle) {
        if self.connected.take().is_some() {
            info!("Stub link down: {}", device.name);
        }
    }
}

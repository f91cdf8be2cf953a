//! Last-known presence of every terminal, replaced wholesale on each snapshot.

use shared::domain::{Device, DeviceId};

use crate::view::DeviceEntry;

#[derive(Debug, Default, Clone)]
pub struct DeviceRegistry {
    devices: Vec<Device>,
}

impl DeviceRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Full replacement; snapshots are never merged.
    pub fn replace(&mut self, snapshot: Vec<Device>) {
        self.devices = snapshot;
    }

    pub fn devices(&self) -> &[Device] {
        &self.devices
    }

    pub fn get(&self, id: &DeviceId) -> Option<&Device> {
        self.devices.iter().find(|device| &device.id == id)
    }

    pub fn any_online(&self) -> bool {
        self.devices.iter().any(Device::is_online)
    }

    pub fn online_count(&self) -> usize {
        self.devices.iter().filter(|d| d.is_online()).count()
    }

    pub fn ready_devices(&self) -> impl Iterator<Item = &Device> {
        self.devices.iter().filter(|device| device.is_ready())
    }

    /// Picker rows in snapshot order; non-ready devices are listed but not selectable.
    pub fn entries(&self) -> Vec<DeviceEntry> {
        self.devices.iter().map(DeviceEntry::from_device).collect()
    }
}

//! Outbound sync bridge to the host shell.
//!
//! Fire-and-forget notifications carrying credits/upgrade changes. The
//! kernel never waits on the bridge and never reads from it; a failed send
//! is logged and dropped.

use std::sync::mpsc::Sender;

/// One outbound sync notification.
#[derive(Debug, Clone, PartialEq)]
pub enum SyncEvent {
    CreditsChanged(u64),
    UpgradePurchased { id: String, level: u8 },
    StatsUpdated { minerals_collected: u64, deaths: u32 },
}

/// One-way outbound channel to the host.
pub trait SyncBridge {
    fn send(&mut self, event: &SyncEvent);
}

/// Bridge that just logs events. Used headless and in tests.
pub struct LogBridge;

impl SyncBridge for LogBridge {
    fn send(&mut self, event: &SyncEvent) {
        log::debug!("sync -> host: {:?}", event);
    }
}

/// Bridge backed by an mpsc channel to an in-process host.
pub struct ChannelBridge {
    tx: Sender<SyncEvent>,
}

impl ChannelBridge {
    pub fn new(tx: Sender<SyncEvent>) -> Self {
        Self { tx }
    }
}

impl SyncBridge for ChannelBridge {
    fn send(&mut self, event: &SyncEvent) {
        if let Err(e) = self.tx.send(event.clone()) {
            log::warn!("sync bridge send failed (host gone?): {}", e);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::mpsc::channel;

    #[test]
    fn channel_bridge_delivers_events() {
        let (tx, rx) = channel();
        let mut bridge = ChannelBridge::new(tx);
        bridge.send(&SyncEvent::CreditsChanged(120));
        assert_eq!(rx.recv().unwrap(), SyncEvent::CreditsChanged(120));
    }

    #[test]
    fn channel_bridge_survives_dropped_receiver() {
        let (tx, rx) = channel();
        drop(rx);
        let mut bridge = ChannelBridge::new(tx);
        // Must not panic; failure is logged and dropped.
        bridge.send(&SyncEvent::CreditsChanged(1));
    }
}

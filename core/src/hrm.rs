// core/src/hrm.rs
use std::collections::VecDeque;
use std::sync::mpsc::{Receiver, TryRecvError};

use crate::error::HrmError;

/// Hendelser fra en ekstern pulskilde (BLE-sensor e.l.).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SourceEvent {
    /// Rå heart_rate_measurement-pakke
    Packet(Vec<u8>),
    Disconnected,
}

/// Kilde kjernen poller; aldri blokkerende.
pub trait HeartRateSource {
    fn poll_event(&mut self) -> Option<SourceEvent>;
}

/// Dekod pulsverdien i en heart_rate_measurement-pakke.
///
/// Bit 0 i flagg-byten satt → 16-bit little-endian etter flaggene,
/// ellers én usignert byte.
pub fn decode_heart_rate(packet: &[u8]) -> Result<u16, HrmError> {
    let (&flags, rest) = packet.split_first().ok_or(HrmError::EmptyPacket)?;
    let truncated = || HrmError::Truncated { flags, len: packet.len() };
    if flags & 0x01 != 0 {
        match rest {
            [lo, hi, ..] => Ok(u16::from_le_bytes([*lo, *hi])),
            _ => Err(truncated()),
        }
    } else {
        rest.first().map(|&b| u16::from(b)).ok_or_else(truncated)
    }
}

/// Forhåndsinnspilte hendelser, f.eks. for tester og replay.
#[derive(Debug, Default, Clone)]
pub struct ScriptedSource {
    events: VecDeque<SourceEvent>,
}

impl ScriptedSource {
    pub fn new(events: impl IntoIterator<Item = SourceEvent>) -> Self {
        Self { events: events.into_iter().collect() }
    }

    pub fn push(&mut self, event: SourceEvent) {
        self.events.push_back(event);
    }
}

impl HeartRateSource for ScriptedSource {
    fn poll_event(&mut self) -> Option<SourceEvent> {
        self.events.pop_front()
    }
}

/// Pakker fra en annen tråd (sensorlesing) via mpsc. Lukket kanal = frakoblet.
#[derive(Debug)]
pub struct ChannelSource {
    rx: Receiver<Vec<u8>>,
    hung_up: bool,
}

impl ChannelSource {
    pub fn new(rx: Receiver<Vec<u8>>) -> Self {
        Self { rx, hung_up: false }
    }
}

impl HeartRateSource for ChannelSource {
    fn poll_event(&mut self) -> Option<SourceEvent> {
        if self.hung_up {
            return None;
        }
        match self.rx.try_recv() {
            Ok(packet) => Some(SourceEvent::Packet(packet)),
            Err(TryRecvError::Empty) => None,
            Err(TryRecvError::Disconnected) => {
                self.hung_up = true;
                Some(SourceEvent::Disconnected)
            }
        }
    }
}

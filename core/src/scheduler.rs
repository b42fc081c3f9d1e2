//! Timere uten tråder: en kø av forfalte hendelser som øktkontrolleren
//! henter ut én og én. Kansellerte timere fjernes fra køen og kan aldri fyre.

use std::time::{Duration, Instant};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TimerHandle(u64);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TimerEvent {
    /// 1s-tick for klokke og logging
    WorkoutTick,
    /// 2s-tick for simulert puls
    HrSimulation,
    /// Engangs: forhåndsvisning ferdig, start økta
    PreviewElapsed,
}

pub trait Scheduler {
    /// Tid siden scheduleren ble laget.
    fn now(&self) -> Duration;
    fn every(&mut self, interval: Duration, event: TimerEvent) -> TimerHandle;
    fn after(&mut self, delay: Duration, event: TimerEvent) -> TimerHandle;
    /// `true` hvis timeren fantes.
    fn cancel(&mut self, handle: TimerHandle) -> bool;
    /// Neste forfalte hendelse, i (forfallstid, registrering)-rekkefølge.
    fn next_due(&mut self) -> Option<TimerEvent>;
}

#[derive(Debug, Clone)]
struct Entry {
    handle: TimerHandle,
    due: Duration,
    interval: Option<Duration>,
    event: TimerEvent,
}

/// Felles kø for begge schedulerne.
#[derive(Debug, Default)]
pub struct TimerQueue {
    next_id: u64,
    entries: Vec<Entry>,
}

impl TimerQueue {
    fn insert(&mut self, due: Duration, interval: Option<Duration>, event: TimerEvent) -> TimerHandle {
        let handle = TimerHandle(self.next_id);
        self.next_id += 1;
        self.entries.push(Entry { handle, due, interval, event });
        handle
    }

    fn cancel(&mut self, handle: TimerHandle) -> bool {
        let before = self.entries.len();
        self.entries.retain(|e| e.handle != handle);
        self.entries.len() != before
    }

    fn pop_due(&mut self, now: Duration) -> Option<TimerEvent> {
        let idx = self
            .entries
            .iter()
            .enumerate()
            .filter(|(_, e)| e.due <= now)
            .min_by_key(|(_, e)| (e.due, e.handle.0))
            .map(|(i, _)| i)?;

        match self.entries[idx].interval {
            Some(interval) => {
                let entry = &mut self.entries[idx];
                entry.due += interval;
                Some(entry.event)
            }
            None => Some(self.entries.swap_remove(idx).event),
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Deterministisk scheduler for tester og hurtigsimulering; tiden flyttes manuelt.
#[derive(Debug, Default)]
pub struct ManualScheduler {
    now: Duration,
    queue: TimerQueue,
}

impl ManualScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn advance(&mut self, by: Duration) {
        self.now += by;
    }

    pub fn pending(&self) -> usize {
        self.queue.len()
    }
}

impl Scheduler for ManualScheduler {
    fn now(&self) -> Duration {
        self.now
    }

    fn every(&mut self, interval: Duration, event: TimerEvent) -> TimerHandle {
        self.queue.insert(self.now + interval, Some(interval), event)
    }

    fn after(&mut self, delay: Duration, event: TimerEvent) -> TimerHandle {
        self.queue.insert(self.now + delay, None, event)
    }

    fn cancel(&mut self, handle: TimerHandle) -> bool {
        self.queue.cancel(handle)
    }

    fn next_due(&mut self) -> Option<TimerEvent> {
        self.queue.pop_due(self.now)
    }
}

/// Veggklokke-scheduler. Eieren poller `next_due` i sin egen løkke.
#[derive(Debug)]
pub struct SystemScheduler {
    origin: Instant,
    queue: TimerQueue,
}

impl Default for SystemScheduler {
    fn default() -> Self {
        Self::new()
    }
}

impl SystemScheduler {
    pub fn new() -> Self {
        Self { origin: Instant::now(), queue: TimerQueue::default() }
    }

    /// Tid til neste timer forfaller (None hvis køen er tom).
    pub fn until_next(&self) -> Option<Duration> {
        let now = self.now();
        self.queue
            .entries
            .iter()
            .map(|e| e.due.saturating_sub(now))
            .min()
    }
}

impl Scheduler for SystemScheduler {
    fn now(&self) -> Duration {
        self.origin.elapsed()
    }

    fn every(&mut self, interval: Duration, event: TimerEvent) -> TimerHandle {
        let due = self.now() + interval;
        self.queue.insert(due, Some(interval), event)
    }

    fn after(&mut self, delay: Duration, event: TimerEvent) -> TimerHandle {
        let due = self.now() + delay;
        self.queue.insert(due, None, event)
    }

    fn cancel(&mut self, handle: TimerHandle) -> bool {
        self.queue.cancel(handle)
    }

    fn next_due(&mut self) -> Option<TimerEvent> {
        let now = self.now();
        self.queue.pop_due(now)
    }
}

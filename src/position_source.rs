use std::collections::HashMap;
use std::io::Read;
use std::sync::mpsc::{self, Receiver, Sender, TryRecvError};

use anyhow::Result;

use crate::config::WatchOptions;
use crate::error::{PositionError, TrackerError};
use crate::gps_processor::Fix;

pub type WatchId = u64;

#[derive(Clone, Debug, PartialEq)]
pub enum PositionEvent {
    Fix(Fix),
    // terminal for the subscription that receives it
    Error(PositionError),
}

/// Events of a single watch. Dropping it closes the channel, so the source
/// can no longer deliver anything to the tracker.
pub struct Subscription {
    id: WatchId,
    events: Receiver<PositionEvent>,
}

impl Subscription {
    pub fn new(id: WatchId, events: Receiver<PositionEvent>) -> Self {
        Subscription { id, events }
    }

    pub fn id(&self) -> WatchId {
        self.id
    }

    /// Next queued event without blocking. A disconnected source is the same
    /// as an empty queue.
    pub fn try_next(&self) -> Option<PositionEvent> {
        match self.events.try_recv() {
            Ok(event) => Some(event),
            Err(TryRecvError::Empty) | Err(TryRecvError::Disconnected) => None,
        }
    }
}

pub trait PositionSource {
    fn subscribe(&mut self, options: &WatchOptions) -> Result<Subscription>;
    fn unsubscribe(&mut self, id: WatchId);
}

/// A source fed by the host, e.g. from the platform's location callback.
pub struct ChannelPositionSource {
    supported: bool,
    next_id: WatchId,
    watches: HashMap<WatchId, Sender<PositionEvent>>,
    last_options: Option<WatchOptions>,
}

impl ChannelPositionSource {
    pub fn new() -> Self {
        ChannelPositionSource {
            supported: true,
            next_id: 1,
            watches: HashMap::new(),
            last_options: None,
        }
    }

    /// A device without any position support; every subscription fails.
    pub fn unsupported() -> Self {
        ChannelPositionSource {
            supported: false,
            ..Self::new()
        }
    }

    /// Delivers `event` to every active watch. Returns how many received it.
    pub fn push(&mut self, event: PositionEvent) -> usize {
        // a watch whose subscription was dropped is closed on our side too
        self.watches
            .retain(|_, sender| sender.send(event.clone()).is_ok());
        self.watches.len()
    }

    pub fn push_fix(&mut self, fix: Fix) -> usize {
        self.push(PositionEvent::Fix(fix))
    }

    pub fn active_watch_count(&self) -> usize {
        self.watches.len()
    }

    pub fn last_options(&self) -> Option<&WatchOptions> {
        self.last_options.as_ref()
    }
}

impl PositionSource for ChannelPositionSource {
    fn subscribe(&mut self, options: &WatchOptions) -> Result<Subscription> {
        if !self.supported {
            return Err(TrackerError::NoPositionSupport.into());
        }
        let id = self.next_id;
        self.next_id += 1;
        let (tx, rx) = mpsc::channel();
        self.watches.insert(id, tx);
        self.last_options = Some(options.clone());
        debug!("[position_source] watch {} started: {:?}", id, options);
        Ok(Subscription::new(id, rx))
    }

    fn unsubscribe(&mut self, id: WatchId) {
        if self.watches.remove(&id).is_some() {
            debug!("[position_source] watch {} cleared", id);
        }
    }
}

/// Replays a recorded list of events to each new subscription.
pub struct ReplayPositionSource {
    events: Vec<PositionEvent>,
    next_id: WatchId,
    active: Option<WatchId>,
}

impl ReplayPositionSource {
    pub fn new(events: Vec<PositionEvent>) -> Self {
        ReplayPositionSource {
            events,
            next_id: 1,
            active: None,
        }
    }

    pub fn from_fixes(fixes: Vec<Fix>) -> Self {
        Self::new(fixes.into_iter().map(PositionEvent::Fix).collect())
    }

    /// Reads fixes from csv with the header
    /// `timestamp_ms,latitude,longitude,accuracy`; extra columns are ignored.
    pub fn from_csv<R: Read>(reader: R) -> Result<Self> {
        let mut reader = csv::Reader::from_reader(reader);
        let mut fixes = Vec::new();
        for (i, record) in reader.deserialize().enumerate() {
            let fix: Fix = record.map_err(|e| anyhow!("invalid fix at row {}: {}", i + 1, e))?;
            fixes.push(fix);
        }
        info!("[position_source] loaded {} fixes for replay", fixes.len());
        Ok(Self::from_fixes(fixes))
    }

    pub fn with_terminal_error(mut self, error: PositionError) -> Self {
        self.events.push(PositionEvent::Error(error));
        self
    }

    pub fn events(&self) -> &[PositionEvent] {
        &self.events
    }

    pub fn active_watch(&self) -> Option<WatchId> {
        self.active
    }
}

impl PositionSource for ReplayPositionSource {
    fn subscribe(&mut self, _options: &WatchOptions) -> Result<Subscription> {
        let id = self.next_id;
        self.next_id += 1;
        let (tx, rx) = mpsc::channel();
        for event in &self.events {
            // the receiver is still held by us here, sending cannot fail
            let _ = tx.send(event.clone());
        }
        self.active = Some(id);
        Ok(Subscription::new(id, rx))
    }

    fn unsubscribe(&mut self, id: WatchId) {
        if self.active == Some(id) {
            self.active = None;
        }
    }
}

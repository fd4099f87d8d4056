//! Mock collaborators for unit tests

use std::collections::VecDeque;
use std::string::{String, ToString};
use std::vec::Vec;

use crate::animation::Color;
use crate::command::Inbox;
use crate::config::STRIP_LEN;
use crate::traits::{BrokerSession, LedStrip, LinkTransport, Relay, TriggerSensor};

pub struct MockStrip {
    pub cells: [Color; STRIP_LEN],
    pub shows: usize,
}

impl MockStrip {
    pub fn new() -> Self {
        Self {
            cells: [Color::BLACK; STRIP_LEN],
            shows: 0,
        }
    }

    /// Cells that are not black
    pub fn lit(&self) -> usize {
        self.cells.iter().filter(|c| !c.is_black()).count()
    }

    pub fn is_solid(&self, color: Color) -> bool {
        self.cells.iter().all(|c| *c == color)
    }
}

impl LedStrip for MockStrip {
    fn cell_count(&self) -> usize {
        STRIP_LEN
    }

    fn set_pixel(&mut self, index: usize, color: Color) {
        if let Some(cell) = self.cells.get_mut(index) {
            *cell = color;
        }
    }

    fn show(&mut self) {
        self.shows += 1;
    }
}

pub struct MockTransport {
    pub up: bool,
    pub connects: u32,
    pub reconnects: u32,
}

impl MockTransport {
    pub fn new() -> Self {
        Self {
            up: false,
            connects: 0,
            reconnects: 0,
        }
    }
}

impl LinkTransport for MockTransport {
    fn connect(&mut self) {
        self.connects += 1;
    }

    fn is_connected(&self) -> bool {
        self.up
    }

    fn reconnect(&mut self) {
        self.reconnects += 1;
    }
}

pub struct MockBroker {
    pub up: bool,
    pub accept: bool,
    pub reject_publish: bool,
    pub connects: u32,
    pub client_id: Option<String>,
    pub subscriptions: Vec<String>,
    pub published: Vec<(String, Vec<u8>)>,
    pub incoming: VecDeque<Vec<u8>>,
}

impl MockBroker {
    /// Broker that accepts every connect
    pub fn accepting() -> Self {
        Self {
            up: false,
            accept: true,
            reject_publish: false,
            connects: 0,
            client_id: None,
            subscriptions: Vec::new(),
            published: Vec::new(),
            incoming: VecDeque::new(),
        }
    }

    /// Broker that refuses every connect
    pub fn refusing() -> Self {
        Self {
            accept: false,
            ..Self::accepting()
        }
    }

    pub fn drop_session(&mut self) {
        self.up = false;
    }

    pub fn queue(&mut self, payload: &[u8]) {
        self.incoming.push_back(payload.to_vec());
    }

    /// Texts published so far, in order
    pub fn published_texts(&self) -> Vec<&str> {
        self.published
            .iter()
            .map(|(_, payload)| core::str::from_utf8(payload).unwrap())
            .collect()
    }
}

impl BrokerSession for MockBroker {
    fn connect(&mut self, client_id: &str) -> bool {
        self.connects += 1;
        self.client_id = Some(client_id.to_string());
        self.up = self.accept;
        self.up
    }

    fn is_connected(&self) -> bool {
        self.up
    }

    fn subscribe(&mut self, topic: &str) -> bool {
        if !self.up {
            return false;
        }
        self.subscriptions.push(topic.to_string());
        true
    }

    fn publish(&mut self, topic: &str, payload: &[u8]) -> bool {
        if !self.up || self.reject_publish {
            return false;
        }
        self.published.push((topic.to_string(), payload.to_vec()));
        true
    }

    fn pump_incoming(&mut self, inbox: &mut Inbox) {
        while let Some(payload) = self.incoming.pop_front() {
            let _ = inbox.push(&payload);
        }
    }
}

#[derive(Default)]
pub struct MockRelay {
    pub on: bool,
    pub writes: u32,
}

impl Relay for MockRelay {
    fn set_on(&mut self, on: bool) {
        self.on = on;
        self.writes += 1;
    }

    fn is_on(&self) -> bool {
        self.on
    }
}

#[derive(Default)]
pub struct MockSensor {
    pub closed: bool,
    pub reads: u32,
}

impl TriggerSensor for MockSensor {
    fn is_triggered(&mut self) -> bool {
        self.reads += 1;
        self.closed
    }
}

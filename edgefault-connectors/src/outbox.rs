//! Bounded in-memory connector
//!
//! Lets a host keep its broker client on another loop or thread: the
//! service publishes into the outbox, the host drains it and forwards each
//! message. Sends fail instead of growing the queue.

use std::collections::VecDeque;

use crate::{Connector, ConnectorError};

/// One message waiting to be published
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Envelope {
    pub topic: String,
    pub payload: Vec<u8>,
}

/// Fixed-capacity queue of outgoing messages
#[derive(Debug)]
pub struct Outbox {
    queue: VecDeque<Envelope>,
    capacity: usize,
    connected: bool,
}

impl Outbox {
    /// Empty outbox, initially connected
    pub fn new(capacity: usize) -> Self {
        Self { queue: VecDeque::with_capacity(capacity), capacity, connected: true }
    }

    /// Mirror the host transport's link state
    pub fn set_connected(&mut self, connected: bool) {
        self.connected = connected;
    }

    pub fn len(&self) -> usize {
        self.queue.len()
    }

    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }

    /// Take every queued message, oldest first
    pub fn drain(&mut self) -> impl Iterator<Item = Envelope> + '_ {
        self.queue.drain(..)
    }
}

impl Connector for Outbox {
    type Error = ConnectorError;

    fn send(&mut self, topic: &str, data: &[u8]) -> Result<(), Self::Error> {
        if !self.connected {
            return Err(ConnectorError::NotConnected);
        }
        if self.queue.len() >= self.capacity {
            return Err(ConnectorError::BufferFull);
        }
        self.queue.push_back(Envelope { topic: topic.to_string(), payload: data.to_vec() });
        Ok(())
    }

    fn is_connected(&self) -> bool {
        self.connected
    }
}

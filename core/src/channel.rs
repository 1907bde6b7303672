//! Bounded channels exposed as lazy sequences.
//!
//! `channel(size)` returns a writer (`Emitter`) and a reader
//! (`ChannelSequence`). Writes block once `size` values are buffered; a
//! size of zero makes every write wait for a reader (rendezvous). The
//! reader is an ordinary lazy sequence: each node receives one message on
//! first demand, so values are observed in write order and a realized
//! prefix can be re-read by any holder. Closing the writer ends the
//! sequence; an error written to the channel is re-raised to the reader.

use std::sync::mpsc::{Receiver, SyncSender, sync_channel};
use std::sync::{Arc, Mutex, PoisonError};

use tracing::{debug, trace, warn};

use crate::error::{Error, Result};
use crate::lazy::LazySequence;
use crate::value::Value;

enum Message {
    Value(Value),
    Error(Error),
}

/// Create a channel buffering up to `size` values.
pub fn channel(size: usize) -> (Emitter, ChannelSequence) {
    let (sender, receiver) = sync_channel(size);
    debug!(size, "channel opened");
    let state = Arc::new(ReaderState {
        receiver: Mutex::new(receiver),
    });
    let emitter = Emitter {
        sender: Mutex::new(Some(sender)),
    };
    let sequence = ChannelSequence {
        head: next_node(state),
    };
    (emitter, sequence)
}

// ============================================================================
// Writer
// ============================================================================

/// Writing side of a channel. Dropping it closes the channel.
pub struct Emitter {
    sender: Mutex<Option<SyncSender<Message>>>,
}

impl Emitter {
    /// Send `value`, blocking while the buffer is full.
    pub fn write(&self, value: Value) -> Result<()> {
        self.send(Message::Value(value))
    }

    /// Send an error that the reader will raise when it reaches it.
    pub fn error(&self, err: Error) -> Result<()> {
        self.send(Message::Error(err))
    }

    fn send(&self, message: Message) -> Result<()> {
        // Clone the sender so a blocked write does not hold the lock.
        let sender = self
            .sender
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
            .ok_or_else(Error::channel_closed)?;
        sender.send(message).map_err(|_| {
            warn!("channel write after reader went away");
            Error::channel_closed()
        })?;
        trace!("channel write");
        Ok(())
    }

    /// Close the channel. Closing twice is a no-op.
    pub fn close(&self) {
        let sender = self
            .sender
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take();
        if sender.is_some() {
            debug!("channel closed");
        }
    }

    pub fn is_closed(&self) -> bool {
        self.sender
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .is_none()
    }
}

impl Drop for Emitter {
    fn drop(&mut self) {
        if !self.is_closed() {
            debug!("emitter dropped without close");
            self.close();
        }
    }
}

// ============================================================================
// Reader
// ============================================================================

struct ReaderState {
    receiver: Mutex<Receiver<Message>>,
}

impl Drop for ReaderState {
    fn drop(&mut self) {
        debug!("channel reader released");
    }
}

fn next_node(state: Arc<ReaderState>) -> LazySequence {
    LazySequence::new(move || {
        let received = state
            .receiver
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .recv();
        match received {
            Ok(Message::Value(value)) => Ok((value, Value::Lazy(next_node(state)), true)),
            Ok(Message::Error(err)) => Err(err),
            Err(_) => {
                trace!("channel drained");
                Ok((Value::Null, Value::Lazy(LazySequence::empty()), false))
            }
        }
    })
}

/// Reading side of a channel: a lazy sequence of the values written.
#[derive(Clone, Debug)]
pub struct ChannelSequence {
    head: LazySequence,
}

impl ChannelSequence {
    pub fn as_lazy(&self) -> &LazySequence {
        &self.head
    }

    pub fn into_value(self) -> Value {
        Value::Lazy(self.head)
    }
}

impl From<ChannelSequence> for Value {
    fn from(seq: ChannelSequence) -> Self {
        seq.into_value()
    }
}

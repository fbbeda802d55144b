use std::collections::HashMap;

use crossbeam_channel::{Receiver, Sender};
use thiserror::Error;

use crate::shared::frame::Frame;
use crate::transport::domain::transport::{
    CommandHandler, CommandResponse, FrameCallback, Transport,
};

const DEFAULT_CHANNEL_CAPACITY: usize = 8;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TransportError {
    #[error("dispatcher is no longer running")]
    Disconnected,
}

enum Event {
    Frame {
        topic: String,
        frame: Frame,
    },
    Command {
        name: String,
        argument: Option<String>,
        reply: Sender<CommandResponse>,
    },
    Shutdown,
}

/// Single-threaded event loop over a bounded crossbeam channel.
///
/// Frames and commands from any number of [`DispatcherHandle`]s are
/// delivered one at a time, in arrival order, on the thread calling
/// [`spin`](Self::spin). A full queue blocks publishers, so a slow callback
/// backpressures the producers rather than dropping frames.
pub struct ChannelDispatcher<C, E> {
    tx: Sender<Event>,
    rx: Receiver<Event>,
    subscriptions: HashMap<String, Vec<FrameCallback<C, E>>>,
    commands: HashMap<String, CommandHandler<C>>,
}

impl<C, E> ChannelDispatcher<C, E> {
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_CHANNEL_CAPACITY)
    }

    pub fn with_capacity(capacity: usize) -> Self {
        let (tx, rx) = crossbeam_channel::bounded(capacity.max(1));
        Self {
            tx,
            rx,
            subscriptions: HashMap::new(),
            commands: HashMap::new(),
        }
    }

    pub fn handle(&self) -> DispatcherHandle {
        DispatcherHandle {
            tx: self.tx.clone(),
        }
    }

    pub fn has_command(&self, name: &str) -> bool {
        self.commands.contains_key(name)
    }

    /// Dispatches events until a shutdown request arrives or a frame
    /// callback fails. Events queued behind the failure are not delivered.
    pub fn spin(&mut self, context: &mut C) -> Result<(), E> {
        while let Ok(event) = self.rx.recv() {
            match event {
                Event::Frame { topic, frame } => self.deliver_frame(context, &topic, &frame)?,
                Event::Command {
                    name,
                    argument,
                    reply,
                } => {
                    let response = self.run_command(context, &name, argument.as_deref());
                    // The caller may have given up waiting.
                    let _ = reply.send(response);
                }
                Event::Shutdown => {
                    log::debug!("Dispatcher shutting down");
                    break;
                }
            }
        }
        Ok(())
    }

    fn deliver_frame(&mut self, context: &mut C, topic: &str, frame: &Frame) -> Result<(), E> {
        let Some(callbacks) = self.subscriptions.get_mut(topic) else {
            log::debug!("No subscriber for topic '{topic}', frame dropped");
            return Ok(());
        };
        for callback in callbacks.iter_mut() {
            callback(context, frame)?;
        }
        Ok(())
    }

    fn run_command(&mut self, context: &mut C, name: &str, argument: Option<&str>) -> CommandResponse {
        match self.commands.get_mut(name) {
            Some(handler) => handler(context, argument),
            None => CommandResponse::failed(format!("unknown command '{name}'")),
        }
    }
}

impl<C, E> Default for ChannelDispatcher<C, E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<C, E> Transport<C, E> for ChannelDispatcher<C, E> {
    fn subscribe(&mut self, topic: &str, callback: FrameCallback<C, E>) {
        log::info!("Waiting for topic {topic}...");
        self.subscriptions
            .entry(topic.to_string())
            .or_default()
            .push(callback);
    }

    fn register_command(&mut self, name: &str, handler: CommandHandler<C>) {
        if self.commands.insert(name.to_string(), handler).is_some() {
            log::warn!("Command '{name}' registered twice; keeping the latest handler");
        }
    }
}

/// Cloneable, thread-safe entry point into a [`ChannelDispatcher`].
#[derive(Clone)]
pub struct DispatcherHandle {
    tx: Sender<Event>,
}

impl DispatcherHandle {
    /// Queues a frame, blocking while the dispatcher queue is full.
    pub fn publish(&self, topic: &str, frame: Frame) -> Result<(), TransportError> {
        self.tx
            .send(Event::Frame {
                topic: topic.to_string(),
                frame,
            })
            .map_err(|_| TransportError::Disconnected)
    }

    /// Runs a command on the dispatcher thread and waits for its reply.
    pub fn call(&self, name: &str, argument: Option<String>) -> Result<CommandResponse, TransportError> {
        let (reply, response) = crossbeam_channel::bounded(1);
        self.tx
            .send(Event::Command {
                name: name.to_string(),
                argument,
                reply,
            })
            .map_err(|_| TransportError::Disconnected)?;
        response.recv().map_err(|_| TransportError::Disconnected)
    }

    /// Asks the dispatcher to stop after the events already queued.
    pub fn shutdown(&self) -> Result<(), TransportError> {
        self.tx
            .send(Event::Shutdown)
            .map_err(|_| TransportError::Disconnected)
    }
}

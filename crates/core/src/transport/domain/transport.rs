use crate::shared::frame::Frame;

/// Reply to a remote command: success plus a human-readable message.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CommandResponse {
    pub success: bool,
    pub message: String,
}

impl CommandResponse {
    pub fn ok(message: impl Into<String>) -> Self {
        Self {
            success: true,
            message: message.into(),
        }
    }

    pub fn failed(message: impl Into<String>) -> Self {
        Self {
            success: false,
            message: message.into(),
        }
    }
}

/// Called for every frame published on a subscribed topic. An error stops
/// dispatching and is handed back to whoever runs the loop.
pub type FrameCallback<C, E> = Box<dyn FnMut(&mut C, &Frame) -> Result<(), E>>;

/// Called for a named command with its optional string argument.
pub type CommandHandler<C> = Box<dyn FnMut(&mut C, Option<&str>) -> CommandResponse>;

/// Publish/subscribe plus request/response facility the recorder plugs into.
///
/// Callbacks receive the shared context `C` explicitly, so no callback
/// needs to capture mutable state of its own. Implementations must never
/// run two callbacks at the same time.
pub trait Transport<C, E> {
    fn subscribe(&mut self, topic: &str, callback: FrameCallback<C, E>);

    fn register_command(&mut self, name: &str, handler: CommandHandler<C>);
}

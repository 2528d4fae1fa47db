//! Decoded protocol frames and connection handles.
//!
//! A `Frame` is one decoded protocol message, handed to the dispatcher by
//! the transport layer. The dispatcher never interprets the body itself —
//! it passes it to the argument binder (normal request) or the fault
//! decoder (exception-flagged frame).

/// One decoded protocol message.
///
/// The transport layer parses raw bytes into frames; the dispatch core only
/// ever sees this struct. `body` stays opaque at this level.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Frame {
    /// Which action this frame targets.
    pub command_code: u32,
    /// When set, the body is a fault payload, not a request.
    pub is_exception: bool,
    /// Opaque payload bytes (arguments, result, or fault description).
    pub body: Vec<u8>,
}

impl Frame {
    /// Create a request frame targeting a command code.
    pub fn request(command_code: u32, body: impl Into<Vec<u8>>) -> Self {
        Self {
            command_code,
            is_exception: false,
            body: body.into(),
        }
    }

    /// Create a response frame carrying a serialized return value.
    pub fn response(command_code: u32, body: impl Into<Vec<u8>>) -> Self {
        Self {
            command_code,
            is_exception: false,
            body: body.into(),
        }
    }

    /// Create an exception-flagged frame carrying a fault payload.
    pub fn exception(command_code: u32, body: impl Into<Vec<u8>>) -> Self {
        Self {
            command_code,
            is_exception: true,
            body: body.into(),
        }
    }
}

/// Opaque identifier for the connection a frame arrived on.
///
/// The dispatcher carries this through contexts so filters and the
/// transport layer can correlate an invocation with its connection; it
/// never performs I/O with it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ConnectionHandle(u64);

impl ConnectionHandle {
    /// Create a handle from a transport-assigned connection id.
    pub fn new(id: u64) -> Self {
        Self(id)
    }

    /// The transport-assigned connection id.
    pub fn id(&self) -> u64 {
        self.0
    }
}

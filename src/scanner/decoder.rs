//! QR decoder adapter.
//!
//! Decoding camera frames is the device library's responsibility; this
//! adapter is the capability the scan flow consumes: a stream of decoded
//! text payloads, each stamped with the time it was observed.

use std::time::Instant;

use tokio::sync::mpsc;

/// A single decoded payload.
#[derive(Debug, Clone)]
pub struct DecodedCode {
    pub text: String,
    pub at: Instant,
}

impl DecodedCode {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            at: Instant::now(),
        }
    }
}

/// Sending half, handed to the camera integration.
#[derive(Clone)]
pub struct DecodeHandle {
    tx: mpsc::Sender<DecodedCode>,
}

impl DecodeHandle {
    /// Emit a decoded payload. Returns false once the scanner is gone or
    /// the channel is full; the camera simply drops the frame then.
    pub fn emit(&self, text: impl Into<String>) -> bool {
        self.tx.try_send(DecodedCode::new(text)).is_ok()
    }
}

/// Receiving half, drained by the scan loop.
pub struct DecodeSource {
    rx: mpsc::Receiver<DecodedCode>,
}

impl DecodeSource {
    pub fn channel(capacity: usize) -> (DecodeHandle, DecodeSource) {
        let (tx, rx) = mpsc::channel(capacity);
        (DecodeHandle { tx }, DecodeSource { rx })
    }

    /// Next decoded payload, or `None` when every handle is dropped.
    pub async fn next(&mut self) -> Option<DecodedCode> {
        self.rx.recv().await
    }
}

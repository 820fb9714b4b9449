//! In-memory duplex transport for deterministic tests (§8 end-to-end
//! scenarios all run over this).
//!
//! Reauthored from scratch: the teacher's own simulation transport
//! (`sim_transport.rs`) was referenced by its `lib.rs` but absent from the
//! retrieval pack, and was Turmoil/MLS specific regardless. This is the
//! simplest thing that satisfies `romp_core::Transport`: two byte queues,
//! one per direction, each guarded by a `tokio::sync::Mutex` and paired
//! with a `tokio::sync::Notify` so a reader can suspend until the writer
//! on the other end produces something.

use std::{collections::VecDeque, io, sync::Arc};

use romp_core::Transport;
use tokio::sync::{Mutex, Notify};

struct Pipe {
    buffer: Mutex<VecDeque<u8>>,
    notify: Notify,
}

impl Pipe {
    fn new() -> Arc<Self> {
        Arc::new(Self { buffer: Mutex::new(VecDeque::new()), notify: Notify::new() })
    }
}

/// One end of an in-memory duplex pipe.
///
/// Implements [`Transport`] by reading from `inbound` and writing to
/// `outbound`; the peer end (returned alongside this one by
/// [`loopback_pair`]) has the two swapped, so a write here becomes visible
/// to a read there.
pub struct LoopbackTransport {
    inbound: Arc<Pipe>,
    outbound: Arc<Pipe>,
}

impl Transport for LoopbackTransport {
    fn try_read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        let Ok(mut queue) = self.inbound.buffer.try_lock() else {
            return Err(io::ErrorKind::WouldBlock.into());
        };
        if queue.is_empty() {
            return Err(io::ErrorKind::WouldBlock.into());
        }
        let mut n = 0;
        while n < buf.len() {
            let Some(byte) = queue.pop_front() else { break };
            buf[n] = byte;
            n += 1;
        }
        Ok(n)
    }

    fn try_write(&mut self, buf: &[u8]) -> io::Result<usize> {
        let Ok(mut queue) = self.outbound.buffer.try_lock() else {
            return Err(io::ErrorKind::WouldBlock.into());
        };
        queue.extend(buf.iter().copied());
        drop(queue);
        self.outbound.notify.notify_one();
        Ok(buf.len())
    }

    async fn readable(&mut self) -> io::Result<()> {
        loop {
            let notified = self.inbound.notify.notified();
            if !self.inbound.buffer.lock().await.is_empty() {
                return Ok(());
            }
            notified.await;
        }
    }

    async fn writable(&mut self) -> io::Result<()> {
        Ok(())
    }
}

/// Builds a connected pair of [`LoopbackTransport`]s: writes on one side
/// become readable on the other.
#[must_use]
pub fn loopback_pair() -> (LoopbackTransport, LoopbackTransport) {
    let a_to_b = Pipe::new();
    let b_to_a = Pipe::new();
    let client = LoopbackTransport { inbound: Arc::clone(&b_to_a), outbound: Arc::clone(&a_to_b) };
    let server = LoopbackTransport { inbound: a_to_b, outbound: b_to_a };
    (client, server)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn write_on_one_side_is_readable_on_the_other() {
        let (mut client, mut server) = loopback_pair();
        client.try_write(b"hello").unwrap();
        server.readable().await.unwrap();
        let mut buf = [0u8; 5];
        let n = server.try_read(&mut buf).unwrap();
        assert_eq!(&buf[..n], b"hello");
    }

    #[tokio::test]
    async fn read_with_nothing_queued_would_block() {
        let (_client, mut server) = loopback_pair();
        let mut buf = [0u8; 5];
        let err = server.try_read(&mut buf).unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::WouldBlock);
    }
}

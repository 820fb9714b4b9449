//! Cooperative fill/drain loops shared by reads and writes.
//!
//! Grounded in the original `ruby_read_throw`/`ruby_write_throw`: try the
//! operation, and if it would block, either fail immediately (non-blocking
//! mode) or wait for readiness and retry (blocking mode). Both modes run
//! the same attempt-then-decide loop; they differ only in what happens on
//! [`io::ErrorKind::WouldBlock`], which is the semantic equivalence
//! `Session` relies on.

use std::io;

use crate::{RompError, Transport};

/// Fills `buf` completely from `transport`.
///
/// If `nonblock` is `true`, returns [`RompError::WouldBlock`] the first
/// time the transport has no data ready rather than waiting for more.
///
/// # Errors
///
/// [`RompError::Disconnected`] if the transport reaches end-of-stream
/// before `buf` is filled; [`RompError::Io`] for any other I/O failure.
pub async fn read_exact(transport: &mut impl Transport, buf: &mut [u8], nonblock: bool) -> Result<(), RompError> {
    let mut filled = 0;
    while filled < buf.len() {
        match transport.try_read(&mut buf[filled..]) {
            Ok(0) => return Err(RompError::Disconnected),
            Ok(n) => filled += n,
            Err(err) if err.kind() == io::ErrorKind::WouldBlock => {
                if nonblock {
                    return Err(RompError::WouldBlock);
                }
                transport.readable().await.map_err(RompError::Io)?;
            }
            Err(err) => return Err(RompError::Io(err)),
        }
    }
    Ok(())
}

/// Drains all of `buf` into `transport`. See [`read_exact`] for the
/// `nonblock` contract.
///
/// # Errors
///
/// [`RompError::Disconnected`] if a write returns zero bytes with data
/// still pending; [`RompError::Io`] for any other I/O failure.
pub async fn write_all(transport: &mut impl Transport, buf: &[u8], nonblock: bool) -> Result<(), RompError> {
    let mut sent = 0;
    while sent < buf.len() {
        match transport.try_write(&buf[sent..]) {
            Ok(0) => return Err(RompError::Disconnected),
            Ok(n) => sent += n,
            Err(err) if err.kind() == io::ErrorKind::WouldBlock => {
                if nonblock {
                    return Err(RompError::WouldBlock);
                }
                transport.writable().await.map_err(RompError::Io)?;
            }
            Err(err) => return Err(RompError::Io(err)),
        }
    }
    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::collections::VecDeque;

    use super::*;

    /// Minimal in-memory transport for exercising the fill/drain loops
    /// without a real socket. Readable/writable always resolve
    /// immediately; `try_read`/`try_write` simulate blocking by yielding
    /// `WouldBlock` for a configured number of calls.
    struct FlakyTransport {
        inbound: VecDeque<u8>,
        outbound: Vec<u8>,
        stall_reads_remaining: usize,
        stall_writes_remaining: usize,
    }

    impl Transport for FlakyTransport {
        fn try_read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
            if self.stall_reads_remaining > 0 {
                self.stall_reads_remaining -= 1;
                return Err(io::Error::from(io::ErrorKind::WouldBlock));
            }
            if self.inbound.is_empty() {
                return Ok(0);
            }
            let mut n = 0;
            while n < buf.len() {
                let Some(byte) = self.inbound.pop_front() else { break };
                buf[n] = byte;
                n += 1;
            }
            Ok(n)
        }

        fn try_write(&mut self, buf: &[u8]) -> io::Result<usize> {
            if self.stall_writes_remaining > 0 {
                self.stall_writes_remaining -= 1;
                return Err(io::Error::from(io::ErrorKind::WouldBlock));
            }
            self.outbound.extend_from_slice(buf);
            Ok(buf.len())
        }

        async fn readable(&mut self) -> io::Result<()> {
            Ok(())
        }

        async fn writable(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    #[tokio::test]
    async fn read_exact_retries_through_would_block() {
        let mut transport = FlakyTransport {
            inbound: VecDeque::from(vec![1, 2, 3, 4]),
            outbound: Vec::new(),
            stall_reads_remaining: 3,
            stall_writes_remaining: 0,
        };
        let mut buf = [0u8; 4];
        read_exact(&mut transport, &mut buf, false).await.unwrap();
        assert_eq!(buf, [1, 2, 3, 4]);
    }

    #[tokio::test]
    async fn read_exact_nonblock_fails_fast() {
        let mut transport = FlakyTransport {
            inbound: VecDeque::from(vec![1, 2]),
            outbound: Vec::new(),
            stall_reads_remaining: 1,
            stall_writes_remaining: 0,
        };
        let mut buf = [0u8; 2];
        let result = read_exact(&mut transport, &mut buf, true).await;
        assert!(matches!(result, Err(RompError::WouldBlock)));
    }

    #[tokio::test]
    async fn read_exact_detects_disconnect() {
        let mut transport = FlakyTransport {
            inbound: VecDeque::from(vec![1]),
            outbound: Vec::new(),
            stall_reads_remaining: 0,
            stall_writes_remaining: 0,
        };
        let mut buf = [0u8; 4];
        let result = read_exact(&mut transport, &mut buf, false).await;
        assert!(matches!(result, Err(RompError::Disconnected)));
    }

    #[tokio::test]
    async fn write_all_retries_through_would_block() {
        let mut transport = FlakyTransport {
            inbound: VecDeque::new(),
            outbound: Vec::new(),
            stall_reads_remaining: 0,
            stall_writes_remaining: 2,
        };
        write_all(&mut transport, &[9, 8, 7], false).await.unwrap();
        assert_eq!(transport.outbound, vec![9, 8, 7]);
    }
}

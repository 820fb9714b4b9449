//! The byte-stream abstraction [`Session`](crate::Session) is built on.
//!
//! A [`Transport`] is deliberately small: non-blocking reads/writes plus a
//! readiness future for each direction. This is the same shape as a raw
//! file descriptor used with `O_NONBLOCK` and `select()` — which is
//! exactly what the original implementation did (`ruby_read_throw`/
//! `ruby_write_throw` against a Ruby IO object). Keeping the trait this
//! thin means `romp-core` itself never needs an async runtime; only the
//! concrete transports in `romp-client`/`romp-server`/`romp-harness` do.

use std::io;

/// A half-duplex-or-better byte stream with non-blocking reads and writes.
///
/// Implementations must never block inside [`Transport::try_read`] or
/// [`Transport::try_write`]: return [`io::ErrorKind::WouldBlock`] instead
/// and let the caller await [`Transport::readable`]/[`Transport::writable`].
pub trait Transport: Send {
    /// Attempts to read into `buf`, returning the number of bytes read.
    ///
    /// Returns `Ok(0)` only at end-of-stream. Returns an error with kind
    /// [`io::ErrorKind::WouldBlock`] if no data is currently available.
    fn try_read(&mut self, buf: &mut [u8]) -> io::Result<usize>;

    /// Attempts to write `buf`, returning the number of bytes written.
    ///
    /// Returns an error with kind [`io::ErrorKind::WouldBlock`] if the
    /// transport cannot currently accept data.
    fn try_write(&mut self, buf: &[u8]) -> io::Result<usize>;

    /// Resolves once the transport is likely readable.
    ///
    /// A spurious wakeup (resolving when a subsequent [`Transport::try_read`]
    /// still returns `WouldBlock`) is permitted; the I/O loop retries.
    fn readable(&mut self) -> impl std::future::Future<Output = io::Result<()>> + Send;

    /// Resolves once the transport is likely writable. See
    /// [`Transport::readable`] for the spurious-wakeup allowance.
    fn writable(&mut self) -> impl std::future::Future<Output = io::Result<()>> + Send;
}

//! Plain TCP transport for accepting client connections.
//!
//! Mirrors `romp-client`'s `TcpTransport`: a thin, encryption-free
//! [`romp_core::Transport`] over [`tokio::net::TcpStream`], since spec
//! Non-goals exclude transport establishment and encryption.

use std::{io, net::SocketAddr};

use romp_core::Transport;
use tokio::{io::Interest, net::TcpStream};

/// A [`Transport`] backed by a stream accepted from a [`tokio::net::TcpListener`].
pub struct TcpTransport {
    stream: TcpStream,
}

impl TcpTransport {
    /// Wraps an accepted stream.
    #[must_use]
    pub fn from_stream(stream: TcpStream) -> Self {
        Self { stream }
    }

    /// The stream's peer address, for logging.
    ///
    /// # Errors
    ///
    /// Returns the underlying [`io::Error`] if the socket has no peer.
    pub fn peer_addr(&self) -> io::Result<SocketAddr> {
        self.stream.peer_addr()
    }
}

impl Transport for TcpTransport {
    fn try_read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        self.stream.try_read(buf)
    }

    fn try_write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.stream.try_write(buf)
    }

    async fn readable(&mut self) -> io::Result<()> {
        self.stream.ready(Interest::READABLE).await.map(|_| ())
    }

    async fn writable(&mut self) -> io::Result<()> {
        self.stream.ready(Interest::WRITABLE).await.map(|_| ())
    }
}

//! Plain TCP [`Transport`] for connecting a [`crate::Proxy`] to a server.
//!
//! Spec Non-goals exclude transport establishment and encryption, so this
//! is deliberately the simplest thing that satisfies `romp_core::Transport`:
//! a `TcpStream` wrapped to expose non-blocking try-read/try-write plus
//! readiness futures, the way the original wrapped a raw Ruby `IO` object.

use std::{io, net::SocketAddr};

use romp_core::Transport;
use tokio::{
    io::Interest,
    net::{TcpStream, ToSocketAddrs},
};

/// A [`Transport`] backed by a connected [`TcpStream`].
pub struct TcpTransport {
    stream: TcpStream,
}

impl TcpTransport {
    /// Connects to `addr` and wraps the resulting stream.
    ///
    /// # Errors
    ///
    /// Returns the underlying [`io::Error`] if the connection attempt fails.
    pub async fn connect(addr: impl ToSocketAddrs) -> io::Result<Self> {
        let stream = TcpStream::connect(addr).await?;
        stream.set_nodelay(true)?;
        Ok(Self { stream })
    }

    /// Wraps an already-connected stream (e.g. accepted by a server).
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

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::sync::Arc;

    use romp_core::Session;
    use romp_proto::{CborCodec, Kind, Value};
    use tokio::net::TcpListener;

    use super::*;

    #[tokio::test]
    async fn connects_and_exchanges_a_message() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();

        let server = tokio::spawn(async move {
            let (stream, _) = listener.accept().await.unwrap();
            let mut session = Session::new(TcpTransport::from_stream(stream), Arc::new(CborCodec), false);
            let message = session.recv_message().await.unwrap();
            session.send_message(Kind::Retval, message.object_id, &Value::Text("pong".into())).await.unwrap();
        });

        let transport = TcpTransport::connect(addr).await.unwrap();
        let mut session = Session::new(transport, Arc::new(CborCodec), false);
        session.send_message(Kind::Request, 1, &Value::Text("ping".into())).await.unwrap();
        let reply = session.recv_message().await.unwrap();
        assert_eq!(reply.value, Value::Text("pong".into()));

        server.await.unwrap();
    }
}

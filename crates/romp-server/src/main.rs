//! `romp-server` binary: a minimal TCP server demonstrating the protocol.
//!
//! Registers two objects — an echo and a two-argument adder — and serves
//! any number of concurrent TCP connections, one [`ServerContext`] dispatch
//! loop per connection. For a resolver covering the full §8 demo-object
//! roster (including yielding and exception-raising objects), see
//! `romp-harness`.

use std::{net::SocketAddr, sync::Arc};

use clap::Parser;
use romp_core::Session;
use romp_proto::{CborCodec, Value};
use romp_server::{InvokeError, Invoker, Resolver, ServerContext, ServerError, TcpTransport, TracingLogger};
use tokio::net::TcpListener;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

/// Object message proxy protocol demo server.
#[derive(Parser, Debug)]
#[command(name = "romp-server")]
#[command(about = "Object message proxy protocol demo server")]
#[command(version)]
struct Args {
    /// Address to bind to.
    #[arg(short, long, default_value = "127.0.0.1:4242")]
    bind: String,

    /// Log level (trace, debug, info, warn, error).
    #[arg(long, default_value = "info")]
    log_level: String,

    /// Log swallowed `ONEWAY` exceptions (§7).
    #[arg(long)]
    debug: bool,
}

/// One of the two demo objects this binary serves.
#[derive(Clone, Copy)]
enum DemoTarget {
    /// `("echo", value)` returns `value` unchanged.
    Echo,
    /// `("add", a, b)` returns `a + b`.
    Adder,
}

struct DemoResolver;

impl Resolver for DemoResolver {
    type Target = DemoTarget;

    fn resolve(&self, object_id: u16) -> Option<Self::Target> {
        match object_id {
            1 => Some(DemoTarget::Echo),
            2 => Some(DemoTarget::Adder),
            _ => None,
        }
    }
}

struct DemoInvoker;

impl Invoker for DemoInvoker {
    type Target = DemoTarget;

    fn invoke(&self, target: &Self::Target, message: &Value) -> Result<Value, InvokeError> {
        let Value::Array(args) = message else {
            return Err(InvokeError::application("TypeError", "expected an array payload"));
        };
        match target {
            DemoTarget::Echo => Ok(args.get(1).cloned().unwrap_or(Value::Null)),
            DemoTarget::Adder => {
                let a = args.get(1).and_then(as_i64);
                let b = args.get(2).and_then(as_i64);
                match (a, b) {
                    (Some(a), Some(b)) => Ok(Value::Integer((a + b).into())),
                    _ => Err(InvokeError::application("TypeError", "add expects two integers")),
                }
            },
        }
    }
}

fn as_i64(value: &Value) -> Option<i64> {
    let Value::Integer(integer) = value else { return None };
    i64::try_from(*integer).ok()
}

#[tokio::main]
async fn main() -> Result<(), ServerError> {
    let args = Args::parse();
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&args.log_level));
    tracing_subscriber::registry().with(fmt::layer()).with(filter).init();

    let addr: SocketAddr =
        args.bind.parse().map_err(|err| ServerError::Config(format!("invalid bind address: {err}")))?;
    let listener = TcpListener::bind(addr).await?;
    tracing::info!(addr = %listener.local_addr()?, "romp-server listening");

    let debug = args.debug;
    loop {
        let (stream, peer) = listener.accept().await?;
        tracing::debug!(%peer, "accepted connection");
        tokio::spawn(async move {
            let transport = TcpTransport::from_stream(stream);
            let mut session = Session::new(transport, Arc::new(CborCodec), false);
            let ctx = ServerContext::new(DemoResolver, DemoInvoker, TracingLogger, debug);
            if let Err(err) = ctx.serve(&mut session).await {
                tracing::warn!(%peer, %err, "connection ended with an error");
            }
        });
    }
}

//! Proxy objects: the client side of the four call modes (§4.4, §4.6).
//!
//! A [`Proxy`] is a cheap, `Clone`-able handle to a remote object: cloning
//! one does not open a new connection, it shares the same underlying
//! [`Session`] and the [`tokio::sync::Mutex`] guarding it. That mutex is
//! this implementation's realisation of §6's `Lock` collaborator — locking
//! it is `Lock::acquire`, and the guard's `Drop` is `Lock::release`, which
//! gives §8 invariant 4 (every acquire has exactly one release, on every
//! exit path including a raised exception) for free rather than requiring
//! manual acquire/ensure/release discipline the way the original's
//! `ruby_lock`/`rb_ensure`/`ruby_unlock` triple did.

use std::sync::Arc;

use romp_core::{Session, Transport};
use romp_proto::{Kind, ObjectReference, RemoteException, Value};
use tokio::sync::Mutex;

use crate::error::{ClientError, Result};

/// A decoded value with any [`ObjectReference`] marker already turned into
/// a new [`Proxy`] (§4.7). Returned in place of a bare [`Value`] so the
/// client can keep calling through a reference the server handed back.
pub enum Materialised<T> {
    /// A plain value with no reference semantics.
    Value(Value),
    /// A reference to a remote object, sharing this call's session and lock.
    Proxy(Proxy<T>),
}

impl<T> Clone for Materialised<T> {
    fn clone(&self) -> Self {
        match self {
            Self::Value(value) => Self::Value(value.clone()),
            Self::Proxy(proxy) => Self::Proxy(proxy.clone()),
        }
    }
}

impl<T> std::fmt::Debug for Materialised<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Value(value) => f.debug_tuple("Value").field(value).finish(),
            Self::Proxy(proxy) => f.debug_tuple("Proxy").field(&proxy.object_id()).finish(),
        }
    }
}

impl<T> Materialised<T> {
    /// Returns the plain value, if this is not a reference.
    #[must_use]
    pub fn into_value(self) -> Option<Value> {
        match self {
            Self::Value(value) => Some(value),
            Self::Proxy(_) => None,
        }
    }

    /// Returns the proxy, if this is a reference.
    #[must_use]
    pub fn into_proxy(self) -> Option<Proxy<T>> {
        match self {
            Self::Proxy(proxy) => Some(proxy),
            Self::Value(_) => None,
        }
    }
}

/// Client-side handle to a remote object (`P = (session, lock, object_id)`
/// in §3's notation; here `session` and `lock` are one `Arc<Mutex<..>>`).
///
/// Immutable after construction: the "current outgoing message" is a
/// per-call argument, not stored state, so nothing is shared across
/// concurrent calls except the lock itself (§4.6).
pub struct Proxy<T> {
    session: Arc<Mutex<Session<T>>>,
    object_id: u16,
}

impl<T> Clone for Proxy<T> {
    fn clone(&self) -> Self {
        Self { session: Arc::clone(&self.session), object_id: self.object_id }
    }
}

impl<T: Transport> Proxy<T> {
    /// Builds a proxy for `object_id` against an already-shared session.
    #[must_use]
    pub fn new(session: Arc<Mutex<Session<T>>>, object_id: u16) -> Self {
        Self { session, object_id }
    }

    /// The remote object id this proxy targets.
    #[must_use]
    pub fn object_id(&self) -> u16 {
        self.object_id
    }

    /// `call(P, message) -> value` (§4.4): sends `REQUEST`, waits for the
    /// terminating `RETVAL`/`EXCEPTION`. No `YIELD` frames are expected; if
    /// the server's method does yield, use [`Self::call_with_yield`] instead.
    pub async fn call(&self, message: Value) -> Result<Materialised<T>> {
        let mut session = self.session.lock().await;
        session.send_message(Kind::Request, self.object_id, &message).await?;
        self.response_loop(&mut session, &mut |_| {}).await
    }

    /// `call(P, message) -> value` with a yield callback (§4.4): sends
    /// `REQUEST_BLOCK` instead of `REQUEST`, invoking `on_yield` for every
    /// `YIELD` frame the server sends before the terminating
    /// `RETVAL`/`EXCEPTION`. A method that yields nothing is
    /// indistinguishable from a plain `REQUEST` to the caller.
    pub async fn call_with_yield<F>(&self, message: Value, mut on_yield: F) -> Result<Materialised<T>>
    where
        F: FnMut(Materialised<T>),
    {
        let mut session = self.session.lock().await;
        session.send_message(Kind::RequestBlock, self.object_id, &message).await?;
        self.response_loop(&mut session, &mut on_yield).await
    }

    /// `oneway(P, message)` (§4.4): sends `ONEWAY` and returns without
    /// waiting for any reply.
    pub async fn oneway(&self, message: Value) -> Result<()> {
        let mut session = self.session.lock().await;
        session.send_message(Kind::Oneway, self.object_id, &message).await?;
        Ok(())
    }

    /// `oneway_sync(P, message)` (§4.4): sends `ONEWAY_SYNC` and awaits
    /// exactly one `NULL_MSG` ack. The ack is observed before the
    /// server-side method body necessarily runs (§5, §8 law 5) — the
    /// server writes it before invoking.
    pub async fn oneway_sync(&self, message: Value) -> Result<()> {
        let mut session = self.session.lock().await;
        session.send_message(Kind::OnewaySync, self.object_id, &message).await?;
        let reply = session.recv_message().await?;
        if reply.kind != Kind::NullMsg {
            return Err(ClientError::UnexpectedKind(reply.kind));
        }
        Ok(())
    }

    /// `sync(P)` (§4.4): sends a `SYNC` frame with tag 0 and awaits a
    /// matching `SYNC` reply with tag 1. Per §9's resolved open question,
    /// any other frame is a protocol error rather than being silently
    /// accepted.
    pub async fn sync(&self) -> Result<()> {
        let mut session = self.session.lock().await;
        session.send_message(Kind::Sync, 0, &Value::Null).await?;
        let reply = session.recv_message().await?;
        if reply.kind == Kind::Sync && reply.object_id == 1 {
            return Ok(());
        }
        Err(ClientError::SyncFailed)
    }

    /// The response loop from §4.4's pseudocode, parameterised over the
    /// yield callback so `call` and `call_with_yield` share one
    /// implementation.
    async fn response_loop(
        &self,
        session: &mut Session<T>,
        on_yield: &mut dyn FnMut(Materialised<T>),
    ) -> Result<Materialised<T>> {
        let caller_frame = local_frame();
        loop {
            let message = session.recv_message().await?;
            match message.kind {
                Kind::Retval => return Ok(self.materialise(message.value)),
                Kind::Yield => on_yield(self.materialise(message.value)),
                Kind::Exception => {
                    let exc =
                        RemoteException::from_value(&message.value).ok_or(ClientError::MalformedException)?;
                    return Err(ClientError::from_remote_exception(exc, caller_frame));
                },
                Kind::Sync => {
                    // §9 protocol quirk, preserved: a SYNC may arrive
                    // mid-response for reasons unrelated to this call. Ack
                    // it and keep waiting for the real terminating frame.
                    if message.object_id == 0 {
                        session.send_message(Kind::Sync, 1, &Value::Null).await?;
                    }
                },
                other => return Err(ClientError::UnexpectedKind(other)),
            }
        }
    }

    /// `materialise(value, session, lock)` (§4.7): turns an
    /// [`ObjectReference`] into a new proxy sharing this call's session and
    /// lock; anything else passes through unchanged. Deterministic in
    /// `value`, so re-materialising the same decoded value twice produces
    /// an equivalent proxy (§8 law 6).
    fn materialise(&self, value: Value) -> Materialised<T> {
        match ObjectReference::from_value(&value) {
            Some(reference) => Materialised::Proxy(Self::new(Arc::clone(&self.session), reference.object_id)),
            None => Materialised::Value(value),
        }
    }
}

fn local_frame() -> String {
    format!("{}:{}", file!(), line!())
}

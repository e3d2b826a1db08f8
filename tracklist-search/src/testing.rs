//! Scripted transport for tests.
//!
//! Each provider gets a scripted reply: a payload, an error, or a delayed
//! version of either. The transport records every dispatched request and
//! tracks how many calls are currently in flight, so tests can assert that
//! nothing was dispatched or that cancelled calls were released.

use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use parking_lot::Mutex;
use serde_json::{Value, json};

use crate::errors::ProviderError;
use crate::registry::ProviderRequest;
use crate::transport::ProviderTransport;
use crate::types::Provider;

/// Reply a [`ScriptedTransport`] gives for one provider.
#[derive(Debug, Clone)]
pub enum ScriptedReply {
    /// Succeed with this payload
    Payload(Value),
    /// Fail with this error
    Failure(ProviderError),
    /// Sleep, then give the inner reply
    Delayed(Duration, Box<ScriptedReply>),
}

impl ScriptedReply {
    /// Reply delayed by `delay`.
    pub fn after(self, delay: Duration) -> Self {
        ScriptedReply::Delayed(delay, Box::new(self))
    }
}

/// Transport returning scripted replies per provider.
///
/// Providers without a script answer with
/// `{"provider": <name>, "path": <request path>}`.
#[derive(Debug, Default, Clone)]
pub struct ScriptedTransport {
    replies: Arc<Mutex<HashMap<Provider, ScriptedReply>>>,
    requests: Arc<Mutex<Vec<ProviderRequest>>>,
    in_flight: Arc<AtomicUsize>,
}

impl ScriptedTransport {
    /// Creates a transport where every provider succeeds.
    pub fn new() -> Self {
        Self::default()
    }

    /// Scripts a successful payload.
    pub fn respond(self, provider: Provider, payload: Value) -> Self {
        self.script(provider, ScriptedReply::Payload(payload))
    }

    /// Scripts a failure.
    pub fn fail(self, provider: Provider, error: ProviderError) -> Self {
        self.script(provider, ScriptedReply::Failure(error))
    }

    /// Scripts an arbitrary reply.
    pub fn script(self, provider: Provider, reply: ScriptedReply) -> Self {
        self.replies.lock().insert(provider, reply);
        self
    }

    /// Requests dispatched so far, in dispatch order.
    pub fn requests(&self) -> Vec<ProviderRequest> {
        self.requests.lock().clone()
    }

    /// Number of dispatched requests.
    pub fn dispatch_count(&self) -> usize {
        self.requests.lock().len()
    }

    /// Calls started but neither finished nor dropped.
    pub fn in_flight(&self) -> usize {
        self.in_flight.load(Ordering::SeqCst)
    }
}

/// Decrements the in-flight counter when a call completes or is dropped.
struct InFlightGuard(Arc<AtomicUsize>);

impl InFlightGuard {
    fn enter(counter: &Arc<AtomicUsize>) -> Self {
        counter.fetch_add(1, Ordering::SeqCst);
        Self(Arc::clone(counter))
    }
}

impl Drop for InFlightGuard {
    fn drop(&mut self) {
        self.0.fetch_sub(1, Ordering::SeqCst);
    }
}

#[async_trait]
impl ProviderTransport for ScriptedTransport {
    async fn fetch(&self, request: &ProviderRequest) -> Result<Value, ProviderError> {
        let _guard = InFlightGuard::enter(&self.in_flight);
        self.requests.lock().push(request.clone());

        let scripted = self.replies.lock().get(&request.provider).cloned();
        let mut reply = scripted.unwrap_or_else(|| {
            ScriptedReply::Payload(json!({
                "provider": request.provider.as_str(),
                "path": request.path,
            }))
        });

        loop {
            match reply {
                ScriptedReply::Payload(payload) => return Ok(payload),
                ScriptedReply::Failure(error) => return Err(error),
                ScriptedReply::Delayed(delay, inner) => {
                    tokio::time::sleep(delay).await;
                    reply = *inner;
                }
            }
        }
    }
}

//! Insert-channel-at transports.
//!
//! Opening a slot at number N is tried over three transports in order:
//! the server's progress event stream, the bulk endpoint, and finally a
//! client-driven loop that shifts each channel itself. The first one that
//! succeeds wins; every one reports progress lines through the same sink.
//! A transport that fails after the server started shifting ends the chain,
//! since the next one would shift the same channels again.

use futures::channel::mpsc;
use futures::future::LocalBoxFuture;
use futures::{FutureExt, StreamExt};
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_common::{plan_insert_shift, ApiError, ChannelRow, InsertAtRequest, NumberUpdate};
use web_sys::{Event, EventSource, MessageEvent};

use crate::api::ApiClient;

/// Receives human-readable progress lines.
pub type Progress<'a> = &'a dyn Fn(String);

/// Why a transport gave up.
#[derive(Debug, Clone, PartialEq)]
pub enum InsertFailure {
    /// Nothing was changed; the next transport may try.
    Unavailable(ApiError),
    /// Failed part way through; channels may already have moved.
    Interrupted(ApiError),
}

impl InsertFailure {
    pub fn error(&self) -> &ApiError {
        match self {
            InsertFailure::Unavailable(e) | InsertFailure::Interrupted(e) => e,
        }
    }
}

impl From<ApiError> for InsertFailure {
    fn from(e: ApiError) -> Self {
        InsertFailure::Unavailable(e)
    }
}

pub trait InsertTransport {
    fn name(&self) -> &'static str;

    fn insert_at<'a>(&'a self, at: u32, progress: Progress<'a>) -> LocalBoxFuture<'a, Result<(), InsertFailure>>;
}

/// Transports in the order they are tried.
pub fn default_chain(api: ApiClient) -> Vec<Box<dyn InsertTransport>> {
    vec![
        Box::new(EventStreamTransport { api }),
        Box::new(BulkEndpointTransport { api }),
        Box::new(ClientShiftTransport { api }),
    ]
}

/// Try each transport until one succeeds. Returns the name of the
/// transport that did the work, or the last error. An interrupted
/// transport stops the chain.
pub async fn run_chain(
    chain: &[Box<dyn InsertTransport>],
    at: u32,
    progress: Progress<'_>,
) -> Result<&'static str, ApiError> {
    let mut last_error = ApiError::Unavailable("no insert transport configured".to_string());
    for transport in chain {
        log::debug!("Insert at {} via {}", at, transport.name());
        match transport.insert_at(at, progress).await {
            Ok(()) => return Ok(transport.name()),
            Err(InsertFailure::Interrupted(e)) => {
                log::error!("Insert via {} interrupted: {}", transport.name(), e);
                progress(format!("{} stopped part way ({}), not retrying", transport.name(), e.message()));
                return Err(e);
            }
            Err(InsertFailure::Unavailable(e)) => {
                log::warn!("Insert via {} failed: {}", transport.name(), e);
                progress(format!("{} unavailable ({}), falling back...", transport.name(), e.message()));
                last_error = e;
            }
        }
    }
    Err(last_error)
}

enum StreamEvent {
    Message(String),
    Done(String),
    Failed(String),
}

/// `GET /insert_channel_at_stream` server-sent events.
pub struct EventStreamTransport {
    api: ApiClient,
}

impl InsertTransport for EventStreamTransport {
    fn name(&self) -> &'static str {
        "event stream"
    }

    fn insert_at<'a>(&'a self, at: u32, progress: Progress<'a>) -> LocalBoxFuture<'a, Result<(), InsertFailure>> {
        async move {
            let url = format!("{}?insert_at={}", self.api.url("/insert_channel_at_stream"), at);
            let source = EventSource::new(&url)
                .map_err(|e| ApiError::Unavailable(format!("{:?}", e)))?;
            let (tx, mut rx) = mpsc::unbounded::<StreamEvent>();

            // Unnamed events carry progress text
            let tx_message = tx.clone();
            let onmessage = Closure::wrap(Box::new(move |e: MessageEvent| {
                let text = e.data().as_string().unwrap_or_default();
                let _ = tx_message.unbounded_send(StreamEvent::Message(text));
            }) as Box<dyn FnMut(MessageEvent)>);
            source.set_onmessage(Some(onmessage.as_ref().unchecked_ref()));

            let tx_done = tx.clone();
            let ondone = Closure::wrap(Box::new(move |e: MessageEvent| {
                let text = e.data().as_string().unwrap_or_default();
                let _ = tx_done.unbounded_send(StreamEvent::Done(text));
            }) as Box<dyn FnMut(MessageEvent)>);
            source
                .add_event_listener_with_callback("done", ondone.as_ref().unchecked_ref())
                .map_err(|e| ApiError::Unavailable(format!("{:?}", e)))?;

            // A named `error` event from the server arrives as a MessageEvent
            // with data; a transport failure is a bare Event.
            let tx_error = tx;
            let onerror = Closure::wrap(Box::new(move |e: Event| {
                let text = e
                    .dyn_ref::<MessageEvent>()
                    .and_then(|m| m.data().as_string())
                    .filter(|t| !t.is_empty())
                    .unwrap_or_else(|| "connection error".to_string());
                let _ = tx_error.unbounded_send(StreamEvent::Failed(text));
            }) as Box<dyn FnMut(Event)>);
            source.set_onerror(Some(onerror.as_ref().unchecked_ref()));

            // Once progress has arrived the server is shifting channels
            let mut started = false;
            let outcome = loop {
                let failure = match rx.next().await {
                    Some(StreamEvent::Message(line)) => {
                        started = true;
                        progress(line);
                        continue;
                    }
                    Some(StreamEvent::Done(line)) => {
                        if !line.is_empty() {
                            progress(line);
                        }
                        break Ok(());
                    }
                    Some(StreamEvent::Failed(reason)) => ApiError::Unavailable(reason),
                    None => ApiError::Unavailable("event stream ended".to_string()),
                };
                break Err(stream_failure(started, failure));
            };

            source.close();
            source.set_onmessage(None);
            source.set_onerror(None);
            let _ = source.remove_event_listener_with_callback("done", ondone.as_ref().unchecked_ref());
            drop((onmessage, ondone, onerror));
            outcome
        }
        .boxed_local()
    }
}

fn stream_failure(started: bool, error: ApiError) -> InsertFailure {
    if started {
        InsertFailure::Interrupted(error)
    } else {
        InsertFailure::Unavailable(error)
    }
}

/// Single `POST /insert_channel_at` request.
pub struct BulkEndpointTransport {
    api: ApiClient,
}

impl InsertTransport for BulkEndpointTransport {
    fn name(&self) -> &'static str {
        "bulk endpoint"
    }

    fn insert_at<'a>(&'a self, at: u32, progress: Progress<'a>) -> LocalBoxFuture<'a, Result<(), InsertFailure>> {
        async move {
            progress(format!("Shifting channels from {} on the server...", at));
            let response = self.api.submit(&InsertAtRequest { insert_at: at }).await?;
            progress(response.text());
            Ok::<(), InsertFailure>(())
        }
        .boxed_local()
    }
}

/// Shift every channel numbered `>= at` up by one, highest first.
pub struct ClientShiftTransport {
    api: ApiClient,
}

impl InsertTransport for ClientShiftTransport {
    fn name(&self) -> &'static str {
        "client shift"
    }

    fn insert_at<'a>(&'a self, at: u32, progress: Progress<'a>) -> LocalBoxFuture<'a, Result<(), InsertFailure>> {
        async move {
            let channels: Vec<ChannelRow> = self.api.get_json("/api/channels", &[]).await?;
            let steps = plan_insert_shift(&channels, at);
            if steps.is_empty() {
                progress(format!("No channels at or above {}", at));
            }
            for step in steps {
                progress(step.to_string());
                let update = NumberUpdate {
                    channel_id: step.channel_id,
                    current_number: step.from.to_string(),
                    new_number: step.to.to_string(),
                };
                self.api.submit(&update).await?;
            }
            Ok::<(), InsertFailure>(())
        }
        .boxed_local()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures::executor::block_on;
    use std::cell::RefCell;

    struct Scripted {
        name: &'static str,
        result: Result<(), InsertFailure>,
    }

    impl InsertTransport for Scripted {
        fn name(&self) -> &'static str {
            self.name
        }

        fn insert_at<'a>(&'a self, at: u32, progress: Progress<'a>) -> LocalBoxFuture<'a, Result<(), InsertFailure>> {
            async move {
                progress(format!("{} at {}", self.name, at));
                self.result.clone()
            }
            .boxed_local()
        }
    }

    fn scripted(name: &'static str, ok: bool) -> Box<dyn InsertTransport> {
        let result = if ok { Ok(()) } else { Err(ApiError::Unavailable(format!("{} down", name)).into()) };
        Box::new(Scripted { name, result })
    }

    #[test]
    fn falls_through_to_first_working_transport() {
        let lines = RefCell::new(Vec::new());
        let sink = |line: String| lines.borrow_mut().push(line);
        let chain = vec![scripted("stream", false), scripted("bulk", true), scripted("loop", true)];

        let used = block_on(run_chain(&chain, 100, &sink));
        assert_eq!(used, Ok("bulk"));

        let lines = lines.into_inner();
        assert_eq!(lines[0], "stream at 100");
        assert!(lines[1].contains("stream down"));
        assert_eq!(lines[2], "bulk at 100");
        assert!(!lines.iter().any(|l| l.starts_with("loop")));
    }

    #[test]
    fn interrupted_stream_is_not_retried() {
        let lines = RefCell::new(Vec::new());
        let sink = |line: String| lines.borrow_mut().push(line);
        let cut = ApiError::Unavailable("connection error".to_string());
        let stream: Box<dyn InsertTransport> =
            Box::new(Scripted { name: "stream", result: Err(stream_failure(true, cut.clone())) });
        let chain = vec![stream, scripted("bulk", true)];

        let used = block_on(run_chain(&chain, 100, &sink));
        assert_eq!(used, Err(cut));
        assert!(!lines.into_inner().iter().any(|l| l.starts_with("bulk")));
    }

    #[test]
    fn stream_failure_before_progress_allows_fallback() {
        let e = ApiError::Unavailable("refused".to_string());
        assert_eq!(stream_failure(false, e.clone()), InsertFailure::Unavailable(e.clone()));
        assert_eq!(stream_failure(true, e.clone()), InsertFailure::Interrupted(e));
    }

    #[test]
    fn reports_last_error_when_everything_fails() {
        let sink = |_: String| {};
        let chain = vec![scripted("stream", false), scripted("loop", false)];
        let used = block_on(run_chain(&chain, 5, &sink));
        assert_eq!(used, Err(ApiError::Unavailable("loop down".to_string())));
    }
}

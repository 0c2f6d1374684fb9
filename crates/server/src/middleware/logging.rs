//! Request logging middleware.
//!
//! Every admitted request produces exactly one log line carrying the
//! method, path, response status, and handler duration. For error
//! responses (status >= 400) the line also carries the response body so
//! failures are diagnosable from logs alone.
//!
//! The body is captured with a tee: [`CaptureBody`] forwards the real
//! response frames to the client untouched while buffering a bounded copy,
//! and emits the log line once the stream completes. Capture can therefore
//! never alter, truncate, or suppress what the client receives.

use axum::{
    body::{Body, Bytes},
    extract::{ConnectInfo, Request},
    middleware::Next,
    response::Response,
};
use http_body::{Body as _, Frame};
use std::{
    net::SocketAddr,
    pin::Pin,
    task::{Context, Poll},
};
use tokio::time::Instant;

/// Upper bound on captured error-body bytes per response.
const CAPTURE_CAP: usize = 8 * 1024;

/// Logs one line per request. Error responses are re-wrapped in a
/// [`CaptureBody`] so the line can include the body without buffering the
/// response before the client sees it.
pub async fn request_logger(
    ConnectInfo(addr): ConnectInfo<SocketAddr>,
    request: Request<Body>,
    next: Next,
) -> Response {
    let method = request.method().to_string();
    let path = request.uri().path().to_string();
    let client = addr.ip().to_string();
    let started = Instant::now();

    let response = next.run(request).await;

    let status = response.status();
    let duration_ms = started.elapsed().as_millis() as u64;

    if status.is_client_error() || status.is_server_error() {
        let (parts, body) = response.into_parts();
        let capture = CaptureBody {
            inner: body,
            captured: Vec::new(),
            logged: false,
            method,
            path,
            client,
            status: status.as_u16(),
            duration_ms,
        };
        return Response::from_parts(parts, Body::new(capture));
    }

    tracing::info!(
        %method,
        %path,
        %client,
        status = status.as_u16(),
        duration_ms,
        "request completed"
    );
    response
}

/// Body decorator that forwards frames verbatim while buffering up to
/// [`CAPTURE_CAP`] bytes, then emits the request log line when the stream
/// ends. `Drop` is the fallback for responses abandoned mid-stream.
struct CaptureBody {
    inner: Body,
    captured: Vec<u8>,
    logged: bool,
    method: String,
    path: String,
    client: String,
    status: u16,
    duration_ms: u64,
}

impl CaptureBody {
    fn emit(&mut self) {
        if self.logged {
            return;
        }
        self.logged = true;
        let body = String::from_utf8_lossy(&self.captured);
        tracing::warn!(
            method = %self.method,
            path = %self.path,
            client = %self.client,
            status = self.status,
            duration_ms = self.duration_ms,
            body = %body,
            "request failed"
        );
    }
}

impl http_body::Body for CaptureBody {
    type Data = Bytes;
    type Error = axum::Error;

    fn poll_frame(
        self: Pin<&mut Self>,
        cx: &mut Context<'_>,
    ) -> Poll<Option<Result<Frame<Self::Data>, Self::Error>>> {
        let this = self.get_mut();
        match Pin::new(&mut this.inner).poll_frame(cx) {
            Poll::Ready(Some(Ok(frame))) => {
                if let Some(data) = frame.data_ref() {
                    let room = CAPTURE_CAP.saturating_sub(this.captured.len());
                    let take = room.min(data.len());
                    this.captured.extend_from_slice(&data[..take]);
                }
                Poll::Ready(Some(Ok(frame)))
            }
            Poll::Ready(Some(Err(e))) => {
                this.emit();
                Poll::Ready(Some(Err(e)))
            }
            Poll::Ready(None) => {
                this.emit();
                Poll::Ready(None)
            }
            Poll::Pending => Poll::Pending,
        }
    }

    fn is_end_stream(&self) -> bool {
        self.inner.is_end_stream()
    }

    fn size_hint(&self) -> http_body::SizeHint {
        self.inner.size_hint()
    }
}

impl Drop for CaptureBody {
    fn drop(&mut self) {
        self.emit();
    }
}

//! Response dispatch: the counting wrapper between the pipeline and the output sink.
//!
//! The transport that actually puts bytes on the wire is represented by [`ResponseSink`].
//! [`ResponseWriter`] wraps a sink, forwards every call to it unbuffered and records the bytes
//! written and the last status set. A response is *committed* once both are present, which is
//! the signal the pipeline uses to stop advancing.

use crate::body::ResponseBody;
use crate::error::SendError;
use async_trait::async_trait;
use bytes::{Bytes, BytesMut};
use http::{HeaderMap, HeaderValue, Response, StatusCode};
use std::fmt;
use std::io;

/// The output side of a single request, provided by the transport.
#[async_trait]
pub trait ResponseSink: Send {
    /// Headers that will accompany the status line.
    fn headers_mut(&mut self) -> &mut HeaderMap;

    fn write_status(&mut self, status: StatusCode);

    /// Writes some bytes of the body, returning how many were accepted.
    async fn write(&mut self, buf: &[u8]) -> io::Result<usize>;
}

/// An in-memory sink, collecting everything into a [`Response`].
#[derive(Debug, Default)]
pub struct BufferedSink {
    status: Option<StatusCode>,
    headers: HeaderMap,
    body: BytesMut,
}

impl BufferedSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn status(&self) -> Option<StatusCode> {
        self.status
    }

    pub fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    pub fn body(&self) -> &[u8] {
        &self.body
    }

    /// Converts the collected output into a response, `200 OK` if no status was ever written.
    pub fn into_response(self) -> Response<Bytes> {
        let mut response = Response::new(self.body.freeze());
        *response.status_mut() = self.status.unwrap_or(StatusCode::OK);
        *response.headers_mut() = self.headers;
        response
    }
}

#[async_trait]
impl ResponseSink for BufferedSink {
    fn headers_mut(&mut self) -> &mut HeaderMap {
        &mut self.headers
    }

    fn write_status(&mut self, status: StatusCode) {
        self.status = Some(status);
    }

    async fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.body.extend_from_slice(buf);
        Ok(buf.len())
    }
}

/// Tracks what has been written to a [`ResponseSink`].
pub struct ResponseWriter<'s> {
    sink: &'s mut dyn ResponseSink,
    size: usize,
    status: Option<StatusCode>,
}

impl<'s> ResponseWriter<'s> {
    pub fn new(sink: &'s mut dyn ResponseSink) -> Self {
        Self { sink, size: 0, status: None }
    }

    pub fn headers_mut(&mut self) -> &mut HeaderMap {
        self.sink.headers_mut()
    }

    pub fn write_status(&mut self, status: StatusCode) {
        self.status = Some(status);
        self.sink.write_status(status);
    }

    /// Writes once to the sink. Only bytes the sink reports as written are counted.
    pub async fn write(&mut self, buf: &[u8]) -> Result<usize, SendError> {
        let written = self.sink.write(buf).await?;
        self.size += written;
        Ok(written)
    }

    pub async fn write_all(&mut self, mut buf: &[u8]) -> Result<usize, SendError> {
        let total = buf.len();
        while !buf.is_empty() {
            let written = self.write(buf).await?;
            if written == 0 {
                return Err(SendError::WriteZero { remaining: buf.len() });
            }
            buf = &buf[written..];
        }
        Ok(total)
    }

    /// Commits `response` to the sink: headers, status, then the body.
    ///
    /// Returns the number of body bytes written by this call.
    pub async fn send(&mut self, response: Response<ResponseBody>) -> Result<usize, SendError> {
        let (parts, body) = response.into_parts();

        let headers = self.headers_mut();
        headers.extend(parts.headers);
        if !body.is_empty() {
            headers.entry(http::header::CONTENT_LENGTH).or_insert_with(|| HeaderValue::from(body.len()));
        }

        self.write_status(parts.status);
        self.write_all(body.as_bytes()).await
    }

    /// Total body bytes accepted by the sink so far.
    #[inline]
    pub fn size(&self) -> usize {
        self.size
    }

    #[inline]
    pub fn status(&self) -> Option<StatusCode> {
        self.status
    }

    /// True once body bytes were written and a status was set.
    #[inline]
    pub fn is_committed(&self) -> bool {
        self.size > 0 && self.status.is_some()
    }
}

impl fmt::Debug for ResponseWriter<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ResponseWriter")
            .field("size", &self.size)
            .field("status", &self.status)
            .finish_non_exhaustive()
    }
}

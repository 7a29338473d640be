//! Recording transport for unit tests.
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use reqwest::StatusCode;
use reqwest::header::HeaderMap;

use super::transport::{HttpRequest, HttpResponse, Transport, TransportError};

#[derive(Default)]
pub struct MockTransport {
    queued: Mutex<VecDeque<Result<HttpResponse, TransportError>>>,
    fallback: Mutex<Option<HttpResponse>>,
    requests: Mutex<Vec<HttpRequest>>,
}

fn response(status: u16, body: impl Into<Vec<u8>>) -> HttpResponse {
    HttpResponse {
        status: StatusCode::from_u16(status).expect("valid status"),
        headers: HeaderMap::new(),
        body: body.into(),
    }
}

impl MockTransport {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// Queue one response, served in FIFO order.
    pub fn respond(&self, status: u16, body: impl Into<Vec<u8>>) -> &Self {
        self.queued
            .lock()
            .unwrap()
            .push_back(Ok(response(status, body)));
        self
    }

    pub fn fail(&self, message: &str) -> &Self {
        self.queued
            .lock()
            .unwrap()
            .push_back(Err(TransportError::Other(message.to_string())));
        self
    }

    /// Served once the queue is drained.
    pub fn always(&self, status: u16, body: impl Into<Vec<u8>>) -> &Self {
        *self.fallback.lock().unwrap() = Some(response(status, body));
        self
    }

    pub fn requests(&self) -> Vec<HttpRequest> {
        self.requests.lock().unwrap().clone()
    }

    pub fn request(&self, index: usize) -> HttpRequest {
        self.requests()
            .get(index)
            .cloned()
            .unwrap_or_else(|| panic!("no request #{index} recorded"))
    }
}

#[async_trait]
impl Transport for MockTransport {
    async fn execute(&self, request: HttpRequest) -> Result<HttpResponse, TransportError> {
        self.requests.lock().unwrap().push(request);
        if let Some(next) = self.queued.lock().unwrap().pop_front() {
            return next;
        }
        self.fallback
            .lock()
            .unwrap()
            .clone()
            .ok_or_else(|| TransportError::Other("no mock response queued".into()))
    }
}

#![allow(dead_code)]
pub mod constants;

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use ecp_flow::transport::{HttpClient, TransportError};
use ecp_flow::types::{HttpRequest, HttpResponse};
use http::{HeaderMap, StatusCode};
use tokio::sync::Notify;

/// An in-memory server: one canned response per URL, every request recorded
#[derive(Default)]
pub struct ScriptedHttp {
    routes: Mutex<HashMap<String, HttpResponse>>,
    sent: Mutex<Vec<HttpRequest>>,
    held: Mutex<HashMap<String, Arc<Notify>>>,
}

impl ScriptedHttp {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn route(&self, url: &str, status: u16, body: &str) {
        let resp = HttpResponse {
            status: StatusCode::from_u16(status).unwrap(),
            headers: HeaderMap::new(),
            body: body.as_bytes().to_vec(),
        };
        self.routes.lock().unwrap().insert(url.to_string(), resp);
    }

    /// Requests to `url` are recorded, then wait until the returned handle is notified
    pub fn hold(&self, url: &str) -> Arc<Notify> {
        let gate = Arc::new(Notify::new());
        self.held
            .lock()
            .unwrap()
            .insert(url.to_string(), gate.clone());
        gate
    }

    pub fn sent(&self) -> Vec<HttpRequest> {
        self.sent.lock().unwrap().clone()
    }

    pub fn sent_to(&self, url: &str) -> Vec<HttpRequest> {
        self.sent()
            .into_iter()
            .filter(|r| r.url.as_str() == url)
            .collect()
    }

    /// Handshake with a matching assertion consumer, with or without relay state
    pub fn happy_path(relay_state: Option<&str>) -> Arc<Self> {
        let http = Self::new();
        http.route(
            constants::PROTECTED_URL,
            200,
            &constants::sp_paos_response(constants::RESPONSE_CONSUMER_URL, relay_state),
        );
        http.route(
            constants::IDP_ENDPOINT,
            200,
            &constants::idp_response(constants::RESPONSE_CONSUMER_URL),
        );
        http.route(constants::RESPONSE_CONSUMER_URL, 200, constants::PROTECTED_BODY);
        http
    }
}

#[async_trait]
impl HttpClient for ScriptedHttp {
    async fn send(&self, request: HttpRequest) -> Result<HttpResponse, TransportError> {
        let url = request.url.to_string();
        self.sent.lock().unwrap().push(request);

        let gate = self.held.lock().unwrap().get(&url).cloned();
        if let Some(gate) = gate {
            gate.notified().await;
        }

        self.routes
            .lock()
            .unwrap()
            .get(&url)
            .cloned()
            .ok_or_else(|| TransportError::Connect(format!("no route to {}", url)))
    }
}

pub fn body_str(req: &HttpRequest) -> String {
    String::from_utf8(req.body.clone().unwrap_or_default()).unwrap()
}

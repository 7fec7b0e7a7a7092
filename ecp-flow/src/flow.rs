use url::Url;

use crate::config::EcpConfig;
use crate::error::EcpError;
use crate::extract;
use crate::fault::FaultNotifier;
use crate::request;
use crate::transport::ArcHttpClient;
use crate::types::{Credentials, HttpResponse, IdpRequestData};

/// Where a login stands. Each state holds what the next step needs.
#[derive(Debug)]
pub enum State {
    Init { protected_url: Url },
    SentToSp { response: HttpResponse },
    SentToIdp { data: IdpRequestData, response: HttpResponse },
    SentFinalToSp { response: HttpResponse },
    Done(String),
    Failed(EcpError),
}

impl State {
    pub fn new(protected_url: &Url) -> Self {
        Self::Init {
            protected_url: protected_url.clone(),
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::Init { .. } => "init",
            Self::SentToSp { .. } => "sent-to-sp",
            Self::SentToIdp { .. } => "sent-to-idp",
            Self::SentFinalToSp { .. } => "sent-final-to-sp",
            Self::Done(_) => "done",
            Self::Failed(_) => "failed",
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Done(_) | Self::Failed(_))
    }
}

/// Runs ECP logins over a shared HTTP client.
///
/// The client owns the cookie jar, so the session obtained at the end of a
/// login is available to whoever else uses it.
pub struct EcpClient {
    http: ArcHttpClient,
    config: EcpConfig,
    faults: FaultNotifier,
}

impl EcpClient {
    pub fn new(http: ArcHttpClient, config: EcpConfig) -> Self {
        Self {
            faults: FaultNotifier::new(http.clone()),
            http,
            config,
        }
    }

    pub fn config(&self) -> &EcpConfig {
        &self.config
    }

    /// Authenticate against the IdP advertised by the SP protecting `protected_url`
    /// and return the body of the SP's final answer.
    pub async fn login(
        &self,
        protected_url: &Url,
        credentials: &Credentials,
    ) -> Result<String, EcpError> {
        let mut state = State::new(protected_url);
        loop {
            state = match state {
                State::Done(body) => {
                    tracing::info!(user=%credentials.username, "ECP login succeeded");
                    return Ok(body);
                }
                State::Failed(err) => {
                    tracing::info!(user=%credentials.username, code=err.code(), err=%err, "ECP login failed");
                    return Err(err);
                }
                current => self.progress(current, credentials).await,
            };
            tracing::trace!(state = state.name(), "handshake progressed");
        }
    }

    /// Wait until every SOAP fault sent so far has been delivered or given up on
    pub async fn flush_notifications(&self) {
        self.faults.flush().await
    }

    async fn progress(&self, state: State, credentials: &Credentials) -> State {
        let next = match state {
            State::Init { protected_url } => self.send_initial(&protected_url).await,
            State::SentToSp { response } => self.send_idp(response, credentials).await,
            State::SentToIdp { data, response } => self.send_final(data, response).await,
            State::SentFinalToSp { response } => {
                tracing::debug!(status=%response.status, "Received the final SP response.");
                Ok(State::Done(
                    String::from_utf8_lossy(&response.body).into_owned(),
                ))
            }
            terminal => Ok(terminal),
        };

        next.unwrap_or_else(State::Failed)
    }

    async fn send_initial(&self, protected_url: &Url) -> Result<State, EcpError> {
        let req = request::initial_sp_request(protected_url);
        tracing::info!(url=%protected_url, "(1/3) Requesting the protected resource from the SP");
        let response = self.http.send(req).await?;
        tracing::debug!(status=%response.status, "Received the SP PAOS response.");
        Ok(State::SentToSp { response })
    }

    async fn send_idp(
        &self,
        response: HttpResponse,
        credentials: &Credentials,
    ) -> Result<State, EcpError> {
        let doc = extract::parse_envelope(&response.body)?;
        let data = extract::idp_request_data(doc, credentials, &self.config)?;

        tracing::info!(url=%data.request.url, user=%credentials.username, "(2/3) Authenticating against the IdP");
        let response = self.http.send(data.request.clone()).await?;
        tracing::debug!(status=%response.status, "Received the IdP response.");
        Ok(State::SentToIdp { data, response })
    }

    async fn send_final(
        &self,
        data: IdpRequestData,
        response: HttpResponse,
    ) -> Result<State, EcpError> {
        let checked = extract::idp_response(response)?;
        let req = match extract::final_sp_request(&checked.value, &data, &self.config) {
            Ok(req) => req,
            Err(err @ EcpError::SecurityViolation) => {
                self.faults.notify(&data.response_consumer_url, &err);
                return Err(err);
            }
            Err(err) => return Err(err),
        };

        tracing::info!(url=%req.url, "(3/3) Relaying the IdP assertion to the SP");
        let response = self.http.send(req).await?;
        Ok(State::SentFinalToSp { response })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn state_names() {
        let url = Url::parse("https://sp.example.org/secure").unwrap();
        let init = State::new(&url);
        assert_eq!(init.name(), "init");
        assert!(!init.is_terminal());
        assert!(State::Done(String::new()).is_terminal());
        assert!(State::Failed(EcpError::Unknown).is_terminal());
    }

    #[test]
    fn client_is_shareable() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<EcpClient>();
    }
}

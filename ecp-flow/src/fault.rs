use ecp_soap::envelope::Envelope;
use ecp_soap::xml::{Element, SOAP11_URN};
use tokio::runtime::Handle;
use tokio_util::task::TaskTracker;
use url::Url;

use crate::error::EcpError;
use crate::request;
use crate::transport::ArcHttpClient;

const FAULT_PREFIX: &str = "SOAP-ENV";

/// `<SOAP-ENV:Envelope><SOAP-ENV:Body><SOAP-ENV:Fault>` carrying the error code
/// as `faultcode` and its description as `faultstring`
pub fn soap_fault_body(err: &EcpError) -> Result<Vec<u8>, EcpError> {
    let mut body = Element::new(format!("{}:Body", FAULT_PREFIX));
    let fault = body.add_child(&format!("{}:Fault", FAULT_PREFIX), &[], None);
    fault.add_child("faultcode", &[], Some(&err.code().to_string()));
    fault.add_child("faultstring", &[], Some(&err.description()));

    Envelope::soap11(Some(FAULT_PREFIX))
        .body(body)
        .to_bytes()
        .map_err(|e| {
            tracing::debug!(err=%e, "unable to serialize the SOAP fault");
            EcpError::SoapGeneration
        })
}

/// Tells the SP that the handshake was aborted.
///
/// Delivery is best effort and never delays the caller: each fault is sent
/// from its own task, whose outcome is only logged.
pub struct FaultNotifier {
    http: ArcHttpClient,
    tasks: TaskTracker,
}

impl FaultNotifier {
    pub fn new(http: ArcHttpClient) -> Self {
        Self {
            http,
            tasks: TaskTracker::new(),
        }
    }

    /// Outside of a tokio runtime the fault is dropped with a warning
    pub fn notify(&self, url: &Url, err: &EcpError) {
        let handle = match Handle::try_current() {
            Ok(h) => h,
            Err(_) => {
                tracing::warn!(url=%url, code=err.code(), "no tokio runtime, SOAP fault not sent");
                return;
            }
        };

        let body = match soap_fault_body(err) {
            Ok(b) => b,
            Err(e) => {
                tracing::warn!(err=%e, "SOAP fault not sent");
                return;
            }
        };

        let req = request::soap_fault_request(url.clone(), body);
        let http = self.http.clone();
        let code = err.code();
        let delivery = async move {
            let target = req.url.clone();
            match http.send(req).await {
                Ok(resp) => {
                    tracing::debug!(url=%target, code, status=%resp.status, "SOAP fault delivered")
                }
                Err(e) => tracing::warn!(url=%target, code, err=%e, "unable to deliver SOAP fault"),
            }
        };
        self.tasks.spawn_on(delivery, &handle);
    }

    /// Faults still in flight
    pub fn pending(&self) -> usize {
        self.tasks.len()
    }

    /// Wait for every fault sent so far, the notifier stays usable
    pub async fn flush(&self) {
        self.tasks.close();
        self.tasks.wait().await;
        self.tasks.reopen();
    }
}

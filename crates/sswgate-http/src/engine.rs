//! The quotation engine
//!
//! One stateless pipeline per inbound call:
//! normalize -> validate -> build envelope -> transport -> extract ->
//! classify. Validation failures are terminal before the wire; exactly one
//! transport call is made per validated request and the engine never
//! retries.

use crate::outcome::EngineOutcome;
use crate::transport::SoapTransport;
use serde_json::Value;
use sswgate_core::{
    normalize_collect, normalize_quote, validate_collect, validate_quote, NormalizeOptions,
};
use sswgate_wire::{
    classify, collect_envelope, extract_reply, mask_envelope, quote_envelope, CallResult,
    COLLECT_ACTION, QUOTE_ACTION,
};

/// Stateless request/response engine over an injected SOAP transport.
///
/// # Example
///
/// ```ignore
/// use sswgate_http::{QuoteEngine, SswClient};
///
/// let engine = QuoteEngine::new(SswClient::default());
/// let outcome = engine.quote(&payload).await;
/// ```
pub struct QuoteEngine<T> {
    transport: T,
    options: NormalizeOptions,
}

impl<T: SoapTransport> QuoteEngine<T> {
    pub fn new(transport: T) -> Self {
        Self::with_options(transport, NormalizeOptions::default())
    }

    pub fn with_options(transport: T, options: NormalizeOptions) -> Self {
        Self { transport, options }
    }

    pub fn options(&self) -> &NormalizeOptions {
        &self.options
    }

    /// Run a freight quotation.
    pub async fn quote(&self, payload: &Value) -> EngineOutcome {
        let request = normalize_quote(payload, &self.options);
        let violations = validate_quote(&request);
        if !violations.is_empty() {
            tracing::debug!(count = violations.len(), "quotation rejected by validation");
            return EngineOutcome::Rejected { violations };
        }

        self.dispatch("cotarSite", QUOTE_ACTION, quote_envelope(&request))
            .await
    }

    /// Schedule collection of a previously quoted shipment.
    pub async fn collect(&self, payload: &Value) -> EngineOutcome {
        let request = normalize_collect(payload);
        let violations = validate_collect(&request);
        if !violations.is_empty() {
            tracing::debug!(count = violations.len(), "collection rejected by validation");
            return EngineOutcome::Rejected { violations };
        }

        self.dispatch("coletar", COLLECT_ACTION, collect_envelope(&request))
            .await
    }

    async fn dispatch(
        &self,
        operation: &'static str,
        action: &str,
        body: String,
    ) -> EngineOutcome {
        tracing::debug!(operation, "calling remote service");

        let raw = match self.transport.call(action, &body).await {
            Ok(raw) => raw,
            Err(err) => {
                tracing::warn!(operation, error = %err, "transport failure");
                return EngineOutcome::TransportFailed {
                    reason: err.to_string(),
                    sent: mask_envelope(&body),
                };
            }
        };

        match extract_reply(&raw) {
            Ok(reply) => match classify(reply) {
                CallResult::Success(quotation) => {
                    tracing::info!(operation, quotation = %quotation.quotation_number, "remote success");
                    EngineOutcome::Success(quotation)
                }
                CallResult::Business(failure) => {
                    tracing::info!(operation, code = failure.code, "remote business failure");
                    EngineOutcome::BusinessFailed(failure)
                }
            },
            Err(err) => {
                tracing::warn!(operation, "reply carried no result payload");
                EngineOutcome::ProtocolFailed {
                    reason: err.to_string(),
                    sent: mask_envelope(&body),
                }
            }
        }
    }
}

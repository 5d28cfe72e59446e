//! Streamed completions

use tracing::info;

use super::core::AiClient;
use crate::ai::sse::StreamDecoder;
use crate::ai::streaming::DecodeSummary;
use crate::chat::ChatRole;
use crate::error::Result;
use crate::render::RenderedSpan;

impl AiClient {
    /// Request a streamed reply to `history`.
    ///
    /// `on_update` receives the complete re-rendered reply after every
    /// content fragment. Transport failures, including an idle stream,
    /// end the call with an error; whatever was delivered to `on_update`
    /// before that stays valid.
    pub async fn stream_completion<F>(
        &self,
        history: &[(ChatRole, String)],
        on_update: F,
    ) -> Result<DecodeSummary>
    where
        F: FnMut(Vec<RenderedSpan>),
    {
        let body = self.request_body(history, true);
        let response = self.send(&body).await?;
        info!("Completion stream opened: {}", response.status());

        let mut decoder = StreamDecoder::new(self.renderer());
        let idle = self.config().stream_idle_timeout();
        if !idle.is_zero() {
            decoder = decoder.with_idle_timeout(idle);
        }
        decoder.decode(response.bytes_stream(), on_update).await
    }
}

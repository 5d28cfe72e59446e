//! Background reply requests
//!
//! The request runs on its own task and reports back over a channel; the
//! UI thread drains the channel once per frame so rendering never waits
//! on the network.

use tokio::sync::mpsc;
use tokio::task::JoinHandle;

use mathchat_core::{AiClient, ChatError, ChatRole, DecoderState, RenderedSpan};

/// Progress of the reply in flight
#[derive(Debug)]
pub enum StreamUpdate {
    /// Full re-render of the reply so far
    Rendered(Vec<RenderedSpan>),
    /// The server finished the reply
    Finished { chars: usize, state: DecoderState },
    /// The request failed; earlier renders stay valid
    Failed(ChatError),
}

#[derive(Default)]
pub struct StreamingManager {
    rx: Option<mpsc::UnboundedReceiver<StreamUpdate>>,
    task: Option<JoinHandle<()>>,
}

impl StreamingManager {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_streaming(&self) -> bool {
        self.rx.is_some()
    }

    /// Start requesting a reply to `history`
    pub fn start(&mut self, client: AiClient, history: Vec<(ChatRole, String)>) {
        let (tx, rx) = mpsc::unbounded_channel();
        self.rx = Some(rx);

        self.task = Some(tokio::spawn(async move {
            let result = if client.config().stream {
                let updates = tx.clone();
                client
                    .stream_completion(&history, move |spans| {
                        let _ = updates.send(StreamUpdate::Rendered(spans));
                    })
                    .await
                    .map(|summary| (summary.text.chars().count(), summary.state))
            } else {
                client.complete(&history).await.map(|completion| {
                    let chars = completion.text.chars().count();
                    let _ = tx.send(StreamUpdate::Rendered(completion.spans));
                    (chars, DecoderState::Done)
                })
            };

            let update = match result {
                Ok((chars, state)) => StreamUpdate::Finished { chars, state },
                Err(e) => StreamUpdate::Failed(e),
            };
            let _ = tx.send(update);
        }));
    }

    /// Take every update that has arrived since the last call.
    ///
    /// A channel that closes without a final update is reported as a
    /// failure so the turn always ends.
    pub fn drain(&mut self) -> Vec<StreamUpdate> {
        let Some(rx) = self.rx.as_mut() else {
            return Vec::new();
        };

        let mut updates = Vec::new();
        let mut finished = false;
        loop {
            match rx.try_recv() {
                Ok(update) => {
                    finished |= !matches!(update, StreamUpdate::Rendered(_));
                    updates.push(update);
                }
                Err(mpsc::error::TryRecvError::Empty) => break,
                Err(mpsc::error::TryRecvError::Disconnected) => {
                    if !finished {
                        updates.push(StreamUpdate::Failed(ChatError::InvalidResponse(
                            "reply task ended unexpectedly".to_string(),
                        )));
                    }
                    finished = true;
                    break;
                }
            }
        }

        if finished {
            self.rx = None;
            self.task = None;
        }
        updates
    }

    /// Abort the request in flight, if any
    pub fn cancel(&mut self) {
        if let Some(task) = self.task.take() {
            task.abort();
        }
        self.rx = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mathchat_core::Config;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    async fn drain_until_done(manager: &mut StreamingManager) -> Vec<StreamUpdate> {
        let mut all = Vec::new();
        for _ in 0..200 {
            all.extend(manager.drain());
            if !manager.is_streaming() {
                break;
            }
            tokio::time::sleep(std::time::Duration::from_millis(10)).await;
        }
        all
    }

    fn client_for(server: &MockServer, stream: bool) -> AiClient {
        let config = Config {
            api_url: format!("{}/v1/chat/completions", server.uri()),
            stream,
            ..Config::default()
        };
        AiClient::new(config).unwrap()
    }

    #[tokio::test]
    async fn test_streamed_reply_updates_then_finishes() {
        let server = MockServer::start().await;
        let body = concat!(
            "data: {\"choices\":[{\"delta\":{\"content\":\"x is $x^2$\"}}]}\n\n",
            "data: [DONE]\n\n",
        );
        Mock::given(method("POST"))
            .and(path("/v1/chat/completions"))
            .respond_with(ResponseTemplate::new(200).set_body_raw(body, "text/event-stream"))
            .mount(&server)
            .await;

        let mut manager = StreamingManager::new();
        manager.start(
            client_for(&server, true),
            vec![(ChatRole::User, "square".to_string())],
        );
        assert!(manager.is_streaming());

        let updates = drain_until_done(&mut manager).await;
        assert!(!manager.is_streaming());
        assert!(matches!(updates.first(), Some(StreamUpdate::Rendered(_))));
        match updates.last() {
            Some(StreamUpdate::Finished { chars, state }) => {
                assert_eq!(*chars, 10);
                assert_eq!(*state, DecoderState::Done);
            }
            other => panic!("expected finish, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_error_status_reported_as_failure() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(500).set_body_string("boom"))
            .mount(&server)
            .await;

        let mut manager = StreamingManager::new();
        manager.start(client_for(&server, false), Vec::new());
        let updates = drain_until_done(&mut manager).await;
        assert!(matches!(
            updates.last(),
            Some(StreamUpdate::Failed(ChatError::Status { status: 500, .. }))
        ));
    }

    #[test]
    fn test_idle_manager_drains_nothing() {
        let mut manager = StreamingManager::new();
        assert!(manager.drain().is_empty());
        manager.cancel();
        assert!(!manager.is_streaming());
    }
}

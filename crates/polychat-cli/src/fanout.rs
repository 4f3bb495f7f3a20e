//! Fan-out dispatch — one prompt, N models, merged streaming output.
//!
//! Each enabled model gets its own tokio task streaming deltas into a
//! shared channel tagged with the column key. Failures are isolated per
//! model: an error terminates that column with a `Failed` event and the
//! remaining tasks keep streaming. The turn is over when every task has
//! sent `Done` or `Failed` (observed as channel closure once all senders
//! are dropped).

use std::collections::BTreeMap;
use std::sync::Arc;

use futures_util::StreamExt;
use tokio::sync::mpsc;
use tracing::debug;

use polychat_core::types::Message;
use polychat_providers::{LlmProvider, RequestParams};

/// Everything needed to query one model in a turn.
pub struct ModelRun {
    /// Column key (unique per provider/model pair).
    pub key: String,
    pub provider: Arc<dyn LlmProvider>,
    pub params: RequestParams,
    /// Conversation context including the new prompt.
    pub messages: Vec<Message>,
}

/// An event from one model's column.
#[derive(Clone, Debug, PartialEq)]
pub enum ColumnEvent {
    /// Incremental text from the model.
    Delta { key: String, text: String },
    /// The model finished its response.
    Done { key: String },
    /// The model failed; the column is closed with this message.
    Failed { key: String, message: String },
}

/// The final state of one column after a turn.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ColumnResult {
    /// Text accumulated before completion or failure.
    pub text: String,
    /// Error message if the column failed.
    pub error: Option<String>,
}

impl ColumnResult {
    /// The text to record and display: the response, with the error
    /// appended if the stream died partway through.
    pub fn final_text(&self) -> String {
        match (&self.error, self.text.is_empty()) {
            (Some(err), true) => err.clone(),
            (Some(err), false) => format!("{}\n{}", self.text, err),
            (None, _) => self.text.clone(),
        }
    }

    pub fn is_err(&self) -> bool {
        self.error.is_some()
    }
}

/// Spawn one streaming task per model and return the merged event channel.
///
/// The channel closes once every task has finished, making the turn's end
/// observable as `rx.recv() == None`.
pub fn spawn_turn(runs: Vec<ModelRun>) -> mpsc::Receiver<ColumnEvent> {
    let (tx, rx) = mpsc::channel(64);

    for run in runs {
        let tx = tx.clone();
        tokio::spawn(async move {
            debug!(column = %run.key, model = %run.params.model, "dispatching");
            let mut stream = run.provider.stream_chat(run.messages, run.params);

            while let Some(item) = stream.next().await {
                let event = match item {
                    Ok(text) => ColumnEvent::Delta {
                        key: run.key.clone(),
                        text,
                    },
                    Err(e) => {
                        let _ = tx
                            .send(ColumnEvent::Failed {
                                key: run.key.clone(),
                                message: format!("Error: {e}"),
                            })
                            .await;
                        return;
                    }
                };
                if tx.send(event).await.is_err() {
                    return; // receiver gone, turn abandoned
                }
            }

            let _ = tx.send(ColumnEvent::Done { key: run.key }).await;
        });
    }

    // The original sender drops here, so the channel closes with the last task.
    drop(tx);
    rx
}

/// Drain the event channel into per-column results, invoking `on_event`
/// for live rendering as each event arrives.
pub async fn collect_turn(
    mut rx: mpsc::Receiver<ColumnEvent>,
    mut on_event: impl FnMut(&ColumnEvent),
) -> BTreeMap<String, ColumnResult> {
    let mut results: BTreeMap<String, ColumnResult> = BTreeMap::new();

    while let Some(event) = rx.recv().await {
        on_event(&event);
        match &event {
            ColumnEvent::Delta { key, text } => {
                results.entry(key.clone()).or_default().text.push_str(text);
            }
            ColumnEvent::Done { key } => {
                results.entry(key.clone()).or_default();
            }
            ColumnEvent::Failed { key, message } => {
                results.entry(key.clone()).or_default().error = Some(message.clone());
            }
        }
    }

    results
}

// ─────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use async_trait::async_trait;
    use futures_util::stream;
    use polychat_core::types::ChatReply;
    use polychat_providers::DeltaStream;

    /// Mock provider that streams fixed deltas (or fails partway) and
    /// counts how many times it is called.
    struct MockProvider {
        deltas: Vec<&'static str>,
        fail_after: Option<usize>,
        calls: Arc<AtomicUsize>,
    }

    impl MockProvider {
        fn ok(deltas: Vec<&'static str>, calls: Arc<AtomicUsize>) -> Self {
            MockProvider {
                deltas,
                fail_after: None,
                calls,
            }
        }

        fn failing(after: usize, calls: Arc<AtomicUsize>) -> Self {
            MockProvider {
                deltas: vec!["partial "],
                fail_after: Some(after),
                calls,
            }
        }
    }

    #[async_trait]
    impl LlmProvider for MockProvider {
        async fn chat(
            &self,
            _messages: &[Message],
            _params: &RequestParams,
        ) -> anyhow::Result<ChatReply> {
            unimplemented!("dispatch only uses streaming")
        }

        fn stream_chat(&self, _messages: Vec<Message>, _params: RequestParams) -> DeltaStream {
            self.calls.fetch_add(1, Ordering::SeqCst);
            let mut items: Vec<anyhow::Result<String>> = self
                .deltas
                .iter()
                .map(|d| Ok(d.to_string()))
                .collect();
            if let Some(after) = self.fail_after {
                items.truncate(after);
                items.push(Err(anyhow::anyhow!("connection reset")));
            }
            Box::pin(stream::iter(items))
        }

        fn display_name(&self) -> &str {
            "Mock"
        }
    }

    fn run_for(key: &str, provider: Arc<dyn LlmProvider>) -> ModelRun {
        ModelRun {
            key: key.to_string(),
            provider,
            params: RequestParams::default(),
            messages: vec![Message::user("prompt")],
        }
    }

    #[tokio::test]
    async fn dispatch_issues_one_call_per_model() {
        let calls = Arc::new(AtomicUsize::new(0));
        let runs: Vec<ModelRun> = (0..3)
            .map(|i| {
                run_for(
                    &format!("m{i}"),
                    Arc::new(MockProvider::ok(vec!["hi"], calls.clone())),
                )
            })
            .collect();

        let rx = spawn_turn(runs);
        let results = collect_turn(rx, |_| {}).await;

        assert_eq!(calls.load(Ordering::SeqCst), 3);
        assert_eq!(results.len(), 3);
    }

    #[tokio::test]
    async fn deltas_accumulate_per_column() {
        let calls = Arc::new(AtomicUsize::new(0));
        let runs = vec![
            run_for("a", Arc::new(MockProvider::ok(vec!["Hel", "lo"], calls.clone()))),
            run_for("b", Arc::new(MockProvider::ok(vec!["World"], calls.clone()))),
        ];

        let rx = spawn_turn(runs);
        let results = collect_turn(rx, |_| {}).await;

        assert_eq!(results["a"].text, "Hello");
        assert_eq!(results["b"].text, "World");
        assert!(!results["a"].is_err());
    }

    #[tokio::test]
    async fn one_failure_does_not_stop_others() {
        let calls = Arc::new(AtomicUsize::new(0));
        let runs = vec![
            run_for("good", Arc::new(MockProvider::ok(vec!["fine"], calls.clone()))),
            run_for("bad", Arc::new(MockProvider::failing(0, calls.clone()))),
            run_for("also-good", Arc::new(MockProvider::ok(vec!["ok"], calls.clone()))),
        ];

        let rx = spawn_turn(runs);
        let results = collect_turn(rx, |_| {}).await;

        assert_eq!(results.len(), 3);
        assert_eq!(results["good"].text, "fine");
        assert_eq!(results["also-good"].text, "ok");
        assert!(results["bad"].is_err());
        assert!(results["bad"].final_text().contains("connection reset"));
    }

    #[tokio::test]
    async fn failure_mid_stream_keeps_partial_text() {
        let calls = Arc::new(AtomicUsize::new(0));
        let runs = vec![run_for("m", Arc::new(MockProvider::failing(1, calls)))];

        let rx = spawn_turn(runs);
        let results = collect_turn(rx, |_| {}).await;

        assert_eq!(results["m"].text, "partial ");
        let text = results["m"].final_text();
        assert!(text.starts_with("partial "));
        assert!(text.contains("connection reset"));
    }

    #[tokio::test]
    async fn on_event_sees_every_event() {
        let calls = Arc::new(AtomicUsize::new(0));
        let runs = vec![run_for("m", Arc::new(MockProvider::ok(vec!["a", "b"], calls)))];

        let rx = spawn_turn(runs);
        let mut seen = Vec::new();
        collect_turn(rx, |e| seen.push(e.clone())).await;

        assert_eq!(
            seen,
            vec![
                ColumnEvent::Delta {
                    key: "m".into(),
                    text: "a".into()
                },
                ColumnEvent::Delta {
                    key: "m".into(),
                    text: "b".into()
                },
                ColumnEvent::Done { key: "m".into() },
            ]
        );
    }

    #[test]
    fn final_text_variants() {
        let ok = ColumnResult {
            text: "fine".into(),
            error: None,
        };
        assert_eq!(ok.final_text(), "fine");

        let failed_early = ColumnResult {
            text: String::new(),
            error: Some("Error: x".into()),
        };
        assert_eq!(failed_early.final_text(), "Error: x");

        let failed_late = ColumnResult {
            text: "part".into(),
            error: Some("Error: y".into()),
        };
        assert_eq!(failed_late.final_text(), "part\nError: y");
    }
}

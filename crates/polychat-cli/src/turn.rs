//! One chat turn: build providers, fan the prompt out, render, record.

use std::sync::Arc;

use tracing::warn;

use polychat_core::config::Config;
use polychat_core::transcript::TranscriptSet;
use polychat_providers::{build_provider, LlmProvider, RequestParams};

use crate::fanout::{self, ColumnResult, ModelRun};
use crate::helpers::{column_key, column_label};
use crate::render::{render_grid, LivePrinter};

/// Run one prompt against every dispatchable model and print the results.
///
/// Provider construction failures and stream failures both surface as a
/// failed column; they never abort the other models' work. Successful
/// replies are appended to each model's transcript so follow-up prompts
/// carry context.
pub async fn run_turn(config: &Config, transcripts: &mut TranscriptSet, prompt: &str) {
    let models = config.dispatchable_models();

    let columns: Vec<(String, String)> = models
        .iter()
        .map(|m| (column_key(m), column_label(m)))
        .collect();

    let mut runs = Vec::new();
    let mut build_failures: Vec<(String, String)> = Vec::new();

    for model in &models {
        let key = column_key(model);
        match build_provider(model) {
            Ok(provider) => {
                let messages = transcripts.context_for(&key, prompt);
                runs.push(ModelRun {
                    key,
                    provider: Arc::new(provider) as Arc<dyn LlmProvider>,
                    params: RequestParams {
                        model: model.name.clone(),
                        temperature: model.parameters.temperature,
                        max_tokens: model.parameters.max_tokens,
                    },
                    messages,
                });
            }
            Err(e) => {
                warn!(column = %key, error = %e, "provider setup failed");
                build_failures.push((key, format!("Error: {e}")));
            }
        }
    }

    let rx = fanout::spawn_turn(runs);
    let mut printer = LivePrinter::new(&columns);
    let mut results = fanout::collect_turn(rx, |event| printer.handle(event)).await;

    for (key, message) in build_failures {
        results.insert(
            key,
            ColumnResult {
                text: String::new(),
                error: Some(message),
            },
        );
    }

    println!(
        "\n{}",
        render_grid(&columns, &results, config.ui.models_per_row as usize)
    );

    // Record the turn so follow-up prompts see it. Failed columns keep the
    // user turn but get no assistant turn.
    let keys: Vec<String> = columns.iter().map(|(k, _)| k.clone()).collect();
    transcripts.push_user(&keys, prompt);
    for (key, result) in &results {
        if !result.is_err() && !result.text.is_empty() {
            transcripts.push_assistant(key, &result.text);
        }
    }
}

// ─────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────

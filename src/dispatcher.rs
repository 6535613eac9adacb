// Copyright 2024 The NLP Genie Authors
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//     http://www.apache.org/licenses/LICENSE-2.0
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! # Request dispatcher
//! A [`Request`] holds the menu selection and the inputs collected for one interaction. The
//! dispatcher checks the guard of the selected task, invokes at most one backend operation and
//! returns an [`Outcome`]. It keeps no state between requests.
//!
//! ```no_run
//! use nlp_genie::dispatcher::{Dispatcher, Inputs, Outcome, Request};
//! use nlp_genie::pipelines::common::Selection;
//! # use nlp_genie::backends::NlpBackend;
//! # use std::sync::Arc;
//! # async fn run(backend: Arc<dyn NlpBackend>) {
//! let dispatcher = Dispatcher::new(backend, 50);
//! let request = Request {
//!     selection: Selection::QuestionAnswering,
//!     inputs: Inputs {
//!         context: Some("Paris is the capital of France.".to_string()),
//!         question: Some("What is the capital of France?".to_string()),
//!         ..Default::default()
//!     },
//! };
//! if let Outcome::Completed { output, .. } = dispatcher.dispatch(&request).await {
//!     if let Some(text) = output.display_text() {
//!         println!("{text}");
//!     }
//! }
//! # }
//! ```

use crate::backends::NlpBackend;
use crate::common::config::GenieConfig;
use crate::common::error::GenieError;
use crate::pipelines::common::Selection;
use crate::pipelines::ner::EntityReport;
use crate::pipelines::sentiment::SentimentReport;
use crate::pipelines::summarization::SummarizationRequest;
use crate::pipelines::{ner, question_answering, sentiment, summarization, text_generation};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::Instrument;
use uuid::Uuid;

/// Introductory text shown when no task is selected.
pub const LANDING_PARAGRAPHS: [&str; 3] = [
    "This is a Natural Language Processing Based Web App that can do anything you can imagine \
     with text.",
    "Natural Language Processing (NLP) is a computational technique to understand the human \
     language in the way they speak and write.",
    "NLP is a subfield of Artificial Intelligence (AI) designed to understand the context of \
     text just like humans.",
];

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
/// # Inputs collected for one interaction
/// Only the fields of the selected task are read.
pub struct Inputs {
    /// Main text body (summarizer, NER, sentiment, text completion)
    pub text: Option<String>,
    /// Number of words of the summary
    pub num_words: Option<f64>,
    /// Context of the question answering task
    pub context: Option<String>,
    /// Question of the question answering task
    pub question: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Request {
    pub selection: Selection,
    #[serde(default)]
    pub inputs: Inputs,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
/// # Post-processed result of a task
pub enum TaskOutput {
    Summary { summary: String },
    Entities(EntityReport),
    Sentiment(SentimentReport),
    Answer { answer: String },
    Completion { generated_text: String },
}

impl TaskOutput {
    /// Text shown for the output, `None` for a sentiment label without a message.
    pub fn display_text(&self) -> Option<String> {
        match self {
            TaskOutput::Summary { summary } => Some(summarization::display(summary)),
            TaskOutput::Entities(report) => Some(ner::display(report)),
            TaskOutput::Sentiment(report) => sentiment::display(report),
            TaskOutput::Answer { answer } => Some(question_answering::display(answer)),
            TaskOutput::Completion { generated_text } => {
                Some(text_generation::display(generated_text))
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "state", rename_all = "snake_case")]
/// # Result of one dispatch
pub enum Outcome {
    /// No task selected, the landing page is shown
    Landing,
    /// The guard failed: nothing was invoked and nothing is displayed
    AwaitingInput { selection: Selection },
    Completed {
        selection: Selection,
        output: TaskOutput,
    },
    /// The backend reported an error
    Failed { selection: Selection, message: String },
}

impl Outcome {
    /// Text shown to the user, `None` when there is nothing to show.
    pub fn display_text(&self) -> Option<String> {
        match self {
            Outcome::Landing | Outcome::AwaitingInput { .. } => None,
            Outcome::Completed { output, .. } => output.display_text(),
            Outcome::Failed { selection, message } => Some(format!(
                "Something went wrong while running {selection}: {message}"
            )),
        }
    }

    pub fn is_failure(&self) -> bool {
        matches!(self, Outcome::Failed { .. })
    }
}

/// Routes a request to the pipeline of its selection
#[derive(Clone)]
pub struct Dispatcher {
    backend: Arc<dyn NlpBackend>,
    summary_max_length: i64,
}

impl Dispatcher {
    pub fn new(backend: Arc<dyn NlpBackend>, summary_max_length: i64) -> Dispatcher {
        Dispatcher {
            backend,
            summary_max_length,
        }
    }

    pub fn from_config(backend: Arc<dyn NlpBackend>, config: &GenieConfig) -> Dispatcher {
        Dispatcher::new(backend, config.summary_max_length)
    }

    pub fn backend_name(&self) -> &str {
        self.backend.name()
    }

    /// Loads every model of the backend ahead of the first request.
    pub async fn warm_up(&self) -> Result<(), GenieError> {
        self.backend.warm_up().await
    }

    pub async fn dispatch(&self, request: &Request) -> Outcome {
        let request_id = Uuid::new_v4();
        let selection = request.selection;
        let span = tracing::info_span!("dispatch", %request_id, selection = selection.slug());
        async move {
            if selection == Selection::NoneSelected {
                return Outcome::Landing;
            }
            match self.invoke(request).await {
                None => {
                    tracing::debug!("guard not satisfied, nothing invoked");
                    Outcome::AwaitingInput { selection }
                }
                Some(Ok(output)) => {
                    tracing::info!(backend = self.backend.name(), "inference completed");
                    Outcome::Completed { selection, output }
                }
                Some(Err(error)) => {
                    tracing::error!(backend = self.backend.name(), %error, "inference failed");
                    Outcome::Failed {
                        selection,
                        message: error.to_string(),
                    }
                }
            }
        }
        .instrument(span)
        .await
    }

    /// Checks the guard of the selected task and calls the backend if it passes.
    /// Returns `None` when the guard fails.
    async fn invoke(&self, request: &Request) -> Option<Result<TaskOutput, GenieError>> {
        let inputs = &request.inputs;
        let backend = self.backend.as_ref();
        let selection = request.selection;
        if let Some(message) = selection.progress_message() {
            tracing::debug!(progress = message);
        }

        match selection {
            Selection::NoneSelected => None,
            Selection::Summarizer => {
                let request = SummarizationRequest::from_inputs(
                    inputs.text.as_deref(),
                    inputs.num_words,
                    self.summary_max_length,
                )?;
                Some(
                    summarization::summarize(backend, &request)
                        .await
                        .map(|summary| TaskOutput::Summary { summary }),
                )
            }
            Selection::NamedEntityRecognition => {
                let text = ner::guard(inputs.text.as_deref())?;
                Some(ner::extract(backend, text).await.map(TaskOutput::Entities))
            }
            Selection::SentimentAnalysis => {
                let text = sentiment::guard(inputs.text.as_deref())?;
                Some(
                    sentiment::classify(backend, text)
                        .await
                        .map(TaskOutput::Sentiment),
                )
            }
            Selection::QuestionAnswering => {
                let qa_input = question_answering::QaInput::from_inputs(
                    inputs.context.as_deref(),
                    inputs.question.as_deref(),
                )?;
                Some(
                    question_answering::answer(backend, &qa_input)
                        .await
                        .map(|answer| TaskOutput::Answer { answer }),
                )
            }
            Selection::TextCompletion => {
                let prompt = text_generation::guard(inputs.text.as_deref())?;
                Some(
                    text_generation::complete(backend, prompt)
                        .await
                        .map(|generated_text| TaskOutput::Completion { generated_text }),
                )
            }
        }
    }
}

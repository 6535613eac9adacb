//! # NLP Genie
//!
//! A single-page web demo running five natural language processing tasks on pretrained models:
//! - Summarization
//! - Named Entity Recognition
//! - Sentiment Analysis
//! - Question Answering
//! - Text Completion
//!
//! The user picks a task from the menu, fills in its form and gets the post-processed output of
//! the model. Each interaction is one stateless [`dispatcher::Dispatcher::dispatch`] call: the
//! guard of the selected task is checked, at most one backend operation runs, and the result is
//! formatted for display.
//!
//! The models are reached through the [`backends::NlpBackend`] trait:
//! - `remote` (default feature): the Hugging Face Inference API
//! - `local` (feature `local`): rust-bert pipelines running in-process, requires libtorch
//!
//! ```no_run
//! use nlp_genie::backends::create_backend;
//! use nlp_genie::dispatcher::{Dispatcher, Inputs, Request};
//! use nlp_genie::pipelines::common::Selection;
//! use nlp_genie::GenieConfig;
//!
//! # async fn run() -> anyhow::Result<()> {
//! let config = GenieConfig::load(None)?;
//! let dispatcher = Dispatcher::from_config(create_backend(&config)?, &config);
//! let request = Request {
//!     selection: Selection::SentimentAnalysis,
//!     inputs: Inputs {
//!         text: Some("I love this movie".to_string()),
//!         ..Default::default()
//!     },
//! };
//! if let Some(text) = dispatcher.dispatch(&request).await.display_text() {
//!     println!("{text}");
//! }
//! # Ok(())
//! # }
//! ```
//!
//! The binary serves the page with `nlp-genie serve` (default `http://127.0.0.1:8501`) and runs
//! a single task from the command line with `nlp-genie run <task>`.

pub mod backends;
pub mod common;
pub mod dispatcher;
pub mod logging;
pub mod pipelines;
pub mod web;

pub use common::config::{BackendKind, GenieConfig};
pub use common::error::GenieError;
pub use dispatcher::{Dispatcher, Outcome};
pub use pipelines::common::Selection;

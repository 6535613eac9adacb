//! # Ready-to-use NLP tasks
//!
//! Each task module validates its inputs (the guard), calls the matching operation of an
//! [`NlpBackend`](crate::backends::NlpBackend) and formats the result for display.
//!
//! #### 1. Summarization
//! Abstractive summarization with a minimum length picked by the user. Summary sentences are
//! re-capitalized.
//!
//! #### 2. Named Entity Recognition
//! Extracts entities (Person, Location, Organization, Miscellaneous) from text. Entities are
//! listed with their labels and highlighted in the original text.
//!
//! #### 3. Sentiment analysis
//! Predicts the sentiment of a text and maps it to a fixed message.
//! ```no_run
//! use nlp_genie::pipelines::sentiment::{SentimentReport, SentimentScore};
//!
//! let report = SentimentReport::from(SentimentScore {
//!     label: "POSITIVE".to_string(),
//!     score: 0.998,
//! });
//! assert_eq!(
//!     report.message.as_deref(),
//!     Some("This text has a Positive Sentiment. 🤗")
//! );
//! ```
//!
//! #### 4. Question Answering
//! Extractive question answering from a given question and context.
//!
//! #### 5. Text completion
//! Continues a prompt with a language model.

pub mod common;
pub mod ner;
pub mod question_answering;
pub mod sentiment;
pub mod summarization;
pub mod text_generation;

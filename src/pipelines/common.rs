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

//! # Common blocks shared by the task pipelines
//! The menu of selectable tasks, the input fields each of them exposes, the guard used to decide
//! whether an input was actually provided, and the sentence post-processing applied to the
//! free-text outputs.
use serde::{Deserialize, Serialize};
use std::fmt;

/// Shown while the NER and sentiment models are fetching their results.
pub const PROGRESS_MESSAGE: &str = "Please wait a bit. The model is fetching the results!!";

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
/// # Form control collected for a task
pub enum InputField {
    /// Main free-text body
    Text,
    /// Number of words of the summary
    NumWords,
    /// Context paragraph for question answering
    Context,
    /// Question asked against the context
    Question,
}

impl InputField {
    /// Name of the form control, also used as the JSON key of the field.
    pub fn name(&self) -> &'static str {
        match self {
            InputField::Text => "text",
            InputField::NumWords => "num_words",
            InputField::Context => "context",
            InputField::Question => "question",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            InputField::Text => "Your Text",
            InputField::NumWords => "Enter the Number of Words in Summary",
            InputField::Context => "Context",
            InputField::Question => "Your Question",
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
/// # Menu entry chosen by the user
/// Drives which input fields are shown and which pipeline is invoked.
pub enum Selection {
    #[default]
    #[serde(rename = "none")]
    NoneSelected,
    #[serde(rename = "summarizer")]
    Summarizer,
    #[serde(rename = "ner")]
    NamedEntityRecognition,
    #[serde(rename = "sentiment")]
    SentimentAnalysis,
    #[serde(rename = "question_answering")]
    QuestionAnswering,
    #[serde(rename = "text_completion")]
    TextCompletion,
}

impl Selection {
    /// Menu entries, in display order.
    pub const MENU: [Selection; 6] = [
        Selection::NoneSelected,
        Selection::Summarizer,
        Selection::NamedEntityRecognition,
        Selection::SentimentAnalysis,
        Selection::QuestionAnswering,
        Selection::TextCompletion,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            Selection::NoneSelected => "--Select--",
            Selection::Summarizer => "Summarizer",
            Selection::NamedEntityRecognition => "Named Entity Recognition",
            Selection::SentimentAnalysis => "Sentiment Analysis",
            Selection::QuestionAnswering => "Question Answering",
            Selection::TextCompletion => "Text Completion",
        }
    }

    /// Identifier used in URLs, form submissions and on the command line.
    pub fn slug(&self) -> &'static str {
        match self {
            Selection::NoneSelected => "none",
            Selection::Summarizer => "summarizer",
            Selection::NamedEntityRecognition => "ner",
            Selection::SentimentAnalysis => "sentiment",
            Selection::QuestionAnswering => "question_answering",
            Selection::TextCompletion => "text_completion",
        }
    }

    pub fn from_slug(slug: &str) -> Option<Selection> {
        let slug = slug.trim();
        Selection::MENU
            .iter()
            .copied()
            .find(|selection| selection.slug() == slug)
    }

    /// Input fields rendered for this selection, and the only ones read when dispatching it.
    pub fn fields(&self) -> &'static [InputField] {
        match self {
            Selection::NoneSelected => &[],
            Selection::Summarizer => &[InputField::Text, InputField::NumWords],
            Selection::NamedEntityRecognition
            | Selection::SentimentAnalysis
            | Selection::TextCompletion => &[InputField::Text],
            Selection::QuestionAnswering => &[InputField::Context, InputField::Question],
        }
    }

    /// Placeholder text of a field. An input equal to it counts as not provided.
    pub fn placeholder(&self, field: InputField) -> Option<&'static str> {
        use crate::pipelines::{ner, question_answering, sentiment, text_generation};
        match (self, field) {
            (Selection::NamedEntityRecognition, InputField::Text) => Some(ner::PLACEHOLDER),
            (Selection::SentimentAnalysis, InputField::Text) => Some(sentiment::PLACEHOLDER),
            (Selection::TextCompletion, InputField::Text) => Some(text_generation::PLACEHOLDER),
            (Selection::QuestionAnswering, InputField::Context) => {
                Some(question_answering::CONTEXT_PLACEHOLDER)
            }
            (Selection::QuestionAnswering, InputField::Question) => {
                Some(question_answering::QUESTION_PLACEHOLDER)
            }
            _ => None,
        }
    }

    pub fn subheader(&self) -> &'static str {
        match self {
            Selection::NoneSelected => "NLP Genie",
            Selection::Summarizer => "Text Summarization",
            Selection::NamedEntityRecognition => "Text Based Named Entity Recognition",
            Selection::SentimentAnalysis => "Sentiment Analysis",
            Selection::QuestionAnswering => "Question Answering",
            Selection::TextCompletion => "Text Completion",
        }
    }

    pub fn instructions(&self) -> &'static str {
        match self {
            Selection::NoneSelected => "",
            Selection::Summarizer => "Enter the Text you want to summarize!",
            Selection::NamedEntityRecognition => "Enter the Text below to extract Named Entities!",
            Selection::SentimentAnalysis => "Enter the Text below to find out its Sentiment!",
            Selection::QuestionAnswering => {
                "Enter the Context and ask the Question to find out the Answer!"
            }
            Selection::TextCompletion => {
                "Enter the incomplete text to complete it automatically using AI!"
            }
        }
    }

    /// Progress indication shown before the results of the slower pipelines.
    pub fn progress_message(&self) -> Option<&'static str> {
        match self {
            Selection::NamedEntityRecognition | Selection::SentimentAnalysis => {
                Some(PROGRESS_MESSAGE)
            }
            _ => None,
        }
    }
}

impl fmt::Display for Selection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// Returns the input if it was actually provided: present, not blank, and not equal to the
/// field placeholder.
///
/// The placeholder comparison is exact. A user typing the placeholder text verbatim is treated
/// as having entered nothing.
pub fn provided<'a>(value: Option<&'a str>, placeholder: Option<&str>) -> Option<&'a str> {
    let value = value?;
    if value.trim().is_empty() {
        return None;
    }
    match placeholder {
        Some(placeholder) if value == placeholder => None,
        _ => Some(value),
    }
}

/// Splits the text on every `.`, trims and capitalizes each fragment and joins them back with
/// `". "`.
///
/// Capitalization upper-cases the first character and lower-cases the rest of the fragment.
/// The split is naive: decimals, abbreviations and ellipses are fragmented, and a trailing `.`
/// leaves an empty last fragment.
///
/// ```
/// use nlp_genie::pipelines::common::capitalize_sentences;
///
/// assert_eq!(capitalize_sentences("A. b. C"), "A. B. C");
/// ```
pub fn capitalize_sentences(text: &str) -> String {
    text.split('.')
        .map(|fragment| capitalize(fragment.trim()))
        .collect::<Vec<String>>()
        .join(". ")
}

fn capitalize(fragment: &str) -> String {
    let mut chars = fragment.chars();
    match chars.next() {
        Some(first) => first
            .to_uppercase()
            .chain(chars.flat_map(char::to_lowercase))
            .collect(),
        None => String::new(),
    }
}

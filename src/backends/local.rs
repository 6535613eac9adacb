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

//! # In-process rust-bert pipelines
//! Each task owns one [`ModelWorker`] created on first use and kept for the lifetime of the
//! backend. The default pretrained resources are downloaded by rust-bert to `~/.cache/.rustbert`
//! (or `$RUSTBERT_CACHE`) the first time a model is loaded.
//!
//! | Task | Model |
//! |---|---|
//! | Summarization | BART large finetuned on CNN/DailyMail |
//! | NER | BERT large cased finetuned on CoNLL-03 |
//! | Sentiment | DistilBERT finetuned on SST-2 |
//! | Question answering | DistilBERT finetuned on SQuAD |
//! | Text generation | GPT-2 |

use crate::backends::worker::ModelWorker;
use crate::backends::NlpBackend;
use crate::common::config::GenieConfig;
use crate::common::error::GenieError;
use crate::pipelines::ner::EntitySpan;
use crate::pipelines::sentiment::SentimentScore;
use async_trait::async_trait;
use rust_bert::bart::BartGenerator;
use rust_bert::pipelines::generation_utils::{GenerateOptions, LanguageGenerator};
use rust_bert::pipelines::ner::NERModel;
use rust_bert::pipelines::question_answering::{
    QaInput, QuestionAnsweringConfig, QuestionAnsweringModel,
};
use rust_bert::pipelines::sentiment::{SentimentConfig, SentimentModel, SentimentPolarity};
use rust_bert::pipelines::summarization::SummarizationConfig;
use rust_bert::pipelines::text_generation::{TextGenerationConfig, TextGenerationModel};
use rust_bert::pipelines::token_classification::TokenClassificationConfig;
use tch::Device;
use tokio::sync::OnceCell;

/// rust-bert pipelines, each behind a lazily spawned model thread
pub struct LocalBackend {
    device: Device,
    generation_max_length: i64,
    summarizer: OnceCell<ModelWorker<BartGenerator>>,
    ner: OnceCell<ModelWorker<NERModel>>,
    sentiment: OnceCell<ModelWorker<SentimentModel>>,
    question_answering: OnceCell<ModelWorker<QuestionAnsweringModel>>,
    text_generation: OnceCell<ModelWorker<TextGenerationModel>>,
}

impl LocalBackend {
    pub fn new(config: &GenieConfig) -> LocalBackend {
        let device = if config.use_cuda {
            Device::cuda_if_available()
        } else {
            Device::Cpu
        };
        tracing::debug!(?device, "local backend created");
        LocalBackend {
            device,
            generation_max_length: config.generation_max_length,
            summarizer: OnceCell::new(),
            ner: OnceCell::new(),
            sentiment: OnceCell::new(),
            question_answering: OnceCell::new(),
            text_generation: OnceCell::new(),
        }
    }

    async fn summarizer(&self) -> Result<&ModelWorker<BartGenerator>, GenieError> {
        let device = self.device;
        self.summarizer
            .get_or_try_init(|| {
                ModelWorker::spawn("summarization", move || {
                    let config = SummarizationConfig {
                        device,
                        ..Default::default()
                    };
                    Ok(BartGenerator::new(config.into())?)
                })
            })
            .await
    }

    async fn ner(&self) -> Result<&ModelWorker<NERModel>, GenieError> {
        let device = self.device;
        self.ner
            .get_or_try_init(|| {
                ModelWorker::spawn("ner", move || {
                    let config = TokenClassificationConfig {
                        device,
                        ..Default::default()
                    };
                    Ok(NERModel::new(config)?)
                })
            })
            .await
    }

    async fn sentiment(&self) -> Result<&ModelWorker<SentimentModel>, GenieError> {
        let device = self.device;
        self.sentiment
            .get_or_try_init(|| {
                ModelWorker::spawn("sentiment", move || {
                    let config = SentimentConfig {
                        device,
                        ..Default::default()
                    };
                    Ok(SentimentModel::new(config)?)
                })
            })
            .await
    }

    async fn question_answering(&self) -> Result<&ModelWorker<QuestionAnsweringModel>, GenieError> {
        let device = self.device;
        self.question_answering
            .get_or_try_init(|| {
                ModelWorker::spawn("question-answering", move || {
                    let config = QuestionAnsweringConfig {
                        device,
                        ..Default::default()
                    };
                    Ok(QuestionAnsweringModel::new(config)?)
                })
            })
            .await
    }

    async fn text_generation(&self) -> Result<&ModelWorker<TextGenerationModel>, GenieError> {
        let device = self.device;
        let max_length = self.generation_max_length;
        self.text_generation
            .get_or_try_init(|| {
                ModelWorker::spawn("text-generation", move || {
                    let config = TextGenerationConfig {
                        max_length: Some(max_length),
                        device,
                        ..Default::default()
                    };
                    Ok(TextGenerationModel::new(config)?)
                })
            })
            .await
    }
}

#[async_trait]
impl NlpBackend for LocalBackend {
    fn name(&self) -> &str {
        "local"
    }

    async fn summarize(
        &self,
        text: &str,
        min_length: i64,
        max_length: i64,
    ) -> Result<String, GenieError> {
        let text = text.to_string();
        self.summarizer()
            .await?
            .run(move |model| {
                let options = GenerateOptions {
                    min_length: Some(min_length),
                    max_length: Some(max_length),
                    ..Default::default()
                };
                let output = model.generate(Some(&[text.as_str()][..]), Some(options))?;
                output
                    .into_iter()
                    .next()
                    .map(|generated| generated.text)
                    .ok_or_else(|| GenieError::BackendError("empty summary".to_string()))
            })
            .await
    }

    async fn extract_entities(&self, text: &str) -> Result<Vec<EntitySpan>, GenieError> {
        let text = text.to_string();
        self.ner()
            .await?
            .run(move |model| {
                let entities = model
                    .predict_full_entities(&[text.as_str()])
                    .into_iter()
                    .flatten()
                    .map(|entity| EntitySpan {
                        word: entity.word,
                        score: entity.score,
                        label: entity.label,
                        start: Some(entity.offset.begin as usize),
                        end: Some(entity.offset.end as usize),
                    })
                    .collect();
                Ok(entities)
            })
            .await
    }

    async fn classify_sentiment(&self, text: &str) -> Result<Vec<SentimentScore>, GenieError> {
        let text = text.to_string();
        self.sentiment()
            .await?
            .run(move |model| {
                let sentiments = model
                    .predict([text.as_str()])
                    .into_iter()
                    .map(|sentiment| SentimentScore {
                        label: match sentiment.polarity {
                            SentimentPolarity::Positive => "POSITIVE".to_string(),
                            SentimentPolarity::Negative => "NEGATIVE".to_string(),
                        },
                        score: sentiment.score,
                    })
                    .collect();
                Ok(sentiments)
            })
            .await
    }

    async fn answer_question(&self, question: &str, context: &str) -> Result<String, GenieError> {
        let qa_input = QaInput {
            question: question.to_string(),
            context: context.to_string(),
        };
        self.question_answering()
            .await?
            .run(move |model| {
                model
                    .predict(&[qa_input], 1, 32)
                    .into_iter()
                    .flatten()
                    .next()
                    .map(|answer| answer.answer)
                    .ok_or_else(|| GenieError::BackendError("no answer found".to_string()))
            })
            .await
    }

    async fn complete_text(&self, text: &str) -> Result<String, GenieError> {
        let text = text.to_string();
        self.text_generation()
            .await?
            .run(move |model| {
                model
                    .generate(&[text.as_str()], None)?
                    .into_iter()
                    .next()
                    .ok_or_else(|| GenieError::BackendError("empty generation".to_string()))
            })
            .await
    }

    async fn warm_up(&self) -> Result<(), GenieError> {
        self.summarizer().await?;
        self.ner().await?;
        self.sentiment().await?;
        self.question_answering().await?;
        self.text_generation().await?;
        Ok(())
    }
}

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

use crate::dispatcher::{Inputs, Outcome, Request};
use crate::pipelines::common::Selection;
use crate::web::error::ApiError;
use crate::web::render;
use crate::web::AppState;
use axum::extract::{Query, State};
use axum::response::Html;
use axum::{Form, Json};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::collections::BTreeMap;

#[derive(Debug, Default, Deserialize)]
pub struct PageQuery {
    pub task: Option<String>,
}

/// Fields posted by the task form. Every control submits a string.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct PageForm {
    pub task: String,
    pub text: Option<String>,
    pub num_words: Option<String>,
    pub context: Option<String>,
    pub question: Option<String>,
}

impl PageForm {
    /// Unknown slugs fall back to the landing page.
    pub fn selection(&self) -> Selection {
        Selection::from_slug(&self.task).unwrap_or_default()
    }

    /// A submitted but empty word count is read as the control's default. A non-numeric one is
    /// treated as absent.
    pub fn into_inputs(self) -> Inputs {
        Inputs {
            text: self.text,
            num_words: self.num_words.and_then(|num_words| match num_words.trim() {
                "" => Some(render::DEFAULT_NUM_WORDS),
                num_words => num_words.parse::<f64>().ok(),
            }),
            context: self.context,
            question: self.question,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct DispatchPayload {
    pub selection: String,
    #[serde(default)]
    pub inputs: Inputs,
}

#[derive(Debug, Serialize)]
pub struct TaskDescriptor {
    pub slug: &'static str,
    pub label: &'static str,
    pub fields: Vec<&'static str>,
    /// Placeholder per field name, for the fields that have one
    pub placeholders: BTreeMap<&'static str, &'static str>,
}

impl From<Selection> for TaskDescriptor {
    fn from(selection: Selection) -> Self {
        let fields = selection.fields();
        TaskDescriptor {
            slug: selection.slug(),
            label: selection.label(),
            fields: fields.iter().map(|field| field.name()).collect(),
            placeholders: fields
                .iter()
                .filter_map(|field| {
                    selection
                        .placeholder(*field)
                        .map(|placeholder| (field.name(), placeholder))
                })
                .collect(),
        }
    }
}

pub async fn index(Query(query): Query<PageQuery>) -> Html<String> {
    let selection = query
        .task
        .as_deref()
        .and_then(Selection::from_slug)
        .unwrap_or_default();
    Html(render::page(selection, &Inputs::default(), None))
}

pub async fn submit(State(state): State<AppState>, Form(form): Form<PageForm>) -> Html<String> {
    let selection = form.selection();
    let request = Request {
        selection,
        inputs: form.into_inputs(),
    };
    let outcome = state.dispatcher.dispatch(&request).await;
    Html(render::page(selection, &request.inputs, Some(&outcome)))
}

pub async fn health(State(state): State<AppState>) -> Json<Value> {
    Json(json!({
        "status": "ok",
        "backend": state.dispatcher.backend_name()
    }))
}

/// The selectable tasks, without the `--Select--` entry.
pub async fn tasks() -> Json<Vec<TaskDescriptor>> {
    Json(
        Selection::MENU
            .into_iter()
            .filter(|selection| *selection != Selection::NoneSelected)
            .map(TaskDescriptor::from)
            .collect(),
    )
}

pub async fn dispatch(
    State(state): State<AppState>,
    Json(payload): Json<DispatchPayload>,
) -> Result<Json<Outcome>, ApiError> {
    let selection = Selection::from_slug(&payload.selection)
        .ok_or_else(|| ApiError::UnknownSelection(payload.selection.clone()))?;
    let request = Request {
        selection,
        inputs: payload.inputs,
    };
    match state.dispatcher.dispatch(&request).await {
        Outcome::Failed { selection, message } => Err(ApiError::Inference {
            selection: selection.slug().to_string(),
            message,
        }),
        outcome => Ok(Json(outcome)),
    }
}

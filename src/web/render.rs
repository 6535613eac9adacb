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

//! HTML rendering of the single page: sidebar, task form and result panel.

use crate::dispatcher::{Inputs, Outcome, TaskOutput, LANDING_PARAGRAPHS};
use crate::pipelines::common::{InputField, Selection};
use crate::pipelines::ner::{self, EntityReport, Segment};

const STYLE: &str = include_str!("../../static/style.css");

pub const SIDEBAR_TITLE: &str = "Welcome to NLP Genie";

const SIDEBAR_SUBTITLE: &str = "Unleash NLP Genie! 🚀 Perfect for researchers,<br>businesses, \
                                and creators, turn complex texts into actionable insights \
                                instantly!";

const FEATURES: [&str; 5] = [
    "✨Smart Text Summarizer",
    "📍Named Entity Recognition",
    "💬Sentiment Analysis",
    "❓Question Answering",
    "📝Text Completion",
];

pub const MENU_PROMPT: &str = "Choose What you want to do!!";

/// Renders the full page for `selection`, echoing `inputs` back into the form.
pub fn page(selection: Selection, inputs: &Inputs, outcome: Option<&Outcome>) -> String {
    let mut html = String::with_capacity(8 * 1024);
    html.push_str("<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n<meta charset=\"utf-8\">\n");
    html.push_str(
        "<meta name=\"viewport\" content=\"width=device-width, initial-scale=1\">\n\
         <title>NLP Genie</title>\n",
    );
    html.push_str(&format!("<style>\n{STYLE}</style>\n</head>\n<body>\n"));
    html.push_str("<div class=\"layout\">\n");
    html.push_str(&sidebar(selection));
    html.push_str("<main class=\"content\">\n<h1>NLP Genie</h1>\n");
    if selection == Selection::NoneSelected {
        html.push_str(&landing());
    } else {
        html.push_str(&task_form(selection, inputs));
        if let Some(outcome) = outcome {
            html.push_str(&result_panel(outcome));
        }
    }
    html.push_str("</main>\n</div>\n</body>\n</html>\n");
    html
}

fn sidebar(selection: Selection) -> String {
    let mut html = String::from("<aside class=\"sidebar\">\n");
    html.push_str(&format!("<div class=\"title-text\">{SIDEBAR_TITLE}</div>\n"));
    html.push_str(&format!("<p class=\"sub-text\">{SIDEBAR_SUBTITLE}</p>\n"));
    html.push_str("<div class=\"features-container\">\n<ul class=\"features-list\">\n");
    for feature in FEATURES {
        html.push_str(&format!("<li>{feature}</li>\n"));
    }
    html.push_str("</ul>\n</div>\n");

    html.push_str("<form class=\"menu\" method=\"get\" action=\"/\">\n");
    html.push_str(&format!("<label for=\"task\">{MENU_PROMPT}</label>\n"));
    html.push_str("<select id=\"task\" name=\"task\" onchange=\"this.form.submit()\">\n");
    for entry in Selection::MENU {
        let selected = if entry == selection { " selected" } else { "" };
        html.push_str(&format!(
            "<option value=\"{}\"{selected}>{}</option>\n",
            entry.slug(),
            entry.label()
        ));
    }
    html.push_str("</select>\n<noscript><button type=\"submit\">Go</button></noscript>\n");
    html.push_str("</form>\n</aside>\n");
    html
}

fn landing() -> String {
    LANDING_PARAGRAPHS
        .iter()
        .map(|paragraph| format!("<p class=\"landing\">{paragraph}</p>\n"))
        .collect()
}

fn task_form(selection: Selection, inputs: &Inputs) -> String {
    let mut html = format!(
        "<h2>{}</h2>\n<p>{}</p>\n",
        selection.subheader(),
        selection.instructions()
    );
    html.push_str("<form class=\"task\" method=\"post\" action=\"/\">\n");
    html.push_str(&format!(
        "<input type=\"hidden\" name=\"task\" value=\"{}\">\n",
        selection.slug()
    ));
    for field in selection.fields() {
        html.push_str(&field_control(selection, *field, inputs));
    }
    html.push_str("<button type=\"submit\">Submit</button>\n</form>\n");
    html
}

/// Initial value of the word count control.
pub const DEFAULT_NUM_WORDS: f64 = 0.0;

fn field_control(selection: Selection, field: InputField, inputs: &Inputs) -> String {
    let name = field.name();
    let placeholder = selection
        .placeholder(field)
        .map(|placeholder| format!(" placeholder=\"{}\"", escape_html(placeholder)))
        .unwrap_or_default();
    let control = match field {
        InputField::NumWords => {
            let value = inputs.num_words.unwrap_or(DEFAULT_NUM_WORDS);
            format!(
                "<input type=\"number\" id=\"{name}\" name=\"{name}\" min=\"0\" step=\"1\" \
                 value=\"{value}\">"
            )
        }
        InputField::Text | InputField::Context | InputField::Question => {
            let value = match field {
                InputField::Context => inputs.context.as_deref(),
                InputField::Question => inputs.question.as_deref(),
                _ => inputs.text.as_deref(),
            };
            format!(
                "<textarea id=\"{name}\" name=\"{name}\"{placeholder}>{}</textarea>",
                escape_html(value.unwrap_or_default())
            )
        }
    };
    format!(
        "<div class=\"field\">\n<label for=\"{name}\">{}</label>\n{control}\n</div>\n",
        field.label()
    )
}

fn result_panel(outcome: &Outcome) -> String {
    match outcome {
        Outcome::Landing | Outcome::AwaitingInput { .. } => String::new(),
        Outcome::Completed { selection, output } => {
            let mut html = progress(*selection);
            html.push_str(&match output {
                TaskOutput::Entities(report) => entities(report),
                TaskOutput::Sentiment(report) => match &report.message {
                    Some(message) => format!(
                        "<div class=\"result sentiment\">{}</div>\n",
                        escape_html(message)
                    ),
                    None => String::new(),
                },
                _ => format!(
                    "<div class=\"result\">{}</div>\n",
                    escape_html(&output.display_text().unwrap_or_default())
                ),
            });
            html
        }
        Outcome::Failed { selection, .. } => {
            let message = outcome.display_text().unwrap_or_default();
            let mut html = progress(*selection);
            html.push_str(&format!(
                "<div class=\"error\" role=\"alert\">{}</div>\n",
                escape_html(&message)
            ));
            html
        }
    }
}

fn progress(selection: Selection) -> String {
    selection
        .progress_message()
        .map(|message| format!("<p class=\"progress\">{message}</p>\n"))
        .unwrap_or_default()
}

fn entities(report: &EntityReport) -> String {
    let mut html = String::from("<div class=\"result entities\">\n<p>");
    for segment in ner::highlight(&report.text, &report.entities) {
        match segment {
            Segment::Plain(text) => html.push_str(&escape_html(text)),
            Segment::Entity { text, label } => html.push_str(&format!(
                "<mark class=\"entity\">{}<span class=\"label\">{}</span></mark>",
                escape_html(text),
                escape_html(label)
            )),
        }
    }
    html.push_str("</p>\n");
    html.push_str(&format!("<h3>{}</h3>\n<ul>\n", ner::TITLE));
    for entity in &report.entities {
        html.push_str(&format!(
            "<li>{} ({})</li>\n",
            escape_html(&entity.word),
            escape_html(&entity.label)
        ));
    }
    html.push_str("</ul>\n</div>\n");
    html
}

/// Escapes the characters with a meaning in HTML text and attribute values.
pub fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for character in text.chars() {
        match character {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(character),
        }
    }
    escaped
}

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

use anyhow::{bail, Context, Result};
use clap::{Args, Parser, Subcommand};
use nlp_genie::backends::create_backend;
use nlp_genie::dispatcher::{Dispatcher, Inputs, Outcome, Request, LANDING_PARAGRAPHS};
use nlp_genie::logging::{self, LoggingConfig};
use nlp_genie::web::{run_server, ServerConfig};
use nlp_genie::{BackendKind, GenieConfig, Selection};
use std::net::SocketAddr;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    name = "nlp-genie",
    version,
    about = "Summarization, NER, sentiment, question answering and text completion in one page"
)]
struct Cli {
    /// JSON configuration file (defaults to <config dir>/nlp-genie/config.json when present)
    #[arg(long, global = true, env = "NLP_GENIE_CONFIG")]
    config: Option<PathBuf>,

    /// Log at debug level unless RUST_LOG is set
    #[arg(long, global = true)]
    debug: bool,

    /// Inference backend, overrides the configuration file
    #[arg(long, global = true, env = "NLP_GENIE_BACKEND")]
    backend: Option<BackendKind>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Serve the web page
    Serve(ServeArgs),
    /// Run a single task and print its output
    Run(RunArgs),
    /// List the available tasks
    Tasks,
}

#[derive(Args, Debug)]
struct ServeArgs {
    /// Address to listen on
    #[arg(long, env = "NLP_GENIE_BIND")]
    bind: Option<SocketAddr>,

    /// Load every model before accepting requests
    #[arg(long)]
    preload: bool,
}

#[derive(Args, Debug)]
struct RunArgs {
    /// Task slug (see `nlp-genie tasks`)
    task: String,

    #[arg(long)]
    text: Option<String>,

    /// Number of words of the summary
    #[arg(long = "words")]
    num_words: Option<f64>,

    #[arg(long)]
    context: Option<String>,

    #[arg(long)]
    question: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    logging::init(&LoggingConfig { debug: cli.debug })?;

    let mut config = GenieConfig::load(cli.config.as_deref()).with_context(|| {
        format!(
            "failed to load configuration{}",
            cli.config
                .as_ref()
                .map(|path| format!(" from {}", path.display()))
                .unwrap_or_default()
        )
    })?;
    if let Some(backend) = cli.backend {
        config.backend = backend;
    }
    if let Ok(token) = std::env::var("HF_API_TOKEN") {
        config.remote.api_token = Some(token);
    }

    match cli.command {
        Command::Serve(args) => serve(config, args).await,
        Command::Run(args) => run(config, args).await,
        Command::Tasks => {
            print_tasks();
            Ok(())
        }
    }
}

async fn serve(mut config: GenieConfig, args: ServeArgs) -> Result<()> {
    if let Some(bind) = args.bind {
        config.bind_addr = bind;
    }
    config.preload |= args.preload;
    config.validate()?;

    let dispatcher = Dispatcher::from_config(create_backend(&config)?, &config);
    tracing::info!(backend = %config.backend, "starting NLP Genie");
    run_server(dispatcher, ServerConfig::from_config(&config)).await?;
    Ok(())
}

async fn run(config: GenieConfig, args: RunArgs) -> Result<()> {
    let Some(selection) = Selection::from_slug(&args.task) else {
        bail!(
            "unknown task `{}`, run `nlp-genie tasks` to list the available ones",
            args.task
        );
    };
    config.validate()?;

    let dispatcher = Dispatcher::from_config(create_backend(&config)?, &config);
    if let Some(message) = selection.progress_message() {
        eprintln!("{message}");
    }
    let request = Request {
        selection,
        inputs: Inputs {
            text: args.text,
            num_words: args.num_words,
            context: args.context,
            question: args.question,
        },
    };

    let outcome = dispatcher.dispatch(&request).await;
    match &outcome {
        Outcome::Landing => {
            for paragraph in LANDING_PARAGRAPHS {
                println!("{paragraph}");
            }
        }
        Outcome::AwaitingInput { .. } => {
            tracing::debug!("no input provided, nothing to run");
        }
        Outcome::Completed { .. } => {
            if let Some(text) = outcome.display_text() {
                println!("{text}");
            }
        }
        Outcome::Failed { .. } => {
            bail!(outcome.display_text().unwrap_or_default());
        }
    }
    Ok(())
}

fn print_tasks() {
    for selection in Selection::MENU {
        if selection == Selection::NoneSelected {
            continue;
        }
        let fields = selection
            .fields()
            .iter()
            .map(|field| format!("--{}", field.name().replace("num_words", "words")))
            .collect::<Vec<String>>()
            .join(" ");
        println!("{:<20}{:<28}{}", selection.slug(), selection.label(), fields);
    }
}

//! CLI entry point for sgpt.

mod cli;

use clap::Parser;
use sgpt::backend::Backend;
use sgpt::config;
use sgpt::context;
use sgpt::exec::{confirm_and_run, ExecContext, RunLog};
use sgpt::extract::extract_command;
use sgpt::modes;
use sgpt::render::{truncate_preview, Renderer};
use tracing_subscriber::EnvFilter;

/// How much of the prompt the dry-run summary shows.
const DRY_RUN_PROMPT_CHARS: usize = 300;

#[tokio::main]
async fn main() {
    // Env files first so RUST_LOG and credentials from .env are visible to
    // everything that follows, the log filter included.
    config::load_env_files();
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let args = cli::Args::parse();

    let mut settings = match config::load_settings(args.config.as_deref()) {
        Ok(settings) => settings,
        Err(e) => {
            eprintln!("error: {e}");
            std::process::exit(1);
        }
    };

    // Apply CLI overrides.
    if let Some(backend) = args.backend {
        settings.backend = backend;
    }
    if let Some(mode) = &args.mode {
        settings.mode = mode.clone();
    }
    if args.no_color {
        settings.color = false;
    }

    let renderer = Renderer::new(settings.color, args.quiet);

    let prompt = args.prompt.join(" ").trim().to_string();
    if prompt.is_empty() {
        renderer.error("No prompt given. Try: sgpt -m bash 'list open TCP ports'");
        std::process::exit(1);
    }

    // The CLI validates --mode, but the config file can name anything.
    let Some(mode) = modes::lookup(&settings.mode) else {
        renderer.error(&format!(
            "unknown mode `{}`. Valid modes: {}",
            settings.mode,
            modes::names().join(", ")
        ));
        std::process::exit(1);
    };

    let user_prompt = match &args.file {
        Some(path) => match context::read_context_file(path) {
            Ok(content) => context::append_context(&prompt, path, &content),
            Err(e) => {
                renderer.warn(&format!("Could not read context file: {e}"));
                prompt
            }
        },
        None => prompt,
    };

    let model = args
        .model
        .clone()
        .unwrap_or_else(|| settings.model_for(settings.backend));

    if args.dry_run {
        // Dry-run output is the whole point of the flag; ignore --quiet here.
        let dry = Renderer::new(settings.color, false);
        dry.section("sgpt dry-run");
        dry.field("backend", settings.backend.label());
        dry.field("model", &model);
        dry.field("mode", mode.name);
        dry.field("exec", if args.exec { "on" } else { "off" });
        dry.field("log", &settings.log_path.display().to_string());
        dry.field("prompt", &truncate_preview(&user_prompt, DRY_RUN_PROMPT_CHARS));
        return;
    }

    let backend = match Backend::connect(&settings, model).await {
        Ok(backend) => backend,
        Err(e) => {
            renderer.error(&e.to_string());
            std::process::exit(2);
        }
    };

    // A failed chat call terminates here; extraction below only ever sees a
    // reply that actually arrived.
    let reply = match backend.chat(mode.system_prompt, &user_prompt).await {
        Ok(reply) => reply,
        Err(e) => {
            renderer.error(&e.to_string());
            std::process::exit(2);
        }
    };

    renderer.assistant_message(&reply);

    if args.exec {
        let Some(candidate) = extract_command(&reply) else {
            renderer.error("No runnable command found in the response.");
            std::process::exit(3);
        };
        tracing::debug!(source = ?candidate.source, "extracted candidate command");

        let ctx = ExecContext {
            mode: mode.name,
            backend: backend.kind(),
            model: backend.model(),
        };
        let log = RunLog::new(settings.log_path.clone());
        if let Err(e) = confirm_and_run(&candidate.text, &ctx, &log, &renderer).await {
            renderer.error(&e.to_string());
            std::process::exit(4);
        }
        // Declines and nonzero child exits both leave the process at 0.
    }
}

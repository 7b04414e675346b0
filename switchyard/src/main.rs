#![allow(clippy::must_use_candidate, clippy::missing_errors_doc)]

mod args;

use std::io::Read;
use std::path::Path;

use anyhow::Context;
use args::{Args, Command};
use clap::Parser;
use serde_json::{Value, json};
use switchyard_config::Config;
use switchyard_llm::Gateway;
use switchyard_llm::protocol::openai::OpenAiRequest;
use switchyard_llm::types::CompletionRequest;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    match args.command {
        Command::Check => {
            let config = Config::load(&args.config)?;
            let _telemetry_guard = switchyard_telemetry::init(config.telemetry.as_ref(), &args.log_filter)?;
            check(&config)
        }
        Command::Route {
            payload,
            openai,
            response,
        } => {
            let config = Config::load(&args.config)?;
            let _telemetry_guard = switchyard_telemetry::init(config.telemetry.as_ref(), &args.log_filter)?;
            route(&config, &payload, openai, response.as_deref()).await
        }
        Command::Extract { model, input } => {
            // Extraction works without a config file, using the built-in registry
            let config = if args.config.exists() {
                Some(Config::load(&args.config)?)
            } else {
                None
            };
            let _telemetry_guard =
                switchyard_telemetry::init(config.as_ref().and_then(|c| c.telemetry.as_ref()), &args.log_filter)?;
            extract(config.as_ref(), &model, &input)
        }
    }
}

fn check(config: &Config) -> anyhow::Result<()> {
    let gateway = Gateway::from_config(config)?;
    let router = gateway.router();

    println!("providers:");
    for provider in gateway.providers().descriptors() {
        let family = provider
            .bedrock
            .as_ref()
            .and_then(|b| b.family)
            .map(|f| format!(" family={f}"))
            .unwrap_or_default();
        println!(
            "  {} ({}) {} model={} native_tools={}{family}",
            provider.name,
            provider.kind,
            provider.endpoint,
            provider.default_model.as_deref().unwrap_or("-"),
            provider.native_tool_calls,
        );
    }

    println!("routing: mode={} primary={}", router.mode(), router.primary());
    if let Some(fallback) = router.fallback() {
        println!("  fallback={fallback} tool_threshold={}", config.routing.tool_threshold);
    }

    println!("parsers:");
    for entry in gateway.parsers().entries() {
        println!("  {} -> {}", entry.prefix(), entry.variant());
    }

    tracing::info!(config_providers = gateway.providers().len(), "configuration is valid");
    Ok(())
}

async fn route(config: &Config, payload: &Path, openai: bool, response: Option<&Path>) -> anyhow::Result<()> {
    let gateway = Gateway::from_config(config)?;
    let raw = read_input(payload)?;

    let request: CompletionRequest = if openai {
        serde_json::from_str::<OpenAiRequest>(&raw)
            .context("payload is not an OpenAI chat completions request")?
            .into()
    } else {
        serde_json::from_str(&raw).context("payload is not a canonical request")?
    };

    let upstream = gateway.prepare(request).await?;
    let mut output = serde_json::to_value(&upstream)?;

    if let Some(path) = response {
        let body: Value = serde_json::from_str(&read_input(path)?).context("response is not JSON")?;
        output["response"] = serde_json::to_value(gateway.finish(&upstream, body)?)?;
    }

    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}

fn extract(config: Option<&Config>, model: &str, input: &Path) -> anyhow::Result<()> {
    let registry = switchyard_llm::parser_registry(config.map(|c| &c.parsers));
    let parser = registry.parser_for(Some(model));
    let text = read_input(input)?;

    let output = match parser.recover(&text) {
        Some(recovery) => {
            let calls = parser.normalize_tool_calls(recovery.calls);
            json!({ "variant": parser.variant().as_ref(), "strategy": recovery.strategy.as_ref(), "calls": calls })
        }
        None => json!({ "variant": parser.variant().as_ref(), "strategy": null, "calls": [] }),
    };

    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}

fn read_input(path: &Path) -> anyhow::Result<String> {
    if path == Path::new("-") {
        let mut buffer = String::new();
        std::io::stdin().read_to_string(&mut buffer).context("failed to read stdin")?;
        Ok(buffer)
    } else {
        std::fs::read_to_string(path).with_context(|| format!("failed to read {}", path.display()))
    }
}

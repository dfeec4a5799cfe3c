use std::{collections::HashMap, time::Duration};

use color_eyre::eyre::{Context, Result};
use opentelemetry_otlp::WithExportConfig;
use tracing_opentelemetry::OpenTelemetryLayer;
use tracing_subscriber::{prelude::*, EnvFilter, Registry};
use tracing_tree::HierarchicalLayer;

const HONEYCOMB_ENDPOINT: &str = "https://api.honeycomb.io/v1/traces";

fn default_directives(service_name: &str) -> String {
    format!("warn,{service_name}=info,bsky=info,tower_http=debug")
}

/// Installs the global subscriber for `service_name`.
///
/// `RUST_LOG` overrides the default filter. Spans are also exported to
/// Honeycomb when `HONEYCOMB_API_KEY` is set, using `service_name` as the
/// dataset.
pub fn setup_tracing(service_name: &str) -> Result<()> {
    let rust_log = std::env::var("RUST_LOG").unwrap_or_else(|_| default_directives(service_name));

    let env_filter = EnvFilter::builder()
        .parse(&rust_log)
        .wrap_err_with(|| format!("Couldn't create env filter from {rust_log}"))?;

    let opentelemetry_layer = if let Ok(honeycomb_key) = std::env::var("HONEYCOMB_API_KEY") {
        let mut headers = HashMap::<String, String>::new();
        headers.insert("x-honeycomb-team".to_string(), honeycomb_key);
        headers.insert("x-honeycomb-dataset".to_string(), service_name.to_string());

        let tracer = opentelemetry_otlp::new_pipeline()
            .tracing()
            .with_exporter(
                opentelemetry_otlp::new_exporter()
                    .http()
                    .with_endpoint(HONEYCOMB_ENDPOINT)
                    .with_timeout(Duration::from_secs(3))
                    .with_headers(headers),
            )
            .install_batch(opentelemetry_sdk::runtime::Tokio)
            .wrap_err("Failed to install the OTLP pipeline")?;

        println!("Honeycomb layer configured");

        Some(OpenTelemetryLayer::new(tracer))
    } else {
        println!("Skipping Honeycomb layer");

        None
    };

    let heirarchical = HierarchicalLayer::default()
        .with_writer(std::io::stdout)
        .with_indent_lines(true)
        .with_indent_amount(2)
        .with_thread_names(true)
        .with_thread_ids(true)
        .with_verbose_exit(true)
        .with_verbose_entry(true)
        .with_targets(true);

    Registry::default()
        .with(heirarchical)
        .with(opentelemetry_layer)
        .with(env_filter)
        .try_init()
        .wrap_err("Failed to install the tracing subscriber")?;

    Ok(())
}

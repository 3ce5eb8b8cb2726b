use crate::conf::load_options;
use crate::ctx::{RequestContext, SendCtx};
use crate::static_files::{SendError, SendOutcome, send};
use owo_colors::OwoColorize;
use serde::Serialize;
use std::collections::BTreeMap;
use std::path::PathBuf;
use tokio::io::AsyncWriteExt;

#[derive(clap::Args, Debug)]
pub struct ResolveArgs {
    /// Path to the options file
    #[arg(long, default_value = "staticsend.hcl")]
    pub config: PathBuf,

    /// Accept-Encoding header sent with the request
    #[arg(long)]
    pub accept_encoding: Option<String>,

    /// Write the response body to stdout after the report
    #[arg(long, conflicts_with = "json")]
    pub body: bool,

    /// Print the report as JSON
    #[arg(long)]
    pub json: bool,

    /// Request URL, optionally with a query string
    pub url: String,
}

/// What a dry-run request produced.
#[derive(Debug, Serialize)]
pub struct ResolveReport {
    pub url: String,
    pub outcome: &'static str,
    pub status: u16,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub path: Option<PathBuf>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    pub headers: BTreeMap<String, String>,
}

impl ResolveReport {
    pub fn new(ctx: &SendCtx, result: &Result<SendOutcome, SendError>) -> Self {
        let headers = ctx
            .headers
            .iter()
            .map(|(name, value)| {
                let value = String::from_utf8_lossy(value.as_bytes()).into_owned();
                (name.as_str().to_string(), value)
            })
            .collect();

        let (outcome, status, path, error) = match result {
            Ok(SendOutcome::Served(path)) => ("served", ctx.status, Some(path.clone()), None),
            Ok(SendOutcome::Redirected(_)) => ("redirected", ctx.status, None, None),
            Ok(SendOutcome::Declined) => ("declined", ctx.status, None, None),
            Err(e) => ("error", e.status(), None, Some(e.to_string())),
        };

        Self {
            url: ctx.url().to_string(),
            outcome,
            status: status.as_u16(),
            path,
            error,
            headers,
        }
    }

    pub fn render_json(&self) -> anyhow::Result<()> {
        println!("{}", serde_json::to_string_pretty(self)?);
        Ok(())
    }

    pub fn render_pretty(&self) {
        let outcome = match self.outcome {
            "served" => self.outcome.green().bold().to_string(),
            "error" => self.outcome.red().bold().to_string(),
            _ => self.outcome.yellow().bold().to_string(),
        };

        println!("{outcome} {} ({})", self.url, self.status);

        if let Some(path) = &self.path {
            println!("  {} {}", "file".dimmed(), path.display());
        }
        if let Some(error) = &self.error {
            println!("  {} {error}", "error".red());
        }

        for (name, value) in &self.headers {
            println!("  {}: {value}", name.cyan());
        }
    }
}

/// Runs one request through the sender against a real filesystem and prints
/// what the response would carry.
pub async fn resolve(args: ResolveArgs) -> anyhow::Result<()> {
    let options = load_options(&args.config)?;

    let mut ctx = SendCtx::new(args.url.as_str());
    if let Some(accept_encoding) = &args.accept_encoding {
        ctx = ctx.with_accept_encoding(accept_encoding);
    }

    let request_path = ctx.path().to_string();
    let result = send(&mut ctx, &request_path, &options).await;

    if let Err(e) = &result {
        tracing::debug!(error = %e, status = %e.status(), "request failed");
    }

    let report = ResolveReport::new(&ctx, &result);
    if args.json {
        report.render_json()?;
    } else {
        report.render_pretty();
    }

    if args.body {
        let bytes = std::mem::take(&mut ctx.body).into_bytes().await?;
        let mut stdout = tokio::io::stdout();
        stdout.write_all(&bytes).await?;
        stdout.flush().await?;
    }

    Ok(())
}

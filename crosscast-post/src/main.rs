//! crosscast-post - Post content to every selected platform at once

use std::io::Read;
use std::str::FromStr;
use std::time::Duration;

use clap::Parser;
use libcrosscast::config::Config;
use libcrosscast::logging::LoggingConfig;
use libcrosscast::{
    CrosscastError, GatewayClient, Platform, PlatformError, PublishReport, PublishRequest,
    PublishService, Result,
};
use serde_json::json;
use tracing::debug;

const AFTER_HELP: &str = "\
EXIT CODES:
  0 - Success (at least one platform accepted the post)
  1 - Posting failed
  2 - Authentication error
  3 - Invalid input

EXAMPLES:
  crosscast-post \"Hello, everywhere!\"
  echo \"Hello\" | crosscast-post --platform twitter,bluesky
  crosscast-post \"Ship day\" --format json --gateway http://127.0.0.1:8787
";

#[derive(Parser, Debug)]
#[command(name = "crosscast-post", version)]
#[command(about = "Post content to every selected platform at once", long_about = None)]
#[command(after_help = AFTER_HELP)]
struct Cli {
    /// Content to post (reads from stdin if not provided)
    content: Option<String>,

    /// Target specific platform(s) (comma-separated)
    #[arg(short, long)]
    platform: Option<String>,

    /// Output format (text or json)
    #[arg(short, long, default_value = "text")]
    format: String,

    /// Gateway base URL (overrides the config file)
    #[arg(short, long)]
    gateway: Option<String>,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    // Initialize logging
    LoggingConfig::quiet(cli.verbose).init();

    // Run the main logic and handle errors
    if let Err(e) = run(cli).await {
        eprintln!("Error: {}", e);
        std::process::exit(e.exit_code());
    }
}

async fn run(cli: Cli) -> Result<()> {
    let format: OutputFormat = cli.format.parse()?;
    let content = resolve_content(cli.content)?;
    let selected = cli.platform.as_deref().map(parse_platform_list).transpose()?;

    let config = Config::load_or_default()?;
    let platforms = match selected {
        Some(platforms) => platforms,
        None => config.default_platforms()?,
    };

    let gateway_url = cli.gateway.unwrap_or_else(|| config.gateway.url.clone());
    debug!(
        gateway = %gateway_url,
        platforms = ?platforms,
        "sending publish request"
    );
    let client = GatewayClient::new(gateway_url, Duration::from_secs(config.gateway.timeout_secs))?;
    let service = PublishService::new(client);

    let report = service
        .publish(PublishRequest::new(content, platforms))
        .await?;

    match format {
        OutputFormat::Text => print_text(&report),
        OutputFormat::Json => print_json(&report),
    }

    if report.any_success {
        Ok(())
    } else {
        Err(PlatformError::Posting("No platform accepted the post".to_string()).into())
    }
}

/// Take the content argument, or fall back to stdin when input is piped
fn resolve_content(arg: Option<String>) -> Result<String> {
    let raw = match arg {
        Some(content) => content,
        None => {
            if atty::is(atty::Stream::Stdin) {
                return Err(CrosscastError::InvalidInput(
                    "No content provided. Pass content as an argument or pipe it on stdin."
                        .to_string(),
                ));
            }
            let mut buffer = String::new();
            std::io::stdin()
                .read_to_string(&mut buffer)
                .map_err(|e| CrosscastError::InvalidInput(format!("Failed to read stdin: {}", e)))?;
            buffer
        }
    };

    if raw.trim().is_empty() {
        return Err(CrosscastError::InvalidInput(
            "Content cannot be empty".to_string(),
        ));
    }

    Ok(raw)
}

/// Parse a comma-separated platform list, dropping duplicates
fn parse_platform_list(list: &str) -> Result<Vec<Platform>> {
    let mut platforms = Vec::new();
    for part in list.split(',') {
        let part = part.trim();
        if part.is_empty() {
            continue;
        }
        let platform = part.parse::<Platform>()?;
        if !platforms.contains(&platform) {
            platforms.push(platform);
        }
    }
    if platforms.is_empty() {
        return Err(CrosscastError::InvalidInput(
            "Select at least one platform".to_string(),
        ));
    }
    Ok(platforms)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum OutputFormat {
    Text,
    Json,
}

impl FromStr for OutputFormat {
    type Err = CrosscastError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "text" => Ok(OutputFormat::Text),
            "json" => Ok(OutputFormat::Json),
            other => Err(CrosscastError::InvalidInput(format!(
                "Invalid format: {} (expected text or json)",
                other
            ))),
        }
    }
}

fn print_text(report: &PublishReport) {
    for outcome in &report.outcomes {
        if outcome.success {
            println!("{}: posted", outcome.platform.name());
        } else {
            let detail = outcome.error.as_deref().unwrap_or("unknown error");
            println!("{}: failed ({})", outcome.platform.name(), detail);
        }
    }
    let succeeded = report.outcomes.iter().filter(|o| o.success).count();
    println!(
        "Posted to {} of {} platform(s)",
        succeeded,
        report.outcomes.len()
    );
}

fn print_json(report: &PublishReport) {
    let payload = json!({
        "publish_id": report.publish_id,
        "any_success": report.any_success,
        "outcomes": report.outcomes,
    });
    println!("{:#}", payload);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_platform_list_accepts_csv_with_spaces() {
        let platforms = parse_platform_list("twitter, bluesky ,threads").unwrap();
        assert_eq!(
            platforms,
            vec![Platform::Twitter, Platform::Bluesky, Platform::Threads]
        );
    }

    #[test]
    fn test_parse_platform_list_dedupes_aliases() {
        let platforms = parse_platform_list("x,twitter,bsky,bluesky").unwrap();
        assert_eq!(platforms, vec![Platform::Twitter, Platform::Bluesky]);
    }

    #[test]
    fn test_parse_platform_list_rejects_unknown() {
        let result = parse_platform_list("twitter,mastodon");
        match result {
            Err(CrosscastError::InvalidInput(message)) => {
                assert!(message.contains("Unknown platform: mastodon"));
            }
            _ => panic!("Expected InvalidInput"),
        }
    }

    #[test]
    fn test_parse_platform_list_rejects_empty() {
        let result = parse_platform_list(" , ,");
        match result {
            Err(CrosscastError::InvalidInput(message)) => {
                assert!(message.contains("at least one platform"));
            }
            _ => panic!("Expected InvalidInput"),
        }
    }

    #[test]
    fn test_output_format_parsing() {
        assert_eq!("text".parse::<OutputFormat>().unwrap(), OutputFormat::Text);
        assert_eq!("JSON".parse::<OutputFormat>().unwrap(), OutputFormat::Json);
        assert!("yaml".parse::<OutputFormat>().is_err());
    }

    #[test]
    fn test_resolve_content_rejects_blank_argument() {
        let result = resolve_content(Some("   \n\t   ".to_string()));
        match result {
            Err(CrosscastError::InvalidInput(message)) => {
                assert!(message.contains("Content cannot be empty"));
            }
            _ => panic!("Expected InvalidInput"),
        }
    }

    #[test]
    fn test_resolve_content_keeps_argument_verbatim() {
        let content = resolve_content(Some("Line 1\nLine 2".to_string())).unwrap();
        assert_eq!(content, "Line 1\nLine 2");
    }
}

//! Command-line arguments.

use clap::{Args, Parser, Subcommand};

#[derive(Debug, Parser)]
#[command(name = "netfirst", version, about = "Network-first fetches with an offline response cache")]
pub struct Cli {
    #[command(subcommand)]
    pub cmd: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Fetch a URL from the network, falling back to the cache when slow or offline
    Get(GetArgs),
    /// Fetch every configured resource and store it in the cache
    Precache,
    /// List the named caches in the database
    Caches,
}

#[derive(Debug, Args)]
pub struct GetArgs {
    /// Absolute URL, or a path relative to `base_url`
    pub url: String,

    /// HTTP method
    #[arg(short = 'X', long, default_value = "GET")]
    pub method: String,

    /// Extra request header as `name: value` (repeatable)
    #[arg(short = 'H', long = "header", value_parser = parse_header)]
    pub headers: Vec<(String, String)>,

    /// Override the network timeout in milliseconds
    #[arg(long)]
    pub timeout_ms: Option<u64>,
}

fn parse_header(raw: &str) -> Result<(String, String), String> {
    let (name, value) = raw
        .split_once(':')
        .ok_or_else(|| format!("expected `name: value`, got `{raw}`"))?;
    let name = name.trim();
    if name.is_empty() {
        return Err("header name must not be empty".into());
    }
    Ok((name.to_string(), value.trim().to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_get_defaults() {
        let cli = Cli::try_parse_from(["netfirst", "get", "https://example.com/"]).unwrap();
        let Command::Get(args) = cli.cmd else { panic!("expected get") };
        assert_eq!(args.url, "https://example.com/");
        assert_eq!(args.method, "GET");
        assert!(args.headers.is_empty());
        assert!(args.timeout_ms.is_none());
    }

    #[test]
    fn test_parse_get_with_method_and_headers() {
        let cli = Cli::try_parse_from([
            "netfirst",
            "get",
            "/form",
            "-X",
            "POST",
            "-H",
            "Accept: text/html",
            "--header",
            "x-trace:1",
            "--timeout-ms",
            "250",
        ])
        .unwrap();
        let Command::Get(args) = cli.cmd else { panic!("expected get") };
        assert_eq!(args.method, "POST");
        assert_eq!(
            args.headers,
            vec![("Accept".to_string(), "text/html".to_string()), ("x-trace".to_string(), "1".to_string())]
        );
        assert_eq!(args.timeout_ms, Some(250));
    }

    #[test]
    fn test_parse_header_rejects_missing_colon() {
        assert!(parse_header("no-colon").is_err());
        assert!(parse_header(": value").is_err());
    }

    #[test]
    fn test_parse_precache() {
        let cli = Cli::try_parse_from(["netfirst", "precache"]).unwrap();
        assert!(matches!(cli.cmd, Command::Precache));
    }
}

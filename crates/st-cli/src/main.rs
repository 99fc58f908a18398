//! SearchTerm CLI
//!
//! CLI tool for extracting search terms and deriving host/query keys.

use std::io::Write;

use clap::{Parser, Subcommand};
use log::LevelFilter;
use serde::Serialize;

use st_core::{
    DomainResolver, HeuristicResolver, NavigationUri, ProviderTable, PslResolver,
    SearchTermResolver,
};

type CliResolver = SearchTermResolver<Box<dyn DomainResolver>>;

#[derive(Parser)]
#[command(name = "st-cli")]
#[command(about = "SearchTerm search term extraction and key tools")]
struct Cli {
    /// Public Suffix List file (falls back to a label heuristic)
    #[arg(long, global = true)]
    psl: Option<String>,

    /// JSON file with provider entries, replacing the built-in table
    #[arg(long, global = true)]
    providers: Option<String>,

    /// Log level (overrides RUST_LOG)
    #[arg(long, global = true)]
    log_level: Option<LevelFilter>,

    /// Print one JSON object per input
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Extract the search term from navigation URLs
    Term {
        /// Absolute URLs
        #[arg(required = true)]
        urls: Vec<String>,
    },

    /// Print the base domain (eTLD+1) of hosts
    BaseDomain {
        /// Hostnames
        #[arg(required = true)]
        hosts: Vec<String>,
    },

    /// Print the public suffix of URLs
    Suffix {
        /// Absolute URLs
        #[arg(required = true)]
        urls: Vec<String>,
    },

    /// Derive a 48-character key for a host or a query
    Key {
        /// Host, keyed by its base domain
        #[arg(long, conflicts_with = "query", required_unless_present = "query")]
        host: Option<String>,

        /// Query string, keyed as-is
        #[arg(long)]
        query: Option<String>,
    },

    /// List the active provider table
    Providers,
}

#[derive(Serialize)]
struct TermRow<'a> {
    url: &'a str,
    host: Option<&'a str>,
    term: String,
}

#[derive(Serialize)]
struct ValueRow<'a> {
    input: &'a str,
    value: String,
}

fn main() {
    let cli = Cli::parse();
    init_logger(cli.log_level);

    let result = build_resolver(cli.psl.as_deref(), cli.providers.as_deref()).and_then(|resolver| {
        match &cli.command {
            Commands::Term { urls } => cmd_term(&resolver, urls, cli.json),
            Commands::BaseDomain { hosts } => cmd_base_domain(&resolver, hosts, cli.json),
            Commands::Suffix { urls } => cmd_suffix(&resolver, urls, cli.json),
            Commands::Key { host, query } => {
                cmd_key(&resolver, host.as_deref(), query.as_deref(), cli.json)
            }
            Commands::Providers => cmd_providers(&resolver, cli.json),
        }
    });

    if let Err(e) = result {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}

/// Install `env_logger`, reading `RUST_LOG` unless `--log-level` is given.
fn init_logger(level: Option<LevelFilter>) {
    let mut builder = env_logger::Builder::from_env(
        env_logger::Env::default().default_filter_or("warn"),
    );
    if let Some(level) = level {
        builder.filter_level(level);
    }
    builder.format(|buf, record| {
        writeln!(buf, "[{}] {}: {}", record.level(), record.target(), record.args())
    });
    let _ = builder.try_init();
}

fn build_resolver(psl: Option<&str>, providers: Option<&str>) -> Result<CliResolver, String> {
    let domains: Box<dyn DomainResolver> = match psl {
        Some(path) => Box::new(
            PslResolver::from_file(path).map_err(|e| format!("Failed to load '{}': {}", path, e))?,
        ),
        None => Box::new(HeuristicResolver),
    };

    let table = match providers {
        Some(path) => {
            let json = std::fs::read_to_string(path)
                .map_err(|e| format!("Failed to read '{}': {}", path, e))?;
            ProviderTable::from_json(&json)
                .map_err(|e| format!("Invalid providers in '{}': {}", path, e))?
        }
        None => ProviderTable::builtin(),
    };

    Ok(SearchTermResolver::new(domains).with_providers(table))
}

fn print_json<T: Serialize>(row: &T) -> Result<(), String> {
    let line = serde_json::to_string(row).map_err(|e| format!("Failed to encode JSON: {}", e))?;
    println!("{}", line);
    Ok(())
}

fn cmd_term(resolver: &CliResolver, urls: &[String], json: bool) -> Result<(), String> {
    for url in urls {
        let uri = match NavigationUri::parse(url) {
            Ok(uri) => Some(uri),
            Err(e) => {
                log::warn!("skipping '{}': {}", url, e);
                None
            }
        };
        let term = uri
            .as_ref()
            .map(|uri| resolver.search_term(uri))
            .unwrap_or_default();

        if json {
            print_json(&TermRow {
                url,
                host: uri.as_ref().map(|uri| uri.host.as_str()),
                term,
            })?;
        } else {
            println!("{}\t{}", url, term);
        }
    }
    Ok(())
}

fn cmd_base_domain(resolver: &CliResolver, hosts: &[String], json: bool) -> Result<(), String> {
    for host in hosts {
        let value = resolver.base_domain(host);
        if json {
            print_json(&ValueRow { input: host, value })?;
        } else {
            println!("{}\t{}", host, value);
        }
    }
    Ok(())
}

fn cmd_suffix(resolver: &CliResolver, urls: &[String], json: bool) -> Result<(), String> {
    for url in urls {
        let uri = NavigationUri::parse(url).map_err(|e| format!("Invalid URL '{}': {}", url, e))?;
        let value = resolver.public_suffix(&uri);
        if json {
            print_json(&ValueRow { input: url, value })?;
        } else {
            println!("{}\t{}", url, value);
        }
    }
    Ok(())
}

fn cmd_key(
    resolver: &CliResolver,
    host: Option<&str>,
    query: Option<&str>,
    json: bool,
) -> Result<(), String> {
    let (input, value) = match (host, query) {
        (Some(host), _) => (host, resolver.key_for_host(host)),
        (None, Some(query)) => (query, resolver.key_for_query(query)),
        (None, None) => return Err("Either --host or --query is required".to_string()),
    };

    if json {
        print_json(&ValueRow { input, value })
    } else {
        println!("{}", value);
        Ok(())
    }
}

fn cmd_providers(resolver: &CliResolver, json: bool) -> Result<(), String> {
    let entries = resolver.providers().entries();
    if json {
        for entry in entries {
            print_json(entry)?;
        }
        return Ok(());
    }

    println!("Providers: {}", entries.len());
    for entry in entries {
        println!("  {:<12} {:<12} {}", entry.name, entry.path_prefix, entry.query_param);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_parses_key_host() {
        let cli = Cli::try_parse_from(["st-cli", "key", "--host", "www.google.com"]).unwrap();
        match cli.command {
            Commands::Key { host, query } => {
                assert_eq!(host.as_deref(), Some("www.google.com"));
                assert!(query.is_none());
            }
            _ => panic!("expected key command"),
        }
    }

    #[test]
    fn test_cli_key_requires_input() {
        assert!(Cli::try_parse_from(["st-cli", "key"]).is_err());
        assert!(Cli::try_parse_from(["st-cli", "key", "--host", "a", "--query", "b"]).is_err());
    }

    #[test]
    fn test_cli_global_flags_after_subcommand() {
        let cli = Cli::try_parse_from(["st-cli", "term", "https://bing.com/search?q=x", "--json", "--log-level", "debug"]).unwrap();
        assert!(cli.json);
        assert_eq!(cli.log_level, Some(LevelFilter::Debug));
    }

    #[test]
    fn test_build_resolver_defaults() {
        let resolver = build_resolver(None, None).unwrap();
        assert_eq!(resolver.providers().len(), 4);
        let uri = NavigationUri::new("www.bing.com", "/search?q=test");
        assert_eq!(resolver.search_term(&uri), "test");
    }

    #[test]
    fn test_build_resolver_missing_files() {
        assert!(build_resolver(Some("/nonexistent/psl.dat"), None).is_err());
        assert!(build_resolver(None, Some("/nonexistent/providers.json")).is_err());
    }
}

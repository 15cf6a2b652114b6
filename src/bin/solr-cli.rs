use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use serde_json::Value;

use solr_client::config::load_config;
use solr_client::observability::logging::init_logging;
use solr_client::{ParamMap, ResponseFormat, Select, SolrClient, SolrConfig, SolrRequest};

#[derive(Parser)]
#[command(name = "solr-cli")]
#[command(about = "Query a Solr core from the command line", long_about = None)]
struct Cli {
    /// Core or collection URL (overrides the config file)
    #[arg(short, long)]
    url: Option<String>,

    /// TOML configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Log level when RUST_LOG is not set [default: the config's observability.log_level]
    #[arg(long)]
    log_level: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Clone, Copy, ValueEnum)]
enum Format {
    Json,
    Xml,
}

impl From<Format> for ResponseFormat {
    fn from(f: Format) -> Self {
        match f {
            Format::Json => ResponseFormat::Json,
            Format::Xml => ResponseFormat::Xml,
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Run a query against the select handler
    Select {
        #[arg(short, long, default_value = "*:*")]
        query: String,
        /// Filter query; may be repeated
        #[arg(long)]
        fq: Vec<String>,
        #[arg(long)]
        sort: Option<String>,
        #[arg(long)]
        start: Option<u64>,
        #[arg(long)]
        rows: Option<u64>,
        #[arg(long)]
        fl: Option<String>,
        #[arg(long)]
        def_type: Option<String>,
        #[arg(long)]
        time_allowed: Option<u64>,
        #[arg(long)]
        omit_header: bool,
        #[arg(long, value_enum, default_value = "json")]
        wt: Format,
    },
    /// Ping the core
    Ping,
    /// Send raw parameters through a named handler
    Send {
        handler: String,
        /// key=value parameter; may be repeated
        #[arg(short, long = "param", value_parser = parse_param)]
        params: Vec<(String, String)>,
    },
}

fn parse_param(s: &str) -> Result<(String, String), String> {
    s.split_once('=')
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .ok_or_else(|| format!("expected key=value, got '{}'", s))
}

/// Fold `-p` pairs into a map; a repeated key (`-p fq=a -p fq=b`) sends
/// every value.
fn collect_params(pairs: Vec<(String, String)>) -> ParamMap {
    let mut params = ParamMap::new();
    for (key, value) in pairs {
        params.append(key, value);
    }
    params
}

/// The `--log-level` flag wins over the configured level.
fn log_level<'a>(flag: Option<&'a str>, config: &'a SolrConfig) -> &'a str {
    flag.unwrap_or(&config.observability.log_level)
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => load_config(path)?,
        None => SolrConfig::default(),
    };
    init_logging(log_level(cli.log_level.as_deref(), &config));
    if let Some(url) = cli.url {
        config.base_url = url;
    }

    let client = SolrClient::new(config)?;

    let result = match cli.command {
        Commands::Select {
            query,
            fq,
            sort,
            start,
            rows,
            fl,
            def_type,
            time_allowed,
            omit_header,
            wt,
        } => {
            let mut select = Select::new().query(query).response_format(wt.into());
            for filter in fq {
                select = select.add_filter_query(filter);
            }
            if let Some(sort) = sort {
                select = select.sort(sort);
            }
            if let Some(start) = start {
                select = select.start(start);
            }
            if let Some(rows) = rows {
                select = select.rows(rows);
            }
            if let Some(fl) = fl {
                select = select.field_list(fl);
            }
            if let Some(def_type) = def_type {
                select = select.def_type(def_type);
            }
            if let Some(millis) = time_allowed {
                select = select.time_allowed(millis);
            }
            if omit_header {
                select = select.omit_header(true);
            }
            client.select(select).await
        }
        Commands::Ping => client.ping().await,
        Commands::Send { handler, params } => {
            client.send(&handler, collect_params(params)).await
        }
    };

    match result {
        Ok(value) => print_value(&value),
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    }
}

fn print_value(value: &Value) -> Result<(), Box<dyn std::error::Error>> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

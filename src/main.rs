mod config;
mod error;
mod input;
mod logging;
mod model;
mod panels;
mod pipeline;
mod report;

#[cfg(test)]
#[path = "../tests/src_inline/fixtures.rs"]
mod fixtures;

use std::path::{Path, PathBuf};

use clap::{ArgGroup, Args, Parser, Subcommand};

use crate::config::{CIPAPI_TOKEN_ENV, TierUpConfig};
use crate::error::TierUpError;
use crate::input::cipapi::{CipApiClient, CipApiSource, save_request_body};
use crate::input::{
    InputError, LocalFileSource, RequestSource, load_request_json, parse_request_json,
};
use crate::model::RequestDocument;
use crate::model::validate::validate;
use crate::panels::panelapp::PanelAppClient;
use crate::pipeline::run_tierup;
use crate::pipeline::stage4_assemble::RunMetadata;
use crate::pipeline::stage5_report::write_reports;
use crate::report::complete::is_complete;

#[derive(Debug, Parser)]
#[command(
    name = "kira-tierup",
    version,
    about = "Re-check tier 3 variants of an interpretation request against current PanelApp panels"
)]
struct Cli {
    /// Debug logging (RUST_LOG takes precedence)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Reconcile panels and write the full and summary reports for one request
    Run(RunArgs),
    /// Print `path<TAB>eligible<TAB>reason` for each request file
    Validate {
        #[arg(required = true)]
        files: Vec<PathBuf>,
    },
    /// Print `path<TAB>complete` for each full report
    Complete {
        #[arg(required = true)]
        reports: Vec<PathBuf>,
    },
}

#[derive(Debug, Args)]
#[command(group(ArgGroup::new("request").required(true).args(["irjson", "irid"])))]
struct RunArgs {
    /// TOML config file
    #[arg(short, long)]
    config: PathBuf,

    /// Local interpretation request JSON (.json or .json.gz)
    #[arg(short = 'j', long)]
    irjson: Option<PathBuf>,

    /// Interpretation request id to download from the CIP-API
    #[arg(short, long, requires = "irversion")]
    irid: Option<u64>,

    /// Interpretation request version to download from the CIP-API
    #[arg(long, requires = "irid")]
    irversion: Option<u64>,

    /// Output directory
    #[arg(short, long)]
    out: PathBuf,
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum RequestInput {
    Local(PathBuf),
    CipApi { irid: u64, version: u64 },
}

impl RunArgs {
    fn request_input(&self) -> Result<RequestInput, InputError> {
        match (&self.irjson, self.irid, self.irversion) {
            (Some(path), _, _) => Ok(RequestInput::Local(path.clone())),
            (None, Some(irid), Some(version)) => Ok(RequestInput::CipApi { irid, version }),
            _ => Err(InputError::MissingInput(
                "either --irjson or --irid with --irversion".to_string(),
            )),
        }
    }
}

fn main() {
    let cli = Cli::parse();
    logging::init(cli.verbose);
    if let Err(err) = run(&cli.command) {
        eprintln!("{err}");
        std::process::exit(1);
    }
}

fn run(command: &Command) -> Result<(), TierUpError> {
    match command {
        Command::Run(args) => run_command(args),
        Command::Validate { files } => {
            for path in files {
                println!("{}", validate_line(path));
            }
            Ok(())
        }
        Command::Complete { reports } => {
            for path in reports {
                println!("{}\t{}", path.display(), is_complete(path)?);
            }
            Ok(())
        }
    }
}

fn run_command(args: &RunArgs) -> Result<(), TierUpError> {
    tracing::info!("kira-tierup {} start", env!("CARGO_PKG_VERSION"));
    let config = TierUpConfig::load(&args.config)?
        .with_token_override(std::env::var(CIPAPI_TOKEN_ENV).ok());

    let input = args.request_input()?;
    let source: Box<dyn RequestSource> = match &input {
        RequestInput::Local(path) => Box::new(LocalFileSource { path: path.clone() }),
        RequestInput::CipApi { irid, version } => Box::new(CipApiSource {
            client: CipApiClient::new(config.cipapi.host.clone(), config.cipapi_token()?),
            irid: *irid,
            version: *version,
        }),
    };

    let origin = source.describe();
    tracing::info!(source = %origin, "loading interpretation request");
    let body = source.fetch()?;
    if let RequestInput::CipApi { irid, version } = input {
        let saved = save_request_body(&body, &args.out, &format!("{irid}-{version}"))?;
        tracing::info!(path = %saved.display(), "saved interpretation request");
    }

    let mut document = RequestDocument::from_value(parse_request_json(&body, &origin)?)?;
    let registry = PanelAppClient::new(config.panelapp.host.clone());
    let meta = RunMetadata::now(env!("CARGO_PKG_VERSION"));

    let run = run_tierup(&mut document, &registry, &meta)?;
    if !run.panels.reconcile.ambiguous.is_empty() {
        tracing::warn!(
            ambiguous = run.panels.reconcile.ambiguous.len(),
            "some panel aliases matched several registry panels"
        );
    }
    tracing::info!(
        declared = run.panels.declared,
        updated = document.updated_panels.len(),
        "panels ready"
    );
    write_reports(&run.records, &args.out, &document.irid())?;

    tracing::info!("kira-tierup end");
    Ok(())
}

fn validate_line(path: &Path) -> String {
    let outcome = load_request_json(path)
        .map_err(TierUpError::from)
        .and_then(|value| Ok(RequestDocument::from_value(value)?))
        .and_then(|document| Ok(validate(&document)?));
    match outcome {
        Ok(()) => format!("{}\ttrue\t-", path.display()),
        Err(err) => format!("{}\tfalse\t{err}", path.display()),
    }
}

#[cfg(test)]
#[path = "../tests/src_inline/main_inline.rs"]
mod tests;

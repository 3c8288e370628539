//! Command-line front end for ralad.

use anyhow::{Context, Result};
use clap::Parser;
use ralad_core::config::{self, RaladConfig};
use ralad_core::console::Console;
use ralad_core::download::STDOUT_NAME;
use ralad_core::fetch::{self, FetchOptions};
use ralad_core::redirect::{RedirectDisplay, RedirectPolicy};
use std::path::PathBuf;

/// Download a single file over HTTP(S), asking before risky redirects.
#[derive(Debug, Parser)]
#[command(name = "ralad", version)]
#[command(about = "ralad: single-file HTTP(S) downloader", long_about = None)]
pub struct Cli {
    /// HTTP or HTTPS URL to download.
    pub url: String,

    /// When to ask before following a redirect: always, relaxed or never.
    #[arg(long, value_name = "POLICY")]
    pub rpolicy: Option<RedirectPolicy>,

    /// How redirect targets are shown: full, part or truncate.
    #[arg(long, value_name = "MODE")]
    pub rdisplay: Option<RedirectDisplay>,

    /// Skip TLS certificate verification.
    #[arg(long)]
    pub unsafe_tls: bool,

    /// Output filename; `-` writes to stdout and implies --quiet.
    #[arg(short, long, value_name = "NAME")]
    pub output: Option<String>,

    /// Only print warnings, prompts and errors.
    #[arg(short, long)]
    pub quiet: bool,

    /// Give up after this many redirects.
    #[arg(long, value_name = "N")]
    pub max_redirects: Option<usize>,
}

impl Cli {
    pub fn is_quiet(&self) -> bool {
        self.quiet || self.output.as_deref() == Some(STDOUT_NAME)
    }

    /// Merge flags over the loaded configuration.
    pub fn fetch_options(&self, cfg: &RaladConfig, dir: PathBuf) -> FetchOptions {
        let mut opts = FetchOptions::from_config(cfg, dir);
        if let Some(policy) = self.rpolicy {
            opts.redirect.policy = policy;
        }
        if let Some(display) = self.rdisplay {
            opts.redirect.display = display;
        }
        if let Some(max) = self.max_redirects {
            opts.redirect.max_redirects = max;
        }
        opts.transport.unsafe_tls |= self.unsafe_tls;
        opts.output = self.output.clone();
        opts
    }
}

pub fn run_from_args() -> Result<()> {
    let cli = Cli::parse();
    let cfg = config::load()?;
    tracing::debug!("loaded config: {:?}", cfg);

    let dir = std::env::current_dir().context("resolve working directory")?;
    let opts = cli.fetch_options(&cfg, dir);
    let mut console = Console::stdio(cli.is_quiet());

    let report = fetch::fetch(&cli.url, &opts, &mut console)?;
    tracing::debug!("finished: {:?}", report);
    Ok(())
}

//! `lookup`: resolve one key against the partner directory or the value
//! mapping, optionally followed by a second key on the bound result.
//!
//! ```text
//! lookup directory PartnerIdInstance Landscape S4HANA DEV --then Parameter hostname
//! lookup mapping EDIFACT UOM_CODE COCO UOM_TEXT --then PCE KGM
//! ```

use anyhow::Context as _;
use clap::{Parser, ValueEnum};
use lookup_core::Resolver;
use lookup_host::{
    init_tracing, key_from_tokens, render, HostAdapter, HostConfig, HostMap, HostValue, Session,
};
use tracing::warn;

#[derive(Debug, Clone, Copy, ValueEnum)]
enum ServiceKind {
    /// Partner directory.
    Directory,
    /// Value mapping table.
    Mapping,
}

#[derive(Debug, Parser)]
#[command(name = "lookup", version, about = "Dynamic partner directory and value mapping lookups")]
struct Cli {
    #[command(flatten)]
    config: HostConfig,

    /// Service to query.
    #[arg(value_enum)]
    service: ServiceKind,

    /// Key tokens. One token is a scalar key, several form a sequence.
    /// Collection stops at `--then`.
    #[arg(required = true)]
    tokens: Vec<String>,

    /// Second key, resolved against the bound result of the first.
    #[arg(long, num_args = 1.., allow_hyphen_values = true)]
    then: Option<Vec<String>>,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(&cli.config)?;

    let session = Session::from_config(&cli.config).context("failed to load lookup fixtures")?;
    let lines = match cli.service {
        ServiceKind::Directory => run(&session.directory, &cli.tokens, cli.then.as_deref()),
        ServiceKind::Mapping => run(&session.mapping, &cli.tokens, cli.then.as_deref()),
    };
    for line in lines {
        println!("{line}");
    }
    Ok(())
}

fn run<R: Resolver>(
    adapter: &HostAdapter<R>,
    tokens: &[String],
    then: Option<&[String]>,
) -> Vec<String> {
    let first = adapter.get(&key_from_tokens(tokens));
    let Some(next) = then else {
        return render(&first);
    };
    match first {
        HostValue::Handle(bound) => render(&bound.get(&key_from_tokens(next))),
        other => {
            warn!("first key did not produce a bound resolver; ignoring --then");
            render(&other)
        }
    }
}

//! Resolve command implementation

use anyhow::{Context, Result};
use clap::{Args, ValueEnum};
use collect::{Flags, Registry, Resolver};
use serde_json::json;
use std::collections::BTreeMap;

use super::utils::{format_data, parse_csv};

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}

#[derive(Args)]
pub struct ResolveArgs {
    /// Single-value flags to accept (comma-separated names)
    #[arg(long = "value", value_name = "NAMES")]
    pub value_flags: Option<String>,

    /// Repeatable flags that collect every value (comma-separated names)
    #[arg(long = "multi", value_name = "NAMES")]
    pub multi_flags: Option<String>,

    /// Boolean switches to accept (comma-separated names)
    #[arg(long = "switch", value_name = "NAMES")]
    pub switch_flags: Option<String>,

    /// Source loaded before any given with -source (repeatable)
    #[arg(long = "add-source", value_name = "URL")]
    pub add_source: Vec<String>,

    /// Source used when no source is given
    #[arg(long, value_name = "URL", env = "COLLECT_DEFAULT_SOURCE")]
    pub default_source: Option<String>,

    /// Output format
    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    pub format: OutputFormat,

    /// Print usage for the declared flags instead of resolving
    #[arg(long)]
    pub usage: bool,

    /// Arguments to resolve: [LABEL] [-flag VALUE]... [-source URL]...
    #[arg(last = true, value_name = "ARGS")]
    pub args: Vec<String>,
}

impl ResolveArgs {
    fn flags(&self) -> Flags {
        let mut flags = Flags::new("");
        for name in parse_csv(&self.value_flags) {
            flags = flags.value(name, "");
        }
        for name in parse_csv(&self.multi_flags) {
            flags = flags.multi(name, "");
        }
        for name in parse_csv(&self.switch_flags) {
            flags = flags.switch(name, "");
        }
        flags
    }
}

pub fn run(args: ResolveArgs) -> Result<()> {
    let registry = Registry::with_defaults();
    let mut resolver = Resolver::new(&registry);
    if let Some(default) = &args.default_source {
        resolver.set_default_source(default.clone());
    }
    resolver.add_source(args.add_source.iter().cloned());

    let flags = args.flags();
    if args.usage {
        resolver.add_flags(&[flags]);
        print!("{}", resolver.usage());
        return Ok(());
    }

    let (data, rest) = resolver
        .parse(args.args.iter().cloned(), &[flags])
        .context("Failed to resolve configuration")?;

    match args.format {
        OutputFormat::Text => {
            print!("{}", format_data(&data));
            if !rest.is_empty() {
                println!("-- {}", rest.join(" "));
            }
        }
        OutputFormat::Json => {
            let sorted: BTreeMap<&str, &[String]> = data.iter().collect();
            let out = json!({
                "label": resolver.label(),
                "sources": resolver.sources(),
                "data": sorted,
                "args": rest,
            });
            println!("{}", serde_json::to_string_pretty(&out)?);
        }
    }
    Ok(())
}

//! Flag schemas and argument parsing
//!
//! A [`Flags`] schema lists the flags a host program accepts. Parsing is done
//! by clap; only flags present on the command line end up in the returned
//! [`Data`], so values from other sources are never shadowed by defaults.
//!
//! Flags are written `-name value`, `--name value` or `--name=value`. The first
//! argument that is not a flag, and everything after it, is left over.

use crate::data::Data;
use clap::builder::ValueParser;
use clap::parser::ValueSource;
use clap::{Arg, ArgAction, Command};

const LEFTOVER_ID: &str = "__leftover__";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlagKind {
    /// Takes one value; repeating the flag keeps the last one.
    Value,
    /// Takes one value per occurrence, collecting all of them.
    Multi,
    /// Takes no value and resolves to `"true"` when given.
    Switch,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Flag {
    name: String,
    help: String,
    kind: FlagKind,
}

impl Flag {
    pub fn new(name: impl Into<String>, help: impl Into<String>, kind: FlagKind) -> Self {
        Self { name: name.into(), help: help.into(), kind }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn help(&self) -> &str {
        &self.help
    }

    pub fn kind(&self) -> FlagKind {
        self.kind
    }

    fn takes_value(&self) -> bool {
        self.kind != FlagKind::Switch
    }

    fn to_arg(&self) -> Arg {
        let arg = Arg::new(self.name.clone()).long(self.name.clone()).help(self.help.clone());
        match self.kind {
            FlagKind::Value => arg
                .action(ArgAction::Set)
                .value_parser(ValueParser::string())
                .value_name("VALUE")
                .allow_hyphen_values(true),
            FlagKind::Multi => arg
                .action(ArgAction::Append)
                .value_parser(ValueParser::string())
                .value_name("VALUE")
                .allow_hyphen_values(true),
            FlagKind::Switch => arg.action(ArgAction::SetTrue),
        }
    }
}

/// A named group of flag definitions.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Flags {
    name: String,
    flags: Vec<Flag>,
}

impl Flags {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into(), flags: Vec::new() }
    }

    /// Add a single-value flag.
    pub fn value(mut self, name: impl Into<String>, help: impl Into<String>) -> Self {
        self.add(Flag::new(name, help, FlagKind::Value));
        self
    }

    /// Add a repeatable flag collecting every value.
    pub fn multi(mut self, name: impl Into<String>, help: impl Into<String>) -> Self {
        self.add(Flag::new(name, help, FlagKind::Multi));
        self
    }

    /// Add a boolean switch.
    pub fn switch(mut self, name: impl Into<String>, help: impl Into<String>) -> Self {
        self.add(Flag::new(name, help, FlagKind::Switch));
        self
    }

    /// Add a flag, replacing an existing flag of the same name in place.
    pub fn add(&mut self, flag: Flag) {
        match self.flags.iter_mut().find(|f| f.name == flag.name) {
            Some(existing) => *existing = flag,
            None => self.flags.push(flag),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn get(&self, name: &str) -> Option<&Flag> {
        self.flags.iter().find(|f| f.name == name)
    }

    pub fn exists(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Flag> {
        self.flags.iter()
    }

    pub fn is_empty(&self) -> bool {
        self.flags.is_empty()
    }

    /// Add every flag of `other`; its definitions win on name collisions.
    pub fn merge(&mut self, other: &Flags) {
        for flag in &other.flags {
            self.add(flag.clone());
        }
    }

    /// Parse `args` against this schema.
    ///
    /// Returns the flags given on the command line and the leftover arguments.
    pub fn parse(&self, args: &[String]) -> Result<(Data, Vec<String>), clap::Error> {
        let matches = self.command().try_get_matches_from(self.normalize(args))?;

        let mut data = Data::new();
        for flag in &self.flags {
            if matches.value_source(&flag.name) != Some(ValueSource::CommandLine) {
                continue;
            }
            match flag.kind {
                FlagKind::Switch => {
                    data.set(flag.name.clone(), [matches.get_flag(&flag.name).to_string()])
                }
                FlagKind::Value | FlagKind::Multi => {
                    let values = matches.get_many::<String>(&flag.name).into_iter().flatten().cloned();
                    data.set(flag.name.clone(), values);
                }
            }
        }

        let leftover = matches
            .get_many::<String>(LEFTOVER_ID)
            .map(|values| values.cloned().collect())
            .unwrap_or_default();
        Ok((data, leftover))
    }

    /// Help text listing every flag of this schema.
    pub fn usage(&self) -> String {
        self.command().render_help().to_string()
    }

    fn command(&self) -> Command {
        let name = if self.name.is_empty() { "args".to_string() } else { self.name.clone() };
        let leftover = Arg::new(LEFTOVER_ID)
            .action(ArgAction::Append)
            .value_parser(ValueParser::string())
            .num_args(1..)
            .trailing_var_arg(true)
            .hide(true);

        self.flags.iter().fold(
            Command::new(name)
                .no_binary_name(true)
                .disable_help_flag(true)
                .disable_version_flag(true)
                .args_override_self(true)
                .arg(leftover),
            |command, flag| command.arg(flag.to_arg()),
        )
    }

    /// Rewrite single-dash long flags (`-name`) to clap's `--name`, up to the
    /// first non-flag argument.
    fn normalize(&self, args: &[String]) -> Vec<String> {
        let mut out = Vec::with_capacity(args.len());
        let mut expect_value = false;

        for (i, arg) in args.iter().enumerate() {
            if expect_value {
                expect_value = false;
                out.push(arg.clone());
                continue;
            }
            if arg == "--" || arg == "-" || !arg.starts_with('-') {
                out.extend(args[i..].iter().cloned());
                break;
            }

            let bare = arg.trim_start_matches('-');
            let (name, inline_value) = match bare.split_once('=') {
                Some((name, _)) => (name, true),
                None => (bare, false),
            };
            match self.get(name) {
                Some(flag) => {
                    out.push(format!("--{bare}"));
                    expect_value = flag.takes_value() && !inline_value;
                }
                None => out.push(arg.clone()),
            }
        }
        out
    }
}

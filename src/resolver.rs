//! Resolve configuration from arguments and sources
//!
//! Precedence, lowest first: sources in the order given, then flags from the
//! command line.

use crate::data::Data;
use crate::error::{Error, Result};
use crate::flags::Flags;
use crate::source::Registry;
use url::Url;

/// Name of the flag collecting source URLs.
pub const SOURCE_FLAG: &str = "source";

/// Combines command-line flags and source data into one [`Data`].
///
/// A resolver accumulates flag schemas and sources across calls; use one
/// resolver per resolution.
#[derive(Debug)]
pub struct Resolver<'r> {
    registry: &'r Registry,
    flags: Vec<Flags>,
    label: String,
    sources: Vec<String>,
    default_source: Option<String>,
}

impl<'r> Resolver<'r> {
    pub fn new(registry: &'r Registry) -> Self {
        Self {
            registry,
            flags: Vec::new(),
            label: String::new(),
            sources: Vec::new(),
            default_source: None,
        }
    }

    /// Set the source used when no source was given.
    pub fn with_default_source(mut self, source: impl Into<String>) -> Self {
        self.set_default_source(source);
        self
    }

    pub fn set_default_source(&mut self, source: impl Into<String>) {
        self.default_source = Some(source.into());
    }

    pub fn default_source(&self) -> Option<&str> {
        self.default_source.as_deref()
    }

    /// Add source URLs ahead of any given with `-source`.
    pub fn add_source<I, S>(&mut self, sources: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.sources.extend(sources.into_iter().map(Into::into));
    }

    /// Add flag schemas. A schema identical to one already added is skipped.
    pub fn add_flags(&mut self, flags: &[Flags]) {
        push_new(&mut self.flags, flags);
    }

    /// Label taken from the first argument by the last [`Resolver::parse`].
    pub fn label(&self) -> &str {
        &self.label
    }

    /// Sources to load: the added ones, or the default source if none were added.
    pub fn sources(&self) -> &[String] {
        match &self.default_source {
            Some(default) if self.sources.is_empty() => std::slice::from_ref(default),
            _ => &self.sources,
        }
    }

    /// Parse `args` and resolve the final data.
    ///
    /// A leading argument that is not a flag is taken as the label. Returns the
    /// resolved data and the arguments left over by flag parsing. If the
    /// arguments do not parse, the resolver is left as it was.
    pub fn parse<I, S>(&mut self, args: I, flags: &[Flags]) -> Result<(Data, Vec<String>)>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut args: Vec<String> = args.into_iter().map(Into::into).collect();
        let label = extract_label(&mut args);

        let mut schemas = self.flags.clone();
        push_new(&mut schemas, flags);
        let (mut args_data, leftover) = combined_flags(&schemas).parse(&args)?;

        self.label = label;
        self.flags = schemas;
        tracing::debug!("Resolving with label {:?}", self.label);

        let given = args_data.pick_all(SOURCE_FLAG);
        self.add_source(given);

        let mut resolved = Data::new();
        for source in self.sources() {
            resolved.merge(&self.load(source)?);
        }

        // command-line flags always win over sources
        resolved.merge(&args_data);
        Ok((resolved, leftover))
    }

    /// Usage text for every flag schema added so far, one block per schema.
    pub fn usage(&self) -> String {
        let mut out = String::new();
        for flags in &self.flags {
            out.push('\n');
            if !flags.name().is_empty() {
                out.push_str(&format!("{} options:\n", upper_first(flags.name())));
            }
            out.push_str(&flags.usage());
        }
        out
    }

    fn load(&self, source: &str) -> Result<Data> {
        let url = Url::parse(source)
            .map_err(|e| Error::MalformedSourceUrl { url: source.to_string(), source: e })?;
        let scheme = url.scheme();
        let Some(loader) = self.registry.lookup(scheme) else {
            return Err(Error::UnknownScheme(scheme.to_string()));
        };

        tracing::debug!("Loading {} for label {:?}", source, self.label);
        loader
            .load(&self.label, &url, source)
            .map_err(|e| Error::SourceLoad { scheme: loader.scheme().to_string(), source: e })
    }
}

fn push_new(schemas: &mut Vec<Flags>, flags: &[Flags]) {
    for flags in flags {
        if !schemas.contains(flags) {
            schemas.push(flags.clone());
        }
    }
}

/// One schema holding every flag, with `source` added unless already defined.
fn combined_flags(schemas: &[Flags]) -> Flags {
    let mut combined = Flags::new("");
    if !schemas.iter().any(|f| f.exists(SOURCE_FLAG)) {
        combined.merge(&Flags::new("").multi(SOURCE_FLAG, "Get data from this source"));
    }
    for flags in schemas {
        combined.merge(flags);
    }
    combined
}

fn extract_label(args: &mut Vec<String>) -> String {
    if args.first().is_some_and(|first| !first.starts_with('-')) {
        args.remove(0)
    } else {
        String::new()
    }
}

fn upper_first(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

//! collect: resolve layered configuration for command-line programs
//!
//! Values come from sources addressed by URL (labeled YAML or TOML files via
//! `file://`) and from command-line flags. Sources are merged in the order
//! given and flags are merged last, so an explicit flag always wins.
//!
//! ```no_run
//! use collect::{Flags, Registry, Resolver};
//!
//! # fn main() -> collect::Result<()> {
//! let registry = Registry::with_defaults();
//! let flags = Flags::new("server").value("port", "Port to listen on");
//!
//! let mut resolver = Resolver::new(&registry).with_default_source("file://config.yml");
//! let (data, rest) = resolver.parse(std::env::args().skip(1), &[flags])?;
//! println!("port = {} (label {:?}, {} leftover args)", data.get("port"), resolver.label(), rest.len());
//! # Ok(())
//! # }
//! ```

pub mod data;
pub mod error;
pub mod flags;
pub mod resolver;
pub mod source;

pub use data::{Criterion, Data};
pub use error::{BoxError, Error, Result};
pub use flags::{Flag, FlagKind, Flags};
pub use resolver::{Resolver, SOURCE_FLAG};
pub use source::{FileSource, Registry, Source};

//! A command-line grammar engine.
//!
//! Host programs declare command syntaxes — keywords, typed variables,
//! alternatives, grouping and repetition — compile them once into a small
//! matching program, and then parse user-entered lines against it. Matching
//! runs a Thompson-style NFA over whole words: every candidate command
//! advances in parallel, keywords match by prefix, and the callback of the
//! single command that consumes the entire input is invoked.
//!
//! # Example
//!
//! ```rust
//! use cmdparse::Cmds;
//!
//! let mut cmds: Cmds<Vec<String>> = Cmds::new();
//! cmds.add("load <file>*", |m, loaded: &mut Vec<String>| {
//!     for var in m.var("file") {
//!         loaded.push(var.value.clone());
//!     }
//! })
//! .unwrap();
//! cmds.compile();
//!
//! let mut loaded = Vec::new();
//! assert!(cmds.parse("load a.txt b.txt", &mut loaded));
//! assert_eq!(loaded, ["a.txt", "b.txt"]);
//!
//! // Keywords match by prefix.
//! assert!(cmds.parse("lo c.txt", &mut loaded));
//! assert_eq!(loaded, ["a.txt", "b.txt", "c.txt"]);
//! ```

mod cmds;
pub mod code;
mod compiler;
mod errors;
pub mod grammar;
mod input;
mod vm;

pub use cmds::{Callback, Cmds};
pub use code::{Instr, Prog};
pub use errors::Diagnostics;
pub use input::split_words;
pub use vm::{KeywordValue, Match, MatchItem, VarValue};

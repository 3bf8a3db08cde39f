//! Command definition language: lexer, parser and syntax tree.
//!
//! A definition describes the shape of one command: its keywords, typed
//! variables, alternatives, grouping and repetition.
//!
//! # Definition syntax
//!
//! ```text
//! command      → alternatives EOF
//! alternatives → terms ( '|' alternatives )?
//! terms        → repetition ( terms )?
//! repetition   → group ( '*' | '+' | '?' )?
//! group        → '(' alternatives ')' | term
//! term         → var | WORD
//! var          → '<' WORD ( ':' WORD )? '>'
//! ```
//!
//! | Form             | Meaning                                          |
//! |------------------|--------------------------------------------------|
//! | `load`           | Keyword, matched by prefix of the typed word     |
//! | `<file>`         | Variable capture, type `str`                     |
//! | `<n:int>`        | Variable capture with an explicit type           |
//! | `a \| b`         | Alternatives                                     |
//! | `(a b)`          | Grouping                                         |
//! | `x*` `x+` `x?`   | Zero-or-more, one-or-more, optional              |
//!
//! For example `load <file>*` matches `load`, `load a.txt`, and
//! `load a.txt b.txt`.

pub mod ast;
pub mod parser;
pub mod scanner;

pub use ast::{Ast, RepOp};
pub use parser::parse;
pub use scanner::{Token, TokenKind, scan};

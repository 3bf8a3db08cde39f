//! Syntax tree for command definitions.

use std::fmt;

/// A parsed command definition.
///
/// Trees are built right-associatively by the parser: `a b c` becomes
/// `Terms(a, Terms(b, c))` and `a | b | c` becomes `Alts(a, Alts(b, c))`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Ast {
    /// A keyword, matched case-sensitively against a prefix of the input word.
    Word(String),
    /// A named capture; `typ` is `"str"` unless the definition says otherwise.
    Var { name: String, typ: String },
    /// Two alternative sub-definitions.
    Alts { left: Box<Ast>, right: Box<Ast> },
    /// Concatenation.
    Terms { left: Box<Ast>, right: Box<Ast> },
    /// Repetition of the inner term.
    Rep { op: RepOp, term: Box<Ast> },
    /// Attaches a callback handle to the sub-definition below it.
    Meta { handle: usize, child: Box<Ast> },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RepOp {
    ZeroOrMore, // *
    OneOrMore,  // +
    ZeroOrOne,  // ?
}

impl fmt::Display for RepOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let symbol = match self {
            RepOp::ZeroOrMore => "*",
            RepOp::OneOrMore => "+",
            RepOp::ZeroOrOne => "?",
        };
        write!(f, "{symbol}")
    }
}

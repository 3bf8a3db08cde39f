//! Instruction set and program representation for the matching VM.

use std::fmt;
use std::io::{self, Write};

/// One VM instruction. Jump targets are indices into the program.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Instr {
    /// Unused sentinel; a thread landing here dies.
    #[default]
    Nop,
    /// Fork: pursue both targets at the current input position.
    Split(usize, usize),
    /// Continue at the target without consuming input.
    Jmp(usize),
    /// Consume the current word if it is a prefix of the keyword; bind it.
    Cmp(String),
    /// Consume the current word as a variable binding.
    Save { name: String, typ: String },
    /// Record the callback handle on the thread and continue.
    Meta(usize),
    /// Terminal: the thread is a successful match.
    Match,
}

impl fmt::Display for Instr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Instr::Nop => write!(f, "nop"),
            Instr::Split(a, b) => write!(f, "split {a:>3}, {b:>3}"),
            Instr::Jmp(a) => write!(f, "jmp {a:>3}"),
            Instr::Cmp(keyword) => write!(f, "cmp '{keyword}'"),
            Instr::Save { name, typ } => write!(f, "save '{name}', '{typ}'"),
            Instr::Meta(handle) => write!(f, "meta {handle:>3}"),
            Instr::Match => write!(f, "match"),
        }
    }
}

/// A compiled program: an ordered instruction sequence indexed from 0.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Prog {
    pub instrs: Vec<Instr>,
}

impl Prog {
    pub fn len(&self) -> usize {
        self.instrs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.instrs.is_empty()
    }

    /// Write a numbered listing of the program.
    pub fn print(&self, w: &mut dyn Write) -> io::Result<()> {
        for (i, instr) in self.instrs.iter().enumerate() {
            writeln!(w, "{i:>3}: {instr}")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn listing_is_numbered() {
        let prog = Prog {
            instrs: vec![
                Instr::Split(1, 3),
                Instr::Cmp("this".to_string()),
                Instr::Jmp(4),
                Instr::Cmp("that".to_string()),
                Instr::Match,
            ],
        };
        let mut out = Vec::new();
        prog.print(&mut out).unwrap();
        let listing = String::from_utf8(out).unwrap();
        assert_eq!(
            listing,
            "  0: split   1,   3\n  1: cmp 'this'\n  2: jmp   4\n  3: cmp 'that'\n  4: match\n"
        );
    }
}

//! Thompson-style NFA simulator over word-tokenized input.
//!
//! Every viable execution path through the program advances in parallel, one
//! input word at a time, and every path that reaches `Match` is recorded.
//! Ambiguity is therefore observable: the caller sees all maximal matches
//! and decides what to do when there is more than one.

use std::io::Write;
use std::mem;

use crate::code::{Instr, Prog};

// ─── Match surface ──────────────────────────────────────────────────────────

/// A variable bound during a match.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VarValue {
    pub name: String,
    pub typ: String,
    pub value: String,
}

/// A keyword consumed during a match, with the (possibly abbreviated) word
/// the user actually typed for it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeywordValue {
    pub name: String,
    pub value: String,
}

/// One consumed input word of a match.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MatchItem {
    Keyword(KeywordValue),
    Var(VarValue),
}

/// A successful execution path: the consumed words in order, plus the
/// callback handle the path ran through.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Match {
    items: Vec<MatchItem>,
    pub(crate) meta: Option<usize>,
}

impl Match {
    /// All variable bindings with the given name, in consumption order.
    pub fn var(&self, name: &str) -> Vec<&VarValue> {
        self.items
            .iter()
            .filter_map(|item| match item {
                MatchItem::Var(var) if var.name == name => Some(var),
                _ => None,
            })
            .collect()
    }

    /// Whether the named keyword was consumed anywhere along the path.
    pub fn keyword_present(&self, name: &str) -> bool {
        self.items
            .iter()
            .any(|item| matches!(item, MatchItem::Keyword(k) if k.name == name))
    }

    /// Every consumed word, keyword and variable alike, in order.
    pub fn items(&self) -> &[MatchItem] {
        &self.items
    }
}

// ─── Threads ────────────────────────────────────────────────────────────────

/// One execution path in flight. Cloning deep-copies the binding list, so
/// forked paths diverge freely.
#[derive(Debug, Clone, Default)]
struct Thread {
    pc: usize,
    items: Vec<Binding>,
    meta: Option<usize>,
}

/// A consumed word, tagged with the `Cmp`/`Save` instruction that took it.
#[derive(Debug, Clone)]
struct Binding {
    pc: usize,
    value: String,
}

impl Thread {
    fn bind(&mut self, pc: usize, value: &str) {
        self.items.push(Binding {
            pc,
            value: value.to_string(),
        });
    }
}

/// A thread list with its own per-pc generation stamps: at most one thread
/// per (pc, generation) is admitted to a list.
#[derive(Debug, Default)]
struct ThreadList {
    threads: Vec<Thread>,
    gens: Vec<usize>,
}

impl ThreadList {
    fn for_prog(prog: &Prog) -> Self {
        ThreadList {
            threads: Vec::with_capacity(prog.len()),
            gens: vec![0; prog.len()],
        }
    }

    fn add(&mut self, thread: Thread, r#gen: usize) {
        // The empty program admits nothing.
        if self.gens.is_empty() {
            return;
        }
        if self.gens[thread.pc] == r#gen {
            return;
        }
        self.gens[thread.pc] = r#gen;
        self.threads.push(thread);
    }
}

// ─── Selection ──────────────────────────────────────────────────────────────

/// The matches tied for the largest number of consumed words, in the order
/// they were recorded.
pub(crate) fn longest(matches: &[Match]) -> Vec<Match> {
    let longest_len = matches.iter().map(|m| m.items.len()).max().unwrap_or(0);
    matches
        .iter()
        .filter(|m| m.items.len() == longest_len)
        .cloned()
        .collect()
}

/// The longest matches, but only when they consumed the entire input.
pub(crate) fn maximal(matches: &[Match], word_count: usize) -> Vec<Match> {
    let longest = longest(matches);
    match longest.first() {
        Some(m) if m.items.len() != word_count => Vec::new(),
        _ => longest,
    }
}

// ─── The simulator ──────────────────────────────────────────────────────────

pub(crate) struct Vm<'a, 'b> {
    prog: &'a Prog,
    input: &'a [String],
    current: ThreadList,
    next: ThreadList,
    matches: Vec<Match>,
    r#gen: usize,
    trace: Option<&'b mut (dyn Write + 'static)>,
}

impl<'a, 'b> Vm<'a, 'b> {
    pub fn new(
        prog: &'a Prog,
        input: &'a [String],
        trace: Option<&'b mut (dyn Write + 'static)>,
    ) -> Self {
        Vm {
            prog,
            input,
            current: ThreadList::for_prog(prog),
            next: ThreadList::for_prog(prog),
            matches: Vec::new(),
            r#gen: 1,
            trace,
        }
    }

    /// Run the program over the whole input, collecting every match.
    pub fn run(&mut self) {
        let input = self.input;
        self.current.add(Thread::default(), self.r#gen);
        for word in input {
            self.step(Some(word));
        }
        // One extra step with no word, so threads that consumed the final
        // word can traverse the trailing Match.
        self.step(None);
    }

    fn step(&mut self, word: Option<&str>) {
        self.r#gen += 1;
        // Epsilon transitions append to `current` mid-iteration; iterating
        // by index picks the new threads up within this same word.
        let mut i = 0;
        while i < self.current.threads.len() {
            let thread = self.current.threads[i].clone();
            self.continue_thread(thread, word);
            i += 1;
        }
        mem::swap(&mut self.current, &mut self.next);
        self.next.threads.clear();
    }

    /// Execute one instruction for one thread. Threads taking epsilon
    /// transitions go back on `current`; threads that consumed the word go
    /// on `next`; everything else dies or matches.
    fn continue_thread(&mut self, mut thread: Thread, word: Option<&str>) {
        let prog = self.prog;
        self.trace_instr(thread.pc, word);
        match &prog.instrs[thread.pc] {
            Instr::Nop => {}
            Instr::Jmp(target) => {
                thread.pc = *target;
                self.add_current(thread);
            }
            Instr::Split(first, second) => {
                let (first, second) = (*first, *second);
                let mut fork = thread.clone();
                fork.pc = second;
                thread.pc = first;
                self.add_current(thread);
                self.add_current(fork);
            }
            Instr::Cmp(keyword) => {
                if let Some(word) = word
                    && keyword.starts_with(word)
                {
                    self.consume(thread, word);
                }
            }
            Instr::Save { .. } => {
                if let Some(word) = word {
                    self.consume(thread, word);
                }
            }
            Instr::Meta(handle) => {
                thread.meta = Some(*handle);
                thread.pc += 1;
                self.add_current(thread);
            }
            Instr::Match => self.record_match(&thread),
        }
    }

    fn consume(&mut self, mut thread: Thread, word: &str) {
        let pc = thread.pc;
        thread.bind(pc, word);
        self.trace_bind(word, thread.items.len());
        thread.pc += 1;
        self.next.add(thread, self.r#gen);
    }

    fn add_current(&mut self, thread: Thread) {
        self.current.add(thread, self.r#gen);
    }

    fn record_match(&mut self, thread: &Thread) {
        let items = thread
            .items
            .iter()
            .map(|binding| match &self.prog.instrs[binding.pc] {
                Instr::Cmp(keyword) => MatchItem::Keyword(KeywordValue {
                    name: keyword.clone(),
                    value: binding.value.clone(),
                }),
                Instr::Save { name, typ } => MatchItem::Var(VarValue {
                    name: name.clone(),
                    typ: typ.clone(),
                    value: binding.value.clone(),
                }),
                other => unreachable!("binding points at non-consuming instruction {other}"),
            })
            .collect();
        self.matches.push(Match {
            items,
            meta: thread.meta,
        });
    }

    pub fn maximal_matches(&self) -> Vec<Match> {
        maximal(&self.matches, self.input.len())
    }

    pub fn into_matches(self) -> Vec<Match> {
        self.matches
    }

    // ─── Trace output ───────────────────────────────────────────────────────

    fn trace_instr(&mut self, pc: usize, word: Option<&str>) {
        let prog = self.prog;
        let Some(w) = self.trace.as_deref_mut() else {
            return;
        };
        let _ = writeln!(
            w,
            "trace: thread pc={pc} {} on word '{}'",
            prog.instrs[pc],
            word.unwrap_or("<end>")
        );
    }

    fn trace_bind(&mut self, word: &str, count: usize) {
        let Some(w) = self.trace.as_deref_mut() else {
            return;
        };
        let _ = writeln!(w, "trace:     binding {word} ({count} items)");
    }
}

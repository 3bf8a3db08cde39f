//! Command registration, compilation and dispatch.

use std::io::Write;

use crate::code::Prog;
use crate::compiler;
use crate::errors::Diagnostics;
use crate::grammar::{self, Ast};
use crate::input;
use crate::vm::{self, Match, Vm};

/// The function called when a registered command matches.
pub type Callback<C> = Box<dyn Fn(&Match, &mut C)>;

/// A set of registered commands and their compiled matching program.
///
/// `C` is the caller-supplied context type handed to callbacks.
///
/// Register definitions with [`add`](Cmds::add), compile once with
/// [`compile`](Cmds::compile), then call [`parse`](Cmds::parse) for each
/// user-entered line. After a failed `parse`,
/// [`longest_matches`](Cmds::longest_matches) exposes the partial matches
/// for building an error message.
pub struct Cmds<C> {
    parse_tree: Option<Ast>,
    prog: Prog,
    callbacks: Vec<Callback<C>>,
    matches: Vec<Match>,
    trace: Option<Box<dyn Write>>,
}

impl<C> Default for Cmds<C> {
    fn default() -> Self {
        Self::new()
    }
}

impl<C> Cmds<C> {
    pub fn new() -> Self {
        Cmds {
            parse_tree: None,
            prog: Prog::default(),
            callbacks: Vec::new(),
            matches: Vec::new(),
            trace: None,
        }
    }

    /// Register the command definition `syntax`; `cback` runs when the
    /// command matches. A definition that fails to scan or parse reports
    /// every diagnostic at once and registers nothing.
    pub fn add(
        &mut self,
        syntax: &str,
        cback: impl Fn(&Match, &mut C) + 'static,
    ) -> Result<(), Diagnostics> {
        let tokens = grammar::scan(syntax)?;
        let tree = grammar::parse(&tokens)?;
        // An empty definition has nothing to match.
        let Some(tree) = tree else {
            return Ok(());
        };
        self.add_parse_tree(tree, Box::new(cback));
        Ok(())
    }

    /// Each added command becomes the left branch of a top-level
    /// alternation, with a meta node recording its callback just inside the
    /// branch, so the first instruction executed along a matching path
    /// installs that command's callback on the thread.
    fn add_parse_tree(&mut self, tree: Ast, cback: Callback<C>) {
        let handle = self.callbacks.len();
        self.callbacks.push(cback);
        let wrapped = Ast::Meta {
            handle,
            child: Box::new(tree),
        };
        self.parse_tree = Some(match self.parse_tree.take() {
            None => wrapped,
            Some(existing) => Ast::Alts {
                left: Box::new(wrapped),
                right: Box::new(existing),
            },
        });
    }

    /// Compile the registered commands into the matching program. Call after
    /// the last `add` and before the first `parse`.
    pub fn compile(&mut self) {
        self.prog = compiler::compile(self.parse_tree.as_ref());
    }

    /// The compiled program, for listing and debugging.
    pub fn program(&self) -> &Prog {
        &self.prog
    }

    /// Send a per-instruction execution trace of every `parse` to `w`. The
    /// line format is not a stable contract.
    pub fn trace_execution_to(&mut self, w: impl Write + 'static) {
        self.trace = Some(Box::new(w));
    }

    /// Parse a user-entered line. Returns true — after invoking the matching
    /// command's callback with `ctx` — iff exactly one registered command
    /// matches the entire input. Zero matches and ambiguous input both
    /// return false without calling anything.
    pub fn parse(&mut self, input: &str, ctx: &mut C) -> bool {
        let words = input::split_words(input);

        let mut vm = Vm::new(&self.prog, &words, self.trace.as_deref_mut());
        vm.run();
        let maximal = vm.maximal_matches();
        let matches = vm.into_matches();
        self.matches = matches;

        if maximal.len() != 1 {
            return false;
        }
        let matched = &maximal[0];
        let Some(handle) = matched.meta else {
            return false;
        };
        (self.callbacks[handle])(matched, ctx);
        true
    }

    /// The longest — not necessarily maximal — matches of the most recent
    /// `parse`. Useful for explaining a failed parse: the caller can see how
    /// far each candidate command got.
    pub fn longest_matches(&self) -> Vec<Match> {
        vm::longest(&self.matches)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::io;
    use std::rc::Rc;

    // --- Dispatch ---

    #[test]
    fn nothing_registered_matches_nothing() {
        let mut cmds: Cmds<()> = Cmds::new();
        cmds.compile();
        assert!(!cmds.parse("blah", &mut ()));
    }

    #[test]
    fn variable_reaches_the_callback() {
        let mut cmds: Cmds<Vec<String>> = Cmds::new();
        cmds.add("get <what>", |m, got: &mut Vec<String>| {
            let vals = m.var("what");
            assert_eq!(vals.len(), 1);
            got.push(vals[0].value.clone());
        })
        .unwrap();
        cmds.compile();

        let mut got = Vec::new();
        assert!(cmds.parse("get leaf", &mut got));
        assert_eq!(got, ["leaf"]);
    }

    #[test]
    fn prefix_dispatch_picks_the_right_command() {
        let mut cmds: Cmds<Vec<String>> = Cmds::new();
        cmds.add("info things?", |m, called: &mut Vec<String>| {
            assert!(m.keyword_present("things"));
            called.push("info".to_string());
        })
        .unwrap();
        cmds.add("drop", |_, called: &mut Vec<String>| {
            called.push("drop".to_string());
        })
        .unwrap();
        cmds.compile();

        let mut called = Vec::new();
        assert!(cmds.parse("in t", &mut called));
        assert_eq!(called, ["info"]);

        called.clear();
        assert!(cmds.parse("dr", &mut called));
        assert_eq!(called, ["drop"]);

        called.clear();
        assert!(!cmds.parse("bloop", &mut called));
        assert!(called.is_empty());
    }

    #[test]
    fn context_value_is_passed_through() {
        let mut cmds: Cmds<i32> = Cmds::new();
        cmds.add("doit", |_, ctx: &mut i32| {
            assert_eq!(*ctx, 5);
            *ctx += 1;
        })
        .unwrap();
        cmds.compile();

        let mut ctx = 5;
        assert!(cmds.parse("doit", &mut ctx));
        assert_eq!(ctx, 6);
    }

    #[test]
    fn abbreviated_multiword_command() {
        let mut cmds: Cmds<u32> = Cmds::new();
        cmds.add(
            "show results (source (scheduled | unscheduled | all))? detail?",
            |_, hits: &mut u32| *hits += 1,
        )
        .unwrap();
        cmds.compile();

        let mut hits = 0;
        assert!(cmds.parse("sh res so sch", &mut hits));
        assert_eq!(hits, 1);
    }

    #[test]
    fn registration_order_does_not_change_matching() {
        for order in [["show", "tell"], ["tell", "show"]] {
            let mut cmds: Cmds<Vec<String>> = Cmds::new();
            for syntax in order {
                let name = syntax.to_string();
                cmds.add(syntax, move |_, called: &mut Vec<String>| {
                    called.push(name.clone())
                })
                .unwrap();
            }
            cmds.compile();

            let mut called = Vec::new();
            assert!(cmds.parse("te", &mut called));
            assert_eq!(called, ["tell"]);
        }
    }

    // --- Failure modes ---

    #[test]
    fn ambiguous_input_fails_and_keeps_both_candidates() {
        let mut cmds: Cmds<u32> = Cmds::new();
        cmds.add("get <file>* verbose?", |_, hits: &mut u32| *hits += 1)
            .unwrap();
        cmds.compile();

        let mut hits = 0;
        assert!(!cmds.parse("get v", &mut hits));
        assert_eq!(hits, 0);
        assert_eq!(cmds.longest_matches().len(), 2);
    }

    #[test]
    fn extra_input_fails_but_longest_match_remains() {
        let mut cmds: Cmds<u32> = Cmds::new();
        cmds.add("show", |_, hits: &mut u32| *hits += 1).unwrap();
        cmds.compile();

        let mut hits = 0;
        assert!(!cmds.parse("show something", &mut hits));
        let longest = cmds.longest_matches();
        assert_eq!(longest.len(), 1);
        assert!(longest[0].keyword_present("show"));
    }

    #[test]
    fn parse_before_compile_is_false() {
        let mut cmds: Cmds<()> = Cmds::new();
        cmds.add("show", |_, _| {}).unwrap();
        assert!(!cmds.parse("show", &mut ()));
    }

    // --- Registration errors ---

    #[test]
    fn bad_definition_reports_all_diagnostics() {
        let mut cmds: Cmds<()> = Cmds::new();
        let err = cmds.add("set \"<a>\"", |_, _| {}).unwrap_err();
        assert_eq!(err.messages().len(), 2);

        // The broken definition was not registered.
        cmds.compile();
        assert!(!cmds.parse("set x", &mut ()));
    }

    #[test]
    fn parse_error_carries_position() {
        let mut cmds: Cmds<()> = Cmds::new();
        let err = cmds.add("this|", |_, _| {}).unwrap_err();
        assert_eq!(
            err.to_string(),
            "At character 6: expected more tokens after the |"
        );
    }

    #[test]
    fn empty_definition_registers_nothing() {
        let mut cmds: Cmds<()> = Cmds::new();
        cmds.add("   ", |_, _| {}).unwrap();
        cmds.compile();
        assert!(cmds.program().is_empty());
    }

    // --- Trace ---

    #[derive(Clone, Default)]
    struct SharedBuf(Rc<RefCell<Vec<u8>>>);

    impl Write for SharedBuf {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.0.borrow_mut().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn trace_reports_execution_and_bindings() {
        let buf = SharedBuf::default();
        let mut cmds: Cmds<()> = Cmds::new();
        cmds.add("show", |_, _| {}).unwrap();
        cmds.compile();
        cmds.trace_execution_to(buf.clone());

        assert!(cmds.parse("show", &mut ()));

        let trace = String::from_utf8(buf.0.borrow().clone()).unwrap();
        assert!(trace.contains("trace: thread pc=0"), "got: {trace}");
        assert!(trace.contains("binding show"), "got: {trace}");
    }

    // --- Program listing ---

    #[test]
    fn compiled_program_starts_with_the_newest_meta() {
        let mut cmds: Cmds<()> = Cmds::new();
        cmds.add("first", |_, _| {}).unwrap();
        cmds.add("second", |_, _| {}).unwrap();
        cmds.compile();

        let mut listing = Vec::new();
        cmds.program().print(&mut listing).unwrap();
        let listing = String::from_utf8(listing).unwrap();
        // Most recently added command forms the left branch: its meta comes
        // right after the top-level split.
        assert!(listing.lines().nth(1).unwrap().contains("meta   1"), "got: {listing}");
    }
}

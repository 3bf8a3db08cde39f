use std::io::{self, BufRead};

use anyhow::{Context, Result};
use clap::Parser;

use cmdparse::{Cmds, MatchItem};

#[derive(Parser, Debug)]
#[command(author, version, about = "Interactive demo shell for the cmdparse grammar engine", long_about = None)]
struct Args {
    /// Print a VM execution trace for each line to stderr
    #[arg(short, long)]
    trace: bool,

    /// Dump the compiled program before reading input
    #[arg(short, long)]
    dump: bool,
}

#[derive(Default)]
struct Session {
    files: Vec<String>,
    numbers: Vec<i64>,
    done: bool,
}

fn main() -> Result<()> {
    let args = Args::parse();

    let mut cmds = build_commands()?;
    cmds.compile();
    if args.trace {
        cmds.trace_execution_to(io::stderr());
    }
    if args.dump {
        cmds.program()
            .print(&mut io::stdout())
            .context("writing program listing")?;
    }

    let mut session = Session::default();
    for line in io::stdin().lock().lines() {
        let line = line.context("reading input")?;
        if !cmds.parse(&line, &mut session) {
            report_failure(&cmds, &line);
        }
        if session.done {
            break;
        }
    }

    Ok(())
}

fn build_commands() -> Result<Cmds<Session>> {
    let mut cmds = Cmds::new();

    cmds.add("load <file>*", |m, session: &mut Session| {
        let files: Vec<String> = m.var("file").iter().map(|v| v.value.clone()).collect();
        println!("loaded {} file(s)", files.len());
        session.files.extend(files);
    })?;

    cmds.add(
        "show results (source (scheduled | unscheduled | all))? detail?",
        |m, session: &mut Session| {
            let source = if m.keyword_present("scheduled") {
                "scheduled"
            } else if m.keyword_present("unscheduled") {
                "unscheduled"
            } else {
                "all"
            };
            print!("{} result(s) from {source} source(s)", session.files.len());
            if m.keyword_present("detail") {
                print!(": {}", session.files.join(", "));
            }
            println!();
        },
    )?;

    cmds.add("add <n:int>*", |m, session: &mut Session| {
        for var in m.var("n") {
            match var.value.parse::<i64>() {
                Ok(n) => session.numbers.push(n),
                Err(_) => println!("'{}' is not an int, skipped", var.value),
            }
        }
        let total: i64 = session.numbers.iter().sum();
        println!("running total: {total}");
    })?;

    cmds.add("clear logs?", |m, session: &mut Session| {
        session.numbers.clear();
        if !m.keyword_present("logs") {
            session.files.clear();
        }
        println!("cleared");
    })?;

    cmds.add("quit | exit", |_, session: &mut Session| {
        session.done = true;
        println!("bye");
    })?;

    Ok(cmds)
}

fn report_failure(cmds: &Cmds<Session>, line: &str) {
    let longest = cmds.longest_matches();
    if longest.len() < 2 {
        println!("?: '{line}' does not match any command");
        return;
    }

    println!("?: '{line}' is ambiguous between:");
    for m in &longest {
        let shape: Vec<String> = m
            .items()
            .iter()
            .map(|item| match item {
                MatchItem::Keyword(k) => k.name.clone(),
                MatchItem::Var(v) => format!("<{}:{}>", v.name, v.typ),
            })
            .collect();
        println!("    {}", shape.join(" "));
    }
}

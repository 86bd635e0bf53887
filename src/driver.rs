//! Drives a whole session: reads the grammar block, tries both parser
//! constructions, and dispatches to the matching interaction mode.

use crate::{
    analysis::{FirstSets, FollowSets},
    Grammar, Ll1Parser, SlrParser,
};

use log::debug;

use std::io::{BufRead, Write};

const PROMPT: &str = "Select a parser (T: for LL(1), B: for SLR(1), Q: quit):";

/// Runs a session over the given streams.
///
/// Malformed grammar input and I/O failures are the only errors; everything
/// after grammar construction recovers (conflicts select the dispatch case,
/// EOF terminates cleanly).
pub fn run(mut input: impl BufRead, mut output: impl Write) -> anyhow::Result<()> {
    let grammar = read_grammar(&mut input)?;
    debug!("parsed grammar:\n{}", grammar);

    let first = FirstSets::of_grammar(&grammar);
    let follow = FollowSets::of_grammar(&grammar, &first);

    let ll1 = match Ll1Parser::new(&grammar, &first, &follow) {
        Ok(parser) => Some(parser),
        Err(conflict) => {
            debug!("{}", conflict);
            None
        }
    };
    let slr = match SlrParser::new(&grammar, &follow) {
        Ok(parser) => Some(parser),
        Err(conflict) => {
            debug!("{}", conflict);
            None
        }
    };

    match (ll1, slr) {
        (Some(ll1), Some(slr)) => select_loop(&mut input, &mut output, &ll1, &slr)?,
        (Some(ll1), None) => {
            writeln!(output, "Grammar is LL(1).")?;
            parse_strings(&mut input, &mut output, |s| ll1.accepts(s))?;
        }
        (None, Some(slr)) => {
            writeln!(output, "Grammar is SLR(1).")?;
            parse_strings(&mut input, &mut output, |s| slr.accepts(s))?;
        }
        (None, None) => {
            writeln!(output, "Grammar is neither LL(1) nor SLR(1).")?;
        }
    }

    Ok(())
}

/// Reads the count line plus that many production lines and parses them.
///
/// Running out of input early is left to [`Grammar::parse`] to report, so
/// every malformed-grammar message has a single source.
fn read_grammar(input: &mut impl BufRead) -> anyhow::Result<Grammar> {
    let mut lines = Vec::new();

    if let Some(count_line) = read_line(input)? {
        let declared = count_line.trim().parse::<usize>().ok();
        lines.push(count_line);

        if let Some(declared) = declared {
            for _ in 0..declared {
                match read_line(input)? {
                    Some(line) => lines.push(line),
                    None => break,
                }
            }
        }
    }

    Ok(Grammar::parse(&lines)?)
}

fn select_loop(
    input: &mut impl BufRead,
    output: &mut impl Write,
    ll1: &Ll1Parser<'_>,
    slr: &SlrParser,
) -> anyhow::Result<()> {
    loop {
        writeln!(output, "{}", PROMPT)?;
        output.flush()?;

        let Some(line) = read_line(input)? else {
            return Ok(());
        };

        match line.trim() {
            "Q" | "q" => return Ok(()),
            "T" | "t" => parse_strings(input, output, |s| ll1.accepts(s))?,
            "B" | "b" => parse_strings(input, output, |s| slr.accepts(s))?,
            _ => continue,
        }
    }
}

/// Feeds trimmed lines to the recognizer until an empty line or EOF,
/// answering `yes` or `no` for each.
fn parse_strings(
    input: &mut impl BufRead,
    output: &mut impl Write,
    accepts: impl Fn(&str) -> bool,
) -> anyhow::Result<()> {
    loop {
        let Some(line) = read_line(input)? else {
            return Ok(());
        };

        let string = line.trim();
        if string.is_empty() {
            return Ok(());
        }

        writeln!(output, "{}", if accepts(string) { "yes" } else { "no" })?;
    }
}

/// Reads one line without its trailing newline; `None` on EOF.
fn read_line(input: &mut impl BufRead) -> std::io::Result<Option<String>> {
    let mut line = String::new();
    if input.read_line(&mut line)? == 0 {
        return Ok(None);
    }

    while line.ends_with('\n') || line.ends_with('\r') {
        line.pop();
    }

    Ok(Some(line))
}

//! Line-command protocol: directive parsing and session execution.
//!
//! Each input line maps to exactly one tree or analytics call; all result
//! formatting happens here, never inside the tree algorithms. Ranks render
//! with exactly three decimal places via [`Member`]'s `Display`.

use std::io::{BufRead, Write};

use itertools::Itertools;
use tracing::{debug, instrument, warn};

use crate::analytics::RankAnalytics;
use crate::errors::{TreeError, TreeResult};
use crate::member::Member;
use crate::tree::BalancedIndex;

/// One parsed command line.
#[derive(Debug, Clone, PartialEq)]
pub enum Directive {
    MemberIn(Member),
    MemberOut(Member),
    IntelTarget(Member, Member),
    IntelRank(Member),
    IntelDivide,
}

impl Directive {
    /// Parses a whitespace-separated command line. `line_no` is 1-based and
    /// only used for error reporting.
    pub fn parse(line: &str, line_no: usize) -> TreeResult<Directive> {
        let tokens: Vec<&str> = line.split_whitespace().collect();
        match tokens.as_slice() {
            ["MEMBER_IN", name, rank] => Ok(Directive::MemberIn(parse_member(name, rank, line_no)?)),
            ["MEMBER_OUT", name, rank] => {
                Ok(Directive::MemberOut(parse_member(name, rank, line_no)?))
            }
            ["INTEL_TARGET", name1, rank1, name2, rank2] => Ok(Directive::IntelTarget(
                parse_member(name1, rank1, line_no)?,
                parse_member(name2, rank2, line_no)?,
            )),
            ["INTEL_RANK", name, rank] => Ok(Directive::IntelRank(parse_member(name, rank, line_no)?)),
            ["INTEL_DIVIDE"] => Ok(Directive::IntelDivide),
            [] => Err(malformed(line_no, "empty command")),
            [verb, ..] => Err(malformed(
                line_no,
                &format!("unrecognized verb or argument count: {verb}"),
            )),
        }
    }
}

/// Seed line: bare `<name> <rank>` without a verb.
fn parse_seed(line: &str, line_no: usize) -> TreeResult<Member> {
    let tokens: Vec<&str> = line.split_whitespace().collect();
    match tokens.as_slice() {
        [name, rank] => parse_member(name, rank, line_no),
        _ => Err(malformed(line_no, "expected `<name> <rank>` seed line")),
    }
}

fn parse_member(name: &str, rank: &str, line_no: usize) -> TreeResult<Member> {
    let rank: f64 = rank
        .parse()
        .map_err(|_| malformed(line_no, &format!("invalid rank value: {rank}")))?;
    Ok(Member::new(name, rank))
}

fn malformed(line_no: usize, reason: &str) -> TreeError {
    TreeError::MalformedCommand {
        line: line_no,
        reason: reason.to_string(),
    }
}

/// Command loop over one input source: owns the roster and the result sink.
pub struct Session<W: Write> {
    index: BalancedIndex,
    out: W,
}

impl<W: Write> Session<W> {
    pub fn new(out: W) -> Self {
        Self {
            index: BalancedIndex::new(),
            out,
        }
    }

    /// The roster in its current state.
    pub fn index(&self) -> &BalancedIndex {
        &self.index
    }

    /// Reads and executes the whole script.
    ///
    /// The first line, if present, is a bare seed insert consumed before the
    /// command loop. Blank lines after it are skipped. A malformed line
    /// aborts the run; a `NotFound` from an INTEL query produces no result
    /// line and the loop continues.
    #[instrument(level = "debug", skip(self, input))]
    pub fn run(&mut self, input: impl BufRead) -> TreeResult<()> {
        let mut lines = input.lines().enumerate();
        if let Some((i, line)) = lines.next() {
            let seed = parse_seed(&line?, i + 1)?;
            self.apply(Directive::MemberIn(seed))?;
        }
        for (i, line) in lines {
            let line = line?;
            if line.trim().is_empty() {
                continue;
            }
            let directive = Directive::parse(&line, i + 1)?;
            self.apply(directive)?;
        }
        Ok(())
    }

    /// Executes one directive, writing its result line(s) to the sink.
    pub fn apply(&mut self, directive: Directive) -> TreeResult<()> {
        debug!("applying {:?}", directive);
        match directive {
            Directive::MemberIn(member) => {
                let newcomer = member.name.clone();
                for host in self.index.insert(member) {
                    writeln!(self.out, "{} welcomed {}", host.name, newcomer)?;
                }
            }
            Directive::MemberOut(member) => {
                if let Some(departure) = self.index.remove(&member) {
                    match departure.successor {
                        Some(successor) => writeln!(
                            self.out,
                            "{} left the family, replaced by {}",
                            departure.leaver.name, successor.name
                        )?,
                        None => writeln!(
                            self.out,
                            "{} left the family, replaced by nobody",
                            departure.leaver.name
                        )?,
                    }
                }
            }
            Directive::IntelTarget(x, y) => {
                let analytics = RankAnalytics::new(&self.index);
                match analytics.dual_containment(&x, &y) {
                    Ok(target) => writeln!(self.out, "Target Analysis Result: {target}")?,
                    Err(TreeError::NotFound(query)) => {
                        warn!("target analysis skipped, not contained: {query}");
                    }
                    Err(e) => return Err(e),
                }
            }
            Directive::IntelRank(member) => {
                let analytics = RankAnalytics::new(&self.index);
                match analytics.same_depth_siblings(&member) {
                    Ok(peers) => writeln!(
                        self.out,
                        "Rank Analysis Result: {}",
                        peers.iter().format(" ")
                    )?,
                    Err(TreeError::NotFound(query)) => {
                        warn!("rank analysis skipped, member absent: {query}");
                    }
                    Err(e) => return Err(e),
                }
            }
            Directive::IntelDivide => {
                let analytics = RankAnalytics::new(&self.index);
                let count = analytics.leaf_closure_partition();
                writeln!(self.out, "Division Analysis Result: {count}")?;
            }
        }
        Ok(())
    }

    /// Flushes the result sink.
    pub fn flush(&mut self) -> TreeResult<()> {
        self.out.flush()?;
        Ok(())
    }
}

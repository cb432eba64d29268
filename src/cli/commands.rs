use std::fs::File;
use std::io::{self, BufReader, BufWriter, Write};
use std::path::Path;

use clap::CommandFactory;
use clap_complete::generate;
use generational_arena::Index;
use termtree::Tree;
use tracing::{debug, instrument};

use crate::cli::args::{Cli, Commands};
use crate::errors::{TreeError, TreeResult};
use crate::script::Session;
use crate::tree::BalancedIndex;

pub fn execute_command(cli: &Cli) -> TreeResult<()> {
    match &cli.command {
        Some(Commands::Run { input, output }) => _run(input, output.as_deref()),
        Some(Commands::Tree { input }) => _tree(input),
        Some(Commands::Completion { shell }) => {
            _completion(*shell);
            Ok(())
        }
        None => Ok(()),
    }
}

#[instrument]
fn _run(input: &Path, output: Option<&Path>) -> TreeResult<()> {
    debug!("input: {:?}, output: {:?}", input, output);
    let reader = open_input(input)?;
    let sink: Box<dyn Write> = match output {
        Some(path) => Box::new(BufWriter::new(File::create(path)?)),
        None => Box::new(io::stdout()),
    };
    let mut session = Session::new(sink);
    session.run(reader)?;
    session.flush()?;
    Ok(())
}

#[instrument]
fn _tree(input: &Path) -> TreeResult<()> {
    let reader = open_input(input)?;
    let mut session = Session::new(io::sink());
    session.run(reader)?;
    match session.index().root() {
        Some(root) => crate::cli::output::info(&to_tree_string(session.index(), root)),
        None => crate::cli::output::info("empty roster"),
    }
    Ok(())
}

fn _completion(shell: clap_complete::Shell) {
    let mut cmd = Cli::command();
    let name = cmd.get_name().to_string();
    generate(shell, &mut cmd, name, &mut io::stdout());
}

fn open_input(path: &Path) -> TreeResult<BufReader<File>> {
    let file = File::open(path).map_err(|source| TreeError::InputUnavailable {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(BufReader::new(file))
}

/// Renders the hierarchy with the left child listed before the right.
fn to_tree_string(index: &BalancedIndex, idx: Index) -> Tree<String> {
    let node = index.node(idx);
    let leaves: Vec<_> = [node.left, node.right]
        .into_iter()
        .flatten()
        .map(|child| to_tree_string(index, child))
        .collect();
    Tree::new(node.member.to_string()).with_leaves(leaves)
}

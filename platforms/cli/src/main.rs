use anyhow::{bail, Context};
use clap::{Args, Parser, Subcommand};
use dfa::{
    accepted, derivation, encoder, final_state, steps, validate_with, AutomatonDefinition,
    AutomatonLoader, Catalog, Mode, SimError, State, Symbol, TransitionTriple, ValidationError,
};
use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// A deterministic finite automaton simulator.
#[derive(Parser)]
#[clap(author, version, about, long_about = None, arg_required_else_help = true)]
#[clap(after_help = "EXAMPLES:
  dfa-cli run -e \"Ends in 01\" 01 10 1101
  dfa-cli run -a automata/even-a.dfa --trace abba
  dfa-cli define --states p,q --alphabet a --start p --accept q --transition p,a,q --transition q,a,p aa aaa
  dfa-cli export --dir samples")]
struct Cli {
    #[clap(subcommand)]
    command: Command,

    /// Print debug logs to stderr (RUST_LOG takes precedence)
    #[clap(short, long, global = true)]
    verbose: bool,
}

/// Where the automaton comes from.
#[derive(Args)]
struct Source {
    /// Automaton definition file (.dfa, .json, .yaml/.yml, or .xml)
    #[clap(short, long, conflicts_with = "example")]
    automaton: Option<PathBuf>,

    /// Name of a built-in automaton (see `list`)
    #[clap(short, long)]
    example: Option<String>,

    /// Require the transition function to be total and deterministic
    #[clap(long)]
    strict: bool,
}

/// How each input is evaluated.
#[derive(Args)]
struct RunOptions {
    /// State to start from (defaults to the initial state)
    #[clap(short, long)]
    start: Option<State>,

    /// Accepting states to use instead of the automaton's own, comma-separated
    #[clap(long, value_delimiter = ',')]
    accepting: Option<Vec<State>>,

    /// Print each transition as it is taken
    #[clap(short, long)]
    trace: bool,
}

/// An automaton given entirely on the command line.
#[derive(Args)]
struct Definition {
    /// Display name
    #[clap(long)]
    name: Option<String>,

    /// States, comma-separated
    #[clap(long, required = true, value_delimiter = ',')]
    states: Vec<State>,

    /// Input symbols, comma-separated
    #[clap(long, required = true, value_delimiter = ',')]
    alphabet: Vec<Symbol>,

    /// Initial state
    #[clap(long)]
    start: State,

    /// Accepting states, comma-separated
    #[clap(long, value_delimiter = ',')]
    accept: Vec<State>,

    /// A transition as FROM,SYMBOL,TO (repeatable)
    #[clap(long = "transition", value_parser = parse_transition)]
    transitions: Vec<TransitionTriple>,

    /// Require the transition function to be total and deterministic
    #[clap(long)]
    strict: bool,
}

#[derive(Subcommand)]
enum Command {
    /// Run the automaton on one or more input strings
    Run {
        #[clap(flatten)]
        source: Source,

        #[clap(flatten)]
        options: RunOptions,

        /// Input strings to evaluate
        #[clap(required = true)]
        inputs: Vec<String>,
    },
    /// Print an automaton definition
    Show {
        #[clap(flatten)]
        source: Source,
    },
    /// Build an automaton from command-line flags, print it, and run it on any inputs
    Define {
        #[clap(flatten)]
        definition: Definition,

        /// Also write the definition to this file (format chosen by extension)
        #[clap(short, long)]
        output: Option<PathBuf>,

        /// Print each transition as it is taken
        #[clap(short, long)]
        trace: bool,

        /// Input strings to evaluate
        inputs: Vec<String>,
    },
    /// List the built-in automata
    List,
    /// Write the built-in automata to a directory as .dfa and .json files
    Export {
        /// Target directory
        #[clap(short, long, default_value = ".")]
        dir: PathBuf,
    },
    /// Read input strings from stdin and evaluate them one by one.
    /// A blank line ends the session; enter "" to test the empty string.
    Test {
        #[clap(flatten)]
        source: Source,

        #[clap(flatten)]
        options: RunOptions,
    },
}

fn main() -> anyhow::Result<ExitCode> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let stdout = io::stdout();
    let mut out = stdout.lock();

    match cli.command {
        Command::Run {
            source,
            options,
            inputs,
        } => {
            let automaton = load(&source)?;
            check_override(&automaton, &options)?;
            run_all(&automaton, &options, &inputs, &mut out)
        }
        Command::Show { source } => {
            let automaton = load(&source)?;
            writeln!(out, "{}", automaton)?;
            Ok(ExitCode::SUCCESS)
        }
        Command::Define {
            definition,
            output,
            trace,
            inputs,
        } => {
            let automaton = define(definition)?;
            writeln!(out, "{}", automaton)?;

            if let Some(path) = output {
                encoder::write(&automaton, &path)
                    .with_context(|| format!("failed to write {}", path.display()))?;
                writeln!(out, "Wrote {}", path.display())?;
            }

            let options = RunOptions {
                start: None,
                accepting: None,
                trace,
            };
            run_all(&automaton, &options, &inputs, &mut out)
        }
        Command::List => {
            list(&mut out)?;
            Ok(ExitCode::SUCCESS)
        }
        Command::Export { dir } => {
            let written = encoder::write_examples(&dir)
                .with_context(|| format!("failed to export examples to {}", dir.display()))?;

            for path in written {
                writeln!(out, "Wrote {}", path.display())?;
            }
            Ok(ExitCode::SUCCESS)
        }
        Command::Test { source, options } => {
            let automaton = load(&source)?;
            check_override(&automaton, &options)?;
            let stdin = io::stdin();
            let interactive = atty::is(atty::Stream::Stdin);

            writeln!(out, "{}", automaton)?;
            test_loop(&automaton, &options, stdin.lock(), &mut out, interactive)?;
            Ok(ExitCode::SUCCESS)
        }
    }
}

fn init_tracing(verbose: bool) {
    let default = if verbose { "debug" } else { "warn" };
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(default))
        .unwrap_or_else(|_| EnvFilter::new("warn"));

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(io::stderr))
        .with(env_filter)
        .init();
}

/// Resolves the automaton from a file or the catalog.
fn load(source: &Source) -> anyhow::Result<AutomatonDefinition> {
    let mode = if source.strict {
        Mode::Strict
    } else {
        Mode::Lenient
    };

    match (&source.automaton, &source.example) {
        (Some(path), _) => {
            tracing::debug!(path = %path.display(), ?mode, "loading automaton from file");
            AutomatonLoader::load(path, mode)
                .with_context(|| format!("failed to load {}", path.display()))
        }
        (None, Some(name)) => {
            tracing::debug!(%name, ?mode, "loading built-in automaton");
            let automaton = Catalog::get_by_name(name)?;
            validate_with(automaton, mode)?;
            Ok(automaton.clone())
        }
        (None, None) => bail!("specify an automaton with --automaton FILE or --example NAME"),
    }
}

/// Builds the automaton described by the `define` flags.
fn define(definition: Definition) -> anyhow::Result<AutomatonDefinition> {
    let mode = if definition.strict {
        Mode::Strict
    } else {
        Mode::Lenient
    };

    let mut builder = AutomatonDefinition::builder()
        .states(definition.states)
        .alphabet(definition.alphabet)
        .initial(definition.start)
        .accepting(definition.accept)
        .transitions(definition.transitions)
        .mode(mode);

    if let Some(name) = definition.name {
        builder = builder.name(name);
    }

    let automaton = builder.build().context("invalid automaton definition")?;
    tracing::debug!(transitions = automaton.transition_count(), "defined automaton");
    Ok(automaton)
}

/// Parses a `FROM,SYMBOL,TO` triple.
fn parse_transition(value: &str) -> Result<TransitionTriple, String> {
    let parts: Vec<&str> = value.split(',').map(str::trim).collect();

    let [from, symbol, to] = parts[..] else {
        return Err(format!("expected FROM,SYMBOL,TO but got '{}'", value));
    };

    let mut chars = symbol.chars();
    match (chars.next(), chars.next()) {
        (Some(symbol), None) if !from.is_empty() && !to.is_empty() => {
            Ok((from.to_string(), symbol, to.to_string()))
        }
        (Some(_), None) => Err(format!("empty state in '{}'", value)),
        _ => Err(format!("symbol '{}' must be a single character", symbol)),
    }
}

/// Rejects an accepting-state override that names undeclared states.
fn check_override(automaton: &AutomatonDefinition, options: &RunOptions) -> anyhow::Result<()> {
    if let Some(unknown) = options
        .accepting
        .iter()
        .flatten()
        .find(|state| !automaton.has_state(state))
    {
        return Err(ValidationError::UnknownAcceptingState(unknown.clone()))
            .context("invalid --accepting override");
    }

    Ok(())
}

/// Reports every input and maps the outcome to an exit code.
fn run_all(
    automaton: &AutomatonDefinition,
    options: &RunOptions,
    inputs: &[String],
    out: &mut impl Write,
) -> anyhow::Result<ExitCode> {
    let mut success = true;

    for input in inputs {
        success &= report(automaton, options, input, out)?;
    }

    Ok(if success {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    })
}

/// Prints final state, derivation, and acceptance for one input.
///
/// Returns `false` if the automaton could not process the input.
fn report(
    automaton: &AutomatonDefinition,
    options: &RunOptions,
    input: &str,
    out: &mut impl Write,
) -> io::Result<bool> {
    let start = options
        .start
        .as_deref()
        .unwrap_or(automaton.initial_state());

    writeln!(out, "Input '{}':", input)?;

    if options.trace {
        match steps(automaton, start, input) {
            Ok(run) => {
                for (i, step) in run.enumerate() {
                    match step {
                        Ok(step) => writeln!(out, "  Step {}: {}", i + 1, step)?,
                        Err(e) => writeln!(out, "  Step {}: {}", i + 1, e)?,
                    }
                }
            }
            Err(e) => writeln!(out, "  {}", e)?,
        }
    }

    let result = final_state(automaton, start, input).and_then(|state| {
        let trace = derivation(automaton, start, input)?;
        let verdict = accepted(automaton, start, input, options.accepting.as_deref())?;
        Ok((state, trace, verdict))
    });

    match result {
        Ok((state, trace, verdict)) => {
            writeln!(out, "  Final state: {}", state)?;
            if !options.trace {
                let steps: Vec<String> = trace.iter().map(ToString::to_string).collect();
                if steps.is_empty() {
                    writeln!(out, "  Derivation: (empty)")?;
                } else {
                    writeln!(out, "  Derivation: {}", steps.join(" "))?;
                }
            }
            writeln!(out, "  Accepted: {}", if verdict { "yes" } else { "no" })?;
            Ok(true)
        }
        Err(SimError::Transition(e)) => {
            writeln!(out, "  Error: {}", e)?;
            writeln!(out, "  The automaton is not defined for this input.")?;
            Ok(false)
        }
        Err(SimError::Validation(e)) => {
            writeln!(out, "  Error: {}", e)?;
            writeln!(out, "  The acceptance check could not run.")?;
            Ok(false)
        }
    }
}

fn list(out: &mut impl Write) -> anyhow::Result<()> {
    for index in 0..Catalog::count() {
        let info = Catalog::info(index)?;
        writeln!(
            out,
            "{:>2}. {} ({} states, {} symbols, {} accepting, {} transitions, start {})",
            info.index,
            info.name,
            info.state_count,
            info.symbol_count,
            info.accepting_count,
            info.transition_count,
            info.initial_state
        )?;
    }
    Ok(())
}

/// Evaluates strings read line by line until a blank line or end of input.
fn test_loop(
    automaton: &AutomatonDefinition,
    options: &RunOptions,
    input: impl BufRead,
    out: &mut impl Write,
    interactive: bool,
) -> io::Result<()> {
    let alphabet: Vec<String> = automaton.alphabet().iter().map(char::to_string).collect();
    writeln!(out, "Alphabet: {{{}}}", alphabet.join(", "))?;

    let mut lines = input.lines();

    loop {
        if interactive {
            write!(out, "> ")?;
            out.flush()?;
        }

        let Some(line) = lines.next().transpose()? else {
            break;
        };

        let line = line.trim();
        if line.is_empty() {
            break;
        }

        let word = if line == "\"\"" { "" } else { line };
        report(automaton, options, word, out)?;
    }

    Ok(())
}

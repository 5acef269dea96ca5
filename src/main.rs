use anyhow::bail;
use clap::Parser;
use deskcalc::keypad::{self, Input};
use deskcalc::CalculatorState;
use rustyline::error::ReadlineError;
use tracing::debug;
use tracing_subscriber::EnvFilter;

/// A keypad calculator for the terminal.
///
/// Type keys (digits, `+ - * /`, parentheses, `.`) and `=` to evaluate.
/// `<` or `back` deletes, `c` clears, `history` lists past results.
#[derive(Parser, Debug)]
#[command(version)]
struct Args {
    /// Print the full state as JSON after each line
    #[arg(long)]
    json: bool,

    /// Evaluate these expressions and exit instead of starting the keypad
    exprs: Vec<String>,
}

fn main() -> anyhow::Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();
    if args.exprs.is_empty() {
        interactive(args.json)
    } else {
        batch(&args.exprs, args.json)
    }
}

fn batch(exprs: &[String], json: bool) -> anyhow::Result<()> {
    let mut failed = 0;
    for expr in exprs {
        let state = CalculatorState::new().append(expr, false).evaluate();
        if state.error().is_empty() {
            println!("{} = {}", expr, state.buffer());
        } else {
            eprintln!("{}: {}", expr, state.error());
            failed += 1;
        }
        if json {
            println!("{}", serde_json::to_string(&state)?);
        }
    }
    if failed > 0 {
        bail!("{} of {} expressions failed", failed, exprs.len());
    }
    Ok(())
}

fn interactive(json: bool) -> anyhow::Result<()> {
    let mut rl = rustyline::Editor::<()>::new();
    let mut state = CalculatorState::new();
    println!("{}", state.display());
    loop {
        let readline = rl.readline("> ");
        match readline {
            Ok(line) => {
                rl.add_history_entry(line.as_str());
                let (input, unknown) = keypad::read_line(&line);
                for key in unknown {
                    debug!(key = %key.0, "unknown key skipped");
                    println!("no such key {:?}", key.0);
                }
                match input {
                    Input::Keys(commands) => {
                        state = commands
                            .into_iter()
                            .fold(state, |state, command| state.apply(command));
                    }
                    Input::History => {
                        for entry in state.history() {
                            println!("  {}", entry);
                        }
                        continue;
                    }
                    Input::Quit => break,
                }
                if json {
                    println!("{}", serde_json::to_string(&state)?);
                } else {
                    println!("{}", state.display());
                }
            }
            Err(ReadlineError::Interrupted) | Err(ReadlineError::Eof) => break,
            Err(err) => bail!("line editor failed: {}", err),
        }
    }
    Ok(())
}

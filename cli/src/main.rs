use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::process::exit;

use anyhow::{Context, Result};
use clap::Parser;
use log::error;
use rustyline::error::ReadlineError;
use rustyline::history::DefaultHistory;
use rustyline::{Config as EditorConfig, Editor};
use simplelog::{Config as LogConfig, LevelFilter, SimpleLogger};

mod repl;

use repl::{fixup_input, ReplHelper};
use vex::vex::VexError;
use vex::Vex;

const HISTORY_FILE: &str = ".vex_history";
const PROMPT: &str = "> ";

#[derive(Parser)]
#[command(name = "vex", about = "The vex programming language", version)]
struct Opt {
    /// Script to run; starts a REPL when omitted
    script: Option<PathBuf>,

    /// Show debug output
    #[arg(short, long)]
    debug: bool,
}

fn init_logging(debug: bool) -> Result<()> {
    let filter = if debug {
        LevelFilter::Debug
    } else {
        LevelFilter::Error
    };

    SimpleLogger::init(filter, LogConfig::default()).context("Failed to init logger")
}

/// Runs a script file to completion and reports the process exit code:
/// 0 on success, 65 for compile errors, 70 for a runtime error, 74 when
/// the file cannot be read.
fn run_file(path: &Path) -> i32 {
    let source = match fs::read_to_string(path) {
        Ok(source) => source,
        Err(err) => {
            eprintln!("vex: {}: {}", path.display(), err);
            return 74;
        }
    };

    let mut stdout = io::stdout();
    let mut vex = Vex::new(&mut stdout);
    match vex.run(&source, false) {
        Ok(()) => 0,
        Err(VexError::Compile(diagnostics)) => {
            for diagnostic in &diagnostics {
                eprintln!("{}", diagnostic);
            }
            65
        }
        Err(err @ VexError::Runtime(_)) => {
            eprintln!("{}", err);
            70
        }
    }
}

fn run_prompt() -> Result<()> {
    let config = EditorConfig::builder().auto_add_history(true).build();
    let mut editor: Editor<ReplHelper, DefaultHistory> =
        Editor::with_config(config).context("Failed to init line editor")?;
    editor.set_helper(Some(ReplHelper::new()));
    let _ = editor.load_history(HISTORY_FILE);

    welcome();

    // One pipeline for the whole session, so bindings survive across lines
    let mut stdout = io::stdout();
    let mut vex = Vex::new(&mut stdout);
    loop {
        match editor.readline(PROMPT) {
            Ok(line) => {
                if let Err(err) = vex.run(&fixup_input(&line), true) {
                    eprintln!("{}", err);
                }
            }
            Err(ReadlineError::Interrupted) => {
                eprintln!("Press Ctrl-D to quit");
            }
            Err(ReadlineError::Eof) => break,
            Err(err) => {
                error!("Unexpected readline error: {}", err);
                break;
            }
        }
    }

    editor
        .save_history(HISTORY_FILE)
        .context("Failed to save history")
}

fn welcome() {
    println!("vex v{}", env!("CARGO_PKG_VERSION"));
}

fn main() -> Result<()> {
    let opt = Opt::parse();
    init_logging(opt.debug)?;

    match opt.script {
        Some(path) => {
            let code = run_file(&path);
            if code != 0 {
                exit(code);
            }
        }
        None => run_prompt()?,
    }

    Ok(())
}

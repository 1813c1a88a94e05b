//! CLI tool to syntax-check Quick source files.

use std::fs;
use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Args, Parser, Subcommand};
use quick_syntax::config::{DEFAULT_MAX_NESTING, DEFAULT_MAX_TEXT_LEN, DEFAULT_MAX_TOKENS};
use quick_syntax::{Config, Summary};

#[derive(Parser)]
#[command(name = "quick")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Syntax checker for Quick source files", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Command,

    #[command(flatten)]
    limits: Limits,
}

#[derive(Subcommand)]
enum Command {
    /// Check that source files are syntactically well-formed
    #[command(after_help = "Example:\n  quick check 1.q")]
    Check {
        /// Print the token listing before parsing
        #[arg(long)]
        tokens: bool,

        #[arg(required = true)]
        files: Vec<PathBuf>,
    },
    /// Print the token listing of source files
    Tokens {
        #[arg(required = true)]
        files: Vec<PathBuf>,
    },
}

#[derive(Args)]
struct Limits {
    /// Token-stream capacity, counting the end marker
    #[arg(long, global = true, default_value_t = DEFAULT_MAX_TOKENS)]
    max_tokens: usize,

    /// Do not limit the number of tokens
    #[arg(long, global = true, conflicts_with = "max_tokens")]
    unbounded: bool,

    /// Longest identifier, string, or number accepted
    #[arg(long, global = true, default_value_t = DEFAULT_MAX_TEXT_LEN)]
    max_text_len: usize,

    /// Deepest expression or block nesting accepted
    #[arg(long, global = true, default_value_t = DEFAULT_MAX_NESTING)]
    max_nesting: usize,
}

impl Limits {
    const fn config(&self) -> Config {
        let config = Config::new()
            .max_text_len(self.max_text_len)
            .max_tokens(self.max_tokens)
            .max_nesting(self.max_nesting);
        if self.unbounded {
            config.unbounded()
        } else {
            config
        }
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    let config = cli.limits.config();

    let (files, show_tokens, check) = match &cli.command {
        Command::Check { tokens, files } => (files, *tokens, true),
        Command::Tokens { files } => (files, true, false),
    };

    let mut had_error = false;

    for path in files {
        let display = path.display();
        let content = match fs::read_to_string(path) {
            Ok(c) => c,
            Err(e) => {
                eprintln!("{display}: {e}");
                had_error = true;
                continue;
            }
        };

        let tokens = match quick_syntax::tokenize_with(&content, &config) {
            Ok(tokens) => tokens,
            Err(e) => {
                eprintln!("{display}: {e}");
                had_error = true;
                continue;
            }
        };

        if show_tokens {
            if files.len() > 1 {
                println!("==> {display} <==");
            }
            print!("{}", quick_syntax::format_tokens(&tokens));
        }

        if !check {
            continue;
        }

        match quick_syntax::parse_with(&tokens, &config) {
            Ok(summary) => eprintln!("{display}: syntax ok ({})", describe(&summary)),
            Err(e) => {
                eprintln!("{display}: {e}");
                had_error = true;
            }
        }
    }

    if had_error {
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    }
}

fn describe(summary: &Summary) -> String {
    let Summary {
        variables,
        functions,
        instructions,
    } = summary;
    format!(
        "{variables} variable(s), \
         {functions} function(s), \
         {instructions} instruction(s)"
    )
}

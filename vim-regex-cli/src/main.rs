//
// main.rs
// Copyright (C) 2022 matthew <matthew@matthew-VirtualBox>
// Distributed under terms of the MIT license.
//

use std::error::Error;
use std::process::ExitCode;

use clap::Parser;
use flexi_logger::{FileSpec, Logger};
use vim_regex::{CompileError, Options, VimRegex};

/// # Vim regex compiler
///
/// Translates a Vim-dialect pattern into host regex source and,
/// optionally, tests it against a line of input.
#[derive(Debug, Parser)]
#[clap(version, author, about)]
struct Args {
    /// The Vim pattern to compile
    pattern: String,
    /// A line of text to test the compiled pattern against
    text: Option<String>,
    /// Flag characters, e.g. "gi"
    #[clap(short, long, default_value = "")]
    flags: String,
    #[clap(long)]
    ignorecase: bool,
    #[clap(long)]
    smartcase: bool,
    #[clap(long)]
    nomagic: bool,
}

fn main() -> Result<ExitCode, Box<dyn Error>> {
    let _logger = Logger::try_with_env()?.log_to_file(FileSpec::try_from("./vim-regex.log")?).start()?;
    let args = Args::parse();

    let options = Options {
        flags: args.flags,
        ignorecase: args.ignorecase,
        smartcase: args.smartcase,
        magic: !args.nomagic,
        ..Options::default()
    };

    match VimRegex::compile(&args.pattern, options) {
        Ok(re) => {
            println!("{}", re.compiled_source());
            if let Some(text) = args.text {
                if re.is_match(&text) {
                    println!("match");
                } else {
                    println!("no match");
                    return Ok(ExitCode::FAILURE);
                }
            }
            Ok(ExitCode::SUCCESS)
        }
        Err(err) => {
            log::error!("{err}");
            print_caret(&err);
            Ok(ExitCode::FAILURE)
        }
    }
}

fn print_caret(err: &CompileError) {
    eprintln!("{}", err.render_caret());
}

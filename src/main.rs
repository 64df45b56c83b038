use clap::Parser;

mod commands;
mod output;

use commands::generate::{self, GenerateArgs};

/// Generate setup.py for a Python distribution from a template.
///
/// `--version` sets the package version, so this binary has no version flag
/// of its own.
#[derive(Parser)]
#[command(name = "setupgen")]
#[command(about = "Generate setup.py from a template and a Maven pom.xml")]
struct Cli {
    #[command(flatten)]
    args: GenerateArgs,
}

fn main() -> std::process::ExitCode {
    let cli = Cli::parse();
    let json = cli.args.json;

    match generate::run(cli.args) {
        Ok((data, exit_code)) => {
            if json {
                if let Err(err) = output::print_success(data) {
                    return report(err);
                }
            }
            std::process::ExitCode::from(exit_code_to_u8(exit_code))
        }
        Err(err) => report(err),
    }
}

fn report(err: setupgen::Error) -> std::process::ExitCode {
    let exit_code = output::exit_code_for_error(err.code);
    if output::print_error(&err).is_err() {
        eprintln!("{}", err);
    }
    std::process::ExitCode::from(exit_code_to_u8(exit_code))
}

fn exit_code_to_u8(code: i32) -> u8 {
    if code <= 0 {
        0
    } else if code >= 255 {
        255
    } else {
        code as u8
    }
}

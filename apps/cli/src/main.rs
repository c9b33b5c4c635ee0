use std::process::ExitCode;

fn main() -> ExitCode {
    kosh_cli::run()
}

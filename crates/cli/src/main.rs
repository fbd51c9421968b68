use std::process::ExitCode;

fn main() -> ExitCode {
    fuelquote_cli::run()
}

use std::process::ExitCode;

fn main() -> ExitCode {
    six_cities::run()
}

use std::process::ExitCode;

use patchbox::ui::output;

fn main() -> ExitCode {
    match patchbox::cli::run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            output::error(format!("{:#}", e));
            ExitCode::FAILURE
        }
    }
}

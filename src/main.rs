use chip8vm::{Args, Core, Parser};

use log::error;
use std::process::ExitCode;

fn main() -> ExitCode {
    env_logger::init();

    let args = Args::parse();

    match Core::new(args).and_then(|mut core| core.run()) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            error!("{}", err);
            ExitCode::FAILURE
        }
    }
}

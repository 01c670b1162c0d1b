use log::error;

use plum_board::console::console_top::run_stdio_loop;

fn main() {
    env_logger::init();

    if let Err(err) = run_stdio_loop() {
        error!("console loop failed: {err}");
        std::process::exit(1);
    }
}

use std::io;

fn main() -> anyhow::Result<()> {
    env_logger::init();

    let stdin = io::stdin();
    let stdout = io::stdout();

    gramcheck::driver::run(stdin.lock(), stdout.lock())
}

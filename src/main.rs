// Entrypoint for the CLI application.
// - Keeps `main` small: load config, start logging, create the store
//   client and hand it to the UI loop.
// - Returns `anyhow::Result` so fatal errors end the process with a message.

use cidwalk::{api::ApiClient, config::Config, logging, ui::main_menu};

fn main() -> anyhow::Result<()> {
    // `IPFS_API_URL` and friends; see `config::Config::from_env`.
    let config = Config::from_env();

    // The tool works without a log file, so a logging failure is only reported.
    if let Err(err) = logging::init(&config) {
        eprintln!("Logging disabled: {err:#}");
    }

    let api = ApiClient::new(&config)?;

    // Start the interactive menu. This call blocks until the user exits.
    main_menu(&api, &config)?;
    Ok(())
}

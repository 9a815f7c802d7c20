mod cli;
mod input;
mod repl;
mod server;
mod signal;
mod startup;

use std::process::ExitCode;

use cli::Command;
use gemchat_common::GemchatError;

#[tokio::main]
async fn main() -> ExitCode {
    // Load .env file before anything reads the environment
    startup::load_dotenv();

    let args = cli::parse();

    // Config is read first so its log level can seed the subscriber
    let config = gemchat_config::load_config(args.config.as_deref());
    let directive = startup::log_directive(args.log_level.as_deref(), config.as_ref().ok());
    startup::init_logging(&directive);

    tracing::info!("gemchat v{} starting...", env!("CARGO_PKG_VERSION"));

    let mut config = match config {
        Ok(config) => config,
        Err(e) => {
            tracing::error!("failed to load config: {e}");
            return ExitCode::FAILURE;
        }
    };

    let session = match startup::build_session(&config) {
        Ok(session) => session,
        Err(e) => {
            tracing::error!("failed to start session: {e}");
            return ExitCode::FAILURE;
        }
    };
    tracing::info!(model = %session.model(), "session ready");

    let timeout = config.exchange.timeout();
    let result: Result<(), GemchatError> = match args.command() {
        Command::Chat => repl::run_stdio(&session, timeout).await.map(|_| ()),
        Command::Ask { text } => {
            repl::ask(&session, &text.join(" "), timeout, tokio::io::stdout()).await
        }
        Command::Serve { host, port } => {
            if let Some(host) = host {
                config.server.host = host;
            }
            if let Some(port) = port {
                config.server.port = port;
            }
            let addr = config.server.bind_addr();
            server::serve(server::AppState::new(session, timeout), &addr).await
        }
    };

    let code = match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!("{e}");
            ExitCode::FAILURE
        }
    };
    tracing::info!("Shutdown complete");
    code
}

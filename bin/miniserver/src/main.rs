use mini_probe::{ListenConfig, Operator, ProbeServer, DEFAULT_LISTEN_ADDR, DEFAULT_LISTEN_PORT};
use tokio::sync::broadcast;
use tracing::Level;
use tracing_subscriber::FmtSubscriber;

type BoxedError = Box<dyn std::error::Error + Send + Sync + 'static>;

fn command() -> clap::Command {
    clap::Command::new("miniserver")
        .about("Serves a plain text report of the connection, headers and environment it sees")
        .arg(
            clap::Arg::new("addr")
                .long("addr")
                .env("MINISERVER_ADDR")
                .action(clap::ArgAction::Set)
                .value_parser(clap::value_parser!(String))
                .default_value(DEFAULT_LISTEN_ADDR),
        )
        .arg(
            clap::Arg::new("port")
                .long("port")
                .env("MINISERVER_PORT")
                .action(clap::ArgAction::Set)
                .value_parser(clap::value_parser!(u16))
                .default_value("8080"),
        )
}

fn listen_config(args: &clap::ArgMatches) -> ListenConfig {
    let addr = args
        .get_one::<String>("addr")
        .cloned()
        .unwrap_or_else(|| String::from(DEFAULT_LISTEN_ADDR));

    let port = args
        .get_one::<u16>("port")
        .copied()
        .unwrap_or(DEFAULT_LISTEN_PORT);

    ListenConfig::new(addr, port)
}

#[tokio::main]
async fn main() -> std::result::Result<(), BoxedError> {
    let config = listen_config(&command().get_matches());

    let max_level = if cfg!(feature = "debug_trace") {
        Level::TRACE
    } else {
        Level::INFO
    };
    let subscriber = FmtSubscriber::builder().with_max_level(max_level).finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let server = ProbeServer::bind(&config).await?.shared();
    let local_addr = server.local_addr()?;
    mini_trace::info!("Serving diagnostic report on http://{}/", local_addr);

    let (cancel_sender, cancel_receiver) = broadcast::channel::<()>(1);

    ctrlc::set_handler(move || {
        if cancel_sender.send(()).is_err() {
            mini_trace::warn!("Server already stopped before shutdown signal");
        }
    })?;

    server.run(cancel_receiver).await??;

    mini_trace::info!("Shut down");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_to_all_interfaces() {
        let matches = command()
            .try_get_matches_from(["miniserver"])
            .expect("no arguments are required");

        let config = listen_config(&matches);
        assert_eq!(config.addr, DEFAULT_LISTEN_ADDR);
        assert_eq!(config.port, DEFAULT_LISTEN_PORT);
    }

    #[test]
    fn reads_listen_address_from_flags() {
        let matches = command()
            .try_get_matches_from(["miniserver", "--addr", "127.0.0.1", "--port", "9090"])
            .expect("flags should parse");

        assert_eq!(listen_config(&matches).to_string(), "127.0.0.1:9090");
    }

    #[test]
    fn rejects_out_of_range_ports() {
        let parsed = command().try_get_matches_from(["miniserver", "--port", "70000"]);
        assert!(parsed.is_err());
    }
}

use clap::{Parser, Subcommand};
use eyre::eyre;
use pon_beacon_client::BeaconClient;
use pon_common::{utils::init_tracing_log, PonConfig, StartConfig};
use tracing::{debug, error};
use url::Url;

use crate::commands::{BlindArgs, InputArgs};

mod commands;

#[derive(Parser, Debug)]
#[command(name = "pon-codec", version, about = "Versioned consensus container codec")]
struct Cli {
    #[clap(flatten)]
    start: StartConfig,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// JSON or hex SSZ in, JSON out.
    Decode(InputArgs),
    /// JSON in, hex SSZ out.
    Encode(InputArgs),
    /// Hash tree root of the input.
    Root(InputArgs),
    /// Signed beacon block in, signed blinded beacon block out.
    Blind(BlindArgs),
    /// Fork-agnostic base JSON in, versioned JSON for `--fork` out.
    Construct(InputArgs),
    /// Versioned JSON in, fork-agnostic base JSON out.
    Extract(InputArgs),
    /// Fetch the genesis from a beacon node.
    Genesis {
        /// Overrides `beacon_client.url` from the config file.
        #[arg(long)]
        url: Option<Url>,
    },
}

#[tokio::main]
async fn main() -> eyre::Result<()> {
    let cli = Cli::parse();
    let config = PonConfig::load(&cli.start)?;
    let _guard = init_tracing_log(&config.logging)?;

    debug!(command = ?cli.command, default_fork = ?config.default_fork, "starting pon-codec");

    match run(cli.command, &config).await {
        Ok(output) => {
            println!("{output}");
            Ok(())
        }
        Err(err) => {
            error!(%err, "command failed");
            Err(err)
        }
    }
}

async fn run(command: Command, config: &PonConfig) -> eyre::Result<String> {
    match command {
        Command::Decode(args) => {
            let text = commands::read_input(args.input.as_ref())?;
            commands::decode(&args, &text, args.fork.or(config.default_fork))
        }
        Command::Encode(args) => {
            let text = commands::read_input(args.input.as_ref())?;
            commands::encode(&args, &text, args.fork.or(config.default_fork))
        }
        Command::Root(args) => {
            let text = commands::read_input(args.input.as_ref())?;
            commands::root(&args, &text, args.fork.or(config.default_fork))
        }
        Command::Blind(args) => {
            let text = commands::read_input(args.input.as_ref())?;
            commands::blind(&text, args.fork.or(config.default_fork))
        }
        Command::Construct(args) => {
            let text = commands::read_input(args.input.as_ref())?;
            commands::construct(&args, &text, args.fork.or(config.default_fork))
        }
        Command::Extract(args) => {
            let text = commands::read_input(args.input.as_ref())?;
            commands::extract(&args, &text, args.fork.or(config.default_fork))
        }
        Command::Genesis { url } => {
            let url = url
                .or_else(|| config.beacon_client.as_ref().map(|beacon| beacon.url.clone()))
                .ok_or_else(|| eyre!("no beacon node url, pass --url or set beacon_client.url"))?;
            let client = BeaconClient::new(reqwest::Client::new(), url);
            commands::genesis(&client).await
        }
    }
}

#[cfg(test)]
mod tests {
    use pon_types::ForkVersion;

    use super::*;
    use crate::commands::Kind;

    #[test]
    fn test_parse_decode() {
        let cli = Cli::try_parse_from([
            "pon-codec",
            "--config",
            "relay.yml",
            "decode",
            "--kind",
            "signed-beacon-block",
            "--fork",
            "2",
            "--ssz",
            "block.hex",
        ])
        .unwrap();

        assert_eq!(cli.start.config, "relay.yml");
        match cli.command {
            Command::Decode(args) => {
                assert_eq!(args.kind, Kind::SignedBeaconBlock);
                assert_eq!(args.fork, Some(ForkVersion::Capella));
                assert!(args.ssz);
                assert_eq!(args.input.unwrap().to_str(), Some("block.hex"));
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn test_parse_defaults() {
        let cli = Cli::try_parse_from(["pon-codec", "root", "--kind", "builder-bid"]).unwrap();
        assert_eq!(cli.start.config, "config.yml");
        match cli.command {
            Command::Root(args) => {
                assert_eq!(args.kind, Kind::BuilderBid);
                assert_eq!(args.fork, None);
                assert!(args.input.is_none());
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn test_parse_rejects_unknown_fork() {
        let res = Cli::try_parse_from([
            "pon-codec",
            "decode",
            "--kind",
            "execution-payload",
            "--fork",
            "electra",
        ]);
        assert!(res.is_err());
    }

    #[tokio::test]
    async fn test_genesis_needs_url() {
        let res = run(Command::Genesis { url: None }, &PonConfig::default()).await;
        assert!(res.is_err());
    }
}

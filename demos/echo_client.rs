// ABOUTME: Example client demonstrating typed sends and filtered event streams
// ABOUTME: Connects to a WebSocket echo server, sends chat messages and prints the typed replies

use clap::Parser;
use futures_util::StreamExt;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use wsplex::{ClientConfig, Dispatcher, Event, NarrowExt, ProtocolClient};

#[derive(Debug, Clone, Serialize, Deserialize)]
struct Chat {
    from: String,
    text: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct Ping {
    seq: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", content = "payload")]
enum Envelope {
    #[serde(rename = "chat")]
    Chat(Chat),

    #[serde(rename = "ping")]
    Ping(Ping),
}

wsplex::narrow_variants!(Envelope {
    Chat => Chat,
    Ping => Ping,
});

/// wsplex echo client
#[derive(Parser, Debug)]
#[command(name = "echo_client")]
#[command(about = "Send typed messages to a WebSocket echo server", long_about = None)]
struct Args {
    /// WebSocket URL of the echo server [default: config url, else ws://127.0.0.1:8080]
    #[arg(short, long)]
    server: Option<String>,

    /// Optional TOML config file; --server overrides its url
    #[arg(short, long)]
    config: Option<std::path::PathBuf>,

    /// Number of chat messages to send
    #[arg(short = 'n', long, default_value_t = 3)]
    count: u32,
}

/// Config file settings, with the url replaced only when --server was given
fn resolve_config(toml: Option<&str>, server: Option<&str>) -> Result<ClientConfig, wsplex::Error> {
    let mut config = match toml {
        Some(text) => ClientConfig::from_toml_str(text)?,
        None => ClientConfig::default(),
    };
    if let Some(server) = server {
        config.url = server.to_string();
    }
    Ok(config)
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();

    let args = Args::parse();

    let toml = match &args.config {
        Some(path) => Some(std::fs::read_to_string(path)?),
        None => None,
    };
    let config = resolve_config(toml.as_deref(), args.server.as_deref())?;

    let client_id = uuid::Uuid::new_v4().to_string();

    println!("Connecting to {}...", config.url);
    let client = ProtocolClient::<Envelope>::connect_json(config).await?;
    println!("Connected as {}", client_id);

    let (transport, sender, events) = client.split();

    let dispatcher = Dispatcher::<Envelope>::new();
    let mut chats = dispatcher.subscribe().narrow::<Chat>();
    let pings = dispatcher.subscribe().narrow::<Ping>();
    let mut lifecycle = dispatcher.subscribe();
    tokio::spawn(dispatcher.clone().run(events));

    for seq in 0..args.count {
        let chat = Envelope::Chat(Chat {
            from: client_id.clone(),
            text: format!("hello #{}", seq),
        });
        if !sender.send_object(chat).await? {
            eprintln!("Transport rejected message {}", seq);
        }
        sender.send_object(Envelope::Ping(Ping { seq })).await?;
    }

    for _ in 0..args.count {
        match tokio::time::timeout(Duration::from_secs(5), chats.next()).await {
            Ok(Some(chat)) => println!("chat from {}: {}", chat.from, chat.text),
            Ok(None) => break,
            Err(_) => {
                eprintln!("Timed out waiting for echo");
                break;
            }
        }
    }

    transport.close();

    while let Some(event) = lifecycle.next().await {
        if let Event::Closed(reason) = &event {
            println!("Closed: {} {}", reason.code, reason.reason);
        }
        if let Event::Failure(e) = &event {
            eprintln!("Connection failed: {}", e);
        }
    }

    let seen: Vec<Ping> = pings.collect().await;
    println!("Received {} pings back", seen.len());

    Ok(())
}

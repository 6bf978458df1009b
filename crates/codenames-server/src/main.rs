//! Codenames server binary.
//!
//! Configuration comes from the environment:
//!
//! - `CODENAMES_ADDR`: listen address (default `0.0.0.0:8080`)
//! - `CODENAMES_WORDS_URL`: fetch board words from this JSON service
//!   instead of the built-in list
//! - `CODENAMES_IDLE_TIMEOUT_SECS`: seconds of silence before a
//!   connection is dropped
//! - `CODENAMES_REJECT_DUPLICATE_ROOMS`: `1` or `true` to refuse a room
//!   id that is already taken
//! - `RUST_LOG`: log filter (default `info`)

use std::time::Duration;

use codenames::prelude::*;
use tracing_subscriber::EnvFilter;

const DEFAULT_ADDR: &str = "0.0.0.0:8080";

#[tokio::main]
async fn main() -> Result<(), CodenamesError> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()),
        )
        .init();

    let addr = std::env::var("CODENAMES_ADDR").unwrap_or_else(|_| DEFAULT_ADDR.to_string());
    let builder = CodenamesServerBuilder::new()
        .bind(&addr)
        .room_config(room_config())
        .session_config(session_config());

    match std::env::var("CODENAMES_WORDS_URL") {
        Ok(url) => {
            tracing::info!(%url, "drawing board words from remote service");
            builder.build(HttpWordSource::new(url)).await?.run().await
        }
        Err(_) => {
            tracing::info!("drawing board words from built-in list");
            builder.build(WordList::builtin()).await?.run().await
        }
    }
}

fn room_config() -> RoomConfig {
    let reject = std::env::var("CODENAMES_REJECT_DUPLICATE_ROOMS")
        .map(|v| matches!(v.trim().to_ascii_lowercase().as_str(), "1" | "true"))
        .unwrap_or(false);
    RoomConfig {
        collision: if reject {
            CollisionPolicy::Reject
        } else {
            CollisionPolicy::Overwrite
        },
        ..RoomConfig::default()
    }
}

fn session_config() -> SessionConfig {
    let defaults = SessionConfig::default();
    let Ok(raw) = std::env::var("CODENAMES_IDLE_TIMEOUT_SECS") else {
        return defaults;
    };
    match raw.trim().parse::<u64>() {
        Ok(secs) if secs > 0 => {
            let idle_timeout = Duration::from_secs(secs);
            SessionConfig {
                idle_timeout,
                ping_interval: idle_timeout * 9 / 10,
                ..defaults
            }
        }
        _ => {
            tracing::warn!(value = %raw, "ignoring invalid CODENAMES_IDLE_TIMEOUT_SECS");
            defaults
        }
    }
}

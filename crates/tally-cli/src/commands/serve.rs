//! Server command implementation

use std::path::Path;

use anyhow::Result;

use super::open_advisor;

pub async fn cmd_serve(config: Option<&Path>, host: &str, port: u16, no_auth: bool) -> Result<()> {
    println!("🚀 Starting Tally web server...");
    println!("   Listening: http://{}:{}", host, port);

    let server_config = tally_server::ServerConfig::from_env(!no_auth);

    if no_auth {
        println!();
        println!("   ⚠️  Authentication DISABLED - do not expose to network!");
    } else if server_config.api_keys.is_empty() {
        println!("   ❌ Authentication required but no API keys configured");
        println!("      Set TALLY_API_KEYS or use --no-auth for local development");
    } else {
        println!(
            "   🔑 API keys: {} configured (TALLY_API_KEYS)",
            server_config.api_keys.len()
        );
    }
    if !server_config.allowed_origins.is_empty() {
        println!(
            "   🌐 CORS origins: {} (TALLY_CORS_ORIGINS)",
            server_config.allowed_origins.join(", ")
        );
    }
    println!();
    println!("   Press Ctrl+C to stop");

    let advisor = open_advisor(config)?;
    tally_server::serve(advisor, host, port, server_config).await?;

    Ok(())
}

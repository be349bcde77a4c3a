//! Verification code demo
//!
//! Issues a code through the configured stack and verifies it.
//!
//! ```text
//! ENVIRONMENT=development cargo run -p vc_infra --example verification_demo -- 15801088210
//! ```

use std::io::{self, BufRead, Write};

use anyhow::Context;
use vc_infra::{initialize, load_config, telemetry::init_tracing};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = load_config()?;
    init_tracing(&config.logging);

    let target = std::env::args()
        .nth(1)
        .context("usage: verification_demo <phone number>")?;

    let infra = initialize(&config).await?;
    if infra.inbound_limited("demo").await? {
        anyhow::bail!("too many requests");
    }
    let service = infra.verification_service();

    service.send_code("login", &target).await?;
    println!("Code sent to {} via {}", target, infra.notifier.provider_name());

    print!("Enter the code: ");
    io::stdout().flush()?;
    let mut input = String::new();
    io::stdin().lock().read_line(&mut input)?;

    if service.verify_code("login", &target, input.trim()).await? {
        println!("Verified");
    } else {
        println!("Wrong code");
    }
    Ok(())
}

//! Users Demo
//!
//! Three routes sharing one flattened path input:
//!
//! ```text
//! POST   /users        body {name, email, age}      → created user
//! GET    /users/{id}   ?name=&email=&age=           → user
//! DELETE /users/{id}                                → 204
//! ```
//!
//! # Usage
//!
//! ```bash
//! cargo run --package users-demo -- --config rivet.toml
//! curl 'localhost:8000/users/7?name=Ann'
//! ```

mod users;

use std::path::PathBuf;

use clap::Parser;
use rivet::prelude::*;

#[derive(Parser, Debug)]
#[command(about = "Serve the users demo")]
struct Args {
    /// Configuration file to load instead of searching for `rivet.toml`.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Configuration profile (development, production or a custom name).
    #[arg(short, long)]
    profile: Option<String>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let mut builder = RivetApp::builder();
    if let Some(path) = args.config {
        builder = builder.config_file(path);
    }
    if let Some(profile) = args.profile {
        builder = builder.profile(profile);
    }

    let mut app = builder.build()?;
    users::register(&mut app);

    info!(routes = app.route_count(), "Starting users demo");
    app.run().await?;

    Ok(())
}

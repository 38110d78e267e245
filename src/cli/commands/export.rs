//! Export command implementation.
//!
//! Downloads the selected registry sheets as one file.

use crate::api::KontoClient;
use crate::cli::{Cli, ExportArgs};
use crate::error::Result;

/// Run the export command.
pub async fn run(cli: &Cli, args: &ExportArgs) -> Result<()> {
    let config = cli.load_config()?;
    let dir = args
        .dir
        .clone()
        .unwrap_or_else(|| config.export.target_dir());
    let client = KontoClient::from_config(config, cli.auth())?;

    let path = client.export_into(&args.ids, &dir).await?;

    if cli.json {
        println!("{}", serde_json::json!({ "path": path, "sheets": args.ids }));
    } else {
        println!("Exported {} sheet(s) to {}", args.ids.len(), path.display());
    }
    Ok(())
}

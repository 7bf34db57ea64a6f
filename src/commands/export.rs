//! Export the content document as `data.json`

use anyhow::Result;
use std::path::Path;

use crate::Paintyard;

/// Write the snapshot to `output`, or print it when no path is given.
///
/// Commit the exported file as the site's `data.json` to make edits
/// permanent across machines.
pub async fn run(site: &Paintyard, output: Option<&Path>) -> Result<()> {
    let store = site.load_store().await?;

    match output {
        Some(path) => {
            store.export_to(path)?;
            println!("Exported to {:?}", path);
        }
        None => println!("{}", store.export_snapshot()?),
    }

    Ok(())
}

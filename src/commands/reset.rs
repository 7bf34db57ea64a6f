//! Clear stored content edits

use anyhow::Result;

use crate::Paintyard;

/// Back up and delete the durable slot. The next load bootstraps from
/// `data.json` again.
pub fn run(site: &Paintyard) -> Result<()> {
    let slot = site.durable_slot();

    if let Some(backup) = slot.backup()? {
        tracing::info!("Backed up stored content to {:?}", backup);
    }

    let mut store = site.open_store()?;
    store.reset()?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::DurableBackend;

    #[test]
    fn test_reset_clears_slot() {
        let dir = tempfile::tempdir().unwrap();
        let site = Paintyard::new(dir.path()).unwrap();
        site.durable_slot().put("{}").unwrap();

        run(&site).unwrap();
        assert!(site.durable_slot().get().unwrap().is_none());

        let backups = std::fs::read_dir(&site.data_dir)
            .unwrap()
            .filter_map(|e| e.ok())
            .filter(|e| e.file_name().to_string_lossy().ends_with(".bak.json"))
            .count();
        assert_eq!(backups, 1);
    }

    #[test]
    fn test_reset_without_content() {
        let dir = tempfile::tempdir().unwrap();
        let site = Paintyard::new(dir.path()).unwrap();
        run(&site).unwrap();
    }
}

//! Add, edit and remove brands and articles

use anyhow::Result;
use std::io::{self, BufRead, Write};

use crate::content::{Article, Brand, ItemForm, ListEntry, ListName};
use crate::{Paintyard, SiteStore};

/// Validate `form` and upsert it into `list`. Returns the entry's id.
///
/// Nothing is written when validation fails.
pub fn save_item(store: &mut SiteStore, list: ListName, form: &ItemForm) -> Result<u64> {
    match list {
        ListName::Brands => upsert(store, form.id, form.brand()?),
        ListName::Articles => upsert(store, form.id, form.article()?),
    }
}

fn upsert<T: ListEntry>(store: &mut SiteStore, id: Option<u64>, item: T) -> Result<u64> {
    let (assigned, _) = store.upsert_list_item(id, item)?;
    Ok(assigned)
}

/// Remove entry `id` from `list`
pub fn remove_item(store: &mut SiteStore, list: ListName, id: u64) -> Result<()> {
    match list {
        ListName::Brands => store.remove_list_item::<Brand>(id)?,
        ListName::Articles => store.remove_list_item::<Article>(id)?,
    };
    Ok(())
}

/// Run the upsert command
pub async fn save(site: &Paintyard, list: ListName, form: &ItemForm) -> Result<()> {
    let mut store = site.load_store().await?;
    let id = save_item(&mut store, list, form)?;
    println!("Saved {} entry {}", list, id);
    Ok(())
}

/// Run the remove command, asking for confirmation unless `yes` is set
pub async fn remove(site: &Paintyard, list: ListName, id: u64, yes: bool) -> Result<()> {
    if !yes {
        let prompt = format!("Remove {} entry {}? [y/N] ", list, id);
        if !confirm(&prompt, io::stdin().lock(), io::stdout())? {
            println!("Cancelled");
            return Ok(());
        }
    }

    let mut store = site.load_store().await?;
    remove_item(&mut store, list, id)?;
    println!("Removed {} entry {}", list, id);
    Ok(())
}

/// Ask a yes/no question; anything but "y"/"yes" is a no
pub fn confirm<R: BufRead, W: Write>(prompt: &str, mut input: R, mut output: W) -> Result<bool> {
    write!(output, "{}", prompt)?;
    output.flush()?;

    let mut answer = String::new();
    input.read_line(&mut answer)?;
    Ok(matches!(
        answer.trim().to_lowercase().as_str(),
        "y" | "yes"
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn site_with(data: &str) -> (tempfile::TempDir, Paintyard) {
        let dir = tempfile::tempdir().unwrap();
        let site = Paintyard::new(dir.path()).unwrap();
        fs::create_dir_all(&site.site_dir).unwrap();
        fs::write(site.site_dir.join("data.json"), data).unwrap();
        (dir, site)
    }

    #[tokio::test]
    async fn test_save_item_assigns_and_replaces() {
        let (_dir, site) = site_with(
            r#"{"brands": [{"id": 1, "name": "A", "description": "a", "image": ""},
                           {"id": 3, "name": "B", "description": "b", "image": ""}]}"#,
        );
        let mut store = site.load_store().await.unwrap();

        let form = ItemForm {
            name: "X".to_string(),
            description: "Y".to_string(),
            ..Default::default()
        };
        assert_eq!(save_item(&mut store, ListName::Brands, &form).unwrap(), 4);

        let form = ItemForm {
            id: Some(1),
            name: "A2".to_string(),
            description: "a".to_string(),
            ..Default::default()
        };
        assert_eq!(save_item(&mut store, ListName::Brands, &form).unwrap(), 1);
        assert_eq!(store.document().unwrap().brands[0].name, "A2");

        let form = ItemForm {
            id: Some(40),
            name: "C".to_string(),
            description: "c".to_string(),
            ..Default::default()
        };
        assert_eq!(save_item(&mut store, ListName::Brands, &form).unwrap(), 5);
        assert_eq!(store.document().unwrap().brands.last().unwrap().name, "C");
    }

    #[tokio::test]
    async fn test_invalid_form_writes_nothing() {
        let (_dir, site) = site_with("{}");
        let mut store = site.load_store().await.unwrap();
        let before = fs::read_to_string(site.durable_slot().path()).unwrap();

        let form = ItemForm {
            name: "Only a name".to_string(),
            ..Default::default()
        };
        assert!(save_item(&mut store, ListName::Articles, &form).is_err());

        let after = fs::read_to_string(site.durable_slot().path()).unwrap();
        assert_eq!(before, after);
        assert!(store.document().unwrap().articles.is_empty());
    }

    #[tokio::test]
    async fn test_remove_item() {
        let (_dir, site) = site_with(
            r#"{"articles": [{"id": 1, "name": "A", "excerpt": "", "image": "", "content": ""}]}"#,
        );
        let mut store = site.load_store().await.unwrap();

        remove_item(&mut store, ListName::Articles, 99).unwrap();
        assert_eq!(store.document().unwrap().articles.len(), 1);

        remove_item(&mut store, ListName::Articles, 1).unwrap();
        assert!(store.document().unwrap().articles.is_empty());
    }

    #[test]
    fn test_confirm() {
        let mut out = Vec::new();
        assert!(confirm("Remove? ", "y\n".as_bytes(), &mut out).unwrap());
        assert_eq!(String::from_utf8(out).unwrap(), "Remove? ");

        assert!(confirm("", "YES\n".as_bytes(), io::sink()).unwrap());
        assert!(!confirm("", "\n".as_bytes(), io::sink()).unwrap());
        assert!(!confirm("", "no\n".as_bytes(), io::sink()).unwrap());
    }
}

//! Update single document fields

use anyhow::Result;
use serde_json::Value;

use crate::content::parse_phone_lines;
use crate::Paintyard;

/// Parse a command-line value: JSON when `as_json` is set, otherwise a
/// plain string
pub fn parse_value(raw: &str, as_json: bool) -> Result<Value> {
    if as_json {
        Ok(serde_json::from_str(raw)?)
    } else {
        Ok(Value::String(raw.to_string()))
    }
}

/// Set `path` to `value` and persist
pub async fn run(site: &Paintyard, path: &str, value: Value) -> Result<()> {
    let mut store = site.load_store().await?;
    store.set_field(path, value)?;
    println!("Updated: {}", path);
    Ok(())
}

/// Replace the phone list with the non-blank `lines`
pub async fn phones(site: &Paintyard, lines: &[String]) -> Result<()> {
    let phones = parse_phone_lines(&lines.join("\n"));
    let count = phones.len();

    let mut store = site.load_store().await?;
    store.set_field("phones", Value::from(phones))?;
    println!("Updated phones ({})", count);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_parse_value() {
        assert_eq!(parse_value("#fff", false).unwrap(), json!("#fff"));
        assert_eq!(parse_value("[1, 2]", true).unwrap(), json!([1, 2]));
        assert!(parse_value("not json", true).is_err());
    }

    #[tokio::test]
    async fn test_set_and_phones_persist() {
        let dir = tempfile::tempdir().unwrap();
        let site = Paintyard::new(dir.path()).unwrap();

        run(&site, "colors.mainBg", json!("transparent")).await.unwrap();
        phones(&site, &["111".to_string(), " ".to_string(), "222".to_string()])
            .await
            .unwrap();

        let store = site.load_store().await.unwrap();
        let doc = store.document().unwrap();
        assert_eq!(doc.colors.main_bg, "transparent");
        assert_eq!(doc.phones, vec!["111", "222"]);
    }
}

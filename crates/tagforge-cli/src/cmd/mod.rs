//! One module per subcommand.

pub mod assembly;
pub mod counters;
pub mod dict;
pub mod edit;
pub mod generate;
pub mod init;
pub mod list;
pub mod next;
pub mod note;
pub mod preview;
pub mod project;
pub mod range;
pub mod show;
pub mod status;
pub mod template;
pub mod var;

use anyhow::{Result, bail};
use std::collections::BTreeMap;

use tagforge_core::{Dataset, Template};

/// Parse repeated `BLOCK=VALUE` assignments into a value map.
///
/// # Errors
///
/// An entry without `=` or with an empty block id.
pub fn parse_set(values: &[String]) -> Result<BTreeMap<String, String>> {
    let mut map = BTreeMap::new();
    for entry in values {
        let Some((key, value)) = entry.split_once('=') else {
            bail!("invalid --set '{entry}' (expected BLOCK=VALUE)");
        };
        if key.is_empty() {
            bail!("invalid --set '{entry}' (empty block id)");
        }
        map.insert(key.to_string(), value.to_string());
    }
    Ok(map)
}

/// Find a template by id or name within a project.
///
/// # Errors
///
/// When nothing matches.
pub fn find_template<'a>(
    dataset: &'a Dataset,
    project_id: &str,
    key: &str,
) -> Result<&'a Template> {
    let Some(template) = dataset
        .templates_in(project_id)
        .find(|t| t.id == key || t.name == key)
    else {
        bail!("unknown template '{key}' (see `tg template list`)");
    };
    Ok(template)
}

#[cfg(test)]
mod tests {
    use super::parse_set;

    #[test]
    fn parse_set_splits_on_first_equals() {
        let map = parse_set(&["b1=HVAC".to_string(), "b3=a=b".to_string()]).unwrap();
        assert_eq!(map["b1"], "HVAC");
        assert_eq!(map["b3"], "a=b");
    }

    #[test]
    fn parse_set_rejects_malformed_entries() {
        assert!(parse_set(&["novalue".to_string()]).is_err());
        assert!(parse_set(&["=x".to_string()]).is_err());
    }
}

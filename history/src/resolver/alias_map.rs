use std::collections::BTreeMap;

/// Looks up an exact-name alias. An empty configured label counts as unset so
/// the name can still fall through to a path rule.
pub fn resolve_alias<'a>(aliases: &'a BTreeMap<String, String>, name: &str) -> Option<&'a str> {
    aliases
        .get(name)
        .map(String::as_str)
        .filter(|alias| !alias.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exact_lookup_is_case_sensitive() {
        let mut aliases = BTreeMap::new();
        aliases.insert("cfg.json".to_string(), "Config".to_string());
        assert_eq!(resolve_alias(&aliases, "cfg.json"), Some("Config"));
        assert_eq!(resolve_alias(&aliases, "CFG.json"), None);
    }

    #[test]
    fn test_empty_label_is_unset() {
        let mut aliases = BTreeMap::new();
        aliases.insert("somefile.json".to_string(), String::new());
        assert_eq!(resolve_alias(&aliases, "somefile.json"), None);
    }
}

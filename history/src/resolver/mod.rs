pub mod alias_map;
pub mod path_rule;

use crate::config::AliasConfig;
use crate::history::FileRef;

/// Which rule produced an alias.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AliasSource {
    Exact,
    PathRule,
}

/// Computes the display alias for `entry` without modifying it.
///
/// Resolution order (first match wins):
/// 1) exact alias for the file name
/// 2) path alias rule for the file name
pub fn derive_alias(entry: &FileRef, config: &AliasConfig) -> Option<(String, AliasSource)> {
    if let Some(alias) = alias_map::resolve_alias(&config.aliases, &entry.name) {
        return Some((alias.to_string(), AliasSource::Exact));
    }
    let rule = config.path_aliases.get(&entry.name)?;
    path_rule::derive(&entry.directory_path, rule).map(|alias| (alias, AliasSource::PathRule))
}

/// Returns `entry` with its alias set when a rule applies; otherwise the
/// entry comes back unchanged.
pub fn resolve(mut entry: FileRef, config: &AliasConfig) -> FileRef {
    apply(&mut entry, config);
    entry
}

/// Resolves every entry independently. Entries without an applicable rule
/// keep whatever alias they had.
pub fn resolve_all(entries: &mut [FileRef], config: &AliasConfig) -> usize {
    let mut resolved = 0;
    for entry in entries.iter_mut() {
        if apply(entry, config) {
            resolved += 1;
        }
    }
    resolved
}

fn apply(entry: &mut FileRef, config: &AliasConfig) -> bool {
    match derive_alias(entry, config) {
        Some((alias, source)) => {
            log::debug!(
                "alias {:?} for {}/{} via {:?}",
                alias,
                entry.directory_path,
                entry.name,
                source
            );
            entry.alias = Some(alias);
            true
        }
        None => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{parse_config, PathAliasRule};

    #[test]
    fn test_exact_alias_ignores_directory() {
        let config = parse_config(r#"{ "aliases": { "cfg.json": "Config" } }"#).unwrap();
        for dir in ["/a", "/deep/nested/dir", "C:\\x"] {
            let entry = resolve(FileRef::new(dir, "cfg.json"), &config);
            assert_eq!(entry.alias.as_deref(), Some("Config"));
        }
    }

    #[test]
    fn test_exact_alias_wins_over_path_rule() {
        let config = parse_config(
            r#"{
                "aliases": { "settings.json": "Settings" },
                "pathAliases": { "settings.json": { "level": 1 } }
            }"#,
        )
        .unwrap();
        let entry = resolve(FileRef::new("/projects/teamA", "settings.json"), &config);
        assert_eq!(entry.alias.as_deref(), Some("Settings"));
        assert_eq!(
            derive_alias(&entry, &config).map(|(_, s)| s),
            Some(AliasSource::Exact)
        );
    }

    #[test]
    fn test_path_rule_levels() {
        let mut config = AliasConfig::default();
        config
            .path_aliases
            .insert("settings.json".into(), PathAliasRule { level: 1, regex: String::new() });
        let entry = resolve(FileRef::new("/projects/teamA", "settings.json"), &config);
        assert_eq!(entry.alias.as_deref(), Some("teamA"));

        config
            .path_aliases
            .insert("settings.json".into(), PathAliasRule { level: 2, regex: String::new() });
        let entry = resolve(FileRef::new("/projects/teamA", "settings.json"), &config);
        assert_eq!(entry.alias.as_deref(), Some("projects"));
    }

    #[test]
    fn test_no_rule_leaves_alias_untouched() {
        let config = AliasConfig::default();
        let mut entry = FileRef::new("/a", "x.json");
        entry.alias = Some("kept".into());
        let entry = resolve(entry, &config);
        assert_eq!(entry.alias.as_deref(), Some("kept"));

        let fresh = resolve(FileRef::new("/a", "x.json"), &config);
        assert_eq!(fresh.alias, None);
        assert_eq!(fresh.display_name(), "x.json");
    }

    #[test]
    fn test_resolve_all_continues_past_unresolved_entries() {
        let config = parse_config(
            r#"{
                "aliases": { "a.json": "A" },
                "pathAliases": { "b.json": { "regex": "^\\d+$" }, "c.json": {} }
            }"#,
        )
        .unwrap();
        let mut entries = vec![
            FileRef::new("/x/one", "b.json"),
            FileRef::new("/x", "a.json"),
            FileRef::new("/x/team", "c.json"),
            FileRef::new("/x", "other.json"),
        ];
        let resolved = resolve_all(&mut entries, &config);
        assert_eq!(resolved, 2);
        assert_eq!(entries[0].alias, None);
        assert_eq!(entries[1].alias.as_deref(), Some("A"));
        assert_eq!(entries[2].alias.as_deref(), Some("team"));
        assert_eq!(entries[3].alias, None);
    }
}

use crate::config::PathAliasRule;
use crate::util::paths::split_segments;
use regex::Regex;

/// Derives an alias from one folder of `directory_path`.
///
/// Deterministic rules:
/// - The path must split into at least two segments.
/// - `level` counts from the end: 1 selects the last segment.
/// - A level outside the available segments, or an empty selected segment,
///   yields `None`.
/// - With a regex, the first capture group is returned if it participated in
///   the match, else the whole match. No match yields `None`.
pub fn derive(directory_path: &str, rule: &PathAliasRule) -> Option<String> {
    let segments = split_segments(directory_path);
    if segments.len() < 2 {
        return None;
    }

    let index = i64::try_from(segments.len()).ok()?.checked_sub(rule.level)?;
    let segment = usize::try_from(index)
        .ok()
        .and_then(|i| segments.get(i))
        .copied()
        .filter(|s| !s.is_empty())?;

    if rule.regex.is_empty() {
        return Some(segment.to_string());
    }

    let re = match Regex::new(&rule.regex) {
        Ok(re) => re,
        Err(e) => {
            log::warn!("Ignoring invalid path alias regex {:?}: {}", rule.regex, e);
            return None;
        }
    };
    let caps = re.captures(segment)?;
    caps.get(1)
        .or_else(|| caps.get(0))
        .map(|m| m.as_str())
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

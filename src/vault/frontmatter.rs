use serde::{de::DeserializeOwned, Serialize};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum FrontmatterError {
    #[error("Invalid frontmatter format: {0}")]
    InvalidFormat(String),
    #[error("YAML error: {0}")]
    YamlError(#[from] serde_yaml::Error),
}

/// Split a note into its YAML front matter and the remaining body.
///
/// Returns `None` when the note does not open with a `---` line. The body is
/// returned byte for byte, starting right after the closing `---` line.
///
/// # Format
/// ```markdown
/// ---
/// repo_url: https://github.com/acme/widget
/// ---
/// body...
/// ```
pub fn split_frontmatter(content: &str) -> Result<Option<(&str, &str)>, FrontmatterError> {
    let mut lines = content.split_inclusive('\n');
    match lines.next() {
        Some(first) if first.trim_end() == "---" => {}
        _ => return Ok(None),
    }

    let yaml_start = content.find('\n').map_or(content.len(), |i| i.saturating_add(1));
    let mut offset = yaml_start;
    for line in lines {
        let end = offset.saturating_add(line.len());
        if line.trim_end() == "---" {
            let yaml = content.get(yaml_start..offset).unwrap_or_default();
            let body = content.get(end..).unwrap_or_default();
            return Ok(Some((yaml, body)));
        }
        offset = end;
    }

    Err(FrontmatterError::InvalidFormat(
        "Missing closing '---' for frontmatter".to_string(),
    ))
}

/// Parse the front matter of a note into `T`, returning it with the body.
pub fn parse_frontmatter<T: DeserializeOwned>(
    content: &str,
) -> Result<(T, &str), FrontmatterError> {
    let (yaml, body) = split_frontmatter(content)?.ok_or_else(|| {
        FrontmatterError::InvalidFormat("Content must start with '---'".to_string())
    })?;
    Ok((serde_yaml::from_str(yaml)?, body))
}

/// Parse front matter into a raw `serde_yaml::Value` so unknown keys survive.
///
/// A note without front matter yields `Value::Null` and the whole content as body.
pub fn parse_frontmatter_raw(content: &str) -> Result<(serde_yaml::Value, &str), FrontmatterError> {
    match split_frontmatter(content)? {
        Some((yaml, body)) if yaml.trim().is_empty() => Ok((serde_yaml::Value::Null, body)),
        Some((yaml, body)) => Ok((serde_yaml::from_str(yaml)?, body)),
        None => Ok((serde_yaml::Value::Null, content)),
    }
}

/// Render `metadata` as a front matter block followed by `body`.
pub fn generate_frontmatter<T: Serialize>(
    metadata: &T,
    body: &str,
) -> Result<String, FrontmatterError> {
    let yaml = serde_yaml::to_string(metadata)?;
    // serde_yaml adds a trailing newline, so trim it
    let yaml = yaml.trim_end();
    Ok(format!("---\n{yaml}\n---\n{body}"))
}

/// Set one top-level front matter key, leaving the body untouched.
///
/// A `Null` value removes the key.
pub fn set_frontmatter_field(
    content: &str,
    key: &str,
    value: serde_yaml::Value,
) -> Result<String, FrontmatterError> {
    let (mut metadata, body) = parse_frontmatter_raw(content)?;
    if metadata.is_null() {
        metadata = serde_yaml::Value::Mapping(serde_yaml::Mapping::new());
    }
    let mapping = metadata.as_mapping_mut().ok_or_else(|| {
        FrontmatterError::InvalidFormat("Frontmatter is not a mapping".to_string())
    })?;
    let key = serde_yaml::Value::String(key.to_string());
    if value.is_null() {
        mapping.remove(&key);
    } else {
        mapping.insert(key, value);
    }
    generate_frontmatter(&metadata, body)
}

#[cfg(test)]
#[path = "frontmatter_tests.rs"]
mod tests;

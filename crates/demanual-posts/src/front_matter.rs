//! Splitting and parsing the `---` delimited YAML header of a post.

use serde_yaml_ng::Value;

/// Header fields of a post. Absent and empty fields are `None`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FrontMatter {
    pub title: Option<String>,
    pub excerpt: Option<String>,
    pub date: Option<String>,
    pub author: Option<String>,
    pub role: Option<String>,
    pub image: Option<String>,
}

impl FrontMatter {
    /// Split `source` into its header and body, then parse the header.
    ///
    /// A file without a complete header is all body. A header that is not
    /// valid YAML is logged and ignored, leaving every field unset.
    pub fn extract(source: &str) -> (FrontMatter, &str) {
        let Some((yaml, body)) = split(source) else {
            return (FrontMatter::default(), source);
        };

        match FrontMatter::parse(yaml) {
            Ok(front_matter) => (front_matter, body),
            Err(e) => {
                tracing::warn!(error = %e, "ignoring malformed front matter");
                (FrontMatter::default(), body)
            }
        }
    }

    /// Parse a YAML mapping. Scalars of any type are read as strings.
    pub fn parse(yaml: &str) -> Result<FrontMatter, serde_yaml_ng::Error> {
        let value: Value = serde_yaml_ng::from_str(yaml)?;
        let Value::Mapping(map) = value else {
            return Ok(FrontMatter::default());
        };

        let field = |key: &str| {
            map.get(key)
                .and_then(scalar_to_string)
                .filter(|s| !s.is_empty())
        };

        Ok(FrontMatter {
            title: field("title"),
            excerpt: field("excerpt"),
            date: field("date"),
            author: field("author"),
            role: field("role"),
            image: field("image"),
        })
    }
}

fn scalar_to_string(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        Value::Tagged(tagged) => scalar_to_string(&tagged.value),
        Value::Null | Value::Sequence(_) | Value::Mapping(_) => None,
    }
}

/// `(header, body)` when `source` opens with a `---` line closed by another.
fn split(source: &str) -> Option<(&str, &str)> {
    let source = source.strip_prefix('\u{feff}').unwrap_or(source);
    let rest = source.strip_prefix("---")?;
    let rest = rest
        .strip_prefix("\r\n")
        .or_else(|| rest.strip_prefix('\n'))?;

    let mut offset = 0;
    for line in rest.split_inclusive('\n') {
        if line.trim_end() == "---" {
            return Some((&rest[..offset], &rest[offset + line.len()..]));
        }
        offset += line.len();
    }
    None
}

//! SKILL.md frontmatter parser
//!
//! The metadata block is not handed to a YAML parser. The schema is two flat
//! fields, so the block is split line by line into an ordered key/value list;
//! a line that does not start a new `key:` continues the previous value.

use regex::Regex;
use std::sync::LazyLock;

/// Fence line opening and closing the metadata block
pub const FENCE: &str = "---";

/// Fields every descriptor must declare, in reporting order
pub const REQUIRED_FIELDS: [&str; 2] = ["name", "description"];

static FIELD_LINE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^([A-Za-z0-9_-]+):(.*)$").unwrap());

/// Fencing failures. No metadata or body exists past these.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FrontmatterError {
    #[error("SKILL.md must start with YAML frontmatter (---)")]
    MissingFence,

    #[error("SKILL.md has malformed YAML frontmatter")]
    Malformed,
}

/// Metadata block of a descriptor
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Frontmatter {
    /// Block text between the two fences
    pub raw: String,
    /// Fields in declaration order
    pub fields: Vec<(String, String)>,
}

impl Frontmatter {
    pub fn parse(raw: &str) -> Self {
        Self {
            raw: raw.to_string(),
            fields: parse_fields(raw),
        }
    }

    /// Value of the first field named `key`
    pub fn get(&self, key: &str) -> Option<&str> {
        self.fields
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    pub fn name(&self) -> Option<&str> {
        self.get("name")
    }

    pub fn description(&self) -> Option<&str> {
        self.get("description")
    }

    /// Required fields absent from the block
    pub fn missing_required(&self) -> Vec<&'static str> {
        REQUIRED_FIELDS
            .into_iter()
            .filter(|field| self.get(field).is_none())
            .collect()
    }
}

/// Descriptor split into metadata and body
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedDescriptor {
    pub frontmatter: Frontmatter,
    pub body: String,
}

/// Split descriptor text on the fence.
///
/// The text must open with a fence line. It is then cut on the fence at most
/// twice: an empty lead-in, the metadata block, and the body.
pub fn split(content: &str) -> Result<(&str, &str), FrontmatterError> {
    let delimiter = format!("{FENCE}\n");
    if !content.starts_with(&delimiter) {
        return Err(FrontmatterError::MissingFence);
    }

    let mut parts = content.splitn(3, delimiter.as_str());
    let _lead_in = parts.next();
    match (parts.next(), parts.next()) {
        (Some(metadata), Some(body)) => Ok((metadata, body)),
        _ => Err(FrontmatterError::Malformed),
    }
}

/// Parse descriptor text into frontmatter and body
pub fn parse(content: &str) -> Result<ParsedDescriptor, FrontmatterError> {
    let (metadata, body) = split(content)?;
    Ok(ParsedDescriptor {
        frontmatter: Frontmatter::parse(metadata),
        body: body.to_string(),
    })
}

fn parse_fields(block: &str) -> Vec<(String, String)> {
    let mut fields: Vec<(String, Vec<&str>)> = Vec::new();

    for line in block.lines() {
        if line.starts_with('#') {
            continue;
        }
        if let Some(caps) = FIELD_LINE.captures(line) {
            let value = caps.get(2).map_or("", |m| m.as_str());
            fields.push((caps[1].to_string(), vec![value]));
        } else if let Some((_, value)) = fields.last_mut() {
            value.push(line);
        }
    }

    fields
        .into_iter()
        .map(|(key, lines)| (key, clean_value(&lines)))
        .collect()
}

fn clean_value(lines: &[&str]) -> String {
    let mut lines = lines.to_vec();
    // Block scalar indicator (`|`, `>-`, ...) on the key line carries no text
    if let Some(first) = lines.first()
        && matches!(first.trim(), "|" | "|-" | "|+" | ">" | ">-" | ">+")
    {
        lines.remove(0);
    }

    let value = lines.join("\n");
    let value = value.trim();
    strip_quotes(value).to_string()
}

fn strip_quotes(value: &str) -> &str {
    for quote in ['"', '\''] {
        if value.len() >= 2 && value.starts_with(quote) && value.ends_with(quote) {
            return &value[1..value.len() - 1];
        }
    }
    value
}

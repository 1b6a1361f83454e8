//! Leading metadata blocks.
//!
//! A document may open with a block delimited by two lines consisting of
//! exactly `---`. Everything between the delimiters is YAML; everything after
//! the closing line is the body.

use crate::domain::Frontmatter;

const DELIMITER: &str = "---";

/// A document split into its metadata block and body.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Split<'a> {
    pub yaml: &'a str,
    pub body: &'a str,
}

/// Splits `content` at its leading metadata block. Returns `None` when the
/// document does not open with a complete block.
pub fn split(content: &str) -> Option<Split<'_>> {
    let first_end = content.find('\n')?;
    if content[..first_end].trim_end_matches('\r') != DELIMITER {
        return None;
    }

    let yaml_start = first_end + 1;
    let mut line_start = yaml_start;
    while line_start <= content.len() {
        let line_end = content[line_start..]
            .find('\n')
            .map_or(content.len(), |i| line_start + i);
        if content[line_start..line_end].trim_end_matches('\r') == DELIMITER {
            let body_start = (line_end + 1).min(content.len());
            return Some(Split {
                yaml: &content[yaml_start..line_start],
                body: &content[body_start..],
            });
        }
        if line_end == content.len() {
            break;
        }
        line_start = line_end + 1;
    }
    None
}

/// Returns the body of `content` with any leading metadata block and the
/// blank lines directly after it removed. Content without a block is
/// returned unchanged.
pub fn strip(content: &str) -> &str {
    match split(content) {
        Some(split) => split.body.trim_start_matches(['\n', '\r']),
        None => content,
    }
}

/// Parses the YAML of a metadata block. An empty block yields an empty record.
pub fn parse(yaml: &str) -> Result<Frontmatter, serde_yaml::Error> {
    if yaml.trim().is_empty() {
        return Ok(Frontmatter::new());
    }
    serde_yaml::from_str(yaml)
}

/// Reads the frontmatter of a whole document.
pub fn read(content: &str) -> Result<Frontmatter, serde_yaml::Error> {
    match split(content) {
        Some(split) => parse(split.yaml),
        None => Ok(Frontmatter::new()),
    }
}

/// Renders `fields` in front of `body`. An empty record produces the bare body.
pub fn render(fields: &Frontmatter, body: &str) -> Result<String, serde_yaml::Error> {
    if fields.is_empty() {
        return Ok(body.to_owned());
    }
    let yaml = serde_yaml::to_string(fields)?;
    Ok(format!("{DELIMITER}\n{yaml}{DELIMITER}\n{body}"))
}

/// Replaces the metadata block of `content` with `fields`, keeping the body.
pub fn rewrite(content: &str, fields: &Frontmatter) -> Result<String, serde_yaml::Error> {
    let body = split(content).map_or(content, |s| s.body);
    render(fields, body)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::FieldValue;

    #[test]
    fn strips_leading_block() {
        assert_eq!(strip("---\nstatus: x\n---\nBody text"), "Body text");
        assert_eq!(strip("---\nstatus: x\n---\n\n\nBody text"), "Body text");
    }

    #[test]
    fn leaves_body_without_block_alone() {
        assert_eq!(strip("Body text\n---\n"), "Body text\n---\n");
        assert_eq!(strip("---\nnever closed"), "---\nnever closed");
        assert_eq!(strip(""), "");
    }

    #[test]
    fn empty_block_is_still_a_block() {
        let split = split("---\n---\nBody").unwrap();
        assert_eq!(split.yaml, "");
        assert_eq!(split.body, "Body");
    }

    #[test]
    fn block_at_end_of_file() {
        let split = split("---\nstatus: done\n---").unwrap();
        assert_eq!(split.yaml, "status: done\n");
        assert_eq!(split.body, "");
    }

    #[test]
    fn parses_mixed_values() {
        let fm = read("---\nstatus: done\nwords: 1200\ntags: [a, b]\n---\nBody").unwrap();
        assert_eq!(fm.get("status"), Some(&FieldValue::from("done")));
        assert!(matches!(fm.get("words"), Some(FieldValue::Number(_))));
        assert!(matches!(fm.get("tags"), Some(FieldValue::Other(_))));
    }

    #[test]
    fn rewrite_keeps_body_and_unknown_fields() {
        let original = "---\nstatus: idea\ntags:\n- a\n---\nBody\n";
        let mut fm = read(original).unwrap();
        fm.insert("status".into(), FieldValue::from("done"));
        let updated = rewrite(original, &fm).unwrap();
        let reread = read(&updated).unwrap();
        assert_eq!(reread.get("status"), Some(&FieldValue::from("done")));
        assert!(reread.contains_key("tags"));
        assert!(updated.ends_with("---\nBody\n"));
    }

    #[test]
    fn rewrite_with_no_fields_drops_block() {
        assert_eq!(rewrite("---\nstatus: x\n---\nBody", &Frontmatter::new()).unwrap(), "Body");
    }
}

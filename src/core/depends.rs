use regex::Regex;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("no package name in '{segment}'")]
pub struct InvalidDependencyName {
    pub segment: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DependencyGroup {
    pub alternatives: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DependencyGroups {
    pub groups: Vec<DependencyGroup>,
}

impl DependencyGroups {
    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    pub fn flatten(&self) -> Vec<String> {
        self.groups
            .iter()
            .flat_map(|group| group.alternatives.iter().cloned())
            .collect()
    }

    pub fn first_alternatives(&self) -> Vec<String> {
        self.groups
            .iter()
            .filter_map(|group| group.alternatives.first().cloned())
            .collect()
    }
}

const PACKAGE_NAME_PATTERN: &str = r"^\w[\w.+-]*";

#[derive(Debug, Clone)]
pub struct DependencyTextParser {
    name: Regex,
}

impl DependencyTextParser {
    pub fn new() -> Result<Self, regex::Error> {
        Ok(Self {
            name: Regex::new(PACKAGE_NAME_PATTERN)?,
        })
    }

    pub fn parse(&self, text: &str) -> Result<DependencyGroups, InvalidDependencyName> {
        let text = text.trim();
        if text.is_empty() {
            return Ok(DependencyGroups::default());
        }

        let mut groups = Vec::new();
        for segment in text.split(',') {
            let mut alternatives = Vec::new();
            for alternative in segment.split('|') {
                alternatives.push(self.package_name(alternative)?);
            }
            groups.push(DependencyGroup { alternatives });
        }

        Ok(DependencyGroups { groups })
    }

    fn package_name(&self, alternative: &str) -> Result<String, InvalidDependencyName> {
        let trimmed = alternative.trim();
        self.name
            .find(trimmed)
            .map(|found| found.as_str().to_string())
            .ok_or_else(|| InvalidDependencyName {
                segment: trimmed.to_string(),
            })
    }
}

#[cfg(test)]
mod tests {
    use crate::core::depends::{
        DependencyGroup, DependencyGroups, DependencyTextParser, InvalidDependencyName,
    };

    fn parse(text: &str) -> Result<DependencyGroups, InvalidDependencyName> {
        DependencyTextParser::new()
            .expect("compile parser")
            .parse(text)
    }

    #[test]
    fn parses_groups_and_strips_version_constraints() {
        let parsed =
            parse("libc6 (>= 2.7), libssl1.0.0 | libssl0.9.8").expect("parse declaration");
        assert_eq!(
            parsed.groups,
            vec![
                DependencyGroup {
                    alternatives: vec!["libc6".to_string()],
                },
                DependencyGroup {
                    alternatives: vec!["libssl1.0.0".to_string(), "libssl0.9.8".to_string()],
                },
            ]
        );
        assert_eq!(parsed.flatten(), vec!["libc6", "libssl1.0.0", "libssl0.9.8"]);
        assert_eq!(parsed.first_alternatives(), vec!["libc6", "libssl1.0.0"]);
    }

    #[test]
    fn strips_architecture_qualifiers() {
        let parsed = parse("python3:any (>= 3.6~), libstdc++6:amd64").expect("parse");
        assert_eq!(parsed.flatten(), vec!["python3", "libstdc++6"]);
    }

    #[test]
    fn empty_and_blank_input_has_no_dependencies() {
        assert!(parse("").expect("parse empty").is_empty());
        assert!(parse("   \n").expect("parse blank").is_empty());
    }

    #[test]
    fn missing_name_token_is_an_error() {
        let err = parse("(>= 1.0)").expect_err("no name token");
        assert_eq!(err.segment, "(>= 1.0)");
    }

    #[test]
    fn one_bad_alternative_rejects_the_whole_declaration() {
        let err = parse("libc6, zlib1g | (<< 2)").expect_err("bad alternative");
        assert_eq!(err.segment, "(<< 2)");

        let err = parse("libc6, , zlib1g").expect_err("empty segment");
        assert_eq!(err.segment, "");
    }
}

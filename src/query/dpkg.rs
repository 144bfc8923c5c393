use crate::query::{PackageQuerySource, QueryKind};
use crate::util::{command, output};

pub const DEFAULT_QUERY_TOOL: &str = "dpkg-query";

/// Asks the local package database through `dpkg-query -W`.
#[derive(Debug, Clone)]
pub struct DpkgQuery {
    tool: String,
    verbose: bool,
}

impl DpkgQuery {
    pub fn new(tool: impl Into<String>) -> Self {
        Self {
            tool: tool.into(),
            verbose: false,
        }
    }

    pub fn with_verbose(mut self, verbose: bool) -> Self {
        self.verbose = verbose;
        self
    }

    fn args(name: &str, kind: QueryKind) -> [String; 3] {
        [
            "-W".to_string(),
            format!("--showformat={}", kind.template()),
            name.to_string(),
        ]
    }
}

impl Default for DpkgQuery {
    fn default() -> Self {
        Self::new(DEFAULT_QUERY_TOOL)
    }
}

impl PackageQuerySource for DpkgQuery {
    fn query(&self, name: &str, kind: QueryKind) -> String {
        let args = Self::args(name, kind);
        let args: Vec<&str> = args.iter().map(String::as_str).collect();
        if self.verbose {
            output::query_op(&self.tool, &format!("{} {}", kind.as_str(), name));
        }
        match command::capture_stdout(&self.tool, &args) {
            Ok(text) => text,
            Err(err) => {
                if self.verbose {
                    output::debug(&format!("{} query for {} failed: {}", kind.as_str(), name, err));
                }
                String::new()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::query::dpkg::DpkgQuery;
    use crate::query::{PackageQuerySource, QueryKind};

    #[test]
    fn builds_show_format_arguments() {
        let args = DpkgQuery::args("libc6", QueryKind::Depends);
        assert_eq!(args[0], "-W");
        assert_eq!(args[1], "--showformat=${Depends}\\n${Pre-Depends}\\n");
        assert_eq!(args[2], "libc6");
    }

    #[test]
    fn missing_tool_degrades_to_empty_facts() {
        let source = DpkgQuery::new("debgraph-no-such-dpkg-query");
        let facts = source.facts("ghost");
        assert!(facts.status.is_empty());
        assert!(facts.version.is_empty());
        assert!(facts.depends.is_empty());
    }

    #[cfg(unix)]
    #[test]
    fn failing_tool_degrades_to_empty_text() {
        let source = DpkgQuery::new("false");
        assert_eq!(source.query("ghost", QueryKind::Status), "");
    }
}

pub mod dpkg;

/// The three facts gathered for every package.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum QueryKind {
    Status,
    Version,
    Depends,
}

impl QueryKind {
    pub const ALL: [QueryKind; 3] = [QueryKind::Status, QueryKind::Version, QueryKind::Depends];

    /// `dpkg-query --showformat` template for this fact.
    pub fn template(self) -> &'static str {
        match self {
            QueryKind::Status => "${Status}\\n",
            QueryKind::Version => "${Version}\\n",
            QueryKind::Depends => "${Depends}\\n${Pre-Depends}\\n",
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            QueryKind::Status => "status",
            QueryKind::Version => "version",
            QueryKind::Depends => "depends",
        }
    }
}

/// Raw answers for one package, normalized per kind.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PackageFacts {
    pub status: String,
    pub version: String,
    pub depends: String,
}

impl PackageFacts {
    pub fn apply(&mut self, kind: QueryKind, raw: &str) {
        match kind {
            QueryKind::Status => self.status = first_line(raw),
            QueryKind::Version => self.version = first_line(raw),
            QueryKind::Depends => self.depends = join_declarations(raw),
        }
    }
}

// Multi-arch packages answer once per instance. Only the first instance's
// line is kept, so its status is classified on its own rather than by the
// last token of all instances run together.
fn first_line(raw: &str) -> String {
    raw.lines()
        .map(str::trim)
        .find(|line| !line.is_empty())
        .unwrap_or_default()
        .to_string()
}

// Depends and Pre-Depends arrive on separate lines and are AND-combined with
// ", ". Joining the two fields with a space instead would make the parser read
// "libc6 dpkg" as the single name libc6 and drop every Pre-Depends entry.
fn join_declarations(raw: &str) -> String {
    raw.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .collect::<Vec<_>>()
        .join(", ")
}

pub trait PackageQuerySource {
    /// Raw text for one fact. Unknown packages and tool failures yield empty text.
    fn query(&self, name: &str, kind: QueryKind) -> String;

    fn facts(&self, name: &str) -> PackageFacts {
        let mut facts = PackageFacts::default();
        for kind in QueryKind::ALL {
            let raw = self.query(name, kind);
            facts.apply(kind, &raw);
        }
        facts
    }
}

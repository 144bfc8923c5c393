use serde::Serialize;

use crate::core::depends::{DependencyGroups, DependencyTextParser, InvalidDependencyName};
use crate::graph::GraphSink;
use crate::query::PackageFacts;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum InstallationState {
    NotInstalled,
    ConfigFiles,
    HalfInstalled,
    Unpacked,
    HalfConfigured,
    TriggersAwaited,
    TriggersPending,
    Installed,
    Invalid,
}

impl InstallationState {
    pub const KNOWN: [InstallationState; 8] = [
        InstallationState::NotInstalled,
        InstallationState::ConfigFiles,
        InstallationState::HalfInstalled,
        InstallationState::Unpacked,
        InstallationState::HalfConfigured,
        InstallationState::TriggersAwaited,
        InstallationState::TriggersPending,
        InstallationState::Installed,
    ];

    pub fn from_status(status: &str) -> Self {
        status
            .split_whitespace()
            .last()
            .map(Self::from_token)
            .unwrap_or(InstallationState::Invalid)
    }

    pub fn from_token(token: &str) -> Self {
        Self::KNOWN
            .into_iter()
            .find(|state| state.as_str() == token)
            .unwrap_or(InstallationState::Invalid)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            InstallationState::NotInstalled => "not-installed",
            InstallationState::ConfigFiles => "config-files",
            InstallationState::HalfInstalled => "half-installed",
            InstallationState::Unpacked => "unpacked",
            InstallationState::HalfConfigured => "half-configured",
            InstallationState::TriggersAwaited => "triggers-awaited",
            InstallationState::TriggersPending => "triggers-pending",
            InstallationState::Installed => "installed",
            InstallationState::Invalid => "invalid",
        }
    }

    pub fn is_valid(self) -> bool {
        self != InstallationState::Invalid
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum NodeClass {
    Installed,
    NotInstalled,
    Invalid,
}

impl NodeClass {
    pub fn for_state(state: InstallationState) -> Self {
        match state {
            InstallationState::Installed => NodeClass::Installed,
            InstallationState::Invalid => NodeClass::Invalid,
            _ => NodeClass::NotInstalled,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            NodeClass::Installed => "installed",
            NodeClass::NotInstalled => "not-installed",
            NodeClass::Invalid => "invalid",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PackageRecord {
    name: String,
    state: InstallationState,
    version: Option<String>,
    dependencies: DependencyGroups,
}

impl PackageRecord {
    pub fn from_facts(
        name: &str,
        facts: &PackageFacts,
        parser: &DependencyTextParser,
    ) -> Result<Self, InvalidDependencyName> {
        let dependencies = parser.parse(&facts.depends)?;
        Ok(Self::classify(name, facts, dependencies))
    }

    pub fn classify(name: &str, facts: &PackageFacts, dependencies: DependencyGroups) -> Self {
        let state = InstallationState::from_status(&facts.status);
        let version = state.is_valid().then(|| facts.version.clone());
        Self {
            name: name.to_string(),
            state,
            version,
            dependencies,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn state(&self) -> InstallationState {
        self.state
    }

    pub fn installed(&self) -> bool {
        self.state == InstallationState::Installed
    }

    pub fn version(&self) -> Option<&str> {
        self.version.as_deref()
    }

    pub fn dependencies(&self) -> &DependencyGroups {
        &self.dependencies
    }

    pub fn dependency_names(&self) -> Vec<String> {
        self.dependencies.flatten()
    }

    pub fn node_class(&self) -> NodeClass {
        NodeClass::for_state(self.state)
    }

    pub fn label(&self) -> String {
        format!("{}\n{}", self.name, self.version().unwrap_or_default())
    }

    pub fn publish(&self, sink: &mut dyn GraphSink) {
        sink.add_node(&self.name, &self.label(), self.node_class());
        for dependency in self.dependency_names() {
            sink.add_edge(&self.name, &dependency);
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::core::depends::{DependencyGroups, DependencyTextParser};
    use crate::core::package::{InstallationState, NodeClass, PackageRecord};
    use crate::graph::PackageGraph;
    use crate::query::PackageFacts;

    fn facts(status: &str, version: &str, depends: &str) -> PackageFacts {
        PackageFacts {
            status: status.to_string(),
            version: version.to_string(),
            depends: depends.to_string(),
        }
    }

    fn parser() -> DependencyTextParser {
        DependencyTextParser::new().expect("compile parser")
    }

    #[test]
    fn every_known_state_round_trips_through_status_text() {
        for state in InstallationState::KNOWN {
            let status = format!("install ok {}", state.as_str());
            assert_eq!(InstallationState::from_status(&status), state);
        }
    }

    #[test]
    fn unrecognized_status_is_invalid() {
        for status in [
            "",
            "   ",
            "dpkg-query: no packages found matching ghost",
            "install ok Installed",
            "install ok installed-ish",
        ] {
            assert_eq!(
                InstallationState::from_status(status),
                InstallationState::Invalid,
                "status {status:?}"
            );
        }
    }

    #[test]
    fn installed_package_keeps_version() {
        let record = PackageRecord::from_facts(
            "bash",
            &facts("install ok installed", "5.2.15-2", "base-files (>= 2.1.12), debianutils"),
            &parser(),
        )
        .expect("build record");
        assert_eq!(record.state(), InstallationState::Installed);
        assert!(record.installed());
        assert_eq!(record.version(), Some("5.2.15-2"));
        assert_eq!(record.node_class(), NodeClass::Installed);
        assert_eq!(record.dependency_names(), vec!["base-files", "debianutils"]);
        assert_eq!(record.label(), "bash\n5.2.15-2");
    }

    #[test]
    fn non_installed_valid_state_keeps_empty_version() {
        let record = PackageRecord::classify(
            "pkgB",
            &facts("install ok not-installed", "", ""),
            DependencyGroups::default(),
        );
        assert_eq!(record.state(), InstallationState::NotInstalled);
        assert!(!record.installed());
        assert_eq!(record.version(), Some(""));
        assert_eq!(record.node_class(), NodeClass::NotInstalled);
    }

    #[test]
    fn invalid_package_drops_version() {
        let record = PackageRecord::classify(
            "ghost",
            &facts("garbage", "9.9", ""),
            DependencyGroups::default(),
        );
        assert_eq!(record.state(), InstallationState::Invalid);
        assert!(!record.installed());
        assert_eq!(record.version(), None);
        assert_eq!(record.node_class(), NodeClass::Invalid);
        assert_eq!(record.label(), "ghost\n");
    }

    #[test]
    fn unknown_package_with_empty_facts() {
        let record =
            PackageRecord::from_facts("ghost", &PackageFacts::default(), &parser()).expect("build");
        assert_eq!(record.state(), InstallationState::Invalid);
        assert_eq!(record.version(), None);
        assert!(!record.installed());
        assert!(record.dependencies().is_empty());
    }

    #[test]
    fn bad_declaration_fails_construction() {
        let err = PackageRecord::from_facts(
            "broken",
            &facts("install ok installed", "1", "libc6, (>= 1.0)"),
            &parser(),
        )
        .expect_err("bad declaration");
        assert_eq!(err.segment, "(>= 1.0)");
    }

    #[test]
    fn publish_records_node_and_flattened_edges() {
        let record = PackageRecord::from_facts(
            "curl",
            &facts("install ok installed", "7.88", "libcurl4 | libcurl3, ghost"),
            &parser(),
        )
        .expect("build record");
        let mut graph = PackageGraph::new();
        record.publish(&mut graph);

        assert_eq!(graph.nodes.len(), 1);
        assert_eq!(graph.nodes[0].label, "curl\n7.88");
        assert_eq!(graph.nodes[0].class, NodeClass::Installed);
        let targets: Vec<&str> = graph.edges.iter().map(|edge| edge.to.as_str()).collect();
        assert_eq!(targets, vec!["libcurl4", "libcurl3", "ghost"]);
    }
}

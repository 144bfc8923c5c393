use std::collections::VecDeque;

use crate::core::depends::{DependencyGroups, DependencyTextParser, InvalidDependencyName};
use crate::core::package::PackageRecord;
use crate::core::registry::{Lookup, PackageRegistry};
use crate::error::{DebgraphError, Result};
use crate::graph::GraphSink;
use crate::query::PackageQuerySource;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ParseErrorPolicy {
    #[default]
    Abort,
    Skip,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct BuildOptions {
    pub on_parse_error: ParseErrorPolicy,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BuildPhase {
    Seeding,
    Expanding,
    Done,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BuildSummary {
    pub packages: usize,
    pub expanded: usize,
    pub skipped: usize,
}

pub trait BuildObserver {
    fn on_discovered(&mut self, _record: &PackageRecord, _discovered: usize) {}
    fn on_expanded(&mut self, _name: &str, _expanded: usize) {}
    fn on_skipped(&mut self, _name: &str, _error: &InvalidDependencyName) {}
}

pub struct NoopObserver;

impl BuildObserver for NoopObserver {}

pub struct GraphBuilder<'a> {
    source: &'a dyn PackageQuerySource,
    sink: &'a mut dyn GraphSink,
    parser: DependencyTextParser,
    options: BuildOptions,
    registry: PackageRegistry,
    queue: VecDeque<String>,
    phase: BuildPhase,
    summary: BuildSummary,
}

impl<'a> GraphBuilder<'a> {
    pub fn new(
        source: &'a dyn PackageQuerySource,
        sink: &'a mut dyn GraphSink,
        options: BuildOptions,
    ) -> Result<Self> {
        Self::with_registry(source, sink, options, PackageRegistry::new())
    }

    pub fn with_registry(
        source: &'a dyn PackageQuerySource,
        sink: &'a mut dyn GraphSink,
        options: BuildOptions,
        registry: PackageRegistry,
    ) -> Result<Self> {
        let parser = DependencyTextParser::new()
            .map_err(|err| DebgraphError::Other(anyhow::Error::new(err)))?;
        Ok(Self {
            source,
            sink,
            parser,
            options,
            summary: BuildSummary {
                packages: registry.len(),
                ..BuildSummary::default()
            },
            registry,
            queue: VecDeque::new(),
            phase: BuildPhase::Seeding,
        })
    }

    pub fn phase(&self) -> BuildPhase {
        self.phase
    }

    pub fn registry(&self) -> &PackageRegistry {
        &self.registry
    }

    pub fn into_registry(self) -> PackageRegistry {
        self.registry
    }

    pub fn run(
        &mut self,
        seeds: &[String],
        observer: &mut dyn BuildObserver,
    ) -> Result<BuildSummary> {
        if self.phase != BuildPhase::Seeding {
            return Err(DebgraphError::Other(anyhow::anyhow!(
                "graph builder already ran"
            )));
        }
        self.seed(seeds, observer)?;
        self.expand(observer)?;
        Ok(self.summary)
    }

    fn seed(&mut self, seeds: &[String], observer: &mut dyn BuildObserver) -> Result<()> {
        for name in seeds {
            self.discover(name, observer)?;
        }
        self.phase = BuildPhase::Expanding;
        Ok(())
    }

    fn expand(&mut self, observer: &mut dyn BuildObserver) -> Result<()> {
        while let Some(name) = self.queue.pop_front() {
            let dependencies = self
                .registry
                .get(&name)
                .map(PackageRecord::dependency_names)
                .unwrap_or_default();
            self.summary.expanded += 1;
            observer.on_expanded(&name, self.summary.expanded);

            for dependency in &dependencies {
                self.discover(dependency, observer)?;
            }
        }
        self.phase = BuildPhase::Done;
        Ok(())
    }

    fn discover(&mut self, name: &str, observer: &mut dyn BuildObserver) -> Result<()> {
        let reservation = match self.registry.lookup_or_reserve(name) {
            Lookup::Found(_) => return Ok(()),
            Lookup::Vacant(reservation) => reservation,
        };

        let record = self.construct(name, observer)?;
        self.registry.register(reservation, record)?;
        self.queue.push_back(name.to_string());
        self.summary.packages = self.registry.len();
        if let Some(record) = self.registry.get(name) {
            observer.on_discovered(record, self.summary.packages);
        }
        Ok(())
    }

    fn construct(
        &mut self,
        name: &str,
        observer: &mut dyn BuildObserver,
    ) -> Result<PackageRecord> {
        let facts = self.source.facts(name);
        let record = match PackageRecord::from_facts(name, &facts, &self.parser) {
            Ok(record) => record,
            Err(source) => match self.options.on_parse_error {
                ParseErrorPolicy::Abort => {
                    return Err(DebgraphError::InvalidDependencyName {
                        package: name.to_string(),
                        source,
                    })
                }
                ParseErrorPolicy::Skip => {
                    observer.on_skipped(name, &source);
                    self.summary.skipped += 1;
                    PackageRecord::classify(name, &facts, DependencyGroups::default())
                }
            },
        };
        record.publish(&mut *self.sink);
        Ok(record)
    }
}

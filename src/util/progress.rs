use indicatif::{ProgressBar, ProgressDrawTarget, ProgressStyle};

use crate::core::depends::InvalidDependencyName;
use crate::core::package::PackageRecord;
use crate::graph::builder::BuildObserver;
use crate::util::output;

/// Progress bar over package expansion; its length grows as packages are discovered.
pub struct DiscoveryProgress {
    bar: ProgressBar,
    verbose: bool,
}

impl DiscoveryProgress {
    /// Quiet runs draw nothing. Verbose runs log each discovery instead of drawing a bar.
    pub fn new(quiet: bool, verbose: bool) -> Self {
        let bar = if quiet || verbose {
            ProgressBar::hidden()
        } else {
            let bar = ProgressBar::with_draw_target(Some(0), ProgressDrawTarget::stderr());
            if let Ok(style) = ProgressStyle::with_template("{spinner} {pos}/{len} {wide_msg}") {
                bar.set_style(style);
            }
            bar
        };
        Self { bar, verbose }
    }

    pub fn finish(&self) {
        self.bar.finish_and_clear();
    }
}

impl BuildObserver for DiscoveryProgress {
    fn on_discovered(&mut self, record: &PackageRecord, discovered: usize) {
        self.bar.set_length(discovered as u64);
        if self.verbose {
            output::debug(&format!(
                "found {} ({}{})",
                record.name(),
                record.state().as_str(),
                record
                    .version()
                    .filter(|version| !version.is_empty())
                    .map(|version| format!(" {version}"))
                    .unwrap_or_default()
            ));
        }
    }

    fn on_expanded(&mut self, name: &str, expanded: usize) {
        self.bar.set_position(expanded as u64);
        self.bar.set_message(name.to_string());
    }

    fn on_skipped(&mut self, name: &str, error: &InvalidDependencyName) {
        self.bar.suspend(|| {
            output::warn(&format!("ignoring dependencies of {name}: {error}"));
        });
    }
}

//! Build graph engine: targets, tests, install rules, custom steps, cache
//!
//! The graph owns all durable build state. The facade never mutates a target
//! behind the graph's back; every lookup goes through the registry here so
//! alias resolution and name uniqueness stay in one place.

use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::path::PathBuf;
use tracing::debug;

/// Kind of a named build artifact
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TargetKind {
    Executable,
    StaticLibrary,
    Utility,
}

impl TargetKind {
    /// Whether install rules may be registered for this kind.
    /// Only executables are installable in the minimal supported set.
    pub fn is_installable(&self) -> bool {
        matches!(self, TargetKind::Executable)
    }

    pub const fn as_str(&self) -> &'static str {
        match self {
            TargetKind::Executable => "executable",
            TargetKind::StaticLibrary => "static_library",
            TargetKind::Utility => "utility",
        }
    }
}

/// A named build artifact tracked by the graph
#[derive(Debug, Clone, Serialize)]
pub struct Target {
    name: String,
    kind: TargetKind,
    sources: Vec<PathBuf>,
    /// Accumulated properties in the `;`-delimited wire format
    properties: BTreeMap<String, String>,
    /// Direct link-library edges (private visibility)
    link_libraries: Vec<String>,
    have_install_rule: bool,
    imported: bool,
}

impl Target {
    fn new(name: impl Into<String>, kind: TargetKind, sources: Vec<PathBuf>) -> Self {
        Self {
            name: name.into(),
            kind,
            sources,
            properties: BTreeMap::new(),
            link_libraries: Vec::new(),
            have_install_rule: false,
            imported: false,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn kind(&self) -> TargetKind {
        self.kind
    }

    pub fn sources(&self) -> &[PathBuf] {
        &self.sources
    }

    pub fn is_imported(&self) -> bool {
        self.imported
    }

    /// Append a `;`-delimited chunk to a property, creating it if absent
    pub fn append_property(&mut self, name: &str, value: &str) {
        if value.is_empty() {
            return;
        }
        match self.properties.get_mut(name) {
            Some(existing) if !existing.is_empty() => {
                existing.push(';');
                existing.push_str(value);
            }
            _ => {
                self.properties.insert(name.to_string(), value.to_string());
            }
        }
    }

    pub fn property(&self, name: &str) -> Option<&str> {
        self.properties.get(name).map(String::as_str)
    }

    /// Ordered include-directory insertion. New entries go after existing
    /// ones unless `before` is set.
    pub fn insert_include(&mut self, dirs: &str, before: bool) {
        if before {
            let existing = self.properties.remove("INCLUDE_DIRECTORIES");
            let merged = match existing {
                Some(old) if !old.is_empty() => format!("{dirs};{old}"),
                _ => dirs.to_string(),
            };
            self.properties.insert("INCLUDE_DIRECTORIES".into(), merged);
        } else {
            self.append_property("INCLUDE_DIRECTORIES", dirs);
        }
    }

    /// Attach a direct link-library edge
    pub fn add_link_library(&mut self, library: impl Into<String>) {
        self.link_libraries.push(library.into());
    }

    pub fn link_libraries(&self) -> &[String] {
        &self.link_libraries
    }

    pub fn have_install_rule(&self) -> bool {
        self.have_install_rule
    }

    /// Transition the install-rule flag. False to true happens at most once;
    /// further calls are no-ops.
    pub fn set_have_install_rule(&mut self) {
        self.have_install_rule = true;
    }
}

/// A registered test, unique by name across the whole graph
#[derive(Debug, Clone)]
pub struct Test {
    name: String,
    command: Vec<String>,
    old_style: bool,
}

impl Test {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn command(&self) -> &[String] {
        &self.command
    }

    pub fn set_command(&mut self, command: Vec<String>) {
        self.command = command;
    }

    pub fn old_style(&self) -> bool {
        self.old_style
    }

    pub fn set_old_style(&mut self, old_style: bool) {
        self.old_style = old_style;
    }
}

/// Install-rule verbosity, selected per-rule from the engine-wide convention
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MessageLevel {
    #[default]
    Default,
    Always,
    Lazy,
    Never,
}

/// A generated install instruction for one target
#[derive(Debug, Clone)]
pub struct InstallRule {
    pub target: String,
    pub destination: String,
    pub permissions: String,
    pub component: String,
    pub configurations: Vec<String>,
    pub message: MessageLevel,
    pub exclude_from_all: bool,
    pub optional: bool,
}

/// Engine-wide defaults for install rules and custom targets.
///
/// These changed across iterations of the upstream tooling, so they are
/// configuration rather than hardcoded policy.
#[derive(Debug, Clone)]
pub struct InstallDefaults {
    pub component: String,
    pub exclude_from_all: bool,
    /// Whether custom targets participate in "build all"
    pub custom_target_in_all: bool,
}

impl Default for InstallDefaults {
    fn default() -> Self {
        Self {
            component: "Unspecified".to_string(),
            exclude_from_all: false,
            custom_target_in_all: false,
        }
    }
}

/// A custom build step producing an output file
#[derive(Debug, Clone)]
pub struct CustomCommand {
    pub output: String,
    pub command_lines: Vec<Vec<String>>,
}

/// A named custom step with no output file
#[derive(Debug, Clone)]
pub struct CustomTarget {
    pub name: String,
    pub command_lines: Vec<Vec<String>>,
    pub exclude_from_all: bool,
}

/// Kind of a cache entry
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CacheEntryKind {
    Bool,
    Static,
}

/// A persisted cache variable
#[derive(Debug, Clone)]
pub struct CacheEntry {
    pub value: String,
    pub doc: String,
    pub kind: CacheEntryKind,
}

/// Cache-value truthiness: ON/1/TRUE/YES/Y, case-insensitive
pub fn is_on(value: &str) -> bool {
    matches!(
        value.to_ascii_uppercase().as_str(),
        "ON" | "1" | "TRUE" | "YES" | "Y"
    )
}

/// The build graph: global registries for every kind of build state
#[derive(Debug, Default)]
pub struct BuildGraph {
    targets: BTreeMap<String, Target>,
    aliases: HashMap<String, String>,
    tests: BTreeMap<String, Test>,
    /// Names of tests that already have a test-rule generator attached
    test_generators: BTreeSet<String>,
    install_rules: Vec<InstallRule>,
    install_components: BTreeSet<String>,
    custom_commands: Vec<CustomCommand>,
    custom_targets: Vec<CustomTarget>,
    cache: BTreeMap<String, CacheEntry>,
    install_target_enabled: bool,
    pub install_defaults: InstallDefaults,
}

impl BuildGraph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a new target. Rejects names already taken by a target or an
    /// alias; the caller observes rejection only through later lookups.
    pub fn add_target(
        &mut self,
        name: &str,
        kind: TargetKind,
        sources: Vec<PathBuf>,
    ) -> bool {
        if self.targets.contains_key(name) || self.aliases.contains_key(name) {
            debug!(target_name = name, "rejecting duplicate target name");
            return false;
        }
        self.targets
            .insert(name.to_string(), Target::new(name, kind, sources));
        true
    }

    /// Register an alias for an existing target
    pub fn add_alias(&mut self, alias: &str, target: &str) -> bool {
        if self.targets.contains_key(alias)
            || self.aliases.contains_key(alias)
            || !self.targets.contains_key(target)
        {
            return false;
        }
        self.aliases.insert(alias.to_string(), target.to_string());
        true
    }

    /// Global lookup, resolving aliases before matching
    pub fn find_target(&self, name: &str) -> Option<&Target> {
        let real = self.aliases.get(name).map(String::as_str).unwrap_or(name);
        self.targets.get(real)
    }

    pub fn find_target_mut(&mut self, name: &str) -> Option<&mut Target> {
        let real = self
            .aliases
            .get(name)
            .map(String::as_str)
            .unwrap_or(name)
            .to_string();
        self.targets.get_mut(&real)
    }

    /// Global lookup that never resolves aliases
    pub fn find_target_no_alias(&self, name: &str) -> Option<&Target> {
        self.targets.get(name)
    }

    pub fn find_target_no_alias_mut(&mut self, name: &str) -> Option<&mut Target> {
        self.targets.get_mut(name)
    }

    pub fn targets(&self) -> impl Iterator<Item = &Target> {
        self.targets.values()
    }

    pub fn test(&self, name: &str) -> Option<&Test> {
        self.tests.get(name)
    }

    pub fn test_mut(&mut self, name: &str) -> Option<&mut Test> {
        self.tests.get_mut(name)
    }

    pub fn test_count(&self) -> usize {
        self.tests.len()
    }

    /// Create a test object. The caller must have checked for duplicates.
    pub fn create_test(&mut self, name: &str) -> &mut Test {
        self.tests.entry(name.to_string()).or_insert_with(|| Test {
            name: name.to_string(),
            command: Vec::new(),
            old_style: false,
        })
    }

    /// Attach a test-rule generator. Idempotent per test name.
    pub fn attach_test_generator(&mut self, name: &str) {
        self.test_generators.insert(name.to_string());
    }

    pub fn has_test_generator(&self, name: &str) -> bool {
        self.test_generators.contains(name)
    }

    /// Enable the build-wide install target. Idempotent.
    pub fn enable_install_target(&mut self) {
        self.install_target_enabled = true;
    }

    pub fn install_target_enabled(&self) -> bool {
        self.install_target_enabled
    }

    pub fn add_install_rule(&mut self, rule: InstallRule) {
        self.install_components.insert(rule.component.clone());
        self.install_rules.push(rule);
    }

    pub fn install_rules(&self) -> &[InstallRule] {
        &self.install_rules
    }

    pub fn add_custom_command(&mut self, output: &str, command_lines: Vec<Vec<String>>) {
        self.custom_commands.push(CustomCommand {
            output: output.to_string(),
            command_lines,
        });
    }

    pub fn custom_commands(&self) -> &[CustomCommand] {
        &self.custom_commands
    }

    /// Register a named custom step. The name joins the target namespace as a
    /// utility target, so the usual uniqueness rule applies.
    pub fn add_custom_target(
        &mut self,
        name: &str,
        command_lines: Vec<Vec<String>>,
        exclude_from_all: bool,
    ) -> bool {
        if !self.add_target(name, TargetKind::Utility, Vec::new()) {
            return false;
        }
        self.custom_targets.push(CustomTarget {
            name: name.to_string(),
            command_lines,
            exclude_from_all,
        });
        true
    }

    pub fn custom_targets(&self) -> &[CustomTarget] {
        &self.custom_targets
    }

    pub fn cache_entry(&self, name: &str) -> Option<&CacheEntry> {
        self.cache.get(name)
    }

    /// Set a cache entry unconditionally
    pub fn set_cache_entry(&mut self, name: &str, value: &str, doc: &str, kind: CacheEntryKind) {
        self.cache.insert(
            name.to_string(),
            CacheEntry {
                value: value.to_string(),
                doc: doc.to_string(),
                kind,
            },
        );
    }

    /// Set a cache entry only if it does not exist yet. Returns whether the
    /// entry was written.
    pub fn set_cache_entry_if_absent(
        &mut self,
        name: &str,
        value: &str,
        doc: &str,
        kind: CacheEntryKind,
    ) -> bool {
        if self.cache.contains_key(name) {
            return false;
        }
        self.set_cache_entry(name, value, doc, kind);
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sources(paths: &[&str]) -> Vec<PathBuf> {
        paths.iter().map(PathBuf::from).collect()
    }

    #[test]
    fn test_add_target_rejects_duplicates() {
        let mut graph = BuildGraph::new();
        assert!(graph.add_target("app", TargetKind::Executable, sources(&["/s/main.cpp"])));
        assert!(!graph.add_target("app", TargetKind::StaticLibrary, Vec::new()));
        assert_eq!(graph.find_target("app").unwrap().kind(), TargetKind::Executable);
    }

    #[test]
    fn test_alias_resolution() {
        let mut graph = BuildGraph::new();
        graph.add_target("util", TargetKind::StaticLibrary, Vec::new());
        assert!(graph.add_alias("project::util", "util"));

        assert_eq!(graph.find_target("project::util").unwrap().name(), "util");
        assert!(graph.find_target_no_alias("project::util").is_none());
    }

    #[test]
    fn test_alias_name_reserved() {
        let mut graph = BuildGraph::new();
        graph.add_target("util", TargetKind::StaticLibrary, Vec::new());
        graph.add_alias("u", "util");
        assert!(!graph.add_target("u", TargetKind::Executable, Vec::new()));
    }

    #[test]
    fn test_append_property_wire_format() {
        let mut graph = BuildGraph::new();
        graph.add_target("app", TargetKind::Executable, Vec::new());

        let target = graph.find_target_mut("app").unwrap();
        target.append_property("COMPILE_DEFINITIONS", "FOO=1");
        target.append_property("COMPILE_DEFINITIONS", "BAR=2;BAZ=3");

        assert_eq!(
            target.property("COMPILE_DEFINITIONS"),
            Some("FOO=1;BAR=2;BAZ=3")
        );
    }

    #[test]
    fn test_insert_include_ordering() {
        let mut graph = BuildGraph::new();
        graph.add_target("app", TargetKind::Executable, Vec::new());

        let target = graph.find_target_mut("app").unwrap();
        target.insert_include("/a", false);
        target.insert_include("/b", false);
        target.insert_include("/c", true);

        assert_eq!(target.property("INCLUDE_DIRECTORIES"), Some("/c;/a;/b"));
    }

    #[test]
    fn test_install_flag_single_transition() {
        let mut graph = BuildGraph::new();
        graph.add_target("app", TargetKind::Executable, Vec::new());

        let target = graph.find_target_mut("app").unwrap();
        assert!(!target.have_install_rule());
        target.set_have_install_rule();
        target.set_have_install_rule();
        assert!(target.have_install_rule());
    }

    #[test]
    fn test_custom_target_joins_namespace() {
        let mut graph = BuildGraph::new();
        assert!(graph.add_custom_target("docs", vec![vec!["doxygen".into()]], true));
        assert_eq!(graph.find_target("docs").unwrap().kind(), TargetKind::Utility);
        // A second custom target with the same name is rejected
        assert!(!graph.add_custom_target("docs", Vec::new(), true));
    }

    #[test]
    fn test_cache_if_absent() {
        let mut graph = BuildGraph::new();
        assert!(graph.set_cache_entry_if_absent("OPT", "ON", "doc", CacheEntryKind::Bool));
        assert!(!graph.set_cache_entry_if_absent("OPT", "OFF", "doc", CacheEntryKind::Bool));
        assert_eq!(graph.cache_entry("OPT").unwrap().value, "ON");
    }

    #[test]
    fn test_is_on() {
        for v in ["ON", "on", "1", "TRUE", "yes", "Y"] {
            assert!(is_on(v), "{v} should be on");
        }
        for v in ["OFF", "0", "FALSE", "no", "", "2"] {
            assert!(!is_on(v), "{v} should be off");
        }
    }

    #[test]
    fn test_attach_test_generator_idempotent() {
        let mut graph = BuildGraph::new();
        graph.create_test("t1");
        graph.attach_test_generator("t1");
        graph.attach_test_generator("t1");
        assert!(graph.has_test_generator("t1"));
        assert_eq!(graph.test_count(), 1);
    }
}

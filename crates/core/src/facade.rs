//! The build scope & registry facade
//!
//! This is the capability surface a script interpreter drives instead of
//! touching the graph directly. It keeps the scope stack consistent across
//! nested directory entry/exit, maps the two-tier visibility model onto the
//! graph's property rules, and performs idempotent registration of targets,
//! tests, install rules, and custom steps.
//!
//! Lookup misses are deliberately lenient: every mutating operation reports
//! an [`Outcome`] the caller may surface or ignore, and the facade itself
//! never raises on a miss. Fatal conditions set a process-wide flag the
//! interpreter polls; nothing unwinds across the interpreter boundary.

use crate::error::CoreError;
use crate::genex;
use crate::graph::{BuildGraph, CacheEntryKind, InstallRule, MessageLevel, TargetKind, is_on};
use crate::paths::{resolve_paths, resolve_sources};
use crate::props::{self, Visibility};
use crate::scope::{Scope, ScopeStack};
use bld_platform::{CompilerFamily, CompilerInfo, SystemInfo};
use std::cell::RefCell;
use std::collections::HashMap;
use std::path::Path;
use std::rc::Rc;
use tracing::{debug, error, info, warn};

/// Languages enabled when a project is registered without an explicit set
const DEFAULT_LANGUAGES: [&str; 2] = ["C", "CXX"];

/// Shared handle to a facade, as captured by interpreter callbacks
pub type FacadeHandle = Rc<RefCell<BuildFacade>>;

/// What a mutating registry operation did
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// The operation took effect
    Applied,
    /// A target or test was found but the operation did not apply to it
    Skipped,
    /// Nothing under that name; lenient no-op
    NotFound,
}

impl Outcome {
    pub fn applied(&self) -> bool {
        matches!(self, Outcome::Applied)
    }
}

/// Version of the facade surface, reported to scripts
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FacadeVersion {
    pub major: u32,
    pub minor: u32,
    pub patch: u32,
}

impl FacadeVersion {
    pub fn current() -> Self {
        let mut parts = env!("CARGO_PKG_VERSION")
            .splitn(3, '.')
            .map(|p| p.parse().unwrap_or(0));
        Self {
            major: parts.next().unwrap_or(0),
            minor: parts.next().unwrap_or(0),
            patch: parts.next().unwrap_or(0),
        }
    }
}

/// The facade between a script interpreter and the build graph
pub struct BuildFacade {
    graph: Rc<RefCell<BuildGraph>>,
    scopes: ScopeStack,
    fatal_error: Option<String>,
    extern_defines: HashMap<String, String>,
}

impl BuildFacade {
    /// Bind a facade to an injected graph and a root scope
    pub fn new(graph: Rc<RefCell<BuildGraph>>, root: Scope) -> Self {
        Self {
            graph,
            scopes: ScopeStack::new(root),
            fatal_error: None,
            extern_defines: HashMap::new(),
        }
    }

    pub fn into_handle(self) -> FacadeHandle {
        Rc::new(RefCell::new(self))
    }

    /// Externally supplied `-D` defines, queryable from scripts
    pub fn set_extern_defines(&mut self, defines: HashMap<String, String>) {
        self.extern_defines = defines;
    }

    pub fn graph(&self) -> Rc<RefCell<BuildGraph>> {
        Rc::clone(&self.graph)
    }

    // ---- diagnostics ------------------------------------------------------

    pub fn message(&self, what: &str) {
        info!("{what}");
    }

    pub fn warning(&self, what: &str) {
        warn!("{what}");
    }

    /// Soft error: reported, never affects control flow or exit status
    pub fn error(&self, what: &str) {
        error!("{what}");
    }

    /// Record a fatal condition. The first message wins the sink; the flag
    /// stays set for the rest of the run.
    pub fn fatal_error(&mut self, what: &str) {
        error!("{what}");
        if self.fatal_error.is_none() {
            self.fatal_error = Some(what.to_string());
        }
    }

    pub fn fatal_error_occurred(&self) -> bool {
        self.fatal_error.is_some()
    }

    pub fn fatal_error_message(&self) -> Option<&str> {
        self.fatal_error.as_deref()
    }

    // ---- directory context ------------------------------------------------

    pub fn current_source_dir(&self) -> &Path {
        self.scopes.current().source_dir()
    }

    pub fn current_binary_dir(&self) -> &Path {
        self.scopes.current().binary_dir()
    }

    pub fn root_source_dir(&self) -> &Path {
        self.scopes.root().source_dir()
    }

    pub fn scope_depth(&self) -> usize {
        self.scopes.depth()
    }

    // ---- project ----------------------------------------------------------

    /// Register the project for the current scope. The name sticks once;
    /// a second registration in the same scope is ignored with a warning.
    pub fn register_project(&mut self, name: &str) {
        if !self.scopes.current_mut().set_project_name(name) {
            warn!(project = name, "scope already has a project; ignoring");
            return;
        }

        let source = self.current_source_dir().display().to_string();
        let binary = self.current_binary_dir().display().to_string();

        {
            let mut graph = self.graph.borrow_mut();
            graph.set_cache_entry(
                &format!("{name}_BINARY_DIR"),
                &binary,
                "Value computed by bld",
                CacheEntryKind::Static,
            );
            graph.set_cache_entry(
                &format!("{name}_SOURCE_DIR"),
                &source,
                "Value computed by bld",
                CacheEntryKind::Static,
            );
        }

        let scope = self.scopes.current_mut();
        scope.set_variable("PROJECT_BINARY_DIR", &binary);
        scope.set_variable("PROJECT_SOURCE_DIR", &source);
        scope.enable_languages(DEFAULT_LANGUAGES);

        info!(project = name, "registered project");
    }

    // ---- targets ----------------------------------------------------------

    pub fn create_executable(&mut self, name: &str, sources: &[String]) -> Outcome {
        self.create_target(name, TargetKind::Executable, sources)
    }

    pub fn create_library(&mut self, name: &str, sources: &[String]) -> Outcome {
        self.create_target(name, TargetKind::StaticLibrary, sources)
    }

    fn create_target(&mut self, name: &str, kind: TargetKind, sources: &[String]) -> Outcome {
        let resolved = resolve_sources(sources, self.current_source_dir());
        if !self.graph.borrow_mut().add_target(name, kind, resolved) {
            // Name uniqueness is the engine's call; rejection is observable
            // only through later lookups.
            return Outcome::NotFound;
        }
        self.scopes.current_mut().add_local_target(name);
        debug!(target_name = name, kind = kind.as_str(), "created target");
        Outcome::Applied
    }

    /// Global, alias-aware existence check
    pub fn has_target(&self, name: &str) -> bool {
        self.graph.borrow().find_target(name).is_some()
    }

    /// Attach a link dependency. The lookup is global since linking is
    /// commonly declared in a different directory than target creation.
    pub fn link(&mut self, target_name: &str, visibility: Visibility, library_name: &str) -> Outcome {
        let mut graph = self.graph.borrow_mut();
        let Some(target) = graph.find_target_mut(target_name) else {
            return Outcome::NotFound;
        };

        match visibility {
            Visibility::Private => target.add_link_library(library_name),
            Visibility::Interface => {
                target.append_property("INTERFACE_LINK_LIBRARIES", &genex::escape(library_name));
            }
        }
        Outcome::Applied
    }

    pub fn add_include_directories(
        &mut self,
        target_name: &str,
        visibility: Visibility,
        dirs: &[String],
    ) -> Outcome {
        let joined = resolve_paths(dirs, self.current_source_dir());
        let mut graph = self.graph.borrow_mut();
        let Some(target) = graph.find_target_mut(target_name) else {
            return Outcome::NotFound;
        };

        match visibility {
            Visibility::Interface => {
                target.append_property("INTERFACE_INCLUDE_DIRECTORIES", &joined);
            }
            Visibility::Private => target.insert_include(&joined, false),
        }
        Outcome::Applied
    }

    pub fn add_compile_definitions(
        &mut self,
        target_name: &str,
        visibility: Visibility,
        definitions: &[String],
    ) -> Outcome {
        let joined = props::compose_definitions(definitions);
        self.append_target_property(target_name, visibility, "COMPILE_DEFINITIONS", &joined)
    }

    pub fn add_compile_options(
        &mut self,
        target_name: &str,
        visibility: Visibility,
        options: &[String],
    ) -> Outcome {
        let joined = props::compose_options(options);
        self.append_target_property(target_name, visibility, "COMPILE_OPTIONS", &joined)
    }

    fn append_target_property(
        &mut self,
        target_name: &str,
        visibility: Visibility,
        base: &str,
        joined: &str,
    ) -> Outcome {
        let mut graph = self.graph.borrow_mut();
        let Some(target) = graph.find_target_mut(target_name) else {
            return Outcome::NotFound;
        };
        target.append_property(&visibility.property_name(base), joined);
        Outcome::Applied
    }

    // ---- install ----------------------------------------------------------

    /// Register an install rule for a target. Resolution tries the current
    /// scope's locally-declared non-alias targets first, then the global
    /// namespace excluding aliases and imported targets. Non-installable
    /// kinds are skipped without touching the target.
    pub fn install(&mut self, target_name: &str, destination: &str) -> Outcome {
        let local = self.scopes.current().has_local_target(target_name);
        let mut graph = self.graph.borrow_mut();
        graph.enable_install_target();

        let kind = match graph.find_target_no_alias(target_name) {
            Some(target) if local || !target.is_imported() => target.kind(),
            _ => return Outcome::NotFound,
        };

        if !kind.is_installable() {
            debug!(
                target_name,
                kind = kind.as_str(),
                "target kind is not installable; no install rule registered"
            );
            return Outcome::Skipped;
        }

        if let Some(target) = graph.find_target_no_alias_mut(target_name) {
            target.set_have_install_rule();
        }

        let defaults = graph.install_defaults.clone();
        graph.add_install_rule(InstallRule {
            target: target_name.to_string(),
            destination: destination.to_string(),
            permissions: String::new(),
            component: defaults.component,
            configurations: Vec::new(),
            message: MessageLevel::Default,
            exclude_from_all: defaults.exclude_from_all,
            optional: false,
        });

        info!(target_name, destination, "registered install rule");
        Outcome::Applied
    }

    // ---- tests ------------------------------------------------------------

    /// Register a test. A name already taken by a test this facade did not
    /// create is a fatal duplicate; a self-created name updates the command
    /// in place, with the test-rule generator attached only the first time.
    pub fn register_test(&mut self, name: &str, command: &[String]) -> Outcome {
        let existing = self.graph.borrow().test(name).map(|test| test.old_style());

        match existing {
            // Self-created: update the command; the generator stays attached.
            Some(true) => {
                let mut graph = self.graph.borrow_mut();
                if let Some(test) = graph.test_mut(name) {
                    test.set_command(command.to_vec());
                }
                Outcome::Applied
            }
            Some(false) => {
                self.fatal_error(&format!(
                    "given test name \"{name}\" which already exists in this directory."
                ));
                Outcome::Skipped
            }
            None => {
                let mut graph = self.graph.borrow_mut();
                let test = graph.create_test(name);
                test.set_old_style(true);
                test.set_command(command.to_vec());
                graph.attach_test_generator(name);
                Outcome::Applied
            }
        }
    }

    // ---- custom steps -----------------------------------------------------

    pub fn add_custom_command(&mut self, command: &[String], output: &str) {
        self.graph
            .borrow_mut()
            .add_custom_command(output, vec![command.to_vec()]);
    }

    pub fn add_custom_target(&mut self, name: &str, command: &[String]) -> Outcome {
        let mut graph = self.graph.borrow_mut();
        let exclude_from_all = !graph.install_defaults.custom_target_in_all;
        if graph.add_custom_target(name, vec![command.to_vec()], exclude_from_all) {
            Outcome::Applied
        } else {
            Outcome::NotFound
        }
    }

    // ---- options, properties, variables -----------------------------------

    /// Tri-state option lookup: `None` until registered or cached
    pub fn get_option(&self, name: &str) -> Option<bool> {
        self.graph
            .borrow()
            .cache_entry(name)
            .map(|entry| is_on(&entry.value))
    }

    /// Register an option with its default. An existing cache entry wins.
    pub fn register_option(&mut self, name: &str, description: &str, default: bool) {
        let value = if default { "ON" } else { "OFF" };
        self.graph.borrow_mut().set_cache_entry_if_absent(
            name,
            value,
            description,
            CacheEntryKind::Bool,
        );
    }

    /// Set a directory-scoped property, translating well-known symbolic
    /// values on the way in
    pub fn set_property(&mut self, name: &str, value: &str) {
        let adjusted = props::adjust_known_property(name, value);
        self.scopes.current_mut().set_variable(name, &adjusted);
    }

    pub fn set_variable(&mut self, name: &str, value: &str) {
        self.scopes.current_mut().set_variable(name, value);
    }

    pub fn get_variable(&self, name: &str) -> Option<String> {
        self.scopes.current().variable(name).map(str::to_string)
    }

    pub fn try_get_extern_define(&self, name: &str) -> Option<String> {
        self.extern_defines.get(name).cloned()
    }

    // ---- environment queries ----------------------------------------------

    pub fn version(&self) -> FacadeVersion {
        FacadeVersion::current()
    }

    pub fn compiler_info(&self) -> CompilerInfo {
        let family = self
            .get_variable("CXX_COMPILER_ID")
            .map(|id| CompilerFamily::from_id(&id))
            .unwrap_or_default();
        CompilerInfo { family }
    }

    pub fn system_info(&self) -> SystemInfo {
        SystemInfo::current()
    }

    pub fn enable_testing(&mut self) {
        self.scopes.current_mut().set_variable("TESTING_ENABLED", "1");
    }

    pub fn testing_enabled(&self) -> bool {
        self.scopes.current().variable("TESTING_ENABLED") == Some("1")
    }

    pub fn test_runner_command(&self) -> Option<String> {
        self.get_variable("TEST_RUNNER")
    }

    pub fn make_directory(&self, dir: &str) -> Result<(), CoreError> {
        std::fs::create_dir_all(dir)?;
        Ok(())
    }

    // ---- scope protocol ----------------------------------------------------

    /// Enter a child scope for an interpreter-driven sub-script. Constraint
    /// violations go to the fatal-error channel and leave the stack as-is.
    pub fn enter_child_scope(&mut self, dir: &str) -> Result<(), CoreError> {
        match self.scopes.enter(dir) {
            Ok(()) => Ok(()),
            Err(err) => {
                let msg = err.to_string();
                self.fatal_error(&msg);
                Err(err)
            }
        }
    }

    /// Pop the current scope after a sub-script run completes
    pub fn leave_child_scope(&mut self) -> Scope {
        self.scopes.exit()
    }
}

/// Scoped-acquisition guard around a sub-script scope.
///
/// Pops the scope exactly once on every exit path of the enclosing
/// script-execution routine, including early returns on fatal errors.
pub struct ScopeGuard {
    facade: FacadeHandle,
}

impl ScopeGuard {
    /// Enter `dir` and arm the guard
    pub fn enter(facade: &FacadeHandle, dir: &str) -> Result<Self, CoreError> {
        facade.borrow_mut().enter_child_scope(dir)?;
        Ok(Self {
            facade: Rc::clone(facade),
        })
    }
}

impl Drop for ScopeGuard {
    fn drop(&mut self) {
        self.facade.borrow_mut().leave_child_scope();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn facade_in(temp: &TempDir) -> BuildFacade {
        let graph = Rc::new(RefCell::new(BuildGraph::new()));
        let root = Scope::root(temp.path(), temp.path().join("out"));
        BuildFacade::new(graph, root)
    }

    fn strings(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_create_executable_resolves_sources() {
        let temp = TempDir::new().unwrap();
        let mut facade = facade_in(&temp);

        let outcome = facade.create_executable("app", &strings(&["main.cpp"]));
        assert_eq!(outcome, Outcome::Applied);

        let graph = facade.graph();
        let graph = graph.borrow();
        let target = graph.find_target("app").unwrap();
        assert!(target.sources()[0].is_absolute());
        assert!(target.sources()[0].ends_with("main.cpp"));
    }

    #[test]
    fn test_duplicate_target_silent_noop() {
        let temp = TempDir::new().unwrap();
        let mut facade = facade_in(&temp);

        facade.create_executable("app", &strings(&["main.cpp"]));
        let outcome = facade.create_library("app", &strings(&["lib.cpp"]));
        assert_eq!(outcome, Outcome::NotFound);
        assert!(!facade.fatal_error_occurred());
    }

    #[test]
    fn test_link_visibility() {
        let temp = TempDir::new().unwrap();
        let mut facade = facade_in(&temp);
        facade.create_executable("app", &strings(&["main.cpp"]));

        assert!(facade.link("app", Visibility::Private, "m").applied());
        assert!(facade.link("app", Visibility::Interface, "z").applied());

        let graph = facade.graph();
        let graph = graph.borrow();
        let target = graph.find_target("app").unwrap();
        assert_eq!(target.link_libraries(), ["m"]);
        assert_eq!(target.property("INTERFACE_LINK_LIBRARIES"), Some("z"));
    }

    #[test]
    fn test_link_unknown_target_noop() {
        let temp = TempDir::new().unwrap();
        let mut facade = facade_in(&temp);

        let outcome = facade.link("ghost", Visibility::Private, "m");
        assert_eq!(outcome, Outcome::NotFound);
        assert!(!facade.fatal_error_occurred());
    }

    #[test]
    fn test_include_directories_by_visibility() {
        let temp = TempDir::new().unwrap();
        let mut facade = facade_in(&temp);
        facade.create_executable("app", &strings(&["main.cpp"]));

        facade.add_include_directories("app", Visibility::Private, &strings(&["first"]));
        facade.add_include_directories("app", Visibility::Private, &strings(&["second"]));
        facade.add_include_directories("app", Visibility::Interface, &strings(&["/api"]));

        let graph = facade.graph();
        let graph = graph.borrow();
        let target = graph.find_target("app").unwrap();

        // Private entries append after existing ones
        let dirs = target.property("INCLUDE_DIRECTORIES").unwrap();
        let first = dirs.find("first").unwrap();
        let second = dirs.find("second").unwrap();
        assert!(first < second);

        assert_eq!(target.property("INTERFACE_INCLUDE_DIRECTORIES"), Some("/api"));
    }

    #[test]
    fn test_compile_definitions_by_visibility() {
        let temp = TempDir::new().unwrap();
        let mut facade = facade_in(&temp);
        facade.create_executable("app", &strings(&["main.cpp"]));

        facade.add_compile_definitions("app", Visibility::Private, &strings(&["-DFOO=1", "BAR=2"]));
        facade.add_compile_definitions("app", Visibility::Interface, &strings(&["PUB=1"]));

        let graph = facade.graph();
        let graph = graph.borrow();
        let target = graph.find_target("app").unwrap();
        assert_eq!(target.property("COMPILE_DEFINITIONS"), Some("FOO=1;BAR=2"));
        assert_eq!(target.property("INTERFACE_COMPILE_DEFINITIONS"), Some("PUB=1"));
    }

    #[test]
    fn test_install_executable() {
        let temp = TempDir::new().unwrap();
        let mut facade = facade_in(&temp);
        facade.create_executable("app", &strings(&["main.cpp"]));

        let outcome = facade.install("app", "bin");
        assert_eq!(outcome, Outcome::Applied);

        let graph = facade.graph();
        let graph = graph.borrow();
        assert!(graph.install_target_enabled());
        assert!(graph.find_target("app").unwrap().have_install_rule());

        let rules = graph.install_rules();
        assert_eq!(rules.len(), 1);
        assert_eq!(rules[0].target, "app");
        assert_eq!(rules[0].destination, "bin");
        assert_eq!(rules[0].component, "Unspecified");
        assert!(!rules[0].exclude_from_all);
    }

    #[test]
    fn test_install_library_is_noop() {
        let temp = TempDir::new().unwrap();
        let mut facade = facade_in(&temp);
        facade.create_library("util", &strings(&["util.cpp"]));

        let outcome = facade.install("util", "lib");
        assert_eq!(outcome, Outcome::Skipped);

        let graph = facade.graph();
        let graph = graph.borrow();
        assert!(!graph.find_target("util").unwrap().have_install_rule());
        assert!(graph.install_rules().is_empty());
    }

    #[test]
    fn test_install_unknown_target() {
        let temp = TempDir::new().unwrap();
        let mut facade = facade_in(&temp);

        assert_eq!(facade.install("ghost", "bin"), Outcome::NotFound);
        let graph = facade.graph();
        assert!(graph.borrow().install_rules().is_empty());
    }

    #[test]
    fn test_register_test_updates_command() {
        let temp = TempDir::new().unwrap();
        let mut facade = facade_in(&temp);

        facade.register_test("t1", &strings(&["run_t1", "--fast"]));
        facade.register_test("t1", &strings(&["run_t1", "--slow"]));

        let graph = facade.graph();
        let graph = graph.borrow();
        assert_eq!(graph.test_count(), 1);
        assert_eq!(graph.test("t1").unwrap().command(), ["run_t1", "--slow"]);
        assert!(graph.has_test_generator("t1"));
        assert!(!facade.fatal_error_occurred());
    }

    #[test]
    fn test_register_test_foreign_duplicate_is_fatal() {
        let temp = TempDir::new().unwrap();
        let mut facade = facade_in(&temp);

        // A test created outside this facade, e.g. by a newer declarative path
        {
            let graph = facade.graph();
            let mut graph = graph.borrow_mut();
            graph.create_test("t1").set_old_style(false);
        }

        let outcome = facade.register_test("t1", &strings(&["cmd"]));
        assert_eq!(outcome, Outcome::Skipped);
        assert!(facade.fatal_error_occurred());

        let graph = facade.graph();
        let graph = graph.borrow();
        assert_eq!(graph.test_count(), 1);
        // The foreign test's command is untouched
        assert!(graph.test("t1").unwrap().command().is_empty());
    }

    #[test]
    fn test_option_tristate() {
        let temp = TempDir::new().unwrap();
        let mut facade = facade_in(&temp);

        assert_eq!(facade.get_option("USE_FOO"), None);
        facade.register_option("USE_FOO", "use foo", true);
        assert_eq!(facade.get_option("USE_FOO"), Some(true));

        // Re-registration never overwrites
        facade.register_option("USE_FOO", "use foo", false);
        assert_eq!(facade.get_option("USE_FOO"), Some(true));
    }

    #[test]
    fn test_set_property_adjusts_known_values() {
        let temp = TempDir::new().unwrap();
        let mut facade = facade_in(&temp);

        facade.set_property("LANGUAGE_STANDARD", "cpp_17");
        assert_eq!(facade.get_variable("LANGUAGE_STANDARD").as_deref(), Some("17"));

        facade.set_property("OTHER", "cpp_17");
        assert_eq!(facade.get_variable("OTHER").as_deref(), Some("cpp_17"));
    }

    #[test]
    fn test_register_project_variables() {
        let temp = TempDir::new().unwrap();
        let mut facade = facade_in(&temp);

        facade.register_project("demo");

        assert!(facade.get_variable("PROJECT_SOURCE_DIR").is_some());
        assert!(facade.get_variable("PROJECT_BINARY_DIR").is_some());

        let graph = facade.graph();
        let graph = graph.borrow();
        assert!(graph.cache_entry("demo_SOURCE_DIR").is_some());
        assert!(graph.cache_entry("demo_BINARY_DIR").is_some());
    }

    #[test]
    fn test_enter_out_of_tree_sets_fatal_and_keeps_depth() {
        let temp = TempDir::new().unwrap();
        let other = TempDir::new().unwrap();
        let mut facade = facade_in(&temp);

        let result = facade.enter_child_scope(&other.path().display().to_string());
        assert!(result.is_err());
        assert!(facade.fatal_error_occurred());
        assert_eq!(facade.scope_depth(), 1);
    }

    #[test]
    fn test_scope_guard_pops_on_drop() {
        let temp = TempDir::new().unwrap();
        std::fs::create_dir(temp.path().join("sub")).unwrap();

        let handle = facade_in(&temp).into_handle();
        {
            let _guard = ScopeGuard::enter(&handle, "sub").unwrap();
            assert_eq!(handle.borrow().scope_depth(), 2);
        }
        assert_eq!(handle.borrow().scope_depth(), 1);
    }

    #[test]
    fn test_compiler_info_from_variable() {
        let temp = TempDir::new().unwrap();
        let mut facade = facade_in(&temp);

        assert_eq!(facade.compiler_info().family, CompilerFamily::Unknown);
        facade.set_variable("CXX_COMPILER_ID", "Clang");
        assert_eq!(facade.compiler_info().family, CompilerFamily::Clang);
    }

    #[test]
    fn test_extern_defines() {
        let temp = TempDir::new().unwrap();
        let mut facade = facade_in(&temp);

        assert_eq!(facade.try_get_extern_define("FLAG"), None);
        facade.set_extern_defines(HashMap::from([("FLAG".to_string(), "on".to_string())]));
        assert_eq!(facade.try_get_extern_define("FLAG").as_deref(), Some("on"));
    }
}

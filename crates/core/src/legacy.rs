//! Legacy declarative directory configuration
//!
//! Before build scripts, a directory was described by a declarative
//! `build.toml` manifest. The engine configures such directories itself,
//! without the interpreter: parse the manifest, apply it against the facade,
//! recurse into declared subdirectories. Scope mechanics are shared with the
//! script path; only the caller differs.

use crate::error::CoreError;
use crate::facade::BuildFacade;
use crate::props::Visibility;
use serde::Deserialize;
use std::path::Path;
use tracing::debug;

/// Manifest file name the legacy path looks for
pub const MANIFEST_FILE: &str = "build.toml";

/// A directory's declarative build description
#[derive(Debug, Deserialize)]
pub struct DirectoryManifest {
    pub project: Option<ProjectSection>,
    #[serde(default)]
    pub executable: Vec<TargetSection>,
    #[serde(default)]
    pub library: Vec<TargetSection>,
    #[serde(default)]
    pub link: Vec<LinkSection>,
    #[serde(default)]
    pub test: Vec<TestSection>,
    #[serde(default)]
    pub install: Vec<InstallSection>,
    #[serde(default)]
    pub subdirectories: Vec<String>,
}

#[derive(Debug, Deserialize)]
pub struct ProjectSection {
    pub name: String,
}

#[derive(Debug, Deserialize)]
pub struct TargetSection {
    pub name: String,
    #[serde(default)]
    pub sources: Vec<String>,
}

#[derive(Debug, Deserialize)]
pub struct LinkSection {
    pub target: String,
    #[serde(default = "default_visibility")]
    pub visibility: String,
    pub library: String,
}

fn default_visibility() -> String {
    "private".to_string()
}

#[derive(Debug, Deserialize)]
pub struct TestSection {
    pub name: String,
    pub command: Vec<String>,
}

#[derive(Debug, Deserialize)]
pub struct InstallSection {
    pub target: String,
    pub destination: String,
}

/// Load the manifest from `dir`
pub fn load(dir: &Path) -> Result<DirectoryManifest, CoreError> {
    let path = dir.join(MANIFEST_FILE);
    let text = std::fs::read_to_string(&path).map_err(|err| CoreError::Manifest {
        path: path.display().to_string(),
        message: err.to_string(),
    })?;
    toml::from_str(&text).map_err(|err| CoreError::Manifest {
        path: path.display().to_string(),
        message: err.to_string(),
    })
}

/// The engine's own directory-configuration routine: apply the current
/// scope's manifest against the facade, no interpreter involved.
pub fn configure_directory(facade: &mut BuildFacade) -> Result<(), CoreError> {
    let dir = facade.current_source_dir().to_path_buf();
    debug!(dir = %dir.display(), "configuring directory from manifest");
    let manifest = load(&dir)?;
    apply(facade, &manifest)
}

fn apply(facade: &mut BuildFacade, manifest: &DirectoryManifest) -> Result<(), CoreError> {
    if let Some(project) = &manifest.project {
        facade.register_project(&project.name);
    }

    for target in &manifest.executable {
        facade.create_executable(&target.name, &target.sources);
    }
    for target in &manifest.library {
        facade.create_library(&target.name, &target.sources);
    }

    for link in &manifest.link {
        let visibility = Visibility::parse(&link.visibility).unwrap_or_else(|| {
            facade.warning(&format!(
                "unknown link visibility '{}' for '{}'; assuming private",
                link.visibility, link.target
            ));
            Visibility::Private
        });
        facade.link(&link.target, visibility, &link.library);
    }

    for test in &manifest.test {
        facade.register_test(&test.name, &test.command);
    }
    for install in &manifest.install {
        facade.install(&install.target, &install.destination);
    }

    for sub in &manifest.subdirectories {
        // No invariant holds for mutations after a fatal error
        if facade.fatal_error_occurred() {
            break;
        }
        configure_subdirectory(facade, sub)?;
    }

    Ok(())
}

/// Legacy subdirectory traversal: a transient scope around the declarative
/// routine, popped on every path out.
pub fn configure_subdirectory(facade: &mut BuildFacade, dir: &str) -> Result<(), CoreError> {
    facade.enter_child_scope(dir)?;
    let result = configure_directory(facade);
    facade.leave_child_scope();
    result
}

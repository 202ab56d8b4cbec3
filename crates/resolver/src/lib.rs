#![deny(clippy::pedantic, unsafe_code)]
#![allow(clippy::module_name_repetitions)]

//! Native dependency resolution for nutforge
//!
//! Locates each recipe dependency as an installed package under the
//! configured search roots and returns its include and library paths (or,
//! for tool dependencies, the executable path). Resolution is read-only:
//! a missing dependency aborts before the build tool ever runs.

use nutforge_errors::{Error, ResolveError};
use nutforge_events::{AppEvent, EventEmitter, EventSender, ResolverEvent};
use nutforge_types::{DepKind, DepScope, DependencyReq};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tokio::fs;

/// Where a resolved dependency lives on disk
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum DependencyLocation {
    Library {
        include_dir: PathBuf,
        lib_dir: PathBuf,
    },
    Tool {
        path: PathBuf,
    },
}

/// A dependency with its resolved filesystem paths, read-only after
/// resolution
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResolvedDependency {
    pub name: String,
    pub link_name: String,
    pub scope: DepScope,
    pub location: DependencyLocation,
}

/// The complete resolution result for a recipe's dependency set
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Resolution {
    deps: Vec<ResolvedDependency>,
}

impl Resolution {
    /// All resolved dependencies, in recipe order
    #[must_use]
    pub fn deps(&self) -> &[ResolvedDependency] {
        &self.deps
    }

    /// Resolved library dependencies, in recipe order
    pub fn libraries(&self) -> impl Iterator<Item = &ResolvedDependency> {
        self.deps
            .iter()
            .filter(|d| matches!(d.location, DependencyLocation::Library { .. }))
    }

    /// Resolved tool dependencies, in recipe order
    pub fn tools(&self) -> impl Iterator<Item = &ResolvedDependency> {
        self.deps
            .iter()
            .filter(|d| matches!(d.location, DependencyLocation::Tool { .. }))
    }

    /// Look up a dependency by name
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&ResolvedDependency> {
        self.deps.iter().find(|d| d.name == name)
    }
}

/// Dependency resolver over a fixed set of search roots
#[derive(Debug, Clone)]
pub struct Resolver {
    search_roots: Vec<PathBuf>,
}

impl Resolver {
    /// Create a resolver with the given search roots
    #[must_use]
    pub fn new(search_roots: Vec<PathBuf>) -> Self {
        Self { search_roots }
    }

    /// Resolve every dependency in the set, failing on the first miss
    ///
    /// # Errors
    ///
    /// Returns `ResolveError::NoSearchRoots` if library dependencies are
    /// requested without any configured roots, and
    /// `ResolveError::DependencyMissing` / `ToolMissing` when a dependency
    /// cannot be located.
    pub async fn resolve(
        &self,
        deps: &[DependencyReq],
        tx: &EventSender,
    ) -> Result<Resolution, Error> {
        tx.emit(AppEvent::Resolver(ResolverEvent::Started {
            count: deps.len(),
        }));

        if self.search_roots.is_empty() && deps.iter().any(|d| d.kind == DepKind::Library) {
            return Err(ResolveError::NoSearchRoots.into());
        }

        let mut resolved = Vec::with_capacity(deps.len());
        for dep in deps {
            let location = match dep.kind {
                DepKind::Library => self.locate_library(dep).await?,
                DepKind::Tool => self.locate_tool(dep).await?,
            };

            match &location {
                DependencyLocation::Library {
                    include_dir,
                    lib_dir,
                } => {
                    tx.emit(AppEvent::Resolver(ResolverEvent::LibraryResolved {
                        name: dep.name.clone(),
                        include_dir: include_dir.clone(),
                        lib_dir: lib_dir.clone(),
                    }));
                }
                DependencyLocation::Tool { path } => {
                    tx.emit(AppEvent::Resolver(ResolverEvent::ToolResolved {
                        name: dep.name.clone(),
                        path: path.clone(),
                    }));
                }
            }

            resolved.push(ResolvedDependency {
                name: dep.name.clone(),
                link_name: dep.link_name().to_string(),
                scope: dep.scope,
                location,
            });
        }

        tx.emit(AppEvent::Resolver(ResolverEvent::Completed {
            resolved: resolved.len(),
        }));

        Ok(Resolution { deps: resolved })
    }

    /// Locate a library as `<root>/<name>/include` + `<root>/<name>/lib`
    async fn locate_library(&self, dep: &DependencyReq) -> Result<DependencyLocation, Error> {
        for root in &self.search_roots {
            let candidate = root.join(&dep.name);
            let include_dir = candidate.join("include");
            let lib_dir = candidate.join("lib");

            if is_dir(&include_dir).await && is_dir(&lib_dir).await {
                return Ok(DependencyLocation::Library {
                    include_dir,
                    lib_dir,
                });
            }
        }

        Err(ResolveError::DependencyMissing {
            name: dep.name.clone(),
            scope: dep.scope.to_string(),
        }
        .into())
    }

    /// Locate a tool as `<root>/<name>/bin/<name>`, falling back to `PATH`
    async fn locate_tool(&self, dep: &DependencyReq) -> Result<DependencyLocation, Error> {
        for root in &self.search_roots {
            let candidate = root.join(&dep.name).join("bin").join(&dep.name);
            if is_file(&candidate).await {
                return Ok(DependencyLocation::Tool { path: candidate });
            }
        }

        if let Some(path_var) = std::env::var_os("PATH") {
            for dir in std::env::split_paths(&path_var) {
                let candidate = dir.join(&dep.name);
                if is_file(&candidate).await {
                    return Ok(DependencyLocation::Tool { path: candidate });
                }
            }
        }

        Err(ResolveError::ToolMissing {
            name: dep.name.clone(),
        }
        .into())
    }
}

async fn is_dir(path: &Path) -> bool {
    fs::metadata(path).await.map(|m| m.is_dir()).unwrap_or(false)
}

async fn is_file(path: &Path) -> bool {
    fs::metadata(path)
        .await
        .map(|m| m.is_file())
        .unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn library_dep(name: &str, scope: DepScope) -> DependencyReq {
        DependencyReq {
            name: name.to_string(),
            scope,
            kind: DepKind::Library,
            link_name: None,
        }
    }

    fn tool_dep(name: &str) -> DependencyReq {
        DependencyReq {
            name: name.to_string(),
            scope: DepScope::Build,
            kind: DepKind::Tool,
            link_name: None,
        }
    }

    async fn fake_library(root: &Path, name: &str) {
        fs::create_dir_all(root.join(name).join("include"))
            .await
            .unwrap();
        fs::create_dir_all(root.join(name).join("lib")).await.unwrap();
    }

    #[tokio::test]
    async fn test_resolve_library() {
        let root = tempfile::tempdir().unwrap();
        fake_library(root.path(), "jansson").await;

        let resolver = Resolver::new(vec![root.path().to_path_buf()]);
        let (tx, _rx) = nutforge_events::channel();

        let resolution = resolver
            .resolve(&[library_dep("jansson", DepScope::Runtime)], &tx)
            .await
            .unwrap();

        let dep = resolution.get("jansson").unwrap();
        match &dep.location {
            DependencyLocation::Library {
                include_dir,
                lib_dir,
            } => {
                assert_eq!(*include_dir, root.path().join("jansson/include"));
                assert_eq!(*lib_dir, root.path().join("jansson/lib"));
            }
            DependencyLocation::Tool { .. } => panic!("expected library"),
        }
    }

    #[tokio::test]
    async fn test_missing_dependency_is_fatal() {
        let root = tempfile::tempdir().unwrap();
        fake_library(root.path(), "jansson").await;

        let resolver = Resolver::new(vec![root.path().to_path_buf()]);
        let (tx, _rx) = nutforge_events::channel();

        let err = resolver
            .resolve(
                &[
                    library_dep("jansson", DepScope::Runtime),
                    library_dep("openssl@3", DepScope::Runtime),
                ],
                &tx,
            )
            .await
            .unwrap_err();

        assert!(matches!(
            err,
            Error::Resolve(ResolveError::DependencyMissing { .. })
        ));
    }

    #[tokio::test]
    async fn test_resolve_tool_from_search_root() {
        let root = tempfile::tempdir().unwrap();
        let bin_dir = root.path().join("pkg-config").join("bin");
        fs::create_dir_all(&bin_dir).await.unwrap();
        fs::write(bin_dir.join("pkg-config"), b"#!/bin/sh\n")
            .await
            .unwrap();

        let resolver = Resolver::new(vec![root.path().to_path_buf()]);
        let (tx, _rx) = nutforge_events::channel();

        let resolution = resolver.resolve(&[tool_dep("pkg-config")], &tx).await.unwrap();
        let dep = resolution.get("pkg-config").unwrap();
        assert!(matches!(dep.location, DependencyLocation::Tool { .. }));
    }

    #[tokio::test]
    async fn test_no_search_roots() {
        let resolver = Resolver::new(Vec::new());
        let (tx, _rx) = nutforge_events::channel();

        let err = resolver
            .resolve(&[library_dep("jansson", DepScope::Runtime)], &tx)
            .await
            .unwrap_err();
        assert!(matches!(err, Error::Resolve(ResolveError::NoSearchRoots)));
    }

    #[tokio::test]
    async fn test_first_root_wins() {
        let first = tempfile::tempdir().unwrap();
        let second = tempfile::tempdir().unwrap();
        fake_library(first.path(), "curl").await;
        fake_library(second.path(), "curl").await;

        let resolver = Resolver::new(vec![
            first.path().to_path_buf(),
            second.path().to_path_buf(),
        ]);
        let (tx, _rx) = nutforge_events::channel();

        let resolution = resolver
            .resolve(&[library_dep("curl", DepScope::Runtime)], &tx)
            .await
            .unwrap();
        match &resolution.get("curl").unwrap().location {
            DependencyLocation::Library { include_dir, .. } => {
                assert!(include_dir.starts_with(first.path()));
            }
            DependencyLocation::Tool { .. } => panic!("expected library"),
        }
    }
}

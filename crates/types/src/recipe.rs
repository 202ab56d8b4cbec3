//! TOML recipe format for nutforge
//!
//! A recipe declares everything the installer needs: the package descriptor,
//! its native dependencies, the bundled resources to stage, and how to invoke
//! the native build.

use nutforge_errors::RecipeError;
use semver::Version;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Package descriptor, immutable once the recipe is loaded
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct PackageDescriptor {
    /// Canonical package name (binary name, prefix directory name)
    pub name: String,
    /// Human-facing name the binary prints about itself
    pub display_name: String,
    pub version: Version,
    pub source_url: String,
    /// SHA-256 digest of the source archive, lowercase hex
    pub sha256: String,
    pub license: String,
    pub homepage: String,
}

impl PackageDescriptor {
    /// Upstream release tag, e.g. `v0.0.4`
    #[must_use]
    pub fn tag(&self) -> String {
        format!("v{}", self.version)
    }
}

impl fmt::Display for PackageDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.name, self.version)
    }
}

/// Dependency scope
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DepScope {
    Build,
    Runtime,
}

impl fmt::Display for DepScope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Build => write!(f, "build"),
            Self::Runtime => write!(f, "runtime"),
        }
    }
}

/// Dependency kind: a linkable library or an executable build tool
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DepKind {
    Library,
    Tool,
}

impl Default for DepKind {
    fn default() -> Self {
        Self::Library
    }
}

/// A dependency as declared by the recipe
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct DependencyReq {
    pub name: String,
    pub scope: DepScope,
    #[serde(default)]
    pub kind: DepKind,
    /// Library name passed to the linker; defaults to `name`
    #[serde(default)]
    pub link_name: Option<String>,
}

impl DependencyReq {
    /// The `-l` argument for this dependency
    #[must_use]
    pub fn link_name(&self) -> &str {
        self.link_name.as_deref().unwrap_or(&self.name)
    }
}

/// Bundled resources staged into the install prefix
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct ResourceSpec {
    /// Documentation files copied from the source tree into `doc/`
    pub docs: Vec<String>,
    /// Source-tree directory holding theme definition files
    #[serde(default = "default_theme_dir")]
    pub theme_dir: String,
    /// File extension that identifies a theme definition
    #[serde(default = "default_theme_extension")]
    pub theme_extension: String,
}

impl Default for ResourceSpec {
    fn default() -> Self {
        Self {
            docs: Vec::new(),
            theme_dir: default_theme_dir(),
            theme_extension: default_theme_extension(),
        }
    }
}

/// How to invoke the native build and where it leaves the binary
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct BuildSpec {
    #[serde(default = "default_build_tool")]
    pub tool: String,
    #[serde(default)]
    pub args: Vec<String>,
    /// Path of the produced binary, relative to the source tree
    pub artifact: String,
}

/// Complete installation recipe
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct Recipe {
    pub package: PackageDescriptor,
    #[serde(default)]
    pub dependencies: Vec<DependencyReq>,
    #[serde(default)]
    pub resources: ResourceSpec,
    pub build: BuildSpec,
}

impl Recipe {
    /// Parse a recipe from TOML text and validate it
    ///
    /// # Errors
    ///
    /// Returns `RecipeError` if the document fails to parse or violates a
    /// recipe invariant (empty fields, malformed checksum).
    pub fn from_toml(text: &str) -> Result<Self, RecipeError> {
        let recipe: Self = toml::from_str(text).map_err(|e| RecipeError::ParseFailed {
            message: e.to_string(),
        })?;
        recipe.validate()?;
        Ok(recipe)
    }

    /// Serialize back to TOML text
    ///
    /// # Errors
    ///
    /// Returns `RecipeError` if serialization fails.
    pub fn to_toml(&self) -> Result<String, RecipeError> {
        toml::to_string_pretty(self).map_err(|e| RecipeError::ParseFailed {
            message: e.to_string(),
        })
    }

    /// Validate recipe invariants
    ///
    /// # Errors
    ///
    /// Returns `RecipeError` on an empty required field or a digest that is
    /// not exactly 64 lowercase hex characters.
    pub fn validate(&self) -> Result<(), RecipeError> {
        for (field, value) in [
            ("package.name", &self.package.name),
            ("package.display-name", &self.package.display_name),
            ("package.source-url", &self.package.source_url),
            ("build.artifact", &self.build.artifact),
        ] {
            if value.trim().is_empty() {
                return Err(RecipeError::EmptyField {
                    field: field.to_string(),
                });
            }
        }

        // Upstream digests are SHA-256: exactly 64 hex characters.
        let digest = &self.package.sha256;
        if digest.len() != 64 {
            return Err(RecipeError::InvalidChecksum {
                message: format!("digest must be 64 hex characters, got {}", digest.len()),
            });
        }
        if !digest.bytes().all(|b| b.is_ascii_hexdigit()) {
            return Err(RecipeError::InvalidChecksum {
                message: "digest contains non-hex characters".to_string(),
            });
        }

        Ok(())
    }

    /// Build-scoped dependencies
    #[must_use]
    pub fn build_deps(&self) -> impl Iterator<Item = &DependencyReq> {
        self.dependencies
            .iter()
            .filter(|d| d.scope == DepScope::Build)
    }

    /// Runtime-scoped dependencies
    #[must_use]
    pub fn runtime_deps(&self) -> impl Iterator<Item = &DependencyReq> {
        self.dependencies
            .iter()
            .filter(|d| d.scope == DepScope::Runtime)
    }
}

fn default_theme_dir() -> String {
    "themes".to_string()
}

fn default_theme_extension() -> String {
    "json".to_string()
}

fn default_build_tool() -> String {
    "make".to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"
[package]
name = "nutshell"
display-name = "Nutshell"
version = "0.0.4"
source-url = "https://example.com/nutshell-0.0.4.tar.gz"
sha256 = "d3cd4b9b64fb6d657195beb7ea9d47a193ace561d8d54b64e9890304e41c6829"
license = "MIT"
homepage = "https://example.com/nutshell"

[[dependencies]]
name = "jansson"
scope = "runtime"

[[dependencies]]
name = "pkg-config"
scope = "build"
kind = "tool"

[resources]
docs = ["README.md", "CHANGELOG.md"]

[build]
artifact = "nutshell"
"#;

    #[test]
    fn test_recipe_parse() {
        let recipe = Recipe::from_toml(SAMPLE).unwrap();
        assert_eq!(recipe.package.name, "nutshell");
        assert_eq!(recipe.package.tag(), "v0.0.4");
        assert_eq!(recipe.build.tool, "make");
        assert_eq!(recipe.resources.theme_dir, "themes");
        assert_eq!(recipe.dependencies.len(), 2);
        assert_eq!(recipe.build_deps().count(), 1);
        assert_eq!(recipe.runtime_deps().count(), 1);
        assert_eq!(recipe.dependencies[1].kind, DepKind::Tool);
    }

    #[test]
    fn test_recipe_rejects_short_checksum() {
        let text = SAMPLE.replace(
            "d3cd4b9b64fb6d657195beb7ea9d47a193ace561d8d54b64e9890304e41c6829",
            "0000",
        );
        let err = Recipe::from_toml(&text).unwrap_err();
        assert!(matches!(err, RecipeError::InvalidChecksum { .. }));
    }

    #[test]
    fn test_recipe_rejects_empty_name() {
        let text = SAMPLE.replace("name = \"nutshell\"", "name = \"\"");
        let err = Recipe::from_toml(&text).unwrap_err();
        assert!(matches!(err, RecipeError::EmptyField { .. }));
    }

    #[test]
    fn test_recipe_roundtrip() {
        let recipe = Recipe::from_toml(SAMPLE).unwrap();
        let text = recipe.to_toml().unwrap();
        let again = Recipe::from_toml(&text).unwrap();
        assert_eq!(again.package.name, recipe.package.name);
        assert_eq!(again.package.sha256, recipe.package.sha256);
        assert_eq!(again.dependencies.len(), recipe.dependencies.len());
    }

    #[test]
    fn test_link_name_default() {
        let dep = DependencyReq {
            name: "jansson".to_string(),
            scope: DepScope::Runtime,
            kind: DepKind::Library,
            link_name: None,
        };
        assert_eq!(dep.link_name(), "jansson");
    }
}

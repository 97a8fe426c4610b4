//! Candidate path resolution.
//!
//! Builds the ordered list of files a profile may be loaded from, lowest to
//! highest priority. This is pure path arithmetic: nothing here touches the
//! filesystem.

use super::profile::{CONFIG_DIRS_SUFFIX, ConfigProfile, ENV_SUFFIX};
use std::path::{Path, PathBuf};
use tracing::debug;

/// Where a candidate path came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PathOrigin {
    /// `{dir}/{slug}.yml`
    Base,
    /// `{dir}/{slug}.{env}.yml`
    Environment,
    /// `{lock_dir}/{slug}.lock.yml`
    Lock,
    /// Supplied directly by the caller.
    Explicit,
}

impl std::fmt::Display for PathOrigin {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PathOrigin::Base => write!(f, "base"),
            PathOrigin::Environment => write!(f, "environment"),
            PathOrigin::Lock => write!(f, "lock"),
            PathOrigin::Explicit => write!(f, "explicit"),
        }
    }
}

/// A file that may contribute to the merged configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CandidatePath {
    pub path: PathBuf,
    pub origin: PathOrigin,
}

/// Ordered candidate files, lowest to highest priority.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchPaths {
    candidates: Vec<CandidatePath>,
}

impl SearchPaths {
    /// Resolve the default path list from the process environment.
    pub fn discover(profile: &ConfigProfile) -> Self {
        Self::resolve(profile, |name| std::env::var(name).ok())
    }

    /// Resolve the default path list, reading variables through `lookup`.
    ///
    /// 1. `{SLUG}_CONFIG_DIRS` entries are appended after the profile's dirs.
    /// 2. `{SLUG}_ENV` selects an optional per-environment file.
    /// 3. Each dir yields `{slug}.yml` then `{slug}.{env}.yml`.
    /// 4. The lock file comes last.
    pub fn resolve<F>(profile: &ConfigProfile, lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let env = lookup(profile.env_var(ENV_SUFFIX).as_str())
            .map(|e| e.trim().to_string())
            .filter(|e| !e.is_empty());

        let extra_dirs = lookup(profile.env_var(CONFIG_DIRS_SUFFIX).as_str())
            .map(|raw| parse_dir_list(&raw))
            .unwrap_or_default();

        let mut candidates = Vec::new();
        for dir in profile.config_dirs().iter().chain(extra_dirs.iter()) {
            let dir = expand_home(dir);

            candidates.push(CandidatePath {
                path: profile.yml_path(&dir),
                origin: PathOrigin::Base,
            });

            if let Some(ref env) = env {
                candidates.push(CandidatePath {
                    path: profile.env_yml_path(&dir, env),
                    origin: PathOrigin::Environment,
                });
            }
        }

        candidates.push(CandidatePath {
            path: profile.lock_path(),
            origin: PathOrigin::Lock,
        });

        debug!(
            slug = profile.slug(),
            env = env.as_deref().unwrap_or(""),
            extra_dirs = extra_dirs.len(),
            candidates = candidates.len(),
            "Resolved config search paths"
        );

        Self { candidates }
    }

    /// Wrap an explicit path list (lowest to highest priority).
    pub fn from_paths<I, P>(paths: I) -> Self
    where
        I: IntoIterator<Item = P>,
        P: Into<PathBuf>,
    {
        Self {
            candidates: paths
                .into_iter()
                .map(|p| CandidatePath {
                    path: p.into(),
                    origin: PathOrigin::Explicit,
                })
                .collect(),
        }
    }

    pub fn candidates(&self) -> &[CandidatePath] {
        &self.candidates
    }

    pub fn iter(&self) -> impl Iterator<Item = &Path> {
        self.candidates.iter().map(|c| c.path.as_path())
    }

    pub fn to_paths(&self) -> Vec<PathBuf> {
        self.candidates.iter().map(|c| c.path.clone()).collect()
    }

    pub fn len(&self) -> usize {
        self.candidates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.candidates.is_empty()
    }
}

/// Split a comma-separated directory list, dropping blank entries.
fn parse_dir_list(raw: &str) -> Vec<PathBuf> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(PathBuf::from)
        .collect()
}

/// Expand a leading `~` to the user's home directory.
fn expand_home(dir: &Path) -> PathBuf {
    let Ok(rest) = dir.strip_prefix("~") else {
        return dir.to_path_buf();
    };
    match dirs::home_dir() {
        Some(home) => home.join(rest),
        None => dir.to_path_buf(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name| vars.get(name).cloned()
    }

    fn profile() -> ConfigProfile {
        ConfigProfile::new("project")
            .with_dirs(["/dir1"])
            .with_lock_dir("/locks")
    }

    #[test]
    fn test_static_dirs_only() {
        let paths = SearchPaths::resolve(&profile(), lookup(&[]));
        assert_eq!(
            paths.to_paths(),
            vec![
                PathBuf::from("/dir1/project.yml"),
                PathBuf::from("/locks/project.lock.yml"),
            ]
        );
        assert_eq!(paths.candidates()[1].origin, PathOrigin::Lock);
    }

    #[test]
    fn test_env_file_follows_base_file_per_dir() {
        let profile = profile().with_dir("/dir2");
        let paths = SearchPaths::resolve(&profile, lookup(&[("PROJECT_ENV", "env1")]));
        assert_eq!(
            paths.to_paths(),
            vec![
                PathBuf::from("/dir1/project.yml"),
                PathBuf::from("/dir1/project.env1.yml"),
                PathBuf::from("/dir2/project.yml"),
                PathBuf::from("/dir2/project.env1.yml"),
                PathBuf::from("/locks/project.lock.yml"),
            ]
        );
        assert_eq!(paths.candidates()[1].origin, PathOrigin::Environment);
    }

    #[test]
    fn test_blank_env_is_ignored() {
        let paths = SearchPaths::resolve(&profile(), lookup(&[("PROJECT_ENV", "  ")]));
        assert_eq!(paths.len(), 2);
    }

    #[test]
    fn test_extra_dirs_appended_after_static_dirs() {
        let paths = SearchPaths::resolve(
            &profile(),
            lookup(&[("PROJECT_CONFIG_DIRS", " /dir2, ,/dir3 ")]),
        );
        assert_eq!(
            paths.to_paths(),
            vec![
                PathBuf::from("/dir1/project.yml"),
                PathBuf::from("/dir2/project.yml"),
                PathBuf::from("/dir3/project.yml"),
                PathBuf::from("/locks/project.lock.yml"),
            ]
        );
    }

    #[test]
    fn test_lock_path_is_always_last() {
        let paths = SearchPaths::resolve(
            &ConfigProfile::new("project").with_lock_dir("/locks"),
            lookup(&[]),
        );
        assert_eq!(paths.to_paths(), vec![PathBuf::from("/locks/project.lock.yml")]);
    }

    #[test]
    fn test_home_dir_is_expanded() {
        let Some(home) = dirs::home_dir() else {
            return;
        };
        let profile = ConfigProfile::new("osp").with_dirs(["~/.osp"]);
        let paths = SearchPaths::resolve(&profile, lookup(&[]));
        assert_eq!(paths.to_paths()[0], home.join(".osp").join("osp.yml"));
    }

    #[test]
    fn test_explicit_paths_keep_order() {
        let paths = SearchPaths::from_paths(["/b.yml", "/a.yml"]);
        assert_eq!(
            paths.iter().collect::<Vec<_>>(),
            vec![Path::new("/b.yml"), Path::new("/a.yml")]
        );
        assert!(paths.candidates().iter().all(|c| c.origin == PathOrigin::Explicit));
    }
}

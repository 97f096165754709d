//! The chokepoint every path in the dome passes through.
//!
//! [`validate_path`] is the core contract: symlinks are categorically
//! denied, `..` traversal is resolved lexically (never trusting the
//! filesystem to do it for us, since that's exactly the TOCTOU surface we
//! don't try to close — see the crate root docs), and the final path must
//! land inside one of the sandbox's configured roots.

use std::fs;
use std::io;
use std::path::{Component, Path, PathBuf};
use thiserror::Error;

/// The message shown to the agent for every denied path, regardless of the
/// internal cause. Never "Permission denied" — that would tell a prober
/// something exists.
pub const DENIED_MESSAGE: &str = "No such file or directory";

/// Sibling utilities (outside the core validator) cap symlink-following at
/// this many hops before giving up with [`ValidationError::Eloop`].
pub const MAX_SYMLINK_HOPS: usize = 10;

#[derive(Debug, Error)]
pub enum SandboxConfigError {
    #[error("sandbox configuration must have at least one root")]
    NoRoots,
    #[error("home path {home} does not lie within any configured root")]
    HomeOutsideRoots { home: PathBuf },
    #[error("failed to resolve root {path}: {source}")]
    RootNotFound { path: PathBuf, source: io::Error },
}

/// An allow-list of absolute canonical root directories plus a home path
/// that must lie within one of them. Immutable once constructed.
#[derive(Debug, Clone)]
pub struct SandboxConfig {
    roots: Vec<PathBuf>,
    home: PathBuf,
}

impl SandboxConfig {
    pub fn new(roots: Vec<PathBuf>, home: PathBuf) -> Result<Self, SandboxConfigError> {
        if roots.is_empty() {
            return Err(SandboxConfigError::NoRoots);
        }

        let mut canonical_roots = Vec::with_capacity(roots.len());
        for root in &roots {
            canonical_roots.push(canonicalize_existing(root)?);
        }
        let canonical_home = canonicalize_existing(&home)?;

        if !canonical_roots
            .iter()
            .any(|root| &canonical_home == root || canonical_home.starts_with(root))
        {
            return Err(SandboxConfigError::HomeOutsideRoots {
                home: canonical_home,
            });
        }

        Ok(Self {
            roots: canonical_roots,
            home: canonical_home,
        })
    }

    /// Convenience constructor for a single-root dome, the shape produced
    /// by `TRUMAN_DOME` discovery when no configuration file is present.
    pub fn single_root(root: PathBuf) -> Result<Self, SandboxConfigError> {
        let home = root.clone();
        Self::new(vec![root], home)
    }

    pub fn roots(&self) -> &[PathBuf] {
        &self.roots
    }

    pub fn home(&self) -> &Path {
        &self.home
    }
}

fn canonicalize_existing(path: &Path) -> Result<PathBuf, SandboxConfigError> {
    fs::canonicalize(path).map_err(|source| SandboxConfigError::RootNotFound {
        path: path.to_path_buf(),
        source,
    })
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("path contains an embedded variable reference")]
    EmbeddedVar,
    #[error("path resolves through a symbolic link")]
    Symlink,
    #[error("path resolves outside the sandbox boundary")]
    OutsideBoundary,
    #[error("symlink chain exceeded the maximum depth")]
    Eloop,
    #[error("base_dir passed to the path validator was not absolute")]
    InvalidBaseDir,
}

impl ValidationError {
    /// The single user-visible message for every denial. Internally the
    /// variants stay distinct for logs and for catching programmer errors.
    pub fn denied_message(&self) -> &'static str {
        DENIED_MESSAGE
    }
}

/// Validates and resolves `input_path` against `config`.
///
/// `base_dir`, when given, must be absolute — relative `input_path`s are
/// joined onto it. Passing a relative `base_dir`, or omitting `base_dir`
/// for a relative `input_path`, is a caller bug, not a user error: it fails
/// loudly via `debug_assert!` in debug builds and returns
/// [`ValidationError::InvalidBaseDir`] in release builds rather than
/// silently guessing.
pub fn validate_path(
    input_path: &str,
    config: &SandboxConfig,
    base_dir: Option<&Path>,
) -> Result<PathBuf, ValidationError> {
    if input_path.contains('$') {
        return Err(ValidationError::EmbeddedVar);
    }
    if let Some(base) = base_dir {
        if base.to_string_lossy().contains('$') {
            return Err(ValidationError::EmbeddedVar);
        }
        if !base.is_absolute() {
            debug_assert!(
                false,
                "base_dir passed to validate_path must be absolute: {}",
                base.display()
            );
            return Err(ValidationError::InvalidBaseDir);
        }
    }

    let candidate = PathBuf::from(input_path);
    let start = if candidate.is_absolute() {
        candidate
    } else {
        let Some(base) = base_dir else {
            debug_assert!(
                false,
                "relative input_path passed to validate_path without a base_dir: caller bug"
            );
            return Err(ValidationError::InvalidBaseDir);
        };
        base.join(candidate)
    };

    let normalized = lexical_normalize(&start);
    deny_symlinks_along(&normalized)?;
    ensure_within_roots(&normalized, config)?;
    Ok(normalized)
}

/// Resolves `.` and `..` components against the accumulated prefix without
/// touching the filesystem. A `..` at the root is a no-op, matching bash.
fn lexical_normalize(path: &Path) -> PathBuf {
    let mut normalized = PathBuf::new();
    for component in path.components() {
        match component {
            Component::Prefix(prefix) => normalized.push(prefix.as_os_str()),
            Component::RootDir => normalized.push(Component::RootDir.as_os_str()),
            Component::CurDir => {}
            Component::ParentDir => {
                normalized.pop();
            }
            Component::Normal(part) => normalized.push(part),
        }
    }
    normalized
}

/// Walks `path` one component at a time from the filesystem root, denying
/// as soon as any prefix is a symlink. Stops (accepting the rest) at the
/// first component that doesn't exist yet, so create-operations still work.
fn deny_symlinks_along(path: &Path) -> Result<(), ValidationError> {
    let mut accumulated = PathBuf::new();
    for component in path.components() {
        accumulated.push(component);
        match fs::symlink_metadata(&accumulated) {
            Ok(meta) => {
                if meta.file_type().is_symlink() {
                    tracing::debug!(path = %accumulated.display(), "path validator denied symlink");
                    return Err(ValidationError::Symlink);
                }
            }
            Err(err) if err.kind() == io::ErrorKind::NotFound => break,
            Err(_) => break,
        }
    }
    Ok(())
}

fn ensure_within_roots(path: &Path, config: &SandboxConfig) -> Result<(), ValidationError> {
    let within = config
        .roots()
        .iter()
        .any(|root| path == root || path.starts_with(root));
    if within {
        Ok(())
    } else {
        tracing::debug!(path = %path.display(), "path validator rejected path outside sandbox roots");
        Err(ValidationError::OutsideBoundary)
    }
}

/// Resolves `path` the way a sibling utility that *does* permit symlinks
/// would: following each link it encounters, counting hops, and failing
/// with [`ValidationError::Eloop`] once [`MAX_SYMLINK_HOPS`] is exceeded.
/// The dome's own [`validate_path`] never calls this — it denies symlinks
/// outright — but the hop-counting behaviour here is still part of the
/// validator's public contract because other tools in the dome's ecosystem
/// build on it.
pub fn resolve_following_symlinks(
    path: &Path,
    config: &SandboxConfig,
) -> Result<PathBuf, ValidationError> {
    resolve_following_symlinks_at_depth(&lexical_normalize(path), config, 0)
}

fn resolve_following_symlinks_at_depth(
    path: &Path,
    config: &SandboxConfig,
    hops: usize,
) -> Result<PathBuf, ValidationError> {
    let mut accumulated = PathBuf::new();
    let mut components = path.components().peekable();

    while let Some(component) = components.next() {
        accumulated.push(component);
        match fs::symlink_metadata(&accumulated) {
            Ok(meta) if meta.file_type().is_symlink() => {
                let next_hops = hops + 1;
                if next_hops > MAX_SYMLINK_HOPS {
                    return Err(ValidationError::Eloop);
                }

                let target = fs::read_link(&accumulated).map_err(|_| ValidationError::OutsideBoundary)?;
                let absolute_target = if target.is_absolute() {
                    target
                } else {
                    accumulated
                        .parent()
                        .map(Path::to_path_buf)
                        .unwrap_or_else(|| PathBuf::from("/"))
                        .join(target)
                };

                let remainder: PathBuf = components.collect();
                let rejoined = if remainder.as_os_str().is_empty() {
                    absolute_target
                } else {
                    absolute_target.join(remainder)
                };

                // The depth consumed resolving this link carries forward
                // into the rest of the walk — resetting it per-segment is
                // the classic bug this property guards against.
                return resolve_following_symlinks_at_depth(
                    &lexical_normalize(&rejoined),
                    config,
                    next_hops,
                );
            }
            Ok(_) => {}
            Err(_) => break,
        }
    }

    ensure_within_roots(&accumulated, config)?;
    Ok(accumulated)
}

use std::path::{Path, PathBuf};

use crate::foundation::error::{ReelError, ReelResult};

/// Turns an opaque asset reference from a request into bytes.
///
/// Implementations must map "not found" to [`ReelError::AssetMissing`] so callers can tell a
/// missing optional asset apart from an I/O failure.
pub trait AssetResolver: Send + Sync {
    /// Fetch the bytes behind `reference`.
    fn resolve(&self, reference: &str) -> ReelResult<Vec<u8>>;
}

/// Resolver reading references as paths below a public root directory.
///
/// `/img/a.png` and `img/a.png` both resolve to `<root>/img/a.png`.
#[derive(Clone, Debug)]
pub struct FsResolver {
    root: PathBuf,
}

impl FsResolver {
    /// Create a resolver rooted at `root`.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Filesystem path a reference maps to.
    pub fn path_for(&self, reference: &str) -> ReelResult<PathBuf> {
        let rel = normalize_reference(reference)?;
        Ok(self.root.join(Path::new(&rel)))
    }
}

impl AssetResolver for FsResolver {
    fn resolve(&self, reference: &str) -> ReelResult<Vec<u8>> {
        let path = self.path_for(reference)?;
        match std::fs::read(&path) {
            Ok(bytes) => Ok(bytes),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                Err(ReelError::asset_missing(reference))
            }
            Err(e) => Err(anyhow::Error::new(e)
                .context(format!("read asset '{}'", path.display()))
                .into()),
        }
    }
}

/// Normalize a request reference into a relative `/`-separated path.
///
/// Removes `.` segments and a leading `/`, and rejects parent traversals (`..`).
pub(crate) fn normalize_reference(reference: &str) -> ReelResult<String> {
    let s = reference.replace('\\', "/");
    let mut out = Vec::<&str>::new();
    for part in s.split('/') {
        if part.is_empty() || part == "." {
            continue;
        }
        if part == ".." {
            return Err(ReelError::invalid_input(format!(
                "asset reference '{reference}' must not contain '..'"
            )));
        }
        out.push(part);
    }

    if out.is_empty() {
        return Err(ReelError::invalid_input(format!(
            "asset reference '{reference}' must contain a file name"
        )));
    }

    Ok(out.join("/"))
}

#[cfg(test)]
#[path = "../../tests/unit/assets/resolve.rs"]
mod tests;

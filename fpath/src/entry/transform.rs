//! Promotion of path values into filesystem variants.

use std::collections::HashSet;
use std::fs;
use std::io::ErrorKind;

use crate::entry::{Dir, Entry, EntryKind, File, FilesystemProbe, Link, OsProbe};
use crate::error::{Error, Result};
use crate::path::PathValue;

/// Default bound on the number of links followed by a single resolution.
pub const DEFAULT_MAX_LINK_HOPS: usize = 40;

/// Probes paths and builds the matching [`Entry`] variant.
///
/// # Examples
///
/// ```
/// use fpath::entry::{EntryKind, MockProbe, Transformer};
/// use fpath::PathValue;
///
/// let path = PathValue::new("project").unwrap();
/// let transformer = Transformer::new()
///     .with_probe(MockProbe::new().with_entry(&path, EntryKind::Directory));
///
/// assert!(transformer.transform(&path).unwrap().is_dir());
/// ```
#[derive(Debug, Clone)]
pub struct Transformer<P = OsProbe> {
    probe: P,
    max_link_hops: usize,
}

impl Default for Transformer<OsProbe> {
    fn default() -> Self {
        Self {
            probe: OsProbe::new(),
            max_link_hops: DEFAULT_MAX_LINK_HOPS,
        }
    }
}

impl Transformer<OsProbe> {
    /// A transformer backed by the OS that reports links as links.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl<P: FilesystemProbe> Transformer<P> {
    /// Replace the probe.
    #[must_use]
    pub fn with_probe<Q: FilesystemProbe>(self, probe: Q) -> Transformer<Q> {
        Transformer {
            probe,
            max_link_hops: self.max_link_hops,
        }
    }

    /// Set how many links a resolution may follow before giving up.
    #[must_use]
    pub fn with_max_link_hops(mut self, max_link_hops: usize) -> Self {
        self.max_link_hops = max_link_hops;
        self
    }

    /// The configured hop bound.
    #[must_use]
    pub fn max_link_hops(&self) -> usize {
        self.max_link_hops
    }

    /// The probe used for classification.
    #[must_use]
    pub fn probe(&self) -> &P {
        &self.probe
    }

    /// Probe `path` and return the variant matching what exists.
    ///
    /// # Errors
    ///
    /// Returns `AccessDenied` if the probe is refused.
    pub fn transform(&self, path: &PathValue) -> Result<Entry> {
        let kind = self.probe.probe(path)?;
        log::trace!("{path} probed as {kind}");
        Ok(self.dispatch(path.clone(), kind))
    }

    pub(crate) fn dispatch(&self, path: PathValue, kind: EntryKind) -> Entry {
        match kind {
            EntryKind::File => Entry::File(File::from_path(path)),
            EntryKind::Directory => Entry::Dir(Dir::from_path(path)),
            EntryKind::Link => {
                Entry::Link(Link::from_path(path).with_max_hops(self.max_link_hops))
            }
            EntryKind::Absent | EntryKind::Other => Entry::Path(path),
        }
    }

    /// Follow the link at `link` until a non-link entry is reached.
    ///
    /// Relative targets are interpreted against the directory holding the
    /// link that points to them.
    ///
    /// # Errors
    ///
    /// Returns `BrokenLink` if a hop points at nothing, the chain revisits a
    /// link, or more than the configured number of hops is needed.
    pub fn resolve_link(&self, link: &PathValue) -> Result<Entry> {
        let mut visited = HashSet::new();
        let mut current = link.clone();
        let mut hops = 0;

        loop {
            if !visited.insert(current.clone()) {
                return Err(broken(link, format!("cycle through {current}")));
            }

            let os_path = current.to_path_buf();
            let metadata = match fs::symlink_metadata(&os_path) {
                Ok(metadata) => metadata,
                Err(e) if matches!(e.kind(), ErrorKind::NotFound | ErrorKind::NotADirectory) => {
                    return Err(broken(link, format!("{current} does not exist")));
                }
                Err(e) => return Err(Error::from_io(e, &os_path)),
            };

            let kind = EntryKind::from_file_type(metadata.file_type());
            if kind != EntryKind::Link {
                log::debug!("{link} resolved to {current} after {hops} hop(s)");
                return Ok(self.dispatch(current, kind));
            }

            if hops == self.max_link_hops {
                return Err(broken(
                    link,
                    format!("more than {} links in chain", self.max_link_hops),
                ));
            }

            let target = fs::read_link(&os_path).map_err(|e| Error::from_io(e, &os_path))?;
            let target = PathValue::try_from(target.as_path())?;
            log::trace!("hop {hops}: {current} -> {target}");
            current = join_target(&current, &target)?;
            hops += 1;
        }
    }
}

/// Interpret a link target relative to the directory containing the link.
pub(crate) fn join_target(link: &PathValue, target: &PathValue) -> Result<PathValue> {
    if target.is_relative() {
        link.slice(..-1).concatenate(target)
    } else {
        Ok(target.clone())
    }
}

fn broken(link: &PathValue, reason: String) -> Error {
    Error::BrokenLink {
        path: link.to_path_buf(),
        reason,
    }
}

/// Promote `path` using the OS and the default hop bound.
///
/// # Errors
///
/// Returns `AccessDenied` if probing is refused.
///
/// # Examples
///
/// ```
/// use fpath::{transform, PathValue};
///
/// let missing = PathValue::new("no/such/entry/for/fpath").unwrap();
/// assert!(transform(&missing).unwrap().is_path());
/// ```
pub fn transform(path: &PathValue) -> Result<Entry> {
    Transformer::new().transform(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entry::MockProbe;
    use crate::path::Platform;
    use tempfile::TempDir;

    fn value(path: &std::path::Path) -> PathValue {
        PathValue::try_from(path).unwrap()
    }

    #[test]
    fn test_dispatch_table() {
        let cases = [
            ("absent", EntryKind::Absent),
            ("file", EntryKind::File),
            ("dir", EntryKind::Directory),
            ("link", EntryKind::Link),
            ("fifo", EntryKind::Other),
        ];
        let mut probe = MockProbe::new();
        for (name, kind) in cases {
            probe = probe.with_entry(&PathValue::new(name).unwrap(), kind);
        }
        let transformer = Transformer::new().with_probe(probe);

        let entry = |name: &str| transformer.transform(&PathValue::new(name).unwrap()).unwrap();
        assert!(entry("absent").is_path());
        assert!(entry("file").is_file());
        assert!(entry("dir").is_dir());
        assert!(entry("link").is_link());
        assert!(entry("fifo").is_path());
    }

    #[test]
    fn test_transform_propagates_access_denied() {
        let secret = PathValue::new("secret").unwrap();
        let transformer = Transformer::new().with_probe(MockProbe::new().with_denied(&secret));
        assert!(transformer.transform(&secret).unwrap_err().is_access_denied());
    }

    #[test]
    fn test_transform_keeps_segments() {
        let temp = TempDir::new().unwrap();
        let file = temp.path().join("test.txt");
        fs::write(&file, b"").unwrap();

        let path = value(&file);
        let entry = transform(&path).unwrap();
        assert!(entry.is_file());
        assert_eq!(entry.as_path(), &path);
    }

    #[test]
    fn test_join_target() {
        let link = PathValue::parse("/a/b/link", Platform::Posix).unwrap();
        let relative = PathValue::parse("../c", Platform::Posix).unwrap();
        let absolute = PathValue::parse("/x/y", Platform::Posix).unwrap();

        assert_eq!(join_target(&link, &relative).unwrap().to_string(), "/a/b/../c");
        assert_eq!(join_target(&link, &absolute).unwrap(), absolute);
    }

    #[cfg(unix)]
    #[test]
    fn test_resolve_chain() {
        use std::os::unix::fs::symlink;

        let temp = TempDir::new().unwrap();
        let target = temp.path().join("data");
        fs::create_dir(&target).unwrap();
        symlink("data", temp.path().join("first")).unwrap();
        symlink(temp.path().join("first"), temp.path().join("second")).unwrap();

        let resolved = Transformer::new()
            .resolve_link(&value(&temp.path().join("second")))
            .unwrap();
        assert!(resolved.is_dir());
        assert_eq!(resolved.as_path(), &value(&target));
    }

    #[cfg(unix)]
    #[test]
    fn test_resolve_self_link_is_broken() {
        let temp = TempDir::new().unwrap();
        let link = temp.path().join("loop");
        std::os::unix::fs::symlink("loop", &link).unwrap();

        let err = Transformer::new().resolve_link(&value(&link)).unwrap_err();
        assert!(matches!(err, Error::BrokenLink { .. }));
    }

    #[cfg(unix)]
    #[test]
    fn test_resolve_hop_bound() {
        use std::os::unix::fs::symlink;

        let temp = TempDir::new().unwrap();
        fs::write(temp.path().join("end"), b"").unwrap();
        symlink("end", temp.path().join("l0")).unwrap();
        symlink("l0", temp.path().join("l1")).unwrap();
        symlink("l1", temp.path().join("l2")).unwrap();

        let start = value(&temp.path().join("l2"));
        assert!(Transformer::new()
            .with_max_link_hops(3)
            .resolve_link(&start)
            .unwrap()
            .is_file());

        let err = Transformer::new()
            .with_max_link_hops(2)
            .resolve_link(&start)
            .unwrap_err();
        assert!(matches!(err, Error::BrokenLink { ref reason, .. } if reason.contains("more than 2")));
    }

    #[cfg(unix)]
    #[test]
    fn test_resolve_dangling() {
        let temp = TempDir::new().unwrap();
        let link = temp.path().join("dangling");
        std::os::unix::fs::symlink("nowhere", &link).unwrap();

        let err = Transformer::new().resolve_link(&value(&link)).unwrap_err();
        assert!(matches!(err, Error::BrokenLink { ref reason, .. } if reason.contains("does not exist")));
    }
}

//! Archive member name validation.

use std::path::Component;
use std::path::Path;
use std::path::PathBuf;

use crate::InspectError;
use crate::Result;

/// Turns an archive member name into a relative path that stays inside the
/// extraction directory.
///
/// DOS archivers store `\` separators, so both separators are accepted.
/// `.` components are dropped.
///
/// # Errors
///
/// Returns [`InspectError::PathTraversal`] for absolute names, drive
/// prefixes, `..` components, NUL bytes, or names that normalize to
/// nothing.
///
/// ```
/// use artifex_core::security::member_path;
/// use std::path::PathBuf;
///
/// assert_eq!(member_path("DOCS\\README.TXT").unwrap(), PathBuf::from("DOCS/README.TXT"));
/// assert!(member_path("../../etc/passwd").is_err());
/// ```
pub fn member_path(name: &str) -> Result<PathBuf> {
    let traversal = || InspectError::PathTraversal {
        path: PathBuf::from(name),
    };
    if name.contains('\0') {
        return Err(traversal());
    }

    let unified = name.replace('\\', "/");
    let mut safe = PathBuf::new();
    for component in Path::new(&unified).components() {
        match component {
            Component::Normal(part) => safe.push(part),
            Component::CurDir => {}
            Component::ParentDir | Component::RootDir | Component::Prefix(_) => {
                return Err(traversal());
            }
        }
    }

    if safe.as_os_str().is_empty() {
        return Err(traversal());
    }
    Ok(safe)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_names() {
        assert_eq!(member_path("README.TXT").unwrap(), PathBuf::from("README.TXT"));
        assert_eq!(member_path("./a/./b.txt").unwrap(), PathBuf::from("a/b.txt"));
        assert_eq!(member_path("dir/").unwrap(), PathBuf::from("dir"));
    }

    #[test]
    fn test_backslash_separators() {
        assert_eq!(
            member_path("GAME\\DATA\\LEVEL1.DAT").unwrap(),
            PathBuf::from("GAME/DATA/LEVEL1.DAT")
        );
    }

    #[test]
    fn test_rejects_escapes() {
        for name in [
            "../x",
            "a/../../x",
            "/etc/passwd",
            "\\WINDOWS\\WIN.INI",
            "..\\x",
            "nul\0",
            ".",
            "",
        ] {
            let err = member_path(name).unwrap_err();
            assert!(matches!(err, InspectError::PathTraversal { .. }), "{name:?}");
        }
    }
}

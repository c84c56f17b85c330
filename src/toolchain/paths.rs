//! Input path resolution and validation.

use std::path::{Path, PathBuf};

use crate::exec::{Result, ToolError};

/// The families of input file each tool accepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProjectKind {
    /// MSBuild-driven IDE projects.
    Delphi,
    /// Free Pascal sources.
    Pascal,
    /// Lazarus project information files.
    Lazarus,
}

impl ProjectKind {
    /// Lower-case extensions without the leading dot.
    pub fn accepted_extensions(&self) -> &'static [&'static str] {
        match self {
            ProjectKind::Delphi => &["dproj", "groupproj"],
            ProjectKind::Pascal => &["lpr", "pas", "pp"],
            ProjectKind::Lazarus => &["lpi"],
        }
    }
}

/// Resolve `raw` against the current directory without touching the disk.
pub fn absolutize(raw: &str) -> Result<PathBuf> {
    std::path::absolute(raw.trim()).map_err(|source| ToolError::Resolve {
        path: raw.to_string(),
        source,
    })
}

/// Resolve `raw` and check that it is an existing file with one of `accepted`
/// extensions (compared case-insensitively).
pub fn resolve_and_validate(raw: &str, accepted: &[&str]) -> Result<PathBuf> {
    let path = absolutize(raw)?;
    if !path.is_file() {
        return Err(ToolError::NotFound(path));
    }

    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase());
    match ext {
        Some(ext) if accepted.contains(&ext.as_str()) => Ok(path),
        _ => Err(ToolError::UnsupportedKind {
            expected: accepted
                .iter()
                .map(|e| format!(".{e}"))
                .collect::<Vec<_>>()
                .join(", "),
            path,
        }),
    }
}

/// [`resolve_and_validate`] against the extensions `kind` accepts.
pub fn resolve_input(raw: &str, kind: ProjectKind) -> Result<PathBuf> {
    resolve_and_validate(raw, kind.accepted_extensions())
}

/// A path as one argument token. Quoting is the interpreter's job.
pub fn path_arg(path: &Path) -> String {
    path.to_string_lossy().into_owned()
}

/// File name used in status lines.
pub fn base_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_matching_extension_case_insensitively() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("App.DPROJ");
        std::fs::write(&file, "<Project/>").unwrap();

        let resolved =
            resolve_and_validate(file.to_str().unwrap(), ProjectKind::Delphi.accepted_extensions())
                .unwrap();
        assert!(resolved.is_absolute());
        assert_eq!(base_name(&resolved), "App.DPROJ");
    }

    #[test]
    fn missing_file_is_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("ghost.lpi");
        let err = resolve_and_validate(
            file.to_str().unwrap(),
            ProjectKind::Lazarus.accepted_extensions(),
        )
        .unwrap_err();
        assert!(matches!(err, ToolError::NotFound(p) if p == file));
    }

    #[test]
    fn wrong_extension_is_unsupported() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("main.lpr");
        std::fs::write(&file, "program main; begin end.").unwrap();

        let err = resolve_and_validate(
            file.to_str().unwrap(),
            ProjectKind::Delphi.accepted_extensions(),
        )
        .unwrap_err();
        match err {
            ToolError::UnsupportedKind { expected, .. } => {
                assert_eq!(expected, ".dproj, .groupproj")
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn directory_is_not_a_file() {
        let dir = tempfile::tempdir().unwrap();
        let sub = dir.path().join("fake.dproj");
        std::fs::create_dir(&sub).unwrap();
        let err = resolve_and_validate(sub.to_str().unwrap(), &["dproj"]).unwrap_err();
        assert!(matches!(err, ToolError::NotFound(_)));
    }

    #[test]
    fn relative_paths_resolve_against_current_dir() {
        let abs = absolutize("src/main.lpr").unwrap();
        assert_eq!(abs, std::env::current_dir().unwrap().join("src/main.lpr"));
    }

    #[test]
    fn path_arg_is_unquoted() {
        assert_eq!(path_arg(Path::new("/a b/c\"d.pas")), "/a b/c\"d.pas");
    }
}

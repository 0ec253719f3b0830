use std::path::{Component, Path, PathBuf};

/// Renders a path for display, canonicalizing when possible and falling back
/// to a normalized absolute form when the path does not exist.
pub trait BestEffortPathExt {
    fn best_effort_path_display(&self) -> String;
}

impl<T: AsRef<Path>> BestEffortPathExt for T {
    fn best_effort_path_display(&self) -> String {
        let path = self.as_ref();
        match path.canonicalize() {
            Ok(canonical_path) => canonical_path.display().to_string(),
            Err(_) => {
                let absolute_path = if path.is_absolute() {
                    path.to_path_buf()
                } else {
                    std::env::current_dir()
                        .map(|current_dir| current_dir.join(path))
                        .unwrap_or_else(|_| path.to_path_buf())
                };
                normalize_path(&absolute_path).display().to_string()
            }
        }
    }
}

/// Resolves "." and ".." components without touching the filesystem.
fn normalize_path(path: &Path) -> PathBuf {
    let mut components: Vec<Component> = Vec::new();

    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                if !matches!(components.last(), Some(Component::RootDir) | None) {
                    components.pop();
                }
            }
            _ => components.push(component),
        }
    }

    components.iter().collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalizes_parent_components_of_missing_paths() {
        let displayed = Path::new("/does/not/../exist").best_effort_path_display();
        assert_eq!(displayed, "/does/exist");
    }

    #[test]
    fn keeps_the_root_when_parent_components_underflow() {
        let displayed = Path::new("/../..").best_effort_path_display();
        assert_eq!(displayed, "/");
    }
}

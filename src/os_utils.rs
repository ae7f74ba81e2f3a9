//! Utilities pertaining to filesystem and other os-level settings
//!

use camino::Utf8Path;

/// Create a novel directory path if it does not exist already
///
/// If the directory already exists no operations are performed
///
/// * `label` - used to describe the error directory in an error message
///
pub fn create_dir_all(dir: &Utf8Path, label: &str) {
    if !dir.is_dir() {
        match std::fs::create_dir_all(dir) {
            Ok(_) => {}
            Err(e) => {
                panic!("Can't create new {} directory at '{}': {}", label, dir, e);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_dir_all() {
        let dir = std::env::temp_dir().join(format!("pecluster_os_utils_{}", std::process::id()));
        let dir = camino::Utf8PathBuf::from_path_buf(dir).unwrap();
        let nested = dir.join("a").join("b");
        create_dir_all(&nested, "test");
        assert!(nested.is_dir());

        // Repeat call on an existing directory is a no-op
        create_dir_all(&nested, "test");
        std::fs::remove_dir_all(&dir).unwrap();
    }
}

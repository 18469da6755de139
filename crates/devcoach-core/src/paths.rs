use std::path::{Path, PathBuf};

pub const DEVCOACH_DIR: &str = ".devcoach";
pub const CONFIG_FILE: &str = ".devcoach/config.yaml";

pub fn config_path(root: &Path) -> PathBuf {
    root.join(CONFIG_FILE)
}

pub fn devcoach_dir(root: &Path) -> PathBuf {
    root.join(DEVCOACH_DIR)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_lives_under_devcoach_dir() {
        let root = Path::new("/tmp/project");
        assert!(config_path(root).starts_with(devcoach_dir(root)));
        assert_eq!(
            config_path(root),
            PathBuf::from("/tmp/project/.devcoach/config.yaml")
        );
    }
}

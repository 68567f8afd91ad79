use std::{env, path::PathBuf};

use crate::DESKTOP_ROOT_ENV;

pub fn default_packaged_root_dir() -> Option<PathBuf> {
    root_dir_from_override(env::var(DESKTOP_ROOT_ENV).ok().as_deref())
        .or_else(|| home::home_dir().map(|home| home.join(".eastway-admin")))
}

fn root_dir_from_override(raw: Option<&str>) -> Option<PathBuf> {
    let trimmed = raw?.trim();
    if trimmed.is_empty() {
        return None;
    }
    Some(PathBuf::from(trimmed))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn root_dir_from_override_ignores_blank_values() {
        assert_eq!(root_dir_from_override(None), None);
        assert_eq!(root_dir_from_override(Some("   ")), None);
    }

    #[test]
    fn root_dir_from_override_trims_whitespace() {
        assert_eq!(
            root_dir_from_override(Some("  /opt/eastway ")),
            Some(PathBuf::from("/opt/eastway"))
        );
    }
}

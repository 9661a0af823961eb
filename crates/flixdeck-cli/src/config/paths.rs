//! Config directory resolution.

use std::path::{Path, PathBuf};

use anyhow::{Result, bail};

/// Resolves the config file path.
///
/// - If `dir` is `Some`, returns `{dir}/config.toml`.
/// - Otherwise returns `$XDG_CONFIG_HOME/flixdeck/config.toml`, falling back
///   to `~/.config/flixdeck/config.toml`.
///
/// # Errors
///
/// Returns an error if neither `XDG_CONFIG_HOME` nor `HOME` is set (when `dir` is `None`).
pub fn resolve_config_path(dir: Option<&PathBuf>) -> Result<PathBuf> {
    config_path_from(
        dir.map(PathBuf::as_path),
        std::env::var_os("XDG_CONFIG_HOME").map(PathBuf::from),
        std::env::var_os("HOME").map(PathBuf::from),
    )
}

fn config_path_from(
    dir: Option<&Path>,
    xdg_config_home: Option<PathBuf>,
    home: Option<PathBuf>,
) -> Result<PathBuf> {
    if let Some(d) = dir {
        return Ok(d.join("config.toml"));
    }

    let base = match (xdg_config_home, home) {
        (Some(xdg), _) if xdg.is_absolute() => xdg,
        (_, Some(home)) => home.join(".config"),
        _ => bail!("HOME environment variable is not set"),
    };
    Ok(base.join("flixdeck").join("config.toml"))
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use super::*;

    #[test]
    fn test_resolve_with_dir() {
        // Arrange
        let dir = PathBuf::from("/tmp/flixdeck-home");

        // Act
        let path = resolve_config_path(Some(&dir)).unwrap();

        // Assert
        assert_eq!(path, PathBuf::from("/tmp/flixdeck-home/config.toml"));
    }

    #[test]
    fn test_xdg_config_home_wins_over_home() {
        // Arrange & Act
        let path = config_path_from(
            None,
            Some(PathBuf::from("/xdg")),
            Some(PathBuf::from("/home/user")),
        )
        .unwrap();

        // Assert
        assert_eq!(path, PathBuf::from("/xdg/flixdeck/config.toml"));
    }

    #[test]
    fn test_relative_xdg_is_ignored() {
        // Arrange & Act
        let path = config_path_from(
            None,
            Some(PathBuf::from("relative")),
            Some(PathBuf::from("/home/user")),
        )
        .unwrap();

        // Assert
        assert_eq!(
            path,
            PathBuf::from("/home/user/.config/flixdeck/config.toml")
        );
    }

    #[test]
    fn test_no_home_is_an_error() {
        // Arrange & Act
        let result = config_path_from(None, None, None);

        // Assert
        assert!(result.is_err());
    }
}

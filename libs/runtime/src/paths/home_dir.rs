use std::path::PathBuf;

use anyhow::{anyhow, Context, Result};

/// Resolve the application home directory.
///
/// - `None` → `<user home>/<default_subdir>`
/// - `~` or `~/...` → expanded against the user home
/// - relative paths → joined onto the current working directory
///
/// With `create = true` the directory is created if missing.
pub fn resolve_home_dir(
    configured: Option<String>,
    default_subdir: &str,
    create: bool,
) -> Result<PathBuf> {
    let user_home = || dirs::home_dir().ok_or_else(|| anyhow!("cannot determine user home"));

    let path = match configured {
        None => user_home()?.join(default_subdir),
        Some(raw) if raw == "~" => user_home()?,
        Some(raw) => match raw.strip_prefix("~/") {
            Some(rest) => user_home()?.join(rest),
            None => {
                let p = PathBuf::from(raw);
                if p.is_absolute() {
                    p
                } else {
                    std::env::current_dir()
                        .context("cannot read current directory")?
                        .join(p)
                }
            }
        },
    };

    if create {
        std::fs::create_dir_all(&path)
            .with_context(|| format!("cannot create home dir {}", path.display()))?;
    }
    Ok(path)
}

use std::{path::PathBuf, sync::Arc};

use weather_core::IconExists;

const EXTENSIONS: [&str; 2] = ["svg", "png"];

/// Icon lookup over flat icon directories.
///
/// With no directories every candidate is accepted, so the most specific
/// icon name always wins.
pub fn icon_lookup(dirs: &[PathBuf]) -> IconExists {
    if dirs.is_empty() {
        return Arc::new(|_: &str| true);
    }

    let dirs = dirs.to_vec();
    Arc::new(move |name: &str| {
        dirs.iter().any(|dir| {
            EXTENSIONS
                .iter()
                .any(|ext| dir.join(format!("{name}.{ext}")).is_file())
        })
    })
}

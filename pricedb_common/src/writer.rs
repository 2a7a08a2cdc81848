//! Rendering price sets back to ledger text and replacing the ledger on disk.
use std::fs;
use std::io::Write;
use std::path::Path;

use log::info;
use tempfile::Builder;

use crate::price::{LINE_END, PriceSet};
use crate::result::Result;

/// Renders every record followed by `\r\n`.
pub fn render(prices: &PriceSet) -> String {
    prices
        .iter()
        .map(|price| format!("{price}{LINE_END}"))
        .collect()
}

/// Replaces the ledger at `path` with `prices`.
///
/// The text goes to a temporary file in the same directory, which is synced and then
/// renamed over `path` in one step. A failure at any point leaves the old ledger intact.
/// An existing ledger keeps its permissions; a new one gets `0666` minus the umask.
pub fn write_price_db(path: &Path, prices: &PriceSet) -> Result<()> {
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };

    #[cfg_attr(not(unix), allow(unused_mut))]
    let mut builder = Builder::new();
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        builder.permissions(fs::Permissions::from_mode(0o666));
    }
    let mut file = builder.tempfile_in(dir)?;
    if let Ok(metadata) = fs::metadata(path) {
        file.as_file().set_permissions(metadata.permissions())?;
    }
    file.write_all(render(prices).as_bytes())?;
    file.as_file().sync_all()?;
    file.persist(path)?;

    info!("Wrote {} prices to {}", prices.len(), path.display());
    Ok(())
}

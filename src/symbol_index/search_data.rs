//! Doxygen-style `searchData` table
//!
//! Renders an [`Index`] in the layout static documentation search boxes
//! load from `search/all_*.js`:
//!
//! ```text
//! var searchData=
//! [
//!   ['pop_5fback',['pop_back',['json_pointer.html#a4b1e',1,'nlohmann::json_pointer']]],
//! ];
//! ```

use std::fmt::Write as _;
use std::fs;
use std::path::Path;

use super::error::StoreError;
use super::normalize::IndexKey;
use super::store::Index;
use super::symbol::IndexEntry;

pub fn render_search_data(index: &Index) -> String {
    let mut out = String::from("var searchData=\n[\n");
    for (key, entries) in index.iter() {
        render_row(&mut out, key, entries);
    }
    out.push_str("];\n");
    out
}

pub fn write_search_data(index: &Index, path: &Path) -> Result<(), StoreError> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::write(path, render_search_data(index))?;
    Ok(())
}

fn render_row(out: &mut String, key: &IndexKey, entries: &[IndexEntry]) {
    // the first entry's display name labels the row
    let display = entries.first().map(|e| e.display_name.as_str()).unwrap_or("");
    let _ = write!(out, "  ['{}',['{}'", escape_key(key.as_str()), text(display));
    for entry in entries {
        let scope = entry
            .disambiguator
            .clone()
            .unwrap_or_else(|| entry.scope_path.join("::"));
        let _ = write!(out, ",['{}',1,'{}']", js(&entry.locator), text(&scope));
    }
    out.push_str("]],\n");
}

/// `[a-z0-9]` pass through, every other byte becomes `_` plus two hex digits
pub fn escape_key(key: &str) -> String {
    let mut escaped = String::with_capacity(key.len());
    for byte in key.bytes() {
        if byte.is_ascii_lowercase() || byte.is_ascii_digit() {
            escaped.push(byte as char);
        } else {
            let _ = write!(escaped, "_{:02x}", byte);
        }
    }
    escaped
}

fn text(s: &str) -> String {
    js(&html(s))
}

fn html(s: &str) -> String {
    s.replace('&', "&amp;").replace('<', "&lt;").replace('>', "&gt;")
}

fn js(s: &str) -> String {
    s.replace('\\', "\\\\").replace('\'', "\\'")
}

//! `.rma` project file.
//!
//! Each model file is referenced on its own line, first token
//! `<name>.<ext>`, followed by a free description.

use std::path::Path;
use std::sync::LazyLock;

use regex::Regex;
use rmarthe_core::ModelLayout;

static FILE_TOKEN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^([^\s=]+)\.([A-Za-z][A-Za-z0-9_]*)$").unwrap());

/// Extract `(extension, file name)` entries from a project file content.
pub fn parse_rma_entries(text: &str) -> Vec<(String, String)> {
    let mut entries: Vec<(String, String)> = Vec::new();
    for line in text.lines() {
        let Some(token) = line.trim_start_matches([' ', '\t', '=']).split_whitespace().next() else {
            continue;
        };
        if let Some(caps) = FILE_TOKEN.captures(token) {
            let ext = caps[2].to_ascii_lowercase();
            if !entries.iter().any(|(e, _)| *e == ext) {
                entries.push((ext, token.to_string()));
            }
        }
    }
    entries
}

/// Build the project layout of the `.rma` file at `path`.
pub fn parse_rma(path: &Path, text: &str) -> ModelLayout {
    ModelLayout::new(path, parse_rma_entries(text))
}

#[cfg(test)]
mod tests {
    use super::*;

    const RMA: &str = "Modèle Mona
 Version 9.0
mona.layer          = Couches
mona.permh          = Perméabilité
=mona.pastp         = Pas de temps
   historiq.prn
12.5 not a file
mona.kepon
";

    #[test]
    fn test_entries_keyed_by_extension() {
        let entries = parse_rma_entries(RMA);
        let exts: Vec<&str> = entries.iter().map(|(e, _)| e.as_str()).collect();
        assert_eq!(exts, vec!["layer", "permh", "pastp", "prn", "kepon"]);
        assert_eq!(entries[2].1, "mona.pastp");
    }

    #[test]
    fn test_layout_from_path() {
        let layout = parse_rma(Path::new("/models/mona.rma"), RMA);
        assert_eq!(layout.mlname, "mona");
        assert_eq!(
            layout.file("permh"),
            Some(Path::new("/models/mona.permh"))
        );
        assert!(layout.file("emmca").is_none());
    }
}

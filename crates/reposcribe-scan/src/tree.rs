//! Directory tree rendering.
//!
//! A pure, order-preserving rendering of the retained file list: one
//! indented line per unique ancestor directory (emitted the first time it is
//! encountered) and one line per file, wrapped in a code fence. Contains no
//! file content; it orients the consumer and is a token-cost line item the
//! budgeter accounts for before any file content is apportioned.

use std::collections::HashSet;

use camino::Utf8PathBuf;

use reposcribe_utils::types::FileCandidate;

/// Render the retained file list as a nested listing.
pub fn render_tree<'a, I>(files: I) -> String
where
    I: IntoIterator<Item = &'a FileCandidate>,
{
    let mut lines = vec!["# Directory Structure".to_string(), "```".to_string()];
    let mut seen_dirs: HashSet<Utf8PathBuf> = HashSet::new();

    for file in files {
        let components: Vec<&str> = file.rel_path.components().map(|c| c.as_str()).collect();

        for i in 1..components.len() {
            let dir: Utf8PathBuf = components[..i].iter().copied().collect();
            if seen_dirs.insert(dir) {
                let indent = "  ".repeat(i - 1);
                lines.push(format!("{indent}{}/", components[i - 1]));
            }
        }

        let indent = "  ".repeat(components.len().saturating_sub(1));
        lines.push(format!("{indent}{}", file.file_name()));
    }

    lines.push("```".to_string());
    lines.join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use camino::Utf8Path;

    fn candidate(rel: &str) -> FileCandidate {
        FileCandidate::new(Utf8Path::new("/repo"), Utf8PathBuf::from(rel))
    }

    #[test]
    fn renders_flat_files() {
        let files = [candidate("README.md"), candidate("main.py")];
        let tree = render_tree(files.iter());
        assert_eq!(
            tree,
            "# Directory Structure\n```\nREADME.md\nmain.py\n```"
        );
    }

    #[test]
    fn renders_nested_directories_once() {
        let files = [
            candidate("README.md"),
            candidate("src/core/engine.py"),
            candidate("src/core/models.py"),
            candidate("src/main.py"),
        ];
        let tree = render_tree(files.iter());
        let expected = "\
# Directory Structure
```
README.md
src/
  core/
    engine.py
    models.py
  main.py
```";
        assert_eq!(tree, expected);
    }

    #[test]
    fn preserves_input_order() {
        // Tier-ordered input keeps its order; directories appear where
        // first encountered
        let files = [candidate("src/main.py"), candidate("README.md")];
        let tree = render_tree(files.iter());
        let expected = "\
# Directory Structure
```
src/
  main.py
README.md
```";
        assert_eq!(tree, expected);
    }

    #[test]
    fn empty_input_renders_empty_fence() {
        let tree = render_tree(std::iter::empty::<&FileCandidate>());
        assert_eq!(tree, "# Directory Structure\n```\n```");
    }
}

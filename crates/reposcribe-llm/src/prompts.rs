//! Fixed instruction texts for the two oracle calls.
//!
//! Compiled-in constants, read-only after process start. The selector
//! instruction pins the reply shape the selector's parser expects; changing
//! one without the other breaks the delegated path (the deterministic
//! fallback then carries every run).

/// Instruction for the ranking call: pick the most informative files.
pub const SELECTOR_PROMPT: &str = "\
You are a repository analyst. You will receive the list of file paths in a \
codebase, one per line. Select the **up to 20 most important files** for \
understanding the project.

Prefer, roughly in this order:
- README and other top-level documentation
- Entry points (main.py, index.ts, app.py, src/main.rs, ...)
- Core business-logic and domain modules
- Manifests and build files that reveal the stack (package.json, \
pyproject.toml, Cargo.toml, Dockerfile, ...)
- API route definitions
- Key data models and schemas

Avoid:
- Test files (unless the project is itself a test framework)
- Generated or tool-configuration files (tsconfig, eslint, .prettierrc, ...)
- Lock files, CI configuration, changelogs

Return **only** a JSON object with a single key \"files\" whose value is an \
array of relative file paths, ordered from MOST important to LEAST \
important. No explanation, no markdown fences.

Example:
{\"files\": [\"README.md\", \"src/main.py\", \"src/core/engine.py\"]}";

/// Instruction for the summarization call: produce the final prose summary.
pub const SUMMARIZE_PROMPT: &str = "\
You are a code analyst. Given a repository's directory structure and \
selected file contents, produce a clear, human-readable summary.

Cover these sections:
1. **Purpose** — What does this project do? (1-2 sentences)
2. **Tech Stack** — Languages, frameworks, and key dependencies
3. **Architecture** — How the codebase is organized; key modules/packages
4. **Key Components** — The most important files/classes/functions and what they do
5. **Getting Started** — How to install and run the project (if discernible)

Keep it concise but informative. Focus on what matters most to someone \
seeing this project for the first time. Do NOT open with a title like \
\"Repository Summary\"; start directly with the content.";

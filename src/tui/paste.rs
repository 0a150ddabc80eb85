//! Turns text dropped or pasted onto the terminal into paths.
//!
//! Terminals deliver a drag-and-drop as a bracketed paste. Depending on the
//! terminal that text is one path per line, shell-quoted paths separated by
//! spaces (`'/a b.png' /c.png`), backslash-escaped paths (`/a\ b.png`) or
//! `file://` URIs.

use std::path::PathBuf;
use url::Url;

/// Backslash is a path separator on Windows, never an escape
const BACKSLASH_ESCAPES: bool = cfg!(not(windows));

/// Parses pasted text into the paths it names, in order
pub fn parse_dropped_paths(text: &str) -> Vec<PathBuf> {
    text.lines()
        .flat_map(split_tokens)
        .filter_map(|token| token_to_path(&token))
        .collect()
}

/// Parses a path typed into the add-path prompt.
///
/// The whole line is taken as one path when it exists, so unquoted spaces
/// work; otherwise it is parsed like pasted text. A leading `~/` expands to
/// the home directory.
pub fn parse_prompt_input(text: &str) -> Vec<PathBuf> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return Vec::new();
    }

    let whole = expand_home(trimmed);
    if whole.exists() {
        return vec![whole];
    }

    parse_dropped_paths(trimmed)
        .into_iter()
        .map(|path| match path.to_str() {
            Some(s) => expand_home(s),
            None => path,
        })
        .collect()
}

fn expand_home(path: &str) -> PathBuf {
    match (path.strip_prefix("~/"), dirs::home_dir()) {
        (Some(rest), Some(home)) => home.join(rest),
        _ if path == "~" => dirs::home_dir().unwrap_or_else(|| PathBuf::from(path)),
        _ => PathBuf::from(path),
    }
}

/// Splits one line on unquoted whitespace, removing quotes and escapes
fn split_tokens(line: &str) -> Vec<String> {
    let mut tokens = Vec::new();
    let mut current = String::new();
    // Distinguishes `''` (an empty token) from no token at all
    let mut in_token = false;
    let mut quote: Option<char> = None;
    let mut chars = line.chars();

    while let Some(c) = chars.next() {
        match quote {
            Some('\'') => {
                if c == '\'' {
                    quote = None;
                } else {
                    current.push(c);
                }
            }
            Some(_) => match c {
                '"' => quote = None,
                '\\' if BACKSLASH_ESCAPES => match chars.next() {
                    Some(next @ ('"' | '\\')) => current.push(next),
                    Some(next) => {
                        current.push('\\');
                        current.push(next);
                    }
                    None => current.push('\\'),
                },
                _ => current.push(c),
            },
            None => match c {
                '\'' | '"' => {
                    quote = Some(c);
                    in_token = true;
                }
                '\\' if BACKSLASH_ESCAPES => {
                    if let Some(next) = chars.next() {
                        current.push(next);
                    }
                    in_token = true;
                }
                c if c.is_whitespace() => {
                    if in_token {
                        tokens.push(std::mem::take(&mut current));
                        in_token = false;
                    }
                }
                _ => {
                    current.push(c);
                    in_token = true;
                }
            },
        }
    }

    // An unterminated quote swallows the rest of the line
    if in_token {
        tokens.push(current);
    }

    tokens
}

fn token_to_path(token: &str) -> Option<PathBuf> {
    if token.is_empty() {
        return None;
    }

    if token.starts_with("file://") {
        return match Url::parse(token).ok()?.to_file_path() {
            Ok(path) => Some(path),
            Err(()) => {
                tracing::debug!("Ignoring non-local file URI {}", token);
                None
            }
        };
    }

    Some(PathBuf::from(token))
}

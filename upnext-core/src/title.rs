//! Event title cleanup: configured replacements plus length shortening.

use regex::{Regex, RegexBuilder};

use crate::config::TitleReplacement;
use crate::error::{AgendaError, AgendaResult};

const ELLIPSIS: char = '…';
const LINE_BREAK: char = '\n';

/// A replacement rule with its needle resolved at configuration time,
/// so the literal-vs-regex dispatch never happens per title.
#[derive(Debug, Clone)]
pub enum ReplaceRule {
    /// Plain substring needle; replaces the first occurrence only.
    Literal { needle: String, replacement: String },
    /// `/pattern/flags` needle; the `g` flag replaces every match.
    Regex {
        pattern: Regex,
        global: bool,
        replacement: String,
    },
}

impl ReplaceRule {
    /// Resolves a raw needle, detecting the `/pattern/flags` syntax.
    pub fn parse(rule: &TitleReplacement) -> AgendaResult<Self> {
        let Some((body, flags)) = split_regex_needle(&rule.needle) else {
            return Ok(ReplaceRule::Literal {
                needle: rule.needle.clone(),
                replacement: rule.replacement.clone(),
            });
        };

        let pattern = RegexBuilder::new(body)
            .case_insensitive(flags.contains('i'))
            .multi_line(flags.contains('m'))
            .build()
            .map_err(|e| AgendaError::TitleRule {
                rule: rule.needle.clone(),
                message: e.to_string(),
            })?;
        Ok(ReplaceRule::Regex {
            pattern,
            global: flags.contains('g'),
            replacement: rule.replacement.clone(),
        })
    }

    fn apply(&self, title: &str) -> String {
        match self {
            ReplaceRule::Literal {
                needle,
                replacement,
            } => title.replacen(needle.as_str(), replacement, 1),
            ReplaceRule::Regex {
                pattern,
                global,
                replacement,
            } => {
                if *global {
                    pattern.replace_all(title, replacement.as_str()).into_owned()
                } else {
                    pattern.replace(title, replacement.as_str()).into_owned()
                }
            }
        }
    }
}

/// `/body/flags` detection; flags limited to `g`, `i` and `m`.
fn split_regex_needle(needle: &str) -> Option<(&str, &str)> {
    let rest = needle.strip_prefix('/')?;
    let slash = rest.rfind('/')?;
    let (body, flags) = (&rest[..slash], &rest[slash + 1..]);
    if body.is_empty() || !flags.chars().all(|c| matches!(c, 'g' | 'i' | 'm')) {
        return None;
    }
    Some((body, flags))
}

/// Ordered title replacements plus the shortening policy.
#[derive(Debug, Clone)]
pub struct TitleTransformer {
    rules: Vec<ReplaceRule>,
    max_length: usize,
    wrap: bool,
    max_lines: usize,
}

impl TitleTransformer {
    pub fn new(
        replacements: &[TitleReplacement],
        max_length: usize,
        wrap: bool,
        max_lines: usize,
    ) -> AgendaResult<Self> {
        let rules = replacements
            .iter()
            .map(ReplaceRule::parse)
            .collect::<AgendaResult<Vec<_>>>()?;
        Ok(TitleTransformer {
            rules,
            max_length,
            wrap,
            max_lines,
        })
    }

    /// Applies every rule in its configured order over the running title,
    /// then shortens the result to the configured budget.
    pub fn transform(&self, title: &str) -> String {
        let mut title = title.to_string();
        for rule in &self.rules {
            title = rule.apply(&title);
        }
        shorten(&title, self.max_length, self.wrap, self.max_lines)
    }
}

/// Shortens a title to `max_length` characters with a trailing ellipsis,
/// or wraps it into at most `max_lines` lines of `max_length - 1`
/// characters joined by line breaks.
pub fn shorten(title: &str, max_length: usize, wrap: bool, max_lines: usize) -> String {
    if !wrap {
        return if title.chars().count() > max_length {
            let mut cut: String = title.trim().chars().take(max_length).collect();
            cut.push(ELLIPSIS);
            cut
        } else {
            title.trim().to_string()
        };
    }

    let mut wrapped = String::new();
    let mut current_line = String::new();
    let mut line = 0usize;

    for word in title.split(' ') {
        // One below the budget to leave room for the joining space.
        if current_line.chars().count() + word.chars().count() < max_length.saturating_sub(1) {
            current_line.push_str(word);
            current_line.push(' ');
            continue;
        }

        line += 1;
        if line > max_lines.saturating_sub(1) {
            current_line.push(ELLIPSIS);
            break;
        }

        if current_line.is_empty() {
            wrapped.push_str(word);
            wrapped.push(LINE_BREAK);
        } else {
            wrapped.push_str(&current_line);
            wrapped.push(LINE_BREAK);
            wrapped.push_str(word);
            wrapped.push(' ');
        }
        current_line.clear();
    }

    format!("{wrapped}{current_line}").trim().to_string()
}

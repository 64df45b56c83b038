//! Named-placeholder template rendering.
//!
//! `{KEY}` is replaced by the value bound to `KEY`; `{{` and `}}` render as
//! literal braces. Anything else involving a brace is rejected so a broken
//! template never produces a half-filled file.

use crate::error::{Error, Result};

pub struct TemplateVars;

impl TemplateVars {
    pub const PACKAGE_NAME: &'static str = "PACKAGE_NAME";
    pub const PACKAGE_VERSION: &'static str = "PACKAGE_VERSION";
}

pub fn render(template: &str, variables: &[(&str, &str)]) -> Result<String> {
    let mut result = String::with_capacity(template.len());
    let mut chars = template.char_indices().peekable();

    while let Some((offset, c)) = chars.next() {
        match c {
            '{' => {
                if matches!(chars.peek(), Some((_, '{'))) {
                    chars.next();
                    result.push('{');
                    continue;
                }

                let mut key = String::new();
                let mut closed = false;
                for (_, c) in chars.by_ref() {
                    match c {
                        '}' => {
                            closed = true;
                            break;
                        }
                        '{' => {
                            return Err(Error::template_invalid(
                                "nested '{' inside placeholder",
                                Some(key),
                                Some(offset),
                            ));
                        }
                        _ => key.push(c),
                    }
                }

                if !closed {
                    return Err(Error::template_invalid(
                        "single '{' encountered",
                        None,
                        Some(offset),
                    ));
                }

                let value = variables
                    .iter()
                    .find(|(name, _)| *name == key)
                    .map(|(_, value)| *value)
                    .ok_or_else(|| {
                        Error::template_invalid(
                            "unknown placeholder",
                            Some(key.clone()),
                            Some(offset),
                        )
                    })?;
                result.push_str(value);
            }
            '}' => {
                if matches!(chars.peek(), Some((_, '}'))) {
                    chars.next();
                    result.push('}');
                } else {
                    return Err(Error::template_invalid(
                        "single '}' encountered",
                        None,
                        Some(offset),
                    ));
                }
            }
            _ => result.push(c),
        }
    }

    Ok(result)
}

//! Placeholder substitution for reply templates.
//!
//! Templates are plain strings with two named placeholders, `{name}` and
//! `{msg}`. Doubled braces (`{{`, `}}`) produce literal braces. Nothing else
//! is interpreted: no format specs, no conditionals, no escaping of the
//! substituted values.

use crate::error::FormatError;
use crate::mood::Mood;
use crate::profile::CharacterProfile;

pub const NAME_PLACEHOLDER: &str = "name";
pub const MESSAGE_PLACEHOLDER: &str = "msg";

/// Render the template selected for `mood` with the profile's name and `message`.
pub fn render(profile: &CharacterProfile, mood: Mood, message: &str) -> Result<String, FormatError> {
    substitute(profile.template_for(mood), &profile.name, message)
}

/// Substitute `{name}` and `{msg}` in `template`.
pub fn substitute(template: &str, name: &str, message: &str) -> Result<String, FormatError> {
    let mut out = String::with_capacity(template.len() + name.len() + message.len());
    let mut chars = template.char_indices().peekable();

    while let Some((pos, c)) = chars.next() {
        match c {
            '{' => {
                if matches!(chars.peek(), Some((_, '{'))) {
                    chars.next();
                    out.push('{');
                    continue;
                }
                let start = pos + 1;
                let end = loop {
                    match chars.next() {
                        Some((i, '}')) => break i,
                        Some((_, '{')) | None => {
                            return Err(FormatError::UnbalancedBrace {
                                brace: '{',
                                position: pos,
                            })
                        }
                        Some(_) => {}
                    }
                };
                match &template[start..end] {
                    NAME_PLACEHOLDER => out.push_str(name),
                    MESSAGE_PLACEHOLDER => out.push_str(message),
                    other => return Err(FormatError::UnknownPlaceholder(other.to_string())),
                }
            }
            '}' => {
                if matches!(chars.peek(), Some((_, '}'))) {
                    chars.next();
                    out.push('}');
                } else {
                    return Err(FormatError::UnbalancedBrace {
                        brace: '}',
                        position: pos,
                    });
                }
            }
            _ => out.push(c),
        }
    }

    Ok(out)
}

/// Check that a template only uses known placeholders and balanced braces.
pub fn check(template: &str) -> Result<(), FormatError> {
    substitute(template, "", "").map(|_| ())
}

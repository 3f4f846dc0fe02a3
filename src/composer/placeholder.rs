//! Placeholder pushes that reserve room for a signature and public key in templated
//! unlocking scripts.
//!
//! A template is any unlocking script that pushes [`PLACEHOLDER_SIG`] and
//! [`PLACEHOLDER_PUBKEY`] exactly once each. Filling it swaps those two pushes for the real
//! values and leaves every other element untouched.
use crate::script::op_codes::OP_PUSH;
use crate::script::{Script, ScriptElement};
use crate::util::{Error, Result};

/// Stands in for a tx-format signature (72 bytes, the usual upper bound).
pub const PLACEHOLDER_SIG: &[u8; 72] = b"Ah, this is a place holder and will be replaced in the final signature.\0";

/// Stands in for a compressed public key (33 bytes).
pub const PLACEHOLDER_PUBKEY: &[u8; 33] = b"Ah, this is a place holder and wi";

/// `push(PLACEHOLDER_SIG) push(PLACEHOLDER_PUBKEY)`, the template of a P2PKH unlock.
#[must_use]
pub fn placeholder_unlock_script() -> Script {
    let mut script = Script::new();
    script.append(OP_PUSH + PLACEHOLDER_SIG.len() as u8);
    script.append_slice(PLACEHOLDER_SIG);
    script.append(OP_PUSH + PLACEHOLDER_PUBKEY.len() as u8);
    script.append_slice(PLACEHOLDER_PUBKEY);
    script
}

/// Replaces the single push of `placeholder` in `script` with a minimal push of `replacement`.
///
/// Only whole push payloads are compared, so a placeholder that is a prefix of another
/// never matches it.
///
/// # Errors
/// `Error::PlaceholderNotFound` unless exactly one push carries `placeholder`, or
/// `Error::BadData` if the script cannot be parsed.
pub fn replace_push(script: &Script, placeholder: &[u8], replacement: &[u8]) -> Result<Script> {
    let mut elements = script.elements()?;
    let mut matches = elements
        .iter()
        .enumerate()
        .filter(|(_, element)| element.data() == Some(placeholder))
        .map(|(i, _)| i);
    let index = match (matches.next(), matches.next()) {
        (Some(i), None) => i,
        (first, _) => {
            let found = if first.is_none() { "no push" } else { "more than one push" };
            return Err(Error::PlaceholderNotFound(format!(
                "{} of {}-byte placeholder {}",
                found,
                placeholder.len(),
                hex::encode(&placeholder[..placeholder.len().min(8)])
            )));
        }
    };
    elements[index] = ScriptElement::push(replacement)?;
    Ok(Script::from_elements(&elements))
}

/// Fills both the signature and the public key placeholder of a template.
///
/// # Errors
/// See [`replace_push`].
pub fn fill_placeholders(script: &Script, sig: &[u8], public_key: &[u8]) -> Result<Script> {
    let script = replace_push(script, PLACEHOLDER_SIG, sig)?;
    replace_push(&script, PLACEHOLDER_PUBKEY, public_key)
}

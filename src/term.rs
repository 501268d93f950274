//! Elixir Term Conversion Utilities
//!
//! Converts projection results to Elixir terms: display nodes become maps
//! with atom keys, strings become binaries.

use crate::ead::{ContainerEntry, ContainerSummary, DisplayNode, ResolutionWarning};
use crate::error::EadError;
use rustler::{Encoder, Env, NewBinary, NifResult, Term};

rustler::atoms! {
    ok,
    error,
    options,
    id,
    text,
    type_ = "type",
    locator,
    children,
    containers,
    entries,
    href,
    value,
}

/// Convert a string to a binary term (more efficient than .encode())
#[inline]
pub fn str_to_binary<'a>(env: Env<'a>, s: &str) -> Term<'a> {
    let bytes = s.as_bytes();
    let mut binary = NewBinary::new(env, bytes.len());
    binary.as_mut_slice().copy_from_slice(bytes);
    binary.into()
}

/// Build a list term from a slice, preserving order
fn list_to_term<'a, T>(
    env: Env<'a>,
    items: &[T],
    convert: impl Fn(Env<'a>, &T) -> NifResult<Term<'a>>,
) -> NifResult<Term<'a>> {
    let mut list = Term::list_new_empty(env);
    for item in items.iter().rev() {
        list = list.list_prepend(convert(env, item)?);
    }
    Ok(list)
}

pub fn nodes_to_term<'a>(env: Env<'a>, nodes: &[DisplayNode]) -> NifResult<Term<'a>> {
    list_to_term(env, nodes, node_to_term)
}

/// `%{id, text, type, locator, children, containers}` plus `href` when set
pub fn node_to_term<'a>(env: Env<'a>, node: &DisplayNode) -> NifResult<Term<'a>> {
    let mut pairs = vec![
        (id().encode(env), str_to_binary(env, &node.id)),
        (text().encode(env), str_to_binary(env, &node.text)),
        (type_().encode(env), str_to_binary(env, &node.kind)),
        (locator().encode(env), str_to_binary(env, &node.locator)),
        (children().encode(env), nodes_to_term(env, &node.children)?),
        (containers().encode(env), list_to_term(env, &node.containers, summary_to_term)?),
    ];
    if let Some(link) = &node.href {
        pairs.push((href().encode(env), str_to_binary(env, link)));
    }
    Term::map_from_pairs(env, &pairs)
}

fn summary_to_term<'a>(env: Env<'a>, summary: &ContainerSummary) -> NifResult<Term<'a>> {
    // Elixir maps are unordered; the ordered view is the containers list
    let mut entry_pairs = Vec::with_capacity(summary.entries.len());
    for (kind, entry) in &summary.entries {
        let entry_map = Term::map_from_pairs(
            env,
            &[
                (id().encode(env), str_to_binary(env, &entry.id)),
                (value().encode(env), str_to_binary(env, &entry.value)),
                (locator().encode(env), str_to_binary(env, &entry.locator)),
            ],
        )?;
        entry_pairs.push((str_to_binary(env, kind), entry_map));
    }

    Term::map_from_pairs(
        env,
        &[
            (text().encode(env), str_to_binary(env, &summary.text)),
            (entries().encode(env), Term::map_from_pairs(env, &entry_pairs)?),
            (containers().encode(env), list_to_term(env, &summary.containers, entry_to_term)?),
        ],
    )
}

fn entry_to_term<'a>(env: Env<'a>, entry: &ContainerEntry) -> NifResult<Term<'a>> {
    Term::map_from_pairs(
        env,
        &[
            (type_().encode(env), str_to_binary(env, &entry.kind)),
            (id().encode(env), str_to_binary(env, &entry.id)),
            (value().encode(env), str_to_binary(env, &entry.value)),
            (locator().encode(env), str_to_binary(env, &entry.locator)),
        ],
    )
}

/// `{folder_locator, parent_id, matches}`
pub fn warnings_to_term<'a>(env: Env<'a>, warnings: &[ResolutionWarning]) -> NifResult<Term<'a>> {
    list_to_term(env, warnings, |env, w| {
        Ok((
            str_to_binary(env, &w.folder_locator),
            str_to_binary(env, &w.parent_id),
            w.matches,
        )
            .encode(env))
    })
}

/// `{:error, {kind, message, position}}`; options errors use the `:options` tag
pub fn error_to_term<'a>(env: Env<'a>, err: &EadError) -> NifResult<Term<'a>> {
    let message = str_to_binary(env, err.message());
    let reason = match err {
        EadError::Options(_) => (options().encode(env), message, err.position()).encode(env),
        _ => {
            let kind = rustler::types::atom::Atom::from_str(env, err.kind())?;
            (kind, message, err.position()).encode(env)
        }
    };
    Ok((error(), reason).encode(env))
}

pub fn ok_to_term<'a>(env: Env<'a>, value: Term<'a>) -> Term<'a> {
    (ok(), value).encode(env)
}

//! EadView - EAD finding-aid projections for the BEAM
//!
//! Projections:
//! A: Component tree (component_tree, component_tree_json)
//! B: Filtered container list (container_list, container_list_json)
//! C: HTML rendering (render_html)
//! D: All three at once, in parallel (project)

mod core;
mod dom;
mod ead;
mod error;
mod options;
mod render;
mod resource;
mod term;

use ead::{build_container_list, build_tree, EadDocument};
use options::Options;
use render::render_html as render_document;
use resource::{DocumentRef, DocumentResource};
use rustler::{Binary, Encoder, Env, NifResult, ResourceArc, Term};
use serde::Serialize;
use term::{error_to_term, nodes_to_term, ok_to_term, str_to_binary, warnings_to_term};

// ============================================================================
// Allocator Configuration
// ============================================================================

#[cfg(feature = "mimalloc")]
#[global_allocator]
static GLOBAL: mimalloc::MiMalloc = mimalloc::MiMalloc;

fn to_json<T: Serialize + ?Sized>(value: &T) -> NifResult<String> {
    serde_json::to_string(value).map_err(json_error)
}

fn json_error(err: serde_json::Error) -> rustler::Error {
    rustler::Error::Term(Box::new(err.to_string()))
}

// ============================================================================
// Parsing
// ============================================================================

/// Parse a finding aid (returns {:ok, doc} or {:error, {kind, message, position}})
#[rustler::nif(schedule = "DirtyCpu")]
fn parse<'a>(env: Env<'a>, input: Binary<'a>) -> NifResult<Term<'a>> {
    match EadDocument::parse(input.as_slice()) {
        Ok(doc) => {
            let arc = ResourceArc::new(DocumentResource::new(doc));
            Ok(ok_to_term(env, arc.encode(env)))
        }
        Err(e) => error_to_term(env, &e),
    }
}

// ============================================================================
// Projection A: Component Tree
// ============================================================================

#[rustler::nif(schedule = "DirtyCpu")]
fn component_tree<'a>(env: Env<'a>, doc_ref: DocumentRef) -> NifResult<Term<'a>> {
    nodes_to_term(env, &build_tree(&doc_ref.doc).nodes)
}

#[rustler::nif(schedule = "DirtyCpu")]
fn component_tree_json<'a>(env: Env<'a>, doc_ref: DocumentRef) -> NifResult<Term<'a>> {
    let json = to_json(&build_tree(&doc_ref.doc).nodes)?;
    Ok(str_to_binary(env, &json))
}

/// Folder references skipped because their parent id matched zero or
/// several containers
#[rustler::nif(schedule = "DirtyCpu")]
fn resolution_warnings<'a>(env: Env<'a>, doc_ref: DocumentRef) -> NifResult<Term<'a>> {
    warnings_to_term(env, &build_tree(&doc_ref.doc).warnings)
}

// ============================================================================
// Projection B: Filtered Container List
// ============================================================================

#[rustler::nif(schedule = "DirtyCpu")]
fn container_list<'a>(
    env: Env<'a>,
    doc_ref: DocumentRef,
    object_id: &str,
    options_json: &str,
) -> NifResult<Term<'a>> {
    let options = match Options::from_json(options_json) {
        Ok(options) => options,
        Err(e) => return error_to_term(env, &e),
    };
    nodes_to_term(env, &build_container_list(&doc_ref.doc, object_id, &options))
}

#[rustler::nif(schedule = "DirtyCpu")]
fn container_list_json<'a>(
    env: Env<'a>,
    doc_ref: DocumentRef,
    object_id: &str,
    options_json: &str,
) -> NifResult<Term<'a>> {
    let options = match Options::from_json(options_json) {
        Ok(options) => options,
        Err(e) => return error_to_term(env, &e),
    };
    let json = to_json(&build_container_list(&doc_ref.doc, object_id, &options))?;
    Ok(str_to_binary(env, &json))
}

// ============================================================================
// Projection C: HTML
// ============================================================================

#[rustler::nif(schedule = "DirtyCpu")]
fn render_html<'a>(env: Env<'a>, doc_ref: DocumentRef, options_json: &str) -> NifResult<Term<'a>> {
    let options = match Options::from_json(options_json) {
        Ok(options) => options,
        Err(e) => return error_to_term(env, &e),
    };
    Ok(str_to_binary(env, &render_document(&doc_ref.doc, &options)))
}

// ============================================================================
// Projection D: Combined
// ============================================================================

/// Tree JSON, container-list JSON and HTML computed in parallel
/// over the shared read-only document
#[rustler::nif(schedule = "DirtyCpu")]
fn project<'a>(
    env: Env<'a>,
    doc_ref: DocumentRef,
    object_id: &str,
    options_json: &str,
) -> NifResult<Term<'a>> {
    let options = match Options::from_json(options_json) {
        Ok(options) => options,
        Err(e) => return error_to_term(env, &e),
    };
    let doc = &doc_ref.doc;

    let (tree, (list, html)) = rayon::join(
        || serde_json::to_string(&build_tree(doc).nodes),
        || {
            rayon::join(
                || serde_json::to_string(&build_container_list(doc, object_id, &options)),
                || render_document(doc, &options),
            )
        },
    );

    Ok((
        str_to_binary(env, &tree.map_err(json_error)?),
        str_to_binary(env, &list.map_err(json_error)?),
        str_to_binary(env, &html),
    )
        .encode(env))
}

// ============================================================================
// NIF Initialization
// ============================================================================

rustler::init!("Elixir.EadView.Native");

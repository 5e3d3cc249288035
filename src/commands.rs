//! One-shot commands: open a document, act on one record, exit.

use std::path::{Path, PathBuf};

use record_confirm_common::{Config, RecordForm, Session};
use tracing::info;

use crate::error::{AppError, Result};
use crate::render::render_form;

/// How `modify` picks its record
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Target {
    Index(usize),
    Search(String),
}

/// Open `file`, or the configured default document.
pub fn open_session(config: &Config, file: Option<&Path>) -> Result<Session> {
    let path = match file {
        Some(path) => path.to_path_buf(),
        None => config
            .default_document_path()
            .filter(|p| p.exists())
            .ok_or_else(|| {
                AppError::NoDocument(
                    config
                        .default_document_path()
                        .map(|p| p.display().to_string())
                        .unwrap_or_else(|| config.default_file_name.clone()),
                )
            })?,
    };
    let mut session = Session::with_config(config)?;
    session.open(&path)?;
    Ok(session)
}

pub fn show(session: &mut Session, config: &Config, index: usize, json: bool) -> Result<String> {
    let form = session.display(index)?;
    if json {
        let record = session.store().records().get(form.index);
        return Ok(serde_json::to_string_pretty(&record)?);
    }
    Ok(render_form(&form, session.base_dir(), config.max_image_edge))
}

pub fn search(session: &mut Session, config: &Config, term: &str) -> Result<String> {
    let form = session.search(term)?;
    Ok(render_form(&form, session.base_dir(), config.max_image_edge))
}

/// Confirm one record and wait until the document is written.
///
/// Values left as `None` keep what the form shows for that record.
pub fn modify(
    session: &mut Session,
    target: &Target,
    confirmed_identifier: Option<&str>,
    confirmed_results: Option<&str>,
) -> Result<RecordForm> {
    let form = match target {
        Target::Index(index) => session.display(*index)?,
        Target::Search(term) => session.search(term)?,
    };
    let identifier = confirmed_identifier.unwrap_or(&form.confirmed_identifier);
    let results = confirmed_results.unwrap_or(&form.confirmed_results);

    let updated = session
        .modify(identifier, results)?
        .unwrap_or_else(|| form.clone());
    session.flush();
    check_saves(session)?;
    info!(index = updated.index, "record confirmed");
    Ok(updated)
}

/// Apply the values given on the command line. Returns true when
/// anything changed and the config needs saving.
pub fn update_config(
    config: &mut Config,
    default_file: Option<PathBuf>,
    indent: Option<usize>,
    max_image_edge: Option<u32>,
) -> bool {
    let before = config.clone();
    if let Some(path) = default_file {
        config.default_file = Some(path);
    }
    if let Some(indent) = indent {
        config.indent = indent;
    }
    if let Some(edge) = max_image_edge {
        config.max_image_edge = edge;
    }
    let changed = *config != before;
    if changed {
        info!("configuration updated");
    }
    changed
}

/// Turn the first failed save since the last check into an error.
pub fn check_saves(session: &Session) -> Result<()> {
    match session.poll_saves().into_iter().find_map(|o| o.result.err()) {
        Some(message) => Err(AppError::SaveFailed(message)),
        None => Ok(()),
    }
}

//! Filesystem event handler for the notify watcher (hot-reload).

use std::fs;
use std::path::Path;

use notify::event::{CreateKind, ModifyKind, RemoveKind};
use notify::{Event, EventKind};
use tracing::{info, warn};

use super::core::{is_yaml, parse_document};
use super::snapshot::SharedRules;

/// Handle a single filesystem event from the notify watcher.
pub(super) fn handle_fs_event(event: &Event, shared: &SharedRules) {
    for path in &event.paths {
        if !is_yaml(path) {
            continue;
        }

        // Skip dotfiles (including our .tmp files)
        if let Some(name) = path.file_name().and_then(|n| n.to_str()) {
            if name.starts_with('.') {
                continue;
            }
        }

        match &event.kind {
            EventKind::Create(CreateKind::File)
            | EventKind::Modify(ModifyKind::Data(_))
            | EventKind::Modify(ModifyKind::Name(_)) => reload(path, shared),
            EventKind::Remove(RemoveKind::File) => remove_by_path(path, shared),
            _ => {}
        }
    }
}

fn reload(path: &Path, shared: &SharedRules) {
    let contents = match fs::read_to_string(path) {
        Ok(contents) => contents,
        Err(e) => {
            warn!(path = %path.display(), error = %e, "failed to read file during hot-reload");
            return;
        }
    };

    match parse_document(&contents) {
        Ok(doc) => {
            info!(id = %doc.metadata().id, kind = %doc.kind(), path = %path.display(), "hot-reloaded document");
            shared.upsert(doc);
        }
        Err(e) => {
            warn!(
                path = %path.display(),
                error = %e,
                "failed to parse document during hot-reload, keeping previous version"
            );
        }
    }
}

fn remove_by_path(path: &Path, shared: &SharedRules) {
    let Some(stem) = path.file_stem().and_then(|s| s.to_str()) else {
        return;
    };
    if shared.remove(stem) {
        info!(id = %stem, path = %path.display(), "removed document after file deletion");
    }
}

//! Watch mode: rebuild on debounced file-system changes.
//!
//! Events are debounced with a quiet-period window so editor save bursts
//! trigger one rebuild. A failed rebuild is logged and the loop continues;
//! the watcher only stops when the process is interrupted.

use std::path::Path;
use std::sync::mpsc;
use std::time::Duration;

use notify::{Event, EventKind, RecursiveMode, Watcher};
use tracing::{debug, info, warn};

use crate::{BuildError, Builder};

pub(crate) fn run(builder: &Builder) -> Result<(), BuildError> {
    let source_dir = builder.config().directories.source.clone();
    let debounce = Duration::from_millis(builder.config().build.watch_debounce_ms);

    // Initial pass so the output exists before the first change arrives.
    run_iteration(builder);

    let (tx, rx) = mpsc::channel::<notify::Result<Event>>();
    let mut watcher = notify::recommended_watcher(move |event| {
        let _ = tx.send(event);
    })?;
    watcher.watch(&source_dir, RecursiveMode::Recursive)?;
    info!(source = %source_dir.display(), "watching for changes");

    while let Ok(received) = rx.recv() {
        let event = match received {
            Ok(event) => event,
            Err(err) => {
                warn!(error = %err, "watch event error");
                continue;
            }
        };
        if !is_relevant(&event, &source_dir) {
            continue;
        }

        // Absorb the burst: wait until the window passes with no events.
        while rx.recv_timeout(debounce).is_ok() {}

        debug!(paths = ?event.paths, "change detected, rebuilding");
        run_iteration(builder);
    }

    Ok(())
}

fn run_iteration(builder: &Builder) {
    match builder.build() {
        Ok(report) => info!(
            files = report.file_count,
            tokens = report.token_count,
            "rebuild complete"
        ),
        Err(err) => warn!(error = %err, "rebuild failed; watching continues"),
    }
}

fn is_relevant(event: &Event, source_dir: &Path) -> bool {
    if !matches!(
        event.kind,
        EventKind::Create(_) | EventKind::Modify(_) | EventKind::Remove(_)
    ) {
        return false;
    }
    event.paths.iter().any(|path| {
        path.starts_with(source_dir)
            && path
                .extension()
                .and_then(|extension| extension.to_str())
                .is_some_and(|extension| {
                    extension.eq_ignore_ascii_case("md") || extension.eq_ignore_ascii_case("markdown")
                })
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn event(kind: EventKind, path: &str) -> Event {
        let mut event = Event::new(kind);
        event.paths.push(PathBuf::from(path));
        event
    }

    #[test]
    fn markdown_changes_inside_source_are_relevant() {
        let source = Path::new("/project/docs");
        let change = event(
            EventKind::Modify(notify::event::ModifyKind::Any),
            "/project/docs/guide.md",
        );
        assert!(is_relevant(&change, source));
    }

    #[test]
    fn non_markdown_changes_are_ignored() {
        let source = Path::new("/project/docs");
        let change = event(
            EventKind::Modify(notify::event::ModifyKind::Any),
            "/project/docs/image.png",
        );
        assert!(!is_relevant(&change, source));
    }

    #[test]
    fn changes_outside_source_are_ignored() {
        let source = Path::new("/project/docs");
        let change = event(
            EventKind::Create(notify::event::CreateKind::Any),
            "/project/src/main.md",
        );
        assert!(!is_relevant(&change, source));
    }

    #[test]
    fn access_events_are_ignored() {
        let source = Path::new("/project/docs");
        let change = event(
            EventKind::Access(notify::event::AccessKind::Any),
            "/project/docs/guide.md",
        );
        assert!(!is_relevant(&change, source));
    }
}

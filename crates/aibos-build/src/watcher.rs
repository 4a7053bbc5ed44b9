//! Spec directory watching for incremental rebuilds.

use std::path::{Path, PathBuf};
use std::sync::mpsc;
use std::time::{Duration, Instant};

use notify::{EventKind, RecommendedWatcher, RecursiveMode, Watcher};
use tokio::sync::mpsc as async_mpsc;

use aibos_spec::SpecFormat;

const DEBOUNCE: Duration = Duration::from_millis(100);

/// Changes to spec sources.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SpecEvent {
    /// A spec file was created or modified
    Changed(PathBuf),

    /// A spec file was deleted
    Removed(PathBuf),
}

impl SpecEvent {
    pub fn path(&self) -> &Path {
        match self {
            Self::Changed(path) | Self::Removed(path) => path,
        }
    }
}

/// Watches a specs directory and forwards spec file changes.
pub struct SpecWatcher {
    _watcher: RecommendedWatcher,
}

impl SpecWatcher {
    /// Start watching `specs_dir` recursively.
    ///
    /// Returns the watcher and a channel to receive events. Events are
    /// dropped once the watcher is.
    pub fn new(specs_dir: &Path) -> Result<(Self, async_mpsc::Receiver<SpecEvent>), std::io::Error> {
        let (sync_tx, sync_rx) = mpsc::channel();
        let (async_tx, async_rx) = async_mpsc::channel(100);

        let mut watcher = notify::recommended_watcher(move |res: Result<notify::Event, _>| {
            if let Ok(event) = res {
                let _ = sync_tx.send(event);
            }
        })
        .map_err(std::io::Error::other)?;

        watcher
            .watch(specs_dir, RecursiveMode::Recursive)
            .map_err(std::io::Error::other)?;

        std::thread::spawn(move || {
            let mut last: Option<(SpecEvent, Instant)> = None;

            while let Ok(event) = sync_rx.recv() {
                for path in event.paths {
                    let Some(spec_event) = classify_event(&path, &event.kind) else {
                        continue;
                    };

                    // Editors often emit several writes per save.
                    let now = Instant::now();
                    if let Some((previous, at)) = &last {
                        if *previous == spec_event && now.duration_since(*at) < DEBOUNCE {
                            continue;
                        }
                    }
                    last = Some((spec_event.clone(), now));

                    tracing::debug!("Spec change: {:?}", spec_event);
                    if async_tx.blocking_send(spec_event).is_err() {
                        return;
                    }
                }
            }
        });

        Ok((Self { _watcher: watcher }, async_rx))
    }
}

/// Classify a notify event, ignoring files that are not spec sources.
fn classify_event(path: &Path, kind: &EventKind) -> Option<SpecEvent> {
    SpecFormat::from_path(path)?;
    let filename = path.file_name().and_then(|n| n.to_str()).unwrap_or("");
    if filename.contains(".schema.") {
        return None;
    }

    match kind {
        EventKind::Create(_) | EventKind::Modify(_) => Some(SpecEvent::Changed(path.to_path_buf())),
        EventKind::Remove(_) => Some(SpecEvent::Removed(path.to_path_buf())),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use notify::event::{CreateKind, ModifyKind, RemoveKind};
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn classifies_spec_files_only() {
        let create = EventKind::Create(CreateKind::File);
        let modify = EventKind::Modify(ModifyKind::Any);
        let remove = EventKind::Remove(RemoveKind::File);

        assert_eq!(
            classify_event(Path::new("specs/button.json"), &create),
            Some(SpecEvent::Changed(PathBuf::from("specs/button.json")))
        );
        assert_eq!(
            classify_event(Path::new("specs/dialog.yml"), &modify),
            Some(SpecEvent::Changed(PathBuf::from("specs/dialog.yml")))
        );
        assert_eq!(
            classify_event(Path::new("specs/button.json"), &remove),
            Some(SpecEvent::Removed(PathBuf::from("specs/button.json")))
        );
        assert_eq!(classify_event(Path::new("specs/notes.md"), &modify), None);
        assert_eq!(classify_event(Path::new("specs/component.schema.json"), &modify), None);
        assert_eq!(classify_event(Path::new("specs/button.json"), &EventKind::Any), None);
    }

    #[tokio::test]
    async fn watches_spec_changes() {
        let temp = tempdir().unwrap();
        let spec_file = temp.path().join("button.json");

        let (watcher, mut rx) = SpecWatcher::new(temp.path()).unwrap();

        // Give inotify time to set up
        tokio::time::sleep(Duration::from_millis(100)).await;

        fs::write(temp.path().join("README.md"), "# Specs").unwrap();
        fs::write(&spec_file, "{}").unwrap();

        let event = tokio::time::timeout(Duration::from_secs(3), rx.recv()).await;

        drop(watcher);

        let event = event.expect("timeout waiting for spec event");
        let event = event.expect("channel should not be closed");
        assert!(event.path().ends_with("button.json"));
    }
}

//! Build page contexts and write them out

use anyhow::Result;
use chrono::{DateTime, Utc};
use notify::RecursiveMode;
use notify_debouncer_mini::{new_debouncer, DebouncedEvent};
use std::time::{Duration, Instant};

use crate::Folio;

/// Run one build as of `now` (defaults to the current time)
pub fn run(folio: &Folio, now: Option<DateTime<Utc>>) -> Result<()> {
    let start = Instant::now();
    let now = now.unwrap_or_else(Utc::now);

    let output = folio.generate(now)?;

    tracing::info!(
        "Generated {} pages and {} tag listings in {:.2}s",
        output.pages.len(),
        output.tags.len(),
        start.elapsed().as_secs_f64()
    );
    Ok(())
}

/// Watch the content directory and config file, rebuilding on change
pub fn watch(folio: &Folio, now: Option<DateTime<Utc>>) -> Result<()> {
    let (tx, rx) = std::sync::mpsc::channel();

    // Debounce to avoid multiple rapid rebuilds
    let mut debouncer = new_debouncer(Duration::from_millis(500), tx)?;

    if folio.content_dir.exists() {
        debouncer
            .watcher()
            .watch(&folio.content_dir, RecursiveMode::Recursive)?;
        tracing::debug!("Watching: {:?}", folio.content_dir);
    }

    let config_path = folio.base_dir.join("_config.yml");
    if config_path.exists() {
        debouncer
            .watcher()
            .watch(&config_path, RecursiveMode::NonRecursive)?;
        tracing::debug!("Watching: {:?}", config_path);
    }

    tracing::info!("Watching for changes. Press Ctrl+C to stop.");

    loop {
        match rx.recv() {
            Ok(Ok(events)) => {
                let relevant: Vec<&DebouncedEvent> =
                    events.iter().filter(|e| is_relevant(&e.path)).collect();
                if relevant.is_empty() {
                    continue;
                }

                for event in &relevant {
                    tracing::info!("File changed: {}", event.path.display());
                }

                // Config edits take effect on the next build
                let rebuilt = Folio::new(&folio.base_dir).map_err(anyhow::Error::from);
                match rebuilt.and_then(|f| run(&f, now)) {
                    Ok(()) => tracing::info!("Rebuilt successfully"),
                    Err(e) => tracing::error!("Build failed: {}", e),
                }
            }
            Ok(Err(e)) => {
                tracing::error!("Watch error: {:?}", e);
            }
            Err(e) => {
                tracing::error!("Channel error: {:?}", e);
                break;
            }
        }
    }

    Ok(())
}

/// Ignore editor droppings and VCS metadata
fn is_relevant(path: &std::path::Path) -> bool {
    let path_str = path.to_string_lossy();
    !path_str.contains(".git")
        && !path_str.contains(".DS_Store")
        && !path_str.ends_with('~')
        && !path_str.ends_with(".swp")
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::Path;

    #[test]
    fn test_is_relevant() {
        assert!(is_relevant(Path::new("content/en/post.md")));
        assert!(is_relevant(Path::new("_config.yml")));
        assert!(!is_relevant(Path::new("content/.git/index")));
        assert!(!is_relevant(Path::new("content/en/post.md~")));
        assert!(!is_relevant(Path::new("content/en/.post.md.swp")));
    }
}

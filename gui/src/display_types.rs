use orchestrator::{DropZone, ErrorEntry, ProgressState};

/// Caption shown over the window while files are dragged over it.
pub fn zone_caption(zone: Option<DropZone>) -> &'static str {
    match zone {
        Some(DropZone::Source) => "Drop to add as sources",
        Some(DropZone::Target) => "Drop to set the target folder",
        None => "Drag files here: upper area adds sources, middle band sets the target",
    }
}

pub fn progress_counts(progress: &ProgressState) -> String {
    format!(
        "{} / {} files (copied {}, skipped {})",
        progress.copied_count + progress.skipped_count,
        progress.total_count,
        progress.copied_count,
        progress.skipped_count
    )
}

pub fn error_line(entry: &ErrorEntry) -> String {
    match &entry.file {
        Some(file) => format!("{}: {}", file, entry.message),
        None => entry.message.clone(),
    }
}

pub fn hidden_errors(count: usize) -> Option<String> {
    if count == 0 {
        None
    } else {
        Some(format!("and {} more", count))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_line_with_and_without_file() {
        let with_file = ErrorEntry {
            message: "Permission denied".to_string(),
            file: Some("/src/a.txt".to_string()),
        };
        let without_file = ErrorEntry {
            message: "Walk failed".to_string(),
            file: None,
        };

        assert_eq!(error_line(&with_file), "/src/a.txt: Permission denied");
        assert_eq!(error_line(&without_file), "Walk failed");
    }

    #[test]
    fn test_hidden_errors() {
        assert_eq!(hidden_errors(0), None);
        assert_eq!(hidden_errors(3).as_deref(), Some("and 3 more"));
    }

    #[test]
    fn test_zone_captions_differ() {
        assert_ne!(
            zone_caption(Some(DropZone::Source)),
            zone_caption(Some(DropZone::Target))
        );
    }
}

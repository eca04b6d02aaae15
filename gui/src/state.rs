use orchestrator::DragPosition;

/// Height the main window opens with.
pub const INITIAL_WINDOW_HEIGHT: f32 = 768.0;

/// Window-level input the orchestrator does not track: the window size,
/// the last pointer position, and files dropped since the last tick.
///
/// The platform reports a multi-file drop as one event per file, so drops
/// are collected here and handed over as a single batch.
#[derive(Debug)]
pub struct WindowState {
    pub height: f32,
    pub cursor_y: f32,
    pending_drop: Vec<String>,
    drop_y: Option<f32>,
}

impl WindowState {
    pub fn new() -> Self {
        WindowState {
            height: INITIAL_WINDOW_HEIGHT,
            cursor_y: 0.0,
            pending_drop: Vec::new(),
            drop_y: None,
        }
    }

    /// Pointer position relative to the current window height.
    pub fn position(&self) -> DragPosition {
        DragPosition::new(f64::from(self.cursor_y), f64::from(self.height))
    }

    /// Record one dropped file; the batch keeps the position of its first file.
    pub fn push_drop(&mut self, path: String) {
        if self.drop_y.is_none() {
            self.drop_y = Some(self.cursor_y);
        }
        self.pending_drop.push(path);
    }

    pub fn has_pending_drop(&self) -> bool {
        !self.pending_drop.is_empty()
    }

    /// Take the collected batch and where it landed.
    pub fn take_drop(&mut self) -> Option<(Vec<String>, DragPosition)> {
        if self.pending_drop.is_empty() {
            return None;
        }
        let y = self.drop_y.take().unwrap_or(self.cursor_y);
        let paths = std::mem::take(&mut self.pending_drop);
        Some((paths, DragPosition::new(f64::from(y), f64::from(self.height))))
    }
}

impl Default for WindowState {
    fn default() -> Self {
        Self::new()
    }
}

mod display_types;
mod state;

use std::time::Duration;

use engine::CollisionMode;
use iced::widget::{
    button, checkbox, column, container, pick_list, progress_bar, row, scrollable, text,
    text_input, Column,
};
use iced::{
    event, executor, mouse, window, Alignment, Application, Command, Element, Event, Length,
    Settings, Size, Subscription, Theme,
};
use orchestrator::{
    logging, Action, AppState, EventBridge, EventHub, LocalEngine, Orchestrator,
    PreferenceCache, Screen,
};
use state::{WindowState, INITIAL_WINDOW_HEIGHT};

/// How often engine notifications and dropped files are picked up.
const TICK: Duration = Duration::from_millis(50);

pub fn main() -> iced::Result {
    logging::init_tracing(false);
    GuiApp::run(Settings {
        window: window::Settings {
            size: Size::new(760.0, INITIAL_WINDOW_HEIGHT),
            ..window::Settings::default()
        },
        ..Settings::default()
    })
}

#[derive(Debug, Clone)]
pub enum Message {
    Tick,
    Window(WindowInput),
    SourceInputChanged(String),
    AddSourcePressed,
    RemoveSourcePressed(String),
    ClearSourcesPressed,
    BrowseSourceFoldersPressed,
    BrowseSourceFilesPressed,
    SourceHistoryPicked(String),
    TargetPathChanged(String),
    BrowseTargetPressed,
    TargetHistoryPicked(String),
    BlacklistInputChanged(String),
    AddBlacklistPressed,
    RemoveBlacklistPressed(String),
    RespectGitignoreToggled(bool),
    IncludeSourceDirToggled(bool),
    CollisionModeChanged(CollisionMode),
    StartBackupPressed,
    NewBackupPressed,
}

/// Window events relevant to drag-and-drop.
#[derive(Debug, Clone)]
pub enum WindowInput {
    FileHovered,
    FileDropped(String),
    HoverLeft,
    Resized(f32),
    CursorMoved(f32),
}

fn window_input(event: Event, _status: event::Status) -> Option<Message> {
    let input = match event {
        Event::Window(_, window::Event::FileHovered(_)) => WindowInput::FileHovered,
        Event::Window(_, window::Event::FileDropped(path)) => {
            WindowInput::FileDropped(path.display().to_string())
        }
        Event::Window(_, window::Event::FilesHoveredLeft) => WindowInput::HoverLeft,
        Event::Window(_, window::Event::Resized { height, .. }) => {
            WindowInput::Resized(height as f32)
        }
        Event::Mouse(mouse::Event::CursorMoved { position }) => {
            WindowInput::CursorMoved(position.y)
        }
        _ => return None,
    };
    Some(Message::Window(input))
}

pub struct GuiApp {
    orchestrator: Orchestrator<LocalEngine>,
    // Unsubscribes from the hub when the window closes
    bridge: EventBridge,
    window: WindowState,
    source_input: String,
    blacklist_input: String,
}

impl GuiApp {
    fn state(&self) -> &AppState {
        self.orchestrator.state()
    }

    fn dispatch(&mut self, action: Action) {
        self.orchestrator.dispatch(action);
    }

    // The platform sends no cursor motion while an OS file drag is over the
    // window, so hover and drop zones use the last y seen before the drag
    // entered. The zone readout is best effort.
    fn on_window_input(&mut self, input: WindowInput) {
        match input {
            WindowInput::FileHovered => {
                let position = self.window.position();
                if self.state().hover_zone.is_none() {
                    self.dispatch(Action::DragEnter(position));
                } else {
                    self.dispatch(Action::DragOver(position));
                }
            }
            WindowInput::FileDropped(path) => self.window.push_drop(path),
            WindowInput::HoverLeft => self.dispatch(Action::DragLeave),
            WindowInput::Resized(height) => self.window.height = height,
            WindowInput::CursorMoved(y) => {
                self.window.cursor_y = y;
                if self.state().hover_zone.is_some() && !self.window.has_pending_drop() {
                    let position = self.window.position();
                    self.dispatch(Action::DragOver(position));
                }
            }
        }
    }

    fn on_tick(&mut self) {
        if let Some((paths, position)) = self.window.take_drop() {
            tracing::debug!(count = paths.len(), zone = %position.zone(), "files dropped");
            self.dispatch(Action::Drop { paths, position });
        }
        self.bridge.pump(&mut self.orchestrator);
    }

    fn form_view(&self) -> Element<Message> {
        let state = self.state();
        let prefs = &state.preferences;

        let mut sources = Column::new().spacing(5);
        if state.form.source_paths.is_empty() {
            sources = sources.push(text("No sources selected"));
        }
        for path in &state.form.source_paths {
            sources = sources.push(
                row![
                    text(path).width(Length::Fill),
                    button("Remove").on_press(Message::RemoveSourcePressed(path.clone())),
                ]
                .spacing(10)
                .align_items(Alignment::Center),
            );
        }

        let source_section = column![
            text("Sources").size(18),
            sources,
            row![
                text_input("Enter source path", &self.source_input)
                    .on_input(Message::SourceInputChanged)
                    .on_submit(Message::AddSourcePressed)
                    .width(Length::Fill),
                button("Add").on_press(Message::AddSourcePressed),
                button("Folders...").on_press(Message::BrowseSourceFoldersPressed),
                button("Files...").on_press(Message::BrowseSourceFilesPressed),
                button("Clear").on_press_maybe(
                    (!state.form.source_paths.is_empty()).then_some(Message::ClearSourcesPressed)
                ),
            ]
            .spacing(10)
            .align_items(Alignment::Center),
            pick_list(
                prefs.source_history.clone(),
                None::<String>,
                Message::SourceHistoryPicked,
            )
            .placeholder("Recent sources")
            .width(Length::Fill),
        ]
        .spacing(10);

        let target_section = column![
            text("Target").size(18),
            row![
                text_input("Enter target folder", &state.form.target_path)
                    .on_input(Message::TargetPathChanged)
                    .width(Length::Fill),
                button("Browse...").on_press(Message::BrowseTargetPressed),
            ]
            .spacing(10)
            .align_items(Alignment::Center),
            pick_list(
                prefs.target_history.clone(),
                None::<String>,
                Message::TargetHistoryPicked,
            )
            .placeholder("Recent targets")
            .width(Length::Fill),
        ]
        .spacing(10);

        let options_section = column![
            text("Options").size(18),
            checkbox("Respect .gitignore", prefs.respect_gitignore)
                .on_toggle(Message::RespectGitignoreToggled),
            checkbox("Include source folder name", prefs.include_source_dir)
                .on_toggle(Message::IncludeSourceDirToggled),
            row![
                text("When a file exists"),
                pick_list(
                    CollisionMode::ALL.to_vec(),
                    Some(prefs.collision_mode),
                    Message::CollisionModeChanged,
                ),
            ]
            .spacing(10)
            .align_items(Alignment::Center),
        ]
        .spacing(10);

        let mut patterns = Column::new().spacing(5);
        for pattern in &prefs.blacklist {
            patterns = patterns.push(
                row![
                    text(pattern).width(Length::Fill),
                    button("Remove").on_press(Message::RemoveBlacklistPressed(pattern.clone())),
                ]
                .spacing(10)
                .align_items(Alignment::Center),
            );
        }

        let blacklist_section = column![
            text("Blacklist").size(18),
            patterns,
            row![
                text_input("Pattern, e.g. *.tmp", &self.blacklist_input)
                    .on_input(Message::BlacklistInputChanged)
                    .on_submit(Message::AddBlacklistPressed)
                    .width(Length::Fill),
                button("Add").on_press(Message::AddBlacklistPressed),
            ]
            .spacing(10)
            .align_items(Alignment::Center),
        ]
        .spacing(10);

        let start_button = button("Start Backup")
            .on_press_maybe(state.can_submit().then_some(Message::StartBackupPressed))
            .padding(10);

        column![
            container(text(display_types::zone_caption(state.hover_zone))).padding(10),
            source_section,
            target_section,
            options_section,
            blacklist_section,
            start_button,
        ]
        .spacing(20)
        .into()
    }

    fn progress_view(&self) -> Element<Message> {
        let session = &self.state().session;
        let progress = &session.progress;

        let mut col = column![
            text("Backing up...").size(18),
            progress_bar(0.0..=100.0, f32::from(progress.percent())),
            text(format!("Progress: {}%", progress.percent())),
            text(display_types::progress_counts(progress)),
        ]
        .spacing(10);

        if !progress.current_file.is_empty() {
            col = col.push(text(format!("Current: {}", progress.current_file)));
        }
        if !session.errors.is_empty() {
            col = col.push(text(format!("Errors so far: {}", session.errors.len())));
        }

        col.into()
    }

    fn complete_view(&self) -> Element<Message> {
        let session = &self.state().session;

        let mut col = Column::new().spacing(10);
        if let Some(outcome) = &session.outcome {
            col = col
                .push(
                    text(if outcome.success {
                        "Backup Complete"
                    } else {
                        "Backup Failed"
                    })
                    .size(18),
                )
                .push(text(&outcome.message))
                .push(text(format!(
                    "Copied: {} | Skipped: {} | Errors: {}",
                    outcome.copied_count,
                    outcome.skipped_count,
                    session.errors.len()
                )));
        }
        if let Some(config) = &session.config {
            col = col.push(text(format!("Target: {}", config.target_path())));
        }

        if !session.errors.is_empty() {
            let mut errors = Column::new().spacing(5);
            for entry in session.errors.visible() {
                errors = errors.push(text(display_types::error_line(entry)));
            }
            if let Some(more) = display_types::hidden_errors(session.errors.hidden_count()) {
                errors = errors.push(text(more));
            }
            col = col
                .push(text("Errors:"))
                .push(scrollable(errors).height(Length::Fixed(200.0)));
        }

        col.push(
            button("New Backup")
                .on_press(Message::NewBackupPressed)
                .padding(10),
        )
        .into()
    }
}

impl Application for GuiApp {
    type Executor = executor::Default;
    type Message = Message;
    type Theme = Theme;
    type Flags = ();

    fn new(_flags: ()) -> (Self, Command<Message>) {
        let hub = EventHub::new();
        let bridge = EventBridge::mount(&hub);
        let engine = LocalEngine::new(hub);

        let orchestrator = match PreferenceCache::default_location() {
            Ok(cache) => Orchestrator::with_cache(engine, cache),
            Err(e) => {
                tracing::warn!(error = %e, "preferences will not be saved");
                Orchestrator::new(engine)
            }
        };

        let app = GuiApp {
            orchestrator,
            bridge,
            window: WindowState::new(),
            source_input: String::new(),
            blacklist_input: String::new(),
        };
        (app, Command::none())
    }

    fn title(&self) -> String {
        match self.state().screen {
            Screen::Form => "BackUP".to_string(),
            Screen::Progress => format!(
                "BackUP - {}%",
                self.state().session.progress.percent()
            ),
            Screen::Complete => "BackUP - Done".to_string(),
        }
    }

    fn update(&mut self, message: Message) -> Command<Message> {
        match message {
            Message::Tick => self.on_tick(),
            Message::Window(input) => self.on_window_input(input),
            Message::SourceInputChanged(value) => self.source_input = value,
            Message::AddSourcePressed => {
                let path = std::mem::take(&mut self.source_input);
                self.dispatch(Action::PickSources(vec![path.trim().to_string()]));
            }
            Message::RemoveSourcePressed(path) => self.dispatch(Action::RemoveSourcePath(path)),
            Message::ClearSourcesPressed => self.dispatch(Action::ClearSourcePaths),
            Message::BrowseSourceFoldersPressed => {
                if let Some(paths) = rfd::FileDialog::new().pick_folders() {
                    let paths = paths.iter().map(|p| p.display().to_string()).collect();
                    self.dispatch(Action::PickSources(paths));
                }
            }
            Message::BrowseSourceFilesPressed => {
                if let Some(paths) = rfd::FileDialog::new().pick_files() {
                    let paths = paths.iter().map(|p| p.display().to_string()).collect();
                    self.dispatch(Action::PickSources(paths));
                }
            }
            Message::SourceHistoryPicked(path) => self.dispatch(Action::PickSources(vec![path])),
            Message::TargetPathChanged(path) => self.dispatch(Action::SetTargetPath(path)),
            Message::BrowseTargetPressed => {
                if let Some(path) = rfd::FileDialog::new().pick_folder() {
                    self.dispatch(Action::PickTarget(path.display().to_string()));
                }
            }
            Message::TargetHistoryPicked(path) => self.dispatch(Action::PickTarget(path)),
            Message::BlacklistInputChanged(value) => self.blacklist_input = value,
            Message::AddBlacklistPressed => {
                let pattern = std::mem::take(&mut self.blacklist_input);
                self.dispatch(Action::AddBlacklistItem(pattern));
            }
            Message::RemoveBlacklistPressed(pattern) => {
                self.dispatch(Action::RemoveBlacklistItem(pattern))
            }
            Message::RespectGitignoreToggled(value) => {
                self.dispatch(Action::SetRespectGitignore(value))
            }
            Message::IncludeSourceDirToggled(value) => {
                self.dispatch(Action::SetIncludeSourceDir(value))
            }
            Message::CollisionModeChanged(mode) => self.dispatch(Action::SetCollisionMode(mode)),
            Message::StartBackupPressed => {
                self.orchestrator.submit();
            }
            Message::NewBackupPressed => self.dispatch(Action::Reset),
        }
        Command::none()
    }

    fn subscription(&self) -> Subscription<Message> {
        Subscription::batch(vec![
            event::listen_with(window_input),
            iced::time::every(TICK).map(|_| Message::Tick),
        ])
    }

    fn view(&self) -> Element<Message> {
        let body = match self.state().screen {
            Screen::Form => self.form_view(),
            Screen::Progress => self.progress_view(),
            Screen::Complete => self.complete_view(),
        };

        scrollable(
            column![text("BackUP - Backup").size(24), body]
                .spacing(20)
                .padding(20),
        )
        .into()
    }
}

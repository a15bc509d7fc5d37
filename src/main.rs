use iced::widget::image::Handle as ImageHandle;
use iced::widget::{button, canvas, column, container, row, scrollable, text};
use iced::{Alignment, ContentFit, Element, Length, Task, Theme};
use rfd::FileDialog;
use std::path::PathBuf;

mod color;
mod config;
mod error;
mod media;
mod render;
mod state;
mod ui;

use config::EditorConfig;
use error::EditorError;
use media::export::ExportJob;
use state::data::{DecodedImage, ImageLifecycle};
use state::editor::{Action, Editor, LoadOutcome};
use state::filters::FilterId;

/// Main application state
struct FilterEditor {
    /// Filter state, loaded image and preview
    editor: Editor,
    config: EditorConfig,
    /// GPU-uploadable copy of the current preview frame
    preview_handle: Option<ImageHandle>,
    /// Revision `preview_handle` was built from
    preview_revision: u64,
    /// Status message to display to the user
    status: String,
}

/// Application messages (events)
#[derive(Debug, Clone)]
pub enum Message {
    /// User clicked "Choose Image"
    PickImage,
    /// Background decode finished for the given load generation
    ImageDecoded(u64, Result<DecodedImage, EditorError>),
    /// A filter slider moved
    SliderChanged(FilterId, f32),
    /// User clicked "Remove"
    RemoveImage,
    /// Export or Reset
    Action(Action),
    /// Background export finished
    ExportFinished(Result<PathBuf, EditorError>),
}

impl FilterEditor {
    /// Create a new instance of the application
    fn new() -> (Self, Task<Message>) {
        let (config, status) = match EditorConfig::load() {
            Ok(config) => (config, "Choose an image to start.".to_string()),
            Err(err) => {
                tracing::warn!("{}; using defaults", err);
                (EditorConfig::default(), format!("⚠️  {}; using defaults", err))
            }
        };

        tracing::info!(
            export_dir = %config.export_dir.display(),
            preview_max_edge = config.preview_max_edge,
            "filter editor initialized"
        );

        (
            FilterEditor {
                editor: Editor::new(config.preview_max_edge),
                config,
                preview_handle: None,
                preview_revision: 0,
                status,
            },
            Task::none(),
        )
    }

    /// Handle application messages and update state
    fn update(&mut self, message: Message) -> Task<Message> {
        let task = match message {
            Message::PickImage => {
                // Show the native file picker dialog
                let file = FileDialog::new()
                    .set_title("Select an Image")
                    .add_filter("Images", &media::loader::SUPPORTED_EXTENSIONS)
                    .pick_file();

                match self.editor.on_image_selected(file) {
                    Some(request) => {
                        self.status = format!("Loading {}...", request.path.display());
                        let generation = request.generation;
                        Task::perform(
                            media::loader::decode_image(request.path, request.preview_max_edge),
                            move |result| Message::ImageDecoded(generation, result),
                        )
                    }
                    None => Task::none(),
                }
            }
            Message::ImageDecoded(generation, result) => {
                match self.editor.on_image_decoded(generation, result) {
                    LoadOutcome::Loaded => {
                        if let (Some(file), Some(image)) =
                            (self.editor.selected_file(), self.editor.loaded_image())
                        {
                            self.status = format!(
                                "{} ({}×{})",
                                file.filename, image.width, image.height
                            );
                        }
                    }
                    LoadOutcome::Failed(err) => {
                        self.status = format!("❌ {}", err);
                    }
                    LoadOutcome::Stale => {}
                }
                Task::none()
            }
            Message::SliderChanged(id, value) => {
                self.editor.on_filter_slider_changed(id, value);
                Task::none()
            }
            Message::RemoveImage => {
                self.editor.on_remove_image();
                self.status = "Choose an image to start.".to_string();
                Task::none()
            }
            Message::Action(action) => match self.editor.on_action(action) {
                Some(job) => self.start_export(job),
                None => Task::none(),
            },
            Message::ExportFinished(result) => {
                self.status = match result {
                    Ok(path) => format!("✅ Exported {}", path.display()),
                    Err(err) => {
                        tracing::error!("export failed: {}", err);
                        format!("❌ {}", err)
                    }
                };
                Task::none()
            }
        };

        self.sync_preview();
        task
    }

    /// Launch the async export for a job taken from the editor
    fn start_export(&mut self, job: ExportJob) -> Task<Message> {
        self.status = format!("Exporting {}...", job.filename);
        tracing::debug!(?job, "starting export");

        Task::perform(
            media::export::run_export(job, self.config.export_dir.clone()),
            Message::ExportFinished,
        )
    }

    /// Rebuild the image handle when the editor produced a new preview
    fn sync_preview(&mut self) {
        match self.editor.preview() {
            Some(preview) if preview.revision != self.preview_revision => {
                let frame = &preview.frame;
                self.preview_handle = Some(ImageHandle::from_rgba(
                    frame.width(),
                    frame.height(),
                    frame.as_raw().clone(),
                ));
                self.preview_revision = preview.revision;
            }
            Some(_) => {}
            None => {
                self.preview_handle = None;
            }
        }
    }

    /// Build the user interface
    fn view(&self) -> Element<Message> {
        let preview: Element<Message> = match &self.preview_handle {
            Some(handle) => iced::widget::image::Image::<ImageHandle>::new(handle.clone())
                .content_fit(ContentFit::Contain)
                .width(Length::Fill)
                .height(Length::Fill)
                .into(),
            None => {
                let hint = if self.editor.lifecycle() == ImageLifecycle::Loading {
                    "Loading..."
                } else {
                    "No image selected"
                };
                text(hint).size(20).into()
            }
        };

        let mut left = column![container(preview)
            .width(Length::Fill)
            .height(Length::Fill)
            .center_x(Length::Fill)
            .center_y(Length::Fill)]
        .spacing(10);

        if let Some(preview) = self.editor.preview() {
            left = left.push(
                canvas(preview.histogram.clone())
                    .width(Length::Fill)
                    .height(Length::Fixed(100.0)),
            );
        }

        let mut sidebar = column![
            row![
                button("Choose Image")
                    .on_press(Message::PickImage)
                    .padding(10),
                button("Remove")
                    .on_press(Message::RemoveImage)
                    .padding(10),
            ]
            .spacing(10),
            scrollable(ui::panel::settings(self.editor.controls())).height(Length::Fill),
            ui::panel::actions(),
            text(&self.status).size(14),
        ]
        .spacing(20)
        .width(Length::Fixed(320.0))
        .align_x(Alignment::Start);

        // The filter string baked into previews and exports
        if !self.editor.filter_state().is_empty() {
            sidebar = sidebar.push(text(self.editor.composed_filter()).size(12));
        }

        row![left.width(Length::Fill), sidebar]
            .spacing(20)
            .padding(20)
            .into()
    }

    /// Set the application theme
    fn theme(&self) -> Theme {
        Theme::Dark
    }
}

fn main() -> iced::Result {
    // Set RUST_LOG to control log level, e.g. RUST_LOG=filter_editor=debug
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .with_target(true)
        .with_level(true)
        .init();

    iced::application(
        "Filter Editor",
        FilterEditor::update,
        FilterEditor::view,
    )
    .theme(FilterEditor::theme)
    .centered()
    .run_with(FilterEditor::new)
}

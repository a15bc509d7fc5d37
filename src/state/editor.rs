/// Filter editor controller
///
/// Single owner of the filter state, the loaded image and the live preview.
/// Every method runs synchronously on the UI thread; the two slow steps
/// (decoding a picked file and encoding an export) are handed out as request
/// values and their results fed back in, so this type never touches the GUI
/// or the filesystem itself.

use image::RgbaImage;
use std::path::PathBuf;

use super::data::{DecodedImage, ImageLifecycle, LoadedImage, SelectedFileMeta};
use super::filters::{FilterId, FilterState, FILTERS};
use crate::error::EditorError;
use crate::media::export::{export_filename, ExportJob};
use crate::render;
use crate::ui::histogram::Histogram;

/// Commands issued from the actions row
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Export,
    Reset,
}

/// Display state of one slider
#[derive(Debug, Clone, PartialEq)]
pub struct FilterControl {
    pub id: FilterId,
    /// Current slider position
    pub value: f32,
    /// Value with unit as shown next to the label, e.g. "150%"
    pub display: String,
    /// Sliders are disabled while no image is loaded
    pub enabled: bool,
}

impl FilterControl {
    fn initial(id: FilterId, enabled: bool) -> Self {
        let def = id.definition();
        Self {
            id,
            value: def.initial,
            display: def.format_value(def.initial),
            enabled,
        }
    }
}

/// The filtered working preview currently on screen
#[derive(Debug, Clone)]
pub struct Preview {
    pub frame: RgbaImage,
    pub histogram: Histogram,
    /// Bumped on every recomposition so the view knows to refresh
    pub revision: u64,
}

/// A decode the caller must run, tagged with its load generation
#[derive(Debug, Clone, PartialEq)]
pub struct LoadRequest {
    pub generation: u64,
    pub path: PathBuf,
    pub preview_max_edge: u32,
}

/// What happened to a finished decode
#[derive(Debug, Clone)]
pub enum LoadOutcome {
    Loaded,
    /// A newer selection (or a removal) superseded this decode
    Stale,
    Failed(EditorError),
}

pub struct Editor {
    preview_max_edge: u32,
    controls: Vec<FilterControl>,
    filters: FilterState,
    image: Option<LoadedImage>,
    file: Option<SelectedFileMeta>,
    /// Generation of the decode in flight, if any
    pending_load: Option<u64>,
    next_generation: u64,
    preview: Option<Preview>,
    preview_revision: u64,
}

impl Editor {
    /// Build the control panel with every slider disabled at its initial value
    pub fn new(preview_max_edge: u32) -> Self {
        Self {
            preview_max_edge,
            controls: FILTERS
                .iter()
                .map(|def| FilterControl::initial(def.id, false))
                .collect(),
            filters: FilterState::default(),
            image: None,
            file: None,
            pending_load: None,
            next_generation: 0,
            preview: None,
            preview_revision: 0,
        }
    }

    pub fn controls(&self) -> &[FilterControl] {
        &self.controls
    }

    pub fn filter_state(&self) -> &FilterState {
        &self.filters
    }

    pub fn loaded_image(&self) -> Option<&LoadedImage> {
        self.image.as_ref()
    }

    pub fn selected_file(&self) -> Option<&SelectedFileMeta> {
        self.file.as_ref()
    }

    pub fn preview(&self) -> Option<&Preview> {
        self.preview.as_ref()
    }

    /// The filter string currently applied to the preview
    pub fn composed_filter(&self) -> String {
        self.filters.compose()
    }

    pub fn lifecycle(&self) -> ImageLifecycle {
        if self.pending_load.is_some() {
            ImageLifecycle::Loading
        } else if self.image.is_some() {
            ImageLifecycle::Loaded
        } else {
            ImageLifecycle::NoImage
        }
    }

    /// Start loading a picked file; `None` (picker cancelled) is a no-op
    ///
    /// Any decode already in flight becomes stale.
    pub fn on_image_selected(&mut self, path: Option<PathBuf>) -> Option<LoadRequest> {
        let path = path?;
        self.next_generation += 1;
        let generation = self.next_generation;
        self.pending_load = Some(generation);

        tracing::debug!(generation, path = %path.display(), "image selected");
        Some(LoadRequest {
            generation,
            path,
            preview_max_edge: self.preview_max_edge,
        })
    }

    /// Feed back the result of a decode started by `on_image_selected`
    pub fn on_image_decoded(
        &mut self,
        generation: u64,
        result: Result<DecodedImage, EditorError>,
    ) -> LoadOutcome {
        if self.pending_load != Some(generation) {
            tracing::debug!(generation, "dropping stale decode result");
            return LoadOutcome::Stale;
        }
        self.pending_load = None;

        let decoded = match result {
            Ok(decoded) => decoded,
            Err(err) => {
                tracing::error!(generation, "decode failed: {}", err);
                return LoadOutcome::Failed(err);
            }
        };

        self.release_image();
        self.image = Some(LoadedImage::new(decoded.source, decoded.working));
        self.file = Some(decoded.meta);
        self.reset_filters();
        self.recompose_preview();

        LoadOutcome::Loaded
    }

    /// Apply a slider move
    ///
    /// The slider widget already keeps `value` within the filter's range.
    pub fn on_filter_slider_changed(&mut self, id: FilterId, value: f32) {
        let control = &mut self.controls[id.index()];
        if !control.enabled {
            return;
        }

        control.value = value;
        control.display = id.definition().format_value(value);
        self.filters.set(id, value);
        self.recompose_preview();
    }

    /// Drop the image, clear the selection and reset every slider
    pub fn on_remove_image(&mut self) {
        // A decode still in flight must not bring the image back
        self.pending_load = None;
        self.release_image();
        self.file = None;
        self.reset_filters();
        self.recompose_preview();
    }

    /// Dispatch an action; returns the export job to run, if any
    pub fn on_action(&mut self, action: Action) -> Option<ExportJob> {
        match action {
            Action::Export => self.export(),
            Action::Reset => {
                self.reset_filters();
                self.recompose_preview();
                None
            }
        }
    }

    /// Snapshot an export of the loaded image; `None` when nothing is loaded
    pub fn export(&self) -> Option<ExportJob> {
        let image = self.image.as_ref()?;
        let file = self.file.as_ref()?;

        Some(ExportJob {
            source: image.source.clone(),
            filter: self.filters.compose(),
            filename: export_filename(&file.filename),
        })
    }

    /// Restore initial values; sliders are enabled only with an image loaded
    fn reset_filters(&mut self) {
        let enabled = self.image.is_some();
        for control in &mut self.controls {
            *control = FilterControl::initial(control.id, enabled);
        }
        self.filters = if enabled {
            FilterState::initial()
        } else {
            FilterState::default()
        };
    }

    fn release_image(&mut self) {
        if let Some(old) = self.image.take() {
            tracing::debug!(width = old.width, height = old.height, "released image");
        }
        self.preview = None;
    }

    /// Re-render the preview from the current filter state
    fn recompose_preview(&mut self) {
        let Some(image) = self.image.as_ref() else {
            self.preview = None;
            return;
        };

        match render::render(&image.working, &self.filters.compose(), image.preview_scale()) {
            Ok(frame) => {
                self.preview_revision += 1;
                let histogram = Histogram::from_image(&frame);
                tracing::debug!(
                    revision = self.preview_revision,
                    pixels = histogram.total(),
                    "preview recomposed"
                );
                self.preview = Some(Preview {
                    frame,
                    histogram,
                    revision: self.preview_revision,
                });
            }
            Err(err) => tracing::error!("preview render failed: {}", err),
        }
    }
}

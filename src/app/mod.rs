use std::collections::HashSet;
use std::path::PathBuf;
use std::sync::Arc;
use std::sync::mpsc::{self, Receiver, TryRecvError};
use std::thread;

use eframe::egui::{self, Context, Vec2};

use crate::cast::{CastGraph, load_cast_graph};

mod filter;
mod graph;
mod highlight;
mod layout;
mod render_utils;
mod scene;
mod ui;
mod viewport;

pub use layout::LayoutKind;

use filter::{GraphFilter, VisibleGraph};
use highlight::{HighlightCache, SelectionState};
use layout::LayoutSelector;
use viewport::{GestureController, Viewport};

/// Startup configuration from the command line.
#[derive(Clone, Debug)]
pub struct AppOptions {
    pub dataset: Option<PathBuf>,
    pub initial_layout: LayoutKind,
    pub seed: Option<u64>,
}

pub struct CastWebApp {
    options: AppOptions,
    state: AppState,
}

enum AppState {
    Loading {
        rx: Receiver<Result<CastGraph, String>>,
    },
    Ready(Box<ViewModel>),
    Error(String),
}

struct ViewModel {
    graph: Arc<CastGraph>,
    layouts: LayoutSelector,
    viewport: Viewport,
    gestures: GestureController,
    selection: SelectionState,
    filter: GraphFilter,
    visible: VisibleGraph,
    visible_dirty: bool,
    visible_revision: u64,
    highlight_cache: HighlightCache,
    search: String,
    search_match_cache: Option<SearchMatchCache>,
    /// Fit the viewport once the active layout has positions.
    pending_fit: bool,
    canvas_size: Vec2,
}

struct SearchMatchCache {
    query: String,
    visible_revision: u64,
    matches: Arc<HashSet<usize>>,
}

impl CastWebApp {
    pub fn new(_cc: &eframe::CreationContext<'_>, options: AppOptions) -> Self {
        let state = Self::start_load(options.dataset.clone());
        Self { options, state }
    }

    fn spawn_load(dataset: Option<PathBuf>) -> Receiver<Result<CastGraph, String>> {
        let (tx, rx) = mpsc::channel();

        thread::spawn(move || {
            let result = load_cast_graph(dataset.as_deref()).map_err(|error| format!("{error:#}"));
            let _ = tx.send(result);
        });

        rx
    }

    fn start_load(dataset: Option<PathBuf>) -> AppState {
        AppState::Loading {
            rx: Self::spawn_load(dataset),
        }
    }
}

impl eframe::App for CastWebApp {
    fn update(&mut self, ctx: &Context, _frame: &mut eframe::Frame) {
        let mut transition = None;

        match &mut self.state {
            AppState::Loading { rx } => {
                match rx.try_recv() {
                    Ok(Ok(graph)) => {
                        transition = Some(AppState::Ready(Box::new(ViewModel::new(
                            graph,
                            self.options.initial_layout,
                            self.options.seed,
                        ))));
                    }
                    Ok(Err(error)) => {
                        log::error!("failed to load cast dataset: {error}");
                        transition = Some(AppState::Error(error));
                    }
                    Err(TryRecvError::Empty) => ctx.request_repaint(),
                    Err(TryRecvError::Disconnected) => {
                        transition =
                            Some(AppState::Error("Background load worker disconnected".to_owned()));
                    }
                }

                egui::CentralPanel::default().show(ctx, |ui| {
                    ui.vertical_centered(|ui| {
                        ui.add_space(120.0);
                        ui.heading("Loading character graph...");
                        ui.add_space(8.0);
                        ui.spinner();
                    });
                });
            }
            AppState::Error(error) => {
                egui::CentralPanel::default().show(ctx, |ui| {
                    ui.heading("Failed to load character graph");
                    ui.add_space(6.0);
                    ui.label(error.as_str());
                    ui.add_space(10.0);
                    if ui.button("Retry").clicked() {
                        transition = Some(Self::start_load(self.options.dataset.clone()));
                    }
                });
            }
            AppState::Ready(model) => model.show(ctx),
        }

        if let Some(next_state) = transition {
            self.state = next_state;
        }
    }
}

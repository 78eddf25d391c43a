use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use std::sync::mpsc::{self, Receiver, TryRecvError};
use std::thread;

use eframe::egui::{self, Color32, Context, Pos2, Vec2};

use crate::onet::{OccupationData, load_occupation_data};

mod graph;
mod physics;
mod render_utils;
mod ui;

use graph::BuiltEdge;

pub struct NeighborsApp {
    dataset_path: String,
    state: AppState,
    reload_rx: Option<Receiver<Result<OccupationData, String>>>,
}

enum AppState {
    Loading {
        rx: Receiver<Result<OccupationData, String>>,
    },
    Ready(Box<ViewModel>),
    Error(String),
}

/// All state for one graph view. Recreated when a dataset finishes loading;
/// the render graph inside is recreated on every restart.
struct ViewModel {
    data: OccupationData,
    similarity_threshold: f32,
    hide_unrelated: bool,
    search: String,
    selected: Option<String>,
    inspected: Option<String>,
    pan: Vec2,
    zoom: f32,
    live_physics: bool,
    physics_charge: f32,
    physics_spring: f32,
    physics_gravity: f32,
    physics_velocity_damping: f32,
    graph_dirty: bool,
    render_graph_revision: u64,
    graph_cache: Option<RenderGraph>,
    search_match_cache: Option<SearchMatchCache>,
    visible_node_count: usize,
    visible_edge_count: usize,
}

struct SearchMatchCache {
    query: String,
    graph_revision: u64,
    matches: Arc<HashSet<usize>>,
}

/// Simulation and geometry for the currently built subgraph. Exclusively
/// owned by the ViewModel; dropped whole on restart so a superseded
/// simulation can never deliver another tick.
struct RenderGraph {
    nodes: Vec<RenderNode>,
    edges: Vec<BuiltEdge>,
    index_by_code: HashMap<String, usize>,
    neighbors: Vec<Vec<usize>>,
    alpha: f32,
    physics_scratch: PhysicsScratch,
    view_scratch: ViewScratch,
}

struct PhysicsScratch {
    forces: Vec<Vec2>,
}

struct ViewScratch {
    screen_positions: Vec<Pos2>,
    screen_radii: Vec<f32>,
    visible_indices: Vec<usize>,
}

struct RenderNode {
    code: String,
    title: String,
    world_pos: Vec2,
    velocity: Vec2,
    size_radius: Option<f32>,
    fill: Color32,
}

#[derive(Clone, Copy)]
struct PhysicsConfig {
    charge_scale: f32,
    spring_scale: f32,
    gravity_scale: f32,
    velocity_damping: f32,
    delta_seconds: f32,
}

impl NeighborsApp {
    pub fn new(_cc: &eframe::CreationContext<'_>, dataset_path: String) -> Self {
        let state = Self::start_load(dataset_path.clone());
        Self {
            dataset_path,
            state,
            reload_rx: None,
        }
    }

    fn spawn_load(dataset_path: String) -> Receiver<Result<OccupationData, String>> {
        let (tx, rx) = mpsc::channel();

        thread::spawn(move || {
            let result = load_occupation_data(&dataset_path).map_err(|error| error.to_string());
            let _ = tx.send(result);
        });

        rx
    }

    fn start_load(dataset_path: String) -> AppState {
        AppState::Loading {
            rx: Self::spawn_load(dataset_path),
        }
    }
}

impl eframe::App for NeighborsApp {
    fn update(&mut self, ctx: &Context, _frame: &mut eframe::Frame) {
        let mut transition = None;

        match &mut self.state {
            AppState::Loading { rx } => {
                if let Ok(result) = rx.try_recv() {
                    transition = Some(match result {
                        Ok(data) => AppState::Ready(Box::new(ViewModel::new(data))),
                        Err(error) => AppState::Error(error),
                    });
                }

                egui::CentralPanel::default().show(ctx, |ui| {
                    ui.vertical_centered(|ui| {
                        ui.add_space(120.0);
                        ui.heading("Loading occupation similarity network...");
                        ui.add_space(8.0);
                        ui.spinner();
                    });
                });
            }
            AppState::Error(error) => {
                egui::CentralPanel::default().show(ctx, |ui| {
                    ui.heading("Failed to load the occupation dataset");
                    ui.add_space(6.0);
                    ui.label(error.as_str());
                    ui.add_space(10.0);
                    if ui.button("Retry").clicked() {
                        transition = Some(Self::start_load(self.dataset_path.clone()));
                    }
                });
            }
            AppState::Ready(model) => {
                let mut reload_requested = false;
                let is_reloading = self.reload_rx.is_some();
                model.show(ctx, &self.dataset_path, &mut reload_requested, is_reloading);

                if reload_requested && self.reload_rx.is_none() {
                    self.reload_rx = Some(Self::spawn_load(self.dataset_path.clone()));
                }

                if let Some(rx) = self.reload_rx.take() {
                    match rx.try_recv() {
                        Ok(result) => {
                            transition = Some(match result {
                                Ok(data) => AppState::Ready(Box::new(ViewModel::new(data))),
                                Err(error) => AppState::Error(error),
                            });
                        }
                        Err(TryRecvError::Empty) => {
                            self.reload_rx = Some(rx);
                        }
                        Err(TryRecvError::Disconnected) => {
                            transition =
                                Some(AppState::Error("Background load worker disconnected".to_owned()));
                        }
                    }
                }
            }
        }

        if let Some(next_state) = transition {
            self.reload_rx = None;
            self.state = next_state;
        }
    }
}

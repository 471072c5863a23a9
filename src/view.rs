use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use chrono::Utc;

use crate::lifecycle::{Lifecycle, Registration, RegistrationKind};
use crate::live::random::RandomSource;
use crate::live::simulator::LiveTickSimulator;
use crate::render::{scene_for_coin, ChartScene, RenderOptions};
use crate::store::{Snapshot, Store};

/// The chart screen: owns the derived scenes and the timer/resize
/// registrations that live as long as it is mounted.
pub struct ChartView {
    store: Arc<Store>,
    options: RenderOptions,
    rng: Box<dyn RandomSource + Send>,
    snapshot: Arc<Snapshot>,
    rendered_version: Option<u64>,
    scenes: Vec<ChartScene>,
    selected: usize,
    viewport_width: f64,
    resize_listening: Arc<AtomicBool>,
    timer: Option<Registration>,
    resize: Option<Registration>,
}

impl ChartView {
    pub fn new(
        store: Arc<Store>,
        options: RenderOptions,
        rng: Box<dyn RandomSource + Send>,
        viewport_width: f64,
    ) -> Self {
        let snapshot = store.current();
        Self {
            store,
            options,
            rng,
            snapshot,
            rendered_version: None,
            scenes: Vec::new(),
            selected: 0,
            viewport_width,
            resize_listening: Arc::new(AtomicBool::new(false)),
            timer: None,
            resize: None,
        }
    }

    /// Start the tick timer and listen for resizes. Mounting again first
    /// tears down the previous registrations.
    pub fn mount(&mut self, lifecycle: &Lifecycle, simulator: LiveTickSimulator) {
        if self.is_mounted() {
            self.unmount();
        }
        self.timer = Some(simulator.spawn(Arc::clone(&self.store), lifecycle));

        self.resize_listening.store(true, Ordering::SeqCst);
        let listening = Arc::clone(&self.resize_listening);
        self.resize = Some(lifecycle.register(RegistrationKind::ResizeListener, move || {
            listening.store(false, Ordering::SeqCst)
        }));
        tracing::info!("chart view mounted");
    }

    /// Release the timer and the resize listener. Safe to call repeatedly.
    pub fn unmount(&mut self) {
        let was_mounted = self.is_mounted();
        if let Some(mut timer) = self.timer.take() {
            timer.release();
        }
        if let Some(mut resize) = self.resize.take() {
            resize.release();
        }
        if was_mounted {
            tracing::info!("chart view unmounted");
        }
    }

    pub fn is_mounted(&self) -> bool {
        self.timer.is_some() || self.resize.is_some()
    }

    /// Pull the latest committed snapshot; rebuild scenes when it changed.
    pub fn refresh(&mut self) -> bool {
        let snapshot = self.store.current();
        if self.rendered_version == Some(snapshot.version) {
            return false;
        }
        self.snapshot = snapshot;
        self.rebuild();
        true
    }

    fn rebuild(&mut self) {
        let now = Utc::now();
        let snapshot = Arc::clone(&self.snapshot);
        self.scenes = snapshot
            .coins
            .iter()
            .map(|coin| {
                scene_for_coin(
                    coin,
                    &snapshot.live,
                    now,
                    self.viewport_width,
                    &self.options,
                    self.rng.as_mut(),
                )
            })
            .collect();
        if self.selected >= self.scenes.len() {
            self.selected = self.scenes.len().saturating_sub(1);
        }
        self.rendered_version = Some(snapshot.version);
        tracing::debug!(
            version = snapshot.version,
            scenes = self.scenes.len(),
            "scenes rebuilt"
        );
    }

    /// Rescale existing scenes to a new viewport width. Ignored unless the
    /// resize listener is registered. Never touches the store.
    pub fn on_resize(&mut self, viewport_width: f64) -> bool {
        if !self.resize_listening.load(Ordering::SeqCst) {
            return false;
        }
        self.viewport_width = viewport_width;
        let layout = self.options.layout;
        for scene in &mut self.scenes {
            scene.rescale(viewport_width, &layout);
        }
        true
    }

    pub fn snapshot(&self) -> &Snapshot {
        &self.snapshot
    }

    pub fn scenes(&self) -> &[ChartScene] {
        &self.scenes
    }

    pub fn selected(&self) -> usize {
        self.selected
    }

    pub fn selected_scene(&self) -> Option<&ChartScene> {
        self.scenes.get(self.selected)
    }

    pub fn select_next(&mut self) {
        if !self.scenes.is_empty() {
            self.selected = (self.selected + 1) % self.scenes.len();
        }
    }

    pub fn select_prev(&mut self) {
        if !self.scenes.is_empty() {
            self.selected = (self.selected + self.scenes.len() - 1) % self.scenes.len();
        }
    }

    pub fn select_first(&mut self) {
        self.selected = 0;
    }

    pub fn select_last(&mut self) {
        self.selected = self.scenes.len().saturating_sub(1);
    }
}

impl Drop for ChartView {
    fn drop(&mut self) {
        self.unmount();
    }
}

//! The tour entity and its status state machine
//!
//! A [`Tour`] owns an ordered list of steps, merged display options, and a
//! small state machine fed by renderer callbacks through
//! [`Tour::handle_event`].
//!
//! # Transition rules
//!
//! 1. A status different from the remembered one is an *edge*: the status is
//!    remembered, the current step is cleared, and
//!    - `Finished` emits `finished`,
//!    - `Skipped` emits `skipped`,
//!    - `Running` sets the current step to 0 and emits `started`,
//!    - `Error` is logged and emits `errored`; the tour stays terminal.
//! 2. Every `Running` event, edge or not, updates the step index when it
//!    moved and emits `step_changed`.
//!
//! Tours are shared behind `Arc` by the catalog, so all methods take `&self`.
//! State lives behind a lock that is released before signals fire.

use crate::definition::TourDefinition;
use crate::error::TourError;
use crate::event::{NotificationKind, TourEvent, TourNotification, TourStatus};
use crate::menu::{Menu, MenuItem, MenuItemId};
use crate::options::{Merge, TourOptions};
use crate::signal::Signal;
use crate::step::{Placement, Step};
use parking_lot::Mutex;
use serde_json::json;

/// Command that launches a tour; its argument is `{"id": <tour id>}`
pub const LAUNCH_COMMAND: &str = "tour:launch";

#[derive(Debug)]
struct TourState {
    steps: Vec<Step>,
    options: TourOptions,
    status: TourStatus,
    current_step: Option<usize>,
    last_step_index: Option<usize>,
    menu_items: Vec<MenuItemId>,
}

/// Notifications a tour publishes
#[derive(Debug, Default)]
pub struct TourSignals {
    started: Signal<TourEvent>,
    step_changed: Signal<TourEvent>,
    finished: Signal<TourEvent>,
    skipped: Signal<TourEvent>,
    errored: Signal<TourEvent>,
}

impl TourSignals {
    fn for_kind(&self, kind: NotificationKind) -> &Signal<TourEvent> {
        match kind {
            NotificationKind::Started => &self.started,
            NotificationKind::StepChanged => &self.step_changed,
            NotificationKind::Finished => &self.finished,
            NotificationKind::Skipped => &self.skipped,
            NotificationKind::Errored => &self.errored,
        }
    }
}

/// A guided walkthrough
#[derive(Debug)]
pub struct Tour {
    id: String,
    label: String,
    icon: Option<String>,
    rank: Option<i32>,
    state: Mutex<TourState>,
    signals: TourSignals,
}

impl Tour {
    /// Create tour with default options merged with `options`
    #[must_use]
    pub fn new(id: impl Into<String>, label: impl Into<String>, options: Option<TourOptions>) -> Self {
        let options = match options {
            Some(o) => TourOptions::defaults().merged(o),
            None => TourOptions::defaults(),
        };

        Self {
            id: id.into(),
            label: label.into(),
            icon: None,
            rank: None,
            state: Mutex::new(TourState {
                steps: Vec::new(),
                options,
                status: TourStatus::Ready,
                current_step: None,
                last_step_index: None,
                menu_items: Vec::new(),
            }),
            signals: TourSignals::default(),
        }
    }

    /// Build a tour from a validated definition
    ///
    /// # Errors
    /// Returns the [`TourDefinition::validate`] error for unusable definitions
    pub fn from_definition(def: TourDefinition) -> Result<Self, TourError> {
        def.validate()?;

        let TourDefinition {
            id,
            label,
            steps,
            options,
            icon,
            rank,
        } = def;

        let mut tour = Self::new(id, label, options);
        tour.icon = icon;
        tour.rank = rank;
        tour.state.get_mut().steps = steps;
        Ok(tour)
    }

    /// With icon
    #[inline]
    #[must_use]
    pub fn with_icon(mut self, icon: impl Into<String>) -> Self {
        self.icon = Some(icon.into());
        self
    }

    #[inline]
    #[must_use]
    pub fn id(&self) -> &str {
        &self.id
    }

    #[inline]
    #[must_use]
    pub fn label(&self) -> &str {
        &self.label
    }

    #[inline]
    #[must_use]
    pub fn icon(&self) -> Option<&str> {
        self.icon.as_deref()
    }

    #[inline]
    #[must_use]
    pub fn rank(&self) -> Option<i32> {
        self.rank
    }

    /// Command used by menu entries
    #[inline]
    #[must_use]
    pub fn command_id(&self) -> &'static str {
        LAUNCH_COMMAND
    }

    /// Last status received from the renderer
    #[must_use]
    pub fn status(&self) -> TourStatus {
        self.state.lock().status
    }

    /// Index of the step on screen; `None` when not running
    #[must_use]
    pub fn current_step_index(&self) -> Option<usize> {
        self.state.lock().current_step
    }

    #[must_use]
    pub fn is_running(&self) -> bool {
        self.state.lock().current_step.is_some()
    }

    /// Copy of the steps
    #[must_use]
    pub fn steps(&self) -> Vec<Step> {
        self.state.lock().steps.clone()
    }

    #[must_use]
    pub fn step_count(&self) -> usize {
        self.state.lock().steps.len()
    }

    #[must_use]
    pub fn has_steps(&self) -> bool {
        !self.state.lock().steps.is_empty()
    }

    /// Replace all steps
    pub fn set_steps(&self, steps: Vec<Step>) {
        self.state.lock().steps = steps;
    }

    /// Append a step; a step with neither target nor content is ignored
    pub fn add_step(&self, step: Step) -> bool {
        if step.is_blank() {
            return false;
        }
        self.state.lock().steps.push(step);
        true
    }

    /// Build, append and return a step
    pub fn create_and_add_step(
        &self,
        target: impl Into<String>,
        content: impl Into<String>,
        placement: Option<Placement>,
        title: Option<String>,
    ) -> Step {
        let step = Step {
            target: target.into(),
            content: content.into(),
            title,
            placement,
            disable_beacon: None,
        };
        self.add_step(step.clone());
        step
    }

    /// Replace the step at `index`; out-of-range indices are ignored
    pub fn replace_step(&self, index: usize, step: Step) -> bool {
        let mut state = self.state.lock();
        match state.steps.get_mut(index) {
            Some(slot) => {
                *slot = step;
                true
            }
            None => false,
        }
    }

    /// Remove and return the step at `index`
    pub fn remove_step(&self, index: usize) -> Option<Step> {
        let mut state = self.state.lock();
        (index < state.steps.len()).then(|| state.steps.remove(index))
    }

    /// Merged options
    #[must_use]
    pub fn options(&self) -> TourOptions {
        self.state.lock().options.clone()
    }

    /// Deep-merge `partial` into the current options
    pub fn set_options(&self, partial: TourOptions) {
        self.state.lock().options.merge(partial);
    }

    /// Emitted when a run starts
    #[inline]
    #[must_use]
    pub fn started(&self) -> &Signal<TourEvent> {
        &self.signals.started
    }

    /// Emitted on every `Running` callback
    #[inline]
    #[must_use]
    pub fn step_changed(&self) -> &Signal<TourEvent> {
        &self.signals.step_changed
    }

    /// Emitted when the user reaches the end
    #[inline]
    #[must_use]
    pub fn finished(&self) -> &Signal<TourEvent> {
        &self.signals.finished
    }

    /// Emitted when the user leaves early
    #[inline]
    #[must_use]
    pub fn skipped(&self) -> &Signal<TourEvent> {
        &self.signals.skipped
    }

    /// Emitted when the renderer reports an error
    #[inline]
    #[must_use]
    pub fn errored(&self) -> &Signal<TourEvent> {
        &self.signals.errored
    }

    /// Apply one renderer callback
    ///
    /// Returns the notifications in emission order. They have already been
    /// delivered to subscribers when this returns.
    pub fn handle_event(&self, event: &TourEvent) -> Vec<TourNotification> {
        let notifications = self.transition(event);

        for n in &notifications {
            self.signals.for_kind(n.kind).emit(&n.event);
        }

        notifications
    }

    fn transition(&self, event: &TourEvent) -> Vec<TourNotification> {
        let mut out = Vec::with_capacity(2);
        let notify = |kind| TourNotification {
            kind,
            event: event.clone(),
        };

        let mut state = self.state.lock();

        if event.status != state.status {
            tracing::debug!(
                tour = %self.id,
                from = %state.status,
                to = %event.status,
                "tour status changed"
            );
            state.status = event.status;
            state.current_step = None;
            // A new run starts from a clean slate: the first Running index
            // after any status change always counts as a step change.
            state.last_step_index = None;

            match event.status {
                TourStatus::Finished => out.push(notify(NotificationKind::Finished)),
                TourStatus::Skipped => out.push(notify(NotificationKind::Skipped)),
                TourStatus::Running => {
                    state.current_step = Some(0);
                    out.push(notify(NotificationKind::Started));
                }
                TourStatus::Error => {
                    tracing::error!(
                        tour = %self.id,
                        step = event.index,
                        "an error occurred with the tour"
                    );
                    out.push(notify(NotificationKind::Errored));
                }
                TourStatus::Ready => {}
            }
        }

        if event.status == TourStatus::Running {
            if state.last_step_index != Some(event.index) {
                state.last_step_index = Some(event.index);
                if state.steps.is_empty() || event.index < state.steps.len() {
                    state.current_step = Some(event.index);
                } else {
                    tracing::warn!(
                        tour = %self.id,
                        index = event.index,
                        steps = state.steps.len(),
                        "step index out of range, keeping current step"
                    );
                }
            }
            out.push(notify(NotificationKind::StepChanged));
        }

        out
    }

    /// Add a launch entry for this tour to `menu`
    pub fn add_to_menu(&self, menu: &mut Menu) -> MenuItem {
        let item = menu.add_item(LAUNCH_COMMAND, json!({ "id": self.id }));
        self.state.lock().menu_items.push(item.id);
        item
    }

    /// Remove the entries this tour added to `menu`
    ///
    /// Only entries present both in `menu` and in this tour's records are
    /// removed; everything else in the menu is left alone.
    pub fn remove_from_menu(&self, menu: &mut Menu) -> Vec<MenuItem> {
        let mut state = self.state.lock();
        if menu.is_empty() || state.menu_items.is_empty() {
            return Vec::new();
        }

        let owned: Vec<MenuItemId> = menu
            .items()
            .iter()
            .map(|i| i.id)
            .filter(|id| state.menu_items.contains(id))
            .collect();

        let removed: Vec<MenuItem> = owned
            .iter()
            .filter_map(|id| menu.remove_item(*id))
            .collect();

        state.menu_items.retain(|id| !owned.contains(id));
        removed
    }

    /// Menu entries this tour still tracks
    #[must_use]
    pub fn menu_item_ids(&self) -> Vec<MenuItemId> {
        self.state.lock().menu_items.clone()
    }
}

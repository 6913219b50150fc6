use log::info;

use crate::Error;
use crate::config::LayoutConfig;
use crate::controller::LiveUpdateController;
use crate::layout::{RadialLayout, regenerate};
use crate::model::{Element, LayoutRequest, SpokeCount};
use crate::surface::{Subscription, Surface};

/// One hub-and-spoke diagram session on a surface.
///
/// The session only remembers the current spoke count; element state lives on the surface.
pub struct Diagram<S: Surface> {
    surface: S,
    config: LayoutConfig,
    count: SpokeCount,
    subscription: Option<Subscription>,
}

impl<S: Surface> Diagram<S> {
    /// Creates the hub, lays out the initial spokes and starts keeping connectors attached.
    pub fn mount(mut surface: S, config: LayoutConfig) -> Result<Self, Error> {
        let count = config.initial_spoke_count()?;
        surface.create_element(Element::hub(config.hub.origin(), config.hub.size))?;
        regenerate(&mut surface, &config, count.get())?;
        let subscription = LiveUpdateController.attach(&mut surface);
        info!("mounted diagram with {count} spokes");
        Ok(Self {
            surface,
            config,
            count,
            subscription: Some(subscription),
        })
    }

    pub fn count(&self) -> SpokeCount {
        self.count
    }

    pub fn config(&self) -> &LayoutConfig {
        &self.config
    }

    pub fn surface(&self) -> &S {
        &self.surface
    }

    /// Direct access for external edits such as dragging the hub or a label. Connectors follow
    /// through the change feed.
    pub fn surface_mut(&mut self) -> &mut S {
        &mut self.surface
    }

    /// Regenerates all spokes for `request`. The count only changes when the hub was found
    /// and the spokes were actually rebuilt.
    pub fn apply(&mut self, request: LayoutRequest) -> Result<Option<RadialLayout>, Error> {
        let layout = regenerate(&mut self.surface, &self.config, request.count.get())?;
        if layout.is_some() {
            self.count = request.count;
        }
        Ok(layout)
    }

    /// Adds a spoke. Returns `false` without changing anything at the upper bound or when the
    /// hub is gone.
    pub fn add_spoke(&mut self) -> Result<bool, Error> {
        let Some(count) = self.count.increment() else {
            return Ok(false);
        };
        let applied = self.apply(LayoutRequest { count })?.is_some();
        if applied {
            info!("spoke count raised to {count}");
        }
        Ok(applied)
    }

    /// Removes a spoke. Returns `false` without changing anything at the lower bound or when
    /// the hub is gone.
    pub fn remove_spoke(&mut self) -> Result<bool, Error> {
        let Some(count) = self.count.decrement() else {
            return Ok(false);
        };
        let applied = self.apply(LayoutRequest { count })?.is_some();
        if applied {
            info!("spoke count lowered to {count}");
        }
        Ok(applied)
    }

    /// Stops the live updates, deletes every element of the diagram and hands the surface back.
    pub fn teardown(mut self) -> S {
        if let Some(subscription) = self.subscription.take() {
            self.surface.unsubscribe(subscription);
        }
        for element in self.surface.elements() {
            self.surface.delete_element(&element.id);
        }
        self.surface
    }
}

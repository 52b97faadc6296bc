//! Deferred registration
//!
//! Page scripts can ask for the component before it is available. Their
//! callbacks wait in the [`Registry`] until [`Registry::ready`] runs, and
//! anything registered afterwards is called right away.

use std::fmt;

use orbit_platform::{ElementId, Host};

use crate::component::ProgressCanvas;
use crate::config::ProgressCanvasOptions;
use crate::error::Result;
use crate::mount::{mount, MountTarget};

/// Callback handed the [`Factory`] once the registry is ready
pub type Callback = Box<dyn FnOnce(&mut dyn Host, &Factory) + Send>;

/// Constructors exposed to registered callbacks
#[derive(Clone, Copy, Debug, Default)]
pub struct Factory;

impl Factory {
    /// See [`mount`]
    pub fn mount<'a>(
        &self,
        host: &mut dyn Host,
        target: impl Into<MountTarget<'a>>,
        options: ProgressCanvasOptions,
    ) -> Option<ProgressCanvas> {
        mount(host, target, options)
    }

    /// See [`ProgressCanvas::new`]
    pub fn construct(
        &self,
        host: &mut dyn Host,
        container: ElementId,
        options: ProgressCanvasOptions,
    ) -> Result<ProgressCanvas> {
        ProgressCanvas::new(host, container, options)
    }

    pub fn default_options(&self) -> ProgressCanvasOptions {
        ProgressCanvasOptions::default()
    }
}

#[derive(Default)]
pub struct Registry {
    queued: Vec<Callback>,
    ready: bool,
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Run `callback` now if ready, otherwise queue it
    pub fn register<F>(&mut self, host: &mut dyn Host, callback: F)
    where
        F: FnOnce(&mut dyn Host, &Factory) + Send + 'static,
    {
        if self.ready {
            callback(host, &Factory);
        } else {
            self.queued.push(Box::new(callback));
        }
    }

    /// Mark the registry ready and flush queued callbacks in order
    pub fn ready(&mut self, host: &mut dyn Host) {
        if self.ready {
            return;
        }
        self.ready = true;
        let queued = std::mem::take(&mut self.queued);
        tracing::debug!(count = queued.len(), "flushing registered callbacks");
        for callback in queued {
            callback(&mut *host, &Factory);
        }
    }

    pub fn is_ready(&self) -> bool {
        self.ready
    }

    /// Number of callbacks waiting for `ready`
    pub fn pending(&self) -> usize {
        self.queued.len()
    }
}

impl fmt::Debug for Registry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Registry")
            .field("queued", &self.queued.len())
            .field("ready", &self.ready)
            .finish()
    }
}

//! Render-cycle controller
//!
//! Drives reconciliation across renders: keeps the description that was last
//! patched and the live node it produced, so every cycle diffs against
//! exactly what is on screen. Views receive an explicit dependency bundle
//! instead of reaching for shared globals.

use crate::algo::{DiffConfig, create_element, diff_with_config};
use crate::error::{ReconcileError, ReconcileResult};
use crate::host::Host;
use crate::node::Node;

// =============================================================================
// View
// =============================================================================

/// Cleanup returned by [`View::mounted`], run before the next render.
pub type Teardown<D> = Box<dyn FnOnce(&D)>;

/// Something that renders a description from dependencies `D`.
pub trait View<D> {
    /// Produce the description to show. `None` shows nothing.
    fn render(&self, deps: &D) -> Option<Node>;

    /// Called once the description is live. The returned teardown runs
    /// before the next render or on `clear`.
    fn mounted(&self, _deps: &D) -> Option<Teardown<D>> {
        None
    }
}

impl<D, F> View<D> for F
where
    F: Fn(&D) -> Option<Node>,
{
    fn render(&self, deps: &D) -> Option<Node> {
        self(deps)
    }
}

// =============================================================================
// Renderer
// =============================================================================

/// Configuration for a [`Renderer`].
#[derive(Debug, Clone, Copy, Default)]
pub struct RendererConfig {
    /// Differ settings used for every cycle.
    pub diff: DiffConfig,
}

impl RendererConfig {
    /// Create config with custom differ settings.
    pub fn new(diff: DiffConfig) -> Self {
        Self { diff }
    }
}

/// Render-cycle controller over a host container node.
pub struct Renderer<H: Host, D> {
    host: H,
    container: H::Node,
    deps: D,
    config: RendererConfig,
    /// Description last patched into the host
    current: Option<Node>,
    /// Live node produced from `current`
    mounted: Option<H::Node>,
    teardown: Option<Teardown<D>>,
    /// Set after a failed cycle: `current` no longer describes the live tree
    stale: bool,
}

impl<H: Host, D> Renderer<H, D> {
    /// Create a renderer that mounts views under `container`.
    pub fn new(host: H, container: H::Node, deps: D) -> Self {
        Self {
            host,
            container,
            deps,
            config: RendererConfig::default(),
            current: None,
            mounted: None,
            teardown: None,
            stale: false,
        }
    }

    /// Use custom configuration.
    pub fn with_config(mut self, config: RendererConfig) -> Self {
        self.config = config;
        self
    }

    /// Run one render cycle and return the mounted live node.
    ///
    /// On failure the error is returned and the next cycle realizes the new
    /// description from scratch instead of diffing.
    pub fn render(&mut self, view: &impl View<D>) -> ReconcileResult<Option<H::Node>, H::Error> {
        if let Some(teardown) = self.teardown.take() {
            teardown(&self.deps);
        }

        let next = view.render(&self.deps);
        let result = if self.stale {
            self.remount(next.as_ref())
        } else {
            self.patch(next.as_ref())
        };

        match result {
            Ok(mounted) => {
                self.mounted = mounted;
                self.current = next;
                self.stale = false;
            }
            Err(err) => {
                tracing::debug!(error = %err, "render cycle failed, marking stale");
                self.current = None;
                self.stale = true;
                return Err(err);
            }
        }

        self.teardown = view.mounted(&self.deps);
        tracing::debug!(mounted = ?self.mounted, "render cycle complete");
        Ok(self.mounted.clone())
    }

    /// Tear down and remove whatever is mounted.
    ///
    /// The mounted node is forgotten even if the host fails to remove it;
    /// the renderer is then stale and the next cycle mounts fresh.
    pub fn clear(&mut self) -> ReconcileResult<(), H::Error> {
        if let Some(teardown) = self.teardown.take() {
            teardown(&self.deps);
        }
        self.current = None;
        if let Some(mounted) = self.mounted.take()
            && let Err(err) = self.host.remove(&mounted)
        {
            tracing::debug!(error = %err, "clear failed, marking stale");
            self.stale = true;
            return Err(ReconcileError::Host(err));
        }
        self.stale = false;
        Ok(())
    }

    fn patch(&mut self, next: Option<&Node>) -> ReconcileResult<Option<H::Node>, H::Error> {
        if self.current.is_none() && next.is_none() {
            return Ok(None);
        }
        // Nothing mounted yet: the patch appends under the container.
        let target = self
            .mounted
            .clone()
            .unwrap_or_else(|| self.container.clone());
        let patch = diff_with_config(self.current.as_ref(), next, self.config.diff);
        patch.apply(&mut self.host, target)
    }

    fn remount(&mut self, next: Option<&Node>) -> ReconcileResult<Option<H::Node>, H::Error> {
        let fresh = match next {
            Some(node) => Some(create_element(&mut self.host, Some(node))?),
            None => None,
        };
        let placed = match (&self.mounted, &fresh) {
            (Some(old), Some(new)) => self.host.replace(old, new),
            (Some(old), None) => self.host.remove(old),
            (None, Some(new)) => self.host.append_child(&self.container, new),
            (None, None) => Ok(()),
        };
        placed.map_err(ReconcileError::Host)?;
        Ok(fresh)
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Access
    // ─────────────────────────────────────────────────────────────────────────

    /// The host rendering surface
    pub fn host(&self) -> &H {
        &self.host
    }

    /// The host rendering surface, mutably
    pub fn host_mut(&mut self) -> &mut H {
        &mut self.host
    }

    /// Dependency bundle handed to views
    pub fn deps(&self) -> &D {
        &self.deps
    }

    /// Container the views are mounted under
    pub fn container(&self) -> &H::Node {
        &self.container
    }

    /// Live node produced by the last successful cycle
    pub fn mounted(&self) -> Option<&H::Node> {
        self.mounted.as_ref()
    }

    /// Description last patched into the host
    pub fn current(&self) -> Option<&Node> {
        self.current.as_ref()
    }

    /// Check if the last cycle failed
    pub fn is_stale(&self) -> bool {
        self.stale
    }

    /// Give back the host
    pub fn into_host(self) -> H {
        self.host
    }
}

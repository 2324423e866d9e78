// Copyright 2025 the Sketchbox Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Overlay configuration.

/// Tunables shared by the builder, the position adjuster, and hit testing.
///
/// ```rust
/// use sketchbox_overlay::OverlayConfig;
///
/// let config = OverlayConfig::new().hit_radius(6.0).max_depth(64);
/// assert_eq!(config.max_depth, 64);
/// assert_eq!(config.scope_padding, OverlayConfig::default().scope_padding);
/// ```
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct OverlayConfig {
    /// Deepest document nesting the builder descends into before failing with
    /// [`BuildError::DepthLimit`](crate::BuildError::DepthLimit).
    pub max_depth: usize,
    /// Half the side of the square a leaf shape occupies on screen.
    pub hit_radius: f64,
    /// Margin added around the union of a scope's children.
    pub scope_padding: f64,
}

impl Default for OverlayConfig {
    fn default() -> Self {
        Self {
            max_depth: 256,
            hit_radius: 4.0,
            scope_padding: 6.0,
        }
    }
}

impl OverlayConfig {
    /// Create the default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set [`OverlayConfig::max_depth`].
    pub fn max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    /// Set [`OverlayConfig::hit_radius`].
    pub fn hit_radius(mut self, hit_radius: f64) -> Self {
        self.hit_radius = hit_radius;
        self
    }

    /// Set [`OverlayConfig::scope_padding`].
    pub fn scope_padding(mut self, scope_padding: f64) -> Self {
        self.scope_padding = scope_padding;
        self
    }
}

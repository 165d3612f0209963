//! Binder configuration.
//!
//! This module provides `BinderConfig`, a builder for the options that
//! govern how a binder turns its data into widget updates.

use crate::table::RowAnimation;

/// Which sections are displayed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum SectionDisplayBehavior {
    /// Every candidate section is displayed, even when empty.
    #[default]
    ShowAll,
    /// Sections without rows are hidden.
    HidesSectionsWithNoCellData,
    /// Sections without rows, header content and footer content are hidden.
    HidesSectionsWithNoData,
}

/// The animations used for each kind of structural update.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct UpdateAnimations {
    /// Row insertions.
    pub insert_rows: RowAnimation,
    /// Row deletions.
    pub delete_rows: RowAnimation,
    /// Row reloads.
    pub reload_rows: RowAnimation,
    /// Section insertions.
    pub insert_sections: RowAnimation,
    /// Section deletions.
    pub delete_sections: RowAnimation,
    /// Section reloads.
    pub reload_sections: RowAnimation,
}

impl UpdateAnimations {
    /// The same animation for everything.
    pub fn uniform(animation: RowAnimation) -> Self {
        Self {
            insert_rows: animation,
            delete_rows: animation,
            reload_rows: animation,
            insert_sections: animation,
            delete_sections: animation,
            reload_sections: animation,
        }
    }
}

/// Configuration for a binder.
///
/// # Example
///
/// ```
/// use braid::config::{BinderConfig, SectionDisplayBehavior};
/// use braid::table::RowAnimation;
///
/// let config = BinderConfig::new()
///     .with_section_display_behavior(SectionDisplayBehavior::HidesSectionsWithNoCellData)
///     .with_row_animation(RowAnimation::Fade);
///
/// assert!(config.animate_updates());
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct BinderConfig {
    /// Which sections are displayed.
    section_display_behavior: SectionDisplayBehavior,
    /// Whether commits are animated batches or full reloads.
    animate_updates: bool,
    /// Per-operation animations.
    animations: UpdateAnimations,
}

impl Default for BinderConfig {
    fn default() -> Self {
        Self {
            section_display_behavior: SectionDisplayBehavior::ShowAll,
            animate_updates: true,
            animations: UpdateAnimations::default(),
        }
    }
}

impl BinderConfig {
    /// Create a configuration with default settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set which sections are displayed.
    pub fn with_section_display_behavior(mut self, behavior: SectionDisplayBehavior) -> Self {
        self.section_display_behavior = behavior;
        self
    }

    /// Set whether commits are animated.
    ///
    /// When disabled, every commit is applied as a full reload.
    pub fn with_animate_updates(mut self, animate: bool) -> Self {
        self.animate_updates = animate;
        self
    }

    /// Set the animations for every kind of update.
    pub fn with_animations(mut self, animations: UpdateAnimations) -> Self {
        self.animations = animations;
        self
    }

    /// Use one animation for every kind of update.
    pub fn with_row_animation(mut self, animation: RowAnimation) -> Self {
        self.animations = UpdateAnimations::uniform(animation);
        self
    }

    /// Which sections are displayed.
    pub fn section_display_behavior(&self) -> SectionDisplayBehavior {
        self.section_display_behavior
    }

    /// Whether commits are animated.
    pub fn animate_updates(&self) -> bool {
        self.animate_updates
    }

    /// Per-operation animations.
    pub fn animations(&self) -> &UpdateAnimations {
        &self.animations
    }
}

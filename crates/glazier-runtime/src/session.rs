#![forbid(unsafe_code)]

//! Editing session for one frame.
//!
//! [`Configurator`] owns the undo history, the base product selection, the
//! physical frame size and the layout policy. Every edit method applies one
//! engine operation to the current tree and commits the result only when
//! the tree actually changed, so no-op edits never pollute undo.
//!
//! Divider drags are split in two: [`drag_divider`](Configurator::drag_divider)
//! previews each pointer move without recording history, and
//! [`release_divider`](Configurator::release_divider) commits the whole
//! gesture as a single undo step.

use glazier_core::units::FrameSize;
use glazier_layout::{
    Flag, LayoutEngine, LayoutPolicy, LeafStyle, Sash, Scene, SectionId, SectionNode, SectionTree,
    SplitDirection, SystemType, build_preset, export_scene, leaf_edit,
};
use tracing::{debug, info};

use crate::catalog::Catalog;
use crate::config::{ConfigError, ConfiguratorConfig};
use crate::history::History;
use crate::sink::{QuotationSink, SceneRenderer};

/// Interactive configurator state for one window or door.
#[derive(Debug)]
pub struct Configurator {
    history: History<SectionTree>,
    base: LeafStyle,
    frame: FrameSize,
    engine: LayoutEngine,
}

impl Default for Configurator {
    fn default() -> Self {
        Self::new(ConfiguratorConfig::default())
    }
}

impl Configurator {
    /// Start a session at the preset for the configured base selection.
    #[must_use]
    pub fn new(config: ConfiguratorConfig) -> Self {
        let base = config.defaults.style();
        let tree = build_preset(base.system_type, base.glass, base.mesh);
        info!(
            system_type = %base.system_type,
            width_mm = config.frame.width_mm,
            height_mm = config.frame.height_mm,
            "configurator session started"
        );
        Self {
            history: History::new(tree, config.history),
            base,
            frame: config.frame.size(),
            engine: LayoutEngine::new(config.layout),
        }
    }

    /// Like [`new`](Self::new), rejecting configurations that fail
    /// validation.
    pub fn try_new(config: ConfiguratorConfig) -> Result<Self, ConfigError> {
        Ok(Self::new(config.validated()?))
    }

    // ====================================================================
    // Query
    // ====================================================================

    /// Current tree, including an in-progress drag.
    #[must_use]
    pub fn tree(&self) -> &SectionTree {
        self.history.present()
    }

    #[must_use]
    pub fn frame(&self) -> FrameSize {
        self.frame
    }

    /// Base product selection applied to presets and new split children.
    #[must_use]
    pub fn base(&self) -> LeafStyle {
        self.base
    }

    #[must_use]
    pub fn policy(&self) -> &LayoutPolicy {
        self.engine.policy()
    }

    #[must_use]
    pub fn history(&self) -> &History<SectionTree> {
        &self.history
    }

    // ====================================================================
    // Base selection and frame
    // ====================================================================

    /// Switch the base family. Rebuilds the preset and clears history.
    pub fn set_base_system(&mut self, system_type: SystemType) -> bool {
        if self.base.system_type == system_type {
            return false;
        }
        self.base.system_type = system_type;
        self.rebuild_preset();
        true
    }

    /// Switch the default glass fill. Rebuilds the preset and clears history.
    pub fn set_default_glass(&mut self, glass: Flag) -> bool {
        if self.base.glass == glass {
            return false;
        }
        self.base.glass = glass;
        self.rebuild_preset();
        true
    }

    /// Switch the default mesh fill. Rebuilds the preset and clears history.
    pub fn set_default_mesh(&mut self, mesh: Flag) -> bool {
        if self.base.mesh == mesh {
            return false;
        }
        self.base.mesh = mesh;
        self.rebuild_preset();
        true
    }

    /// Change the physical frame size.
    ///
    /// The tree is normalized, so nothing is recorded in history. Values that
    /// are not finite and positive are ignored.
    pub fn set_frame_size(&mut self, width_mm: f64, height_mm: f64) -> bool {
        let frame = FrameSize::new(width_mm, height_mm);
        if !frame.is_valid() {
            debug!(width_mm, height_mm, "frame size ignored: not finite and positive");
            return false;
        }
        self.frame = frame;
        true
    }

    fn rebuild_preset(&mut self) {
        let base = self.base;
        let tree = build_preset(base.system_type, base.glass, base.mesh);
        self.history.reset(tree);
        info!(
            system_type = %base.system_type,
            glass = ?base.glass,
            mesh = ?base.mesh,
            "preset rebuilt, history reset"
        );
    }

    // ====================================================================
    // Committed edits
    // ====================================================================

    fn commit(&mut self, next: SectionTree) -> bool {
        if next == *self.history.present() {
            return false;
        }
        self.history.push(next);
        true
    }

    /// Split leaf `target` into `count` parts along `direction`.
    pub fn split(&mut self, target: SectionId, direction: SplitDirection, count: usize) -> bool {
        let next = self
            .engine
            .split(self.tree(), target, direction, count, &self.base);
        self.commit(next)
    }

    /// Merge `target` (or its parent, for a leaf) back into one leaf.
    pub fn merge(&mut self, target: SectionId) -> bool {
        let next = self.engine.merge(self.tree(), target);
        self.commit(next)
    }

    /// Type a new size for child `index` of `parent`.
    pub fn set_child_dimension(
        &mut self,
        parent: SectionId,
        index: usize,
        mm: f64,
        direction: SplitDirection,
    ) -> bool {
        let next =
            self.engine
                .update_child_dimension(self.tree(), parent, index, mm, direction, &self.frame);
        self.commit(next)
    }

    /// Type a new width for panel `index` of `leaf`.
    pub fn set_panel_dimension(&mut self, leaf: SectionId, index: usize, mm: f64) -> bool {
        let next = self
            .engine
            .update_leaf_panel_dimension(self.tree(), leaf, index, mm, &self.frame);
        self.commit(next)
    }

    pub fn set_description(&mut self, leaf: SectionId, description: &str) -> bool {
        let next = leaf_edit::set_description(self.tree(), leaf, description);
        self.commit(next)
    }

    pub fn set_series(&mut self, leaf: SectionId, series: &str) -> bool {
        let next = leaf_edit::set_series(self.tree(), leaf, series);
        self.commit(next)
    }

    pub fn set_sash(&mut self, leaf: SectionId, sash: Sash) -> bool {
        let next = leaf_edit::set_sash(self.tree(), leaf, sash);
        self.commit(next)
    }

    pub fn set_glass(&mut self, leaf: SectionId, glass: Flag) -> bool {
        let next = leaf_edit::set_glass(self.tree(), leaf, glass);
        self.commit(next)
    }

    pub fn set_mesh(&mut self, leaf: SectionId, mesh: Flag) -> bool {
        let next = leaf_edit::set_mesh(self.tree(), leaf, mesh);
        self.commit(next)
    }

    pub fn set_system_type(&mut self, leaf: SectionId, system_type: SystemType) -> bool {
        let next = leaf_edit::set_system_type(self.tree(), leaf, system_type);
        self.commit(next)
    }

    // ====================================================================
    // Live drag
    // ====================================================================

    /// Preview a divider move. Records nothing until
    /// [`release_divider`](Self::release_divider).
    pub fn drag_divider(
        &mut self,
        parent: SectionId,
        direction: SplitDirection,
        divider_index: usize,
        boundary: f64,
    ) -> bool {
        let next = self.engine.resize_children_by_divider(
            self.tree(),
            parent,
            direction,
            divider_index,
            boundary,
            self.engine.policy().min_divider_fraction,
        );
        if next == *self.tree() {
            return false;
        }
        self.history.set_direct(next);
        true
    }

    /// Commit the current drag as one undo step.
    ///
    /// A drag that ended where it started records nothing.
    pub fn release_divider(&mut self) -> bool {
        if !self.history.is_live() {
            return false;
        }
        if self.history.present() == self.history.committed() {
            self.history.discard_live();
            return false;
        }
        let tree = self.history.present().clone();
        self.history.push(tree);
        true
    }

    /// Abandon the current drag, restoring the pre-gesture tree.
    pub fn cancel_drag(&mut self) -> bool {
        self.history.discard_live()
    }

    // ====================================================================
    // History
    // ====================================================================

    pub fn undo(&mut self) -> bool {
        self.history.undo()
    }

    pub fn redo(&mut self) -> bool {
        self.history.redo()
    }

    #[must_use]
    pub fn can_undo(&self) -> bool {
        self.history.can_undo()
    }

    #[must_use]
    pub fn can_redo(&self) -> bool {
        self.history.can_redo()
    }

    // ====================================================================
    // Output
    // ====================================================================

    /// Scene for the current tree at the current frame size.
    #[must_use]
    pub fn export_scene(&self) -> Scene {
        export_scene(self.tree(), &self.frame)
    }

    pub fn render(&self, renderer: &mut impl SceneRenderer) {
        renderer.render(&self.export_scene());
    }

    pub fn submit_quotation(&self, sink: &mut impl QuotationSink) {
        let scene = self.export_scene();
        debug!(lines = scene.payload.line_count(), "submitting quotation");
        sink.submit(&scene.payload);
    }

    // ====================================================================
    // Catalog
    // ====================================================================

    fn leaf(&self, leaf: SectionId) -> Option<&SectionNode> {
        self.tree().node(leaf).filter(|node| node.is_leaf())
    }

    /// Series the catalog offers for `leaf`'s family.
    #[must_use]
    pub fn series_options(&self, catalog: &impl Catalog, leaf: SectionId) -> Vec<String> {
        self.leaf(leaf)
            .map(|node| catalog.series(node.system_type))
            .unwrap_or_default()
    }

    /// Descriptions the catalog offers for `leaf`'s series.
    #[must_use]
    pub fn description_options(&self, catalog: &impl Catalog, leaf: SectionId) -> Vec<String> {
        self.leaf(leaf)
            .filter(|node| !node.series.is_empty())
            .map(|node| catalog.descriptions(node.system_type, &node.series))
            .unwrap_or_default()
    }

    /// Select a catalog-listed series. Unlisted values leave the tree
    /// unchanged and return `false`.
    pub fn select_series(&mut self, catalog: &impl Catalog, leaf: SectionId, series: &str) -> bool {
        if !self.series_options(catalog, leaf).iter().any(|s| s == series) {
            debug!(leaf = leaf.get(), series, "series rejected: not in catalog");
            return false;
        }
        self.set_series(leaf, series);
        true
    }

    /// Select a catalog-listed description. Unlisted values leave the tree
    /// unchanged and return `false`.
    pub fn select_description(
        &mut self,
        catalog: &impl Catalog,
        leaf: SectionId,
        description: &str,
    ) -> bool {
        if !self
            .description_options(catalog, leaf)
            .iter()
            .any(|d| d == description)
        {
            debug!(
                leaf = leaf.get(),
                description, "description rejected: not in catalog"
            );
            return false;
        }
        self.set_description(leaf, description);
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::StaticCatalog;
    use crate::sink::{RecordingQuotationSink, RecordingRenderer};
    use glazier_layout::ItemPayload;

    fn id(raw: u64) -> SectionId {
        SectionId::new(raw).expect("test ID must be non-zero")
    }

    fn sliding() -> Configurator {
        let mut config = ConfiguratorConfig::default();
        config.defaults.system_type = SystemType::Sliding;
        Configurator::new(config)
    }

    #[test]
    fn starts_at_configured_preset() {
        let session = sliding();
        assert_eq!(session.tree().leaf_count(), 2);
        assert!(!session.can_undo());
        assert_eq!(session.frame(), FrameSize::new(1500.0, 1200.0));
    }

    #[test]
    fn base_change_rebuilds_and_resets() {
        let mut session = sliding();
        assert!(session.split(id(2), SplitDirection::Vertical, 2));
        assert!(session.can_undo());
        assert!(!session.set_base_system(SystemType::Sliding));
        assert!(session.set_base_system(SystemType::SlideNFold));
        assert_eq!(session.tree().leaf_count(), 3);
        assert!(!session.can_undo());
        assert!(session.set_default_mesh(Flag::Yes));
        assert!(session.tree().leaves().iter().all(|l| l.mesh == Flag::Yes));
    }

    #[test]
    fn no_op_edits_do_not_record_history() {
        let mut session = Configurator::default();
        assert!(!session.set_child_dimension(id(1), 0, 700.0, SplitDirection::Vertical));
        assert!(!session.merge(id(1)));
        assert!(!session.can_undo());
    }

    #[test]
    fn frame_size_rejects_invalid_values() {
        let mut session = Configurator::default();
        assert!(!session.set_frame_size(0.0, 1000.0));
        assert!(!session.set_frame_size(f64::NAN, 1000.0));
        assert!(session.set_frame_size(2000.0, 1000.0));
        assert_eq!(session.frame(), FrameSize::new(2000.0, 1000.0));
        assert!(!session.can_undo());
    }

    #[test]
    fn cancel_drag_restores_committed_tree() {
        let mut session = sliding();
        let before = session.tree().clone();
        assert!(session.drag_divider(id(1), SplitDirection::Vertical, 0, 0.3));
        assert_ne!(*session.tree(), before);
        assert!(session.cancel_drag());
        assert_eq!(*session.tree(), before);
        assert!(!session.release_divider());
    }

    #[test]
    fn catalog_selection_is_checked() {
        let catalog = StaticCatalog::new().with_series(
            SystemType::Sliding,
            "S-60",
            ["2 Panel", "4 Track 2 Glass 2 Mesh"],
        );
        let mut session = sliding();
        assert_eq!(session.series_options(&catalog, id(2)), vec!["S-60"]);
        assert!(session.description_options(&catalog, id(2)).is_empty());
        assert!(!session.select_series(&catalog, id(2), "S-99"));
        assert!(session.select_series(&catalog, id(2), "S-60"));
        assert!(!session.select_description(&catalog, id(2), "7 Panel"));
        assert!(session.select_description(&catalog, id(2), "4 Track 2 Glass 2 Mesh"));
        let leaf = session.tree().node(id(2)).expect("leaf");
        assert_eq!(leaf.panel_mesh_count, Some(2));
        assert!(session.series_options(&catalog, id(1)).is_empty());
    }

    #[test]
    fn outputs_reach_renderer_and_sink() {
        let session = sliding();
        let mut renderer = RecordingRenderer::default();
        let mut sink = RecordingQuotationSink::default();
        session.render(&mut renderer);
        session.submit_quotation(&mut sink);
        assert_eq!(renderer.scenes.len(), 1);
        assert_eq!(renderer.scenes[0].leaves.len(), 2);
        assert!(matches!(sink.items[0], ItemPayload::Combination(_)));
    }

    #[test]
    fn try_new_rejects_invalid_config() {
        let mut config = ConfiguratorConfig::default();
        config.history.max_depth = 0;
        assert!(Configurator::try_new(config).is_err());
    }
}

//! The axes layer: ticks, instance buffers and label atlas kept in sync with
//! the driving scales, and drawn through a [`Renderer`].

use plotaxes_core::{AxesProps, GridBounds, Result, TickSet, Vec3};
use plotaxes_render::{
    grid_template, label_template, Atlas, AttributeManager, AxesUniforms, DrawUniforms,
    LabelAtlasPacker, ModelDescriptor, ModelHandle, ProgramHandle, Renderer, TextRasterizer,
};

/// Where the layer is in its recompute cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LayerState {
    /// No complete set of scales has been seen yet.
    Uninitialized,
    /// A recompute started and did not finish.
    Dirty,
    /// Ticks, bounds and atlas reflect the last complete set of scales.
    ///
    /// Props that drop a scale keep the layer here with its previous data.
    Clean,
}

/// Shader programs for the two models, compiled by the renderer's owner.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AxesPrograms {
    pub grid: ProgramHandle,
    pub labels: ProgramHandle,
}

#[derive(Debug, Clone, Copy)]
struct AxesModels {
    grids: ModelHandle,
    labels: ModelHandle,
}

/// Draws grid lines and tick labels around a 3D plot.
///
/// The host render loop drives it through four calls:
/// [`on_props_changed`](Self::on_props_changed) whenever props are set,
/// [`update`](Self::update) before drawing, [`draw`](Self::draw) once per
/// frame and [`dispose`](Self::dispose) when the layer goes away. All
/// recomputation happens in the first two; `draw` only reads.
pub struct AxesLayerController {
    id: String,
    programs: AxesPrograms,
    props: AxesProps,
    state: LayerState,
    ticks: TickSet,
    bounds: GridBounds,
    attributes: AttributeManager,
    packer: LabelAtlasPacker,
    models: Option<AxesModels>,
}

impl AxesLayerController {
    /// Creates an uninitialized layer with default props and no scales.
    pub fn new(id: impl Into<String>, programs: AxesPrograms) -> Self {
        Self {
            id: id.into(),
            programs,
            props: AxesProps::default(),
            state: LayerState::Uninitialized,
            ticks: TickSet::default(),
            bounds: GridBounds::default(),
            attributes: AttributeManager::new(),
            packer: LabelAtlasPacker::new(),
            models: None,
        }
    }

    /// Creates the grid and label models. Does nothing if they already exist.
    pub fn initialize<R: Renderer + ?Sized>(&mut self, renderer: &mut R) -> Result<()> {
        if self.models.is_some() {
            return Ok(());
        }

        let grid = grid_template();
        let labels = label_template(&grid);

        let grids = renderer.create_model(&ModelDescriptor {
            id: &format!("{}-grids", self.id),
            program: self.programs.grid,
            geometry: &grid,
            instanced: true,
        })?;
        let labels = match renderer.create_model(&ModelDescriptor {
            id: &format!("{}-labels", self.id),
            program: self.programs.labels,
            geometry: &labels,
            instanced: true,
        }) {
            Ok(labels) => labels,
            Err(err) => {
                renderer.release_model(grids);
                return Err(err);
            }
        };

        log::debug!("{}: created grid and label models", self.id);
        self.models = Some(AxesModels { grids, labels });
        // Fresh models hold no instance data yet.
        self.attributes.invalidate();
        Ok(())
    }

    /// Applies new props, recomputing ticks, bounds and the label atlas when
    /// the tick count, any scale or the atlas font size changed.
    ///
    /// A formatter error propagates and leaves the layer [`LayerState::Dirty`];
    /// the next call retries even if the props are unchanged.
    ///
    /// Props missing a scale are stored but skip the recompute, so derived
    /// data keeps describing the last complete scale set.
    pub fn on_props_changed<R, T>(
        &mut self,
        props: AxesProps,
        renderer: &mut R,
        rasterizer: &mut T,
    ) -> Result<()>
    where
        R: Renderer + ?Sized,
        T: TextRasterizer + ?Sized,
    {
        props.config.validate()?;
        let ticks_changed = self.props.ticks_changed(&props);
        let atlas_resized = self.props.config.atlas_font_size() != props.config.atlas_font_size();
        self.props = props;

        if ticks_changed || atlas_resized || self.state == LayerState::Dirty {
            self.recompute(renderer, rasterizer)?;
        }
        Ok(())
    }

    fn recompute<R, T>(&mut self, renderer: &mut R, rasterizer: &mut T) -> Result<()>
    where
        R: Renderer + ?Sized,
        T: TextRasterizer + ?Sized,
    {
        let Some(scales) = self.props.scales() else {
            log::debug!("{}: waiting for all three scales", self.id);
            return Ok(());
        };

        self.state = LayerState::Dirty;
        let ticks = TickSet::compute(
            scales,
            self.props.config.ticks_count,
            &*self.props.format_tick,
        )?;
        let bounds = GridBounds::from_scales(scales);

        self.ticks = ticks;
        self.bounds = bounds;
        self.attributes.invalidate();

        let font_size = self.props.config.atlas_font_size();
        let ready = self
            .packer
            .pack(&self.ticks, font_size, rasterizer, renderer)?
            .is_some();
        if !ready {
            log::debug!("{}: label atlas not ready, labels will not draw", self.id);
        }

        self.state = LayerState::Clean;
        log::debug!(
            "{}: recomputed {} instances (dims {:?}, center {:?})",
            self.id,
            self.ticks.len(),
            self.bounds.dims,
            self.bounds.center
        );
        Ok(())
    }

    /// Materializes stale instance buffers and hands them to both models.
    ///
    /// Creates the models on first use.
    pub fn update<R: Renderer + ?Sized>(&mut self, renderer: &mut R) -> Result<()> {
        if self.state == LayerState::Uninitialized {
            return Ok(());
        }
        self.initialize(renderer)?;
        let Some(models) = self.models else {
            return Ok(());
        };

        self.attributes.materialize(&self.ticks);
        let instance_count = self.attributes.num_instances();
        let changed = self.attributes.changed_attributes(false);
        if changed.is_empty() {
            return Ok(());
        }
        renderer.set_instance_attributes(models.grids, instance_count, &changed)?;
        renderer.set_instance_attributes(models.labels, instance_count, &changed)?;
        self.attributes.changed_attributes(true);
        Ok(())
    }

    /// Draws the grids, then the labels. Does nothing until an atlas exists.
    pub fn draw<R: Renderer + ?Sized>(&self, renderer: &mut R) -> Result<()> {
        let Some(atlas) = self.packer.atlas() else {
            return Ok(());
        };
        let Some(models) = self.models else {
            return Ok(());
        };
        if self.attributes.is_dirty() {
            log::debug!("{}: instance buffers are stale, skipping draw", self.id);
            return Ok(());
        }

        let base = AxesUniforms::new(&self.bounds, &self.props.config);
        renderer.draw(models.grids, &DrawUniforms { base, label: None })?;
        renderer.draw(
            models.labels,
            &DrawUniforms {
                base,
                label: Some(atlas.uniforms()),
            },
        )?;
        Ok(())
    }

    /// Releases the atlas and both models, returning to
    /// [`LayerState::Uninitialized`].
    pub fn dispose<R: Renderer + ?Sized>(&mut self, renderer: &mut R) {
        self.packer.release(renderer);
        if let Some(models) = self.models.take() {
            renderer.release_model(models.grids);
            renderer.release_model(models.labels);
        }
        self.ticks = TickSet::default();
        self.bounds = GridBounds::default();
        self.attributes = AttributeManager::new();
        self.props = AxesProps::new(self.props.config.clone());
        self.state = LayerState::Uninitialized;
        log::debug!("{}: disposed", self.id);
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn state(&self) -> LayerState {
        self.state
    }

    pub fn props(&self) -> &AxesProps {
        &self.props
    }

    /// Ticks from the last successful recompute, in (x, z, y) order.
    pub fn ticks(&self) -> &TickSet {
        &self.ticks
    }

    /// Grid box size per axis, in (x, z, y) order.
    pub fn grid_dims(&self) -> Vec3 {
        self.bounds.dims
    }

    /// Grid box center per axis, in (x, z, y) order.
    pub fn grid_center(&self) -> Vec3 {
        self.bounds.center
    }

    /// Instances in the materialized buffers (shared by grids and labels).
    pub fn num_instances(&self) -> usize {
        self.attributes.num_instances()
    }

    pub fn attributes(&self) -> &AttributeManager {
        &self.attributes
    }

    pub fn atlas(&self) -> Option<&Atlas> {
        self.packer.atlas()
    }
}

//! Integration tests for the axes layer, driven through the headless renderer.

use std::rc::Rc;

use plotaxes::*;
use proptest::prelude::*;

const PROGRAMS: AxesPrograms = AxesPrograms {
    grid: ProgramHandle(100),
    labels: ProgramHandle(200),
};

fn uniform(domain: [f64; 2], range: [f64; 2]) -> Rc<dyn Scale> {
    Rc::new(LinearScale::new(domain, range).with_strategy(TickStrategy::Uniform))
}

fn props_with(x: Rc<dyn Scale>, y: Rc<dyn Scale>, z: Rc<dyn Scale>) -> AxesProps {
    AxesProps::default()
        .with_scale(Axis::X, x)
        .with_scale(Axis::Y, y)
        .with_scale(Axis::Z, z)
}

fn unit_props() -> AxesProps {
    props_with(
        uniform([0.0, 100.0], [-1.0, 1.0]),
        uniform([0.0, 10.0], [-2.0, 2.0]),
        uniform([-5.0, 5.0], [0.0, 3.0]),
    )
}

struct Harness {
    layer: AxesLayerController,
    renderer: HeadlessRenderer,
    rasterizer: BlockRasterizer,
}

impl Harness {
    fn new() -> Self {
        Self {
            layer: AxesLayerController::new("axes", PROGRAMS),
            renderer: HeadlessRenderer::new(),
            rasterizer: BlockRasterizer::new(4),
        }
    }

    fn set_props(&mut self, props: AxesProps) -> Result<()> {
        self.layer
            .on_props_changed(props, &mut self.renderer, &mut self.rasterizer)
    }

    /// One host frame: update, then draw.
    fn frame(&mut self) -> Result<Vec<DrawRecord>> {
        self.layer.update(&mut self.renderer)?;
        self.layer.draw(&mut self.renderer)?;
        Ok(self.renderer.take_draws())
    }
}

#[test]
fn test_stays_uninitialized_without_all_scales() {
    let mut h = Harness::new();
    assert_eq!(h.layer.state(), LayerState::Uninitialized);

    let partial = AxesProps::default()
        .with_scale(Axis::X, uniform([0.0, 1.0], [0.0, 1.0]))
        .with_scale(Axis::Y, uniform([0.0, 1.0], [0.0, 1.0]));
    h.set_props(partial).unwrap();

    assert_eq!(h.layer.state(), LayerState::Uninitialized);
    assert!(h.layer.atlas().is_none());
    assert!(h.frame().unwrap().is_empty());
    assert_eq!(h.renderer.live_models(), 0);
    assert_eq!(h.renderer.textures_created(), 0);
}

#[test]
fn test_uniform_ticks_span_range() {
    let mut h = Harness::new();
    let scale = uniform([0.0, 100.0], [-1.0, 1.0]);
    let props = props_with(scale.clone(), scale.clone(), scale).with_ticks_count(5);
    h.set_props(props).unwrap();

    assert_eq!(h.layer.state(), LayerState::Clean);
    let x = &h.layer.ticks().x;
    let values: Vec<f64> = x.iter().map(|t| t.value).collect();
    let positions: Vec<f64> = x.iter().map(|t| t.position).collect();
    assert_eq!(values, vec![0.0, 25.0, 50.0, 75.0, 100.0]);
    assert_eq!(positions, vec![-1.0, -0.5, 0.0, 0.5, 1.0]);
    assert_eq!(x[4].text, "100.00");
}

#[test]
fn test_recompute_produces_consistent_instances() {
    let mut h = Harness::new();
    let props = props_with(
        uniform([0.0, 1.0], [0.0, 1.0]),
        uniform([0.0, 1.0], [0.0, 1.0]),
        uniform([0.0, 1.0], [0.0, 1.0]),
    )
    .with_ticks_count(3)
    .with_format_tick(|value, axis| Ok(format!("{axis}{value}")));
    h.set_props(props).unwrap();

    let draws = h.frame().unwrap();
    assert_eq!(draws.len(), 2);

    let ticks = h.layer.ticks();
    let expected = ticks.x.len() + ticks.z.len() + ticks.y.len();
    assert_eq!(expected, 9);
    assert_eq!(h.layer.num_instances(), expected);

    // Grid and label draws see the same instance count.
    assert_eq!(draws[0].instance_count, expected);
    assert_eq!(draws[1].instance_count, expected);
    assert!(draws[0].label.is_none());

    let label = draws[1].label.as_ref().unwrap();
    assert_eq!(label.label_widths.len(), expected);
    assert_eq!(h.layer.atlas().unwrap().columns().len(), expected);

    // Columns follow the (x, z, y) concatenation.
    let texts: Vec<&str> = ticks.labels().map(|t| t.text.as_str()).collect();
    assert_eq!(
        texts,
        vec!["x0", "x0.5", "x1", "z0", "z0.5", "z1", "y0", "y0.5", "y1"]
    );
    let widths: Vec<f32> = texts.iter().map(|t| 4.0 * t.len() as f32).collect();
    assert_eq!(label.label_widths, widths);
    let total: f32 = widths.iter().sum();
    assert_eq!(label.label_texture_dim[0], total);
}

#[test]
fn test_instance_buffers_reach_both_models() {
    let mut h = Harness::new();
    let props = props_with(
        uniform([0.0, 1.0], [-1.0, 1.0]),
        uniform([0.0, 1.0], [10.0, 20.0]),
        uniform([0.0, 1.0], [5.0, 6.0]),
    )
    .with_ticks_count(2);
    h.set_props(props).unwrap();
    let draws = h.frame().unwrap();

    let grids = h.renderer.model(draws[0].model).unwrap();
    let labels = h.renderer.model(draws[1].model).unwrap();
    assert_eq!(grids.id, "axes-grids");
    assert_eq!(labels.id, "axes-labels");
    assert_eq!(grids.program, PROGRAMS.grid);
    assert_eq!(labels.program, PROGRAMS.labels);
    assert_eq!(grids.geometry.draw_mode, DrawMode::Lines);
    assert_eq!(labels.geometry.draw_mode, DrawMode::Triangles);

    let positions = &grids.attributes["instancePositions"];
    // x ticks in slot 0, z ticks in slot 1, y ticks in slot 2.
    assert_eq!(
        positions,
        &vec![-1.0, 0.0, 1.0, 0.0, 5.0, 1.0, 6.0, 1.0, 10.0, 2.0, 20.0, 2.0]
    );
    assert_eq!(&labels.attributes["instancePositions"], positions);

    let normals = &labels.attributes["instanceNormals"];
    assert_eq!(&normals[..6], &[1.0, 0.0, 0.0, 1.0, 0.0, 0.0]);
    assert_eq!(&normals[6..12], &[0.0, 1.0, 0.0, 0.0, 1.0, 0.0]);
    assert_eq!(&normals[12..], &[0.0, 0.0, 1.0, 0.0, 0.0, 1.0]);
}

#[test]
fn test_grid_bounds_in_render_order() {
    let mut h = Harness::new();
    let props = props_with(
        uniform([0.0, 1.0], [-1.0, 1.0]),
        uniform([0.0, 1.0], [0.0, 4.0]),
        uniform([0.0, 1.0], [10.0, 16.0]),
    );
    let props = AxesProps {
        config: AxesConfig {
            padding: 0.1,
            color: [10, 20, 30, 255],
            ..AxesConfig::with_device_pixel_ratio(2.0)
        },
        ..props
    };
    h.set_props(props).unwrap();

    assert_eq!(h.layer.grid_dims(), Vec3::new(2.0, 6.0, 4.0));
    assert_eq!(h.layer.grid_center(), Vec3::new(0.0, 13.0, 2.0));

    let draws = h.frame().unwrap();
    for draw in &draws {
        assert_eq!(draw.uniforms.grid_dims, [2.0, 6.0, 4.0]);
        assert_eq!(draw.uniforms.grid_center, [0.0, 13.0, 2.0]);
        assert_eq!(draw.uniforms.font_size, 24.0);
        assert_eq!(draw.uniforms.grid_offset, 0.1);
        assert_eq!(draw.uniforms.stroke_color, [10.0, 20.0, 30.0, 255.0]);
    }
    assert_eq!(draws[1].label.as_ref().unwrap().label_height, 24.0);
}

#[test]
fn test_successive_reassignments_leave_one_atlas() {
    let mut h = Harness::new();
    let props = unit_props();
    h.set_props(props.clone()).unwrap();
    h.frame().unwrap();

    let props = props.with_scale(Axis::X, uniform([0.0, 50.0], [-1.0, 1.0]));
    h.set_props(props.clone()).unwrap();
    let props = props.with_scale(Axis::Z, uniform([0.0, 5.0], [-1.0, 1.0]));
    h.set_props(props).unwrap();

    assert_eq!(h.renderer.textures_created(), 3);
    assert_eq!(h.renderer.textures_released(), 2);
    assert_eq!(h.renderer.live_textures(), 1);
    let atlas = h.layer.atlas().unwrap();
    assert!(h.renderer.has_texture(atlas.texture()));

    let draws = h.frame().unwrap();
    assert_eq!(
        draws[1].label.as_ref().unwrap().texture,
        h.layer.atlas().unwrap().texture()
    );
}

#[test]
fn test_unrelated_prop_changes_do_not_recompute() {
    let mut h = Harness::new();
    let props = unit_props();
    h.set_props(props.clone()).unwrap();
    h.frame().unwrap();
    let calls = h.rasterizer.calls();
    let generation = h.layer.attributes().generation();

    let mut restyled = props;
    restyled.config.padding = 0.5;
    restyled.config.color = [255, 0, 0, 255];
    h.set_props(restyled).unwrap();
    let draws = h.frame().unwrap();

    assert_eq!(h.rasterizer.calls(), calls);
    assert_eq!(h.layer.attributes().generation(), generation);
    assert_eq!(h.renderer.textures_created(), 1);
    assert_eq!(draws[0].uniforms.grid_offset, 0.5);
    assert_eq!(draws[0].uniforms.stroke_color, [255.0, 0.0, 0.0, 255.0]);
}

#[test]
fn test_font_size_change_rebuilds_atlas() {
    let mut h = Harness::new();
    let props = unit_props();
    h.set_props(props.clone()).unwrap();
    assert_eq!(h.layer.atlas().unwrap().height(), 12);

    let mut larger = props;
    larger.config.font_size = 20.0;
    h.set_props(larger).unwrap();
    assert_eq!(h.layer.atlas().unwrap().height(), 20);
    assert_eq!(h.renderer.live_textures(), 1);
}

#[test]
fn test_ticks_count_change_recomputes() {
    let mut h = Harness::new();
    h.set_props(unit_props().with_ticks_count(3)).unwrap();
    h.frame().unwrap();
    assert_eq!(h.layer.num_instances(), 9);

    h.set_props(unit_props().with_ticks_count(4)).unwrap();
    h.frame().unwrap();
    assert_eq!(h.layer.num_instances(), 12);
}

#[test]
fn test_draw_never_recomputes() {
    let mut h = Harness::new();
    h.set_props(unit_props()).unwrap();
    h.frame().unwrap();
    let calls = h.rasterizer.calls();
    let generation = h.layer.attributes().generation();

    for _ in 0..3 {
        let draws = h.frame().unwrap();
        assert_eq!(draws.len(), 2);
    }
    assert_eq!(h.rasterizer.calls(), calls);
    assert_eq!(h.layer.attributes().generation(), generation);
}

#[test]
fn test_draw_skips_stale_buffers() {
    let mut h = Harness::new();
    h.layer.initialize(&mut h.renderer).unwrap();
    h.set_props(unit_props()).unwrap();

    // Atlas is ready but update() has not run yet.
    assert!(h.layer.atlas().is_some());
    h.layer.draw(&mut h.renderer).unwrap();
    assert!(h.renderer.draws().is_empty());

    assert_eq!(h.frame().unwrap().len(), 2);
}

#[test]
fn test_zero_ticks_count_is_harmless() {
    let mut h = Harness::new();
    h.set_props(unit_props().with_ticks_count(0)).unwrap();

    assert_eq!(h.layer.state(), LayerState::Clean);
    assert!(h.layer.ticks().is_empty());
    assert!(h.layer.atlas().is_none());
    assert!(h.frame().unwrap().is_empty());
    assert_eq!(h.layer.num_instances(), 0);
}

#[test]
fn test_collapsed_axis_contributes_no_instances() {
    let mut h = Harness::new();
    let props = props_with(
        uniform([0.0, 1.0], [0.0, 1.0]),
        uniform([2.0, 2.0], [0.0, 1.0]),
        uniform([0.0, 1.0], [0.0, 1.0]),
    )
    .with_ticks_count(4);
    h.set_props(props).unwrap();
    let draws = h.frame().unwrap();

    assert!(h.layer.ticks().y.is_empty());
    assert_eq!(h.layer.num_instances(), 8);
    assert_eq!(draws[1].label.as_ref().unwrap().label_widths.len(), 8);
}

#[test]
fn test_unavailable_rasterizer_skips_labels() {
    let mut h = Harness::new();
    h.rasterizer = BlockRasterizer::new(4).unavailable();
    h.set_props(unit_props()).unwrap();

    assert_eq!(h.layer.state(), LayerState::Clean);
    assert!(h.layer.atlas().is_none());
    assert!(h.frame().unwrap().is_empty());

    // A later recompute with a working rasterizer recovers.
    h.rasterizer = BlockRasterizer::new(4);
    h.set_props(unit_props()).unwrap();
    assert!(h.layer.atlas().is_some());
    assert_eq!(h.frame().unwrap().len(), 2);
}

#[test]
fn test_formatter_error_leaves_layer_dirty() {
    let mut h = Harness::new();
    let props = unit_props();
    h.set_props(props.clone()).unwrap();
    h.frame().unwrap();
    let old_texture = h.layer.atlas().unwrap().texture();
    let old_ticks = h.layer.ticks().clone();

    let broken = props
        .with_scale(Axis::X, uniform([0.0, 2.0], [-1.0, 1.0]))
        .with_format_tick(|value, axis| {
            if axis == Axis::Z {
                Err(AxesError::Format {
                    axis,
                    value,
                    message: "unsupported".to_string(),
                })
            } else {
                Ok(format!("{value}"))
            }
        });
    let err = h.set_props(broken.clone()).unwrap_err();
    assert!(matches!(err, AxesError::Format { axis: Axis::Z, .. }));
    assert_eq!(h.layer.state(), LayerState::Dirty);

    // Previous derived data is untouched and still drawable.
    assert_eq!(h.layer.ticks(), &old_ticks);
    assert_eq!(h.layer.atlas().unwrap().texture(), old_texture);
    assert_eq!(h.frame().unwrap().len(), 2);

    // Same scales with a fixed formatter finish the pending recompute.
    let fixed = broken.with_format_tick(|value, _| Ok(format!("{value:.1}")));
    h.set_props(fixed).unwrap();
    assert_eq!(h.layer.state(), LayerState::Clean);
    assert_ne!(h.layer.atlas().unwrap().texture(), old_texture);
    assert_eq!(h.renderer.live_textures(), 1);
    assert_eq!(h.layer.ticks().x.last().unwrap().text, "2.0");
}

#[test]
fn test_rasterizer_error_passes_through() {
    let mut h = Harness::new();
    h.rasterizer = BlockRasterizer::new(4).failing_on("0.00");
    let err = h.set_props(unit_props()).unwrap_err();
    assert!(matches!(err, AxesError::Rasterize(_)));
    assert_eq!(h.layer.state(), LayerState::Dirty);
    assert!(h.layer.atlas().is_none());
}

#[test]
fn test_invalid_config_is_rejected() {
    let mut h = Harness::new();
    let mut props = unit_props();
    props.config.font_size = -3.0;
    assert!(matches!(
        h.set_props(props),
        Err(AxesError::InvalidConfig(_))
    ));
    assert_eq!(h.layer.state(), LayerState::Uninitialized);
}

#[test]
fn test_negative_padding_reaches_uniforms() {
    let mut h = Harness::new();
    let mut props = unit_props();
    props.config.padding = -0.1;
    h.set_props(props).unwrap();

    assert_eq!(h.layer.state(), LayerState::Clean);
    let draws = h.frame().unwrap();
    assert_eq!(draws.len(), 2);
    assert_eq!(draws[0].uniforms.grid_offset, -0.1);
}

#[test]
fn test_removed_scale_keeps_last_complete_data() {
    let mut h = Harness::new();
    let props = unit_props();
    h.set_props(props.clone()).unwrap();
    h.frame().unwrap();
    let ticks = h.layer.ticks().clone();
    let texture = h.layer.atlas().unwrap().texture();
    let calls = h.rasterizer.calls();

    let partial = AxesProps {
        y_scale: None,
        ..props
    };
    h.set_props(partial).unwrap();

    assert_eq!(h.layer.state(), LayerState::Clean);
    assert!(h.layer.props().y_scale.is_none());
    assert_eq!(h.layer.ticks(), &ticks);
    assert_eq!(h.layer.atlas().unwrap().texture(), texture);
    assert_eq!(h.rasterizer.calls(), calls);
    assert_eq!(h.frame().unwrap().len(), 2);
}

#[test]
fn test_atlas_font_size_overrides_raster_height() {
    let mut h = Harness::new();
    let mut props = unit_props();
    props.config.atlas_font_size = Some(48.0);
    h.set_props(props).unwrap();
    let draws = h.frame().unwrap();

    assert_eq!(h.layer.atlas().unwrap().height(), 48);
    assert_eq!(draws[1].uniforms.font_size, 12.0);
    assert_eq!(draws[1].label.as_ref().unwrap().label_height, 48.0);
}

#[test]
fn test_dispose_releases_everything() {
    let mut h = Harness::new();
    h.set_props(unit_props()).unwrap();
    h.frame().unwrap();
    assert_eq!(h.renderer.live_models(), 2);
    assert_eq!(h.renderer.live_textures(), 1);

    h.layer.dispose(&mut h.renderer);
    assert_eq!(h.layer.state(), LayerState::Uninitialized);
    assert_eq!(h.renderer.live_models(), 0);
    assert_eq!(h.renderer.live_textures(), 0);
    assert!(h.frame().unwrap().is_empty());

    // The layer can be brought back up on the same renderer.
    h.set_props(unit_props()).unwrap();
    assert_eq!(h.frame().unwrap().len(), 2);
    assert_eq!(h.renderer.live_models(), 2);
}

#[test]
fn test_init_logging_is_idempotent() {
    init_logging();
    init_logging();
}

proptest! {
    #[test]
    fn prop_instances_match_tick_counts(
        count in 0usize..12,
        x_span in 0.0f64..100.0,
        y_span in 0.0f64..100.0,
        z_span in 0.0f64..100.0,
        nice in any::<bool>(),
    ) {
        let strategy = if nice { TickStrategy::Nice } else { TickStrategy::Uniform };
        let scale = |span: f64| -> Rc<dyn Scale> {
            Rc::new(LinearScale::new([0.0, span], [-1.0, 1.0]).with_strategy(strategy))
        };
        let mut h = Harness::new();
        h.set_props(props_with(scale(x_span), scale(y_span), scale(z_span)).with_ticks_count(count))
            .unwrap();
        let draws = h.frame().unwrap();

        let ticks = h.layer.ticks();
        let total = ticks.x.len() + ticks.z.len() + ticks.y.len();
        prop_assert_eq!(h.layer.num_instances(), total);

        if total == 0 {
            prop_assert!(h.layer.atlas().is_none());
            prop_assert!(draws.is_empty());
        } else {
            let atlas = h.layer.atlas().unwrap();
            prop_assert_eq!(atlas.columns().len(), total);
            prop_assert_eq!(atlas.width(), atlas.column_widths().iter().sum::<u32>());
            prop_assert_eq!(draws[0].instance_count, total);
            prop_assert_eq!(draws[1].instance_count, total);
        }
        prop_assert_eq!(h.renderer.live_textures(), usize::from(total > 0));
    }
}

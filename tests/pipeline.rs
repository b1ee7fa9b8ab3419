// tests/pipeline.rs

//! End-to-end pipeline tests: a surface drawn through a renderer onto the
//! headless recording backend.

use test_log::test;

use glyphgrid::backend::{BatchTarget, RenderBackend, TextureId};
use glyphgrid::backends::headless::{HeadlessBackend, RecordedBatch};
use glyphgrid::cell::Cell;
use glyphgrid::draw::{DrawCall, DrawOp, OrderingBand};
use glyphgrid::geometry::{CellRect, PixelRect, Point};
use glyphgrid::renderer::Renderer;
use glyphgrid::screen::{Control, ControlLayer, Cursor, Entity, EntityLayer, Screen};
use glyphgrid::surface::Surface;
use glyphgrid::{Color, Rgba};

/// Glyph ops recorded in texture-targeted batches, in submission order.
fn glyph_ops_in_texture_batches(backend: &HeadlessBackend) -> Vec<DrawOp> {
    backend
        .batches()
        .iter()
        .filter(|b| matches!(b.target, BatchTarget::Texture(_)))
        .flat_map(|b| b.ops.iter().cloned())
        .filter(|op| matches!(op.call, DrawCall::Glyph { .. }))
        .collect()
}

/// Texture-targeted batches other than the composed-output batch, i.e. the
/// per-layer cache redraws recorded this frame.
fn layer_redraw_batches(backend: &HeadlessBackend, output: TextureId) -> Vec<&RecordedBatch> {
    backend
        .batches()
        .iter()
        .filter(|b| matches!(b.target, BatchTarget::Texture(t) if t != output))
        .collect()
}

#[test]
fn first_frame_draws_every_cell_then_collapses_to_one_blit() {
    let mut backend = HeadlessBackend::new();
    let mut surface = Surface::new(10, 1);
    surface.print(0, 0, "ABCDEFGHIJ", None, None);
    let mut screen = Screen::new(surface);
    let mut renderer = Renderer::new();
    renderer.attach(&screen);

    renderer.tick(&mut screen, &mut backend, false).unwrap();

    // The surface layer redraw covers all ten cells, left to right.
    let glyphs = glyph_ops_in_texture_batches(&backend);
    assert_eq!(glyphs.len(), 10);
    let mut last_x = -1;
    for (i, op) in glyphs.iter().enumerate() {
        let DrawCall::Glyph { cell, rect, .. } = &op.call else {
            unreachable!();
        };
        assert_eq!(cell.glyph, u16::from(b'A') + i as u16);
        assert!(rect.x > last_x);
        last_x = rect.x;
    }

    // The presented frame is a single blit of the composed output.
    let screen_ops = backend.screen_ops();
    assert_eq!(screen_ops.len(), 1);
    assert!(screen_ops[0].is_texture_blit());
    assert_eq!(screen_ops[0].band, OrderingBand::OutputBlit);

    // A second tick with nothing dirty regenerates no layer at all.
    backend.clear_recording();
    renderer.tick(&mut screen, &mut backend, false).unwrap();
    assert!(glyph_ops_in_texture_batches(&backend).is_empty());
    let screen_ops = backend.screen_ops();
    assert_eq!(screen_ops.len(), 1);
    assert!(screen_ops[0].is_texture_blit());
}

#[test]
fn composed_output_is_rebuilt_from_cleared_state() {
    let mut backend = HeadlessBackend::new();
    let mut screen = Screen::new(Surface::new(4, 2));
    let mut renderer = Renderer::new();
    renderer.attach(&screen);

    renderer.tick(&mut screen, &mut backend, false).unwrap();

    let output = renderer.output_texture().unwrap();
    let composing: Vec<_> = backend
        .batches()
        .iter()
        .filter(|b| b.target == BatchTarget::Texture(output))
        .collect();
    assert_eq!(composing.len(), 1);
    assert_eq!(composing[0].cleared, Some(Rgba::TRANSPARENT));
    // Only the surface layer blends in; the tint is transparent.
    assert_eq!(composing[0].ops.len(), 1);
    assert!(composing[0].ops[0].is_texture_blit());
}

#[test]
fn cursor_draws_above_the_output_blit() {
    let mut backend = HeadlessBackend::new();
    let mut screen = Screen::new(Surface::new(4, 2));
    screen.set_cursor(Some(Cursor::new()));
    let mut renderer = Renderer::new();
    renderer.attach(&screen);

    renderer.tick(&mut screen, &mut backend, false).unwrap();

    let ops = backend.screen_ops();
    assert_eq!(ops.len(), 2);
    assert_eq!(ops[0].band, OrderingBand::OutputBlit);
    assert_eq!(ops[1].band, OrderingBand::Cursor);
    match &ops[1].call {
        DrawCall::Glyph { cell, .. } => assert_eq!(cell.glyph, 219),
        other => panic!("expected the cursor glyph, got {:?}", other),
    }
}

#[test]
fn opaque_tint_replaces_the_output_blit() {
    let mut backend = HeadlessBackend::new();
    let mut surface = Surface::new(4, 2);
    surface.set_tint(Rgba::new(0, 0, 0, 255));
    let mut screen = Screen::new(surface);
    let mut renderer = Renderer::new();
    renderer.attach(&screen);

    renderer.tick(&mut screen, &mut backend, false).unwrap();

    let ops = backend.screen_ops();
    assert_eq!(ops.len(), 1);
    assert_eq!(ops[0].band, OrderingBand::Tint);
    match &ops[0].call {
        DrawCall::SolidColor { color, rect } => {
            assert_eq!(*color, Rgba::new(0, 0, 0, 255));
            assert_eq!((rect.width, rect.height), screen.pixel_size());
        }
        other => panic!("expected a tint fill, got {:?}", other),
    }
}

#[test]
fn translucent_tint_draws_above_the_output_blit() {
    let mut backend = HeadlessBackend::new();
    let mut surface = Surface::new(4, 2);
    surface.set_tint(Rgba::new(255, 0, 0, 128));
    let mut screen = Screen::new(surface);
    let mut renderer = Renderer::new();
    renderer.attach(&screen);

    renderer.tick(&mut screen, &mut backend, false).unwrap();

    let ops = backend.screen_ops();
    assert_eq!(ops.len(), 2);
    assert_eq!(ops[0].band, OrderingBand::OutputBlit);
    assert_eq!(ops[1].band, OrderingBand::Tint);
}

#[test]
fn resize_reallocates_the_output_and_recomposes() {
    let mut backend = HeadlessBackend::new();
    let mut screen = Screen::new(Surface::new(10, 5));
    let mut renderer = Renderer::new();
    renderer.attach(&screen);

    renderer.tick(&mut screen, &mut backend, false).unwrap();
    let first_output = renderer.output_texture().unwrap();

    screen.surface.resize(20, 3);
    let recomposed = renderer.refresh(&mut screen, &mut backend, false).unwrap();
    assert!(recomposed);

    let output = renderer.output_texture().unwrap();
    assert_ne!(output, first_output);
    assert_eq!(backend.texture_size(output), Some(screen.pixel_size()));
    // The stale output was released.
    assert_eq!(backend.texture_size(first_output), None);
}

#[test]
fn editing_one_cell_regenerates_only_the_surface_layer() {
    let mut backend = HeadlessBackend::new();
    let mut screen = Screen::new(Surface::new(6, 3));
    let mut renderer = Renderer::new();
    renderer.attach(&screen);

    renderer.tick(&mut screen, &mut backend, false).unwrap();
    let allocations = backend.allocation_count();
    backend.clear_recording();

    screen
        .surface
        .set_cell(2, 1, Cell::new(64, Color::WHITE, Color::BLACK));
    assert!(renderer.refresh(&mut screen, &mut backend, false).unwrap());

    // The cache is redrawn in place; no texture churn.
    assert_eq!(backend.allocation_count(), allocations);
    assert!(!glyph_ops_in_texture_batches(&backend).is_empty());
}

#[test]
fn detached_pipeline_releases_every_texture() {
    let mut backend = HeadlessBackend::new();
    let mut screen = Screen::new(Surface::new(4, 2));
    screen.set_cursor(Some(Cursor::new()));
    let mut renderer = Renderer::new();
    renderer.attach(&screen);

    renderer.tick(&mut screen, &mut backend, false).unwrap();
    assert!(backend.live_texture_count() > 0);

    renderer.detach(&mut backend);
    assert_eq!(backend.live_texture_count(), 0);

    // Reattach and render again from scratch.
    renderer.attach(&screen);
    screen.surface.mark_dirty();
    renderer.tick(&mut screen, &mut backend, false).unwrap();
    assert!(renderer.output_texture().is_some());
}

#[test]
fn failed_reallocation_keeps_presenting_the_previous_output() {
    let mut backend = HeadlessBackend::new();
    let mut screen = Screen::new(Surface::new(10, 5));
    let mut renderer = Renderer::new();
    renderer.attach(&screen);

    renderer.tick(&mut screen, &mut backend, false).unwrap();
    let previous = renderer.output_texture().unwrap();

    screen.surface.resize(20, 3);
    backend.fail_next_allocation();
    assert!(renderer.refresh(&mut screen, &mut backend, false).is_err());

    // The stale output survives the aborted tick and is still presented.
    assert_eq!(backend.texture_size(previous), Some((80, 80)));
    assert_eq!(renderer.output_texture(), Some(previous));

    backend.clear_recording();
    renderer.render(&screen, &mut backend).unwrap();
    renderer.flush(&mut backend).unwrap();
    let ops = backend.screen_ops();
    assert_eq!(ops.len(), 1);
    match &ops[0].call {
        DrawCall::Texture { texture, .. } => assert_eq!(*texture, previous),
        other => panic!("expected the previous output blit, got {:?}", other),
    }

    // The next tick retries the allocation and replaces the output.
    renderer.tick(&mut screen, &mut backend, false).unwrap();
    let output = renderer.output_texture().unwrap();
    assert_ne!(output, previous);
    assert_eq!(backend.texture_size(output), Some(screen.pixel_size()));
    assert_eq!(backend.texture_size(previous), None);
}

#[test]
fn moving_an_entity_regenerates_only_the_entity_layer() {
    let mut backend = HeadlessBackend::new();
    let mut screen = Screen::new(Surface::new(6, 3));
    let mut layer = EntityLayer::new();
    layer.add_entity(Entity::new(
        Point::new(1, 1),
        Cell::new(64, Color::WHITE, Color::BLACK),
    ));
    screen.set_entities(Some(layer));
    let mut renderer = Renderer::new();
    renderer.attach(&screen);

    renderer.tick(&mut screen, &mut backend, false).unwrap();
    let output = renderer.output_texture().unwrap();
    let allocations = backend.allocation_count();
    backend.clear_recording();

    screen.entities_mut().unwrap().entities_mut()[0].position = Point::new(4, 2);
    assert!(renderer.refresh(&mut screen, &mut backend, false).unwrap());

    // Only the entity cache is redrawn, in place, at the new position.
    let redraws = layer_redraw_batches(&backend, output);
    assert_eq!(redraws.len(), 1);
    assert_eq!(redraws[0].ops.len(), 1);
    match &redraws[0].ops[0].call {
        DrawCall::Glyph {
            cell,
            rect,
            draw_background,
        } => {
            assert_eq!(cell.glyph, 64);
            assert!(!draw_background);
            assert_eq!(*rect, PixelRect::new(32, 32, 8, 16));
        }
        other => panic!("expected the entity glyph, got {:?}", other),
    }
    assert_eq!(backend.allocation_count(), allocations);
}

#[test]
fn control_cells_draw_at_their_bounds_offset_and_disabled_controls_are_skipped() {
    let mut backend = HeadlessBackend::new();
    let mut screen = Screen::new(Surface::new(6, 3));
    let mut layer = ControlLayer::new();

    let mut button = Control::new(CellRect::new(2, 1, 2, 1));
    button.surface.print(0, 0, "OK", None, None);
    layer.add_control(button);

    let mut hidden = Control::new(CellRect::new(0, 0, 2, 1));
    hidden.enabled = false;
    hidden.surface.print(0, 0, "XX", None, None);
    layer.add_control(hidden);

    screen.set_controls(Some(layer));
    let mut renderer = Renderer::new();
    renderer.attach(&screen);

    renderer.tick(&mut screen, &mut backend, false).unwrap();

    // The host surface is blank, so every recorded glyph belongs to the
    // enabled control, offset by its bounds.
    let glyphs = glyph_ops_in_texture_batches(&backend);
    assert_eq!(glyphs.len(), 2);
    let expected = [(u16::from(b'O'), 16), (u16::from(b'K'), 24)];
    for (op, (glyph, x)) in glyphs.iter().zip(expected) {
        match &op.call {
            DrawCall::Glyph {
                cell,
                rect,
                draw_background,
            } => {
                assert_eq!(cell.glyph, glyph);
                assert!(*draw_background);
                assert_eq!(*rect, PixelRect::new(x, 16, 8, 16));
            }
            other => panic!("expected a control glyph, got {:?}", other),
        }
    }
}

#[test]
fn host_updated_redraws_the_control_layer_on_the_next_refresh() {
    let mut backend = HeadlessBackend::new();
    let mut screen = Screen::new(Surface::new(6, 3));
    let mut layer = ControlLayer::new();
    let mut button = Control::new(CellRect::new(1, 0, 2, 1));
    button.surface.print(0, 0, "OK", None, None);
    layer.add_control(button);
    screen.set_controls(Some(layer));
    let mut renderer = Renderer::new();
    renderer.attach(&screen);

    renderer.tick(&mut screen, &mut backend, false).unwrap();
    let output = renderer.output_texture().unwrap();
    let allocations = backend.allocation_count();
    backend.clear_recording();

    // With nothing dirty, a host notification alone forces the control
    // layer to regenerate on the next refresh.
    renderer.host_updated(&screen);
    assert!(renderer.refresh(&mut screen, &mut backend, false).unwrap());

    let redraws = layer_redraw_batches(&backend, output);
    assert_eq!(redraws.len(), 1);
    assert_eq!(redraws[0].cleared, Some(Rgba::TRANSPARENT));
    assert_eq!(redraws[0].ops.len(), 2);
    assert_eq!(backend.allocation_count(), allocations);

    // The notification is consumed; the frame after is clean again.
    backend.clear_recording();
    assert!(!renderer.refresh(&mut screen, &mut backend, false).unwrap());
    assert!(layer_redraw_batches(&backend, output).is_empty());
}

#[test]
fn texture_ids_stay_distinct_across_reallocation() {
    let mut backend = HeadlessBackend::new();
    let mut screen = Screen::new(Surface::new(4, 2));
    let mut renderer = Renderer::new();
    renderer.attach(&screen);

    let mut seen: Vec<TextureId> = Vec::new();
    for _ in 0..3 {
        renderer.tick(&mut screen, &mut backend, false).unwrap();
        seen.push(renderer.output_texture().unwrap());
        let (w, h) = (screen.surface.width(), screen.surface.height());
        screen.surface.resize(w + 1, h);
    }
    seen.sort();
    seen.dedup();
    assert_eq!(seen.len(), 3);
}

// src/screen.rs

//! The [`Screen`]: one [`Surface`] plus orthogonal capability components.
//!
//! Rather than a hierarchy of surface subclasses, a screen is a plain data
//! struct that may carry a cursor, a control layer, and an entity layer.
//! The renderer inspects which components are present when it attaches and
//! wires the matching render steps.

use std::sync::Arc;

use crate::cell::Cell;
use crate::color::Color;
use crate::font::{default_font, Font};
use crate::geometry::{CellRect, Point};
use crate::surface::Surface;

/// A blinking cell cursor.
#[derive(Debug, Clone)]
pub struct Cursor {
    pub position: Point,
    pub visible: bool,
    /// Ticks per blink phase; 0 disables blinking (always on).
    pub blink_rate: u32,
    appearance: Cell,
    ticks: u32,
    phase_on: bool,
}

impl Cursor {
    pub fn new() -> Self {
        Self {
            position: Point::new(0, 0),
            visible: true,
            blink_rate: 30,
            // Full block in the classic code-page layout.
            appearance: Cell::new(219, Color::WHITE, Color::BLACK),
            ticks: 0,
            phase_on: true,
        }
    }

    pub fn appearance(&self) -> Cell {
        self.appearance
    }

    pub fn set_appearance(&mut self, appearance: Cell) {
        self.appearance = appearance;
    }

    /// Advances the blink phase by one tick.
    pub fn tick(&mut self) {
        if self.blink_rate == 0 {
            self.phase_on = true;
            return;
        }
        self.ticks += 1;
        if self.ticks >= self.blink_rate {
            self.ticks = 0;
            self.phase_on = !self.phase_on;
        }
    }

    /// Restarts the blink cycle in the visible phase, e.g. after movement.
    pub fn restart_blink(&mut self) {
        self.ticks = 0;
        self.phase_on = true;
    }

    /// True while the blink phase is showing the cursor.
    pub fn is_phase_on(&self) -> bool {
        self.phase_on
    }
}

impl Default for Cursor {
    fn default() -> Self {
        Self::new()
    }
}

/// One control: a small surface positioned inside the host grid.
#[derive(Debug, Clone)]
pub struct Control {
    /// Placement inside the host grid, in cells.
    pub bounds: CellRect,
    pub surface: Surface,
    pub enabled: bool,
    pub focused: bool,
}

impl Control {
    pub fn new(bounds: CellRect) -> Self {
        let surface = Surface::new(bounds.width.max(1), bounds.height.max(1));
        Self {
            bounds,
            surface,
            enabled: true,
            focused: false,
        }
    }
}

/// The control-host capability: a set of controls drawn above the surface.
#[derive(Debug, Clone, Default)]
pub struct ControlLayer {
    controls: Vec<Control>,
    dirty: bool,
}

impl ControlLayer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_control(&mut self, control: Control) {
        self.controls.push(control);
        self.dirty = true;
    }

    pub fn controls(&self) -> &[Control] {
        &self.controls
    }

    pub fn controls_mut(&mut self) -> &mut [Control] {
        self.dirty = true;
        &mut self.controls
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty || self.controls.iter().any(|c| c.surface.is_dirty())
    }

    pub fn mark_dirty(&mut self) {
        self.dirty = true;
    }

    pub(crate) fn clear_dirty(&mut self) {
        self.dirty = false;
        for control in &mut self.controls {
            control.surface.clear_dirty();
        }
    }
}

/// One entity: a free-floating cell appearance at a grid position.
#[derive(Debug, Clone)]
pub struct Entity {
    pub position: Point,
    pub appearance: Cell,
    pub visible: bool,
}

impl Entity {
    pub fn new(position: Point, appearance: Cell) -> Self {
        Self {
            position,
            appearance,
            visible: true,
        }
    }
}

/// The entity capability: cells drawn above the surface without living in it.
#[derive(Debug, Clone, Default)]
pub struct EntityLayer {
    entities: Vec<Entity>,
    dirty: bool,
}

impl EntityLayer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_entity(&mut self, entity: Entity) {
        self.entities.push(entity);
        self.dirty = true;
    }

    pub fn entities(&self) -> &[Entity] {
        &self.entities
    }

    pub fn entities_mut(&mut self) -> &mut [Entity] {
        self.dirty = true;
        &mut self.entities
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    pub fn mark_dirty(&mut self) {
        self.dirty = true;
    }

    pub(crate) fn clear_dirty(&mut self) {
        self.dirty = false;
    }
}

/// A renderable screen object: the surface plus whichever capability
/// components its owner attached.
pub struct Screen {
    pub surface: Surface,
    font: Arc<dyn Font>,
    cursor: Option<Cursor>,
    controls: Option<ControlLayer>,
    entities: Option<EntityLayer>,
}

impl Screen {
    /// Wraps a surface with the built-in font and no extra capabilities.
    pub fn new(surface: Surface) -> Self {
        Self::with_font(surface, default_font())
    }

    pub fn with_font(surface: Surface, font: Arc<dyn Font>) -> Self {
        Self {
            surface,
            font,
            cursor: None,
            controls: None,
            entities: None,
        }
    }

    pub fn font(&self) -> &dyn Font {
        self.font.as_ref()
    }

    /// Pixel size of the composed output for this screen.
    pub fn pixel_size(&self) -> (u32, u32) {
        self.surface.pixel_size(self.font.as_ref())
    }

    pub fn cursor(&self) -> Option<&Cursor> {
        self.cursor.as_ref()
    }

    pub fn cursor_mut(&mut self) -> Option<&mut Cursor> {
        self.cursor.as_mut()
    }

    pub fn set_cursor(&mut self, cursor: Option<Cursor>) {
        self.cursor = cursor;
    }

    pub fn controls(&self) -> Option<&ControlLayer> {
        self.controls.as_ref()
    }

    pub fn controls_mut(&mut self) -> Option<&mut ControlLayer> {
        self.controls.as_mut()
    }

    pub fn set_controls(&mut self, controls: Option<ControlLayer>) {
        self.controls = controls;
    }

    pub fn entities(&self) -> Option<&EntityLayer> {
        self.entities.as_ref()
    }

    pub fn entities_mut(&mut self) -> Option<&mut EntityLayer> {
        self.entities.as_mut()
    }

    pub fn set_entities(&mut self, entities: Option<EntityLayer>) {
        self.entities = entities;
    }

    /// Advances per-tick component state (cursor blink).
    pub fn update(&mut self) {
        if let Some(cursor) = self.cursor.as_mut() {
            cursor.tick();
        }
    }

    pub(crate) fn clear_dirty(&mut self) {
        self.surface.clear_dirty();
        if let Some(controls) = self.controls.as_mut() {
            controls.clear_dirty();
        }
        if let Some(entities) = self.entities.as_mut() {
            entities.clear_dirty();
        }
    }
}

//! Archetype layouts. The draw routine and the hit router both read these
//! rectangles, so a visual button and its click target cannot drift apart.

use serde::{Deserialize, Serialize};

/// Axis-aligned pixel rectangle, origin at the top-left of the surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PixelRect {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

impl PixelRect {
    pub fn new(x: u32, y: u32, width: u32, height: u32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    pub fn right(&self) -> u32 {
        self.x.saturating_add(self.width)
    }

    pub fn bottom(&self) -> u32 {
        self.y.saturating_add(self.height)
    }

    pub fn contains(&self, x: f32, y: f32) -> bool {
        x >= self.x as f32 && x < self.right() as f32 && y >= self.y as f32 && y < self.bottom() as f32
    }

    /// Shrink by `amount` on every side.
    pub fn inset(&self, amount: u32) -> Self {
        let twice = amount.saturating_mul(2);
        Self::new(
            self.x.saturating_add(amount),
            self.y.saturating_add(amount),
            self.width.saturating_sub(twice),
            self.height.saturating_sub(twice),
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ScreenArchetype {
    /// Browser-like: tab strip, address bar, content area.
    TabStrip(TabStripLayout),
    /// Desktop-like: full-bleed content with a bottom task bar.
    TaskBar(TaskBarLayout),
}

impl ScreenArchetype {
    /// Check that the layout fits a `width` x `height` surface. Returns the
    /// first violated constraint.
    pub fn validate(&self, width: u32, height: u32) -> Result<(), String> {
        match self {
            ScreenArchetype::TabStrip(layout) => layout.validate(width, height),
            ScreenArchetype::TaskBar(layout) => layout.validate(width, height),
        }
    }
}

fn fits(value: Option<u32>, limit: u32, what: &str) -> Result<(), String> {
    match value {
        Some(value) if value <= limit => Ok(()),
        Some(value) => Err(format!("{what} ({value}px) exceeds {limit}px")),
        None => Err(format!("{what} overflows")),
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TabStripLayout {
    pub tab_height: u32,
    pub address_bar_height: u32,
    pub address_padding: u32,
    pub address_field_height: u32,
    pub favicon_size: u32,
}

impl Default for TabStripLayout {
    fn default() -> Self {
        Self {
            tab_height: 35,
            address_bar_height: 40,
            address_padding: 10,
            address_field_height: 24,
            favicon_size: 16,
        }
    }
}

impl TabStripLayout {
    pub fn validate(&self, width: u32, height: u32) -> Result<(), String> {
        fits(
            self.tab_height.checked_add(self.address_bar_height),
            height,
            "tab band plus address bar",
        )?;
        fits(Some(self.address_field_height), self.address_bar_height, "address field height")?;
        fits(self.address_padding.checked_mul(2), width, "address padding")?;
        fits(Some(self.favicon_size), self.tab_height, "favicon size")
    }

    /// Tabs split the surface width evenly; edges are rounded down so the
    /// tabs tile the strip without gaps.
    pub fn tab_rect(&self, index: usize, count: usize, surface_width: u32) -> PixelRect {
        let count = count.max(1) as u64;
        let width = surface_width as u64;
        let x0 = (index as u64 * width / count) as u32;
        let x1 = ((index as u64 + 1) * width / count) as u32;
        PixelRect::new(x0, 0, x1.saturating_sub(x0), self.tab_height)
    }

    pub fn address_bar_rect(&self, surface_width: u32) -> PixelRect {
        PixelRect::new(0, self.tab_height, surface_width, self.address_bar_height)
    }

    pub fn address_field_rect(&self, surface_width: u32) -> PixelRect {
        let top = self.tab_height.saturating_add(
            self.address_bar_height
                .saturating_sub(self.address_field_height)
                / 2,
        );
        PixelRect::new(
            self.address_padding,
            top,
            surface_width.saturating_sub(self.address_padding.saturating_mul(2)),
            self.address_field_height,
        )
    }

    pub fn content_rect(&self, surface_width: u32, surface_height: u32) -> PixelRect {
        let top = self
            .tab_height
            .saturating_add(self.address_bar_height)
            .min(surface_height);
        PixelRect::new(0, top, surface_width, surface_height - top)
    }

    /// Tab under a normalized pick, or `None` outside the tab band.
    pub fn tab_at(&self, u: f32, v: f32, count: usize, surface_height: u32) -> Option<usize> {
        if count == 0 || v * surface_height as f32 >= self.tab_height as f32 {
            return None;
        }
        let index = (u * count as f32).floor();
        if index < 0.0 || index >= count as f32 {
            return None;
        }
        Some(index as usize)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TaskBarLayout {
    pub bar_height: u32,
    pub start_button_x: u32,
    pub start_button_size: u32,
    /// Left edge of the first app button.
    pub start_offset: u32,
    pub button_width: u32,
    pub button_spacing: u32,
    pub button_height: u32,
    pub icon_size: u32,
    pub tray_margin: u32,
}

impl Default for TaskBarLayout {
    fn default() -> Self {
        Self {
            bar_height: 40,
            start_button_x: 5,
            start_button_size: 30,
            start_offset: 45,
            button_width: 40,
            button_spacing: 5,
            button_height: 30,
            icon_size: 24,
            tray_margin: 10,
        }
    }
}

impl TaskBarLayout {
    pub fn validate(&self, width: u32, height: u32) -> Result<(), String> {
        fits(Some(self.bar_height), height, "task bar height")?;
        fits(Some(self.button_height), self.bar_height, "app button height")?;
        fits(Some(self.start_button_size), self.bar_height, "start button size")?;
        fits(
            self.start_button_x.checked_add(self.start_button_size),
            width,
            "start button right edge",
        )?;
        fits(Some(self.start_offset), width, "first app button offset")?;
        fits(
            self.button_width.checked_add(self.button_spacing),
            width,
            "app button stride",
        )?;
        fits(Some(self.tray_margin), width, "tray margin")
    }

    pub fn bar_top(&self, surface_height: u32) -> u32 {
        surface_height.saturating_sub(self.bar_height)
    }

    pub fn bar_rect(&self, surface_width: u32, surface_height: u32) -> PixelRect {
        let top = self.bar_top(surface_height);
        PixelRect::new(0, top, surface_width, surface_height - top)
    }

    pub fn content_rect(&self, surface_width: u32, surface_height: u32) -> PixelRect {
        PixelRect::new(0, 0, surface_width, self.bar_top(surface_height))
    }

    fn button_top(&self, surface_height: u32) -> u32 {
        self.bar_top(surface_height)
            .saturating_add(self.bar_height.saturating_sub(self.button_height) / 2)
    }

    pub fn start_button_rect(&self, surface_height: u32) -> PixelRect {
        PixelRect::new(
            self.start_button_x,
            self.button_top(surface_height),
            self.start_button_size,
            self.start_button_size,
        )
    }

    pub fn button_stride(&self) -> u32 {
        self.button_width.saturating_add(self.button_spacing)
    }

    pub fn button_rect(&self, index: usize, surface_height: u32) -> PixelRect {
        let x = self.start_offset as u64 + index as u64 * self.button_stride() as u64;
        PixelRect::new(
            x.min(u32::MAX as u64) as u32,
            self.button_top(surface_height),
            self.button_width,
            self.button_height,
        )
    }

    /// Centered icon box inside `button`.
    pub fn icon_rect(&self, button: PixelRect) -> PixelRect {
        let size = self.icon_size.min(button.width).min(button.height);
        PixelRect::new(
            button.x.saturating_add((button.width - size) / 2),
            button.y.saturating_add((button.height - size) / 2),
            size,
            size,
        )
    }

    /// App button under a normalized pick, or `None` outside the bar or
    /// left of the first button.
    pub fn button_at(
        &self,
        u: f32,
        v: f32,
        count: usize,
        surface_width: u32,
        surface_height: u32,
    ) -> Option<usize> {
        if count == 0 || self.button_stride() == 0 {
            return None;
        }
        let y = v * surface_height as f32;
        if y < self.bar_top(surface_height) as f32 {
            return None;
        }
        let x = u * surface_width as f32;
        if x < self.start_offset as f32 {
            return None;
        }
        let index = ((x - self.start_offset as f32) / self.button_stride() as f32).floor();
        if index >= count as f32 {
            return None;
        }
        Some(index as usize)
    }
}

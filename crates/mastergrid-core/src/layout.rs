//! Key layout generation.
//!
//! A layout is a row-major list of [`KeyZone`]s covering the surface. Row 0 is
//! the bottom band; each row above starts `interval` semitones higher than the
//! one below it. Keys within a row are consecutive semitones laid left to right
//! in equal shares of the row width.

use crate::config::EngineConfig;
use crate::geometry::{Point, Rect, Surface};
use crate::note;

/// One touchable key: a note number and the region that sounds it.
#[derive(Debug, Clone, PartialEq)]
pub struct KeyZone {
    note: i32,
    region: Rect,
    row: usize,
    column: usize,
    center_y: f32,
}

impl KeyZone {
    /// Layout note number. Not clamped to the MIDI range.
    #[inline]
    pub fn note(&self) -> i32 {
        self.note
    }

    /// The note as a MIDI data byte, or `None` when it lies outside 0-127.
    #[inline]
    pub fn midi_note(&self) -> Option<u8> {
        note::midi_note(self.note).ok()
    }

    #[inline]
    pub fn region(&self) -> Rect {
        self.region
    }

    #[inline]
    pub fn row(&self) -> usize {
        self.row
    }

    #[inline]
    pub fn column(&self) -> usize {
        self.column
    }

    #[inline]
    pub fn center_y(&self) -> f32 {
        self.center_y
    }

    #[inline]
    pub fn contains(&self, point: Point) -> bool {
        self.region.contains(point)
    }

    pub fn is_accidental(&self) -> bool {
        note::is_accidental(self.note)
    }

    pub fn label(&self) -> &'static str {
        note::note_name(self.note)
    }
}

/// Immutable key grid built from an [`EngineConfig`] and a surface.
#[derive(Debug, Clone, PartialEq)]
pub struct Layout {
    zones: Vec<KeyZone>,
    rows: usize,
    keys_per_row: usize,
    surface: Surface,
}

/// Position of edge `index` of `count` equal divisions between `near` and `far`.
///
/// The outermost edge is returned exactly so rounding never leaves a sliver.
#[inline]
fn edge(near: f32, far: f32, index: usize, count: usize) -> f32 {
    if index >= count {
        far
    } else {
        near + (far - near) * (index as f32 / count as f32)
    }
}

/// Narrow a widened note number; anything past `i32` is unplayable anyway.
#[inline]
fn saturate(note: i64) -> i32 {
    note.clamp(i64::from(i32::MIN), i64::from(i32::MAX)) as i32
}

impl Layout {
    pub fn empty(surface: Surface) -> Self {
        Self {
            zones: Vec::new(),
            rows: 0,
            keys_per_row: 0,
            surface,
        }
    }

    pub fn build(config: &EngineConfig, surface: Surface) -> Self {
        let rows = config.rows as usize;
        let keys = config.keys_per_row as usize;
        if rows == 0 || keys == 0 {
            return Self::empty(surface);
        }

        let mut zones = Vec::with_capacity(rows * keys);
        for row in 0..rows {
            // Rows grow upward from the bottom of the surface
            let bottom = edge(surface.bottom, surface.top, row, rows);
            let top = edge(surface.bottom, surface.top, row + 1, rows);
            let base_note = i64::from(config.low_note) + row as i64 * i64::from(config.interval);

            for column in 0..keys {
                let left = edge(surface.left, surface.right, column, keys);
                let right = edge(surface.left, surface.right, column + 1, keys);
                let region = Rect::new(left, top, right, bottom);
                zones.push(KeyZone {
                    note: saturate(base_note + column as i64),
                    region,
                    row,
                    column,
                    center_y: region.center_y(),
                });
            }
        }

        Self {
            zones,
            rows,
            keys_per_row: keys,
            surface,
        }
    }

    #[inline]
    pub fn zones(&self) -> &[KeyZone] {
        &self.zones
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.zones.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.zones.is_empty()
    }

    #[inline]
    pub fn rows(&self) -> usize {
        self.rows
    }

    #[inline]
    pub fn keys_per_row(&self) -> usize {
        self.keys_per_row
    }

    #[inline]
    pub fn surface(&self) -> Surface {
        self.surface
    }

    /// Zones of one row, left to right. Empty when `row` is out of range.
    pub fn row(&self, row: usize) -> &[KeyZone] {
        if row >= self.rows {
            return &[];
        }
        let start = row * self.keys_per_row;
        &self.zones[start..start + self.keys_per_row]
    }

    pub fn iter_rows(&self) -> impl Iterator<Item = &[KeyZone]> {
        // chunks() panics on 0; an empty layout has no rows anyway
        self.zones.chunks(self.keys_per_row.max(1))
    }

    /// See [`crate::resolver::resolve`].
    #[inline]
    pub fn resolve(&self, point: Point) -> Option<&KeyZone> {
        crate::resolver::resolve(self, point)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::DEFAULT_SURFACE;
    use approx::assert_relative_eq;

    fn notes(layout: &Layout, row: usize) -> Vec<i32> {
        layout.row(row).iter().map(KeyZone::note).collect()
    }

    #[test]
    fn test_single_row() {
        let config = EngineConfig::default()
            .with_grid(1, 3)
            .with_low_note(60)
            .with_interval(0);
        let layout = Layout::build(&config, DEFAULT_SURFACE);

        assert_eq!(layout.len(), 3);
        assert_eq!(notes(&layout, 0), vec![60, 61, 62]);
        assert!(layout.row(0)[1].is_accidental());
        assert_eq!(layout.row(0)[1].label(), "C#");
    }

    #[test]
    fn test_rows_shift_by_interval() {
        let config = EngineConfig::default()
            .with_grid(2, 25)
            .with_low_note(24)
            .with_interval(5);
        let layout = Layout::build(&config, DEFAULT_SURFACE);

        let row0 = notes(&layout, 0);
        let row1 = notes(&layout, 1);
        assert_eq!(row0.first(), Some(&24));
        assert_eq!(row0.last(), Some(&48));
        assert_eq!(row1.first(), Some(&29));
        assert_eq!(row1.last(), Some(&53));
    }

    #[test]
    fn test_row_zero_is_bottom_band() {
        let config = EngineConfig::default().with_grid(2, 1);
        let surface = Rect::new(0.0, 0.0, 100.0, 200.0);
        let layout = Layout::build(&config, surface);

        let bottom = &layout.row(0)[0];
        let top = &layout.row(1)[0];
        assert_eq!(bottom.region(), Rect::new(0.0, 100.0, 100.0, 200.0));
        assert_eq!(top.region(), Rect::new(0.0, 0.0, 100.0, 100.0));
        assert_eq!(bottom.center_y(), 150.0);
        assert_eq!(top.center_y(), 50.0);
    }

    #[test]
    fn test_keys_share_edges() {
        let config = EngineConfig::default().with_grid(3, 7);
        let layout = Layout::build(&config, Rect::new(3.0, 5.0, 1003.0, 705.0));

        for row in layout.iter_rows() {
            for pair in row.windows(2) {
                assert_eq!(pair[0].region().right, pair[1].region().left);
            }
            assert_eq!(row[0].region().left, 3.0);
            assert_eq!(row[row.len() - 1].region().right, 1003.0);
        }
        assert_eq!(layout.row(0)[0].region().bottom, 705.0);
        assert_eq!(layout.row(2)[0].region().top, 5.0);
        assert_eq!(
            layout.row(0)[0].region().top,
            layout.row(1)[0].region().bottom
        );
    }

    #[test]
    fn test_default_grid_key_size() {
        let layout = Layout::build(&EngineConfig::default(), DEFAULT_SURFACE);
        assert_eq!(layout.len(), 13 * 25);

        for zone in layout.zones() {
            assert_relative_eq!(zone.region().width(), 800.0 / 25.0, epsilon = 1e-3);
            assert_relative_eq!(zone.region().height(), 600.0 / 13.0, epsilon = 1e-3);
            assert_relative_eq!(zone.center_y(), zone.region().center_y());
        }
    }

    #[test]
    fn test_degenerate_grid_is_empty() {
        let surface = DEFAULT_SURFACE;
        assert!(Layout::build(&EngineConfig::default().with_grid(0, 25), surface).is_empty());
        assert!(Layout::build(&EngineConfig::default().with_grid(13, 0), surface).is_empty());
        assert_eq!(
            Layout::build(&EngineConfig::default().with_grid(0, 0), surface).iter_rows().count(),
            0
        );
    }

    #[test]
    fn test_notes_are_not_clamped() {
        let config = EngineConfig::default()
            .with_grid(2, 10)
            .with_low_note(120)
            .with_interval(12);
        let layout = Layout::build(&config, DEFAULT_SURFACE);

        let top_row = layout.row(1);
        assert_eq!(top_row[0].note(), 132);
        assert_eq!(top_row[0].midi_note(), None);
        assert_eq!(layout.row(0)[7].midi_note(), Some(127));
        assert_eq!(layout.row(0)[8].note(), 128);
    }

    #[test]
    fn test_wide_interval_single_row() {
        let config = EngineConfig::default()
            .with_grid(1, 4)
            .with_low_note(60)
            .with_interval(200);
        let layout = Layout::build(&config, DEFAULT_SURFACE);
        assert_eq!(notes(&layout, 0), vec![60, 61, 62, 63]);

        let two_rows = Layout::build(&config.with_grid(2, 4), DEFAULT_SURFACE);
        assert_eq!(notes(&two_rows, 1), vec![260, 261, 262, 263]);
        assert!(two_rows.row(1).iter().all(|zone| zone.midi_note().is_none()));
    }

    #[test]
    fn test_extreme_interval_saturates() {
        let config = EngineConfig::default()
            .with_grid(3, 2)
            .with_low_note(127)
            .with_interval(i32::MAX);
        let layout = Layout::build(&config, DEFAULT_SURFACE);
        assert_eq!(layout.row(2)[1].note(), i32::MAX);

        let config = config.with_low_note(0).with_interval(i32::MIN);
        let layout = Layout::build(&config, DEFAULT_SURFACE);
        assert_eq!(layout.row(2)[0].note(), i32::MIN);
    }

    #[test]
    fn test_negative_interval_descends() {
        let config = EngineConfig::default()
            .with_grid(3, 2)
            .with_low_note(60)
            .with_interval(-12);
        let layout = Layout::build(&config, DEFAULT_SURFACE);
        assert_eq!(notes(&layout, 2), vec![36, 37]);
    }
}

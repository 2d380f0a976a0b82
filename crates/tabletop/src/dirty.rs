//! Bitmask of tabletop config fields that changed since the last apply pass.

/// Set of changed config fields, accumulated between apply passes and cleared
/// after each one. One bit per public field of `TabletopConfig`.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct DirtyFields(u8);

impl DirtyFields {
    pub const CENTER: DirtyFields = DirtyFields(1 << 0);
    pub const SHAPE: DirtyFields = DirtyFields(1 << 1);
    pub const WIDTH: DirtyFields = DirtyFields(1 << 2);
    pub const HEIGHT: DirtyFields = DirtyFields(1 << 3);
    pub const ELEVATION_OFFSET: DirtyFields = DirtyFields(1 << 4);
    pub const AUTOMATIC_ELEVATION: DirtyFields = DirtyFields(1 << 5);

    /// Every field that feeds the extent synchronizer.
    pub const EXTENT_FIELDS: DirtyFields = DirtyFields(
        Self::CENTER.0 | Self::SHAPE.0 | Self::WIDTH.0 | Self::HEIGHT.0,
    );

    pub fn mark(&mut self, fields: DirtyFields) {
        self.0 |= fields.0;
    }

    /// True when any bit of `fields` is set.
    pub fn intersects(self, fields: DirtyFields) -> bool {
        self.0 & fields.0 != 0
    }

    pub fn is_empty(self) -> bool {
        self.0 == 0
    }

    pub fn clear(&mut self) {
        self.0 = 0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mark_accumulates() {
        let mut dirty = DirtyFields::default();
        assert!(dirty.is_empty());

        dirty.mark(DirtyFields::WIDTH);
        dirty.mark(DirtyFields::CENTER);
        assert!(dirty.intersects(DirtyFields::WIDTH));
        assert!(dirty.intersects(DirtyFields::CENTER));
        assert!(!dirty.intersects(DirtyFields::SHAPE));
    }

    #[test]
    fn test_extent_fields_cover_geometry_bits() {
        for bit in [
            DirtyFields::CENTER,
            DirtyFields::SHAPE,
            DirtyFields::WIDTH,
            DirtyFields::HEIGHT,
        ] {
            let mut dirty = DirtyFields::default();
            dirty.mark(bit);
            assert!(dirty.intersects(DirtyFields::EXTENT_FIELDS));
        }

        let mut dirty = DirtyFields::default();
        dirty.mark(DirtyFields::ELEVATION_OFFSET);
        dirty.mark(DirtyFields::AUTOMATIC_ELEVATION);
        assert!(!dirty.intersects(DirtyFields::EXTENT_FIELDS));
    }

    #[test]
    fn test_clear_resets_all_bits() {
        let mut dirty = DirtyFields::default();
        dirty.mark(DirtyFields::EXTENT_FIELDS);
        dirty.mark(DirtyFields::AUTOMATIC_ELEVATION);
        dirty.clear();
        assert!(dirty.is_empty());
    }
}

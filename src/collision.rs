//! Axis-aligned boxes and per-pixel sprite masks.

/// Axis-aligned box in field pixels.  `x`/`y` is the top-left corner.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Rect {
    pub x: i32,
    pub y: i32,
    pub w: i32,
    pub h: i32,
}

impl Rect {
    pub fn new(x: i32, y: i32, w: i32, h: i32) -> Self {
        Rect { x, y, w, h }
    }

    pub fn right(&self) -> i32 {
        self.x + self.w
    }

    pub fn bottom(&self) -> i32 {
        self.y + self.h
    }

    pub fn center(&self) -> (i32, i32) {
        (self.x + self.w / 2, self.y + self.h / 2)
    }

    /// Edges that merely touch do not overlap.
    pub fn intersects(&self, other: &Rect) -> bool {
        self.x < other.right()
            && other.x < self.right()
            && self.y < other.bottom()
            && other.y < self.bottom()
    }

    pub fn intersection(&self, other: &Rect) -> Option<Rect> {
        if !self.intersects(other) {
            return None;
        }
        let x = self.x.max(other.x);
        let y = self.y.max(other.y);
        Some(Rect {
            x,
            y,
            w: self.right().min(other.right()) - x,
            h: self.bottom().min(other.bottom()) - y,
        })
    }
}

/// A sprite image reduced to what the simulation needs: its size and which
/// pixels are opaque.
#[derive(Clone, Debug, PartialEq)]
pub struct Sprite {
    width: i32,
    height: i32,
    mask: Vec<bool>,
}

impl Sprite {
    /// Build a sprite from pixel art.  `#` is opaque, anything else is
    /// transparent.  Every art pixel becomes a `scale` × `scale` block.
    /// Short rows are padded with transparent pixels.
    pub fn from_art(rows: &[&str], scale: i32) -> Self {
        let scale = scale.max(1);
        let art_w = rows.iter().map(|r| r.chars().count()).max().unwrap_or(0) as i32;
        let art_h = rows.len() as i32;
        let width = art_w * scale;
        let height = art_h * scale;

        let mut mask = vec![false; (width * height) as usize];
        for (ay, row) in rows.iter().enumerate() {
            for (ax, ch) in row.chars().enumerate() {
                if ch != '#' {
                    continue;
                }
                for dy in 0..scale {
                    let py = ay as i32 * scale + dy;
                    let start = (py * width + ax as i32 * scale) as usize;
                    mask[start..start + scale as usize].fill(true);
                }
            }
        }
        Sprite { width, height, mask }
    }

    /// Fully opaque rectangle.
    pub fn solid(width: i32, height: i32) -> Self {
        Sprite {
            width,
            height,
            mask: vec![true; (width.max(0) * height.max(0)) as usize],
        }
    }

    pub fn width(&self) -> i32 {
        self.width
    }

    pub fn height(&self) -> i32 {
        self.height
    }

    /// Opacity of the pixel at sprite-local coordinates; out of range is
    /// transparent.
    pub fn is_opaque(&self, x: i32, y: i32) -> bool {
        if x < 0 || y < 0 || x >= self.width || y >= self.height {
            return false;
        }
        self.mask[(y * self.width + x) as usize]
    }

    pub fn opaque_count(&self) -> usize {
        self.mask.iter().filter(|&&p| p).count()
    }

    pub fn rect_at(&self, x: i32, y: i32) -> Rect {
        Rect::new(x, y, self.width, self.height)
    }

    /// Any opaque pixel in the field-space box `area` for a sprite drawn at
    /// `(x, y)`.  Used by the renderer to rasterise into coarse cells.
    pub fn any_opaque_in(&self, x: i32, y: i32, area: &Rect) -> bool {
        let Some(clip) = self.rect_at(x, y).intersection(area) else {
            return false;
        };
        (clip.y..clip.bottom())
            .any(|py| (clip.x..clip.right()).any(|px| self.is_opaque(px - x, py - y)))
    }
}

/// Per-pixel overlap of two sprites placed at `a_pos` and `b_pos`.
pub fn masks_overlap(a: &Sprite, a_pos: (i32, i32), b: &Sprite, b_pos: (i32, i32)) -> bool {
    let ra = a.rect_at(a_pos.0, a_pos.1);
    let rb = b.rect_at(b_pos.0, b_pos.1);
    let Some(clip) = ra.intersection(&rb) else {
        return false;
    };
    for py in clip.y..clip.bottom() {
        for px in clip.x..clip.right() {
            if a.is_opaque(px - ra.x, py - ra.y) && b.is_opaque(px - rb.x, py - rb.y) {
                return true;
            }
        }
    }
    false
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn touching_edges_do_not_intersect() {
        let a = Rect::new(0, 0, 10, 10);
        let b = Rect::new(10, 0, 10, 10);
        assert!(!a.intersects(&b));
        assert!(a.intersects(&Rect::new(9, 9, 10, 10)));
    }

    #[test]
    fn intersection_is_clipped() {
        let a = Rect::new(0, 0, 10, 10);
        let b = Rect::new(5, 6, 10, 10);
        assert_eq!(a.intersection(&b), Some(Rect::new(5, 6, 5, 4)));
    }

    #[test]
    fn art_is_scaled() {
        let s = Sprite::from_art(&["#.", ".#"], 3);
        assert_eq!((s.width(), s.height()), (6, 6));
        assert!(s.is_opaque(0, 0));
        assert!(s.is_opaque(2, 2));
        assert!(!s.is_opaque(3, 0));
        assert!(s.is_opaque(5, 5));
        assert_eq!(s.opaque_count(), 18);
    }

    #[test]
    fn boxes_overlap_but_masks_do_not() {
        // Opaque pixels sit in opposite corners.
        let a = Sprite::from_art(&["#.", ".."], 4);
        let b = Sprite::from_art(&["..", ".#"], 4);
        assert!(a.rect_at(0, 0).intersects(&b.rect_at(0, 0)));
        assert!(!masks_overlap(&a, (0, 0), &b, (0, 0)));
        // Shift b so its opaque corner lands on a's.
        assert!(masks_overlap(&a, (0, 0), &b, (-4, -4)));
    }

    #[test]
    fn rasterise_area_lookup() {
        let s = Sprite::from_art(&["#.."], 2);
        assert!(s.any_opaque_in(10, 10, &Rect::new(10, 10, 1, 1)));
        assert!(!s.any_opaque_in(10, 10, &Rect::new(13, 10, 3, 2)));
        assert!(!s.any_opaque_in(10, 10, &Rect::new(0, 0, 5, 5)));
    }
}

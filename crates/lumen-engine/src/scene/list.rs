use std::rc::Rc;

use crate::coords::ScreenRect;
use crate::paint::Color;
use crate::render::Texture;

use super::{DrawCmd, DrawKind, ImageCmd, RectCmd};

/// Consecutive commands of one kind.
///
/// `first` counts only commands of `kind`: it indexes the sequence yielded by
/// [`DrawList::rects`] or [`DrawList::images`], which is also the order the
/// renderers lay out their instances in.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub struct DrawRun {
    pub kind: DrawKind,
    pub first: usize,
    pub count: usize,
}

/// Draw stream recorded for one scene.
///
/// Commands are painted in insertion order. The driver draws each
/// [`DrawRun`] with the renderer of its kind, so later calls cover earlier
/// ones whatever their kind.
#[derive(Debug, Default)]
pub struct DrawList {
    items: Vec<DrawCmd>,
}

impl DrawList {
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    /// Drops recorded commands. Keeps allocated capacity for reuse.
    #[inline]
    pub fn clear(&mut self) {
        self.items.clear();
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    #[inline]
    pub fn items(&self) -> &[DrawCmd] {
        &self.items
    }

    /// Records a solid rectangle. Empty rectangles are dropped.
    pub fn push_rect(&mut self, rect: ScreenRect, color: Color) {
        let rect = rect.normalized();
        if rect.is_empty() || color.a == 0 {
            return;
        }
        self.items.push(DrawCmd::Rect(RectCmd { rect, color }));
    }

    /// Records a textured rectangle. Empty destinations are dropped.
    pub fn push_image(&mut self, texture: Rc<Texture>, dest: ScreenRect, src: ScreenRect, tint: Color) {
        if dest.is_empty() || src.is_empty() {
            return;
        }
        self.items.push(DrawCmd::Image(ImageCmd { texture, dest, src, tint }));
    }

    /// Splits the stream into runs of one kind, in paint order.
    pub fn runs(&self) -> Vec<DrawRun> {
        let mut runs: Vec<DrawRun> = Vec::new();
        let (mut rects, mut images) = (0, 0);

        for cmd in &self.items {
            let kind = cmd.kind();
            let seen = match kind {
                DrawKind::Rect => &mut rects,
                DrawKind::Image => &mut images,
            };

            match runs.last_mut() {
                Some(run) if run.kind == kind => run.count += 1,
                _ => runs.push(DrawRun { kind, first: *seen, count: 1 }),
            }
            *seen += 1;
        }
        runs
    }

    pub fn rects(&self) -> impl Iterator<Item = &RectCmd> {
        self.items.iter().filter_map(|c| match c {
            DrawCmd::Rect(r) => Some(r),
            _ => None,
        })
    }

    pub fn images(&self) -> impl Iterator<Item = &ImageCmd> {
        self.items.iter().filter_map(|c| match c {
            DrawCmd::Image(i) => Some(i),
            _ => None,
        })
    }
}

//! Document-space geometry shared by handles, scroll state, and predicates

/// Bounds of an element in document coordinates
///
/// Document coordinates are independent of the current scroll offset; the
/// visible region is described separately by a [`Viewport`].
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ElementBounds {
    /// X position in document space
    pub x: f32,
    /// Y position in document space
    pub y: f32,
    /// Computed width
    pub width: f32,
    /// Computed height
    pub height: f32,
}

impl ElementBounds {
    /// Create bounds at the given position with the given size
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    pub fn top(&self) -> f32 {
        self.y
    }

    pub fn bottom(&self) -> f32 {
        self.y + self.height
    }

    pub fn left(&self) -> f32 {
        self.x
    }

    pub fn right(&self) -> f32 {
        self.x + self.width
    }

    /// Check whether two bounds overlap
    ///
    /// Touching edges do not count as an overlap.
    pub fn intersects(&self, other: &ElementBounds) -> bool {
        self.left() < other.right()
            && other.left() < self.right()
            && self.top() < other.bottom()
            && other.top() < self.bottom()
    }

    /// Check whether `other` lies entirely inside these bounds
    pub fn contains(&self, other: &ElementBounds) -> bool {
        other.left() >= self.left()
            && other.right() <= self.right()
            && other.top() >= self.top()
            && other.bottom() <= self.bottom()
    }

    /// Translate by the given offset
    pub fn offset(&self, dx: f32, dy: f32) -> Self {
        Self {
            x: self.x + dx,
            y: self.y + dy,
            ..*self
        }
    }
}

/// Visible window onto the document
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Viewport {
    /// Current scroll offset (x, y)
    pub offset: (f32, f32),
    /// Viewport size (width, height)
    pub size: (f32, f32),
}

impl Viewport {
    pub fn new(offset: (f32, f32), size: (f32, f32)) -> Self {
        Self { offset, size }
    }

    /// The visible region in document coordinates
    pub fn rect(&self) -> ElementBounds {
        ElementBounds::new(self.offset.0, self.offset.1, self.size.0, self.size.1)
    }

    /// Convert document bounds into viewport-relative bounds
    pub fn to_viewport_space(&self, bounds: &ElementBounds) -> ElementBounds {
        bounds.offset(-self.offset.0, -self.offset.1)
    }

    /// Check whether any part of `bounds` is visible
    pub fn shows(&self, bounds: &ElementBounds) -> bool {
        self.rect().intersects(bounds)
    }

    /// Check whether all of `bounds` is visible
    pub fn shows_fully(&self, bounds: &ElementBounds) -> bool {
        self.rect().contains(bounds)
    }
}

// Plain value types for window placement.  Device pixels throughout.

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Point {
    pub x: i32,
    pub y: i32,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Size {
    pub width: i32,
    pub height: i32,
}

/// Origin-and-size rectangle (not the Win32 left/top/right/bottom form).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Rect {
    pub origin: Point,
    pub size: Size,
}

impl Point {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }
}

impl Size {
    pub const fn new(width: i32, height: i32) -> Self {
        Self { width, height }
    }

    /// Scale a size defined at 96 DPI to `dpi`.
    pub const fn scaled(self, dpi: u32) -> Self {
        Self {
            width: self.width * dpi as i32 / 96,
            height: self.height * dpi as i32 / 96,
        }
    }
}

impl Rect {
    pub const fn new(x: i32, y: i32, width: i32, height: i32) -> Self {
        Self {
            origin: Point::new(x, y),
            size: Size::new(width, height),
        }
    }

    /// Build from Win32-style edges.
    pub const fn from_edges(left: i32, top: i32, right: i32, bottom: i32) -> Self {
        Self::new(left, top, right - left, bottom - top)
    }

    pub const fn right(&self) -> i32 {
        self.origin.x + self.size.width
    }

    pub const fn bottom(&self) -> i32 {
        self.origin.y + self.size.height
    }

    /// Position that centers a `size`-sized rectangle inside `self`.
    pub fn centered(&self, size: Size) -> Point {
        Point::new(
            self.origin.x + (self.size.width - size.width) / 2,
            self.origin.y + (self.size.height - size.height) / 2,
        )
    }
}

//! Composite value types and component-order permutations.
//!
//! Vectors, quaternions, and colors are stored on the wire as a run of
//! primitive components in *stream order*. An order enum names what each
//! stream position means, decoupling the bytes as they appear on disk from
//! the fields as this crate names them: `ColorOrder::Argb` says the first
//! channel read is alpha, wherever [`Color`] itself keeps alpha. The
//! `assemble` direction maps stream components to named fields; the
//! `components` direction maps named fields back to stream order.

/// A 2-component float vector.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Vector2 {
    /// X component.
    pub x: f32,
    /// Y component.
    pub y: f32,
}

impl Vector2 {
    /// Create a vector from its components.
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

/// A 3-component float vector.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Vector3 {
    /// X component.
    pub x: f32,
    /// Y component.
    pub y: f32,
    /// Z component.
    pub z: f32,
}

impl Vector3 {
    /// Create a vector from its components.
    pub fn new(x: f32, y: f32, z: f32) -> Self {
        Self { x, y, z }
    }
}

/// A 4-component float vector.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Vector4 {
    /// X component.
    pub x: f32,
    /// Y component.
    pub y: f32,
    /// Z component.
    pub z: f32,
    /// W component.
    pub w: f32,
}

impl Vector4 {
    /// Create a vector from its components.
    pub fn new(x: f32, y: f32, z: f32, w: f32) -> Self {
        Self { x, y, z, w }
    }
}

/// A quaternion. Shares the 4-float wire layout and [`Vector4Order`] with
/// [`Vector4`].
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Quaternion {
    /// X component.
    pub x: f32,
    /// Y component.
    pub y: f32,
    /// Z component.
    pub z: f32,
    /// W (scalar) component.
    pub w: f32,
}

impl Quaternion {
    /// Create a quaternion from its components.
    pub fn new(x: f32, y: f32, z: f32, w: f32) -> Self {
        Self { x, y, z, w }
    }
}

/// An RGBA color with one byte per channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Color {
    /// Red channel.
    pub r: u8,
    /// Green channel.
    pub g: u8,
    /// Blue channel.
    pub b: u8,
    /// Alpha channel.
    pub a: u8,
}

impl Color {
    /// Create a color from its channels.
    pub fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }
}

/// Stream order of [`Vector2`] components.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Vector2Order {
    /// X then Y.
    #[default]
    Xy,
    /// Y then X.
    Yx,
}

impl Vector2Order {
    /// Assemble components read in stream order into named fields.
    pub fn assemble(&self, c: [f32; 2]) -> Vector2 {
        match self {
            Self::Xy => Vector2::new(c[0], c[1]),
            Self::Yx => Vector2::new(c[1], c[0]),
        }
    }

    /// Named fields laid out in stream order.
    pub fn components(&self, v: Vector2) -> [f32; 2] {
        match self {
            Self::Xy => [v.x, v.y],
            Self::Yx => [v.y, v.x],
        }
    }
}

/// Stream order of [`Vector3`] components.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Vector3Order {
    /// X, Y, Z.
    #[default]
    Xyz,
    /// X, Z, Y.
    Xzy,
    /// Y, X, Z.
    Yxz,
    /// Y, Z, X.
    Yzx,
    /// Z, X, Y.
    Zxy,
    /// Z, Y, X.
    Zyx,
}

impl Vector3Order {
    /// Assemble components read in stream order into named fields.
    pub fn assemble(&self, c: [f32; 3]) -> Vector3 {
        match self {
            Self::Xyz => Vector3::new(c[0], c[1], c[2]),
            Self::Xzy => Vector3::new(c[0], c[2], c[1]),
            Self::Yxz => Vector3::new(c[1], c[0], c[2]),
            Self::Yzx => Vector3::new(c[2], c[0], c[1]),
            Self::Zxy => Vector3::new(c[1], c[2], c[0]),
            Self::Zyx => Vector3::new(c[2], c[1], c[0]),
        }
    }

    /// Named fields laid out in stream order.
    pub fn components(&self, v: Vector3) -> [f32; 3] {
        match self {
            Self::Xyz => [v.x, v.y, v.z],
            Self::Xzy => [v.x, v.z, v.y],
            Self::Yxz => [v.y, v.x, v.z],
            Self::Yzx => [v.y, v.z, v.x],
            Self::Zxy => [v.z, v.x, v.y],
            Self::Zyx => [v.z, v.y, v.x],
        }
    }
}

/// Stream order of [`Vector4`] and [`Quaternion`] components.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Vector4Order {
    /// X, Y, Z, W.
    #[default]
    Xyzw,
    /// W, X, Y, Z.
    Wxyz,
}

impl Vector4Order {
    fn map(&self, c: [f32; 4]) -> [f32; 4] {
        match self {
            Self::Xyzw => c,
            Self::Wxyz => [c[1], c[2], c[3], c[0]],
        }
    }

    fn unmap(&self, xyzw: [f32; 4]) -> [f32; 4] {
        match self {
            Self::Xyzw => xyzw,
            Self::Wxyz => [xyzw[3], xyzw[0], xyzw[1], xyzw[2]],
        }
    }

    /// Assemble components read in stream order into a vector.
    pub fn assemble(&self, c: [f32; 4]) -> Vector4 {
        let [x, y, z, w] = self.map(c);
        Vector4::new(x, y, z, w)
    }

    /// Assemble components read in stream order into a quaternion.
    pub fn assemble_quaternion(&self, c: [f32; 4]) -> Quaternion {
        let [x, y, z, w] = self.map(c);
        Quaternion::new(x, y, z, w)
    }

    /// Vector fields laid out in stream order.
    pub fn components(&self, v: Vector4) -> [f32; 4] {
        self.unmap([v.x, v.y, v.z, v.w])
    }

    /// Quaternion fields laid out in stream order.
    pub fn quaternion_components(&self, q: Quaternion) -> [f32; 4] {
        self.unmap([q.x, q.y, q.z, q.w])
    }
}

/// Stream order of [`Color`] channels.
///
/// Three-channel orders decode with alpha forced opaque and never write an
/// alpha byte.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ColorOrder {
    /// Red, green, blue.
    Rgb,
    /// Blue, green, red.
    Bgr,
    /// Red, green, blue, alpha.
    #[default]
    Rgba,
    /// Blue, green, red, alpha.
    Bgra,
    /// Alpha, red, green, blue.
    Argb,
    /// Alpha, blue, green, red.
    Abgr,
}

impl ColorOrder {
    /// Number of channels this order occupies on the wire.
    pub fn channel_count(&self) -> usize {
        match self {
            Self::Rgb | Self::Bgr => 3,
            Self::Rgba | Self::Bgra | Self::Argb | Self::Abgr => 4,
        }
    }

    /// Assemble channels read in stream order into a color. Three-channel
    /// orders use only `c[0..3]` and force alpha opaque.
    pub fn assemble(&self, c: [u8; 4]) -> Color {
        match self {
            Self::Rgb => Color::new(c[0], c[1], c[2], 0xFF),
            Self::Bgr => Color::new(c[2], c[1], c[0], 0xFF),
            Self::Rgba => Color::new(c[0], c[1], c[2], c[3]),
            Self::Bgra => Color::new(c[2], c[1], c[0], c[3]),
            Self::Argb => Color::new(c[1], c[2], c[3], c[0]),
            Self::Abgr => Color::new(c[3], c[2], c[1], c[0]),
        }
    }

    /// Channels laid out in stream order. Three-channel orders leave the
    /// last slot zero; only the first [`channel_count`](Self::channel_count)
    /// bytes belong on the wire.
    pub fn components(&self, color: Color) -> [u8; 4] {
        match self {
            Self::Rgb => [color.r, color.g, color.b, 0],
            Self::Bgr => [color.b, color.g, color.r, 0],
            Self::Rgba => [color.r, color.g, color.b, color.a],
            Self::Bgra => [color.b, color.g, color.r, color.a],
            Self::Argb => [color.a, color.r, color.g, color.b],
            Self::Abgr => [color.a, color.b, color.g, color.r],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_color_argb_vs_rgba() {
        let c = [0x11, 0x22, 0x33, 0x44];
        let argb = ColorOrder::Argb.assemble(c);
        assert_eq!(argb, Color::new(0x22, 0x33, 0x44, 0x11));
        let rgba = ColorOrder::Rgba.assemble(c);
        assert_eq!(rgba, Color::new(0x11, 0x22, 0x33, 0x44));
    }

    #[test]
    fn test_color_three_channel_opaque() {
        let rgb = ColorOrder::Rgb.assemble([1, 2, 3, 0]);
        assert_eq!(rgb, Color::new(1, 2, 3, 0xFF));
        let bgr = ColorOrder::Bgr.assemble([1, 2, 3, 0]);
        assert_eq!(bgr, Color::new(3, 2, 1, 0xFF));
        assert_eq!(ColorOrder::Rgb.channel_count(), 3);
        assert_eq!(ColorOrder::Bgra.channel_count(), 4);
    }

    #[test]
    fn test_color_assemble_components_inverse() {
        let color = Color::new(10, 20, 30, 40);
        for order in [
            ColorOrder::Rgba,
            ColorOrder::Bgra,
            ColorOrder::Argb,
            ColorOrder::Abgr,
        ] {
            let streamed = order.components(color);
            assert_eq!(order.assemble(streamed), color, "{order:?}");
        }
    }

    #[test]
    fn test_vector2_orders() {
        let c = [1.0, 2.0];
        assert_eq!(Vector2Order::Xy.assemble(c), Vector2::new(1.0, 2.0));
        assert_eq!(Vector2Order::Yx.assemble(c), Vector2::new(2.0, 1.0));
    }

    #[test]
    fn test_vector3_orders_inverse() {
        let v = Vector3::new(1.0, 2.0, 3.0);
        for order in [
            Vector3Order::Xyz,
            Vector3Order::Xzy,
            Vector3Order::Yxz,
            Vector3Order::Yzx,
            Vector3Order::Zxy,
            Vector3Order::Zyx,
        ] {
            let streamed = order.components(v);
            assert_eq!(order.assemble(streamed), v, "{order:?}");
        }
    }

    #[test]
    fn test_vector3_zyx() {
        let v = Vector3Order::Zyx.assemble([3.0, 2.0, 1.0]);
        assert_eq!(v, Vector3::new(1.0, 2.0, 3.0));
    }

    #[test]
    fn test_vector4_and_quaternion_share_orders() {
        let c = [0.0, 0.0, 0.0, 1.0];
        let v = Vector4Order::Xyzw.assemble(c);
        assert_eq!(v, Vector4::new(0.0, 0.0, 0.0, 1.0));

        // Identity quaternion stored scalar-first.
        let q = Vector4Order::Wxyz.assemble_quaternion([1.0, 0.0, 0.0, 0.0]);
        assert_eq!(q, Quaternion::new(0.0, 0.0, 0.0, 1.0));
        assert_eq!(
            Vector4Order::Wxyz.quaternion_components(q),
            [1.0, 0.0, 0.0, 0.0]
        );
    }

    #[test]
    fn test_default_orders() {
        assert_eq!(Vector2Order::default(), Vector2Order::Xy);
        assert_eq!(Vector3Order::default(), Vector3Order::Xyz);
        assert_eq!(Vector4Order::default(), Vector4Order::Xyzw);
        assert_eq!(ColorOrder::default(), ColorOrder::Rgba);
    }
}

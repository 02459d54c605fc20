//! Software rendering: the RGBA canvas plus the scene layers drawn onto
//! it every frame (background, nest, pet sprite, touch effects).

pub mod background;
pub mod canvas;
pub mod effects;
pub mod nest;
pub mod pet;
pub mod sprite;

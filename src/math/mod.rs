mod aabb;
mod ray;
mod triangle;
mod uv;

pub use aabb::AABB;
pub use ray::{intersect_aabb, Ray};
pub use triangle::{moller_trumbore_intersect, TriangleHit};
pub use uv::{aspect_fit, TextureMapping};

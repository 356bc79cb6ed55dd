//! Built-in closed-form equation sets and the default solver registry.
//!
//! | id              | joints | free      | target                       |
//! |-----------------|--------|-----------|------------------------------|
//! | `planar2r`      | 2      | none      | `TranslationXY2D`            |
//! | `planar3r`      | 3      | joint 0   | `TranslationXY2D`            |
//! | `planar3r_pose` | 3      | none      | `TranslationXYOrientation3D` |
//! | `pan_tilt`      | 2      | none      | `Direction3D`                |
//! | `elbow3`        | 3      | none      | `Translation3D`              |
//! | `opw6`          | 6      | none      | `Transform6D`                |
//! | `rail_opw7`     | 7      | joint 0   | `Transform6D`                |

pub mod catalog;
pub mod opw;
pub mod pan_tilt;
pub mod planar;
pub mod rail;

pub use catalog::{BUILTIN_ROBOTS, default_registry, register_builtin, registry_with_config};
pub use opw::{Elbow3, Opw6, OpwParameters};
pub use pan_tilt::PanTilt;
pub use planar::{Planar2R, Planar3R, Planar3RPose};
pub use rail::RailOpw7;

//! Pet simulation: data model, animation state machine, autonomous
//! behavior and the day/night rhythm.

pub mod animation;
pub mod behavior;
pub mod daynight;
pub mod model;

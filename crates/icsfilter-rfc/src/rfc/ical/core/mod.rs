//! iCalendar core models used by the line-oriented filter.
//!
//! Only the pieces needed to locate and move blocks of text are modelled:
//! content lines, their parameters, and component boundaries.

mod component;
mod parameter;
mod property;

pub use component::{ComponentKind, ComponentSpan};
pub use parameter::Parameter;
pub use property::{ContentLine, names};

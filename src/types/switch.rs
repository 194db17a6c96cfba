//! Centralized dispatch over the closed set of type shapes.
//!
//! Call sites that branch on "plain class vs. parameterized vs. anything
//! else" implement [`TypeSwitch`] instead of matching [`RawType`] directly,
//! so the three-way polymorphism lives in one place.

use crate::types::{ClassDescription, RawType};

pub trait TypeSwitch {
    type Output;

    fn case_class(&mut self, class: ClassDescription) -> Self::Output;

    fn case_parameterized(&mut self, raw: ClassDescription, args: &[RawType]) -> Self::Output;

    /// Variables, wildcards, arrays, primitives. Implementations may supply a
    /// default (e.g. the identity environment) rather than fail.
    fn default_case(&mut self, t: &RawType) -> Self::Output;

    fn dispatch(&mut self, t: &RawType) -> Self::Output {
        match t {
            RawType::Class(class) => self.case_class(*class),
            RawType::Parameterized { raw, args } => self.case_parameterized(*raw, args),
            other => self.default_case(other),
        }
    }
}
